//! Channel Layout - Centralized Telemetry Channel Definition
//!
//! **This file controls the channel schema**
//!
//! The order below is the order of `Reading::values()`, of every feature
//! matrix the model module builds, and of persisted scorer snapshots.
//!
//! ## Rules:
//! 1. Add channel → increment CHANNEL_VERSION
//! 2. Change order → increment CHANNEL_VERSION
//! 3. Remove channel → increment CHANNEL_VERSION

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// CHANNEL VERSION
// ============================================================================

/// Current channel layout version
pub const CHANNEL_VERSION: u8 = 1;

// ============================================================================
// CHANNEL LAYOUT (Authoritative source)
// ============================================================================

/// Channel names in exact order they appear in a reading vector
pub const CHANNEL_LAYOUT: &[&str] = &[
    "battery_level",   // 0: State of charge (%)
    "temperature",     // 1: Bus temperature (°C)
    "signal_strength", // 2: Downlink signal quality (%)
    "cpu_load",        // 3: Flight computer load (%)
];

/// Total number of channels
/// IMPORTANT: Must match CHANNEL_LAYOUT.len()!
pub const CHANNEL_COUNT: usize = 4;

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// Compute CRC32 hash of the channel layout
pub fn compute_layout_hash() -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(&[CHANNEL_VERSION]);

    for name in CHANNEL_LAYOUT {
        hasher.update(name.as_bytes());
        hasher.update(&[0]); // Separator
    }

    hasher.finalize()
}

/// Get layout hash
pub fn layout_hash() -> u32 {
    compute_layout_hash()
}

/// Layout description stored next to persisted models
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub version: u8,
    pub hash: u32,
    pub channel_names: Vec<String>,
}

impl LayoutInfo {
    pub fn current() -> Self {
        Self {
            version: CHANNEL_VERSION,
            hash: layout_hash(),
            channel_names: CHANNEL_LAYOUT.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn validate(&self) -> Result<(), LayoutMismatchError> {
        validate_layout(self.version, self.hash)
    }
}

impl Default for LayoutInfo {
    fn default() -> Self {
        Self::current()
    }
}

// ============================================================================
// LAYOUT VALIDATION
// ============================================================================

/// Error when a persisted layout doesn't match the running one
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "channel layout mismatch: expected v{expected_version} (hash: {expected_hash:08x}), \
     got v{actual_version} (hash: {actual_hash:08x})"
)]
pub struct LayoutMismatchError {
    pub expected_version: u8,
    pub expected_hash: u32,
    pub actual_version: u8,
    pub actual_hash: u32,
}

/// Validate that incoming data matches current layout
pub fn validate_layout(incoming_version: u8, incoming_hash: u32) -> Result<(), LayoutMismatchError> {
    let current_hash = layout_hash();

    if incoming_version != CHANNEL_VERSION || incoming_hash != current_hash {
        return Err(LayoutMismatchError {
            expected_version: CHANNEL_VERSION,
            expected_hash: current_hash,
            actual_version: incoming_version,
            actual_hash: incoming_hash,
        });
    }

    Ok(())
}

/// Get channel index by name
pub fn channel_index(name: &str) -> Option<usize> {
    CHANNEL_LAYOUT.iter().position(|&n| n == name)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_count() {
        assert_eq!(CHANNEL_LAYOUT.len(), CHANNEL_COUNT);
    }

    #[test]
    fn test_layout_hash_consistency() {
        assert_eq!(compute_layout_hash(), compute_layout_hash());
        assert_ne!(layout_hash(), 0);
    }

    #[test]
    fn test_validate_layout() {
        assert!(validate_layout(CHANNEL_VERSION, layout_hash()).is_ok());
        assert!(validate_layout(CHANNEL_VERSION + 1, layout_hash()).is_err());

        let err = validate_layout(CHANNEL_VERSION, !layout_hash()).unwrap_err();
        assert_eq!(err.expected_hash, layout_hash());
        assert_eq!(err.actual_version, CHANNEL_VERSION);
    }

    #[test]
    fn test_channel_index() {
        assert_eq!(channel_index("battery_level"), Some(0));
        assert_eq!(channel_index("cpu_load"), Some(3));
        assert_eq!(channel_index("fuel"), None);
    }

    #[test]
    fn test_layout_info_current() {
        let info = LayoutInfo::current();
        assert_eq!(info.channel_names.len(), CHANNEL_COUNT);
        assert!(info.validate().is_ok());
    }
}
