//! Central Configuration Constants
//!
//! Single source of truth for process-level defaults.
//! Mission tuning lives in `logic::config::MissionConfig`; this file only
//! decides where things are read from and written to.

use std::path::PathBuf;

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "AstraGuard";

/// Directory name under the platform data dir
pub const DATA_DIR_NAME: &str = "astraguard";

/// Default human response delay (steps)
pub const DEFAULT_HUMAN_DELAY_STEPS: usize = 12;

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Mission config file (JSON), if one was given
pub fn get_config_path() -> Option<PathBuf> {
    std::env::var("ASTRAGUARD_CONFIG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from)
}

/// Human response delay override
pub fn get_human_delay() -> Option<usize> {
    std::env::var("ASTRAGUARD_HUMAN_DELAY")
        .ok()
        .and_then(|s| s.parse().ok())
}

/// Mission stream seed override
pub fn get_mission_seed() -> Option<u64> {
    std::env::var("ASTRAGUARD_SEED")
        .ok()
        .and_then(|s| s.parse().ok())
}

/// Scorer snapshot path, if snapshots are enabled
pub fn get_snapshot_path() -> Option<PathBuf> {
    std::env::var("ASTRAGUARD_SNAPSHOT")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from)
}

/// Report output directory from environment or platform default
pub fn get_report_dir() -> PathBuf {
    std::env::var("ASTRAGUARD_REPORT_DIR")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| default_data_dir().join("reports"))
}

/// Platform data directory for AstraGuard files
pub fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DATA_DIR_NAME)
}
