//! Telemetry Module
//!
//! Synthetic spacecraft telemetry: what a reading is, how a stream of them
//! is produced, and how faults are scripted into it.
//!
//! ## Structure
//! - `layout.rs` - Channel order, version and layout hash
//! - `reading.rs` - `Channel`, immutable `Reading`
//! - `injection.rs` - Failure-injection schedule entries
//! - `stream.rs` - Append-only `Stream`
//! - `generator.rs` - Seeded `TelemetryGenerator` iterator
//!
//! ## Usage
//! ```ignore
//! use crate::logic::telemetry::{GeneratorConfig, TelemetryGenerator};
//!
//! let mut generator = TelemetryGenerator::new(GeneratorConfig::default());
//! let stream = generator.collect_stream();
//! ```

pub mod layout;
pub mod reading;
pub mod injection;
pub mod stream;
pub mod generator;

#[cfg(test)]
mod tests;

pub use layout::{CHANNEL_COUNT, CHANNEL_LAYOUT, CHANNEL_VERSION};
pub use reading::{Channel, Reading};
pub use injection::{FailureInjection, FailureKind};
pub use stream::Stream;
pub use generator::{generate, ChannelProfile, GeneratorConfig, TelemetryGenerator};
