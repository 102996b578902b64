//! Error types for the combat core.
//!
//! Only two things can fail in the core:
//! - Configuration: unknown archetype identifiers or invalid tuning values,
//!   reported at construction time as [`ConfigError`].
//! - Collaborators: external sinks (audio) may reject work. Those failures are
//!   reported as [`AudioError`] and dropped by the engine after logging.
//!
//! Running out of energy is not an error; firing and ability activation simply
//! do nothing.

use thiserror::Error;

/// Errors raised while building an engine, a vehicle, or a weapon.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A weapon identifier did not name one of the six archetypes.
    #[error("unknown weapon archetype: {0:?}")]
    UnknownWeapon(String),

    /// A vehicle identifier did not name a known archetype.
    #[error("unknown vehicle archetype: {0:?}")]
    UnknownVehicle(String),

    /// The world rectangle has a non-positive or non-finite dimension.
    #[error("invalid world size {width}x{height}")]
    InvalidWorld {
        /// Configured width
        width: f32,
        /// Configured height
        height: f32,
    },

    /// A tuning value is out of its allowed range.
    #[error("invalid value for {field}: {value}")]
    InvalidValue {
        /// Name of the offending field
        field: &'static str,
        /// The rejected value
        value: f64,
    },

    /// The configuration document could not be parsed.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors reported by an audio sink.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AudioError {
    /// The platform refused playback (autoplay policy, muted device, ...).
    #[error("playback rejected: {0}")]
    Rejected(String),

    /// The requested cue has no loaded asset.
    #[error("no asset for cue {0}")]
    MissingAsset(String),
}
