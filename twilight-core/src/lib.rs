pub mod error;
pub mod field;
pub mod interpolate;
pub mod rng;
pub mod starfield;
pub mod state;
pub mod timeline;

// Re-export primary types for convenience.
pub use error::CoreError;
pub use field::{FieldKind, FieldSpec, FieldValue, FIELDS};
pub use interpolate::{interpolate, Direction};
pub use rng::SplitMix64;
pub use starfield::{BigStar, SmallStar, StarField, StarFieldConfig, StarFieldKey};
pub use state::{clamp_linear, wrap_cyclical, ParameterState, RenderType};
pub use timeline::{Keyframe, Timeline};

/// Convenience result type for the core crate.
pub type Result<T> = std::result::Result<T, CoreError>;
