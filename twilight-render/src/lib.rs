pub mod buffer;
pub mod cache;
pub mod composite;
pub mod config;
pub mod error;
pub mod generator;
pub mod gradient;
pub mod projection;
pub mod stars;

pub use buffer::{RasterImage, StarCanvas};
pub use cache::{CacheOutcome, StarCache};
pub use composite::composite;
pub use config::{GeneratorConfig, SkyPalette};
pub use error::RenderError;
pub use generator::{render_with_field, GeneratorStatus, ImageGenerator};
pub use gradient::{gradient_layer, night_factor, star_color, GradientLayer};
pub use projection::Projection;
pub use stars::star_layer;

/// Convenience result type for the render crate.
pub type Result<T> = std::result::Result<T, RenderError>;
