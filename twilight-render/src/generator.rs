use std::time::Instant;

use tracing::{debug, info};

use twilight_core::{ParameterState, StarField, StarFieldKey, Timeline};

use crate::buffer::RasterImage;
use crate::cache::{CacheOutcome, StarCache};
use crate::composite::composite;
use crate::config::GeneratorConfig;
use crate::gradient::gradient_layer;
use crate::stars::star_layer;

/// Observable lifecycle of an [`ImageGenerator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorStatus {
    /// Nothing has been rendered yet.
    NoImage,
    /// The stored image matches the current state.
    Ready,
    /// The state changed after the stored image was rendered.
    Stale,
}

#[derive(Debug)]
enum Output {
    NoImage,
    Ready { image: RasterImage, stale: bool },
}

/// Renders [`ParameterState`]s into images, caching the star field between
/// renders that share `(seed, width, height, star_density)`.
#[derive(Debug)]
pub struct ImageGenerator {
    config: GeneratorConfig,
    state: ParameterState,
    cache: StarCache,
    output: Output,
}

impl ImageGenerator {
    pub fn new(state: ParameterState) -> Self {
        Self {
            config: GeneratorConfig::default(),
            state,
            cache: StarCache::new(),
            output: Output::NoImage,
        }
    }

    pub fn with_config(state: ParameterState, config: GeneratorConfig) -> crate::Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::new(state)
        })
    }

    pub fn state(&self) -> &ParameterState {
        &self.state
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn star_cache(&self) -> &StarCache {
        &self.cache
    }

    pub fn status(&self) -> GeneratorStatus {
        match self.output {
            Output::NoImage => GeneratorStatus::NoImage,
            Output::Ready { stale: false, .. } => GeneratorStatus::Ready,
            Output::Ready { stale: true, .. } => GeneratorStatus::Stale,
        }
    }

    /// Replace the current state without rendering. A stored image is kept
    /// but marked stale.
    pub fn set_state(&mut self, state: ParameterState) {
        self.state = state;
        if let Output::Ready { stale, .. } = &mut self.output {
            *stale = true;
        }
    }

    /// Make `state` current and render it.
    pub fn render(&mut self, state: &ParameterState) -> crate::Result<RasterImage> {
        self.set_state(state.clone());
        self.render_current()
    }

    /// The image for the current state, rendering only if there is none or
    /// the stored one is stale.
    pub fn get_image(&mut self) -> crate::Result<RasterImage> {
        match &self.output {
            Output::Ready {
                image,
                stale: false,
            } => Ok(image.clone()),
            _ => self.render_current(),
        }
    }

    /// Sample `timeline` at `frame` and render the result. Returns `None`
    /// for a timeline without keyframes.
    pub fn render_frame(
        &mut self,
        timeline: &Timeline,
        frame: i64,
    ) -> crate::Result<Option<RasterImage>> {
        match timeline.sample(frame)? {
            Some(state) => {
                debug!(frame, "Rendering timeline frame");
                self.render(&state).map(Some)
            }
            None => Ok(None),
        }
    }

    fn render_current(&mut self) -> crate::Result<RasterImage> {
        let start = Instant::now();
        let key = StarFieldKey::from(&self.state);
        let (field, outcome) = self.cache.resolve(key, &self.config.star_field);
        let stars = field.len();
        let image = render_with_field(&self.state, field, &self.config)?;

        info!(
            elapsed_ms = start.elapsed().as_millis(),
            width = image.width,
            height = image.height,
            stars,
            cache_hit = outcome == CacheOutcome::Hit,
            mode = %self.state.render_type(),
            "Render complete"
        );

        self.output = Output::Ready {
            image: image.clone(),
            stale: false,
        };
        Ok(image)
    }
}

/// Render `state` with an already built star field, bypassing any cache.
pub fn render_with_field(
    state: &ParameterState,
    field: &StarField,
    config: &GeneratorConfig,
) -> crate::Result<RasterImage> {
    let gradient = gradient_layer(state, &config.palette);
    let canvas = star_layer(state, field, config)?;
    Ok(composite(&canvas, &gradient))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RenderError;

    fn small_state() -> ParameterState {
        ParameterState::new(64, 48, 7).unwrap()
    }

    #[test]
    fn starts_without_image() {
        let gen = ImageGenerator::new(small_state());
        assert_eq!(gen.status(), GeneratorStatus::NoImage);
        assert!(gen.star_cache().current().is_none());
    }

    #[test]
    fn get_image_renders_once() {
        let mut gen = ImageGenerator::new(small_state());
        let first = gen.get_image().unwrap();
        assert_eq!(gen.status(), GeneratorStatus::Ready);
        let second = gen.get_image().unwrap();
        assert_eq!(first, second);
        assert_eq!(gen.star_cache().rebuild_count(), 1);
    }

    #[test]
    fn set_state_marks_stale_until_next_render() {
        let mut gen = ImageGenerator::new(small_state());
        gen.get_image().unwrap();
        let later = small_state().with_time_of_day(12.0).unwrap();
        gen.set_state(later.clone());
        assert_eq!(gen.status(), GeneratorStatus::Stale);
        assert_eq!(gen.state(), &later);

        let img = gen.get_image().unwrap();
        assert_eq!(gen.status(), GeneratorStatus::Ready);
        let field = StarField::for_state(&later, &gen.config().star_field);
        let expected = render_with_field(&later, &field, gen.config()).unwrap();
        assert_eq!(img, expected);
    }

    #[test]
    fn set_state_before_first_render_keeps_no_image() {
        let mut gen = ImageGenerator::new(small_state());
        gen.set_state(small_state().with_seed(8).unwrap());
        assert_eq!(gen.status(), GeneratorStatus::NoImage);
    }

    #[test]
    fn with_config_rejects_invalid_config() {
        let mut config = GeneratorConfig::default();
        config.fov_degrees = -1.0;
        let err = ImageGenerator::with_config(small_state(), config).unwrap_err();
        assert!(matches!(err, RenderError::InvalidConfig { .. }));
    }

    #[test]
    fn render_frame_on_empty_timeline_is_none() {
        let mut gen = ImageGenerator::new(small_state());
        assert!(gen.render_frame(&Timeline::new(), 0).unwrap().is_none());
        assert_eq!(gen.status(), GeneratorStatus::NoImage);
    }
}
