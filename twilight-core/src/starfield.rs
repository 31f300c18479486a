use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::rng::SplitMix64;
use crate::state::ParameterState;

/// Star budget and the resolution it is defined for.
///
/// Star counts scale with canvas area relative to the reference resolution,
/// so a smaller canvas shows the same sky at the same apparent density.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarFieldConfig {
    /// Small stars at density 1.0 on a reference-sized canvas.
    pub base_small_stars: u32,
    /// Big stars at density 1.0 on a reference-sized canvas.
    pub base_big_stars: u32,
    pub reference_width: u32,
    pub reference_height: u32,
}

impl Default for StarFieldConfig {
    fn default() -> Self {
        Self {
            base_small_stars: 2500,
            base_big_stars: 200,
            reference_width: 1920,
            reference_height: 1080,
        }
    }
}

impl StarFieldConfig {
    /// Canvas area relative to the reference area.
    pub fn area_scale(&self, width: u32, height: u32) -> f64 {
        let reference = f64::from(self.reference_width) * f64::from(self.reference_height);
        f64::from(width) * f64::from(height) / reference.max(1.0)
    }

    /// `floor(base * area_scale * density)`.
    pub fn star_count(&self, base: u32, width: u32, height: u32, density: f64) -> usize {
        let count = f64::from(base) * self.area_scale(width, height) * density;
        if count.is_finite() && count > 0.0 {
            count.floor() as usize
        } else {
            0
        }
    }
}

/// Inputs that fully determine a [`StarField`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StarFieldKey {
    pub seed: u32,
    pub width: u32,
    pub height: u32,
    pub star_density: f64,
}

impl From<&ParameterState> for StarFieldKey {
    fn from(state: &ParameterState) -> Self {
        Self {
            seed: state.seed(),
            width: state.width(),
            height: state.height(),
            star_density: state.star_density(),
        }
    }
}

/// A single-pixel star at normalized coordinates in `[0, 1)²`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmallStar {
    pub x: f64,
    pub y: f64,
}

/// A diamond-shaped star. `size` is the half-diagonal in pixels divided by
/// the canvas width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BigStar {
    pub x: f64,
    pub y: f64,
    pub size: f64,
}

/// Deterministic star catalog for one `(seed, width, height, density)`.
///
/// Stars are drawn from a master stream sized for the maximum density: all
/// small-star `(x, y)` pairs first, then all big-star `(x, y, size)` triples.
/// The field keeps a density-proportional prefix of each list, so raising
/// or lowering density only adds or removes stars at the tail.
#[derive(Debug, Clone, PartialEq)]
pub struct StarField {
    key: StarFieldKey,
    small: Vec<SmallStar>,
    big: Vec<BigStar>,
}

impl StarField {
    /// Build with the default [`StarFieldConfig`].
    pub fn build(seed: u32, width: u32, height: u32, star_density: f64) -> Self {
        Self::build_with(
            &StarFieldConfig::default(),
            StarFieldKey {
                seed,
                width,
                height,
                star_density,
            },
        )
    }

    pub fn for_state(state: &ParameterState, config: &StarFieldConfig) -> Self {
        Self::build_with(config, StarFieldKey::from(state))
    }

    pub fn build_with(config: &StarFieldConfig, key: StarFieldKey) -> Self {
        let StarFieldKey {
            seed,
            width,
            height,
            star_density,
        } = key;
        let max_density = ParameterState::MAX_STAR_DENSITY;

        let master_small = config.star_count(config.base_small_stars, width, height, max_density);
        let master_big = config.star_count(config.base_big_stars, width, height, max_density);
        let small_count = config
            .star_count(config.base_small_stars, width, height, star_density)
            .min(master_small);
        let big_count = config
            .star_count(config.base_big_stars, width, height, star_density)
            .min(master_big);

        let mut rng = SplitMix64::new(u64::from(seed));

        let mut small: Vec<SmallStar> = (0..master_small)
            .map(|_| {
                let x = rng.next_f64();
                let y = rng.next_f64();
                SmallStar { x, y }
            })
            .collect();
        small.truncate(small_count);

        let (size_min, size_max) = Self::big_star_size_range(width);
        let norm = f64::from(width.max(1));
        let mut big: Vec<BigStar> = (0..master_big)
            .map(|_| {
                let x = rng.next_f64();
                let y = rng.next_f64();
                let size = f64::from(rng.range_inclusive(size_min, size_max)) / norm;
                BigStar { x, y, size }
            })
            .collect();
        big.truncate(big_count);

        debug!(
            seed,
            width,
            height,
            star_density,
            small = small.len(),
            big = big.len(),
            "Built star field"
        );

        Self { key, small, big }
    }

    /// Pixel size range for big stars, widening with canvas width.
    pub fn big_star_size_range(width: u32) -> (u32, u32) {
        ((width / 960).max(1), (width / 480).max(2))
    }

    pub fn key(&self) -> StarFieldKey {
        self.key
    }

    pub fn small_stars(&self) -> &[SmallStar] {
        &self.small
    }

    pub fn big_stars(&self) -> &[BigStar] {
        &self.big
    }

    /// Total number of stars of both kinds.
    pub fn len(&self) -> usize {
        self.small.len() + self.big.len()
    }

    pub fn is_empty(&self) -> bool {
        self.small.is_empty() && self.big.is_empty()
    }
}
