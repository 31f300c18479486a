use tracing::debug;

use twilight_core::{StarField, StarFieldConfig, StarFieldKey};

/// Whether [`StarCache::resolve`] reused the cached field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOutcome {
    Hit,
    Rebuilt,
}

/// Holds the star field of the last render.
///
/// A field only depends on `(seed, width, height, star_density)`, so
/// animating time or the view direction never regenerates stars.
#[derive(Debug, Default)]
pub struct StarCache {
    field: Option<StarField>,
    rebuilds: u64,
}

impl StarCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` if resolving `key` would regenerate the field.
    pub fn needs_rebuild(&self, key: &StarFieldKey) -> bool {
        self.field.as_ref().map_or(true, |f| f.key() != *key)
    }

    /// Return the field for `key`, rebuilding it if the key changed.
    pub fn resolve(
        &mut self,
        key: StarFieldKey,
        config: &StarFieldConfig,
    ) -> (&StarField, CacheOutcome) {
        if self.needs_rebuild(&key) {
            debug!(
                seed = key.seed,
                width = key.width,
                height = key.height,
                star_density = key.star_density,
                "Star field cache miss"
            );
            self.field = None;
        }
        let mut outcome = CacheOutcome::Hit;
        let field = self.field.get_or_insert_with(|| {
            self.rebuilds += 1;
            outcome = CacheOutcome::Rebuilt;
            StarField::build_with(config, key)
        });
        (&*field, outcome)
    }

    pub fn current(&self) -> Option<&StarField> {
        self.field.as_ref()
    }

    /// Number of fields built since creation.
    pub fn rebuild_count(&self) -> u64 {
        self.rebuilds
    }

    pub fn clear(&mut self) {
        self.field = None;
    }
}
