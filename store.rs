//! store - The live configuration store
//!
//! Owns the active [`ParticleConfig`] snapshot. Every mutation produces a new
//! snapshot and hands it to the [`Persistence`] backend.

use crate::config::{ConfigPatch, ParticleConfig, DEFAULT_CONFIG};
use crate::presets::Preset;

/// Where snapshots survive between sessions.
pub trait Persistence {
    /// The stored snapshot, already merged over the defaults, or `None` when
    /// nothing usable is stored.
    fn load(&mut self) -> Option<ParticleConfig>;

    fn save(&mut self, config: &ParticleConfig);
}

/// No persistence: every session starts from the defaults.
impl Persistence for () {
    fn load(&mut self) -> Option<ParticleConfig> {
        None
    }

    fn save(&mut self, _config: &ParticleConfig) {}
}

pub struct ConfigStore<P: Persistence> {
    config: ParticleConfig,
    persistence: P,
}

impl<P: Persistence> ConfigStore<P> {
    /// Reads the persisted snapshot once, falling back to the defaults.
    pub fn load(mut persistence: P) -> Self {
        let config = persistence.load().unwrap_or(DEFAULT_CONFIG);
        Self { config, persistence }
    }

    pub fn config(&self) -> ParticleConfig {
        self.config
    }

    pub fn update(&mut self, patch: &ConfigPatch) {
        let next = self.config.merged(patch);
        self.replace(next);
    }

    pub fn reset(&mut self) {
        self.replace(DEFAULT_CONFIG);
    }

    pub fn apply(&mut self, preset: Preset) {
        log::debug!("applying preset {}", preset.name());
        self.replace(preset.config());
    }

    /// Applies the preset called `name`; unknown names leave the store as is.
    pub fn apply_preset(&mut self, name: &str) {
        if let Some(preset) = Preset::from_name(name) {
            self.apply(preset);
        }
    }

    pub fn presets(&self) -> &'static [Preset] {
        &Preset::ALL
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    pub fn into_persistence(self) -> P {
        self.persistence
    }

    fn replace(&mut self, next: ParticleConfig) {
        self.config = next;
        self.persistence.save(&self.config);
    }
}
