//! config - The particle background configuration value
//!
//! A [`ParticleConfig`] is replaced wholesale on every change. Partial edits
//! are expressed as a [`ConfigPatch`] and folded into a fresh snapshot with
//! [`ParticleConfig::merged`].

use crate::color::HexColor;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Silhouette drawn for every particle.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "lowercase"))]
pub enum Shape {
    #[default]
    Circle,
    Square,
    Triangle,
}

/// Motion model driving particle trajectories.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "lowercase"))]
pub enum Motion {
    /// Sinusoidal wobble around a slowly drifting anchor.
    #[default]
    Float,
    /// Straight drift, reflected with energy loss at the edges.
    Bounce,
    /// Pulsing orbit around the surface center.
    Spiral,
}

/// How the surface is painted before particles are drawn.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "lowercase"))]
pub enum Backdrop {
    #[default]
    Transparent,
    Gradient,
    Solid,
}

#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase", default)
)]
pub struct ParticleConfig {
    pub enabled: bool,
    pub count: u32,
    pub color: HexColor,
    pub size: f32,
    pub speed: f32,
    pub opacity: f32,
    pub connections: bool,
    pub connection_distance: f32,
    pub connection_opacity: f32,
    pub mouse_interaction: bool,
    pub mouse_distance: f32,
    /// Carried and persisted; nothing consumes it yet.
    pub click_effect: bool,
    pub shape: Shape,
    #[cfg_attr(feature = "serde", serde(rename = "animation"))]
    pub motion: Motion,
    #[cfg_attr(feature = "serde", serde(rename = "background"))]
    pub backdrop: Backdrop,
    pub background_color: HexColor,
}

/// The configuration a fresh installation starts with.
pub const DEFAULT_CONFIG: ParticleConfig = ParticleConfig {
    enabled: true,
    count: 25,
    color: HexColor::new(0x3b, 0x82, 0xf6),
    size: 1.5,
    speed: 0.01,
    opacity: 0.2,
    connections: true,
    connection_distance: 50.0,
    connection_opacity: 0.03,
    mouse_interaction: true,
    mouse_distance: 70.0,
    click_effect: false,
    shape: Shape::Circle,
    motion: Motion::Float,
    backdrop: Backdrop::Transparent,
    background_color: HexColor::BLACK,
};

impl Default for ParticleConfig {
    fn default() -> Self {
        DEFAULT_CONFIG
    }
}

impl ParticleConfig {
    /// Shallow field overwrite: every `Some` in `patch` replaces the matching
    /// field, everything else is carried over.
    pub fn merged(&self, patch: &ConfigPatch) -> Self {
        Self {
            enabled: patch.enabled.unwrap_or(self.enabled),
            count: patch.count.unwrap_or(self.count),
            color: patch.color.unwrap_or(self.color),
            size: patch.size.unwrap_or(self.size),
            speed: patch.speed.unwrap_or(self.speed),
            opacity: patch.opacity.unwrap_or(self.opacity),
            connections: patch.connections.unwrap_or(self.connections),
            connection_distance: patch.connection_distance.unwrap_or(self.connection_distance),
            connection_opacity: patch.connection_opacity.unwrap_or(self.connection_opacity),
            mouse_interaction: patch.mouse_interaction.unwrap_or(self.mouse_interaction),
            mouse_distance: patch.mouse_distance.unwrap_or(self.mouse_distance),
            click_effect: patch.click_effect.unwrap_or(self.click_effect),
            shape: patch.shape.unwrap_or(self.shape),
            motion: patch.motion.unwrap_or(self.motion),
            backdrop: patch.backdrop.unwrap_or(self.backdrop),
            background_color: patch.background_color.unwrap_or(self.background_color),
        }
    }

    /// True when switching from `self` to `next` invalidates the current
    /// particle population.
    // CHANGE: Rebuild only on fields baked into particles at creation
    // REASON: Color, opacity, distances and shape are read at frame time
    pub fn needs_rebuild(&self, next: &ParticleConfig) -> bool {
        self.enabled != next.enabled
            || self.count != next.count
            || self.size != next.size
            || self.speed != next.speed
            || self.motion != next.motion
    }
}

/// A partial [`ParticleConfig`]; `None` fields are left untouched.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase", default)
)]
pub struct ConfigPatch {
    pub enabled: Option<bool>,
    pub count: Option<u32>,
    pub color: Option<HexColor>,
    pub size: Option<f32>,
    pub speed: Option<f32>,
    pub opacity: Option<f32>,
    pub connections: Option<bool>,
    pub connection_distance: Option<f32>,
    pub connection_opacity: Option<f32>,
    pub mouse_interaction: Option<bool>,
    pub mouse_distance: Option<f32>,
    pub click_effect: Option<bool>,
    pub shape: Option<Shape>,
    #[cfg_attr(feature = "serde", serde(rename = "animation"))]
    pub motion: Option<Motion>,
    #[cfg_attr(feature = "serde", serde(rename = "background"))]
    pub backdrop: Option<Backdrop>,
    pub background_color: Option<HexColor>,
}
