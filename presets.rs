//! presets - Named, complete configurations

use crate::color::HexColor;
use crate::config::{Backdrop, Motion, ParticleConfig, Shape, DEFAULT_CONFIG};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Preset {
    Default,
    Caracol,
    Zen,
    Meditation,
    Calm,
    Peaceful,
    Minimal,
    Network,
    Galaxy,
    Matrix,
    Ocean,
}

impl Preset {
    pub const ALL: [Preset; 11] = [
        Preset::Default,
        Preset::Caracol,
        Preset::Zen,
        Preset::Meditation,
        Preset::Calm,
        Preset::Peaceful,
        Preset::Minimal,
        Preset::Network,
        Preset::Galaxy,
        Preset::Matrix,
        Preset::Ocean,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Preset::Default => "default",
            Preset::Caracol => "caracol",
            Preset::Zen => "zen",
            Preset::Meditation => "meditation",
            Preset::Calm => "calm",
            Preset::Peaceful => "peaceful",
            Preset::Minimal => "minimal",
            Preset::Network => "network",
            Preset::Galaxy => "galaxy",
            Preset::Matrix => "matrix",
            Preset::Ocean => "ocean",
        }
    }

    pub fn from_name(name: &str) -> Option<Preset> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }

    pub fn description(self) -> &'static str {
        match self {
            Preset::Default => "Balanced setup for everyday use",
            Preset::Caracol => "Snail pace, a handful of unconnected particles",
            Preset::Zen => "Green, slow, faint connections",
            Preset::Meditation => "Violet spiral over a deep gradient",
            Preset::Calm => "Cyan float with short connections",
            Preset::Peaceful => "A few amber particles, nothing else",
            Preset::Minimal => "Few particles, no connections",
            Preset::Network => "Dense connected mesh",
            Preset::Galaxy => "Cosmic spiral with gradient background",
            Preset::Matrix => "Green squares bouncing around",
            Preset::Ocean => "Soft as ocean waves",
        }
    }

    /// The next entry in [`Preset::ALL`], wrapping around.
    pub fn next(self) -> Preset {
        let idx = Self::ALL.iter().position(|p| *p == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub const fn config(self) -> ParticleConfig {
        match self {
            Preset::Default => DEFAULT_CONFIG,
            Preset::Caracol => ParticleConfig {
                count: 15,
                speed: 0.005,
                opacity: 0.15,
                connections: false,
                mouse_interaction: false,
                ..DEFAULT_CONFIG
            },
            Preset::Zen => ParticleConfig {
                count: 20,
                color: HexColor::new(0x10, 0xb9, 0x81),
                speed: 0.008,
                opacity: 0.18,
                connections: true,
                connection_distance: 40.0,
                connection_opacity: 0.02,
                ..DEFAULT_CONFIG
            },
            Preset::Meditation => ParticleConfig {
                count: 18,
                color: HexColor::new(0x8b, 0x5c, 0xf6),
                shape: Shape::Circle,
                motion: Motion::Spiral,
                speed: 0.003,
                opacity: 0.12,
                backdrop: Backdrop::Gradient,
                background_color: HexColor::new(0x1e, 0x1b, 0x4b),
                connections: false,
                ..DEFAULT_CONFIG
            },
            Preset::Calm => ParticleConfig {
                count: 22,
                color: HexColor::new(0x06, 0xb6, 0xd4),
                motion: Motion::Float,
                speed: 0.006,
                opacity: 0.16,
                connections: true,
                connection_distance: 35.0,
                connection_opacity: 0.025,
                ..DEFAULT_CONFIG
            },
            Preset::Peaceful => ParticleConfig {
                count: 12,
                color: HexColor::new(0xf5, 0x9e, 0x0b),
                speed: 0.002,
                opacity: 0.1,
                connections: false,
                mouse_interaction: false,
                ..DEFAULT_CONFIG
            },
            Preset::Minimal => ParticleConfig {
                count: 10,
                size: 1.0,
                opacity: 0.15,
                connections: false,
                ..DEFAULT_CONFIG
            },
            Preset::Network => ParticleConfig {
                count: 80,
                speed: 0.02,
                opacity: 0.3,
                connection_distance: 120.0,
                connection_opacity: 0.08,
                mouse_distance: 100.0,
                ..DEFAULT_CONFIG
            },
            Preset::Galaxy => ParticleConfig {
                count: 60,
                color: HexColor::new(0xe0, 0xe7, 0xff),
                size: 1.0,
                motion: Motion::Spiral,
                speed: 0.01,
                opacity: 0.35,
                connections: false,
                backdrop: Backdrop::Gradient,
                background_color: HexColor::new(0x0f, 0x17, 0x2a),
                ..DEFAULT_CONFIG
            },
            Preset::Matrix => ParticleConfig {
                count: 50,
                color: HexColor::new(0x22, 0xc5, 0x5e),
                shape: Shape::Square,
                motion: Motion::Bounce,
                speed: 0.03,
                opacity: 0.4,
                connection_distance: 60.0,
                connection_opacity: 0.05,
                backdrop: Backdrop::Solid,
                background_color: HexColor::BLACK,
                ..DEFAULT_CONFIG
            },
            Preset::Ocean => ParticleConfig {
                count: 35,
                color: HexColor::new(0x0e, 0xa5, 0xe9),
                size: 2.0,
                speed: 0.008,
                opacity: 0.25,
                connection_distance: 70.0,
                connection_opacity: 0.04,
                backdrop: Backdrop::Solid,
                background_color: HexColor::new(0x08, 0x2f, 0x49),
                ..DEFAULT_CONFIG
            },
        }
    }
}
