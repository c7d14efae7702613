//! particle_field - Animated particle background for the portal
//!
//! The simulation core (configuration, presets, physics, drawing, frame
//! driver) is `no_std` compatible and allocation free; JSON persistence needs
//! the `persist` feature.

#![cfg_attr(not(any(feature = "std", test)), no_std)]

pub mod background;
pub mod color;
pub mod config;
pub mod driver;
#[cfg(feature = "persist")]
pub mod persist;
pub mod presets;
pub mod render;
pub mod simulation;
pub mod store;
pub mod theme;

pub use background::ParticleBackground;
pub use color::{HexColor, Rgba};
pub use config::{Backdrop, ConfigPatch, Motion, ParticleConfig, Shape, DEFAULT_CONFIG};
pub use driver::{AnimationDriver, DriverState, FrameScheduler};
#[cfg(feature = "persist")]
pub use persist::{FileStore, JsonPersistence, KeyValueStore, MemoryStore, StorageError, STORAGE_KEY};
pub use presets::Preset;
pub use render::{Canvas, RenderSurface};
pub use simulation::{Dimensions, Particle, ParticleField, PointerState, MAX_PARTICLES};
pub use store::{ConfigStore, Persistence};
pub use theme::Theme;
