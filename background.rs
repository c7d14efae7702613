//! background - The animated particle background
//!
//! Glues the configuration store, the particle field and the animation
//! driver to a render surface. Every handler runs on the UI thread and never
//! overlaps a frame callback.

use crate::config::{ConfigPatch, ParticleConfig};
use crate::driver::{AnimationDriver, DriverState, FrameScheduler};
use crate::render::{self, RenderSurface};
use crate::simulation::{Dimensions, ParticleField, PointerState, MAX_PARTICLES};
use crate::store::{ConfigStore, Persistence};
use crate::theme::Theme;

pub struct ParticleBackground<P: Persistence, S: FrameScheduler, const N: usize = MAX_PARTICLES> {
    store: ConfigStore<P>,
    field: ParticleField<N>,
    driver: AnimationDriver<S>,
    pointer: PointerState,
    theme: Theme,
    /// Snapshot the current population was built from.
    applied: ParticleConfig,
    dims: Dimensions,
    visible: bool,
    mounted: bool,
}

impl<P: Persistence, S: FrameScheduler, const N: usize> ParticleBackground<P, S, N> {
    pub fn new(store: ConfigStore<P>, scheduler: S, seed: u32) -> Self {
        let applied = store.config();
        Self {
            store,
            field: ParticleField::new(seed),
            driver: AnimationDriver::new(scheduler),
            pointer: PointerState::default(),
            theme: Theme::default(),
            applied,
            dims: Dimensions::default(),
            visible: false,
            mounted: false,
        }
    }

    /// Attaches to a surface of size `dims` and starts animating if enabled.
    pub fn mount(&mut self, dims: Dimensions, visible: bool) {
        self.mounted = true;
        self.dims = dims;
        self.visible = visible;
        self.applied = self.store.config();
        self.field.init(dims, &self.applied);
        self.sync_driver();
    }

    /// Detaches from the surface; any pending frame is cancelled.
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.driver.teardown();
    }

    pub fn config(&self) -> ParticleConfig {
        self.store.config()
    }

    pub fn update_config(&mut self, patch: &ConfigPatch) {
        self.store.update(patch);
        self.config_changed();
    }

    pub fn reset_config(&mut self) {
        self.store.reset();
        self.config_changed();
    }

    pub fn apply_preset(&mut self, name: &str) {
        self.store.apply_preset(name);
        self.config_changed();
    }

    pub fn resize(&mut self, dims: Dimensions) {
        if dims == self.dims {
            return;
        }
        // The in-flight frame was sized for the old population
        self.driver.cancel_pending();
        self.dims = dims;
        if self.mounted {
            self.field.init(dims, &self.applied);
        }
        self.driver.resume();
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        self.sync_driver();
    }

    pub fn pointer_moved(&mut self, x: f32, y: f32, now_ms: u64) {
        self.pointer.moved(x, y, now_ms);
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn field(&self) -> &ParticleField<N> {
        &self.field
    }

    pub fn driver(&self) -> &AnimationDriver<S> {
        &self.driver
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        self.driver.scheduler_mut()
    }

    pub fn is_running(&self) -> bool {
        self.driver.state() == DriverState::Running
    }

    /// Frame callback for `handle`: one update and one draw onto `surface`.
    /// Returns whether a frame was actually rendered.
    pub fn on_frame<R: RenderSurface>(&mut self, handle: S::Handle, surface: &mut R, now_ms: u64) -> bool {
        let field = &mut self.field;
        let config = &self.applied;
        let pointer = &self.pointer;
        let theme = self.theme;
        let mut drawn = false;
        self.driver.on_frame(handle, || {
            let Some(canvas) = surface.canvas() else {
                return;
            };
            field.update(config, pointer, now_ms);
            render::draw(canvas, field.particles(), config, theme);
            drawn = true;
        });
        drawn
    }

    fn config_changed(&mut self) {
        let next = self.store.config();
        if next == self.applied {
            return;
        }
        if self.applied.needs_rebuild(&next) {
            // A frame already requested was built for the old population
            self.driver.cancel_pending();
            if self.mounted {
                self.field.init(self.dims, &next);
            }
        }
        self.applied = next;
        self.sync_driver();
        self.driver.resume();
    }

    fn sync_driver(&mut self) {
        let enabled = self.mounted && self.applied.enabled;
        self.driver.sync(enabled, self.visible);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Motion, Shape, DEFAULT_CONFIG};
    use crate::driver::testing::CountingScheduler;
    use crate::render::testing::Recorder;

    struct TestSurface {
        dims: Dimensions,
        canvas: Option<Recorder>,
    }

    impl TestSurface {
        fn ready() -> Self {
            Self { dims: Dimensions::new(320.0, 170.0), canvas: Some(Recorder::default()) }
        }
    }

    impl RenderSurface for TestSurface {
        type Canvas = Recorder;

        fn dimensions(&self) -> Dimensions {
            self.dims
        }

        fn is_visible(&self) -> bool {
            true
        }

        fn canvas(&mut self) -> Option<&mut Recorder> {
            self.canvas.as_mut()
        }
    }

    type Background = ParticleBackground<(), CountingScheduler>;

    fn mounted(surface: &TestSurface) -> Background {
        let mut bg = Background::new(ConfigStore::load(()), CountingScheduler::default(), 3);
        bg.mount(surface.dimensions(), surface.is_visible());
        bg
    }

    fn fire(bg: &mut Background, surface: &mut TestSurface, now_ms: u64) -> bool {
        match bg.scheduler_mut().fire() {
            Some(handle) => bg.on_frame(handle, surface, now_ms),
            None => false,
        }
    }

    #[test]
    fn mount_builds_the_population_and_starts() {
        let surface = TestSurface::ready();
        let bg = mounted(&surface);
        assert!(bg.is_running());
        assert_eq!(bg.field().particles().len(), DEFAULT_CONFIG.count as usize);
    }

    #[test]
    fn frames_draw_backdrop_connections_and_particles() {
        let mut surface = TestSurface::ready();
        let mut bg = mounted(&surface);
        assert!(fire(&mut bg, &mut surface, 16));
        let canvas = surface.canvas.as_ref().unwrap();
        assert_eq!(canvas.shapes(), DEFAULT_CONFIG.count as usize);
        assert_eq!(bg.scheduler_mut().live.len(), 1);
    }

    #[test]
    fn missing_canvas_is_a_no_op() {
        let mut surface = TestSurface { canvas: None, ..TestSurface::ready() };
        let mut bg = mounted(&surface);
        let before = bg.field().particles().to_vec();
        assert!(!fire(&mut bg, &mut surface, 16));
        assert_eq!(bg.field().particles(), &before[..]);
        // the loop keeps going until the canvas shows up
        assert!(bg.is_running());
        surface.canvas = Some(Recorder::default());
        assert!(fire(&mut bg, &mut surface, 32));
    }

    #[test]
    fn disabling_stops_and_empties_the_field() {
        let mut surface = TestSurface::ready();
        let mut bg = mounted(&surface);
        bg.update_config(&ConfigPatch { enabled: Some(false), ..Default::default() });
        assert!(!bg.is_running());
        assert!(bg.field().particles().is_empty());
        assert!(!fire(&mut bg, &mut surface, 16));

        bg.update_config(&ConfigPatch { enabled: Some(true), ..Default::default() });
        assert!(bg.is_running());
        assert_eq!(bg.field().particles().len(), DEFAULT_CONFIG.count as usize);
    }

    #[test]
    fn count_change_rebuilds_color_change_does_not() {
        let surface = TestSurface::ready();
        let mut bg = mounted(&surface);
        let before = bg.field().particles().to_vec();

        bg.update_config(&ConfigPatch { opacity: Some(0.5), ..Default::default() });
        assert_eq!(bg.field().particles(), &before[..]);

        bg.update_config(&ConfigPatch { count: Some(75), ..Default::default() });
        assert_eq!(bg.field().particles().len(), 75);
        assert_eq!(bg.scheduler_mut().live.len(), 1);
    }

    #[test]
    fn size_and_speed_changes_reach_the_particles() {
        let surface = TestSurface::ready();
        let mut bg = mounted(&surface);
        bg.update_config(&ConfigPatch { size: Some(20.0), speed: Some(50.0), ..Default::default() });

        let particles = bg.field().particles();
        assert_eq!(particles.len(), DEFAULT_CONFIG.count as usize);
        let max_size = particles.iter().map(|p| p.size).fold(0.0f32, f32::max);
        let max_vx = particles.iter().map(|p| p.vx.abs()).fold(0.0f32, f32::max);
        assert!(max_size > 2.0, "sizes still built from the old config: {}", max_size);
        assert!(max_vx > 0.1, "velocities still built from the old config: {}", max_vx);
        for p in particles {
            assert!(p.size <= 20.0 * 0.8 + 0.5);
        }
    }

    #[test]
    fn shape_change_keeps_the_population() {
        let mut surface = TestSurface::ready();
        let mut bg = mounted(&surface);
        let before = bg.field().particles().to_vec();
        bg.update_config(&ConfigPatch { shape: Some(Shape::Square), ..Default::default() });
        assert_eq!(bg.field().particles(), &before[..]);
        assert!(fire(&mut bg, &mut surface, 16));
    }

    #[test]
    fn preset_switch_rebuilds_for_new_motion() {
        let surface = TestSurface::ready();
        let mut bg = mounted(&surface);
        bg.apply_preset("meditation");
        assert_eq!(bg.config().motion, Motion::Spiral);
        assert_eq!(bg.field().particles().len(), 18);

        bg.apply_preset("nope");
        assert_eq!(bg.config().motion, Motion::Spiral);
    }

    #[test]
    fn resize_cancels_the_pending_frame_and_rebuilds() {
        let mut surface = TestSurface::ready();
        let mut bg = mounted(&surface);
        let stale = bg.driver().pending().unwrap();

        surface.dims = Dimensions::new(100.0, 50.0);
        bg.resize(surface.dims);

        assert!(bg.scheduler_mut().cancelled.contains(&stale));
        assert!(!bg.on_frame(stale, &mut surface, 16));
        for p in bg.field().particles() {
            assert!(p.x <= 100.0 && p.y <= 50.0);
        }
        assert!(fire(&mut bg, &mut surface, 32));
    }

    #[test]
    fn hidden_surface_pauses_without_rebuilding() {
        let mut surface = TestSurface::ready();
        let mut bg = mounted(&surface);
        bg.set_visible(false);
        assert!(!bg.is_running());
        assert!(!fire(&mut bg, &mut surface, 16));

        let before = bg.field().particles().to_vec();
        bg.set_visible(true);
        assert!(bg.is_running());
        assert_eq!(bg.field().particles(), &before[..]);
        assert!(fire(&mut bg, &mut surface, 32));
    }

    #[test]
    fn unmount_cancels_everything() {
        let surface = TestSurface::ready();
        let mut bg = mounted(&surface);
        bg.unmount();
        assert!(!bg.is_running());
        assert!(bg.scheduler_mut().live.is_empty());

        bg.update_config(&ConfigPatch { count: Some(5), ..Default::default() });
        assert!(!bg.is_running());
    }

    #[test]
    fn reset_goes_back_to_defaults() {
        let surface = TestSurface::ready();
        let mut bg = mounted(&surface);
        bg.apply_preset("network");
        bg.reset_config();
        assert_eq!(bg.config(), DEFAULT_CONFIG);
        assert_eq!(bg.field().particles().len(), DEFAULT_CONFIG.count as usize);
    }
}
