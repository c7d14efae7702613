//! simulation - Particle population and per-frame physics
//!
//! The population lives in a fixed-capacity pool sized at compile time; a
//! rebuild replaces it wholesale, frames only mutate particle fields.

use heapless::Vec;

use crate::config::{Motion, ParticleConfig};

/// Default pool capacity. The pairwise connection pass is O(n²), so the
/// population is capped here regardless of the configured count.
pub const MAX_PARTICLES: usize = 200;

/// Fixed constants of the motion models.
pub mod tuning {
    /// Share of the configured speed used for drift velocity.
    pub const SPEED_SCALE: f32 = 0.1;
    pub const SIZE_SCALE: f32 = 0.8;
    pub const SIZE_OFFSET: f32 = 0.5;
    /// Velocity multiplier applied to every position/anchor advance.
    pub const DRIFT_DAMPING: f32 = 0.5;
    /// Global time advanced per frame.
    pub const TIME_STEP: f32 = 0.01;

    pub const FLOAT_ANGLE_STEP: f32 = 0.002;
    pub const FLOAT_AMPLITUDE: f32 = 2.0;
    pub const PHASE_SPREAD: f32 = 0.5;
    /// How far an anchor may leave the surface before wrapping around.
    pub const WRAP_MARGIN: f32 = 20.0;

    /// Velocity kept after hitting an edge.
    pub const RESTITUTION: f32 = 0.9;

    pub const SPIRAL_ANGLE_STEP: f32 = 0.001;
    pub const SPIRAL_PULSE: f32 = 0.05;
    pub const SPIRAL_PULSE_RATE: f32 = 0.5;

    pub const OPACITY_STEP: f32 = 0.001;
    pub const OPACITY_FLOOR: f32 = 0.02;
    /// Fraction of the configured opacity the breathing peaks at.
    pub const OPACITY_CEILING: f32 = 0.8;

    pub const MOUSE_FORCE: f32 = 0.5;
    /// Fraction of the pointer push that also moves the anchor.
    pub const MOUSE_BASE_SHARE: f32 = 0.3;
    /// Pointer counts as moving for this long after its last event.
    pub const POINTER_IDLE_MS: u64 = 100;

    pub const DEFAULT_SEED: u32 = 0x12345678;
}

use tuning::*;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Dimensions {
    pub width: f32,
    pub height: f32,
}

impl Dimensions {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> (f32, f32) {
        (self.width / 2.0, self.height / 2.0)
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    /// Anchor for the float model; drifts with the velocity.
    pub base_x: f32,
    pub base_y: f32,
    pub vx: f32,
    pub vy: f32,
    pub size: f32,
    pub opacity: f32,
    /// +1.0 while brightening, -1.0 while fading.
    pub opacity_direction: f32,
    pub angle: f32,
}

/// Last known pointer position and when it moved.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PointerState {
    pub x: f32,
    pub y: f32,
    moved_at: Option<u64>,
}

impl PointerState {
    pub fn moved(&mut self, x: f32, y: f32, now_ms: u64) {
        self.x = x;
        self.y = y;
        self.moved_at = Some(now_ms);
    }

    /// Position, if the pointer moved within the last [`POINTER_IDLE_MS`].
    pub fn active_position(&self, now_ms: u64) -> Option<(f32, f32)> {
        match self.moved_at {
            Some(at) if now_ms.saturating_sub(at) < POINTER_IDLE_MS => Some((self.x, self.y)),
            _ => None,
        }
    }
}

/// Xorshift32 in `[0, 1)`.
#[derive(Copy, Clone, Debug)]
pub struct Rng {
    state: u32,
}

impl Rng {
    pub fn new(seed: u32) -> Self {
        Self { state: if seed == 0 { DEFAULT_SEED } else { seed } }
    }

    pub fn next_f32(&mut self) -> f32 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 17;
        self.state ^= self.state << 5;
        (self.state >> 8) as f32 / (1u32 << 24) as f32
    }
}

/// A population of particles bound to one surface size.
pub struct ParticleField<const N: usize = MAX_PARTICLES> {
    particles: Vec<Particle, N>,
    dims: Dimensions,
    time: f32,
    rng: Rng,
}

impl<const N: usize> ParticleField<N> {
    pub fn new(seed: u32) -> Self {
        Self {
            particles: Vec::new(),
            dims: Dimensions::default(),
            time: 0.0,
            rng: Rng::new(seed),
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    /// Replaces the population with `config.count` fresh particles scattered
    /// over `dims`, or with nothing when the config is disabled.
    pub fn init(&mut self, dims: Dimensions, config: &ParticleConfig) {
        self.dims = dims;
        self.particles = Vec::new();
        if !config.enabled {
            return;
        }

        // CHANGE: Count beyond the pool capacity is clamped, not rejected
        // REASON: Stored configs are never validated on write
        let wanted = config.count as usize;
        if wanted > N {
            log::debug!("particle count {} clamped to capacity {}", wanted, N);
        }

        let speed = config.speed * SPEED_SCALE;
        let size = config.size.max(0.0);
        let opacity = config.opacity.max(0.0).min(1.0) * OPACITY_CEILING;
        for _ in 0..wanted.min(N) {
            let x = self.rng.next_f32() * dims.width;
            let y = self.rng.next_f32() * dims.height;
            let particle = Particle {
                x,
                y,
                base_x: x,
                base_y: y,
                vx: (self.rng.next_f32() - 0.5) * speed,
                vy: (self.rng.next_f32() - 0.5) * speed,
                size: self.rng.next_f32() * size * SIZE_SCALE + SIZE_OFFSET,
                opacity: self.rng.next_f32() * opacity,
                opacity_direction: if self.rng.next_f32() < 0.5 { -1.0 } else { 1.0 },
                angle: self.rng.next_f32() * core::f32::consts::TAU,
            };
            // PERF: capacity checked above, push cannot fail
            let _ = self.particles.push(particle);
        }
        log::debug!(
            "rebuilt {} particles for {}x{}",
            self.particles.len(),
            dims.width,
            dims.height
        );
    }

    /// Advances every particle by one frame.
    pub fn update(&mut self, config: &ParticleConfig, pointer: &PointerState, now_ms: u64) {
        self.time += TIME_STEP;
        let pointer = if config.mouse_interaction {
            pointer.active_position(now_ms)
        } else {
            None
        };
        step(&mut self.particles, config, self.dims, pointer, self.time);
    }
}

/// One frame of motion, opacity breathing and pointer repulsion over
/// `particles`. `pointer` is the position of a recently moved pointer.
pub fn step(
    particles: &mut [Particle],
    config: &ParticleConfig,
    dims: Dimensions,
    pointer: Option<(f32, f32)>,
    time: f32,
) {
    let ceiling = config.opacity.max(0.0).min(1.0) * OPACITY_CEILING;
    for (i, p) in particles.iter_mut().enumerate() {
        match config.motion {
            Motion::Float => float_step(p, i, dims),
            Motion::Bounce => bounce_step(p, dims),
            Motion::Spiral => spiral_step(p, i, dims, time),
        }
        breathe(p, ceiling);
        if let Some((mx, my)) = pointer {
            repel(p, mx, my, config.mouse_distance);
            if config.motion == Motion::Bounce {
                p.x = p.x.max(0.0).min(dims.width);
                p.y = p.y.max(0.0).min(dims.height);
            }
        }
    }
}

fn float_step(p: &mut Particle, index: usize, dims: Dimensions) {
    p.angle += FLOAT_ANGLE_STEP;
    p.base_x += p.vx * DRIFT_DAMPING;
    p.base_y += p.vy * DRIFT_DAMPING;

    // Toroidal wrap of the anchor
    if p.base_x > dims.width + WRAP_MARGIN {
        p.base_x = -WRAP_MARGIN;
    } else if p.base_x < -WRAP_MARGIN {
        p.base_x = dims.width + WRAP_MARGIN;
    }
    if p.base_y > dims.height + WRAP_MARGIN {
        p.base_y = -WRAP_MARGIN;
    } else if p.base_y < -WRAP_MARGIN {
        p.base_y = dims.height + WRAP_MARGIN;
    }

    let phase = p.angle + index as f32 * PHASE_SPREAD;
    p.x = p.base_x + libm::sinf(phase) * FLOAT_AMPLITUDE;
    p.y = p.base_y + libm::cosf(phase * 0.7) * FLOAT_AMPLITUDE;
}

fn bounce_step(p: &mut Particle, dims: Dimensions) {
    p.x += p.vx * DRIFT_DAMPING;
    p.y += p.vy * DRIFT_DAMPING;

    if p.x < 0.0 {
        p.vx = libm::fabsf(p.vx) * RESTITUTION;
    } else if p.x > dims.width {
        p.vx = -libm::fabsf(p.vx) * RESTITUTION;
    }
    if p.y < 0.0 {
        p.vy = libm::fabsf(p.vy) * RESTITUTION;
    } else if p.y > dims.height {
        p.vy = -libm::fabsf(p.vy) * RESTITUTION;
    }

    p.x = p.x.max(0.0).min(dims.width);
    p.y = p.y.max(0.0).min(dims.height);
    p.base_x = p.x;
    p.base_y = p.y;
}

fn spiral_step(p: &mut Particle, index: usize, dims: Dimensions, time: f32) {
    let (cx, cy) = dims.center();
    let dx = p.x - cx;
    let dy = p.y - cy;

    p.angle += SPIRAL_ANGLE_STEP;
    let theta = libm::atan2f(dy, dx) + SPIRAL_ANGLE_STEP;
    let pulse = libm::sinf(time * SPIRAL_PULSE_RATE + index as f32)
        * libm::cosf(p.angle)
        * SPIRAL_PULSE;
    let radius = (libm::sqrtf(dx * dx + dy * dy) + pulse).max(0.0);

    p.x = cx + libm::cosf(theta) * radius;
    p.y = cy + libm::sinf(theta) * radius;
    p.base_x = p.x;
    p.base_y = p.y;
}

/// Triangle-wave opacity between the floor and `ceiling`.
fn breathe(p: &mut Particle, ceiling: f32) {
    let floor = OPACITY_FLOOR.min(ceiling);
    p.opacity += p.opacity_direction * OPACITY_STEP;
    if p.opacity <= floor {
        p.opacity_direction = 1.0;
    } else if p.opacity >= ceiling {
        p.opacity_direction = -1.0;
    }
    p.opacity = p.opacity.max(0.0).min(ceiling);
}

fn repel(p: &mut Particle, mx: f32, my: f32, reach: f32) {
    if !(reach > 0.0) {
        return;
    }
    let dx = p.x - mx;
    let dy = p.y - my;
    let distance = libm::sqrtf(dx * dx + dy * dy);
    if distance >= reach || distance <= 0.0 {
        return;
    }

    let push = (reach - distance) / reach * MOUSE_FORCE;
    let (ux, uy) = (dx / distance, dy / distance);
    p.x += ux * push;
    p.y += uy * push;
    p.base_x += ux * push * MOUSE_BASE_SHARE;
    p.base_y += uy * push * MOUSE_BASE_SHARE;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_CONFIG;

    const DIMS: Dimensions = Dimensions::new(320.0, 170.0);

    fn field_with(config: &ParticleConfig) -> ParticleField {
        let mut field = ParticleField::new(7);
        field.init(DIMS, config);
        field
    }

    fn lone(x: f32, y: f32) -> Particle {
        Particle { x, y, base_x: x, base_y: y, size: 1.0, opacity: 0.1, opacity_direction: 1.0, ..Default::default() }
    }

    #[test]
    fn population_matches_count() {
        for count in [0, 1, 25, 200] {
            let field = field_with(&ParticleConfig { count, ..DEFAULT_CONFIG });
            assert_eq!(field.particles().len(), count as usize);
        }
    }

    #[test]
    fn population_is_capped_at_capacity() {
        let field = field_with(&ParticleConfig { count: 500, ..DEFAULT_CONFIG });
        assert_eq!(field.particles().len(), MAX_PARTICLES);

        let mut small: ParticleField<8> = ParticleField::new(1);
        small.init(DIMS, &ParticleConfig { count: 25, ..DEFAULT_CONFIG });
        assert_eq!(small.particles().len(), 8);
    }

    #[test]
    fn disabled_config_yields_no_particles() {
        for count in [0, 25, 200] {
            let field = field_with(&ParticleConfig { enabled: false, count, ..DEFAULT_CONFIG });
            assert!(field.particles().is_empty());
        }
    }

    #[test]
    fn fresh_particles_start_inside_the_surface() {
        let config = ParticleConfig { count: 200, speed: 1.0, ..DEFAULT_CONFIG };
        let field = field_with(&config);
        for p in field.particles() {
            assert!((0.0..=DIMS.width).contains(&p.x));
            assert!((0.0..=DIMS.height).contains(&p.y));
            assert_eq!((p.base_x, p.base_y), (p.x, p.y));
            assert!(p.vx.abs() <= 0.05 && p.vy.abs() <= 0.05);
            assert!(p.opacity <= config.opacity);
            assert!(p.opacity_direction == 1.0 || p.opacity_direction == -1.0);
            assert!((0.0..core::f32::consts::TAU).contains(&p.angle));
        }
    }

    #[test]
    fn same_seed_same_population() {
        let a = field_with(&DEFAULT_CONFIG);
        let b = field_with(&DEFAULT_CONFIG);
        assert_eq!(a.particles(), b.particles());
    }

    #[test]
    fn bounce_reflects_at_the_right_edge() {
        let config = ParticleConfig { motion: Motion::Bounce, ..DEFAULT_CONFIG };
        let mut particles = [Particle { vx: 2.0, ..lone(DIMS.width, 50.0) }];
        step(&mut particles, &config, DIMS, None, 0.0);
        assert!(particles[0].vx <= 0.0);
        assert!(particles[0].x <= DIMS.width);
        assert!((particles[0].vx + 2.0 * RESTITUTION).abs() < 1e-6);
    }

    #[test]
    fn bounce_reflects_at_the_top_edge() {
        let config = ParticleConfig { motion: Motion::Bounce, ..DEFAULT_CONFIG };
        let mut particles = [Particle { vy: -1.0, ..lone(10.0, 0.0) }];
        step(&mut particles, &config, DIMS, None, 0.0);
        assert!(particles[0].vy > 0.0);
        assert_eq!(particles[0].y, 0.0);
    }

    #[test]
    fn float_anchor_wraps_to_the_opposite_side() {
        let config = ParticleConfig { motion: Motion::Float, ..DEFAULT_CONFIG };
        let mut particles = [Particle { vx: 0.1, ..lone(DIMS.width + WRAP_MARGIN + 1.0, 50.0) }];
        step(&mut particles, &config, DIMS, None, 0.0);
        assert!(particles[0].base_x <= 0.0);

        let mut particles = [Particle { vy: -0.1, ..lone(30.0, -WRAP_MARGIN - 1.0) }];
        step(&mut particles, &config, DIMS, None, 0.0);
        assert!(particles[0].base_y >= DIMS.height);
    }

    #[test]
    fn float_wobbles_around_the_anchor() {
        let config = ParticleConfig { motion: Motion::Float, ..DEFAULT_CONFIG };
        let mut particles = [lone(100.0, 100.0), lone(100.0, 100.0)];
        for _ in 0..50 {
            step(&mut particles, &config, DIMS, None, 0.0);
        }
        for p in &particles {
            assert!((p.x - p.base_x).abs() <= FLOAT_AMPLITUDE + 1e-4);
            assert!((p.y - p.base_y).abs() <= FLOAT_AMPLITUDE + 1e-4);
        }
        // phase spread keeps neighbours apart
        assert_ne!(particles[0].x, particles[1].x);
    }

    /// Largest radius change the pulse can build up. The pulse is
    /// `sin(a) * cos(b)` with `a` and `b` advancing linearly, which splits into
    /// two sines whose partial sums are bounded by `1 / sin(rate / 2)`.
    fn spiral_pulse_envelope() -> f32 {
        let pulse_rate = SPIRAL_PULSE_RATE * TIME_STEP;
        let sum = pulse_rate + SPIRAL_ANGLE_STEP;
        let diff = libm::fabsf(pulse_rate - SPIRAL_ANGLE_STEP);
        SPIRAL_PULSE / 2.0 * (1.0 / libm::sinf(sum / 2.0) + 1.0 / libm::sinf(diff / 2.0))
    }

    #[test]
    fn spiral_orbits_the_center() {
        let config = ParticleConfig { motion: Motion::Spiral, ..DEFAULT_CONFIG };
        let (cx, cy) = DIMS.center();
        let start = 40.0;
        let envelope = spiral_pulse_envelope() + 1.0;
        let mut particles = [lone(cx + start, cy)];
        let mut time = 0.0;
        let mut heading = 0.0f32;
        let mut swept = 0.0f32;
        let frames = 20_000;
        for _ in 0..frames {
            time += TIME_STEP;
            step(&mut particles, &config, DIMS, None, time);

            let p = particles[0];
            let radius = libm::sqrtf((p.x - cx) * (p.x - cx) + (p.y - cy) * (p.y - cy));
            assert!(
                (radius - start).abs() <= envelope,
                "radius {} left the pulse envelope of {}",
                radius,
                envelope
            );

            let now = libm::atan2f(p.y - cy, p.x - cx);
            let mut delta = now - heading;
            if delta > core::f32::consts::PI {
                delta -= core::f32::consts::TAU;
            } else if delta < -core::f32::consts::PI {
                delta += core::f32::consts::TAU;
            }
            swept += delta;
            heading = now;
        }
        let expected = frames as f32 * SPIRAL_ANGLE_STEP;
        assert!(
            (swept - expected).abs() < expected * 0.01,
            "swept {} rad, expected {}",
            swept,
            expected
        );
    }

    #[test]
    fn opacity_stays_bounded() {
        for motion in [Motion::Float, Motion::Bounce, Motion::Spiral] {
            let config = ParticleConfig { motion, count: 50, ..DEFAULT_CONFIG };
            let mut field = field_with(&config);
            let pointer = PointerState::default();
            for frame in 0..10_000 {
                field.update(&config, &pointer, frame);
                for p in field.particles() {
                    assert!(p.opacity >= 0.0 && p.opacity <= config.opacity);
                }
            }
        }
    }

    #[test]
    fn opacity_breathes_in_both_directions() {
        let config = DEFAULT_CONFIG;
        let mut particles = [Particle { opacity: 0.0, ..lone(10.0, 10.0) }];
        let mut seen_max = 0.0f32;
        for _ in 0..1050 {
            step(&mut particles, &config, DIMS, None, 0.0);
            seen_max = seen_max.max(particles[0].opacity);
        }
        assert!(seen_max >= config.opacity * OPACITY_CEILING - OPACITY_STEP);
        assert!(particles[0].opacity < seen_max);
    }

    #[test]
    fn pointer_pushes_nearby_particles_away() {
        let config = ParticleConfig { motion: Motion::Bounce, ..DEFAULT_CONFIG };
        let mut particles = [lone(110.0, 100.0), lone(200.0, 100.0)];
        step(&mut particles, &config, DIMS, Some((100.0, 100.0)), 0.0);
        assert!(particles[0].x > 110.0);
        assert_eq!(particles[1].x, 200.0);
    }

    #[test]
    fn pointer_disturbance_reaches_the_float_anchor() {
        let config = DEFAULT_CONFIG;
        let mut particles = [lone(110.0, 100.0)];
        step(&mut particles, &config, DIMS, Some((100.0, 100.0)), 0.0);
        assert!(particles[0].base_x > 110.0);
    }

    #[test]
    fn pointer_goes_idle() {
        let mut pointer = PointerState::default();
        assert_eq!(pointer.active_position(0), None);
        pointer.moved(5.0, 6.0, 1_000);
        assert_eq!(pointer.active_position(1_050), Some((5.0, 6.0)));
        assert_eq!(pointer.active_position(1_000 + POINTER_IDLE_MS), None);
    }

    #[test]
    fn mouse_interaction_off_ignores_pointer() {
        let config = ParticleConfig { mouse_interaction: false, motion: Motion::Bounce, count: 1, ..DEFAULT_CONFIG };
        let mut field = field_with(&config);
        field.particles_mut()[0] = lone(110.0, 100.0);
        let mut pointer = PointerState::default();
        pointer.moved(100.0, 100.0, 0);
        field.update(&config, &pointer, 10);
        assert_eq!(field.particles()[0].x, 110.0);
    }
}
