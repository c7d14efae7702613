//! render - Drawing a particle field onto a surface

use crate::color::{HexColor, Rgba};
use crate::config::{Backdrop, ParticleConfig, Shape};
use crate::simulation::{Dimensions, Particle};
use crate::theme::{self, Theme};

pub const CONNECTION_WIDTH: f32 = 0.5;
/// Alphas of the two gradient stops (top-left, bottom-right).
pub const GRADIENT_OPACITY: (f32, f32) = (0.1, 0.05);
/// Alpha of the solid backdrop; low so earlier frames fade out as trails.
pub const SOLID_OPACITY: f32 = 0.1;

/// 2D drawing primitives a surface has to provide.
pub trait Canvas {
    /// Makes every pixel fully transparent.
    fn clear(&mut self);

    /// Paints over the whole canvas.
    fn fill_rect(&mut self, paint: Rgba);

    /// Linear gradient from the top-left corner to the bottom-right corner.
    fn fill_linear_gradient(&mut self, from: Rgba, to: Rgba);

    fn stroke_line(&mut self, from: (f32, f32), to: (f32, f32), width: f32, paint: Rgba);

    fn fill_circle(&mut self, center: (f32, f32), radius: f32, paint: Rgba);

    /// Axis-aligned square centered on `center`.
    fn fill_square(&mut self, center: (f32, f32), half_width: f32, paint: Rgba);

    fn fill_triangle(&mut self, points: [(f32, f32); 3], paint: Rgba);
}

/// A resizable drawing area bound to the viewport.
pub trait RenderSurface {
    type Canvas: Canvas;

    fn dimensions(&self) -> Dimensions;

    /// False while scrolled out of view or hidden.
    fn is_visible(&self) -> bool;

    /// `None` until the drawing context is ready.
    fn canvas(&mut self) -> Option<&mut Self::Canvas>;
}

/// Paints the backdrop, the connection lines and then every particle.
pub fn draw<C: Canvas + ?Sized>(
    canvas: &mut C,
    particles: &[Particle],
    config: &ParticleConfig,
    theme: Theme,
) {
    draw_backdrop(canvas, config);

    let color = theme::adjust(config.color, theme);
    if config.connections {
        for (a, b, alpha) in connections(particles, config.connection_distance, config.connection_opacity) {
            canvas.stroke_line((a.x, a.y), (b.x, b.y), CONNECTION_WIDTH, color.with_opacity(alpha));
        }
    }

    for p in particles {
        draw_particle(canvas, p, config.shape, color);
    }
}

pub fn draw_backdrop<C: Canvas + ?Sized>(canvas: &mut C, config: &ParticleConfig) {
    let bg = config.background_color;
    match config.backdrop {
        Backdrop::Transparent => canvas.clear(),
        Backdrop::Gradient => canvas.fill_linear_gradient(
            bg.with_opacity(GRADIENT_OPACITY.0),
            bg.with_opacity(GRADIENT_OPACITY.1),
        ),
        Backdrop::Solid => canvas.fill_rect(bg.with_opacity(SOLID_OPACITY)),
    }
}

pub fn draw_particle<C: Canvas + ?Sized>(canvas: &mut C, p: &Particle, shape: Shape, color: HexColor) {
    let paint = color.with_opacity(p.opacity);
    match shape {
        Shape::Circle => canvas.fill_circle((p.x, p.y), p.size, paint),
        Shape::Square => canvas.fill_square((p.x, p.y), p.size, paint),
        Shape::Triangle => canvas.fill_triangle(
            [
                (p.x, p.y - p.size),
                (p.x - p.size, p.y + p.size),
                (p.x + p.size, p.y + p.size),
            ],
            paint,
        ),
    }
}

/// Every unordered pair closer than `max_distance`, with the line alpha
/// `(1 - d / max_distance) * opacity`.
// PERF: O(n²) over the pool; the population ceiling keeps this bounded
pub fn connections(
    particles: &[Particle],
    max_distance: f32,
    opacity: f32,
) -> impl Iterator<Item = (&Particle, &Particle, f32)> + '_ {
    let enabled = max_distance > 0.0;
    particles
        .iter()
        .enumerate()
        .filter(move |_| enabled)
        .flat_map(move |(i, a)| particles[i + 1..].iter().map(move |b| (a, b)))
        .filter_map(move |(a, b)| {
            let dx = a.x - b.x;
            let dy = a.y - b.y;
            let distance = libm::sqrtf(dx * dx + dy * dy);
            if distance < max_distance {
                Some((a, b, (1.0 - distance / max_distance) * opacity))
            } else {
                None
            }
        })
}
