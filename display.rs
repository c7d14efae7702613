//! display.rs - Simulator window surface
//! Alpha-blended canvas over the simulator framebuffer and the refresh-paced
//! frame scheduler driving it.

use core::convert::Infallible;

use embedded_graphics::{
    geometry::{OriginDimensions, Point, Size},
    pixelcolor::{Rgb888, RgbColor},
    primitives::{Circle, Line, PointsIter, Rectangle, Triangle},
    Pixel,
    draw_target::DrawTarget,
};
use embedded_graphics_simulator::SimulatorDisplay;

use particle_field::{Canvas, Dimensions, FrameScheduler, HexColor, RenderSurface, Rgba, Theme};

/// Page color the background is composited over.
pub fn page_color(theme: Theme) -> Rgb888 {
    match theme {
        Theme::Dark => Rgb888::new(0x0b, 0x11, 0x20),
        Theme::Light => Rgb888::new(0xf8, 0xfa, 0xfc),
    }
}

fn rgb(color: HexColor) -> Rgb888 {
    Rgb888::new(color.r, color.g, color.b)
}

fn mix(src: u8, dst: u8, alpha: f32) -> u8 {
    (src as f32 * alpha + dst as f32 * (1.0 - alpha)).round() as u8
}

fn blend(src: Rgb888, dst: Rgb888, alpha: f32) -> Rgb888 {
    Rgb888::new(
        mix(src.r(), dst.r(), alpha),
        mix(src.g(), dst.g(), alpha),
        mix(src.b(), dst.b(), alpha),
    )
}

fn point(at: (f32, f32)) -> Point {
    Point::new(at.0.round() as i32, at.1.round() as i32)
}

pub struct DisplayCanvas {
    display: SimulatorDisplay<Rgb888>,
    page: Rgb888,
}

impl DisplayCanvas {
    pub fn new(size: Size, page: Rgb888) -> Self {
        Self { display: SimulatorDisplay::new(size), page }
    }

    pub fn display(&self) -> &SimulatorDisplay<Rgb888> {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut SimulatorDisplay<Rgb888> {
        &mut self.display
    }

    pub fn set_page(&mut self, page: Rgb888) {
        self.page = page;
    }

    fn contains(&self, p: Point) -> bool {
        let size = self.display.size();
        p.x >= 0 && p.y >= 0 && (p.x as u32) < size.width && (p.y as u32) < size.height
    }

    fn put(&mut self, p: Point, color: Rgb888) {
        let result: Result<(), Infallible> = self.display.draw_iter(core::iter::once(Pixel(p, color)));
        match result {
            Ok(()) => {}
            Err(never) => match never {},
        }
    }

    fn blend_point(&mut self, p: Point, paint: Rgba) {
        if !self.contains(p) {
            return;
        }
        let dst = self.display.get_pixel(p);
        self.put(p, blend(rgb(paint.color), dst, paint.opacity()));
    }

    fn blend_points(&mut self, points: impl Iterator<Item = Point>, paint: Rgba) {
        if paint.alpha == 0 {
            return;
        }
        for p in points {
            self.blend_point(p, paint);
        }
    }

    fn full_area(&self) -> Rectangle {
        Rectangle::new(Point::zero(), self.display.size())
    }
}

impl Canvas for DisplayCanvas {
    fn clear(&mut self) {
        let page = self.page;
        let result: Result<(), Infallible> = self.display.clear(page);
        match result {
            Ok(()) => {}
            Err(never) => match never {},
        }
    }

    fn fill_rect(&mut self, paint: Rgba) {
        let area = self.full_area();
        self.blend_points(area.points(), paint);
    }

    fn fill_linear_gradient(&mut self, from: Rgba, to: Rgba) {
        let size = self.display.size();
        let span = (size.width + size.height).saturating_sub(2).max(1) as f32;
        for p in self.full_area().points() {
            let t = (p.x + p.y) as f32 / span;
            let alpha = from.opacity() + (to.opacity() - from.opacity()) * t;
            let color = Rgb888::new(
                mix(to.color.r, from.color.r, t),
                mix(to.color.g, from.color.g, t),
                mix(to.color.b, from.color.b, t),
            );
            let dst = self.display.get_pixel(p);
            self.put(p, blend(color, dst, alpha));
        }
    }

    fn stroke_line(&mut self, from: (f32, f32), to: (f32, f32), _width: f32, paint: Rgba) {
        // sub-pixel widths still cover one pixel
        self.blend_points(Line::new(point(from), point(to)).points(), paint);
    }

    fn fill_circle(&mut self, center: (f32, f32), radius: f32, paint: Rgba) {
        let diameter = (radius * 2.0).round().max(1.0) as u32;
        self.blend_points(Circle::with_center(point(center), diameter).points(), paint);
    }

    fn fill_square(&mut self, center: (f32, f32), half_width: f32, paint: Rgba) {
        let side = (half_width * 2.0).round().max(1.0) as u32;
        let square = Rectangle::with_center(point(center), Size::new(side, side));
        self.blend_points(square.points(), paint);
    }

    fn fill_triangle(&mut self, points: [(f32, f32); 3], paint: Rgba) {
        let [a, b, c] = points;
        self.blend_points(Triangle::new(point(a), point(b), point(c)).points(), paint);
    }
}

/// The window's drawing area.
pub struct WindowSurface {
    pub canvas: DisplayCanvas,
    pub visible: bool,
}

impl RenderSurface for WindowSurface {
    type Canvas = DisplayCanvas;

    fn dimensions(&self) -> Dimensions {
        let size = self.canvas.display.size();
        Dimensions::new(size.width as f32, size.height as f32)
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn canvas(&mut self) -> Option<&mut DisplayCanvas> {
        Some(&mut self.canvas)
    }
}

/// Hands out one frame per window refresh; the main loop collects it with
/// [`RefreshScheduler::take_due`].
#[derive(Default)]
pub struct RefreshScheduler {
    next: u64,
    pending: Option<u64>,
}

impl RefreshScheduler {
    pub fn take_due(&mut self) -> Option<u64> {
        self.pending.take()
    }
}

impl FrameScheduler for RefreshScheduler {
    type Handle = u64;

    fn request_frame(&mut self) -> u64 {
        self.next += 1;
        self.pending = Some(self.next);
        self.next
    }

    fn cancel_frame(&mut self, handle: u64) {
        if self.pending == Some(handle) {
            self.pending = None;
        }
    }
}
