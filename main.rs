//! main.rs - Desktop simulator for the particle background
//! Handles the window, timing, keyboard controls and the persisted config

mod display;

use embedded_graphics::{
    geometry::{Point, Size},
    mono_font::{ascii::FONT_6X10, MonoTextStyle},
    pixelcolor::Rgb888,
    text::{Baseline, Text},
    Drawable,
};
use embedded_graphics_simulator::{OutputSettingsBuilder, SimulatorEvent, Window};
use std::convert::Infallible;
use std::thread;
use std::time::{Duration, Instant};

use particle_field::{
    Backdrop, Canvas, ConfigPatch, ConfigStore, FileStore, JsonPersistence, Motion, ParticleBackground,
    Preset, RenderSurface, Shape,
};

use display::{page_color, DisplayCanvas, RefreshScheduler, WindowSurface};

const SCREEN_WIDTH: u32 = 480;
const SCREEN_HEIGHT: u32 = 270;
const CONFIG_DIR: &str = ".particle-field";

type Background = ParticleBackground<JsonPersistence<FileStore>, RefreshScheduler>;

fn next_motion(motion: Motion) -> Motion {
    match motion {
        Motion::Float => Motion::Bounce,
        Motion::Bounce => Motion::Spiral,
        Motion::Spiral => Motion::Float,
    }
}

fn next_shape(shape: Shape) -> Shape {
    match shape {
        Shape::Circle => Shape::Square,
        Shape::Square => Shape::Triangle,
        Shape::Triangle => Shape::Circle,
    }
}

fn next_backdrop(backdrop: Backdrop) -> Backdrop {
    match backdrop {
        Backdrop::Transparent => Backdrop::Gradient,
        Backdrop::Gradient => Backdrop::Solid,
        Backdrop::Solid => Backdrop::Transparent,
    }
}

fn draw_status(surface: &mut WindowSurface, background: &Background, preset: Preset) {
    let config = background.config();
    let style = MonoTextStyle::new(&FONT_6X10, Rgb888::new(0x94, 0xa3, 0xb8));
    let status = format!(
        "{} | {} {:?} {:?} | {}",
        preset.name(),
        config.count,
        config.motion,
        config.shape,
        if background.is_running() { "running" } else { "stopped" },
    );
    let drawn: Result<Point, Infallible> = Text::with_baseline(
        &status,
        Point::new(5, SCREEN_HEIGHT as i32 - 12),
        style,
        Baseline::Top,
    )
    .draw(surface.canvas.display_mut());
    match drawn {
        Ok(_) => {}
        Err(never) => match never {},
    }
}

/// Applies one key press. Returns false when the user asked to quit.
fn handle_key(key: &str, background: &mut Background, surface: &mut WindowSurface, preset: &mut Preset) -> bool {
    let config = background.config();
    match key {
        "space" => {
            background.update_config(&ConfigPatch { enabled: Some(!config.enabled), ..Default::default() });
            println!("Particles: {}", if config.enabled { "OFF" } else { "ON" });
        }
        "p" => {
            *preset = preset.next();
            background.apply_preset(preset.name());
            log::info!("preset {}: {}", preset.name(), preset.description());
        }
        "r" => {
            *preset = Preset::Default;
            background.reset_config();
            println!("Configuration reset");
        }
        "c" => {
            background.update_config(&ConfigPatch { connections: Some(!config.connections), ..Default::default() });
        }
        "a" => {
            background.update_config(&ConfigPatch { motion: Some(next_motion(config.motion)), ..Default::default() });
            println!("Animation: {:?}", background.config().motion);
        }
        "s" => {
            background.update_config(&ConfigPatch { shape: Some(next_shape(config.shape)), ..Default::default() });
        }
        "b" => {
            background.update_config(&ConfigPatch { backdrop: Some(next_backdrop(config.backdrop)), ..Default::default() });
            println!("Background: {:?}", background.config().backdrop);
        }
        "t" => {
            let theme = background.theme().toggled();
            background.set_theme(theme);
            surface.canvas.set_page(page_color(theme));
            println!("Theme: {:?}", theme);
        }
        "v" => {
            surface.visible = !surface.visible;
            background.set_visible(surface.visible);
            println!("Visible: {}", surface.visible);
        }
        "equals" | "plus" | "kpplus" => {
            let count = (config.count + 10).min(particle_field::MAX_PARTICLES as u32);
            background.update_config(&ConfigPatch { count: Some(count), ..Default::default() });
            println!("Particles: {}", count);
        }
        "minus" | "kpminus" => {
            let count = config.count.saturating_sub(10);
            background.update_config(&ConfigPatch { count: Some(count), ..Default::default() });
            println!("Particles: {}", count);
        }
        "q" => return false,
        _ => {}
    }
    true
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_dir = std::env::current_dir()
        .unwrap_or_else(|_| std::path::PathBuf::from("."))
        .join(CONFIG_DIR);
    let store = ConfigStore::load(JsonPersistence::new(FileStore::new(&config_dir)));
    log::info!("config stored under {}", config_dir.display());

    let mut background: Background = ParticleBackground::new(store, RefreshScheduler::default(), 0x12345678);
    let mut surface = WindowSurface {
        canvas: DisplayCanvas::new(Size::new(SCREEN_WIDTH, SCREEN_HEIGHT), page_color(background.theme())),
        visible: true,
    };
    let output_settings = OutputSettingsBuilder::new().scale(2).build();
    let mut window = Window::new("Particles - Background", &output_settings);
    let mut preset = Preset::Default;

    background.mount(surface.dimensions(), surface.is_visible());

    // Timing
    let started = Instant::now();
    let frame_duration = Duration::from_secs_f32(1.0 / 60.0);

    println!("=== Particles - Background Simulator ===");
    println!("Controls:");
    println!("  Space: Toggle particles");
    println!("  P: Next preset | R: Reset");
    println!("  C: Connections | A: Animation | S: Shape | B: Background");
    println!("  T: Light/dark theme | V: Toggle visibility");
    println!("  +/-: Particle count");
    println!("  Q: Quit");

    'main_loop: loop {
        let frame_start = Instant::now();
        let now_ms = started.elapsed().as_millis() as u64;

        // One display refresh: fire the pending frame, if any
        if let Some(handle) = background.scheduler_mut().take_due() {
            background.on_frame(handle, &mut surface, now_ms);
        } else if !background.config().enabled {
            surface.canvas.clear();
        }
        draw_status(&mut surface, &background, preset);
        window.update(surface.canvas.display());

        for event in window.events() {
            match event {
                SimulatorEvent::Quit => break 'main_loop,
                SimulatorEvent::MouseMove { point } => {
                    background.pointer_moved(point.x as f32, point.y as f32, now_ms);
                }
                SimulatorEvent::KeyDown { keycode, .. } => {
                    let key = format!("{:?}", keycode).to_lowercase();
                    if !handle_key(&key, &mut background, &mut surface, &mut preset) {
                        break 'main_loop;
                    }
                }
                _ => {}
            }
        }

        let elapsed = frame_start.elapsed();
        if elapsed < frame_duration {
            thread::sleep(frame_duration - elapsed);
        }
    }

    background.unmount();
    log::info!("shut down after {:.1}s", started.elapsed().as_secs_f32());
}
