//! Score City host
//!
//! Opens a window, mounts the score city into the area right of the side
//! panel and drives it once per display refresh. The panel shows the score
//! badge, band legend, factor calculator and key help over a particle
//! backdrop.

use macroquad::prelude::*;
use ::rand::rngs::StdRng;
use ::rand::SeedableRng;

use score_city::backdrop::Backdrop;
use score_city::calculator::{CreditFactors, Factor};
use score_city::city::surface::check_viewport;
use score_city::city::{
    BandId, CameraMode, CityConfig, LabelKind, LabelLayer, RenderSurface, ScoreCity, SurfaceError,
    SurfaceProvider, BANDS,
};
use score_city::rasterizer::{self as raster, Framebuffer, MAX_RENDER_WIDTH};
use score_city::VERSION;

const PANEL_WIDTH: f32 = 300.0;
const PANEL_BG: Color = Color::new(0.07, 0.07, 0.12, 1.0);
const TEXT_DIM: Color = Color::new(0.65, 0.68, 0.75, 1.0);
const CONFIG_FILE: &str = "score_city.ron";

/// Seconds a held arrow key waits before repeating
const REPEAT_DELAY: f64 = 0.35;
/// Seconds between repeats once started
const REPEAT_RATE: f64 = 0.03;

fn window_conf() -> Conf {
    Conf {
        window_title: format!("Score City v{}", VERSION),
        window_width: 1280,
        window_height: 720,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

// =============================================================================
// Surface
// =============================================================================

/// Uploads each finished frame as a GPU texture
#[derive(Default)]
struct TextureSurface {
    texture: Option<Texture2D>,
}

impl RenderSurface for TextureSurface {
    fn resize(&mut self, viewport: raster::Viewport) -> Result<(), SurfaceError> {
        check_viewport(viewport)?;
        if viewport.width > u16::MAX as usize || viewport.height > u16::MAX as usize {
            return Err(SurfaceError::Unavailable(format!(
                "{}x{} exceeds the texture size limit",
                viewport.width, viewport.height
            )));
        }
        Ok(())
    }

    fn present(&mut self, frame: &Framebuffer) -> Result<(), SurfaceError> {
        let texture = Texture2D::from_rgba8(frame.width as u16, frame.height as u16, &frame.pixels);
        texture.set_filter(FilterMode::Linear);
        self.texture = Some(texture);
        Ok(())
    }
}

struct TextureProvider;

impl SurfaceProvider for TextureProvider {
    type Surface = TextureSurface;

    fn acquire(&mut self, viewport: raster::Viewport) -> Result<TextureSurface, SurfaceError> {
        let mut surface = TextureSurface::default();
        surface.resize(viewport)?;
        Ok(surface)
    }
}

// =============================================================================
// Layout
// =============================================================================

/// Screen rect of the 3D view and the factor from screen to render pixels
#[derive(Clone, Copy, PartialEq)]
struct SceneLayout {
    x: f32,
    w: f32,
    h: f32,
    render: raster::Viewport,
}

impl SceneLayout {
    fn current() -> Self {
        let w = (screen_width() - PANEL_WIDTH).max(1.0);
        let h = screen_height().max(1.0);
        // Cap the software render size; the texture is stretched to fit
        let scale = (MAX_RENDER_WIDTH as f32 / w).min(1.0);
        Self {
            x: PANEL_WIDTH,
            w,
            h,
            render: raster::Viewport::new(((w * scale) as usize).max(1), ((h * scale) as usize).max(1)),
        }
    }

    /// Pixel x/y in a frame of size `frame` to screen coordinates
    fn to_screen(&self, frame: raster::Viewport, x: f32, y: f32) -> (f32, f32) {
        (
            self.x + x * self.w / frame.width as f32,
            y * self.h / frame.height as f32,
        )
    }
}

fn mq_color(c: raster::Color) -> Color {
    Color::from_rgba(c.r, c.g, c.b, 255)
}

fn load_config() -> CityConfig {
    #[cfg(not(target_arch = "wasm32"))]
    {
        let path = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join(CONFIG_FILE)))
            .unwrap_or_else(|| CONFIG_FILE.into());
        if !path.exists() {
            tracing::info!(path = %path.display(), "no config file, using defaults");
            return CityConfig::default();
        }
        match CityConfig::load(&path) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "loaded config");
                config
            }
            Err(err) => {
                tracing::warn!(error = %err, "config rejected, using defaults");
                CityConfig::default()
            }
        }
    }
    #[cfg(target_arch = "wasm32")]
    {
        CityConfig::default()
    }
}

/// Held-key auto repeat for the score arrows
#[derive(Default)]
struct KeyRepeat {
    held_since: Option<f64>,
    last_fire: f64,
}

impl KeyRepeat {
    fn fire(&mut self, down: bool, now: f64) -> bool {
        if !down {
            self.held_since = None;
            return false;
        }
        match self.held_since {
            None => {
                self.held_since = Some(now);
                self.last_fire = now;
                true
            }
            Some(start) if now - start > REPEAT_DELAY && now - self.last_fire > REPEAT_RATE => {
                self.last_fire = now;
                true
            }
            Some(_) => false,
        }
    }
}

// =============================================================================
// Main
// =============================================================================

#[macroquad::main(window_conf)]
async fn main() {
    // Initialize crash logging FIRST (before any other code)
    #[cfg(not(target_arch = "wasm32"))]
    {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        crashlog::setup!(crashlog::cargo_metadata!().capitalized(), false);
        tracing_subscriber::registry()
            .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    let config = load_config();
    let clock_seed = (macroquad::miniquad::date::now() * 1000.0) as u64;
    let mut rng = StdRng::seed_from_u64(clock_seed);

    let mut city: ScoreCity<TextureSurface, LabelLayer> = ScoreCity::new(config, LabelLayer::new());
    let mut provider = TextureProvider;
    let mut layout = SceneLayout::current();
    let mut failure: Option<String> = None;
    if let Err(err) = city.mount(&mut provider, layout.render, &mut rng) {
        failure = Some(err.to_string());
    }

    let mut backdrop = Backdrop::new(&mut rng, PANEL_WIDTH, screen_height());
    let mut backdrop_fb = Framebuffer::new(PANEL_WIDTH as usize, screen_height() as usize);

    let mut factors = CreditFactors::default();
    let mut selected = 0usize;
    let mut left = KeyRepeat::default();
    let mut right = KeyRepeat::default();

    loop {
        let now = get_time();

        // === RESIZE ===
        let wanted = SceneLayout::current();
        if wanted != layout {
            // A failed resize is logged by the scene and waits for the next size change
            if city.is_running() && wanted.render != layout.render {
                if let Err(err) = city.resize(wanted.render) {
                    tracing::debug!(error = %err, "scene keeps its previous size");
                }
            }
            layout = wanted;
            backdrop.resize(PANEL_WIDTH, screen_height());
            backdrop_fb.resize(PANEL_WIDTH as usize, screen_height().max(1.0) as usize);
        }

        // === INPUT ===
        let score = city.score().value() as i32;
        if left.fire(is_key_down(KeyCode::Left), now) {
            city.set_score(score - 1);
        }
        if right.fire(is_key_down(KeyCode::Right), now) {
            city.set_score(score + 1);
        }

        let band_keys = [KeyCode::Key1, KeyCode::Key2, KeyCode::Key3, KeyCode::Key4, KeyCode::Key5];
        for (key, band) in band_keys.into_iter().zip(BandId::ALL) {
            if is_key_pressed(key) {
                city.jump_to_score(band);
            }
        }

        let view_keys = [KeyCode::F1, KeyCode::F2, KeyCode::F3, KeyCode::F4];
        for (key, mode) in view_keys.into_iter().zip(CameraMode::ALL) {
            if is_key_pressed(key) {
                if let Err(err) = city.set_view(mode) {
                    tracing::debug!(error = %err, "view switch ignored");
                }
            }
        }

        if is_key_pressed(KeyCode::Tab) {
            selected = (selected + 1) % Factor::ALL.len();
        }
        let factor = Factor::ALL[selected];
        if is_key_pressed(KeyCode::Minus) {
            factors.adjust(factor, -5);
        }
        if is_key_pressed(KeyCode::Equal) {
            factors.adjust(factor, 5);
        }
        if is_key_pressed(KeyCode::Enter) {
            city.set_score(factors.score().value() as i32);
        }

        if is_key_pressed(KeyCode::R) {
            match city.rebuild(&mut provider, layout.render, &mut rng) {
                Ok(()) => failure = None,
                Err(err) => failure = Some(err.to_string()),
            }
        }

        // === SCENE ===
        // A halted loop keeps its last frame on screen
        if let Err(err) = city.frame(now) {
            tracing::debug!(error = %err, "render loop stopped");
        }

        backdrop.update();
        backdrop_fb.clear(raster::Color::new(18, 18, 31));
        backdrop.draw(&mut backdrop_fb);

        // === DRAW ===
        clear_background(mq_color(score_city::city::skyline::BACKGROUND));
        draw_scene(&city, &layout, failure.as_deref());
        draw_panel(&city, &backdrop_fb, &factors, selected);

        next_frame().await
    }
}

fn draw_scene(city: &ScoreCity<TextureSurface, LabelLayer>, layout: &SceneLayout, failure: Option<&str>) {
    if let Some(message) = failure {
        let title = "3D view unavailable";
        let dims = measure_text(title, None, 28, 1.0);
        let cx = layout.x + layout.w * 0.5;
        let cy = layout.h * 0.5;
        draw_text(title, cx - dims.width * 0.5, cy, 28.0, WHITE);
        let dims = measure_text(message, None, 18, 1.0);
        draw_text(message, cx - dims.width * 0.5, cy + 28.0, 18.0, TEXT_DIM);
        return;
    }

    if let Some(texture) = city.surface().and_then(|s| s.texture.as_ref()) {
        draw_texture_ex(
            texture,
            layout.x,
            0.0,
            WHITE,
            DrawTextureParams {
                dest_size: Some(vec2(layout.w, layout.h)),
                ..Default::default()
            },
        );
    }

    // Labels are relative to the frame the scene last drew, which lags the
    // layout when a resize was skipped
    let frame = city.viewport().unwrap_or(layout.render);
    for (_, label) in city.overlay().iter() {
        let Some(point) = label.position else {
            continue;
        };
        let (sx, sy) = layout.to_screen(frame, point.x, point.y);
        match label.kind {
            LabelKind::BandRange => {
                // Pinned 10px above the bottom edge, following the projected x
                let dims = measure_text(&label.text, None, 16, 1.0);
                shadowed_text(&label.text, sx - dims.width * 0.5, layout.h - 10.0, 16.0);
            }
            LabelKind::Readout => {
                let lines: Vec<&str> = label.text.lines().collect();
                let line_h = 26.0;
                let top = sy - line_h * lines.len() as f32 * 0.5;
                for (i, line) in lines.iter().enumerate() {
                    let dims = measure_text(line, None, 26, 1.0);
                    shadowed_text(line, sx - dims.width * 0.5, top + line_h * (i as f32 + 0.8), 26.0);
                }
            }
        }
    }
}

fn shadowed_text(text: &str, x: f32, y: f32, size: f32) {
    draw_text(text, x + 1.0, y + 1.0, size, Color::new(0.0, 0.0, 0.0, 0.8));
    draw_text(text, x, y, size, WHITE);
}

fn draw_panel(
    city: &ScoreCity<TextureSurface, LabelLayer>,
    backdrop: &Framebuffer,
    factors: &CreditFactors,
    selected: usize,
) {
    draw_rectangle(0.0, 0.0, PANEL_WIDTH, screen_height(), PANEL_BG);
    let texture = Texture2D::from_rgba8(backdrop.width as u16, backdrop.height as u16, &backdrop.pixels);
    texture.set_filter(FilterMode::Nearest);
    draw_texture_ex(
        &texture,
        0.0,
        0.0,
        Color::new(1.0, 1.0, 1.0, 0.2),
        DrawTextureParams {
            dest_size: Some(vec2(PANEL_WIDTH, screen_height())),
            ..Default::default()
        },
    );

    let pad = 16.0;
    let mut y = 36.0;
    draw_text("Credit Score City", pad, y, 26.0, WHITE);
    y += 30.0;

    // Score badge
    let score = city.score();
    let band = city.band();
    draw_rectangle(pad, y, PANEL_WIDTH - pad * 2.0, 56.0, mq_color(band.color));
    let text_color = mq_color(band.contrast_text());
    draw_text(&score.to_string(), pad + 12.0, y + 40.0, 40.0, text_color);
    let dims = measure_text(band.label, None, 22, 1.0);
    draw_text(band.label, PANEL_WIDTH - pad - 12.0 - dims.width, y + 36.0, 22.0, text_color);
    y += 72.0;

    // Slider bar across the score range, one segment per band
    let bar_w = PANEL_WIDTH - pad * 2.0;
    let span = (BANDS[BANDS.len() - 1].max - BANDS[0].min) as f32;
    for b in &BANDS {
        let x0 = pad + (b.min - BANDS[0].min) as f32 / span * bar_w;
        let x1 = pad + (b.max - BANDS[0].min) as f32 / span * bar_w;
        draw_rectangle(x0, y, x1 - x0 + 1.0, 8.0, mq_color(b.color));
    }
    let marker = pad + (score.value() - BANDS[0].min) as f32 / span * bar_w;
    draw_circle(marker, y + 4.0, 7.0, WHITE);
    draw_text("300", pad, y + 26.0, 16.0, TEXT_DIM);
    draw_text("850", pad + bar_w - 24.0, y + 26.0, 16.0, TEXT_DIM);
    y += 48.0;

    // Legend
    for (i, b) in BANDS.iter().enumerate() {
        draw_rectangle(pad, y - 10.0, 12.0, 12.0, mq_color(b.color));
        let line = format!("{}  {}: {}", i + 1, b.range_label(), b.label);
        draw_text(&line, pad + 20.0, y, 18.0, WHITE);
        y += 22.0;
    }
    y += 12.0;

    // Calculator
    draw_text("Factor calculator", pad, y, 20.0, WHITE);
    y += 24.0;
    for (i, factor) in Factor::ALL.iter().enumerate() {
        let color = if i == selected { YELLOW } else { TEXT_DIM };
        let line = format!("{}: {}{}", factor.label(), factors.get(*factor), factor.unit());
        draw_text(&line, pad, y, 16.0, color);
        y += 20.0;
    }
    let estimate = factors.score();
    draw_text(
        &format!("Estimate: {} ({})", estimate, estimate.band().label),
        pad,
        y + 4.0,
        18.0,
        mq_color(estimate.color()),
    );
    y += 36.0;

    // Help
    let view = city.view().map(|m| m.to_string()).unwrap_or_else(|| "-".into());
    let help = [
        "Left/Right  adjust score".to_string(),
        "1-5  jump to band".to_string(),
        format!("F1-F4  camera ({})", view),
        "Tab  pick factor, -/= change".to_string(),
        "Enter  apply estimate".to_string(),
        "R  rebuild city".to_string(),
    ];
    for line in &help {
        draw_text(line, pad, y, 16.0, TEXT_DIM);
        y += 19.0;
    }
}
