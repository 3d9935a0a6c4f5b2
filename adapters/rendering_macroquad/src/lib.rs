#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for the wavefront planner.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature.
//!
//! A session opens a single window, waits for a left click on the map, hands
//! the chosen start to the planning callback and then animates the wavefront
//! flood followed by the trajectory. `Space` skips the animation and `Escape`
//! or `Q` closes the window.

use anyhow::{anyhow, Result};
use glam::Vec2;
use macroquad::{
    color::DARKGRAY,
    input::{is_key_pressed, is_mouse_button_pressed, mouse_position, KeyCode, MouseButton},
    texture::{DrawTextureParams, FilterMode, Image, Texture2D},
};
use std::{sync::mpsc, time::Duration};
use wavefront_core::{CellCoord, CellLabel, GridPosition};
use wavefront_rendering::{
    playback::{DEFAULT_FLOOD_RATE, DEFAULT_PATH_RATE},
    Color, GridPresentation, Palette, PlanOverlay, Playback, PlaybackPhase, Presentation,
    RenderMode, RenderingBackend, Scene, StartSelection,
};

/// Height of the status strip drawn above the map, in screen pixels.
const STATUS_BAR_HEIGHT: f32 = 40.0;
const STATUS_FONT_SIZE: f32 = 24.0;

/// Snapshot of edge-triggered keyboard shortcuts observed during a single frame.
#[derive(Clone, Copy, Debug, Default)]
struct KeyboardShortcuts {
    /// `Q` or `Escape` closes the window.
    quit_requested: bool,
    /// `Space` reveals the remaining animation at once.
    skip_animation: bool,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        let quit_requested = is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q);
        let skip_animation = is_key_pressed(KeyCode::Space);

        Self {
            quit_requested,
            skip_animation,
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Clone, Copy, Debug)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    flood_rate: f32,
    path_rate: f32,
}

impl Default for MacroquadBackend {
    fn default() -> Self {
        Self {
            swap_interval: None,
            flood_rate: DEFAULT_FLOOD_RATE,
            path_rate: DEFAULT_PATH_RATE,
        }
    }
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures how many flood cells and trajectory steps are revealed per second.
    #[must_use]
    pub fn with_playback_rates(mut self, flood_rate: f32, path_rate: f32) -> Self {
        self.flood_rate = flood_rate;
        self.path_rate = path_rate;
        self
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut plan_from: F) -> Result<Option<GridPosition>>
    where
        F: FnMut(GridPosition) -> Result<PlanOverlay> + 'static,
    {
        let Self {
            swap_interval,
            flood_rate,
            path_rate,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            palette,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: 960,
            window_height: 960,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        let (outcome_sender, outcome_receiver) = mpsc::channel::<Result<Option<GridPosition>>>();

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let mut selection = StartSelection::new();
            let mut playback = Playback::new(flood_rate, path_rate);
            let mut raster = match scene.mode {
                RenderMode::Raster => match RasterLayer::new(&scene, &palette) {
                    Ok(layer) => Some(layer),
                    Err(error) => {
                        let _ = outcome_sender.send(Err(error));
                        return;
                    }
                },
                RenderMode::Detailed => None,
            };
            let background = to_macroquad_color(clear_color);

            loop {
                let keyboard = KeyboardShortcuts::poll();
                if keyboard.quit_requested {
                    let _ = selection.cancel();
                    break;
                }

                macroquad::window::clear_background(background);

                let screen_width = macroquad::window::screen_width();
                let screen_height = macroquad::window::screen_height();
                let metrics = SceneMetrics::from_scene(&scene, screen_width, screen_height);

                match playback.phase() {
                    PlaybackPhase::SelectStart => {
                        if is_mouse_button_pressed(MouseButton::Left) {
                            let (cursor_x, cursor_y) = mouse_position();
                            let picked = cell_under_cursor(&metrics, Vec2::new(cursor_x, cursor_y));
                            if let Some(start) = picked.filter(|start| selection.offer(*start)) {
                                match plan_from(start) {
                                    Ok(overlay) => {
                                        playback.begin(
                                            overlay.expansion_order.len(),
                                            overlay.trajectory.len(),
                                        );
                                        scene.status = overlay.summary.clone();
                                        scene.overlay = Some(overlay);
                                    }
                                    Err(error) => {
                                        let _ = outcome_sender.send(Err(error));
                                        return;
                                    }
                                }
                            }
                        }
                    }
                    PlaybackPhase::Flood | PlaybackPhase::Path => {
                        if keyboard.skip_animation {
                            playback.finish();
                        } else {
                            let dt_seconds = macroquad::time::get_frame_time();
                            let _ = playback.advance(Duration::from_secs_f32(dt_seconds.max(0.0)));
                        }
                    }
                    PlaybackPhase::Done => {}
                }

                let colors = cell_colors(&scene, &palette, &playback);
                match raster.as_mut() {
                    Some(layer) => layer.draw(&colors, &metrics),
                    None => {
                        draw_cells(&scene, &colors, &metrics);
                        draw_grid_lines(&metrics, palette.grid_line);
                    }
                }
                draw_status(&scene.status);

                macroquad::window::next_frame().await;
            }

            let _ = outcome_sender.send(Ok(selection.selected()));
        });

        outcome_receiver.recv().unwrap_or(Ok(None))
    }
}

/// Screen placement of the grid for the current window size.
#[derive(Clone, Copy, Debug, PartialEq)]
struct SceneMetrics {
    /// Upper-left corner of the grid in screen pixels.
    offset: Vec2,
    /// Grid geometry scaled to screen pixels; `None` when the window leaves no room.
    layout: Option<GridPresentation>,
}

impl SceneMetrics {
    fn from_scene(scene: &Scene, screen_width: f32, screen_height: f32) -> Self {
        let presentation = scene.presentation;
        let world_width = presentation.width();
        let world_height = presentation.height();
        let available_height = (screen_height - STATUS_BAR_HEIGHT).max(0.0);
        let scale = if world_width <= f32::EPSILON || world_height <= f32::EPSILON {
            1.0
        } else {
            (screen_width / world_width).min(available_height / world_height)
        };

        let scaled_width = world_width * scale;
        let scaled_height = world_height * scale;
        let offset_x = ((screen_width - scaled_width) * 0.5).max(0.0);
        let offset_y = STATUS_BAR_HEIGHT + ((available_height - scaled_height) * 0.5).max(0.0);

        let layout = GridPresentation::new(
            presentation.rows,
            presentation.columns,
            presentation.cell_length * scale,
        )
        .ok();

        Self {
            offset: Vec2::new(offset_x, offset_y),
            layout,
        }
    }

    fn cell_rect(&self, cell: CellCoord) -> Option<(f32, f32, f32, f32)> {
        let layout = self.layout?;
        let origin = self.offset + layout.cell_origin(cell);
        Some((origin.x, origin.y, layout.cell_length, layout.cell_length))
    }
}

/// Maps a screen-space cursor to the one-based cell under it for a window of the given size.
#[doc(hidden)]
#[must_use]
pub fn start_under_cursor(
    scene: &Scene,
    screen_width: f32,
    screen_height: f32,
    cursor: Vec2,
) -> Option<GridPosition> {
    let metrics = SceneMetrics::from_scene(scene, screen_width, screen_height);
    cell_under_cursor(&metrics, cursor)
}

fn cell_under_cursor(metrics: &SceneMetrics, cursor: Vec2) -> Option<GridPosition> {
    metrics.layout?.cell_at(cursor - metrics.offset)
}

/// Resolves the color of every cell in row-major order for the current frame.
fn cell_colors(scene: &Scene, palette: &Palette, playback: &Playback) -> Vec<Color> {
    let grid = &scene.grid;
    let mut colors: Vec<Color> = grid
        .as_slice()
        .iter()
        .map(|&value| palette.cell_color(CellLabel::from_value(value)))
        .collect();

    let Some(overlay) = scene.overlay.as_ref() else {
        return colors;
    };
    let columns = grid.columns() as usize;
    let index = |cell: CellCoord| cell.row() as usize * columns + cell.column() as usize;

    let max_wave = overlay.max_wave();
    for expanded in overlay
        .expansion_order
        .iter()
        .take(playback.flood_revealed())
        .filter(|expanded| CellLabel::from_value(expanded.wave) != CellLabel::Goal)
    {
        if let Some(color) = colors.get_mut(index(expanded.cell)) {
            *color = palette.flood_color(expanded.wave, max_wave);
        }
    }

    let steps = overlay.trajectory.steps();
    let last = steps.len().saturating_sub(1);
    for (position, step) in steps.iter().enumerate().take(playback.path_revealed()) {
        let Some(cell) = step.to_cell() else {
            continue;
        };
        let color = if position == 0 {
            palette.start
        } else if position == last {
            palette.goal
        } else {
            palette.path
        };
        if let Some(slot) = colors.get_mut(index(cell)) {
            *slot = color;
        }
    }

    colors
}

fn draw_cells(scene: &Scene, colors: &[Color], metrics: &SceneMetrics) {
    for ((cell, _), color) in scene.grid.cells().zip(colors) {
        if let Some((x, y, width, height)) = metrics.cell_rect(cell) {
            macroquad::shapes::draw_rectangle(x, y, width, height, to_macroquad_color(*color));
        }
    }
}

fn draw_grid_lines(metrics: &SceneMetrics, color: Color) {
    let Some(layout) = metrics.layout else {
        return;
    };
    let color = to_macroquad_color(color);
    let Vec2 { x: left, y: top } = metrics.offset;
    let (right, bottom) = (left + layout.width(), top + layout.height());

    for row in 0..=layout.rows {
        let y = top + row as f32 * layout.cell_length;
        macroquad::shapes::draw_line(left, y, right, y, 1.0, color);
    }
    for column in 0..=layout.columns {
        let x = left + column as f32 * layout.cell_length;
        macroquad::shapes::draw_line(x, top, x, bottom, 1.0, color);
    }
}

fn draw_status(status: &str) {
    let _ = macroquad::text::draw_text(
        status,
        12.0,
        STATUS_BAR_HEIGHT * 0.5 + STATUS_FONT_SIZE * 0.3,
        STATUS_FONT_SIZE,
        DARKGRAY,
    );
}

/// Whole-map texture with one texel per cell, refreshed when the colors change.
struct RasterLayer {
    texture: Texture2D,
    image: Image,
}

impl RasterLayer {
    fn new(scene: &Scene, palette: &Palette) -> Result<Self> {
        let grid = &scene.grid;
        let width = u16::try_from(grid.columns())
            .map_err(|_| anyhow!("{} columns exceed the raster texture limit", grid.columns()))?;
        let height = u16::try_from(grid.rows())
            .map_err(|_| anyhow!("{} rows exceed the raster texture limit", grid.rows()))?;

        let colors: Vec<Color> = grid
            .as_slice()
            .iter()
            .map(|&value| palette.cell_color(CellLabel::from_value(value)))
            .collect();
        let image = Image {
            bytes: rgba_bytes(&colors),
            width,
            height,
        };
        let texture = Texture2D::from_image(&image);
        texture.set_filter(FilterMode::Nearest);

        Ok(Self { texture, image })
    }

    fn draw(&mut self, colors: &[Color], metrics: &SceneMetrics) {
        let Some(layout) = metrics.layout else {
            return;
        };
        let bytes = rgba_bytes(colors);
        if bytes != self.image.bytes {
            self.image.bytes = bytes;
            self.texture.update(&self.image);
        }

        macroquad::texture::draw_texture_ex(
            self.texture,
            metrics.offset.x,
            metrics.offset.y,
            macroquad::color::WHITE,
            DrawTextureParams {
                dest_size: Some(macroquad::math::Vec2::new(layout.width(), layout.height())),
                ..DrawTextureParams::default()
            },
        );
    }
}

fn rgba_bytes(colors: &[Color]) -> Vec<u8> {
    colors
        .iter()
        .flat_map(|color| color.to_rgba_u8())
        .collect()
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}
