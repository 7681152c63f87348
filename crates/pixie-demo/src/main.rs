use std::f32::consts::TAU;
use std::path::PathBuf;

use anyhow::Result;
use winit::dpi::LogicalSize;

use pixie_engine::content::ContentStore;
use pixie_engine::coords::{Rect, Vec2, Viewport};
use pixie_engine::core::{App, AppControl, FrameCtx};
use pixie_engine::device::GpuInit;
use pixie_engine::logging::{LoggingConfig, init_logging};
use pixie_engine::paint::Color;
use pixie_engine::render::RenderCtx;
use pixie_engine::render::sprite::{
    DrawParams, RenderSession, SessionConfig, Texture, TextureStore,
};
use pixie_engine::window::{Runtime, RuntimeConfig};

const GRID_COLS: usize = 16;
const GRID_ROWS: usize = 9;
const SHEET_SPRITES: usize = 12;
const PROC_TEXTURE_SIZE: u32 = 64;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    // Optional: `pixie-demo sheet.png sheet.xml`
    let mut args = std::env::args_os().skip(1).map(PathBuf::from);
    let sheet = match (args.next(), args.next()) {
        (Some(image), Some(atlas)) => Some((image, atlas)),
        (Some(_), None) => {
            log::warn!("sprite sheet needs both an image and an atlas path; ignoring");
            None
        }
        _ => None,
    };

    let config = RuntimeConfig {
        title: "pixie sprite batching".to_string(),
        initial_size: LogicalSize::new(1280.0, 720.0),
    };

    Runtime::run(config, GpuInit::default(), Demo { sheet, gfx: None })
}

struct Demo {
    sheet: Option<(PathBuf, PathBuf)>,
    gfx: Option<Graphics>,
}

/// Everything that needs the device.
struct Graphics {
    session: RenderSession,
    textures: TextureStore,
    content: ContentStore,
    checker: Texture,
    gradient: Texture,
}

impl App for Demo {
    fn on_start(&mut self, ctx: &RenderCtx<'_>) -> Result<()> {
        let session = RenderSession::new(ctx, SessionConfig::default())?;
        let mut textures = session.create_texture_store(ctx);
        let mut content = ContentStore::new();

        let n = PROC_TEXTURE_SIZE;
        let checker = textures.create_rgba(ctx, "checker", n, n, &checker_pixels(n, 8))?;
        let gradient = textures.create_rgba(ctx, "gradient", n, n, &gradient_pixels(n))?;
        content.insert_texture("checker", checker);
        content.insert_texture("gradient", gradient);

        if let Some((image, atlas)) = &self.sheet {
            match content.load_sprite_sheet(ctx, &mut textures, image, atlas) {
                Ok(_) => log::info!("loaded {} sprites", content.sprite_count()),
                Err(err) => log::warn!("sprite sheet skipped: {err:#}"),
            }
        }

        self.gfx = Some(Graphics {
            session,
            textures,
            content,
            checker,
            gradient,
        });
        Ok(())
    }

    fn on_resize(&mut self, viewport: Viewport) {
        if let Some(gfx) = &mut self.gfx {
            gfx.session.resize(viewport);
        }
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let time = ctx.time;
        let Some(gfx) = self.gfx.as_mut() else {
            return AppControl::Continue;
        };

        ctx.render(Color::from_rgb_u8(20, 22, 30), |rctx, target| {
            let Graphics {
                session,
                textures,
                content,
                checker,
                gradient,
            } = gfx;

            let viewport = rctx.viewport;
            let mut batch = session.begin(rctx, target, textures)?;

            // Top half shares one texture; bottom half alternates per cell.
            let cell_w = viewport.width / GRID_COLS as f32;
            let cell_h = viewport.height / GRID_ROWS as f32;
            let size = cell_w.min(cell_h) * 0.7;
            for row in 0..GRID_ROWS {
                for col in 0..GRID_COLS {
                    let texture = if row < GRID_ROWS / 2 || (row + col) % 2 == 0 {
                        *checker
                    } else {
                        *gradient
                    };

                    let phase = (row * GRID_COLS + col) as f32 / (GRID_ROWS * GRID_COLS) as f32;
                    let dest = Rect::new(
                        col as f32 * cell_w + (cell_w - size) * 0.5,
                        row as f32 * cell_h + (cell_h - size) * 0.5,
                        size,
                        size,
                    );
                    let params = DrawParams::new()
                        .color(hue(phase + time.elapsed * 0.1))
                        .rotation(time.elapsed * (0.5 + phase) * TAU * 0.25);
                    batch.draw_sprite_with(texture, dest, &params)?;
                }
            }

            // Sheet sprites along the top edge, swinging around their top-left corner.
            let names: Vec<String> = content
                .sprite_names()
                .into_iter()
                .take(SHEET_SPRITES)
                .map(str::to_owned)
                .collect();
            let mut x = 8.0;
            for name in &names {
                let Some(sprite) = content.sprite_mut(name) else { continue };
                sprite.set_position(x, 8.0);
                x += sprite.draw_rect.width + 8.0;

                let swing = (time.elapsed * 2.0 + x * 0.01).sin() * 0.2;
                batch.draw_with(sprite, DrawParams::new().rotation(swing).origin(Vec2::ZERO))?;
            }

            let stats = batch.end()?;
            log::trace!(
                "frame {}: {} draw calls for {} sprites",
                time.frame_index,
                stats.draw_calls,
                stats.sprites
            );
            Ok(())
        })
    }
}

fn checker_pixels(size: u32, cells: u32) -> Vec<u8> {
    let cell = (size / cells).max(1);
    let mut pixels = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let on = ((x / cell) + (y / cell)) % 2 == 0;
            let v = if on { 255 } else { 90 };
            pixels.extend_from_slice(&[v, v, v, 255]);
        }
    }
    pixels
}

/// White at the top fading to transparent at the bottom, with a soft vignette.
fn gradient_pixels(size: u32) -> Vec<u8> {
    let mut pixels = Vec::with_capacity((size * size * 4) as usize);
    let half = size as f32 * 0.5;
    for y in 0..size {
        for x in 0..size {
            let fy = y as f32 / (size - 1) as f32;
            let dx = (x as f32 - half) / half;
            let dy = (y as f32 - half) / half;
            let edge = (1.0 - (dx * dx + dy * dy).sqrt()).clamp(0.0, 1.0);
            let alpha = ((1.0 - fy) * 0.6 + edge * 0.4) * 255.0;
            pixels.extend_from_slice(&[255, 255, 255, alpha as u8]);
        }
    }
    pixels
}

fn hue(t: f32) -> Color {
    let t = t.rem_euclid(1.0) * 6.0;
    let channel = |offset: f32| (1.0 - ((t + offset).rem_euclid(6.0) - 3.0).abs().min(1.0)).max(0.0);
    Color::new(
        1.0 - channel(0.0) * 0.6,
        1.0 - channel(2.0) * 0.6,
        1.0 - channel(4.0) * 0.6,
    )
}
