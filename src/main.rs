//! softpipe demo: a spinning, Lambert-lit cube
//!
//! Usage: softpipe-demo [config.ron]
//!
//! Each tick clears the pipeline, draws the cube, then blits the 16-level
//! frame to the window through a grayscale palette.
//! Keys: P saves a PNG snapshot, Escape quits.

use macroquad::prelude::*;
use softpipe::config::{load_config, RenderConfig};
use softpipe::logging::{init_logging, LoggingConfig};
use softpipe::rasterizer::present::{self, Palette};
use softpipe::rasterizer::{LambertShader, Mat4 as PipeMat4, Renderer, TransformShader, HEIGHT, WIDTH};
use softpipe::Geometry;

fn window_conf() -> Conf {
    Conf {
        window_title: format!("softpipe v{}", softpipe::VERSION),
        window_width: WIDTH as i32 * 3,
        window_height: HEIGHT as i32 * 3,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

fn read_config() -> RenderConfig {
    let Some(path) = std::env::args().nth(1) else {
        return RenderConfig::default();
    };
    match load_config(&path) {
        Ok(config) => {
            ::log::info!("using config {}", path);
            config
        }
        Err(e) => {
            ::log::warn!("failed to load {}: {}, using defaults", path, e);
            RenderConfig::default()
        }
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    init_logging(LoggingConfig::default());

    let config = read_config();
    let (w, h) = (config.width, config.height);
    let mut renderer = Renderer::new(w, h);
    let cube = Geometry::cube();
    let palette = Palette::grayscale();

    let mut frame = Image {
        bytes: vec![0; w * h * 4],
        width: w as u16,
        height: h as u16,
    };
    let texture = Texture2D::from_image(&frame);
    texture.set_filter(FilterMode::Nearest);

    let mut angle = 0.0f32;
    let mut snapshots = 0;

    loop {
        if is_key_pressed(KeyCode::Escape) {
            break;
        }

        angle += config.spin_speed * get_frame_time();
        let model = PipeMat4::rotate_y(angle) * PipeMat4::rotate_x(angle * 0.5);

        renderer.clear();
        renderer.render(&cube, &TransformShader, &LambertShader, &config.uniforms(model));

        if is_key_pressed(KeyCode::P) {
            let path = format!("softpipe-{:03}.png", snapshots);
            match present::save_png(&renderer, &path) {
                Ok(()) => snapshots += 1,
                Err(e) => ::log::error!("snapshot failed: {}", e),
            }
        }

        // Present: palette-expand and scale to fit, keeping aspect
        frame.bytes = palette.to_rgba(&renderer);
        texture.update(&frame);

        clear_background(BLACK);
        let scale = (screen_width() / w as f32).min(screen_height() / h as f32);
        let (draw_w, draw_h) = (w as f32 * scale, h as f32 * scale);
        draw_texture_ex(
            &texture,
            (screen_width() - draw_w) / 2.0,
            (screen_height() - draw_h) / 2.0,
            WHITE,
            DrawTextureParams {
                dest_size: Some(vec2(draw_w, draw_h)),
                ..Default::default()
            },
        );

        next_frame().await;
    }
}
