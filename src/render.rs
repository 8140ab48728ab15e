//! Canvas-2D frame drawing
//!
//! The draw surface is opaque to the simulation: this module reads the
//! session and paints one frame, nothing flows back.

use web_sys::CanvasRenderingContext2d;

use crate::settings::Settings;
use crate::sim::{GamePhase, GameSession, Rect};

const PLAYER_COLOR: &str = "#FFD700";
const COIN_COLOR: &str = "#FFD700";
const SPIKE_COLOR: &str = "#FF0000";
const HUD_COLOR: &str = "#FFFFFF";
const OVERLAY_COLOR: &str = "rgba(0, 0, 0, 0.5)";

const SPIKE_WIDTH: f64 = 5.0;
const SPIKE_HEIGHT: f64 = 10.0;

/// Paint one frame of the session onto the canvas.
pub fn draw(ctx: &CanvasRenderingContext2d, session: &GameSession, fps: u32, settings: &Settings) {
    let w = session.bounds.width as f64;
    let h = session.bounds.height as f64;
    ctx.clear_rect(0.0, 0.0, w, h);

    for platform in &session.platforms {
        let color = if settings.high_contrast {
            if platform.has_spikes { "#FF00FF" } else { "#FFFFFF" }
        } else {
            platform.color.as_css()
        };
        ctx.set_fill_style_str(color);
        fill_rect(ctx, &platform.rect);
        if platform.has_spikes {
            draw_spikes(ctx, &platform.rect);
        }
    }

    ctx.set_fill_style_str(COIN_COLOR);
    for coin in &session.coins {
        ctx.begin_path();
        let _ = ctx.arc(
            coin.pos.x as f64,
            coin.pos.y as f64,
            coin.radius as f64,
            0.0,
            std::f64::consts::TAU,
        );
        ctx.fill();
    }

    ctx.set_fill_style_str(PLAYER_COLOR);
    fill_rect(ctx, &session.player.rect());

    if settings.show_hitboxes {
        draw_hitboxes(ctx, session);
    }

    draw_hud(ctx, session, fps, settings);

    match session.phase {
        GamePhase::Paused => draw_overlay(ctx, w, h, "Paused", "press Escape to resume"),
        GamePhase::Dead => {
            let title = format!("Game over - score {}", session.score);
            draw_overlay(ctx, w, h, &title, "press Enter to restart");
        }
        GamePhase::LevelTransition => {
            let title = format!("Level {}", session.level);
            draw_overlay(ctx, w, h, &title, "");
        }
        GamePhase::Running => {}
    }
}

fn fill_rect(ctx: &CanvasRenderingContext2d, rect: &Rect) {
    ctx.fill_rect(rect.x as f64, rect.y as f64, rect.w as f64, rect.h as f64);
}

/// Three spike triangles along the platform top, matching the hazard tint.
fn draw_spikes(ctx: &CanvasRenderingContext2d, rect: &Rect) {
    ctx.set_fill_style_str(SPIKE_COLOR);
    let top = rect.y as f64;
    let spacing = (rect.w / 4.0) as f64;
    let centers = [
        rect.x as f64 + spacing,
        (rect.x + rect.w / 2.0) as f64,
        (rect.x + rect.w) as f64 - spacing,
    ];
    for cx in centers {
        ctx.begin_path();
        ctx.move_to(cx, top);
        ctx.line_to(cx + SPIKE_WIDTH, top - SPIKE_HEIGHT);
        ctx.line_to(cx - SPIKE_WIDTH, top - SPIKE_HEIGHT);
        ctx.close_path();
        ctx.fill();
    }
}

fn draw_hitboxes(ctx: &CanvasRenderingContext2d, session: &GameSession) {
    ctx.set_line_width(1.0);

    ctx.set_stroke_style_str("blue");
    for platform in &session.platforms {
        let r = &platform.rect;
        ctx.stroke_rect(r.x as f64, r.y as f64, r.w as f64, r.h as f64);
    }

    ctx.set_stroke_style_str("yellow");
    for coin in &session.coins {
        ctx.begin_path();
        let _ = ctx.arc(
            coin.pos.x as f64,
            coin.pos.y as f64,
            coin.radius as f64,
            0.0,
            std::f64::consts::TAU,
        );
        ctx.stroke();
    }

    ctx.set_stroke_style_str("red");
    ctx.set_line_width(2.0);
    let r = session.player.rect();
    ctx.stroke_rect(r.x as f64, r.y as f64, r.w as f64, r.h as f64);
}

fn draw_hud(ctx: &CanvasRenderingContext2d, session: &GameSession, fps: u32, settings: &Settings) {
    ctx.set_fill_style_str(HUD_COLOR);
    ctx.set_font("16px sans-serif");
    ctx.set_text_align("left");
    let _ = ctx.fill_text(&format!("Score: {}", session.score), 10.0, 22.0);
    let _ = ctx.fill_text(&format!("Level: {}", session.level), 10.0, 44.0);
    let _ = ctx.fill_text(&format!("Best: {}", session.best_score), 10.0, 66.0);
    if settings.show_fps {
        let _ = ctx.fill_text(&format!("FPS: {fps}"), 10.0, 88.0);
    }
}

fn draw_overlay(ctx: &CanvasRenderingContext2d, w: f64, h: f64, title: &str, hint: &str) {
    ctx.set_fill_style_str(OVERLAY_COLOR);
    ctx.fill_rect(0.0, 0.0, w, h);

    ctx.set_fill_style_str(HUD_COLOR);
    ctx.set_text_align("center");
    ctx.set_font("32px sans-serif");
    let _ = ctx.fill_text(title, w / 2.0, h / 2.0);
    if !hint.is_empty() {
        ctx.set_font("16px sans-serif");
        let _ = ctx.fill_text(hint, w / 2.0, h / 2.0 + 32.0);
    }
}
