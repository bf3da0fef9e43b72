//! Canvas drawing for the board, hazards, tokens and effects.
//!
//! All functions draw into an existing 2D context and leave shadow/alpha state
//! reset for the next caller.

use std::f64::consts::{PI, TAU};

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::board::{FINAL_CELL, GRID_SIZE, Hazard, HazardTable, cell_at, cell_center};
use crate::effects::{Confetti, EmojiBurst};

const CELL_DARK: &str = "#2a2a2a";
const CELL_LIGHT: &str = "#1a1a1a";
const GRID_LINE: &str = "#3a3a3a";
const CELL_NUMBER: &str = "#666666";
/// Horizontal spacing between tokens sharing a cell.
const TOKEN_SPREAD: f64 = 20.0;
const TOKEN_SIZE: f64 = 32.0;

/// A token to draw: display color and the cell it currently shows on.
#[derive(Clone, Copy, Debug)]
pub struct TokenView {
    pub color: &'static str,
    pub cell: u8,
}

/// Side length that fits the viewport, as the board canvas is square.
pub fn fit_canvas_size(inner_width: f64, inner_height: f64) -> f64 {
    (inner_height - 160.0).min((inner_width * 0.5).min(600.0)).max(100.0)
}

pub fn draw_board(
    ctx: &CanvasRenderingContext2d,
    size: f64,
    hazards: &HazardTable,
    tokens: &[TokenView],
    bursts: &[EmojiBurst],
    now: f64,
) -> Result<(), JsValue> {
    let cell = size / f64::from(GRID_SIZE);
    ctx.clear_rect(0.0, 0.0, size, size);
    draw_cells(ctx, cell)?;
    for snake in hazards.snakes() {
        draw_snake(ctx, snake, cell)?;
    }
    for ladder in hazards.ladders() {
        draw_ladder(ctx, ladder, cell)?;
    }
    draw_tokens(ctx, tokens, cell)?;
    draw_bursts(ctx, bursts, cell, now)?;
    Ok(())
}

fn draw_cells(ctx: &CanvasRenderingContext2d, cell: f64) -> Result<(), JsValue> {
    ctx.set_font("14px Arial");
    ctx.set_text_align("left");
    ctx.set_text_baseline("top");
    for screen_row in 0..GRID_SIZE {
        for col in 0..GRID_SIZE {
            let x = f64::from(col) * cell;
            let y = f64::from(screen_row) * cell;
            let fill = if (screen_row + col) % 2 == 0 {
                CELL_DARK
            } else {
                CELL_LIGHT
            };
            ctx.set_fill_style_str(fill);
            ctx.fill_rect(x, y, cell, cell);
            ctx.set_stroke_style_str(GRID_LINE);
            ctx.set_line_width(1.0);
            ctx.stroke_rect(x, y, cell, cell);

            if let Some(number) = cell_at(GRID_SIZE - 1 - screen_row, col) {
                ctx.set_fill_style_str(CELL_NUMBER);
                ctx.fill_text(&number.to_string(), x + 5.0, y + 5.0)?;
            }
        }
    }
    // Gold rim on the finishing square.
    if let Some((cx, cy)) = cell_center(FINAL_CELL, cell) {
        ctx.set_stroke_style_str("rgba(255,210,120,0.55)");
        ctx.set_line_width(3.0);
        ctx.stroke_rect(cx - cell / 2.0 + 1.5, cy - cell / 2.0 + 1.5, cell - 3.0, cell - 3.0);
    }
    Ok(())
}

/// Organic snake: a cubic Bézier from head (start) to tail (end) bulging to one
/// side, striped body, eyes on the head.
fn draw_snake(ctx: &CanvasRenderingContext2d, snake: &Hazard, cell: f64) -> Result<(), JsValue> {
    let (Some((sx, sy)), Some((ex, ey))) = (
        cell_center(snake.start, cell),
        cell_center(snake.end, cell),
    ) else {
        return Ok(());
    };
    let dx = ex - sx;
    let dy = ey - sy;
    let distance = dx.hypot(dy);
    if distance == 0.0 {
        return Ok(());
    }
    let perp_x = -dy / distance;
    let perp_y = dx / distance;
    let bulge = distance * 0.3;
    let cp1 = (sx + dx * 0.25 + perp_x * bulge, sy + dy * 0.25 + perp_y * bulge);
    let cp2 = (
        sx + dx * 0.75 - perp_x * bulge * 0.5,
        sy + dy * 0.75 - perp_y * bulge * 0.5,
    );

    let body = ctx.create_linear_gradient(sx, sy, ex, ey);
    body.add_color_stop(0.0, "#ff8844")?;
    body.add_color_stop(0.5, "#ffaa44")?;
    body.add_color_stop(1.0, "#ff6644")?;
    ctx.set_stroke_style_canvas_gradient(&body);
    ctx.set_line_width(18.0);
    ctx.set_line_cap("round");
    ctx.set_line_join("round");
    let trace = || {
        ctx.begin_path();
        ctx.move_to(sx, sy);
        ctx.bezier_curve_to(cp1.0, cp1.1, cp2.0, cp2.1, ex, ey);
        ctx.stroke();
    };
    trace();
    ctx.set_stroke_style_str("rgba(200, 100, 50, 0.6)");
    ctx.set_line_width(14.0);
    trace();

    let head = ctx.create_radial_gradient(sx, sy, 0.0, sx, sy, 15.0)?;
    head.add_color_stop(0.0, "#ff6644")?;
    head.add_color_stop(1.0, "#cc4422")?;
    ctx.set_fill_style_canvas_gradient(&head);
    disc(ctx, sx, sy, 15.0)?;

    for (r, color) in [(3.0, "#ffffff"), (1.5, "#000000")] {
        ctx.set_fill_style_str(color);
        ctx.begin_path();
        ctx.arc(sx - 5.0, sy - 3.0, r, 0.0, TAU)?;
        ctx.arc(sx + 5.0, sy - 3.0, r, 0.0, TAU)?;
        ctx.fill();
    }

    let tail = ctx.create_radial_gradient(ex, ey, 0.0, ex, ey, 10.0)?;
    tail.add_color_stop(0.0, "#ffaa44")?;
    tail.add_color_stop(1.0, "#ff8844")?;
    ctx.set_fill_style_canvas_gradient(&tail);
    disc(ctx, ex, ey, 10.0)?;
    Ok(())
}

/// Two wooden rails with a drop shadow and evenly spaced rungs.
fn draw_ladder(
    ctx: &CanvasRenderingContext2d,
    ladder: &Hazard,
    cell: f64,
) -> Result<(), JsValue> {
    let (Some((sx, sy)), Some((ex, ey))) = (
        cell_center(ladder.start, cell),
        cell_center(ladder.end, cell),
    ) else {
        return Ok(());
    };
    let dx = ex - sx;
    let dy = ey - sy;
    let angle = dy.atan2(dx);
    let distance = dx.hypot(dy);
    let rail_offset = 12.0;
    let px = (angle + PI / 2.0).cos() * rail_offset;
    let py = (angle + PI / 2.0).sin() * rail_offset;

    ctx.set_stroke_style_str("rgba(0, 0, 0, 0.3)");
    ctx.set_line_width(10.0);
    ctx.set_line_cap("round");
    ctx.begin_path();
    ctx.move_to(sx - px + 2.0, sy - py + 2.0);
    ctx.line_to(ex - px + 2.0, ey - py + 2.0);
    ctx.move_to(sx + px + 2.0, sy + py + 2.0);
    ctx.line_to(ex + px + 2.0, ey + py + 2.0);
    ctx.stroke();

    let rail = ctx.create_linear_gradient(sx - px, sy - py, sx + px, sy + py);
    rail.add_color_stop(0.0, "#8B4513")?;
    rail.add_color_stop(0.5, "#A0522D")?;
    rail.add_color_stop(1.0, "#654321")?;
    ctx.set_stroke_style_canvas_gradient(&rail);
    ctx.set_line_width(8.0);
    for side in [-1.0, 1.0] {
        line(ctx, sx + side * px, sy + side * py, ex + side * px, ey + side * py);
    }

    let rungs = ((distance / 60.0).floor() as u32).max(5);
    for i in 0..=rungs {
        let t = f64::from(i) / f64::from(rungs);
        let rx = sx + dx * t;
        let ry = sy + dy * t;
        let rung = ctx.create_linear_gradient(rx - px, ry - py, rx + px, ry + py);
        rung.add_color_stop(0.0, "#CD853F")?;
        rung.add_color_stop(0.5, "#DEB887")?;
        rung.add_color_stop(1.0, "#CD853F")?;
        ctx.set_stroke_style_canvas_gradient(&rung);
        ctx.set_line_width(6.0);
        line(ctx, rx - px, ry - py, rx + px, ry + py);

        // highlight
        ctx.set_stroke_style_str("rgba(255, 255, 255, 0.3)");
        ctx.set_line_width(2.0);
        line(ctx, rx - px, ry - py, rx + px * 0.5, ry + py * 0.5);
    }
    Ok(())
}

/// Glowing "K" per player; tokens on the same cell fan out horizontally.
fn draw_tokens(
    ctx: &CanvasRenderingContext2d,
    tokens: &[TokenView],
    cell: f64,
) -> Result<(), JsValue> {
    ctx.set_font(&format!("bold {TOKEN_SIZE}px Arial"));
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    for (i, token) in tokens.iter().enumerate() {
        let Some((cx, cy)) = cell_center(token.cell, cell) else {
            continue; // not on the board yet
        };
        let sharing: Vec<usize> = tokens
            .iter()
            .enumerate()
            .filter(|(_, t)| t.cell == token.cell)
            .map(|(j, _)| j)
            .collect();
        let slot = sharing.iter().position(|&j| j == i).unwrap_or(0);
        let offset = (slot as f64 - sharing.len() as f64 / 2.0) * TOKEN_SPREAD;

        ctx.save();
        ctx.translate(cx + offset, cy)?;
        ctx.set_fill_style_str(token.color);
        ctx.fill_text("K", 0.0, 0.0)?;
        ctx.set_shadow_color(token.color);
        ctx.set_shadow_blur(10.0);
        ctx.fill_text("K", 0.0, 0.0)?;
        ctx.restore();
    }
    Ok(())
}

fn draw_bursts(
    ctx: &CanvasRenderingContext2d,
    bursts: &[EmojiBurst],
    cell: f64,
    now: f64,
) -> Result<(), JsValue> {
    ctx.set_font("28px sans-serif");
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    for burst in bursts {
        let Some((cx, cy)) = cell_center(burst.cell, cell) else {
            continue;
        };
        for (i, glyph) in burst.glyphs.iter().enumerate() {
            let Some(t) = burst.progress(i, now) else {
                continue;
            };
            let x = cx + (i as f64 - 1.0) * 18.0;
            let y = cy - t * cell * 0.8;
            ctx.set_global_alpha(1.0 - t);
            ctx.fill_text(glyph, x, y)?;
        }
    }
    ctx.set_global_alpha(1.0);
    Ok(())
}

/// Full-window confetti layer. Clears the canvas first.
pub fn draw_confetti(
    ctx: &CanvasRenderingContext2d,
    width: f64,
    height: f64,
    confetti: &Confetti,
) -> Result<(), JsValue> {
    ctx.clear_rect(0.0, 0.0, width, height);
    for p in confetti.active() {
        ctx.save();
        ctx.translate(p.x, p.y)?;
        ctx.rotate(p.rotation.to_radians())?;
        ctx.set_fill_style_str(p.color);
        ctx.fill_rect(-p.size / 2.0, -p.size / 2.0, p.size, p.size);
        ctx.restore();
    }
    Ok(())
}

fn disc(ctx: &CanvasRenderingContext2d, x: f64, y: f64, r: f64) -> Result<(), JsValue> {
    ctx.begin_path();
    ctx.arc(x, y, r, 0.0, TAU)?;
    ctx.fill();
    Ok(())
}

fn line(ctx: &CanvasRenderingContext2d, x1: f64, y1: f64, x2: f64, y2: f64) {
    ctx.begin_path();
    ctx.move_to(x1, y1);
    ctx.line_to(x2, y2);
    ctx.stroke();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canvas_fits_narrow_and_short_viewports() {
        assert_eq!(fit_canvas_size(1920.0, 1080.0), 600.0);
        assert_eq!(fit_canvas_size(800.0, 1080.0), 400.0);
        assert_eq!(fit_canvas_size(1920.0, 560.0), 400.0);
    }
}
