#![allow(dead_code)]
//! Renderer-facing traits and the tile fill routines.
//!
//! The core never talks to a concrete backend: puppets draw through
//! [`Graphics`], and sprites are whatever the backend's [`SpriteImage`]
//! type is. The fill routines below reproduce the tile walk of the game's
//! renderer, fractional remainder column/row/corner included.

use crate::config::Config;
use crate::data::Vec2;
use crate::glitch::RandSeries;

/// Hard cap on tile fills so a corrupt extent cannot hang a renderer.
pub const MAX_TILES: u32 = 4096;

/// Composite modes a backend must support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    #[default]
    None,
    Default,
    Translucent,
    Blend,
}

/// A drawable sprite, or a sub-rectangle of one.
pub trait SpriteImage {
    fn width(&self) -> f32;
    fn height(&self) -> f32;
    /// Cut a sub-rectangle in pixel units.
    fn sub_image(&self, x: f32, y: f32, w: f32, h: f32) -> Self;
}

/// Drawing backend. Transform state is a stack so each part can save and
/// restore around its local chain.
pub trait Graphics {
    type Image: SpriteImage;

    fn push_transform(&mut self);
    fn pop_transform(&mut self);
    fn translate(&mut self, x: f32, y: f32);
    fn rotate(&mut self, radians: f32);
    fn scale(&mut self, x: f32, y: f32);
    /// Select the composite for subsequent draws. `alpha` is in `[0, 1]`;
    /// `glow` carries the model's glow mode through to the backend.
    fn set_composite(&mut self, mode: BlendMode, alpha: f32, glow: i32);
    fn draw_image(&mut self, image: &Self::Image, x: f32, y: f32, w: f32, h: f32);
}

/// Composite for a plain part: glow modes the backend understands blend,
/// faded parts go translucent, everything else draws straight.
fn pick_composite<G: Graphics>(g: &mut G, config: &Config, opacity: f32, glow: i32) {
    let glow_support = (1..=3).contains(&glow) || glow == -1;
    if config.opacity_translucent(opacity) {
        if glow_support {
            g.set_composite(BlendMode::Blend, opacity, glow);
        } else {
            g.set_composite(BlendMode::Translucent, opacity, 0);
        }
    } else if glow_support {
        g.set_composite(BlendMode::Blend, 1.0, glow);
    } else {
        g.set_composite(BlendMode::Default, 0.0, 0);
    }
}

/// Draw one sprite, tiled when the extents ask for it.
///
/// Extents count tiles of the scaled sprite size. Whole tiles repeat the
/// full sprite; the fractional remainder becomes a partial strip cut from
/// the sprite's left/top edge, with a corner piece where both axes have a
/// remainder.
#[allow(clippy::too_many_arguments)]
pub fn draw_tiled<G: Graphics>(
    g: &mut G,
    image: &G::Image,
    config: &Config,
    piv: Vec2,
    sc: Vec2,
    opacity: f32,
    glow: i32,
    mut ex: f32,
    mut ey: f32,
) {
    pick_composite(g, config, opacity, glow);
    if !ex.is_finite() || !ey.is_finite() {
        ex = 0.0;
        ey = 0.0;
    }
    if ex == 0.0 && ey == 0.0 {
        g.draw_image(image, -piv.x, -piv.y, sc.x, sc.y);
        return;
    }

    let mut x = -piv.x;
    let mut y = -piv.y;
    let mut old_ey = ey;
    let mut old_ex = ex;
    let mut budget = MAX_TILES;

    if ey == 0.0 {
        while ex > 1.0 && budget > 0 {
            g.draw_image(image, x, y, sc.x, sc.y);
            x += sc.x;
            ex -= 1.0;
            budget -= 1;
        }
    } else {
        let ex_row = ex;
        while ey > 1.0 && budget > 0 {
            if ex == 0.0 {
                g.draw_image(image, x, y, sc.x, sc.y);
                budget -= 1;
            } else {
                x = -piv.x;
                ex = ex_row;
                while ex > 1.0 && budget > 0 {
                    g.draw_image(image, x, y, sc.x, sc.y);
                    x += sc.x;
                    ex -= 1.0;
                    budget -= 1;
                }
            }
            y += sc.y;
            ey -= 1.0;
        }
    }

    let w = image.width();
    let h = image.height();
    if w <= 0.0 {
        return;
    }
    if ey == 0.0 {
        let par_x = image.sub_image(0.0, 0.0, (w * ex).max(1.0).trunc().min(w), h);
        g.draw_image(&par_x, x, y, sc.x * ex, sc.y);
    } else {
        let par_y = image.sub_image(0.0, 0.0, w, (h * ey).max(1.0).trunc().min(h));
        if ex == 0.0 {
            g.draw_image(&par_y, x, y, sc.x, sc.y * ey);
        } else {
            let par_x = image.sub_image(0.0, 0.0, (w * ex).max(1.0).trunc().min(w), h);
            let par_xy = image.sub_image(0.0, 0.0, par_x.width(), par_y.height());

            // right column of horizontal remainders
            y = -piv.y;
            while old_ey > 1.0 && budget > 0 {
                g.draw_image(&par_x, x, y, sc.x * ex, sc.y);
                y += sc.y;
                old_ey -= 1.0;
                budget -= 1;
            }
            // bottom row of vertical remainders
            x = -piv.x;
            while old_ex > 1.0 && budget > 0 {
                g.draw_image(&par_y, x, y, sc.x, sc.y * ey);
                x += sc.x;
                old_ex -= 1.0;
                budget -= 1;
            }
            // and the corner where both remainders meet
            g.draw_image(&par_xy, x, y, sc.x * ex, sc.y * ey);
        }
    }
}

/// Draw a random-mode part: each whole tile picks its sprite from the
/// 4-slot pool via the series, the remainder strip always comes from the
/// pool's first sprite. The vertical extent plays no role in this mode.
#[allow(clippy::too_many_arguments)]
pub fn draw_random<G: Graphics>(
    g: &mut G,
    pool: &[G::Image],
    config: &Config,
    series: &mut RandSeries,
    piv: Vec2,
    sc: Vec2,
    opacity: f32,
    glow: bool,
    mut ex: f32,
) {
    if config.opacity_translucent(opacity) {
        if glow {
            g.set_composite(BlendMode::Blend, opacity, 1);
        } else {
            g.set_composite(BlendMode::Translucent, opacity, 0);
        }
    } else if glow {
        g.set_composite(BlendMode::Blend, 1.0, 1);
    } else {
        g.set_composite(BlendMode::Default, 0.0, 0);
    }

    let Some(first) = pool.first() else { return };
    if !ex.is_finite() {
        ex = 0.0;
    }
    if ex == 0.0 {
        g.draw_image(first, -piv.x, -piv.y, sc.x, sc.y);
        return;
    }

    let mut x = -piv.x;
    let mut i = 0usize;
    let mut budget = MAX_TILES;
    while ex > 1.0 && budget > 0 {
        let slot = series.pick(i).min(pool.len() - 1);
        g.draw_image(&pool[slot], x, -piv.y, sc.x, sc.y);
        x += sc.x;
        ex -= 1.0;
        i += 1;
        budget -= 1;
    }

    let w = (first.width() * ex).floor();
    if w > 0.0 {
        let par = first.sub_image(0.0, 0.0, w.min(first.width()), first.height());
        g.draw_image(&par, x, -piv.y, sc.x * ex, sc.y);
    }
}
