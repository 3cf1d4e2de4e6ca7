#![allow(dead_code)]
//! Replayable per-part state and its transform chain.
//!
//! `PartState` is the live counterpart of a `PartDescriptor` row: tracks
//! mutate it through [`PartState::apply`], frame 0 (and every wrap) puts it
//! back with [`PartState::reset`], and drawing composes size, opacity and
//! the transform chain up through the part's ancestors.

use crate::config::{Config, RANDOM_SLOT_BASE, RANDOM_SLOT_COUNT};
use crate::data::{ModelConfig, Modification, PartDescriptor, Skeleton, UnitScales, Vec2};
use crate::glitch::RandSeries;
use crate::render::{self, Graphics, SpriteImage};

/// How a part's extent fills space: repeat one sprite, or scatter the
/// 4-sprite pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtendMode {
    #[default]
    Tile,
    Random,
}

/// Sign with the flat-zero convention the anchor math relies on.
#[inline]
fn sign(v: f32) -> f32 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Live state of one skeleton part.
#[derive(Debug, Clone)]
pub struct PartState {
    index: usize,
    count: usize,
    base: PartDescriptor,
    units: UnitScales,
    anchor: Option<ModelConfig>,

    /// Parent slot, `None` for a detached root.
    pub parent: Option<usize>,
    /// Unit id; parts with a negative id are hidden.
    pub id: i32,
    /// Cut index into the sprite list; negative means nothing to draw.
    pub sprite: i32,
    /// Draw order; the part index is baked in so ordering is total.
    pub z_order: i64,
    pub pos: Vec2,
    pub pivot: Vec2,
    pub scale: Vec2,
    pub angle: i32,
    pub opacity: f32,
    pub glow: i32,
    /// Scale multiplier shared down the chain (the model's scale unit at
    /// rest).
    pub scale_mult: i32,
    pub flip_x: i32,
    pub flip_y: i32,
    pub extend_x: i32,
    pub extend_y: i32,
    pub extend_mode: ExtendMode,
}

impl PartState {
    /// Build the state slot for one model row. Starts out reset; replay
    /// resets again on every pass through frame 0.
    pub fn new(skeleton: &Skeleton, index: usize) -> Self {
        let mut state = Self {
            index,
            count: skeleton.parts.len(),
            base: skeleton.parts[index].clone(),
            units: skeleton.units,
            anchor: skeleton.configs.first().cloned(),
            parent: None,
            id: 0,
            sprite: 0,
            z_order: 0,
            pos: Vec2::ZERO,
            pivot: Vec2::ZERO,
            scale: Vec2::ZERO,
            angle: 0,
            opacity: 0.0,
            glow: 0,
            scale_mult: 0,
            flip_x: 1,
            flip_y: 1,
            extend_x: 0,
            extend_y: 0,
            extend_mode: ExtendMode::Tile,
        };
        state.reset();
        state
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn name(&self) -> &str {
        &self.base.name
    }

    pub fn descriptor(&self) -> &PartDescriptor {
        &self.base
    }

    /// Put every field back to the model row. Out-of-range parents fall
    /// back to the root slot; negative parents detach.
    pub fn reset(&mut self) {
        let parent = if self.base.parent >= self.count as i32 {
            0
        } else {
            self.base.parent
        };
        self.parent = (parent >= 0).then_some(parent as usize);
        self.id = self.base.unit;
        self.sprite = self.base.cut;
        self.z_order = self.base.z_order as i64 * self.count as i64 + self.index as i64;
        self.pos = self.base.pos;
        self.pivot = self.base.pivot;
        self.scale = self.base.scale;
        self.angle = self.base.angle;
        self.opacity = self.base.opacity as f32;
        self.glow = self.base.glow;
        self.scale_mult = self.units.scale;
        self.flip_x = 1;
        self.flip_y = 1;
        self.extend_x = 0;
        self.extend_y = 0;
        self.extend_mode = ExtendMode::Tile;
    }

    /// Apply one keyframe value. Position, pivot and angle values add to
    /// the model row; scale and opacity multiply it; the rest assign.
    pub fn apply(&mut self, m: Modification, v: i32, series: &mut RandSeries) {
        match m {
            Modification::Parent => {
                self.parent = if v >= 0 && v < self.count as i32 && v != self.index as i32 {
                    Some(v as usize)
                } else if self.index == 0 {
                    None
                } else {
                    Some(0)
                };
            }
            Modification::Id => self.id = v,
            Modification::Sprite => {
                if self.extend_mode == ExtendMode::Random && self.sprite != v {
                    series.advance();
                }
                self.sprite = v;
            }
            Modification::ZOrder => {
                self.z_order = v as i64 * self.count as i64 + self.index as i64;
            }
            Modification::PosX => self.pos.x = self.base.pos.x + v as f32,
            Modification::PosY => self.pos.y = self.base.pos.y + v as f32,
            Modification::PivotX => self.pivot.x = self.base.pivot.x + v as f32,
            Modification::PivotY => self.pivot.y = self.base.pivot.y + v as f32,
            Modification::Scale => {
                let unit = self.units.scale as f64;
                self.scale.x = (self.base.scale.x as f64 * v as f64 / unit) as f32;
                self.scale.y = (self.base.scale.y as f64 * v as f64 / unit) as f32;
            }
            Modification::ScaleX => {
                let unit = self.units.scale as f64;
                self.scale.x = (self.base.scale.x as f64 * v as f64 / unit) as f32;
            }
            Modification::ScaleY => {
                let unit = self.units.scale as f64;
                self.scale.y = (self.base.scale.y as f64 * v as f64 / unit) as f32;
            }
            Modification::Angle => self.angle = self.base.angle.saturating_add(v),
            Modification::Opacity => {
                self.opacity =
                    (v as f64 * self.base.opacity as f64 / self.units.alpha as f64) as f32;
            }
            Modification::HorizontalFlip => self.flip_x = if v == 0 { 1 } else { -1 },
            Modification::VerticalFlip => self.flip_y = if v == 0 { 1 } else { -1 },
            Modification::ExtentX => {
                self.extend_x = v;
                self.extend_mode = ExtendMode::Tile;
            }
            Modification::ExtentX2 => {
                self.extend_x = v;
                self.extend_mode = ExtendMode::Random;
            }
            Modification::ExtentY => {
                self.extend_y = v;
                self.extend_mode = ExtendMode::Tile;
            }
            Modification::ScaleMult => self.scale_mult = v,
            Modification::Unknown(id) => {
                log::warn!("ignoring keyframe for unknown attribute {id}");
            }
        }
    }

    /// Parent state, with direct self-loops treated as detached. Walks are
    /// additionally depth-capped by callers so reparenting cycles from
    /// hostile tables terminate.
    fn parent_state<'a>(&self, parts: &'a [PartState]) -> Option<&'a PartState> {
        let p = self.parent?;
        let parent = parts.get(p)?;
        (parent.index != self.index).then_some(parent)
    }

    /// Effective scale of this part: the product of every ancestor's scale
    /// and scale multiplier, in units squared.
    pub fn composed_size(&self, parts: &[PartState]) -> Vec2 {
        let mi = 1.0 / self.units.scale as f32;
        let mut size = self.scale * (self.scale_mult as f32 * mi * mi);
        let mut cur = self.parent_state(parts);
        let mut depth = parts.len();
        while let Some(p) = cur {
            if depth == 0 {
                break;
            }
            depth -= 1;
            let pmi = 1.0 / p.units.scale as f32;
            size = size * (p.scale * (p.scale_mult as f32 * pmi * pmi));
            cur = p.parent_state(parts);
        }
        size
    }

    /// Effective opacity in `[0, 1]`: the product up the parent chain, with
    /// an exactly-zero part short-circuiting to invisible.
    pub fn composed_opacity(&self, parts: &[PartState]) -> f32 {
        let mut o = 1.0f32;
        let mut cur = Some(self);
        let mut depth = parts.len() + 1;
        while let Some(p) = cur {
            if depth == 0 {
                break;
            }
            depth -= 1;
            if p.opacity == 0.0 {
                return 0.0;
            }
            o *= p.opacity / p.units.alpha as f32;
            cur = p.parent_state(parts);
        }
        o
    }

    /// Product of model-row scale signs from this part up to its root.
    fn chain_signs(&self, parts: &[PartState]) -> Vec2 {
        let mut v = Vec2::new(sign(self.base.scale.x), sign(self.base.scale.y));
        let mut cur = self.parent_state(parts);
        let mut depth = parts.len();
        while let Some(p) = cur {
            if depth == 0 {
                break;
            }
            depth -= 1;
            v = v * Vec2::new(sign(p.base.scale.x), sign(p.base.scale.y));
            cur = p.parent_state(parts);
        }
        v
    }

    /// Anchor reference size from the model's first config row: the anchor
    /// part's model-row scale in units, signed by its parent chain. Without
    /// config rows everything anchors at unit size; an anchor pointing
    /// outside the skeleton reads as the root row.
    pub fn base_size(&self, parts: &[PartState]) -> Vec2 {
        let Some(anchor) = &self.anchor else {
            return Vec2::ONE;
        };
        let mi = 1.0 / self.units.scale as f32;
        let sel = anchor.values[0];
        if sel == self.index as i32 {
            return Vec2::new(self.base.scale.x * mi, self.base.scale.y * mi);
        }
        let chosen = if sel >= 0 {
            parts.get(sel as usize)
        } else {
            None
        };
        match chosen {
            Some(p) => {
                p.chain_signs(parts) * Vec2::new(p.base.scale.x * mi, p.base.scale.y * mi)
            }
            None => match parts.first() {
                Some(root) => Vec2::new(root.base.scale.x * mi, root.base.scale.y * mi),
                None => Vec2::ONE,
            },
        }
    }

    /// Push this part's transform chain onto `g`, ancestors first. The
    /// first part anchors the whole puppet (config offset plus its own
    /// pivot); every other part translates by its scaled position and
    /// applies its flips.
    pub fn push_transform<G: Graphics>(&self, g: &mut G, parts: &[PartState], sizer: Vec2) {
        self.transform_inner(g, parts, sizer, parts.len());
    }

    fn transform_inner<G: Graphics>(
        &self,
        g: &mut G,
        parts: &[PartState],
        sizer: Vec2,
        depth: usize,
    ) {
        if depth > 0 {
            if let Some(p) = self.parent_state(parts) {
                p.transform_inner(g, parts, sizer, depth - 1);
            }
        }
        if self.index != 0 {
            let scaled = match self.parent_state(parts) {
                Some(p) => p.composed_size(parts) * sizer * self.pos,
                None => sizer * self.pos,
            };
            g.translate(scaled.x, scaled.y);
            g.scale(self.flip_x as f32, self.flip_y as f32);
        } else {
            if let Some(a) = &self.anchor {
                let origin = self.base_size(parts)
                    * Vec2::new(a.values[2] as f32, a.values[3] as f32)
                    * sizer;
                g.translate(-origin.x, -origin.y);
            }
            let pivot = self.composed_size(parts) * sizer * self.pivot;
            g.translate(pivot.x, pivot.y);
        }
        if self.angle != 0 && self.units.angle != 0 {
            g.rotate(std::f32::consts::TAU * self.angle as f32 / self.units.angle as f32);
        }
    }

    /// Draw this part: hidden parts are skipped, everything else pushes
    /// its transform and hands off to the tile fill.
    pub fn draw<G: Graphics>(
        &self,
        g: &mut G,
        sprites: &[G::Image],
        parts: &[PartState],
        series: &mut RandSeries,
        config: &Config,
        sizer: Vec2,
    ) {
        let opacity = self.composed_opacity(parts);
        if self.sprite < 0 || self.id < 0 || config.opacity_dead(opacity) {
            return;
        }
        let Some(image) = sprites.get(self.sprite as usize) else {
            return;
        };
        g.push_transform();
        self.push_transform(g, parts, sizer);
        let size = self.composed_size(parts);
        let piv = self.pivot * size * sizer;
        let sc = Vec2::new(image.width(), image.height()) * size * sizer;
        let unit = self.units.scale as f32;
        match self.extend_mode {
            ExtendMode::Tile => {
                render::draw_tiled(
                    g,
                    image,
                    config,
                    piv,
                    sc,
                    opacity,
                    self.glow,
                    self.extend_x as f32 / unit,
                    self.extend_y as f32 / unit,
                );
            }
            ExtendMode::Random => {
                let pool = RANDOM_SLOT_BASE..RANDOM_SLOT_BASE + RANDOM_SLOT_COUNT;
                if let Some(pool) = sprites.get(pool) {
                    render::draw_random(
                        g,
                        pool,
                        config,
                        series,
                        piv,
                        sc,
                        opacity,
                        self.glow == 1,
                        self.extend_x as f32 / unit,
                    );
                }
            }
        }
        g.pop_transform();
    }
}

impl Skeleton {
    /// Instantiate the replayable state for every part.
    pub fn arrange(&self) -> Vec<PartState> {
        (0..self.parts.len())
            .map(|i| PartState::new(self, i))
            .collect()
    }
}
