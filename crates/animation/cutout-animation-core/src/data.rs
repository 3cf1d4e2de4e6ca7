#![allow(dead_code)]
//! Core data model: sprite cuts, skeleton parts, keyframe tracks.
//!
//! Everything here is plain data deserialized from the unit's three text
//! tables (see `tables`). Replay state lives in `part::PartState`; this
//! module only describes the rig.

use serde::{Deserialize, Serialize};

/// 2D vector in sheet/screen units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };
    pub const ONE: Vec2 = Vec2 { x: 1.0, y: 1.0 };

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl std::ops::Mul<f32> for Vec2 {
    type Output = Vec2;

    #[inline]
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl std::ops::Mul<Vec2> for Vec2 {
    type Output = Vec2;

    #[inline]
    fn mul(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x * rhs.x, self.y * rhs.y)
    }
}

impl std::ops::Neg for Vec2 {
    type Output = Vec2;

    #[inline]
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

/// One rectangle cut out of the unit's sprite sheet.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CutRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
    pub name: String,
}

impl CutRect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self {
            x,
            y,
            w,
            h,
            name: String::new(),
        }
    }
}

/// The unit's full cut table: sheet name plus every cut rectangle.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CutTable {
    pub sheet: String,
    pub cuts: Vec<CutRect>,
}

impl CutTable {
    pub fn len(&self) -> usize {
        self.cuts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cuts.is_empty()
    }

    /// Slice a loaded sheet into one image per cut. Degenerate cuts are
    /// clamped so every slot still yields an image.
    pub fn slice<I: crate::render::SpriteImage>(&self, sheet: &I) -> Vec<I> {
        let (sw, sh) = (sheet.width(), sheet.height());
        self.cuts
            .iter()
            .map(|c| {
                let x = (c.x as f32).clamp(0.0, (sw - 1.0).max(0.0));
                let y = (c.y as f32).clamp(0.0, (sh - 1.0).max(0.0));
                let w = (c.w as f32).clamp(1.0, (sw - x).max(1.0));
                let h = (c.h as f32).clamp(1.0, (sh - y).max(1.0));
                sheet.sub_image(x, y, w, h)
            })
            .collect()
    }
}

/// Measurement units the model's integer fields are expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitScales {
    /// Divisor for scale fields (a stored 1000 means 1.0).
    pub scale: i32,
    /// Divisor for angle fields (a full turn).
    pub angle: i32,
    /// Divisor for opacity fields (a stored 1000 means fully opaque).
    pub alpha: i32,
}

impl Default for UnitScales {
    fn default() -> Self {
        Self {
            scale: 1000,
            angle: 3600,
            alpha: 1000,
        }
    }
}

/// One skeleton part as stored in the model table (13 integer fields).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PartDescriptor {
    pub parent: i32,
    pub unit: i32,
    pub cut: i32,
    pub z_order: i32,
    pub pos: Vec2,
    pub pivot: Vec2,
    pub scale: Vec2,
    pub angle: i32,
    pub opacity: i32,
    pub glow: i32,
    pub name: String,
}

impl PartDescriptor {
    /// Build a part from its raw table row. Field order matches the stored
    /// layout: parent, unit id, cut index, z, pos, pivot, scale, angle,
    /// opacity, glow.
    pub fn from_row(row: [i32; 13], name: String) -> Self {
        Self {
            parent: row[0],
            unit: row[1],
            cut: row[2],
            z_order: row[3],
            pos: Vec2::new(row[4] as f32, row[5] as f32),
            pivot: Vec2::new(row[6] as f32, row[7] as f32),
            scale: Vec2::new(row[8] as f32, row[9] as f32),
            angle: row[10],
            opacity: row[11],
            glow: row[12],
            name,
        }
    }
}

/// One trailing config row of the model table (6 integer fields).
///
/// `values[0]` selects the anchor part (`-1` = self), `values[2]`/`values[3]`
/// offset the anchor pivot, the rest are carried through untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ModelConfig {
    pub values: [i32; 6],
    pub name: String,
}

/// The unit's skeleton: measurement units, parts, trailing config rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skeleton {
    pub units: UnitScales,
    pub parts: Vec<PartDescriptor>,
    pub configs: Vec<ModelConfig>,
}

impl Default for Skeleton {
    /// Minimal stand-in rig: a single root part showing cut 0 at scale 1.
    /// Used when a unit's model table is missing or unreadable.
    fn default() -> Self {
        Self {
            units: UnitScales::default(),
            parts: vec![PartDescriptor::from_row(
                [-1, -1, 0, 0, 0, 0, 0, 0, 1000, 1000, 0, 1000, 0],
                "default".to_owned(),
            )],
            configs: vec![ModelConfig {
                values: [0; 6],
                name: "default".to_owned(),
            }],
        }
    }
}

impl Skeleton {
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

/// Interpolation curve between two keyframes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Ease {
    #[default]
    Linear,
    /// Hold the first value until the next keyframe.
    Instant,
    /// Circular-arc warp; the keyframe's `ease_power` sets direction and
    /// exponent.
    Exponential,
    /// Lagrange fit through the surrounding run of polynomial keyframes.
    Polynomial,
    Sinusoidal,
}

impl Ease {
    /// Decode the stored curve id. Unknown ids fall back to `Linear` so a
    /// newer table still replays.
    pub fn from_wire(v: i32) -> Self {
        match v {
            1 => Ease::Instant,
            2 => Ease::Exponential,
            3 => Ease::Polynomial,
            4 => Ease::Sinusoidal,
            _ => Ease::Linear,
        }
    }
}

/// Which part attribute a track drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Modification {
    Parent,
    Id,
    Sprite,
    ZOrder,
    PosX,
    PosY,
    PivotX,
    PivotY,
    Scale,
    ScaleX,
    ScaleY,
    Angle,
    Opacity,
    HorizontalFlip,
    VerticalFlip,
    ExtentX,
    ExtentX2,
    ExtentY,
    ScaleMult,
    /// Attribute id this build does not know; applied as a no-op.
    Unknown(i32),
}

impl Modification {
    pub fn from_wire(v: i32) -> Self {
        match v {
            0 => Modification::Parent,
            1 => Modification::Id,
            2 => Modification::Sprite,
            3 => Modification::ZOrder,
            4 => Modification::PosX,
            5 => Modification::PosY,
            6 => Modification::PivotX,
            7 => Modification::PivotY,
            8 => Modification::Scale,
            9 => Modification::ScaleX,
            10 => Modification::ScaleY,
            11 => Modification::Angle,
            12 => Modification::Opacity,
            13 => Modification::HorizontalFlip,
            14 => Modification::VerticalFlip,
            50 => Modification::ExtentX,
            51 => Modification::ExtentX2,
            52 => Modification::ExtentY,
            53 => Modification::ScaleMult,
            other => Modification::Unknown(other),
        }
    }

    pub fn wire(&self) -> i32 {
        match self {
            Modification::Parent => 0,
            Modification::Id => 1,
            Modification::Sprite => 2,
            Modification::ZOrder => 3,
            Modification::PosX => 4,
            Modification::PosY => 5,
            Modification::PivotX => 6,
            Modification::PivotY => 7,
            Modification::Scale => 8,
            Modification::ScaleX => 9,
            Modification::ScaleY => 10,
            Modification::Angle => 11,
            Modification::Opacity => 12,
            Modification::HorizontalFlip => 13,
            Modification::VerticalFlip => 14,
            Modification::ExtentX => 50,
            Modification::ExtentX2 => 51,
            Modification::ExtentY => 52,
            Modification::ScaleMult => 53,
            Modification::Unknown(v) => *v,
        }
    }

    /// Whether values between keyframes are interpolated. Parent and Id
    /// reassignments always snap.
    #[inline]
    pub fn interpolates(&self) -> bool {
        self.wire() > 1
    }

    /// Flip tracks hold their value to the next keyframe regardless of the
    /// stored curve.
    #[inline]
    pub fn is_flip(&self) -> bool {
        matches!(
            self,
            Modification::HorizontalFlip | Modification::VerticalFlip
        )
    }
}

impl Default for Modification {
    fn default() -> Self {
        Modification::Id
    }
}

/// One keyframe: frame number, value, curve, curve parameter.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Keyframe {
    pub frame: i32,
    pub value: i32,
    pub ease: Ease,
    pub ease_power: i32,
}

impl Keyframe {
    /// Build a keyframe from its raw table row. Sprite indices can never be
    /// negative, so those are clamped to 0 here rather than at every lookup.
    pub fn from_row(row: [i32; 4], modification: Modification) -> Self {
        let value = if modification == Modification::Sprite && row[1] < 0 {
            0
        } else {
            row[1]
        };
        Self {
            frame: row[0],
            value,
            ease: Ease::from_wire(row[2]),
            ease_power: row[3],
        }
    }
}

/// One track: a target part, an attribute, a loop count and the keyframes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Track {
    pub part: i32,
    pub modification: Modification,
    pub loop_count: i32,
    pub name: String,
    pub frames: Vec<Keyframe>,
    /// Shift applied to every stored frame so the track starts at 0; kept to
    /// reconstruct absolute timing.
    pub offset: i32,
    /// First keyframe frame after shifting (0 unless the track is empty).
    pub first: i32,
    /// Last keyframe frame after shifting.
    pub last: i32,
}

impl Track {
    /// Assemble a track from its header and keyframe rows. Tracks that start
    /// late or loop get all their frames shifted so frame 0 is the first
    /// keyframe; the shift is kept in `offset`.
    pub fn new(
        part: i32,
        modification: Modification,
        loop_count: i32,
        name: String,
        mut frames: Vec<Keyframe>,
    ) -> Self {
        let mut offset = 0;
        if let Some(first) = frames.first() {
            if first.frame < 0 || loop_count != 1 {
                offset = -first.frame;
                for k in &mut frames {
                    k.frame += offset;
                }
            }
        }
        let first = frames.first().map_or(0, |k| k.frame);
        let last = frames.last().map_or(0, |k| k.frame);
        Self {
            part,
            modification,
            loop_count,
            name,
            frames,
            offset,
            first,
            last,
        }
    }

    /// Length of this track in frames, looping included.
    pub fn duration(&self) -> i32 {
        if self.frames.is_empty() {
            return 0;
        }
        if self.loop_count != -1 {
            if self.loop_count > 1 {
                self.first + (self.last - self.first) * self.loop_count - self.offset
            } else {
                self.last - self.offset
            }
        } else {
            self.last - self.offset.min(0)
        }
    }

    /// Span of one loop iteration.
    #[inline]
    pub fn span(&self) -> i32 {
        self.last - self.first
    }
}

/// One full animation: every track driving the skeleton.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    pub tracks: Vec<Track>,
    /// Total length in frames; at least 1 so an empty animation still ticks.
    pub len: i32,
}

impl Animation {
    pub fn new(tracks: Vec<Track>) -> Self {
        let len = tracks
            .iter()
            .map(Track::duration)
            .max()
            .unwrap_or(0)
            .max(1);
        Self { tracks, len }
    }
}

impl Default for Animation {
    fn default() -> Self {
        Animation::new(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(frame: i32, value: i32) -> Keyframe {
        Keyframe {
            frame,
            value,
            ease: Ease::Linear,
            ease_power: 0,
        }
    }

    #[test]
    fn track_offset_rule() {
        // loop 1, first frame >= 0: frames stay where they are
        let t = Track::new(0, Modification::PosX, 1, String::new(), vec![key(5, 0), key(10, 4)]);
        assert_eq!(t.offset, 0);
        assert_eq!((t.first, t.last), (5, 10));

        // negative first frame: shifted to start at 0
        let t = Track::new(0, Modification::PosX, 1, String::new(), vec![key(-3, 0), key(7, 4)]);
        assert_eq!(t.offset, 3);
        assert_eq!((t.first, t.last), (0, 10));

        // looping track: shifted even when it starts late
        let t = Track::new(0, Modification::PosX, 2, String::new(), vec![key(5, 0), key(10, 4)]);
        assert_eq!(t.offset, -5);
        assert_eq!((t.first, t.last), (0, 5));
    }

    #[test]
    fn track_duration() {
        let t = Track::new(0, Modification::PosX, 1, String::new(), vec![key(0, 0), key(10, 4)]);
        assert_eq!(t.duration(), 10);

        // loops multiply the span past the first key
        let t = Track::new(0, Modification::PosX, 3, String::new(), vec![key(5, 0), key(10, 4)]);
        assert_eq!(t.duration(), 20);

        // endless tracks count the shift back out, spanning to the
        // original last frame
        let t = Track::new(0, Modification::PosX, -1, String::new(), vec![key(5, 0), key(10, 4)]);
        assert_eq!(t.duration(), 10);
    }

    #[test]
    fn animation_len_is_at_least_one() {
        assert_eq!(Animation::default().len, 1);
        let t = Track::new(0, Modification::PosX, 1, String::new(), vec![key(0, 0), key(10, 4)]);
        assert_eq!(Animation::new(vec![t]).len, 10);
    }

    #[test]
    fn sprite_keyframes_clamp_negative_values() {
        let k = Keyframe::from_row([0, -4, 0, 0], Modification::Sprite);
        assert_eq!(k.value, 0);
        let k = Keyframe::from_row([0, -4, 0, 0], Modification::PosX);
        assert_eq!(k.value, -4);
    }

    #[test]
    fn unknown_wire_ids_are_preserved() {
        let m = Modification::from_wire(99);
        assert_eq!(m, Modification::Unknown(99));
        assert_eq!(m.wire(), 99);
        assert!(m.interpolates());
    }
}
