#![allow(dead_code)]
//! A puppet: one unit's sprites, skeleton and animations, ready to replay.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::data::{Animation, Skeleton, Vec2};
use crate::glitch::RandSeries;
use crate::part::PartState;
use crate::render::{Graphics, SpriteImage};

/// The replayable animations a unit ships, in pack order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimKind {
    Walk,
    Idle,
    Attack,
    Hitback,
    Enter,
    BurrowDown,
    BurrowMove,
    BurrowUp,
    Soul,
}

impl AnimKind {
    pub const ALL: [AnimKind; 9] = [
        AnimKind::Walk,
        AnimKind::Idle,
        AnimKind::Attack,
        AnimKind::Hitback,
        AnimKind::Enter,
        AnimKind::BurrowDown,
        AnimKind::BurrowMove,
        AnimKind::BurrowUp,
        AnimKind::Soul,
    ];

    /// Slot of this animation's table in a unit pack.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(i: usize) -> Option<AnimKind> {
        Self::ALL.get(i).copied()
    }

    /// Whether replay folds the frame counter back into range. One-shot
    /// actions wrap so scrubbing past the end starts them over; movement
    /// loops don't, their hosts drive the frame counter themselves.
    pub fn wraps(self) -> bool {
        matches!(
            self,
            AnimKind::Attack
                | AnimKind::Enter
                | AnimKind::BurrowDown
                | AnimKind::BurrowUp
                | AnimKind::Soul
        )
    }
}

/// One unit form, assembled and replayable.
///
/// Generic over the backend's image type so sliced sprites live inside the
/// puppet; drawing accepts any [`Graphics`] with the same image type.
pub struct Puppet<I> {
    skeleton: Arc<Skeleton>,
    sprites: Vec<I>,
    anims: Vec<Animation>,
    parts: Vec<PartState>,
    order: Vec<usize>,
    series: RandSeries,
    config: Config,
    sizer: Vec2,
    current: AnimKind,
    wrap: bool,
}

impl<I: SpriteImage> Puppet<I> {
    /// Assemble a puppet. Missing animation slots replay as empty
    /// single-frame animations.
    pub fn new(skeleton: Arc<Skeleton>, sprites: Vec<I>, anims: Vec<Animation>) -> Self {
        Self::with_series(skeleton, sprites, anims, RandSeries::new())
    }

    /// Like [`Puppet::new`] with a seeded random series, for deterministic
    /// replay captures and tests.
    pub fn with_seed(
        skeleton: Arc<Skeleton>,
        sprites: Vec<I>,
        anims: Vec<Animation>,
        seed: u64,
    ) -> Self {
        Self::with_series(skeleton, sprites, anims, RandSeries::with_seed(seed))
    }

    fn with_series(
        skeleton: Arc<Skeleton>,
        sprites: Vec<I>,
        mut anims: Vec<Animation>,
        series: RandSeries,
    ) -> Self {
        if anims.len() < AnimKind::ALL.len() {
            anims.resize_with(AnimKind::ALL.len(), Animation::default);
        }
        let parts = skeleton.arrange();
        for track in anims.iter().flat_map(|a| a.tracks.iter()) {
            if track.target(parts.len()).is_none() {
                log::warn!(
                    "track {:?} targets part {} outside the {}-part skeleton",
                    track.name,
                    track.part,
                    parts.len()
                );
            }
        }
        let order = (0..parts.len()).collect();
        let current = AnimKind::Walk;
        Self {
            skeleton,
            sprites,
            anims,
            parts,
            order,
            series,
            config: Config::default(),
            sizer: Vec2::ONE,
            current,
            wrap: current.wraps(),
        }
    }

    /// Switch the active animation. State carries over until the next
    /// evaluated frame resets or reassigns it, as replay expects.
    pub fn set_anim(&mut self, kind: AnimKind) {
        self.current = kind;
        self.wrap = kind.wraps();
    }

    pub fn current_anim(&self) -> AnimKind {
        self.current
    }

    /// Whether the active animation actually has tracks to play.
    pub fn active(&self) -> bool {
        !self.anims[self.current.index()].tracks.is_empty()
    }

    /// Length of the active animation in frames.
    pub fn duration(&self) -> i32 {
        self.anims[self.current.index()].len
    }

    /// Length of the active animation in milliseconds at the configured
    /// frame rate.
    pub fn duration_ms(&self) -> f32 {
        self.config.frame_to_ms(self.duration() as f32)
    }

    /// Evaluate the active animation at `frame`, updating every part.
    pub fn evaluate(&mut self, frame: f32) {
        self.anims[self.current.index()].evaluate(
            frame,
            &mut self.parts,
            &mut self.series,
            self.wrap,
        );
    }

    /// Draw the current part state in z order.
    pub fn draw<G: Graphics<Image = I>>(&mut self, g: &mut G) {
        let parts = &self.parts;
        self.order.sort_by_key(|&i| parts[i].z_order);
        for &i in &self.order {
            self.parts[i].draw(
                g,
                &self.sprites,
                &self.parts,
                &mut self.series,
                &self.config,
                self.sizer,
            );
        }
    }

    /// Evaluate `frame` and draw it.
    pub fn draw_frame<G: Graphics<Image = I>>(&mut self, g: &mut G, frame: f32) {
        self.evaluate(frame);
        self.draw(g);
    }

    /// Uniform scale applied on top of every part transform.
    pub fn set_size(&mut self, x: f32, y: f32) {
        self.sizer = Vec2::new(x, y);
    }

    pub fn size(&self) -> Vec2 {
        self.sizer
    }

    pub fn set_config(&mut self, config: Config) {
        self.config = config;
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Root scale of the model row, in units. Hosts use it to place the
    /// puppet on a baseline before drawing.
    pub fn base_size_x(&self) -> f32 {
        self.skeleton
            .parts
            .first()
            .map_or(0.0, |p| p.scale.x / self.skeleton.units.scale as f32)
    }

    pub fn base_size_y(&self) -> f32 {
        self.skeleton
            .parts
            .first()
            .map_or(0.0, |p| p.scale.y / self.skeleton.units.scale as f32)
    }

    pub fn parts(&self) -> &[PartState] {
        &self.parts
    }

    /// Part indices in the order the last draw used.
    pub fn draw_order(&self) -> &[usize] {
        &self.order
    }

    pub fn sprites(&self) -> &[I] {
        &self.sprites
    }

    pub fn skeleton(&self) -> &Skeleton {
        &self.skeleton
    }

    pub fn animations(&self) -> &[Animation] {
        &self.anims
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips_through_indices() {
        for (i, kind) in AnimKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
            assert_eq!(AnimKind::from_index(i), Some(*kind));
        }
        assert_eq!(AnimKind::from_index(9), None);
    }

    #[test]
    fn one_shot_kinds_wrap() {
        assert!(AnimKind::Attack.wraps());
        assert!(AnimKind::Soul.wraps());
        assert!(!AnimKind::Walk.wraps());
        assert!(!AnimKind::Idle.wraps());
        assert!(!AnimKind::Hitback.wraps());
        assert!(!AnimKind::BurrowMove.wraps());
    }
}
