#![allow(dead_code)]
//! Cutout animation replay core (renderer-agnostic)
//!
//! Parses the three line-oriented tables of a cutout-animated unit (sprite
//! cuts, skeleton parts, keyframe tracks) and replays any frame number into
//! full per-part visual state: position, scale, rotation, opacity, flip,
//! sprite index and tiling. Rendering goes through the `Graphics` and
//! `SpriteImage` traits so the core never touches a concrete backend.

pub mod affine;
pub mod config;
pub mod data;
pub mod ease;
pub mod glitch;
pub mod pack;
pub mod part;
pub mod puppet;
pub mod render;
pub mod sampling;
pub mod tables;

// Re-exports for consumers (adapters)
pub use affine::Affine2D;
pub use config::Config;
pub use data::{
    Animation, CutRect, CutTable, Ease, Keyframe, ModelConfig, Modification, PartDescriptor,
    Skeleton, Track, UnitScales, Vec2,
};
pub use glitch::RandSeries;
pub use pack::{FormTables, UnitPack};
pub use part::{ExtendMode, PartState};
pub use puppet::{AnimKind, Puppet};
pub use render::{BlendMode, Graphics, SpriteImage};
pub use tables::{LineStream, ParseError, StrLineStream};
