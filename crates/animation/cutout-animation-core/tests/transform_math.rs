//! Draw-path checks through a recording backend: transform chains, z
//! ordering, tile fills and composites, verified against hand-computed
//! screen positions.

use std::sync::Arc;

use cutout_animation_core::render::{draw_random, draw_tiled};
use cutout_animation_core::{
    Affine2D, Animation, AnimKind, BlendMode, Config, Ease, Graphics, Keyframe, ModelConfig,
    Modification, PartDescriptor, Puppet, RandSeries, Skeleton, SpriteImage, Track, UnitPack,
    UnitScales, Vec2,
};
use cutout_test_fixtures as fixtures;

/// Stand-in image: a rectangle remembering where on the sheet it came from.
#[derive(Debug, Clone, PartialEq)]
struct TestImage {
    x: f32,
    y: f32,
    w: f32,
    h: f32,
}

impl TestImage {
    fn sheet(w: f32, h: f32) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            w,
            h,
        }
    }
}

impl SpriteImage for TestImage {
    fn width(&self) -> f32 {
        self.w
    }

    fn height(&self) -> f32 {
        self.h
    }

    fn sub_image(&self, x: f32, y: f32, w: f32, h: f32) -> Self {
        TestImage {
            x: self.x + x,
            y: self.y + y,
            w,
            h,
        }
    }
}

#[derive(Debug)]
struct DrawCall {
    image: TestImage,
    origin: (f32, f32),
    w: f32,
    h: f32,
    composite: (BlendMode, f32, i32),
}

/// Backend that records every draw with its resolved screen origin.
#[derive(Default)]
struct RecGraphics {
    stack: Vec<Affine2D>,
    cur: Affine2D,
    composite: (BlendMode, f32, i32),
    calls: Vec<DrawCall>,
}

impl Graphics for RecGraphics {
    type Image = TestImage;

    fn push_transform(&mut self) {
        self.stack.push(self.cur);
    }

    fn pop_transform(&mut self) {
        self.cur = self.stack.pop().unwrap_or_default();
    }

    fn translate(&mut self, x: f32, y: f32) {
        self.cur.translate(x, y);
    }

    fn rotate(&mut self, radians: f32) {
        self.cur.rotate(radians);
    }

    fn scale(&mut self, x: f32, y: f32) {
        self.cur.scale(x, y);
    }

    fn set_composite(&mut self, mode: BlendMode, alpha: f32, glow: i32) {
        self.composite = (mode, alpha, glow);
    }

    fn draw_image(&mut self, image: &TestImage, x: f32, y: f32, w: f32, h: f32) {
        self.calls.push(DrawCall {
            image: image.clone(),
            origin: self.cur.apply(x, y),
            w,
            h,
            composite: self.composite,
        });
    }
}

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-4
}

fn assert_origin(call: &DrawCall, x: f32, y: f32) {
    assert!(
        close(call.origin.0, x) && close(call.origin.1, y),
        "origin {:?}, expected ({x}, {y})",
        call.origin
    );
}

fn cat_puppet() -> Puppet<TestImage> {
    let json = fixtures::packs::json("cat").unwrap();
    let pack = UnitPack::parse(&json).unwrap();
    pack.form("")
        .unwrap()
        .puppet(&TestImage::sheet(256.0, 128.0))
}

/// Two-part rig for focused transform tests: a hidden root and one child.
fn mini_puppet(child: [i32; 13], configs: Vec<ModelConfig>, anim: Animation) -> Puppet<TestImage> {
    let skeleton = Skeleton {
        units: UnitScales::default(),
        parts: vec![
            PartDescriptor::from_row(
                [-1, -1, 0, 0, 0, 0, 0, 0, 1000, 1000, 0, 1000, 0],
                "root".to_owned(),
            ),
            PartDescriptor::from_row(child, "part".to_owned()),
        ],
        configs,
    };
    Puppet::with_seed(
        Arc::new(skeleton),
        vec![TestImage::sheet(4.0, 5.0)],
        vec![anim],
        1,
    )
}

fn one_key_track(m: Modification, value: i32) -> Animation {
    Animation::new(vec![Track::new(
        1,
        m,
        1,
        String::new(),
        vec![Keyframe {
            frame: 0,
            value,
            ease: Ease::Linear,
            ease_power: 0,
        }],
    )])
}

#[test]
fn puppet_draws_visible_parts_in_z_order() {
    let mut puppet = cat_puppet();
    let mut g = RecGraphics::default();
    puppet.draw_frame(&mut g, 0.0);

    // the root is hidden; leg (z 3) under body (z 5) under head (z 10)
    assert_eq!(g.calls.len(), 3);
    assert_eq!(puppet.draw_order(), [0, 3, 1, 2]);
    assert_eq!((g.calls[0].image.w, g.calls[0].image.h), (24.0, 16.0));
    assert_eq!((g.calls[1].image.w, g.calls[1].image.h), (64.0, 48.0));
    assert_eq!((g.calls[2].image.w, g.calls[2].image.h), (32.0, 32.0));
    // sliced images carry their sheet offsets
    assert_eq!(g.calls[0].image.x, 96.0);
    assert_eq!(g.calls[2].image.x, 64.0);
}

#[test]
fn parts_land_at_their_model_positions() {
    let mut puppet = cat_puppet();
    let mut g = RecGraphics::default();
    puppet.draw_frame(&mut g, 0.0);

    // leg: body offset (0,60) + leg offset (-12,20) - pivot (12,8)
    assert_origin(&g.calls[0], -24.0, 72.0);
    assert_eq!((g.calls[0].w, g.calls[0].h), (24.0, 16.0));
    // body: offset (0,60) - pivot (32,24)
    assert_origin(&g.calls[1], -32.0, 36.0);
    // head: body offset + (10,-30) - pivot (16,16), no sway at frame 0
    assert_origin(&g.calls[2], -6.0, 14.0);
}

#[test]
fn evaluated_frames_move_the_draw() {
    let mut puppet = cat_puppet();
    let mut g = RecGraphics::default();
    puppet.draw_frame(&mut g, 5.0);

    // frame 5 lifts the leg keyframe by 8; the body bob still floors to 0
    assert_origin(&g.calls[0], -24.0, 80.0);
    assert_origin(&g.calls[1], -32.0, 36.0);
}

#[test]
fn sizer_scales_offsets_pivots_and_sprites() {
    let mut puppet = cat_puppet();
    puppet.set_size(2.0, 2.0);
    let mut g = RecGraphics::default();
    puppet.draw_frame(&mut g, 0.0);

    assert_origin(&g.calls[1], -64.0, 72.0);
    assert_eq!((g.calls[1].w, g.calls[1].h), (128.0, 96.0));
}

#[test]
fn angle_rotates_around_the_part_origin() {
    // a quarter turn in model units is 900 of 3600
    let mut puppet = mini_puppet(
        [0, 0, 0, 0, 0, 0, 2, 3, 1000, 1000, 0, 1000, 0],
        Vec::new(),
        one_key_track(Modification::Angle, 900),
    );
    let mut g = RecGraphics::default();
    puppet.draw_frame(&mut g, 0.0);

    assert_eq!(g.calls.len(), 1);
    // the pivot corner (-2,-3) rotates 90 degrees to (3,-2)
    assert_origin(&g.calls[0], 3.0, -2.0);
}

#[test]
fn horizontal_flip_mirrors_the_local_frame() {
    let child = [0, 0, 0, 0, 5, 0, 2, 0, 1000, 1000, 0, 1000, 0];
    let mut flipped = mini_puppet(
        child,
        Vec::new(),
        one_key_track(Modification::HorizontalFlip, 1),
    );
    let mut g = RecGraphics::default();
    flipped.draw_frame(&mut g, 0.0);
    assert_origin(&g.calls[0], 7.0, 0.0);

    let mut plain = mini_puppet(child, Vec::new(), Animation::default());
    let mut g = RecGraphics::default();
    plain.draw_frame(&mut g, 0.0);
    assert_origin(&g.calls[0], 3.0, 0.0);
}

#[test]
fn anchor_config_shifts_the_whole_puppet() {
    let mut puppet = mini_puppet(
        [0, 0, 0, 0, 0, 0, 0, 0, 1000, 1000, 0, 1000, 0],
        vec![ModelConfig {
            values: [-1, 0, 100, 50, 0, 0],
            name: String::new(),
        }],
        Animation::default(),
    );
    let mut g = RecGraphics::default();
    puppet.draw_frame(&mut g, 0.0);

    assert_origin(&g.calls[0], -100.0, -50.0);
    assert_eq!((g.calls[0].w, g.calls[0].h), (4.0, 5.0));
}

#[test]
fn tiling_covers_whole_tiles_and_remainders() {
    let mut g = RecGraphics::default();
    let img = TestImage::sheet(10.0, 10.0);
    let cfg = Config::default();
    draw_tiled(
        &mut g,
        &img,
        &cfg,
        Vec2::ZERO,
        Vec2::new(10.0, 10.0),
        1.0,
        0,
        2.5,
        2.5,
    );

    // 2x2 whole tiles, a right column, a bottom row, and the corner
    assert_eq!(g.calls.len(), 9);
    let summary: Vec<((f32, f32), f32, f32)> = g
        .calls
        .iter()
        .map(|c| (c.origin, c.image.w, c.image.h))
        .collect();
    assert_eq!(
        summary,
        vec![
            ((0.0, 0.0), 10.0, 10.0),
            ((10.0, 0.0), 10.0, 10.0),
            ((0.0, 10.0), 10.0, 10.0),
            ((10.0, 10.0), 10.0, 10.0),
            ((20.0, 0.0), 5.0, 10.0),
            ((20.0, 10.0), 5.0, 10.0),
            ((0.0, 20.0), 10.0, 5.0),
            ((10.0, 20.0), 10.0, 5.0),
            ((20.0, 20.0), 5.0, 5.0),
        ]
    );
    // remainders draw at the fractional size
    assert_eq!((g.calls[4].w, g.calls[4].h), (5.0, 10.0));
    assert_eq!((g.calls[8].w, g.calls[8].h), (5.0, 5.0));
    assert!(g
        .calls
        .iter()
        .all(|c| c.composite == (BlendMode::Default, 0.0, 0)));
}

#[test]
fn horizontal_extent_tiles_one_strip() {
    let mut g = RecGraphics::default();
    let img = TestImage::sheet(10.0, 10.0);
    let cfg = Config::default();
    draw_tiled(
        &mut g,
        &img,
        &cfg,
        Vec2::ZERO,
        Vec2::new(10.0, 10.0),
        1.0,
        0,
        1.5,
        0.0,
    );

    assert_eq!(g.calls.len(), 2);
    assert_origin(&g.calls[0], 0.0, 0.0);
    assert_origin(&g.calls[1], 10.0, 0.0);
    assert_eq!(g.calls[1].image.w, 5.0);
    assert_eq!((g.calls[1].w, g.calls[1].h), (5.0, 10.0));
}

#[test]
fn random_fill_picks_tiles_from_the_pool() {
    let pool: Vec<TestImage> = (0..4)
        .map(|i| TestImage {
            x: 0.0,
            y: 0.0,
            w: 11.0 + i as f32,
            h: 10.0,
        })
        .collect();
    let cfg = Config::default();
    let mut series = RandSeries::with_seed(7);
    let mut probe = series.clone();
    let picks: Vec<usize> = (0..3).map(|i| probe.pick(i)).collect();

    let mut g = RecGraphics::default();
    draw_random(
        &mut g,
        &pool,
        &cfg,
        &mut series,
        Vec2::ZERO,
        Vec2::new(10.0, 10.0),
        1.0,
        false,
        3.5,
    );

    assert_eq!(g.calls.len(), 4);
    for (j, pick) in picks.iter().enumerate() {
        assert_eq!(g.calls[j].image.w, pool[*pick].w, "tile {j}");
        assert_origin(&g.calls[j], 10.0 * j as f32, 0.0);
    }
    // the remainder strip always cuts the pool's first sprite
    assert_eq!(g.calls[3].image.w, 5.0);
    assert_origin(&g.calls[3], 30.0, 0.0);
    assert_eq!((g.calls[3].w, g.calls[3].h), (5.0, 10.0));

    // rotating the series shifts every tile one slot down the pool
    series.advance();
    let mut g = RecGraphics::default();
    draw_random(
        &mut g,
        &pool,
        &cfg,
        &mut series,
        Vec2::ZERO,
        Vec2::new(10.0, 10.0),
        1.0,
        false,
        3.5,
    );
    for (j, pick) in picks.iter().enumerate() {
        assert_eq!(g.calls[j].image.w, pool[(pick + 1) % 4].w, "rotated tile {j}");
    }
    assert_eq!(g.calls[3].image.w, 5.0);
}

#[test]
fn composites_follow_opacity_and_glow() {
    let img = TestImage::sheet(10.0, 10.0);
    let cfg = Config::default();

    let mut g = RecGraphics::default();
    draw_tiled(&mut g, &img, &cfg, Vec2::ZERO, Vec2::ONE, 0.5, 0, 0.0, 0.0);
    assert_eq!(g.calls[0].composite, (BlendMode::Translucent, 0.5, 0));

    let mut g = RecGraphics::default();
    draw_tiled(&mut g, &img, &cfg, Vec2::ZERO, Vec2::ONE, 1.0, 2, 0.0, 0.0);
    assert_eq!(g.calls[0].composite, (BlendMode::Blend, 1.0, 2));

    let mut g = RecGraphics::default();
    draw_tiled(&mut g, &img, &cfg, Vec2::ZERO, Vec2::ONE, 0.5, -1, 0.0, 0.0);
    assert_eq!(g.calls[0].composite, (BlendMode::Blend, 0.5, -1));

    let mut g = RecGraphics::default();
    let mut series = RandSeries::with_seed(7);
    let pool = vec![img.clone()];
    draw_random(
        &mut g,
        &pool,
        &cfg,
        &mut series,
        Vec2::ZERO,
        Vec2::ONE,
        0.5,
        true,
        0.0,
    );
    assert_eq!(g.calls[0].composite, (BlendMode::Blend, 0.5, 1));
}

#[test]
fn puppet_reports_durations_per_animation() {
    let mut puppet = cat_puppet();
    assert_eq!(puppet.current_anim(), AnimKind::Walk);
    assert!(puppet.active());
    assert_eq!(puppet.duration(), 20);
    assert!(close(puppet.duration_ms(), 20_000.0 / 30.0));

    puppet.set_anim(AnimKind::Attack);
    assert_eq!(puppet.duration(), 12);
    assert_eq!(puppet.duration_ms(), 400.0);

    // slots without a shipped table replay as empty one-frame animations
    puppet.set_anim(AnimKind::Soul);
    assert!(!puppet.active());
    assert_eq!(puppet.duration(), 1);

    assert!(close(puppet.base_size_x(), 1.0));
    assert!(close(puppet.base_size_y(), 1.0));
}
