use std::fmt;

use crate::geometry::{self, Body, Point, Side, Wing};
use crate::surface::Surface;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self { Self { r, g, b, a } }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

#[derive(Debug, Clone)]
pub struct BirdConfig {
    /// Scales frame timestamps into oscillation phase.
    pub update_rate: f64,
    /// Frames to wait before the first speed change in variable speed mode.
    pub speed_change_on_frame: f64,
    pub variable_speed: bool,

    pub wing_width: f64,
    pub wing_pinch: f64,
    pub wing_tip_length: f64,
    pub wing_length: f64,

    /// Vertical amplitude of the body bob.
    pub body_movement: f64,

    pub body_color: Color,
    pub wing_color: Color,
    pub background: Color,
}

impl Default for BirdConfig {
    fn default() -> Self {
        Self {
            update_rate: 0.002,
            speed_change_on_frame: 100.0,
            variable_speed: false,
            wing_width: 75.0,
            wing_pinch: 10.0,
            wing_tip_length: 100.0,
            wing_length: 10.0,
            body_movement: 5.0,
            body_color: Color::rgba(50, 50, 50, 1.0),
            wing_color: Color::rgba(0, 0, 0, 1.0),
            background: Color::rgba(255, 255, 255, 1.0),
        }
    }
}

/// Re-rolled rates never exceed this.
pub const MAX_UPDATE_RATE: f64 = 0.03;

pub struct AnimatedBird {
    origin: Point,
    width: f64,
    height: f64,
    config: BirdConfig,

    original_body: Body,
    body: Body,
    left_wing: Wing,
    right_wing: Wing,

    update_rate: f64,
    speed_change_on_frame: f64,
    frames: u32,
    rng: fastrand::Rng,
}

impl AnimatedBird {
    /// `width` and `height` default to the whole surface.
    pub fn new(surface: &impl Surface, x: f64, y: f64, width: Option<f64>, height: Option<f64>) -> Self {
        Self::with_config(surface, x, y, width, height, BirdConfig::default())
    }

    pub fn with_config(
        surface: &impl Surface,
        x: f64,
        y: f64,
        width: Option<f64>,
        height: Option<f64>,
        config: BirdConfig,
    ) -> Self {
        let origin = Point::new(x, y);
        let width = width.unwrap_or_else(|| surface.width());
        let height = height.unwrap_or_else(|| surface.height());

        let mut bird = Self {
            origin,
            width,
            height,
            update_rate: config.update_rate,
            speed_change_on_frame: config.speed_change_on_frame,
            config,
            original_body: Default::default(),
            body: Default::default(),
            left_wing: Default::default(),
            right_wing: Default::default(),
            frames: 0,
            rng: fastrand::Rng::new(),
        };
        bird.make_body(x, y, width, height);
        bird.make_wing(Side::Left);
        bird.make_wing(Side::Right);
        bird
    }

    pub fn with_seed(self, seed: u64) -> Self {
        self.rng.seed(seed);
        self
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn config(&self) -> &BirdConfig {
        &self.config
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    pub fn original_body(&self) -> &Body {
        &self.original_body
    }

    pub fn wing(&self, side: Side) -> &Wing {
        match side {
            Side::Left => &self.left_wing,
            Side::Right => &self.right_wing,
        }
    }

    fn wing_mut(&mut self, side: Side) -> &mut Wing {
        match side {
            Side::Left => &mut self.left_wing,
            Side::Right => &mut self.right_wing,
        }
    }

    pub fn update_rate(&self) -> f64 {
        self.update_rate
    }

    pub fn speed_change_on_frame(&self) -> f64 {
        self.speed_change_on_frame
    }

    pub fn frames(&self) -> u32 {
        self.frames
    }

    fn center(&self) -> Point {
        Point::new(
            self.origin.x + self.width / 2.0,
            self.origin.y + self.height / 2.0,
        )
    }

    fn rest_wing(&self) -> Wing {
        let c = self.center();
        geometry::make_wing(
            c.x,
            c.y,
            self.config.wing_width,
            self.config.wing_pinch,
            self.config.wing_length,
            self.config.wing_tip_length,
        )
    }

    /// Resets both the rest pose and the live body to a triangle in the given box.
    pub fn make_body(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.original_body = geometry::make_body(x, y, w, h);
        self.body = self.original_body;
    }

    pub fn make_wing(&mut self, side: Side) {
        let wing = self.rest_wing();
        *self.wing_mut(side) = wing;
    }

    fn bob(&self, phase: f64) -> f64 {
        -phase.sin() * self.config.body_movement
    }

    pub fn update_body(&mut self, now: f64) {
        let offset = self.bob(now * self.update_rate);

        for (point, rest) in self.body.iter_mut().zip(self.original_body.iter()) {
            point.y = rest.y + offset;
        }
    }

    pub fn update_wing(&mut self, side: Side, now: f64) {
        let phase = now * self.update_rate;
        let increment = side.phase_increment();
        let offset = self.bob(phase);
        let rest = self.rest_wing();
        let c = self.center();
        let wing_length = self.config.wing_length;
        let tip_length = self.config.wing_tip_length;

        let wing = self.wing_mut(side);

        wing[0].y = rest[0].y + offset;
        wing[1].y = rest[1].y + offset;

        for i in [2, 3] {
            wing[i].y = phase.sin() * (wing_length + 10.0) + c.y - wing_length;
            wing[i].x = (phase + increment).cos() + rest[i].x;
        }

        wing[4].y = (phase + increment).sin() * tip_length + (c.y - wing_length);
        wing[4].x = (phase + increment).cos() * 20.0 + c.x;
    }

    pub fn update(&mut self, now: f64) {
        self.update_wing(Side::Left, now);
        self.update_body(now);
        self.update_wing(Side::Right, now);
    }

    pub fn draw_body(&self, surface: &mut impl Surface) {
        surface.set_fill_style(&self.config.body_color.to_string());

        surface.begin_path();
        surface.move_to(self.body[0].x, self.body[0].y);
        for p in &self.body[1..] {
            surface.line_to(p.x, p.y);
        }
        surface.close_path();
        surface.fill();
    }

    pub fn draw_wing(&self, side: Side, surface: &mut impl Surface) {
        let wing = self.wing(side);

        surface.set_fill_style(&self.config.wing_color.to_string());

        surface.begin_path();
        surface.move_to(wing[0].x, wing[0].y);
        for p in &wing[1..4] {
            surface.line_to(p.x, p.y);
        }
        surface.close_path();
        surface.fill();

        // outer panel, hinged on the quad's top edge
        surface.begin_path();
        surface.move_to(wing[4].x, wing[4].y);
        surface.line_to(wing[3].x, wing[3].y);
        surface.line_to(wing[2].x, wing[2].y);
        surface.fill();
    }

    pub fn draw(&self, surface: &mut impl Surface) {
        surface.set_fill_style(&self.config.background.to_string());
        let (w, h) = (surface.width(), surface.height());
        surface.fill_rect(0.0, 0.0, w, h);

        self.draw_wing(Side::Left, surface);
        self.draw_body(surface);
        self.draw_wing(Side::Right, surface);
    }

    /// Rebuilds the rest pose and paints it once.
    pub fn init(&mut self, surface: &mut impl Surface) {
        let Point { x, y } = self.origin;
        self.make_body(x, y, self.width, self.height);
        self.draw_body(surface);
        self.make_wing(Side::Right);
        self.draw_wing(Side::Right, surface);
        self.make_wing(Side::Left);
        self.draw_wing(Side::Left, surface);
    }

    /// One tick of the render loop at scheduler timestamp `now`.
    pub fn frame(&mut self, now: f64, surface: &mut impl Surface) {
        self.update(now);
        self.draw(surface);

        self.frames = self.frames.wrapping_add(1);

        // FIXME: wait for the end of a flap before changing speed
        if self.config.variable_speed && f64::from(self.frames) > self.speed_change_on_frame {
            self.change_speed();
        }
    }

    pub fn change_speed(&mut self) {
        self.frames = 0;
        self.update_rate = (self.rng.f64() / 10.0).min(MAX_UPDATE_RATE);
        self.speed_change_on_frame = self.rng.f64() * 100.0;

        log::info!(
            "flap speed now {:.4}, next change after {:.0} frames",
            self.update_rate,
            self.speed_change_on_frame
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawCommand, Recorder};
    use proptest::prelude::*;
    use std::f64::consts::FRAC_PI_2;

    fn unit_rate() -> BirdConfig {
        BirdConfig { update_rate: 1.0, ..Default::default() }
    }

    fn bird(config: BirdConfig) -> AnimatedBird {
        let surface = Recorder::new(800.0, 600.0);
        AnimatedBird::with_config(&surface, 200.0, 100.0, Some(200.0), Some(50.0), config)
    }

    proptest! {
        #[test]
        fn body_bobs_vertically(phase in -100.0f64..100.0) {
            let mut b = bird(unit_rate());
            b.update_body(phase);

            for (p, rest) in b.body().iter().zip(b.original_body()) {
                prop_assert_eq!(p.x, rest.x);
                prop_assert!((p.y - rest.y - (-5.0 * phase.sin())).abs() < 1e-9);
            }
        }

        #[test]
        fn wing_base_follows_body(phase in -100.0f64..100.0, side in any::<Side>()) {
            let mut b = bird(unit_rate());
            let rest = *b.wing(side);
            b.update(phase);

            let body_offset = b.body()[0].y - b.original_body()[0].y;
            let wing = b.wing(side);
            prop_assert!((wing[0].y - rest[0].y - body_offset).abs() < 1e-9);
            prop_assert!((wing[1].y - rest[1].y - body_offset).abs() < 1e-9);
            prop_assert_eq!(wing[0].x, rest[0].x);
            prop_assert_eq!(wing[1].x, rest[1].x);
        }

        #[test]
        fn rerolled_rate_stays_in_range(seed: u64) {
            let mut b = bird(BirdConfig::default()).with_seed(seed);
            for _ in 0..20 {
                b.change_speed();
                prop_assert!((0.0..=MAX_UPDATE_RATE).contains(&b.update_rate()));
                prop_assert!((0.0..100.0).contains(&b.speed_change_on_frame()));
            }
        }
    }

    #[test]
    fn scenario_at_rest_and_at_quarter_turn() {
        let mut b = bird(unit_rate());

        b.update(0.0);
        assert_eq!(b.body(), b.original_body());

        b.update(FRAC_PI_2);
        for (p, rest) in b.body().iter().zip(b.original_body()) {
            assert!((p.y - (rest.y - 5.0)).abs() < 1e-9);
        }
    }

    #[test]
    fn wing_mid_and_tip_flap() {
        let mut b = bird(unit_rate());
        b.update(FRAC_PI_2);
        let wing = b.wing(Side::Left);

        // centre is (300, 125)
        assert!((wing[2].y - (125.0 - 10.0 + 20.0)).abs() < 1e-9);
        assert!((wing[3].y - wing[2].y).abs() < 1e-12);
        assert!((wing[2].x - (327.5 + (FRAC_PI_2 + 0.5).cos())).abs() < 1e-9);
        assert!((wing[3].x - (272.5 + (FRAC_PI_2 + 0.5).cos())).abs() < 1e-9);
        assert!((wing[4].x - (300.0 + 20.0 * (FRAC_PI_2 + 0.5).cos())).abs() < 1e-9);
        assert!((wing[4].y - (115.0 + 100.0 * (FRAC_PI_2 + 0.5).sin())).abs() < 1e-9);
    }

    #[test]
    fn wings_move_in_phase() {
        let mut b = bird(unit_rate());
        b.update(1.234);
        assert_eq!(b.wing(Side::Left), b.wing(Side::Right));
    }

    #[test]
    fn fresh_birds_have_identical_geometry() {
        let a = bird(BirdConfig::default());
        let b = bird(BirdConfig::default());
        assert_eq!(a.body(), b.body());
        assert_eq!(a.original_body(), b.original_body());
        assert_eq!(a.wing(Side::Left), b.wing(Side::Left));
        assert_eq!(a.wing(Side::Right), b.wing(Side::Right));
    }

    #[test]
    fn birds_do_not_share_geometry() {
        let mut a = bird(unit_rate());
        let b = bird(unit_rate());
        a.update(1.0);
        assert_ne!(a.body(), b.body());
        assert_eq!(b.body(), b.original_body());
    }

    #[test]
    fn body_edits_leave_rest_pose_alone() {
        let mut b = bird(BirdConfig::default());
        let rest = *b.original_body();
        b.body_mut()[1].y = -42.0;
        assert_eq!(*b.original_body(), rest);
    }

    #[test]
    fn size_defaults_to_surface() {
        let surface = Recorder::new(640.0, 480.0);
        let b = AnimatedBird::new(&surface, 10.0, 20.0, None, None);
        assert_eq!(b.size(), (640.0, 480.0));
        assert_eq!(b.origin(), Point::new(10.0, 20.0));
    }

    #[test]
    fn init_draws_body_then_wings() {
        let mut surface = Recorder::new(800.0, 600.0);
        let mut b = bird(BirdConfig::default());
        b.update(500.0);
        b.init(&mut surface);

        assert_eq!(b.body(), b.original_body());
        assert_eq!(surface.fills(), 5);
        assert_eq!(surface.commands[0], DrawCommand::FillStyle("rgba(50, 50, 50, 1)".into()));
        assert_eq!(surface.commands[2], DrawCommand::MoveTo(200.0, 100.0));
    }

    #[test]
    fn frame_clears_then_draws_polygons() {
        let mut surface = Recorder::new(800.0, 600.0);
        let mut b = bird(BirdConfig::default());
        b.frame(0.0, &mut surface);

        assert_eq!(surface.commands[0], DrawCommand::FillStyle("rgba(255, 255, 255, 1)".into()));
        assert_eq!(surface.commands[1], DrawCommand::FillRect(0.0, 0.0, 800.0, 600.0));
        assert_eq!(surface.fills(), 5);

        let line_tos = surface
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::LineTo(..)))
            .count();
        // two wings of 3 + 2 and a body of 2
        assert_eq!(line_tos, 12);
        assert_eq!(b.frames(), 1);
    }

    #[test]
    fn wing_triangle_starts_at_tip() {
        let mut surface = Recorder::new(800.0, 600.0);
        let b = bird(BirdConfig::default());
        b.draw_wing(Side::Right, &mut surface);

        let tip = b.wing(Side::Right)[4];
        let mid_left = b.wing(Side::Right)[3];
        let mid_right = b.wing(Side::Right)[2];
        assert_eq!(
            surface.commands[8..],
            [
                DrawCommand::BeginPath,
                DrawCommand::MoveTo(tip.x, tip.y),
                DrawCommand::LineTo(mid_left.x, mid_left.y),
                DrawCommand::LineTo(mid_right.x, mid_right.y),
                DrawCommand::Fill,
            ]
        );
    }

    #[test]
    fn fixed_speed_never_changes() {
        let mut surface = Recorder::new(800.0, 600.0);
        let mut b = bird(BirdConfig::default());
        for t in 0..500 {
            b.frame(f64::from(t) * 16.0, &mut surface);
            surface.clear();
        }
        assert_eq!(b.update_rate(), 0.002);
        assert_eq!(b.frames(), 500);
    }

    #[test]
    fn frame_counter_wraps_instead_of_overflowing() {
        let mut surface = Recorder::new(800.0, 600.0);
        let mut b = bird(BirdConfig::default());
        b.frames = u32::MAX;
        b.frame(0.0, &mut surface);
        assert_eq!(b.frames(), 0);
    }

    #[test]
    fn variable_speed_rerolls_after_threshold() {
        let mut surface = Recorder::new(800.0, 600.0);
        let config = BirdConfig {
            variable_speed: true,
            speed_change_on_frame: 3.0,
            ..Default::default()
        };
        let mut b = bird(config).with_seed(7);

        for t in 0..3 {
            b.frame(f64::from(t), &mut surface);
        }
        assert_eq!(b.frames(), 3);
        assert_eq!(b.update_rate(), 0.002);

        b.frame(3.0, &mut surface);
        assert_eq!(b.frames(), 0);
        assert!(b.update_rate() <= MAX_UPDATE_RATE);
    }
}
