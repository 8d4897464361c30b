//! Property tests for the geometry the games are built on

use glam::Vec2;
use proptest::prelude::*;

use xmb_arcade::games::stacker::{BoxColor, Slice, StackBox, slice};
use xmb_arcade::sim::{Body, Circle, Segment, reflect_velocity, resolve_circle, resolve_segment};

fn stack_box(x: f32, width: f32) -> StackBox {
    StackBox {
        x,
        y: 0.0,
        width,
        height: 20.0,
        color: BoxColor::Base,
    }
}

proptest! {
    #[test]
    fn slice_never_grows(
        ax in -200.0f32..400.0,
        aw in 1.0f32..200.0,
        px in -200.0f32..400.0,
        pw in 1.0f32..200.0,
    ) {
        let active = stack_box(ax, aw);
        let prev = stack_box(px, pw);
        match slice(&active, &prev) {
            Slice::Miss => {
                prop_assert!(active.left() > prev.right() || active.right() < prev.left());
            }
            Slice::Placed { x, width, perfect } => {
                prop_assert!(width >= 0.0);
                prop_assert!(width <= aw + 1e-3);
                prop_assert!(x >= active.left().max(prev.left()) - 1e-3);
                prop_assert!(x + width <= active.right().min(prev.right()) + 1e-3);
                if perfect {
                    prop_assert_eq!(width, aw);
                }
            }
        }
    }

    #[test]
    fn reflection_flips_normal_component(
        vx in -20.0f32..20.0,
        vy in -20.0f32..20.0,
        angle in 0.0f32..std::f32::consts::TAU,
    ) {
        let v = Vec2::new(vx, vy);
        let n = Vec2::from_angle(angle);
        let r = reflect_velocity(v, n);
        prop_assert!((r.dot(n) + v.dot(n)).abs() < 1e-3);
        prop_assert!((r.length() - v.length()).abs() < 1e-3);
    }

    #[test]
    fn bumper_hit_scales_speed(
        angle in 0.0f32..std::f32::consts::TAU,
        depth in 0.5f32..10.0,
        speed in 0.5f32..15.0,
        force in 1.0f32..2.0,
    ) {
        let bumper = Circle::new(Vec2::new(150.0, 100.0), 15.0);
        let dir = Vec2::from_angle(angle);
        let radius = 6.0;
        let mut body = Body {
            pos: bumper.center + dir * (bumper.radius + radius - depth),
            vel: -dir * speed,
            radius,
        };
        prop_assert!(resolve_circle(&mut body, &bumper, force));
        prop_assert!((body.vel.length() - speed * force).abs() < 1e-2 * speed * force);
        prop_assert!((body.pos.distance(bumper.center) - (bumper.radius + radius)).abs() < 1e-3);
        prop_assert!(body.vel.dot(dir) > 0.0);
    }

    #[test]
    fn wall_contact_pushes_out(
        x in 10.0f32..290.0,
        offset in 0.1f32..5.9,
        vy in 0.5f32..10.0,
    ) {
        let floor = Segment::from_coords(0.0, 200.0, 300.0, 200.0);
        let mut body = Body {
            pos: Vec2::new(x, 200.0 - offset),
            vel: Vec2::new(0.0, vy),
            radius: 6.0,
        };
        prop_assert!(resolve_segment(&mut body, &floor, 0.7));
        prop_assert!(body.pos.y <= 194.0 + 1e-3);
        prop_assert!(body.vel.y < 0.0);
        prop_assert!((body.vel.y + vy * 0.7).abs() < 1e-3);
    }
}
