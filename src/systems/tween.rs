//! Tween animation systems.
//!
//! - [`tween_alpha_system`] – animates [`Opacity`](crate::components::opacity::Opacity)
//!   (the focus glow pulse)
//! - [`tween_scale_system`] – animates [`Scale`](crate::components::scale::Scale)
//!   (breathing scene buttons)
//!
//! Both read the frame delta from [`WorldTime`].

use crate::components::opacity::Opacity;
use crate::components::scale::Scale;
use crate::components::tween::{Easing, LoopMode, TweenAlpha, TweenScale};
use crate::resources::worldtime::WorldTime;
use bevy_ecs::prelude::*;
use raylib::math::Vector2;
use std::f32::consts::PI;

/// Apply an easing curve to `t`, clamped to `[0, 1]`.
pub(crate) fn ease(e: Easing, t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    match e {
        Easing::Linear => t,
        Easing::QuadOut => t * (2.0 - t),
        Easing::QuadInOut => {
            if t < 0.5 {
                2.0 * t * t
            } else {
                -1.0 + (4.0 - 2.0 * t) * t
            }
        }
        Easing::SineInOut => -((PI * t).cos() - 1.0) / 2.0,
    }
}

pub(crate) fn lerp_v2(a: Vector2, b: Vector2, t: f32) -> Vector2 {
    Vector2 {
        x: a.x + (b.x - a.x) * t,
        y: a.y + (b.y - a.y) * t,
    }
}

pub(crate) fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Advance tween time and handle looping/completion.
pub(crate) fn advance(
    time: &mut f32,
    duration: f32,
    forward: &mut bool,
    playing: &mut bool,
    mode: LoopMode,
    dt: f32,
) {
    let dir = if *forward { 1.0 } else { -1.0 };
    *time += dt * dir;

    let finished_forward = *forward && *time >= duration;
    let finished_backward = !*forward && *time <= 0.0;
    if !(finished_forward || finished_backward) {
        return;
    }
    match mode {
        LoopMode::Once => {
            *playing = false;
            *time = time.clamp(0.0, duration);
        }
        LoopMode::Loop => {
            *time = if finished_forward { 0.0 } else { duration };
        }
        LoopMode::PingPong => {
            *forward = !*forward;
            *time = time.clamp(0.0, duration);
        }
    }
}

fn progress(time: f32, duration: f32) -> f32 {
    if duration <= 0.0 { 1.0 } else { time / duration }
}

pub fn tween_alpha_system(
    world_time: Res<WorldTime>,
    mut query: Query<(&mut Opacity, &mut TweenAlpha)>,
) {
    let dt = world_time.delta.max(0.0);
    for (mut opacity, mut tw) in query.iter_mut() {
        if !tw.playing {
            continue;
        }
        let (duration, mode) = (tw.duration, tw.loop_mode);
        let (mut t, mut forward, mut playing) = (tw.time, tw.forward, tw.playing);
        advance(&mut t, duration, &mut forward, &mut playing, mode, dt);
        tw.time = t;
        tw.forward = forward;
        tw.playing = playing;
        let k = ease(tw.easing, progress(tw.time, duration));
        opacity.0 = lerp_f32(tw.from, tw.to, k);
    }
}

pub fn tween_scale_system(
    world_time: Res<WorldTime>,
    mut query: Query<(&mut Scale, &mut TweenScale)>,
) {
    let dt = world_time.delta.max(0.0);
    for (mut scale, mut tw) in query.iter_mut() {
        if !tw.playing {
            continue;
        }
        let (duration, mode) = (tw.duration, tw.loop_mode);
        let (mut t, mut forward, mut playing) = (tw.time, tw.forward, tw.playing);
        advance(&mut t, duration, &mut forward, &mut playing, mode, dt);
        tw.time = t;
        tw.forward = forward;
        tw.playing = playing;
        let k = ease(tw.easing, progress(tw.time, duration));
        scale.scale = lerp_v2(tw.from, tw.to, k);
    }
}
