//! Rendering.
//!
//! [`render_system`] is exclusive: it takes the Raylib handle and the render
//! target out of the world, draws every live [`UiElement`] into the target in
//! [`ZIndex`] order with the focus glow layered at [`GLOW_Z`], then blits the
//! target letterboxed into the window. The blit runs inside the color filter
//! shader when the overlay's display filter is not the identity, so the
//! filter covers the whole scene including the overlay panel.
use std::ffi::CString;

use bevy_ecs::prelude::*;
use log::warn;
use raylib::ffi;
use raylib::prelude::*;
use smallvec::SmallVec;

use crate::components::focusglow::{FocusGlow, Outline, OutlineStroke};
use crate::components::opacity::Opacity;
use crate::components::overlay::OverlayPart;
use crate::components::scale::Scale;
use crate::components::screenposition::ScreenPosition;
use crate::components::uielement::UiElement;
use crate::components::zindex::{GLOW_Z, ZIndex};
use crate::resources::accessibility::OverlayState;
use crate::resources::filtershader::ColorFilterShader;
use crate::resources::rendertarget::RenderTarget;
use crate::resources::windowsize::WindowSize;

const SCENE_BACKGROUND: Color = Color::new(24, 32, 48, 255);

/// One element ready to draw.
#[derive(Clone, Debug)]
pub struct DrawItem {
    pub z: ZIndex,
    pub ui: UiElement,
    pub bounds: Rectangle,
    /// Draw the bounds as an outline in `ui.text_color`.
    pub outline_only: bool,
}

/// Live elements sorted back to front.
pub fn collect_draw_items(world: &mut World) -> Vec<DrawItem> {
    let mut q = world.query::<(
        &UiElement,
        &ScreenPosition,
        Option<&Scale>,
        Option<&ZIndex>,
        Option<&OverlayPart>,
    )>();
    let mut items: Vec<DrawItem> = q
        .iter(world)
        .filter(|(ui, ..)| ui.is_live())
        .map(|(ui, pos, scale, z, part)| DrawItem {
            z: z.copied().unwrap_or_default(),
            ui: ui.clone(),
            bounds: ui.bounds(pos.pos, scale.copied().unwrap_or_default().scale),
            outline_only: part == Some(&OverlayPart::Border),
        })
        .collect();
    items.sort_by_key(|item| item.z);
    items
}

/// Glow strokes with the layer's opacity folded into their alpha.
pub fn collect_glow(world: &mut World) -> SmallVec<[(OutlineStroke, Color); 4]> {
    let mut q = world.query::<(&FocusGlow, Option<&Opacity>)>();
    q.iter(world)
        .flat_map(|(glow, opacity)| {
            let opacity = opacity.copied().unwrap_or_default();
            glow.strokes.iter().map(move |stroke| {
                let alpha = opacity.apply(stroke.alpha).clamp(0.0, 1.0);
                let c = stroke.color;
                (*stroke, Color::new(c.r, c.g, c.b, (alpha * 255.0).round() as u8))
            })
        })
        .collect()
}

fn measure_text(text: &str, font_size: i32) -> i32 {
    let Ok(c_text) = CString::new(text) else {
        return 0;
    };
    unsafe { ffi::MeasureText(c_text.as_ptr(), font_size) }
}

fn draw_item<D: RaylibDraw>(d: &mut D, item: &DrawItem) {
    let ui = &item.ui;
    let r = item.bounds;
    if item.outline_only {
        d.draw_rectangle_lines_ex(r, ui.font_size.max(1) as f32, ui.text_color);
        return;
    }
    if ui.fill.a > 0 {
        if ui.round {
            let center = Vector2 {
                x: r.x + r.width / 2.0,
                y: r.y + r.height / 2.0,
            };
            d.draw_circle_v(center, r.width.min(r.height) / 2.0, ui.fill);
        } else {
            d.draw_rectangle_rec(r, ui.fill);
        }
    }
    if let Some(label) = ui.label.as_deref() {
        let text_w = measure_text(label, ui.font_size) as f32;
        // Labels follow the horizontal anchor: left, centered or right aligned.
        let x = r.x + (r.width - text_w) * ui.anchor.x;
        let y = r.y + (r.height - ui.font_size as f32) / 2.0;
        d.draw_text(label, x as i32, y as i32, ui.font_size, ui.text_color);
    }
}

fn draw_stroke<D: RaylibDraw>(d: &mut D, stroke: &OutlineStroke, color: Color) {
    let half = stroke.thickness / 2.0;
    match stroke.outline {
        Outline::Circle { center, radius } => {
            d.draw_ring(center, radius - half, radius + half, 0.0, 360.0, 48, color);
        }
        Outline::Ellipse {
            center,
            radius_x,
            radius_y,
        } => {
            let steps = stroke.thickness.ceil().max(1.0) as i32;
            for i in 0..steps {
                let k = i as f32 - half;
                d.draw_ellipse_lines(
                    center.x as i32,
                    center.y as i32,
                    radius_x + k,
                    radius_y + k,
                    color,
                );
            }
        }
        Outline::RoundedRect {
            rect,
            corner_radius,
        } => {
            let short = rect.width.min(rect.height);
            let roundness = if short > 0.0 {
                (corner_radius * 2.0 / short).clamp(0.0, 1.0)
            } else {
                0.0
            };
            unsafe {
                ffi::DrawRectangleRoundedLinesEx(
                    rect.into(),
                    roundness,
                    8,
                    stroke.thickness,
                    color.into(),
                );
            }
        }
    }
}

/// Draw the scene: elements under the glow, the glow, then everything above.
pub fn render_pass<D: RaylibDraw>(
    d: &mut D,
    items: &[DrawItem],
    glow: &[(OutlineStroke, Color)],
) {
    let split = items.partition_point(|item| item.z.0 < GLOW_Z);
    for item in &items[..split] {
        draw_item(d, item);
    }
    for (stroke, color) in glow {
        draw_stroke(d, stroke, *color);
    }
    for item in &items[split..] {
        draw_item(d, item);
    }
}

pub fn render_system(world: &mut World) {
    let Some(mut rl) = world.remove_non_send_resource::<RaylibHandle>() else {
        warn!("render skipped: no raylib handle");
        return;
    };
    let Some(thread) = world.remove_non_send_resource::<RaylibThread>() else {
        world.insert_non_send_resource(rl);
        return;
    };
    let Some(mut target) = world.remove_non_send_resource::<RenderTarget>() else {
        world.insert_non_send_resource(rl);
        world.insert_non_send_resource(thread);
        return;
    };
    let mut shader = world.remove_non_send_resource::<ColorFilterShader>();

    let window = WindowSize {
        w: rl.get_screen_width(),
        h: rl.get_screen_height(),
    };
    world.insert_resource(window);

    let items = collect_draw_items(world);
    let glow = collect_glow(world);
    let matrix = world
        .get_resource::<OverlayState>()
        .map(|state| state.filter().matrix())
        .filter(|m| !m.is_identity());

    {
        let mut d = rl.begin_drawing(&thread);
        {
            let mut t = d.begin_texture_mode(&thread, &mut target.texture);
            t.clear_background(SCENE_BACKGROUND);
            render_pass(&mut t, &items, &glow);
        }

        d.clear_background(Color::BLACK);
        let src = target.source_rect();
        let dest = window.calculate_letterbox(target.game_width, target.game_height);
        let origin = Vector2 { x: 0.0, y: 0.0 };
        match (matrix, shader.as_mut()) {
            (Some(matrix), Some(shader)) => {
                shader.set_matrix(&matrix);
                shader.with_filter(|| {
                    d.draw_texture_pro(&target.texture, src, dest, origin, 0.0, Color::WHITE)
                });
            }
            _ => d.draw_texture_pro(&target.texture, src, dest, origin, 0.0, Color::WHITE),
        }
    }

    world.insert_non_send_resource(rl);
    world.insert_non_send_resource(thread);
    world.insert_non_send_resource(target);
    if let Some(shader) = shader {
        world.insert_non_send_resource(shader);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::focusglow::IndicatorState;
    use crate::components::focusglow::IndicatorShape;

    #[test]
    fn test_items_sorted_and_hidden_skipped() {
        let mut world = World::new();
        world.spawn((
            UiElement::new(10.0, 10.0),
            ScreenPosition::new(0.0, 0.0),
            ZIndex(150),
        ));
        world.spawn((UiElement::new(10.0, 10.0), ScreenPosition::new(0.0, 0.0)));
        world.spawn((
            UiElement::new(10.0, 10.0).hidden(),
            ScreenPosition::new(0.0, 0.0),
            ZIndex(300),
        ));
        let items = collect_draw_items(&mut world);
        let zs: Vec<i32> = items.iter().map(|i| i.z.0).collect();
        assert_eq!(zs, vec![0, 150]);
        assert_eq!(items.partition_point(|i| i.z.0 < GLOW_Z), 1);
    }

    #[test]
    fn test_glow_alpha_scaled_by_opacity() {
        let mut world = World::new();
        let mut glow = FocusGlow::default();
        glow.draw(&IndicatorState::new(
            Rectangle {
                x: 0.0,
                y: 0.0,
                width: 40.0,
                height: 40.0,
            },
            IndicatorShape::Circle,
        ));
        world.spawn((glow, Opacity(0.5)));
        let strokes = collect_glow(&mut world);
        assert_eq!(strokes.len(), 4);
        let (inner, color) = strokes[3];
        let expected = (inner.alpha * 0.5 * 255.0).round() as u8;
        assert_eq!(color.a, expected);
    }
}
