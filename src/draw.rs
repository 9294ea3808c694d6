//! Scene drawing routines. Everything here draws through [`Surface`] and
//! reads entity state without changing it; time-driven motion takes the
//! simulation time `t` in seconds.

use crate::color::{background_color, Rgba};
use crate::entities::{Bubble, Fish, Weed};
use crate::surface::Surface;
use crate::vector::Vector;
use std::f64::consts::{PI, TAU};

const EYE_WHITE: Rgba = Rgba::new(0xFF, 0xFF, 0xFF, 0xA1);
const PUPIL: Rgba = Rgba::rgb(0x00, 0x12, 0x42);
const BUBBLE_STROKE: Rgba = Rgba::new(0xFF, 0xFF, 0xFF, 0xB1);
const BUBBLE_LINE_WIDTH: f64 = 1.2;
const WEED_ROOT_OFFSET: f64 = 50.0;
const WEED_SWAY: f64 = 50.0;

pub(crate) fn draw_background<S: Surface + ?Sized>(s: &mut S, t: f64) {
    s.reset_transform();
    s.set_fill_style(background_color(t));
    let (w, h) = (s.width(), s.height());
    s.fill_rect(0.0, 0.0, w, h);
}

pub(crate) fn draw_fish_eye<S: Surface + ?Sized>(
    s: &mut S,
    x: f64,
    y: f64,
    radius: f64,
    pupil_ratio: f64,
    look_dir: Vector,
) {
    s.begin_path();
    s.arc(x, y, radius, 0.0, TAU);
    s.set_fill_style(EYE_WHITE);
    s.fill();

    let pupil_radius = radius * pupil_ratio;
    let offset = look_dir * (radius - pupil_radius);

    s.begin_path();
    s.arc(x + offset.x, y + offset.y, pupil_radius, 0.0, TAU);
    s.set_fill_style(PUPIL);
    s.fill();
}

/// Two-lobed tail whose tip bobs with `sin(t)`.
pub(crate) fn draw_fish_tail<S: Surface + ?Sized>(
    s: &mut S,
    x: f64,
    y: f64,
    base_width: f64,
    end_width: f64,
    length: f64,
    t: f64,
) {
    let shift = t.sin() * length * 0.1;

    s.move_to(x, y - base_width / 2.0);
    s.quadratic_curve_to(x, y - end_width / 3.0, x - length, y - end_width / 2.0 + shift);
    s.quadratic_curve_to(x - 0.5 * length, y - length * 0.1, x - length, y + end_width / 2.0 + shift);
    s.quadratic_curve_to(x, y + end_width / 3.0, x, y + base_width / 2.0);
}

pub(crate) fn draw_fish_body<S: Surface + ?Sized>(s: &mut S, x: f64, y: f64, length: f64, base_tail_width: f64) {
    s.move_to(x, y + base_tail_width / 2.0);
    s.quadratic_curve_to(x + length / 2.0, y + length / 2.0, x + length, y);
    s.quadratic_curve_to(x + length / 2.0, y - length / 2.0, x, y - base_tail_width / 2.0);
}

pub(crate) fn draw_fish_floater<S: Surface + ?Sized>(s: &mut S, x: f64, y: f64, size: f64, phase: f64, t: f64) {
    let shift = (t + phase).sin() * 0.1 * size;

    s.move_to(x, y);
    s.quadratic_curve_to(x, y - size * 0.4, x - size, y + size * 0.5 + shift);
    s.quadratic_curve_to(x, y + size * 0.6, x, y);
}

pub(crate) fn draw_fish_top_floater<S: Surface + ?Sized>(s: &mut S, x: f64, y: f64, size: f64) {
    s.begin_path();
    s.move_to(x, y);
    s.line_to(x - size * 0.35, y - size * 0.12);
    s.line_to(x - size * 0.75, y + size * 0.2);
    s.fill();
}

/// Draws a fish facing +x at its position, mirrored when `flip` is set.
pub(crate) fn draw_fish<S: Surface + ?Sized>(s: &mut S, fish: &Fish, flip: bool, rotation: f64, t: f64) {
    let size = fish.size;

    s.translate(fish.position.x, fish.position.y);
    s.rotate(rotation);
    if flip {
        s.transform(-1.0, 0.0, 0.0, 1.0, 0.0, 0.0);
    }

    s.begin_path();
    draw_fish_body(s, -size * 0.5, 0.0, size, size * 0.1);
    draw_fish_tail(
        s,
        -size * 0.35,
        0.0,
        size * 0.1,
        size * fish.kind.tail_width_ratio,
        size * fish.kind.tail_length_ratio,
        t,
    );
    draw_fish_floater(s, size * 0.05, size * 0.1, size * 0.33, fish.floater_phase, t);
    s.set_fill_style(fish.color);
    s.fill();

    draw_fish_top_floater(s, size * 0.2, -size * 0.2, size);
    draw_fish_eye(s, size * 0.2, -size * 0.05, size * 0.09, fish.pupil_ratio, fish.look_dir);

    s.reset_transform();
}

pub(crate) fn draw_fishes<S: Surface + ?Sized>(s: &mut S, fishes: &[Fish], t: f64) {
    for fish in fishes {
        draw_fish(s, fish, fish.move_dir.x < 0.0, 0.0, t);
    }
}

/// Weed strand as alternating S-bends stacked from the root.
pub(crate) fn draw_weed<S: Surface + ?Sized>(s: &mut S, weed: &Weed) {
    s.set_stroke_style(weed.color);
    s.set_line_width(weed.width);

    s.begin_path();
    s.move_to(weed.position.x, weed.position.y);

    let segments = (weed.length / weed.segment_length).ceil() as usize;
    let mut bend_dir = 1.0;
    for segment in 0..segments {
        let pos_x = weed.position.x;
        let pos_y = weed.position.y + segment as f64 * weed.segment_length;
        let bend_x = pos_x + weed.bend_distance * bend_dir * 2.0;
        let bend_y = pos_y + weed.segment_length * 1.1;

        s.quadratic_curve_to(bend_x, bend_y, pos_x, pos_y);
        bend_dir = -bend_dir;
    }

    s.stroke();
}

/// Weeds must be sorted by layer. Each layer gets its own flipped, skewed
/// frame whose skew drifts with time.
pub(crate) fn draw_weeds<S: Surface + ?Sized>(s: &mut S, weeds: &[Weed], width: f64, height: f64, t: f64) {
    let mut current = None;

    for weed in weeds {
        if current != Some(weed.layer) {
            let skew = (t + weed.layer as f64).sin() / WEED_SWAY;

            s.reset_transform();
            s.rotate(PI);
            s.transform(1.0, 0.0, skew, 1.0, -width, -height * 2.0 - WEED_ROOT_OFFSET);

            current = Some(weed.layer);
        }
        draw_weed(s, weed);
    }

    s.reset_transform();
}

/// All bubbles go into one path and are stroked once.
pub(crate) fn draw_bubbles<S: Surface + ?Sized>(s: &mut S, bubbles: &[Bubble]) {
    s.begin_path();
    for b in bubbles {
        s.move_to(b.position.x + b.radius, b.position.y);
        s.arc(b.position.x, b.position.y, b.radius, 0.0, TAU);
    }
    s.set_stroke_style(BUBBLE_STROKE);
    s.set_line_width(BUBBLE_LINE_WIDTH);
    s.stroke();
}
