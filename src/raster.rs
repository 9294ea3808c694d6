use crate::color::Rgba;
use crate::surface::{Surface, Transform};
use crate::term::{Cell, CellBuffer};
use std::f64::consts::TAU;

// Braille: each terminal cell is 2x4 subpixels.
pub(crate) const SUB_X: usize = 2;
pub(crate) const SUB_Y: usize = 4;

const MIN_HALF_STROKE: f64 = 0.5;
const MAX_CURVE_STEPS: usize = 200;

type Point = (f64, f64);

/// RGBA subpixel surface presented as braille cells. Paths are kept in
/// device (subpixel) space; `scale` logical units map onto one subpixel.
pub(crate) struct BrailleSurface {
    sw: usize,
    sh: usize,
    scale: f64,
    px: Vec<Rgba>,
    ink: Vec<bool>,
    mask: Vec<bool>,
    base: Transform,
    ctm: Transform,
    path: Vec<Vec<Point>>,
    fill: Rgba,
    stroke: Rgba,
    line_width: f64,
}

impl BrailleSurface {
    pub(crate) fn new(cols: u16, rows: u16, scale: f64) -> Self {
        let sw = cols as usize * SUB_X;
        let sh = rows as usize * SUB_Y;
        let n = sw * sh;
        Self {
            sw,
            sh,
            scale,
            px: vec![Rgba::BLACK; n],
            ink: vec![false; n],
            mask: vec![false; n],
            base: Transform::scale(1.0 / scale),
            ctm: Transform::IDENTITY,
            path: Vec::new(),
            fill: Rgba::BLACK,
            stroke: Rgba::BLACK,
            line_width: 1.0,
        }
    }

    #[inline]
    fn idx(&self, x: usize, y: usize) -> usize {
        y * self.sw + x
    }

    fn device(&self, x: f64, y: f64) -> Option<Point> {
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        let p = self.base.then(self.ctm).apply(x, y);
        (p.0.is_finite() && p.1.is_finite()).then_some(p)
    }

    fn last_point(&self) -> Option<Point> {
        self.path.last().and_then(|sp| sp.last().copied())
    }

    fn push_point(&mut self, p: Point) {
        match self.path.last_mut() {
            Some(sp) => sp.push(p),
            None => self.path.push(vec![p]),
        }
    }

    /// Marks every subpixel whose centre is inside `polys` (nonzero rule).
    fn cover_polygons(&mut self, polys: &[Vec<Point>]) {
        self.mask.fill(false);

        let mut miny = f64::INFINITY;
        let mut maxy = f64::NEG_INFINITY;
        for p in polys.iter().flatten() {
            miny = miny.min(p.1);
            maxy = maxy.max(p.1);
        }
        if !miny.is_finite() || !maxy.is_finite() {
            return;
        }
        let y0 = (miny - 0.5).floor().max(0.0) as usize;
        let y1 = ((maxy - 0.5).ceil().max(-1.0) + 1.0).min(self.sh as f64) as usize;

        let mut crossings: Vec<(f64, i32)> = Vec::new();
        for y in y0..y1 {
            let yc = y as f64 + 0.5;
            crossings.clear();
            for poly in polys.iter().filter(|p| p.len() >= 2) {
                for i in 0..poly.len() {
                    let a = poly[i];
                    let b = poly[(i + 1) % poly.len()];
                    let dir = if a.1 <= yc && b.1 > yc {
                        1
                    } else if b.1 <= yc && a.1 > yc {
                        -1
                    } else {
                        continue;
                    };
                    let t = (yc - a.1) / (b.1 - a.1);
                    crossings.push((a.0 + t * (b.0 - a.0), dir));
                }
            }
            crossings.sort_by(|l, r| l.0.total_cmp(&r.0));

            let mut winding = 0;
            for pair in crossings.windows(2) {
                winding += pair[0].1;
                if winding == 0 {
                    continue;
                }
                let xs = (pair[0].0 - 0.5).ceil().max(0.0) as usize;
                let xe = ((pair[1].0 - 0.5).ceil().max(0.0) as usize).min(self.sw);
                for x in xs..xe {
                    let i = self.idx(x, y);
                    self.mask[i] = true;
                }
            }
        }
    }

    /// Marks every subpixel whose centre lies within `half` of a segment.
    fn cover_strokes(&mut self, half: f64) {
        self.mask.fill(false);
        let path = std::mem::take(&mut self.path);
        for sp in &path {
            for seg in sp.windows(2) {
                self.cover_segment(seg[0], seg[1], half);
            }
        }
        self.path = path;
    }

    fn cover_segment(&mut self, a: Point, b: Point, half: f64) {
        let x0 = (a.0.min(b.0) - half - 0.5).floor().max(0.0);
        let x1 = (a.0.max(b.0) + half + 0.5).ceil().min(self.sw as f64);
        let y0 = (a.1.min(b.1) - half - 0.5).floor().max(0.0);
        let y1 = (a.1.max(b.1) + half + 0.5).ceil().min(self.sh as f64);
        if x1 <= x0 || y1 <= y0 {
            return;
        }

        let (dx, dy) = (b.0 - a.0, b.1 - a.1);
        let len2 = dx * dx + dy * dy;
        let half2 = half * half;

        for y in y0 as usize..y1 as usize {
            for x in x0 as usize..x1 as usize {
                let (px, py) = (x as f64 + 0.5, y as f64 + 0.5);
                let t = if len2 > 0.0 {
                    (((px - a.0) * dx + (py - a.1) * dy) / len2).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let (qx, qy) = (a.0 + dx * t - px, a.1 + dy * t - py);
                if qx * qx + qy * qy <= half2 {
                    let i = self.idx(x, y);
                    self.mask[i] = true;
                }
            }
        }
    }

    fn paint_mask(&mut self, color: Rgba, ink: bool) {
        let sa = color.a as f64 / 255.0;
        let mix = |s: u8, d: u8| (s as f64 * sa + d as f64 * (1.0 - sa) + 0.5) as u8;
        for i in 0..self.mask.len() {
            if !self.mask[i] {
                continue;
            }
            let dst = self.px[i];
            self.px[i] = Rgba::rgb(mix(color.r, dst.r), mix(color.g, dst.g), mix(color.b, dst.b));
            self.ink[i] = ink;
        }
    }

    /// Converts subpixels into braille cells: inked subpixels become dots.
    pub(crate) fn to_cells(&self, out: &mut CellBuffer) {
        let cols = (self.sw / SUB_X).min(out.w as usize);
        let rows = (self.sh / SUB_Y).min(out.h as usize);

        for cy in 0..rows {
            for cx in 0..cols {
                let mut mask = 0u8;
                let mut ink = [0u32; 4];
                let mut bg = [0u32; 4];

                for dy in 0..SUB_Y {
                    for dx in 0..SUB_X {
                        let i = self.idx(cx * SUB_X + dx, cy * SUB_Y + dy);
                        let p = self.px[i];
                        let acc = if self.ink[i] {
                            mask |= braille_bit(dx, dy);
                            &mut ink
                        } else {
                            &mut bg
                        };
                        acc[0] += p.r as u32;
                        acc[1] += p.g as u32;
                        acc[2] += p.b as u32;
                        acc[3] += 1;
                    }
                }

                let mean = |s: [u32; 4]| Rgba::rgb((s[0] / s[3]) as u8, (s[1] / s[3]) as u8, (s[2] / s[3]) as u8);
                let cell = match mask {
                    0 => {
                        let c = mean(bg).to_color();
                        Cell::new(' ', c, c)
                    }
                    0xFF => {
                        let c = mean(ink).to_color();
                        Cell::new(' ', c, c)
                    }
                    _ => Cell::new(braille_char(mask), mean(ink).to_color(), mean(bg).to_color()),
                };
                out.set(cx as u16, cy as u16, cell);
            }
        }
    }
}

impl Surface for BrailleSurface {
    fn width(&self) -> f64 {
        self.sw as f64 * self.scale
    }

    fn height(&self) -> f64 {
        self.sh as f64 * self.scale
    }

    fn begin_path(&mut self) {
        self.path.clear();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        if let Some(p) = self.device(x, y) {
            self.path.push(vec![p]);
        }
    }

    fn line_to(&mut self, x: f64, y: f64) {
        if let Some(p) = self.device(x, y) {
            self.push_point(p);
        }
    }

    fn quadratic_curve_to(&mut self, cpx: f64, cpy: f64, x: f64, y: f64) {
        let (Some(c), Some(end)) = (self.device(cpx, cpy), self.device(x, y)) else {
            return;
        };
        let start = match self.last_point() {
            Some(p) => p,
            None => {
                self.path.push(vec![c]);
                c
            }
        };

        let approx = (c.0 - start.0).hypot(c.1 - start.1) + (end.0 - c.0).hypot(end.1 - c.1);
        let steps = ((approx / 1.5).ceil() as usize).clamp(1, MAX_CURVE_STEPS);
        for i in 1..=steps {
            let t = i as f64 / steps as f64;
            let u = 1.0 - t;
            let p = (
                u * u * start.0 + 2.0 * u * t * c.0 + t * t * end.0,
                u * u * start.1 + 2.0 * u * t * c.1 + t * t * end.1,
            );
            self.push_point(p);
        }
    }

    fn arc(&mut self, x: f64, y: f64, radius: f64, start: f64, end: f64) {
        if !(radius >= 0.0) || !start.is_finite() || !end.is_finite() {
            return;
        }
        let sweep = if end - start >= TAU {
            TAU
        } else {
            (end - start).rem_euclid(TAU)
        };
        let device_r = radius / self.scale * self.ctm.scale_factor();
        let steps = ((device_r * sweep / 1.5).ceil() as usize).clamp(8, MAX_CURVE_STEPS);

        let at = |a: f64| (x + radius * a.cos(), y + radius * a.sin());
        let (sx, sy) = at(start);
        if self.last_point().is_some() {
            self.line_to(sx, sy);
        } else {
            self.move_to(sx, sy);
        }
        for i in 1..=steps {
            let (px, py) = at(start + sweep * i as f64 / steps as f64);
            self.line_to(px, py);
        }
    }

    fn set_fill_style(&mut self, color: Rgba) {
        self.fill = color;
    }

    fn set_stroke_style(&mut self, color: Rgba) {
        self.stroke = color;
    }

    fn set_line_width(&mut self, width: f64) {
        if width.is_finite() && width > 0.0 {
            self.line_width = width;
        }
    }

    fn fill(&mut self) {
        let path = std::mem::take(&mut self.path);
        self.cover_polygons(&path);
        self.path = path;
        self.paint_mask(self.fill, true);
    }

    fn stroke(&mut self) {
        let half = (self.line_width * self.base.then(self.ctm).scale_factor() / 2.0).max(MIN_HALF_STROKE);
        self.cover_strokes(half);
        self.paint_mask(self.stroke, true);
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        let corners = [(x, y), (x + w, y), (x + w, y + h), (x, y + h)];
        let Some(rect) = corners.iter().map(|&(cx, cy)| self.device(cx, cy)).collect::<Option<Vec<_>>>() else {
            return;
        };
        self.cover_polygons(&[rect]);
        self.paint_mask(self.fill, false);
    }

    fn translate(&mut self, x: f64, y: f64) {
        self.ctm = self.ctm.then(Transform::translation(x, y));
    }

    fn rotate(&mut self, angle: f64) {
        self.ctm = self.ctm.then(Transform::rotation(angle));
    }

    fn transform(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) {
        self.ctm = self.ctm.then(Transform::new(a, b, c, d, e, f));
    }

    fn reset_transform(&mut self) {
        self.ctm = Transform::IDENTITY;
    }
}

fn braille_bit(dx: usize, dy: usize) -> u8 {
    // Dot mapping:
    // (0,0)=1 (0,1)=2 (0,2)=4 (0,3)=64
    // (1,0)=8 (1,1)=16 (1,2)=32 (1,3)=128
    match (dx, dy) {
        (0, 0) => 0x01,
        (0, 1) => 0x02,
        (0, 2) => 0x04,
        (0, 3) => 0x40,
        (1, 0) => 0x08,
        (1, 1) => 0x10,
        (1, 2) => 0x20,
        (1, 3) => 0x80,
        _ => 0x00,
    }
}

fn braille_char(mask: u8) -> char {
    char::from_u32(0x2800 + mask as u32).unwrap_or(' ')
}
