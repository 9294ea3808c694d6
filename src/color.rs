use crate::entities::rand_in_range;
use crossterm::style::Color;
use rand::Rng;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Rgba {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

impl Rgba {
    pub(crate) const BLACK: Rgba = Rgba::rgb(0, 0, 0);

    pub(crate) const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub(crate) const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Clamps each channel into 0..=255 and rounds, like a CSS `rgb()`.
    pub(crate) fn from_f64(r: f64, g: f64, b: f64) -> Self {
        let ch = |v: f64| if v.is_finite() { v.round().clamp(0.0, 255.0) as u8 } else { 0 };
        Self::rgb(ch(r), ch(g), ch(b))
    }

    pub(crate) fn to_color(self) -> Color {
        Color::Rgb {
            r: self.r,
            g: self.g,
            b: self.b,
        }
    }
}

/// Half-open `[min, max)` bounds for each channel.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ColorRange {
    pub(crate) r: (u8, u8),
    pub(crate) g: (u8, u8),
    pub(crate) b: (u8, u8),
}

impl ColorRange {
    #[cfg(test)]
    pub(crate) fn contains(&self, c: Rgba) -> bool {
        let within = |v: u8, (lo, hi): (u8, u8)| if lo == hi { v == lo } else { v >= lo && v < hi };
        within(c.r, self.r) && within(c.g, self.g) && within(c.b, self.b)
    }
}

pub(crate) fn rand_color<R: Rng + ?Sized>(rng: &mut R, range: ColorRange) -> Rgba {
    let mut channel = |(lo, hi): (u8, u8)| rand_in_range(&mut *rng, lo as f64, hi as f64) as u8;
    let r = channel(range.r);
    let g = channel(range.g);
    let b = channel(range.b);
    Rgba::rgb(r, g, b)
}

/// Water tint at simulation time `t` (seconds).
pub(crate) fn background_color(t: f64) -> Rgba {
    let g = (t / 3.0 + 10.0).sin() * 30.0;
    let b = (t / 2.0).sin() * 30.0 + 20.0;
    Rgba::from_f64(0.0, g, b)
}
