use crate::color::{rand_color, ColorRange, Rgba};
use crate::vector::Vector;
use rand::Rng;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct FishKind {
    pub(crate) tail_width_ratio: f64,
    pub(crate) tail_length_ratio: f64,
}

pub(crate) static FISH_KINDS: [FishKind; 3] = [
    FishKind {
        tail_width_ratio: 0.35,
        tail_length_ratio: 0.35,
    },
    FishKind {
        tail_width_ratio: 0.4,
        tail_length_ratio: 0.4,
    },
    FishKind {
        tail_width_ratio: 0.35,
        tail_length_ratio: 0.45,
    },
];

const FISH_SIZE: (f64, f64) = (30.0, 150.0);
const FISH_SPEED: (f64, f64) = (0.3, 0.8);
const FISH_PUPIL_RATIO: (f64, f64) = (0.6, 0.8);
const FISH_COLOR: ColorRange = ColorRange {
    r: (255, 255),
    g: (0, 150),
    b: (0, 150),
};

const WEED_LENGTH: (f64, f64) = (100.0, 500.0);
const WEED_WIDTH: (f64, f64) = (2.0, 5.0);
const WEED_LAYERS: (f64, f64) = (0.0, 3.0);
const WEED_BEND: (f64, f64) = (5.0, 20.0);
const WEED_SEGMENT: (f64, f64) = (30.0, 40.0);
const WEED_ROOT_DEPTH: f64 = 20.0;
const WEED_COLOR: ColorRange = ColorRange {
    r: (0, 10),
    g: (80, 180),
    b: (50, 60),
};

const BUBBLE_MIN_RADIUS: f64 = 5.0;

#[derive(Clone, Debug)]
pub(crate) struct Fish {
    pub(crate) position: Vector,
    pub(crate) move_dir: Vector,
    pub(crate) look_dir: Vector,
    pub(crate) size: f64,
    pub(crate) speed: f64,
    pub(crate) pupil_ratio: f64,
    pub(crate) kind: &'static FishKind,
    pub(crate) color: Rgba,
    pub(crate) floater_phase: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Bubble {
    pub(crate) position: Vector,
    pub(crate) radius: f64,
}

#[derive(Clone, Debug)]
pub(crate) struct Weed {
    pub(crate) position: Vector,
    pub(crate) length: f64,
    pub(crate) width: f64,
    pub(crate) layer: u32,
    pub(crate) bend_distance: f64,
    pub(crate) segment_length: f64,
    pub(crate) color: Rgba,
}

/// `min + floor(u * (max - min))` for uniform `u` in [0, 1). Steps in whole
/// units from `min`; an empty range gives `min` and an inverted one steps
/// downward.
pub(crate) fn rand_in_range<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> f64 {
    min + (rng.gen::<f64>() * (max - min)).floor()
}

fn rand_uniform<R: Rng + ?Sized>(rng: &mut R, (min, max): (f64, f64)) -> f64 {
    min + rng.gen::<f64>() * (max - min)
}

fn rand_dir<R: Rng + ?Sized>(rng: &mut R) -> Vector {
    Vector::new(rng.gen::<f64>() * 2.0 - 1.0, rng.gen::<f64>() * 2.0 - 1.0)
}

pub(crate) fn random_fish<R: Rng + ?Sized>(rng: &mut R, width: f64, height: f64) -> Fish {
    Fish {
        position: Vector::new(rng.gen::<f64>() * width, rng.gen::<f64>() * height),
        move_dir: rand_dir(rng),
        look_dir: rand_dir(rng),
        size: rand_in_range(rng, FISH_SIZE.0, FISH_SIZE.1),
        speed: rand_uniform(rng, FISH_SPEED),
        pupil_ratio: rand_uniform(rng, FISH_PUPIL_RATIO),
        kind: &FISH_KINDS[rng.gen_range(0..FISH_KINDS.len())],
        color: rand_color(rng, FISH_COLOR),
        floater_phase: rand_in_range(rng, 0.0, 3.0).round(),
    }
}

pub(crate) fn random_weed<R: Rng + ?Sized>(rng: &mut R, width: f64, height: f64) -> Weed {
    Weed {
        length: rand_in_range(rng, WEED_LENGTH.0, WEED_LENGTH.1),
        width: rand_in_range(rng, WEED_WIDTH.0, WEED_WIDTH.1),
        layer: rand_in_range(rng, WEED_LAYERS.0, WEED_LAYERS.1) as u32,
        bend_distance: rand_in_range(rng, WEED_BEND.0, WEED_BEND.1),
        segment_length: rand_in_range(rng, WEED_SEGMENT.0, WEED_SEGMENT.1),
        color: rand_color(rng, WEED_COLOR),
        position: Vector::new(
            rand_in_range(rng, 0.0, width),
            rand_in_range(rng, height, height + WEED_ROOT_DEPTH),
        ),
    }
}

pub(crate) fn spawn_fishes<R: Rng + ?Sized>(rng: &mut R, count: usize, width: f64, height: f64) -> Vec<Fish> {
    (0..count).map(|_| random_fish(rng, width, height)).collect()
}

/// Weeds come back sorted by layer so they can be drawn group by group.
pub(crate) fn spawn_weeds<R: Rng + ?Sized>(rng: &mut R, count: usize, width: f64, height: f64) -> Vec<Weed> {
    let mut weeds: Vec<Weed> = (0..count).map(|_| random_weed(rng, width, height)).collect();
    weeds.sort_by_key(|w| w.layer);
    weeds
}

/// Bubble released at the fish's leading edge.
pub(crate) fn emit_bubble<R: Rng + ?Sized>(rng: &mut R, fish: &Fish) -> Bubble {
    let mouth = if fish.move_dir.x > 0.0 { Vector::RIGHT } else { Vector::LEFT };
    Bubble {
        position: fish.position.add(mouth.scale(fish.size / 2.0)),
        radius: rand_in_range(rng, BUBBLE_MIN_RADIUS, fish.size / 10.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn rand_in_range_steps_from_min() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..1000 {
            let v = rand_in_range(&mut rng, 5.0, 10.0);
            assert!((5.0..10.0).contains(&v));
            assert_eq!(v.fract(), 0.0);
        }
        assert_eq!(rand_in_range(&mut rng, 4.0, 4.0), 4.0);
    }

    #[test]
    fn fish_fields_in_range() {
        let mut rng = StdRng::seed_from_u64(2);
        for f in spawn_fishes(&mut rng, 500, 800.0, 600.0) {
            assert!((0.0..800.0).contains(&f.position.x));
            assert!((0.0..600.0).contains(&f.position.y));
            for d in [f.move_dir, f.look_dir] {
                assert!((-1.0..1.0).contains(&d.x) && (-1.0..1.0).contains(&d.y));
            }
            assert!((30.0..150.0).contains(&f.size));
            assert!((0.3..0.8).contains(&f.speed));
            assert!((0.6..0.8).contains(&f.pupil_ratio));
            assert!(FISH_KINDS.iter().any(|k| std::ptr::eq(k, f.kind)));
            assert!(FISH_COLOR.contains(f.color));
            assert_eq!(f.color.r, 255);
            assert!([0.0, 1.0, 2.0].contains(&f.floater_phase));
        }
    }

    #[test]
    fn every_kind_shows_up() {
        let mut rng = StdRng::seed_from_u64(3);
        let fishes = spawn_fishes(&mut rng, 200, 100.0, 100.0);
        for kind in &FISH_KINDS {
            assert!(fishes.iter().any(|f| std::ptr::eq(f.kind, kind)));
        }
    }

    #[test]
    fn weeds_sorted_by_layer() {
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let weeds = spawn_weeds(&mut rng, 20, 640.0, 480.0);
            assert_eq!(weeds.len(), 20);
            assert!(weeds.windows(2).all(|w| w[0].layer <= w[1].layer));
        }
    }

    #[test]
    fn weed_fields_in_range() {
        let mut rng = StdRng::seed_from_u64(4);
        for w in spawn_weeds(&mut rng, 300, 640.0, 480.0) {
            assert!((100.0..500.0).contains(&w.length));
            assert!((2.0..5.0).contains(&w.width));
            assert!(w.layer < 3);
            assert!((5.0..20.0).contains(&w.bend_distance));
            assert!((30.0..40.0).contains(&w.segment_length));
            assert!((0.0..640.0).contains(&w.position.x));
            assert!((480.0..500.0).contains(&w.position.y));
            assert!(WEED_COLOR.contains(w.color));
        }
    }

    #[test]
    fn bubble_leaves_from_leading_edge() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut fish = random_fish(&mut rng, 10.0, 10.0);
        fish.position = Vector::new(5.0, 5.0);
        fish.size = 100.0;
        fish.move_dir = Vector::new(0.4, -0.2);
        for _ in 0..200 {
            let b = emit_bubble(&mut rng, &fish);
            assert!((b.position.x - 55.0).abs() < 1e-9);
            assert!((b.position.y - 5.0).abs() < 1e-9);
            assert!((5.0..10.0).contains(&b.radius));
        }

        fish.move_dir = Vector::new(-0.4, 0.0);
        let b = emit_bubble(&mut rng, &fish);
        assert!((b.position.x + 45.0).abs() < 1e-9);
    }
}
