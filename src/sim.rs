use crate::draw::{draw_background, draw_bubbles, draw_fishes, draw_weeds};
use crate::entities::{emit_bubble, spawn_fishes, spawn_weeds, Bubble, Fish, Weed};
use crate::surface::Surface;
use crate::vector::Vector;
use rand::{rngs::StdRng, Rng, SeedableRng};

const TURN_CHANCE: f64 = 0.05;
const LOOK_CHANCE: f64 = 0.6;
const BUBBLE_CHANCE: f64 = 0.3;

const BUBBLE_RISE: f64 = 0.1;
const BUBBLE_SWAY_AMPLITUDE: f64 = 0.2;
const BUBBLE_SWAY_FREQUENCY: f64 = 0.1;

/// What one update tick changed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct UpdateReport {
    pub(crate) turned: usize,
    pub(crate) looked: usize,
    pub(crate) emitted: usize,
    pub(crate) dropped: usize,
}

/// The whole scene. Bounds are fixed when the tank is created.
pub(crate) struct Aquarium {
    width: f64,
    height: f64,
    pub(crate) fishes: Vec<Fish>,
    pub(crate) weeds: Vec<Weed>,
    pub(crate) bubbles: Vec<Bubble>,
    rng: StdRng,
}

impl Aquarium {
    pub(crate) fn new(width: f64, height: f64, fish_count: usize, weed_count: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let fishes = spawn_fishes(&mut rng, fish_count, width, height);
        let weeds = spawn_weeds(&mut rng, weed_count, width, height);
        Self {
            width,
            height,
            fishes,
            weeds,
            bubbles: Vec::new(),
            rng,
        }
    }

    pub(crate) fn in_bounds(&self, v: Vector) -> bool {
        v.x > 0.0 && v.x < self.width && v.y > 0.0 && v.y < self.height
    }

    /// Slow decision tick: headings, gaze and bubble emission, then culling of
    /// bubbles that left the tank.
    pub(crate) fn update(&mut self) -> UpdateReport {
        let mut report = UpdateReport::default();
        let center = Vector::new(self.width / 2.0, self.height / 2.0);

        for i in 0..self.fishes.len() {
            let turn_roll = self.rng.gen_bool(TURN_CHANCE);
            let look_roll = self.rng.gen_bool(LOOK_CHANCE);
            let bubble_roll = self.rng.gen_bool(BUBBLE_CHANCE);

            let escaped = !self.in_bounds(self.fishes[i].position);
            let fish = &mut self.fishes[i];

            if turn_roll || escaped {
                fish.move_dir = Vector::new(
                    heading_toward(&mut self.rng, fish.move_dir.x, fish.position.x, center.x),
                    heading_toward(&mut self.rng, fish.move_dir.y, fish.position.y, center.y),
                );
                report.turned += 1;
            }

            if look_roll {
                fish.look_dir = Vector::new(self.rng.gen::<f64>() - 0.5, self.rng.gen::<f64>() - 0.5);
                report.looked += 1;
            }

            if bubble_roll {
                let bubble = emit_bubble(&mut self.rng, fish);
                self.bubbles.push(bubble);
                report.emitted += 1;
            }
        }

        let before = self.bubbles.len();
        let (w, h) = (self.width, self.height);
        self.bubbles
            .retain(|b| b.position.x > 0.0 && b.position.x < w && b.position.y > 0.0 && b.position.y < h);
        report.dropped = before - self.bubbles.len();

        report
    }

    pub(crate) fn advance_fish(&mut self) {
        for fish in &mut self.fishes {
            fish.position = fish.position.move_along(fish.move_dir, fish.speed);
        }
    }

    pub(crate) fn advance_bubbles(&mut self) {
        for b in &mut self.bubbles {
            b.position = b.position.subtract(Vector::new(0.0, b.radius * BUBBLE_RISE));
            b.position.x += (b.position.y * BUBBLE_SWAY_FREQUENCY).sin() * BUBBLE_SWAY_AMPLITUDE;
        }
    }

    /// One animation frame: integrate positions once, then draw everything.
    pub(crate) fn render<S: Surface + ?Sized>(&mut self, s: &mut S, t: f64) {
        self.advance_fish();
        self.advance_bubbles();
        self.draw(s, t);
    }

    /// Draws the current state without moving anything.
    pub(crate) fn draw<S: Surface + ?Sized>(&self, s: &mut S, t: f64) {
        draw_background(s, t);
        draw_fishes(s, &self.fishes, t);
        draw_bubbles(s, &self.bubbles);
        draw_weeds(s, &self.weeds, self.width, self.height, t);
    }
}

/// New heading component with random magnitude. An outward-pointing (or
/// zero) component is aimed back at the centre, otherwise its sign is kept.
fn heading_toward<R: Rng + ?Sized>(rng: &mut R, dir: f64, pos: f64, center: f64) -> f64 {
    let magnitude = rng.gen::<f64>();
    let outward = (pos - center) * dir > 0.0;
    let sign = if outward || dir == 0.0 {
        (center - pos).signum()
    } else {
        dir.signum()
    };
    magnitude * sign
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;
    use crate::entities::FISH_KINDS;
    use crate::surface::recording::{Command, Recorder};

    const W: f64 = 640.0;
    const H: f64 = 480.0;

    fn tank() -> Aquarium {
        Aquarium::new(W, H, 5, 20, 42)
    }

    fn still_fish(position: Vector, move_dir: Vector) -> Fish {
        Fish {
            position,
            move_dir,
            look_dir: Vector::new(0.0, 0.0),
            size: 100.0,
            speed: 0.5,
            pupil_ratio: 0.7,
            kind: &FISH_KINDS[0],
            color: Rgba::rgb(255, 80, 40),
            floater_phase: 0.0,
        }
    }

    #[test]
    fn new_tank_has_fixed_population() {
        let aq = tank();
        assert_eq!(aq.fishes.len(), 5);
        assert_eq!(aq.weeds.len(), 20);
        assert!(aq.bubbles.is_empty());
        assert!(aq.weeds.windows(2).all(|w| w[0].layer <= w[1].layer));
    }

    #[test]
    fn same_seed_same_tank() {
        let a = tank();
        let b = tank();
        for (x, y) in a.fishes.iter().zip(&b.fishes) {
            assert_eq!(x.position, y.position);
            assert_eq!(x.color, y.color);
        }
    }

    #[test]
    fn update_culls_bubbles_outside() {
        let mut aq = tank();
        for _ in 0..50 {
            aq.bubbles.extend([
                Bubble { position: Vector::new(-1.0, 10.0), radius: 5.0 },
                Bubble { position: Vector::new(10.0, H + 3.0), radius: 5.0 },
                Bubble { position: Vector::new(W, 10.0), radius: 5.0 },
                Bubble { position: Vector::new(10.0, 0.0), radius: 5.0 },
                Bubble { position: Vector::new(20.0, 20.0), radius: 5.0 },
            ]);
            let report = aq.update();
            assert!(report.dropped >= 4);
            for b in &aq.bubbles {
                assert!(b.position.x >= 0.0 && b.position.x <= W);
                assert!(b.position.y >= 0.0 && b.position.y <= H);
            }
            aq.advance_bubbles();
        }
        assert_eq!(aq.fishes.len(), 5);
    }

    #[test]
    fn escaped_fish_always_turns_back() {
        let mut aq = tank();
        aq.fishes = vec![
            still_fish(Vector::new(-10.0, H / 4.0), Vector::new(-0.5, -0.3)),
            still_fish(Vector::new(W + 10.0, H + 10.0), Vector::new(0.5, 0.3)),
        ];
        let report = aq.update();
        assert_eq!(report.turned, 2);
        assert!(aq.fishes[0].move_dir.x >= 0.0 && aq.fishes[0].move_dir.y >= 0.0);
        assert!(aq.fishes[1].move_dir.x <= 0.0 && aq.fishes[1].move_dir.y <= 0.0);
        for f in &aq.fishes {
            assert!(f.move_dir.x.abs() < 1.0 && f.move_dir.y.abs() < 1.0);
        }
    }

    #[test]
    fn heading_keeps_inward_sign() {
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..100 {
            // Left of centre moving right: inward, keep positive.
            assert!(heading_toward(&mut rng, 0.4, 100.0, 320.0) >= 0.0);
            // Left of centre moving left: outward, flip.
            assert!(heading_toward(&mut rng, -0.4, 100.0, 320.0) >= 0.0);
            // Right of centre moving right: outward, flip.
            assert!(heading_toward(&mut rng, 0.4, 500.0, 320.0) <= 0.0);
            // Stationary axis aims at the centre.
            assert!(heading_toward(&mut rng, 0.0, 500.0, 320.0) <= 0.0);
        }
    }

    #[test]
    fn rolls_hit_expected_rates() {
        let mut aq = Aquarium::new(W, H, 0, 0, 7);
        aq.fishes = (0..10)
            .map(|_| still_fish(Vector::new(W / 2.0, H / 2.0), Vector::new(0.3, 0.3)))
            .collect();
        let mut total = UpdateReport::default();
        for _ in 0..400 {
            let r = aq.update();
            total.turned += r.turned;
            total.looked += r.looked;
            total.emitted += r.emitted;
            for f in &aq.fishes {
                assert!((-0.5..0.5).contains(&f.look_dir.x) && (-0.5..0.5).contains(&f.look_dir.y));
            }
            for f in &mut aq.fishes {
                f.position = Vector::new(W / 2.0, H / 2.0);
            }
        }
        // 4000 rolls each
        assert!((100..320).contains(&total.turned), "{total:?}");
        assert!((2200..2600).contains(&total.looked), "{total:?}");
        assert!((1000..1400).contains(&total.emitted), "{total:?}");
    }

    #[test]
    fn emitted_bubbles_start_at_fish_edge() {
        let mut aq = Aquarium::new(W, H, 0, 0, 11);
        aq.fishes = vec![still_fish(Vector::new(300.0, 200.0), Vector::new(0.6, 0.0))];
        let mut seen = 0;
        for _ in 0..100 {
            aq.fishes[0].position = Vector::new(300.0, 200.0);
            aq.fishes[0].move_dir = Vector::new(0.6, 0.0);
            aq.bubbles.clear();
            if aq.update().emitted == 1 {
                let b = &aq.bubbles[0];
                assert_eq!(b.position, Vector::new(350.0, 200.0));
                assert!((5.0..10.0).contains(&b.radius));
                seen += 1;
            }
        }
        assert!(seen > 0);
    }

    #[test]
    fn render_moves_fish_once_per_frame() {
        let mut aq = tank();
        let before: Vec<_> = aq.fishes.iter().map(|f| f.position).collect();
        let mut r = Recorder::new(W, H);
        aq.render(&mut r, 0.0);
        for (f, p) in aq.fishes.iter().zip(&before) {
            assert!((f.position.subtract(*p).magnitude() - f.speed).abs() < 1e-9);
        }
        aq.render(&mut r, 0.016);
        for (f, p) in aq.fishes.iter().zip(&before) {
            assert!((f.position.subtract(*p).magnitude() - 2.0 * f.speed).abs() < 1e-9);
        }
    }

    #[test]
    fn draw_alone_keeps_positions() {
        let mut aq = tank();
        aq.bubbles.push(Bubble { position: Vector::new(100.0, 100.0), radius: 6.0 });
        let fish_before: Vec<_> = aq.fishes.iter().map(|f| f.position).collect();
        let mut r = Recorder::new(W, H);
        aq.draw(&mut r, 3.0);
        aq.draw(&mut r, 4.0);
        assert!(aq.fishes.iter().zip(&fish_before).all(|(f, p)| f.position == *p));
        assert_eq!(aq.bubbles[0].position, Vector::new(100.0, 100.0));
        assert_eq!(r.count(|c| matches!(c, Command::FillRect(..))), 2);
    }

    #[test]
    fn bubbles_rise_and_sway() {
        let mut aq = Aquarium::new(W, H, 0, 0, 1);
        aq.bubbles.push(Bubble { position: Vector::new(100.0, 100.0), radius: 8.0 });
        aq.advance_bubbles();
        let b = &aq.bubbles[0];
        assert!((b.position.y - 99.2).abs() < 1e-9);
        assert!((b.position.x - (100.0 + (9.92f64).sin() * 0.2)).abs() < 1e-9);
    }

    #[test]
    fn frame_draws_background_then_scene() {
        let mut aq = tank();
        aq.bubbles.push(Bubble { position: Vector::new(100.0, 100.0), radius: 6.0 });
        let mut r = Recorder::new(W, H);
        aq.render(&mut r, 1.5);

        assert_eq!(r.commands[0], Command::ResetTransform);
        assert!(matches!(r.commands[1], Command::FillRect(x, y, w, h, _) if x == 0.0 && y == 0.0 && w == W && h == H));
        assert_eq!(r.count(|c| matches!(c, Command::Translate(..))), 5);
        // one bubble stroke plus one per weed
        assert_eq!(r.count(|c| matches!(c, Command::Stroke(..))), 1 + 20);
        assert_eq!(r.commands.last(), Some(&Command::ResetTransform));
    }
}
