use std::ops::{Add, Mul, Sub};

/// 2D position or direction. Arithmetic always produces a new value.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct Vector {
    pub(crate) x: f64,
    pub(crate) y: f64,
}

impl Vector {
    pub(crate) const LEFT: Vector = Vector { x: -1.0, y: 0.0 };
    pub(crate) const RIGHT: Vector = Vector { x: 1.0, y: 0.0 };

    pub(crate) const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub(crate) fn add(self, v: Vector) -> Self {
        Self::new(self.x + v.x, self.y + v.y)
    }

    pub(crate) fn subtract(self, v: Vector) -> Self {
        Self::new(self.x - v.x, self.y - v.y)
    }

    pub(crate) fn scale(self, k: f64) -> Self {
        Self::new(self.x * k, self.y * k)
    }

    /// Offset by `distance` along `direction`. The angle is measured from the
    /// +y axis, so a zero direction moves along +y.
    pub(crate) fn move_along(self, direction: Vector, distance: f64) -> Self {
        let rotation = direction.x.atan2(direction.y);
        Self::new(
            self.x + rotation.sin() * distance,
            self.y + rotation.cos() * distance,
        )
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub(crate) fn magnitude(self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Unit vector. A zero vector yields NaN components.
    #[cfg_attr(not(test), allow(dead_code))]
    pub(crate) fn normalize(self) -> Self {
        let m = self.magnitude();
        Self::new(self.x / m, self.y / m)
    }
}

impl Add for Vector {
    type Output = Vector;
    fn add(self, rhs: Vector) -> Vector {
        Vector::add(self, rhs)
    }
}

impl Sub for Vector {
    type Output = Vector;
    fn sub(self, rhs: Vector) -> Vector {
        self.subtract(rhs)
    }
}

impl Mul<f64> for Vector {
    type Output = Vector;
    fn mul(self, rhs: f64) -> Vector {
        self.scale(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn close(a: Vector, b: Vector) -> bool {
        (a.x - b.x).abs() < EPS && (a.y - b.y).abs() < EPS
    }

    fn samples() -> Vec<Vector> {
        vec![
            Vector::new(0.0, 0.0),
            Vector::new(1.5, -2.25),
            Vector::new(-300.0, 0.001),
            Vector::new(1e6, -1e6),
            Vector::new(-0.3, -0.7),
        ]
    }

    #[test]
    fn add_then_subtract_is_identity() {
        for a in samples() {
            for b in samples() {
                assert!(close(a.add(b).subtract(b), a), "{a:?} {b:?}");
            }
        }
    }

    #[test]
    fn operators_match_methods() {
        let a = Vector::new(3.0, 4.0);
        let b = Vector::new(-1.0, 2.0);
        assert_eq!(a + b, a.add(b));
        assert_eq!(a - b, a.subtract(b));
        assert_eq!(a * 2.5, a.scale(2.5));
        assert_eq!(a * 2.0, Vector::new(6.0, 8.0));
    }

    #[test]
    fn normalize_gives_unit_length() {
        for v in samples().into_iter().filter(|v| v.magnitude() > 0.0) {
            assert!((v.normalize().magnitude() - 1.0).abs() < EPS, "{v:?}");
        }
        assert_eq!(Vector::new(3.0, 4.0).magnitude(), 5.0);
    }

    #[test]
    fn normalize_zero_is_not_finite() {
        let n = Vector::new(0.0, 0.0).normalize();
        assert!(n.x.is_nan() && n.y.is_nan());
    }

    #[test]
    fn move_along_covers_distance() {
        let origin = Vector::new(12.0, -7.0);
        for d in samples().into_iter().filter(|v| v.magnitude() > 0.0) {
            for dist in [0.5, 10.0, -4.0] {
                let moved = origin.move_along(d, dist).subtract(origin).magnitude();
                assert!((moved - f64::abs(dist)).abs() < 1e-6, "{d:?} {dist}");
            }
        }
    }

    #[test]
    fn move_along_up() {
        let p = Vector::new(0.0, 0.0).move_along(Vector::new(0.0, 1.0), 10.0);
        assert!(close(p, Vector::new(0.0, 10.0)));
    }

    #[test]
    fn move_along_follows_direction() {
        let p = Vector::new(1.0, 1.0).move_along(Vector::RIGHT * 7.0, 2.0);
        assert!(close(p, Vector::new(3.0, 1.0)));
        let p = Vector::new(1.0, 1.0).move_along(Vector::new(0.0, -1.0), 2.0);
        assert!(close(p, Vector::new(1.0, -1.0)));
        let p = Vector::new(0.0, 0.0).move_along(Vector::LEFT, 1.0);
        assert!(close(p, Vector::new(-1.0, 0.0)));
    }

    #[test]
    fn move_along_zero_direction_goes_up() {
        let p = Vector::new(2.0, 2.0).move_along(Vector::new(0.0, 0.0), 3.0);
        assert!(close(p, Vector::new(2.0, 5.0)));
    }
}
