use super::Point3;

/// Turn direction of an ordered point triple in the ground plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Collinear,
    Clockwise,
    Anticlockwise,
}

/// Classifies the turn `p → q → r` using the sign of the cross product of
/// `(q − p)` and `(r − q)` in the `(x, z)` plane.
///
/// Exactly zero is collinear; there is no tolerance band.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn orientation(p: &Point3, q: &Point3, r: &Point3) -> Orientation {
    let cross = (q.x - p.x) * (r.z - q.z) - (q.z - p.z) * (r.x - q.x);
    if cross == 0.0 {
        Orientation::Collinear
    } else if cross > 0.0 {
        Orientation::Anticlockwise
    } else {
        Orientation::Clockwise
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, z: f64) -> Point3 {
        Point3::new(x, 0.0, z)
    }

    #[test]
    fn left_turn_is_anticlockwise() {
        assert_eq!(
            orientation(&p(0.0, 0.0), &p(1.0, 0.0), &p(1.0, 1.0)),
            Orientation::Anticlockwise
        );
    }

    #[test]
    fn right_turn_is_clockwise() {
        assert_eq!(
            orientation(&p(0.0, 0.0), &p(1.0, 0.0), &p(1.0, -1.0)),
            Orientation::Clockwise
        );
    }

    #[test]
    fn straight_line_is_collinear() {
        assert_eq!(
            orientation(&p(0.0, 0.0), &p(1.0, 1.0), &p(3.0, 3.0)),
            Orientation::Collinear
        );
    }

    #[test]
    fn elevation_is_ignored() {
        let a = Point3::new(0.0, 5.0, 0.0);
        let b = Point3::new(1.0, -3.0, 0.0);
        let c = Point3::new(2.0, 9.0, 0.0);
        assert_eq!(orientation(&a, &b, &c), Orientation::Collinear);
    }
}
