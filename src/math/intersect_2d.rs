use super::orientation::{orientation, Orientation};
use super::Point3;

/// Returns whether `q` lies inside the axis-aligned box spanned by `p` and `r`
/// in the `(x, z)` plane.
///
/// Only meaningful when the three points are already known to be collinear.
#[must_use]
pub fn on_segment(p: &Point3, q: &Point3, r: &Point3) -> bool {
    q.x <= p.x.max(r.x) && q.x >= p.x.min(r.x) && q.z <= p.z.max(r.z) && q.z >= p.z.min(r.z)
}

/// Bounded segment-segment intersection test in the `(x, z)` plane.
///
/// Touching endpoints and collinear overlap both count as intersecting.
#[must_use]
pub fn segments_intersect(a1: &Point3, a2: &Point3, b1: &Point3, b2: &Point3) -> bool {
    let o1 = orientation(a1, a2, b1);
    let o2 = orientation(a1, a2, b2);
    let o3 = orientation(b1, b2, a1);
    let o4 = orientation(b1, b2, a2);

    if o1 != o2 && o3 != o4 {
        return true;
    }

    (o1 == Orientation::Collinear && on_segment(a1, b1, a2))
        || (o2 == Orientation::Collinear && on_segment(a1, b2, a2))
        || (o3 == Orientation::Collinear && on_segment(b1, a1, b2))
        || (o4 == Orientation::Collinear && on_segment(b1, a2, b2))
}
