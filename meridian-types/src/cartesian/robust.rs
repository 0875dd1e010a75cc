//! Extended precision arithmetic for orientation predicates.
//!
//! A determinant is first evaluated in plain `f64` together with a bound on its rounding error. Only when the sign
//! cannot be trusted the determinant is recomputed in double-double arithmetic (a pair of `f64` values carrying
//! about 106 bits of mantissa).

const DP_SAFE_EPSILON: f64 = 1e-15;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct DoubleDouble {
    hi: f64,
    lo: f64,
}

fn two_sum(a: f64, b: f64) -> (f64, f64) {
    let s = a + b;
    let bb = s - a;
    let err = (a - (s - bb)) + (b - bb);
    (s, err)
}

fn quick_two_sum(a: f64, b: f64) -> (f64, f64) {
    let s = a + b;
    let err = b - (s - a);
    (s, err)
}

fn two_prod(a: f64, b: f64) -> (f64, f64) {
    let p = a * b;
    let err = a.mul_add(b, -p);
    (p, err)
}

impl DoubleDouble {
    /// Exact difference `a - b` of two doubles.
    pub(crate) fn diff(a: f64, b: f64) -> Self {
        let (hi, lo) = two_sum(a, -b);
        Self { hi, lo }
    }

    pub(crate) fn add(self, other: Self) -> Self {
        let (s, e) = two_sum(self.hi, other.hi);
        let e = e + self.lo + other.lo;
        let (hi, lo) = quick_two_sum(s, e);
        Self { hi, lo }
    }

    pub(crate) fn neg(self) -> Self {
        Self {
            hi: -self.hi,
            lo: -self.lo,
        }
    }

    pub(crate) fn sub(self, other: Self) -> Self {
        self.add(other.neg())
    }

    pub(crate) fn mul(self, other: Self) -> Self {
        let (p, e) = two_prod(self.hi, other.hi);
        let e = e + (self.hi * other.lo + self.lo * other.hi);
        let (hi, lo) = quick_two_sum(p, e);
        Self { hi, lo }
    }

    pub(crate) fn signum(self) -> i32 {
        if self.hi > 0.0 {
            1
        } else if self.hi < 0.0 {
            -1
        } else if self.lo > 0.0 {
            1
        } else if self.lo < 0.0 {
            -1
        } else {
            0
        }
    }
}

fn signum(v: f64) -> i32 {
    if v > 0.0 {
        1
    } else if v < 0.0 {
        -1
    } else {
        0
    }
}

/// Sign of the determinant if it can be decided in plain floating point, `None` otherwise.
fn orientation_index_filter(
    (ax, ay): (f64, f64),
    (bx, by): (f64, f64),
    (cx, cy): (f64, f64),
) -> Option<i32> {
    let det_left = (ax - cx) * (by - cy);
    let det_right = (ay - cy) * (bx - cx);
    let det = det_left - det_right;

    let det_sum = if det_left > 0.0 {
        if det_right <= 0.0 {
            return Some(signum(det));
        }
        det_left + det_right
    } else if det_left < 0.0 {
        if det_right >= 0.0 {
            return Some(signum(det));
        }
        -det_left - det_right
    } else {
        return Some(signum(det));
    };

    let err_bound = DP_SAFE_EPSILON * det_sum;
    if det >= err_bound || -det >= err_bound {
        return Some(signum(det));
    }

    None
}

/// Orientation of point `q` relative to the directed segment `p1 -> p2`.
///
/// Returns `1` if `q` is to the left (counterclockwise turn), `-1` if it is to the right and `0` if the three
/// points are collinear.
pub(crate) fn orientation_index(p1: (f64, f64), p2: (f64, f64), q: (f64, f64)) -> i32 {
    if let Some(index) = orientation_index_filter(p1, p2, q) {
        return index;
    }

    let dx1 = DoubleDouble::diff(p2.0, p1.0);
    let dy1 = DoubleDouble::diff(p2.1, p1.1);
    let dx2 = DoubleDouble::diff(q.0, p2.0);
    let dy2 = DoubleDouble::diff(q.1, p2.1);

    dx1.mul(dy2).sub(dy1.mul(dx2)).signum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_orientation() {
        assert_eq!(orientation_index((0.0, 0.0), (10.0, 0.0), (5.0, 5.0)), 1);
        assert_eq!(orientation_index((0.0, 0.0), (10.0, 0.0), (5.0, -5.0)), -1);
        assert_eq!(orientation_index((0.0, 0.0), (10.0, 0.0), (20.0, 0.0)), 0);
    }

    #[test]
    fn nearly_collinear_points_are_consistent() {
        // Classic failure case of the naive determinant: orientation of the same triple must not change when the
        // points are permuted cyclically.
        let p1 = (19.4, 12.5);
        let p2 = (24.199999999999996, 19.8);
        let q = (21.799999999999997, 16.15);

        let o1 = orientation_index(p1, p2, q);
        let o2 = orientation_index(p2, q, p1);
        let o3 = orientation_index(q, p1, p2);
        assert_eq!(o1, o2);
        assert_eq!(o2, o3);
    }

    #[test]
    fn double_double_difference_is_exact() {
        let d = DoubleDouble::diff(1e16, 1.0);
        assert_eq!(d.hi + d.lo, 1e16 - 1.0);
        assert_eq!(DoubleDouble::diff(0.1, 0.1).signum(), 0);
    }
}
