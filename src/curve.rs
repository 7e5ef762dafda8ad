//! Flattening of Bézier curves, elliptical arcs, and whole ellipses into
//! polylines.
//!
//! Everything here produces plain point sequences; the rest of the crate never
//! sees a curved segment. Two sampling strategies are provided for Bézier
//! curves: [`flatten_fixed`] takes an explicit segment count, while
//! [`flatten_adaptive`] subdivides until the polyline is within a distance
//! tolerance of the true curve.

use crate::geom::{Point, EPS};
use crate::Error;

/// Hard ceiling on subdivision depth, so that pathological tolerances can't
/// recurse forever. At depth 16 a single curve is already 65536 spans.
const MAX_DEPTH: u32 = 16;

/// Evaluates a Bézier curve of arbitrary order by repeated linear
/// interpolation of the control polygon (de Casteljau).
///
/// # Panics
///
/// Panics if `ctrl` is empty.
pub fn eval(ctrl: &[Point], t: f64) -> Point {
    assert!(!ctrl.is_empty(), "no control points");
    let mut buf = ctrl.to_vec();
    for level in (1..buf.len()).rev() {
        for i in 0..level {
            buf[i] = buf[i].lerp(&buf[i + 1], t);
        }
    }
    buf[0]
}

/// Samples a Bézier curve at `n + 1` uniformly spaced parameter values,
/// producing a polyline of exactly `n` line segments.
///
/// The first and last output points are the curve's exact endpoints.
/// `n == 0` is rejected with [`Error::InvalidSegmentCount`].
pub fn flatten_fixed(ctrl: &[Point], n: u32) -> Result<Vec<Point>, Error> {
    if n == 0 {
        return Err(Error::InvalidSegmentCount);
    }
    let mut out = Vec::with_capacity(n as usize + 1);
    for i in 0..=n {
        out.push(eval(ctrl, f64::from(i) / f64::from(n)));
    }
    Ok(out)
}

/// Distance from `p` to the segment `a -> b`.
fn point_segment_dist(p: Point, a: Point, b: Point) -> f64 {
    let d = b - a;
    let len2 = d.len2();
    if len2 < EPS * EPS {
        return p.dist(&a);
    }
    let t = ((p - a).dot(&d) / len2).clamp(0.0, 1.0);
    p.dist(&a.lerp(&b, t))
}

/// Samples a Bézier curve adaptively, subdividing each parameter span until
/// the curve deviates from the span's chord by at most `tolerance`.
///
/// The output always contains the exact endpoints; the total point count is
/// not known in advance. Deviation is estimated by evaluating the curve at
/// the span's quarter points, and a recursion-depth ceiling guarantees
/// termination whatever the tolerance.
///
/// `tolerance` must be positive and finite, otherwise
/// [`Error::InvalidTolerance`] is returned.
pub fn flatten_adaptive(ctrl: &[Point], tolerance: f64) -> Result<Vec<Point>, Error> {
    if !(tolerance > 0.0) || !tolerance.is_finite() {
        return Err(Error::InvalidTolerance(tolerance));
    }
    let p0 = eval(ctrl, 0.0);
    let p1 = eval(ctrl, 1.0);
    let mut out = vec![p0];
    subdivide(ctrl, 0.0, p0, 1.0, p1, tolerance, 0, &mut out);
    Ok(out)
}

fn subdivide(
    ctrl: &[Point],
    t0: f64,
    p0: Point,
    t1: f64,
    p1: Point,
    tolerance: f64,
    depth: u32,
    out: &mut Vec<Point>,
) {
    let tm = 0.5 * (t0 + t1);
    let pm = eval(ctrl, tm);
    // Checking only the midpoint would terminate early on spans where the
    // curve crosses its own chord, so probe the quarter points too.
    let flat = point_segment_dist(pm, p0, p1) <= tolerance
        && point_segment_dist(eval(ctrl, 0.5 * (t0 + tm)), p0, p1) <= tolerance
        && point_segment_dist(eval(ctrl, 0.5 * (tm + t1)), p0, p1) <= tolerance;
    if flat || depth >= MAX_DEPTH {
        out.push(p1);
    } else {
        subdivide(ctrl, t0, p0, tm, pm, tolerance, depth + 1, out);
        subdivide(ctrl, tm, pm, t1, p1, tolerance, depth + 1, out);
    }
}

/// An SVG elliptical arc converted to center parameterization.
struct CenterArc {
    center: Point,
    rx: f64,
    ry: f64,
    cos_phi: f64,
    sin_phi: f64,
    /// Start angle in the ellipse's local frame.
    theta: f64,
    /// Signed angular extent; positive means the sweep direction.
    delta: f64,
}

impl CenterArc {
    /// Endpoint-to-center conversion per the SVG spec (section F.6.5),
    /// including the radius scale-up when the endpoints are too far apart
    /// for the given radii.
    fn from_endpoints(
        from: Point,
        to: Point,
        mut rx: f64,
        mut ry: f64,
        x_rotation: f64,
        large_arc: bool,
        sweep: bool,
    ) -> Self {
        let phi = x_rotation.to_radians();
        let (sin_phi, cos_phi) = phi.sin_cos();

        // Step 1: midpoint difference, rotated into the ellipse's frame.
        let dx = 0.5 * (from.x - to.x);
        let dy = 0.5 * (from.y - to.y);
        let x1p = cos_phi * dx + sin_phi * dy;
        let y1p = -sin_phi * dx + cos_phi * dy;

        // Correct out-of-range radii.
        let lambda = (x1p * x1p) / (rx * rx) + (y1p * y1p) / (ry * ry);
        if lambda > 1.0 {
            let s = lambda.sqrt();
            rx *= s;
            ry *= s;
        }

        // Step 2: center in the rotated frame. The radicand can dip slightly
        // negative from rounding when the endpoints are antipodal.
        let rx2 = rx * rx;
        let ry2 = ry * ry;
        let num = rx2 * ry2 - rx2 * y1p * y1p - ry2 * x1p * x1p;
        let den = rx2 * y1p * y1p + ry2 * x1p * x1p;
        let mut coef = (num / den).max(0.0).sqrt();
        if large_arc == sweep {
            coef = -coef;
        }
        let cxp = coef * rx * y1p / ry;
        let cyp = -coef * ry * x1p / rx;

        // Step 3: back to the original frame.
        let center = Point::new(
            cos_phi * cxp - sin_phi * cyp + 0.5 * (from.x + to.x),
            sin_phi * cxp + cos_phi * cyp + 0.5 * (from.y + to.y),
        );

        // Step 4: start angle and extent, adjusted by the sweep flag.
        let theta = ((y1p - cyp) / ry).atan2((x1p - cxp) / rx);
        let theta2 = ((-y1p - cyp) / ry).atan2((-x1p - cxp) / rx);
        let mut delta = theta2 - theta;
        if sweep && delta < 0.0 {
            delta += 2.0 * std::f64::consts::PI;
        } else if !sweep && delta > 0.0 {
            delta -= 2.0 * std::f64::consts::PI;
        }

        CenterArc {
            center,
            rx,
            ry,
            cos_phi,
            sin_phi,
            theta,
            delta,
        }
    }

    fn at(&self, theta: f64) -> Point {
        let (s, c) = theta.sin_cos();
        let x = self.rx * c;
        let y = self.ry * s;
        Point::new(
            self.center.x + self.cos_phi * x - self.sin_phi * y,
            self.center.y + self.sin_phi * x + self.cos_phi * y,
        )
    }

    /// Recursive angular bisection: insert a sample between any adjacent pair
    /// farther apart than `tolerance`.
    fn bisect(&self, t0: f64, p0: Point, t1: f64, p1: Point, tol: f64, depth: u32, out: &mut Vec<Point>) {
        if p0.dist(&p1) <= tol || depth >= MAX_DEPTH {
            out.push(p1);
        } else {
            let tm = 0.5 * (t0 + t1);
            let pm = self.at(tm);
            self.bisect(t0, p0, tm, pm, tol, depth + 1, out);
            self.bisect(tm, pm, t1, p1, tol, depth + 1, out);
        }
    }
}

/// Flattens an SVG elliptical arc given in endpoint parameterization.
///
/// `x_rotation` is in degrees, as in the path grammar. Negative radii are
/// taken by absolute value, and a zero radius degenerates the arc to a
/// straight line, both per the SVG error-handling rules. The first and last
/// output points are exactly `from` and `to`.
#[allow(clippy::too_many_arguments)]
pub fn flatten_arc(
    from: Point,
    to: Point,
    rx: f64,
    ry: f64,
    x_rotation: f64,
    large_arc: bool,
    sweep: bool,
    tolerance: f64,
) -> Result<Vec<Point>, Error> {
    if !(tolerance > 0.0) || !tolerance.is_finite() {
        return Err(Error::InvalidTolerance(tolerance));
    }
    let rx = rx.abs();
    let ry = ry.abs();
    if rx < EPS || ry < EPS || from.dist2(&to) < EPS * EPS {
        return Ok(vec![from, to]);
    }

    let arc = CenterArc::from_endpoints(from, to, rx, ry, x_rotation, large_arc, sweep);
    let t0 = arc.theta;
    let t2 = arc.theta + arc.delta;
    let tm = 0.5 * (t0 + t2);
    let pm = arc.at(tm);

    // Seed with endpoints and midpoint so a large arc whose endpoints happen
    // to be close together still gets sampled all the way around.
    let mut out = vec![from];
    arc.bisect(t0, from, tm, pm, tolerance, 1, &mut out);
    arc.bisect(tm, pm, t2, to, tolerance, 1, &mut out);
    // Pin the final point to the exact endpoint; the angular math drifts by
    // a few ulps.
    *out.last_mut().unwrap() = to;
    Ok(out)
}

/// Samples a whole ellipse around `center` into a closed ring of points.
///
/// Point-count doubling: start with 2 points and halve the angular step until
/// the chord error at the coarsest point drops under `tolerance` (compared
/// squared). The result is uniformly sampled, its length always a power of
/// two, and the ring is returned open — the first point is not repeated at
/// the end.
pub fn sample_ellipse(center: Point, rx: f64, ry: f64, tolerance: f64) -> Result<Vec<Point>, Error> {
    if rx <= 0.0 {
        return Err(Error::InvalidRadius(rx));
    }
    if ry <= 0.0 {
        return Err(Error::InvalidRadius(ry));
    }
    if !(tolerance > 0.0) || !tolerance.is_finite() {
        return Err(Error::InvalidTolerance(tolerance));
    }

    let tol2 = tolerance * tolerance;
    // Measure the chord from the major-axis vertex, where curvature is
    // greatest.
    let (p0, angle0) = if rx > ry {
        (Point::new(rx, 0.0), 0.0)
    } else {
        (Point::new(0.0, ry), std::f64::consts::FRAC_PI_2)
    };

    let mut step = std::f64::consts::PI;
    let mut n: u32 = 2;
    loop {
        step /= 2.0;
        n *= 2;
        let angle = angle0 + step;
        let q = Point::new(rx * angle.cos(), ry * angle.sin());
        if q.dist2(&p0) <= tol2 || n >= (1 << MAX_DEPTH) {
            break;
        }
    }

    let mut out = Vec::with_capacity(n as usize);
    for i in 0..n {
        let angle = 2.0 * std::f64::consts::PI * f64::from(i) / f64::from(n);
        out.push(Point::new(
            center.x + rx * angle.cos(),
            center.y + ry * angle.sin(),
        ));
    }
    Ok(out)
}
