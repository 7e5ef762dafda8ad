//! Decomposing closed primitives into back-and-forth coverage passes.
//!
//! The sweep direction is not hardcoded: the planner fits a principal-axis
//! basis to the primitive's vertices (closed-form eigendecomposition of the
//! 2×2 covariance matrix) and sweeps scan lines along the axis of maximum
//! variance, so elongated shapes are covered along their length. Successive
//! lines alternate direction (a boustrophedon sweep), which keeps the pen
//! from dragging back across the shape between lines.

use crate::geom::{Point, EPS};
use crate::primitive::Primitive;
use crate::Error;

/// An orthonormal basis fitted to a point set.
#[derive(Clone, Copy, Debug)]
pub struct Basis {
    /// In-line travel direction; scan lines run parallel to this.
    pub e1: Point,
    /// Sweep direction, the axis of maximum variance; scan lines advance
    /// along it.
    pub e2: Point,
}

/// Fits the principal-axis basis to a point set.
///
/// The covariance matrix is symmetric 2×2, so the eigenvalues come from the
/// quadratic formula directly. When the cross-covariance vanishes the
/// eigenvector formula degenerates; the basis falls back to the coordinate
/// axes, taking the axis of larger variance as `e2`.
pub fn principal_basis(points: &[Point]) -> Basis {
    let n = points.len() as f64;
    let mut mean = Point::new(0.0, 0.0);
    for p in points {
        mean += *p;
    }
    mean = mean * (1.0 / n);

    let (mut cxx, mut cxy, mut cyy) = (0.0, 0.0, 0.0);
    for p in points {
        let d = *p - mean;
        cxx += d.x * d.x;
        cxy += d.x * d.y;
        cyy += d.y * d.y;
    }
    cxx /= n;
    cxy /= n;
    cyy /= n;

    if cxy.abs() < EPS {
        return if cxx >= cyy {
            Basis {
                e1: Point::new(0.0, 1.0),
                e2: Point::new(1.0, 0.0),
            }
        } else {
            Basis {
                e1: Point::new(1.0, 0.0),
                e2: Point::new(0.0, 1.0),
            }
        };
    }

    let trace = cxx + cyy;
    let gap = ((cxx - cyy) * (cxx - cyy) + 4.0 * cxy * cxy).sqrt();
    let l1 = 0.5 * (trace + gap);
    let l2 = 0.5 * (trace - gap);
    let l = if l1.abs() >= l2.abs() { l1 } else { l2 };

    // (cxy, l - cxx) solves (C - l I) v = 0 whenever cxy != 0.
    let e2 = Point::new(cxy, l - cxx).normalized();
    Basis {
        e1: Point::new(-e2.y, e2.x),
        e2,
    }
}

/// Plans boustrophedon coverage for a closed primitive.
///
/// Returns entry/exit segment pairs in sweep order. Scan lines sit at
/// `h_min + step/2, h_min + 3*step/2, …` along the sweep axis, offset by half
/// a step so the first and last lines never graze the extremal vertices. An
/// open primitive is treated as closed through its start point; primitives
/// with fewer than three vertices produce an empty plan. A non-positive step
/// is [`Error::InvalidStep`].
pub fn plan(prim: &Primitive, step: f64) -> Result<Vec<(Point, Point)>, Error> {
    if !(step > 0.0) || !step.is_finite() {
        return Err(Error::InvalidStep(step));
    }
    let verts: Vec<Point> = prim.vertices().collect();
    if verts.len() < 3 {
        return Ok(Vec::new());
    }

    // Statistics run over the drawn vertices; the start only counts as an
    // implicit extra vertex when the outline does not return to it. (A closed
    // outline already ends with a vertex coincident with the start, and
    // counting the start again would skew the covariance.)
    let mut stats = prim.points.clone();
    if verts[0].dist2(verts.last().unwrap()) > EPS * EPS {
        stats.push(verts[0]);
    }
    let basis = principal_basis(&stats);

    // Edge list: consecutive vertex pairs plus the closing edge, each with
    // its projection range onto the sweep axis.
    let mut edges: Vec<(f64, f64, Point, Point)> = Vec::new();
    let mut add_edge = |a: Point, b: Point| {
        if a.dist2(&b) > EPS * EPS {
            let ha = basis.e2.dot(&a);
            let hb = basis.e2.dot(&b);
            edges.push((ha.min(hb), ha.max(hb), a, b));
        }
    };
    for w in verts.windows(2) {
        add_edge(w[0], w[1]);
    }
    add_edge(*verts.last().unwrap(), verts[0]);

    let h_min = edges
        .iter()
        .map(|e| e.0)
        .fold(f64::INFINITY, f64::min);
    let h_max = edges
        .iter()
        .map(|e| e.1)
        .fold(f64::NEG_INFINITY, f64::max);

    // Monotonic sweep: edges sorted by lower bound are activated as the line
    // reaches them and retired once it passes their upper bound.
    edges.sort_by(|a, b| a.0.total_cmp(&b.0));
    let mut active: Vec<(f64, f64, Point, Point)> = Vec::new();
    let mut next = 0;

    let mut out = Vec::new();
    let mut h = h_min + 0.5 * step;
    let mut line = 0usize;
    while h < h_max {
        while next < edges.len() && edges[next].0 <= h {
            active.push(edges[next]);
            next += 1;
        }
        active.retain(|e| e.1 >= h);

        let mut hits: Vec<Point> = Vec::new();
        for &(_, _, a, b) in &active {
            let ha = basis.e2.dot(&a);
            let hb = basis.e2.dot(&b);
            if (hb - ha).abs() < EPS {
                // Parallel to the scan line; its endpoints belong to the
                // neighboring edges.
                continue;
            }
            let t = (h - ha) / (hb - ha);
            if (-EPS..=1.0 + EPS).contains(&t) {
                hits.push(a.lerp(&b, t.clamp(0.0, 1.0)));
            }
        }

        hits.sort_by(|a, b| basis.e1.dot(a).total_cmp(&basis.e1.dot(b)));
        hits.dedup_by(|a, b| a.dist(b) <= EPS);
        if line % 2 == 1 {
            hits.reverse();
        }
        if hits.len() % 2 == 1 {
            // A scan line grazing a vertex can leave an unpaired crossing.
            log::trace!("dropping unpaired crossing on scan line {line}");
            hits.pop();
        }
        for pair in hits.chunks_exact(2) {
            out.push((pair[0], pair[1]));
        }

        h += step;
        line += 1;
    }
    Ok(out)
}
