//! Clipping primitives against the rectangular working area.
//!
//! The working area is `[0, width] × [0, height]`. A primitive that crosses
//! the boundary is split into the runs of its polyline lying inside; a closed
//! primitive additionally gets the straight chords that connect each exit
//! crossing to the next entry crossing, so the union of outputs is the
//! complete clipped outline. All comparisons use [`geom::EPS`]: SVG inputs
//! routinely place vertices exactly on the boundary.

use arrayvec::ArrayVec;

use crate::geom::{self, Point, EPS};
use crate::primitive::Primitive;

/// Is the point inside the working area, with [`EPS`] slack so that boundary
/// points count as inside?
fn is_inside(p: Point, width: f64, height: f64) -> bool {
    p.x >= -EPS && p.y >= -EPS && p.x <= width + EPS && p.y <= height + EPS
}

/// The working area's boundary, as a closed clockwise loop.
fn boundary(width: f64, height: f64) -> [(Point, Point); 4] {
    let c0 = Point::new(0.0, 0.0);
    let c1 = Point::new(width, 0.0);
    let c2 = Point::new(width, height);
    let c3 = Point::new(0.0, height);
    [(c0, c1), (c1, c2), (c2, c3), (c3, c0)]
}

/// All boundary crossings of the segment `a -> b`, ordered by the parameter
/// along the segment and deduplicated (a corner hit lands on two edges).
fn crossings(a: Point, b: Point, width: f64, height: f64) -> ArrayVec<(f64, Point), 4> {
    let mut hits: ArrayVec<(f64, Point), 4> = ArrayVec::new();
    for (e0, e1) in boundary(width, height) {
        if let Some((t, u)) = geom::line_intersection(a, b, e0, e1) {
            if t >= -EPS && t <= 1.0 + EPS && u >= -EPS && u <= 1.0 + EPS {
                hits.push((t.clamp(0.0, 1.0), a.lerp(&b, t.clamp(0.0, 1.0))));
            }
        }
    }
    hits.sort_by(|x, y| x.0.total_cmp(&y.0));
    let mut deduped: ArrayVec<(f64, Point), 4> = ArrayVec::new();
    for (t, p) in hits {
        if deduped.last().map_or(true, |(_, q)| q.dist(&p) > EPS) {
            deduped.push((t, p));
        }
    }
    deduped
}

/// Splits a primitive against the `[0, width] × [0, height]` working area.
///
/// Output pieces appear in the original traversal order and keep the source's
/// fill flag. For a closed (or fill-eligible) source whose first and last
/// vertices are inside, the first and last pieces are concatenated — the
/// shape wrapped around its closing point without leaving the area there, so
/// the seam is not a real boundary cut. Closed sources also produce a chord
/// primitive for every span spent outside the area, connecting the exit
/// crossing straight to the matching entry crossing.
pub fn split(prim: &Primitive, width: f64, height: f64) -> Vec<Primitive> {
    let verts: Vec<Point> = prim.vertices().collect();
    let first_inside = is_inside(verts[0], width, height);
    if verts.len() == 1 {
        return if first_inside {
            vec![prim.clone()]
        } else {
            Vec::new()
        };
    }
    let last_inside = is_inside(*verts.last().unwrap(), width, height);
    let closed = prim.fill || verts[0].dist2(verts.last().unwrap()) <= EPS * EPS;

    let mut pieces: Vec<Vec<Point>> = Vec::new();
    let mut current: Option<Vec<Point>> = first_inside.then(|| vec![verts[0]]);

    for w in verts.windows(2) {
        let (a, b) = (w[0], w[1]);
        match (is_inside(a, width, height), is_inside(b, width, height)) {
            (true, true) => {
                // The area is convex, so the whole segment is inside.
                current.get_or_insert_with(|| vec![a]).push(b);
            }
            (true, false) => {
                // Leaving: cut at the crossing nearest the outside end. (A
                // crossing can also show up near t=0 when `a` sits exactly on
                // the boundary; that one is not the exit.)
                let cut = crossings(a, b, width, height)
                    .last()
                    .map(|&(_, p)| p)
                    .unwrap_or(a);
                let mut piece = current.take().unwrap_or_else(|| vec![a]);
                piece.push(cut);
                pieces.push(piece);
            }
            (false, true) => {
                // Entering: cut at the first crossing.
                let cut = crossings(a, b, width, height)
                    .first()
                    .map(|&(_, p)| p)
                    .unwrap_or(b);
                current = Some(vec![cut, b]);
            }
            (false, false) => {
                // Both ends outside, but the segment may still pass through
                // the area; two distinct crossings make a chord.
                let hits = crossings(a, b, width, height);
                if let (Some(&(_, p)), Some(&(_, q))) = (hits.first(), hits.last()) {
                    if p.dist(&q) > EPS {
                        pieces.push(vec![p, q]);
                    }
                }
            }
        }
    }
    if let Some(piece) = current.take() {
        pieces.push(piece);
    }

    // Whether the boundary actually cut something; chords only bridge real
    // cuts.
    let was_cut = pieces.len() > 1 || !first_inside || !last_inside;

    // Re-stitch: the shape wrapped around its closing point while staying
    // inside, so the break between the last and first pieces is artificial.
    if closed && first_inside && last_inside && pieces.len() > 1 {
        let mut merged = pieces.pop().unwrap();
        merged.extend_from_slice(&pieces[0]);
        pieces[0] = merged;
    }

    let mut out = Vec::new();
    let n = pieces.len();
    for (i, piece) in pieces.iter().enumerate() {
        if let Some(p) = build(piece, prim.fill) {
            out.push(p);
        }
        if closed && was_cut {
            // The span between this piece and the next was outside the area;
            // bridge it with the straight cut chord.
            let from = *piece.last().unwrap();
            let to = pieces[(i + 1) % n][0];
            if from.dist(&to) > EPS {
                let mut chord = Primitive::new(from);
                chord.push(to);
                out.push(chord);
            }
        }
    }
    out
}

/// Builds a primitive from a raw vertex run, dropping it if deduplication
/// leaves no motion.
fn build(piece: &[Point], fill: bool) -> Option<Primitive> {
    let mut prim = Primitive::new(piece[0]);
    for &p in &piece[1..] {
        prim.push(p);
    }
    if prim.is_empty() {
        return None;
    }
    prim.fill = fill;
    Some(prim)
}
