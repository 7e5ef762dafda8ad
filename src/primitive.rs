//! The output unit of the pipeline: one continuous pen path as an owned
//! vertex sequence.

use crate::geom::{Point, EPS};
use crate::transform::Transform;

/// One continuous pen path: a start point, the vertices after it, and a
/// fill-eligibility flag.
///
/// The start point is kept separate from `points` for symmetry with the
/// source format, where a `moveto` establishes it before any drawing
/// command; [`Primitive::vertices`] iterates the full sequence. When `fill`
/// is true the primitive represents a closed region — [`Primitive::close`]
/// enforces the first-equals-last invariant before fill planning runs.
#[derive(Clone, Debug, PartialEq)]
pub struct Primitive {
    /// The pen-down position.
    pub start: Point,
    /// The vertices after `start`, in traversal order.
    pub points: Vec<Point>,
    /// Whether the enclosed region should be covered by the fill planner.
    pub fill: bool,
}

impl Primitive {
    /// A new, empty primitive starting at `start`.
    pub fn new(start: Point) -> Self {
        Primitive {
            start,
            points: Vec::new(),
            fill: false,
        }
    }

    /// Appends a vertex, suppressing it if it coincides with the previous
    /// one (zero-length segments carry no motion).
    pub fn push(&mut self, p: Point) {
        if self.last().dist2(&p) != 0.0 {
            self.points.push(p);
        }
    }

    /// The current pen position: the last vertex, or `start` when nothing
    /// has been drawn yet.
    pub fn last(&self) -> Point {
        *self.points.last().unwrap_or(&self.start)
    }

    /// Number of vertices after the start point.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when no drawing command has produced a vertex.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterates all vertices, start point first.
    pub fn vertices(&self) -> impl Iterator<Item = Point> + '_ {
        std::iter::once(self.start).chain(self.points.iter().copied())
    }

    /// True when the last vertex coincides with the start within [`EPS`].
    pub fn is_closed(&self) -> bool {
        self.last().dist2(&self.start) <= EPS * EPS
    }

    /// Appends a closing segment back to the start point unless the path is
    /// already closed.
    pub fn close(&mut self) {
        if !self.is_closed() {
            self.points.push(self.start);
        }
    }

    /// Applies an affine transform to every vertex, including the start.
    pub fn transform(&mut self, t: &Transform) {
        self.start = t.apply(self.start);
        for p in &mut self.points {
            *p = t.apply(*p);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_suppresses_zero_length() {
        let mut prim = Primitive::new(Point::new(0.0, 0.0));
        prim.push(Point::new(1.0, 0.0));
        prim.push(Point::new(1.0, 0.0));
        prim.push(Point::new(2.0, 0.0));
        assert_eq!(prim.len(), 2);
    }

    #[test]
    fn close_is_idempotent() {
        let mut prim = Primitive::new(Point::new(0.0, 0.0));
        prim.push(Point::new(1.0, 0.0));
        prim.push(Point::new(1.0, 1.0));
        assert!(!prim.is_closed());
        prim.close();
        assert!(prim.is_closed());
        let n = prim.len();
        prim.close();
        assert_eq!(prim.len(), n);
    }

    #[test]
    fn transform_moves_start() {
        let mut prim = Primitive::new(Point::new(1.0, 1.0));
        prim.push(Point::new(2.0, 1.0));
        prim.transform(&Transform::translate(10.0, 0.0));
        assert_eq!(prim.start, Point::new(11.0, 1.0));
        assert_eq!(prim.points[0], Point::new(12.0, 1.0));
    }
}
