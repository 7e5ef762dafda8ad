//! Affine transforms, the SVG `transform` attribute grammar, and the
//! per-nesting-level transform stack.

use crate::geom::Point;

/// A 2×3 affine transform, `[[m00, m01, m02], [m10, m11, m12]]`.
///
/// Composition follows SVG semantics: in `a.compose(&b)`, `b`'s effect is
/// applied to a point first. Composition is associative but not commutative.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    m: [[f64; 3]; 2],
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    /// The identity transform.
    pub fn identity() -> Self {
        Transform {
            m: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
        }
    }

    /// Builds a transform from the six SVG `matrix(a, b, c, d, e, f)`
    /// coefficients, which are in column order.
    pub fn matrix(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Transform {
            m: [[a, c, e], [b, d, f]],
        }
    }

    /// A translation.
    pub fn translate(tx: f64, ty: f64) -> Self {
        Transform {
            m: [[1.0, 0.0, tx], [0.0, 1.0, ty]],
        }
    }

    /// A scale about the origin.
    pub fn scale(sx: f64, sy: f64) -> Self {
        Transform {
            m: [[sx, 0.0, 0.0], [0.0, sy, 0.0]],
        }
    }

    /// A rotation about the origin; the angle is in degrees, as in the SVG
    /// grammar.
    pub fn rotate(degrees: f64) -> Self {
        let (s, c) = degrees.to_radians().sin_cos();
        Transform {
            m: [[c, -s, 0.0], [s, c, 0.0]],
        }
    }

    /// A rotation about `(cx, cy)`, built as
    /// `translate(cx, cy) ∘ rotate(angle) ∘ translate(-cx, -cy)`.
    pub fn rotate_about(degrees: f64, cx: f64, cy: f64) -> Self {
        Transform::translate(cx, cy)
            .compose(&Transform::rotate(degrees))
            .compose(&Transform::translate(-cx, -cy))
    }

    /// A horizontal shear; the angle is in degrees.
    pub fn skew_x(degrees: f64) -> Self {
        Transform {
            m: [[1.0, degrees.to_radians().tan(), 0.0], [0.0, 1.0, 0.0]],
        }
    }

    /// A vertical shear; the angle is in degrees.
    pub fn skew_y(degrees: f64) -> Self {
        Transform {
            m: [[1.0, 0.0, 0.0], [degrees.to_radians().tan(), 1.0, 0.0]],
        }
    }

    /// Composes two transforms; `other`'s effect applies to a point before
    /// `self`'s.
    pub fn compose(&self, other: &Transform) -> Transform {
        let a = &self.m;
        let b = &other.m;
        Transform {
            m: [
                [
                    a[0][0] * b[0][0] + a[0][1] * b[1][0],
                    a[0][0] * b[0][1] + a[0][1] * b[1][1],
                    a[0][0] * b[0][2] + a[0][1] * b[1][2] + a[0][2],
                ],
                [
                    a[1][0] * b[0][0] + a[1][1] * b[1][0],
                    a[1][0] * b[0][1] + a[1][1] * b[1][1],
                    a[1][0] * b[0][2] + a[1][1] * b[1][2] + a[1][2],
                ],
            ],
        }
    }

    /// Applies the transform to a point.
    pub fn apply(&self, p: Point) -> Point {
        Point::new(
            self.m[0][0] * p.x + self.m[0][1] * p.y + self.m[0][2],
            self.m[1][0] * p.x + self.m[1][1] * p.y + self.m[1][2],
        )
    }

    /// Parses an SVG `transform` attribute value.
    ///
    /// Recognized functions are `matrix`, `translate`, `scale`, `rotate`,
    /// `skewX`, and `skewY`; multiple whitespace-or-comma-separated functions
    /// compose left to right. Parsing is permissive: any malformed function
    /// makes the whole attribute count as identity, with a diagnostic on the
    /// `log` facade, because one bad tag must not abort a whole conversion.
    pub fn parse(attr: &str) -> Transform {
        match Self::parse_strict(attr) {
            Some(t) => t,
            None => {
                log::warn!("malformed transform attribute {attr:?}, treating as identity");
                Transform::identity()
            }
        }
    }

    fn parse_strict(attr: &str) -> Option<Transform> {
        let mut result = Transform::identity();
        let mut rest = attr.trim_start();
        while !rest.is_empty() {
            let open = rest.find('(')?;
            let name = rest[..open].trim();
            let close = rest.find(')')?;
            if close < open {
                return None;
            }
            let args: Vec<f64> = rest[open + 1..close]
                .split(|c: char| c.is_whitespace() || c == ',')
                .filter(|s| !s.is_empty())
                .map(str::parse)
                .collect::<Result<_, _>>()
                .ok()?;

            let t = match (name, args.as_slice()) {
                ("matrix", &[a, b, c, d, e, f]) => Transform::matrix(a, b, c, d, e, f),
                ("translate", &[tx]) => Transform::translate(tx, 0.0),
                ("translate", &[tx, ty]) => Transform::translate(tx, ty),
                ("scale", &[s]) => Transform::scale(s, s),
                ("scale", &[sx, sy]) => Transform::scale(sx, sy),
                ("rotate", &[a]) => Transform::rotate(a),
                ("rotate", &[a, cx, cy]) => Transform::rotate_about(a, cx, cy),
                ("skewX", &[a]) => Transform::skew_x(a),
                ("skewY", &[a]) => Transform::skew_y(a),
                _ => return None,
            };
            result = result.compose(&t);

            rest = rest[close + 1..].trim_start_matches(|c: char| c.is_whitespace() || c == ',');
        }
        Some(result)
    }
}

/// Tracks the composed transform across nested grouping elements.
///
/// Entering a group pushes the group's own transform composed onto the
/// running product; the transform active for a leaf element is the product of
/// all of its ancestors' transforms, with transforms closer to the leaf
/// applied first.
#[derive(Clone, Debug)]
pub struct TransformStack {
    stack: Vec<Transform>,
}

impl Default for TransformStack {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformStack {
    /// A stack holding only the identity.
    pub fn new() -> Self {
        TransformStack {
            stack: vec![Transform::identity()],
        }
    }

    /// Enters a nesting level with the given transform.
    pub fn push(&mut self, t: &Transform) {
        let composed = self.current().compose(t);
        self.stack.push(composed);
    }

    /// The composition active at the current nesting level.
    pub fn current(&self) -> Transform {
        *self.stack.last().unwrap()
    }

    /// Leaves a nesting level. The root identity is never popped.
    pub fn pop(&mut self) {
        if self.stack.len() > 1 {
            self.stack.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::tests::point;
    use proptest::prelude::*;

    fn close(a: Point, b: Point) -> bool {
        a.dist(&b) < 1e-9
    }

    #[test]
    fn parse_single_functions() {
        let p = Point::new(1.0, 0.0);
        assert!(close(
            Transform::parse("translate(3 4)").apply(p),
            Point::new(4.0, 4.0)
        ));
        assert!(close(
            Transform::parse("translate(3)").apply(p),
            Point::new(4.0, 0.0)
        ));
        assert!(close(
            Transform::parse("scale(2)").apply(p),
            Point::new(2.0, 0.0)
        ));
        assert!(close(
            Transform::parse("scale(2, 3)").apply(Point::new(1.0, 1.0)),
            Point::new(2.0, 3.0)
        ));
        assert!(close(
            Transform::parse("rotate(90)").apply(p),
            Point::new(0.0, 1.0)
        ));
        assert!(close(
            Transform::parse("matrix(1,0,0,1,5,6)").apply(p),
            Point::new(6.0, 6.0)
        ));
        assert!(close(
            Transform::parse("skewX(45)").apply(Point::new(0.0, 1.0)),
            Point::new(1.0, 1.0)
        ));
        assert!(close(
            Transform::parse("skewY(45)").apply(Point::new(1.0, 0.0)),
            Point::new(1.0, 1.0)
        ));
    }

    #[test]
    fn rotate_about_center() {
        // Rotating the center's neighbor by 180 degrees lands on the other
        // side of the center.
        let t = Transform::parse("rotate(180, 5, 5)");
        assert!(close(t.apply(Point::new(6.0, 5.0)), Point::new(4.0, 5.0)));
        assert!(close(t.apply(Point::new(5.0, 5.0)), Point::new(5.0, 5.0)));
    }

    #[test]
    fn list_composes_left_to_right() {
        // translate then scale: the scale is applied to the point first.
        let t = Transform::parse("translate(10, 0) scale(2)");
        assert!(close(t.apply(Point::new(1.0, 1.0)), Point::new(12.0, 2.0)));
    }

    #[test]
    fn malformed_attribute_is_identity() {
        let p = Point::new(3.0, 7.0);
        for attr in [
            "florp(1)",
            "translate(1",
            "translate(a, b)",
            "scale()",
            "rotate(1, 2)",
            "translate(1) garbage(2)",
        ] {
            assert_eq!(Transform::parse(attr).apply(p), p, "attr {attr:?}");
        }
    }

    #[test]
    fn stack_nesting() {
        let mut stack = TransformStack::new();
        stack.push(&Transform::translate(10.0, 0.0));
        stack.push(&Transform::scale(2.0, 2.0));
        // Inner scale applies before the outer translate.
        assert!(close(
            stack.current().apply(Point::new(1.0, 1.0)),
            Point::new(12.0, 2.0)
        ));
        stack.pop();
        assert!(close(
            stack.current().apply(Point::new(1.0, 1.0)),
            Point::new(11.0, 1.0)
        ));
        stack.pop();
        stack.pop(); // popping past the root is a no-op
        assert_eq!(stack.current(), Transform::identity());
    }

    fn to_kurbo(t: &Transform) -> kurbo::Affine {
        kurbo::Affine::new([t.m[0][0], t.m[1][0], t.m[0][1], t.m[1][1], t.m[0][2], t.m[1][2]])
    }

    fn transform() -> BoxedStrategy<Transform> {
        proptest::array::uniform6(-10.0..10.0f64)
            .prop_map(|[a, b, c, d, e, f]| Transform::matrix(a, b, c, d, e, f))
            .boxed()
    }

    proptest! {
        #[test]
        fn composition_associative(
            a in transform(),
            b in transform(),
            c in transform(),
            p in point(),
        ) {
            let left = a.compose(&b).compose(&c).apply(p);
            let right = a.compose(&b.compose(&c)).apply(p);
            prop_assert!(left.dist(&right) < 1e-6);
        }

        #[test]
        fn compose_matches_kurbo(a in transform(), b in transform(), p in point()) {
            let ours = a.compose(&b).apply(p);
            let theirs = (to_kurbo(&a) * to_kurbo(&b)) * kurbo::Point::new(p.x, p.y);
            prop_assert!((ours.x - theirs.x).abs() < 1e-6);
            prop_assert!((ours.y - theirs.y).abs() < 1e-6);
        }
    }
}
