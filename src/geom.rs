//! Geometric primitives: points, vectors, and segment intersection.

/// The shared tolerance for geometric comparisons.
///
/// Every inside/outside test, coincidence check, and parameter-range check in
/// the clipping and fill-planning code uses this one value, because SVG inputs
/// routinely place vertices exactly on the viewport boundary and mixing
/// epsilons there leads to missed or duplicated crossings.
pub const EPS: f64 = 1e-8;

/// A two-dimensional point.
#[derive(Clone, Copy, PartialEq)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate. Larger values are down, as in SVG.
    pub y: f64,
}

impl std::fmt::Debug for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:?}, {:?})", self.x, self.y)
    }
}

impl Point {
    /// Create a new point.
    pub fn new(x: f64, y: f64) -> Self {
        debug_assert!(x.is_finite());
        debug_assert!(y.is_finite());
        Point { x, y }
    }

    /// Compute an affine combination between `self` and `other`; that is,
    /// `(1 - t) * self + t * other`.
    pub fn lerp(&self, other: &Self, t: f64) -> Self {
        Point {
            x: (1.0 - t) * self.x + t * other.x,
            y: (1.0 - t) * self.y + t * other.y,
        }
    }

    /// Dot product, treating both points as vectors from the origin.
    pub fn dot(&self, other: &Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// The z component of the cross product, treating both points as vectors.
    pub fn cross(&self, other: &Self) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// Squared distance from the origin.
    pub fn len2(&self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    /// Distance from the origin.
    pub fn len(&self) -> f64 {
        self.len2().sqrt()
    }

    /// Squared distance to another point.
    pub fn dist2(&self, other: &Self) -> f64 {
        (*self - *other).len2()
    }

    /// Distance to another point.
    pub fn dist(&self, other: &Self) -> f64 {
        self.dist2(other).sqrt()
    }

    /// The unit vector in this direction, or the zero vector if `self` is
    /// within [`EPS`] of the origin.
    pub fn normalized(&self) -> Self {
        let len = self.len();
        if len < EPS {
            Point { x: 0.0, y: 0.0 }
        } else {
            Point {
                x: self.x / len,
                y: self.y / len,
            }
        }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl std::ops::Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl std::ops::Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl std::ops::Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point {
            x: self.x * rhs,
            y: self.y * rhs,
        }
    }
}

impl std::ops::AddAssign for Point {
    fn add_assign(&mut self, rhs: Point) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

/// A three-dimensional vector.
///
/// The geometry core works in the plane; this type only exists for the
/// coordinate-system collaborator that maps plane coordinates into the
/// robot's frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vec3 {
    /// First component.
    pub x: f64,
    /// Second component.
    pub y: f64,
    /// Third component.
    pub z: f64,
}

impl Vec3 {
    /// Create a new vector.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Vec3 { x, y, z }
    }

    /// Dot product.
    pub fn dot(&self, other: &Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product.
    pub fn cross(&self, other: &Self) -> Self {
        Vec3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }
}

impl std::ops::Add for Vec3 {
    type Output = Vec3;

    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3 {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
            z: self.z + rhs.z,
        }
    }
}

impl std::ops::Sub for Vec3 {
    type Output = Vec3;

    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3 {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
            z: self.z - rhs.z,
        }
    }
}

impl std::ops::Mul<f64> for Vec3 {
    type Output = Vec3;

    fn mul(self, rhs: f64) -> Vec3 {
        Vec3 {
            x: self.x * rhs,
            y: self.y * rhs,
            z: self.z * rhs,
        }
    }
}

/// Solves for the intersection of the lines through `a0 -> a1` and
/// `b0 -> b1`, returning the parameters `(t, u)` such that
/// `a0 + t * (a1 - a0) == b0 + u * (b1 - b0)`.
///
/// Returns `None` when the lines are parallel (or either segment is
/// degenerate), detected by the cross product of the directions falling
/// under [`EPS`].
pub fn line_intersection(a0: Point, a1: Point, b0: Point, b1: Point) -> Option<(f64, f64)> {
    let da = a1 - a0;
    let db = b1 - b0;
    let denom = da.cross(&db);
    if denom.abs() < EPS {
        return None;
    }
    let diff = b0 - a0;
    let t = diff.cross(&db) / denom;
    let u = diff.cross(&da) / denom;
    Some((t, u))
}

/// Intersects the segment `a0 -> a1` with the segment `b0 -> b1`.
///
/// Both parameters must land in `[0, 1]`, with [`EPS`] slack so that
/// endpoints sitting exactly on the other segment still count.
pub fn segment_intersection(a0: Point, a1: Point, b0: Point, b1: Point) -> Option<Point> {
    let (t, u) = line_intersection(a0, a1, b0, b1)?;
    if t < -EPS || t > 1.0 + EPS || u < -EPS || u > 1.0 + EPS {
        return None;
    }
    Some(a0.lerp(&a1, t.clamp(0.0, 1.0)))
}
