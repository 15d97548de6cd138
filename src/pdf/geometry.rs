use std::ops::Mul;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Point { x, y }
    }
}

/// Where to open a document: 1-indexed page plus a point on it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub page: u32,
    pub x: f32,
    pub y: f32,
}

/// Affine transform in PDF row-vector form:
/// `x' = a*x + c*y + e`, `y' = b*x + d*y + f`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Matrix {
    pub const fn new(a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> Self {
        Matrix { a, b, c, d, e, f }
    }

    pub fn apply(&self, p: Point) -> Point {
        Point {
            x: self.a * p.x + self.c * p.y + self.e,
            y: self.b * p.x + self.d * p.y + self.f,
        }
    }
}

impl Mul<Matrix> for Point {
    type Output = Point;

    fn mul(self, m: Matrix) -> Point {
        m.apply(self)
    }
}

/// Page rectangle in PDF user space, normalized so `x0 <= x1` and `y0 <= y1`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl Rect {
    /// US Letter, the default when a page declares no box
    pub const LETTER: Rect = Rect {
        x0: 0.0,
        y0: 0.0,
        x1: 612.0,
        y1: 792.0,
    };

    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Rect {
            x0: x0.min(x1),
            y0: y0.min(y1),
            x1: x0.max(x1),
            y1: y0.max(y1),
        }
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    pub fn is_empty(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    pub fn intersect(&self, other: &Rect) -> Rect {
        Rect {
            x0: self.x0.max(other.x0),
            y0: self.y0.max(other.y0),
            x1: self.x1.min(other.x1),
            y1: self.y1.min(other.y1),
        }
    }
}

/// Clockwise page rotation, normalized to a quarter turn.
/// Values that are not a multiple of 90 are treated as no rotation.
pub fn normalize_rotation(degrees: i64) -> u32 {
    let degrees = degrees.rem_euclid(360);
    if degrees % 90 == 0 {
        degrees as u32
    } else {
        0
    }
}

/// Transform from PDF page space to device space.
///
/// Device space has its origin at the top-left corner of the page box with
/// y growing downward. Rotated pages are flipped against the box height
/// only, without applying the rotation, which is the unrotated space
/// MuPDF-based viewers take positions in.
pub fn page_transform(page_box: Rect, rotation: u32) -> Matrix {
    if rotation == 0 {
        Matrix::new(1.0, 0.0, 0.0, -1.0, -page_box.x0, page_box.y1)
    } else {
        Matrix::new(1.0, 0.0, 0.0, -1.0, 0.0, page_box.height())
    }
}
