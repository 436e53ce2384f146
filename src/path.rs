use crate::types::{Fx, Point};
use std::fmt;

// One drawing operation. Coordinates are absolute, in sub-pixel units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathOp {
    MoveTo(Point),
    LineTo(Point),
    QuadTo(Point, Point),
    CubicTo(Point, Point, Point),
    // Closes the subpath opened by the latest `MoveTo`.
    Close,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Path {
    ops: Vec<PathOp>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(&mut self, p: Point) {
        self.ops.push(PathOp::MoveTo(p));
    }

    pub fn line_to(&mut self, p: Point) {
        self.ops.push(PathOp::LineTo(p));
    }

    pub fn quad_to(&mut self, c: Point, p: Point) {
        self.ops.push(PathOp::QuadTo(c, p));
    }

    pub fn cubic_to(&mut self, c1: Point, c2: Point, p: Point) {
        self.ops.push(PathOp::CubicTo(c1, c2, p));
    }

    pub fn close(&mut self) {
        self.ops.push(PathOp::Close);
    }

    // Empties the program but keeps its allocation.
    pub fn clear(&mut self) {
        self.ops.clear();
    }

    pub fn ops(&self) -> &[PathOp] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    // Moves the operations out, leaving an empty path with the same capacity.
    pub(crate) fn take(&mut self) -> Path {
        let ops = self.ops.drain(..).collect();
        Path { ops }
    }

    // Bounding box over all on-curve and control points.
    pub fn bounds(&self) -> Option<(Point, Point)> {
        let mut min: Option<Point> = None;
        let mut max: Option<Point> = None;
        let mut add = |p: Point| {
            min = Some(match min {
                Some(m) => Point {
                    x: m.x.min(p.x),
                    y: m.y.min(p.y),
                },
                None => p,
            });
            max = Some(match max {
                Some(m) => Point {
                    x: m.x.max(p.x),
                    y: m.y.max(p.y),
                },
                None => p,
            });
        };
        for op in &self.ops {
            match *op {
                PathOp::MoveTo(p) | PathOp::LineTo(p) => add(p),
                PathOp::QuadTo(c, p) => {
                    add(c);
                    add(p);
                }
                PathOp::CubicTo(c1, c2, p) => {
                    add(c1);
                    add(c2);
                    add(p);
                }
                PathOp::Close => {}
            }
        }
        Some((min?, max?))
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, op) in self.ops.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            match op {
                PathOp::MoveTo(p) => write!(f, "M{p}")?,
                PathOp::LineTo(p) => write!(f, "L{p}")?,
                PathOp::QuadTo(c, p) => write!(f, "Q{c} {p}")?,
                PathOp::CubicTo(c1, c2, p) => write!(f, "C{c1} {c2} {p}")?,
                PathOp::Close => f.write_str("Z")?,
            }
        }
        Ok(())
    }
}

// Writes into a `Path`, shifting every point by a drawing origin.
pub(crate) struct Pen<'a> {
    path: &'a mut Path,
    dx: f32,
    dy: f32,
}

impl<'a> Pen<'a> {
    pub(crate) fn new(path: &'a mut Path, origin: (f32, f32)) -> Self {
        Self {
            path,
            dx: origin.0,
            dy: origin.1,
        }
    }

    fn pt(&self, x: f32, y: f32) -> Point {
        Point {
            x: Fx::from_f32(x + self.dx),
            y: Fx::from_f32(y + self.dy),
        }
    }

    pub(crate) fn move_to(&mut self, x: f32, y: f32) {
        let p = self.pt(x, y);
        self.path.move_to(p);
    }

    pub(crate) fn line_to(&mut self, x: f32, y: f32) {
        let p = self.pt(x, y);
        self.path.line_to(p);
    }

    pub(crate) fn quad_to(&mut self, cx: f32, cy: f32, x: f32, y: f32) {
        let c = self.pt(cx, cy);
        let p = self.pt(x, y);
        self.path.quad_to(c, p);
    }

    pub(crate) fn cubic_to(&mut self, c1: (f32, f32), c2: (f32, f32), p: (f32, f32)) {
        let c1 = self.pt(c1.0, c1.1);
        let c2 = self.pt(c2.0, c2.1);
        let p = self.pt(p.0, p.1);
        self.path.cubic_to(c1, c2, p);
    }

    pub(crate) fn close(&mut self) {
        self.path.close();
    }
}
