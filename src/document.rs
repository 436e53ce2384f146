use crate::diagnostics::Warning;
use crate::gradient::{CoordUnits, Gradient, GradientRegistry};
use crate::matrix::Matrix;
use crate::path::Path;
use crate::style::PathStyle;
use crate::types::Bounds;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct StyledPath {
    pub path: Path,
    pub style: PathStyle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mask {
    pub id: String,
    pub paths: Vec<StyledPath>,
    // Mask region, in `units`.
    pub bounds: Bounds,
    // User space of `bounds`. Mask paths carry their own full transform.
    pub transform: Matrix,
    pub units: CoordUnits,
}

#[derive(Debug, Clone, Default)]
pub struct Document {
    // `width` attribute of the root element, as written.
    pub width: String,
    // `height` attribute of the root element, as written.
    pub height: String,
    pub view_box: Bounds,
    // Maps the view box onto the viewport.
    pub transform: Matrix,
    pub masks: HashMap<String, Mask>,
    pub gradients: GradientRegistry,
    pub paths: Vec<StyledPath>,
    pub warnings: Vec<Warning>,
}

impl Document {
    pub fn mask(&self, id: &str) -> Option<&Mask> {
        self.masks.get(id)
    }

    pub fn gradient(&self, id: &str) -> Option<&Gradient> {
        self.gradients.get(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Min,
    Mid,
    Max,
}

impl Align {
    fn offset(self, free: f32) -> f32 {
        match self {
            Align::Min => 0.0,
            Align::Mid => free / 2.0,
            Align::Max => free,
        }
    }
}

fn parse_align(s: &str) -> Option<Align> {
    match s {
        "Min" => Some(Align::Min),
        "Mid" => Some(Align::Mid),
        "Max" => Some(Align::Max),
        _ => None,
    }
}

// Transform placing `view_box` into a `width` × `height` viewport according
// to `preserveAspectRatio`. Unrecognized values fall back to `xMidYMid meet`.
pub(crate) fn view_box_transform(
    view_box: Bounds,
    width: f32,
    height: f32,
    preserve_aspect_ratio: Option<&str>,
) -> Matrix {
    if view_box.is_empty() {
        return Matrix::IDENTITY;
    }
    let sx = width / view_box.width;
    let sy = height / view_box.height;

    let mut words = preserve_aspect_ratio.unwrap_or("").split_whitespace();
    let mut align = words.next().unwrap_or("xMidYMid");
    if align == "defer" {
        align = words.next().unwrap_or("xMidYMid");
    }
    let slice = words.next() == Some("slice");

    if align == "none" {
        return Matrix::scale(sx, sy)
            .multiply(Matrix::translate(-view_box.x, -view_box.y));
    }
    let (ax, ay) = align
        .strip_prefix('x')
        .and_then(|rest| rest.split_once('Y'))
        .and_then(|(x, y)| Some((parse_align(x)?, parse_align(y)?)))
        .unwrap_or((Align::Mid, Align::Mid));

    let s = if slice { sx.max(sy) } else { sx.min(sy) };
    let tx = ax.offset(width - view_box.width * s) - view_box.x * s;
    let ty = ay.offset(height - view_box.height * s) - view_box.y * s;
    Matrix::translate(tx, ty).multiply(Matrix::scale(s, s))
}
