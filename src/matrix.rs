use crate::error::{Result, SvgError};
use crate::path_data::parse_number_list;

// Maps `(x, y)` to `(sx*x + kx*y + tx, ky*x + sy*y + ty)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix {
    pub sx: f32,
    pub kx: f32,
    pub tx: f32,
    pub ky: f32,
    pub sy: f32,
    pub ty: f32,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix {
    pub const IDENTITY: Matrix = Matrix {
        sx: 1.0,
        kx: 0.0,
        tx: 0.0,
        ky: 0.0,
        sy: 1.0,
        ty: 0.0,
    };

    pub fn new(sx: f32, kx: f32, tx: f32, ky: f32, sy: f32, ty: f32) -> Self {
        Self {
            sx,
            kx,
            tx,
            ky,
            sy,
            ty,
        }
    }

    pub fn translate(dx: f32, dy: f32) -> Self {
        Self {
            tx: dx,
            ty: dy,
            ..Self::IDENTITY
        }
    }

    pub fn scale(sx: f32, sy: f32) -> Self {
        Self {
            sx,
            sy,
            ..Self::IDENTITY
        }
    }

    pub fn rotate(theta: f32) -> Self {
        let s = libm::sinf(theta);
        let c = libm::cosf(theta);
        Self {
            sx: c,
            kx: -s,
            ky: s,
            sy: c,
            ..Self::IDENTITY
        }
    }

    pub fn skew_x(theta: f32) -> Self {
        Self {
            kx: libm::tanf(theta),
            ..Self::IDENTITY
        }
    }

    pub fn skew_y(theta: f32) -> Self {
        Self {
            ky: libm::tanf(theta),
            ..Self::IDENTITY
        }
    }

    // `self · other`: `other` operates in the coordinate space produced by `self`.
    pub fn multiply(self, other: Matrix) -> Matrix {
        Matrix {
            sx: self.sx * other.sx + self.kx * other.ky,
            kx: self.sx * other.kx + self.kx * other.sy,
            tx: self.sx * other.tx + self.kx * other.ty + self.tx,
            ky: self.ky * other.sx + self.sy * other.ky,
            sy: self.ky * other.kx + self.sy * other.sy,
            ty: self.ky * other.tx + self.sy * other.ty + self.ty,
        }
    }

    pub fn determinant(&self) -> f32 {
        self.sx * self.sy - self.kx * self.ky
    }

    // Inverse through the adjugate of the homogeneous 3x3 matrix.
    pub fn invert(&self) -> Result<Matrix> {
        let m = [
            [self.sx, self.kx, self.tx],
            [self.ky, self.sy, self.ty],
            [0.0, 0.0, 1.0],
        ];
        let cofactor = |r: usize, c: usize| -> f32 {
            let rows: Vec<usize> = (0..3).filter(|&i| i != r).collect();
            let cols: Vec<usize> = (0..3).filter(|&j| j != c).collect();
            let minor = m[rows[0]][cols[0]] * m[rows[1]][cols[1]]
                - m[rows[0]][cols[1]] * m[rows[1]][cols[0]];
            if (r + c) % 2 == 0 { minor } else { -minor }
        };

        let det = m[0][0] * cofactor(0, 0) + m[0][1] * cofactor(0, 1) + m[0][2] * cofactor(0, 2);
        if det == 0.0 {
            return Err(SvgError::SingularMatrix);
        }

        // adjugate[i][j] = cofactor(j, i)
        let inv = |i: usize, j: usize| cofactor(j, i) / det;
        Ok(Matrix {
            sx: inv(0, 0),
            kx: inv(0, 1),
            tx: inv(0, 2),
            ky: inv(1, 0),
            sy: inv(1, 1),
            ty: inv(1, 2),
        })
    }

    pub fn transform_point(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.sx * x + self.kx * y + self.tx,
            self.ky * x + self.sy * y + self.ty,
        )
    }

    pub fn transform_vector(&self, x: f32, y: f32) -> (f32, f32) {
        (self.sx * x + self.kx * y, self.ky * x + self.sy * y)
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    pub fn approx_eq(&self, other: &Matrix, tolerance: f32) -> bool {
        (self.sx - other.sx).abs() <= tolerance
            && (self.kx - other.kx).abs() <= tolerance
            && (self.tx - other.tx).abs() <= tolerance
            && (self.ky - other.ky).abs() <= tolerance
            && (self.sy - other.sy).abs() <= tolerance
            && (self.ty - other.ty).abs() <= tolerance
    }
}

/// Parses an SVG `transform` attribute.
///
/// Functions compose as written: the rightmost one acts first on local coordinates.
pub fn parse_transform(input: &str) -> Result<Matrix> {
    let mut funcs = Vec::new();
    let mut rest = input.trim();

    while !rest.is_empty() {
        let Some(open) = rest.find('(') else {
            return Err(SvgError::MalformedTransform(input.to_string()));
        };
        let name = rest[..open].trim();
        let Some(close) = rest[open + 1..].find(')') else {
            return Err(SvgError::MalformedTransform(input.to_string()));
        };
        let args_str = &rest[open + 1..open + 1 + close];
        let args = parse_number_list(args_str)
            .ok_or_else(|| SvgError::MalformedTransform(input.to_string()))?;
        funcs.push(transform_function(name, &args)?);
        rest = rest[open + 1 + close + 1..]
            .trim_start_matches(|c: char| c.is_whitespace() || c == ',');
    }

    Ok(funcs
        .into_iter()
        .rev()
        .fold(Matrix::IDENTITY, |acc, m| m.multiply(acc)))
}

fn transform_function(name: &str, args: &[f32]) -> Result<Matrix> {
    let m = match (name, args) {
        ("matrix", [a, b, c, d, e, f]) => Matrix::new(*a, *c, *e, *b, *d, *f),
        ("matrix", _) => return Err(SvgError::param_mismatch("matrix", "6", args.len())),
        ("translate", [dx]) => Matrix::translate(*dx, 0.0),
        ("translate", [dx, dy]) => Matrix::translate(*dx, *dy),
        ("translate", _) => return Err(SvgError::param_mismatch("translate", "1 or 2", args.len())),
        ("scale", [s]) => Matrix::scale(*s, *s),
        ("scale", [sx, sy]) => Matrix::scale(*sx, *sy),
        ("scale", _) => return Err(SvgError::param_mismatch("scale", "1 or 2", args.len())),
        ("rotate", [deg]) => Matrix::rotate(deg.to_radians()),
        ("rotate", [deg, cx, cy]) => Matrix::translate(*cx, *cy)
            .multiply(Matrix::rotate(deg.to_radians()))
            .multiply(Matrix::translate(-cx, -cy)),
        ("rotate", _) => return Err(SvgError::param_mismatch("rotate", "1 or 3", args.len())),
        ("skewX", [deg]) => Matrix::skew_x(deg.to_radians()),
        ("skewX", _) => return Err(SvgError::param_mismatch("skewX", "1", args.len())),
        ("skewY", [deg]) => Matrix::skew_y(deg.to_radians()),
        ("skewY", _) => return Err(SvgError::param_mismatch("skewY", "1", args.len())),
        _ => return Err(SvgError::MalformedTransform(format!("unknown function '{name}'"))),
    };
    Ok(m)
}
