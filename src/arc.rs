use std::f32::consts::PI;

/// Widest angular span covered by one cubic segment.
pub const MAX_STEP: f32 = PI / 8.0;

const MIN_STEP: f32 = 1e-3;

// One cubic segment; the start point is the end of the previous segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cubic {
    pub c1: (f32, f32),
    pub c2: (f32, f32),
    pub to: (f32, f32),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EndpointArc {
    pub from: (f32, f32),
    pub to: (f32, f32),
    pub rx: f32,
    pub ry: f32,
    // Rotation of the ellipse x-axis, radians.
    pub x_axis_rotation: f32,
    pub large_arc: bool,
    pub sweep: bool,
}

// Arc in center parameterization. Angles are parametric, in radians; a
// positive sweep runs in the direction of increasing angle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CenterArc {
    pub cx: f32,
    pub cy: f32,
    pub rx: f32,
    pub ry: f32,
    pub rotation: f32,
    pub start_angle: f32,
    pub sweep_angle: f32,
}

impl EndpointArc {
    // `None` when the arc degenerates: a zero radius or coincident endpoints.
    pub fn to_center(&self) -> Option<CenterArc> {
        let (x1, y1) = self.from;
        let (x2, y2) = self.to;
        let mut rx = self.rx.abs();
        let mut ry = self.ry.abs();
        if rx == 0.0 || ry == 0.0 || (x1 == x2 && y1 == y2) {
            return None;
        }

        let sin_phi = libm::sinf(self.x_axis_rotation);
        let cos_phi = libm::cosf(self.x_axis_rotation);

        // Midpoint difference in the ellipse frame.
        let dx2 = (x1 - x2) / 2.0;
        let dy2 = (y1 - y2) / 2.0;
        let x1p = cos_phi * dx2 + sin_phi * dy2;
        let y1p = -sin_phi * dx2 + cos_phi * dy2;

        // Radii too small to span the endpoints scale up uniformly.
        let lambda = (x1p * x1p) / (rx * rx) + (y1p * y1p) / (ry * ry);
        if lambda > 1.0 {
            let s = libm::sqrtf(lambda);
            rx *= s;
            ry *= s;
        }

        let rx2 = rx * rx;
        let ry2 = ry * ry;
        let num = rx2 * ry2 - rx2 * y1p * y1p - ry2 * x1p * x1p;
        let den = rx2 * y1p * y1p + ry2 * x1p * x1p;
        let mut coef = 0.0;
        if den != 0.0 {
            let sign = if self.large_arc == self.sweep { -1.0 } else { 1.0 };
            coef = sign * libm::sqrtf((num / den).max(0.0));
        }
        let cxp = coef * (rx * y1p / ry);
        let cyp = coef * (-ry * x1p / rx);

        let cx = cos_phi * cxp - sin_phi * cyp + (x1 + x2) / 2.0;
        let cy = sin_phi * cxp + cos_phi * cyp + (y1 + y2) / 2.0;

        let ux = (x1p - cxp) / rx;
        let uy = (y1p - cyp) / ry;
        let vx = (-x1p - cxp) / rx;
        let vy = (-y1p - cyp) / ry;

        let start_angle = vector_angle(1.0, 0.0, ux, uy);
        let mut sweep_angle = vector_angle(ux, uy, vx, vy);
        if !self.sweep && sweep_angle > 0.0 {
            sweep_angle -= 2.0 * PI;
        } else if self.sweep && sweep_angle < 0.0 {
            sweep_angle += 2.0 * PI;
        }

        Some(CenterArc {
            cx,
            cy,
            rx,
            ry,
            rotation: self.x_axis_rotation,
            start_angle,
            sweep_angle,
        })
    }

    /// Cubic spline for the arc. A degenerate arc yields a single straight
    /// cubic when the radius is zero, and nothing when the endpoints coincide.
    pub fn to_cubics(&self) -> Vec<Cubic> {
        if self.from == self.to {
            return Vec::new();
        }
        let Some(center) = self.to_center() else {
            return vec![Cubic {
                c1: self.from,
                c2: self.to,
                to: self.to,
            }];
        };
        let mut out = center.to_cubics(MAX_STEP);
        if let Some(last) = out.last_mut() {
            // Land exactly on the requested endpoint.
            last.to = self.to;
        }
        out
    }
}

impl CenterArc {
    pub fn point_at(&self, eta: f32) -> (f32, f32) {
        let (sin_t, cos_t) = (libm::sinf(self.rotation), libm::cosf(self.rotation));
        let (sin_e, cos_e) = (libm::sinf(eta), libm::cosf(eta));
        (
            self.cx + self.rx * cos_t * cos_e - self.ry * sin_t * sin_e,
            self.cy + self.rx * sin_t * cos_e + self.ry * cos_t * sin_e,
        )
    }

    fn derivative_at(&self, eta: f32) -> (f32, f32) {
        let (sin_t, cos_t) = (libm::sinf(self.rotation), libm::cosf(self.rotation));
        let (sin_e, cos_e) = (libm::sinf(eta), libm::cosf(eta));
        (
            -self.rx * cos_t * sin_e - self.ry * sin_t * cos_e,
            -self.rx * sin_t * sin_e + self.ry * cos_t * cos_e,
        )
    }

    pub fn start_point(&self) -> (f32, f32) {
        self.point_at(self.start_angle)
    }

    pub fn end_point(&self) -> (f32, f32) {
        self.point_at(self.start_angle + self.sweep_angle)
    }

    /// Splits the sweep into equal segments no wider than `max_step`. Steps below
    /// a milliradian are clamped.
    pub fn to_cubics(&self, max_step: f32) -> Vec<Cubic> {
        let span = self.sweep_angle.abs();
        if span == 0.0 || !span.is_finite() {
            return Vec::new();
        }
        let step = max_step.max(MIN_STEP);
        // Tolerance keeps an exact multiple of the step from rounding up.
        let count = libm::ceilf(span / step - 1e-3).max(1.0) as usize;
        let delta = self.sweep_angle / count as f32;

        let t = libm::tanf(delta / 2.0);
        let alpha = libm::sinf(delta) * (libm::sqrtf(4.0 + 3.0 * t * t) - 1.0) / 3.0;

        let mut out = Vec::with_capacity(count);
        let mut eta1 = self.start_angle;
        let mut p1 = self.point_at(eta1);
        let mut d1 = self.derivative_at(eta1);
        for i in 0..count {
            let eta2 = if i + 1 == count {
                self.start_angle + self.sweep_angle
            } else {
                eta1 + delta
            };
            let p2 = self.point_at(eta2);
            let d2 = self.derivative_at(eta2);
            out.push(Cubic {
                c1: (p1.0 + alpha * d1.0, p1.1 + alpha * d1.1),
                c2: (p2.0 - alpha * d2.0, p2.1 - alpha * d2.1),
                to: p2,
            });
            eta1 = eta2;
            p1 = p2;
            d1 = d2;
        }
        out
    }
}

/// Circular arc in center form, with fractions of the sweep trimmed off each end.
///
/// Returns the first point and the spline. Empty when the trims consume the arc.
pub fn circular_arc(
    cx: f32,
    cy: f32,
    radius: f32,
    start_angle: f32,
    sweep_angle: f32,
    trim_start: f32,
    trim_end: f32,
) -> Option<((f32, f32), Vec<Cubic>)> {
    let trim_start = trim_start.clamp(0.0, 1.0);
    let trim_end = trim_end.clamp(0.0, 1.0);
    if radius <= 0.0 || trim_start + trim_end >= 1.0 {
        return None;
    }
    let arc = CenterArc {
        cx,
        cy,
        rx: radius,
        ry: radius,
        rotation: 0.0,
        start_angle: start_angle + sweep_angle * trim_start,
        sweep_angle: sweep_angle * (1.0 - trim_start - trim_end),
    };
    Some((arc.start_point(), arc.to_cubics(MAX_STEP)))
}

fn vector_angle(ux: f32, uy: f32, vx: f32, vy: f32) -> f32 {
    let dot = ux * vx + uy * vy;
    let det = ux * vy - uy * vx;
    libm::atan2f(det, dot)
}
