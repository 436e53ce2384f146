use crate::arc::{CenterArc, MAX_STEP, circular_arc};
use crate::diagnostics::{Diagnostics, WarningKind};
use crate::error::{Result, SvgError};
use crate::path::Pen;
use crate::path_data::parse_number_list;
use crate::units::{Axis, UnitResolver};
use crate::xml::{Attribute, lookup};
use std::f32::consts::{FRAC_PI_2, PI, TAU};

pub(crate) struct ShapeInput<'a> {
    pub(crate) decls: &'a [Attribute],
    pub(crate) units: &'a UnitResolver,
    pub(crate) diag: &'a mut Diagnostics,
}

impl ShapeInput<'_> {
    // Length attribute in pixels; `None` when absent or unparsable.
    fn length(&mut self, key: &str, axis: Axis) -> Option<f32> {
        let raw = lookup(self.decls, key)?;
        let value = self.units.parse(raw, axis);
        if value.is_none() {
            self.diag
                .warn(WarningKind::InvalidValue, format!("{key}=\"{raw}\""));
        }
        value
    }

    fn length_or_zero(&mut self, key: &str, axis: Axis) -> f32 {
        self.length(key, axis).unwrap_or(0.0)
    }
}

pub(crate) fn rect(pen: &mut Pen<'_>, mut input: ShapeInput<'_>) -> Result<()> {
    let x = input.length_or_zero("x", Axis::X);
    let y = input.length_or_zero("y", Axis::Y);
    let w = input.length_or_zero("width", Axis::X);
    let h = input.length_or_zero("height", Axis::Y);
    if w <= 0.0 || h <= 0.0 {
        return Ok(());
    }

    // A missing corner radius takes the other one.
    let rx = input.length("rx", Axis::X).filter(|r| *r >= 0.0);
    let ry = input.length("ry", Axis::Y).filter(|r| *r >= 0.0);
    let (rx, ry) = match (rx, ry) {
        (Some(rx), Some(ry)) => (rx, ry),
        (Some(r), None) | (None, Some(r)) => (r, r),
        (None, None) => (0.0, 0.0),
    };
    let rx = rx.min(w / 2.0);
    let ry = ry.min(h / 2.0);

    if rx == 0.0 || ry == 0.0 {
        pen.move_to(x, y);
        pen.line_to(x + w, y);
        pen.line_to(x + w, y + h);
        pen.line_to(x, y + h);
        pen.close();
        return Ok(());
    }

    let corner = |pen: &mut Pen<'_>, cx: f32, cy: f32, start: f32| {
        let arc = CenterArc {
            cx,
            cy,
            rx,
            ry,
            rotation: 0.0,
            start_angle: start,
            sweep_angle: FRAC_PI_2,
        };
        for c in arc.to_cubics(MAX_STEP) {
            pen.cubic_to(c.c1, c.c2, c.to);
        }
    };

    pen.move_to(x + rx, y);
    pen.line_to(x + w - rx, y);
    corner(pen, x + w - rx, y + ry, -FRAC_PI_2);
    pen.line_to(x + w, y + h - ry);
    corner(pen, x + w - rx, y + h - ry, 0.0);
    pen.line_to(x + rx, y + h);
    corner(pen, x + rx, y + h - ry, FRAC_PI_2);
    pen.line_to(x, y + ry);
    corner(pen, x + rx, y + ry, PI);
    pen.close();
    Ok(())
}

pub(crate) fn circle(pen: &mut Pen<'_>, mut input: ShapeInput<'_>) -> Result<()> {
    let cx = input.length_or_zero("cx", Axis::X);
    let cy = input.length_or_zero("cy", Axis::Y);
    let r = input.length_or_zero("r", Axis::Diagonal);
    let Some((start, spline)) = circular_arc(cx, cy, r, 0.0, TAU, 0.0, 0.0) else {
        return Ok(());
    };
    pen.move_to(start.0, start.1);
    for c in spline {
        pen.cubic_to(c.c1, c.c2, c.to);
    }
    pen.close();
    Ok(())
}

pub(crate) fn ellipse(pen: &mut Pen<'_>, mut input: ShapeInput<'_>) -> Result<()> {
    let cx = input.length_or_zero("cx", Axis::X);
    let cy = input.length_or_zero("cy", Axis::Y);
    let rx = input.length_or_zero("rx", Axis::X);
    let ry = input.length_or_zero("ry", Axis::Y);
    if rx <= 0.0 || ry <= 0.0 {
        return Ok(());
    }
    let arc = CenterArc {
        cx,
        cy,
        rx,
        ry,
        rotation: 0.0,
        start_angle: 0.0,
        sweep_angle: TAU,
    };
    let start = arc.start_point();
    pen.move_to(start.0, start.1);
    for c in arc.to_cubics(MAX_STEP) {
        pen.cubic_to(c.c1, c.c2, c.to);
    }
    pen.close();
    Ok(())
}

pub(crate) fn line(pen: &mut Pen<'_>, mut input: ShapeInput<'_>) -> Result<()> {
    let x1 = input.length_or_zero("x1", Axis::X);
    let y1 = input.length_or_zero("y1", Axis::Y);
    let x2 = input.length_or_zero("x2", Axis::X);
    let y2 = input.length_or_zero("y2", Axis::Y);
    pen.move_to(x1, y1);
    pen.line_to(x2, y2);
    Ok(())
}

// `polyline`, or `polygon` when `closed`.
pub(crate) fn poly(pen: &mut Pen<'_>, input: ShapeInput<'_>, closed: bool) -> Result<()> {
    let tag = if closed { "polygon" } else { "polyline" };
    let Some(raw) = lookup(input.decls, "points") else {
        return Ok(());
    };
    let Some(coords) = parse_number_list(raw) else {
        input
            .diag
            .warn(WarningKind::InvalidValue, format!("<{tag}> points=\"{raw}\""));
        return Ok(());
    };
    if coords.len() % 2 != 0 {
        return Err(SvgError::param_mismatch(tag, "an even number of", coords.len()));
    }
    let mut pairs = coords.chunks_exact(2);
    let Some(first) = pairs.next() else {
        return Ok(());
    };
    pen.move_to(first[0], first[1]);
    for p in pairs {
        pen.line_to(p[0], p[1]);
    }
    if closed {
        pen.close();
    }
    Ok(())
}
