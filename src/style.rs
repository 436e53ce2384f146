use crate::color::{PaintValue, Pattern, parse_paint, parse_url_ref};
use crate::diagnostics::{Diagnostics, WarningKind};
use crate::error::Result;
use crate::gradient::GradientRegistry;
use crate::matrix::{Matrix, parse_transform};
use crate::types::Rgba;
use crate::units::{Axis, Length, UnitResolver};
use crate::xml::{Attribute, lookup};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillRule {
    #[default]
    NonZero,
    EvenOdd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
    Cubic,
    Quadratic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineJoin {
    Miter,
    MiterClip,
    Round,
    #[default]
    Bevel,
    Arc,
    ArcClip,
}

// How the stroker fills the gap on the outside of a sharp turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineGap {
    #[default]
    Flat,
    Round,
    Cubic,
    Quadratic,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PathStyle {
    pub fill: Pattern,
    pub stroke: Pattern,
    pub line_width: f32,
    pub dash: Vec<f32>,
    pub dash_offset: f32,
    // Trailing cap.
    pub cap: LineCap,
    // Leading cap; `None` uses `cap`.
    pub lead_cap: Option<LineCap>,
    pub gap: LineGap,
    pub join: LineJoin,
    pub miter_limit: f32,
    pub fill_opacity: f32,
    pub stroke_opacity: f32,
    // Product of every `opacity` on the ancestor chain.
    pub opacity: f32,
    pub fill_rule: FillRule,
    pub transform: Matrix,
    // Mask ids, outermost first.
    pub masks: Vec<String>,
}

impl Default for PathStyle {
    fn default() -> Self {
        Self {
            fill: Pattern::Solid(Rgba::BLACK),
            stroke: Pattern::None,
            line_width: 2.0,
            dash: Vec::new(),
            dash_offset: 0.0,
            cap: LineCap::Butt,
            lead_cap: None,
            gap: LineGap::Flat,
            join: LineJoin::Bevel,
            miter_limit: 4.0,
            fill_opacity: 1.0,
            stroke_opacity: 1.0,
            opacity: 1.0,
            fill_rule: FillRule::NonZero,
            transform: Matrix::IDENTITY,
            masks: Vec::new(),
        }
    }
}

impl PathStyle {
    pub fn effective_fill_opacity(&self) -> f32 {
        self.opacity * self.fill_opacity
    }

    pub fn effective_stroke_opacity(&self) -> f32 {
        self.opacity * self.stroke_opacity
    }

    pub fn leading_cap(&self) -> LineCap {
        self.lead_cap.unwrap_or(self.cap)
    }
}

const CASCADE_KEYS: &[&str] = &[
    "fill",
    "fill-rule",
    "fill-opacity",
    "stroke",
    "stroke-width",
    "stroke-opacity",
    "stroke-dasharray",
    "stroke-dashoffset",
    "stroke-linecap",
    "stroke-leadlinecap",
    "stroke-linegap",
    "stroke-linejoin",
    "stroke-miterlimit",
    "opacity",
    "transform",
    "mask",
];

// Keys valid in `style` that other elements consume.
const ELEMENT_STYLE_KEYS: &[&str] = &["stop-color", "stop-opacity", "offset"];

// Presentation attributes followed by the inline `style` declarations, so a
// last-wins lookup prefers the inline value. Unknown inline keys are warned.
pub(crate) fn merged_declarations(attrs: &[Attribute], diag: &mut Diagnostics) -> Vec<Attribute> {
    let mut merged: Vec<Attribute> = attrs
        .iter()
        .filter(|a| a.name != "style")
        .cloned()
        .collect();
    if let Some(inline) = lookup(attrs, "style") {
        for decl in parse_style_attribute(inline) {
            let known = CASCADE_KEYS.contains(&decl.name.as_str())
                || ELEMENT_STYLE_KEYS.contains(&decl.name.as_str());
            if !known {
                diag.warn(
                    WarningKind::UnknownStyleKey,
                    format!("{}: {}", decl.name, decl.value),
                );
            }
            merged.push(decl);
        }
    }
    merged
}

pub(crate) fn parse_style_attribute(input: &str) -> Vec<Attribute> {
    input
        .split(';')
        .filter_map(|decl| {
            let (k, v) = decl.split_once(':')?;
            let k = k.trim();
            if k.is_empty() {
                return None;
            }
            Some(Attribute::new(k.to_ascii_lowercase(), v.trim()))
        })
        .collect()
}

pub(crate) struct StyleContext<'a> {
    pub(crate) units: &'a UnitResolver,
    pub(crate) gradients: &'a GradientRegistry,
    pub(crate) diag: &'a mut Diagnostics,
}

impl StyleContext<'_> {
    fn invalid(&mut self, key: &str, value: &str) {
        self.diag
            .warn(WarningKind::InvalidValue, format!("{key}=\"{value}\""));
    }
}

// Applies every cascade key present in `decls` to `style`, last value wins.
pub(crate) fn apply_declarations(
    style: &mut PathStyle,
    decls: &[Attribute],
    ctx: &mut StyleContext<'_>,
) -> Result<()> {
    for &key in CASCADE_KEYS {
        if let Some(value) = lookup(decls, key) {
            apply_key(style, key, value, ctx)?;
        }
    }
    Ok(())
}

fn apply_key(
    style: &mut PathStyle,
    key: &str,
    value: &str,
    ctx: &mut StyleContext<'_>,
) -> Result<()> {
    let v = value.trim();
    match key {
        "fill" | "stroke" => {
            let paint = match parse_paint(v, |id| ctx.gradients.contains(id))? {
                PaintValue::Pattern(p) => Some(p),
                PaintValue::UnknownReference(id) => {
                    ctx.diag.warn(
                        WarningKind::UnresolvedPaint,
                        format!("{key} references {id}, using black"),
                    );
                    Some(Pattern::Solid(Rgba::BLACK))
                }
                PaintValue::Unrecognized => {
                    if !v.eq_ignore_ascii_case("inherit") {
                        ctx.invalid(key, v);
                    }
                    None
                }
            };
            if let Some(paint) = paint {
                if key == "fill" {
                    style.fill = paint;
                } else {
                    style.stroke = paint;
                }
            }
        }
        "fill-rule" => match v {
            "nonzero" => style.fill_rule = FillRule::NonZero,
            "evenodd" => style.fill_rule = FillRule::EvenOdd,
            _ => ctx.invalid(key, v),
        },
        "fill-opacity" => match parse_unit_interval(v) {
            Some(o) => style.fill_opacity = o,
            None => ctx.invalid(key, v),
        },
        "stroke-opacity" => match parse_unit_interval(v) {
            Some(o) => style.stroke_opacity = o,
            None => ctx.invalid(key, v),
        },
        "opacity" => match parse_unit_interval(v) {
            Some(o) => style.opacity *= o,
            None => ctx.invalid(key, v),
        },
        "stroke-width" => match ctx.units.parse(v, Axis::Diagonal) {
            Some(w) if w >= 0.0 => style.line_width = w,
            _ => ctx.invalid(key, v),
        },
        "stroke-dasharray" => match parse_dash_array(v, ctx.units) {
            Some(dash) => style.dash = dash,
            None => ctx.invalid(key, v),
        },
        "stroke-dashoffset" => match ctx.units.parse(v, Axis::Diagonal) {
            Some(o) => style.dash_offset = o,
            None => ctx.invalid(key, v),
        },
        "stroke-linecap" => match parse_cap(v) {
            Some(cap) => style.cap = cap,
            None => ctx.invalid(key, v),
        },
        "stroke-leadlinecap" => match parse_cap(v) {
            Some(cap) => style.lead_cap = Some(cap),
            None => ctx.invalid(key, v),
        },
        "stroke-linegap" => match v {
            "flat" => style.gap = LineGap::Flat,
            "round" => style.gap = LineGap::Round,
            "cubic" => style.gap = LineGap::Cubic,
            "quadratic" => style.gap = LineGap::Quadratic,
            _ => ctx.invalid(key, v),
        },
        "stroke-linejoin" => match v {
            "miter" => style.join = LineJoin::Miter,
            "miter-clip" => style.join = LineJoin::MiterClip,
            "round" => style.join = LineJoin::Round,
            "bevel" => style.join = LineJoin::Bevel,
            "arcs" | "arc" => style.join = LineJoin::Arc,
            "arc-clip" => style.join = LineJoin::ArcClip,
            _ => ctx.invalid(key, v),
        },
        "stroke-miterlimit" => match v.parse::<f32>() {
            Ok(m) if m >= 1.0 => style.miter_limit = m,
            _ => ctx.invalid(key, v),
        },
        "transform" => {
            let local = parse_transform(v)?;
            style.transform = style.transform.multiply(local);
        }
        "mask" => {
            if v.eq_ignore_ascii_case("none") {
                return Ok(());
            }
            match parse_url_ref(v) {
                Some(id) => style.masks.push(id),
                None => ctx.invalid(key, v),
            }
        }
        _ => {}
    }
    Ok(())
}

fn parse_cap(v: &str) -> Option<LineCap> {
    Some(match v {
        "butt" => LineCap::Butt,
        "round" => LineCap::Round,
        "square" => LineCap::Square,
        "cubic" => LineCap::Cubic,
        "quadratic" => LineCap::Quadratic,
        _ => return None,
    })
}

// Number or percentage, clamped to [0, 1].
fn parse_unit_interval(v: &str) -> Option<f32> {
    let value = match v.strip_suffix('%') {
        Some(p) => p.trim().parse::<f32>().ok()? / 100.0,
        None => v.parse::<f32>().ok()?,
    };
    value.is_finite().then(|| value.clamp(0.0, 1.0))
}

// `none` clears the dash; an odd-length list repeats to even length. A list
// of all zeros also disables dashing.
fn parse_dash_array(v: &str, units: &UnitResolver) -> Option<Vec<f32>> {
    if v.eq_ignore_ascii_case("none") {
        return Some(Vec::new());
    }
    let mut dash = Vec::new();
    for item in v
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
    {
        let len = units.resolve(Length::parse(item)?, Axis::Diagonal);
        if len < 0.0 {
            return None;
        }
        dash.push(len);
    }
    if dash.is_empty() {
        return None;
    }
    if dash.iter().all(|d| *d == 0.0) {
        return Some(Vec::new());
    }
    if dash.len() % 2 == 1 {
        dash.extend_from_within(..);
    }
    Some(dash)
}

#[derive(Debug, Clone)]
pub(crate) struct StyleStack {
    frames: Vec<PathStyle>,
}

impl StyleStack {
    pub(crate) fn new(root: PathStyle) -> Self {
        Self { frames: vec![root] }
    }

    pub(crate) fn top(&self) -> &PathStyle {
        // The root frame is never popped.
        &self.frames[self.frames.len() - 1]
    }

    // Frame the top one was derived from; the root frame is its own parent.
    pub(crate) fn parent(&self) -> &PathStyle {
        &self.frames[self.frames.len().saturating_sub(2)]
    }

    #[cfg(test)]
    pub(crate) fn depth(&self) -> usize {
        self.frames.len() - 1
    }

    pub(crate) fn push(&mut self, decls: &[Attribute], ctx: &mut StyleContext<'_>) -> Result<()> {
        let mut frame = self.top().clone();
        apply_declarations(&mut frame, decls, ctx)?;
        self.frames.push(frame);
        Ok(())
    }

    // Pops the innermost frame; `None` when no element is open.
    pub(crate) fn pop(&mut self) -> Option<PathStyle> {
        if self.frames.len() > 1 {
            self.frames.pop()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Bounds;

    fn attrs(pairs: &[(&str, &str)]) -> Vec<Attribute> {
        pairs.iter().map(|(k, v)| Attribute::new(*k, *v)).collect()
    }

    fn push(stack: &mut StyleStack, pairs: &[(&str, &str)], diag: &mut Diagnostics) -> Result<()> {
        let units = UnitResolver::new(Bounds::new(0.0, 0.0, 100.0, 100.0), 96.0);
        let gradients = GradientRegistry::default();
        let decls = merged_declarations(&attrs(pairs), diag);
        let mut ctx = StyleContext {
            units: &units,
            gradients: &gradients,
            diag,
        };
        stack.push(&decls, &mut ctx)
    }

    #[test]
    fn default_style() {
        let style = PathStyle::default();
        assert_eq!(style.fill, Pattern::Solid(Rgba::BLACK));
        assert_eq!(style.stroke, Pattern::None);
        assert_eq!(style.line_width, 2.0);
        assert_eq!(style.join, LineJoin::Bevel);
        assert_eq!(style.miter_limit, 4.0);
        assert_eq!(style.leading_cap(), LineCap::Butt);
    }

    #[test]
    fn nested_opacity_compounds() {
        let mut diag = Diagnostics::default();
        let mut stack = StyleStack::new(PathStyle::default());
        push(&mut stack, &[("opacity", "0.5")], &mut diag).unwrap();
        push(&mut stack, &[("opacity", "0.5")], &mut diag).unwrap();
        assert_eq!(stack.top().effective_fill_opacity(), 0.25);
        assert_eq!(stack.top().effective_stroke_opacity(), 0.25);
        stack.pop();
        assert_eq!(stack.top().effective_fill_opacity(), 0.5);
    }

    #[test]
    fn inline_style_wins_over_attribute() {
        let mut diag = Diagnostics::default();
        let mut stack = StyleStack::new(PathStyle::default());
        push(
            &mut stack,
            &[("style", "fill: #00f; stroke-width: 3"), ("fill", "red")],
            &mut diag,
        )
        .unwrap();
        assert_eq!(stack.top().fill, Pattern::Solid(Rgba::rgb(0, 0, 255)));
        assert_eq!(stack.top().line_width, 3.0);
    }

    #[test]
    fn siblings_do_not_share_masks() {
        let mut diag = Diagnostics::default();
        let mut stack = StyleStack::new(PathStyle::default());
        push(&mut stack, &[("mask", "url(#outer)")], &mut diag).unwrap();
        push(&mut stack, &[("mask", "url(#a)")], &mut diag).unwrap();
        assert_eq!(stack.top().masks, vec!["outer".to_string(), "a".to_string()]);
        stack.pop();
        push(&mut stack, &[], &mut diag).unwrap();
        assert_eq!(stack.top().masks, vec!["outer".to_string()]);
        assert_eq!(stack.depth(), 2);
    }

    #[test]
    fn transform_composes_with_parent() {
        let mut diag = Diagnostics::default();
        let mut stack = StyleStack::new(PathStyle::default());
        push(&mut stack, &[("transform", "translate(10,0)")], &mut diag).unwrap();
        push(&mut stack, &[("transform", "scale(2)")], &mut diag).unwrap();
        assert_eq!(stack.top().transform.transform_point(1.0, 0.0), (12.0, 0.0));
    }

    #[test]
    fn bad_values_keep_inherited_and_warn() {
        let mut diag = Diagnostics::default();
        let mut stack = StyleStack::new(PathStyle::default());
        push(
            &mut stack,
            &[
                ("stroke-width", "wide"),
                ("stroke-linejoin", "pointy"),
                ("style", "vendor-thing: 1"),
            ],
            &mut diag,
        )
        .unwrap();
        assert_eq!(stack.top().line_width, 2.0);
        assert_eq!(stack.top().join, LineJoin::Bevel);
        assert_eq!(diag.count(WarningKind::InvalidValue), 2);
        assert_eq!(diag.count(WarningKind::UnknownStyleKey), 1);
    }

    #[test]
    fn bad_transform_is_fatal() {
        let mut diag = Diagnostics::default();
        let mut stack = StyleStack::new(PathStyle::default());
        assert!(push(&mut stack, &[("transform", "rotate(1,2)")], &mut diag).is_err());
    }

    #[test]
    fn unknown_gradient_paint_falls_back_to_black() {
        let mut diag = Diagnostics::default();
        let mut stack = StyleStack::new(PathStyle::default());
        push(&mut stack, &[("stroke", "url(#missing)")], &mut diag).unwrap();
        assert_eq!(stack.top().stroke, Pattern::Solid(Rgba::BLACK));
        assert_eq!(diag.count(WarningKind::UnresolvedPaint), 1);
    }

    #[test]
    fn dash_array_forms() {
        let units = UnitResolver::new(Bounds::new(0.0, 0.0, 100.0, 100.0), 96.0);
        assert_eq!(parse_dash_array("5, 3 2", &units), Some(vec![5.0, 3.0, 2.0, 5.0, 3.0, 2.0]));
        assert_eq!(parse_dash_array("none", &units), Some(Vec::new()));
        assert_eq!(parse_dash_array("0 0", &units), Some(Vec::new()));
        assert_eq!(parse_dash_array("4 -1", &units), None);
        let percent = parse_dash_array("10%", &units).unwrap();
        assert_eq!(percent.len(), 2);
        assert!((percent[0] - 10.0).abs() < 1e-3);
    }

    #[test]
    fn caps_and_gaps() {
        let mut diag = Diagnostics::default();
        let mut stack = StyleStack::new(PathStyle::default());
        push(
            &mut stack,
            &[
                ("stroke-linecap", "round"),
                ("stroke-leadlinecap", "cubic"),
                ("stroke-linegap", "quadratic"),
                ("stroke-linejoin", "arc-clip"),
                ("fill-rule", "evenodd"),
            ],
            &mut diag,
        )
        .unwrap();
        let top = stack.top();
        assert_eq!(top.cap, LineCap::Round);
        assert_eq!(top.leading_cap(), LineCap::Cubic);
        assert_eq!(top.gap, LineGap::Quadratic);
        assert_eq!(top.join, LineJoin::ArcClip);
        assert_eq!(top.fill_rule, FillRule::EvenOdd);
    }
}
