use crate::defs::{Captured, DefinitionStore};
use crate::diagnostics::{Diagnostics, WarningKind};
use crate::document::{Document, Mask, StyledPath, view_box_transform};
use crate::error::{Result, SvgError};
use crate::gradient::{CoordUnits, Gradient, GradientRegistry, parse_stop};
use crate::matrix::Matrix;
use crate::options::ParseOptions;
use crate::path::{Path, Pen};
use crate::path_data::{NumberScanner, compile_into, parse_number_list};
use crate::shapes::{self, ShapeInput};
use crate::style::{PathStyle, StyleContext, StyleStack, merged_declarations};
use crate::types::Bounds;
use crate::units::{Axis, Length, UnitResolver};
use crate::xml::{Attribute, href, lookup};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Element,
    Defs,
    Gradient,
    Mask,
    // Recorded into a definition; no style frame was pushed.
    Captured,
}

#[derive(Debug)]
struct OpenElement {
    tag: String,
    scope: Scope,
}

type DrawFn = fn(&mut DocumentBuilder, &[Attribute]) -> Result<Scope>;

static DRAW_FUNCS: &[(&str, DrawFn)] = &[
    ("svg", draw_svg),
    ("g", draw_nothing),
    ("line", draw_line),
    ("stop", draw_stop),
    ("rect", draw_rect),
    ("circle", draw_circle),
    ("ellipse", draw_ellipse),
    ("polyline", draw_polyline),
    ("polygon", draw_polygon),
    ("path", draw_path),
    ("desc", draw_nothing),
    ("defs", draw_defs),
    ("title", draw_nothing),
    ("linearGradient", draw_linear_gradient),
    ("radialGradient", draw_radial_gradient),
    ("mask", draw_mask),
    ("use", draw_use),
];

fn draw_fn(tag: &str) -> Option<DrawFn> {
    DRAW_FUNCS
        .iter()
        .find(|(name, _)| *name == tag)
        .map(|(_, f)| *f)
}

pub(crate) struct DocumentBuilder {
    options: ParseOptions,
    units: UnitResolver,
    styles: StyleStack,
    diag: Diagnostics,
    path: Path,
    origin: (f32, f32),
    open: Vec<OpenElement>,
    seen_element: bool,
    root_seen: bool,

    gradients: GradientRegistry,
    gradient: Option<Gradient>,
    mask: Option<Mask>,
    defs: DefinitionStore,
    defs_depth: usize,
    // Ids being replayed, outermost first.
    replaying: Vec<String>,

    width: String,
    height: String,
    view_box: Bounds,
    transform: Matrix,
    masks: HashMap<String, Mask>,
    paths: Vec<StyledPath>,
}

impl DocumentBuilder {
    pub(crate) fn new(options: ParseOptions) -> Self {
        let view_box = options.default_viewport;
        Self {
            units: UnitResolver::new(view_box, options.dpi),
            options,
            styles: StyleStack::new(PathStyle::default()),
            diag: Diagnostics::default(),
            path: Path::new(),
            origin: (0.0, 0.0),
            open: Vec::new(),
            seen_element: false,
            root_seen: false,
            gradients: GradientRegistry::default(),
            gradient: None,
            mask: None,
            defs: DefinitionStore::default(),
            defs_depth: 0,
            replaying: Vec::new(),
            width: String::new(),
            height: String::new(),
            view_box,
            transform: Matrix::IDENTITY,
            masks: HashMap::new(),
            paths: Vec::new(),
        }
    }

    fn capturing(&self, tag: &str) -> bool {
        self.defs_depth > 0
            && self.gradient.is_none()
            && self.mask.is_none()
            && !matches!(
                tag,
                "defs" | "linearGradient" | "radialGradient" | "mask" | "stop"
            )
    }

    pub(crate) fn start_element(&mut self, tag: &str, attrs: &[Attribute]) -> Result<()> {
        self.seen_element = true;
        if self.capturing(tag) {
            self.defs.start(tag, attrs, &mut self.diag)?;
            self.open.push(OpenElement {
                tag: tag.to_string(),
                scope: Scope::Captured,
            });
            return Ok(());
        }

        let decls = merged_declarations(attrs, &mut self.diag);
        let mut ctx = StyleContext {
            units: &self.units,
            gradients: &self.gradients,
            diag: &mut self.diag,
        };
        self.styles.push(&decls, &mut ctx)?;

        let scope = match draw_fn(tag) {
            Some(draw) => draw(self, &decls)?,
            None => {
                if self.options.warn_unknown_elements {
                    self.diag
                        .warn(WarningKind::UnknownElement, format!("<{tag}>"));
                }
                Scope::Element
            }
        };
        self.open.push(OpenElement {
            tag: tag.to_string(),
            scope,
        });
        self.flush_path();
        Ok(())
    }

    pub(crate) fn end_element(&mut self, tag: &str) -> Result<()> {
        let Some(open) = self.open.pop() else {
            return Err(SvgError::InvalidDocument(format!(
                "</{tag}> has no open element"
            )));
        };
        if open.tag != tag {
            return Err(SvgError::InvalidDocument(format!(
                "</{tag}> closes <{}>",
                open.tag
            )));
        }
        if open.scope == Scope::Captured {
            self.defs.end();
            return Ok(());
        }

        self.styles.pop();
        match open.scope {
            Scope::Defs => {
                self.defs_depth = self.defs_depth.saturating_sub(1);
                if self.defs_depth == 0 {
                    self.defs.flush();
                }
            }
            Scope::Gradient => {
                if let Some(gradient) = self.gradient.take() {
                    tracing::trace!(id = %gradient.id, stops = gradient.stops.len(), "gradient");
                    self.gradients.insert(gradient);
                }
            }
            Scope::Mask => {
                if let Some(mask) = self.mask.take() {
                    tracing::trace!(id = %mask.id, paths = mask.paths.len(), "mask");
                    self.masks.insert(mask.id.clone(), mask);
                }
            }
            Scope::Element | Scope::Captured => {}
        }
        Ok(())
    }

    pub(crate) fn finish(mut self) -> Result<Document> {
        if !self.seen_element {
            return Err(SvgError::InvalidDocument("no elements".to_string()));
        }
        if let Some(open) = self.open.last() {
            return Err(SvgError::InvalidDocument(format!(
                "<{}> is never closed",
                open.tag
            )));
        }
        self.defs.flush();
        tracing::debug!(
            paths = self.paths.len(),
            masks = self.masks.len(),
            gradients = self.gradients.len(),
            definitions = self.defs.len(),
            "parsed document"
        );
        Ok(Document {
            width: self.width,
            height: self.height,
            view_box: self.view_box,
            transform: self.transform,
            masks: self.masks,
            gradients: self.gradients,
            paths: self.paths,
            warnings: self.diag.finish(),
        })
    }

    fn flush_path(&mut self) {
        if self.path.is_empty() {
            return;
        }
        if self.gradient.is_some() {
            self.diag.warn(
                WarningKind::MisplacedElement,
                "shape inside a gradient is ignored",
            );
            self.path.clear();
            return;
        }
        let styled = StyledPath {
            path: self.path.take(),
            style: self.styles.top().clone(),
        };
        match &mut self.mask {
            Some(mask) => mask.paths.push(styled),
            None => self.paths.push(styled),
        }
    }

    fn shape(
        &mut self,
        decls: &[Attribute],
        draw: impl FnOnce(&mut Pen<'_>, ShapeInput<'_>) -> Result<()>,
    ) -> Result<Scope> {
        let mut pen = Pen::new(&mut self.path, self.origin);
        draw(
            &mut pen,
            ShapeInput {
                decls,
                units: &self.units,
                diag: &mut self.diag,
            },
        )?;
        Ok(Scope::Element)
    }

    fn replay(&mut self, steps: &[Captured]) -> Result<()> {
        let mut open: Vec<&str> = Vec::new();
        for step in steps {
            match step {
                Captured::Start(def) => {
                    self.start_element(&def.tag, &def.attributes)?;
                    open.push(&def.tag);
                }
                Captured::EndGroup => {
                    if let Some(tag) = open.pop() {
                        self.end_element(tag)?;
                    }
                }
            }
        }
        Ok(())
    }
}

fn draw_nothing(_: &mut DocumentBuilder, _: &[Attribute]) -> Result<Scope> {
    Ok(Scope::Element)
}

// Leading number of a length, ignoring its unit.
fn leading_number(raw: &str) -> Option<f32> {
    NumberScanner::new(raw.trim()).next_number()
}

fn draw_svg(b: &mut DocumentBuilder, decls: &[Attribute]) -> Result<Scope> {
    // Nested viewports are treated as groups.
    if b.root_seen {
        return Ok(Scope::Element);
    }
    b.root_seen = true;
    b.width = lookup(decls, "width").unwrap_or("").trim().to_string();
    b.height = lookup(decls, "height").unwrap_or("").trim().to_string();

    let declared = match lookup(decls, "viewBox") {
        Some(raw) => match parse_number_list(raw).as_deref() {
            Some(&[x, y, w, h]) if w > 0.0 && h > 0.0 => Some(Bounds::new(x, y, w, h)),
            _ => {
                b.diag
                    .warn(WarningKind::InvalidValue, format!("viewBox=\"{raw}\""));
                None
            }
        },
        None => None,
    };
    let fallback = || {
        let w = leading_number(&b.width)?;
        let h = leading_number(&b.height)?;
        let vb = Bounds::new(0.0, 0.0, w, h);
        (!vb.is_empty()).then_some(vb)
    };
    let view_box = declared
        .or_else(fallback)
        .unwrap_or(b.options.default_viewport);

    let viewport_w = b
        .units
        .parse(&b.width, Axis::X)
        .filter(|w| *w > 0.0)
        .unwrap_or(view_box.width);
    let viewport_h = b
        .units
        .parse(&b.height, Axis::Y)
        .filter(|h| *h > 0.0)
        .unwrap_or(view_box.height);

    b.view_box = view_box;
    b.transform = view_box_transform(
        view_box,
        viewport_w,
        viewport_h,
        lookup(decls, "preserveAspectRatio"),
    );
    b.units = UnitResolver::new(view_box, b.options.dpi);
    Ok(Scope::Element)
}

fn draw_defs(b: &mut DocumentBuilder, _: &[Attribute]) -> Result<Scope> {
    b.defs_depth += 1;
    Ok(Scope::Defs)
}

fn draw_rect(b: &mut DocumentBuilder, decls: &[Attribute]) -> Result<Scope> {
    b.shape(decls, shapes::rect)
}

fn draw_circle(b: &mut DocumentBuilder, decls: &[Attribute]) -> Result<Scope> {
    b.shape(decls, shapes::circle)
}

fn draw_ellipse(b: &mut DocumentBuilder, decls: &[Attribute]) -> Result<Scope> {
    b.shape(decls, shapes::ellipse)
}

fn draw_line(b: &mut DocumentBuilder, decls: &[Attribute]) -> Result<Scope> {
    b.shape(decls, shapes::line)
}

fn draw_polyline(b: &mut DocumentBuilder, decls: &[Attribute]) -> Result<Scope> {
    b.shape(decls, |pen, input| shapes::poly(pen, input, false))
}

fn draw_polygon(b: &mut DocumentBuilder, decls: &[Attribute]) -> Result<Scope> {
    b.shape(decls, |pen, input| shapes::poly(pen, input, true))
}

fn draw_path(b: &mut DocumentBuilder, decls: &[Attribute]) -> Result<Scope> {
    if let Some(d) = lookup(decls, "d") {
        if !d.trim().is_empty() {
            let mut pen = Pen::new(&mut b.path, b.origin);
            compile_into(d, &mut pen)?;
        }
    }
    Ok(Scope::Element)
}

fn draw_stop(b: &mut DocumentBuilder, decls: &[Attribute]) -> Result<Scope> {
    let stop = parse_stop(decls, &mut b.diag)?;
    match &mut b.gradient {
        Some(gradient) => gradient.add_stop(stop),
        None => b
            .diag
            .warn(WarningKind::MisplacedElement, "<stop> outside a gradient"),
    }
    Ok(Scope::Element)
}

fn begin_gradient(b: &mut DocumentBuilder, tag: &str, decls: &[Attribute]) -> Result<Scope> {
    if b.gradient.is_some() {
        b.diag.warn(
            WarningKind::MisplacedElement,
            format!("<{tag}> nested in another gradient"),
        );
        return Ok(Scope::Element);
    }
    b.gradient = Some(Gradient::from_element(tag, decls, &b.units, &mut b.diag)?);
    Ok(Scope::Gradient)
}

fn draw_linear_gradient(b: &mut DocumentBuilder, decls: &[Attribute]) -> Result<Scope> {
    begin_gradient(b, "linearGradient", decls)
}

fn draw_radial_gradient(b: &mut DocumentBuilder, decls: &[Attribute]) -> Result<Scope> {
    begin_gradient(b, "radialGradient", decls)
}

fn draw_mask(b: &mut DocumentBuilder, decls: &[Attribute]) -> Result<Scope> {
    if b.mask.is_some() {
        b.diag
            .warn(WarningKind::MisplacedElement, "<mask> nested in another mask");
        return Ok(Scope::Element);
    }
    let id = lookup(decls, "id").map(str::trim).unwrap_or("");
    if id.is_empty() {
        return Err(SvgError::EmptyIdentifier("mask".to_string()));
    }
    let units = CoordUnits::parse(lookup(decls, "maskUnits"), CoordUnits::ObjectBoundingBox);
    let mut coord = |key: &str, default: &str, axis: Axis| -> f32 {
        let raw = lookup(decls, key).unwrap_or(default);
        let len = match Length::parse(raw) {
            Some(len) => len,
            None => {
                b.diag
                    .warn(WarningKind::InvalidValue, format!("<mask> {key}=\"{raw}\""));
                Length::parse(default).unwrap_or(Length::px(0.0))
            }
        };
        match units {
            CoordUnits::ObjectBoundingBox if len.is_percent() => len.value / 100.0,
            CoordUnits::ObjectBoundingBox => len.value,
            CoordUnits::UserSpaceOnUse => b.units.resolve(len, axis),
        }
    };
    let bounds = Bounds::new(
        coord("x", "-10%", Axis::X),
        coord("y", "-10%", Axis::Y),
        coord("width", "120%", Axis::X),
        coord("height", "120%", Axis::Y),
    );
    b.mask = Some(Mask {
        id: id.to_string(),
        paths: Vec::new(),
        bounds,
        transform: b.styles.parent().transform,
        units,
    });
    Ok(Scope::Mask)
}

fn draw_use(b: &mut DocumentBuilder, decls: &[Attribute]) -> Result<Scope> {
    let Some(raw) = href(decls) else {
        b.diag
            .warn(WarningKind::InvalidValue, "<use> without href is not drawn");
        return Ok(Scope::Element);
    };
    let id = raw
        .trim()
        .strip_prefix('#')
        .filter(|id| !id.is_empty())
        .ok_or_else(|| SvgError::UnsupportedReference(raw.to_string()))?;
    if b.replaying.iter().any(|r| r == id) {
        return Err(SvgError::ReferenceCycle(id.to_string()));
    }
    let steps = b
        .defs
        .get(id)
        .ok_or_else(|| SvgError::UnresolvedReference(id.to_string()))?
        .to_vec();

    let x = lookup(decls, "x")
        .and_then(|v| b.units.parse(v, Axis::X))
        .unwrap_or(0.0);
    let y = lookup(decls, "y")
        .and_then(|v| b.units.parse(v, Axis::Y))
        .unwrap_or(0.0);

    let saved = b.origin;
    b.origin = (saved.0 + x, saved.1 + y);
    b.replaying.push(id.to_string());
    let result = b.replay(&steps);
    b.replaying.pop();
    b.origin = saved;
    result?;
    Ok(Scope::Element)
}

#[cfg(test)]
mod tests {
    use crate::color::Pattern;
    use crate::diagnostics::WarningKind;
    use crate::error::SvgError;
    use crate::matrix::Matrix;
    use crate::options::SvgParser;
    use crate::path::PathOp;
    use crate::types::{Point, Rgba};
    use crate::xml::{Attribute, Token};
    use crate::{Document, parse_str};

    fn ops(doc: &Document, index: usize) -> Vec<PathOp> {
        doc.paths[index].path.ops().to_vec()
    }

    #[test]
    fn red_rectangle() {
        let doc = parse_str(
            r#"<svg width="10" height="10"><rect x="0" y="0" width="10" height="10" fill="red"/></svg>"#,
        )
        .unwrap();
        assert_eq!(doc.paths.len(), 1);
        assert_eq!(
            ops(&doc, 0),
            vec![
                PathOp::MoveTo(Point::new(0.0, 0.0)),
                PathOp::LineTo(Point::new(10.0, 0.0)),
                PathOp::LineTo(Point::new(10.0, 10.0)),
                PathOp::LineTo(Point::new(0.0, 10.0)),
                PathOp::Close,
            ]
        );
        assert_eq!(doc.paths[0].style.fill, Pattern::Solid(Rgba::rgba(255, 0, 0, 255)));
        assert_eq!(doc.width, "10");
    }

    #[test]
    fn bare_path_element() {
        let doc = parse_str(r#"<path d="M0,0 L10,0 L10,10 Z"/>"#).unwrap();
        assert_eq!(
            ops(&doc, 0),
            vec![
                PathOp::MoveTo(Point::new(0.0, 0.0)),
                PathOp::LineTo(Point::new(10.0, 0.0)),
                PathOp::LineTo(Point::new(10.0, 10.0)),
                PathOp::Close,
            ]
        );
    }

    #[test]
    fn arc_spline_stays_on_its_circle() {
        let doc = parse_str(r#"<path d="M0,0 A5,5 0 0,1 10,0"/>"#).unwrap();
        let ops = ops(&doc, 0);
        assert_eq!(ops[0], PathOp::MoveTo(Point::new(0.0, 0.0)));
        let mut last = None;
        for op in &ops[1..] {
            let PathOp::CubicTo(c1, c2, p) = op else {
                panic!("expected cubic, got {op:?}");
            };
            for pt in [c1, c2, p] {
                let (x, y) = pt.to_f32();
                let r = ((x - 5.0).powi(2) + y * y).sqrt();
                assert!(r <= 5.1, "{pt} is {r} from the center");
            }
            last = Some(*p);
        }
        assert_eq!(last, Some(Point::new(10.0, 0.0)));
    }

    #[test]
    fn use_replays_definition_at_offset() {
        let doc = parse_str(
            r##"<svg><defs><rect id="r" width="5" height="5"/></defs><use href="#r" x="3" y="4"/></svg>"##,
        )
        .unwrap();
        assert_eq!(doc.paths.len(), 1);
        assert_eq!(
            doc.paths[0].path.to_string(),
            "M3.000,4.000 L8.000,4.000 L8.000,9.000 L3.000,9.000 Z"
        );
    }

    #[test]
    fn unknown_element_is_skipped() {
        let doc = parse_str(
            r#"<svg><foo/><rect width="1" height="1"/><circle r="1"/></svg>"#,
        )
        .unwrap();
        assert_eq!(doc.paths.len(), 2);
        assert_eq!(doc.warnings.len(), 1);
        assert_eq!(doc.warnings[0].kind, WarningKind::UnknownElement);
    }

    #[test]
    fn unknown_element_warning_can_be_disabled() {
        let parser = SvgParser::builder()
            .warn_unknown_elements(false)
            .build()
            .unwrap();
        let doc = parser.parse_str(r#"<svg><foo/></svg>"#).unwrap();
        assert!(doc.warnings.is_empty());
    }

    #[test]
    fn nested_group_replay_keeps_styles_balanced() {
        let doc = parse_str(
            r##"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink">
                 <defs>
                   <g id="grp" fill="blue">
                     <rect width="1" height="1"/>
                     <circle cx="5" cy="5" r="1" fill="lime"/>
                   </g>
                 </defs>
                 <g fill="red"><use xlink:href="#grp"/></g>
                 <rect width="2" height="2"/>
               </svg>"##,
        )
        .unwrap();
        assert_eq!(doc.paths.len(), 3);
        assert_eq!(doc.paths[0].style.fill, Pattern::Solid(Rgba::rgb(0, 0, 255)));
        assert_eq!(doc.paths[1].style.fill, Pattern::Solid(Rgba::rgb(0, 255, 0)));
        assert_eq!(doc.paths[2].style.fill, Pattern::Solid(Rgba::BLACK));
    }

    #[test]
    fn use_inherits_style_of_its_context() {
        let doc = parse_str(
            r##"<svg><defs><rect id="r" width="1" height="1"/></defs>
                 <use href="#r" fill="red" opacity="0.5"/></svg>"##,
        )
        .unwrap();
        let style = &doc.paths[0].style;
        assert_eq!(style.fill, Pattern::Solid(Rgba::rgb(255, 0, 0)));
        assert_eq!(style.effective_fill_opacity(), 0.5);
    }

    #[test]
    fn use_reaches_ids_nested_in_a_definition() {
        let doc = parse_str(
            r##"<svg><defs><g id="grp" fill="blue"><rect id="inner" width="2" height="2"/></g></defs>
                 <use href="#inner"/><use href="#grp"/></svg>"##,
        )
        .unwrap();
        assert_eq!(doc.paths.len(), 2);
        assert_eq!(doc.paths[0].style.fill, Pattern::Solid(Rgba::rgb(0, 0, 0)));
        assert_eq!(doc.paths[1].style.fill, Pattern::Solid(Rgba::rgb(0, 0, 255)));
        assert_eq!(ops(&doc, 0), ops(&doc, 1));
    }

    #[test]
    fn self_reference_is_a_cycle() {
        let err = parse_str(
            r##"<svg><defs><g id="a"><use href="#a"/></g></defs><use href="#a"/></svg>"##,
        );
        assert!(matches!(err, Err(SvgError::ReferenceCycle(id)) if id == "a"));
    }

    #[test]
    fn bad_use_references() {
        assert!(matches!(
            parse_str(r##"<svg><use href="#nope"/></svg>"##),
            Err(SvgError::UnresolvedReference(id)) if id == "nope"
        ));
        assert!(matches!(
            parse_str(r##"<svg><use href="other.svg#r"/></svg>"##),
            Err(SvgError::UnsupportedReference(_))
        ));
    }

    #[test]
    fn masks_collect_their_paths() {
        let doc = parse_str(
            r##"<svg>
                 <defs>
                   <mask id="m" maskUnits="userSpaceOnUse" x="0" y="0" width="50%" height="10">
                     <rect width="5" height="5" fill="white"/>
                   </mask>
                 </defs>
                 <rect width="10" height="10" mask="url(#m)"/>
               </svg>"##,
        )
        .unwrap();
        let mask = doc.mask("m").unwrap();
        assert_eq!(mask.paths.len(), 1);
        assert_eq!(mask.bounds.width, 50.0);
        assert_eq!(mask.paths[0].style.fill, Pattern::Solid(Rgba::rgb(255, 255, 255)));
        assert_eq!(doc.paths.len(), 1);
        assert_eq!(doc.paths[0].style.masks, vec!["m".to_string()]);
    }

    #[test]
    fn mask_transform_is_its_context() {
        let doc = parse_str(
            r##"<svg><g transform="translate(5,0)">
                 <mask id="m" transform="scale(2)"><rect width="1" height="1"/></mask>
               </g></svg>"##,
        )
        .unwrap();
        let mask = doc.mask("m").unwrap();
        assert_eq!(mask.transform, Matrix::translate(5.0, 0.0));
        assert_eq!(
            mask.paths[0].style.transform,
            Matrix::translate(5.0, 0.0).multiply(Matrix::scale(2.0, 2.0))
        );
    }

    #[test]
    fn mask_without_id_is_rejected() {
        assert!(matches!(
            parse_str(r#"<svg><mask><rect width="1" height="1"/></mask></svg>"#),
            Err(SvgError::EmptyIdentifier(_))
        ));
    }

    #[test]
    fn gradients_register_and_paint() {
        let doc = parse_str(
            r##"<svg>
                 <defs>
                   <linearGradient id="g" x2="1">
                     <stop offset="0" stop-color="red"/>
                     <stop offset="100%" style="stop-color: blue; stop-opacity: 0.5"/>
                   </linearGradient>
                 </defs>
                 <rect width="10" height="10" fill="url(#g)"/>
               </svg>"##,
        )
        .unwrap();
        let gradient = doc.gradient("g").unwrap();
        assert_eq!(gradient.stops.len(), 2);
        assert_eq!(gradient.stops[1].color, Some(Rgba::rgb(0, 0, 255)));
        assert_eq!(gradient.stops[1].opacity, 0.5);
        assert_eq!(doc.paths.len(), 1);
        assert_eq!(doc.paths[0].style.fill, Pattern::Gradient("g".to_string()));
        assert!(doc.warnings.is_empty());
    }

    #[test]
    fn view_box_sets_root_transform_and_units() {
        let doc = parse_str(
            r#"<svg width="200" height="100" viewBox="0 0 10 10"><rect width="50%" height="1"/></svg>"#,
        )
        .unwrap();
        assert_eq!(doc.view_box.width, 10.0);
        assert_eq!(doc.transform.transform_point(0.0, 0.0), (50.0, 0.0));
        let (_, max) = doc.paths[0].path.bounds().unwrap();
        assert_eq!(max, Point::new(5.0, 1.0));
    }

    #[test]
    fn size_without_view_box_ignores_units() {
        let doc = parse_str(r#"<svg width="20mm" height="10"/>"#).unwrap();
        assert_eq!(doc.width, "20mm");
        assert_eq!(doc.view_box.width, 20.0);
        assert_eq!(doc.view_box.height, 10.0);
    }

    #[test]
    fn nested_opacity_through_markup() {
        let doc = parse_str(
            r#"<svg><g opacity="0.5"><g opacity="0.5"><rect width="1" height="1"/></g></g></svg>"#,
        )
        .unwrap();
        assert_eq!(doc.paths[0].style.effective_fill_opacity(), 0.25);
    }

    #[test]
    fn structural_errors_abort() {
        assert!(matches!(
            parse_str(r#"<svg><path d="M0 0 L1"/></svg>"#),
            Err(SvgError::MalformedPathData(_))
        ));
        assert!(matches!(
            parse_str(r#"<svg><g transform="scale(1,2,3)"/></svg>"#),
            Err(SvgError::ParamMismatch { .. })
        ));
    }

    #[test]
    fn empty_and_unbalanced_token_streams() {
        let parser = SvgParser::new();
        assert!(matches!(
            parser.parse_tokens(Vec::new()),
            Err(SvgError::InvalidDocument(_))
        ));
        let svg = || Token::Start {
            name: "svg".into(),
            attributes: Vec::<Attribute>::new(),
        };
        let end = || Token::End { name: "svg".into() };
        assert!(matches!(
            parser.parse_tokens(vec![svg(), end(), end()]),
            Err(SvgError::InvalidDocument(_))
        ));
        assert!(matches!(
            parser.parse_tokens(vec![svg()]),
            Err(SvgError::InvalidDocument(_))
        ));
    }
}
