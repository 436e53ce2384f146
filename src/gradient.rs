use crate::color::parse_color;
use crate::diagnostics::{Diagnostics, WarningKind};
use crate::error::{Result, SvgError};
use crate::matrix::{Matrix, parse_transform};
use crate::types::{Bounds, Rgba};
use crate::units::{Axis, Length, Unit, UnitResolver};
use crate::xml::{Attribute, href, lookup};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpreadMethod {
    #[default]
    Pad,
    Reflect,
    Repeat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoordUnits {
    #[default]
    ObjectBoundingBox,
    UserSpaceOnUse,
}

impl CoordUnits {
    pub(crate) fn parse(value: Option<&str>, default: CoordUnits) -> CoordUnits {
        match value.map(str::trim) {
            Some("userSpaceOnUse") => CoordUnits::UserSpaceOnUse,
            Some("objectBoundingBox") => CoordUnits::ObjectBoundingBox,
            _ => default,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GradientDirection {
    Linear {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
    },
    Radial {
        cx: f32,
        cy: f32,
        fx: f32,
        fy: f32,
        r: f32,
        fr: f32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradStop {
    // `None` when the stop names no color of its own.
    pub color: Option<Rgba>,
    pub offset: f32,
    pub opacity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Linear,
    Radial,
}

// Coordinates as written, before the units mode is known.
#[derive(Debug, Clone, PartialEq)]
struct RawCoords {
    kind: Kind,
    values: HashMap<&'static str, Length>,
}

impl RawCoords {
    fn get(&self, key: &'static str) -> Option<Length> {
        self.values.get(key).copied()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Gradient {
    pub id: String,
    pub direction: GradientDirection,
    pub stops: Vec<GradStop>,
    // Viewport that user-space percentages resolve against.
    pub bounds: Bounds,
    pub matrix: Matrix,
    pub spread: SpreadMethod,
    pub units: CoordUnits,
    // Gradient this one inherits stops from (`href`).
    pub href: Option<String>,
    raw: RawCoords,
    dpi: f32,
    resolved: bool,
}

const LINEAR_KEYS: [&str; 4] = ["x1", "y1", "x2", "y2"];
const RADIAL_KEYS: [&str; 6] = ["cx", "cy", "r", "fx", "fy", "fr"];

impl Gradient {
    // Reads a `linearGradient` or `radialGradient` start tag.
    // Coordinates are captured raw; call `resolve` once the attributes have
    // all been seen.
    pub(crate) fn from_element(
        tag: &str,
        attrs: &[Attribute],
        units: &UnitResolver,
        diag: &mut Diagnostics,
    ) -> Result<Gradient> {
        let id = lookup(attrs, "id").unwrap_or("");
        if id.is_empty() {
            return Err(SvgError::EmptyIdentifier(tag.to_string()));
        }
        let (kind, keys): (Kind, &[&'static str]) = if tag == "radialGradient" {
            (Kind::Radial, &RADIAL_KEYS)
        } else {
            (Kind::Linear, &LINEAR_KEYS)
        };

        let mut raw = RawCoords {
            kind,
            values: HashMap::new(),
        };
        for &key in keys {
            if let Some(value) = lookup(attrs, key) {
                match Length::parse(value) {
                    Some(len) => {
                        raw.values.insert(key, len);
                    }
                    None => diag.warn(
                        WarningKind::InvalidValue,
                        format!("<{tag} id=\"{id}\"> {key}=\"{value}\""),
                    ),
                }
            }
        }

        let spread = match lookup(attrs, "spreadMethod").map(str::trim) {
            Some("reflect") => SpreadMethod::Reflect,
            Some("repeat") => SpreadMethod::Repeat,
            _ => SpreadMethod::Pad,
        };
        let matrix = match lookup(attrs, "gradientTransform") {
            Some(t) => parse_transform(t)?,
            None => Matrix::IDENTITY,
        };
        let href = href(attrs)
            .and_then(|h| h.trim().strip_prefix('#'))
            .filter(|h| !h.is_empty())
            .map(str::to_string);

        let mut gradient = Gradient {
            id: id.to_string(),
            direction: GradientDirection::Linear {
                x1: 0.0,
                y1: 0.0,
                x2: 0.0,
                y2: 0.0,
            },
            stops: Vec::new(),
            bounds: units.viewport,
            matrix,
            spread,
            units: CoordUnits::parse(
                lookup(attrs, "gradientUnits"),
                CoordUnits::ObjectBoundingBox,
            ),
            href,
            raw,
            dpi: units.dpi,
            resolved: false,
        };
        gradient.resolve();
        Ok(gradient)
    }

    // Converts the raw coordinates under the current units mode. Repeated
    // calls leave the result unchanged.
    pub fn resolve(&mut self) {
        if self.resolved {
            return;
        }
        let resolver = UnitResolver::new(self.bounds, self.dpi);
        let bbox = self.units == CoordUnits::ObjectBoundingBox;
        let coord = |len: Option<Length>, default_percent: f32, axis: Axis| -> f32 {
            let len = len.unwrap_or(Length {
                value: default_percent,
                unit: Unit::Percent,
            });
            if bbox {
                // Fractions of the painted object's box.
                if len.is_percent() { len.value / 100.0 } else { len.value }
            } else {
                resolver.resolve(len, axis)
            }
        };

        self.direction = match self.raw.kind {
            Kind::Linear => GradientDirection::Linear {
                x1: coord(self.raw.get("x1"), 0.0, Axis::X),
                y1: coord(self.raw.get("y1"), 0.0, Axis::Y),
                x2: coord(self.raw.get("x2"), 100.0, Axis::X),
                y2: coord(self.raw.get("y2"), 0.0, Axis::Y),
            },
            Kind::Radial => {
                let cx = coord(self.raw.get("cx"), 50.0, Axis::X);
                let cy = coord(self.raw.get("cy"), 50.0, Axis::Y);
                GradientDirection::Radial {
                    cx,
                    cy,
                    fx: match self.raw.get("fx") {
                        Some(_) => coord(self.raw.get("fx"), 50.0, Axis::X),
                        None => cx,
                    },
                    fy: match self.raw.get("fy") {
                        Some(_) => coord(self.raw.get("fy"), 50.0, Axis::Y),
                        None => cy,
                    },
                    r: coord(self.raw.get("r"), 50.0, Axis::Diagonal),
                    fr: coord(self.raw.get("fr"), 0.0, Axis::Diagonal),
                }
            }
        };
        self.resolved = true;
    }

    // Appends a stop. Offsets are clamped to [0, 1] and never decrease.
    pub fn add_stop(&mut self, mut stop: GradStop) {
        stop.offset = stop.offset.clamp(0.0, 1.0);
        if let Some(prev) = self.stops.last() {
            stop.offset = stop.offset.max(prev.offset);
        }
        stop.opacity = stop.opacity.clamp(0.0, 1.0);
        self.stops.push(stop);
    }
}

pub(crate) fn parse_stop(decls: &[Attribute], diag: &mut Diagnostics) -> Result<GradStop> {
    let offset = match lookup(decls, "offset").map(str::trim) {
        Some(v) => match Length::parse(v) {
            Some(len) if len.is_percent() => len.value / 100.0,
            Some(len) if len.unit == Unit::Px => len.value,
            _ => {
                diag.warn(WarningKind::InvalidValue, format!("stop offset=\"{v}\""));
                0.0
            }
        },
        None => 0.0,
    };
    let color = match lookup(decls, "stop-color") {
        Some(v) => {
            let color = parse_color(v)?;
            if color.is_none() {
                diag.warn(WarningKind::InvalidValue, format!("stop-color=\"{v}\""));
            }
            color
        }
        None => None,
    };
    let opacity = match lookup(decls, "stop-opacity") {
        Some(v) => match v.trim().parse::<f32>() {
            Ok(o) => o,
            Err(_) => {
                diag.warn(WarningKind::InvalidValue, format!("stop-opacity=\"{v}\""));
                1.0
            }
        },
        None => 1.0,
    };
    Ok(GradStop {
        color,
        offset,
        opacity,
    })
}

#[derive(Debug, Clone, Default)]
pub struct GradientRegistry {
    gradients: HashMap<String, Gradient>,
}

impl GradientRegistry {
    pub fn get(&self, id: &str) -> Option<&Gradient> {
        self.gradients.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.gradients.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.gradients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gradients.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Gradient)> {
        self.gradients.iter().map(|(k, v)| (k.as_str(), v))
    }

    // Registers a finished gradient, inheriting stops through `href` when it
    // has none of its own. A later definition replaces an earlier one.
    pub(crate) fn insert(&mut self, mut gradient: Gradient) {
        if gradient.stops.is_empty() {
            if let Some(base) = gradient.href.as_deref().and_then(|h| self.gradients.get(h)) {
                gradient.stops = base.stops.clone();
            }
        }
        gradient.resolve();
        self.gradients.insert(gradient.id.clone(), gradient);
    }
}
