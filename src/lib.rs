//! Parses a static subset of SVG into a vector scene: styled paths in
//! 26.6 fixed point, plus the masks and gradients they reference.
//!
//! ```no_run
//! let doc = vecscene::parse_str(r#"<svg width="10" height="10"><circle cx="5" cy="5" r="4"/></svg>"#)?;
//! for item in &doc.paths {
//!     println!("{} fill={:?}", item.path, item.style.fill);
//! }
//! # Ok::<(), vecscene::SvgError>(())
//! ```

mod arc;
mod builder;
mod color;
mod defs;
mod diagnostics;
mod document;
mod error;
mod gradient;
mod matrix;
mod options;
mod path;
mod path_data;
mod shapes;
mod style;
mod types;
mod units;
mod xml;

pub use arc::{CenterArc, Cubic, EndpointArc, MAX_STEP, circular_arc};
pub use color::{Pattern, named_color, parse_color};
pub use defs::Definition;
pub use diagnostics::{Warning, WarningKind};
pub use document::{Document, Mask, StyledPath};
pub use error::{Result, SvgError};
pub use gradient::{
    CoordUnits, GradStop, Gradient, GradientDirection, GradientRegistry, SpreadMethod,
};
pub use matrix::{Matrix, parse_transform};
pub use options::{ParseOptions, SvgParser, SvgParserBuilder};
pub use path::{Path, PathOp};
pub use path_data::compile_path_data;
pub use style::{FillRule, LineCap, LineGap, LineJoin, PathStyle};
pub use types::{Bounds, Fx, Point, Rgba};
pub use units::{Axis, Length, Unit, UnitResolver};
pub use xml::{Attribute, Token, tokenize};

/// Parses SVG markup with default options.
pub fn parse_str(svg: &str) -> Result<Document> {
    SvgParser::new().parse_str(svg)
}
