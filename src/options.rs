use crate::builder::DocumentBuilder;
use crate::document::Document;
use crate::error::{Result, SvgError};
use crate::types::Bounds;
use crate::xml::{Token, tokenize};

#[derive(Debug, Clone, PartialEq)]
pub struct ParseOptions {
    // Pixels per inch for absolute units.
    pub dpi: f32,
    // Viewport used for percentages until the root element supplies one.
    pub default_viewport: Bounds,
    pub warn_unknown_elements: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            dpi: 96.0,
            default_viewport: Bounds::new(0.0, 0.0, 100.0, 100.0),
            warn_unknown_elements: true,
        }
    }
}

/// Parses SVG into a [`Document`]. Each parse runs on fresh state, so one
/// parser can be reused.
#[derive(Debug, Clone, Default)]
pub struct SvgParser {
    options: ParseOptions,
}

impl SvgParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> SvgParserBuilder {
        SvgParserBuilder::new()
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    pub fn parse_str(&self, svg: &str) -> Result<Document> {
        self.parse_tokens(tokenize(svg)?)
    }

    /// Builds a document from a token stream supplied by any tokenizer.
    pub fn parse_tokens<I>(&self, tokens: I) -> Result<Document>
    where
        I: IntoIterator<Item = Token>,
    {
        let mut builder = DocumentBuilder::new(self.options.clone());
        for token in tokens {
            match token {
                Token::Start { name, attributes } => builder.start_element(&name, &attributes)?,
                Token::End { name } => builder.end_element(&name)?,
                Token::Text(_) => {}
            }
        }
        builder.finish()
    }
}

#[derive(Debug, Clone, Default)]
pub struct SvgParserBuilder {
    options: ParseOptions,
}

impl SvgParserBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dpi(mut self, dpi: f32) -> Self {
        self.options.dpi = dpi;
        self
    }

    pub fn default_viewport(mut self, width: f32, height: f32) -> Self {
        self.options.default_viewport = Bounds::new(0.0, 0.0, width, height);
        self
    }

    pub fn warn_unknown_elements(mut self, enabled: bool) -> Self {
        self.options.warn_unknown_elements = enabled;
        self
    }

    pub fn build(self) -> Result<SvgParser> {
        let dpi = self.options.dpi;
        if !dpi.is_finite() || dpi <= 0.0 {
            return Err(SvgError::InvalidConfiguration(format!(
                "dpi must be positive, got {dpi}"
            )));
        }
        let vp = self.options.default_viewport;
        if !vp.width.is_finite() || !vp.height.is_finite() || vp.is_empty() {
            return Err(SvgError::InvalidConfiguration(format!(
                "default viewport must be non-empty, got {}x{}",
                vp.width, vp.height
            )));
        }
        Ok(SvgParser {
            options: self.options,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_options() {
        let parser = SvgParser::builder()
            .dpi(72.0)
            .default_viewport(640.0, 480.0)
            .warn_unknown_elements(false)
            .build()
            .unwrap();
        assert_eq!(parser.options().dpi, 72.0);
        assert_eq!(parser.options().default_viewport.width, 640.0);
        assert!(!parser.options().warn_unknown_elements);
    }

    #[test]
    fn builder_rejects_bad_values() {
        assert!(matches!(
            SvgParser::builder().dpi(0.0).build(),
            Err(SvgError::InvalidConfiguration(_))
        ));
        assert!(SvgParser::builder().default_viewport(0.0, 10.0).build().is_err());
    }

    #[test]
    fn token_stream_without_markup() {
        let tokens = vec![
            Token::Start {
                name: "svg".into(),
                attributes: vec![],
            },
            Token::Start {
                name: "path".into(),
                attributes: vec![crate::xml::Attribute::new("d", "M0 0 L1 1")],
            },
            Token::End { name: "path".into() },
            Token::Text("ignored".into()),
            Token::End { name: "svg".into() },
        ];
        let doc = SvgParser::new().parse_tokens(tokens).unwrap();
        assert_eq!(doc.paths.len(), 1);
    }
}
