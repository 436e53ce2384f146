use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Start {
        name: String,
        attributes: Vec<Attribute>,
    },
    End {
        name: String,
    },
    // Character data; ignored by the builder.
    Text(String),
}

// Last value for `name`, so later entries override earlier ones.
pub(crate) fn lookup<'a>(attrs: &'a [Attribute], name: &str) -> Option<&'a str> {
    attrs
        .iter()
        .rev()
        .find(|a| a.name == name)
        .map(|a| a.value.as_str())
}

// Same-document reference from `href` or `xlink:href`.
pub(crate) fn href(attrs: &[Attribute]) -> Option<&str> {
    lookup(attrs, "href").or_else(|| lookup(attrs, "xlink:href"))
}

// Attribute and element names are reported without their namespace prefix.
pub fn tokenize(xml: &str) -> Result<Vec<Token>> {
    let doc = roxmltree::Document::parse(xml)?;
    let mut out = Vec::new();
    emit_node(doc.root_element(), &mut out);
    Ok(out)
}

fn emit_node(node: roxmltree::Node<'_, '_>, out: &mut Vec<Token>) {
    if node.is_text() {
        if let Some(text) = node.text() {
            out.push(Token::Text(text.to_string()));
        }
        return;
    }
    if !node.is_element() {
        return;
    }
    let name = node.tag_name().name().to_string();
    let attributes = node
        .attributes()
        .map(|a| Attribute::new(a.name(), a.value()))
        .collect();
    out.push(Token::Start {
        name: name.clone(),
        attributes,
    });
    for child in node.children() {
        emit_node(child, out);
    }
    out.push(Token::End { name });
}
