pub type Result<T> = std::result::Result<T, SvgError>;

#[derive(Debug, thiserror::Error)]
pub enum SvgError {
    #[error("malformed path data: {0}")]
    MalformedPathData(String),

    #[error("{context} expects {expected} parameters, got {got}")]
    ParamMismatch {
        context: String,
        expected: String,
        got: usize,
    },

    #[error("malformed transform: {0}")]
    MalformedTransform(String),

    #[error("matrix is not invertible")]
    SingularMatrix,

    #[error("unresolved reference to #{0}")]
    UnresolvedReference(String),

    #[error("unsupported reference: {0}")]
    UnsupportedReference(String),

    #[error("reference cycle through #{0}")]
    ReferenceCycle(String),

    #[error("invalid document: {0}")]
    InvalidDocument(String),

    #[error("<{0}> requires a non-empty id")]
    EmptyIdentifier(String),

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("xml error: {0}")]
    Xml(#[from] roxmltree::Error),
}

impl SvgError {
    pub(crate) fn param_mismatch(context: &str, expected: &str, got: usize) -> Self {
        SvgError::ParamMismatch {
            context: context.to_string(),
            expected: expected.to_string(),
            got,
        }
    }
}
