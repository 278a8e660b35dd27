use miette::{Diagnostic, Report};
use thiserror::Error;

/// Problems met while labelling the graph.
///
/// None of these abort extraction: the extractor records the error, logs it
/// and carries on with a placeholder label.
#[derive(Debug, Error, Diagnostic, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("unrecognized {construct}: {detail}")]
    #[diagnostic(code(ir_facts::unrecognized_construct))]
    UnrecognizedConstruct {
        construct: &'static str,
        detail: String,
    },
    #[error("{message}")]
    #[diagnostic(code(ir_facts::invariant_violation))]
    InvariantViolation { message: String },
    #[error("failed to resolve {entity}: {reason}")]
    #[diagnostic(
        code(ir_facts::resolution_failure),
        severity(Warning),
        help("the declaration is used unresolved")
    )]
    ResolutionFailure { entity: String, reason: String },
    #[error("unexpected {position}: expected {expected}, found {found}")]
    #[diagnostic(code(ir_facts::unexpected_shape))]
    UnexpectedShape {
        position: &'static str,
        expected: &'static str,
        found: String,
    },
}

impl ExtractError {
    pub fn invariant(message: impl Into<String>) -> Self {
        ExtractError::InvariantViolation {
            message: message.into(),
        }
    }

    pub fn is_warning(&self) -> bool {
        matches!(self, ExtractError::ResolutionFailure { .. })
    }
}

/// Renders collected errors as miette reports, one string per error.
pub fn render(errors: &[ExtractError]) -> Vec<String> {
    errors
        .iter()
        .map(|error| format!("{:?}", Report::new(error.clone())))
        .collect()
}
