//! Errors raised while lowering annotations.

use flowcheck_common::diagnostics::diagnostic_codes;
use flowcheck_common::{Diagnostic, Span};

/// A lowering failure. Always fatal to the compilation unit.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoweringError {
    /// A list-like generic applied to the wrong number of arguments.
    #[error("unsupported {name} type annotation: expected 1 type parameter, got {got}")]
    Arity { name: String, got: usize },

    /// Object type with more than one indexer.
    #[error("object type declares {count} indexers")]
    AmbiguousIndexer { count: usize },

    /// `$Refinement` without exactly one `typeof predicate` argument.
    #[error("invalid refinement definition")]
    InvalidRefinement,

    /// `$Reify` without exactly one type reference argument.
    #[error("invalid use of $Reify")]
    InvalidReify,

    /// `$Exact` without exactly one object type argument.
    #[error("invalid use of $Exact")]
    InvalidExact,

    /// Annotation kind with no lowering.
    #[error("unsupported type annotation: {0}")]
    UnsupportedAnnotation(String),

    /// Nesting exceeded `limits::MAX_ANNOTATION_DEPTH`.
    #[error("type annotation nested deeper than {limit}")]
    TooDeep { limit: u32 },
}

impl LoweringError {
    #[must_use]
    pub const fn code(&self) -> u32 {
        match self {
            Self::Arity { .. } => diagnostic_codes::LIST_ARITY,
            Self::AmbiguousIndexer { .. } => diagnostic_codes::AMBIGUOUS_INDEXER,
            Self::InvalidRefinement => diagnostic_codes::INVALID_REFINEMENT,
            Self::InvalidReify => diagnostic_codes::INVALID_REIFY,
            Self::InvalidExact => diagnostic_codes::INVALID_EXACT,
            Self::UnsupportedAnnotation(_) => diagnostic_codes::UNSUPPORTED_ANNOTATION,
            Self::TooDeep { .. } => diagnostic_codes::ANNOTATION_TOO_DEEP,
        }
    }

    /// Convert into a diagnostic attached to `span` of `file`.
    #[must_use]
    pub fn to_diagnostic(&self, file: &str, span: Span) -> Diagnostic {
        let code = self.code();
        match self {
            Self::Arity { name, got } => {
                let got = got.to_string();
                Diagnostic::from_code(
                    file,
                    span.start,
                    span.len(),
                    code,
                    &[name.as_str(), got.as_str()],
                )
            }
            Self::AmbiguousIndexer { count } => {
                let count = count.to_string();
                Diagnostic::from_code(file, span.start, span.len(), code, &[count.as_str()])
            }
            Self::UnsupportedAnnotation(kind) => {
                Diagnostic::from_code(file, span.start, span.len(), code, &[kind.as_str()])
            }
            Self::TooDeep { limit } => {
                let limit = limit.to_string();
                Diagnostic::from_code(file, span.start, span.len(), code, &[limit.as_str()])
            }
            Self::InvalidRefinement | Self::InvalidReify | Self::InvalidExact => {
                Diagnostic::from_code(file, span.start, span.len(), code, &[])
            }
        }
    }
}
