//! Build-time diagnostic types and message lookup.
//!
//! Every failure the transform can raise while lowering annotations or
//! planning assertion sites is reported as a `Diagnostic`. Diagnostics are
//! always fatal to the compilation unit that raised them; runtime assertion
//! failures are a separate class and never pass through here.

use serde::Serialize;
use std::fmt;

// =============================================================================
// Diagnostic Types
// =============================================================================

/// Diagnostic category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum DiagnosticCategory {
    Warning = 0,
    Error = 1,
    Suggestion = 2,
    Message = 3,
}

impl DiagnosticCategory {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Suggestion => "suggestion",
            Self::Message => "message",
        }
    }
}

/// Related information for a diagnostic (e.g., where a type was declared).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DiagnosticRelatedInformation {
    pub file: String,
    pub start: u32,
    pub length: u32,
    pub message_text: String,
    pub category: DiagnosticCategory,
    pub code: u32,
}

/// A build-time diagnostic with source location.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub file: String,
    pub start: u32,
    pub length: u32,
    pub message_text: String,
    pub category: DiagnosticCategory,
    pub code: u32,
    /// Related information spans
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub related_information: Vec<DiagnosticRelatedInformation>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    #[must_use]
    pub const fn error(file: String, start: u32, length: u32, message: String, code: u32) -> Self {
        Self {
            file,
            start,
            length,
            message_text: message,
            category: DiagnosticCategory::Error,
            code,
            related_information: Vec::new(),
        }
    }

    /// Create an error diagnostic from a registered code, filling `{0}`, `{1}`...
    ///
    /// Unknown codes keep the arguments joined as the message so nothing is lost.
    #[must_use]
    pub fn from_code(file: &str, start: u32, length: u32, code: u32, args: &[&str]) -> Self {
        let (category, message) = match get_diagnostic_message(code) {
            Some(def) => (def.category, format_message(def.message, args)),
            None => (DiagnosticCategory::Error, args.join(" ")),
        };
        Self {
            file: file.to_string(),
            start,
            length,
            message_text: message,
            category,
            code,
            related_information: Vec::new(),
        }
    }

    /// Add related information to this diagnostic.
    #[must_use]
    pub fn with_related(mut self, file: String, start: u32, length: u32, message: String) -> Self {
        self.related_information.push(DiagnosticRelatedInformation {
            file,
            start,
            length,
            message_text: message,
            category: DiagnosticCategory::Message,
            code: 0,
        });
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {} FC{}: [flowcheck] {}",
            self.file,
            self.start,
            self.category.as_str(),
            self.code,
            self.message_text
        )
    }
}

impl std::error::Error for Diagnostic {}

// =============================================================================
// Message Table
// =============================================================================

/// A diagnostic message definition with code, category, and message template.
#[derive(Clone, Copy, Debug)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub message: &'static str,
}

pub mod diagnostic_codes {
    pub const LIST_ARITY: u32 = 9001;
    pub const AMBIGUOUS_INDEXER: u32 = 9002;
    pub const INVALID_REFINEMENT: u32 = 9003;
    pub const INVALID_REIFY: u32 = 9004;
    pub const RESERVED_TYPE_NAME: u32 = 9005;
    pub const UNSUPPORTED_ANNOTATION: u32 = 9006;
    pub const INVALID_EXACT: u32 = 9007;
    pub const ANNOTATION_TOO_DEEP: u32 = 9008;
}

pub static DIAGNOSTIC_MESSAGES: &[DiagnosticMessage] = &[
    DiagnosticMessage {
        code: diagnostic_codes::LIST_ARITY,
        category: DiagnosticCategory::Error,
        message: "Unsupported {0} type annotation: incorrect number of type parameters (expected 1, got {1})",
    },
    DiagnosticMessage {
        code: diagnostic_codes::AMBIGUOUS_INDEXER,
        category: DiagnosticCategory::Error,
        message: "Object type annotation declares {0} indexers, at most one indexer is supported",
    },
    DiagnosticMessage {
        code: diagnostic_codes::INVALID_REFINEMENT,
        category: DiagnosticCategory::Error,
        message: "Invalid refinement definition, example: $Refinement<typeof predicate>",
    },
    DiagnosticMessage {
        code: diagnostic_codes::INVALID_REIFY,
        category: DiagnosticCategory::Error,
        message: "Invalid use of $Reify, example: const ReifiedMyType = (({}: any): $Reify<MyType>)",
    },
    DiagnosticMessage {
        code: diagnostic_codes::RESERVED_TYPE_NAME,
        category: DiagnosticCategory::Error,
        message: "{0} is a reserved interface name for flowcheck",
    },
    DiagnosticMessage {
        code: diagnostic_codes::UNSUPPORTED_ANNOTATION,
        category: DiagnosticCategory::Error,
        message: "Unsupported type annotation: {0}",
    },
    DiagnosticMessage {
        code: diagnostic_codes::INVALID_EXACT,
        category: DiagnosticCategory::Error,
        message: "Invalid use of $Exact, example: $Exact<{ x: string }>",
    },
    DiagnosticMessage {
        code: diagnostic_codes::ANNOTATION_TOO_DEEP,
        category: DiagnosticCategory::Error,
        message: "Type annotation is nested too deeply (limit {0})",
    },
];

/// Format a diagnostic message by replacing {0}, {1}, etc. with arguments.
#[must_use]
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}

/// Look up a diagnostic message definition by code.
#[must_use]
pub fn get_diagnostic_message(code: u32) -> Option<&'static DiagnosticMessage> {
    DIAGNOSTIC_MESSAGES.iter().find(|m| m.code == code)
}

/// Get the message template for a diagnostic code.
#[must_use]
pub fn get_message_template(code: u32) -> Option<&'static str> {
    get_diagnostic_message(code).map(|m| m.message)
}

#[cfg(test)]
#[path = "../tests/diagnostics.rs"]
mod tests;
