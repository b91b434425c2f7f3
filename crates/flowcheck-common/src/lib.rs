//! Common types and utilities for the flowcheck compiler.
//!
//! This crate provides foundational types used across all flowcheck crates:
//! - Source spans (`Span`)
//! - Build-time diagnostics (`Diagnostic`, codes and message templates)
//! - Compiler limits and thresholds

// Span - Source location tracking (byte offsets)
pub mod span;
pub use span::Span;

// Build-time diagnostics
pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory};

// Centralized limits and thresholds
pub mod limits;
