//! Centralized limits and thresholds for the flowcheck compiler.
//!
//! These prevent stack overflow when the input tree is pathologically deep.
//! The upstream parser already bounds most nesting, so the values here are
//! generous and only guard against hostile or machine-generated input.

// =============================================================================
// Recursion Depth Limits
// =============================================================================

/// Maximum nesting depth of a single type annotation during lowering.
///
/// Exceeding it raises the `ANNOTATION_TOO_DEEP` diagnostic.
///
/// ```flow
/// type Deep = Array<Array<Array<Array</* ... 256 levels ... */>>>>;
/// ```
pub const MAX_ANNOTATION_DEPTH: u32 = 256;

/// Maximum depth for destructuring pattern walks (`{a: {b: {c: ...}}}`).
///
/// Deeper patterns are treated as "no type found", which skips the check.
pub const MAX_BINDING_PATTERN_DEPTH: u32 = 100;

/// Maximum statement/expression nesting the transform pass will descend into.
///
/// Nodes below this depth are passed through untransformed.
pub const MAX_AST_DEPTH: u32 = 500;

// =============================================================================
// Identifier Generation
// =============================================================================

/// Upper bound on the numeric suffix tried when generating a unique
/// identifier (`_assert`, `_assert2`, ...).
pub const MAX_UID_SUFFIX: u32 = 10_000;
