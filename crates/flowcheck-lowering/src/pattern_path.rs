//! Destructuring-pattern type paths.
//!
//! A binding introduced by a destructuring declaration
//!
//! ```flow
//! const { a: { b }, c: [d] }: { a: { b: string }, c: Array<number> } = value;
//! ```
//!
//! has a structural path inside the declared type (`a.b` and `c[0]`).
//! Resolution is split in two: [`find_binding_path`] locates the leaf inside
//! the pattern, [`type_at_path`] walks the declared annotation along it.
//! Any disagreement between the two yields `None` and the caller skips the
//! check.

use flowcheck_ast::node::{ObjectPatternProp, Pattern};
use flowcheck_ast::TypeAnnotation;
use flowcheck_common::limits::MAX_BINDING_PATTERN_DEPTH;
use smallvec::SmallVec;

/// One step from a pattern root to a bound identifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathSegment {
    /// Object property by key.
    Key(String),
    /// Array element by position.
    Index(usize),
    /// Array rest element (`[a, ...rest]`).
    Rest,
}

pub type PatternPath = SmallVec<[PathSegment; 4]>;

/// Path from the root of `pattern` to the identifier `leaf`.
///
/// Object rest elements and computed keys have no structural counterpart
/// and are never matched.
#[must_use]
pub fn find_binding_path(pattern: &Pattern, leaf: &str) -> Option<PatternPath> {
    let mut path = PatternPath::new();
    find_in(pattern, leaf, &mut path, 0).then_some(path)
}

fn find_in(pattern: &Pattern, leaf: &str, path: &mut PatternPath, depth: u32) -> bool {
    if depth > MAX_BINDING_PATTERN_DEPTH {
        return false;
    }
    match pattern {
        Pattern::Ident(name) => name == leaf,
        Pattern::Assign { left, .. } => find_in(left, leaf, path, depth + 1),
        Pattern::Object(props) => props.iter().any(|prop| {
            let ObjectPatternProp::KeyValue { key, value, .. } = prop else {
                return false;
            };
            let Some(key) = key.static_name() else {
                return false;
            };
            path.push(PathSegment::Key(key.to_string()));
            if find_in(value, leaf, path, depth + 1) {
                return true;
            }
            path.pop();
            false
        }),
        Pattern::Array(elements) => elements.iter().enumerate().any(|(i, element)| {
            let Some(element) = element else {
                return false;
            };
            let (segment, target) = match element {
                Pattern::Rest(inner) => (PathSegment::Rest, inner.as_ref()),
                other => (PathSegment::Index(i), other),
            };
            path.push(segment);
            if find_in(target, leaf, path, depth + 1) {
                return true;
            }
            path.pop();
            false
        }),
        Pattern::Rest(_) => false,
    }
}

/// Walk `declared` along `path`.
#[must_use]
pub fn type_at_path<'a>(
    declared: &'a TypeAnnotation,
    path: &[PathSegment],
) -> Option<&'a TypeAnnotation> {
    let Some((segment, rest)) = path.split_first() else {
        return Some(declared);
    };
    let next = match (segment, declared) {
        (PathSegment::Key(key), TypeAnnotation::Object(shape)) => &shape.property(key)?.value,
        (PathSegment::Index(i), TypeAnnotation::Tuple(elems)) => elems.get(*i)?,
        (PathSegment::Index(_), _) => list_element(declared)?,
        (PathSegment::Rest, _) => {
            list_element(declared)?;
            declared
        }
        (PathSegment::Key(_), _) => return None,
    };
    type_at_path(next, rest)
}

/// Element type of `T[]` or `Array<T>`.
fn list_element(annotation: &TypeAnnotation) -> Option<&TypeAnnotation> {
    match annotation {
        TypeAnnotation::List(elem) => Some(elem.as_ref()),
        TypeAnnotation::Generic(generic) if generic.name.is("Array") => match generic.args() {
            [elem] => Some(elem),
            _ => None,
        },
        _ => None,
    }
}

/// Declared type of `leaf` within a binding `pattern` annotated `declared`.
#[must_use]
pub fn resolve_leaf_type<'a>(
    pattern: &Pattern,
    declared: &'a TypeAnnotation,
    leaf: &str,
) -> Option<&'a TypeAnnotation> {
    let path = find_binding_path(pattern, leaf)?;
    type_at_path(declared, &path)
}

#[cfg(test)]
#[path = "../tests/pattern_path.rs"]
mod tests;
