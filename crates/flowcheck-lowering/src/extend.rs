//! Interface extension (`interface A extends B, C { ... }`).
//!
//! Parents are referenced by name. `$Refinement<typeof p>` entries in the
//! extends list are not parents: their predicates are folded on top of the
//! interface's own properties.
//!
//! ```js
//! const A = _extend([B, C, { a: _t.String }], "A");
//! const R = _extend([B, _t.refinement(_t.interface({ a: _t.String }), p)], "R");
//! ```

use crate::combinator::Combinator;
use crate::error::LoweringError;
use crate::lower::{TypeLowering, refinement_predicate};
use flowcheck_ast::{GenericRef, ObjectShape};

const REFINEMENT_NAME: &str = "$Refinement";

/// Lower an extending interface to an `Extend` combinator named `name`.
pub fn lower_extension(
    lowering: &mut TypeLowering<'_>,
    parents: &[GenericRef],
    body: &ObjectShape,
    name: Option<&str>,
) -> Result<Combinator, LoweringError> {
    let mut members = Vec::with_capacity(parents.len() + 1);
    let mut predicates = Vec::new();
    for parent in parents {
        if parent.name.is(REFINEMENT_NAME) {
            predicates.push(refinement_predicate(parent)?);
        } else {
            members.push(Combinator::Ref(parent.name.clone()));
        }
    }

    let props = lowering.lower_props(body)?;
    let own = if predicates.is_empty() {
        Combinator::Props(props)
    } else {
        predicates.into_iter().fold(
            Combinator::Interface {
                props,
                name: None,
                exact: false,
            },
            |base, predicate| Combinator::Refinement {
                base: Box::new(base),
                predicate,
                name: None,
            },
        )
    };
    members.push(own);

    Ok(Combinator::Extend {
        members,
        name: name.map(str::to_string),
    })
}

/// Members the extend helper keeps: everything except `Any` and `Maybe`
/// nested around `Any`.
#[must_use]
pub fn informative_members(members: &[Combinator]) -> Vec<&Combinator> {
    members.iter().filter(|m| !m.is_any_like()).collect()
}
