//! Deferred definitions for self-referential types.
//!
//! A recursive declaration is emitted in two halves:
//!
//! ```js
//! const Node = _t.declare("Node");     // in place of the declaration
//! // ... rest of the unit ...
//! Node.define(_t.interface({ ... }));  // after every top-level statement
//! ```
//!
//! so that the body can refer to the name before it is complete. A
//! declaration inside a function or block is defined at the end of the
//! type declarations of its own statement list instead, see
//! [`RecursiveTypeRegistry::flush_since`].

use crate::combinator::{Combinator, RuntimeNames};
use flowcheck_ast::{Expr, Stmt};
use flowcheck_common::Span;

/// A definition waiting to be flushed.
#[derive(Clone, Debug, PartialEq)]
pub struct RecursiveTypeEntry {
    pub name: String,
    pub combinator: Combinator,
    pub span: Span,
}

/// FIFO queue of pending definitions for one unit.
#[derive(Debug, Default)]
pub struct RecursiveTypeRegistry {
    pending: Vec<RecursiveTypeEntry>,
}

impl RecursiveTypeRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Forward declaration statement for `name`.
    #[must_use]
    pub fn declare(name: &str, names: &RuntimeNames, span: Span) -> Stmt {
        Stmt::const_decl(name, Combinator::Declare(name.to_string()).to_expr(names), span)
    }

    pub fn push(&mut self, name: impl Into<String>, combinator: Combinator, span: Span) {
        self.pending.push(RecursiveTypeEntry {
            name: name.into(),
            combinator,
            span,
        });
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drain the queue as `Name.define(...)` statements, in push order.
    pub fn flush(&mut self, names: &RuntimeNames) -> Vec<Stmt> {
        self.flush_since(0, names)
    }

    /// Drain the entries pushed after the first `start`, in push order.
    pub fn flush_since(&mut self, start: usize, names: &RuntimeNames) -> Vec<Stmt> {
        let start = start.min(self.pending.len());
        self.pending
            .drain(start..)
            .map(|entry| {
                Stmt::expr(Expr::call(
                    Expr::prop(Expr::id(entry.name), "define"),
                    vec![entry.combinator.to_expr(names)],
                ))
            })
            .collect()
    }
}
