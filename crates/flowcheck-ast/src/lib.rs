//! Annotated syntax tree for the flowcheck compiler.
//!
//! This crate defines the input and output tree of the runtime-check
//! transform:
//! - Static type annotations (`TypeAnnotation` and friends)
//! - Statements, expressions and binding patterns
//! - A printer for rendered output and failure labels
//! - Name collection for collision-free generated identifiers

pub mod types;
pub use types::{
    FunctionShape, GenericRef, LiteralType, ObjectShape, ObjectTypeIndexer, ObjectTypeProperty,
    PrimitiveType, TypeAnnotation, TypeName, TypeParam,
};

pub mod node;
pub use node::{Expr, Function, Param, Pattern, Program, Stmt};

pub mod printer;
pub use printer::Printer;

pub mod names;
pub use names::{collect_names, declared_function_names, var_scoped_names};
