//! tx IR - names, handles and the typed AST
//!
//! This crate holds the leaf data structures shared by every translator phase:
//! - Names for interned identifiers
//! - Handle newtypes for types, elements, native bindings and tree nodes
//! - The AST node arena with owned child lists, deep copy and
//!   replace-and-reparent
//! - The pre/post traversal protocol every pass drives
//!
//! # Design Philosophy
//!
//! - **Intern Everything**: identifiers → `Name(u32)`, types → `TypeId(u32)`,
//!   elements → `ElementId(u32)`
//! - **Flatten Everything**: no `Box<Node>`, children are `NodeId` indices
//!   into one `Tree`
//! - **Identity is the handle**: two equal handles denote the same wrapper

pub mod ast;
mod ids;
mod interner;
mod name;
mod stack;
pub mod visitor;

pub use ast::{
    AssignOp, EnumDeclarationSyntax, FunctionRef, ListSlot, Node, NodeConverter, NodeKind,
    NodeTag, PostfixOp, PrefixOp, Tree,
};
pub use ids::{BindingId, ElementId, NodeId, TypeId};
pub use interner::{InternError, StringInterner};
pub use name::Name;
pub use stack::ensure_sufficient_stack;
pub use visitor::{accept, TreeVisitor};
