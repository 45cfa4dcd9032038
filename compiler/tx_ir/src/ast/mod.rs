//! Typed AST node model.
//!
//! Nodes live in a [`Tree`] arena and refer to their children by [`NodeId`].
//! Each node is exclusively owned by the parent whose child slot or child
//! list names it; the arena records that parent so a node can be replaced
//! in place without searching the tree.
//!
//! Every node carries its static type and, where it denotes a declaration or
//! member, the element it resolves to.

mod convert;
mod tree;

pub use convert::{EnumDeclarationSyntax, NodeConverter};
pub use tree::Tree;

use smallvec::SmallVec;

use crate::{ElementId, Name, NodeId, TypeId};

/// A node slot in the arena.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    /// Static type of the node, if it has one (expressions, type references).
    pub ty: Option<TypeId>,
    /// The element this node denotes (names, invocations, declarations).
    pub element: Option<ElementId>,
    pub(crate) parent: Option<NodeId>,
}

impl Node {
    /// The node's current parent, `None` for roots and detached nodes.
    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }
}

/// Assignment operators.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AssignOp {
    Assign,
    PlusAssign,
    MinusAssign,
    TimesAssign,
    DivideAssign,
    RemainderAssign,
    BitAndAssign,
    BitOrAssign,
    BitXorAssign,
    LeftShiftAssign,
    RightShiftSignedAssign,
    RightShiftUnsignedAssign,
}

/// Prefix operators, including the pointer dereference the runtime ABI needs.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PrefixOp {
    Increment,
    Decrement,
    Plus,
    Minus,
    Complement,
    Not,
    Dereference,
    AddressOf,
}

/// Postfix operators.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PostfixOp {
    Increment,
    Decrement,
}

/// A plain runtime function (not a method) targeted by a lowered call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionRef {
    pub name: Name,
    /// Return type as declared by the runtime header.
    pub return_type: TypeId,
    /// Runtime type the function belongs to.
    pub declaring: ElementId,
    pub params: SmallVec<[TypeId; 4]>,
    /// Alternate function producing a +1 retained result, if the runtime has one.
    pub retained_name: Option<Name>,
}

impl FunctionRef {
    pub fn new(name: Name, return_type: TypeId, declaring: ElementId) -> Self {
        Self {
            name,
            return_type,
            declaring,
            params: SmallVec::new(),
            retained_name: None,
        }
    }

    #[must_use]
    pub fn with_params(mut self, params: impl IntoIterator<Item = TypeId>) -> Self {
        self.params.extend(params);
        self
    }

    #[must_use]
    pub fn with_retained_name(mut self, name: Name) -> Self {
        self.retained_name = Some(name);
        self
    }
}

/// Node kinds.
///
/// Child fields appear in the order traversal visits them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    // === Declarations ===
    CompilationUnit {
        package: Option<NodeId>,
        types: Vec<NodeId>,
    },
    PackageDeclaration {
        javadoc: Option<NodeId>,
        annotations: Vec<NodeId>,
        name: NodeId,
    },
    EnumDeclaration {
        javadoc: Option<NodeId>,
        annotations: Vec<NodeId>,
        name: NodeId,
        constants: Vec<NodeId>,
        body: Vec<NodeId>,
    },
    EnumConstantDeclaration {
        annotations: Vec<NodeId>,
        name: NodeId,
        arguments: Vec<NodeId>,
    },
    MethodDeclaration {
        javadoc: Option<NodeId>,
        annotations: Vec<NodeId>,
        name: NodeId,
        parameters: Vec<NodeId>,
        body: Option<NodeId>,
    },
    VariableDeclaration {
        name: NodeId,
        initializer: Option<NodeId>,
    },
    Javadoc {
        text: Name,
    },
    Annotation {
        type_name: NodeId,
    },

    // === Statements ===
    Block {
        statements: Vec<NodeId>,
    },
    ExpressionStatement {
        expression: NodeId,
    },
    ReturnStatement {
        expression: Option<NodeId>,
    },

    // === Expressions ===
    SimpleName {
        identifier: Name,
    },
    QualifiedName {
        qualifier: NodeId,
        name: NodeId,
    },
    FieldAccess {
        expression: NodeId,
        name: NodeId,
    },
    ArrayAccess {
        array: NodeId,
        index: NodeId,
    },
    ArrayCreation {
        dimensions: Vec<NodeId>,
        initializer: Option<NodeId>,
        retained_result: bool,
    },
    ArrayInitializer {
        expressions: Vec<NodeId>,
    },
    Assignment {
        op: AssignOp,
        lhs: NodeId,
        rhs: NodeId,
    },
    InstanceOf {
        expression: NodeId,
        /// A [`NodeKind::TypeRef`] naming the tested type.
        tested: NodeId,
    },
    ClassInstanceCreation {
        arguments: Vec<NodeId>,
        retained_result: bool,
    },
    /// Method call; the node's element is the invoked method.
    MethodInvocation {
        receiver: Option<NodeId>,
        arguments: Vec<NodeId>,
    },
    FunctionInvocation {
        function: FunctionRef,
        arguments: Vec<NodeId>,
        retained_result: bool,
    },
    Prefix {
        op: PrefixOp,
        operand: NodeId,
    },
    Postfix {
        op: PostfixOp,
        operand: NodeId,
    },
    NumberLiteral {
        value: i64,
    },
    StringLiteral {
        value: Name,
    },
    NullLiteral,
    /// Reflected class object of `literal`; the node's own type is the class type.
    TypeLiteral {
        literal: TypeId,
    },
    /// A reference to a type in source position (the node's type is the referenced type).
    TypeRef,
}

/// Kind discriminant handed to visitors.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodeTag {
    CompilationUnit,
    PackageDeclaration,
    EnumDeclaration,
    EnumConstantDeclaration,
    MethodDeclaration,
    VariableDeclaration,
    Javadoc,
    Annotation,
    Block,
    ExpressionStatement,
    ReturnStatement,
    SimpleName,
    QualifiedName,
    FieldAccess,
    ArrayAccess,
    ArrayCreation,
    ArrayInitializer,
    Assignment,
    InstanceOf,
    ClassInstanceCreation,
    MethodInvocation,
    FunctionInvocation,
    Prefix,
    Postfix,
    NumberLiteral,
    StringLiteral,
    NullLiteral,
    TypeLiteral,
    TypeRef,
}

/// Names an owned child list for in-place list edits.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ListSlot {
    Types,
    Annotations,
    Constants,
    Body,
    Arguments,
    Parameters,
    Statements,
    Dimensions,
    Expressions,
}

impl NodeKind {
    pub fn tag(&self) -> NodeTag {
        match self {
            NodeKind::CompilationUnit { .. } => NodeTag::CompilationUnit,
            NodeKind::PackageDeclaration { .. } => NodeTag::PackageDeclaration,
            NodeKind::EnumDeclaration { .. } => NodeTag::EnumDeclaration,
            NodeKind::EnumConstantDeclaration { .. } => NodeTag::EnumConstantDeclaration,
            NodeKind::MethodDeclaration { .. } => NodeTag::MethodDeclaration,
            NodeKind::VariableDeclaration { .. } => NodeTag::VariableDeclaration,
            NodeKind::Javadoc { .. } => NodeTag::Javadoc,
            NodeKind::Annotation { .. } => NodeTag::Annotation,
            NodeKind::Block { .. } => NodeTag::Block,
            NodeKind::ExpressionStatement { .. } => NodeTag::ExpressionStatement,
            NodeKind::ReturnStatement { .. } => NodeTag::ReturnStatement,
            NodeKind::SimpleName { .. } => NodeTag::SimpleName,
            NodeKind::QualifiedName { .. } => NodeTag::QualifiedName,
            NodeKind::FieldAccess { .. } => NodeTag::FieldAccess,
            NodeKind::ArrayAccess { .. } => NodeTag::ArrayAccess,
            NodeKind::ArrayCreation { .. } => NodeTag::ArrayCreation,
            NodeKind::ArrayInitializer { .. } => NodeTag::ArrayInitializer,
            NodeKind::Assignment { .. } => NodeTag::Assignment,
            NodeKind::InstanceOf { .. } => NodeTag::InstanceOf,
            NodeKind::ClassInstanceCreation { .. } => NodeTag::ClassInstanceCreation,
            NodeKind::MethodInvocation { .. } => NodeTag::MethodInvocation,
            NodeKind::FunctionInvocation { .. } => NodeTag::FunctionInvocation,
            NodeKind::Prefix { .. } => NodeTag::Prefix,
            NodeKind::Postfix { .. } => NodeTag::Postfix,
            NodeKind::NumberLiteral { .. } => NodeTag::NumberLiteral,
            NodeKind::StringLiteral { .. } => NodeTag::StringLiteral,
            NodeKind::NullLiteral => NodeTag::NullLiteral,
            NodeKind::TypeLiteral { .. } => NodeTag::TypeLiteral,
            NodeKind::TypeRef => NodeTag::TypeRef,
        }
    }

    /// Children in traversal order.
    pub fn children(&self) -> SmallVec<[NodeId; 8]> {
        let mut out = SmallVec::new();
        self.for_each_child(|id| out.push(id));
        out
    }

    fn for_each_child(&self, mut f: impl FnMut(NodeId)) {
        fn opt(slot: Option<NodeId>, f: &mut impl FnMut(NodeId)) {
            if let Some(id) = slot {
                f(id);
            }
        }
        match self {
            NodeKind::CompilationUnit { package, types } => {
                opt(*package, &mut f);
                types.iter().copied().for_each(&mut f);
            }
            NodeKind::PackageDeclaration {
                javadoc,
                annotations,
                name,
            } => {
                opt(*javadoc, &mut f);
                annotations.iter().copied().for_each(&mut f);
                f(*name);
            }
            NodeKind::EnumDeclaration {
                javadoc,
                annotations,
                name,
                constants,
                body,
            } => {
                opt(*javadoc, &mut f);
                annotations.iter().copied().for_each(&mut f);
                f(*name);
                constants.iter().copied().for_each(&mut f);
                body.iter().copied().for_each(&mut f);
            }
            NodeKind::EnumConstantDeclaration {
                annotations,
                name,
                arguments,
            } => {
                annotations.iter().copied().for_each(&mut f);
                f(*name);
                arguments.iter().copied().for_each(&mut f);
            }
            NodeKind::MethodDeclaration {
                javadoc,
                annotations,
                name,
                parameters,
                body,
            } => {
                opt(*javadoc, &mut f);
                annotations.iter().copied().for_each(&mut f);
                f(*name);
                parameters.iter().copied().for_each(&mut f);
                opt(*body, &mut f);
            }
            NodeKind::VariableDeclaration { name, initializer } => {
                f(*name);
                opt(*initializer, &mut f);
            }
            NodeKind::Annotation { type_name } => f(*type_name),
            NodeKind::Block { statements } => statements.iter().copied().for_each(&mut f),
            NodeKind::ExpressionStatement { expression } => f(*expression),
            NodeKind::ReturnStatement { expression } => opt(*expression, &mut f),
            NodeKind::QualifiedName { qualifier, name } => {
                f(*qualifier);
                f(*name);
            }
            NodeKind::FieldAccess { expression, name } => {
                f(*expression);
                f(*name);
            }
            NodeKind::ArrayAccess { array, index } => {
                f(*array);
                f(*index);
            }
            NodeKind::ArrayCreation {
                dimensions,
                initializer,
                ..
            } => {
                dimensions.iter().copied().for_each(&mut f);
                opt(*initializer, &mut f);
            }
            NodeKind::ArrayInitializer { expressions } => {
                expressions.iter().copied().for_each(&mut f);
            }
            NodeKind::Assignment { lhs, rhs, .. } => {
                f(*lhs);
                f(*rhs);
            }
            NodeKind::InstanceOf { expression, tested } => {
                f(*expression);
                f(*tested);
            }
            NodeKind::ClassInstanceCreation { arguments, .. }
            | NodeKind::FunctionInvocation { arguments, .. } => {
                arguments.iter().copied().for_each(&mut f);
            }
            NodeKind::MethodInvocation {
                receiver,
                arguments,
            } => {
                opt(*receiver, &mut f);
                arguments.iter().copied().for_each(&mut f);
            }
            NodeKind::Prefix { operand, .. } | NodeKind::Postfix { operand, .. } => f(*operand),
            NodeKind::Javadoc { .. }
            | NodeKind::SimpleName { .. }
            | NodeKind::NumberLiteral { .. }
            | NodeKind::StringLiteral { .. }
            | NodeKind::NullLiteral
            | NodeKind::TypeLiteral { .. }
            | NodeKind::TypeRef => {}
        }
    }

    /// Mutable access to every child slot, in traversal order.
    pub(crate) fn child_slots_mut(&mut self) -> Vec<&mut NodeId> {
        let mut out: Vec<&mut NodeId> = Vec::new();
        match self {
            NodeKind::CompilationUnit { package, types } => {
                out.extend(package.as_mut());
                out.extend(types.iter_mut());
            }
            NodeKind::PackageDeclaration {
                javadoc,
                annotations,
                name,
            } => {
                out.extend(javadoc.as_mut());
                out.extend(annotations.iter_mut());
                out.push(name);
            }
            NodeKind::EnumDeclaration {
                javadoc,
                annotations,
                name,
                constants,
                body,
            } => {
                out.extend(javadoc.as_mut());
                out.extend(annotations.iter_mut());
                out.push(name);
                out.extend(constants.iter_mut());
                out.extend(body.iter_mut());
            }
            NodeKind::EnumConstantDeclaration {
                annotations,
                name,
                arguments,
            } => {
                out.extend(annotations.iter_mut());
                out.push(name);
                out.extend(arguments.iter_mut());
            }
            NodeKind::MethodDeclaration {
                javadoc,
                annotations,
                name,
                parameters,
                body,
            } => {
                out.extend(javadoc.as_mut());
                out.extend(annotations.iter_mut());
                out.push(name);
                out.extend(parameters.iter_mut());
                out.extend(body.as_mut());
            }
            NodeKind::VariableDeclaration { name, initializer } => {
                out.push(name);
                out.extend(initializer.as_mut());
            }
            NodeKind::Annotation { type_name } => out.push(type_name),
            NodeKind::Block { statements } => out.extend(statements.iter_mut()),
            NodeKind::ExpressionStatement { expression } => out.push(expression),
            NodeKind::ReturnStatement { expression } => out.extend(expression.as_mut()),
            NodeKind::QualifiedName { qualifier, name } => {
                out.push(qualifier);
                out.push(name);
            }
            NodeKind::FieldAccess { expression, name } => {
                out.push(expression);
                out.push(name);
            }
            NodeKind::ArrayAccess { array, index } => {
                out.push(array);
                out.push(index);
            }
            NodeKind::ArrayCreation {
                dimensions,
                initializer,
                ..
            } => {
                out.extend(dimensions.iter_mut());
                out.extend(initializer.as_mut());
            }
            NodeKind::ArrayInitializer { expressions } => out.extend(expressions.iter_mut()),
            NodeKind::Assignment { lhs, rhs, .. } => {
                out.push(lhs);
                out.push(rhs);
            }
            NodeKind::InstanceOf { expression, tested } => {
                out.push(expression);
                out.push(tested);
            }
            NodeKind::ClassInstanceCreation { arguments, .. }
            | NodeKind::FunctionInvocation { arguments, .. } => out.extend(arguments.iter_mut()),
            NodeKind::MethodInvocation {
                receiver,
                arguments,
            } => {
                out.extend(receiver.as_mut());
                out.extend(arguments.iter_mut());
            }
            NodeKind::Prefix { operand, .. } | NodeKind::Postfix { operand, .. } => {
                out.push(operand);
            }
            NodeKind::Javadoc { .. }
            | NodeKind::SimpleName { .. }
            | NodeKind::NumberLiteral { .. }
            | NodeKind::StringLiteral { .. }
            | NodeKind::NullLiteral
            | NodeKind::TypeLiteral { .. }
            | NodeKind::TypeRef => {}
        }
        out
    }

    /// The owned child list named by `slot`, if this kind has one.
    pub fn list(&self, slot: ListSlot) -> Option<&[NodeId]> {
        let list = match (self, slot) {
            (NodeKind::CompilationUnit { types, .. }, ListSlot::Types) => types,
            (
                NodeKind::PackageDeclaration { annotations, .. }
                | NodeKind::EnumDeclaration { annotations, .. }
                | NodeKind::EnumConstantDeclaration { annotations, .. }
                | NodeKind::MethodDeclaration { annotations, .. },
                ListSlot::Annotations,
            ) => annotations,
            (NodeKind::EnumDeclaration { constants, .. }, ListSlot::Constants) => constants,
            (NodeKind::EnumDeclaration { body, .. }, ListSlot::Body) => body,
            (
                NodeKind::EnumConstantDeclaration { arguments, .. }
                | NodeKind::ClassInstanceCreation { arguments, .. }
                | NodeKind::MethodInvocation { arguments, .. }
                | NodeKind::FunctionInvocation { arguments, .. },
                ListSlot::Arguments,
            ) => arguments,
            (NodeKind::MethodDeclaration { parameters, .. }, ListSlot::Parameters) => parameters,
            (NodeKind::Block { statements }, ListSlot::Statements) => statements,
            (NodeKind::ArrayCreation { dimensions, .. }, ListSlot::Dimensions) => dimensions,
            (NodeKind::ArrayInitializer { expressions }, ListSlot::Expressions) => expressions,
            _ => return None,
        };
        Some(list)
    }

    pub(crate) fn list_mut(&mut self, slot: ListSlot) -> Option<&mut Vec<NodeId>> {
        let list = match (self, slot) {
            (NodeKind::CompilationUnit { types, .. }, ListSlot::Types) => types,
            (
                NodeKind::PackageDeclaration { annotations, .. }
                | NodeKind::EnumDeclaration { annotations, .. }
                | NodeKind::EnumConstantDeclaration { annotations, .. }
                | NodeKind::MethodDeclaration { annotations, .. },
                ListSlot::Annotations,
            ) => annotations,
            (NodeKind::EnumDeclaration { constants, .. }, ListSlot::Constants) => constants,
            (NodeKind::EnumDeclaration { body, .. }, ListSlot::Body) => body,
            (
                NodeKind::EnumConstantDeclaration { arguments, .. }
                | NodeKind::ClassInstanceCreation { arguments, .. }
                | NodeKind::MethodInvocation { arguments, .. }
                | NodeKind::FunctionInvocation { arguments, .. },
                ListSlot::Arguments,
            ) => arguments,
            (NodeKind::MethodDeclaration { parameters, .. }, ListSlot::Parameters) => parameters,
            (NodeKind::Block { statements }, ListSlot::Statements) => statements,
            (NodeKind::ArrayCreation { dimensions, .. }, ListSlot::Dimensions) => dimensions,
            (NodeKind::ArrayInitializer { expressions }, ListSlot::Expressions) => expressions,
            _ => return None,
        };
        Some(list)
    }
}

#[cfg(test)]
mod tests;
