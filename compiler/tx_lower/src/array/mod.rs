//! Array lowering.
//!
//! Replaces array constructs with calls against the runtime array classes:
//! - creation becomes a static factory on `IOS<Kind>Array`/`IOSObjectArray`
//!   (`arrayWithInts:count:`, `newArrayWithLength:type:`,
//!   `arrayWithDimensions:lengths:`)
//! - element reads become `<Class>_Get(array, index)`; assignable elements
//!   become `*<Class>_GetRef(array, index)`
//! - plain assignment to an object array element becomes
//!   `IOSObjectArray_Set` or, when the value can be produced retained,
//!   `IOSObjectArray_SetAndConsume`
//! - `array.length` becomes the runtime `size` field
//! - `x instanceof T[]` over object components becomes
//!   `[IOSClass isInstance:x]` on the array's class literal
//!
//! Object array assignment is rewritten in the pre-visit, before its right
//! side is lowered: a right-side creation must see the retain request before
//! its own post-visit picks a selector. The replacement is traversed at once
//! and the original assignment's subtree is skipped.

use tx_ir::{
    accept, AssignOp, ElementId, FunctionRef, ListSlot, NodeId, NodeKind, NodeTag, PrefixOp,
    Tree, TreeVisitor, TypeId,
};
use tx_types::Modifiers;

use crate::{
    is_assigned, retain_result, LoweringViolation, TranslateOptions, TranslationPass, TypeEnv,
};

/// Lowers array creation, access, assignment, `.length` and `instanceof`.
pub struct ArrayRewriter<'e, 'a> {
    env: &'e mut TypeEnv<'a>,
    options: &'e TranslateOptions,
    root: NodeId,
    error: Option<LoweringViolation>,
}

impl<'e, 'a> ArrayRewriter<'e, 'a> {
    pub fn new(env: &'e mut TypeEnv<'a>, options: &'e TranslateOptions) -> Self {
        Self {
            env,
            options,
            root: NodeId::new(0),
            error: None,
        }
    }

    fn replace(&mut self, tree: &mut Tree, old: NodeId, new: NodeId) {
        tree.replace_with(old, new);
        if old == self.root {
            self.root = new;
        }
    }

    fn fail(&mut self, err: LoweringViolation) {
        tracing::error!(%err, "array lowering aborted");
        if self.error.is_none() {
            self.error = Some(err);
        }
    }

    fn node_type(tree: &Tree, node: NodeId) -> Result<TypeId, LoweringViolation> {
        tree.ty(node).ok_or(LoweringViolation::MissingType {
            node,
            tag: tree.tag(node),
        })
    }

    fn component_of(&self, node: NodeId, array: TypeId) -> Result<TypeId, LoweringViolation> {
        let cache = self.env.cache();
        cache
            .component_type(array)
            .ok_or_else(|| LoweringViolation::NotAnArray {
                node,
                ty: cache.type_display(array),
            })
    }

    fn is_primitive(&self, ty: TypeId) -> bool {
        self.env.cache().is_primitive(ty)
    }

    /// Name node referring to a runtime class, used as a static receiver.
    fn class_name(&mut self, tree: &mut Tree, class: ElementId) -> NodeId {
        let identifier = self.env.cache().element(class).name;
        let ty = self.env.class_type(class);
        tree.simple_name(identifier, Some(class), Some(ty))
    }

    /// Reflected class object of `ty`, typed as `IOSClass`.
    fn type_literal(&mut self, tree: &mut Tree, ty: TypeId) -> NodeId {
        let class_ty = self.env.ios_class_type();
        tree.alloc(NodeKind::TypeLiteral { literal: ty }, Some(class_ty), None)
    }

    fn static_invocation(
        &mut self,
        tree: &mut Tree,
        method: ElementId,
        class: ElementId,
        ty: TypeId,
        arguments: Vec<NodeId>,
    ) -> NodeId {
        let receiver = self.class_name(tree, class);
        tree.alloc(
            NodeKind::MethodInvocation {
                receiver: Some(receiver),
                arguments,
            },
            Some(ty),
            Some(method),
        )
    }

    // --- Creation ---

    fn rewrite_creation(&mut self, tree: &mut Tree, node: NodeId) -> Result<(), LoweringViolation> {
        let NodeKind::ArrayCreation {
            dimensions,
            initializer,
            retained_result,
        } = tree.kind(node).clone()
        else {
            return Ok(());
        };
        let array_type = Self::node_type(tree, node)?;
        let retained = retained_result || self.options.use_arc();

        let invocation = if let Some(initializer) = initializer {
            let elements = tree.list(initializer, ListSlot::Expressions).to_vec();
            self.new_initialized_array(tree, node, array_type, &elements, retained)?
        } else {
            match dimensions.as_slice() {
                [] => {
                    return Err(LoweringViolation::MissingOperand {
                        node,
                        tag: NodeTag::ArrayCreation,
                        operand: "dimensions or initializer",
                    })
                }
                [length] => {
                    self.new_single_dimension_array(tree, node, array_type, *length, retained)?
                }
                _ => {
                    self.new_multi_dimension_array(tree, node, array_type, &dimensions, retained)?
                }
            }
        };
        self.replace(tree, node, invocation);
        Ok(())
    }

    fn new_initialized_array(
        &mut self,
        tree: &mut Tree,
        node: NodeId,
        array_type: TypeId,
        elements: &[NodeId],
        retained: bool,
    ) -> Result<NodeId, LoweringViolation> {
        let component = self.component_of(node, array_type)?;
        let primitive = self.is_primitive(component);
        let class = self.env.resolve_array_type(component);
        let category = if primitive {
            self.env.cache().try_category_name(component)?
        } else {
            "Objects"
        };
        let selector = format!(
            "{}With{category}:count:{}",
            creation_prefix(retained),
            type_suffix(primitive)
        );

        let values = self.env.pointer_type(component);
        let int = self.env.int_type();
        let mut params = vec![("values", values), ("count", int)];
        if !primitive {
            params.push(("type", self.env.ios_class_type()));
        }
        let class_ty = self.env.class_type(class);
        let method = self
            .env
            .runtime_method(class, &selector, class_ty, public_static(), &params);

        let copies = elements.iter().map(|&e| tree.deep_copy(e)).collect();
        let values = tree.alloc(
            NodeKind::ArrayInitializer {
                expressions: copies,
            },
            Some(array_type),
            None,
        );
        let count = tree.number_literal(count_of(elements.len()), int);
        let mut arguments = vec![values, count];
        if !primitive {
            arguments.push(self.type_literal(tree, component));
        }
        tracing::debug!(?node, %selector, "lowered initialized array creation");
        Ok(self.static_invocation(tree, method, class, array_type, arguments))
    }

    fn new_single_dimension_array(
        &mut self,
        tree: &mut Tree,
        node: NodeId,
        array_type: TypeId,
        length: NodeId,
        retained: bool,
    ) -> Result<NodeId, LoweringViolation> {
        let component = self.component_of(node, array_type)?;
        let primitive = self.is_primitive(component);
        let class = self.env.resolve_array_type(component);
        let selector = format!("{}WithLength:{}", creation_prefix(retained), type_suffix(primitive));

        let int = self.env.int_type();
        let mut params = vec![("length", int)];
        if !primitive {
            params.push(("type", self.env.ios_class_type()));
        }
        let class_ty = self.env.class_type(class);
        let method = self
            .env
            .runtime_method(class, &selector, class_ty, public_static(), &params);

        let mut arguments = vec![tree.deep_copy(length)];
        if !primitive {
            arguments.push(self.type_literal(tree, component));
        }
        tracing::debug!(?node, %selector, "lowered array creation");
        Ok(self.static_invocation(tree, method, class, array_type, arguments))
    }

    fn new_multi_dimension_array(
        &mut self,
        tree: &mut Tree,
        node: NodeId,
        array_type: TypeId,
        dimensions: &[NodeId],
        retained: bool,
    ) -> Result<NodeId, LoweringViolation> {
        let mut component = array_type;
        for _ in dimensions {
            component = self.env.cache().component_type(component).ok_or_else(|| {
                LoweringViolation::DimensionMismatch {
                    node,
                    dimensions: dimensions.len(),
                    ty: self.env.cache().type_display(array_type),
                }
            })?;
        }
        let primitive = self.is_primitive(component);
        let class = self.env.resolve_array_type(component);
        let selector = format!(
            "{}WithDimensions:lengths:{}",
            creation_prefix(retained),
            type_suffix(primitive)
        );

        let int = self.env.int_type();
        let lengths = self.env.pointer_type(int);
        let mut params = vec![("dimensions", int), ("dimensionLengths", lengths)];
        if !primitive {
            params.push(("type", self.env.ios_class_type()));
        }
        let object_array_ty = self.env.class_type(self.env.object_array_element());
        let method = self
            .env
            .runtime_method(class, &selector, object_array_ty, public_static(), &params);

        let count = tree.number_literal(count_of(dimensions.len()), int);
        let int_array = self.env.array_type(int);
        let copies = dimensions.iter().map(|&d| tree.deep_copy(d)).collect();
        let lengths = tree.alloc(
            NodeKind::ArrayInitializer {
                expressions: copies,
            },
            Some(int_array),
            None,
        );
        let mut arguments = vec![count, lengths];
        if !primitive {
            arguments.push(self.type_literal(tree, component));
        }
        tracing::debug!(?node, %selector, "lowered multi-dimensional array creation");
        Ok(self.static_invocation(tree, method, class, array_type, arguments))
    }

    // --- Element access ---

    fn rewrite_access(&mut self, tree: &mut Tree, node: NodeId) -> Result<(), LoweringViolation> {
        let NodeKind::ArrayAccess { array, index } = *tree.kind(node) else {
            return Ok(());
        };
        let component = Self::node_type(tree, node)?;
        let class = self.env.resolve_array_type(component);
        let assignable = is_assigned(tree, node);

        let mut name = format!("{}_Get", self.env.cache().element_name(class));
        let (return_type, declared_return) = if assignable {
            name.push_str("Ref");
            let pointer = self.env.pointer_type(component);
            (pointer, pointer)
        } else if self.is_primitive(component) {
            (component, component)
        } else {
            (component, self.env.id_type())
        };
        let class_ty = self.env.class_type(class);
        let int = self.env.int_type();
        let function = FunctionRef::new(self.env.cache().intern_name(&name), declared_return, class)
            .with_params([class_ty, int]);

        let arguments = vec![tree.deep_copy(array), tree.deep_copy(index)];
        let invocation = tree.alloc(
            NodeKind::FunctionInvocation {
                function,
                arguments,
                retained_result: false,
            },
            Some(return_type),
            None,
        );
        let replacement = if assignable {
            tree.alloc(
                NodeKind::Prefix {
                    op: PrefixOp::Dereference,
                    operand: invocation,
                },
                Some(component),
                None,
            )
        } else {
            invocation
        };
        tracing::debug!(?node, function = %name, "lowered array access");
        self.replace(tree, node, replacement);
        Ok(())
    }

    // --- Assignment ---

    /// Returns whether the traversal should descend into the assignment.
    fn visit_assignment(&mut self, tree: &mut Tree, node: NodeId) -> Result<bool, LoweringViolation> {
        let NodeKind::Assignment { op, lhs, rhs } = *tree.kind(node) else {
            return Ok(true);
        };
        let NodeKind::ArrayAccess { array, index } = *tree.kind(lhs) else {
            return Ok(true);
        };
        let component = Self::node_type(tree, lhs)?;
        if self.is_primitive(component) {
            return Ok(true);
        }
        if op != AssignOp::Assign {
            // The element is reached through `*IOSObjectArray_GetRef`.
            tracing::trace!(?node, ?op, "compound object array assignment left as is");
            return Ok(true);
        }

        let value = tree.take(rhs);
        let (name, value) = match retain_result(tree, value) {
            Some(retained) => ("IOSObjectArray_SetAndConsume", retained),
            None => ("IOSObjectArray_Set", value),
        };
        let object_array = self.env.object_array_element();
        let object_array_ty = self.env.class_type(object_array);
        let id = self.env.id_type();
        let int = self.env.int_type();
        let function = FunctionRef::new(self.env.cache().intern_name(name), id, object_array)
            .with_params([object_array_ty, int, id]);
        let arguments = vec![tree.take(array), tree.take(index), value];
        let invocation = tree.alloc(
            NodeKind::FunctionInvocation {
                function,
                arguments,
                retained_result: false,
            },
            Some(component),
            None,
        );
        tracing::debug!(?node, function = name, "lowered object array assignment");
        self.replace(tree, node, invocation);
        accept(tree, invocation, self);
        Ok(false)
    }

    // --- `.length` ---

    fn rewrite_length(&mut self, tree: &mut Tree, node: NodeId) -> Result<(), LoweringViolation> {
        let (name, expression) = match *tree.kind(node) {
            NodeKind::FieldAccess { expression, name } => (name, expression),
            NodeKind::QualifiedName { qualifier, name } => (name, qualifier),
            _ => return Ok(()),
        };
        let NodeKind::SimpleName { identifier } = *tree.kind(name) else {
            return Ok(());
        };
        if self.env.cache().name_str(identifier) != "length" {
            return Ok(());
        }
        let Some(component) = tree
            .ty(expression)
            .and_then(|ty| self.env.cache().component_type(ty))
        else {
            return Ok(());
        };

        let class = self.env.resolve_array_type(component);
        let field = self.env.size_field(class);
        let int = self.env.int_type();
        let identifier = self.env.cache().element(field).name;
        let expression = tree.take(expression);
        let name = tree.simple_name(identifier, Some(field), Some(int));
        let access = tree.alloc(NodeKind::FieldAccess { expression, name }, Some(int), Some(field));
        tracing::debug!(?node, "lowered array length");
        self.replace(tree, node, access);
        Ok(())
    }

    // --- instanceof ---

    fn rewrite_instance_of(&mut self, tree: &mut Tree, node: NodeId) -> Result<(), LoweringViolation> {
        let NodeKind::InstanceOf { expression, tested } = *tree.kind(node) else {
            return Ok(());
        };
        let tested_ty = Self::node_type(tree, tested)?;
        match self.env.cache().component_type(tested_ty) {
            Some(component) if !self.is_primitive(component) => {}
            _ => return Ok(()),
        }

        let ios_class = self.env.ios_class_element();
        let boolean = self.env.boolean_type();
        let id = self.env.id_type();
        let method = self
            .env
            .runtime_method(ios_class, "isInstance", boolean, Modifiers::PUBLIC, &[("object", id)]);
        let receiver = self.type_literal(tree, tested_ty);
        let object = tree.take(expression);
        let invocation = tree.alloc(
            NodeKind::MethodInvocation {
                receiver: Some(receiver),
                arguments: vec![object],
            },
            Some(boolean),
            Some(method),
        );
        tracing::debug!(?node, "lowered array instanceof");
        self.replace(tree, node, invocation);
        Ok(())
    }
}

impl TreeVisitor for ArrayRewriter<'_, '_> {
    fn visit(&mut self, tree: &mut Tree, node: NodeId, tag: NodeTag) -> bool {
        if self.error.is_some() {
            return false;
        }
        if tag != NodeTag::Assignment {
            return true;
        }
        match self.visit_assignment(tree, node) {
            Ok(descend) => descend,
            Err(err) => {
                self.fail(err);
                false
            }
        }
    }

    fn end_visit(&mut self, tree: &mut Tree, node: NodeId, tag: NodeTag) {
        if self.error.is_some() {
            return;
        }
        let result = match tag {
            NodeTag::ArrayCreation => self.rewrite_creation(tree, node),
            NodeTag::ArrayAccess => self.rewrite_access(tree, node),
            NodeTag::FieldAccess | NodeTag::QualifiedName => self.rewrite_length(tree, node),
            NodeTag::InstanceOf => self.rewrite_instance_of(tree, node),
            _ => Ok(()),
        };
        if let Err(err) = result {
            self.fail(err);
        }
    }
}

impl TranslationPass for ArrayRewriter<'_, '_> {
    fn name(&self) -> &'static str {
        "array_rewriter"
    }

    fn run(&mut self, tree: &mut Tree, root: NodeId) -> Result<NodeId, LoweringViolation> {
        self.root = root;
        self.error = None;
        accept(tree, root, self);
        match self.error.take() {
            Some(err) => Err(err),
            None => Ok(self.root),
        }
    }
}

/// `newArray` for retained (+1) results, `array` for autoreleased ones.
fn creation_prefix(retained: bool) -> &'static str {
    if retained {
        "newArray"
    } else {
        "array"
    }
}

/// Object arrays take their element class as a trailing `type:` argument.
fn type_suffix(primitive: bool) -> &'static str {
    if primitive {
        ""
    } else {
        "type:"
    }
}

fn public_static() -> Modifiers {
    Modifiers::PUBLIC | Modifiers::STATIC
}

fn count_of(len: usize) -> i64 {
    i64::try_from(len).unwrap_or(i64::MAX)
}
