//! Pass engine.

use tx_ir::{NodeId, Tree};

use crate::LoweringViolation;

/// A rewrite pass over one compilation unit.
pub trait TranslationPass {
    /// Name used in tracing spans.
    fn name(&self) -> &'static str;

    /// Rewrite the tree under `root`. Returns the root afterwards, which is
    /// a new node if the pass replaced the root itself.
    fn run(&mut self, tree: &mut Tree, root: NodeId) -> Result<NodeId, LoweringViolation>;
}

/// Run `passes` in order, stopping at the first violation.
///
/// Parent links are validated after every pass in debug builds.
pub fn run_passes(
    tree: &mut Tree,
    mut root: NodeId,
    passes: &mut [&mut dyn TranslationPass],
) -> Result<NodeId, LoweringViolation> {
    for pass in passes.iter_mut() {
        let span = tracing::debug_span!("pass", name = pass.name());
        let _enter = span.enter();
        let before = tree.len();
        root = pass.run(tree, root)?;
        tracing::debug!(allocated = tree.len() - before, "pass finished");
        tree.validate_parents(root);
    }
    Ok(root)
}
