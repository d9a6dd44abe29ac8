//! Flattens associative operator chains into n-ary nodes.
//!
//! The tree builder produces binary nodes, so `a+b+c+d` arrives as a
//! left-leaning ladder of `+` nodes. This pass merges every chain of the
//! same associative operator (`+`, `*`) into a single node holding all the
//! operands as direct children, which both shortens the drawn tree and
//! exercises the layout engine's arbitrary-arity handling.
//!
//! Non-associative operators (`-`, `/`, `^`), negation and calls keep
//! their parsed shape: merging their chains would change the expression's
//! meaning.

use log::debug;

use arbor_core::tree::{ExprTree, NodeKind, TreeError};

/// Restructures `tree` in place, merging associative operator chains.
///
/// Operand order is preserved. Absorbed operator nodes stay in the arena
/// but become unreachable; tree invariants hold on return.
///
/// # Errors
///
/// Returns [`TreeError`] if re-attaching children fails, which indicates
/// the input tree was already malformed.
pub fn distribute(tree: &mut ExprTree) -> Result<(), TreeError> {
    // Reversed preorder puts every node after all of its descendants, so
    // deeper chains are already merged when their parent is processed.
    let order: Vec<_> = tree.iter().collect();

    for &node in order.iter().rev() {
        let op = match tree.kind(node) {
            NodeKind::Operator(op) => *op,
            _ => continue,
        };
        if !op.is_associative() {
            continue;
        }

        let children = tree.detach_children(node);
        let mut merged = Vec::with_capacity(children.len());
        let mut changed = false;

        for child in children {
            if *tree.kind(child) == NodeKind::Operator(op) {
                merged.extend(tree.detach_children(child));
                changed = true;
            } else {
                merged.push(child);
            }
        }

        tree.attach_children(node, &merged)?;
        if changed {
            debug!(node:% = node, arity = merged.len(); "Merged operator chain");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use arbor_core::tree::BinaryOp;
    use arbor_parser::{ValidationMode, parse};

    use super::*;

    fn distributed(source: &str) -> ExprTree {
        let mut tree = parse(source, ValidationMode::ContinueOnError).expect("valid input");
        distribute(&mut tree).expect("distribution should succeed");
        tree.validate().expect("tree must stay valid");
        tree
    }

    #[test]
    fn test_addition_chain_becomes_nary() {
        let tree = distributed("a+b+c+d");
        let root = tree.root().unwrap();

        assert_eq!(tree.kind(root), &NodeKind::Operator(BinaryOp::Add));
        let labels: Vec<String> = tree
            .children(root)
            .iter()
            .map(|&c| tree.label(c))
            .collect();
        assert_eq!(labels, vec!["a", "b", "c", "d"]);
        assert_eq!(tree.node_count(), 5);
    }

    #[test]
    fn test_long_chain_flattens_fully() {
        let tree = distributed("a+b+c+d+e+f+g+h");
        let root = tree.root().unwrap();
        assert_eq!(tree.children(root).len(), 8);
        assert_eq!(tree.node_count(), 9);
    }

    #[test]
    fn test_parenthesized_same_operator_merges() {
        // The parenthesized group is itself a `+` node, so it merges too
        let tree = distributed("a+(b+c)+d");
        let root = tree.root().unwrap();
        assert_eq!(tree.children(root).len(), 4);
    }

    #[test]
    fn test_subtraction_keeps_shape() {
        let tree = distributed("a-b-c-d");
        let root = tree.root().unwrap();

        assert_eq!(tree.kind(root), &NodeKind::Operator(BinaryOp::Sub));
        assert_eq!(tree.children(root).len(), 2);
        assert_eq!(tree.node_count(), 7);
    }

    #[test]
    fn test_division_keeps_shape() {
        let tree = distributed("a/b/c");
        let root = tree.root().unwrap();
        assert_eq!(tree.children(root).len(), 2);
    }

    #[test]
    fn test_mixed_operators_merge_per_level() {
        // `a + b*c*d + e`: one `+` node with [a, *, e]; the `*` node holds
        // [b, c, d]
        let tree = distributed("a + b*c*d + e");
        let root = tree.root().unwrap();

        let children = tree.children(root);
        assert_eq!(children.len(), 3);
        assert_eq!(tree.label(children[0]), "a");
        assert_eq!(tree.kind(children[1]), &NodeKind::Operator(BinaryOp::Mul));
        assert_eq!(tree.children(children[1]).len(), 3);
        assert_eq!(tree.label(children[2]), "e");
    }

    #[test]
    fn test_different_operators_do_not_merge() {
        // `-` under `+` must stay its own node
        let tree = distributed("a+b-c");
        let root = tree.root().unwrap();
        assert_eq!(tree.kind(root), &NodeKind::Operator(BinaryOp::Sub));
        assert_eq!(tree.children(root).len(), 2);
    }

    #[test]
    fn test_call_arguments_untouched() {
        let tree = distributed("f(a+b+c, d)");
        let root = tree.root().unwrap();

        let args = tree.children(root);
        assert_eq!(args.len(), 2);
        // The first argument flattened internally
        assert_eq!(tree.children(args[0]).len(), 3);
    }

    #[test]
    fn test_leaf_tree_is_untouched() {
        let tree = distributed("x");
        assert_eq!(tree.node_count(), 1);
    }
}
