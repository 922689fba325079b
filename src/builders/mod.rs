//! Language builders: concrete syntax tree -> General Syntax Graph.
//!
//! One builder per grammar family (Python, C-like, ECMAScript-like). Builders
//! never fail: malformed trees are tolerated and unknown constructs are
//! skipped with zero contribution.
//!
//! The expression-cost algorithm is shared across builders and parameterized
//! by each grammar's token vocabulary (see [`ExprVocab`]): a chain of like
//! logical operators costs one, switching between `and` and `or` inside a
//! chain adds one per switch, a negation costs one, a ternary costs one plus
//! the current nesting.

pub mod clike;
pub mod ecma;
pub mod python;

use crate::adapter::SyntaxNode;
use crate::gsg::{GSGNode, Language};

/// Build the function-level GSG nodes found under `root`.
///
/// Returns an empty list for [`Language::Unknown`].
#[must_use]
pub fn build_functions<'t, N: SyntaxNode<'t>>(
    language: Language,
    root: N,
    source: &str,
) -> Vec<GSGNode> {
    match language {
        Language::Python => python::build_functions(root, source),
        Language::C | Language::Cpp => clike::build_functions(root, source),
        Language::JavaScript | Language::TypeScript => ecma::build_functions(root, source),
        Language::Unknown => Vec::new(),
    }
}

// =============================================================================
// EXPRESSION COSTS (shared)
// =============================================================================

/// Grammar vocabulary for the expression-cost walk.
pub(crate) struct ExprVocab {
    /// Kind of a binary logical chain node (`boolean_operator`,
    /// `binary_expression`).
    pub chain_kind: &'static str,
    /// Kind of a unary negation node (`not_operator`, `unary_expression`).
    pub not_kind: &'static str,
    /// Kind of a conditional/ternary expression.
    pub ternary_kind: &'static str,
    /// Subtree kind the cost walk must not enter. C++ lambdas become their
    /// own GSG functions, so their interior is priced there, not in the
    /// enclosing expression.
    pub skip_kind: Option<&'static str>,
}

/// Logical operator of a chain node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BoolOp {
    And,
    Or,
}

/// Strip redundant parentheses; all three grammars use the same kind name.
pub(crate) fn unwrap_parens<'t, N: SyntaxNode<'t>>(mut node: N) -> N {
    while node.kind() == "parenthesized_expression" {
        match node.named_child(0) {
            Some(inner) => node = inner,
            None => break,
        }
    }
    node
}

/// Classify a node as the head of a logical chain, by its operator token.
pub(crate) fn chain_op<'t, N: SyntaxNode<'t>>(
    node: N,
    source: &str,
    vocab: &ExprVocab,
) -> Option<BoolOp> {
    if node.kind() != vocab.chain_kind {
        return None;
    }
    match node.child_by_field("operator")?.slice(source) {
        "&&" | "and" => Some(BoolOp::And),
        "||" | "or" => Some(BoolOp::Or),
        _ => None,
    }
}

/// True for `!x` / `not x`. Python's `not_operator` carries no operator
/// field; the C-like and ECMA `unary_expression` kinds do and must be
/// filtered (they also cover `-x`, `~x`).
pub(crate) fn is_negation<'t, N: SyntaxNode<'t>>(node: N, source: &str, vocab: &ExprVocab) -> bool {
    if node.kind() != vocab.not_kind {
        return false;
    }
    match node.child_by_field("operator") {
        Some(op) => matches!(op.slice(source), "!" | "not"),
        None => true,
    }
}

/// Cost of an expression: logical chains, alternations, negations and
/// ternaries, summed over the whole subtree.
///
/// A chain of like operators counts once no matter its length; an operand
/// whose own top-level operator differs from its parent's adds one
/// alternation (the second sequence). Negation never alternates.
pub(crate) fn expr_cost<'t, N: SyntaxNode<'t>>(
    node: N,
    nesting: u32,
    source: &str,
    vocab: &ExprVocab,
) -> u32 {
    let node = unwrap_parens(node);

    if vocab.skip_kind == Some(node.kind()) {
        return 0;
    }

    if let Some(op) = chain_op(node, source, vocab) {
        return 1 + chain_cost(node, op, nesting, source, vocab);
    }

    if is_negation(node, source, vocab) {
        let operand = node
            .child_by_field("argument")
            .map(|a| expr_cost(a, nesting, source, vocab))
            .unwrap_or(0);
        return 1 + operand;
    }

    if node.kind() == vocab.ternary_kind {
        let mut cost = 1 + nesting;
        for child in node.named_children() {
            cost += expr_cost(child, nesting, source, vocab);
        }
        return cost;
    }

    node.named_children()
        .map(|child| expr_cost(child, nesting, source, vocab))
        .sum()
}

/// Alternations plus leaf costs inside a chain whose head already paid the
/// base one.
fn chain_cost<'t, N: SyntaxNode<'t>>(
    node: N,
    op: BoolOp,
    nesting: u32,
    source: &str,
    vocab: &ExprVocab,
) -> u32 {
    let mut cost = 0;
    for field in ["left", "right"] {
        let Some(operand) = node.child_by_field(field) else {
            continue;
        };
        let operand = unwrap_parens(operand);
        match chain_op(operand, source, vocab) {
            Some(inner) => {
                if inner != op {
                    cost += 1;
                }
                cost += chain_cost(operand, inner, nesting, source, vocab);
            }
            None => cost += expr_cost(operand, nesting, source, vocab),
        }
    }
    cost
}

/// Raw And/Or alternation count of a condition, without the chain base or
/// leaf costs. The ECMA do-while condition uses this instead of the full
/// expression cost.
pub(crate) fn alternation_count<'t, N: SyntaxNode<'t>>(
    node: N,
    source: &str,
    vocab: &ExprVocab,
) -> u32 {
    let node = unwrap_parens(node);
    match chain_op(node, source, vocab) {
        Some(op) => chain_alternations(node, op, source, vocab),
        None => 0,
    }
}

fn chain_alternations<'t, N: SyntaxNode<'t>>(
    node: N,
    op: BoolOp,
    source: &str,
    vocab: &ExprVocab,
) -> u32 {
    let mut alts = 0;
    for field in ["left", "right"] {
        let Some(operand) = node.child_by_field(field) else {
            continue;
        };
        let operand = unwrap_parens(operand);
        if let Some(inner) = chain_op(operand, source, vocab) {
            if inner != op {
                alts += 1;
            }
            alts += chain_alternations(operand, inner, source, vocab);
        }
    }
    alts
}
