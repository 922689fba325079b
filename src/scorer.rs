//! The scorer: one traversal from GSG to cognitive complexity.
//!
//! Dispatches purely on [`GSGNodeKind`]; adding a language means adding a
//! builder, never touching this file. Nesting is a scalar counter: every
//! containing kind increments it for its children except `Switch` (the
//! `Case` arms bump instead) and peer `ElseIf` branches (the bump happened
//! on the `If` child pass).

use crate::gsg::{GSGNode, GSGNodeKind, LineComplexity};

/// Score a function GSG node at the given starting nesting.
///
/// Returns the total plus one [`LineComplexity`] per construct that
/// contributed a non-zero cost, in pre-order. Nested `Function` nodes are
/// skipped entirely: each one is reported on its own by the engine and never
/// leaks into the enclosing function's score.
#[must_use]
pub fn score(node: &GSGNode, nesting: u32) -> (u32, Vec<LineComplexity>) {
    let mut total = 0;
    let mut lines = Vec::new();
    score_node(node, nesting, &mut total, &mut lines);
    (total, lines)
}

fn score_node(node: &GSGNode, nesting: u32, total: &mut u32, lines: &mut Vec<LineComplexity>) {
    match node.kind {
        GSGNodeKind::Function => {
            let body = decorator_factory_body(node).unwrap_or(&node.children);
            for child in body {
                if child.kind == GSGNodeKind::Function {
                    continue;
                }
                score_node(child, nesting, total, lines);
            }
        }
        GSGNodeKind::If
        | GSGNodeKind::For
        | GSGNodeKind::While
        | GSGNodeKind::DoWhile
        | GSGNodeKind::Ternary => {
            contribute(node, 1 + nesting + node.addl_cost, total, lines);
            score_children(node, nesting + 1, total, lines);
        }
        GSGNodeKind::ElseIf => {
            // No base one and no nesting bump at the branch itself; only the
            // condition's own cost.
            contribute(node, node.addl_cost, total, lines);
            score_children(node, nesting + 1, total, lines);
        }
        GSGNodeKind::Switch => {
            score_children(node, nesting, total, lines);
        }
        GSGNodeKind::Case
        | GSGNodeKind::Else
        | GSGNodeKind::Try
        | GSGNodeKind::Finally => {
            score_children(node, nesting + 1, total, lines);
        }
        GSGNodeKind::Except | GSGNodeKind::With | GSGNodeKind::Expr => {
            contribute(node, node.addl_cost, total, lines);
            score_children(node, nesting + 1, total, lines);
        }
        _ => score_children(node, nesting, total, lines),
    }
}

fn score_children(node: &GSGNode, nesting: u32, total: &mut u32, lines: &mut Vec<LineComplexity>) {
    for child in &node.children {
        // Functions nested under any construct (a lambda in a condition, a
        // def inside an if body) are reported on their own by the engine.
        if child.kind == GSGNodeKind::Function {
            continue;
        }
        score_node(child, nesting, total, lines);
    }
}

fn contribute(node: &GSGNode, amount: u32, total: &mut u32, lines: &mut Vec<LineComplexity>) {
    if amount == 0 {
        return;
    }
    *total += amount;
    lines.push(LineComplexity {
        loc: node.loc,
        contribution: amount,
    });
}

/// The strict decorator-factory shape: exactly a nested function followed by
/// a zero-cost trailing expression (`return inner`). Scoring then treats the
/// inner function's statements as the outer function's own, at the same
/// nesting.
fn decorator_factory_body(node: &GSGNode) -> Option<&Vec<GSGNode>> {
    match node.children.as_slice() {
        [inner, trailer]
            if inner.kind == GSGNodeKind::Function
                && trailer.kind == GSGNodeKind::Expr
                && trailer.addl_cost == 0 =>
        {
            Some(&inner.children)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gsg::{GSGNodeKind as K, SourceLoc};

    fn node(kind: K, addl: u32, children: Vec<GSGNode>) -> GSGNode {
        GSGNode {
            kind,
            name: String::new(),
            loc: SourceLoc::default(),
            addl_cost: addl,
            children,
        }
    }

    fn func(children: Vec<GSGNode>) -> GSGNode {
        node(K::Function, 0, children)
    }

    #[test]
    fn test_if_base_and_nesting() {
        let f = func(vec![node(K::If, 0, vec![node(K::If, 0, vec![])])]);
        let (total, lines) = score(&f, 0);
        assert_eq!(total, 3); // 1 + (1 + 1)
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].contribution, 1);
        assert_eq!(lines[1].contribution, 2);
    }

    #[test]
    fn test_condition_cost_rides_on_the_statement() {
        let f = func(vec![node(K::If, 2, vec![])]);
        assert_eq!(score(&f, 0).0, 3);
        assert_eq!(score(&f, 3).0, 6);
    }

    #[test]
    fn test_else_if_costs_only_its_condition() {
        let chain = node(
            K::If,
            0,
            vec![node(K::ElseIf, 1, vec![node(K::If, 0, vec![])])],
        );
        let (total, _) = score(&func(vec![chain]), 0);
        // if: 1, elif: 1 (condition), nested if inside the branch: 1 + 1.
        assert_eq!(total, 4);
    }

    #[test]
    fn test_else_adds_nothing_but_nests() {
        let chain = node(K::If, 0, vec![node(K::Else, 0, vec![node(K::If, 0, vec![])])]);
        let (total, lines) = score(&func(vec![chain]), 0);
        assert_eq!(total, 3); // 1 + (1 + 1)
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_switch_cases_bump_once() {
        let switch = node(
            K::Switch,
            0,
            vec![
                node(K::Case, 0, vec![node(K::If, 0, vec![])]),
                node(K::Case, 0, vec![]),
            ],
        );
        let (total, _) = score(&func(vec![switch]), 0);
        assert_eq!(total, 2); // the if sits at nesting 1
    }

    #[test]
    fn test_try_except_finally() {
        let body = vec![
            node(K::Try, 0, vec![node(K::For, 0, vec![])]),
            node(K::Except, 1, vec![]),
            node(K::Except, 1, vec![node(K::For, 0, vec![])]),
            node(K::Finally, 0, vec![node(K::If, 0, vec![])]),
        ];
        let (total, _) = score(&func(body), 0);
        // for in try: 2; two excepts: 1 + 1; for in handler: 2; if in finally: 2.
        assert_eq!(total, 8);
    }

    #[test]
    fn test_expr_and_with_only_nonzero_emit_lines() {
        let body = vec![
            node(K::Expr, 0, vec![]),
            node(K::Expr, 2, vec![]),
            node(K::With, 1, vec![]),
        ];
        let (total, lines) = score(&func(body), 0);
        assert_eq!(total, 3);
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_nested_function_excluded() {
        let inner = node(K::Function, 0, vec![node(K::For, 0, vec![])]);
        let f = func(vec![inner, node(K::If, 0, vec![])]);
        let (total, _) = score(&f, 0);
        assert_eq!(total, 1); // only the if; the inner function is reported separately
    }

    #[test]
    fn test_function_under_control_flow_excluded() {
        let lambda = node(K::Function, 0, vec![node(K::For, 0, vec![])]);
        let f = func(vec![node(K::If, 0, vec![lambda])]);
        let (total, _) = score(&f, 0);
        assert_eq!(total, 1); // the lambda body never leaks into the parent

        let in_elif = node(
            K::If,
            0,
            vec![node(
                K::ElseIf,
                0,
                vec![node(K::Function, 0, vec![node(K::While, 0, vec![])])],
            )],
        );
        let (total, _) = score(&func(vec![in_elif]), 0);
        assert_eq!(total, 1);
    }

    #[test]
    fn test_decorator_factory_flattens() {
        let inner = node(
            K::Function,
            0,
            vec![node(K::If, 0, vec![node(K::For, 0, vec![])])],
        );
        let outer = func(vec![inner, node(K::Expr, 0, vec![])]);
        let (total, _) = score(&outer, 0);
        // The inner body scores as if it were the outer's: if 1, for 2.
        assert_eq!(total, 3);
    }

    #[test]
    fn test_decorator_factory_requires_zero_cost_trailer() {
        let inner = node(K::Function, 0, vec![node(K::If, 0, vec![])]);
        let outer = func(vec![inner, node(K::Expr, 1, vec![])]);
        let (total, _) = score(&outer, 0);
        // Not the factory shape: inner is skipped, only the trailer counts.
        assert_eq!(total, 1);
    }

    #[test]
    fn test_line_sum_equals_total() {
        let body = vec![
            node(K::If, 1, vec![node(K::While, 0, vec![])]),
            node(K::Expr, 3, vec![]),
            node(K::DoWhile, 2, vec![]),
        ];
        let (total, lines) = score(&func(body), 1);
        let sum: u32 = lines.iter().map(|l| l.contribution).sum();
        assert_eq!(sum, total);
    }

    #[test]
    fn test_starting_nesting_shifts_everything() {
        let f = func(vec![node(K::For, 0, vec![])]);
        assert_eq!(score(&f, 0).0, 1);
        assert_eq!(score(&f, 1).0, 2);
        assert_eq!(score(&f, 5).0, 6);
    }
}
