//! Python builder: lowers a tree-sitter-python tree into GSG functions.
//!
//! Functions are discovered at module level, one level deep inside class
//! bodies, and under `decorated_definition` wrappers. Inside a body the
//! builder maps control flow statement by statement; `match` arms become
//! bare `Case` nodes (Python never emits `Switch`), `try` wraps its body in
//! a `Try` node with `Except`/`Else`/`Finally` siblings.
//!
//! The `nesting` parameter threads the structural depth the scorer will
//! assign, so ternary expression costs (`1 + nesting`) are priced where the
//! construct will actually sit.

use crate::adapter::SyntaxNode;
use crate::builders::{expr_cost, ExprVocab};
use crate::gsg::{GSGNode, GSGNodeKind};

const VOCAB: ExprVocab = ExprVocab {
    chain_kind: "boolean_operator",
    not_kind: "not_operator",
    ternary_kind: "conditional_expression",
    skip_kind: None,
};

/// Collect the function-level GSG nodes of a parsed Python module.
#[must_use]
pub fn build_functions<'t, N: SyntaxNode<'t>>(root: N, source: &str) -> Vec<GSGNode> {
    let mut funcs = Vec::new();
    for child in root.named_children() {
        match child.kind() {
            "function_definition" => funcs.push(build_function(child, source)),
            "decorated_definition" => {
                if let Some(def) = child.child_by_field("definition") {
                    match def.kind() {
                        "function_definition" => funcs.push(build_function(def, source)),
                        "class_definition" => collect_class_methods(def, source, &mut funcs),
                        _ => {}
                    }
                }
            }
            "class_definition" => collect_class_methods(child, source, &mut funcs),
            _ => {}
        }
    }
    funcs
}

/// Methods one level deep inside a class body, decorated or not.
fn collect_class_methods<'t, N: SyntaxNode<'t>>(
    class: N,
    source: &str,
    out: &mut Vec<GSGNode>,
) {
    let Some(body) = class.child_by_field("body") else {
        return;
    };
    for member in body.named_children() {
        match member.kind() {
            "function_definition" => out.push(build_function(member, source)),
            "decorated_definition" => {
                if let Some(def) = member.child_by_field("definition") {
                    if def.kind() == "function_definition" {
                        out.push(build_function(def, source));
                    }
                }
            }
            _ => {}
        }
    }
}

fn build_function<'t, N: SyntaxNode<'t>>(node: N, source: &str) -> GSGNode {
    let mut func = GSGNode::new(GSGNodeKind::Function, node.loc());
    if let Some(name) = node.child_by_field("name") {
        func.name = name.slice(source).to_string();
    }
    if let Some(body) = node.child_by_field("body") {
        build_block(body, source, &mut func.children, 0);
    }
    func
}

/// Map every statement of `block` into `out`.
fn build_block<'t, N: SyntaxNode<'t>>(
    block: N,
    source: &str,
    out: &mut Vec<GSGNode>,
    nesting: u32,
) {
    for stmt in block.named_children() {
        build_stmt(stmt, source, out, nesting);
    }
}

fn build_stmt<'t, N: SyntaxNode<'t>>(
    stmt: N,
    source: &str,
    out: &mut Vec<GSGNode>,
    nesting: u32,
) {
    match stmt.kind() {
        "for_statement" => {
            let mut node = GSGNode::new(GSGNodeKind::For, stmt.loc());
            if let Some(body) = stmt.child_by_field("body") {
                build_block(body, source, &mut node.children, nesting + 1);
            }
            out.push(node);
        }
        "while_statement" => {
            let mut node = GSGNode::new(GSGNodeKind::While, stmt.loc());
            if let Some(cond) = stmt.child_by_field("condition") {
                node.addl_cost = expr_cost(cond, nesting, source, &VOCAB);
            }
            if let Some(body) = stmt.child_by_field("body") {
                build_block(body, source, &mut node.children, nesting + 1);
            }
            out.push(node);
        }
        "if_statement" => out.push(build_if(stmt, source, nesting)),
        "match_statement" => build_match(stmt, source, out, nesting),
        "try_statement" => build_try(stmt, source, out, nesting),
        "with_statement" => {
            let mut node = GSGNode::new(GSGNodeKind::With, stmt.loc());
            // The body block is a named child too; its expression costs ride
            // on the With node as well as on its own Expr children.
            for child in stmt.named_children() {
                node.addl_cost += expr_cost(child, nesting, source, &VOCAB);
            }
            if let Some(body) = stmt.child_by_field("body") {
                build_block(body, source, &mut node.children, nesting + 1);
            }
            out.push(node);
        }
        "return_statement" => {
            // Always emitted, even at zero cost: the trailing `return inner`
            // of a decorator factory is recognized by its zero-cost Expr.
            let mut node = GSGNode::new(GSGNodeKind::Expr, stmt.loc());
            if let Some(value) = stmt.named_child(0) {
                node.addl_cost = expr_cost(value, nesting, source, &VOCAB);
            }
            out.push(node);
        }
        "raise_statement" | "assert_statement" => {
            let mut node = GSGNode::new(GSGNodeKind::Expr, stmt.loc());
            for child in stmt.named_children() {
                node.addl_cost += expr_cost(child, nesting, source, &VOCAB);
            }
            out.push(node);
        }
        "expression_statement" => {
            for sub in stmt.named_children() {
                let cost = match sub.kind() {
                    "assignment" | "augmented_assignment" => sub
                        .child_by_field("right")
                        .map_or_else(|| expr_cost(sub, nesting, source, &VOCAB), |rhs| {
                            expr_cost(rhs, nesting, source, &VOCAB)
                        }),
                    "conditional_expression" => expr_cost(sub, nesting, source, &VOCAB),
                    _ => 0,
                };
                if cost > 0 {
                    let mut node = GSGNode::new(GSGNodeKind::Expr, sub.loc());
                    node.addl_cost = cost;
                    out.push(node);
                }
            }
        }
        "function_definition" => out.push(build_function(stmt, source)),
        "decorated_definition" => {
            if let Some(def) = stmt.child_by_field("definition") {
                if def.kind() == "function_definition" {
                    out.push(build_function(def, source));
                }
            }
        }
        _ => {}
    }
}

fn build_if<'t, N: SyntaxNode<'t>>(stmt: N, source: &str, nesting: u32) -> GSGNode {
    let mut node = GSGNode::new(GSGNodeKind::If, stmt.loc());
    if let Some(cond) = stmt.child_by_field("condition") {
        node.addl_cost = expr_cost(cond, nesting, source, &VOCAB);
    }
    if let Some(cons) = stmt.child_by_field("consequence") {
        build_block(cons, source, &mut node.children, nesting + 1);
    }

    // Any number of elif clauses, then an optional trailing else.
    for child in stmt.named_children() {
        match child.kind() {
            "elif_clause" => {
                let mut elif = GSGNode::new(GSGNodeKind::ElseIf, child.loc());
                if let Some(cond) = child.child_by_field("condition") {
                    elif.addl_cost = expr_cost(cond, nesting, source, &VOCAB);
                }
                if let Some(body) = child.child_by_field("consequence") {
                    build_block(body, source, &mut elif.children, nesting + 1);
                }
                node.children.push(elif);
            }
            "else_clause" => {
                let mut els = GSGNode::new(GSGNodeKind::Else, child.loc());
                if let Some(body) = child.child_by_field("body") {
                    build_block(body, source, &mut els.children, nesting + 1);
                }
                node.children.push(els);
            }
            _ => {}
        }
    }
    node
}

/// `match` carries no base cost; each arm becomes a `Case` node so its body
/// nests one level deeper while the arm itself contributes nothing.
fn build_match<'t, N: SyntaxNode<'t>>(
    stmt: N,
    source: &str,
    out: &mut Vec<GSGNode>,
    nesting: u32,
) {
    let arms = stmt.child_by_field("body").unwrap_or(stmt);
    for arm in arms.named_children() {
        if arm.kind() != "case_clause" {
            continue;
        }
        let mut case = GSGNode::new(GSGNodeKind::Case, arm.loc());
        if let Some(body) = clause_body(arm) {
            build_block(body, source, &mut case.children, nesting + 1);
        }
        out.push(case);
    }
}

fn build_try<'t, N: SyntaxNode<'t>>(stmt: N, source: &str, out: &mut Vec<GSGNode>, nesting: u32) {
    let mut try_node = GSGNode::new(GSGNodeKind::Try, stmt.loc());
    if let Some(body) = stmt.child_by_field("body") {
        build_block(body, source, &mut try_node.children, nesting + 1);
    }
    out.push(try_node);

    for child in stmt.named_children() {
        match child.kind() {
            "except_clause" | "except_group_clause" => {
                let mut except = GSGNode::new(GSGNodeKind::Except, child.loc());
                except.addl_cost = 1;
                if let Some(body) = clause_body(child) {
                    build_block(body, source, &mut except.children, nesting + 1);
                }
                out.push(except);
            }
            "else_clause" => {
                let mut els = GSGNode::new(GSGNodeKind::Else, child.loc());
                if let Some(body) = clause_body(child) {
                    build_block(body, source, &mut els.children, nesting + 1);
                }
                out.push(els);
            }
            "finally_clause" => {
                let mut fin = GSGNode::new(GSGNodeKind::Finally, child.loc());
                if let Some(body) = clause_body(child) {
                    build_block(body, source, &mut fin.children, nesting + 1);
                }
                out.push(fin);
            }
            _ => {}
        }
    }
}

/// Body of an except/else/finally/case clause. Some grammar versions expose
/// it as a field, others leave the block as the trailing named sibling.
fn clause_body<'t, N: SyntaxNode<'t>>(clause: N) -> Option<N> {
    clause
        .child_by_field("body")
        .or_else(|| clause.child_by_field("consequence"))
        .or_else(|| {
            let mut last_block = None;
            for child in clause.named_children() {
                if child.kind() == "block" {
                    last_block = Some(child);
                }
            }
            last_block
        })
}
