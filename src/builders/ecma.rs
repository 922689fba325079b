//! JavaScript/TypeScript builder: lowers tree-sitter-javascript and
//! tree-sitter-typescript trees into GSG functions.
//!
//! Top-level functions come from `function_declaration` and from
//! `method_definition` inside class bodies; nested declarations inside a
//! body become inner `Function` nodes. Statement mapping follows the C-like
//! builder, with `switch_case`/`switch_default` arms under a `switch_body`.

use crate::adapter::SyntaxNode;
use crate::builders::{alternation_count, expr_cost, ExprVocab};
use crate::gsg::{GSGNode, GSGNodeKind};

const VOCAB: ExprVocab = ExprVocab {
    chain_kind: "binary_expression",
    not_kind: "unary_expression",
    ternary_kind: "ternary_expression",
    skip_kind: None,
};

/// Collect the function-level GSG nodes of a parsed JS/TS program.
#[must_use]
pub fn build_functions<'t, N: SyntaxNode<'t>>(root: N, source: &str) -> Vec<GSGNode> {
    let mut funcs = Vec::new();
    for child in root.named_children() {
        match child.kind() {
            "function_declaration" => funcs.push(build_function(child, source)),
            "class_declaration" => {
                if let Some(body) = child.child_by_field("body") {
                    for member in body.named_children() {
                        if member.kind() == "method_definition" {
                            funcs.push(build_function(member, source));
                        }
                    }
                }
            }
            _ => {}
        }
    }
    funcs
}

fn build_function<'t, N: SyntaxNode<'t>>(node: N, source: &str) -> GSGNode {
    let mut func = GSGNode::new(GSGNodeKind::Function, node.loc());
    func.name = function_name(node, source);
    if let Some(body) = node.child_by_field("body") {
        build_block(body, source, &mut func.children, 0);
    }
    func
}

fn function_name<'t, N: SyntaxNode<'t>>(node: N, source: &str) -> String {
    if let Some(name) = node.child_by_field("name") {
        return name.slice(source).to_string();
    }
    for child in node.named_children() {
        if matches!(child.kind(), "identifier" | "property_identifier") {
            return child.slice(source).to_string();
        }
    }
    String::new()
}

/// Lower the statements of a block (or a single unbraced statement).
fn build_body<'t, N: SyntaxNode<'t>>(
    body: N,
    source: &str,
    out: &mut Vec<GSGNode>,
    nesting: u32,
) {
    if body.kind() == "statement_block" {
        build_block(body, source, out, nesting);
    } else {
        build_stmt(body, source, out, nesting);
    }
}

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
        "if_statement" => out.push(build_if(stmt, source, nesting)),
        "while_statement" => {
            let mut node = GSGNode::new(GSGNodeKind::While, stmt.loc());
            if let Some(cond) = stmt.child_by_field("condition") {
                node.addl_cost = expr_cost(cond, 0, source, &VOCAB);
            }
            if let Some(body) = stmt.child_by_field("body") {
                build_body(body, source, &mut node.children, nesting + 1);
            }
            out.push(node);
        }
        "for_statement" | "for_in_statement" => {
            let mut node = GSGNode::new(GSGNodeKind::For, stmt.loc());
            if let Some(body) = stmt.child_by_field("body") {
                build_body(body, source, &mut node.children, nesting + 1);
            }
            out.push(node);
        }
        "do_statement" => {
            let mut node = GSGNode::new(GSGNodeKind::DoWhile, stmt.loc());
            if let Some(cond) = stmt.child_by_field("condition") {
                // Raw alternation count, not the full expression cost.
                node.addl_cost = alternation_count(cond, source, &VOCAB);
            }
            if let Some(body) = stmt.child_by_field("body") {
                build_body(body, source, &mut node.children, nesting + 1);
            }
            out.push(node);
        }
        "switch_statement" => out.push(build_switch(stmt, source, nesting)),
        "return_statement" | "throw_statement" => {
            if let Some(value) = stmt.named_child(0) {
                let cost = expr_cost(value, nesting, source, &VOCAB);
                if cost > 0 {
                    let mut node = GSGNode::new(GSGNodeKind::Expr, stmt.loc());
                    node.addl_cost = cost;
                    out.push(node);
                }
            }
        }
        "expression_statement" => {
            if let Some(expr) = stmt.named_child(0) {
                let cost = expr_cost(expr, nesting, source, &VOCAB);
                if cost > 0 {
                    let mut node = GSGNode::new(GSGNodeKind::Expr, expr.loc());
                    node.addl_cost = cost;
                    out.push(node);
                }
            }
        }
        "lexical_declaration" | "variable_declaration" => {
            let cost: u32 = stmt
                .named_children()
                .map(|decl| expr_cost(decl, nesting, source, &VOCAB))
                .sum();
            if cost > 0 {
                let mut node = GSGNode::new(GSGNodeKind::Expr, stmt.loc());
                node.addl_cost = cost;
                out.push(node);
            }
        }
        "function_declaration" | "method_definition" => {
            out.push(build_function(stmt, source));
        }
        "statement_block" => build_block(stmt, source, out, nesting),
        _ => {}
    }
}

fn build_if<'t, N: SyntaxNode<'t>>(stmt: N, source: &str, nesting: u32) -> GSGNode {
    let mut node = GSGNode::new(GSGNodeKind::If, stmt.loc());
    if let Some(cond) = stmt.child_by_field("condition") {
        node.addl_cost = expr_cost(cond, 0, source, &VOCAB);
    }
    if let Some(cons) = stmt.child_by_field("consequence") {
        build_body(cons, source, &mut node.children, nesting + 1);
    }
    if let Some(alt) = stmt.child_by_field("alternative") {
        let branch = if alt.kind() == "else_clause" {
            alt.named_child(0)
        } else {
            Some(alt)
        };
        if let Some(branch) = branch {
            node.children.push(build_else(branch, alt, source, nesting));
        }
    }
    node
}

/// `else if` (direct or wrapped in a one-statement block) normalizes to
/// `ElseIf`; anything else becomes a plain `Else`.
fn build_else<'t, N: SyntaxNode<'t>>(branch: N, clause: N, source: &str, nesting: u32) -> GSGNode {
    if branch.kind() == "if_statement" {
        let mut elif = build_if(branch, source, nesting);
        elif.kind = GSGNodeKind::ElseIf;
        return elif;
    }
    if branch.kind() == "statement_block" && branch.named_child_count() == 1 {
        if let Some(only) = branch.named_child(0) {
            if only.kind() == "if_statement" {
                let mut elif = build_if(only, source, nesting);
                elif.kind = GSGNodeKind::ElseIf;
                return elif;
            }
        }
    }
    let mut els = GSGNode::new(GSGNodeKind::Else, clause.loc());
    build_body(branch, source, &mut els.children, nesting + 1);
    els
}

fn build_switch<'t, N: SyntaxNode<'t>>(stmt: N, source: &str, nesting: u32) -> GSGNode {
    let mut switch = GSGNode::new(GSGNodeKind::Switch, stmt.loc());
    let body = stmt.child_by_field("body").unwrap_or(stmt);
    for case in body.named_children() {
        if !matches!(case.kind(), "switch_case" | "switch_default") {
            continue;
        }
        let mut case_node = GSGNode::new(GSGNodeKind::Case, case.loc());
        let value = case.child_by_field("value");
        for child in case.named_children() {
            if value.is_some_and(|v| v.same_node(&child)) {
                continue;
            }
            build_stmt(child, source, &mut case_node.children, nesting + 1);
        }
        switch.children.push(case_node);
    }
    switch
}
