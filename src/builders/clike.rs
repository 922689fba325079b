//! C/C++ builder: lowers tree-sitter-c / tree-sitter-cpp trees into GSG
//! functions.
//!
//! Function discovery recurses through classes, structs, unions, namespaces
//! and template declarations, accumulating qualified names as
//! `outer::inner::name`. Lambda expressions anywhere inside a body become
//! their own `Function` nodes named `lambda@<row>:<col>`.
//!
//! Function names are extracted textually from the declarator (substring up
//! to the first `(`, stripped of leading `*`, `&` and `(`), which keeps
//! out-of-class qualifiers and operator names like `operator<<` intact; the
//! first identifier under the declarator is the fallback.

use crate::adapter::SyntaxNode;
use crate::builders::{expr_cost, ExprVocab};
use crate::gsg::{GSGNode, GSGNodeKind};

const VOCAB: ExprVocab = ExprVocab {
    chain_kind: "binary_expression",
    not_kind: "unary_expression",
    ternary_kind: "conditional_expression",
    skip_kind: Some("lambda_expression"),
};

/// Statement kinds whose bodies are lowered by their own builder; the lambda
/// scan stops at them so each lambda is collected exactly once.
const CONTROL_KINDS: &[&str] = &[
    "if_statement",
    "while_statement",
    "for_statement",
    "for_range_loop",
    "do_statement",
    "switch_statement",
    "case_statement",
    "compound_statement",
];

/// Collect the function-level GSG nodes of a parsed C or C++ translation
/// unit.
#[must_use]
pub fn build_functions<'t, N: SyntaxNode<'t>>(root: N, source: &str) -> Vec<GSGNode> {
    let mut funcs = Vec::new();
    collect_scope(root, source, "", &mut funcs);
    funcs
}

/// Walk a declaration scope, entering named sub-scopes and picking up
/// function definitions.
fn collect_scope<'t, N: SyntaxNode<'t>>(
    scope: N,
    source: &str,
    qual: &str,
    out: &mut Vec<GSGNode>,
) {
    for child in scope.named_children() {
        collect_decl(child, source, qual, out);
    }
}

fn collect_decl<'t, N: SyntaxNode<'t>>(node: N, source: &str, qual: &str, out: &mut Vec<GSGNode>) {
    match node.kind() {
        "function_definition" => out.push(build_function(node, source, qual)),
        "template_declaration" => {
            // Templated functions, classes and nested templates all sit as
            // direct children of the declaration.
            for inner in node.named_children() {
                collect_decl(inner, source, qual, out);
            }
        }
        "class_specifier" | "struct_specifier" | "union_specifier" | "namespace_definition" => {
            let scoped = match node.child_by_field("name") {
                Some(name) => join_qual(qual, name.slice(source)),
                None => qual.to_string(),
            };
            if let Some(body) = node.child_by_field("body") {
                collect_scope(body, source, &scoped, out);
            }
        }
        "template_parameter_list" | "declaration" => {}
        _ => {
            // Linkage specs, preprocessor blocks and other wrappers may hide
            // further declarations.
            if node.named_child_count() > 0 && !node.kind().ends_with("_expression") {
                collect_scope(node, source, qual, out);
            }
        }
    }
}

fn join_qual(qual: &str, name: &str) -> String {
    if qual.is_empty() {
        name.to_string()
    } else {
        format!("{qual}::{name}")
    }
}

fn build_function<'t, N: SyntaxNode<'t>>(node: N, source: &str, qual: &str) -> GSGNode {
    let mut func = GSGNode::new(GSGNodeKind::Function, node.loc());
    if let Some(decl) = node.child_by_field("declarator") {
        func.name = declarator_name(decl, source);
    }
    if !qual.is_empty() && !func.name.is_empty() {
        let prefix = format!("{qual}::");
        if !func.name.starts_with(&prefix) {
            func.name = format!("{prefix}{}", func.name);
        }
    }
    if let Some(body) = node.child_by_field("body") {
        build_block(body, source, &mut func.children, 0);
    }
    func
}

/// Textual name extraction from a declarator: everything up to the first
/// `(`, trimmed of pointer/reference/parenthesis sigils. Falls back to the
/// first identifier-like node in the subtree.
fn declarator_name<'t, N: SyntaxNode<'t>>(decl: N, source: &str) -> String {
    let text = decl.slice(source);
    if let Some(paren) = text.find('(') {
        let name = text[..paren]
            .trim()
            .trim_start_matches(['*', '&', '('])
            .trim();
        if !name.is_empty() {
            return name.to_string();
        }
    }
    first_identifier(decl, source).unwrap_or_default()
}

fn first_identifier<'t, N: SyntaxNode<'t>>(node: N, source: &str) -> Option<String> {
    for child in node.named_children() {
        match child.kind() {
            "identifier" | "field_identifier" => return Some(child.slice(source).to_string()),
            _ => {
                if let Some(found) = first_identifier(child, source) {
                    return Some(found);
                }
            }
        }
    }
    None
}

/// Lower the statements of a block (or a single unbraced statement).
fn build_body<'t, N: SyntaxNode<'t>>(
    body: N,
    source: &str,
    out: &mut Vec<GSGNode>,
    nesting: u32,
) {
    if body.kind() == "compound_statement" {
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
        "if_statement" => {
            if let Some(cond) = stmt.child_by_field("condition") {
                scan_lambdas(cond, source, out);
            }
            out.push(build_if(stmt, source, nesting));
        }
        "while_statement" => {
            let mut node = GSGNode::new(GSGNodeKind::While, stmt.loc());
            if let Some(cond) = stmt.child_by_field("condition") {
                scan_lambdas(cond, source, out);
                node.addl_cost = expr_cost(cond, 0, source, &VOCAB);
            }
            if let Some(body) = stmt.child_by_field("body") {
                build_body(body, source, &mut node.children, nesting + 1);
            }
            out.push(node);
        }
        "for_statement" | "for_range_loop" => {
            // Loop headers contribute no condition cost (parity with the
            // Python for).
            for field in ["initializer", "condition", "update", "right"] {
                if let Some(part) = stmt.child_by_field(field) {
                    scan_lambdas(part, source, out);
                }
            }
            let mut node = GSGNode::new(GSGNodeKind::For, stmt.loc());
            if let Some(body) = stmt.child_by_field("body") {
                build_body(body, source, &mut node.children, nesting + 1);
            }
            out.push(node);
        }
        "do_statement" => {
            let mut node = GSGNode::new(GSGNodeKind::DoWhile, stmt.loc());
            if let Some(cond) = stmt.child_by_field("condition") {
                scan_lambdas(cond, source, out);
                node.addl_cost = expr_cost(cond, 0, source, &VOCAB);
            }
            if let Some(body) = stmt.child_by_field("body") {
                build_body(body, source, &mut node.children, nesting + 1);
            }
            out.push(node);
        }
        "switch_statement" => {
            if let Some(cond) = stmt.child_by_field("condition") {
                scan_lambdas(cond, source, out);
            }
            out.push(build_switch(stmt, source, nesting));
        }
        "return_statement" => {
            scan_lambdas(stmt, source, out);
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
            scan_lambdas(stmt, source, out);
            if let Some(expr) = stmt.named_child(0) {
                let cost = expr_cost(expr, nesting, source, &VOCAB);
                if cost > 0 {
                    let mut node = GSGNode::new(GSGNodeKind::Expr, expr.loc());
                    node.addl_cost = cost;
                    out.push(node);
                }
            }
        }
        "declaration" => {
            scan_lambdas(stmt, source, out);
            let cost: u32 = stmt
                .named_children()
                .map(|child| expr_cost(child, nesting, source, &VOCAB))
                .sum();
            if cost > 0 {
                let mut node = GSGNode::new(GSGNodeKind::Expr, stmt.loc());
                node.addl_cost = cost;
                out.push(node);
            }
        }
        "compound_statement" => build_block(stmt, source, out, nesting),
        _ => scan_lambdas(stmt, source, out),
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
        // Grammars wrap the else branch in an else_clause node.
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

/// An else branch that is (or wraps exactly) another `if` is normalized to
/// `ElseIf`, avoiding the extra nesting level a literal `else { if }` would
/// imply.
fn build_else<'t, N: SyntaxNode<'t>>(branch: N, clause: N, source: &str, nesting: u32) -> GSGNode {
    if branch.kind() == "if_statement" {
        return build_elif(branch, source, nesting);
    }
    if branch.kind() == "compound_statement" && branch.named_child_count() == 1 {
        if let Some(only) = branch.named_child(0) {
            if only.kind() == "if_statement" {
                return build_elif(only, source, nesting);
            }
        }
    }
    let mut els = GSGNode::new(GSGNodeKind::Else, clause.loc());
    build_body(branch, source, &mut els.children, nesting + 1);
    els
}

/// Build an `ElseIf` from an `if_statement` branch. Unlike the primary `if`
/// (whose condition `build_stmt` scans into the surrounding block), lambdas
/// in an else-if condition land at the front of the `ElseIf`'s children.
fn build_elif<'t, N: SyntaxNode<'t>>(branch: N, source: &str, nesting: u32) -> GSGNode {
    let mut lambdas = Vec::new();
    if let Some(cond) = branch.child_by_field("condition") {
        scan_lambdas(cond, source, &mut lambdas);
    }
    let mut elif = build_if(branch, source, nesting);
    elif.kind = GSGNodeKind::ElseIf;
    elif.children.splice(0..0, lambdas);
    elif
}

fn build_switch<'t, N: SyntaxNode<'t>>(stmt: N, source: &str, nesting: u32) -> GSGNode {
    let mut switch = GSGNode::new(GSGNodeKind::Switch, stmt.loc());
    let body = stmt.child_by_field("body").unwrap_or(stmt);
    for case in body.named_children() {
        if case.kind() != "case_statement" {
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

/// Find lambda expressions in the non-body parts of a statement. Control
/// statements and blocks are skipped: their statements run through
/// `build_stmt` themselves.
fn scan_lambdas<'t, N: SyntaxNode<'t>>(node: N, source: &str, out: &mut Vec<GSGNode>) {
    if node.kind() == "lambda_expression" {
        out.push(build_lambda(node, source));
        return;
    }
    if CONTROL_KINDS.contains(&node.kind()) {
        return;
    }
    for child in node.named_children() {
        scan_lambdas(child, source, out);
    }
}

fn build_lambda<'t, N: SyntaxNode<'t>>(node: N, source: &str) -> GSGNode {
    let mut func = GSGNode::new(GSGNodeKind::Function, node.loc());
    func.name = format!("lambda@{}:{}", func.loc.row, func.loc.start_col);
    if let Some(body) = node.child_by_field("body") {
        build_body(body, source, &mut func.children, 0);
    }
    func
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::parser_for;
    use crate::gsg::Language;

    fn build(source: &str, lang: Language) -> Vec<GSGNode> {
        let mut parser = parser_for(lang, false).unwrap();
        let tree = parser.parse(source, None).unwrap();
        build_functions(tree.root_node(), source)
    }

    #[test]
    fn test_c_function_discovery_and_name() {
        let source = r#"
static int *find_slot(int key) {
    if (key < 0) {
        return 0;
    }
    return lookup(key);
}
"#;
        let funcs = build(source, Language::C);
        assert_eq!(funcs.len(), 1);
        assert_eq!(funcs[0].name, "find_slot");
        assert_eq!(funcs[0].children[0].kind, GSGNodeKind::If);
    }

    #[test]
    fn test_cpp_qualified_names() {
        let source = r#"
namespace net {
struct Socket {
    int open(int port) {
        if (port <= 0) {
            return -1;
        }
        return 0;
    }
};

void Socket::close() {
    if (fd) {
        release(fd);
    }
}
}
"#;
        let funcs = build(source, Language::Cpp);
        let names: Vec<&str> = funcs.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["net::Socket::open", "net::Socket::close"]);
    }

    #[test]
    fn test_operator_overload_keeps_prefix() {
        let source = r#"
struct Vec2 {
    Vec2 operator+(const Vec2 &other) {
        return Vec2{x + other.x, y + other.y};
    }
};
"#;
        let funcs = build(source, Language::Cpp);
        assert_eq!(funcs[0].name, "Vec2::operator+");
    }

    #[test]
    fn test_template_method_discovered() {
        let source = r#"
template <typename T>
struct Buffer {
    T clamp(T v, T lo, T hi) {
        if (v < lo) {
            return lo;
        }
        if (v > hi) {
            return hi;
        }
        return v;
    }
};
"#;
        let funcs = build(source, Language::Cpp);
        assert_eq!(funcs.len(), 1);
        assert_eq!(funcs[0].name, "Buffer::clamp");
        assert_eq!(funcs[0].children.len(), 2);
    }

    #[test]
    fn test_else_if_normalization() {
        let source = r#"
int sign(int v) {
    if (v > 0) {
        return 1;
    } else if (v < 0) {
        return -1;
    } else {
        return 0;
    }
}
"#;
        let funcs = build(source, Language::C);
        let if_node = &funcs[0].children[0];
        assert_eq!(if_node.kind, GSGNodeKind::If);
        let elif = if_node
            .children
            .iter()
            .find(|c| c.kind == GSGNodeKind::ElseIf)
            .expect("else-if normalized");
        assert!(elif.children.iter().any(|c| c.kind == GSGNodeKind::Else));
    }

    #[test]
    fn test_lambda_becomes_function() {
        let source = r#"
int dispatch(int v) {
    auto pick = [](int x) {
        if (x > 0) {
            return 1;
        }
        return 0;
    };
    return pick(v);
}
"#;
        let funcs = build(source, Language::Cpp);
        assert_eq!(funcs.len(), 1);
        let lambdas: Vec<&GSGNode> = funcs[0]
            .children
            .iter()
            .filter(|c| c.kind == GSGNodeKind::Function)
            .collect();
        assert_eq!(lambdas.len(), 1);
        assert!(lambdas[0].name.starts_with("lambda@"));
        assert_eq!(lambdas[0].children[0].kind, GSGNodeKind::If);
    }

    #[test]
    fn test_lambda_interior_not_double_priced() {
        let source = r#"
int gate(int a, int b) {
    auto check = [](int x, int y) { return x && y; };
    return check(a, b);
}
"#;
        let funcs = build(source, Language::Cpp);
        // The && chain belongs to the lambda, not to the enclosing
        // declaration statement.
        let outer_exprs: Vec<&GSGNode> = funcs[0]
            .children
            .iter()
            .filter(|c| c.kind == GSGNodeKind::Expr)
            .collect();
        assert!(outer_exprs.is_empty());
        let lambda = funcs[0]
            .children
            .iter()
            .find(|c| c.kind == GSGNodeKind::Function)
            .unwrap();
        assert_eq!(lambda.children.len(), 1);
        assert_eq!(lambda.children[0].addl_cost, 1);
    }

    #[test]
    fn test_lambda_in_else_if_condition() {
        let source = r#"
int route(int v) {
    if (v > 0) {
        return 1;
    } else if (apply(v, [](int x) {
        if (x < 0) {
            return -x;
        }
        return x;
    })) {
        return 2;
    }
    return 0;
}
"#;
        let funcs = build(source, Language::Cpp);
        assert_eq!(funcs.len(), 1);
        let if_node = &funcs[0].children[0];
        let elif = if_node
            .children
            .iter()
            .find(|c| c.kind == GSGNodeKind::ElseIf)
            .expect("else-if normalized");
        // The lambda in the condition is kept as a Function child; the
        // condition itself carries no cost (the lambda interior is priced
        // in the lambda, not in the call expression).
        assert_eq!(elif.addl_cost, 0);
        let lambda = elif
            .children
            .iter()
            .find(|c| c.kind == GSGNodeKind::Function)
            .expect("lambda collected from the else-if condition");
        assert!(lambda.name.starts_with("lambda@"));
        assert_eq!(lambda.children[0].kind, GSGNodeKind::If);
    }

    #[test]
    fn test_switch_cases_nest() {
        let source = r#"
int act(int op) {
    switch (op) {
        case 1:
            if (ready) {
                run();
            }
            break;
        default:
            stop();
    }
    return 0;
}
"#;
        let funcs = build(source, Language::C);
        let switch = &funcs[0].children[0];
        assert_eq!(switch.kind, GSGNodeKind::Switch);
        assert_eq!(switch.children.len(), 2);
        assert_eq!(switch.children[0].kind, GSGNodeKind::Case);
        assert_eq!(switch.children[0].children[0].kind, GSGNodeKind::If);
    }

    #[test]
    fn test_unbraced_bodies() {
        let source = r#"
int count(int n) {
    int total = 0;
    for (int i = 0; i < n; i++)
        if (i % 2)
            total++;
    return total;
}
"#;
        let funcs = build(source, Language::C);
        let for_node = &funcs[0].children[0];
        assert_eq!(for_node.kind, GSGNodeKind::For);
        assert_eq!(for_node.children[0].kind, GSGNodeKind::If);
    }
}
