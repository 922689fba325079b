//! Syntax adapter: the only surface the engine takes from a parser.
//!
//! Builders walk concrete syntax trees through the narrow [`SyntaxNode`]
//! capability trait. Grammar node kinds are referenced by their grammar
//! string (`"if_statement"`, `"boolean_operator"`), never by enum: the
//! vocabulary differs per grammar and only the builders know it.
//!
//! This module also owns parser construction, wiring the tree-sitter
//! grammars for the supported languages. Nothing outside this file names a
//! `tree_sitter` type.

use tree_sitter::Parser;

use crate::error::{CognityError, Result};
use crate::gsg::{Language, SourceLoc};

/// Minimal node capabilities the builders depend on.
///
/// Implementations are cheap handles (`Copy`) borrowing a tree owned by the
/// caller; `'t` is the tree lifetime.
pub trait SyntaxNode<'t>: Copy {
    /// Grammar production name (e.g. `"function_definition"`).
    fn kind(&self) -> &'t str;

    fn named_child_count(&self) -> usize;

    fn named_child(&self, i: usize) -> Option<Self>;

    /// Look up a child by grammar field name (`"body"`, `"condition"`, ...).
    fn child_by_field(&self, field: &str) -> Option<Self>;

    fn start_byte(&self) -> usize;

    fn end_byte(&self) -> usize;

    /// Zero-based (row, column) of the node start.
    fn start_point(&self) -> (u32, u32);

    /// Zero-based (row, column) of the node end.
    fn end_point(&self) -> (u32, u32);

    /// Borrow the source text covered by this node. Returns an empty string
    /// for out-of-range nodes rather than panicking.
    fn slice<'s>(&self, source: &'s str) -> &'s str {
        source.get(self.start_byte()..self.end_byte()).unwrap_or("")
    }

    /// Identity check by extent. Sufficient inside a single tree, where two
    /// distinct nodes never share both kind and byte range.
    fn same_node(&self, other: &Self) -> bool {
        self.start_byte() == other.start_byte()
            && self.end_byte() == other.end_byte()
            && self.kind() == other.kind()
    }

    /// Source location in the shape the GSG records.
    fn loc(&self) -> SourceLoc {
        let (row, start_col) = self.start_point();
        let (_, end_col) = self.end_point();
        SourceLoc {
            row,
            start_col,
            end_col,
        }
    }

    /// Iterate named children without allocating.
    fn named_children(&self) -> NamedChildren<'t, Self> {
        NamedChildren {
            node: *self,
            index: 0,
            count: self.named_child_count(),
            _marker: std::marker::PhantomData,
        }
    }
}

/// Iterator over the named children of a node.
pub struct NamedChildren<'t, N: SyntaxNode<'t>> {
    node: N,
    index: usize,
    count: usize,
    _marker: std::marker::PhantomData<&'t ()>,
}

impl<'t, N: SyntaxNode<'t>> Iterator for NamedChildren<'t, N> {
    type Item = N;

    fn next(&mut self) -> Option<N> {
        while self.index < self.count {
            let i = self.index;
            self.index += 1;
            if let Some(child) = self.node.named_child(i) {
                return Some(child);
            }
        }
        None
    }
}

impl<'t> SyntaxNode<'t> for tree_sitter::Node<'t> {
    fn kind(&self) -> &'t str {
        tree_sitter::Node::kind(self)
    }

    fn named_child_count(&self) -> usize {
        tree_sitter::Node::named_child_count(self)
    }

    fn named_child(&self, i: usize) -> Option<Self> {
        tree_sitter::Node::named_child(self, i)
    }

    fn child_by_field(&self, field: &str) -> Option<Self> {
        self.child_by_field_name(field)
    }

    fn start_byte(&self) -> usize {
        tree_sitter::Node::start_byte(self)
    }

    fn end_byte(&self) -> usize {
        tree_sitter::Node::end_byte(self)
    }

    fn start_point(&self) -> (u32, u32) {
        let p = self.start_position();
        (p.row as u32, p.column as u32)
    }

    fn end_point(&self) -> (u32, u32) {
        let p = self.end_position();
        (p.row as u32, p.column as u32)
    }
}

/// Build a parser configured for `language`.
///
/// `.ts` and `.tsx` share the [`Language::TypeScript`] tag but use different
/// grammar variants; `tsx` selects the JSX-capable one.
pub fn parser_for(language: Language, tsx: bool) -> Result<Parser> {
    let grammar = match language {
        Language::Python => tree_sitter_python::LANGUAGE,
        Language::C => tree_sitter_c::LANGUAGE,
        Language::Cpp => tree_sitter_cpp::LANGUAGE,
        Language::JavaScript => tree_sitter_javascript::LANGUAGE,
        Language::TypeScript => {
            if tsx {
                tree_sitter_typescript::LANGUAGE_TSX
            } else {
                tree_sitter_typescript::LANGUAGE_TYPESCRIPT
            }
        }
        Language::Unknown => {
            return Err(CognityError::UnsupportedLanguage("unknown".to_string()))
        }
    };

    let mut parser = Parser::new();
    parser
        .set_language(&grammar.into())
        .map_err(|e| CognityError::TreeSitter(e.to_string()))?;
    Ok(parser)
}
