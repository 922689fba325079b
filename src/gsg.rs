//! General Syntax Graph: the language-agnostic model the scorer consumes.
//!
//! Each language builder lowers a concrete syntax tree into a tree of
//! [`GSGNode`]s drawn from the closed [`GSGNodeKind`] set. The scorer never
//! sees grammar-specific node kinds; builders are the only components that
//! know them.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

// =============================================================================
// LANGUAGE TAGS
// =============================================================================

/// Source languages the engine can analyze.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    Python,
    C,
    Cpp,
    JavaScript,
    TypeScript,
    /// Anything without a registered builder. Analyzing it yields no functions.
    Unknown,
}

impl Language {
    /// Detect the language from a file path by extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("py") => Self::Python,
            Some("c") => Self::C,
            Some("cpp" | "cc" | "cxx") => Self::Cpp,
            Some("js" | "mjs" | "cjs") => Self::JavaScript,
            Some("ts" | "tsx") => Self::TypeScript,
            _ => Self::Unknown,
        }
    }

    /// Parse a language name as written on the command line or in
    /// `cognity.toml` (e.g. `py`, `python`, `c++`, `tsx`).
    #[must_use]
    pub fn from_token(token: &str) -> Self {
        match token.trim().to_ascii_lowercase().as_str() {
            "py" | "python" => Self::Python,
            "c" => Self::C,
            "cpp" | "c++" | "cc" | "cxx" => Self::Cpp,
            "js" | "javascript" => Self::JavaScript,
            "ts" | "typescript" | "tsx" => Self::TypeScript,
            _ => Self::Unknown,
        }
    }

    /// Canonical lowercase name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::C => "c",
            Self::Cpp => "cpp",
            Self::JavaScript => "javascript",
            Self::TypeScript => "typescript",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// GSG NODES
// =============================================================================

/// Node kinds of the General Syntax Graph.
///
/// Not every kind is emitted by every builder: Python never emits `DoWhile`
/// or `Switch`, the C-like builder never emits `Except` or `Finally`.
/// `Root`, `Class`, `Block`, `Return`, `Break` and `Continue` are reserved
/// members of the closed set that current builders do not produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GSGNodeKind {
    Root,
    Class,
    Function,
    Block,
    If,
    ElseIf,
    Else,
    For,
    While,
    DoWhile,
    Switch,
    Case,
    With,
    Except,
    Try,
    Finally,
    Expr,
    Ternary,
    Return,
    Break,
    Continue,
    Unknown,
}

/// Position of a construct in the source. Rows are zero-based; columns are
/// byte offsets as reported by the syntax adapter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLoc {
    pub row: u32,
    pub start_col: u32,
    pub end_col: u32,
}

/// One node of the General Syntax Graph.
///
/// Immutable once the builder returns it. `addl_cost` carries pre-computed
/// expression cost (boolean-operator alternations, ternaries) or the
/// intrinsic cost of constructs without a nesting-based base (`Except`,
/// `With`, `Expr`). `children` are in source order.
#[derive(Debug, Clone)]
pub struct GSGNode {
    pub kind: GSGNodeKind,
    /// Populated for `Function` nodes, possibly with a qualifier prefix
    /// (`ns::Class::method`, `lambda@3:10`). Empty otherwise.
    pub name: String,
    pub loc: SourceLoc,
    pub addl_cost: u32,
    pub children: Vec<GSGNode>,
}

impl GSGNode {
    /// A node with no name, no extra cost and no children.
    #[must_use]
    pub fn new(kind: GSGNodeKind, loc: SourceLoc) -> Self {
        Self {
            kind,
            name: String::new(),
            loc,
            addl_cost: 0,
            children: Vec::new(),
        }
    }
}

// =============================================================================
// ENGINE OUTPUT
// =============================================================================

/// A single attributed cost: one construct on one row. Several entries may
/// share a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineComplexity {
    #[serde(flatten)]
    pub loc: SourceLoc,
    pub contribution: u32,
}

/// Cognitive complexity of one function, with its per-construct breakdown.
///
/// Owns its strings and vectors; stays valid after the syntax tree that
/// produced it is dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionComplexity {
    pub name: String,
    pub complexity: u32,
    #[serde(flatten)]
    pub loc: SourceLoc,
    pub lines: Vec<LineComplexity>,
}

/// All function complexities of one analyzed file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileComplexity {
    pub path: PathBuf,
    pub functions: Vec<FunctionComplexity>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_language_from_path() {
        assert_eq!(Language::from_path(Path::new("a/b.py")), Language::Python);
        assert_eq!(Language::from_path(Path::new("x.c")), Language::C);
        assert_eq!(Language::from_path(Path::new("x.cpp")), Language::Cpp);
        assert_eq!(Language::from_path(Path::new("x.cc")), Language::Cpp);
        assert_eq!(Language::from_path(Path::new("x.cxx")), Language::Cpp);
        assert_eq!(Language::from_path(Path::new("x.js")), Language::JavaScript);
        assert_eq!(Language::from_path(Path::new("x.mjs")), Language::JavaScript);
        assert_eq!(Language::from_path(Path::new("x.cjs")), Language::JavaScript);
        assert_eq!(Language::from_path(Path::new("x.ts")), Language::TypeScript);
        assert_eq!(Language::from_path(Path::new("x.tsx")), Language::TypeScript);
        assert_eq!(Language::from_path(Path::new("x.rs")), Language::Unknown);
        assert_eq!(Language::from_path(Path::new("Makefile")), Language::Unknown);
    }

    #[test]
    fn test_language_from_token() {
        assert_eq!(Language::from_token("py"), Language::Python);
        assert_eq!(Language::from_token("Python"), Language::Python);
        assert_eq!(Language::from_token("c++"), Language::Cpp);
        assert_eq!(Language::from_token(" tsx "), Language::TypeScript);
        assert_eq!(Language::from_token("cobol"), Language::Unknown);
    }

    #[test]
    fn test_serde_roundtrip_function_complexity() {
        let fc = FunctionComplexity {
            name: "ns::f".to_string(),
            complexity: 4,
            loc: SourceLoc {
                row: 2,
                start_col: 0,
                end_col: 10,
            },
            lines: vec![LineComplexity {
                loc: SourceLoc {
                    row: 3,
                    start_col: 4,
                    end_col: 20,
                },
                contribution: 4,
            }],
        };
        let json = serde_json::to_string(&fc).unwrap();
        let back: FunctionComplexity = serde_json::from_str(&json).unwrap();
        assert_eq!(back.name, fc.name);
        assert_eq!(back.complexity, 4);
        assert_eq!(back.lines.len(), 1);
        assert_eq!(back.lines[0].contribution, 4);
    }
}
