//! cognity - per-function cognitive complexity across languages.
//!
//! Computes cognitive complexity for Python, C, C++, JavaScript and
//! TypeScript sources and flags functions exceeding a configurable
//! threshold.
//!
//! # Architecture
//!
//! The engine is a two-stage pipeline over tree-sitter syntax trees:
//!
//! - **Builders** ([`builders`]): per-language lowering from a concrete
//!   syntax tree into the General Syntax Graph, a normalized model drawn
//!   from a small closed kind set ([`gsg`]). Builders reach the tree only
//!   through the narrow [`adapter`] capability trait.
//! - **Scorer** ([`scorer`]): a single language-independent traversal that
//!   turns any GSG function into a score plus per-construct contributions.
//!
//! Adding a language means writing a builder; the scorer never changes.
//!
//! # Quick start
//!
//! ```no_run
//! use cognity::{analyze, Language};
//!
//! let source = "def f(x):\n    if x:\n        return 1\n";
//! for func in analyze(source, Language::Python)? {
//!     println!("{} -> {}", func.name, func.complexity);
//! }
//! # Ok::<(), cognity::CognityError>(())
//! ```
//!
//! The [`engine`] module also offers file and directory entry points
//! (gitignore-aware, parallel over files); [`output`] renders results as a
//! table, JSON or CSV; [`config`] loads `cognity.toml` defaults.

pub mod adapter;
pub mod builders;
pub mod config;
pub mod engine;
pub mod error;
pub mod gsg;
pub mod output;
pub mod scorer;
pub mod sourcing;

pub use engine::{analyze, analyze_file, analyze_paths};
pub use error::{CognityError, Result};
pub use gsg::{
    FileComplexity, FunctionComplexity, GSGNode, GSGNodeKind, Language, LineComplexity, SourceLoc,
};
pub use scorer::score;
