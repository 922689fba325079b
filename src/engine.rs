//! Engine entry points: source text in, function complexities out.
//!
//! `analyze` drives one source buffer through parse -> build -> score.
//! `analyze_file` and `analyze_paths` wrap it for the filesystem, the latter
//! fanning out over files with rayon. Each call is self-contained and shares
//! no mutable state, so concurrent calls over distinct files are safe.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::adapter::{parser_for, SyntaxNode};
use crate::builders;
use crate::error::{CognityError, Result};
use crate::gsg::{FileComplexity, FunctionComplexity, GSGNode, GSGNodeKind, Language};
use crate::scorer;
use crate::sourcing;

/// Analyze one source buffer.
///
/// Returns one [`FunctionComplexity`] per function in source order
/// (depth-first pre-order: each function is followed by its nested
/// functions). [`Language::Unknown`] yields an empty list; it is not an
/// error.
pub fn analyze(source: &str, language: Language) -> Result<Vec<FunctionComplexity>> {
    analyze_inner(source, language, false)
}

fn analyze_inner(source: &str, language: Language, tsx: bool) -> Result<Vec<FunctionComplexity>> {
    if language == Language::Unknown {
        return Ok(Vec::new());
    }

    let mut parser = parser_for(language, tsx)?;
    let tree = parser
        .parse(source, None)
        .ok_or_else(|| CognityError::TreeSitter("parser returned no tree".to_string()))?;
    let root = tree.root_node();
    debug!(language = %language, bytes = source.len(), kind = SyntaxNode::kind(&root), "parsed");

    let functions = builders::build_functions(language, root, source);

    let mut results = Vec::new();
    for func in &functions {
        report_function(func, 0, &mut results);
    }
    Ok(results)
}

/// Score `func` at its enclosing depth, then its nested functions one level
/// deeper. The parent's score never includes the nested ones.
fn report_function(func: &GSGNode, depth: u32, out: &mut Vec<FunctionComplexity>) {
    let (complexity, lines) = scorer::score(func, depth);
    out.push(FunctionComplexity {
        name: func.name.clone(),
        complexity,
        loc: func.loc,
        lines,
    });
    collect_nested(func, depth, out);
}

fn collect_nested(node: &GSGNode, depth: u32, out: &mut Vec<FunctionComplexity>) {
    for child in &node.children {
        if child.kind == GSGNodeKind::Function {
            report_function(child, depth + 1, out);
        } else {
            collect_nested(child, depth, out);
        }
    }
}

/// Analyze a single file, detecting the language from its extension.
pub fn analyze_file(path: impl AsRef<Path>) -> Result<FileComplexity> {
    let path = path.as_ref();
    let language = Language::from_path(path);
    let source =
        std::fs::read_to_string(path).map_err(|e| CognityError::io_with_path(e, path))?;
    let tsx = path.extension().and_then(|e| e.to_str()) == Some("tsx");
    let functions = analyze_inner(&source, language, tsx)?;
    Ok(FileComplexity {
        path: path.to_path_buf(),
        functions,
    })
}

/// Analyze every matching file under `inputs` in parallel.
///
/// Files are collected through [`sourcing::collect_source_files`] (gitignore
/// rules, language filter, explicit excludes). Files that fail to read or
/// parse are logged and skipped; they never abort the run.
pub fn analyze_paths(
    inputs: &[PathBuf],
    filter: &[Language],
    excludes: &[PathBuf],
) -> Result<Vec<FileComplexity>> {
    let files = sourcing::collect_source_files(inputs, filter, excludes)?;
    debug!(files = files.len(), "analyzing");

    let mut results: Vec<FileComplexity> = files
        .par_iter()
        .filter_map(|file| match analyze_file(file) {
            Ok(fc) => Some(fc),
            Err(e) => {
                warn!(file = %file.display(), error = %e, "skipping file");
                None
            }
        })
        .collect();

    // par_iter preserves input order for collect, but make the contract
    // explicit: output follows the deterministic collection order.
    results.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(results)
}
