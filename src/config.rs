//! `cognity.toml`: optional file-based defaults for the CLI.
//!
//! Every key mirrors a command-line flag. Precedence is field by field:
//! a flag given on the command line wins, otherwise the config value
//! applies, otherwise the built-in default. `Option` fields keep track of
//! which keys the file actually set.

use std::path::Path;

use serde::Deserialize;

use crate::error::{CognityError, Result};
use crate::output::{Detail, SortOrder};

/// Name of the config file looked up in the working directory.
pub const CONFIG_FILE: &str = "cognity.toml";

/// Values parsed from `cognity.toml`. Unset keys stay `None`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub paths: Option<Vec<String>>,
    #[serde(alias = "excludes")]
    pub exclude: Option<Vec<String>>,
    #[serde(alias = "max_complexity_allowed")]
    pub max_complexity: Option<u32>,
    pub quiet: Option<bool>,
    pub ignore_complexity: Option<bool>,
    pub detail: Option<Detail>,
    pub sort: Option<SortOrder>,
    pub output_csv: Option<bool>,
    pub output_json: Option<bool>,
    #[serde(alias = "max_function_width")]
    pub max_fn_width: Option<usize>,
    #[serde(alias = "lang")]
    pub languages: Option<Vec<String>>,
}

/// Load the config file if present.
///
/// A missing file is not an error (`Ok(None)`); a malformed one is.
pub fn load(path: impl AsRef<Path>) -> Result<Option<FileConfig>> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(None);
    }
    let text = std::fs::read_to_string(path).map_err(|e| CognityError::io_with_path(e, path))?;
    let config = toml::from_str(&text)
        .map_err(|e| CognityError::Config(format!("{}: {e}", path.display())))?;
    Ok(Some(config))
}
