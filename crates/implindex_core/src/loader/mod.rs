//! File-system transport for implementor fragments.
//!
//! # Responsibility
//! - Discover rustdoc `trait.*.js` implementor scripts under a root directory.
//! - Turn one script into a scoped [`Fragment`] ready for submission.
//!
//! # Invariants
//! - Loading never touches the registry; callers submit the result.
//! - Discovery order is sorted so repeated runs see the same file order.

mod script;

pub use script::parse_implementors_script;

use crate::model::fragment::{Fragment, FragmentError};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const SCRIPT_PREFIX: &str = "trait.";
const SCRIPT_SUFFIX: &str = ".js";

/// Fragment loading errors.
#[derive(Debug)]
pub enum LoadError {
    Io { path: PathBuf, source: std::io::Error },
    Walk(walkdir::Error),
    MissingImplementorTable,
    Json(serde_json::Error),
    InvalidSymbolValue(String),
    InvalidEntry { symbol: String, index: usize },
    Malformed(FragmentError),
}

impl Display for LoadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "failed to read `{}`: {source}", path.display()),
            Self::Walk(err) => write!(f, "failed to walk implementors tree: {err}"),
            Self::MissingImplementorTable => {
                write!(f, "script does not assign an `implementors` table")
            }
            Self::Json(err) => write!(f, "implementors table is not valid JSON: {err}"),
            Self::InvalidSymbolValue(symbol) => {
                write!(f, "entries for `{symbol}` must be an array")
            }
            Self::InvalidEntry { symbol, index } => {
                write!(f, "entry {index} of `{symbol}` has no markup string")
            }
            Self::Malformed(err) => write!(f, "{err}"),
        }
    }
}

impl Error for LoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Walk(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::Malformed(err) => Some(err),
            Self::MissingImplementorTable
            | Self::InvalidSymbolValue(_)
            | Self::InvalidEntry { .. } => None,
        }
    }
}

impl From<walkdir::Error> for LoadError {
    fn from(value: walkdir::Error) -> Self {
        Self::Walk(value)
    }
}

/// Returns every implementor script under `root`, sorted by path.
pub fn discover_scripts(root: &Path) -> Result<Vec<PathBuf>, LoadError> {
    let mut scripts = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let is_script = entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with(SCRIPT_PREFIX) && name.ends_with(SCRIPT_SUFFIX));
        if is_script {
            scripts.push(entry.into_path());
        }
    }
    Ok(scripts)
}

/// Derives the trait path a script documents from its location.
///
/// `core/default/trait.Default.js` under `root` becomes
/// `core::default::Default`. Returns `None` for paths outside `root` or files
/// that are not implementor scripts.
pub fn scope_from_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let file_name = relative.file_name()?.to_str()?;
    let trait_name = file_name
        .strip_prefix(SCRIPT_PREFIX)?
        .strip_suffix(SCRIPT_SUFFIX)?;
    if trait_name.is_empty() {
        return None;
    }

    let mut segments = Vec::new();
    if let Some(parent) = relative.parent() {
        for component in parent.components() {
            segments.push(component.as_os_str().to_str()?.to_string());
        }
    }
    segments.push(trait_name.to_string());
    Some(segments.join("::"))
}

/// Reads and parses one implementor script.
pub fn load_script(root: &Path, path: &Path) -> Result<Fragment, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let scope = scope_from_path(root, path);
    parse_implementors_script(scope.as_deref(), &text)
}
