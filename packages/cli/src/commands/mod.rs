pub mod generate;
pub mod init;
pub mod members;

pub use generate::{generate, GenerateArgs};
pub use init::{init, InitArgs};
pub use members::{members, MembersArgs};

use crate::config::Config;
use anyhow::{anyhow, bail, Context, Result};
use jsoncreator_editor::{dialect_for_path, Document, EditorError, JsonCreatorAction};
use jsoncreator_generator::ClassIndex;
use jsoncreator_parser::error::pretty;
use jsoncreator_parser::parse_dialect;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

const SOURCE_EXTENSIONS: &[&str] = &["java", "groovy", "gvy"];

/// Load a file-backed document, rendering parse errors against the source
pub fn open_document(path: &Path) -> Result<Document> {
    match Document::load(path.to_path_buf()) {
        Ok(document) => Ok(document),
        Err(EditorError::Parse(err)) => {
            let source = std::fs::read_to_string(path)?;
            Err(anyhow!(
                "{}",
                pretty::format_error(&err, &path.display().to_string(), &source)
            ))
        }
        Err(err) => Err(err).with_context(|| format!("Cannot open {}", path.display())),
    }
}

/// Index every parseable source file under the configured roots, except `skip`
pub fn build_index(config: &Config, cwd: &str, skip: &Path) -> ClassIndex {
    let skip = skip.canonicalize().unwrap_or_else(|_| skip.to_path_buf());
    let mut index = ClassIndex::new();

    for file in config
        .get_source_roots(cwd)
        .iter()
        .flat_map(|root| find_source_files(root))
    {
        if file.canonicalize().map(|f| f == skip).unwrap_or(false) {
            continue;
        }
        let source = match std::fs::read_to_string(&file) {
            Ok(source) => source,
            Err(err) => {
                warn!(path = %file.display(), error = %err, "skipping unreadable file");
                continue;
            }
        };
        match parse_dialect(&source, dialect_for_path(&file)) {
            Ok(unit) => index.add(unit),
            Err(err) => warn!(path = %file.display(), error = %err, "skipping unparseable file"),
        }
    }

    debug!(classes = index.len(), "built class index");
    index
}

fn find_source_files(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.file_type().is_file()
                && e.path()
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| SOURCE_EXTENSIONS.contains(&ext))
                    .unwrap_or(false)
        })
        .map(|e| e.path().to_path_buf())
        .collect()
}

/// The class to work on: the one named, else the top-level class matching
/// the file name, else the first top-level class or enum
pub fn target_class(document: &Document, class: Option<String>) -> Result<String> {
    if let Some(class) = class {
        return Ok(class);
    }

    let unit = document.unit();
    let candidates: Vec<&str> = unit
        .top_level
        .iter()
        .map(|id| unit.class(*id))
        .filter(|decl| JsonCreatorAction::is_valid_for_class(decl))
        .map(|decl| decl.name.as_str())
        .collect();

    let stem = document.path.file_stem().and_then(|s| s.to_str());
    if let Some(name) = candidates.iter().find(|name| Some(**name) == stem) {
        return Ok(name.to_string());
    }
    match candidates.first() {
        Some(name) => Ok(name.to_string()),
        None => bail!(
            "{} declares no class or enum to generate a constructor for",
            document.path.display()
        ),
    }
}
