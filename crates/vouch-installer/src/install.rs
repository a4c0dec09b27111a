//! Vendoring the assertion sources into a consumer crate.
//!
//! The destination `<dir>` receives `<dir>/assert/mod.rs` and
//! `<dir>/assert/prelude.rs`. Both are rewritten so that every
//! `crate::assert` path points at the module's new location.

use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::info;

use crate::errors::InstallError;

/// Directories whose files are compiled as a crate root's module tree.
pub const SOURCE_ROOTS: &[&str] = &["src", "tests", "benches", "examples"];

const KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "gen", "if", "impl", "in", "let", "loop", "match", "mod",
    "move", "mut", "pub", "ref", "return", "self", "Self", "static", "struct", "super", "trait",
    "true", "type", "unsafe", "use", "where", "while",
    // reserved
    "abstract", "become", "box", "do", "final", "macro", "override", "priv", "try", "typeof",
    "unsized", "virtual", "yield",
];

const FILES: [(&str, &str); 2] = [
    ("mod.rs", vouch::MAIN_FILE),
    ("prelude.rs", vouch::PRELUDE_FILE),
];

#[derive(Debug, Clone)]
pub struct InstallRequest {
    /// Directory containing the consumer's `Cargo.toml`.
    pub project_root: PathBuf,
    /// Directory that receives the `assert` module, relative to `project_root`.
    pub dest: PathBuf,
    pub crate_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallResult {
    /// Path of the vendored module, e.g. `crate::testutil::assert`.
    pub module_path: String,
    pub files: Vec<PathBuf>,
}

/// Writes the assertion module into the consumer crate, replacing any
/// previously generated files.
pub fn install(request: &InstallRequest) -> Result<InstallResult, InstallError> {
    let segments = module_segments(&request.project_root, &request.dest)?;
    let module_path = vendored_path(&segments);
    let dir = request.project_root.join(&request.dest).join("assert");

    info!(
        event = "installer.install_started",
        crate_name = %request.crate_name,
        dir = %dir.display(),
        module = %module_path,
    );

    fs::create_dir_all(&dir).map_err(|source| InstallError::Io {
        path: dir.clone(),
        source,
    })?;

    let mut files = Vec::with_capacity(FILES.len());
    for (name, contents) in FILES {
        let path = dir.join(name);
        fs::write(&path, render(contents, &module_path, &request.crate_name)).map_err(
            |source| InstallError::Io {
                path: path.clone(),
                source,
            },
        )?;
        info!(event = "installer.file_written", path = %path.display());
        files.push(path);
    }

    info!(
        event = "installer.install_completed",
        module = %module_path,
        files = files.len(),
    );

    Ok(InstallResult { module_path, files })
}

/// Returns the module segments between the source root and `dest`, e.g.
/// `src/testutil` gives `["testutil"]` and `src` gives `[]`.
pub fn module_segments(root: &Path, dest: &Path) -> Result<Vec<String>, InstallError> {
    let outside = || InstallError::OutsideSourceRoot {
        path: dest.to_path_buf(),
    };

    let relative = if dest.is_absolute() {
        let root = std::path::absolute(root).map_err(|source| InstallError::Io {
            path: root.to_path_buf(),
            source,
        })?;
        dest.strip_prefix(&root).map_err(|_| outside())?.to_path_buf()
    } else {
        dest.to_path_buf()
    };

    let mut components = relative
        .components()
        .filter(|component| !matches!(component, Component::CurDir));

    match components.next() {
        Some(Component::Normal(first)) if SOURCE_ROOTS.iter().any(|root| first == *root) => {}
        _ => return Err(outside()),
    }

    components
        .map(|component| match component {
            Component::Normal(name) => {
                let name = name.to_string_lossy();
                if is_module_name(&name) {
                    Ok(name.into_owned())
                } else {
                    Err(InstallError::InvalidModuleName {
                        segment: name.into_owned(),
                    })
                }
            }
            _ => Err(outside()),
        })
        .collect()
}

fn is_module_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_')
        && name != "_"
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !KEYWORDS.contains(&name)
}

fn vendored_path(segments: &[String]) -> String {
    if segments.is_empty() {
        vouch::VENDOR_PATH.to_string()
    } else {
        format!("crate::{}::assert", segments.join("::"))
    }
}

/// Prefixes `source` with the generated-file header and points its
/// self-references at `module_path`.
pub fn render(source: &str, module_path: &str, crate_name: &str) -> String {
    format!(
        "// This file is part of vouch and is distributed under the MIT License.\n\
         \n\
         // Code generated by vouch-installer for crate `{crate_name}`. DO NOT EDIT.\n\
         \n\
         #![allow(dead_code, unused_imports)]\n\
         \n\
         {}",
        source.replace(vouch::VENDOR_PATH, module_path)
    )
}
