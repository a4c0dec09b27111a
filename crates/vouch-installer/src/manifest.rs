//! Reading the consumer's `Cargo.toml`.
//!
//! The crate name is taken from `[package] name`. Installer settings live under
//! `[package.metadata.vouch]` and are overridden by command-line arguments:
//!
//! ```toml
//! [package.metadata.vouch]
//! path = "src/testutil"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::errors::InstallError;

#[derive(Debug, Deserialize)]
struct RawManifest {
    package: Option<RawPackage>,
}

#[derive(Debug, Deserialize)]
struct RawPackage {
    name: String,
    #[serde(default)]
    metadata: RawMetadata,
}

#[derive(Debug, Default, Deserialize)]
struct RawMetadata {
    #[serde(default)]
    vouch: InstallerSettings,
}

/// Settings read from `[package.metadata.vouch]`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct InstallerSettings {
    /// Directory that receives the `assert` module, relative to the manifest.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectManifest {
    pub crate_name: String,
    /// Directory containing the manifest.
    pub root: PathBuf,
    pub settings: InstallerSettings,
}

pub fn load(path: &Path) -> Result<ProjectManifest, InstallError> {
    let content = fs::read_to_string(path).map_err(|source| InstallError::ManifestRead {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&content, path)
}

pub fn parse(content: &str, path: &Path) -> Result<ProjectManifest, InstallError> {
    let raw: RawManifest = toml::from_str(content).map_err(|e| InstallError::ManifestParse {
        path: path.to_path_buf(),
        message: e.message().to_string(),
    })?;

    let package = raw.package.ok_or_else(|| InstallError::MissingPackage {
        path: path.to_path_buf(),
    })?;

    let root = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    tracing::debug!(
        event = "installer.manifest_loaded",
        path = %path.display(),
        crate_name = %package.name,
    );

    Ok(ProjectManifest {
        crate_name: package.name,
        root,
        settings: package.metadata.vouch,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_package_name() {
        let manifest = parse(
            r#"
[package]
name = "demo"
version = "0.1.0"

[dependencies]
serde = "1"
"#,
            Path::new("Cargo.toml"),
        )
        .unwrap();

        assert_eq!(manifest.crate_name, "demo");
        assert_eq!(manifest.root, PathBuf::from("."));
        assert_eq!(manifest.settings, InstallerSettings::default());
    }

    #[test]
    fn test_parse_metadata_path() {
        let manifest = parse(
            r#"
[package]
name = "demo"
version.workspace = true

[package.metadata.vouch]
path = "tests/common"

[package.metadata.other-tool]
enabled = true
"#,
            Path::new("crates/demo/Cargo.toml"),
        )
        .unwrap();

        assert_eq!(manifest.settings.path, Some(PathBuf::from("tests/common")));
        assert_eq!(manifest.root, PathBuf::from("crates/demo"));
    }

    #[test]
    fn test_virtual_manifest_is_rejected() {
        let err = parse(
            r#"
[workspace]
members = ["crates/*"]
"#,
            Path::new("Cargo.toml"),
        )
        .unwrap_err();

        assert!(matches!(err, InstallError::MissingPackage { .. }));
        assert_eq!(
            err.to_string(),
            "manifest 'Cargo.toml' has no [package] section"
        );
    }

    #[test]
    fn test_invalid_toml() {
        let err = parse("invalid toml [[[", Path::new("Cargo.toml")).unwrap_err();
        assert_eq!(err.error_code(), "MANIFEST_PARSE_ERROR");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(&dir.path().join("Cargo.toml")).unwrap_err();
        assert!(matches!(err, InstallError::ManifestRead { .. }));
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Cargo.toml");
        fs::write(&path, "[package]\nname = \"on-disk\"\n").unwrap();

        let manifest = load(&path).unwrap();
        assert_eq!(manifest.crate_name, "on-disk");
        assert_eq!(manifest.root, dir.path());
    }
}
