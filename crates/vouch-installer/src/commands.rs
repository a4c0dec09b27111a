use std::path::{Path, PathBuf};

use clap::ArgMatches;
use tracing::{error, info};

use crate::errors::InstallError;
use crate::install::{self, InstallRequest};
use crate::manifest::{self, ProjectManifest};

pub fn run_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    match handle_install_command(matches) {
        Ok(()) => Ok(()),
        Err(e) => {
            eprintln!("Error: {e}");
            error!(
                event = "cli.install_failed",
                error = %e,
                code = e.error_code(),
                user_error = e.is_user_error(),
            );
            Err(e.into())
        }
    }
}

fn handle_install_command(matches: &ArgMatches) -> Result<(), InstallError> {
    let manifest_path = matches
        .get_one::<PathBuf>("manifest-path")
        .cloned()
        .unwrap_or_else(|| PathBuf::from("Cargo.toml"));

    let manifest = manifest::load(&manifest_path)?;
    let dest = resolve_destination(matches.get_one::<PathBuf>("path"), &manifest)?;

    info!(
        event = "cli.install_requested",
        manifest = %manifest_path.display(),
        dest = %dest.display(),
    );

    let request = InstallRequest {
        project_root: manifest.root.clone(),
        dest,
        crate_name: manifest.crate_name.clone(),
    };
    let result = install::install(&request)?;

    for file in &result.files {
        println!("Wrote {}", file.display());
    }
    println!(
        "Declare the module with `pub mod assert;` in {} and use `{}::prelude::*`.",
        declaring_file(&request.project_root, &request.dest),
        result.module_path
    );

    Ok(())
}

/// Command-line path first, then `[package.metadata.vouch] path`.
fn resolve_destination(
    cli_path: Option<&PathBuf>,
    manifest: &ProjectManifest,
) -> Result<PathBuf, InstallError> {
    cli_path
        .or(manifest.settings.path.as_ref())
        .cloned()
        .ok_or(InstallError::PathNotSpecified)
}

/// Best guess at the file that declares the destination module.
fn declaring_file(root: &Path, dest: &Path) -> String {
    match install::module_segments(root, dest) {
        Ok(segments) if segments.is_empty() => "the crate root".to_string(),
        _ => root.join(dest).join("mod.rs").display().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::InstallerSettings;

    fn manifest_with(path: Option<&str>) -> ProjectManifest {
        ProjectManifest {
            crate_name: "demo".to_string(),
            root: PathBuf::from("."),
            settings: InstallerSettings {
                path: path.map(PathBuf::from),
            },
        }
    }

    #[test]
    fn test_cli_path_overrides_metadata() {
        let cli = PathBuf::from("src/cli");
        let dest = resolve_destination(Some(&cli), &manifest_with(Some("src/meta"))).unwrap();
        assert_eq!(dest, PathBuf::from("src/cli"));
    }

    #[test]
    fn test_metadata_path_is_fallback() {
        let dest = resolve_destination(None, &manifest_with(Some("src/meta"))).unwrap();
        assert_eq!(dest, PathBuf::from("src/meta"));
    }

    #[test]
    fn test_missing_path_is_an_error() {
        let err = resolve_destination(None, &manifest_with(None)).unwrap_err();
        assert!(matches!(err, InstallError::PathNotSpecified));
    }

    #[test]
    fn test_declaring_file() {
        assert_eq!(
            declaring_file(Path::new("proj"), Path::new("src/testutil")),
            Path::new("proj/src/testutil/mod.rs").display().to_string()
        );
        assert_eq!(
            declaring_file(Path::new("proj"), Path::new("tests")),
            "the crate root"
        );
    }
}
