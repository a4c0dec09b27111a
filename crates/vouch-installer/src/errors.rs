use std::io;
use std::path::PathBuf;

use crate::install::SOURCE_ROOTS;

#[derive(Debug, thiserror::Error)]
pub enum InstallError {
    #[error("path to module is not specified")]
    PathNotSpecified,

    #[error("could not read manifest '{}': {source}", .path.display())]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse manifest '{}': {message}", .path.display())]
    ManifestParse { path: PathBuf, message: String },

    #[error("manifest '{}' has no [package] section", .path.display())]
    MissingPackage { path: PathBuf },

    #[error(
        "'{}' is not inside a source directory ({})",
        .path.display(),
        SOURCE_ROOTS.join(", ")
    )]
    OutsideSourceRoot { path: PathBuf },

    #[error("'{segment}' is not a valid module name")]
    InvalidModuleName { segment: String },

    #[error("failed to write '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl InstallError {
    /// Error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            InstallError::PathNotSpecified => "PATH_NOT_SPECIFIED",
            InstallError::ManifestRead { .. } => "MANIFEST_READ_ERROR",
            InstallError::ManifestParse { .. } => "MANIFEST_PARSE_ERROR",
            InstallError::MissingPackage { .. } => "MISSING_PACKAGE",
            InstallError::OutsideSourceRoot { .. } => "OUTSIDE_SOURCE_ROOT",
            InstallError::InvalidModuleName { .. } => "INVALID_MODULE_NAME",
            InstallError::Io { .. } => "INSTALL_IO_ERROR",
        }
    }

    /// Whether the error was caused by the invocation rather than the environment
    pub fn is_user_error(&self) -> bool {
        !matches!(
            self,
            InstallError::ManifestRead { .. } | InstallError::Io { .. }
        )
    }
}
