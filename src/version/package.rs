//! Package manifest version collaborator.

use crate::error::{Result, VersionError};
use std::future::Future;
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Reads and sets the version recorded in the project's package manifest
pub trait PackageVersion: Send + Sync {
    /// Current manifest version, if there is a readable manifest with one
    fn read_current_version(&self) -> Option<String>;

    /// Set the manifest version (and let the package manager tag it)
    fn set_version(&self, version: &str) -> impl Future<Output = Result<String>> + Send;
}

/// npm `package.json` in the working directory
#[derive(Debug, Clone)]
pub struct NpmPackage {
    work_dir: PathBuf,
}

impl NpmPackage {
    /// Bind to the package.json in `work_dir`
    pub fn new<P: AsRef<Path>>(work_dir: P) -> Self {
        Self {
            work_dir: work_dir.as_ref().to_path_buf(),
        }
    }

    fn manifest_path(&self) -> PathBuf {
        self.work_dir.join("package.json")
    }

    fn read_manifest(&self) -> Result<serde_json::Value> {
        let path = self.manifest_path();
        let content =
            std::fs::read_to_string(&path).map_err(|e| VersionError::ManifestUnreadable {
                path: path.clone(),
                reason: e.to_string(),
            })?;
        Ok(serde_json::from_str(&content)?)
    }
}

impl PackageVersion for NpmPackage {
    fn read_current_version(&self) -> Option<String> {
        match self.read_manifest() {
            Ok(manifest) => manifest["version"].as_str().map(str::to_string),
            Err(e) => {
                log::debug!("No package version available: {}", e);
                None
            }
        }
    }

    async fn set_version(&self, version: &str) -> Result<String> {
        let npm = which::which("npm").map_err(|e| VersionError::SetFailed {
            reason: format!("npm not found: {}", e),
        })?;

        log::debug!("Running `npm version --allow-same-version {}`", version);
        let output = Command::new(npm)
            .args(["version", "--allow-same-version", version])
            .current_dir(&self.work_dir)
            .output()
            .await
            .map_err(|e| VersionError::SetFailed {
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(VersionError::SetFailed {
                reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_reads_version_from_package_json() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        std::fs::write(
            dir.path().join("package.json"),
            r#"{ "name": "shop", "version": "4.1.0" }"#,
        )
        .unwrap();

        let package = NpmPackage::new(dir.path());
        assert_eq!(package.read_current_version().as_deref(), Some("4.1.0"));
    }

    #[test]
    fn test_missing_manifest_has_no_version() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        assert_eq!(NpmPackage::new(dir.path()).read_current_version(), None);
    }

    #[test]
    fn test_manifest_without_version_field() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        std::fs::write(dir.path().join("package.json"), r#"{ "private": true }"#).unwrap();
        assert_eq!(NpmPackage::new(dir.path()).read_current_version(), None);
    }
}
