//! The `miniframe.toml` project manifest.

use std::{fs, io, path::Path};

use serde::{Deserialize, Serialize};

/// Configuration for a `MiniFrame` project persisted to `miniframe.toml`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Manifest {
    /// Names of the generated crate.
    pub package: Package,
    /// Mount and build settings.
    #[serde(default)]
    pub app: App,
}

/// The `[package]` table.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Package {
    /// Package name (e.g., `my-app`).
    pub name: String,
    /// Rust crate name (e.g., `my_app`).
    #[serde(rename = "crate")]
    pub crate_name: String,
}

/// How the application is mounted and built.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct App {
    /// Selector of the mount point in `index.html`.
    #[serde(default = "default_root")]
    pub root: String,
    /// Directory receiving the wasm-pack output.
    #[serde(default = "default_out_dir")]
    pub out_dir: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            root: default_root(),
            out_dir: default_out_dir(),
        }
    }
}

fn default_root() -> String {
    "#app".to_string()
}

fn default_out_dir() -> String {
    "dist".to_string()
}

/// Errors raised while loading or saving a [`Manifest`].
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    /// The file exists but could not be read.
    #[error("Failed to read manifest file: {0}")]
    Read(#[source] io::Error),
    /// The file could not be written.
    #[error("Failed to write manifest file: {0}")]
    Write(#[source] io::Error),
    /// The file is not a valid manifest.
    #[error("Invalid manifest file: {0}")]
    Invalid(#[from] toml::de::Error),
    /// The manifest could not be encoded as TOML.
    #[error("Failed to serialize manifest: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// No file at the given path.
    #[error("Manifest file not found at the specified path")]
    NotFound,
}

impl Manifest {
    /// Creates a manifest with default app settings.
    #[must_use]
    pub fn new(name: impl Into<String>, crate_name: impl Into<String>) -> Self {
        Self {
            package: Package {
                name: name.into(),
                crate_name: crate_name.into(),
            },
            app: App::default(),
        }
    }

    /// Reads a manifest from disk.
    ///
    /// # Errors
    /// Returns [`ManifestError::NotFound`] when the file is missing, or a read
    /// or parse error.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        match fs::read_to_string(path.as_ref()) {
            Ok(content) => Ok(toml::from_str(&content)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(ManifestError::NotFound),
            Err(e) => Err(ManifestError::Read(e)),
        }
    }

    /// Writes the manifest to disk.
    ///
    /// # Errors
    /// Returns an error if serialization or the write fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ManifestError> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path.as_ref(), content).map_err(ManifestError::Write)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_app_section_uses_defaults() {
        let manifest: Manifest = toml::from_str(
            r#"
            [package]
            name = "demo"
            crate = "demo"
            "#,
        )
        .unwrap();
        assert_eq!(manifest.app, App::default());
        assert_eq!(manifest.app.root, "#app");
    }

    #[test]
    fn crate_name_is_serialized_as_crate() {
        let text = toml::to_string(&Manifest::new("my-app", "my_app")).unwrap();
        assert!(text.contains("crate = \"my_app\""));
    }
}
