//! `miniframe create`: scaffold a new project.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use heck::{ToKebabCase, ToSnakeCase, ToTitleCase};
use serde::Serialize;
use tracing::{debug, info};

use crate::{
    MANIFEST_FILE, MINIFRAME_VERSION,
    manifest::{Manifest, ManifestError},
    output::Report,
    template::{self, TemplateContext},
};

/// Template name and destination path, relative to the project root.
const LAYOUT: &[(&str, &str)] = &[
    ("Cargo.toml.tpl", "Cargo.toml"),
    ("index.html.tpl", "index.html"),
    ("lib.rs.tpl", "src/lib.rs"),
    ("index.rs.tpl", "src/pages/index.rs"),
    ("components.rs.tpl", "src/components/mod.rs"),
    ("README.md.tpl", "README.md"),
    ("gitignore.tpl", ".gitignore"),
];

/// Options for [`create`].
#[derive(Debug, Clone)]
pub struct CreateOptions {
    /// Project name as typed by the user.
    pub name: String,
    /// Target directory. Defaults to `./<kebab-name>`.
    pub directory: Option<PathBuf>,
    /// Write into a non-empty directory.
    pub force: bool,
}

/// Result of a successful scaffold.
#[derive(Debug, Clone, Serialize)]
pub struct CreateReport {
    /// Kebab-case project name.
    pub project_name: String,
    /// Snake-case crate name.
    pub crate_name: String,
    /// Directory the project was written to.
    pub directory: PathBuf,
    /// Written files, relative to `directory`.
    pub files: Vec<PathBuf>,
}

impl Report for CreateReport {
    fn human(&self) -> String {
        let directory = self.directory.display();
        format!(
            "Created {} in {directory}\n\n\
             Next steps:\n  \
             cd {directory}\n  \
             wasm-pack build --target web --out-dir dist\n  \
             serve the directory and open index.html",
            self.project_name
        )
    }
}

/// Errors raised by [`create`].
#[derive(Debug, thiserror::Error)]
pub enum ScaffoldError {
    /// The name has no usable characters or starts with a digit.
    #[error("`{0}` is not a valid project name")]
    InvalidName(String),
    /// The target directory already has content and `force` was not set.
    #[error("{} is not empty (use --force to write anyway)", .0.display())]
    DirectoryNotEmpty(PathBuf),
    /// A template listed in the layout was not embedded.
    #[error("template `{0}` is missing from the binary")]
    MissingTemplate(&'static str),
    /// Reading or writing `path` failed.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        /// File or directory being accessed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// The manifest could not be written.
    #[error(transparent)]
    Manifest(#[from] ManifestError),
}

/// Derives the template context from a user supplied name.
///
/// # Errors
/// Fails when the name has no usable characters or starts with a digit.
pub fn context_for(name: &str) -> Result<TemplateContext, ScaffoldError> {
    let project_name = name.to_kebab_case();
    let valid = project_name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic())
        && project_name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-');
    if !valid {
        return Err(ScaffoldError::InvalidName(name.to_string()));
    }

    Ok(TemplateContext {
        crate_name: project_name.to_snake_case(),
        title: project_name.to_title_case(),
        project_name,
        miniframe_version: MINIFRAME_VERSION.to_string(),
    })
}

/// Scaffolds a project.
///
/// The layout contains `index.html` with an `#app` mount point, a page under
/// `src/pages`, a component module, an empty `dist/` for build output and a
/// `miniframe.toml` manifest.
///
/// # Errors
/// Fails on an invalid name, a non-empty target without `force`, or I/O errors.
pub fn create(options: &CreateOptions) -> Result<CreateReport, ScaffoldError> {
    let context = context_for(&options.name)?;
    let directory = options
        .directory
        .clone()
        .unwrap_or_else(|| PathBuf::from(&context.project_name));

    if !options.force && !is_empty_dir(&directory)? {
        return Err(ScaffoldError::DirectoryNotEmpty(directory));
    }
    info!(name = %context.project_name, directory = %directory.display(), "creating project");

    let mut files = Vec::with_capacity(LAYOUT.len() + 2);
    for &(name, destination) in LAYOUT {
        let source = template::source(name).ok_or(ScaffoldError::MissingTemplate(name))?;
        let path = directory.join(destination);
        write(&path, &context.render(source))?;
        files.push(PathBuf::from(destination));
    }

    write(&directory.join("dist/.gitkeep"), "")?;
    files.push(PathBuf::from("dist/.gitkeep"));

    Manifest::new(&context.project_name, &context.crate_name).save(directory.join(MANIFEST_FILE))?;
    files.push(PathBuf::from(MANIFEST_FILE));

    Ok(CreateReport {
        project_name: context.project_name,
        crate_name: context.crate_name,
        directory,
        files,
    })
}

fn is_empty_dir(path: &Path) -> Result<bool, ScaffoldError> {
    match fs::read_dir(path) {
        Ok(mut entries) => Ok(entries.next().is_none()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(true),
        Err(source) => Err(ScaffoldError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn write(path: &Path, contents: &str) -> Result<(), ScaffoldError> {
    let io_err = |source| ScaffoldError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(path, contents).map_err(io_err)?;
    debug!(path = %path.display(), "wrote");
    Ok(())
}
