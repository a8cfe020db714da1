//! `miniframe todomvc`: build and serve the `TodoMVC` demo.
//!
//! The demo is compiled with `wasm-pack` into `pkg/` next to its
//! `index.html`, then the directory is served over HTTP. [`plan`] checks the
//! directory and lists both steps; [`run`] executes them in order.

use std::{
    fmt::Write as _,
    io,
    path::{Path, PathBuf},
    process::{Command, ExitStatus},
};

use serde::Serialize;
use tracing::info;

use crate::output::Report;

/// Location of the demo relative to the workspace root.
pub const DEFAULT_DIRECTORY: &str = "demos/todomvc";

/// Port the static server listens on.
pub const DEFAULT_PORT: u16 = 3000;

/// Files a demo directory must contain.
const REQUIRED: [&str; 2] = ["Cargo.toml", "index.html"];

/// Options for [`plan`].
#[derive(Debug, Clone)]
pub struct TodomvcOptions {
    /// Directory holding the demo crate and its `index.html`.
    pub directory: PathBuf,
    /// Port for the static server.
    pub port: u16,
}

impl Default for TodomvcOptions {
    fn default() -> Self {
        Self {
            directory: PathBuf::from(DEFAULT_DIRECTORY),
            port: DEFAULT_PORT,
        }
    }
}

/// One external command, run inside the demo directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Step {
    /// Executable looked up on `PATH`.
    pub program: String,
    /// Arguments passed as is.
    pub args: Vec<String>,
}

impl Step {
    fn new(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_owned(),
            args: args.iter().map(ToString::to_string).collect(),
        }
    }

    /// The step as it would be typed in a shell.
    #[must_use]
    pub fn command_line(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

/// What `miniframe todomvc` does, in order.
#[derive(Debug, Clone, Serialize)]
pub struct TodomvcReport {
    /// Demo directory the steps run in.
    pub directory: PathBuf,
    /// Address of the running demo.
    pub url: String,
    /// Build step first, then the server.
    pub steps: Vec<Step>,
}

impl Report for TodomvcReport {
    fn human(&self) -> String {
        let mut text = format!("From {}:\n", self.directory.display());
        for step in &self.steps {
            let _ = writeln!(text, "  {}", step.command_line());
        }
        let _ = write!(text, "\nthen open {}", self.url);
        text
    }
}

/// Errors raised by [`plan`] and [`run`].
#[derive(Debug, thiserror::Error)]
pub enum TodomvcError {
    /// The directory lacks `file`, so it is not the demo.
    #[error("{} is not the TodoMVC demo (missing {file})", directory.display())]
    NotADemo {
        /// Directory that was checked.
        directory: PathBuf,
        /// First required file that is missing.
        file: &'static str,
    },
    /// The program could not be started.
    #[error("failed to start `{program}`: {source}")]
    Spawn {
        /// Executable of the failed step.
        program: String,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// The program ran and reported failure.
    #[error("`{program}` exited with {status}")]
    Failed {
        /// Executable of the failed step.
        program: String,
        /// Exit status it reported.
        status: ExitStatus,
    },
}

/// Checks the demo directory and lists the build and serve steps.
///
/// # Errors
/// Fails when the directory has no `Cargo.toml` or no `index.html`.
pub fn plan(options: &TodomvcOptions) -> Result<TodomvcReport, TodomvcError> {
    let directory = &options.directory;
    if let Some(file) = REQUIRED
        .into_iter()
        .find(|file| !directory.join(file).is_file())
    {
        return Err(TodomvcError::NotADemo {
            directory: directory.clone(),
            file,
        });
    }

    let port = options.port.to_string();
    Ok(TodomvcReport {
        directory: directory.clone(),
        url: format!("http://localhost:{port}/"),
        steps: vec![
            Step::new("wasm-pack", &["build", "--target", "web", "--features", "web"]),
            Step::new("npx", &["serve", ".", "-p", &port]),
        ],
    })
}

/// Runs every step of `report` in its directory, stopping at the first failure.
///
/// The server step keeps running until it is interrupted.
///
/// # Errors
/// Fails when a step cannot be started or exits unsuccessfully.
pub fn run(report: &TodomvcReport) -> Result<(), TodomvcError> {
    for step in &report.steps {
        info!(command = %step.command_line(), "running");
        execute(step, &report.directory)?;
    }
    Ok(())
}

fn execute(step: &Step, directory: &Path) -> Result<(), TodomvcError> {
    let status = Command::new(&step.program)
        .args(&step.args)
        .current_dir(directory)
        .status()
        .map_err(|source| TodomvcError::Spawn {
            program: step.program.clone(),
            source,
        })?;
    if status.success() {
        Ok(())
    } else {
        Err(TodomvcError::Failed {
            program: step.program.clone(),
            status,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn demo_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        for file in REQUIRED {
            fs::write(dir.path().join(file), "").unwrap();
        }
        dir
    }

    #[test]
    fn plan_builds_then_serves_on_the_port() {
        let dir = demo_dir();
        let report = plan(&TodomvcOptions {
            directory: dir.path().to_path_buf(),
            port: 8080,
        })
        .unwrap();

        let lines: Vec<_> = report.steps.iter().map(Step::command_line).collect();
        assert_eq!(
            lines,
            [
                "wasm-pack build --target web --features web",
                "npx serve . -p 8080"
            ]
        );
        assert_eq!(report.url, "http://localhost:8080/");
        assert!(report.human().ends_with("then open http://localhost:8080/"));
    }

    #[test]
    fn directories_without_the_page_are_rejected() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Cargo.toml"), "").unwrap();

        let error = plan(&TodomvcOptions {
            directory: dir.path().to_path_buf(),
            port: DEFAULT_PORT,
        })
        .unwrap_err();
        assert!(matches!(error, TodomvcError::NotADemo { file: "index.html", .. }));
    }

    #[test]
    fn run_stops_at_a_step_that_cannot_start() {
        let dir = demo_dir();
        let report = TodomvcReport {
            directory: dir.path().to_path_buf(),
            url: String::new(),
            steps: vec![
                Step::new("miniframe-no-such-program", &[]),
                Step::new("wasm-pack", &["build"]),
            ],
        };

        match run(&report) {
            Err(TodomvcError::Spawn { program, .. }) => {
                assert_eq!(program, "miniframe-no-such-program");
            }
            other => panic!("expected a spawn error, got {other:?}"),
        }
    }
}
