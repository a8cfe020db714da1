//! `MiniFrame` CLI library
//!
//! The `miniframe` binary is a thin clap frontend over these modules:
//!
//! - [`create`] scaffolds a new project directory,
//! - [`template`] renders the embedded `.tpl` files,
//! - [`manifest`] reads and writes `miniframe.toml`,
//! - [`todomvc`] builds and serves the `TodoMVC` demo,
//! - [`output`] switches between human and JSON output.

pub mod create;
pub mod manifest;
pub mod output;
pub mod template;
pub mod todomvc;

/// Version of the framework written into generated `Cargo.toml` files.
pub const MINIFRAME_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Name of the manifest file at a project root.
pub const MANIFEST_FILE: &str = "miniframe.toml";
