use std::fs;

use miniframe_cli::{
    MANIFEST_FILE,
    create::{CreateOptions, ScaffoldError, create},
    manifest::Manifest,
};
use tempfile::TempDir;

fn options(dir: &TempDir, name: &str) -> CreateOptions {
    CreateOptions {
        name: name.to_string(),
        directory: Some(dir.path().join("project")),
        force: false,
    }
}

#[test]
fn scaffolds_the_full_layout() {
    let dir = TempDir::new().unwrap();
    let report = create(&options(&dir, "Todo App")).unwrap();
    let root = dir.path().join("project");

    for file in [
        "Cargo.toml",
        "index.html",
        "src/lib.rs",
        "src/pages/index.rs",
        "src/components/mod.rs",
        "README.md",
        ".gitignore",
        "dist/.gitkeep",
        MANIFEST_FILE,
    ] {
        assert!(root.join(file).is_file(), "missing {file}");
    }
    assert_eq!(report.files.len(), 9);

    let cargo = fs::read_to_string(root.join("Cargo.toml")).unwrap();
    assert!(cargo.contains("name = \"todo-app\""));
    let html = fs::read_to_string(root.join("index.html")).unwrap();
    assert!(html.contains("./dist/todo_app.js"));
    assert!(html.contains("<title>Todo App</title>"));
}

#[test]
fn writes_a_manifest_that_reads_back() {
    let dir = TempDir::new().unwrap();
    create(&options(&dir, "demo")).unwrap();

    let manifest = Manifest::open(dir.path().join("project").join(MANIFEST_FILE)).unwrap();
    assert_eq!(manifest.package.name, "demo");
    assert_eq!(manifest.package.crate_name, "demo");
    assert_eq!(manifest.app.root, "#app");
    assert_eq!(manifest.app.out_dir, "dist");
}

#[test]
fn refuses_non_empty_directories_without_force() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("project");
    fs::create_dir_all(&root).unwrap();
    fs::write(root.join("notes.txt"), "keep me").unwrap();

    let err = create(&options(&dir, "demo")).unwrap_err();
    assert!(matches!(err, ScaffoldError::DirectoryNotEmpty(_)));
    assert!(!root.join("Cargo.toml").exists());

    let mut forced = options(&dir, "demo");
    forced.force = true;
    create(&forced).unwrap();
    assert!(root.join("Cargo.toml").is_file());
    assert_eq!(fs::read_to_string(root.join("notes.txt")).unwrap(), "keep me");
}

#[test]
fn invalid_names_write_nothing() {
    let dir = TempDir::new().unwrap();
    let err = create(&options(&dir, "123")).unwrap_err();
    assert!(matches!(err, ScaffoldError::InvalidName(_)));
    assert!(!dir.path().join("project").exists());
}
