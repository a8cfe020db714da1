use std::path::Path;

use miniframe_cli::{
    output::OutputFormat,
    todomvc::{DEFAULT_DIRECTORY, TodomvcOptions, plan},
};

#[test]
fn the_bundled_demo_is_ready_to_serve() {
    let workspace = Path::new(env!("CARGO_MANIFEST_DIR")).join("..");
    let report = plan(&TodomvcOptions {
        directory: workspace.join(DEFAULT_DIRECTORY),
        ..TodomvcOptions::default()
    })
    .unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&OutputFormat::Json.render(&report).unwrap()).unwrap();
    assert_eq!(json["url"], "http://localhost:3000/");
    assert_eq!(json["steps"][0]["program"], "wasm-pack");
    assert_eq!(json["steps"][1]["args"][3], "3000");
}
