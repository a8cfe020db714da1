//! Embedded project templates.
//!
//! Files under `templates/project` are compiled into the binary. Placeholders
//! look like `__KEY__` and are replaced from a [`TemplateContext`].

use include_dir::{Dir, include_dir};

static PROJECT: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/templates/project");

/// Values substituted into templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateContext {
    /// Package name as typed by the user, kebab-cased (e.g. `my-app`).
    pub project_name: String,
    /// Rust crate name (e.g. `my_app`), also the stem of the wasm-pack output.
    pub crate_name: String,
    /// Human readable title (e.g. `My App`).
    pub title: String,
    /// Framework version requirement.
    pub miniframe_version: String,
}

impl TemplateContext {
    /// Render a template string by replacing all placeholders.
    #[must_use]
    pub fn render(&self, template: &str) -> String {
        template
            .replace("__PROJECT_NAME__", &self.project_name)
            .replace("__CRATE_NAME__", &self.crate_name)
            .replace("__TITLE__", &self.title)
            .replace("__MINIFRAME_VERSION__", &self.miniframe_version)
    }
}

/// Returns the raw contents of the embedded template `name`.
#[must_use]
pub fn source(name: &str) -> Option<&'static str> {
    PROJECT.get_file(name).and_then(|file| file.contents_utf8())
}

/// Names of all embedded templates.
pub fn names() -> impl Iterator<Item = &'static str> {
    PROJECT
        .files()
        .filter_map(|file| file.path().to_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> TemplateContext {
        TemplateContext {
            project_name: "my-app".into(),
            crate_name: "my_app".into(),
            title: "My App".into(),
            miniframe_version: "0.1.0".into(),
        }
    }

    #[test]
    fn replaces_every_placeholder() {
        let rendered =
            context().render("__PROJECT_NAME__/__CRATE_NAME__/__TITLE__/__MINIFRAME_VERSION__");
        assert_eq!(rendered, "my-app/my_app/My App/0.1.0");
    }

    #[test]
    fn rendered_templates_have_no_leftover_placeholders() {
        for name in names() {
            let rendered = context().render(source(name).unwrap());
            assert!(
                !rendered.contains("__PROJECT_NAME__") && !rendered.contains("__CRATE_NAME__"),
                "{name} still has placeholders"
            );
        }
    }

    #[test]
    fn index_html_has_the_mount_point() {
        let html = source("index.html.tpl").unwrap();
        assert!(html.contains(r#"<div id="app"></div>"#));
    }
}
