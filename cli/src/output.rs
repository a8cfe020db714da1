//! Human or JSON rendering of command results.

use serde::Serialize;

/// A command result printable in either format.
pub trait Report: Serialize {
    /// Text shown to a person at a terminal.
    fn human(&self) -> String;
}

/// Selected with the global `--json` flag.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub enum OutputFormat {
    /// Plain text for a terminal.
    #[default]
    Human,
    /// One JSON object per command.
    Json,
}

impl OutputFormat {
    /// Maps the `--json` flag to a format.
    #[must_use]
    pub const fn from_json_flag(json: bool) -> Self {
        if json { Self::Json } else { Self::Human }
    }

    /// Renders `report` as one line of JSON or as its human text.
    ///
    /// # Errors
    /// Returns an error if the report cannot be serialized.
    pub fn render<R: Report>(self, report: &R) -> serde_json::Result<String> {
        match self {
            Self::Human => Ok(report.human()),
            Self::Json => serde_json::to_string(report),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Done {
        files: usize,
    }

    impl Report for Done {
        fn human(&self) -> String {
            format!("{} files", self.files)
        }
    }

    #[test]
    fn renders_both_formats() {
        let done = Done { files: 3 };
        assert_eq!(OutputFormat::Human.render(&done).unwrap(), "3 files");
        assert_eq!(OutputFormat::Json.render(&done).unwrap(), r#"{"files":3}"#);
        assert_eq!(OutputFormat::from_json_flag(true), OutputFormat::Json);
    }
}
