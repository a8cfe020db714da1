use core::fmt;

use miniframe_core::{DomError, InitError};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::DomException;

/// Error type produced by the web backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebError {
    /// The DOM APIs are not accessible (e.g., when executed outside of a browser).
    DomUnavailable,
    /// The render loop could not start.
    Init(InitError),
    /// Wrapper around JavaScript exceptions.
    Js(String),
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DomUnavailable => write!(f, "DOM is not available"),
            Self::Init(error) => write!(f, "failed to start MiniFrame: {error}"),
            Self::Js(msg) => write!(f, "JavaScript error: {msg}"),
        }
    }
}

impl std::error::Error for WebError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Init(error) => Some(error),
            _ => None,
        }
    }
}

impl From<InitError> for WebError {
    fn from(value: InitError) -> Self {
        Self::Init(value)
    }
}

impl From<JsValue> for WebError {
    fn from(value: JsValue) -> Self {
        Self::Js(js_message(&value))
    }
}

impl From<WebError> for JsValue {
    fn from(value: WebError) -> Self {
        Self::from(value.to_string())
    }
}

/// Maps a thrown `DOMException` to the matching [`DomError`].
///
/// `subject` is the tag, attribute name or selector the call was made with.
pub(crate) fn dom_error(value: &JsValue, subject: &str) -> DomError {
    match value.dyn_ref::<DomException>() {
        Some(exception) => match exception.name().as_str() {
            "InvalidCharacterError" => DomError::InvalidCharacter(subject.to_owned()),
            "SyntaxError" => DomError::Syntax(subject.to_owned()),
            "HierarchyRequestError" => DomError::Hierarchy(exception.message()),
            _ => DomError::Js(exception.message()),
        },
        None => DomError::Js(js_message(value)),
    }
}

fn js_message(value: &JsValue) -> String {
    value
        .as_string()
        .unwrap_or_else(|| format!("{value:?}"))
}
