//! Property and children descriptions consumed by [`build`](crate::build).

use core::fmt;
use std::rc::Rc;

use crate::dom::{Event, Listener};

/// Inline style entries, applied one property at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Style(Vec<(String, String)>);

impl Style {
    /// Creates an empty style mapping.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Adds one property. Names are passed to the backend unchanged.
    #[must_use]
    pub fn set(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.push((name.into(), value.into()));
        self
    }

    /// Iterates over the entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Returns `true` when no property is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn css_text(&self) -> String {
        self.iter()
            .map(|(name, value)| format!("{name}: {value}"))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Style {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        )
    }
}

/// Value of a single property.
pub enum PropValue<N> {
    /// A string.
    Str(String),
    /// A number, stringified the way JavaScript does.
    Number(f64),
    /// A boolean.
    Bool(bool),
    /// A style mapping.
    Style(Style),
    /// A callable. Only `on*` keys turn it into an event listener.
    Handler(Listener<N>),
}

impl<N> PropValue<N> {
    /// String form used for attributes, class names and `value`.
    ///
    /// Handlers have no string form.
    #[must_use]
    pub fn text(&self) -> Option<String> {
        match self {
            Self::Str(value) => Some(value.clone()),
            Self::Number(value) => Some(format_number(*value)),
            Self::Bool(value) => Some(value.to_string()),
            Self::Style(style) => Some(style.css_text()),
            Self::Handler(_) => None,
        }
    }

    /// JavaScript truthiness: `false`, `0`, `NaN` and `""` are falsy.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Str(value) => !value.is_empty(),
            Self::Number(value) => *value != 0.0 && !value.is_nan(),
            Self::Bool(value) => *value,
            Self::Style(_) | Self::Handler(_) => true,
        }
    }
}

impl<N> Clone for PropValue<N> {
    fn clone(&self) -> Self {
        match self {
            Self::Str(value) => Self::Str(value.clone()),
            Self::Number(value) => Self::Number(*value),
            Self::Bool(value) => Self::Bool(*value),
            Self::Style(style) => Self::Style(style.clone()),
            Self::Handler(handler) => Self::Handler(Rc::clone(handler)),
        }
    }
}

impl<N> fmt::Debug for PropValue<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(value) => f.debug_tuple("Str").field(value).finish(),
            Self::Number(value) => f.debug_tuple("Number").field(value).finish(),
            Self::Bool(value) => f.debug_tuple("Bool").field(value).finish(),
            Self::Style(style) => f.debug_tuple("Style").field(style).finish(),
            Self::Handler(_) => f.write_str("Handler(..)"),
        }
    }
}

impl<N> From<&str> for PropValue<N> {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl<N> From<String> for PropValue<N> {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl<N> From<&String> for PropValue<N> {
    fn from(value: &String) -> Self {
        Self::Str(value.clone())
    }
}

impl<N> From<bool> for PropValue<N> {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl<N> From<f64> for PropValue<N> {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

macro_rules! impl_number_prop {
    ($($ty:ty),*) => {
        $(
            impl<N> From<$ty> for PropValue<N> {
                fn from(value: $ty) -> Self {
                    Self::Number(f64::from(value))
                }
            }
        )*
    };
}

impl_number_prop!(i8, i16, i32, u8, u16, u32, f32);

impl<N> From<Style> for PropValue<N> {
    fn from(value: Style) -> Self {
        Self::Style(value)
    }
}

/// Ordered property list for one element.
///
/// Keys keep their insertion order; every key is interpreted independently.
pub struct Props<N> {
    entries: Vec<(String, PropValue<N>)>,
}

impl<N> Props<N> {
    /// Creates an empty property list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Adds a plain value under `key`.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<PropValue<N>>) -> Self {
        self.entries.push((key.into(), value.into()));
        self
    }

    /// Adds a callable under `key`. Use `on`-prefixed keys (`"onClick"`) for listeners.
    #[must_use]
    pub fn handler(
        mut self,
        key: impl Into<String>,
        handler: impl Fn(&Event<N>) + 'static,
    ) -> Self {
        self.entries.push((key.into(), PropValue::Handler(Rc::new(handler))));
        self
    }

    /// Shorthand for `with("class", class)`.
    #[must_use]
    pub fn class(self, class: impl Into<String>) -> Self {
        self.with("class", PropValue::Str(class.into()))
    }

    /// Shorthand for `with("style", style)`.
    #[must_use]
    pub fn style(self, style: Style) -> Self {
        self.with("style", PropValue::Style(style))
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no property is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue<N>)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }
}

impl<N> Default for Props<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> fmt::Debug for Props<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(key, value)| (key, value)))
            .finish()
    }
}

impl<N> IntoIterator for Props<N> {
    type Item = (String, PropValue<N>);
    type IntoIter = std::vec::IntoIter<(String, PropValue<N>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// One entry of a children list.
#[derive(Debug, Clone, PartialEq)]
pub enum Child<N> {
    /// An already constructed node, appended as-is.
    Node(N),
    /// Text appended as a text node.
    Text(String),
    /// Skipped. Stands in for absent children.
    Empty,
}

impl<N> From<&str> for Child<N> {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl<N> From<String> for Child<N> {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<N> From<f64> for Child<N> {
    fn from(value: f64) -> Self {
        Self::Text(format_number(value))
    }
}

impl<N, T: Into<Child<N>>> From<Option<T>> for Child<N> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Empty, Into::into)
    }
}

/// Content of a built element.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Children<N> {
    /// No content.
    #[default]
    None,
    /// Sets the element's text content.
    Text(String),
    /// Walked in order and appended.
    List(Vec<Child<N>>),
}

impl<N> From<()> for Children<N> {
    fn from((): ()) -> Self {
        Self::None
    }
}

impl<N> From<&str> for Children<N> {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl<N> From<String> for Children<N> {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<N> From<&String> for Children<N> {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

impl<N> From<f64> for Children<N> {
    fn from(value: f64) -> Self {
        Self::Text(format_number(value))
    }
}

macro_rules! impl_number_children {
    ($($ty:ty),*) => {
        $(
            impl<N> From<$ty> for Children<N> {
                fn from(value: $ty) -> Self {
                    Self::Text(value.to_string())
                }
            }
        )*
    };
}

impl_number_children!(i32, i64, u32, u64, usize);

impl<N, T: Into<Child<N>>> From<Vec<T>> for Children<N> {
    fn from(value: Vec<T>) -> Self {
        Self::List(value.into_iter().map(Into::into).collect())
    }
}

/// Formats a number the way JavaScript's `String(n)` does for common values.
#[must_use]
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_owned()
    } else if value.is_infinite() {
        let sign = if value > 0.0 { "" } else { "-" };
        format!("{sign}Infinity")
    } else if value == 0.0 {
        "0".to_owned()
    } else if value.fract() == 0.0 && value.abs() < 1e21 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}
