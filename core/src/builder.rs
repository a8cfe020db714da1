//! The element builder.

use tracing::trace;

use crate::{
    dom::Dom,
    error::DomError,
    props::{Child, Children, PropValue, Props},
};

/// Builds one element from a `(tag, props, children)` description.
///
/// Every property key gets exactly one interpretation, checked in this order:
///
/// 1. `on*` key with a handler: event listener for the lower-cased remainder
///    (`onClick` listens to `click`).
/// 2. `class` / `className`: the class attribute.
/// 3. `style` with a [`Style`](crate::Style): each property assigned on its own.
/// 4. `checked` with a boolean: the live checked state.
/// 5. `value`: the live value property.
/// 6. `autofocus` when truthy: the autofocus flag.
/// 7. anything else that is not a handler: a string attribute.
/// 8. remaining handlers are ignored.
///
/// Text children replace the element's content; list children are appended
/// in order with [`Child::Empty`] entries skipped.
///
/// # Errors
///
/// Propagates the backend's error for invalid tag or attribute names. Nothing
/// is validated up front.
pub fn build<D: Dom>(
    dom: &D,
    tag: &str,
    props: Props<D::Node>,
    children: impl Into<Children<D::Node>>,
) -> Result<D::Node, DomError> {
    let element = dom.create_element(tag)?;

    for (key, value) in props {
        apply_prop(dom, &element, &key, value)?;
    }

    match children.into() {
        Children::None => {}
        Children::Text(text) => dom.set_text_content(&element, &text),
        Children::List(children) => {
            for child in children {
                match child {
                    Child::Empty => {}
                    Child::Text(text) => {
                        let node = dom.create_text_node(&text);
                        dom.append_child(&element, &node)?;
                    }
                    Child::Node(node) => dom.append_child(&element, &node)?,
                }
            }
        }
    }

    Ok(element)
}

fn apply_prop<D: Dom>(
    dom: &D,
    element: &D::Node,
    key: &str,
    value: PropValue<D::Node>,
) -> Result<(), DomError> {
    match (key, value) {
        (key, PropValue::Handler(listener)) if key.starts_with("on") => {
            let event = event_name(key);
            trace!(%event, "attaching listener");
            dom.add_event_listener(element, &event, listener);
        }
        ("class" | "className", value) => {
            if let Some(class) = value.text() {
                dom.set_class_name(element, &class);
            }
        }
        ("style", PropValue::Style(style)) => {
            for (name, value) in style.iter() {
                dom.set_style_property(element, name, value)?;
            }
        }
        ("checked", PropValue::Bool(checked)) => dom.set_checked(element, checked),
        ("value", value) => {
            if let Some(value) = value.text() {
                dom.set_value(element, &value);
            }
        }
        ("autofocus", value) if value.is_truthy() => dom.set_autofocus(element, true),
        (_, PropValue::Handler(_)) => trace!(%key, "ignoring non-listener callable"),
        (key, value) => {
            if let Some(text) = value.text() {
                dom.set_attribute(element, key, &text)?;
            }
        }
    }
    Ok(())
}

fn event_name(key: &str) -> String {
    key[2..].to_lowercase()
}

#[cfg(all(test, feature = "headless"))]
mod tests {
    use std::{cell::Cell, rc::Rc};

    use super::*;
    use crate::{
        dom::Event,
        headless::HeadlessDom,
        props::Style,
    };

    #[test]
    fn on_prefixed_handler_becomes_listener_not_attribute() {
        let dom = HeadlessDom::new();
        let clicks = Rc::new(Cell::new(0));
        let counter = Rc::clone(&clicks);
        let button = build(
            &dom,
            "button",
            Props::new().handler("onClick", move |_| counter.set(counter.get() + 1)),
            "go",
        )
        .unwrap();

        assert_eq!(dom.attribute(&button, "onClick"), None);
        assert_eq!(dom.attribute(&button, "click"), None);
        dom.dispatch(&button, Event::new("click", button));
        assert_eq!(clicks.get(), 1);
    }

    #[test]
    fn on_prefixed_string_is_an_attribute() {
        let dom = HeadlessDom::new();
        let node = build(&dom, "div", Props::new().with("onClick", "noop()"), ()).unwrap();
        assert_eq!(dom.attribute(&node, "onClick").as_deref(), Some("noop()"));
    }

    #[test]
    fn class_and_class_name_set_class() {
        let dom = HeadlessDom::new();
        let a = build(&dom, "div", Props::new().with("class", "a"), ()).unwrap();
        let b = build(&dom, "div", Props::new().with("className", "b"), ()).unwrap();
        assert_eq!(dom.attribute(&a, "class").as_deref(), Some("a"));
        assert_eq!(dom.attribute(&b, "class").as_deref(), Some("b"));
        assert_eq!(dom.attribute(&b, "className"), None);
    }

    #[test]
    fn style_properties_merge() {
        let dom = HeadlessDom::new();
        let node = build(
            &dom,
            "div",
            Props::new()
                .style(Style::new().set("color", "red"))
                .style(Style::new().set("margin", "0")),
            (),
        )
        .unwrap();
        assert_eq!(dom.style(&node, "color").as_deref(), Some("red"));
        assert_eq!(dom.style(&node, "margin").as_deref(), Some("0"));
        assert_eq!(dom.attribute(&node, "style"), None);
    }

    #[test]
    fn string_style_falls_back_to_attribute() {
        let dom = HeadlessDom::new();
        let node = build(&dom, "div", Props::new().with("style", "color: red"), ()).unwrap();
        assert_eq!(dom.attribute(&node, "style").as_deref(), Some("color: red"));
        assert_eq!(dom.style(&node, "color"), None);
    }

    #[test]
    fn checked_and_value_are_live_properties() {
        let dom = HeadlessDom::new();
        let node = build(
            &dom,
            "input",
            Props::new()
                .with("type", "checkbox")
                .with("checked", true)
                .with("value", 42),
            (),
        )
        .unwrap();
        assert!(dom.checked(&node));
        assert_eq!(dom.attribute(&node, "checked"), None);
        assert_eq!(dom.value(&node).as_deref(), Some("42"));
        assert_eq!(dom.attribute(&node, "value"), None);
    }

    #[test]
    fn non_boolean_checked_is_an_attribute() {
        let dom = HeadlessDom::new();
        let node = build(&dom, "input", Props::new().with("checked", "yes"), ()).unwrap();
        assert!(!dom.checked(&node));
        assert_eq!(dom.attribute(&node, "checked").as_deref(), Some("yes"));
    }

    #[test]
    fn autofocus_only_when_truthy() {
        let dom = HeadlessDom::new();
        let on = build(&dom, "input", Props::new().with("autofocus", true), ()).unwrap();
        let off = build(&dom, "input", Props::new().with("autofocus", false), ()).unwrap();
        assert!(dom.autofocus(&on));
        assert_eq!(dom.attribute(&on, "autofocus"), None);
        assert!(!dom.autofocus(&off));
        assert_eq!(dom.attribute(&off, "autofocus").as_deref(), Some("false"));
    }

    #[test]
    fn other_callables_are_ignored() {
        let dom = HeadlessDom::new();
        let node = build(&dom, "div", Props::new().handler("title", |_| {}), ()).unwrap();
        assert_eq!(dom.attribute(&node, "title"), None);
    }

    #[test]
    fn numbers_become_attribute_strings() {
        let dom = HeadlessDom::new();
        let node = build(&dom, "td", Props::new().with("colspan", 2), ()).unwrap();
        assert_eq!(dom.attribute(&node, "colspan").as_deref(), Some("2"));
    }

    #[test]
    fn text_children_overwrite_content() {
        let dom = HeadlessDom::new();
        let node = build(&dom, "p", Props::new(), 7).unwrap();
        assert_eq!(dom.outer_html(&node), "<p>7</p>");
    }

    #[test]
    fn list_children_skip_empty_entries() {
        let dom = HeadlessDom::new();
        let inner = build(&dom, "b", Props::new(), "bold").unwrap();
        let node = build(
            &dom,
            "p",
            Props::new(),
            vec![
                Child::Text("a ".into()),
                Child::Empty,
                Child::Node(inner),
                Child::from(1.5),
            ],
        )
        .unwrap();
        assert_eq!(dom.outer_html(&node), "<p>a <b>bold</b>1.5</p>");
    }

    #[test]
    fn invalid_tag_surfaces_backend_error() {
        let dom = HeadlessDom::new();
        let error = build(&dom, "1nope", Props::new(), ()).unwrap_err();
        assert_eq!(error, DomError::InvalidCharacter("1nope".into()));
    }
}
