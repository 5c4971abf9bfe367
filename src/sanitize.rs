use crate::components::EDITOR_CLASSES;
use crate::dom::{Element, Node};

/// Properties that are dropped whatever their value.
const STRIPPED_PROPERTIES: &[&str] = &[
    "min-height",
    "justify-content",
    "align-items",
    "flex-direction",
];

/// Sanitize every element in `nodes`, at any depth.
///
/// Each element is cleaned on its own; nothing carries over between
/// siblings or from parent to child.
pub fn sanitize(nodes: &mut [Node]) {
    for node in nodes.iter_mut() {
        if let Node::Element(element) = node {
            sanitize_element(element);
            sanitize(&mut element.children);
        }
    }
}

/// Clean one element's attributes in place.
pub fn sanitize_element(element: &mut Element) {
    element
        .attrs
        .retain(|name, _| !name.starts_with("data-") && name.as_str() != "id");

    if element.attr("class").is_some() {
        let kept: Vec<&str> = element
            .classes()
            .filter(|class| !EDITOR_CLASSES.contains(class))
            .collect();
        if kept.is_empty() {
            element.remove_attr("class");
        } else {
            let class = kept.join(" ");
            element.set_attr("class", class);
        }
    }

    if element.attr("style").is_some() {
        let mut style = element.style();
        style.retain(|key, value| !is_editor_declaration(key, value));
        element.set_style(&style);
    }
}

/// Whether `key: value` only serves the editor canvas.
fn is_editor_declaration(key: &str, value: &str) -> bool {
    let value = value.to_ascii_lowercase();
    match key {
        "border" | "border-style" => value.contains("dashed"),
        "display" => value.split_whitespace().next() == Some("flex"),
        _ => STRIPPED_PROPERTIES.contains(&key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{parse_fragment, serialize};
    use pretty_assertions::assert_eq;

    fn sanitized(html: &str) -> String {
        let mut nodes = parse_fragment(html).unwrap();
        sanitize(&mut nodes);
        serialize(&nodes)
    }

    #[test]
    fn test_data_attributes_and_id_are_removed() {
        assert_eq!(
            sanitized(r#"<div id="x" data-id="c1" data-type="text" title="t">a</div>"#),
            r#"<div title="t">a</div>"#
        );
    }

    #[test]
    fn test_editor_classes_are_removed() {
        assert_eq!(
            sanitized(r#"<div class="editable-component selected promo">a</div>"#),
            r#"<div class="promo">a</div>"#
        );
        assert_eq!(
            sanitized(r#"<span class="text-content drag-over">a</span>"#),
            "<span>a</span>"
        );
    }

    #[test]
    fn test_editor_layout_styles_are_removed() {
        assert_eq!(
            sanitized(
                r#"<div style="display: flex; justify-content: center; align-items: center; flex-direction: column; min-height: 50px; border: 2px Dashed #ccc; color: red">a</div>"#
            ),
            r#"<div style="color: red">a</div>"#
        );
    }

    #[test]
    fn test_style_attribute_dropped_when_empty() {
        assert_eq!(
            sanitized(r#"<div style="border: 1px dashed #ccc; min-height: 100px;">a</div>"#),
            "<div>a</div>"
        );
    }

    #[test]
    fn test_divider_border_is_kept() {
        assert_eq!(
            sanitized(
                r#"<hr style="border: 0; border-top-style: dashed; border-top-color: #ccc; border-top-width: 1px">"#
            ),
            r#"<hr style="border: 0; border-top-style: dashed; border-top-color: #ccc; border-top-width: 1px">"#
        );
        assert_eq!(sanitized(r#"<p style="border-style: dashed">a</p>"#), "<p>a</p>");
    }

    #[test]
    fn test_non_flex_display_is_kept() {
        assert_eq!(
            sanitized(r#"<a style="display: inline-block">a</a>"#),
            r#"<a style="display: inline-block">a</a>"#
        );
    }

    #[test]
    fn test_nested_elements_are_sanitized_independently() {
        assert_eq!(
            sanitized(
                r#"<div class="column" data-x="1"><p class="row note" style="min-height: 1px">a</p><p id="keep-no">b</p></div>"#
            ),
            r#"<div><p class="note">a</p><p>b</p></div>"#
        );
    }
}
