use crate::components::{
    is_component, Align, ComponentKind, EditableComponent, UnknownKind, TEXT_CONTENT_CLASS,
};
use crate::dom::{find_element_mut, Element, Node};
use crate::layout::{presentation_table, table_body};
use crate::style::{pixel_number, StyleMap};
use tracing::{debug, warn};

pub const BUTTON_BACKGROUND: &str = "#3498db";
pub const BUTTON_RADIUS: &str = "5px";
pub const BUTTON_PADDING: &str = "12px 25px";
pub const BUTTON_FONT_FAMILY: &str = "Arial, sans-serif";
pub const BUTTON_FONT_SIZE: &str = "16px";
pub const BUTTON_FONT_WEIGHT: &str = "bold";
pub const BUTTON_COLOR: &str = "#ffffff";

/// Declarations of a text component that belong on its content, not its cell.
const TEXT_FONT_PROPERTIES: &[&str] = &["font-family", "font-size", "color"];

/// Corner longhands in shorthand order.
const RADIUS_CORNERS: [&str; 4] = [
    "border-top-left-radius",
    "border-top-right-radius",
    "border-bottom-right-radius",
    "border-bottom-left-radius",
];

/// Nearest enclosing table cell, as seen while walking the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellScope {
    /// No cell, or a cell this pass did not create.
    Open,
    /// A cell created by this pass to wrap a component.
    Generated,
}

/// Wrap every component in `nodes` in document order, each in a one-cell
/// presentation table carrying its alignment, background and corner radius.
///
/// A component whose nearest enclosing cell was generated by this pass is
/// skipped, so content relocated into a wrapper is never wrapped twice.
pub fn render_components(nodes: &mut [Node]) {
    render_nodes(nodes, CellScope::Open, None);
}

fn render_nodes(nodes: &mut [Node], scope: CellScope, parent_align: Option<Align>) {
    for node in nodes.iter_mut() {
        let Node::Element(element) = node else {
            continue;
        };

        if scope == CellScope::Open && is_component(element) {
            match EditableComponent::from_element(element, parent_align) {
                Ok(component) => {
                    if let Some(mut table) = render_component(element, &component) {
                        debug!(
                            kind = %component.kind,
                            id = component.id.as_deref().unwrap_or(""),
                            align = %component.align,
                            "wrapped component"
                        );
                        if let Some(cell) = table.find_descendant_mut(&|e: &Element| e.is("td")) {
                            let cell_align = text_align(cell);
                            render_nodes(&mut cell.children, CellScope::Generated, cell_align);
                        }
                        *node = Node::Element(table);
                        continue;
                    }
                }
                Err(UnknownKind(kind)) => {
                    warn!(data_type = %kind, "unknown component kind, leaving it untouched");
                }
            }
        }

        let child_scope = if element.is("td") || element.is("th") {
            CellScope::Open
        } else {
            scope
        };
        let align = text_align(element);
        render_nodes(&mut element.children, child_scope, align);
    }
}

fn text_align(element: &Element) -> Option<Align> {
    element
        .style()
        .get("text-align")
        .and_then(|align| align.parse().ok())
}

/// Build the wrapper table for one component, taking its content out of
/// `element`. Returns `None`, with `element` untouched, when the component
/// lacks a required part.
fn render_component(element: &mut Element, component: &EditableComponent) -> Option<Element> {
    match component.kind {
        ComponentKind::Button => render_button(element, component),
        ComponentKind::Text => Some(render_text(element, component)),
        ComponentKind::Image
        | ComponentKind::Spacer
        | ComponentKind::Divider
        | ComponentKind::Social
        | ComponentKind::Video
        | ComponentKind::Html
        | ComponentKind::Center
        | ComponentKind::TwoColumns
        | ComponentKind::ThreeColumns
        | ComponentKind::TwoRows
        | ComponentKind::ThreeRows => Some(render_generic(element, component)),
    }
}

fn render_button(element: &mut Element, component: &EditableComponent) -> Option<Element> {
    let mut link = if element.is("a") {
        std::mem::replace(element, Element::new("a"))
    } else {
        match element.find_descendant(&|e: &Element| e.is("a")) {
            Some(link) => link.clone(),
            None => {
                warn!(
                    id = component.id.as_deref().unwrap_or(""),
                    "button component has no link, leaving it untouched"
                );
                return None;
            }
        }
    };

    let mut merged = component.style.clone();
    merged.extend(&link.style());
    let value = |key: &str, default: &'static str| merged.get(key).unwrap_or(default).to_string();

    let background = value("background-color", BUTTON_BACKGROUND);
    let radius = value("border-radius", BUTTON_RADIUS);

    let mut link_style = StyleMap::new();
    link_style.insert("background-color", background.as_str());
    link_style.insert("border-radius", radius.as_str());
    link_style.insert("padding", value("padding", BUTTON_PADDING));
    link_style.insert("font-family", value("font-family", BUTTON_FONT_FAMILY));
    link_style.insert("font-size", value("font-size", BUTTON_FONT_SIZE));
    link_style.insert("font-weight", value("font-weight", BUTTON_FONT_WEIGHT));
    link_style.insert("color", value("color", BUTTON_COLOR));
    link_style.insert("text-decoration", "none");
    link_style.insert("display", "inline-block");
    link.set_style(&link_style);

    let mut cell_style = StyleMap::new();
    cell_style.insert("background-color", background.as_str());
    cell_style.insert("border-radius", radius.as_str());
    let mut cell = Element::new("td").with_attr("bgcolor", background.as_str());
    cell.set_style(&cell_style);
    cell.children.push(Node::Element(link));

    Some(
        presentation_table()
            .with_attr("align", component.align.as_str())
            .with_child(table_body(vec![Element::new("tr").with_child(cell)])),
    )
}

fn render_text(element: &mut Element, component: &EditableComponent) -> Element {
    let style = &component.style;
    let align = component.align;
    let mut cell = Element::new("td").with_attr("align", align.as_str());

    let mut cell_style = cell_base_style(style);
    cell_style.insert("text-align", align.as_str());
    if align == Align::Center {
        cell.set_attr("valign", "middle");
        cell_style.insert("vertical-align", "middle");
        if let Some(height) = style.get("height").and_then(pixel_number) {
            cell.set_attr("height", height);
        }
    }
    cell.set_style(&cell_style);

    let font: StyleMap = TEXT_FONT_PROPERTIES
        .iter()
        .filter_map(|&key| style.get(key).map(|value| (key, value)))
        .collect();

    let mut content = take_content(element);
    if !font.is_empty() {
        match find_element_mut(&mut content, &|e: &Element| e.has_class(TEXT_CONTENT_CLASS)) {
            Some(text_content) => {
                let mut text_style = text_content.style();
                text_style.extend(&font);
                text_content.set_style(&text_style);
            }
            None => {
                let mut wrapper = Element::new("div");
                wrapper.set_style(&font);
                wrapper.children = content;
                content = vec![Node::Element(wrapper)];
            }
        }
    }
    cell.children = content;

    wrap_in_table(cell)
}

fn render_generic(element: &mut Element, component: &EditableComponent) -> Element {
    let style = &component.style;
    let align = component.align;
    let mut cell = Element::new("td").with_attr("align", align.as_str());

    let mut cell_style = cell_base_style(style);
    cell_style.insert("text-align", align.as_str());
    if component.kind == ComponentKind::Spacer {
        if let Some(height) = style.get("height") {
            if let Some(number) = pixel_number(height) {
                cell.set_attr("height", number);
            }
            cell_style.insert("height", height);
        }
        if let Some(font_size) = style.get("font-size") {
            cell_style.insert("font-size", font_size);
            cell_style.insert("line-height", font_size);
        }
    }
    cell.set_style(&cell_style);
    cell.children = take_content(element);

    wrap_in_table(cell)
}

/// Background and corner radius, the declarations every cell starts with.
fn cell_base_style(style: &StyleMap) -> StyleMap {
    let mut cell = StyleMap::new();
    if let Some(background) = style.get("background-color") {
        cell.insert("background-color", background);
    }
    if let Some(radius) = corner_radius(style) {
        cell.insert("border-radius", radius);
    }
    cell
}

/// Four-corner `border-radius`, each corner taken from its longhand, then
/// from the shorthand, then `0px`. `None` when no radius is declared.
pub fn corner_radius(style: &StyleMap) -> Option<String> {
    let shorthand = style.get("border-radius").and_then(expand_radius);
    if shorthand.is_none() && !RADIUS_CORNERS.iter().any(|corner| style.contains(corner)) {
        return None;
    }

    let corners: Vec<&str> = RADIUS_CORNERS
        .iter()
        .enumerate()
        .map(|(i, corner)| {
            style
                .get(corner)
                .or_else(|| shorthand.map(|values| values[i]))
                .unwrap_or("0px")
        })
        .collect();
    Some(corners.join(" "))
}

/// Expand a `border-radius` shorthand to its four corners
/// (top-left, top-right, bottom-right, bottom-left). Elliptical radii keep
/// their horizontal part.
fn expand_radius(value: &str) -> Option<[&str; 4]> {
    let horizontal = value.split('/').next().unwrap_or_default();
    let parts: Vec<&str> = horizontal.split_whitespace().collect();
    match parts[..] {
        [a] => Some([a, a, a, a]),
        [a, b] => Some([a, b, a, b]),
        [a, b, c] => Some([a, b, c, b]),
        [a, b, c, d] => Some([a, b, c, d]),
        _ => None,
    }
}

/// A `div` wrapper contributes its children; any other element (an `img`,
/// an `hr`) is the content itself.
fn take_content(element: &mut Element) -> Vec<Node> {
    if element.is("div") {
        std::mem::take(&mut element.children)
    } else {
        vec![Node::Element(std::mem::replace(element, Element::new("div")))]
    }
}

fn wrap_in_table(cell: Element) -> Element {
    presentation_table()
        .with_attr("width", "100%")
        .with_child(table_body(vec![Element::new("tr").with_child(cell)]))
}
