use crate::components::{is_component, ComponentKind};
use crate::dom::{Element, Node};
use crate::style::StyleMap;
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

pub const DEFAULT_GAP_PX: u32 = 20;

/// Replace every column/row container in `nodes` (at any depth) with a table.
///
/// Each group's content goes into its own cell, and the container's `gap` is
/// reproduced as cell padding between cells, never at the outer edges.
/// Containers without a recognised child group are left as they are.
pub fn group_layouts(nodes: &mut [Node]) {
    for node in nodes.iter_mut() {
        let Node::Element(element) = node else {
            continue;
        };
        group_layouts(&mut element.children);
        if let Some(table) = group_container(element) {
            *node = Node::Element(table);
        }
    }
}

fn group_container(container: &mut Element) -> Option<Element> {
    if !is_component(container) {
        return None;
    }
    let kind: ComponentKind = container.attr("data-type")?.parse().ok()?;
    let group_class = kind.group_class()?;

    if !container
        .element_children()
        .any(|child| child.has_class(group_class))
    {
        debug!(kind = %kind, "layout container has no groups, leaving it untouched");
        return None;
    }

    let gap = gap_px(container.attr("style").unwrap_or_default());
    let groups: Vec<Vec<Node>> = std::mem::take(&mut container.children)
        .into_iter()
        .filter_map(|node| match node {
            Node::Element(group) if group.has_class(group_class) => Some(group.children),
            _ => None,
        })
        .collect();

    debug!(kind = %kind, groups = groups.len(), gap, "grouping layout container");
    let table = if kind.is_column_container() {
        columns_table(groups, gap)
    } else {
        rows_table(groups, gap)
    };
    Some(table)
}

/// The container's `gap` in whole pixels, or [`DEFAULT_GAP_PX`].
pub fn gap_px(style: &str) -> u32 {
    static GAP_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = GAP_REGEX.get_or_init(|| Regex::new(r"(?i)(?:^|;)\s*gap\s*:\s*(\d+)\s*px").unwrap());
    re.captures(style)
        .and_then(|caps| caps[1].parse().ok())
        .unwrap_or(DEFAULT_GAP_PX)
}

fn columns_table(groups: Vec<Vec<Node>>, gap: u32) -> Element {
    let count = groups.len();
    let width = format!("{:.2}%", 100.0 / count as f64);
    let padding = format!("{}px", gap / 2);

    let mut row = Element::new("tr");
    for (i, content) in groups.into_iter().enumerate() {
        let mut style = StyleMap::new();
        if i > 0 {
            style.insert("padding-left", padding.as_str());
        }
        if i + 1 < count {
            style.insert("padding-right", padding.as_str());
        }
        let mut cell = Element::new("td")
            .with_attr("width", width.as_str())
            .with_attr("valign", "top");
        cell.set_style(&style);
        cell.children = content;
        row.children.push(cell.into());
    }

    presentation_table()
        .with_attr("width", "100%")
        .with_child(table_body(vec![row]))
}

fn rows_table(groups: Vec<Vec<Node>>, gap: u32) -> Element {
    let count = groups.len();
    let padding = format!("{}px", gap / 2);

    let mut rows = Vec::with_capacity(count);
    for (i, content) in groups.into_iter().enumerate() {
        let mut style = StyleMap::new();
        if i > 0 {
            style.insert("padding-top", padding.as_str());
        }
        if i + 1 < count {
            style.insert("padding-bottom", padding.as_str());
        }
        let mut cell = Element::new("td")
            .with_attr("width", "100%")
            .with_attr("valign", "top");
        cell.set_style(&style);
        cell.children = content;
        rows.push(Element::new("tr").with_child(cell));
    }

    presentation_table()
        .with_attr("width", "100%")
        .with_child(table_body(rows))
}

/// `<table role="presentation" border="0" cellpadding="0" cellspacing="0">`
pub(crate) fn presentation_table() -> Element {
    Element::new("table")
        .with_attr("role", "presentation")
        .with_attr("border", "0")
        .with_attr("cellpadding", "0")
        .with_attr("cellspacing", "0")
}

/// Explicit `tbody`, so re-parsing the output yields the same tree.
pub(crate) fn table_body(rows: Vec<Element>) -> Element {
    let mut body = Element::new("tbody");
    body.children = rows.into_iter().map(Node::Element).collect();
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{parse_fragment, serialize};
    use pretty_assertions::assert_eq;

    fn cells(table: &Element) -> Vec<&Element> {
        let mut found = Vec::new();
        collect_cells(table, &mut found);
        found
    }

    fn collect_cells<'a>(element: &'a Element, found: &mut Vec<&'a Element>) {
        for child in element.element_children() {
            if child.is("td") {
                found.push(child);
            } else {
                collect_cells(child, found);
            }
        }
    }

    fn grouped(html: &str) -> Vec<Node> {
        let mut nodes = parse_fragment(html).unwrap();
        group_layouts(&mut nodes);
        nodes
    }

    #[test]
    fn test_gap_extraction() {
        assert_eq!(gap_px("display: flex; gap: 30px"), 30);
        assert_eq!(gap_px("gap:8px"), 8);
        assert_eq!(gap_px("GAP: 12PX"), 12);
        assert_eq!(gap_px("gap: notanumber"), DEFAULT_GAP_PX);
        assert_eq!(gap_px("row-gap: 4px"), DEFAULT_GAP_PX);
        assert_eq!(gap_px(""), DEFAULT_GAP_PX);
    }

    #[test]
    fn test_two_columns_split_gap_between_cells() {
        let nodes = grouped(
            r#"<div class="editable-component" data-type="two-columns" style="display: flex; gap: 20px"><div class="column drop-column"><p>A</p></div><div class="column drop-column"><p>B</p></div></div>"#,
        );
        let table = nodes[0].as_element().unwrap();
        assert!(table.is("table"));
        let cells = cells(table);
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[0].attr("width"), Some("50.00%"));
        assert_eq!(cells[1].attr("width"), Some("50.00%"));
        assert_eq!(cells[0].attr("style"), Some("padding-right: 10px"));
        assert_eq!(cells[1].attr("style"), Some("padding-left: 10px"));
        assert_eq!(cells[0].text_content(), "A");
        assert_eq!(cells[1].text_content(), "B");
    }

    #[test]
    fn test_three_columns_middle_cell_has_both_paddings() {
        let nodes = grouped(
            r#"<div class="editable-component" data-type="three-columns" style="gap: 15px"><div class="column"></div><div class="column"></div><div class="column"></div></div>"#,
        );
        let cells = cells(nodes[0].as_element().unwrap());
        assert_eq!(cells.len(), 3);
        assert_eq!(cells[0].attr("width"), Some("33.33%"));
        assert_eq!(cells[0].attr("style"), Some("padding-right: 7px"));
        assert_eq!(
            cells[1].attr("style"),
            Some("padding-left: 7px; padding-right: 7px")
        );
        assert_eq!(cells[2].attr("style"), Some("padding-left: 7px"));
    }

    #[test]
    fn test_missing_gap_uses_default() {
        let nodes = grouped(
            r#"<div class="editable-component" data-type="two-columns"><div class="column"></div><div class="column"></div></div>"#,
        );
        let cells = cells(nodes[0].as_element().unwrap());
        assert_eq!(cells[0].attr("style"), Some("padding-right: 10px"));
    }

    #[test]
    fn test_rows_stack_one_cell_per_row() {
        let nodes = grouped(
            r#"<div class="editable-component" data-type="two-rows" style="display: flex; flex-direction: column; gap: 20px"><div class="row">top</div><div class="row">bottom</div></div>"#,
        );
        let table = nodes[0].as_element().unwrap();
        let cells = cells(table);
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[0].attr("valign"), Some("top"));
        assert_eq!(cells[0].attr("style"), Some("padding-bottom: 10px"));
        assert_eq!(cells[1].attr("style"), Some("padding-top: 10px"));
        let html = serialize(&nodes);
        assert_eq!(html.matches("<tr>").count(), 2);
        assert!(!html.contains("padding-left"));
    }

    #[test]
    fn test_container_without_groups_is_untouched() {
        let html = r#"<div class="editable-component" data-type="two-columns" style="gap: 20px"></div>"#;
        let nodes = grouped(html);
        assert_eq!(nodes, parse_fragment(html).unwrap());
    }

    #[test]
    fn test_nested_container_is_grouped() {
        let nodes = grouped(
            r#"<div class="editable-component" data-type="two-columns"><div class="column"><div class="editable-component" data-type="two-rows"><div class="row">r1</div><div class="row">r2</div></div></div><div class="column">c2</div></div>"#,
        );
        let html = serialize(&nodes);
        assert_eq!(html.matches("<table").count(), 2);
        assert!(!html.contains("two-rows"));
    }

    #[test]
    fn test_only_direct_groups_are_recognised() {
        let nodes = grouped(
            r#"<div class="editable-component" data-type="two-columns"><div class="wrapper"><div class="column">x</div></div></div>"#,
        );
        assert!(nodes[0].as_element().unwrap().is("div"));
    }
}
