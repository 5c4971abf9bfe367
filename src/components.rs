use crate::dom::Element;
use crate::style::StyleMap;
use std::fmt;
use std::str::FromStr;

/// Marker class carried by every editor component.
pub const COMPONENT_CLASS: &str = "editable-component";
/// Marker class of the inner element holding a text component's content.
pub const TEXT_CONTENT_CLASS: &str = "text-content";
pub const COLUMN_CLASS: &str = "column";
pub const ROW_CLASS: &str = "row";

/// Editor-only classes that never reach the final markup.
pub const EDITOR_CLASSES: &[&str] = &[
    COMPONENT_CLASS,
    "selected",
    "drop-column",
    COLUMN_CLASS,
    ROW_CLASS,
    "placeholder-text",
    "drag-over",
    TEXT_CONTENT_CLASS,
];

/// The closed vocabulary of editor components (`data-type`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Text,
    Image,
    Button,
    Spacer,
    Divider,
    TwoColumns,
    ThreeColumns,
    TwoRows,
    ThreeRows,
    Center,
    Social,
    Video,
    Html,
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 13] = [
        ComponentKind::Text,
        ComponentKind::Image,
        ComponentKind::Button,
        ComponentKind::Spacer,
        ComponentKind::Divider,
        ComponentKind::TwoColumns,
        ComponentKind::ThreeColumns,
        ComponentKind::TwoRows,
        ComponentKind::ThreeRows,
        ComponentKind::Center,
        ComponentKind::Social,
        ComponentKind::Video,
        ComponentKind::Html,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ComponentKind::Text => "text",
            ComponentKind::Image => "image",
            ComponentKind::Button => "button",
            ComponentKind::Spacer => "spacer",
            ComponentKind::Divider => "divider",
            ComponentKind::TwoColumns => "two-columns",
            ComponentKind::ThreeColumns => "three-columns",
            ComponentKind::TwoRows => "two-rows",
            ComponentKind::ThreeRows => "three-rows",
            ComponentKind::Center => "center",
            ComponentKind::Social => "social",
            ComponentKind::Video => "video",
            ComponentKind::Html => "html",
        }
    }

    pub fn is_column_container(self) -> bool {
        matches!(self, ComponentKind::TwoColumns | ComponentKind::ThreeColumns)
    }

    pub fn is_row_container(self) -> bool {
        matches!(self, ComponentKind::TwoRows | ComponentKind::ThreeRows)
    }

    /// Marker class of the child groups a layout container owns.
    pub fn group_class(self) -> Option<&'static str> {
        if self.is_column_container() {
            Some(COLUMN_CLASS)
        } else if self.is_row_container() {
            Some(ROW_CLASS)
        } else {
            None
        }
    }

    fn default_align(self) -> Align {
        match self {
            ComponentKind::Center => Align::Center,
            _ => Align::Left,
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKind(pub String);

impl FromStr for ComponentKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        ComponentKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl Align {
    pub fn as_str(self) -> &'static str {
        match self {
            Align::Left => "left",
            Align::Center => "center",
            Align::Right => "right",
            Align::Justify => "justify",
        }
    }
}

impl fmt::Display for Align {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Align {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" | "start" => Ok(Align::Left),
            "center" => Ok(Align::Center),
            "right" | "end" => Ok(Align::Right),
            "justify" => Ok(Align::Justify),
            _ => Err(()),
        }
    }
}

/// Typed view of an element the editor tagged as a component.
#[derive(Debug, Clone, PartialEq)]
pub struct EditableComponent {
    pub id: Option<String>,
    pub kind: ComponentKind,
    pub align: Align,
    pub style: StyleMap,
}

/// Whether `element` carries the component marker class.
pub fn is_component(element: &Element) -> bool {
    element.has_class(COMPONENT_CLASS)
}

impl EditableComponent {
    /// Read the component attributes of `element`.
    ///
    /// `parent_align` is the `text-align` of the enclosing element; the
    /// editor aligns inline components (images, links) through their parent.
    /// Returns `Err` with the offending `data-type` when the kind is unknown.
    pub fn from_element(
        element: &Element,
        parent_align: Option<Align>,
    ) -> Result<Self, UnknownKind> {
        let kind: ComponentKind = element.attr("data-type").unwrap_or_default().parse()?;
        let style = element.style();

        let own_align = element
            .attr("data-align")
            .and_then(|a| a.parse().ok())
            .or_else(|| style.get("text-align").and_then(|a| a.parse().ok()));
        let inherited = if element.is("div") { None } else { parent_align };
        let align = own_align
            .or(inherited)
            .unwrap_or_else(|| kind.default_align());

        Ok(Self {
            id: element.attr("data-id").map(str::to_string),
            kind,
            align,
            style,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_fragment;

    fn first(html: &str) -> Element {
        parse_fragment(html).unwrap()[0].as_element().unwrap().clone()
    }

    #[test]
    fn test_every_kind_parses_from_its_name() {
        for kind in ComponentKind::ALL {
            assert_eq!(kind.as_str().parse::<ComponentKind>(), Ok(kind));
        }
        assert!("carousel".parse::<ComponentKind>().is_err());
    }

    #[test]
    fn test_container_kinds() {
        assert_eq!(ComponentKind::TwoColumns.group_class(), Some("column"));
        assert_eq!(ComponentKind::ThreeRows.group_class(), Some("row"));
        assert_eq!(ComponentKind::Center.group_class(), None);
    }

    #[test]
    fn test_data_align_wins_over_text_align() {
        let el = first(
            r#"<div class="editable-component" data-id="t1" data-type="text" data-align="right" style="text-align: center">x</div>"#,
        );
        let component = EditableComponent::from_element(&el, None).unwrap();
        assert_eq!(component.align, Align::Right);
        assert_eq!(component.id.as_deref(), Some("t1"));
        assert_eq!(component.kind, ComponentKind::Text);
    }

    #[test]
    fn test_align_inferred_from_text_align() {
        let el = first(r#"<div class="editable-component" data-type="text" style="text-align: justify">x</div>"#);
        let component = EditableComponent::from_element(&el, None).unwrap();
        assert_eq!(component.align, Align::Justify);
    }

    #[test]
    fn test_inline_component_inherits_parent_align() {
        let el = first(r#"<img class="editable-component" data-type="image" src="a.png">"#);
        let component = EditableComponent::from_element(&el, Some(Align::Center)).unwrap();
        assert_eq!(component.align, Align::Center);

        let div = first(r#"<div class="editable-component" data-type="text">x</div>"#);
        let component = EditableComponent::from_element(&div, Some(Align::Center)).unwrap();
        assert_eq!(component.align, Align::Left);
    }

    #[test]
    fn test_center_kind_defaults_to_center() {
        let el = first(r#"<div class="editable-component" data-type="center"></div>"#);
        let component = EditableComponent::from_element(&el, None).unwrap();
        assert_eq!(component.align, Align::Center);
    }

    #[test]
    fn test_unknown_kind_is_reported() {
        let el = first(r#"<div class="editable-component" data-type="carousel"></div>"#);
        let err = EditableComponent::from_element(&el, None).unwrap_err();
        assert_eq!(err, UnknownKind("carousel".to_string()));
    }
}
