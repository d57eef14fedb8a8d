//! Pure projection of board state into a view tree.
//!
//! ```text
//! Board ──project()──► BoardView
//!                      ├── nodes       one per element, paint order
//!                      ├── properties  form values for the selection
//!                      └── layers      rows, newest on top
//! ```
//!
//! Projection reads nothing but the board and the [`RendererConfig`], so
//! equal inputs always give equal views. Backends only draw the result.

use board_core::{Board, Element, ElementId, ElementKind, PropertyField};
use serde::Serialize;

use crate::RendererConfig;

/// Ordered inline style declarations for one node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Style {
    declarations: Vec<(&'static str, String)>,
}

impl Style {
    /// An empty style.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a declaration, replacing an earlier value for the same property.
    pub fn set(&mut self, property: &'static str, value: impl Into<String>) {
        let value = value.into();
        if let Some(slot) = self
            .declarations
            .iter_mut()
            .find(|(name, _)| *name == property)
        {
            slot.1 = value;
        } else {
            self.declarations.push((property, value));
        }
    }

    /// Look up a declaration.
    #[must_use]
    pub fn get(&self, property: &str) -> Option<&str> {
        self.declarations
            .iter()
            .find(|(name, _)| *name == property)
            .map(|(_, value)| value.as_str())
    }

    /// The declarations as a `style` attribute value.
    #[must_use]
    pub fn css_text(&self) -> String {
        self.declarations
            .iter()
            .map(|(name, value)| format!("{name}: {value};"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// One element on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ElementNode {
    /// Element the node draws.
    pub id: ElementId,
    /// Element kind.
    pub kind: ElementKind,
    /// Inline style.
    pub style: Style,
    /// Text content; `None` for shapes.
    pub text: Option<String>,
    /// Whether the node carries the selection indicator.
    pub selected: bool,
    /// Whether a resize handle is attached.
    pub resize_handle: bool,
}

impl ElementNode {
    fn project(element: &Element, selected: bool, config: &RendererConfig) -> Self {
        let mut style = Style::new();
        style.set("position", "absolute");
        style.set("left", px(element.x));
        style.set("top", px(element.y));
        style.set("width", px(element.width));
        style.set("height", px(element.height));
        style.set("background-color", element.color.clone());
        style.set("transform", format!("rotate({}deg)", element.rotation));
        style.set("color", config.text_color.clone());
        style.set("display", "flex");
        style.set("align-items", "center");
        style.set("justify-content", "center");
        style.set("user-select", "none");

        let mut resize_handle = false;
        match element.kind {
            ElementKind::Circle => style.set("border-radius", "50%"),
            ElementKind::Text => {
                style.set("background-color", "transparent");
                style.set("font-size", px(config.text_font_size));
                style.set("border", "1px dashed transparent");
            }
            ElementKind::Rectangle => {}
        }

        if selected {
            if element.kind.is_text() {
                style.set("border", format!("1px solid {}", config.accent_color));
            } else {
                style.set("box-shadow", format!("0 0 10px {}", config.accent_color));
                style.set("border", "2px solid #fff");
                resize_handle = true;
            }
        }

        Self {
            id: element.id.clone(),
            kind: element.kind,
            style,
            text: element.kind.is_text().then(|| element.text.clone()),
            selected,
            resize_handle,
        }
    }
}

/// What the properties form shows.
///
/// Values are the strings written into the inputs; a disabled form has every
/// value cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PropertiesView {
    /// Whether the inputs accept edits.
    pub enabled: bool,
    /// Left edge, rounded.
    pub x: String,
    /// Top edge, rounded.
    pub y: String,
    /// Width, rounded.
    pub width: String,
    /// Height, rounded.
    pub height: String,
    /// Rotation in degrees.
    pub rotation: String,
    /// Fill colour.
    pub color: String,
    /// Text content.
    pub text: String,
    /// Whether the text group is shown.
    pub text_visible: bool,
}

impl PropertiesView {
    fn project(selected: Option<&Element>) -> Self {
        let Some(el) = selected else {
            return Self::default();
        };
        Self {
            enabled: true,
            x: format!("{}", el.x.round()),
            y: format!("{}", el.y.round()),
            width: format!("{}", el.width.round()),
            height: format!("{}", el.height.round()),
            rotation: format!("{}", el.rotation),
            color: el.color.clone(),
            text: if el.kind.is_text() {
                el.text.clone()
            } else {
                String::new()
            },
            text_visible: el.kind.is_text(),
        }
    }

    /// The value shown in the input for `field`.
    #[must_use]
    pub fn value(&self, field: PropertyField) -> &str {
        match field {
            PropertyField::X => &self.x,
            PropertyField::Y => &self.y,
            PropertyField::Width => &self.width,
            PropertyField::Height => &self.height,
            PropertyField::Rotation => &self.rotation,
            PropertyField::Color => &self.color,
            PropertyField::Text => &self.text,
        }
    }
}

/// One row of the layer list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayerRow {
    /// Element the row stands for.
    pub id: ElementId,
    /// `"<kind> <paint index>"`.
    pub label: String,
    /// Whether the row is highlighted.
    pub active: bool,
    /// Whether the promote control is enabled; false on the topmost row.
    pub can_promote: bool,
}

/// The complete view of a board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardView {
    /// Element nodes in paint order.
    pub nodes: Vec<ElementNode>,
    /// Properties form.
    pub properties: PropertiesView,
    /// Layer rows, newest first.
    pub layers: Vec<LayerRow>,
}

impl BoardView {
    /// Project `board` into a view.
    #[must_use]
    pub fn project(board: &Board, config: &RendererConfig) -> Self {
        let elements = board.elements();
        let nodes = elements
            .iter()
            .map(|el| ElementNode::project(el, board.is_selected(&el.id), config))
            .collect();

        let top = elements.len().saturating_sub(1);
        let layers = elements
            .iter()
            .enumerate()
            .rev()
            .map(|(index, el)| LayerRow {
                id: el.id.clone(),
                label: format!("{} {index}", el.kind),
                active: board.is_selected(&el.id),
                can_promote: index < top,
            })
            .collect();

        Self {
            nodes,
            properties: PropertiesView::project(board.selected_element()),
            layers,
        }
    }

    /// The node carrying the selection indicator.
    #[must_use]
    pub fn selected_node(&self) -> Option<&ElementNode> {
        self.nodes.iter().find(|n| n.selected)
    }
}

fn px(value: f64) -> String {
    format!("{value}px")
}
