//! Board elements - the shapes and text items users manipulate.

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Default top-left position of a freshly created element.
pub const DEFAULT_POSITION: f64 = 50.0;

/// Default width and height of a freshly created element.
pub const DEFAULT_SIZE: f64 = 100.0;

/// Default fill colour.
pub const DEFAULT_COLOR: &str = "#00f0ff";

/// Default content of a text element.
pub const DEFAULT_TEXT: &str = "New Text";

/// Smallest width or height an element may have.
pub const MIN_SIZE: f64 = 10.0;

/// Unique identifier for an element.
///
/// New elements get a UUID v4; any string is accepted when loading a
/// snapshot so older designs keep their ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    /// Create a new unique element ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wrap an existing id string.
    #[must_use]
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// What an element draws as. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    /// A filled rectangle.
    Rectangle,
    /// A filled circle (ellipse inscribed in the element box).
    Circle,
    /// A text label.
    Text,
}

impl ElementKind {
    /// Lowercase name, as written in snapshots and layer labels.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rectangle => "rectangle",
            Self::Circle => "circle",
            Self::Text => "text",
        }
    }

    /// Whether this kind carries editable text.
    #[must_use]
    pub const fn is_text(self) -> bool {
        matches!(self, Self::Text)
    }
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A shape or text item on the board.
///
/// Field names on the wire match the snapshot format written by the
/// browser editor: `type`, `backgroundColor` and `zIndex`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Unique identifier.
    pub id: ElementId,
    /// Element kind.
    #[serde(rename = "type")]
    pub kind: ElementKind,
    /// Left edge in board pixels.
    #[serde(deserialize_with = "number_or_zero")]
    pub x: f64,
    /// Top edge in board pixels.
    #[serde(deserialize_with = "number_or_zero")]
    pub y: f64,
    /// Width in pixels.
    #[serde(deserialize_with = "number_or_zero")]
    pub width: f64,
    /// Height in pixels.
    #[serde(deserialize_with = "number_or_zero")]
    pub height: f64,
    /// Fill colour (CSS colour string).
    #[serde(rename = "backgroundColor")]
    pub color: String,
    /// Text content; empty for shapes.
    #[serde(default)]
    pub text: String,
    /// Rotation in degrees.
    #[serde(default, deserialize_with = "number_or_zero")]
    pub rotation: f64,
    /// Paint order; higher paints later.
    #[serde(rename = "zIndex")]
    pub stack_order: i64,
}

impl Element {
    /// Create a new element of the given kind with default geometry and style.
    #[must_use]
    pub fn new(kind: ElementKind) -> Self {
        Self {
            id: ElementId::new(),
            kind,
            x: DEFAULT_POSITION,
            y: DEFAULT_POSITION,
            width: DEFAULT_SIZE,
            height: DEFAULT_SIZE,
            color: DEFAULT_COLOR.to_string(),
            text: if kind.is_text() {
                DEFAULT_TEXT.to_string()
            } else {
                String::new()
            },
            rotation: 0.0,
            stack_order: 0,
        }
    }

    /// Set the stack order.
    #[must_use]
    pub fn with_stack_order(mut self, stack_order: i64) -> Self {
        self.stack_order = stack_order;
        self
    }

    /// Set the position.
    #[must_use]
    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    /// Set the size, floored at [`MIN_SIZE`].
    #[must_use]
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width.max(MIN_SIZE);
        self.height = height.max(MIN_SIZE);
        self
    }

    /// Set the fill colour.
    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Right edge in board pixels.
    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge in board pixels.
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// Snapshots written by the browser editor store a cleared numeric field as
/// `null`. Read those as 0; the board floors sizes and clamps positions when
/// the element is added.
fn number_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?
        .filter(|v| v.is_finite())
        .unwrap_or(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_element_uses_defaults() {
        let el = Element::new(ElementKind::Rectangle);
        assert!((el.x - 50.0).abs() < f64::EPSILON);
        assert!((el.y - 50.0).abs() < f64::EPSILON);
        assert!((el.width - 100.0).abs() < f64::EPSILON);
        assert!((el.height - 100.0).abs() < f64::EPSILON);
        assert_eq!(el.color, DEFAULT_COLOR);
        assert!(el.text.is_empty());
        assert!(el.rotation.abs() < f64::EPSILON);
    }

    #[test]
    fn text_element_gets_default_text() {
        let el = Element::new(ElementKind::Text);
        assert_eq!(el.text, DEFAULT_TEXT);
    }

    #[test]
    fn ids_are_unique() {
        let a = Element::new(ElementKind::Circle);
        let b = Element::new(ElementKind::Circle);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn with_size_floors_at_minimum() {
        let el = Element::new(ElementKind::Rectangle).with_size(2.0, -40.0);
        assert!((el.width - MIN_SIZE).abs() < f64::EPSILON);
        assert!((el.height - MIN_SIZE).abs() < f64::EPSILON);
    }

    #[test]
    fn serializes_with_snapshot_field_names() {
        let el = Element::new(ElementKind::Text).with_stack_order(3);
        let value = serde_json::to_value(&el).expect("serialize");
        assert_eq!(value["type"], "text");
        assert_eq!(value["backgroundColor"], DEFAULT_COLOR);
        assert_eq!(value["zIndex"], 3);
        assert_eq!(value["text"], DEFAULT_TEXT);
        assert!(value.get("kind").is_none());
    }

    #[test]
    fn deserializes_legacy_timestamp_ids() {
        let json = r##"{"id":"1712345678901","type":"circle","x":10,"y":20,"width":30,"height":40,"backgroundColor":"#ff0000","text":"","rotation":15,"zIndex":2}"##;
        let el: Element = serde_json::from_str(json).expect("parse");
        assert_eq!(el.id.as_str(), "1712345678901");
        assert_eq!(el.kind, ElementKind::Circle);
        assert!((el.rotation - 15.0).abs() < f64::EPSILON);
        assert_eq!(el.stack_order, 2);
    }

    #[test]
    fn null_numbers_read_as_zero() {
        let json = r##"{"id":"1712345678902","type":"text","x":null,"y":12,"width":null,"height":40,"backgroundColor":"#fff","text":"Hello","rotation":null,"zIndex":3}"##;
        let el: Element = serde_json::from_str(json).expect("parse");
        assert!(el.x.abs() < f64::EPSILON);
        assert!(el.width.abs() < f64::EPSILON);
        assert!(el.rotation.abs() < f64::EPSILON);
        assert!((el.y - 12.0).abs() < f64::EPSILON);
        assert_eq!(el.text, "Hello");
    }
}
