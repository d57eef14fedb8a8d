//! Panel binders: property-form edits and layer-list commands.
//!
//! The renderer produces what the panels show; this module applies what
//! the user types or clicks back onto the board.

use serde::{Deserialize, Serialize};

use crate::{Board, BoardError, BoardResult, ElementId};

/// A field of the properties form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyField {
    /// Left edge.
    X,
    /// Top edge.
    Y,
    /// Width.
    Width,
    /// Height.
    Height,
    /// Rotation in degrees.
    Rotation,
    /// Fill colour.
    Color,
    /// Text content (text elements only).
    Text,
}

impl PropertyField {
    /// Every field, in form order.
    pub const ALL: [Self; 7] = [
        Self::X,
        Self::Y,
        Self::Width,
        Self::Height,
        Self::Rotation,
        Self::Color,
        Self::Text,
    ];

    /// Field name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Width => "width",
            Self::Height => "height",
            Self::Rotation => "rotation",
            Self::Color => "color",
            Self::Text => "text",
        }
    }

    /// DOM id of the input bound to this field.
    #[must_use]
    pub const fn input_id(self) -> &'static str {
        match self {
            Self::X => "prop-x",
            Self::Y => "prop-y",
            Self::Width => "prop-width",
            Self::Height => "prop-height",
            Self::Rotation => "prop-rotation",
            Self::Color => "prop-color",
            Self::Text => "prop-text",
        }
    }

    /// Whether the field takes a number.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        !matches!(self, Self::Color | Self::Text)
    }
}

/// A parsed edit from the properties form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "lowercase")]
pub enum PropertyEdit {
    /// New left edge.
    X(f64),
    /// New top edge.
    Y(f64),
    /// New width.
    Width(f64),
    /// New height.
    Height(f64),
    /// New rotation in degrees.
    Rotation(f64),
    /// New fill colour.
    Color(String),
    /// New text content.
    Text(String),
}

impl PropertyEdit {
    /// Parse the raw value of a form input.
    ///
    /// Numbers are truncated to whole pixels/degrees, the way the form
    /// displays them.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::InvalidValue`] if a numeric field does not hold
    /// a finite number.
    pub fn parse(field: PropertyField, raw: &str) -> BoardResult<Self> {
        if !field.is_numeric() {
            return Ok(match field {
                PropertyField::Color => Self::Color(raw.trim().to_string()),
                _ => Self::Text(raw.to_string()),
            });
        }

        let value = raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| BoardError::InvalidValue {
                field: field.name(),
                value: raw.to_string(),
            })?
            .trunc();

        Ok(match field {
            PropertyField::X => Self::X(value),
            PropertyField::Y => Self::Y(value),
            PropertyField::Width => Self::Width(value),
            PropertyField::Height => Self::Height(value),
            _ => Self::Rotation(value),
        })
    }

    /// The field this edit targets.
    #[must_use]
    pub const fn field(&self) -> PropertyField {
        match self {
            Self::X(_) => PropertyField::X,
            Self::Y(_) => PropertyField::Y,
            Self::Width(_) => PropertyField::Width,
            Self::Height(_) => PropertyField::Height,
            Self::Rotation(_) => PropertyField::Rotation,
            Self::Color(_) => PropertyField::Color,
            Self::Text(_) => PropertyField::Text,
        }
    }

    /// Write the edit to the selected element.
    ///
    /// Geometry edits go through the same clamps as dragging and resizing.
    /// Returns `false` without touching the board when nothing is selected.
    ///
    /// # Errors
    ///
    /// Returns an error if the selection is stale, a colour is empty, or
    /// text is written to a shape.
    pub fn apply(&self, board: &mut Board) -> BoardResult<bool> {
        let Some(element) = board.selected_element() else {
            return Ok(false);
        };
        let id = element.id.clone();
        let (x, y, width, height) = (element.x, element.y, element.width, element.height);

        match self {
            Self::X(v) => board.move_element(&id, *v, y)?,
            Self::Y(v) => board.move_element(&id, x, *v)?,
            Self::Width(v) => board.resize_element(&id, *v, height)?,
            Self::Height(v) => board.resize_element(&id, width, *v)?,
            Self::Rotation(v) => {
                board.set_rotation(&id, *v)?;
                true
            }
            Self::Color(c) => {
                if c.is_empty() {
                    return Err(BoardError::InvalidValue {
                        field: "color",
                        value: c.clone(),
                    });
                }
                board.set_color(&id, c)?;
                true
            }
            Self::Text(t) => {
                board.set_text(&id, t)?;
                true
            }
        };
        Ok(true)
    }
}

/// A click in the layer list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "id", rename_all = "lowercase")]
pub enum LayerCommand {
    /// Row clicked: select the element.
    Select(ElementId),
    /// Promote control clicked: move the element one step up.
    Promote(ElementId),
}

impl LayerCommand {
    /// Apply the command.
    ///
    /// Returns whether the board changed; promoting needs a snapshot,
    /// selecting only a re-render.
    ///
    /// # Errors
    ///
    /// Returns an error if the element is not found.
    pub fn apply(&self, board: &mut Board) -> BoardResult<bool> {
        match self {
            Self::Select(id) => {
                board.select(id)?;
                Ok(false)
            }
            Self::Promote(id) => board.promote(id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ElementKind;

    fn selected_board(kind: ElementKind) -> (Board, ElementId) {
        let mut board = Board::new(800.0, 600.0);
        let element = board.create_element(kind);
        let id = board.add_element(element).expect("add");
        board.select(&id).expect("select");
        (board, id)
    }

    #[test]
    fn parse_numeric_fields() {
        assert_eq!(
            PropertyEdit::parse(PropertyField::X, " 42 ").expect("parse"),
            PropertyEdit::X(42.0)
        );
        assert_eq!(
            PropertyEdit::parse(PropertyField::Rotation, "-12.9").expect("parse"),
            PropertyEdit::Rotation(-12.0)
        );
    }

    #[test]
    fn parse_rejects_garbage() {
        let err = PropertyEdit::parse(PropertyField::Width, "wide").expect_err("invalid");
        assert!(matches!(err, BoardError::InvalidValue { field: "width", .. }));
        assert!(PropertyEdit::parse(PropertyField::Height, "").is_err());
        assert!(PropertyEdit::parse(PropertyField::X, "inf").is_err());
    }

    #[test]
    fn parse_text_keeps_whitespace() {
        assert_eq!(
            PropertyEdit::parse(PropertyField::Text, " hi ").expect("parse"),
            PropertyEdit::Text(" hi ".to_string())
        );
    }

    #[test]
    fn edits_apply_to_selection() {
        let (mut board, id) = selected_board(ElementKind::Rectangle);
        PropertyEdit::X(120.0).apply(&mut board).expect("x");
        PropertyEdit::Rotation(725.0).apply(&mut board).expect("rotation");
        PropertyEdit::Color("#123456".into())
            .apply(&mut board)
            .expect("color");

        let el = board.get_element(&id).expect("exists");
        assert!((el.x - 120.0).abs() < f64::EPSILON);
        assert!((el.rotation - 725.0).abs() < f64::EPSILON);
        assert_eq!(el.color, "#123456");
    }

    #[test]
    fn geometry_edits_are_clamped() {
        let (mut board, id) = selected_board(ElementKind::Rectangle);
        PropertyEdit::Width(3.0).apply(&mut board).expect("width");
        PropertyEdit::Y(10_000.0).apply(&mut board).expect("y");
        let el = board.get_element(&id).expect("exists");
        assert!((el.width - 10.0).abs() < f64::EPSILON);
        assert!((el.bottom() - 600.0).abs() < f64::EPSILON);
    }

    #[test]
    fn text_edit_on_shape_fails() {
        let (mut board, _id) = selected_board(ElementKind::Circle);
        assert!(PropertyEdit::Text("x".into()).apply(&mut board).is_err());
    }

    #[test]
    fn edit_without_selection_is_noop() {
        let (mut board, _id) = selected_board(ElementKind::Text);
        board.clear_selection();
        let before = board.clone();
        assert!(!PropertyEdit::X(1.0).apply(&mut board).expect("noop"));
        assert_eq!(board, before);
    }

    #[test]
    fn layer_commands() {
        let mut board = Board::new(800.0, 600.0);
        let a = board
            .add_element(board.create_element(ElementKind::Rectangle))
            .expect("a");
        let b = board
            .add_element(board.create_element(ElementKind::Circle))
            .expect("b");

        assert!(!LayerCommand::Select(b.clone()).apply(&mut board).expect("select"));
        assert!(board.is_selected(&b));

        assert!(LayerCommand::Promote(a.clone()).apply(&mut board).expect("promote"));
        assert_eq!(board.index_of(&a), Some(1));
        assert!(!LayerCommand::Promote(a).apply(&mut board).expect("topmost"));
    }
}
