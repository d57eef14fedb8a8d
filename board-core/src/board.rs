//! Board state: the ordered element sequence plus the current selection.
//!
//! The sequence order is the paint order (last element paints on top). All
//! mutations go through the named operations below, each of which leaves
//! every element inside the board rectangle with both sides at least the
//! minimum size.

use std::collections::HashSet;

use crate::element::MIN_SIZE;
use crate::{BoardError, BoardResult, Element, ElementId, ElementKind};

/// The board: elements in paint order, the selection and the visible bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    /// Elements in paint order.
    elements: Vec<Element>,
    /// Currently selected element, if any.
    selected: Option<ElementId>,
    /// Visible board width in pixels.
    width: f64,
    /// Visible board height in pixels.
    height: f64,
    /// Minimum element width and height.
    min_size: f64,
}

impl Board {
    /// Create an empty board with the given visible size.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            elements: Vec::new(),
            selected: None,
            width: width.max(0.0),
            height: height.max(0.0),
            min_size: MIN_SIZE,
        }
    }

    /// Set the minimum element size.
    #[must_use]
    pub fn with_min_size(mut self, min_size: f64) -> Self {
        self.min_size = min_size;
        self
    }

    /// Build a board from a loaded element sequence.
    ///
    /// Sizes below the minimum are floored and positions clamped into the
    /// board; the sequence order is kept as the paint order.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::DuplicateId`] if two elements share an id.
    pub fn from_elements(
        elements: Vec<Element>,
        width: f64,
        height: f64,
        min_size: f64,
    ) -> BoardResult<Self> {
        let mut board = Self::new(width, height).with_min_size(min_size);
        for element in elements {
            board.add_element(element)?;
        }
        Ok(board)
    }

    /// Visible board width.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Visible board height.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Minimum element width and height.
    #[must_use]
    pub fn min_size(&self) -> f64 {
        self.min_size
    }

    /// Change the visible board size and pull every element back inside.
    pub fn set_size(&mut self, width: f64, height: f64) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
        let (board_w, board_h, min) = (self.width, self.height, self.min_size);
        for element in &mut self.elements {
            normalize(element, board_w, board_h, min);
        }
    }

    // -----------------------------------------------------------------------
    // Factory
    // -----------------------------------------------------------------------

    /// Stack order that places a new element above every existing one.
    #[must_use]
    pub fn next_stack_order(&self) -> i64 {
        self.elements
            .iter()
            .map(|e| e.stack_order)
            .max()
            .map_or(1, |max| max + 1)
    }

    /// Build a new element of `kind` stacked above everything on the board.
    ///
    /// The element is not inserted.
    #[must_use]
    pub fn create_element(&self, kind: ElementKind) -> Element {
        Element::new(kind).with_stack_order(self.next_stack_order())
    }

    // -----------------------------------------------------------------------
    // Sequence
    // -----------------------------------------------------------------------

    /// Append an element on top of the paint order.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::DuplicateId`] if the id is already on the board.
    pub fn add_element(&mut self, mut element: Element) -> BoardResult<ElementId> {
        if self.index_of(&element.id).is_some() {
            return Err(BoardError::DuplicateId(element.id.to_string()));
        }
        normalize(&mut element, self.width, self.height, self.min_size);
        let id = element.id.clone();
        self.elements.push(element);
        Ok(id)
    }

    /// Remove an element, clearing the selection if it pointed at it.
    ///
    /// # Errors
    ///
    /// Returns an error if the element is not found.
    pub fn remove_element(&mut self, id: &ElementId) -> BoardResult<Element> {
        let index = self
            .index_of(id)
            .ok_or_else(|| BoardError::ElementNotFound(id.to_string()))?;
        if self.selected.as_ref() == Some(id) {
            self.selected = None;
        }
        Ok(self.elements.remove(index))
    }

    /// Remove every element and clear the selection.
    pub fn clear(&mut self) {
        self.elements.clear();
        self.selected = None;
    }

    /// Get an element by ID.
    #[must_use]
    pub fn get_element(&self, id: &ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == *id)
    }

    /// Paint-order position of an element.
    #[must_use]
    pub fn index_of(&self, id: &ElementId) -> Option<usize> {
        self.elements.iter().position(|e| e.id == *id)
    }

    /// All elements in paint order.
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Get the number of elements on the board.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Check if the board is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    // -----------------------------------------------------------------------
    // Selection
    // -----------------------------------------------------------------------

    /// Select an element, replacing any previous selection.
    ///
    /// # Errors
    ///
    /// Returns an error if the element is not found.
    pub fn select(&mut self, id: &ElementId) -> BoardResult<()> {
        if self.index_of(id).is_none() {
            return Err(BoardError::ElementNotFound(id.to_string()));
        }
        self.selected = Some(id.clone());
        Ok(())
    }

    /// Clear the selection.
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// The selected element's id.
    #[must_use]
    pub fn selected_id(&self) -> Option<&ElementId> {
        self.selected.as_ref()
    }

    /// The selected element.
    #[must_use]
    pub fn selected_element(&self) -> Option<&Element> {
        self.selected.as_ref().and_then(|id| self.get_element(id))
    }

    /// Whether `id` is the selected element.
    #[must_use]
    pub fn is_selected(&self, id: &ElementId) -> bool {
        self.selected.as_ref() == Some(id)
    }

    // -----------------------------------------------------------------------
    // Geometry
    // -----------------------------------------------------------------------

    /// Clamp a top-left position so a `width` x `height` box stays on the board.
    ///
    /// A box larger than the board on an axis is pinned to 0 on that axis.
    #[must_use]
    pub fn constrain_position(&self, x: f64, y: f64, width: f64, height: f64) -> (f64, f64) {
        (
            clamp_axis(x, self.width - width),
            clamp_axis(y, self.height - height),
        )
    }

    /// Floor a size at the minimum and cap it at the board edge measured from
    /// `(x, y)`. The floor wins when the two disagree.
    #[must_use]
    pub fn constrain_size(&self, x: f64, y: f64, width: f64, height: f64) -> (f64, f64) {
        (
            width.min(self.width - x).max(self.min_size),
            height.min(self.height - y).max(self.min_size),
        )
    }

    /// Move an element to `(x, y)`, clamped to the board.
    ///
    /// Returns whether the position changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the element is not found.
    pub fn move_element(&mut self, id: &ElementId, x: f64, y: f64) -> BoardResult<bool> {
        let (board_w, board_h, min) = (self.width, self.height, self.min_size);
        let element = self.element_mut(id)?;
        let before = (element.x, element.y);
        element.x = x;
        element.y = y;
        normalize(element, board_w, board_h, min);
        Ok(before != (element.x, element.y))
    }

    /// Move an element by a delta, clamped to the board.
    ///
    /// # Errors
    ///
    /// Returns an error if the element is not found.
    pub fn nudge_element(&mut self, id: &ElementId, dx: f64, dy: f64) -> BoardResult<bool> {
        let (x, y) = {
            let element = self
                .get_element(id)
                .ok_or_else(|| BoardError::ElementNotFound(id.to_string()))?;
            (element.x + dx, element.y + dy)
        };
        self.move_element(id, x, y)
    }

    /// Resize an element, floored at the minimum size and kept on the board.
    ///
    /// Returns whether the size changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the element is not found.
    pub fn resize_element(
        &mut self,
        id: &ElementId,
        width: f64,
        height: f64,
    ) -> BoardResult<bool> {
        let (board_w, board_h, min) = (self.width, self.height, self.min_size);
        let element = self.element_mut(id)?;
        let before = (element.width, element.height);
        element.width = width.min(board_w - element.x).max(min);
        element.height = height.min(board_h - element.y).max(min);
        normalize(element, board_w, board_h, min);
        Ok(before != (element.width, element.height))
    }

    /// Set an element's fill colour.
    ///
    /// # Errors
    ///
    /// Returns an error if the element is not found.
    pub fn set_color(&mut self, id: &ElementId, color: &str) -> BoardResult<()> {
        color.clone_into(&mut self.element_mut(id)?.color);
        Ok(())
    }

    /// Set an element's rotation in degrees. No range clamp is applied.
    ///
    /// # Errors
    ///
    /// Returns an error if the element is not found.
    pub fn set_rotation(&mut self, id: &ElementId, degrees: f64) -> BoardResult<()> {
        self.element_mut(id)?.rotation = degrees;
        Ok(())
    }

    /// Set the content of a text element.
    ///
    /// # Errors
    ///
    /// Returns an error if the element is not found or is not a text element.
    pub fn set_text(&mut self, id: &ElementId, text: &str) -> BoardResult<()> {
        let element = self.element_mut(id)?;
        if !element.kind.is_text() {
            return Err(BoardError::NotEditable("text"));
        }
        text.clone_into(&mut element.text);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Layering
    // -----------------------------------------------------------------------

    /// Swap an element with the one directly above it in paint order.
    ///
    /// Both the sequence positions and the stack order values are swapped.
    /// Returns `false` when the element is already topmost.
    ///
    /// # Errors
    ///
    /// Returns an error if the element is not found.
    pub fn promote(&mut self, id: &ElementId) -> BoardResult<bool> {
        let index = self
            .index_of(id)
            .ok_or_else(|| BoardError::ElementNotFound(id.to_string()))?;
        if index + 1 >= self.elements.len() {
            return Ok(false);
        }
        let lower = self.elements[index].stack_order;
        self.elements[index].stack_order = self.elements[index + 1].stack_order;
        self.elements[index + 1].stack_order = lower;
        self.elements.swap(index, index + 1);
        Ok(true)
    }

    /// Check the id-uniqueness and selection invariants.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let mut seen = HashSet::new();
        let unique = self.elements.iter().all(|e| seen.insert(&e.id));
        let selection_ok = self
            .selected
            .as_ref()
            .map_or(true, |id| self.index_of(id).is_some());
        unique && selection_ok
    }

    fn element_mut(&mut self, id: &ElementId) -> BoardResult<&mut Element> {
        self.elements
            .iter_mut()
            .find(|e| e.id == *id)
            .ok_or_else(|| BoardError::ElementNotFound(id.to_string()))
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

fn clamp_axis(value: f64, max: f64) -> f64 {
    value.min(max.max(0.0)).max(0.0)
}

/// Floor the size at `min`, then pull the position back onto the board.
fn normalize(element: &mut Element, board_w: f64, board_h: f64, min: f64) {
    element.width = element.width.max(min);
    element.height = element.height.max(min);
    element.x = clamp_axis(element.x, board_w - element.width);
    element.y = clamp_axis(element.y, board_h - element.height);
}
