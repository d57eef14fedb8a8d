//! The editor: board state, interaction controller and persistence behind a
//! small set of named operations.
//!
//! Every operation returns an [`Outcome`] telling the host whether to
//! re-render. Committed mutations are persisted before the operation
//! returns; a failed save is logged and the in-memory board stays
//! authoritative.

use crate::interaction::{InteractionController, Outcome};
use crate::panel::{LayerCommand, PropertyEdit};
use crate::store::{to_export, KeyValueStore, SnapshotStore};
use crate::{Board, BoardResult, EditorConfig, ElementId, ElementKind, InputEvent};

/// Offset step applied to each newly added element so they do not stack
/// exactly on top of each other.
const ADD_OFFSET_STEP: usize = 10;

/// The offset wraps back to zero after this many pixels.
const ADD_OFFSET_WRAP: usize = 100;

/// Explicit state container for one board.
#[derive(Debug)]
pub struct Editor<S> {
    board: Board,
    controller: InteractionController,
    snapshots: SnapshotStore<S>,
    config: EditorConfig,
}

impl<S: KeyValueStore> Editor<S> {
    /// Load the editor from `store`, seeding a default board when there is
    /// no usable snapshot.
    pub fn load(store: S, config: EditorConfig) -> Self {
        let snapshots = SnapshotStore::new(store, config.storage_key.clone());
        let board = snapshots.load(config.board_width, config.board_height, config.min_size);
        tracing::info!("Editor ready with {} elements", board.element_count());
        Self {
            board,
            controller: InteractionController::new(config.nudge_step),
            snapshots,
            config,
        }
    }

    /// The board state.
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The configuration.
    #[must_use]
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// The interaction controller.
    #[must_use]
    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    /// The snapshot store.
    #[must_use]
    pub fn snapshots(&self) -> &SnapshotStore<S> {
        &self.snapshots
    }

    /// Feed a pointer or keyboard event through the interaction controller.
    pub fn handle_input(&mut self, event: &InputEvent) -> Outcome {
        let outcome = self.controller.handle(&mut self.board, event);
        self.finish(outcome)
    }

    /// Select an element.
    pub fn select(&mut self, id: &ElementId) -> Outcome {
        match self.board.select(id) {
            Ok(()) => Outcome::RENDER,
            Err(e) => {
                tracing::debug!("Select ignored: {e}");
                Outcome::NONE
            }
        }
    }

    /// Add a new element of `kind`, offset from the default position and
    /// selected.
    pub fn add_element(&mut self, kind: ElementKind) -> Outcome {
        let offset = (self.board.element_count() * ADD_OFFSET_STEP) % ADD_OFFSET_WRAP;
        #[allow(clippy::cast_precision_loss)]
        let offset = offset as f64;

        let element = self.board.create_element(kind);
        let (x, y) = (element.x + offset, element.y + offset);
        let element = element
            .with_position(x, y)
            .with_color(self.config.default_color.as_str());

        match self.board.add_element(element) {
            Ok(id) => {
                tracing::debug!("Added {kind} {id}");
                if let Err(e) = self.board.select(&id) {
                    tracing::warn!("Failed to select new element: {e}");
                }
                self.finish(Outcome::COMMIT)
            }
            Err(e) => {
                tracing::warn!("Failed to add element: {e}");
                Outcome::NONE
            }
        }
    }

    /// Delete the selected element. No-op when nothing is selected.
    pub fn delete_selected(&mut self) -> Outcome {
        let Some(id) = self.board.selected_id().cloned() else {
            return Outcome::NONE;
        };
        self.controller.reset();
        match self.board.remove_element(&id) {
            Ok(_) => self.finish(Outcome::COMMIT),
            Err(e) => {
                tracing::debug!("Delete ignored: {e}");
                self.board.clear_selection();
                Outcome::RENDER
            }
        }
    }

    /// Write a property-form edit to the selected element.
    ///
    /// # Errors
    ///
    /// Returns an error if the edit cannot be applied; the board is left
    /// unchanged.
    pub fn edit_property(&mut self, edit: &PropertyEdit) -> BoardResult<Outcome> {
        if edit.apply(&mut self.board)? {
            Ok(self.finish(Outcome::COMMIT))
        } else {
            Ok(Outcome::NONE)
        }
    }

    /// Apply a layer-list click.
    pub fn layer_command(&mut self, command: &LayerCommand) -> Outcome {
        match command.apply(&mut self.board) {
            Ok(true) => self.finish(Outcome::COMMIT),
            Ok(false) => Outcome::RENDER,
            Err(e) => {
                tracing::debug!("Layer command ignored: {e}");
                Outcome::NONE
            }
        }
    }

    /// Swap an element with the one above it in paint order.
    pub fn promote(&mut self, id: &ElementId) -> Outcome {
        self.layer_command(&LayerCommand::Promote(id.clone()))
    }

    /// Remove every element once `confirm` agrees.
    pub fn clear(&mut self, confirm: impl FnOnce() -> bool) -> Outcome {
        if !confirm() {
            tracing::debug!("Clear cancelled");
            return Outcome::NONE;
        }
        self.controller.reset();
        self.board.clear();
        tracing::info!("Board cleared");
        self.finish(Outcome::COMMIT)
    }

    /// The elements as a pretty-printed JSON array.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn export_json(&self) -> BoardResult<String> {
        to_export(self.board.elements())
    }

    /// Update the board size reported by the host.
    pub fn set_board_size(&mut self, width: f64, height: f64) -> Outcome {
        if (width, height) == (self.board.width(), self.board.height()) {
            return Outcome::NONE;
        }
        tracing::debug!("Board resized to {width}x{height}");
        self.board.set_size(width, height);
        Outcome::RENDER
    }

    /// Persist the board now.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the store write fails.
    pub fn save(&self) -> BoardResult<()> {
        self.snapshots.save(&self.board)
    }

    fn finish(&self, outcome: Outcome) -> Outcome {
        if outcome.commit {
            if let Err(e) = self.save() {
                tracing::warn!("Failed to persist board: {e}");
            }
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::{Key, PointerTarget};

    fn editor() -> Editor<MemoryStore> {
        Editor::load(MemoryStore::new(), EditorConfig::default())
    }

    fn saved_count(editor: &Editor<MemoryStore>) -> Option<usize> {
        let raw = editor
            .snapshots()
            .inner()
            .get(&editor.config().storage_key)
            .expect("get")?;
        let value: serde_json::Value = serde_json::from_str(&raw).expect("json");
        value.as_array().map(Vec::len)
    }

    #[test]
    fn fresh_editor_is_seeded_but_not_saved() {
        let editor = editor();
        assert_eq!(editor.board().element_count(), 1);
        assert_eq!(saved_count(&editor), None);
    }

    #[test]
    fn add_offsets_selects_and_saves() {
        let mut editor = editor();
        let out = editor.add_element(ElementKind::Circle);
        assert!(out.render && out.commit);

        let selected = editor.board().selected_element().expect("selected");
        assert_eq!(selected.kind, ElementKind::Circle);
        assert!((selected.x - 60.0).abs() < f64::EPSILON);
        assert!((selected.y - 60.0).abs() < f64::EPSILON);
        assert_eq!(selected.stack_order, 2);
        assert_eq!(saved_count(&editor), Some(2));
    }

    #[test]
    fn add_uses_configured_color() {
        let config = EditorConfig {
            default_color: "#123456".to_string(),
            ..EditorConfig::default()
        };
        let mut editor = Editor::load(MemoryStore::new(), config);
        editor.add_element(ElementKind::Rectangle);
        let selected = editor.board().selected_element().expect("selected");
        assert_eq!(selected.color, "#123456");
    }

    #[test]
    fn add_offset_wraps() {
        let store = MemoryStore::with_value("canvasDesign", "[]");
        let mut editor = Editor::load(store, EditorConfig::default());
        for _ in 0..10 {
            editor.add_element(ElementKind::Rectangle);
        }
        // The eleventh element is added with ten already present: 100 % 100.
        editor.add_element(ElementKind::Text);
        let selected = editor.board().selected_element().expect("selected");
        assert!((selected.x - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn drag_persists_only_on_release() {
        let mut editor = editor();
        let id = editor.board().elements()[0].id.clone();
        editor.handle_input(&InputEvent::pointer_down(
            0.0,
            0.0,
            PointerTarget::Element(id),
        ));
        editor.handle_input(&InputEvent::pointer_move(30.0, 20.0));
        assert_eq!(saved_count(&editor), None);

        let out = editor.handle_input(&InputEvent::PointerUp);
        assert!(out.commit);
        assert_eq!(saved_count(&editor), Some(1));
    }

    #[test]
    fn delete_selected_clears_selection() {
        let mut editor = editor();
        let id = editor.board().elements()[0].id.clone();
        editor.select(&id);
        let out = editor.delete_selected();
        assert!(out.commit);
        assert!(editor.board().is_empty());
        assert!(editor.board().selected_id().is_none());
        assert_eq!(saved_count(&editor), Some(0));
    }

    #[test]
    fn delete_without_selection_is_noop() {
        let mut editor = editor();
        assert_eq!(editor.delete_selected(), Outcome::NONE);
        assert_eq!(editor.board().element_count(), 1);
    }

    #[test]
    fn clear_requires_confirmation() {
        let mut editor = editor();
        assert_eq!(editor.clear(|| false), Outcome::NONE);
        assert_eq!(editor.board().element_count(), 1);

        let out = editor.clear(|| true);
        assert!(out.commit);
        assert!(editor.board().is_empty());
        assert_eq!(saved_count(&editor), Some(0));
    }

    #[test]
    fn invalid_property_leaves_board_untouched() {
        let mut editor = editor();
        let id = editor.board().elements()[0].id.clone();
        editor.select(&id);
        let before = editor.board().clone();
        let result = editor.edit_property(&PropertyEdit::Color(String::new()));
        assert!(result.is_err());
        assert_eq!(editor.board(), &before);
        assert_eq!(saved_count(&editor), None);
    }

    #[test]
    fn property_edit_persists() {
        let mut editor = editor();
        let id = editor.board().elements()[0].id.clone();
        editor.select(&id);
        let out = editor
            .edit_property(&PropertyEdit::Rotation(45.0))
            .expect("edit");
        assert!(out.commit);
        assert_eq!(saved_count(&editor), Some(1));
    }

    #[test]
    fn selecting_a_layer_does_not_persist() {
        let mut editor = editor();
        let id = editor.board().elements()[0].id.clone();
        let out = editor.layer_command(&LayerCommand::Select(id));
        assert_eq!(out, Outcome::RENDER);
        assert_eq!(saved_count(&editor), None);
    }

    #[test]
    fn promote_persists() {
        let mut editor = editor();
        let bottom = editor.board().elements()[0].id.clone();
        editor.add_element(ElementKind::Text);
        let out = editor.promote(&bottom);
        assert!(out.commit);
        assert_eq!(editor.board().index_of(&bottom), Some(1));
    }

    #[test]
    fn nudge_goes_through_handle_input() {
        let mut editor = editor();
        let id = editor.board().elements()[0].id.clone();
        editor.select(&id);
        let out = editor.handle_input(&InputEvent::key(Key::ArrowDown));
        assert!(out.prevent_default);
        assert!((editor.board().elements()[0].y - 55.0).abs() < f64::EPSILON);
        assert_eq!(saved_count(&editor), Some(1));
    }

    #[test]
    fn board_resize_reclamps() {
        let mut editor = editor();
        assert_eq!(editor.set_board_size(800.0, 600.0), Outcome::NONE);
        assert_eq!(editor.set_board_size(120.0, 120.0), Outcome::RENDER);
        let el = &editor.board().elements()[0];
        assert!(el.right() <= 120.0 && el.bottom() <= 120.0);
    }

    #[test]
    fn export_matches_board() {
        let editor = editor();
        let json = editor.export_json().expect("export");
        let parsed = crate::store::from_snapshot(&json).expect("parse");
        assert_eq!(parsed, editor.board().elements());
    }
}
