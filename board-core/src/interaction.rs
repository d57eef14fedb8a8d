//! Direct-manipulation state machine.
//!
//! ```text
//!            pointer-down on element body
//!   ┌──────┐ ───────────────────────────────▶ ┌──────────┐
//!   │ Idle │                                   │ Dragging │──┐ pointer-move:
//!   └──────┘ ◀─────────────────────────────── └──────────┘◀─┘ start + delta, clamped
//!     │   ▲          pointer-up (persist if moved)
//!     │   │
//!     │   │ pointer-up (persist if resized)
//!     ▼   │
//!   ┌──────────┐──┐ pointer-move:
//!   │ Resizing │◀─┘ start size + delta, floored at the minimum
//!   └──────────┘
//!     ▲
//!     └── pointer-down on the selected element's resize handle
//! ```
//!
//! Keyboard input acts on the selection: arrows nudge it, Delete/Backspace
//! removes it.

use crate::event::{InputEvent, Key, PointerTarget};
use crate::{Board, ElementId};

/// A point in the host's pointer coordinate frame.
pub type Point = (f64, f64);

/// The gesture in progress.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Gesture {
    /// No gesture.
    #[default]
    Idle,
    /// Moving an element with the pointer.
    Dragging {
        /// Element being dragged.
        id: ElementId,
        /// Pointer position at pointer-down.
        pointer_start: Point,
        /// Element position at pointer-down.
        element_start: Point,
        /// Whether any move changed the element.
        moved: bool,
    },
    /// Resizing an element from its handle.
    Resizing {
        /// Element being resized.
        id: ElementId,
        /// Pointer position at pointer-down.
        pointer_start: Point,
        /// Element size at pointer-down.
        size_start: Point,
        /// Whether any move changed the element.
        moved: bool,
    },
}

impl Gesture {
    /// Whether no gesture is in progress.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    fn mutated(&self) -> bool {
        match self {
            Self::Idle => false,
            Self::Dragging { moved, .. } | Self::Resizing { moved, .. } => *moved,
        }
    }
}

/// What the host should do after an event was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Outcome {
    /// The board changed visibly; re-render.
    pub render: bool,
    /// A committed mutation happened; persist a snapshot.
    pub commit: bool,
    /// Suppress the host's default action (e.g. arrow-key scrolling).
    pub prevent_default: bool,
}

impl Outcome {
    /// Nothing to do.
    pub const NONE: Self = Self {
        render: false,
        commit: false,
        prevent_default: false,
    };

    /// Re-render without persisting.
    pub const RENDER: Self = Self {
        render: true,
        commit: false,
        prevent_default: false,
    };

    /// Re-render and persist.
    pub const COMMIT: Self = Self {
        render: true,
        commit: true,
        prevent_default: false,
    };

    /// Combine two outcomes.
    #[must_use]
    pub const fn merge(self, other: Self) -> Self {
        Self {
            render: self.render || other.render,
            commit: self.commit || other.commit,
            prevent_default: self.prevent_default || other.prevent_default,
        }
    }
}

/// Translates input events into board mutations.
#[derive(Debug, Clone)]
pub struct InteractionController {
    gesture: Gesture,
    nudge_step: f64,
}

impl InteractionController {
    /// Create a controller with the given arrow-key step.
    #[must_use]
    pub fn new(nudge_step: f64) -> Self {
        Self {
            gesture: Gesture::Idle,
            nudge_step,
        }
    }

    /// The gesture in progress.
    #[must_use]
    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    /// Abandon any gesture without committing it.
    pub fn reset(&mut self) {
        self.gesture = Gesture::Idle;
    }

    /// Process an input event against the board.
    pub fn handle(&mut self, board: &mut Board, event: &InputEvent) -> Outcome {
        match event {
            InputEvent::PointerDown { x, y, target } => self.pointer_down(board, (*x, *y), target),
            InputEvent::PointerMove { x, y } => self.pointer_move(board, (*x, *y)),
            InputEvent::PointerUp => self.pointer_up(),
            InputEvent::Key { key, in_text_input } => {
                if *in_text_input {
                    return Outcome::NONE;
                }
                self.key(board, *key)
            }
        }
    }

    fn pointer_down(&mut self, board: &mut Board, at: Point, target: &PointerTarget) -> Outcome {
        // A pointer-down while a gesture is live means the pointer-up was lost.
        let finished = self.pointer_up();

        let started = match target {
            PointerTarget::Board => Outcome::NONE,
            PointerTarget::ResizeHandle(id) if Self::has_resize_handle(board, id) => {
                self.begin_resize(board, id, at)
            }
            PointerTarget::ResizeHandle(id) | PointerTarget::Element(id) => {
                self.begin_drag(board, id, at)
            }
        };
        finished.merge(started)
    }

    fn has_resize_handle(board: &Board, id: &ElementId) -> bool {
        board.is_selected(id)
            && board
                .get_element(id)
                .is_some_and(|e| !e.kind.is_text())
    }

    fn begin_drag(&mut self, board: &mut Board, id: &ElementId, at: Point) -> Outcome {
        if board.select(id).is_err() {
            tracing::debug!("Pointer-down on unknown element {id}");
            return Outcome::NONE;
        }
        let Some(element) = board.get_element(id) else {
            return Outcome::RENDER;
        };
        tracing::debug!("Drag start on {id}");
        self.gesture = Gesture::Dragging {
            id: id.clone(),
            pointer_start: at,
            element_start: (element.x, element.y),
            moved: false,
        };
        Outcome::RENDER
    }

    fn begin_resize(&mut self, board: &Board, id: &ElementId, at: Point) -> Outcome {
        let Some(element) = board.get_element(id) else {
            return Outcome::NONE;
        };
        tracing::debug!("Resize start on {id}");
        self.gesture = Gesture::Resizing {
            id: id.clone(),
            pointer_start: at,
            size_start: (element.width, element.height),
            moved: false,
        };
        Outcome::NONE
    }

    fn pointer_move(&mut self, board: &mut Board, at: Point) -> Outcome {
        let result = match &mut self.gesture {
            Gesture::Idle => return Outcome::NONE,
            Gesture::Dragging {
                id,
                pointer_start,
                element_start,
                moved,
            } => {
                let x = element_start.0 + (at.0 - pointer_start.0);
                let y = element_start.1 + (at.1 - pointer_start.1);
                board.move_element(id, x, y).map(|changed| *moved |= changed)
            }
            Gesture::Resizing {
                id,
                pointer_start,
                size_start,
                moved,
            } => {
                let width = size_start.0 + (at.0 - pointer_start.0);
                let height = size_start.1 + (at.1 - pointer_start.1);
                board
                    .resize_element(id, width, height)
                    .map(|changed| *moved |= changed)
            }
        };

        match result {
            Ok(()) => Outcome::RENDER,
            Err(e) => {
                tracing::debug!("Gesture target vanished: {e}");
                self.gesture = Gesture::Idle;
                Outcome::NONE
            }
        }
    }

    fn pointer_up(&mut self) -> Outcome {
        let gesture = std::mem::take(&mut self.gesture);
        if gesture.is_idle() {
            return Outcome::NONE;
        }
        let commit = gesture.mutated();
        tracing::debug!("Gesture ended, committed: {commit}");
        Outcome {
            commit,
            ..Outcome::NONE
        }
    }

    fn key(&mut self, board: &mut Board, key: Key) -> Outcome {
        let Some(id) = board.selected_id().cloned() else {
            return Outcome::NONE;
        };

        if let Some((dx, dy)) = key.direction() {
            let step = self.nudge_step;
            return match board.nudge_element(&id, dx * step, dy * step) {
                Ok(_) => Outcome {
                    prevent_default: true,
                    ..Outcome::COMMIT
                },
                Err(e) => {
                    tracing::debug!("Nudge ignored: {e}");
                    Outcome::NONE
                }
            };
        }

        if key.is_delete() {
            self.gesture = Gesture::Idle;
            return match board.remove_element(&id) {
                Ok(removed) => {
                    tracing::debug!("Deleted {} {}", removed.kind, removed.id);
                    Outcome::COMMIT
                }
                Err(e) => {
                    tracing::debug!("Delete ignored: {e}");
                    board.clear_selection();
                    Outcome::RENDER
                }
            };
        }

        Outcome::NONE
    }
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_NUDGE_STEP)
    }
}
