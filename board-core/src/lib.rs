//! # Board Core
//!
//! State and behaviour of a direct-manipulation board editor, free of any
//! UI toolkit so it can be driven from the browser or from tests.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                   Editor                    │
//! ├─────────────────────────────────────────────┤
//! │  Interaction        │  Panel Binders        │
//! │  - Drag / resize    │  - Property edits     │
//! │  - Nudge / delete   │  - Layer commands     │
//! ├─────────────────────────────────────────────┤
//! │  Board State        │  Snapshot Store       │
//! │  - Elements         │  - Key-value backend  │
//! │  - Selection        │  - Load / save        │
//! │  - Bounds clamps    │  - Export             │
//! └─────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod board;
pub mod config;
pub mod editor;
pub mod element;
pub mod error;
pub mod event;
pub mod interaction;
pub mod panel;
pub mod store;

pub use board::Board;
pub use config::EditorConfig;
pub use editor::Editor;
pub use element::{Element, ElementId, ElementKind};
pub use error::{BoardError, BoardResult};
pub use event::{InputEvent, Key, PointerTarget};
pub use interaction::{Gesture, InteractionController, Outcome};
pub use panel::{LayerCommand, PropertyEdit, PropertyField};
pub use store::{KeyValueStore, MemoryStore, SnapshotStore, StoreError};

/// Board core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
