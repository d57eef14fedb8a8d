//! # Board Renderer
//!
//! Projects board state into a view and hands it to a backend.
//!
//! ```text
//! ┌──────────────┐   project()   ┌───────────┐   render()   ┌───────────────┐
//! │ board_core:: │ ────────────► │ BoardView │ ───────────► │ RenderBackend │
//! │ Board        │               │ (pure)    │              │ DOM/headless  │
//! └──────────────┘               └───────────┘              └───────────────┘
//! ```
//!
//! Every frame is a full rebuild from the current state.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod backend;
pub mod error;
pub mod view;

pub use backend::headless::HeadlessBackend;
pub use backend::RenderBackend;
pub use error::{RenderError, RenderResult};
pub use view::{BoardView, ElementNode, LayerRow, PropertiesView, Style};

use board_core::Board;
use serde::{Deserialize, Serialize};

/// Configuration for the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Colour of the selection glow and text outline.
    pub accent_color: String,
    /// Font size of text elements, in pixels.
    pub text_font_size: f64,
    /// Foreground colour of element content.
    pub text_color: String,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            accent_color: "#00f0ff".to_string(),
            text_font_size: 16.0,
            text_color: "#ffffff".to_string(),
        }
    }
}

/// Project `board` into a view. Pure: equal inputs give equal views.
#[must_use]
pub fn render_view(board: &Board, config: &RendererConfig) -> BoardView {
    BoardView::project(board, config)
}

/// Available rendering backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendType {
    /// Browser DOM nodes.
    Dom,
    /// In-memory, no surface.
    Headless,
}

/// The main renderer interface.
pub struct Renderer {
    config: RendererConfig,
    backend: Box<dyn RenderBackend>,
    last_view: Option<BoardView>,
    frame_count: u64,
}

impl Renderer {
    /// Create a renderer drawing through `backend`.
    #[must_use]
    pub fn new(config: RendererConfig, backend: Box<dyn RenderBackend>) -> Self {
        tracing::debug!("Renderer using {:?} backend", backend.backend_type());
        Self {
            config,
            backend,
            last_view: None,
            frame_count: 0,
        }
    }

    /// Create a renderer with the headless backend.
    #[must_use]
    pub fn headless(config: RendererConfig) -> Self {
        Self::new(config, Box::new(HeadlessBackend::new()))
    }

    /// Render a frame of `board`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to draw.
    pub fn render(&mut self, board: &Board) -> RenderResult<()> {
        let view = render_view(board, &self.config);
        self.backend.render(&view)?;
        self.last_view = Some(view);
        self.frame_count += 1;
        Ok(())
    }

    /// The view drawn by the last successful frame.
    #[must_use]
    pub fn last_view(&self) -> Option<&BoardView> {
        self.last_view.as_ref()
    }

    /// Get the current frame count.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get the active backend type.
    #[must_use]
    pub fn active_backend(&self) -> BackendType {
        self.backend.backend_type()
    }

    /// Get the renderer configuration.
    #[must_use]
    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Resize the rendering surface.
    ///
    /// # Errors
    ///
    /// Returns an error if resize fails.
    pub fn resize(&mut self, width: u32, height: u32) -> RenderResult<()> {
        self.backend.resize(width, height)
    }
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("config", &self.config)
            .field("backend", &self.backend.backend_type())
            .field("frame_count", &self.frame_count)
            .finish_non_exhaustive()
    }
}
