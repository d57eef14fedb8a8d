//! Rendering backend implementations.

pub mod headless;

use crate::{BackendType, BoardView, RenderResult};

/// Trait for rendering backends.
///
/// A backend draws a complete [`BoardView`] every frame. It keeps no
/// element state between frames.
pub trait RenderBackend {
    /// Get the backend type.
    fn backend_type(&self) -> BackendType;

    /// Draw a view, replacing whatever the previous frame drew.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render(&mut self, view: &BoardView) -> RenderResult<()>;

    /// Resize the rendering surface.
    ///
    /// # Errors
    ///
    /// Returns an error if resizing fails.
    fn resize(&mut self, width: u32, height: u32) -> RenderResult<()>;
}
