//! Headless backend for tests and non-browser hosts.
//!
//! Keeps the last drawn view instead of touching any surface.

use crate::{BackendType, BoardView, RenderResult};

use super::RenderBackend;

/// Backend that records frames in memory.
#[derive(Debug)]
pub struct HeadlessBackend {
    width: u32,
    height: u32,
    last_frame: Option<BoardView>,
}

impl HeadlessBackend {
    /// Create a new headless backend.
    #[must_use]
    pub fn new() -> Self {
        Self {
            width: 800,
            height: 600,
            last_frame: None,
        }
    }

    /// The most recently drawn view.
    #[must_use]
    pub fn last_frame(&self) -> Option<&BoardView> {
        self.last_frame.as_ref()
    }

    /// Current surface size.
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderBackend for HeadlessBackend {
    fn backend_type(&self) -> BackendType {
        BackendType::Headless
    }

    fn render(&mut self, view: &BoardView) -> RenderResult<()> {
        tracing::trace!(
            "Headless render: {} nodes, {} layers, surface {}x{}",
            view.nodes.len(),
            view.layers.len(),
            self.width,
            self.height
        );
        for node in &view.nodes {
            tracing::trace!("Render {} {} [{}]", node.kind, node.id, node.style.css_text());
        }
        self.last_frame = Some(view.clone());
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) -> RenderResult<()> {
        self.width = width;
        self.height = height;
        tracing::debug!("Headless surface resized to {}x{}", width, height);
        Ok(())
    }
}
