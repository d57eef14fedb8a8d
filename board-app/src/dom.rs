//! DOM rendering backend.
//!
//! Tears down and rebuilds the board container, the properties form and the
//! layer list from a [`BoardView`] on every frame.

use board_core::PropertyField;
use board_renderer::{
    BackendType, BoardView, ElementNode, LayerRow, PropertiesView, RenderBackend, RenderError,
    RenderResult,
};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, HtmlInputElement};

use crate::storage::describe;

/// Attribute carrying the element id on board nodes and layer rows.
pub const ELEMENT_ID_ATTR: &str = "data-element-id";
/// Class of the resize handle inside a selected shape.
pub const RESIZE_HANDLE_CLASS: &str = "resize-handle";
/// Class of the promote control inside a layer row.
pub const LAYER_BUTTON_CLASS: &str = "layer-btn";
/// Id of the properties group holding the text input.
pub const TEXT_GROUP_ID: &str = "text-prop-group";
/// Id of the layer list.
pub const LAYERS_LIST_ID: &str = "layers-list";

fn host_err(value: &JsValue) -> RenderError {
    RenderError::Host(describe(value))
}

/// Whether a form input takes the rendered value. The focused input keeps
/// what is being typed (a clamped width would otherwise replace a partial
/// "5" on the way to "50"); it is refreshed once focus leaves it.
fn should_write(current: &str, next: &str, focused: bool) -> bool {
    !focused && current != next
}

/// Backend writing into the page DOM.
pub struct DomBackend {
    document: Document,
    container: Element,
    width: u32,
    height: u32,
}

impl DomBackend {
    /// Create a backend drawing into `container`.
    #[must_use]
    pub fn new(document: Document, container: Element) -> Self {
        let width = u32::try_from(container.client_width()).unwrap_or(0);
        let height = u32::try_from(container.client_height()).unwrap_or(0);
        Self {
            document,
            container,
            width,
            height,
        }
    }

    fn render_nodes(&self, nodes: &[ElementNode]) -> RenderResult<()> {
        self.container.set_inner_html("");
        for node in nodes {
            let div = self.document.create_element("div").map_err(|e| host_err(&e))?;
            div.set_class_name(&format!("board-element {}", node.kind));
            div.set_attribute(ELEMENT_ID_ATTR, node.id.as_str())
                .map_err(|e| host_err(&e))?;
            div.set_attribute("style", &node.style.css_text())
                .map_err(|e| host_err(&e))?;
            if let Some(text) = &node.text {
                div.set_text_content(Some(text));
            }
            if node.resize_handle {
                let handle = self.document.create_element("div").map_err(|e| host_err(&e))?;
                handle.set_class_name(RESIZE_HANDLE_CLASS);
                div.append_child(&handle).map_err(|e| host_err(&e))?;
            }
            self.container
                .append_child(&div)
                .map_err(|e| host_err(&e))?;
        }
        Ok(())
    }

    fn render_properties(&self, props: &PropertiesView) -> RenderResult<()> {
        let active = self.document.active_element();
        for field in PropertyField::ALL {
            let Some(input) = self
                .document
                .get_element_by_id(field.input_id())
                .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
            else {
                continue;
            };
            let focused = active
                .as_ref()
                .is_some_and(|el| el.is_same_node(Some(input.as_ref())));
            let value = props.value(field);
            if should_write(&input.value(), value, focused) {
                input.set_value(value);
            }
            input.set_disabled(!props.enabled);
        }

        if let Some(group) = self
            .document
            .get_element_by_id(TEXT_GROUP_ID)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        {
            let display = if props.text_visible { "flex" } else { "none" };
            group
                .style()
                .set_property("display", display)
                .map_err(|e| host_err(&e))?;
        }
        Ok(())
    }

    fn render_layers(&self, rows: &[LayerRow]) -> RenderResult<()> {
        let Some(list) = self.document.get_element_by_id(LAYERS_LIST_ID) else {
            return Ok(());
        };
        list.set_inner_html("");
        for row in rows {
            let li = self.document.create_element("li").map_err(|e| host_err(&e))?;
            li.set_class_name(if row.active {
                "layer-item active"
            } else {
                "layer-item"
            });
            li.set_attribute(ELEMENT_ID_ATTR, row.id.as_str())
                .map_err(|e| host_err(&e))?;

            let label = self.document.create_element("span").map_err(|e| host_err(&e))?;
            label.set_text_content(Some(&row.label));

            let button = self
                .document
                .create_element("button")
                .map_err(|e| host_err(&e))?;
            button.set_class_name(LAYER_BUTTON_CLASS);
            button.set_text_content(Some("\u{25b2}"));
            button
                .set_attribute("title", "Move Up")
                .map_err(|e| host_err(&e))?;
            if !row.can_promote {
                button
                    .set_attribute("disabled", "")
                    .map_err(|e| host_err(&e))?;
            }

            li.append_child(&label).map_err(|e| host_err(&e))?;
            li.append_child(&button).map_err(|e| host_err(&e))?;
            list.append_child(&li).map_err(|e| host_err(&e))?;
        }
        Ok(())
    }
}

impl RenderBackend for DomBackend {
    fn backend_type(&self) -> BackendType {
        BackendType::Dom
    }

    fn render(&mut self, view: &BoardView) -> RenderResult<()> {
        if !self.container.is_connected() {
            return Err(RenderError::MissingNode(self.container.id()));
        }
        tracing::trace!(
            "DOM render: {} nodes, {} layers",
            view.nodes.len(),
            view.layers.len()
        );
        self.render_nodes(&view.nodes)?;
        self.render_properties(&view.properties)?;
        self.render_layers(&view.layers)
    }

    fn resize(&mut self, width: u32, height: u32) -> RenderResult<()> {
        self.width = width;
        self.height = height;
        tracing::debug!("Board container resized to {}x{}", width, height);
        Ok(())
    }
}

impl std::fmt::Debug for DomBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DomBackend")
            .field("container", &self.container.id())
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}
