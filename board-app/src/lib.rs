//! # Board Editor WASM Application
//!
//! Wires the board editor to a web page: DOM rendering, pointer and keyboard
//! input, the properties form, the layer list, and `localStorage`
//! persistence.
//!
//! ## Usage
//!
//! Build for WASM:
//! ```bash
//! wasm-pack build --target web board-app
//! ```
//!
//! Then import in JavaScript:
//! ```javascript
//! import init, { EditorApp } from './pkg/board_app.js';
//!
//! await init();
//! const app = new EditorApp('canvas-container');
//! ```
//!
//! The page provides the board container plus any of the optional toolbar
//! buttons, property inputs and the layer list; missing controls are skipped.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod dom;
pub mod storage;

use std::{cell::RefCell, rc::Rc};

use board_core::{
    Editor, EditorConfig, ElementId, ElementKind, InputEvent, Key, LayerCommand, Outcome,
    PointerTarget, PropertyEdit, PropertyField,
};
use board_renderer::{Renderer, RendererConfig};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;
use web_sys::{
    Blob, Document, Element, Event, HtmlElement, HtmlInputElement, KeyboardEvent, MouseEvent, Url,
    Window,
};

use crate::dom::{
    DomBackend, ELEMENT_ID_ATTR, LAYERS_LIST_ID, LAYER_BUTTON_CLASS, RESIZE_HANDLE_CLASS,
};
pub use crate::storage::LocalStorageStore;

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn init_wasm() {
    console_error_panic_hook::set_once();
    // Fails only when a logger is already installed, which is fine.
    if console_log::init_with_level(log::Level::Info).is_ok() {
        tracing::info!("Board editor WASM initialized");
    }
}

/// Errors raised while wiring the app to the page.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// No global `window` (not running in a browser main thread).
    #[error("No window object")]
    NoWindow,
    /// A required page element is missing.
    #[error("Element '{0}' not found")]
    MissingElement(String),
    /// The configuration JSON is invalid.
    #[error("Invalid config: {0}")]
    Config(#[from] serde_json::Error),
    /// A DOM call threw.
    #[error("DOM error: {0}")]
    Dom(String),
}

impl From<JsValue> for AppError {
    fn from(value: JsValue) -> Self {
        Self::Dom(storage::describe(&value))
    }
}

impl From<AppError> for JsValue {
    fn from(err: AppError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

/// Configuration accepted by [`EditorApp::new`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Editor behaviour.
    pub editor: EditorConfig,
    /// Presentation.
    pub renderer: RendererConfig,
}

impl AppConfig {
    /// Parse from JSON; missing fields take defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self, AppError> {
        let mut config: Self = serde_json::from_str(json)?;
        config.editor = config.editor.sanitized();
        Ok(config)
    }
}

/// Editor plus renderer, shared by every DOM closure.
struct AppState {
    editor: Editor<LocalStorageStore>,
    renderer: Renderer,
}

impl AppState {
    fn render(&mut self) {
        if let Err(err) = self.renderer.render(self.editor.board()) {
            tracing::error!("Renderer error: {err}");
        }
    }

    /// Re-render when the outcome asks for it.
    fn apply(&mut self, outcome: Outcome) {
        if outcome.render {
            self.render();
        }
    }
}

type AppHandle = Rc<RefCell<AppState>>;

/// The board editor mounted on a page.
#[wasm_bindgen]
pub struct EditorApp {
    state: AppHandle,
}

#[wasm_bindgen]
impl EditorApp {
    /// Mount the editor on the element with id `container_id`.
    ///
    /// `config_json` optionally overrides defaults, shaped as
    /// `{"editor": {...}, "renderer": {...}}`.
    ///
    /// # Errors
    ///
    /// Returns an error if the container is missing, the config is invalid,
    /// or a listener cannot be attached.
    #[wasm_bindgen(constructor)]
    pub fn new(container_id: &str, config_json: Option<String>) -> Result<EditorApp, JsValue> {
        Self::mount(container_id, config_json.as_deref()).map_err(JsValue::from)
    }

    /// Rebuild the board and panels from the current state.
    pub fn render(&self) {
        self.state.borrow_mut().render();
    }

    /// The elements as a pretty-printed JSON array.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    #[wasm_bindgen(js_name = exportJson)]
    pub fn export_json(&self) -> Result<String, JsValue> {
        self.state
            .borrow()
            .editor
            .export_json()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Number of elements on the board.
    #[wasm_bindgen(js_name = elementCount)]
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.state.borrow().editor.board().element_count()
    }

    /// Id of the selected element, if any.
    #[wasm_bindgen(js_name = selectedId)]
    #[must_use]
    pub fn selected_id(&self) -> Option<String> {
        self.state
            .borrow()
            .editor
            .board()
            .selected_id()
            .map(|id| id.as_str().to_string())
    }
}

impl EditorApp {
    fn mount(container_id: &str, config_json: Option<&str>) -> Result<Self, AppError> {
        let config = match config_json {
            Some(json) => AppConfig::from_json(json)?,
            None => AppConfig::default(),
        };

        let window = web_sys::window().ok_or(AppError::NoWindow)?;
        let document = window.document().ok_or(AppError::NoWindow)?;
        let container = document
            .get_element_by_id(container_id)
            .ok_or_else(|| AppError::MissingElement(container_id.to_string()))?;

        let mut editor = Editor::load(LocalStorageStore::open(), config.editor);
        let (width, height) = container_size(&container);
        if width > 0.0 && height > 0.0 {
            editor.set_board_size(width, height);
        }

        let backend = DomBackend::new(document.clone(), container.clone());
        let renderer = Renderer::new(config.renderer, Box::new(backend));
        let state: AppHandle = Rc::new(RefCell::new(AppState { editor, renderer }));

        bind_pointer(&window, &document, &container, &state)?;
        bind_keyboard(&window, &state)?;
        bind_resize(&window, &container, &state)?;
        bind_toolbar(&window, &document, &state);
        bind_properties(&document, &state);
        bind_layers(&document, &state)?;

        state.borrow_mut().render();
        tracing::info!("Editor mounted on #{container_id}");
        Ok(Self { state })
    }
}

fn container_size(container: &Element) -> (f64, f64) {
    (
        f64::from(container.client_width()),
        f64::from(container.client_height()),
    )
}

/// Nearest element at or above the event target matching `selector`.
fn target_element(event: &Event, selector: &str) -> Option<Element> {
    let target = event.target()?.dyn_into::<Element>().ok()?;
    target.closest(selector).ok().flatten()
}

fn element_id_of(node: &Element) -> Option<ElementId> {
    node.get_attribute(ELEMENT_ID_ATTR).map(ElementId::from_string)
}

fn pointer_target(event: &Event) -> PointerTarget {
    let Some(node) = target_element(event, &format!("[{ELEMENT_ID_ATTR}]")) else {
        return PointerTarget::Board;
    };
    let Some(id) = element_id_of(&node) else {
        return PointerTarget::Board;
    };
    let on_handle = event
        .target()
        .and_then(|t| t.dyn_into::<Element>().ok())
        .is_some_and(|t| t.class_list().contains(RESIZE_HANDLE_CLASS));
    if on_handle {
        PointerTarget::ResizeHandle(id)
    } else {
        PointerTarget::Element(id)
    }
}

fn in_text_input(event: &Event) -> bool {
    event
        .target()
        .and_then(|t| t.dyn_into::<Element>().ok())
        .is_some_and(|el| matches!(el.tag_name().as_str(), "INPUT" | "TEXTAREA"))
}

/// Take focus away from a form input so it shows the committed value again.
fn blur_form_input(document: &Document) {
    let Some(active) = document
        .active_element()
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    else {
        return;
    };
    if !matches!(active.tag_name().as_str(), "INPUT" | "TEXTAREA") {
        return;
    }
    if let Err(err) = active.blur() {
        tracing::debug!("Blur failed: {}", storage::describe(&err));
    }
}

fn bind_pointer(
    window: &Window,
    document: &Document,
    container: &Element,
    state: &AppHandle,
) -> Result<(), AppError> {
    {
        let st = Rc::clone(state);
        let doc = document.clone();
        let mousedown = Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(move |e: MouseEvent| {
            let target = pointer_target(&e);
            if target != PointerTarget::Board {
                // No text selection mid-drag. Focus stays put too, so drop it.
                e.prevent_default();
                blur_form_input(&doc);
            }
            let event = InputEvent::pointer_down(
                f64::from(e.client_x()),
                f64::from(e.client_y()),
                target,
            );
            let mut s = st.borrow_mut();
            let outcome = s.editor.handle_input(&event);
            s.apply(outcome);
        }));
        container
            .add_event_listener_with_callback("mousedown", mousedown.as_ref().unchecked_ref())?;
        mousedown.forget();
    }
    {
        let st = Rc::clone(state);
        let mousemove = Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(move |e: MouseEvent| {
            let Ok(mut s) = st.try_borrow_mut() else {
                return;
            };
            if s.editor.controller().gesture().is_idle() {
                return;
            }
            let event =
                InputEvent::pointer_move(f64::from(e.client_x()), f64::from(e.client_y()));
            let outcome = s.editor.handle_input(&event);
            s.apply(outcome);
        }));
        window
            .add_event_listener_with_callback("mousemove", mousemove.as_ref().unchecked_ref())?;
        mousemove.forget();
    }
    {
        let st = Rc::clone(state);
        let mouseup = Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(move |_e: MouseEvent| {
            let mut s = st.borrow_mut();
            let outcome = s.editor.handle_input(&InputEvent::PointerUp);
            s.apply(outcome);
        }));
        window.add_event_listener_with_callback("mouseup", mouseup.as_ref().unchecked_ref())?;
        mouseup.forget();
    }
    Ok(())
}

fn bind_keyboard(window: &Window, state: &AppHandle) -> Result<(), AppError> {
    let st = Rc::clone(state);
    let keydown = Closure::<dyn FnMut(KeyboardEvent)>::wrap(Box::new(move |e: KeyboardEvent| {
        let Some(key) = Key::from_dom(&e.key()) else {
            return;
        };
        let event = InputEvent::Key {
            key,
            in_text_input: in_text_input(&e),
        };
        let mut s = st.borrow_mut();
        let outcome = s.editor.handle_input(&event);
        if outcome.prevent_default {
            e.prevent_default();
        }
        s.apply(outcome);
    }));
    window.add_event_listener_with_callback("keydown", keydown.as_ref().unchecked_ref())?;
    keydown.forget();
    Ok(())
}

fn bind_resize(window: &Window, container: &Element, state: &AppHandle) -> Result<(), AppError> {
    let st = Rc::clone(state);
    let container = container.clone();
    let onresize = Closure::<dyn FnMut()>::wrap(Box::new(move || {
        let (width, height) = container_size(&container);
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        let mut s = st.borrow_mut();
        let outcome = s.editor.set_board_size(width, height);
        if let Err(err) = s.renderer.resize(
            u32::try_from(container.client_width()).unwrap_or(0),
            u32::try_from(container.client_height()).unwrap_or(0),
        ) {
            tracing::warn!("Resize failed: {err}");
        }
        s.apply(outcome);
    }));
    window.add_event_listener_with_callback("resize", onresize.as_ref().unchecked_ref())?;
    onresize.forget();
    Ok(())
}

/// Bind a click handler to the button `id` when the page has one.
fn on_click(document: &Document, id: &str, handler: impl FnMut() + 'static) {
    let Some(button) = document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    else {
        tracing::debug!("No #{id} on page, skipping");
        return;
    };
    let onclick = Closure::<dyn FnMut()>::wrap(Box::new(handler));
    button.set_onclick(Some(onclick.as_ref().unchecked_ref()));
    onclick.forget();
}

fn bind_toolbar(window: &Window, document: &Document, state: &AppHandle) {
    for (id, kind) in [
        ("btn-add-rect", ElementKind::Rectangle),
        ("btn-add-circle", ElementKind::Circle),
        ("btn-add-text", ElementKind::Text),
    ] {
        let st = Rc::clone(state);
        on_click(document, id, move || {
            let mut s = st.borrow_mut();
            let outcome = s.editor.add_element(kind);
            s.apply(outcome);
        });
    }

    let st = Rc::clone(state);
    on_click(document, "btn-delete", move || {
        let mut s = st.borrow_mut();
        let outcome = s.editor.delete_selected();
        s.apply(outcome);
    });

    let st = Rc::clone(state);
    let win = window.clone();
    on_click(document, "btn-clear", move || {
        let mut s = st.borrow_mut();
        let outcome = s.editor.clear(|| {
            win.confirm_with_message("Clear the entire board? This cannot be undone.")
                .unwrap_or(false)
        });
        s.apply(outcome);
    });

    let st = Rc::clone(state);
    let doc = document.clone();
    on_click(document, "btn-export", move || {
        let s = st.borrow();
        let filename = s.editor.config().export_filename.clone();
        match s.editor.export_json() {
            Ok(json) => {
                if let Err(err) = save_text_as_file(&doc, &filename, &json) {
                    tracing::warn!("Export failed: {err}");
                }
            }
            Err(err) => tracing::warn!("Export failed: {err}"),
        }
    });
}

fn bind_properties(document: &Document, state: &AppHandle) {
    for field in PropertyField::ALL {
        let Some(input) = document
            .get_element_by_id(field.input_id())
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        else {
            continue;
        };
        let st = Rc::clone(state);
        let source = input.clone();
        let oninput = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            let edit = match PropertyEdit::parse(field, &source.value()) {
                Ok(edit) => edit,
                Err(err) => {
                    tracing::debug!("Ignoring {} input: {err}", field.name());
                    return;
                }
            };
            let mut s = st.borrow_mut();
            match s.editor.edit_property(&edit) {
                Ok(outcome) => s.apply(outcome),
                Err(err) => tracing::warn!("Property edit rejected: {err}"),
            }
        }));
        input.set_oninput(Some(oninput.as_ref().unchecked_ref()));
        oninput.forget();

        // Values clamped while typing show once the input loses focus.
        let st = Rc::clone(state);
        let onblur = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            if let Ok(mut s) = st.try_borrow_mut() {
                s.render();
            }
        }));
        input.set_onblur(Some(onblur.as_ref().unchecked_ref()));
        onblur.forget();
    }
}

fn bind_layers(document: &Document, state: &AppHandle) -> Result<(), AppError> {
    let Some(list) = document.get_element_by_id(LAYERS_LIST_ID) else {
        tracing::debug!("No #{LAYERS_LIST_ID} on page, skipping");
        return Ok(());
    };
    let st = Rc::clone(state);
    let onclick = Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(move |e: MouseEvent| {
        let Some(id) = target_element(&e, &format!("[{ELEMENT_ID_ATTR}]"))
            .as_ref()
            .and_then(element_id_of)
        else {
            return;
        };
        let command = if target_element(&e, &format!(".{LAYER_BUTTON_CLASS}")).is_some() {
            e.stop_propagation();
            LayerCommand::Promote(id)
        } else {
            LayerCommand::Select(id)
        };
        let mut s = st.borrow_mut();
        let outcome = s.editor.layer_command(&command);
        s.apply(outcome);
    }));
    list.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
    onclick.forget();
    Ok(())
}

/// Offer `text` as a file download.
fn save_text_as_file(document: &Document, filename: &str, text: &str) -> Result<(), AppError> {
    let parts = js_sys::Array::new();
    parts.push(&JsValue::from_str(text));
    let blob = Blob::new_with_str_sequence(&parts)?;
    let url = Url::create_object_url_with_blob(&blob)?;
    let anchor = document
        .create_element("a")?
        .dyn_into::<HtmlElement>()
        .map_err(|_| AppError::Dom("anchor is not an HtmlElement".to_string()))?;
    anchor.set_attribute("href", &url)?;
    anchor.set_attribute("download", filename)?;
    // Firefox ignores clicks on anchors outside the document.
    let body = document
        .body()
        .ok_or_else(|| AppError::MissingElement("body".to_string()))?;
    body.append_child(&anchor)?;
    anchor.click();
    anchor.remove();
    Url::revoke_object_url(&url)?;
    tracing::info!("Exported {filename}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_when_empty() {
        let config = AppConfig::from_json("{}").expect("parse");
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn config_nested_overrides() {
        let config = AppConfig::from_json(
            r##"{"editor": {"storage_key": "mine"}, "renderer": {"accent_color": "#f0f"}}"##,
        )
        .expect("parse");
        assert_eq!(config.editor.storage_key, "mine");
        assert_eq!(config.renderer.accent_color, "#f0f");
        assert_eq!(config.editor.export_filename, "design.json");
    }

    #[test]
    fn config_rejects_bad_json() {
        let err = AppConfig::from_json("{not json").expect_err("invalid");
        assert!(matches!(err, AppError::Config(_)));
        assert!(err.to_string().starts_with("Invalid config"));
    }
}
