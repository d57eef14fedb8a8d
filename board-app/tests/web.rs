//! Browser tests, run with `wasm-pack test --headless --firefox board-app`.

#![cfg(target_arch = "wasm32")]

use std::{cell::Cell, rc::Rc};

use board_app::EditorApp;
use wasm_bindgen::{closure::Closure, JsCast};
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::{
    Document, Element, Event, HtmlElement, HtmlInputElement, MouseEvent, MouseEventInit,
};

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> Document {
    web_sys::window()
        .and_then(|w| w.document())
        .expect("document")
}

fn mount_page(storage_key: &str) -> EditorApp {
    let storage = web_sys::window()
        .and_then(|w| w.local_storage().ok().flatten())
        .expect("localStorage");
    storage.remove_item(storage_key).expect("clear snapshot");

    let body = document().body().expect("body");
    body.set_inner_html(
        r#"<div id="canvas-container" style="position:relative;width:800px;height:600px"></div>
           <button id="btn-add-text"></button>
           <button id="btn-export"></button>
           <input id="prop-x"><input id="prop-width"><input id="prop-text">
           <div id="text-prop-group"></div>
           <ul id="layers-list"></ul>"#,
    );
    let config = format!(r#"{{"editor": {{"storage_key": "{storage_key}"}}}}"#);
    EditorApp::new("canvas-container", Some(config)).expect("mount")
}

fn click(id: &str) {
    document()
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        .expect("button")
        .click();
}

fn input(id: &str) -> HtmlInputElement {
    document()
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        .expect("input")
}

fn type_into(field: &HtmlInputElement, value: &str) {
    field.set_value(value);
    let event = Event::new("input").expect("event");
    field.dispatch_event(&event).expect("dispatch");
}

fn mouse(kind: &str) -> MouseEvent {
    let init = MouseEventInit::new();
    init.set_bubbles(true);
    init.set_cancelable(true);
    MouseEvent::new_with_mouse_event_init_dict(kind, &init).expect("mouse event")
}

fn selected_width(app: &EditorApp) -> f64 {
    let id = app.selected_id().expect("selection");
    let json: serde_json::Value =
        serde_json::from_str(&app.export_json().expect("export")).expect("json");
    json.as_array()
        .and_then(|els| els.iter().find(|el| el["id"] == id.as_str()))
        .and_then(|el| el["width"].as_f64())
        .expect("selected element")
}

#[wasm_bindgen_test]
fn mounts_with_default_rectangle() {
    let app = mount_page("board-test-mount");
    assert_eq!(app.element_count(), 1);
    assert!(app.selected_id().is_none());

    let container = document()
        .get_element_by_id("canvas-container")
        .expect("container");
    assert_eq!(container.child_element_count(), 1);
}

#[wasm_bindgen_test]
fn add_button_creates_selected_text() {
    let app = mount_page("board-test-add");
    click("btn-add-text");
    assert_eq!(app.element_count(), 2);
    assert!(app.selected_id().is_some());

    let json = app.export_json().expect("export");
    assert!(json.contains("\"type\": \"text\""));
}

#[wasm_bindgen_test]
fn typing_a_width_is_not_overwritten() {
    let app = mount_page("board-test-typing");
    click("btn-add-text");
    let width = input("prop-width");
    width.focus().expect("focus");

    type_into(&width, "5");
    assert_eq!(width.value(), "5", "partial value kept while focused");
    type_into(&width, "50");
    assert_eq!(width.value(), "50");
    assert!((selected_width(&app) - 50.0).abs() < f64::EPSILON);

    type_into(&width, "5");
    width.blur().expect("blur");
    assert_eq!(width.value(), "10", "clamped value shown after blur");
}

#[wasm_bindgen_test]
fn pressing_an_element_takes_focus_from_the_form() {
    let app = mount_page("board-test-focus");
    click("btn-add-text");
    let id = app.selected_id().expect("selection");
    let x = input("prop-x");
    x.focus().expect("focus");

    let node = document()
        .query_selector(&format!("[data-element-id=\"{id}\"]"))
        .ok()
        .flatten()
        .expect("element node");
    node.dispatch_event(&mouse("mousedown")).expect("mousedown");
    web_sys::window()
        .expect("window")
        .dispatch_event(&mouse("mouseup"))
        .expect("mouseup");

    let still_focused = document()
        .active_element()
        .is_some_and(|el| el.id() == "prop-x");
    assert!(!still_focused);
    assert_eq!(app.selected_id().as_deref(), Some(id.as_str()));
}

#[wasm_bindgen_test]
fn export_clicks_an_attached_anchor() {
    let _app = mount_page("board-test-export");
    let body = document().body().expect("body");

    let seen = Rc::new(Cell::new(None));
    let record = Rc::clone(&seen);
    let onclick = Closure::<dyn FnMut(Event)>::wrap(Box::new(move |e: Event| {
        let anchor = e
            .target()
            .and_then(|t| t.dyn_into::<Element>().ok())
            .filter(|el| el.tag_name() == "A");
        if let Some(anchor) = anchor {
            // Keep the test browser from downloading.
            e.prevent_default();
            record.set(anchor.get_attribute("download"));
        }
    }));
    body.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())
        .expect("listen");

    click("btn-export");
    body.remove_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())
        .expect("unlisten");

    assert_eq!(seen.take().as_deref(), Some("design.json"));
    let leftover = document().query_selector("a[download]").ok().flatten();
    assert!(leftover.is_none());
}

#[wasm_bindgen_test]
fn missing_container_is_an_error() {
    assert!(EditorApp::new("no-such-container", None).is_err());
}
