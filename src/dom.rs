use spirit_core::DeferredResize;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

#[inline]
pub fn add_click_listener(element: &web::EventTarget, mut handler: impl FnMut() + 'static) {
    let closure = Closure::wrap(Box::new(move || handler()) as Box<dyn FnMut()>);
    _ = element.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
    closure.forget();
}

pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement) {
    if let Some(w) = web::window() {
        let dpr = w.device_pixel_ratio();
        let rect = canvas.get_bounding_client_rect();
        let w_px = (rect.width() * dpr) as u32;
        let h_px = (rect.height() * dpr) as u32;
        canvas.set_width(w_px.max(1));
        canvas.set_height(h_px.max(1));
    }
}

/// Keep the canvas backing store in step with the window. While `recording()`
/// is true the resize is parked in `deferred` for the frame loop to replay.
pub fn wire_canvas_resize(
    canvas: &web::HtmlCanvasElement,
    deferred: Rc<RefCell<DeferredResize>>,
    recording: impl Fn() -> bool + 'static,
) {
    sync_canvas_backing_size(canvas);
    let canvas_resize = canvas.clone();
    let resize_closure = Closure::wrap(Box::new(move || {
        if deferred.borrow_mut().request(recording()) {
            sync_canvas_backing_size(&canvas_resize);
        } else {
            log::debug!("resize deferred while recording");
        }
    }) as Box<dyn FnMut()>);
    if let Some(window) = web::window() {
        _ = window
            .add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref());
    }
    resize_closure.forget();
}

/// Append an absolutely positioned button to `<body>`.
pub fn create_overlay_button(
    document: &web::Document,
    label: &str,
    top_px: u32,
    left_px: u32,
) -> anyhow::Result<web::HtmlButtonElement> {
    let button: web::HtmlButtonElement = document
        .create_element("button")
        .map_err(|e| anyhow::anyhow!("{:?}", e))?
        .dyn_into()
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    button.set_text_content(Some(label));
    let style = button.style();
    _ = style.set_property("position", "absolute");
    _ = style.set_property("top", &format!("{top_px}px"));
    _ = style.set_property("left", &format!("{left_px}px"));
    let body = document
        .body()
        .ok_or_else(|| anyhow::anyhow!("no body"))?;
    body.append_child(&button)
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    Ok(button)
}
