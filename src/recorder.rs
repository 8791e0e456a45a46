//! `MediaRecorder`-backed encoder and canvas surface for the recording controller.

use spirit_core::{
    EncodedChunk, EncoderBackend, EncoderEvent, EncoderRequest, EventQueue, FinishedRecording,
    RecorderError, RenderSurface, SessionId, SurfaceSize,
};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

pub struct BlobChunk(pub web::Blob);

impl EncodedChunk for BlobChunk {
    fn byte_len(&self) -> usize {
        self.0.size() as usize
    }
}

#[derive(Clone)]
pub struct CanvasSurface {
    canvas: web::HtmlCanvasElement,
}

impl CanvasSurface {
    pub fn new(canvas: web::HtmlCanvasElement) -> Self {
        Self { canvas }
    }
}

impl RenderSurface for CanvasSurface {
    fn size(&self) -> SurfaceSize {
        SurfaceSize::new(self.canvas.width(), self.canvas.height())
    }

    fn set_size(&mut self, size: SurfaceSize) {
        self.canvas.set_width(size.width.max(1));
        self.canvas.set_height(size.height.max(1));
    }
}

/// Callbacks registered on one session's `MediaRecorder`. They must outlive the
/// encoder's final `dataavailable`/`stop` events, so they are released on save.
struct SessionHandlers {
    session: SessionId,
    _on_data: Closure<dyn FnMut(web::BlobEvent)>,
    _on_stop: Closure<dyn FnMut()>,
}

pub struct MediaRecorderBackend {
    canvas: web::HtmlCanvasElement,
    events: EventQueue<BlobChunk>,
    recorder: Option<web::MediaRecorder>,
    handlers: Vec<SessionHandlers>,
}

impl MediaRecorderBackend {
    pub fn new(canvas: web::HtmlCanvasElement, events: EventQueue<BlobChunk>) -> Self {
        Self {
            canvas,
            events,
            recorder: None,
            handlers: Vec::new(),
        }
    }

    fn runtime_has_media_recorder() -> bool {
        js_sys::Reflect::has(&js_sys::global(), &JsValue::from_str("MediaRecorder"))
            .unwrap_or(false)
    }
}

fn js_err(e: JsValue) -> String {
    format!("{:?}", e)
}

impl EncoderBackend for MediaRecorderBackend {
    type Chunk = BlobChunk;

    fn is_type_supported(&self, mime: &str) -> bool {
        Self::runtime_has_media_recorder() && web::MediaRecorder::is_type_supported(mime)
    }

    fn start(&mut self, request: EncoderRequest<'_>) -> Result<(), RecorderError> {
        if !Self::runtime_has_media_recorder() {
            return Err(RecorderError::Unavailable(
                "MediaRecorder is not supported by this browser".into(),
            ));
        }
        let opts = request.options;
        let stream = self
            .canvas
            .capture_stream_with_frame_request_rate(opts.frame_rate)
            .map_err(|e| RecorderError::Unavailable(js_err(e)))?;
        let options = web::MediaRecorderOptions::new();
        options.set_mime_type(request.mime);
        options.set_video_bits_per_second(opts.bits_per_second);
        let recorder =
            web::MediaRecorder::new_with_media_stream_and_media_recorder_options(&stream, &options)
                .map_err(|e| RecorderError::Unavailable(js_err(e)))?;

        let session = request.session;
        let queue = self.events.clone();
        let on_data = Closure::wrap(Box::new(move |ev: web::BlobEvent| {
            if let Some(blob) = ev.data() {
                queue.borrow_mut().push_back(EncoderEvent::Data {
                    session,
                    chunk: BlobChunk(blob),
                });
            }
        }) as Box<dyn FnMut(web::BlobEvent)>);
        recorder.set_ondataavailable(Some(on_data.as_ref().unchecked_ref()));

        let queue = self.events.clone();
        let on_stop = Closure::wrap(Box::new(move || {
            queue
                .borrow_mut()
                .push_back(EncoderEvent::Stopped { session });
        }) as Box<dyn FnMut()>);
        recorder.set_onstop(Some(on_stop.as_ref().unchecked_ref()));

        if let Err(e) = recorder.start_with_time_slice(opts.time_slice_ms) {
            recorder.set_ondataavailable(None);
            recorder.set_onstop(None);
            return Err(RecorderError::Start(js_err(e)));
        }
        self.recorder = Some(recorder);
        self.handlers.push(SessionHandlers {
            session,
            _on_data: on_data,
            _on_stop: on_stop,
        });
        Ok(())
    }

    fn request_data(&mut self) {
        if let Some(r) = &self.recorder {
            _ = r.request_data();
        }
    }

    fn stop(&mut self) {
        if let Some(r) = self.recorder.take() {
            if let Err(e) = r.stop() {
                log::warn!("[recorder] stop error: {:?}", e);
            }
        }
    }

    fn save(&mut self, recording: FinishedRecording<BlobChunk>) -> Result<(), RecorderError> {
        // The stop event for this session has been delivered; nothing calls its handlers again.
        self.handlers.retain(|h| h.session != recording.session);
        let parts = js_sys::Array::new();
        for chunk in &recording.chunks {
            parts.push(&chunk.0);
        }
        let bag = web::BlobPropertyBag::new();
        bag.set_type(recording.mime);
        let blob = web::Blob::new_with_blob_sequence_and_options(&parts, &bag)
            .map_err(|e| RecorderError::Save(js_err(e)))?;
        download_blob(&blob, recording.file_name).map_err(|e| RecorderError::Save(js_err(e)))
    }
}

/// Trigger a one-shot download of `blob` through a hidden anchor, then release the URL.
fn download_blob(blob: &web::Blob, file_name: &str) -> Result<(), JsValue> {
    let document = crate::dom::window_document().ok_or_else(|| JsValue::from_str("no document"))?;
    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("no body"))?;
    let url = web::Url::create_object_url_with_blob(blob)?;
    let anchor: web::HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
    _ = anchor.style().set_property("display", "none");
    anchor.set_href(&url);
    anchor.set_download(file_name);
    body.append_child(&anchor)?;
    anchor.click();
    anchor.remove();
    web::Url::revoke_object_url(&url)
}
