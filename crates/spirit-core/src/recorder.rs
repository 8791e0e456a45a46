//! Canvas recording lifecycle.
//!
//! [`RecordingController`] is a two-state machine (`Idle`, `Recording`) over an
//! [`EncoderBackend`] and the [`RenderSurface`] it captures. Encoder callbacks do
//! not call back into the controller; the backend pushes [`EncoderEvent`]s into
//! an [`EventQueue`] which the frame driver drains once per tick. Every event
//! carries the [`SessionId`] it belongs to, so data flushed between `stop` and
//! the encoder's stop notification still lands in the right session.

use crate::config::RecordingOptions;
use crate::error::RecorderError;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SessionId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn scaled(self, factor: u32) -> Self {
        Self {
            width: self.width.saturating_mul(factor),
            height: self.height.saturating_mul(factor),
        }
    }
}

/// Drawable output whose pixel size can be changed for the duration of a capture.
pub trait RenderSurface {
    fn size(&self) -> SurfaceSize;
    fn set_size(&mut self, size: SurfaceSize);
}

/// Window resizes seen while a capture holds the surface size.
///
/// The capture owns the surface dimensions until it stops; a resize arriving in
/// that window is remembered and replayed once, after the surface is restored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DeferredResize {
    pending: bool,
}

impl DeferredResize {
    /// Record a resize request. Returns `true` when it should be applied now.
    pub fn request(&mut self, recording: bool) -> bool {
        self.pending = recording;
        !recording
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// `true` exactly once after a deferred resize, as soon as no capture is running.
    pub fn take_ready(&mut self, recording: bool) -> bool {
        if recording || !self.pending {
            return false;
        }
        self.pending = false;
        true
    }
}

pub trait EncodedChunk {
    fn byte_len(&self) -> usize;
}

impl EncodedChunk for Vec<u8> {
    fn byte_len(&self) -> usize {
        self.len()
    }
}

/// What the backend needs to open a capture stream and encoder.
#[derive(Clone, Copy, Debug)]
pub struct EncoderRequest<'a> {
    pub session: SessionId,
    pub mime: &'static str,
    pub options: &'a RecordingOptions,
}

pub trait EncoderBackend {
    type Chunk: EncodedChunk;

    fn is_type_supported(&self, mime: &str) -> bool;
    /// Capture the surface and begin buffering chunks every `time_slice_ms`.
    fn start(&mut self, request: EncoderRequest<'_>) -> Result<(), RecorderError>;
    /// Ask the encoder to emit whatever it has buffered right now.
    fn request_data(&mut self);
    /// Flush and stop; the backend must follow up with [`EncoderEvent::Stopped`].
    fn stop(&mut self);
    /// Hand the finished recording to the user (download, file, ...).
    fn save(&mut self, recording: FinishedRecording<Self::Chunk>) -> Result<(), RecorderError>;
}

#[derive(Debug)]
pub enum EncoderEvent<C> {
    Data { session: SessionId, chunk: C },
    Stopped { session: SessionId },
}

pub type EventQueue<C> = Rc<RefCell<VecDeque<EncoderEvent<C>>>>;

pub fn event_queue<C>() -> EventQueue<C> {
    Rc::new(RefCell::new(VecDeque::new()))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecorderState {
    Idle,
    Recording,
}

#[derive(Debug)]
pub struct RecordingSession<C> {
    pub id: SessionId,
    pub chunks: Vec<C>,
    pub mime: &'static str,
    pub frame_rate: f64,
    pub bits_per_second: u32,
    /// Surface size before the capture enlarged it; restored on stop.
    pub original_size: SurfaceSize,
}

#[derive(Debug)]
pub struct FinishedRecording<C> {
    pub session: SessionId,
    pub file_name: &'static str,
    pub mime: &'static str,
    pub chunks: Vec<C>,
}

impl<C: EncodedChunk> FinishedRecording<C> {
    pub fn total_bytes(&self) -> usize {
        self.chunks.iter().map(EncodedChunk::byte_len).sum()
    }
}

pub struct RecordingController<E: EncoderBackend, V> {
    backend: E,
    surface: V,
    options: RecordingOptions,
    active: Option<RecordingSession<E::Chunk>>,
    // Stopped sessions still waiting for the encoder's final flush.
    finalizing: Vec<RecordingSession<E::Chunk>>,
    next_id: u32,
}

impl<E: EncoderBackend, V: RenderSurface> RecordingController<E, V> {
    pub fn new(backend: E, surface: V, options: RecordingOptions) -> Self {
        Self {
            backend,
            surface,
            options,
            active: None,
            finalizing: Vec::new(),
            next_id: 1,
        }
    }

    pub fn state(&self) -> RecorderState {
        if self.active.is_some() {
            RecorderState::Recording
        } else {
            RecorderState::Idle
        }
    }

    #[inline]
    pub fn is_recording(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_session(&self) -> Option<&RecordingSession<E::Chunk>> {
        self.active.as_ref()
    }

    pub fn pending_finalize(&self) -> usize {
        self.finalizing.len()
    }

    pub fn backend(&self) -> &E {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut E {
        &mut self.backend
    }

    pub fn surface(&self) -> &V {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut V {
        &mut self.surface
    }

    /// Pick the preferred codec, or the fallback when the runtime lacks it.
    pub fn choose_mime(&self) -> &'static str {
        if self.backend.is_type_supported(self.options.preferred_mime) {
            self.options.preferred_mime
        } else {
            log::warn!(
                "[recorder] {} unsupported, falling back to {}",
                self.options.preferred_mime,
                self.options.fallback_mime
            );
            self.options.fallback_mime
        }
    }

    /// `Idle -> Recording`. A no-op while already recording.
    pub fn start(&mut self) -> Result<(), RecorderError> {
        if self.active.is_some() {
            log::debug!("[recorder] start ignored, already recording");
            return Ok(());
        }
        let id = SessionId(self.next_id);
        let mime = self.choose_mime();
        self.backend.start(EncoderRequest {
            session: id,
            mime,
            options: &self.options,
        })?;
        self.next_id = self.next_id.wrapping_add(1);

        let original_size = self.surface.size();
        let capture_size = original_size.scaled(self.options.surface_scale);
        self.surface.set_size(capture_size);

        self.active = Some(RecordingSession {
            id,
            chunks: Vec::new(),
            mime,
            frame_rate: self.options.frame_rate,
            bits_per_second: self.options.bits_per_second,
            original_size,
        });
        log::info!(
            "[recorder] recording started ({mime}, {}x{})",
            capture_size.width,
            capture_size.height
        );
        Ok(())
    }

    /// `Recording -> Idle`. The session is finalized once the encoder reports it stopped.
    pub fn stop(&mut self) {
        let Some(session) = self.active.take() else {
            log::debug!("[recorder] stop ignored, not recording");
            return;
        };
        self.backend.stop();
        self.surface.set_size(session.original_size);
        log::info!("[recorder] recording stopped");
        self.finalizing.push(session);
    }

    pub fn toggle(&mut self) -> Result<(), RecorderError> {
        if self.is_recording() {
            self.stop();
            Ok(())
        } else {
            self.start()
        }
    }

    /// Per-frame hook: keep chunk latency bounded while capturing.
    pub fn on_frame(&mut self) {
        if self.active.is_some() {
            self.backend.request_data();
        }
    }

    pub fn handle_event(&mut self, event: EncoderEvent<E::Chunk>) -> Result<(), RecorderError> {
        match event {
            EncoderEvent::Data { session, chunk } => {
                if chunk.byte_len() == 0 {
                    return Ok(());
                }
                match self.session_mut(session) {
                    Some(s) => s.chunks.push(chunk),
                    None => log::debug!("[recorder] dropping chunk for unknown {:?}", session),
                }
                Ok(())
            }
            EncoderEvent::Stopped { session } => {
                let finished = if let Some(pos) =
                    self.finalizing.iter().position(|s| s.id == session)
                {
                    self.finalizing.remove(pos)
                } else if self.active.as_ref().is_some_and(|s| s.id == session) {
                    // Encoder ended on its own; leave Recording as if stopped.
                    let Some(s) = self.active.take() else {
                        return Ok(());
                    };
                    self.surface.set_size(s.original_size);
                    log::warn!("[recorder] encoder stopped unexpectedly");
                    s
                } else {
                    log::debug!("[recorder] stop notice for unknown {:?}", session);
                    return Ok(());
                };
                self.finalize(finished)
            }
        }
    }

    fn session_mut(&mut self, id: SessionId) -> Option<&mut RecordingSession<E::Chunk>> {
        if let Some(s) = self.active.as_mut().filter(|s| s.id == id) {
            return Some(s);
        }
        self.finalizing.iter_mut().find(|s| s.id == id)
    }

    fn finalize(&mut self, session: RecordingSession<E::Chunk>) -> Result<(), RecorderError> {
        let recording = FinishedRecording {
            session: session.id,
            file_name: self.options.file_name,
            mime: self.options.container_mime,
            chunks: session.chunks,
        };
        log::info!(
            "[recorder] saving {} ({} chunks, {} bytes)",
            recording.file_name,
            recording.chunks.len(),
            recording.total_bytes()
        );
        self.backend.save(recording)
    }
}
