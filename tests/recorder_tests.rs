// Host-side tests for the recording state machine with a scripted encoder.

use spirit_core::*;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Default)]
struct Calls {
    started: Vec<(SessionId, &'static str)>,
    requests: usize,
    stops: usize,
    saved: Vec<FinishedRecording<Vec<u8>>>,
}

struct FakeEncoder {
    supports_preferred: bool,
    available: bool,
    calls: Rc<RefCell<Calls>>,
}

impl FakeEncoder {
    fn new() -> (Self, Rc<RefCell<Calls>>) {
        let calls = Rc::new(RefCell::new(Calls::default()));
        let enc = Self {
            supports_preferred: true,
            available: true,
            calls: calls.clone(),
        };
        (enc, calls)
    }
}

impl EncoderBackend for FakeEncoder {
    type Chunk = Vec<u8>;

    fn is_type_supported(&self, mime: &str) -> bool {
        mime != PREFERRED_MIME || self.supports_preferred
    }

    fn start(&mut self, request: EncoderRequest<'_>) -> Result<(), RecorderError> {
        if !self.available {
            return Err(RecorderError::Unavailable("no MediaRecorder".into()));
        }
        self.calls
            .borrow_mut()
            .started
            .push((request.session, request.mime));
        Ok(())
    }

    fn request_data(&mut self) {
        self.calls.borrow_mut().requests += 1;
    }

    fn stop(&mut self) {
        self.calls.borrow_mut().stops += 1;
    }

    fn save(&mut self, recording: FinishedRecording<Vec<u8>>) -> Result<(), RecorderError> {
        self.calls.borrow_mut().saved.push(recording);
        Ok(())
    }
}

struct FakeSurface(SurfaceSize);

impl RenderSurface for FakeSurface {
    fn size(&self) -> SurfaceSize {
        self.0
    }
    fn set_size(&mut self, size: SurfaceSize) {
        self.0 = size;
    }
}

type Controller = RecordingController<FakeEncoder, FakeSurface>;

fn controller() -> (Controller, Rc<RefCell<Calls>>) {
    let (enc, calls) = FakeEncoder::new();
    let surface = FakeSurface(SurfaceSize::new(800, 600));
    (
        RecordingController::new(enc, surface, RecordingOptions::default()),
        calls,
    )
}

fn data(session: SessionId, bytes: &[u8]) -> EncoderEvent<Vec<u8>> {
    EncoderEvent::Data {
        session,
        chunk: bytes.to_vec(),
    }
}

#[test]
fn starts_idle() {
    let (rec, _) = controller();
    assert_eq!(rec.state(), RecorderState::Idle);
    assert!(rec.active_session().is_none());
}

#[test]
fn start_twice_keeps_one_session() {
    let (mut rec, calls) = controller();
    rec.start().unwrap();
    let id = rec.active_session().unwrap().id;
    rec.start().unwrap();
    assert_eq!(rec.state(), RecorderState::Recording);
    assert_eq!(rec.active_session().unwrap().id, id);
    assert_eq!(calls.borrow().started.len(), 1);
    // surface only enlarged once
    assert_eq!(rec.surface().size(), SurfaceSize::new(1600, 1200));
}

#[test]
fn start_enlarges_and_stop_restores_surface() {
    let (mut rec, _) = controller();
    rec.start().unwrap();
    let session = rec.active_session().unwrap();
    assert_eq!(session.original_size, SurfaceSize::new(800, 600));
    assert_eq!(session.frame_rate, 60.0);
    assert_eq!(session.bits_per_second, 50_000_000);
    assert_eq!(rec.surface().size(), SurfaceSize::new(1600, 1200));

    rec.stop();
    assert_eq!(rec.state(), RecorderState::Idle);
    assert_eq!(rec.surface().size(), SurfaceSize::new(800, 600));
}

#[test]
fn falls_back_when_preferred_codec_missing() {
    let (mut rec, calls) = controller();
    assert_eq!(rec.choose_mime(), PREFERRED_MIME);
    rec.backend_mut().supports_preferred = false;
    assert_eq!(rec.choose_mime(), FALLBACK_MIME);
    rec.start().unwrap();
    assert_eq!(calls.borrow().started[0].1, FALLBACK_MIME);
    assert_eq!(rec.active_session().unwrap().mime, FALLBACK_MIME);
}

#[test]
fn unavailable_encoder_stays_idle() {
    let (mut rec, calls) = controller();
    rec.backend_mut().available = false;
    let err = rec.start().unwrap_err();
    assert!(matches!(err, RecorderError::Unavailable(_)));
    assert_eq!(rec.state(), RecorderState::Idle);
    assert_eq!(rec.surface().size(), SurfaceSize::new(800, 600));
    assert!(calls.borrow().started.is_empty());
}

#[test]
fn stop_when_idle_is_noop() {
    let (mut rec, calls) = controller();
    rec.stop();
    assert_eq!(calls.borrow().stops, 0);
    assert_eq!(rec.pending_finalize(), 0);
}

#[test]
fn frames_request_data_only_while_recording() {
    let (mut rec, calls) = controller();
    rec.on_frame();
    assert_eq!(calls.borrow().requests, 0);
    rec.start().unwrap();
    rec.on_frame();
    rec.on_frame();
    assert_eq!(calls.borrow().requests, 2);
    rec.stop();
    rec.on_frame();
    assert_eq!(calls.borrow().requests, 2);
}

#[test]
fn stop_then_flush_concatenates_chunks() {
    let (mut rec, calls) = controller();
    rec.start().unwrap();
    let id = rec.active_session().unwrap().id;
    rec.handle_event(data(id, &[1, 2, 3])).unwrap();
    rec.handle_event(data(id, &[])).unwrap();
    rec.stop();
    assert_eq!(rec.pending_finalize(), 1);
    assert!(calls.borrow().saved.is_empty());

    // flushed after stop, before the stop notice
    rec.handle_event(data(id, &[4, 5])).unwrap();
    rec.handle_event(EncoderEvent::Stopped { session: id }).unwrap();

    let calls = calls.borrow();
    assert_eq!(calls.saved.len(), 1);
    let saved = &calls.saved[0];
    assert_eq!(saved.session, id);
    assert_eq!(saved.file_name, "visualization.webm");
    assert_eq!(saved.mime, "video/webm");
    assert_eq!(saved.chunks, vec![vec![1, 2, 3], vec![4, 5]]);
    assert_eq!(saved.total_bytes(), 5);
    assert_eq!(rec.pending_finalize(), 0);
}

#[test]
fn late_chunks_go_to_their_own_session() {
    let (mut rec, calls) = controller();
    rec.start().unwrap();
    let first = rec.active_session().unwrap().id;
    rec.stop();
    rec.start().unwrap();
    let second = rec.active_session().unwrap().id;
    assert_ne!(first, second);

    rec.handle_event(data(first, &[9])).unwrap();
    rec.handle_event(data(second, &[7, 7])).unwrap();
    rec.handle_event(EncoderEvent::Stopped { session: first }).unwrap();

    assert_eq!(calls.borrow().saved[0].chunks, vec![vec![9]]);
    assert!(rec.is_recording());
    assert_eq!(rec.active_session().unwrap().chunks, vec![vec![7, 7]]);
}

#[test]
fn unexpected_encoder_stop_finalizes_active_session() {
    let (mut rec, calls) = controller();
    rec.start().unwrap();
    let id = rec.active_session().unwrap().id;
    rec.handle_event(data(id, &[1])).unwrap();
    rec.handle_event(EncoderEvent::Stopped { session: id }).unwrap();
    assert_eq!(rec.state(), RecorderState::Idle);
    assert_eq!(rec.surface().size(), SurfaceSize::new(800, 600));
    assert_eq!(calls.borrow().saved.len(), 1);
}

#[test]
fn unknown_sessions_are_ignored() {
    let (mut rec, calls) = controller();
    rec.handle_event(data(SessionId(42), &[1])).unwrap();
    rec.handle_event(EncoderEvent::Stopped {
        session: SessionId(42),
    })
    .unwrap();
    assert!(calls.borrow().saved.is_empty());
}

#[test]
fn toggle_alternates_states() {
    let (mut rec, calls) = controller();
    rec.toggle().unwrap();
    assert!(rec.is_recording());
    rec.toggle().unwrap();
    assert!(!rec.is_recording());
    assert_eq!(calls.borrow().stops, 1);
}

#[test]
fn every_session_is_saved_once_under_its_own_id() {
    let (mut rec, calls) = controller();
    rec.start().unwrap();
    let first = rec.active_session().unwrap().id;
    rec.stop();
    rec.start().unwrap();
    let second = rec.active_session().unwrap().id;
    rec.stop();
    assert_eq!(rec.pending_finalize(), 2);

    // stop notices may arrive out of order
    rec.handle_event(EncoderEvent::Stopped { session: second }).unwrap();
    rec.handle_event(EncoderEvent::Stopped { session: first }).unwrap();
    // a repeated notice must not save twice
    rec.handle_event(EncoderEvent::Stopped { session: first }).unwrap();

    let calls = calls.borrow();
    let started: Vec<_> = calls.started.iter().map(|(id, _)| *id).collect();
    let saved: Vec<_> = calls.saved.iter().map(|r| r.session).collect();
    assert_eq!(started, vec![first, second]);
    assert_eq!(saved, vec![second, first]);
    assert_eq!(rec.pending_finalize(), 0);
}

#[test]
fn resize_during_recording_is_replayed_after_stop() {
    let (mut rec, _) = controller();
    let mut deferred = DeferredResize::default();

    rec.start().unwrap();
    assert_eq!(rec.surface().size(), SurfaceSize::new(1600, 1200));

    // window changes while the capture holds the canvas
    assert!(!deferred.request(rec.is_recording()));
    assert!(deferred.is_pending());
    assert!(!deferred.take_ready(rec.is_recording()));

    rec.stop();
    assert_eq!(rec.surface().size(), SurfaceSize::new(800, 600));

    // first idle frame picks the new window size up, exactly once
    assert!(deferred.take_ready(rec.is_recording()));
    rec.surface_mut().set_size(SurfaceSize::new(1000, 500));
    assert!(!deferred.take_ready(rec.is_recording()));
    assert_eq!(rec.surface().size(), SurfaceSize::new(1000, 500));
}

#[test]
fn resize_while_idle_applies_immediately() {
    let mut deferred = DeferredResize::default();
    assert!(deferred.request(false));
    assert!(!deferred.is_pending());
    assert!(!deferred.take_ready(false));
}

#[test]
fn later_idle_resize_clears_a_parked_one() {
    let mut deferred = DeferredResize::default();
    assert!(!deferred.request(true));
    assert!(deferred.request(false));
    assert!(!deferred.take_ready(false));
}
