#![cfg(target_arch = "wasm32")]
use instant::Instant;
use spirit_core::{event_queue, DeferredResize, VisualizerConfig};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod audio;
mod constants;
mod dom;
mod frame;
mod recorder;
mod render;

use constants::*;
use frame::Driver;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("spiritfinder starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let canvas: web::HtmlCanvasElement = document
        .get_element_by_id(CANVAS_ID)
        .ok_or_else(|| anyhow::anyhow!("missing #{}", CANVAS_ID))?
        .dyn_into()
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;

    let config = VisualizerConfig {
        seed: rand::random(),
        ..VisualizerConfig::default()
    };

    // Without an audio graph the analyser reads as silence and the scene still animates.
    let graph = match audio::build_audio_graph(config.fft_size) {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("audio init error: {:?}", e);
            None
        }
    };
    let source = audio::AnalyserSource::new(graph.as_ref().map(|g| g.analyser.clone()));

    let events = event_queue();
    let backend = recorder::MediaRecorderBackend::new(canvas.clone(), events.clone());
    let surface = recorder::CanvasSurface::new(canvas.clone());
    let driver: Rc<RefCell<Driver>> = Rc::new(RefCell::new(Driver::with_events(
        &config, source, backend, surface, events,
    )));

    let deferred_resize = Rc::new(RefCell::new(DeferredResize::default()));
    let driver_for_resize = driver.clone();
    dom::wire_canvas_resize(&canvas, deferred_resize.clone(), move || {
        driver_for_resize
            .try_borrow()
            .map(|d| d.recorder().is_recording())
            .unwrap_or(false)
    });

    if let Some(graph) = &graph {
        wire_audio(&document, graph, &driver)?;
    }
    wire_record_button(&document, &driver)?;

    let particles = driver.borrow().scene().particles.positions.clone();
    let gpu = frame::init_gpu(&canvas, &particles).await;
    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext {
        driver,
        gpu,
        canvas,
        deferred_resize,
        started: Instant::now(),
    }));
    frame::start_loop(frame_ctx);
    Ok(())
}

/// File picker, Replay button, and playback-driven recording.
fn wire_audio(
    document: &web::Document,
    graph: &audio::AudioGraph,
    driver: &Rc<RefCell<Driver>>,
) -> anyhow::Result<()> {
    match document
        .get_element_by_id(AUDIO_INPUT_ID)
        .and_then(|el| el.dyn_into::<web::HtmlInputElement>().ok())
    {
        Some(input) => graph.wire_file_input(&input),
        None => log::warn!("missing #{}; no audio can be loaded", AUDIO_INPUT_ID),
    }

    let on_play = driver.clone();
    let on_ended = driver.clone();
    graph.on_lifecycle(
        move || {
            if let Err(e) = on_play.borrow_mut().recorder_mut().start() {
                log::error!("[recorder] {e}");
            }
        },
        move || on_ended.borrow_mut().recorder_mut().stop(),
    );

    let replay = dom::create_overlay_button(document, REPLAY_LABEL, REPLAY_TOP_PX, BUTTON_LEFT_PX)?;
    let graph_for_replay = graph.clone();
    dom::add_click_listener(&replay, move || graph_for_replay.replay());
    Ok(())
}

fn wire_record_button(document: &web::Document, driver: &Rc<RefCell<Driver>>) -> anyhow::Result<()> {
    let button = dom::create_overlay_button(document, RECORD_LABEL, RECORD_TOP_PX, BUTTON_LEFT_PX)?;
    let driver = driver.clone();
    dom::add_click_listener(&button, move || {
        if let Err(e) = driver.borrow_mut().recorder_mut().toggle() {
            log::error!("[recorder] {e}");
        }
    });
    Ok(())
}
