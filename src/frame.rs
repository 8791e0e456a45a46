use crate::audio::AnalyserSource;
use crate::dom;
use crate::recorder::{CanvasSurface, MediaRecorderBackend};
use crate::render;
use instant::Instant;
use spirit_core::{DeferredResize, FrameDriver, Scene, SceneRenderer};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub type Driver = FrameDriver<AnalyserSource, MediaRecorderBackend, CanvasSurface>;

pub struct FrameContext<'a> {
    pub driver: Rc<RefCell<Driver>>,
    pub gpu: Option<render::GpuState<'a>>,
    pub canvas: web::HtmlCanvasElement,
    /// Window resize parked while a recording held the canvas size.
    pub deferred_resize: Rc<RefCell<DeferredResize>>,
    pub started: Instant,
}

/// Stand-in renderer when WebGPU is unavailable; the scene and recorder still advance.
struct Headless;

impl SceneRenderer for Headless {
    type Error = std::convert::Infallible;

    fn render(&mut self, _scene: &Scene) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl<'a> FrameContext<'a> {
    pub fn frame(&mut self) {
        let wall_time = self.started.elapsed().as_secs_f64();
        let mut driver = self.driver.borrow_mut();
        let recording = driver.recorder().is_recording();
        if self.deferred_resize.borrow_mut().take_ready(recording) {
            log::debug!("applying resize deferred during recording");
            dom::sync_canvas_backing_size(&self.canvas);
        }
        match self.gpu.as_mut() {
            Some(gpu) => {
                gpu.resize_if_needed(self.canvas.width(), self.canvas.height());
                driver.tick(wall_time, gpu);
            }
            None => driver.tick(wall_time, &mut Headless),
        }
    }
}

pub async fn init_gpu(
    canvas: &web::HtmlCanvasElement,
    particles: &[[f32; 3]],
) -> Option<render::GpuState<'static>> {
    // leak a canvas clone to satisfy 'static lifetime for surface
    let leaked_canvas = Box::leak(Box::new(canvas.clone()));
    match render::GpuState::new(leaked_canvas, particles).await {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("WebGPU init error: {:?}", e);
            None
        }
    }
}

fn request_frame(tick: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>) {
    let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref().map(|c| c.as_ref().clone()))
    else {
        return;
    };
    _ = w.request_animation_frame(cb.unchecked_ref());
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext<'static>>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx.borrow_mut().frame();
        request_frame(&tick_clone);
    }) as Box<dyn FnMut()>));
    request_frame(&tick);
}
