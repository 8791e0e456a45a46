use spirit_core::FrequencySource;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Playback chain: `<audio>` -> MediaElementSource -> Analyser -> destination.
#[derive(Clone)]
pub struct AudioGraph {
    pub ctx: web::AudioContext,
    pub element: web::HtmlAudioElement,
    pub analyser: web::AnalyserNode,
}

pub fn build_audio_graph(fft_size: u32) -> anyhow::Result<AudioGraph> {
    let ctx = web::AudioContext::new().map_err(|e| anyhow::anyhow!("{:?}", e))?;
    let element = web::HtmlAudioElement::new().map_err(|e| anyhow::anyhow!("{:?}", e))?;
    let source = ctx
        .create_media_element_source(&element)
        .map_err(|e| anyhow::anyhow!("MediaElementSource error: {:?}", e))?;
    let analyser = ctx
        .create_analyser()
        .map_err(|e| anyhow::anyhow!("AnalyserNode error: {:?}", e))?;
    analyser.set_fft_size(fft_size);
    _ = source.connect_with_audio_node(&analyser);
    _ = analyser.connect_with_audio_node(&ctx.destination());
    log::info!(
        "[audio] analyser fft={} bins={}",
        fft_size,
        analyser.frequency_bin_count()
    );
    Ok(AudioGraph {
        ctx,
        element,
        analyser,
    })
}

/// Frequency source backed by the analyser; silent when no audio graph exists.
pub struct AnalyserSource {
    analyser: Option<web::AnalyserNode>,
}

impl AnalyserSource {
    pub fn new(analyser: Option<web::AnalyserNode>) -> Self {
        Self { analyser }
    }
}

impl FrequencySource for AnalyserSource {
    fn fill(&mut self, out: &mut [u8]) {
        match &self.analyser {
            Some(a) => a.get_byte_frequency_data(out),
            None => out.fill(0),
        }
    }
}

impl AudioGraph {
    pub fn play(&self) {
        _ = self.ctx.resume();
        _ = self.element.play();
    }

    /// Rewind and play again, if a file has been loaded.
    pub fn replay(&self) {
        if self.element.src().is_empty() {
            return;
        }
        self.element.set_current_time(0.0);
        self.play();
    }

    /// Load the first file picked in `input` and start playback.
    pub fn wire_file_input(&self, input: &web::HtmlInputElement) {
        let graph = self.clone();
        let input_for_change = input.clone();
        let on_change = Closure::wrap(Box::new(move || {
            let Some(file) = input_for_change.files().and_then(|f| f.get(0)) else {
                log::info!("[audio] no file selected");
                return;
            };
            match web::Url::create_object_url_with_blob(&file) {
                Ok(url) => {
                    log::info!("[audio] playing {}", file.name());
                    graph.element.set_src(&url);
                    graph.play();
                }
                Err(e) => log::error!("[audio] object URL error: {:?}", e),
            }
        }) as Box<dyn FnMut()>);
        _ = input.add_event_listener_with_callback("change", on_change.as_ref().unchecked_ref());
        on_change.forget();
    }

    /// Route playback lifecycle events (`play`, `ended`) to `on_play` / `on_ended`.
    pub fn on_lifecycle(&self, on_play: impl FnMut() + 'static, on_ended: impl FnMut() + 'static) {
        let play = Closure::wrap(Box::new(on_play) as Box<dyn FnMut()>);
        self.element.set_onplay(Some(play.as_ref().unchecked_ref()));
        play.forget();
        let ended = Closure::wrap(Box::new(on_ended) as Box<dyn FnMut()>);
        self.element.set_onended(Some(ended.as_ref().unchecked_ref()));
        ended.forget();
    }
}
