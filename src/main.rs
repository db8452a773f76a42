//! Heartbeat Flow entry point
//!
//! Handles platform-specific initialization and runs the animation loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::HtmlCanvasElement;

    use heartbeat_flow::consts::*;
    use heartbeat_flow::renderer::{RenderState, SceneBuilder};
    use heartbeat_flow::sim::{HeartbeatScheduler, MonitorState};
    use heartbeat_flow::{HudSnapshot, Settings};

    /// Visualization instance holding all state
    struct App {
        state: MonitorState,
        scheduler: HeartbeatScheduler,
        settings: Settings,
        scene: SceneBuilder,
        render_state: Option<RenderState>,
        last_time: f64,
        last_hud: Option<HudSnapshot>,
    }

    impl App {
        fn new(seed: u64, settings: Settings, width: f32, height: f32) -> Self {
            let state = MonitorState::new(seed);
            let scheduler = HeartbeatScheduler::new(&state);
            let scene = SceneBuilder::new(width, height, &settings);
            Self {
                state,
                scheduler,
                settings,
                scene,
                render_state: None,
                last_time: 0.0,
                last_hud: None,
            }
        }

        /// Run simulation steps for this frame
        fn update(&mut self, dt: f32) {
            let report = self.scheduler.advance(&mut self.state, dt);
            if report.dropped {
                log::debug!("Frame took too long, dropped simulation backlog");
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let vertices = self.scene.build(&self.state);
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&vertices) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Match the canvas backing store to its CSS size
        fn resize(&mut self, canvas: &HtmlCanvasElement, dpr: f64) {
            let width = (canvas.client_width() as f64 * dpr) as u32;
            let height = (canvas.client_height() as f64 * dpr) as u32;
            if width == 0 || height == 0 {
                return;
            }
            canvas.set_width(width);
            canvas.set_height(height);
            self.scene.resize(width as f32, height as f32);
            if let Some(ref mut render_state) = self.render_state {
                render_state.resize(width, height);
            }
            log::debug!("Resized to {}x{}", width, height);
        }

        /// Update HUD elements in DOM (only when something changed)
        fn update_hud(&mut self) {
            let hud = HudSnapshot::capture(&self.state, self.settings.show_metrics);
            if self.last_hud.as_ref() == Some(&hud) {
                return;
            }

            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            let set_text = |selector: &str, text: &str| {
                if let Some(el) = document.query_selector(selector).ok().flatten() {
                    el.set_text_content(Some(text));
                }
            };

            set_text("#hud-bpm .hud-value", &hud.bpm.to_string());
            set_text("#hud-signal .hud-value", &hud.signal_percent.to_string());
            set_text("#hud-data .hud-value", &hud.data_processed.to_string());
            set_text("#hud-particles .hud-value", &hud.active_particles.to_string());
            set_text("#hud-runtime .hud-value", &hud.runtime);

            if let Some(el) = document.get_element_by_id("hud-signal") {
                let class = if hud.signal_active { "hud-card active" } else { "hud-card" };
                let _ = el.set_attribute("class", class);
            }

            // Show/hide metric panels
            for id in ["vitals", "metrics"] {
                if let Some(el) = document.get_element_by_id(id) {
                    let class = if hud.show_metrics { "" } else { "hidden" };
                    let _ = el.set_attribute("class", class);
                }
            }
            if let Some(btn) = document.get_element_by_id("toggle-metrics") {
                let label = if hud.show_metrics { "Hide Metrics" } else { "Show Metrics" };
                btn.set_text_content(Some(label));
            }

            self.last_hud = Some(hud);
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Failed to init logger: {e}").into());
        }

        log::info!("Heartbeat Flow starting...");

        let Some(window) = web_sys::window() else {
            log::error!("No window");
            return;
        };
        let Some(document) = window.document() else {
            log::error!("No document");
            return;
        };

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = match document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into().ok())
        {
            Some(canvas) => canvas,
            None => {
                log::error!("No <canvas id=\"canvas\"> element");
                return;
            }
        };

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let settings = Settings::load();
        let seed = settings.seed_or(js_sys::Date::now() as u64);
        let app = Rc::new(RefCell::new(App::new(
            seed,
            settings,
            width as f32,
            height as f32,
        )));

        log::info!("Monitor initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => surface,
            Err(e) => {
                log::error!("Failed to create surface: {}", e);
                return;
            }
        };

        let adapter = match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
        {
            Ok(adapter) => adapter,
            Err(e) => {
                log::error!("Failed to get adapter: {}", e);
                return;
            }
        };

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        match RenderState::new(surface, &adapter, width, height).await {
            Ok(render_state) => app.borrow_mut().render_state = Some(render_state),
            Err(e) => {
                log::error!("Failed to create device: {}", e);
                return;
            }
        }

        setup_toggle_button(app.clone());
        setup_auto_pause(app.clone());
        setup_resize(app.clone(), canvas);

        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        // Start animation loop
        request_animation_frame(app);

        log::info!("Heartbeat Flow running!");
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            frame(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame(app: Rc<RefCell<App>>, time: f64) {
        {
            let mut a = app.borrow_mut();

            // Calculate delta time
            let dt = if a.last_time > 0.0 {
                ((time - a.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            a.last_time = time;

            a.update(dt);
            a.render();
            a.update_hud();
        }

        request_animation_frame(app);
    }

    fn setup_toggle_button(app: Rc<RefCell<App>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        if let Some(btn) = document.get_element_by_id("toggle-metrics") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let mut a = app.borrow_mut();
                let visible = a.settings.toggle_metrics();
                a.settings.save();
                log::info!("Metrics {}", if visible { "shown" } else { "hidden" });
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(app: Rc<RefCell<App>>, canvas: HtmlCanvasElement) {
        let Some(window) = web_sys::window() else {
            return;
        };

        let window_clone = window.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let dpr = window_clone.device_pixel_ratio();
            app.borrow_mut().resize(&canvas, dpr);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Stop the drivers while the tab is hidden, like timers torn down with the view
    fn setup_auto_pause(app: Rc<RefCell<App>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let hidden = document_clone.visibility_state() == web_sys::VisibilityState::Hidden;
            let mut a = app.borrow_mut();
            a.scheduler.paused = hidden;
            // Don't count the hidden stretch as one huge frame
            a.last_time = 0.0;
            log::info!("Animation {}", if hidden { "paused" } else { "resumed" });
        });
        let _ = document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_app::run().await;
}

/// Default headless run length in seconds
#[cfg(not(target_arch = "wasm32"))]
const DEFAULT_RUN_SECS: u64 = 10;

/// Command line for the headless run: `[seconds] [--quality <preset>]`
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, PartialEq)]
struct RunArgs {
    secs: u64,
    quality: Option<heartbeat_flow::QualityPreset>,
}

#[cfg(not(target_arch = "wasm32"))]
impl RunArgs {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self, String> {
        use heartbeat_flow::QualityPreset;

        let mut run = Self { secs: DEFAULT_RUN_SECS, quality: None };
        while let Some(arg) = args.next() {
            if arg == "--quality" {
                let name = args.next().ok_or("--quality needs a preset name")?;
                let preset = QualityPreset::parse(&name)
                    .ok_or_else(|| format!("Unknown quality preset {:?}", name))?;
                run.quality = Some(preset);
            } else {
                run.secs = arg
                    .parse()
                    .map_err(|e| format!("Invalid duration {:?}: {}", arg, e))?;
            }
        }
        Ok(run)
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use heartbeat_flow::consts::SIM_DT;
    use heartbeat_flow::renderer::SceneBuilder;
    use heartbeat_flow::sim::{HeartbeatScheduler, MonitorState};
    use heartbeat_flow::{HudSnapshot, Settings};
    use std::time::{SystemTime, UNIX_EPOCH};

    env_logger::init();
    log::info!("Heartbeat Flow (native) starting...");
    log::info!("Native mode runs headless - run with `trunk serve` for the web version");

    let args = match RunArgs::parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("usage: heartbeat-flow [seconds] [--quality low|medium|high]");
            std::process::exit(2);
        }
    };
    let secs = args.secs;

    let mut settings = Settings::load();
    if let Some(preset) = args.quality {
        settings.apply_preset(preset);
    }
    let clock = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default();
    let seed = settings.seed_or(clock);
    log::info!("Seed: {}, quality: {}", seed, settings.quality.as_str());

    let mut state = MonitorState::new(seed);
    let mut scheduler = HeartbeatScheduler::new(&state);
    let scene = SceneBuilder::new(1280.0, 720.0, &settings);

    // Feed the scheduler 60 Hz frames of simulated time
    let frames = secs * 60;
    let mut vertices = 0usize;
    for _ in 0..frames {
        let report = scheduler.advance(&mut state, 1.0 / 60.0);
        vertices = vertices.max(scene.build(&state).len());
        if report.seconds > 0 {
            log::info!("{}", HudSnapshot::capture(&state, settings.show_metrics).summary());
        }
    }

    log::info!(
        "Ran {} steps ({:.1}s), {} beats, peak frame {} vertices, next beat in {:.2}s",
        state.time_ticks,
        state.time_ticks as f32 * SIM_DT,
        state.beats,
        vertices,
        scheduler.until_next_beat()
    );

    let hud = HudSnapshot::capture(&state, settings.show_metrics);
    match serde_json::to_string_pretty(&hud) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Failed to serialize HUD: {}", e),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use heartbeat_flow::QualityPreset;

    fn parse(args: &[&str]) -> Result<RunArgs, String> {
        RunArgs::parse(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_run_args_defaults() {
        assert_eq!(parse(&[]).unwrap(), RunArgs { secs: DEFAULT_RUN_SECS, quality: None });
    }

    #[test]
    fn test_run_args_quality_and_secs() {
        let args = parse(&["--quality", "High", "30"]).unwrap();
        assert_eq!(args, RunArgs { secs: 30, quality: Some(QualityPreset::High) });
        assert_eq!(parse(&["5", "--quality", "low"]).unwrap().quality, Some(QualityPreset::Low));
    }

    #[test]
    fn test_run_args_rejects_bad_input() {
        assert!(parse(&["--quality"]).is_err());
        assert!(parse(&["--quality", "ultra"]).is_err());
        assert!(parse(&["soon"]).is_err());
    }
}
