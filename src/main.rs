//! Rain Catcher entry point
//!
//! Handles platform-specific initialization and runs the game loop.
//! The web build renders with WebGPU; the native build runs a headless
//! session driven by the autopilot.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, MouseEvent, TouchEvent};

    use glam::Vec2;
    use rain_catcher::audio::AudioManager;
    use rain_catcher::platform::{FrameClock, unproject};
    use rain_catcher::renderer::{RenderState, world_vertices};
    use rain_catcher::sim::{FrameEvent, FrameInput, autopilot_target};
    use rain_catcher::{HighScores, Screen, Settings, Shell, Tuning};

    /// Game instance holding all state
    struct Game {
        shell: Shell,
        tuning: Tuning,
        settings: Settings,
        high_scores: HighScores,
        audio: AudioManager,
        render_state: Option<RenderState>,
        clock: FrameClock,
        /// Last pointer position in world space
        pointer: Option<Vec2>,
        /// Mouse button held or finger on screen
        touching: bool,
        /// Demo mode - autopilot moves the bucket
        idle_mode: bool,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(tuning: Tuning) -> Self {
            let settings = Settings::load();
            let mut audio = AudioManager::new();
            audio.apply_settings(&settings);
            Self {
                shell: Shell::new(tuning),
                tuning,
                settings,
                high_scores: HighScores::load(),
                audio,
                render_state: None,
                clock: FrameClock::new(),
                pointer: None,
                touching: false,
                idle_mode: false,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// Map a canvas-relative pixel position into the world
        fn set_pointer(&mut self, canvas: &HtmlCanvasElement, x: f32, y: f32) {
            let w = canvas.client_width() as f32;
            let h = canvas.client_height() as f32;
            self.pointer = unproject(x, y, w, h, &self.tuning);
        }

        /// First user gesture unlocks audio; the rain loop starts once
        fn on_gesture(&mut self) {
            self.audio.resume();
            self.audio.start_rain();
        }

        /// Run one simulation frame
        fn update(&mut self, time: f64) {
            let dt = self.clock.tick(time);

            let pointer = if self.touching {
                self.pointer
            } else if self.idle_mode && self.shell.screen() == Screen::Playing {
                self.shell.world().and_then(autopilot_target)
            } else {
                None
            };
            let input = FrameInput { pointer };

            let events = self.shell.frame(&input, dt, js_sys::Date::now() as u64);
            for event in events {
                if let FrameEvent::PlaySound(sound) = event {
                    self.audio.play(sound);
                }
            }

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let vertices = self.shell.world().map(world_vertices).unwrap_or_default();
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

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            if let Some(el) = document.get_element_by_id("hud-text") {
                el.set_text_content(Some(&self.shell.hud_text()));
            }

            if let Some(el) = document.get_element_by_id("hud-fps") {
                if self.settings.show_fps {
                    let _ = el.set_attribute("class", "");
                    el.set_text_content(Some(&format!("{} FPS", self.fps)));
                } else {
                    let _ = el.set_attribute("class", "hidden");
                }
            }

            if let Some(el) = document.get_element_by_id("hud-best") {
                let text = match self.high_scores.top_score() {
                    Some(best) => format!("Best: {}", best),
                    None => String::new(),
                };
                el.set_text_content(Some(&text));
            }
        }

        /// End the run and store it on the leaderboard
        fn quit_to_menu(&mut self) {
            if let Some(run) = self.shell.quit_to_menu() {
                if let Some(rank) = self.high_scores.record(&run, js_sys::Date::now()) {
                    log::info!("New high score! Rank #{}", rank);
                    self.high_scores.save();
                }
            }
            self.touching = false;
            self.pointer = None;
        }

        fn auto_pause(&mut self, reason: &str) {
            if self.settings.mute_on_blur {
                self.audio.set_muted(true);
            }
            if self.settings.pause_on_blur && self.shell.screen() == Screen::Playing {
                self.shell.pause();
                log::info!("Auto-paused ({})", reason);
            }
            self.touching = false;
            self.clock.reset();
        }
    }

    /// Canvas-relative position of the first touch
    fn touch_position(event: &TouchEvent, canvas: &HtmlCanvasElement) -> Option<(f32, f32)> {
        let touch = event.touches().get(0)?;
        let rect = canvas.get_bounding_client_rect();
        let x = touch.client_x() as f32 - rect.left() as f32;
        let y = touch.client_y() as f32 - rect.top() as f32;
        Some((x, y))
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Rain Catcher starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let tuning = Tuning::default();
        let game = Rc::new(RefCell::new(Game::new(tuning)));

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(
            surface,
            &adapter,
            width,
            height,
            (tuning.viewport_width, tuning.viewport_height),
        )
        .await
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
        game.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(&canvas, game.clone());
        setup_auto_pause(game.clone());

        request_animation_frame(game);

        log::info!("Rain Catcher running!");
        Ok(())
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse down - "touched" while held
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.on_gesture();
                g.touching = true;
                g.set_pointer(&canvas_clone, event.offset_x() as f32, event.offset_y() as f32);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse move
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.set_pointer(&canvas_clone, event.offset_x() as f32, event.offset_y() as f32);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse up / leave
        for name in ["mouseup", "mouseleave"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().touching = false;
            });
            let _ = canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start / move
        for name in ["touchstart", "touchmove"] {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                g.on_gesture();
                if let Some((x, y)) = touch_position(&event, &canvas_clone) {
                    g.touching = true;
                    g.set_pointer(&canvas_clone, x, y);
                }
            });
            let _ = canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end
        for name in ["touchend", "touchcancel"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                if event.touches().length() == 0 {
                    game.borrow_mut().touching = false;
                }
            });
            let _ = canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let Some(window) = web_sys::window() else {
                return;
            };
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "Escape" | "p" | "P" => g.shell.toggle_pause(),
                    "q" | "Q" => g.quit_to_menu(),
                    "i" | "I" => {
                        g.idle_mode = !g.idle_mode;
                        log::info!("Idle mode: {}", g.idle_mode);
                    }
                    "f" | "F" => {
                        g.settings.show_fps = !g.settings.show_fps;
                        g.settings.save();
                    }
                    "m" | "M" => {
                        g.settings.music_enabled = !g.settings.music_enabled;
                        let settings = g.settings.clone();
                        g.audio.apply_settings(&settings);
                        settings.save();
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            g.update(time);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut g = game.borrow_mut();
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    g.auto_pause("tab hidden");
                } else {
                    g.audio.set_muted(false);
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().auto_pause("window blur");
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Focus back - unmute, stay paused until the player resumes
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().audio.set_muted(false);
            });
            let _ =
                window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Failed to start: {:?}", e);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::error::Error;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    use rain_catcher::highscores::format_duration;
    use rain_catcher::sim::{FrameEvent, FrameInput, autopilot_target};
    use rain_catcher::{HighScores, RunSummary, Shell, Tuning};

    /// Frame rate of the simulated host loop
    const FRAME_RATE: u32 = 60;

    /// Command line options for the headless runner
    #[derive(Debug)]
    pub struct Options {
        pub seconds: u32,
        pub seed: u64,
        pub tuning_path: Option<PathBuf>,
        pub scores_path: Option<PathBuf>,
    }

    impl Default for Options {
        fn default() -> Self {
            Self {
                seconds: 30,
                seed: 1,
                tuning_path: None,
                scores_path: None,
            }
        }
    }

    impl Options {
        pub fn parse<I: Iterator<Item = String>>(mut args: I) -> Result<Self, Box<dyn Error>> {
            let mut options = Options::default();
            while let Some(arg) = args.next() {
                match arg.as_str() {
                    "--seconds" => {
                        let value = args.next().ok_or("--seconds needs a value")?;
                        options.seconds = value.parse()?;
                    }
                    "--seed" => {
                        let value = args.next().ok_or("--seed needs a value")?;
                        options.seed = value.parse()?;
                    }
                    "--scores" => {
                        let value = args.next().ok_or("--scores needs a path")?;
                        options.scores_path = Some(PathBuf::from(value));
                    }
                    "-h" | "--help" => {
                        return Err("usage: rain-catcher [--seconds N] [--seed S] \
                                    [--scores scores.json] [tuning.json]"
                            .into());
                    }
                    path => options.tuning_path = Some(PathBuf::from(path)),
                }
            }
            Ok(options)
        }

        /// Number of simulated frames for the session
        pub fn frames(&self) -> u64 {
            u64::from(self.seconds) * u64::from(FRAME_RATE)
        }

        pub fn tuning(&self) -> Result<Tuning, Box<dyn Error>> {
            match &self.tuning_path {
                Some(path) => {
                    let json = std::fs::read_to_string(path)?;
                    let tuning = Tuning::from_json(&json)?;
                    log::info!("Loaded tuning from {}", path.display());
                    Ok(tuning)
                }
                None => Ok(Tuning::default()),
            }
        }
    }

    /// Play a full session with the autopilot at a fixed frame rate
    pub fn run(options: &Options) -> Result<RunSummary, Box<dyn Error>> {
        let tuning = options.tuning()?;
        let mut shell = Shell::new(tuning);
        shell.start(options.seed);

        let dt = 1.0 / FRAME_RATE as f32;
        let mut sounds = 0usize;
        let mut spawned = 0usize;

        for _ in 0..options.frames() {
            let pointer = shell.world().and_then(autopilot_target);
            for event in shell.frame(&FrameInput { pointer }, dt, options.seed) {
                match event {
                    FrameEvent::PlaySound(sound) => {
                        sounds += 1;
                        log::debug!("Play {:?}", sound);
                    }
                    FrameEvent::Spawned { id, pos } => {
                        spawned += 1;
                        log::debug!("Raindrop {} spawned at x={:.0}", id, pos.x);
                    }
                    FrameEvent::Caught { id } => log::debug!("Raindrop {} caught", id),
                    FrameEvent::Missed { id } => log::debug!("Raindrop {} missed", id),
                }
            }
        }

        log::info!("{} raindrops spawned, {} drop sounds played", spawned, sounds);
        shell.quit_to_menu().ok_or_else(|| "no game was running".into())
    }

    /// Print the run and, with a score file, its leaderboard rank
    pub fn report(run: &RunSummary, options: &Options) -> Result<(), Box<dyn Error>> {
        let rank = match &options.scores_path {
            Some(path) => {
                let mut scores = HighScores::load_from(path)?;
                let timestamp = SystemTime::now().duration_since(UNIX_EPOCH)?.as_millis() as f64;
                let rank = scores.record(run, timestamp);
                scores.save_to(path)?;
                rank
            }
            None => None,
        };

        println!(
            "Seed {}: {} drops collected, {} missed in {}{}",
            run.seed,
            run.drops_gathered,
            run.drops_missed,
            format_duration(run.elapsed_secs),
            rank.map(|r| format!(" (rank #{})", r)).unwrap_or_default()
        );
        Ok(())
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    log::info!("Rain Catcher (native, headless) starting...");

    let options = headless::Options::parse(std::env::args().skip(1))?;
    let run = headless::run(&options)?;
    headless::report(&run, &options)?;
    Ok(())
}
