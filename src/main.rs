//! Smiley Flap entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        Document, HtmlCanvasElement, HtmlInputElement, KeyboardEvent, MouseEvent, TouchEvent,
    };

    use smiley_flap::audio::{AudioManager, SoundEffect};
    use smiley_flap::consts::MAX_FRAME_DT;
    use smiley_flap::persistence::LocalStorageStore;
    use smiley_flap::renderer::SdfRenderState;
    use smiley_flap::session::Reaction;
    use smiley_flap::sim::{GameEvent, Viewport};
    use smiley_flap::{Command, Error, Screen, Session, Settings, Tuning, ui};

    /// Game instance holding all state
    struct Game {
        session: Session<LocalStorageStore>,
        render_state: Option<SdfRenderState>,
        audio: AudioManager,
        settings: Settings,
        last_time: f64,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
        // Overlay state last written to the DOM
        last_overlays: ui::Overlays,
    }

    impl Game {
        fn new(seed: u64, viewport: Viewport) -> Self {
            let settings = Settings::load();
            let mut audio = AudioManager::new();
            audio.apply_settings(&settings);
            Self {
                session: Session::new(
                    Tuning::default(),
                    viewport,
                    seed,
                    LocalStorageStore::default(),
                ),
                render_state: None,
                audio,
                settings,
                last_time: 0.0,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
                last_overlays: ui::Overlays::for_screen(Screen::Title, None),
            }
        }

        /// Apply a player command immediately
        fn handle(&mut self, command: Command) {
            match self.session.handle(command, js_sys::Date::now()) {
                Ok(Reaction::Flapped) => self.audio.play(SoundEffect::Flap),
                Ok(Reaction::CountdownStarted) => self.audio.resume(),
                Ok(Reaction::Submitted { rank }) => {
                    log::info!("High score entered at rank {:?}", rank);
                    self.audio.play(SoundEffect::HighScore);
                    render_leaderboard(&self.session);
                }
                Ok(Reaction::Restarted) | Ok(Reaction::Ignored) => {}
                Err(Error::InvalidInitials(_)) => {
                    if let Some(window) = web_sys::window() {
                        let _ = window.alert_with_message(
                            "Please enter 1-3 letters or numbers for your initials.",
                        );
                    }
                }
                Err(e) => log::warn!("{}", e),
            }
        }

        fn toggle_mute(&mut self) {
            let muted = self.settings.toggle_mute();
            self.audio.apply_settings(&self.settings);
            self.settings.save();
            log::info!("Muted: {}", muted);
        }

        /// Run one simulation frame
        fn update(&mut self, dt: f32, time: f64) {
            let dt = dt.min(MAX_FRAME_DT);
            for event in self.session.frame(dt, js_sys::Date::now()) {
                match event {
                    GameEvent::Scored { .. } => self.audio.play(SoundEffect::Score),
                    GameEvent::SpeedUp { .. } => self.audio.play(SoundEffect::SpeedUp),
                    GameEvent::GameOver { .. } => self.audio.play(SoundEffect::Crash),
                    GameEvent::Spawned { .. } => {}
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
        fn render(&mut self, time: f64) {
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&self.session.snapshot(), time) {
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
        fn update_hud(&mut self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            if let Some(el) = document.get_element_by_id("score") {
                el.set_text_content(Some(&ui::score_label(self.session.simulation().score())));
            }

            if let Some(el) = document.get_element_by_id("hud-fps") {
                set_hidden(&document, "hud-fps", !self.settings.show_fps);
                el.set_text_content(Some(&format!("{} fps", self.fps)));
            }

            let overlays =
                ui::Overlays::for_screen(self.session.screen(), self.session.summary());
            if overlays == self.last_overlays {
                return;
            }
            let previous = self.last_overlays;

            set_hidden(&document, "startScreen", !overlays.start);
            set_hidden(&document, "countdownOverlay", overlays.countdown.is_none());
            set_hidden(&document, "gameOver", !overlays.game_over);
            set_hidden(&document, "initialsEntry", !overlays.initials_entry);

            if let Some(label) = overlays.countdown {
                if previous.countdown != overlays.countdown {
                    if let Some(el) = document.get_element_by_id("countdownOverlay") {
                        el.set_text_content(Some(label));
                    }
                    let sound = if label == "Go!" {
                        SoundEffect::Go
                    } else {
                        SoundEffect::CountdownTick
                    };
                    self.audio.play(sound);
                }
            }

            if overlays.game_over && !previous.game_over {
                self.show_game_over(&document);
            }
            if overlays.initials_entry && !previous.initials_entry {
                if let Some(input) = initials_input(&document) {
                    input.set_value("");
                    let _ = input.focus();
                }
            }
            self.last_overlays = overlays;
        }

        fn show_game_over(&self, document: &Document) {
            let Some(summary) = self.session.summary() else {
                return;
            };
            if let Some(el) = document.get_element_by_id("finalScore") {
                el.set_text_content(Some(&summary.score.to_string()));
            }
            if let Some(el) = document.get_element_by_id("bestScore") {
                el.set_text_content(Some(&summary.best.to_string()));
            }
        }
    }

    fn set_hidden(document: &Document, id: &str, hidden: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", hidden);
        }
    }

    fn initials_input(document: &Document) -> Option<HtmlInputElement> {
        document
            .get_element_by_id("initialsInput")?
            .dyn_into::<HtmlInputElement>()
            .ok()
    }

    /// Rebuild the leaderboard list
    fn render_leaderboard(session: &Session<LocalStorageStore>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let Some(list) = document.get_element_by_id("leaderboard") else {
            return;
        };
        list.set_inner_html("");
        for entry in session.leaderboard().entries() {
            if let Ok(li) = document.create_element("li") {
                li.set_text_content(Some(&ui::leaderboard_line(entry)));
                let _ = list.append_child(&li);
            }
        }

        if let Some(el) = document.get_element_by_id("bestScore") {
            if let Some(summary) = session.summary() {
                el.set_text_content(Some(&summary.best.to_string()));
            }
        }
    }

    /// Size the canvas for the current window; returns the playfield and pixel size
    fn fit_canvas(canvas: &HtmlCanvasElement) -> (Viewport, u32, u32) {
        let window = web_sys::window();
        let inner_width = window
            .as_ref()
            .and_then(|w| w.inner_width().ok())
            .and_then(|v| v.as_f64())
            .unwrap_or(800.0);
        let dpr = window.as_ref().map(|w| w.device_pixel_ratio()).unwrap_or(1.0);

        let viewport = Viewport::for_window(inner_width as f32);
        let width = ((viewport.width as f64 * dpr) as u32).max(1);
        let height = ((viewport.height as f64 * dpr) as u32).max(1);
        canvas.set_width(width);
        canvas.set_height(height);
        let _ = canvas.set_attribute(
            "style",
            &format!("width: {}px; height: {}px", viewport.width, viewport.height),
        );
        log::info!("Canvas size: {} x {}", viewport.width, viewport.height);
        (viewport, width, height)
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("Logger already set: {}", e).into());
        }

        log::info!("Smiley Flap starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        let (viewport, width, height) = fit_canvas(&canvas);

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, viewport)));
        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        match init_renderer(&instance, &canvas, width, height).await {
            Ok(mut render_state) => {
                let start = window.performance().map(|p| p.now()).unwrap_or(0.0);
                render_state.set_start_time(start);
                game.borrow_mut().render_state = Some(render_state);
            }
            Err(e) => log::error!("WebGPU unavailable, rendering disabled: {}", e),
        }

        render_leaderboard(&game.borrow().session);

        setup_input_handlers(&canvas, game.clone());
        setup_buttons(game.clone());
        setup_resize(&canvas, game.clone());

        request_animation_frame(game);

        log::info!("Smiley Flap running!");
        Ok(())
    }

    async fn init_renderer(
        instance: &wgpu::Instance,
        canvas: &HtmlCanvasElement,
        width: u32,
        height: u32,
    ) -> Result<SdfRenderState, String> {
        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| e.to_string())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| e.to_string())?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        SdfRenderState::new(surface, &adapter, width, height)
            .await
            .map_err(|e| e.to_string())
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse press
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                event.prevent_default();
                game.borrow_mut().handle(Command::Flap);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                game.borrow_mut().handle(Command::Flap);
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let Some(window) = web_sys::window() else {
                return;
            };
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let typing = event
                    .target()
                    .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
                    .is_some();
                if typing {
                    return;
                }
                let mut g = game.borrow_mut();
                match event.code().as_str() {
                    "Space" => {
                        event.prevent_default(); // Prevent page scrolling
                        g.handle(Command::Flap);
                    }
                    "KeyM" => g.toggle_mute(),
                    "KeyF" => {
                        g.settings.show_fps = !g.settings.show_fps;
                        g.settings.save();
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn on_click(
        document: &Document,
        id: &str,
        game: Rc<RefCell<Game>>,
        make: fn(&Document) -> Command,
    ) {
        let Some(btn) = document.get_element_by_id(id) else {
            log::warn!("Missing #{} element", id);
            return;
        };
        let doc = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            game.borrow_mut().handle(make(&doc));
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn submit_command(document: &Document) -> Command {
        let value = initials_input(document).map(|i| i.value()).unwrap_or_default();
        Command::SubmitInitials(value)
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        on_click(&document, "startButton", game.clone(), |_| Command::BeginCountdown);
        on_click(&document, "restartButton", game.clone(), |_| Command::Restart);
        on_click(&document, "submitInitials", game.clone(), submit_command);

        // Enter in the initials box submits
        if let Some(input) = initials_input(&document) {
            let doc = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.key() == "Enter" {
                    game.borrow_mut().handle(submit_command(&doc));
                }
            });
            let _ = input
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let (viewport, width, height) = fit_canvas(&canvas);
            let mut g = game.borrow_mut();
            g.session.resize(viewport);
            if let Some(ref mut render_state) = g.render_state {
                render_state.resize(width, height);
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
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

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                0.0
            };
            g.last_time = time;

            g.update(dt, time);
            g.render(time);
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run().await
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Smiley Flap (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    println!("\nRunning autopilot demo...");
    demo::run_autopilot(42);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use smiley_flap::persistence::MemoryStore;
    use smiley_flap::sim::{GameEvent, Simulation, TickInput, Viewport};
    use smiley_flap::{Command, Screen, Session, Tuning, ui};

    const FRAME_MS: f64 = 1000.0 / 60.0;
    const MAX_FRAMES: u32 = 60 * 60 * 5;

    /// Flap when falling below the middle of the next gap
    fn wants_flap(sim: &Simulation) -> bool {
        let avatar = sim.avatar();
        let target = sim
            .obstacles()
            .iter()
            .find(|o| o.right() >= avatar.left())
            .map(|o| o.top_height + o.gap * 0.5)
            .unwrap_or(sim.viewport().height * 0.5);
        avatar.velocity > 0.0 && avatar.center().y > target + 10.0
    }

    pub fn run_autopilot(seed: u64) {
        let mut session = Session::new(
            Tuning::default(),
            Viewport::default(),
            seed,
            MemoryStore::new(),
        );
        let mut now = 0.0;
        let _ = session.handle(Command::BeginCountdown, now);

        for _ in 0..MAX_FRAMES {
            now += FRAME_MS;
            let input = TickInput {
                flap: wants_flap(session.simulation()),
            };
            for event in session.frame_with_input(&input, (FRAME_MS / 1000.0) as f32, now) {
                if let GameEvent::SpeedUp { speed } = event {
                    log::debug!("Speed now {}", speed);
                }
            }
            if session.screen() == Screen::GameOver {
                break;
            }
        }

        let sim = session.simulation();
        println!(
            "Run finished after {} ticks: score {}, speed {}, cause {:?}",
            sim.time_ticks(),
            sim.score(),
            sim.speed(),
            sim.collision()
        );

        if session.summary().is_some_and(|s| s.awaiting_initials) {
            match session.handle(Command::SubmitInitials("cpu".to_string()), now) {
                Ok(reaction) => log::info!("Submitted: {:?}", reaction),
                Err(e) => log::error!("{}", e),
            }
        }
        for entry in session.leaderboard().entries() {
            println!("  {}", ui::leaderboard_line(entry));
        }
    }
}
