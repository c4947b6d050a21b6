//! Road Racer entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent};

    use road_racer::Settings;
    use road_racer::consts::*;
    use road_racer::platform::{HostError, HudView, KeyAction, key_action};
    use road_racer::renderer::{RenderState, scene};
    use road_racer::sim::{Command, GamePhase, GameState, TickInput, apply_command, step};

    const CANVAS_ID: &str = "canvas";

    struct Game {
        state: GameState,
        settings: Settings,
        render_state: Option<RenderState>,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
        last_phase: GamePhase,
        /// Pending requestAnimationFrame id; `None` while the loop is stopped
        frame_handle: Option<i32>,
        /// Set on pagehide; the loop stops re-arming
        shut_down: bool,
    }

    impl Game {
        fn new(seed: u64, settings: Settings) -> Self {
            Self {
                state: GameState::new(seed),
                settings,
                render_state: None,
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput::default(),
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
                last_phase: GamePhase::Running,
                frame_handle: None,
                shut_down: false,
            }
        }

        fn update(&mut self, dt: f32, time: f64) {
            // Clamp dt to prevent spiral of death after tab switch
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                step(&mut self.state, &self.input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Discrete commands apply to exactly one step
                self.input.commands.clear();
            }

            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }

            let current_phase = self.state.phase;
            if current_phase != self.last_phase {
                log::info!("Phase {:?} -> {:?}", self.last_phase, current_phase);
                if current_phase == GamePhase::GameOver {
                    log::info!(
                        "Game over: score {}, level {}",
                        self.state.score,
                        self.state.level
                    );
                }
                self.last_phase = current_phase;
            }
        }

        fn render(&mut self) {
            let vertices = scene(&self.state, self.settings.dim_overlay());
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&vertices) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        fn update_hud(&self, document: &Document) {
            let hud = HudView::from_state(&self.state);

            if let Some(el) = document.get_element_by_id("hud-score") {
                el.set_text_content(Some(&hud.score));
            }
            if let Some(el) = document.get_element_by_id("hud-level") {
                el.set_text_content(Some(&hud.level));
            }
            if let Some(el) = document.get_element_by_id("pause-btn") {
                el.set_text_content(Some(hud.pause_label));
            }
            if let Some(el) = document.get_element_by_id("game-over") {
                let class = if hud.show_game_over { "" } else { "hidden" };
                let _ = el.set_attribute("class", class);
            }
            if let Some(el) = document.get_element_by_id("restart-btn") {
                if hud.restart_enabled {
                    let _ = el.remove_attribute("disabled");
                } else {
                    let _ = el.set_attribute("disabled", "");
                }
            }
            if let Some(el) = document.get_element_by_id("hud-fps") {
                if self.settings.show_fps {
                    let _ = el.set_attribute("class", "");
                    el.set_text_content(Some(&format!("{} fps", self.fps)));
                } else {
                    let _ = el.set_attribute("class", "hidden");
                }
            }
        }

        /// Apply a command right away instead of waiting for the next step.
        /// Needed while stopped, since no step runs to drain the queue.
        fn command_now(&mut self, command: Command) {
            apply_command(&mut self.state, command);
        }

        /// True when the state is running again but no frame is scheduled
        fn needs_restart_loop(&self) -> bool {
            self.state.is_running() && self.frame_handle.is_none() && !self.shut_down
        }
    }

    pub async fn run() -> Result<(), HostError> {
        let window = web_sys::window().ok_or(HostError::NoWindow)?;
        let document = window.document().ok_or(HostError::NoDocument)?;

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id(CANVAS_ID)
            .ok_or(HostError::MissingElement(CANVAS_ID))?
            .dyn_into()
            .map_err(|_| HostError::NotACanvas(CANVAS_ID))?;

        // Fixed logical size, scaled for HiDPI backing store
        let dpr = window.device_pixel_ratio();
        let width = (CANVAS_WIDTH as f64 * dpr) as u32;
        let height = (CANVAS_HEIGHT as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, settings)));
        log::info!("Game initialized with seed: {}", seed);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height).await?;
        game.borrow_mut().render_state = Some(render_state);

        setup_keyboard(game.clone());
        setup_buttons(&document, game.clone());
        setup_auto_pause(&document, game.clone());
        setup_teardown(game.clone());

        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        request_animation_frame(game);

        log::info!("Road Racer running!");
        Ok(())
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let mut g = game.borrow_mut();
            let Some(action) = key_action(&event.key(), &g.settings) else {
                return;
            };
            // Keep arrow keys from scrolling the page
            event.prevent_default();
            match action {
                KeyAction::Sim(Command::TogglePause) => {
                    g.command_now(Command::TogglePause);
                    if g.needs_restart_loop() {
                        drop(g);
                        resume_loop(&game);
                    }
                }
                KeyAction::Sim(command) => g.input.commands.push(command),
                KeyAction::ToggleAutopilot => {
                    g.input.idle_mode = !g.input.idle_mode;
                    log::info!("Autopilot: {}", g.input.idle_mode);
                }
                KeyAction::ToggleFps => {
                    g.settings.show_fps = !g.settings.show_fps;
                    g.settings.save();
                }
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        if let Some(btn) = document.get_element_by_id("pause-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let resume = {
                    let mut g = game.borrow_mut();
                    g.command_now(Command::TogglePause);
                    g.needs_restart_loop()
                };
                if resume {
                    resume_loop(&game);
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let resume = {
                    let mut g = game.borrow_mut();
                    if !g.state.is_game_over() {
                        return;
                    }
                    g.command_now(Command::Restart);
                    g.input.commands.clear();
                    g.needs_restart_loop()
                };
                if resume {
                    resume_loop(&game);
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(document: &Document, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    if g.settings.auto_pause && g.state.is_running() {
                        g.command_now(Command::TogglePause);
                        log::info!("Auto-paused (tab hidden)");
                    }
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
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.settings.auto_pause && g.state.is_running() {
                    g.command_now(Command::TogglePause);
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_teardown(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let mut g = game.borrow_mut();
            g.shut_down = true;
            if let Some(handle) = g.frame_handle.take() {
                if let Some(window) = web_sys::window() {
                    let _ = window.cancel_animation_frame(handle);
                }
            }
            log::info!("Game loop stopped");
        });
        let _ = window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        if game.borrow().shut_down {
            return;
        }
        let loop_game = game.clone();
        let closure = Closure::once(move |time: f64| {
            game_loop(loop_game, time);
        });
        let handle = window
            .request_animation_frame(closure.as_ref().unchecked_ref())
            .ok();
        game.borrow_mut().frame_handle = handle;
        closure.forget();
    }

    /// Start a stopped loop again without a catch-up burst
    fn resume_loop(game: &Rc<RefCell<Game>>) {
        {
            let mut g = game.borrow_mut();
            g.last_time = 0.0;
            g.accumulator = 0.0;
        }
        log::debug!("Game loop resumed");
        request_animation_frame(game.clone());
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let keep_going = {
            let mut g = game.borrow_mut();
            g.frame_handle = None;
            if g.shut_down {
                return;
            }

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt, time);
            g.render();
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                g.update_hud(&document);
            }

            // This frame already shows the pause overlay or the crash; stop here
            g.state.is_running()
        };

        if keep_going {
            request_animation_frame(game);
        } else {
            log::debug!("Game loop stopped while not running");
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::error_1(&format!("Failed to init logger: {}", e).into());
    }

    log::info!("Road Racer starting...");
    if let Err(e) = wasm_game::run().await {
        log::error!("Road Racer failed to start: {}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Road Racer (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(12345);

    let summary = headless::run_demo(seed, headless::DEMO_SECONDS);
    println!(
        "Seed {}: score {}, level {}, {} obstacles dodged in {:.1}s{}",
        seed,
        summary.score,
        summary.level,
        summary.cleared,
        summary.seconds,
        if summary.crashed { " (crashed)" } else { "" }
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Autopilot session without a window, for smoke-testing the simulation
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use road_racer::consts::SIM_DT;
    use road_racer::sim::{GameState, TickInput, step};

    pub const DEMO_SECONDS: f32 = 120.0;

    pub struct Summary {
        pub score: u32,
        pub level: u32,
        pub cleared: u32,
        pub seconds: f32,
        pub crashed: bool,
    }

    pub fn run_demo(seed: u64, seconds: f32) -> Summary {
        let mut state = GameState::new(seed);
        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };

        let max_steps = (seconds / SIM_DT) as u64;
        let mut cleared = 0;
        let mut steps = 0;
        while steps < max_steps && !state.is_game_over() {
            let report = step(&mut state, &input, SIM_DT);
            cleared += report.cleared;
            if report.spawned > 0 {
                log::debug!("Spawned {} obstacle(s) at tick {}", report.spawned, state.time_ticks);
            }
            steps += 1;
        }

        Summary {
            score: state.score,
            level: state.level,
            cleared,
            seconds: steps as f32 * SIM_DT,
            crashed: state.is_game_over(),
        }
    }
}
