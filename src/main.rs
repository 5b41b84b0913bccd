//! Tank Arena entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlElement, KeyboardEvent, MouseEvent, WheelEvent};

    use tank_arena::GameConfig;
    use tank_arena::consts::*;
    use tank_arena::platform::{AssetManifest, InputLatch, Key};
    use tank_arena::render::RenderFrame;
    use tank_arena::sim::{GameEvent, GameState, tick};
    use tank_arena::status::StatusSnapshot;

    // Hand frames to the page-side renderer if one is registered
    #[wasm_bindgen(inline_js = "
        export function submit_frame(camera, zoom, instances, aimLines) {
            if (typeof window.tankArenaRender === 'function') {
                window.tankArenaRender(camera, zoom, instances, aimLines);
            }
        }
    ")]
    extern "C" {
        fn submit_frame(camera: &str, zoom: f32, instances: &[u8], aim_lines: &[u8]);
    }

    /// Game instance holding all state
    struct Game {
        state: GameState,
        latch: InputLatch,
        accumulator: f32,
        last_time: f64,
        viewport_width: f32,
    }

    impl Game {
        fn new(seed: u64, config: GameConfig) -> Self {
            Self {
                state: GameState::with_config(seed, config),
                latch: InputLatch::new(),
                accumulator: 0.0,
                last_time: 0.0,
                viewport_width: 1920.0,
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.latch.sample();
                tick(&mut self.state, &input, SIM_DT);
                self.latch.sync_phase(self.state.phase);
                self.accumulator -= SIM_DT;
                substeps += 1;
            }

            for event in self.state.drain_events() {
                match event {
                    GameEvent::EnemyKilled { id } => log::debug!("Enemy {} destroyed", id),
                    GameEvent::SkillCast { kind } => log::debug!("Cast {:?}", kind),
                    GameEvent::Defeated => log::info!("Defeated after {} kills", self.state.player.kills),
                    GameEvent::Victory => log::info!("Victory at tick {}", self.state.time_ticks),
                    GameEvent::BulletFired | GameEvent::PlayerHit { .. } => {}
                }
            }
        }

        fn render(&self) {
            let frame = RenderFrame::capture(&self.state, self.viewport_width);
            match serde_json::to_string(&frame.camera) {
                Ok(camera) => submit_frame(
                    &camera,
                    frame.zoom,
                    frame.instance_bytes(),
                    frame.aim_line_bytes(),
                ),
                Err(e) => log::warn!("Failed to encode camera: {}", e),
            }
        }

        fn update_status_board(&self, document: &Document) {
            let Some(board) = status_board(document) else {
                return;
            };
            let snapshot = StatusSnapshot::capture(&self.state, self.viewport_width);
            board.set_text_content(Some(&snapshot.lines().join("\n")));
        }
    }

    /// Find or lazily create the status overlay
    fn status_board(document: &Document) -> Option<HtmlElement> {
        if let Some(el) = document.get_element_by_id("statusBoard") {
            return el.dyn_into().ok();
        }
        let el: HtmlElement = document.create_element("div").ok()?.dyn_into().ok()?;
        el.set_id("statusBoard");
        let style = el.style();
        for (name, value) in [
            ("position", "absolute"),
            ("top", "10px"),
            ("left", "10px"),
            ("color", "white"),
            ("white-space", "pre"),
            ("font-family", "monospace"),
        ] {
            let _ = style.set_property(name, value);
        }
        document.body()?.append_child(&el).ok()?;
        Some(el)
    }

    /// Optional JSON tuning embedded in the page
    fn load_config(document: &Document) -> GameConfig {
        let Some(json) = document
            .get_element_by_id("tank-config")
            .and_then(|el| el.text_content())
        else {
            return GameConfig::default();
        };
        match GameConfig::from_json(&json) {
            Ok(config) => {
                log::info!("Loaded page config");
                config
            }
            Err(e) => {
                log::warn!("Ignoring page config: {}", e);
                GameConfig::default()
            }
        }
    }

    fn viewport_width(window: &web_sys::Window) -> f32 {
        window
            .inner_width()
            .ok()
            .and_then(|w| w.as_f64())
            .unwrap_or(1920.0) as f32
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("Logger already set: {}", e).into());
        }

        log::info!("Tank Arena starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, load_config(&document))));
        game.borrow_mut().viewport_width = viewport_width(&window);

        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(&window, &document, game.clone())?;
        setup_auto_pause(&window, &document, game.clone())?;
        setup_status_board(&window, &document, game.clone())?;

        request_animation_frame(game);

        log::info!("Tank Arena running!");
        Ok(())
    }

    fn setup_input_handlers(
        window: &web_sys::Window,
        document: &Document,
        game: Rc<RefCell<Game>>,
    ) -> Result<(), JsValue> {
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(key) = Key::from_dom(&event.key()) {
                    if !event.repeat() || key != Key::Pause {
                        game.borrow_mut().latch.key_down(key);
                    }
                }
            });
            document.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(key) = Key::from_dom(&event.key()) {
                    game.borrow_mut().latch.key_up(key);
                }
            });
            document.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                game.borrow_mut().latch.pointer_down(event.button());
            });
            document.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                game.borrow_mut().latch.pointer_up(event.button());
            });
            document.add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                game.borrow_mut().latch.pointer_move(event.movement_x() as f32);
            });
            document.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: WheelEvent| {
                game.borrow_mut().latch.wheel(event.delta_y() as f32);
            });
            document.add_event_listener_with_callback("wheel", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        {
            let window_clone = window.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().viewport_width = viewport_width(&window_clone);
            });
            window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
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

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
            g.render();
        }

        request_animation_frame(game);
    }

    fn setup_status_board(
        window: &web_sys::Window,
        document: &Document,
        game: Rc<RefCell<Game>>,
    ) -> Result<(), JsValue> {
        game.borrow().update_status_board(document);

        let document = document.clone();
        let closure = Closure::<dyn FnMut()>::new(move || {
            game.borrow().update_status_board(&document);
        });
        window.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            STATUS_INTERVAL_MS as i32,
        )?;
        closure.forget();
        Ok(())
    }

    fn setup_auto_pause(
        window: &web_sys::Window,
        document: &Document,
        game: Rc<RefCell<Game>>,
    ) -> Result<(), JsValue> {
        use tank_arena::sim::GamePhase;

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    g.latch.release_all();
                    if g.state.phase == GamePhase::Playing {
                        g.latch.request_pause();
                        log::info!("Auto-paused (tab hidden)");
                    }
                }
            });
            document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            )?;
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                g.latch.release_all();
                if g.state.phase == GamePhase::Playing {
                    g.latch.request_pause();
                    log::info!("Auto-paused (window blur)");
                }
            });
            window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    /// Offline cache manifest for the service worker shell
    pub fn asset_manifest() -> Result<String, JsValue> {
        AssetManifest::default()
            .to_json()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(js_name = assetManifest)]
pub fn asset_manifest() -> Result<String, JsValue> {
    wasm_game::asset_manifest()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Tank Arena (native) starting...");
    log::info!("Native mode runs the simulation headless - serve the wasm build for the playable version");

    let config = match std::env::args().nth(1) {
        Some(path) => match tank_arena::GameConfig::from_path(&path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path);
                config
            }
            Err(e) => {
                log::warn!("Falling back to default config: {}", e);
                tank_arena::GameConfig::default()
            }
        },
        None => tank_arena::GameConfig::default(),
    };

    run_headless(config, 0x7A4E);
}

/// Drive a scripted session for one simulated minute and report along the way
#[cfg(not(target_arch = "wasm32"))]
fn run_headless(config: tank_arena::GameConfig, seed: u64) {
    use tank_arena::consts::SIM_DT;
    use tank_arena::sim::{GameEvent, GameState, SkillKind, TickInput, tick};
    use tank_arena::status::StatusReporter;

    const VIEWPORT_WIDTH: f32 = 1920.0;
    const TICKS: u64 = 60 * 60;

    let mut state = GameState::with_config(seed, config);
    let mut reporter = StatusReporter::default();
    let mut casts = 0usize;

    for step in 0..TICKS {
        // Circle slowly while cycling through the skill keys
        let mut input = TickInput {
            forward: (step / 120) % 2 == 0,
            right: (step / 180) % 2 == 1,
            rotate_left: step % 600 < 30,
            ..TickInput::default()
        };
        let slot = (step / 90) as usize % SkillKind::COUNT;
        input.casting[slot] = true;

        tick(&mut state, &input, SIM_DT);

        for event in state.drain_events() {
            if matches!(event, GameEvent::SkillCast { .. }) {
                casts += 1;
            }
        }

        if let Some(snapshot) = reporter.poll(state.clock_ms, &state, VIEWPORT_WIDTH) {
            log::info!("{}", snapshot.lines().join(" | "));
        }

        if state.phase.is_over() {
            break;
        }
    }

    log::info!(
        "Session ended: {:?} after {} ticks, {} kills, {} casts, health {}",
        state.phase,
        state.time_ticks,
        state.player.kills,
        casts,
        state.player.health
    );
}
