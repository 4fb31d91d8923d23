//! Lane Rush entry point
//!
//! Handles platform-specific initialization and runs the game loop.
//! The same wasm bundle serves both pages: the game canvas and the
//! leaderboard (detected by its `#leaderboardPanel` element).

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlCanvasElement, KeyboardEvent, TouchEvent};

    use lane_rush::audio::{AudioManager, SoundEffect};
    use lane_rush::leaderboard::{SHARE_INTENT_URL, share_text, submission_link};
    use lane_rush::platform::{
        AnimationFrameScheduler, BrowserClock, Clock, InputLatch, LocalStorage, LoopControl,
        Scheduler, TouchSide,
    };
    use lane_rush::renderer::RenderState;
    use lane_rush::sim::{GameEvent, GamePhase, RenderSink, RenderSnapshot};
    use lane_rush::{GameTuning, Session};

    /// Game instance holding all state
    struct Game {
        session: Session,
        input: InputLatch,
        render_state: Option<RenderState>,
        audio: AudioManager,
        /// Active touches by identifier, so a release lands on the side it started on
        touches: HashMap<i32, TouchSide>,
        last_phase: Option<GamePhase>,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            let session = Session::new(seed, GameTuning::default(), Box::new(LocalStorage::new()));
            let audio = AudioManager::new(&session.settings);
            Self {
                session,
                input: InputLatch::new(),
                render_state: None,
                audio,
                touches: HashMap::new(),
                last_phase: None,
            }
        }

        /// Advance, play sounds, draw, refresh the DOM
        fn frame(&mut self, now_ms: f64) {
            let input = self.input.take();
            let frame = self.session.frame(now_ms, &input);

            for event in &frame.events {
                if let Some(effect) = SoundEffect::for_event(event) {
                    self.audio.play(effect);
                }
                if let GameEvent::Crashed { score, new_best } = event {
                    log::info!("Crashed with score {} (new best: {})", score, new_best);
                }
            }

            if let Some(render_state) = self.render_state.as_mut() {
                render_state.present(&frame.snapshot);
            }

            self.update_hud(&frame.snapshot);
            self.last_phase = Some(frame.snapshot.phase);
        }

        /// Update HUD elements in DOM
        fn update_hud(&self, snapshot: &RenderSnapshot) {
            let Some(document) = document() else { return };

            set_text(&document, "score", &snapshot.score.to_string());
            set_text(&document, "best", &snapshot.best.to_string());

            let show_fps = self.session.settings.show_fps;
            if let Some(el) = document.get_element_by_id("fps") {
                set_hidden(&el, !show_fps);
                if show_fps {
                    el.set_text_content(Some(&format!("{} fps", self.session.fps())));
                }
            }

            toggle(&document, "boost-indicator", !snapshot.boosting);

            // Overlays only change on phase transitions
            if self.last_phase == Some(snapshot.phase) {
                return;
            }

            if self.last_phase.is_none() {
                if let Some(callout) = self.session.tuning.boost_callout() {
                    set_text(&document, "boost-indicator", &callout);
                }
            }
            toggle(&document, "start-prompt", snapshot.phase != GamePhase::Idle);
            toggle(&document, "pause-overlay", snapshot.phase != GamePhase::Paused);
            toggle(&document, "game-over", snapshot.phase != GamePhase::Over);

            if snapshot.phase == GamePhase::Over {
                let final_score = self.session.last_final_score().unwrap_or(snapshot.score);
                set_text(&document, "final-score", &final_score.to_string());
                set_text(&document, "final-best", &snapshot.best.to_string());
            }
        }

        fn touch_side(canvas: &HtmlCanvasElement, client_x: i32) -> TouchSide {
            let rect = canvas.get_bounding_client_rect();
            let width = rect.width().max(1.0);
            TouchSide::from_fraction(((client_x as f64 - rect.left()) / width) as f32)
        }
    }

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_hidden(el: &Element, hidden: bool) {
        let _ = el.class_list().toggle_with_force("hidden", hidden);
    }

    fn toggle(document: &Document, id: &str, hidden: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            set_hidden(&el, hidden);
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Failed to init logger: {}", e).into());
        }

        let Some(document) = document() else {
            log::error!("No document; nothing to run");
            return;
        };

        if document.get_element_by_id("leaderboardPanel").is_some() {
            leaderboard_page::run(&document);
        } else {
            run_game(&document).await;
        }
    }

    async fn run_game(document: &Document) {
        log::info!("Lane Rush starting...");

        // Hide loading indicator
        toggle(document, "loading", true);

        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No #canvas element");
            return;
        };

        let clock = BrowserClock::new();
        let boot_ms = clock.now_ms();

        // Initialize game
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed)));
        log::info!("Game initialized with seed: {}", seed);

        let tuning = game.borrow().session.tuning.clone();
        match init_renderer(&canvas, tuning).await {
            Ok(render_state) => {
                game.borrow_mut().render_state = Some(render_state);
                log::info!("Renderer ready in {:.0} ms", clock.now_ms() - boot_ms);
            }
            Err(e) => log::error!("Rendering disabled: {}", e),
        }

        setup_input_handlers(&canvas, game.clone());
        setup_buttons(document, game.clone());
        setup_auto_pause(document, game.clone());

        // Start game loop
        let driver = game.clone();
        AnimationFrameScheduler.run(move |now| {
            driver.borrow_mut().frame(now);
            LoopControl::Continue
        });

        log::info!("Lane Rush running!");
    }

    async fn init_renderer(canvas: &HtmlCanvasElement, tuning: GameTuning) -> Result<RenderState, String> {
        let window = web_sys::window().ok_or("no window")?;

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let width = ((canvas.client_width() as f64 * dpr) as u32).max(1);
        let height = ((canvas.client_height() as f64 * dpr) as u32).max(1);
        canvas.set_width(width);
        canvas.set_height(height);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| format!("failed to create surface: {}", e))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| format!("no adapter: {}", e))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        RenderState::new(surface, &adapter, width, height, tuning)
            .await
            .map_err(|e| e.to_string())
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };

        // Keyboard down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                if g.input.key_down(&event.key(), event.repeat()) {
                    event.prevent_default();
                    // First gesture unlocks audio
                    g.audio.resume();
                }
            });
            let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard up
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if game.borrow_mut().input.key_up(&event.key()) {
                    event.prevent_default();
                }
            });
            let _ = window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start - left/right half steers
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                g.audio.resume();
                let touches = event.changed_touches();
                for i in 0..touches.length() {
                    let Some(touch) = touches.get(i) else { continue };
                    let side = Game::touch_side(&canvas_clone, touch.client_x());
                    g.touches.insert(touch.identifier(), side);
                    g.input.touch_start(side);
                }
            });
            let _ = canvas.add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end / cancel
        for name in ["touchend", "touchcancel"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                let touches = event.changed_touches();
                for i in 0..touches.length() {
                    let Some(touch) = touches.get(i) else { continue };
                    if let Some(side) = g.touches.remove(&touch.identifier()) {
                        g.input.touch_end(side);
                    }
                }
            });
            let _ = canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().input.request_restart();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("resume-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut g = game.borrow_mut();
                if g.session.phase() == GamePhase::Paused {
                    g.input.request_pause();
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Leaderboard - hand the final score over in the query string
        if let Some(btn) = document.get_element_by_id("leaderboard-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let url = submission_link(game.borrow().session.last_final_score());
                if let Some(window) = web_sys::window() {
                    if let Err(e) = window.location().set_href(&url) {
                        log::warn!("Navigation failed: {:?}", e);
                    }
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Share - post composer in a new tab
        if let Some(btn) = document.get_element_by_id("share-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let score = game.borrow().session.last_final_score().unwrap_or(0);
                let text = String::from(js_sys::encode_uri_component(&share_text(score)));
                let url = format!("{}{}", SHARE_INTENT_URL, text);
                if let Some(window) = web_sys::window() {
                    if let Err(e) = window.open_with_url_and_target_and_features(&url, "_blank", "noopener") {
                        log::warn!("Share window failed: {:?}", e);
                    }
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(document: &Document, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut g = game.borrow_mut();
                if document_clone.visibility_state() == web_sys::VisibilityState::Visible {
                    g.session.resync_clock();
                } else {
                    g.input.release_all();
                    g.touches.clear();
                    if g.session.settings.auto_pause {
                        g.session.request_pause();
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
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                g.input.release_all();
                g.touches.clear();
                g.audio.set_blurred(true);
                if g.session.settings.auto_pause {
                    g.session.request_pause();
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window focus
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().audio.set_blurred(false);
            });
            let _ = window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    mod leaderboard_page {
        use std::cell::RefCell;
        use std::rc::Rc;
        use wasm_bindgen::prelude::*;
        use web_sys::{Document, HtmlInputElement};

        use super::{set_text, toggle};
        use lane_rush::leaderboard::{
            DAY_LIMIT, HOUR_LIMIT, Leaderboard, LeaderboardEntry, escape_html,
            parse_submitted_score,
        };
        use lane_rush::platform::LocalStorage;

        struct Page {
            board: Leaderboard,
            store: LocalStorage,
            pending_score: Option<u64>,
        }

        pub fn run(document: &Document) {
            log::info!("Leaderboard page");

            let pending_score = submitted_score();
            let store = LocalStorage::new();
            let board = Leaderboard::load(&store);
            let page = Rc::new(RefCell::new(Page {
                board,
                store,
                pending_score,
            }));

            match pending_score {
                Some(score) => {
                    set_text(document, "newScoreValue", &score.to_string());
                    toggle(document, "scoreForm", false);
                }
                None => toggle(document, "scoreForm", true),
            }

            render_tables(document, &page.borrow().board);
            setup_form(document, page);
        }

        /// `newScore` from the query string, if present and valid
        fn submitted_score() -> Option<u64> {
            let search = web_sys::window()?.location().search().ok()?;
            let params = web_sys::UrlSearchParams::new_with_str(&search).ok()?;
            let raw = params.get("newScore")?;
            let score = parse_submitted_score(&raw);
            if score.is_none() {
                log::warn!("Ignoring invalid submitted score {:?}", raw);
            }
            score
        }

        fn setup_form(document: &Document, page: Rc<RefCell<Page>>) {
            let Some(form) = document.get_element_by_id("scoreForm") else { return };

            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                event.prevent_default();
                let mut p = page.borrow_mut();
                let Some(score) = p.pending_score.take() else { return };

                let name = document_clone
                    .get_element_by_id("playerName")
                    .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
                    .map(|input| input.value())
                    .unwrap_or_default();

                let Page { board, store, .. } = &mut *p;
                if let Err(e) = board.append(store, &name, score, js_sys::Date::now()) {
                    log::error!("Failed to save leaderboard entry: {}", e);
                    if let Some(window) = web_sys::window() {
                        let _ = window.alert_with_message("Could not save your score on this device.");
                    }
                }

                toggle(&document_clone, "scoreForm", true);
                render_tables(&document_clone, board);
            });
            let _ = form.add_event_listener_with_callback("submit", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        fn render_tables(document: &Document, board: &Leaderboard) {
            let views = board.standard_views(js_sys::Date::now());
            fill_table(document, "hourTable", &views.last_hour, HOUR_LIMIT);
            fill_table(document, "dayTable", &views.last_day, DAY_LIMIT);
        }

        fn fill_table(document: &Document, id: &str, entries: &[LeaderboardEntry], limit: usize) {
            let Some(body) = document
                .query_selector(&format!("#{} tbody", id))
                .ok()
                .flatten()
            else {
                return;
            };

            let html = if entries.is_empty() {
                "<tr><td colspan=\"3\">No scores yet</td></tr>".to_string()
            } else {
                entries
                    .iter()
                    .take(limit)
                    .enumerate()
                    .map(|(i, e)| {
                        format!(
                            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
                            i + 1,
                            escape_html(&e.name),
                            e.score
                        )
                    })
                    .collect()
            };
            body.set_inner_html(&html);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::cell::RefCell;
    use std::rc::Rc;

    use lane_rush::consts::FRAME_MS;
    use lane_rush::platform::{Clock, HeadlessScheduler, LoopControl, MemoryStore, Scheduler, SystemClock};
    use lane_rush::sim::{GameEvent, GamePhase, LatestSnapshot, RenderSink, RenderSnapshot, TickInput};
    use lane_rush::{GameTuning, Session};

    /// Cap on a single demo run (about ten minutes of play)
    const MAX_FRAMES: u64 = 60 * 60 * 10;
    /// How far ahead of the car the autopilot looks
    const LOOKAHEAD: f32 = 260.0;

    /// Steer away from the nearest car ahead that shares our column
    pub fn autopilot(snapshot: &RenderSnapshot, tuning: &GameTuning) -> TickInput {
        let player = snapshot.player;
        let threat = snapshot
            .obstacles
            .iter()
            .filter(|o| {
                let b = o.bounds;
                let ahead = b.max().y > player.min.y - LOOKAHEAD && b.min.y < player.max().y;
                let margin = tuning.car_width * 0.5;
                let shares_column =
                    b.min.x < player.max().x + margin && b.max().x > player.min.x - margin;
                ahead && shares_column
            })
            .max_by(|a, b| a.bounds.min.y.total_cmp(&b.bounds.min.y));

        let mut input = TickInput {
            restart: snapshot.phase == GamePhase::Over,
            ..Default::default()
        };
        match threat {
            Some(o) => {
                let room_left = o.bounds.min.x - tuning.lane_min_x;
                let room_right = tuning.lane_max_x - o.bounds.max().x;
                if room_left > room_right {
                    input.steer_left = true;
                } else {
                    input.steer_right = true;
                }
            }
            // Nothing ahead: boost for double points, nudging to start a run
            None => {
                input.boost = true;
                input.steer_right = snapshot.phase == GamePhase::Idle;
            }
        }
        input
    }

    pub fn run(seed: u64, tuning: GameTuning) {
        log::info!("Headless run (seed {})", seed);
        let wall = SystemClock::default();

        let session = Rc::new(RefCell::new(Session::new(
            seed,
            tuning,
            Box::new(MemoryStore::new()),
        )));
        let sink = Rc::new(RefCell::new(LatestSnapshot::default()));

        let driver = session.clone();
        let presenter = sink.clone();
        let mut input = TickInput::default();
        HeadlessScheduler::new(FRAME_MS, MAX_FRAMES).run(move |now| {
            let mut s = driver.borrow_mut();
            let frame = s.frame(now, &input);
            presenter.borrow_mut().present(&frame.snapshot);

            for event in &frame.events {
                match event {
                    GameEvent::Crashed { score, new_best } => {
                        log::info!("Crashed at {:.1}s: score {} (new best: {})", now / 1000.0, score, new_best);
                        return LoopControl::Stop;
                    }
                    GameEvent::Spawned { id, fast: true } => log::debug!("Fast car #{}", id),
                    _ => {}
                }
            }

            input = autopilot(&frame.snapshot, &s.tuning);
            LoopControl::Continue
        });

        let s = session.borrow();
        let frames = sink.borrow().frames;
        log::info!(
            "Finished after {} frames ({:.0} ms wall) in phase {}: score {}, best {}",
            frames,
            wall.now_ms(),
            s.phase().as_str(),
            s.world.score.current,
            s.world.score.best
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Lane Rush (native) starting...");
    log::info!("Native mode runs a headless autopilot demo - run with `trunk serve` for web version");

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0x1a2e_5eed);
    let tuning = match args.next() {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(json) => lane_rush::GameTuning::from_json(&json),
            Err(e) => {
                log::warn!("Cannot read tuning file {}: {}", path, e);
                lane_rush::GameTuning::default()
            }
        },
        None => lane_rush::GameTuning::default(),
    };

    headless::run(seed, tuning);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
