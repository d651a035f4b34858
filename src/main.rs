//! Geo Catch entry point
//!
//! Browser: DOM HUD, keyboard and on-screen controls, interval timers, and the
//! map-view hand-off. Native: a headless autopilot round for smoke testing.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, KeyboardEvent, Window};

    use geo_catch::Settings;
    use geo_catch::highscores::format_date;
    use geo_catch::hud::HudView;
    use geo_catch::session::Session;
    use geo_catch::sim::{Direction, GameEvent, HeldKeys, RoundPhase, TickOutcome, TickTimer};

    // Map view hook. The page may define `window.geoCatchMap.update(snapshot)`.
    #[wasm_bindgen(inline_js = "
        export function push_map_snapshot(json) {
            const map = window.geoCatchMap;
            if (map && typeof map.update === 'function') {
                map.update(JSON.parse(json));
            }
        }
    ")]
    extern "C" {
        fn push_map_snapshot(json: &str);
    }

    /// A `setInterval` registration, cleared when dropped
    struct IntervalGuard {
        handle: i32,
        _closure: Closure<dyn FnMut()>,
    }

    impl IntervalGuard {
        fn new(period_ms: u32, callback: impl FnMut() + 'static) -> Option<Self> {
            let window = web_sys::window()?;
            let closure = Closure::<dyn FnMut()>::new(callback);
            let handle = window
                .set_interval_with_callback_and_timeout_and_arguments_0(
                    closure.as_ref().unchecked_ref(),
                    period_ms as i32,
                )
                .ok()?;
            Some(Self {
                handle,
                _closure: closure,
            })
        }

        /// Stop firing without dropping the closure (safe from inside the callback)
        fn stop(&self) {
            if let Some(window) = web_sys::window() {
                window.clear_interval_with_handle(self.handle);
            }
        }
    }

    impl Drop for IntervalGuard {
        fn drop(&mut self) {
            self.stop();
        }
    }

    struct Game {
        session: Session,
        held: HeldKeys,
        clock_interval: Option<IntervalGuard>,
        move_interval: Option<IntervalGuard>,
    }

    fn now() -> f64 {
        js_sys::Date::now()
    }

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    /// Read the optional `<script id="game-config" type="application/json">` block
    fn load_settings(document: &Document) -> Settings {
        document
            .get_element_by_id("game-config")
            .and_then(|el| el.text_content())
            .and_then(|json| Settings::from_json(&json))
            .unwrap_or_default()
    }

    fn set_text(document: &Document, selector: &str, text: &str) {
        if let Some(el) = document.query_selector(selector).ok().flatten() {
            el.set_text_content(Some(text));
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    impl Game {
        /// Start (or restart) a round. The previous clock interval is dropped,
        /// and thereby cleared, before the new round's state exists.
        fn start(game: &Rc<RefCell<Game>>) {
            let seed = now() as u64;
            let timer = {
                let mut g = game.borrow_mut();
                g.clock_interval = None;
                g.move_interval = None;
                g.held.clear();
                g.session.start(seed, now())
            };
            log::info!("Round started with seed: {}", seed);

            if let Some(timer) = timer {
                let guard = start_clock(game.clone(), timer);
                game.borrow_mut().clock_interval = guard;
            }
            game.borrow().refresh();
        }

        fn handle_events(&mut self, events: &[GameEvent]) {
            for event in events {
                match event {
                    GameEvent::RoundOver { score } => {
                        log::info!("Round over with score {}", score);
                        self.move_interval = None;
                        self.held.clear();
                    }
                    GameEvent::CaptureBlocked { id } => {
                        log::debug!("Creature {} needs more energy", id);
                    }
                    _ => {}
                }
            }
        }

        /// Redraw HUD, map and overlays from the current state
        fn refresh(&self) {
            let Some(document) = document() else {
                return;
            };
            let phase = self.session.phase();

            set_visible(&document, "welcome", phase == RoundPhase::Idle);
            set_visible(&document, "hud", phase == RoundPhase::Running);
            set_visible(&document, "game-over", phase == RoundPhase::Over);

            let hud = HudView::from_state(&self.session.state);
            set_text(&document, "#hud-time .hud-value", &hud.time);
            set_text(&document, "#hud-score .hud-value", &hud.score.to_string());
            let rank = match self.session.projected_rank() {
                Some(r) => format!("#{}", r),
                None => "-".to_string(),
            };
            set_text(&document, "#hud-rank .hud-value", &rank);
            if let Some(bar) = document.query_selector("#hud-energy .bar").ok().flatten() {
                let _ = bar.set_attribute(
                    "class",
                    &format!("bar energy-{}", hud.energy_band.as_str()),
                );
                let _ = bar.set_attribute("style", &format!("width: {}%", hud.energy_percent));
            }

            if phase == RoundPhase::Running {
                if let Ok(json) = serde_json::to_string(&self.session.snapshot()) {
                    push_map_snapshot(&json);
                }
            }

            if phase == RoundPhase::Over {
                set_text(&document, "#final-score", &self.session.state.score.to_string());
                set_text(&document, "#best-score", &self.session.best_score().to_string());
                self.render_high_scores(&document);
            }
        }

        fn render_high_scores(&self, document: &Document) {
            let Some(list) = document.get_element_by_id("high-scores") else {
                return;
            };
            let now = now();
            let rows: String = self
                .session
                .high_scores
                .entries
                .iter()
                .enumerate()
                .map(|(i, e)| {
                    let mine = self.session.last_rank == Some(i + 1);
                    format!(
                        "<li class=\"{}\"><span>#{}</span><span>{}</span><span>{}</span></li>",
                        if mine { "mine" } else { "" },
                        i + 1,
                        e.score,
                        format_date(e.timestamp, now)
                    )
                })
                .collect();
            list.set_inner_html(&rows);
        }
    }

    /// One-second countdown interval bound to `timer`
    fn start_clock(game: Rc<RefCell<Game>>, timer: TickTimer) -> Option<IntervalGuard> {
        let period = geo_catch::consts::CLOCK_PERIOD_MS;
        IntervalGuard::new(period, move || {
            let Ok(mut g) = game.try_borrow_mut() else {
                return;
            };
            let (outcome, events) = g.session.clock_tick(timer, now());
            g.handle_events(&events);
            if outcome == TickOutcome::Expired {
                // Can't drop the guard from inside its own callback
                if let Some(guard) = &g.clock_interval {
                    guard.stop();
                }
            }
            g.refresh();
        })
    }

    /// Repeat held directions every `move_repeat_ms`
    fn start_move_repeat(game: Rc<RefCell<Game>>) -> Option<IntervalGuard> {
        let period = game.borrow().session.state.settings.move_repeat_ms;
        IntervalGuard::new(period, move || {
            let Ok(mut g) = game.try_borrow_mut() else {
                return;
            };
            for dir in g.held.directions() {
                let events = g.session.move_player(dir, now());
                g.handle_events(&events);
            }
            g.refresh();
        })
    }

    fn press(game: &Rc<RefCell<Game>>, key: &str) {
        let first = {
            let mut g = game.borrow_mut();
            if g.session.phase() != RoundPhase::Running {
                return;
            }
            g.held.press(key)
        };
        if first {
            let guard = start_move_repeat(game.clone());
            game.borrow_mut().move_interval = guard;
        }
    }

    fn release(game: &Rc<RefCell<Game>>, key: &str) {
        let mut g = game.borrow_mut();
        if g.held.release(key) {
            g.move_interval = None;
        }
    }

    fn setup_keyboard(window: &Window, game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = event.key();
                if Direction::from_key(&key).is_some() {
                    event.prevent_default();
                    press(&game, &key);
                    return;
                }
                match key.as_str() {
                    "Enter" => {
                        if game.borrow().session.phase() != RoundPhase::Running {
                            Game::start(&game);
                        }
                    }
                    "i" | "I" => {
                        let mut g = game.borrow_mut();
                        g.session.autopilot = !g.session.autopilot;
                        log::info!("Autopilot: {}", g.session.autopilot);
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = event.key();
                if Direction::from_key(&key).is_some() {
                    release(&game, &key);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// On-screen buttons: `<button data-dir="up">` etc. Press/hold behaves like a key.
    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        for dir in Direction::ALL {
            let selector = format!("[data-dir=\"{}\"]", dir.as_str());
            let Some(btn) = document.query_selector(&selector).ok().flatten() else {
                continue;
            };
            for name in ["mousedown", "touchstart"] {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                    press(&game, dir.button_key());
                });
                let _ = btn.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
                closure.forget();
            }
            for name in ["mouseup", "mouseleave", "touchend"] {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                    release(&game, dir.button_key());
                });
                let _ = btn.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }

        for id in ["start-btn", "restart-btn"] {
            if let Some(btn) = document.get_element_by_id(id) {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                    Game::start(&game);
                });
                let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Geo Catch starting...");

        let Some(window) = web_sys::window() else {
            log::error!("No window");
            return;
        };
        let Some(document) = window.document() else {
            log::error!("No document");
            return;
        };

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let settings = load_settings(&document);
        log::info!("Settings: {}", settings.to_json());

        let game = Rc::new(RefCell::new(Game {
            session: Session::new(settings),
            held: HeldKeys::default(),
            clock_interval: None,
            move_interval: None,
        }));

        setup_keyboard(&window, game.clone());
        setup_buttons(&document, game.clone());
        game.borrow().refresh();

        log::info!("Geo Catch ready");
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use geo_catch::Settings;
    use geo_catch::hud::HudView;
    use geo_catch::session::Session;
    use geo_catch::sim::{RoundPhase, TickInput};
    use std::time::{SystemTime, UNIX_EPOCH};

    env_logger::init();
    log::info!("Geo Catch (native) starting...");
    log::info!("Browser build: run with `trunk serve` for the playable version");

    let now_ms = || {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64() * 1000.0)
            .unwrap_or(0.0)
    };

    // Headless demo: autopilot plays two rounds at 10 moves per second
    let mut session = Session::new(Settings::default());
    session.autopilot = true;
    let repeat = f64::from(session.state.settings.move_repeat_ms) / 1000.0;

    for round in 0..2u64 {
        let seed = now_ms() as u64 + round;
        session.start(seed, now_ms());
        while session.phase() == RoundPhase::Running {
            session.update(&TickInput::default(), repeat, now_ms());
        }

        let hud = HudView::from_state(&session.state);
        println!(
            "Round {} (seed {}): score {}, energy {} [{}], caught {}/{}, stops {}/{}",
            round + 1,
            seed,
            hud.score,
            hud.energy,
            hud.energy_band.as_str(),
            session.state.caught_count(),
            session.state.creatures.len(),
            session.state.activated_count(),
            session.state.stops.len(),
        );
        match session.last_rank {
            Some(rank) => println!("  Leaderboard rank #{}", rank),
            None => println!("  Didn't make the leaderboard"),
        }
    }

    println!("\nBest score: {}", session.best_score());

    println!("\nHigh scores:");
    for (i, entry) in session.high_scores.entries.iter().enumerate() {
        println!(
            "  #{} {:>5}  {}",
            i + 1,
            entry.score,
            geo_catch::highscores::format_date(entry.timestamp, now_ms())
        );
    }
}
