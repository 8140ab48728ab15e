//! Coin Dash entry point
//!
//! Browser glue: canvas setup, the requestAnimationFrame loop, the key-state
//! map, and best-score persistence. The simulation itself lives in `sim`.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent};

    use coin_dash::render;
    use coin_dash::sim::{GamePhase, GameSession, TickInput, WorldBounds, tick};
    use coin_dash::{BestScore, Settings};

    /// Game instance holding all state
    struct Game {
        session: GameSession,
        ctx: CanvasRenderingContext2d,
        input: TickInput,
        best: BestScore,
        settings: Settings,
        /// Previous frame's phase, for edge-triggered persistence
        last_phase: GamePhase,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(session: GameSession, ctx: CanvasRenderingContext2d) -> Self {
            let last_phase = session.phase;
            let mut game = Self {
                session,
                ctx,
                input: TickInput::default(),
                best: BestScore::load(),
                settings: Settings::load(),
                last_phase,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            };
            // Seed the HUD's best-score line from the stored record
            game.session.best_score = game.best.score;
            game
        }

        /// One tick per rendered frame; one-shot inputs are consumed here.
        fn update(&mut self, time: f64) {
            tick(&mut self.session, &self.input);
            self.input.jump = false;

            // Persist the best score on the Running → Dead edge
            let phase = self.session.phase;
            if phase != self.last_phase {
                if phase == GamePhase::Dead && self.best.record(self.session.score) {
                    self.best.save();
                }
                self.last_phase = phase;
            }

            // FPS over a 60-frame window
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;
            let oldest = self.frame_times[self.frame_index];
            if oldest > 0.0 {
                let elapsed = time - oldest;
                if elapsed > 0.0 {
                    self.fps = (60_000.0 / elapsed).round() as u32;
                }
            }
        }

        fn render(&self) {
            render::draw(&self.ctx, &self.session, self.fps, &self.settings);
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Coin Dash starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let width = canvas.client_width().max(1) as u32;
        let height = canvas.client_height().max(1) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .expect("2d context unavailable")
            .expect("2d context unavailable")
            .dyn_into()
            .expect("not a 2d context");

        let seed = js_sys::Date::now() as u64;
        let bounds = WorldBounds::new(width as f32, height as f32);
        let session = match GameSession::new(seed, bounds) {
            Ok(session) => session,
            Err(e) => {
                log::error!("cannot start: {e}");
                return;
            }
        };
        log::info!("Game initialized with seed: {seed}");

        let game = Rc::new(RefCell::new(Game::new(session, ctx)));

        setup_input_handlers(game.clone());
        setup_auto_pause(game.clone());
        request_animation_frame(game);

        log::info!("Coin Dash running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        // Keydown: arrows/WASD move, ArrowUp/Space/W jump (edge-triggered),
        // Escape toggles pause, Enter restarts after death
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" | "a" | "A" => g.input.left = true,
                    "ArrowRight" | "d" | "D" => g.input.right = true,
                    "ArrowUp" | " " | "w" | "W" => {
                        event.prevent_default();
                        if !event.repeat() {
                            g.input.jump = true;
                        }
                    }
                    "Escape" => g.session.toggle_pause(),
                    "Enter" => {
                        let seed = js_sys::Date::now() as u64;
                        if g.session.restart(seed) {
                            g.input = TickInput::default();
                        }
                    }
                    "h" | "H" => {
                        g.settings.show_hitboxes = !g.settings.show_hitboxes;
                        g.settings.save();
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyup releases held directions
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" | "a" | "A" => g.input.left = false,
                    "ArrowRight" | "d" | "D" => g.input.right = false,
                    _ => {}
                }
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    g.session.pause();
                    g.input = TickInput::default();
                    log::info!("Auto-paused (tab hidden)");
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
                g.session.pause();
                g.input = TickInput::default();
                log::info!("Auto-paused (window blur)");
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
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
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Coin Dash (native) starting...");
    log::info!("The browser build is the playable one - serve the wasm bundle instead");

    smoke_run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn smoke_run() {
    use coin_dash::sim::{GameSession, TickInput, WorldBounds, tick};

    let mut session =
        GameSession::new(42, WorldBounds::new(800.0, 600.0)).expect("bounds are valid");
    let input = TickInput {
        right: true,
        ..Default::default()
    };
    for _ in 0..600 {
        tick(&mut session, &input);
    }
    println!(
        "600 ticks: level {}, score {}, {} coins left",
        session.level,
        session.score,
        session.coins.len()
    );
}
