//! Retro Arcade entry point
//!
//! On the web, drives one game on a `<canvas id="canvas">` (the game is
//! picked by the canvas `data-game` attribute). Natively, plays a headless
//! demo game with scripted input and logs the result.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent};

    use retro_arcade::highscores::{Leaderboard, LocalLeaderboard};
    use retro_arcade::persistence::{MemorySaveStore, SaveSlot};
    use retro_arcade::platform::keys::should_prevent_default;
    use retro_arcade::platform::KeyEvent;
    use retro_arcade::renderer::{Frame, css_color};
    use retro_arcade::sim::{GameKind, GamePhase};
    use retro_arcade::{GameSession, PlayerId, Settings};

    /// Game state for the render loop
    struct Game {
        session: GameSession,
        ctx: CanvasRenderingContext2d,
        owner: PlayerId,
        saves: MemorySaveStore,
        scores: LocalLeaderboard,
        last_time: f64,
    }

    impl Game {
        fn update(&mut self, elapsed_ms: f64) {
            let report = self.session.frame(elapsed_ms);
            if report.terminal {
                match self.session.submit_score(&mut self.scores, &self.owner) {
                    Ok(Some(sub)) if sub.improved => {
                        log::info!("New best! Rank {:?}", sub.rank);
                    }
                    Ok(_) => {}
                    Err(e) => log::warn!("Score not recorded: {}", e),
                }
                if let Ok(top) = self.scores.fetch_top(self.session.kind(), 10) {
                    for (i, entry) in top.iter().enumerate() {
                        log::info!("{:2}. {} {}", i + 1, entry.name, entry.score);
                    }
                }
            }
        }

        fn render(&self) {
            paint(&self.ctx, &self.session.project());
        }

        /// Session controls outside the game's own key map
        fn control(&mut self, key: &str) -> bool {
            match key {
                "p" | "P" => {
                    if self.session.scheduler().is_running() {
                        self.session.stop();
                    } else {
                        self.session.start();
                    }
                }
                "r" | "R" => self.session.reset(),
                "k" | "K" => self.quick_save(),
                "l" | "L" => self.quick_load(),
                _ => return false,
            }
            true
        }

        fn quick_save(&mut self) {
            let Ok(slot) = SaveSlot::new(1) else { return };
            if let Err(e) = self.session.save_to(&mut self.saves, &self.owner, slot, None) {
                log::warn!("Save failed: {}", e);
            }
        }

        fn quick_load(&mut self) {
            let Ok(slot) = SaveSlot::new(1) else { return };
            if let Err(e) = self.session.load_from(&self.saves, &self.owner, slot) {
                log::warn!("Load failed: {}", e);
            }
        }
    }

    fn paint(ctx: &CanvasRenderingContext2d, frame: &Frame) {
        for rect in &frame.rects {
            ctx.set_fill_style_str(&css_color(rect.color));
            ctx.fill_rect(
                f64::from(rect.position[0]),
                f64::from(rect.position[1]),
                f64::from(rect.size[0]),
                f64::from(rect.size[1]),
            );
        }
        for label in &frame.texts {
            ctx.set_fill_style_str(&css_color(label.color));
            ctx.set_font(&format!("{}px monospace", label.size));
            ctx.set_text_align(label.align.as_str());
            let _ = ctx.fill_text(&label.text, f64::from(label.x), f64::from(label.y));
        }
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"logger already initialized".into());
        }

        log::info!("Retro Arcade starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        let kind = canvas
            .get_attribute("data-game")
            .and_then(|id| id.parse::<GameKind>().ok())
            .unwrap_or(GameKind::Snake);
        let (width, height) = kind.canvas_size();
        canvas.set_width(width);
        canvas.set_height(height);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or("no 2d context")?
            .dyn_into()?;

        let settings = Settings::load();
        let owner = PlayerId::or_anonymous(canvas.get_attribute("data-owner").as_deref());
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game {
            session: GameSession::new(kind, seed, &settings),
            ctx,
            saves: MemorySaveStore::persistent(&owner),
            scores: LocalLeaderboard::load(),
            owner,
            last_time: 0.0,
        }));

        log::info!("{} initialized with seed: {}", kind.title(), seed);

        setup_input_handlers(game.clone())?;

        // Start game loop
        request_animation_frame(game);

        log::info!("Retro Arcade running!");
        Ok(())
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or("no document")?;

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = event.key();
                let mut g = game.borrow_mut();
                let handled = if g.control(&key) {
                    true
                } else {
                    if g.session.phase() == GamePhase::Idle {
                        g.session.start();
                    }
                    g.session.handle_key(&KeyEvent::down(&key))
                };
                if handled || should_prevent_default(&key) {
                    event.prevent_default();
                }
            });
            document.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().session.handle_key(&KeyEvent::up(&event.key()));
            });
            document.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            // Elapsed wall time since the previous frame
            let elapsed = if g.last_time > 0.0 {
                time - g.last_time
            } else {
                0.0
            };
            g.last_time = time;

            g.update(elapsed);
            g.render();
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
    log::info!("Retro Arcade (native) starting...");
    log::info!("Native mode plays a headless demo - build for wasm32 to play in a browser");

    let mut args = std::env::args().skip(1);
    let kind = match args.next().map(|a| a.parse::<retro_arcade::sim::GameKind>()) {
        Some(Ok(kind)) => kind,
        Some(Err(e)) => {
            eprintln!("{e}");
            eprintln!("usage: retro-arcade [snake|pong|tetris] [seed]");
            std::process::exit(2);
        }
        None => retro_arcade::sim::GameKind::Tetris,
    };
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(1);

    demo::play(kind, seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use retro_arcade::highscores::{Leaderboard, LocalLeaderboard};
    use retro_arcade::persistence::{MemorySaveStore, SaveSlot, SaveStore};
    use retro_arcade::platform::{KeyEvent, keys};
    use retro_arcade::sim::GameKind;
    use retro_arcade::{GameSession, PlayerId, Settings};

    /// Ten simulated minutes at 60 FPS
    const MAX_FRAMES: u32 = 60 * 60 * 10;
    const FRAME_MS: f64 = 1000.0 / 60.0;

    /// Keys pressed in rotation, one every `PRESS_EVERY` frames
    const SCRIPT: [&str; 6] = ["ArrowLeft", "ArrowUp", "ArrowRight", "ArrowDown", "a", "Enter"];
    const PRESS_EVERY: u32 = 20;

    pub fn play(kind: GameKind, seed: u64) {
        let settings = Settings::load();
        let owner = PlayerId::anonymous();
        let mut saves = MemorySaveStore::new();
        let mut scores = LocalLeaderboard::load();
        let mut session = GameSession::new(kind, seed, &settings);

        session.start();
        let mut frames = 0;
        let mut ticks = 0;
        let mut held: Option<&str> = None;
        while frames < MAX_FRAMES {
            if frames % PRESS_EVERY == 0 {
                let key = SCRIPT[(frames / PRESS_EVERY) as usize % SCRIPT.len()];
                if let Some(prev) = held.take() {
                    session.handle_key(&KeyEvent::up(prev));
                }
                if keys::map_key(kind, key).is_some() {
                    session.handle_key(&KeyEvent::down(key));
                    held = Some(key);
                }
            }

            let report = session.frame(FRAME_MS);
            frames += 1;
            ticks += report.ticks;
            if report.score_delta > 0 {
                log::debug!("frame {}: +{} (score {})", frames, report.score_delta, session.score());
            }
            if report.terminal {
                break;
            }
        }

        log::info!(
            "{} finished in {:?} after {} frames / {} ticks, score {}",
            kind.title(),
            session.phase(),
            frames,
            ticks,
            session.score()
        );

        match SaveSlot::new(1) {
            Ok(slot) => match session.save_to(&mut saves, &owner, slot, Some("demo")) {
                Ok(()) => {
                    if let Ok(list) = saves.list(&owner, kind) {
                        for info in list {
                            log::info!("slot {}: {} ({} points)", info.slot, info.name, info.score);
                        }
                    }
                }
                Err(e) => log::warn!("Save failed: {}", e),
            },
            Err(e) => log::warn!("{}", e),
        }

        match session.submit_score(&mut scores, &owner) {
            Ok(Some(sub)) => log::info!("Leaderboard: improved={} rank={:?}", sub.improved, sub.rank),
            Ok(None) => log::info!("Game still running, score not submitted"),
            Err(e) => log::warn!("Score not recorded: {}", e),
        }
        if let Ok(top) = scores.fetch_top(kind, 10) {
            for (i, entry) in top.iter().enumerate() {
                println!("{:2}. {:<12} {}", i + 1, entry.name, entry.score);
            }
        }

        println!("{} final score: {}", kind.title(), session.score());
    }
}
