//! Pick & Deliver entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::f64::consts::TAU;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement, KeyboardEvent,
        PointerEvent,
    };

    use pick_deliver::GameConfig;
    use pick_deliver::consts::FRAME_MS;
    use pick_deliver::input::{InputHandler, Joystick, KeyCode};
    use pick_deliver::sim::{FrameDelta, GameEvent, GameState, Tint, autopilot, tick};

    const PLAYER_COLOR: u32 = 0x3498db;
    const ITEM_COLOR: u32 = 0xe67e22;
    const BONUS_COLOR: u32 = 0x1abc9c;
    const NPC_COLOR: u32 = 0x9b59b6;

    /// Joystick base position in world coordinates (bottom-left)
    const JOYSTICK_INSET: f32 = 100.0;

    /// Which screen is showing
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Screen {
        Menu,
        Playing,
    }

    /// Named images; `None` or unloaded images fall back to flat circles
    struct Sprites {
        player: Option<HtmlImageElement>,
        item: Option<HtmlImageElement>,
        npc: Option<HtmlImageElement>,
    }

    impl Sprites {
        fn load() -> Self {
            Self {
                player: load_image("player", "/assets/images/player.png"),
                item: load_image("item", "/assets/images/item.png"),
                npc: load_image("npc", "/assets/images/npc.png"),
            }
        }
    }

    fn load_image(alias: &'static str, src: &str) -> Option<HtmlImageElement> {
        let img = match HtmlImageElement::new() {
            Ok(img) => img,
            Err(e) => {
                log::warn!("Cannot create image for '{}': {:?}", alias, e);
                return None;
            }
        };
        let on_error = Closure::<dyn FnMut()>::new(move || {
            log::warn!("Asset '{}' failed to load, using placeholder", alias);
        });
        img.set_onerror(Some(on_error.as_ref().unchecked_ref()));
        on_error.forget();
        img.set_src(src);
        Some(img)
    }

    fn usable(img: &Option<HtmlImageElement>) -> Option<&HtmlImageElement> {
        img.as_ref()
            .filter(|img| img.complete() && img.natural_width() > 0)
    }

    fn css(rgb: u32) -> String {
        format!("#{:06x}", rgb)
    }

    /// Game instance holding all state
    struct Game {
        config: GameConfig,
        state: GameState,
        input: InputHandler,
        screen: Screen,
        ctx: CanvasRenderingContext2d,
        canvas: HtmlCanvasElement,
        sprites: Sprites,
        last_time: f64,
        /// Menu pulse accumulator
        menu_time: f32,
        /// Autopilot toggle (demo mode)
        idle_mode: bool,
        touch_device: bool,
    }

    impl Game {
        fn new(
            config: GameConfig,
            canvas: HtmlCanvasElement,
            ctx: CanvasRenderingContext2d,
            touch_device: bool,
        ) -> Self {
            let state = GameState::new(config.clone(), js_sys::Date::now() as u64);
            Self {
                config,
                state,
                input: InputHandler::new(),
                screen: Screen::Menu,
                ctx,
                canvas,
                sprites: Sprites::load(),
                last_time: 0.0,
                menu_time: 0.0,
                idle_mode: false,
                touch_device,
            }
        }

        /// Leave the menu and begin a fresh run
        fn start_run(&mut self) {
            let seed = js_sys::Date::now() as u64;
            self.state = GameState::new(self.config.clone(), seed);
            self.input = InputHandler::new();
            if self.touch_device {
                self.input.set_joystick(Joystick::default());
            }
            self.screen = Screen::Playing;
            log::info!("Started run with seed: {}", seed);
        }

        /// Convert client coordinates to world coordinates
        fn to_world(&self, client_x: i32, client_y: i32) -> Vec2 {
            let rect = self.canvas.get_bounding_client_rect();
            let sx = if rect.width() > 0.0 {
                self.config.world_width as f64 / rect.width()
            } else {
                1.0
            };
            let sy = if rect.height() > 0.0 {
                self.config.world_height as f64 / rect.height()
            } else {
                1.0
            };
            Vec2::new(
                ((client_x as f64 - rect.left()) * sx) as f32,
                ((client_y as f64 - rect.top()) * sy) as f32,
            )
        }

        fn joystick_center(&self) -> Vec2 {
            Vec2::new(JOYSTICK_INSET, self.config.world_height - JOYSTICK_INSET)
        }

        fn update(&mut self, dt_ms: f32) {
            match self.screen {
                Screen::Menu => {
                    self.menu_time += dt_ms / FRAME_MS * 0.05;
                }
                Screen::Playing => {
                    let input = if self.idle_mode {
                        autopilot::steer(&self.state)
                    } else {
                        self.input.tick_input()
                    };
                    tick(&mut self.state, &input, FrameDelta::from_ms(dt_ms));

                    if !self.state.hud.joystick_visible {
                        self.input.hide_joystick();
                    }

                    let mut back_to_menu = false;
                    for event in self.state.drain_events() {
                        match event {
                            GameEvent::ReturnToMenu => back_to_menu = true,
                            GameEvent::GameOver { won, score } => {
                                log::info!("Run finished: won={} score={}", won, score);
                            }
                            other => log::debug!("{:?}", other),
                        }
                    }
                    if back_to_menu {
                        self.screen = Screen::Menu;
                    }
                }
            }
        }

        fn render(&self) {
            let ctx = &self.ctx;
            let (w, h) = (
                self.config.world_width as f64,
                self.config.world_height as f64,
            );
            ctx.set_fill_style_str("#222222");
            ctx.fill_rect(0.0, 0.0, w, h);

            match self.screen {
                Screen::Menu => self.render_menu(w, h),
                Screen::Playing => {
                    self.render_world();
                    self.render_hud(w, h);
                }
            }
        }

        fn render_menu(&self, w: f64, h: f64) {
            let ctx = &self.ctx;
            ctx.set_text_align("center");
            ctx.set_fill_style_str("#ffffff");

            ctx.set_font("bold 60px Arial");
            let _ = ctx.fill_text("Pick & Deliver", w / 2.0, h * 0.3);

            ctx.set_font("30px Arial");
            let lines = [
                "Move with arrows, WASD or the stick.".to_string(),
                "Pick up items.".to_string(),
                "Deliver to NPCs.".to_string(),
                format!("{} seconds to win!", self.config.time_limit),
            ];
            for (i, line) in lines.iter().enumerate() {
                let _ = ctx.fill_text(line, w / 2.0, h * 0.45 + i as f64 * 40.0);
            }

            ctx.save();
            let _ = ctx.translate(w / 2.0, h * 0.8);
            let pulse = 1.0 + (self.menu_time.sin() * 0.05) as f64;
            let _ = ctx.scale(pulse, pulse);
            ctx.set_font("bold 40px Arial");
            let _ = ctx.fill_text("Tap to Start", 0.0, 0.0);
            ctx.restore();
        }

        fn circle(&self, pos: Vec2, radius: f32, rgb: u32) {
            let ctx = &self.ctx;
            ctx.begin_path();
            let _ = ctx.arc(pos.x as f64, pos.y as f64, radius as f64, 0.0, TAU);
            ctx.set_fill_style_str(&css(rgb));
            ctx.fill();
        }

        /// Sprite centered at the current origin, or a circle if unavailable
        fn sprite(&self, img: &Option<HtmlImageElement>, radius: f32, base: u32, tint: Tint) {
            let r = radius as f64;
            match usable(img) {
                Some(img) => {
                    let _ = self
                        .ctx
                        .draw_image_with_html_image_element_and_dw_and_dh(img, -r, -r, r * 2.0, r * 2.0);
                    if tint != Tint::None {
                        self.ctx.set_global_alpha(0.35);
                        self.circle(Vec2::ZERO, radius, tint.rgb(base));
                        self.ctx.set_global_alpha(1.0);
                    }
                }
                None => self.circle(Vec2::ZERO, radius, tint.rgb(base)),
            }
        }

        fn render_world(&self) {
            let ctx = &self.ctx;
            let snapshot = self.state.snapshot();

            let clock_ms = self.state.schedule.now_ms();
            for item in snapshot.items {
                ctx.save();
                let _ = ctx.translate(item.pos.x as f64, item.pos.y as f64);
                let s = item.scale(clock_ms) as f64;
                let _ = ctx.scale(s, s);
                self.sprite(&self.sprites.item, item.radius, ITEM_COLOR, Tint::None);
                ctx.restore();
            }

            for bonus in snapshot.bonus_items {
                ctx.save();
                let _ = ctx.translate(bonus.pos.x as f64, bonus.pos.y as f64);
                let s = bonus.scale() as f64;
                let _ = ctx.scale(s, s);
                self.circle(Vec2::ZERO, bonus.radius, BONUS_COLOR);
                ctx.set_fill_style_str("#ffffff");
                ctx.fill_rect(-8.0, -2.0, 16.0, 4.0);
                ctx.fill_rect(-2.0, -8.0, 4.0, 16.0);
                ctx.restore();
            }

            for npc in snapshot.npcs {
                let v = &npc.visual;
                ctx.save();
                let _ = ctx.translate(npc.pos.x as f64, npc.pos.y as f64);

                ctx.save();
                let _ = ctx.rotate(v.rotation as f64);
                self.sprite(&self.sprites.npc, npc.radius, NPC_COLOR, v.tint);
                ctx.restore();

                if v.holding_item {
                    self.sprite(&self.sprites.item, self.config.item_radius * 0.8, ITEM_COLOR, Tint::None);
                }
                if v.heart_visible {
                    ctx.save();
                    let _ = ctx.translate(0.0, -(npc.radius as f64) - 20.0);
                    let _ = ctx.rotate(v.heart_rotation as f64);
                    self.circle(Vec2::ZERO, 10.0, 0xff0000);
                    ctx.restore();

                    // Cooldown fill under the NPC
                    let bar_w = npc.radius as f64 * 2.0;
                    ctx.set_fill_style_str("#2ecc71");
                    ctx.fill_rect(
                        -bar_w / 2.0,
                        npc.radius as f64 + 6.0,
                        bar_w * v.cooldown_fill as f64,
                        5.0,
                    );
                }
                ctx.restore();
            }

            let player = snapshot.player;
            ctx.save();
            let _ = ctx.translate(player.pos.x as f64, player.pos.y as f64);
            self.sprite(&self.sprites.player, player.radius, PLAYER_COLOR, player.tint);
            if let Some(item) = player.carrying() {
                let _ = ctx.translate(0.0, -(player.radius as f64) - 15.0);
                self.sprite(&self.sprites.item, item.radius, ITEM_COLOR, Tint::None);
            }
            ctx.restore();

            if let Some(joystick) = self.input.joystick.as_ref().filter(|j| j.visible) {
                let c = self.joystick_center();
                ctx.set_global_alpha(if joystick.dragging { 0.8 } else { 0.5 });
                self.circle(c, joystick.outer_radius, 0xcccccc);
                ctx.set_global_alpha(0.8);
                self.circle(c + joystick.stick, joystick.inner_radius, 0xffffff);
                ctx.set_global_alpha(1.0);
            }
        }

        fn render_hud(&self, w: f64, h: f64) {
            let ctx = &self.ctx;
            let hud = &self.state.hud;

            ctx.set_fill_style_str("#ffffff");
            ctx.set_font("bold 36px Arial");
            ctx.set_text_align("left");
            let _ = ctx.fill_text(&hud.timer_label(), 20.0, 50.0);
            ctx.set_text_align("right");
            let _ = ctx.fill_text(&format!("Score: {}", hud.score), w - 20.0, 50.0);

            // Timer bar
            let bar_w = w * 0.8;
            let bar_x = (w - bar_w) / 2.0;
            ctx.set_global_alpha(0.5);
            ctx.set_fill_style_str("#333333");
            ctx.fill_rect(bar_x, 70.0, bar_w, 20.0);
            ctx.set_global_alpha(1.0);
            ctx.set_fill_style_str(&css(hud.timer_bar.color.rgb()));
            ctx.fill_rect(bar_x, 70.0, bar_w * hud.timer_bar.ratio as f64, 20.0);

            if let Some(status) = hud.status {
                ctx.set_text_align("center");
                ctx.set_font("bold 60px Arial");
                ctx.set_fill_style_str(&css(status.color));
                let _ = ctx.fill_text(status.text, w / 2.0, h / 2.0);
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Logger init failed: {}", e).into());
        }

        log::info!("Pick & Deliver starting...");

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

        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No #canvas element");
            return;
        };

        let config = GameConfig::load();
        canvas.set_width(config.world_width as u32);
        canvas.set_height(config.world_height as u32);

        let Some(ctx) = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
        else {
            log::error!("2D canvas context unavailable");
            return;
        };

        let touch_device = window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .is_some_and(|w| w < 800.0);

        let game = Rc::new(RefCell::new(Game::new(config, canvas.clone(), ctx, touch_device)));

        setup_input_handlers(&window, &canvas, game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Pick & Deliver running!");
    }

    fn setup_input_handlers(window: &web_sys::Window, canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Key down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                if let Some(key) = KeyCode::from_code(&event.code()) {
                    g.input.key_down(key);
                    return;
                }
                match event.key().as_str() {
                    " " | "Enter" if g.screen == Screen::Menu => g.start_run(),
                    "i" | "I" => {
                        g.idle_mode = !g.idle_mode;
                        log::info!("Idle mode: {}", g.idle_mode);
                    }
                    _ => {}
                }
            });
            let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(key) = KeyCode::from_code(&event.code()) {
                    game.borrow_mut().input.key_up(key);
                }
            });
            let _ = window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window blur - drop held keys
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().input.clear_keys();
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pointer down - start the run from the menu, or grab the joystick
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                if g.screen == Screen::Menu {
                    g.start_run();
                    return;
                }
                let local = g.to_world(event.client_x(), event.client_y()) - g.joystick_center();
                if let Some(joystick) = g.input.joystick.as_mut() {
                    if local.length() <= joystick.outer_radius {
                        joystick.pointer_down(event.pointer_id(), local);
                    }
                }
            });
            let _ = canvas.add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pointer move/up are global so drags can leave the stick
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let mut g = game.borrow_mut();
                let local = g.to_world(event.client_x(), event.client_y()) - g.joystick_center();
                if let Some(joystick) = g.input.joystick.as_mut() {
                    joystick.pointer_move(event.pointer_id(), local);
                }
            });
            let _ = window.add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                if let Some(joystick) = game.borrow_mut().input.joystick.as_mut() {
                    joystick.pointer_up(event.pointer_id());
                }
            });
            let _ = window.add_event_listener_with_callback("pointerup", closure.as_ref().unchecked_ref());
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

            // Calculate delta time
            let dt_ms = if g.last_time > 0.0 {
                (time - g.last_time) as f32
            } else {
                FRAME_MS
            };
            g.last_time = time;

            g.update(dt_ms);
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
    use pick_deliver::GameConfig;
    use pick_deliver::sim::{FrameDelta, GameEvent, GameState, autopilot, tick};

    env_logger::init();
    log::info!("Pick & Deliver (native) starting...");
    log::info!("Native mode runs a headless autopilot session - run with `trunk serve` for web version");

    // Usage: pick-deliver [config.json] [seed]
    let args: Vec<String> = std::env::args().collect();
    let config = GameConfig::load(args.get(1).map(String::as_str));
    let seed = args
        .get(2)
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(12345);

    let mut state = GameState::new(config, seed);
    // Ten minutes of frames is plenty; bonuses can stretch a run past the limit
    let max_frames = 60 * 60 * 10;
    let mut frames = 0;
    while !state.menu_requested && frames < max_frames {
        let input = autopilot::steer(&state);
        tick(&mut state, &input, FrameDelta::one());
        frames += 1;

        for event in state.drain_events() {
            match event {
                GameEvent::Delivered { npc_id, score, .. } => {
                    log::info!("Frame {}: delivered to npc {} (score {})", frames, npc_id, score);
                }
                GameEvent::GameOver { won, score } => {
                    log::info!("Frame {}: game over, won={} score={}", frames, won, score);
                }
                other => log::debug!("Frame {}: {:?}", frames, other),
            }
        }
    }

    match serde_json::to_string_pretty(&state.snapshot()) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Failed to serialize final state: {}", e),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
