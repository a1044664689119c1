//! Notedrop entry point
//!
//! Browser: canvas, Web Audio and pointer input around the fixed-step loop.
//! Native: runs a board headless for a few seconds and prints its share token.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod web_app {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::closure::WasmClosure;
    use wasm_bindgen::prelude::*;
    use web_sys::{EventTarget, KeyboardEvent, MouseEvent, TouchEvent, UrlSearchParams};

    use notedrop::audio::{Sampler, WebAudioSampler};
    use notedrop::consts::{SIM_DT_MS, STATE_QUERY_KEY};
    use notedrop::platform::{Command, Editor, FixedTimestep, PointerEvent};
    use notedrop::renderer::{CanvasRenderer, Renderer, draw_board};
    use notedrop::sim::SimState;
    use notedrop::{NotedropError, Result};

    /// Everything the page keeps alive between frames
    struct App {
        state: SimState,
        renderer: CanvasRenderer,
        sampler: WebAudioSampler,
        clock: FixedTimestep,
        editor: Editor,
        last_time: f64,
        /// An edit was submitted since the URL was last written
        dirty: bool,
    }

    impl App {
        fn frame(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                (time - self.last_time) as f32
            } else {
                SIM_DT_MS
            };
            self.last_time = time;

            self.clock.run(dt, &mut self.state, &mut self.sampler);
            draw_board(&self.state, &mut self.renderer);

            if self.dirty && self.state.pending_edits() == 0 {
                self.dirty = false;
                self.sync_url();
            }
        }

        fn fit_window(&mut self) {
            let Some(window) = web_sys::window() else { return };
            let width = window.inner_width().ok().and_then(|v| v.as_f64());
            let height = window.inner_height().ok().and_then(|v| v.as_f64());
            if let (Some(w), Some(h)) = (width, height) {
                self.renderer.resize(w as u32, h as u32);
                self.state.resize(self.renderer.size());
            }
        }

        fn pointer_down(&mut self, event: PointerEvent) {
            let pos = event.canvas_position(&self.renderer);
            self.editor.pointer_down(&mut self.state, pos);
            self.dirty = true;
        }

        fn pointer_move(&mut self, event: PointerEvent) {
            let pos = event.canvas_position(&self.renderer);
            self.editor.pointer_move(&mut self.state, pos);
        }

        /// Fires for releases anywhere on the page
        fn pointer_up(&mut self, event: PointerEvent) {
            if self.state.current_line.is_some() {
                self.dirty = true;
            }
            let pos = event.canvas_position(&self.renderer);
            self.editor.pointer_up(&mut self.state, pos);
            wasm_bindgen_futures::spawn_local(self.sampler.initialize());
        }

        fn key(&mut self, key: &str) {
            let Some(command) = Command::from_key(key) else { return };
            self.editor.command(&mut self.state, command);
            self.dirty = true;
        }

        /// Keep the share token in the address bar
        fn sync_url(&self) {
            let token = match self.state.share_token() {
                Ok(token) => token,
                Err(e) => {
                    log::warn!("Failed to encode board: {}", e);
                    return;
                }
            };
            let Ok(params) = UrlSearchParams::new() else { return };
            params.set(STATE_QUERY_KEY, &token);
            let url = format!("?{}", String::from(params.to_string()));
            if let Some(history) = web_sys::window().and_then(|w| w.history().ok()) {
                if let Err(e) = history.replace_state_with_url(&JsValue::NULL, "", Some(&url)) {
                    log::warn!("Failed to update URL: {:?}", e);
                }
            }
        }
    }

    fn host_err(e: JsValue) -> NotedropError {
        NotedropError::Host(format!("{:?}", e))
    }

    /// Token from `?state=...`, if any
    fn token_from_query() -> Option<String> {
        let search = web_sys::window()?.location().search().ok()?;
        UrlSearchParams::new_with_str(&search)
            .ok()?
            .get(STATE_QUERY_KEY)
    }

    fn listen<T: ?Sized + WasmClosure>(
        target: &EventTarget,
        name: &str,
        closure: Closure<T>,
    ) -> Result<()> {
        target
            .add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())
            .map_err(host_err)?;
        closure.forget();
        Ok(())
    }

    fn mouse_point(event: &MouseEvent) -> PointerEvent {
        PointerEvent::Mouse {
            client_x: event.client_x() as f32,
            client_y: event.client_y() as f32,
        }
    }

    fn touch_point(event: &TouchEvent) -> Option<PointerEvent> {
        let touch = event.changed_touches().get(0)?;
        Some(PointerEvent::Touch {
            client_x: touch.client_x() as f32,
            client_y: touch.client_y() as f32,
        })
    }

    pub fn run() -> Result<()> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| NotedropError::Host(e.to_string()))?;

        log::info!("Notedrop starting...");

        let window = web_sys::window().ok_or_else(|| NotedropError::Host("no window".into()))?;
        let document = window
            .document()
            .ok_or_else(|| NotedropError::Host("no document".into()))?;
        let renderer = CanvasRenderer::new()?;
        let canvas = renderer.canvas().clone();

        let app = Rc::new(RefCell::new(App {
            state: SimState::new(renderer.size()),
            renderer,
            sampler: WebAudioSampler::new(),
            clock: FixedTimestep::default(),
            editor: Editor::default(),
            last_time: 0.0,
            dirty: false,
        }));

        {
            let mut app = app.borrow_mut();
            app.fit_window();
            let size = app.renderer.size();
            app.state = SimState::new(size);
            if let Some(token) = token_from_query() {
                app.state.load_token(&token);
            }
        }

        setup_pointer_handlers(&canvas, &document, &app)?;
        setup_window_handlers(&window, &app)?;

        request_animation_frame(app);

        log::info!("Notedrop running!");
        Ok(())
    }

    /// Gestures start on the canvas but are followed on the whole document,
    /// so a drag released past the canvas edge still commits its line.
    fn setup_pointer_handlers(
        canvas: &EventTarget,
        document: &EventTarget,
        app: &Rc<RefCell<App>>,
    ) -> Result<()> {
        // Mouse
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                app.borrow_mut().pointer_down(mouse_point(&event));
            });
            listen(canvas, "mousedown", closure)?;
        }
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                app.borrow_mut().pointer_move(mouse_point(&event));
            });
            listen(document, "mousemove", closure)?;
        }
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                app.borrow_mut().pointer_up(mouse_point(&event));
            });
            listen(document, "mouseup", closure)?;
        }

        // Touch
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(point) = touch_point(&event) {
                    app.borrow_mut().pointer_down(point);
                }
            });
            listen(canvas, "touchstart", closure)?;
        }
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                if let Some(point) = touch_point(&event) {
                    app.borrow_mut().pointer_move(point);
                }
            });
            listen(document, "touchmove", closure)?;
        }
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                if let Some(point) = touch_point(&event) {
                    app.borrow_mut().pointer_up(point);
                }
            });
            listen(document, "touchend", closure)?;
        }

        Ok(())
    }

    fn setup_window_handlers(window: &EventTarget, app: &Rc<RefCell<App>>) -> Result<()> {
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                app.borrow_mut().key(&event.key());
            });
            listen(window, "keydown", closure)?;
        }
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                app.borrow_mut().fit_window();
            });
            listen(window, "resize", closure)?;
        }

        // Silence notes while the page is in the background
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                app.borrow_mut().sampler.mute(true);
                log::info!("Muted (window blur)");
            });
            listen(window, "blur", closure)?;
        }
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                app.borrow_mut().sampler.mute(false);
            });
            listen(window, "focus", closure)?;
        }

        Ok(())
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            app.borrow_mut().frame(time);
            request_animation_frame(app);
        });
        if let Err(e) = window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            log::warn!("requestAnimationFrame failed: {:?}", e);
        }
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    web_app::run().map_err(|e| {
        log::error!("Startup failed: {}", e);
        JsValue::from_str(&e.to_string())
    })
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> notedrop::Result<()> {
    use glam::Vec2;
    use notedrop::audio::LogSampler;
    use notedrop::platform::FixedTimestep;
    use notedrop::sim::{Edit, SimState, TickStats};

    /// Simulated wall-clock span
    const RUN_SECONDS: u32 = 10;
    const FRAME_MS: f32 = 1000.0 / 60.0;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Notedrop (native) starting...");

    let mut state = SimState::new(Vec2::new(400.0, 700.0));
    match std::env::args().nth(1) {
        Some(token) => {
            if !state.load_token(&token) {
                log::warn!("Running the default board instead");
            }
        }
        None => {
            // Ramp under the default dropper
            state.submit(Edit::AddLine {
                from: Vec2::new(120.0, 320.0),
                to: Vec2::new(280.0, 360.0),
            });
        }
    }

    let mut sampler = LogSampler::new();
    let mut clock = FixedTimestep::default();
    let mut total = TickStats::default();

    for frame in 1..=RUN_SECONDS * 60 {
        total += clock.run(FRAME_MS, &mut state, &mut sampler);
        if frame % 60 == 0 {
            log::info!(
                "t={}s balls={} spawned={} bounces={} removed={}",
                frame / 60,
                state.board.balls.len(),
                total.spawned,
                total.bounces,
                total.removed
            );
        }
    }

    if let Some((pitch, instrument)) = sampler.last() {
        log::info!(
            "{} notes played, last {} on {}",
            sampler.played(),
            pitch,
            instrument.as_str()
        );
    }

    println!("{}", state.share_token()?);
    Ok(())
}
