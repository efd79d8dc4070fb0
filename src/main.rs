//! New Year Fireworks entry point
//!
//! On wasm32 this drives the page canvas and blessing container; natively it
//! runs a headless show and prints a summary.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_show {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::HtmlCanvasElement;

    use new_year_fireworks::overlay::DomOverlay;
    use new_year_fireworks::renderer::CanvasRaster;
    use new_year_fireworks::sim::{ShowState, tick};

    /// Everything the frame callback needs
    struct Show {
        state: ShowState,
        raster: CanvasRaster,
        overlay: DomOverlay,
    }

    /// Size the canvas backing store to the window
    fn fit_to_window(raster: &CanvasRaster) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let width = window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        let height = window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        raster.resize(width as u32, height as u32);
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("New Year Fireworks starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("fireworksCanvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        let container = document
            .get_element_by_id("blessings-container")
            .expect("no blessings container");

        let raster = CanvasRaster::new(canvas).expect("no 2d context");
        fit_to_window(&raster);

        let seed = js_sys::Date::now() as u64;
        let show = Rc::new(RefCell::new(Show {
            state: ShowState::new(seed),
            raster,
            overlay: DomOverlay::new(container),
        }));
        log::info!("Show initialized with seed: {}", seed);

        setup_resize_handler(show.clone());
        request_animation_frame(show);
    }

    fn setup_resize_handler(show: Rc<RefCell<Show>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let show = show.borrow();
            fit_to_window(&show.raster);
            log::info!("Resized to {:?}", new_year_fireworks::Raster::size(&show.raster));
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(show: Rc<RefCell<Show>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            frame(show, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame(show: Rc<RefCell<Show>>, time: f64) {
        {
            let mut s = show.borrow_mut();
            let Show {
                state,
                raster,
                overlay,
            } = &mut *s;
            tick(state, raster, overlay, time);
        }

        request_animation_frame(show);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_show::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use new_year_fireworks::overlay::LogOverlay;
    use new_year_fireworks::renderer::SoftCanvas;
    use new_year_fireworks::sim::{ShowState, tick};

    const WIDTH: u32 = 800;
    const HEIGHT: u32 = 600;
    const FRAMES: u64 = 1000;
    const FRAME_MS: f64 = 1000.0 / 60.0;

    env_logger::init();
    log::info!("New Year Fireworks (native) starting...");
    log::info!("Native mode renders headless - run with `trunk serve` for the web version");

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(2025);

    let mut state = ShowState::new(seed);
    let mut canvas = SoftCanvas::new(WIDTH, HEIGHT);
    let mut overlay = LogOverlay::new();

    for frame in 1..=FRAMES {
        tick(&mut state, &mut canvas, &mut overlay, frame as f64 * FRAME_MS);
    }

    log::info!(
        "Finished {} frames in phase {:?}: {} rockets, {} sparks, {} glyphs live",
        state.time_ticks,
        state.phase(),
        state.rockets.len(),
        state.sparks.len(),
        state.glyphs.len()
    );

    match serde_json::to_string_pretty(&state.stats) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Could not serialize stats: {}", e),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
