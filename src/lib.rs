use wasm_bindgen::prelude::*;

mod bird;
mod error;
mod geometry;
mod render;
mod scheduler;
mod surface;

pub use bird::{AnimatedBird, BirdConfig, Color, MAX_UPDATE_RATE};
pub use error::{BirdError, Result};
pub use geometry::{make_body, make_wing, Body, Point, Side, Wing};
pub use render::{start as start_render_loop, RenderHandle, RenderLoop};
pub use scheduler::{FallbackClock, FrameRequest, FrameScheduler, Scheduler, FRAME_MS};
pub use surface::{CanvasSurface, DrawCommand, Recorder, Surface};

#[wasm_bindgen(start)]
fn start() {
    std::panic::set_hook(Box::new(console_error_panic_hook::hook));
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&format!("logger already set: {e}").into());
    }
}

/// Flies a bird on the canvas `canvas_id` until the returned handle is stopped
/// or freed. Missing `width`/`height` take the canvas size.
#[wasm_bindgen]
pub fn fly(
    canvas_id: &str,
    x: f64,
    y: f64,
    width: Option<f64>,
    height: Option<f64>,
    variable_speed: bool,
) -> Result<RenderHandle, JsValue> {
    let mut surface = CanvasSurface::from_element_id(canvas_id)?;

    let config = BirdConfig {
        variable_speed,
        ..Default::default()
    };
    let mut bird = AnimatedBird::with_config(&surface, x, y, width, height, config);
    bird.init(&mut surface);

    Ok(render::start(bird, surface, Scheduler::detect())?)
}
