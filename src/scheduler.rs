use gloo_timers::callback::Timeout;
use js_sys::{Function, Reflect};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};

use crate::error::{BirdError, Result};

const VENDORS: [&str; 4] = ["ms", "moz", "webkit", "o"];

/// Target interval of the timer fallback, roughly 60 frames a second.
pub const FRAME_MS: f64 = 16.0;

/// Paces timer-driven frames when the host has no animation frame callback.
#[derive(Debug, Default, Clone)]
pub struct FallbackClock {
    last_scheduled_at: f64,
}

impl FallbackClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_scheduled_at(&self) -> f64 {
        self.last_scheduled_at
    }

    /// Returns the timer delay and the timestamp the frame callback will see.
    pub fn schedule(&mut self, now: f64) -> (f64, f64) {
        let delay = (FRAME_MS - (now - self.last_scheduled_at)).max(0.0);
        self.last_scheduled_at = now + delay;
        (delay, self.last_scheduled_at)
    }
}

/// Host frame scheduling as the render loop sees it.
pub trait FrameScheduler {
    /// What the host calls back with a frame timestamp.
    type Callback;
    /// A frame that has been asked for but not yet run.
    type Request;

    fn wrap(frame: Box<dyn FnMut(f64)>) -> Self::Callback;

    fn request_frame(&mut self, callback: &Self::Callback) -> Result<Self::Request>;

    /// `Ok(false)` when the host cannot cancel and the frame will still run.
    fn cancel_frame(&mut self, request: Self::Request) -> Result<bool>;

    fn is_native(&self) -> bool;
}

enum Backend {
    Native {
        target: JsValue,
        request: Function,
        cancel: Option<Function>,
    },
    Fallback(FallbackClock),
}

/// `requestAnimationFrame` when the host has it, otherwise a timer.
pub struct Scheduler {
    backend: Backend,
}

pub enum FrameRequest {
    Native(JsValue),
    Fallback(Timeout),
}

fn lookup(target: &JsValue, names: impl IntoIterator<Item = String>) -> Option<Function> {
    names.into_iter().find_map(|name| {
        Reflect::get(target, &JsValue::from_str(&name))
            .ok()
            .and_then(|f| f.dyn_into::<Function>().ok())
    })
}

impl Scheduler {
    pub fn detect() -> Self {
        Self::native().unwrap_or_else(|e| {
            log::debug!("{e}, using {FRAME_MS}ms timer");
            Self::fallback()
        })
    }

    pub fn native() -> Result<Self> {
        let target: JsValue = web_sys::window().ok_or(BirdError::SchedulerUnavailable)?.into();

        let request = lookup(
            &target,
            std::iter::once("requestAnimationFrame".to_owned())
                .chain(VENDORS.iter().map(|v| format!("{v}RequestAnimationFrame"))),
        )
        .ok_or(BirdError::SchedulerUnavailable)?;

        let cancel = lookup(
            &target,
            std::iter::once("cancelAnimationFrame".to_owned()).chain(VENDORS.iter().flat_map(|v| {
                [
                    format!("{v}CancelAnimationFrame"),
                    format!("{v}CancelRequestAnimationFrame"),
                ]
            })),
        );
        if cancel.is_none() {
            log::warn!("animation frames cannot be cancelled on this host");
        }

        log::debug!("using native animation frames");

        Ok(Self {
            backend: Backend::Native { target, request, cancel },
        })
    }

    pub fn fallback() -> Self {
        Self {
            backend: Backend::Fallback(FallbackClock::new()),
        }
    }
}

impl FrameScheduler for Scheduler {
    type Callback = Closure<dyn FnMut(f64)>;
    type Request = FrameRequest;

    fn wrap(frame: Box<dyn FnMut(f64)>) -> Self::Callback {
        Closure::wrap(frame)
    }

    fn request_frame(&mut self, callback: &Self::Callback) -> Result<FrameRequest> {
        let callback: &Function = callback.as_ref().unchecked_ref();

        match &mut self.backend {
            Backend::Native { target, request, .. } => request
                .call1(target, callback)
                .map(FrameRequest::Native)
                .map_err(BirdError::js),
            Backend::Fallback(clock) => {
                let (delay, timestamp) = clock.schedule(instant::now());
                let callback = callback.clone();

                let timeout = Timeout::new(delay.round() as u32, move || {
                    if let Err(e) = callback.call1(&JsValue::NULL, &JsValue::from_f64(timestamp)) {
                        log::error!("frame callback failed: {:?}", e);
                    }
                });
                Ok(FrameRequest::Fallback(timeout))
            }
        }
    }

    fn cancel_frame(&mut self, request: FrameRequest) -> Result<bool> {
        match (&self.backend, request) {
            (Backend::Native { target, cancel: Some(cancel), .. }, FrameRequest::Native(id)) => {
                cancel.call1(target, &id).map(|_| true).map_err(BirdError::js)
            }
            (Backend::Native { cancel: None, .. }, FrameRequest::Native(_)) => Ok(false),
            // dropping the timeout clears it
            (_, FrameRequest::Fallback(timeout)) => {
                drop(timeout);
                Ok(true)
            }
            (Backend::Fallback(_), FrameRequest::Native(_)) => {
                Err(BirdError::Js("native frame handed to timer scheduler".into()))
            }
        }
    }

    fn is_native(&self) -> bool {
        matches!(self.backend, Backend::Native { .. })
    }
}
