use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;

use crate::bird::AnimatedBird;
use crate::error::Result;
use crate::scheduler::{FrameScheduler, Scheduler};
use crate::surface::Surface;

type Slot<C> = Rc<RefCell<Option<C>>>;

struct LoopState<S: FrameScheduler> {
    scheduler: S,
    pending: Option<S::Request>,
    running: bool,
}

/// A bird flying on a surface, one frame per scheduler callback. Stopping or
/// dropping it cancels the next frame.
pub struct RenderLoop<S: FrameScheduler> {
    state: Rc<RefCell<LoopState<S>>>,
    callback: Slot<S::Callback>,
}

fn schedule<S: FrameScheduler>(state: &RefCell<LoopState<S>>, slot: &Slot<S::Callback>) -> Result<()> {
    let slot = slot.borrow();
    let Some(callback) = slot.as_ref() else {
        return Ok(());
    };

    let mut state = state.borrow_mut();
    if !state.running {
        return Ok(());
    }

    let request = state.scheduler.request_frame(callback)?;
    state.pending = Some(request);
    Ok(())
}

impl<S: FrameScheduler + 'static> RenderLoop<S> {
    pub fn start<D: Surface + 'static>(mut bird: AnimatedBird, mut surface: D, scheduler: S) -> Result<Self> {
        let native = scheduler.is_native();
        let state = Rc::new(RefCell::new(LoopState {
            scheduler,
            pending: None,
            running: true,
        }));

        // The callback keeps itself alive through `frame_slot` until it is taken out.
        let slot: Slot<S::Callback> = Rc::new(RefCell::new(None));
        let frame_state = state.clone();
        let frame_slot = slot.clone();

        *slot.borrow_mut() = Some(S::wrap(Box::new(move |now: f64| {
            let running = {
                let mut state = frame_state.borrow_mut();
                state.pending = None;
                state.running
            };

            // stopped while this frame could not be cancelled
            if !running {
                frame_slot.borrow_mut().take();
                return;
            }

            // Schedule ourself for the next frame before painting this one.
            if let Err(e) = schedule(&frame_state, &frame_slot) {
                log::error!("could not schedule next frame, stopping: {e}");
                frame_state.borrow_mut().running = false;
                frame_slot.borrow_mut().take();
            }

            bird.frame(now, &mut surface);
        })));

        let render_loop = Self { state, callback: slot };
        schedule(&render_loop.state, &render_loop.callback)?;

        log::info!(
            "render loop started on {}",
            if native { "animation frames" } else { "timer" }
        );

        Ok(render_loop)
    }
}

impl<S: FrameScheduler> RenderLoop<S> {
    pub fn stop(&mut self) {
        let mut state = self.state.borrow_mut();
        if !state.running {
            return;
        }
        state.running = false;

        let cancelled = match state.pending.take() {
            None => true,
            Some(request) => state.scheduler.cancel_frame(request).unwrap_or_else(|e| {
                log::warn!("could not cancel pending frame: {e}");
                false
            }),
        };
        drop(state);

        // An uncancelled frame still runs and releases the callback itself.
        if cancelled {
            self.callback.borrow_mut().take();
        }
        log::info!("render loop stopped");
    }

    pub fn is_running(&self) -> bool {
        self.state.borrow().running
    }
}

impl<S: FrameScheduler> Drop for RenderLoop<S> {
    fn drop(&mut self) {
        self.stop();
    }
}

/// The browser render loop, handed to JavaScript.
#[wasm_bindgen]
pub struct RenderHandle {
    inner: RenderLoop<Scheduler>,
}

/// Runs `bird` on `surface` every frame until the returned handle is stopped.
pub fn start<D: Surface + 'static>(bird: AnimatedBird, surface: D, scheduler: Scheduler) -> Result<RenderHandle> {
    Ok(RenderHandle {
        inner: RenderLoop::start(bird, surface, scheduler)?,
    })
}

#[wasm_bindgen]
impl RenderHandle {
    pub fn stop(&mut self) {
        self.inner.stop();
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.inner.is_running()
    }
}
