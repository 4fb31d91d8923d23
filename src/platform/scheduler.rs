//! Frame scheduling
//!
//! The host owns the loop. A [`Scheduler`] calls the frame function with a
//! timestamp until it asks to stop. In the browser that is
//! `requestAnimationFrame`; headless runs step a synthetic clock.

/// What the frame function wants next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Stop,
}

/// Drives a frame callback
pub trait Scheduler {
    /// Run `frame(now_ms)` repeatedly until it returns [`LoopControl::Stop`]
    fn run<F>(self, frame: F)
    where
        F: FnMut(f64) -> LoopControl + 'static;
}

/// Synchronous scheduler with a fixed synthetic frame period
#[derive(Debug, Clone, Copy)]
pub struct HeadlessScheduler {
    pub start_ms: f64,
    pub frame_ms: f64,
    /// Hard cap so a frame function that never stops still terminates
    pub max_frames: u64,
}

impl HeadlessScheduler {
    pub fn new(frame_ms: f64, max_frames: u64) -> Self {
        Self {
            start_ms: 0.0,
            frame_ms,
            max_frames,
        }
    }
}

impl Scheduler for HeadlessScheduler {
    fn run<F>(self, mut frame: F)
    where
        F: FnMut(f64) -> LoopControl + 'static,
    {
        for i in 0..self.max_frames {
            let now = self.start_ms + i as f64 * self.frame_ms;
            if frame(now) == LoopControl::Stop {
                break;
            }
        }
    }
}

/// `requestAnimationFrame` loop
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default, Clone, Copy)]
pub struct AnimationFrameScheduler;

#[cfg(target_arch = "wasm32")]
impl Scheduler for AnimationFrameScheduler {
    fn run<F>(self, mut frame: F)
    where
        F: FnMut(f64) -> LoopControl + 'static,
    {
        use std::cell::RefCell;
        use std::rc::Rc;
        use wasm_bindgen::JsCast;
        use wasm_bindgen::prelude::Closure;

        fn request(callback: &Closure<dyn FnMut(f64)>) {
            if let Some(window) = web_sys::window() {
                if let Err(e) = window.request_animation_frame(callback.as_ref().unchecked_ref()) {
                    log::error!("requestAnimationFrame failed: {:?}", e);
                }
            }
        }

        // The closure reschedules itself through this shared slot
        let slot: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
        let next = slot.clone();

        *slot.borrow_mut() = Some(Closure::new(move |time: f64| {
            if frame(time) == LoopControl::Stop {
                log::info!("Frame loop stopped");
                return;
            }
            if let Some(callback) = next.borrow().as_ref() {
                request(callback);
            }
        }));

        if let Some(callback) = slot.borrow().as_ref() {
            request(callback);
        }
    }
}
