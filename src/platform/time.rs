//! Time sources and frame delta
//!
//! The core wants two things from the host: a monotonic `now` in ms and a
//! per-frame delta measured in nominal 60 Hz frames. [`FrameTimer`] turns the
//! former into the latter and clamps it, so a tab that was backgrounded for a
//! minute resumes with at most a 2-frame step.

use std::cell::Cell;

use crate::consts::{FRAME_MS, MAX_DT_TICKS};

/// Monotonic millisecond clock
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Clock driven by hand (tests, replays, headless runs)
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<f64>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    pub fn set(&self, now_ms: f64) {
        self.now.set(now_ms);
    }

    pub fn advance(&self, delta_ms: f64) {
        self.now.set(self.now.get() + delta_ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

/// Wall clock backed by `std::time::Instant`
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug)]
pub struct SystemClock {
    start: std::time::Instant,
}

#[cfg(not(target_arch = "wasm32"))]
impl Default for SystemClock {
    fn default() -> Self {
        Self {
            start: std::time::Instant::now(),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

/// `performance.now()`, falling back to `Date.now()` when unavailable
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default)]
pub struct BrowserClock {
    performance: Option<web_sys::Performance>,
}

#[cfg(target_arch = "wasm32")]
impl BrowserClock {
    pub fn new() -> Self {
        Self {
            performance: web_sys::window().and_then(|w| w.performance()),
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl Clock for BrowserClock {
    fn now_ms(&self) -> f64 {
        match &self.performance {
            Some(p) => p.now(),
            None => js_sys::Date::now(),
        }
    }
}

const FPS_SAMPLE_COUNT: usize = 60;

/// Converts successive clock readings into clamped frame deltas
#[derive(Debug, Clone)]
pub struct FrameTimer {
    last_ms: Option<f64>,
    frame_ms: f64,
    max_dt_ticks: f32,
    // FPS tracking
    frame_times: [f64; FPS_SAMPLE_COUNT],
    frame_index: usize,
    fps: u32,
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new(FRAME_MS, MAX_DT_TICKS)
    }
}

impl FrameTimer {
    pub fn new(frame_ms: f64, max_dt_ticks: f32) -> Self {
        Self {
            last_ms: None,
            frame_ms: frame_ms.max(f64::EPSILON),
            max_dt_ticks: max_dt_ticks.max(0.0),
            frame_times: [0.0; FPS_SAMPLE_COUNT],
            frame_index: 0,
            fps: 0,
        }
    }

    /// Elapsed time since the previous call, in nominal frames
    ///
    /// The first call yields exactly one frame. Backwards clock jumps yield 0.
    pub fn dt_ticks(&mut self, now_ms: f64) -> f32 {
        self.record_fps(now_ms);

        let dt = match self.last_ms {
            None => 1.0,
            Some(last) => ((now_ms - last) / self.frame_ms) as f32,
        };
        self.last_ms = Some(now_ms);

        if dt.is_finite() {
            dt.clamp(0.0, self.max_dt_ticks)
        } else {
            0.0
        }
    }

    /// Forget the previous reading (e.g. after the host was suspended)
    pub fn reset(&mut self) {
        self.last_ms = None;
    }

    /// Frames per second over the last 60 frames
    pub fn fps(&self) -> u32 {
        self.fps
    }

    fn record_fps(&mut self, now_ms: f64) {
        self.frame_times[self.frame_index] = now_ms;
        self.frame_index = (self.frame_index + 1) % FPS_SAMPLE_COUNT;

        // Oldest sample is the one we are about to overwrite next
        let oldest = self.frame_times[self.frame_index];
        if oldest > 0.0 {
            let elapsed = now_ms - oldest;
            if elapsed > 0.0 {
                self.fps = ((FPS_SAMPLE_COUNT - 1) as f64 * 1000.0 / elapsed).round() as u32;
            }
        }
    }
}
