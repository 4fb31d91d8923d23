//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time/ticks
//! - Input events
//! - Frame scheduling
//! - Storage (LocalStorage on web)

pub mod input;
pub mod scheduler;
pub mod storage;
pub mod time;

pub use input::{InputLatch, KeyAction, TouchSide};
pub use scheduler::{HeadlessScheduler, LoopControl, Scheduler};
pub use storage::{KeyValueStore, MemoryStore};
pub use time::{Clock, FrameTimer, ManualClock};

#[cfg(target_arch = "wasm32")]
pub use scheduler::AnimationFrameScheduler;
#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorage;
#[cfg(target_arch = "wasm32")]
pub use time::BrowserClock;
#[cfg(not(target_arch = "wasm32"))]
pub use time::SystemClock;
