//! Frame timing.
//!
//! One `FrameClock` per window; `tick()` once per refresh to get a `FrameTime`.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
