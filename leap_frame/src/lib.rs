//! # leap_frame
//!
//! The per-frame view of a LeapMotion controller that the touch tutorials
//! consume, plus the two small numeric tools every tutorial leans on.
//!
//! * [`FrameSnapshot`] — pointables, hands, gestures and the reported
//!   interaction box for one tracking frame.  Built once, never mutated,
//!   replaced by the next frame.
//! * [`map_to_canvas`] — device space → canvas pixels through the
//!   interaction box.
//! * [`SmoothingBuffer`] — fixed-window moving average, newest sample first.
//!
//! Nothing in here talks to hardware.  Frame producers (simulator, LeapC)
//! live in the application crate.

pub mod frame;
pub mod mapper;
pub mod smoothing;

pub use frame::{
    FrameSnapshot, Gesture, GestureKind, Hand, InteractionBox, Pointable, TouchZone, Vec3,
};
pub use mapper::map_to_canvas;
pub use smoothing::SmoothingBuffer;
