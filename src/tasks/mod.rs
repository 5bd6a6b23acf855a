//! Background tasks module
//!
//! This module contains the clock driver and the terminal display, both
//! running alongside the control surface.

pub mod clock;
pub mod display;

// Re-export main functions
pub use clock::{spawn_clock, TickHandle, TICK_PERIOD};
pub use display::display_task;
