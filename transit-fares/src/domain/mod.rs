//! Domain types shared by the fare engine.
//!
//! Money, clock times and transit modes. All types enforce their invariants
//! at construction time, so code that receives them can trust their
//! validity.

mod mode;
mod money;
mod time;

pub use mode::{InvalidMode, TransitMode};
pub use money::{Cents, InvalidAmount};
pub use time::{ClockTime, TimeError};
