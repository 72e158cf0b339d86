//! Cross-cutting trait seams.

pub mod clock;

pub use clock::{Clock, FixedClock, SystemClock};
