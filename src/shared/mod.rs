pub mod clock;
pub mod errors;

pub use clock::{Clock, FixedClock, SharedClock, SystemClock};
pub use errors::*;
