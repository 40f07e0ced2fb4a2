//! Practice test session state.

mod controller;
mod result;

pub use controller::{SessionController, SessionPhase, Step};
pub use result::SessionResult;
