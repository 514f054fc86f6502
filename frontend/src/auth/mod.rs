//! Authentication state and form handling

mod controller;
mod phase;

pub use controller::{authenticate, AuthAction, AuthEvent, AuthForm};
pub use phase::{AuthPhase, SessionChange, SessionEffect};
