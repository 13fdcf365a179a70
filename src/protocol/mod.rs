//! The wallet-facing JSON shapes: action descriptions for GET, envelopes for POST.

pub mod action;
pub mod describe;
pub mod envelope;

pub use action::*;
pub use describe::*;
pub use envelope::*;
