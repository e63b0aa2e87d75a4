/*! Core types for veilio. */

#![allow(missing_docs)]

mod error;
mod event;
mod ids;
mod window;

pub use error::{VeilError, VeilResult};
pub use event::Event;
pub use ids::WindowId;
pub use window::Window;
