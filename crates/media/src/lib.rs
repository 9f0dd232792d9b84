pub mod client;
pub mod events;

pub use client::{MediaController, MediaSession};
pub use events::{MediaCommand, MediaEvent};
