pub mod client;
pub mod events;
pub mod keyboard;

pub use client::HyprlandIpc;
pub use events::{parse_event, HyprlandEvent};
pub use keyboard::{fetch_keyboard_language, keymap_to_language};
