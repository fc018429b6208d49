//! Platform abstraction layer
//!
//! Hosts translate their native events (pointer, keyboard, focus) into
//! calls on these types; nothing here touches an OS or browser API.

pub mod input;

pub use input::{InputTracker, Key};
