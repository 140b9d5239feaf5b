//! SoundForge tracker event bus.
//!
//! Building blocks for the session's notification surface:
//!
//! - [`EventBus`] — in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`TrackerEvent`] — the job lifecycle events a presentation layer
//!   turns into user notifications (toasts, banners).

pub mod bus;

pub use bus::{EventBus, TrackerEvent};
