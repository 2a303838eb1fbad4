//! Airlift receiver host: wires the core controller, policy, and sink
//! into one serialized tokio task per receiver instance, plus the
//! file/env configuration for where received files land.

pub mod config;
pub mod service;

pub use config::Config;
pub use service::{event_channel, run_receiver, ReceiverClosed, ReceiverEvent, ReceiverHandle};
