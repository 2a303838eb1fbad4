//! Airlift receiver core: host-driven building blocks for a wireless
//! drop client. No runtime, no radio access; the host feeds scan events,
//! offers, and byte streams in and wires the advertising transport behind
//! the `Transport` trait.

pub mod archive;
pub mod controller;
pub mod cpio;
pub mod peer;
pub mod policy;
pub mod sink;

pub use archive::{pack, ContentSource};
pub use controller::{
    ControllerFlow, ControllerState, DiscoverabilityController, Transport, TransportUnavailable,
};
pub use peer::{PeerId, ScanEvent, ScanEventKind};
pub use policy::{AcceptAll, Decision, InboundRequest, RequestPolicy};
pub use sink::receive;
