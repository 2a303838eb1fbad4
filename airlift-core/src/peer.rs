//! Peer identity and proximity-scan events.

use std::fmt;

/// Opaque stable identifier for a nearby device (typically a hardware
/// address string). Used only as a set key; never parsed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PeerId(String);

impl PeerId {
    pub fn new(id: impl Into<String>) -> Self {
        PeerId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PeerId {
    fn from(s: &str) -> Self {
        PeerId(s.to_owned())
    }
}

impl From<String> for PeerId {
    fn from(s: String) -> Self {
        PeerId(s)
    }
}

/// What the scan source observed about a peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanEventKind {
    /// Peer came into range.
    Appeared,
    /// Peer went out of range.
    Lost,
}

/// One proximity-scan observation. Scan sources deliver these in batches;
/// the whole batch is applied before the controller re-evaluates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanEvent {
    pub kind: ScanEventKind,
    pub peer: PeerId,
}

impl ScanEvent {
    pub fn appeared(peer: impl Into<PeerId>) -> Self {
        ScanEvent {
            kind: ScanEventKind::Appeared,
            peer: peer.into(),
        }
    }

    pub fn lost(peer: impl Into<PeerId>) -> Self {
        ScanEvent {
            kind: ScanEventKind::Lost,
            peer: peer.into(),
        }
    }
}
