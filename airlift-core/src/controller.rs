//! Discoverability controller: presence set + two-state advertising machine.

use std::collections::HashSet;

use crate::peer::{PeerId, ScanEvent, ScanEventKind};

/// Advertising/listening collaborator. Implementations own the actual
/// radio/socket plumbing; the controller only drives start/stop.
pub trait Transport {
    /// Whether the underlying hardware can advertise right now. A `false`
    /// answer is treated as unrecoverable for the controller's lifetime.
    fn is_ready(&self) -> bool;
    fn start_advertising(&mut self);
    fn stop_advertising(&mut self);
}

/// Controller lifecycle state. `Discoverable` iff the presence set was
/// non-empty at the last re-evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Idle,
    Discoverable,
}

/// Whether the controller should keep receiving events after a
/// re-evaluation. `Stopped` is terminal: the controller is recreated on
/// next demand rather than idling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerFlow {
    Continue,
    Stopped,
}

/// Fatal readiness failure: the transport hardware cannot advertise and
/// will not self-heal without user/OS intervention. No retry.
#[derive(Debug, thiserror::Error)]
#[error("transport hardware unavailable")]
pub struct TransportUnavailable;

/// Consumes proximity-scan events and drives the advertising lifecycle.
///
/// Not internally synchronized: one controller instance must only be
/// mutated from a single serialized consumer (see airlift-receiver).
pub struct DiscoverabilityController {
    state: ControllerState,
    in_range: HashSet<PeerId>,
    finished: bool,
}

impl DiscoverabilityController {
    pub fn new() -> Self {
        Self {
            state: ControllerState::Idle,
            in_range: HashSet::new(),
            finished: false,
        }
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// Number of peers currently considered in range.
    pub fn peers_in_range(&self) -> usize {
        self.in_range.len()
    }

    /// Apply one scan observation. Insert and remove are both idempotent;
    /// no side effects happen until `reevaluate`.
    pub fn on_scan_event(&mut self, kind: ScanEventKind, peer: PeerId) {
        if self.finished {
            return;
        }
        match kind {
            ScanEventKind::Appeared => {
                self.in_range.insert(peer);
            }
            ScanEventKind::Lost => {
                self.in_range.remove(&peer);
            }
        }
    }

    /// Apply a whole scan batch. All set edits land before the caller's
    /// single `reevaluate`, so a peer that appears and vanishes within one
    /// batch never flaps the radio.
    pub fn apply_batch(&mut self, events: &[ScanEvent]) {
        for e in events {
            self.on_scan_event(e.kind, e.peer.clone());
        }
    }

    /// Re-evaluate state against the presence set; invoked once per batch.
    /// Side effects are edge-triggered: `start_advertising` and
    /// `stop_advertising` fire only on a state change, never repeatedly.
    pub fn reevaluate(
        &mut self,
        transport: &mut dyn Transport,
    ) -> Result<ControllerFlow, TransportUnavailable> {
        if self.finished {
            return Ok(ControllerFlow::Stopped);
        }
        match (self.state, self.in_range.is_empty()) {
            (ControllerState::Idle, false) => {
                if !transport.is_ready() {
                    log::warn!("transport not ready, giving up");
                    self.finished = true;
                    return Err(TransportUnavailable);
                }
                log::debug!("peers in range ({}), advertising", self.in_range.len());
                transport.start_advertising();
                self.state = ControllerState::Discoverable;
                Ok(ControllerFlow::Continue)
            }
            (ControllerState::Discoverable, true) => {
                log::debug!("peers lost, stopping");
                transport.stop_advertising();
                self.state = ControllerState::Idle;
                self.finished = true;
                Ok(ControllerFlow::Stopped)
            }
            // Steady state: Idle+empty or Discoverable+non-empty.
            _ => Ok(ControllerFlow::Continue),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl Default for DiscoverabilityController {
    fn default() -> Self {
        Self::new()
    }
}
