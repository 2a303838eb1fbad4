//! Single-consumer receiver loop.
//!
//! One logical receiver instance owns a `DiscoverabilityController`, a
//! transport, and a policy, none of which are internally synchronized.
//! Every input — scan batches from the scan source, offers and file
//! streams from the transfer engine — is funneled through one channel and
//! handled by one task, so set mutations happen-before each re-evaluation
//! and advertising start/stop is never invoked concurrently.

use std::io::Read;

use airlift_core::controller::{ControllerFlow, DiscoverabilityController, Transport};
use airlift_core::policy::{Decision, InboundRequest, RequestPolicy};
use airlift_core::{sink, ScanEvent, TransportUnavailable};
use tokio::sync::{mpsc, oneshot};

use crate::config::Config;

/// One unit of work for the receiver task.
pub enum ReceiverEvent {
    /// A batch of scan observations, applied as a whole before one
    /// re-evaluation.
    Scan(Vec<ScanEvent>),
    /// An inbound offer awaiting an accept/reject decision.
    Offer {
        request: InboundRequest,
        reply: oneshot::Sender<Decision>,
    },
    /// The body of one accepted file.
    Transfer {
        file_name: String,
        stream: Box<dyn Read + Send>,
    },
}

/// The receiver task has exited and no longer takes events.
#[derive(Debug, thiserror::Error)]
#[error("receiver is no longer running")]
pub struct ReceiverClosed;

/// Clonable sender half used by the scan source and the transfer engine.
#[derive(Clone)]
pub struct ReceiverHandle {
    tx: mpsc::UnboundedSender<ReceiverEvent>,
}

impl ReceiverHandle {
    /// Deliver one scan batch.
    pub fn scan(&self, batch: Vec<ScanEvent>) -> Result<(), ReceiverClosed> {
        self.tx
            .send(ReceiverEvent::Scan(batch))
            .map_err(|_| ReceiverClosed)
    }

    /// Submit an offer and wait for the policy's decision.
    pub async fn offer(&self, request: InboundRequest) -> Result<Decision, ReceiverClosed> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(ReceiverEvent::Offer { request, reply })
            .map_err(|_| ReceiverClosed)?;
        rx.await.map_err(|_| ReceiverClosed)
    }

    /// Hand over the byte stream of one accepted file.
    pub fn transfer(
        &self,
        file_name: impl Into<String>,
        stream: Box<dyn Read + Send>,
    ) -> Result<(), ReceiverClosed> {
        self.tx
            .send(ReceiverEvent::Transfer {
                file_name: file_name.into(),
                stream,
            })
            .map_err(|_| ReceiverClosed)
    }
}

/// Create the event channel for one receiver instance.
pub fn event_channel() -> (ReceiverHandle, mpsc::UnboundedReceiver<ReceiverEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ReceiverHandle { tx }, rx)
}

/// Run one receiver instance until its controller stops (presence set
/// drained), the event channel closes, or the transport turns out to be
/// unusable. The fatal readiness failure is returned; everything else
/// exits `Ok(())`. File copies run on a blocking worker so stream I/O
/// stays off the runtime's async threads.
pub async fn run_receiver<T, P>(
    mut controller: DiscoverabilityController,
    mut transport: T,
    mut policy: P,
    config: Config,
    mut rx: mpsc::UnboundedReceiver<ReceiverEvent>,
) -> Result<(), TransportUnavailable>
where
    T: Transport + Send,
    P: RequestPolicy + Send,
{
    while let Some(event) = rx.recv().await {
        match event {
            ReceiverEvent::Scan(batch) => {
                controller.apply_batch(&batch);
                match controller.reevaluate(&mut transport) {
                    Ok(ControllerFlow::Continue) => {}
                    Ok(ControllerFlow::Stopped) => break,
                    Err(e) => {
                        log::error!("receiver shutting down: {e}");
                        return Err(e);
                    }
                }
            }
            ReceiverEvent::Offer { request, reply } => {
                let decision = policy.decide(&request);
                if decision == Decision::Reject {
                    log::info!("rejected offer from {}", request.sender_name);
                }
                // The engine may have given up waiting; nothing to do.
                let _ = reply.send(decision);
            }
            ReceiverEvent::Transfer {
                file_name,
                mut stream,
            } => {
                let dir = config.download_dir.clone();
                let copied = tokio::task::spawn_blocking(move || {
                    sink::receive(&file_name, &mut *stream, &dir)
                })
                .await;
                match copied {
                    Ok(Ok(path)) => log::info!("received {}", path.display()),
                    Ok(Err(e)) => log::error!("failed writing inbound file: {e}"),
                    Err(e) => log::error!("sink worker panicked: {e}"),
                }
            }
        }
    }
    Ok(())
}
