//! Inbound transfer offers and the accept/reject decision point.

/// An offer from a nearby sender, described before any file data flows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundRequest {
    /// Human-readable name the sender advertises.
    pub sender_name: String,
    /// Names of the files the sender wants to transfer, in offer order.
    pub file_names: Vec<String>,
}

/// Outcome of a policy decision. `Reject` means no file data is read for
/// this request; the transfer engine is told to refuse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Accept,
    Reject,
}

/// Decides whether an incoming offer is allowed before data flows.
/// Stricter variants (user confirmation, allow-lists, size/type filters)
/// slot in here without touching the controller or packager.
pub trait RequestPolicy {
    fn decide(&mut self, request: &InboundRequest) -> Decision;
}

/// Default policy: accept every offer, logging who asked for what.
pub struct AcceptAll;

impl RequestPolicy for AcceptAll {
    fn decide(&mut self, request: &InboundRequest) -> Decision {
        log::info!(
            "accepting {} file(s) from {}: {:?}",
            request.file_names.len(),
            request.sender_name,
            request.file_names
        );
        Decision::Accept
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accept_all_accepts() {
        let request = InboundRequest {
            sender_name: "Alice's phone".into(),
            file_names: vec!["a.jpg".into(), "b.jpg".into()],
        };
        assert_eq!(AcceptAll.decide(&request), Decision::Accept);
    }

    #[test]
    fn policies_are_swappable() {
        struct DenyNamed(&'static str);
        impl RequestPolicy for DenyNamed {
            fn decide(&mut self, request: &InboundRequest) -> Decision {
                if request.sender_name == self.0 {
                    Decision::Reject
                } else {
                    Decision::Accept
                }
            }
        }

        let request = InboundRequest {
            sender_name: "mallory".into(),
            file_names: vec!["x".into()],
        };
        let mut policy: Box<dyn RequestPolicy> = Box::new(DenyNamed("mallory"));
        assert_eq!(policy.decide(&request), Decision::Reject);
    }
}
