//! Transition requests: the caller-facing input to a workflow.

use careflow_types::{Actor, CorrelationId, EntityId, EntityKind, EntityStatus, PurposeOfUse};
use serde::{Deserialize, Serialize};

/// Everything a caller supplies to attempt one status transition.
///
/// The target is a full status value, payload included: requesting
/// `Confirmed` means supplying the scheduled time that a confirmed
/// appointment must carry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionRequest {
    pub entity_kind: EntityKind,
    pub entity_id: EntityId,
    pub target: EntityStatus,
    pub actor: Actor,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub purpose_of_use: PurposeOfUse,
    /// Supplied by callers that already have a request-scoped id;
    /// generated otherwise.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<CorrelationId>,
}

impl TransitionRequest {
    pub fn new(
        entity_kind: EntityKind,
        entity_id: EntityId,
        target: EntityStatus,
        actor: Actor,
        purpose_of_use: PurposeOfUse,
    ) -> Self {
        Self {
            entity_kind,
            entity_id,
            target,
            actor,
            reason: None,
            purpose_of_use,
            correlation_id: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn with_correlation_id(mut self, correlation_id: CorrelationId) -> Self {
        self.correlation_id = Some(correlation_id);
        self
    }
}
