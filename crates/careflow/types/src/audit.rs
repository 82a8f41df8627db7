//! Audit records: the immutable who/what/when/why of every transition attempt.
//!
//! An `AuditEntry` is created exactly once per attempt, whether the attempt
//! succeeded, was rejected by the validator, or was denied by the authority
//! checker. It is never mutated afterward; ownership passes to the audit
//! sink the moment it is emitted as an effect.

use crate::actor::Actor;
use crate::entity::EntityKind;
use crate::ids::{AuditEntryId, CorrelationId, EntityId};
use crate::status::StatusKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What an audit entry records about the attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditOutcome {
    /// Transition validated, authorized, and persisted.
    Success,
    /// Rejected by the transition validator.
    Rejected,
    /// Denied by the authority checker.
    Unauthorized,
}

impl AuditOutcome {
    pub fn name(&self) -> &'static str {
        match self {
            AuditOutcome::Success => "success",
            AuditOutcome::Rejected => "rejected",
            AuditOutcome::Unauthorized => "unauthorized",
        }
    }
}

/// Compliance context: why the actor touched the record at all.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PurposeOfUse {
    Treatment,
    Payment,
    Operations,
    Research,
}

impl PurposeOfUse {
    pub fn name(&self) -> &'static str {
        match self {
            PurposeOfUse::Treatment => "treatment",
            PurposeOfUse::Payment => "payment",
            PurposeOfUse::Operations => "operations",
            PurposeOfUse::Research => "research",
        }
    }
}

/// One immutable record of a transition attempt.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub entry_id: AuditEntryId,
    pub entity_kind: EntityKind,
    pub entity_id: EntityId,
    pub actor: Actor,
    pub previous_status: StatusKind,
    pub attempted_status: StatusKind,
    pub outcome: AuditOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub purpose_of_use: PurposeOfUse,
    pub correlation_id: CorrelationId,
    pub recorded_at: DateTime<Utc>,
}

impl AuditEntry {
    /// Create the single audit record for one transition attempt.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        entity_kind: EntityKind,
        entity_id: EntityId,
        actor: Actor,
        previous_status: StatusKind,
        attempted_status: StatusKind,
        outcome: AuditOutcome,
        purpose_of_use: PurposeOfUse,
        correlation_id: CorrelationId,
    ) -> Self {
        Self {
            entry_id: AuditEntryId::generate(),
            entity_kind,
            entity_id,
            actor,
            previous_status,
            attempted_status,
            outcome,
            reason: None,
            purpose_of_use,
            correlation_id,
            recorded_at: Utc::now(),
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::ActorRole;
    use crate::status::AppointmentStatusKind;

    #[test]
    fn entry_captures_attempt_context() {
        let entry = AuditEntry::new(
            EntityKind::Appointment,
            EntityId::new("appt-1"),
            Actor::new("dr-osei", ActorRole::Doctor),
            StatusKind::Appointment(AppointmentStatusKind::Requested),
            StatusKind::Appointment(AppointmentStatusKind::Confirmed),
            AuditOutcome::Success,
            PurposeOfUse::Treatment,
            CorrelationId::generate(),
        )
        .with_reason("patient requested morning slot");

        assert_eq!(entry.previous_status.name(), "Requested");
        assert_eq!(entry.attempted_status.name(), "Confirmed");
        assert_eq!(entry.outcome, AuditOutcome::Success);
        assert_eq!(entry.reason.as_deref(), Some("patient requested morning slot"));
    }

    #[test]
    fn entries_get_distinct_ids() {
        let make = || {
            AuditEntry::new(
                EntityKind::Invoice,
                EntityId::new("inv-1"),
                Actor::new("clerk-1", ActorRole::BillingClerk),
                StatusKind::Appointment(AppointmentStatusKind::Requested),
                StatusKind::Appointment(AppointmentStatusKind::Cancelled),
                AuditOutcome::Rejected,
                PurposeOfUse::Payment,
                CorrelationId::generate(),
            )
        };
        assert_ne!(make().entry_id, make().entry_id);
    }
}
