//! CareFlow effect catalog
//!
//! Workflows never perform I/O. When one needs the outside world it
//! produces an [`EffectDescription`]: an immutable value naming the
//! required operation and carrying only its parameters. The interpreter —
//! whatever owns the actual database, message broker, or notification
//! channel — fulfills the description and hands back an [`EffectOutcome`].
//!
//! The contract is strict: each effect type has exactly the result shapes
//! listed for it, an interpreter never lets an unclassifiable raw failure
//! escape (that is what [`InterpreterFailure`] is for), and a notification
//! failure is a non-fatal outcome, not an error.

#![deny(unsafe_code)]

use async_trait::async_trait;
use careflow_types::{AuditEntry, CorrelationId, Entity, EntityId, EntityKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ── Effect descriptions ──────────────────────────────────────────────

/// One required operation, described but not executed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum EffectDescription {
    /// Load an entity by id. Answered by `EntityFetched` or `EntityMissing`.
    FetchEntityById {
        entity_kind: EntityKind,
        entity_id: EntityId,
    },
    /// Store the successor entity. Answered by `EntityPersisted` or
    /// `PersistFailed`.
    PersistEntity { entity: Entity },
    /// Tell interested parties a transition happened. Answered by
    /// `NotificationPublished` or `NotificationFailed`; never fatal.
    PublishNotification { notification: Notification },
    /// Append one immutable audit record. Answered by `AuditRecorded`.
    RecordAuditEntry { entry: AuditEntry },
}

impl EffectDescription {
    pub fn kind(&self) -> EffectKind {
        match self {
            EffectDescription::FetchEntityById { .. } => EffectKind::FetchEntityById,
            EffectDescription::PersistEntity { .. } => EffectKind::PersistEntity,
            EffectDescription::PublishNotification { .. } => EffectKind::PublishNotification,
            EffectDescription::RecordAuditEntry { .. } => EffectKind::RecordAuditEntry,
        }
    }
}

/// Payload-free effect discriminant, used in failures and logs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    FetchEntityById,
    PersistEntity,
    PublishNotification,
    RecordAuditEntry,
}

impl EffectKind {
    pub fn name(&self) -> &'static str {
        match self {
            EffectKind::FetchEntityById => "fetch_entity_by_id",
            EffectKind::PersistEntity => "persist_entity",
            EffectKind::PublishNotification => "publish_notification",
            EffectKind::RecordAuditEntry => "record_audit_entry",
        }
    }
}

impl std::fmt::Display for EffectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// What a published notification says.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub entity_kind: EntityKind,
    pub entity_id: EntityId,
    /// Machine-readable event name, e.g. `"appointment.confirmed"`.
    pub event: String,
    /// Human-readable summary.
    pub message: String,
    pub correlation_id: CorrelationId,
}

// ── Effect outcomes ──────────────────────────────────────────────────

/// The typed result an interpreter returns for a fulfilled effect.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum EffectOutcome {
    /// `FetchEntityById`: the entity exists.
    EntityFetched(Entity),
    /// `FetchEntityById`: no such entity.
    EntityMissing,
    /// `PersistEntity`: the successor entity is durable.
    EntityPersisted,
    /// `PersistEntity`: the store refused the write (conflict, constraint).
    PersistFailed { message: String },
    /// `PublishNotification`: delivered.
    NotificationPublished,
    /// `PublishNotification`: not delivered. Non-fatal by contract.
    NotificationFailed { message: String },
    /// `RecordAuditEntry`: the record is in the audit log.
    AuditRecorded,
}

impl EffectOutcome {
    /// Whether this outcome is a legal answer to an effect of `kind`.
    ///
    /// The suspension protocol rejects any reply that does not answer the
    /// effect actually issued.
    pub fn answers(&self, kind: EffectKind) -> bool {
        matches!(
            (self, kind),
            (
                EffectOutcome::EntityFetched(_) | EffectOutcome::EntityMissing,
                EffectKind::FetchEntityById
            ) | (
                EffectOutcome::EntityPersisted | EffectOutcome::PersistFailed { .. },
                EffectKind::PersistEntity
            ) | (
                EffectOutcome::NotificationPublished | EffectOutcome::NotificationFailed { .. },
                EffectKind::PublishNotification
            ) | (EffectOutcome::AuditRecorded, EffectKind::RecordAuditEntry)
        )
    }
}

// ── Interpreter contract ─────────────────────────────────────────────

/// Raised when an interpreter cannot fulfill an effect at all.
///
/// This is the only way infrastructure trouble crosses the boundary: as a
/// classified, typed failure naming the effect it belongs to. Timeouts are
/// the interpreter's business and arrive here too.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("interpreter could not fulfill {effect_kind}: {message}")]
pub struct InterpreterFailure {
    pub effect_kind: EffectKind,
    pub message: String,
}

impl InterpreterFailure {
    pub fn new(effect_kind: EffectKind, message: impl Into<String>) -> Self {
        Self {
            effect_kind,
            message: message.into(),
        }
    }
}

/// The collaborator that executes effect descriptions against real
/// infrastructure.
///
/// Implementations must return an outcome for which
/// [`EffectOutcome::answers`] holds for the effect's kind, and must map any
/// internal error into [`InterpreterFailure`] rather than panicking.
#[async_trait]
pub trait Interpreter: Send + Sync {
    async fn handle(&self, effect: EffectDescription)
        -> Result<EffectOutcome, InterpreterFailure>;
}
