//! In-memory reference interpreter.
//!
//! Fulfills every effect against process-local maps: an entity store, an
//! append-only audit log, and a notification log. Used by the demo binary
//! and by integration-style tests; real deployments supply their own
//! interpreter over actual infrastructure.
//!
//! Failure injection switches make the two infrastructure edges testable:
//! a refused persist (typed `PersistFailed`) and a dead notification
//! channel (typed, non-fatal `NotificationFailed`).

use async_trait::async_trait;
use careflow_effects::{
    EffectDescription, EffectKind, EffectOutcome, Interpreter, InterpreterFailure, Notification,
};
use careflow_types::{AuditEntry, Entity, EntityId};
use std::collections::HashMap;
use std::sync::RwLock;

#[derive(Debug, Default)]
pub struct InMemoryInterpreter {
    entities: RwLock<HashMap<EntityId, Entity>>,
    audit_log: RwLock<Vec<AuditEntry>>,
    notifications: RwLock<Vec<Notification>>,
    persist_failure: RwLock<Option<String>>,
    notification_failure: RwLock<Option<String>>,
}

impl InMemoryInterpreter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entities(entities: impl IntoIterator<Item = Entity>) -> Self {
        let interpreter = Self::new();
        for entity in entities {
            interpreter.insert_entity(entity);
        }
        interpreter
    }

    /// Seed or replace an entity directly, bypassing the workflow layer.
    pub fn insert_entity(&self, entity: Entity) {
        if let Ok(mut entities) = self.entities.write() {
            entities.insert(entity.id().clone(), entity);
        }
    }

    pub fn entity(&self, id: &EntityId) -> Option<Entity> {
        self.entities.read().ok()?.get(id).cloned()
    }

    /// Snapshot of the append-only audit log, oldest first.
    pub fn audit_log(&self) -> Vec<AuditEntry> {
        self.audit_log
            .read()
            .map(|log| log.clone())
            .unwrap_or_default()
    }

    /// Snapshot of delivered notifications, oldest first.
    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications
            .read()
            .map(|log| log.clone())
            .unwrap_or_default()
    }

    /// Make every subsequent persist effect come back `PersistFailed`.
    pub fn fail_persistence_with(&self, message: impl Into<String>) {
        if let Ok(mut failure) = self.persist_failure.write() {
            *failure = Some(message.into());
        }
    }

    /// Make every subsequent notification come back `NotificationFailed`.
    pub fn fail_notifications_with(&self, message: impl Into<String>) {
        if let Ok(mut failure) = self.notification_failure.write() {
            *failure = Some(message.into());
        }
    }

    fn poisoned(effect_kind: EffectKind) -> InterpreterFailure {
        InterpreterFailure::new(effect_kind, "interpreter state lock poisoned")
    }
}

#[async_trait]
impl Interpreter for InMemoryInterpreter {
    async fn handle(
        &self,
        effect: EffectDescription,
    ) -> Result<EffectOutcome, InterpreterFailure> {
        match effect {
            EffectDescription::FetchEntityById {
                entity_kind,
                entity_id,
            } => {
                let entities = self
                    .entities
                    .read()
                    .map_err(|_| Self::poisoned(EffectKind::FetchEntityById))?;
                match entities.get(&entity_id) {
                    Some(entity) if entity.kind() == entity_kind => {
                        Ok(EffectOutcome::EntityFetched(entity.clone()))
                    }
                    // A known id under the wrong family is still not the
                    // requested entity.
                    _ => Ok(EffectOutcome::EntityMissing),
                }
            }
            EffectDescription::PersistEntity { entity } => {
                let failure = self
                    .persist_failure
                    .read()
                    .map_err(|_| Self::poisoned(EffectKind::PersistEntity))?
                    .clone();
                if let Some(message) = failure {
                    return Ok(EffectOutcome::PersistFailed { message });
                }
                let mut entities = self
                    .entities
                    .write()
                    .map_err(|_| Self::poisoned(EffectKind::PersistEntity))?;
                entities.insert(entity.id().clone(), entity);
                Ok(EffectOutcome::EntityPersisted)
            }
            EffectDescription::PublishNotification { notification } => {
                let failure = self
                    .notification_failure
                    .read()
                    .map_err(|_| Self::poisoned(EffectKind::PublishNotification))?
                    .clone();
                if let Some(message) = failure {
                    tracing::warn!(
                        event = %notification.event,
                        message = %message,
                        "dropping notification"
                    );
                    return Ok(EffectOutcome::NotificationFailed { message });
                }
                let mut notifications = self
                    .notifications
                    .write()
                    .map_err(|_| Self::poisoned(EffectKind::PublishNotification))?;
                notifications.push(notification);
                Ok(EffectOutcome::NotificationPublished)
            }
            EffectDescription::RecordAuditEntry { entry } => {
                let mut audit_log = self
                    .audit_log
                    .write()
                    .map_err(|_| Self::poisoned(EffectKind::RecordAuditEntry))?;
                audit_log.push(entry);
                Ok(EffectOutcome::AuditRecorded)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use careflow_types::{
        Appointment, AppointmentStatus, EntityKind, Invoice, InvoiceStatus, PatientId,
    };

    fn appointment() -> Entity {
        Entity::Appointment(Appointment {
            id: EntityId::new("appt-1"),
            patient_id: PatientId::new("patient-1"),
            status: AppointmentStatus::Requested,
        })
    }

    #[tokio::test]
    async fn fetch_returns_the_seeded_entity() {
        let interpreter = InMemoryInterpreter::with_entities([appointment()]);
        let outcome = interpreter
            .handle(EffectDescription::FetchEntityById {
                entity_kind: EntityKind::Appointment,
                entity_id: EntityId::new("appt-1"),
            })
            .await
            .unwrap();
        assert_eq!(outcome, EffectOutcome::EntityFetched(appointment()));
    }

    #[tokio::test]
    async fn fetch_of_unknown_id_is_missing() {
        let interpreter = InMemoryInterpreter::new();
        let outcome = interpreter
            .handle(EffectDescription::FetchEntityById {
                entity_kind: EntityKind::Appointment,
                entity_id: EntityId::new("nope"),
            })
            .await
            .unwrap();
        assert_eq!(outcome, EffectOutcome::EntityMissing);
    }

    #[tokio::test]
    async fn fetch_under_the_wrong_family_is_missing() {
        let interpreter = InMemoryInterpreter::with_entities([appointment()]);
        let outcome = interpreter
            .handle(EffectDescription::FetchEntityById {
                entity_kind: EntityKind::Invoice,
                entity_id: EntityId::new("appt-1"),
            })
            .await
            .unwrap();
        assert_eq!(outcome, EffectOutcome::EntityMissing);
    }

    #[tokio::test]
    async fn persist_stores_the_entity() {
        let interpreter = InMemoryInterpreter::new();
        let invoice = Entity::Invoice(Invoice {
            id: EntityId::new("inv-1"),
            patient_id: PatientId::new("patient-1"),
            status: InvoiceStatus::Draft,
        });
        let outcome = interpreter
            .handle(EffectDescription::PersistEntity {
                entity: invoice.clone(),
            })
            .await
            .unwrap();
        assert_eq!(outcome, EffectOutcome::EntityPersisted);
        assert_eq!(interpreter.entity(&EntityId::new("inv-1")), Some(invoice));
    }

    #[tokio::test]
    async fn injected_persist_failure_is_a_typed_outcome() {
        let interpreter = InMemoryInterpreter::new();
        interpreter.fail_persistence_with("disk full");
        let outcome = interpreter
            .handle(EffectDescription::PersistEntity {
                entity: appointment(),
            })
            .await
            .unwrap();
        assert_eq!(
            outcome,
            EffectOutcome::PersistFailed {
                message: "disk full".to_string()
            }
        );
        // Nothing was stored.
        assert_eq!(interpreter.entity(&EntityId::new("appt-1")), None);
    }
}
