//! The runner loop: one interpreter call per produced effect, in order.

use careflow_effects::{EffectKind, EffectOutcome, Interpreter, InterpreterFailure};
use careflow_workflow::{Step, TransitionRequest, TransitionWorkflow, WorkflowError, WorkflowOutcome};
use thiserror::Error;

/// Why a workflow attempt could not produce a business outcome.
///
/// This is the fifth caller-visible outcome, alongside the four
/// [`WorkflowOutcome`] variants. It is fatal for the attempt; the core
/// defines no retry policy.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum RunnerFailure {
    /// The interpreter could not fulfill an effect, or the store refused a
    /// persist.
    #[error("effect {effect_kind} failed: {message}")]
    Effect {
        effect_kind: EffectKind,
        message: String,
    },
    /// The suspension protocol was violated (wrong reply type, resumption
    /// after completion, mismatched entity).
    #[error("workflow protocol violated: {0}")]
    Protocol(WorkflowError),
}

impl From<InterpreterFailure> for RunnerFailure {
    fn from(failure: InterpreterFailure) -> Self {
        RunnerFailure::Effect {
            effect_kind: failure.effect_kind,
            message: failure.message,
        }
    }
}

impl From<WorkflowError> for RunnerFailure {
    fn from(error: WorkflowError) -> Self {
        match error {
            WorkflowError::PersistenceFailed { message } => RunnerFailure::Effect {
                effect_kind: EffectKind::PersistEntity,
                message,
            },
            other => RunnerFailure::Protocol(other),
        }
    }
}

/// Drive `workflow` to completion against `interpreter`.
///
/// Invariant: exactly one interpreter call per produced effect, strictly in
/// production order. On interpreter failure the loop stops without
/// resuming the workflow again.
pub async fn run<I>(
    mut workflow: TransitionWorkflow,
    interpreter: &I,
) -> Result<WorkflowOutcome, RunnerFailure>
where
    I: Interpreter + ?Sized,
{
    let correlation_id = workflow.correlation_id().clone();
    let mut reply: Option<EffectOutcome> = None;

    loop {
        match workflow.advance(reply.take())? {
            Step::Done(outcome) => {
                tracing::info!(
                    correlation_id = %correlation_id,
                    outcome = ?outcome,
                    "workflow finished"
                );
                return Ok(outcome);
            }
            Step::Suspend(effect) => {
                let effect_kind = effect.kind();
                tracing::debug!(
                    correlation_id = %correlation_id,
                    effect = %effect_kind,
                    "dispatching effect"
                );
                let outcome = interpreter.handle(effect).await?;
                if let EffectOutcome::NotificationFailed { message } = &outcome {
                    // Non-fatal side channel; the transition stands.
                    tracing::warn!(
                        correlation_id = %correlation_id,
                        message = %message,
                        "notification delivery failed"
                    );
                }
                reply = Some(outcome);
            }
        }
    }
}

/// Build and run the transition workflow for `request` in one call.
pub async fn execute_transition<I>(
    request: TransitionRequest,
    interpreter: &I,
) -> Result<WorkflowOutcome, RunnerFailure>
where
    I: Interpreter + ?Sized,
{
    run(TransitionWorkflow::new(request), interpreter).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryInterpreter;
    use async_trait::async_trait;
    use careflow_effects::EffectDescription;
    use careflow_types::{
        Actor, ActorRole, Appointment, AppointmentStatus, AuditOutcome, Entity, EntityId,
        EntityKind, EntityStatus, LabResult, LabResultStatus, PatientId, Prescription,
        PrescriptionStatus, PurposeOfUse,
    };
    use chrono::Utc;
    use std::sync::Mutex;

    fn requested_appointment() -> Entity {
        Entity::Appointment(Appointment {
            id: EntityId::new("appt-1"),
            patient_id: PatientId::new("patient-1"),
            status: AppointmentStatus::Requested,
        })
    }

    fn confirm_request(scheduled_time: chrono::DateTime<Utc>) -> TransitionRequest {
        TransitionRequest::new(
            EntityKind::Appointment,
            EntityId::new("appt-1"),
            EntityStatus::Appointment(AppointmentStatus::Confirmed { scheduled_time }),
            Actor::new("dr-osei", ActorRole::Doctor),
            PurposeOfUse::Treatment,
        )
    }

    /// Wraps another interpreter and records the order of dispatched
    /// effect kinds.
    struct RecordingInterpreter<I> {
        inner: I,
        dispatched: Mutex<Vec<EffectKind>>,
    }

    impl<I> RecordingInterpreter<I> {
        fn new(inner: I) -> Self {
            Self {
                inner,
                dispatched: Mutex::new(Vec::new()),
            }
        }

        fn dispatched(&self) -> Vec<EffectKind> {
            self.dispatched.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl<I: Interpreter> Interpreter for RecordingInterpreter<I> {
        async fn handle(
            &self,
            effect: EffectDescription,
        ) -> Result<EffectOutcome, InterpreterFailure> {
            self.dispatched.lock().unwrap().push(effect.kind());
            let outcome = self.inner.handle(effect).await?;
            Ok(outcome)
        }
    }

    #[tokio::test]
    async fn scenario_confirming_a_requested_appointment_succeeds() {
        let interpreter = InMemoryInterpreter::new();
        interpreter.insert_entity(requested_appointment());

        let scheduled_time = Utc::now();
        let outcome = execute_transition(confirm_request(scheduled_time), &interpreter)
            .await
            .unwrap();

        assert_eq!(
            outcome,
            WorkflowOutcome::Success(EntityStatus::Appointment(AppointmentStatus::Confirmed {
                scheduled_time
            }))
        );

        // Persisted status matches, and exactly one success audit exists.
        let stored = interpreter.entity(&EntityId::new("appt-1")).unwrap();
        assert_eq!(
            stored.status(),
            EntityStatus::Appointment(AppointmentStatus::Confirmed { scheduled_time })
        );
        let audits = interpreter.audit_log();
        assert_eq!(audits.len(), 1);
        assert_eq!(audits[0].outcome, AuditOutcome::Success);
        assert_eq!(audits[0].previous_status.name(), "Requested");
        assert_eq!(audits[0].attempted_status.name(), "Confirmed");
        assert_eq!(interpreter.notifications().len(), 1);
    }

    #[tokio::test]
    async fn scenario_terminal_appointment_rejects_cancellation() {
        let interpreter = RecordingInterpreter::new(InMemoryInterpreter::new());
        interpreter.inner.insert_entity(Entity::Appointment(Appointment {
            id: EntityId::new("appt-1"),
            patient_id: PatientId::new("patient-1"),
            status: AppointmentStatus::Completed {
                notes: "seen".to_string(),
            },
        }));

        let request = TransitionRequest::new(
            EntityKind::Appointment,
            EntityId::new("appt-1"),
            EntityStatus::Appointment(AppointmentStatus::Cancelled { reason: None }),
            Actor::new("rec-1", ActorRole::Receptionist),
            PurposeOfUse::Operations,
        );
        let outcome = execute_transition(request, &interpreter).await.unwrap();

        assert_eq!(
            outcome,
            WorkflowOutcome::Rejected {
                reason: "terminal state".to_string()
            }
        );

        // One rejection audit, and no persistence effect was ever issued.
        let audits = interpreter.inner.audit_log();
        assert_eq!(audits.len(), 1);
        assert_eq!(audits[0].outcome, AuditOutcome::Rejected);
        assert_eq!(
            interpreter.dispatched(),
            vec![EffectKind::FetchEntityById, EffectKind::RecordAuditEntry]
        );
    }

    #[tokio::test]
    async fn scenario_doctor_cannot_dispense_prescription() {
        let interpreter = InMemoryInterpreter::new();
        interpreter.insert_entity(Entity::Prescription(Prescription {
            id: EntityId::new("rx-1"),
            patient_id: PatientId::new("patient-1"),
            medication: "amoxicillin".to_string(),
            status: PrescriptionStatus::Pending,
        }));

        let request = TransitionRequest::new(
            EntityKind::Prescription,
            EntityId::new("rx-1"),
            EntityStatus::Prescription(PrescriptionStatus::Active {
                dispensed_at: Utc::now(),
            }),
            Actor::new("dr-osei", ActorRole::Doctor),
            PurposeOfUse::Treatment,
        );
        let outcome = execute_transition(request, &interpreter).await.unwrap();

        assert_eq!(outcome, WorkflowOutcome::Unauthorized);
        let audits = interpreter.audit_log();
        assert_eq!(audits.len(), 1);
        assert_eq!(audits[0].outcome, AuditOutcome::Unauthorized);

        // The prescription was left untouched.
        let stored = interpreter.entity(&EntityId::new("rx-1")).unwrap();
        assert_eq!(
            stored.status(),
            EntityStatus::Prescription(PrescriptionStatus::Pending)
        );
    }

    #[tokio::test]
    async fn scenario_notification_failure_keeps_the_success() {
        let interpreter = InMemoryInterpreter::new();
        interpreter.insert_entity(Entity::LabResult(LabResult {
            id: EntityId::new("lab-1"),
            patient_id: PatientId::new("patient-1"),
            test_name: "CBC".to_string(),
            status: LabResultStatus::Completed {
                result_summary: "within range".to_string(),
            },
        }));
        interpreter.fail_notifications_with("broker unreachable");

        let request = TransitionRequest::new(
            EntityKind::LabResult,
            EntityId::new("lab-1"),
            EntityStatus::LabResult(LabResultStatus::Reviewed {
                reviewer_notes: "signed off".to_string(),
            }),
            Actor::new("dr-osei", ActorRole::Doctor),
            PurposeOfUse::Treatment,
        );
        let outcome = execute_transition(request, &interpreter).await.unwrap();

        assert!(matches!(outcome, WorkflowOutcome::Success(_)));
        // Nothing was delivered, but the success audit still exists.
        assert!(interpreter.notifications().is_empty());
        let audits = interpreter.audit_log();
        assert_eq!(audits.len(), 1);
        assert_eq!(audits[0].outcome, AuditOutcome::Success);
    }

    #[tokio::test]
    async fn missing_entity_reports_not_found() {
        let interpreter = InMemoryInterpreter::new();
        let outcome = execute_transition(confirm_request(Utc::now()), &interpreter)
            .await
            .unwrap();
        assert_eq!(outcome, WorkflowOutcome::NotFound);
        assert!(interpreter.audit_log().is_empty());
    }

    #[tokio::test]
    async fn effects_are_dispatched_in_production_order() {
        let interpreter = RecordingInterpreter::new(InMemoryInterpreter::new());
        interpreter.inner.insert_entity(requested_appointment());

        execute_transition(confirm_request(Utc::now()), &interpreter)
            .await
            .unwrap();

        assert_eq!(
            interpreter.dispatched(),
            vec![
                EffectKind::FetchEntityById,
                EffectKind::PersistEntity,
                EffectKind::PublishNotification,
                EffectKind::RecordAuditEntry,
            ]
        );
    }

    #[tokio::test]
    async fn persist_failure_becomes_a_runner_failure_without_success_audit() {
        let interpreter = RecordingInterpreter::new(InMemoryInterpreter::new());
        interpreter.inner.insert_entity(requested_appointment());
        interpreter.inner.fail_persistence_with("version conflict");

        let result = execute_transition(confirm_request(Utc::now()), &interpreter).await;

        assert_eq!(
            result,
            Err(RunnerFailure::Effect {
                effect_kind: EffectKind::PersistEntity,
                message: "version conflict".to_string(),
            })
        );
        // The loop stopped at the persist effect: no notification, no audit.
        assert_eq!(
            interpreter.dispatched(),
            vec![EffectKind::FetchEntityById, EffectKind::PersistEntity]
        );
        assert!(interpreter.inner.audit_log().is_empty());
        // The stored entity still carries its old status.
        let stored = interpreter.inner.entity(&EntityId::new("appt-1")).unwrap();
        assert_eq!(
            stored.status(),
            EntityStatus::Appointment(AppointmentStatus::Requested)
        );
    }

    /// An interpreter that fails outright on a chosen effect kind.
    struct FailingInterpreter {
        inner: InMemoryInterpreter,
        fail_on: EffectKind,
    }

    #[async_trait]
    impl Interpreter for FailingInterpreter {
        async fn handle(
            &self,
            effect: EffectDescription,
        ) -> Result<EffectOutcome, InterpreterFailure> {
            if effect.kind() == self.fail_on {
                return Err(InterpreterFailure::new(self.fail_on, "backend timed out"));
            }
            self.inner.handle(effect).await
        }
    }

    #[tokio::test]
    async fn interpreter_failure_stops_the_loop() {
        let interpreter = FailingInterpreter {
            inner: InMemoryInterpreter::new(),
            fail_on: EffectKind::FetchEntityById,
        };
        interpreter.inner.insert_entity(requested_appointment());

        let result = execute_transition(confirm_request(Utc::now()), &interpreter).await;
        assert_eq!(
            result,
            Err(RunnerFailure::Effect {
                effect_kind: EffectKind::FetchEntityById,
                message: "backend timed out".to_string(),
            })
        );
    }
}
