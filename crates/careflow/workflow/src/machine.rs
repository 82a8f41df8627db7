//! The transition workflow state machine.
//!
//! One instance drives one transition attempt end to end:
//!
//! ```text
//! fetch entity ──missing──────────────────────────▶ Done(NotFound)
//!      │
//!      ▼
//! validate (pure) ──invalid──▶ rejection audit ───▶ Done(Rejected)
//!      │
//!      ▼
//! authorize (pure) ──deny──▶ unauthorized audit ──▶ Done(Unauthorized)
//!      │
//!      ▼
//! persist ──failed──▶ error (no success audit is ever emitted)
//!      │
//!      ▼
//! notify (non-fatal) ──▶ success audit ──────────▶ Done(Success)
//! ```
//!
//! Steps are strictly ordered and never interleave with another instance's
//! steps; instances share no mutable state. Guarding two concurrent
//! attempts on the same entity is the persistence layer's job, which is why
//! a refused write comes back as a typed `PersistFailed` outcome.

use careflow_effects::{EffectDescription, EffectKind, EffectOutcome, Notification};
use careflow_transitions::{authorize, validate};
use careflow_types::{
    AuditEntry, AuditOutcome, CorrelationId, Entity, EntityId, EntityStatus, StatusKind,
    TransitionResult, TypeError,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::request::TransitionRequest;

/// What `advance` hands back: either an effect to fulfill or the final
/// outcome.
#[derive(Clone, Debug, PartialEq)]
pub enum Step {
    Suspend(EffectDescription),
    Done(WorkflowOutcome),
}

/// The business-level result of a transition attempt.
///
/// Together with the runner's failure type these are the five disjoint
/// outcomes a caller must handle; none is ever represented as absence.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum WorkflowOutcome {
    /// Validated, authorized, persisted, and audited.
    Success(EntityStatus),
    /// The validator refused the transition.
    Rejected { reason: String },
    /// The authority checker denied the actor's role.
    Unauthorized,
    /// The entity does not exist.
    NotFound,
}

/// Protocol and infrastructure errors a workflow can surface.
///
/// These never encode business rejections — those are [`WorkflowOutcome`]
/// variants. The runner wraps each of these into its own failure type.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum WorkflowError {
    #[error("the first call to advance takes no reply")]
    NotStarted,
    #[error("workflow is suspended on {expected}; a reply is required")]
    MissingReply { expected: EffectKind },
    #[error("reply does not answer the pending {expected} effect")]
    UnexpectedReply { expected: EffectKind },
    #[error("interpreter returned entity '{got}' but '{expected}' was requested")]
    EntityMismatch { expected: EntityId, got: EntityId },
    #[error("workflow already completed")]
    AlreadyComplete,
    #[error("persistence failed: {message}")]
    PersistenceFailed { message: String },
    #[error(transparent)]
    Type(#[from] TypeError),
}

/// Where the workflow is suspended, with the data the next step needs.
#[derive(Clone, Debug)]
enum State {
    NotStarted,
    AwaitingEntity,
    AwaitingRejectionAudit {
        reason: String,
    },
    AwaitingUnauthorizedAudit,
    AwaitingPersist {
        new_status: EntityStatus,
        previous: StatusKind,
    },
    AwaitingNotification {
        new_status: EntityStatus,
        previous: StatusKind,
    },
    AwaitingSuccessAudit {
        new_status: EntityStatus,
    },
    Complete,
}

impl State {
    /// The effect kind whose outcome this state is waiting for, if any.
    fn pending_kind(&self) -> Option<EffectKind> {
        match self {
            State::NotStarted | State::Complete => None,
            State::AwaitingEntity => Some(EffectKind::FetchEntityById),
            State::AwaitingPersist { .. } => Some(EffectKind::PersistEntity),
            State::AwaitingNotification { .. } => Some(EffectKind::PublishNotification),
            State::AwaitingRejectionAudit { .. }
            | State::AwaitingUnauthorizedAudit
            | State::AwaitingSuccessAudit { .. } => Some(EffectKind::RecordAuditEntry),
        }
    }
}

/// The explicit suspend/resume state object for one transition attempt.
#[derive(Clone, Debug)]
pub struct TransitionWorkflow {
    request: TransitionRequest,
    correlation_id: CorrelationId,
    state: State,
}

impl TransitionWorkflow {
    pub fn new(request: TransitionRequest) -> Self {
        let correlation_id = request
            .correlation_id
            .clone()
            .unwrap_or_else(CorrelationId::generate);
        Self {
            request,
            correlation_id,
            state: State::NotStarted,
        }
    }

    /// The correlation id every effect and audit entry of this attempt
    /// carries.
    pub fn correlation_id(&self) -> &CorrelationId {
        &self.correlation_id
    }

    /// Advance the workflow one step.
    ///
    /// The first call takes `None` and yields the fetch effect. Every later
    /// call must supply the outcome of the effect issued by the previous
    /// step; the reply's type is checked against the pending effect before
    /// any of it is used.
    pub fn advance(&mut self, reply: Option<EffectOutcome>) -> Result<Step, WorkflowError> {
        match std::mem::replace(&mut self.state, State::Complete) {
            State::NotStarted => {
                if reply.is_some() {
                    return Err(WorkflowError::NotStarted);
                }
                self.state = State::AwaitingEntity;
                Ok(Step::Suspend(EffectDescription::FetchEntityById {
                    entity_kind: self.request.entity_kind,
                    entity_id: self.request.entity_id.clone(),
                }))
            }
            State::Complete => Err(WorkflowError::AlreadyComplete),
            state => {
                // pending_kind is Some for every awaiting state.
                let Some(expected) = state.pending_kind() else {
                    return Err(WorkflowError::AlreadyComplete);
                };
                let Some(reply) = reply else {
                    return Err(WorkflowError::MissingReply { expected });
                };
                if !reply.answers(expected) {
                    return Err(WorkflowError::UnexpectedReply { expected });
                }
                self.resume(state, reply, expected)
            }
        }
    }

    fn resume(
        &mut self,
        state: State,
        reply: EffectOutcome,
        expected: EffectKind,
    ) -> Result<Step, WorkflowError> {
        match (state, reply) {
            (State::AwaitingEntity, EffectOutcome::EntityFetched(entity)) => {
                self.inspect_entity(entity)
            }
            (State::AwaitingEntity, EffectOutcome::EntityMissing) => {
                Ok(Step::Done(WorkflowOutcome::NotFound))
            }
            (State::AwaitingRejectionAudit { reason }, EffectOutcome::AuditRecorded) => {
                Ok(Step::Done(WorkflowOutcome::Rejected { reason }))
            }
            (State::AwaitingUnauthorizedAudit, EffectOutcome::AuditRecorded) => {
                Ok(Step::Done(WorkflowOutcome::Unauthorized))
            }
            (
                State::AwaitingPersist {
                    new_status,
                    previous,
                },
                EffectOutcome::EntityPersisted,
            ) => {
                let notification = self.notification(&new_status);
                self.state = State::AwaitingNotification {
                    new_status,
                    previous,
                };
                Ok(Step::Suspend(EffectDescription::PublishNotification {
                    notification,
                }))
            }
            (State::AwaitingPersist { .. }, EffectOutcome::PersistFailed { message }) => {
                // The transition was never durable; no success audit may
                // exist for it.
                Err(WorkflowError::PersistenceFailed { message })
            }
            (
                State::AwaitingNotification {
                    new_status,
                    previous,
                },
                EffectOutcome::NotificationPublished | EffectOutcome::NotificationFailed { .. },
            ) => {
                // Delivery failure is a side-channel concern; the persisted
                // transition stands either way.
                let entry = self.audit(
                    previous,
                    new_status.kind(),
                    AuditOutcome::Success,
                    self.request.reason.clone(),
                );
                self.state = State::AwaitingSuccessAudit { new_status };
                Ok(Step::Suspend(EffectDescription::RecordAuditEntry { entry }))
            }
            (State::AwaitingSuccessAudit { new_status }, EffectOutcome::AuditRecorded) => {
                Ok(Step::Done(WorkflowOutcome::Success(new_status)))
            }
            // `answers` already filtered these; keep the protocol honest
            // anyway rather than panicking.
            _ => Err(WorkflowError::UnexpectedReply { expected }),
        }
    }

    /// Validate and authorize against the freshly fetched entity.
    fn inspect_entity(&mut self, entity: Entity) -> Result<Step, WorkflowError> {
        if entity.id() != &self.request.entity_id {
            return Err(WorkflowError::EntityMismatch {
                expected: self.request.entity_id.clone(),
                got: entity.id().clone(),
            });
        }

        let current = entity.status();
        match validate(&current, &self.request.target) {
            TransitionResult::Invalid {
                current,
                attempted,
                reason,
            } => {
                let entry = self.audit(
                    current,
                    attempted,
                    AuditOutcome::Rejected,
                    Some(reason.clone()),
                );
                self.state = State::AwaitingRejectionAudit { reason };
                Ok(Step::Suspend(EffectDescription::RecordAuditEntry { entry }))
            }
            TransitionResult::Success(new_status) => {
                if !authorize(&current, &self.request.target, self.request.actor.role) {
                    let entry = self.audit(
                        current.kind(),
                        new_status.kind(),
                        AuditOutcome::Unauthorized,
                        Some(format!(
                            "role '{}' may not perform this transition",
                            self.request.actor.role
                        )),
                    );
                    self.state = State::AwaitingUnauthorizedAudit;
                    return Ok(Step::Suspend(EffectDescription::RecordAuditEntry { entry }));
                }

                let previous = current.kind();
                let updated = entity.with_status(new_status.clone())?;
                self.state = State::AwaitingPersist {
                    new_status,
                    previous,
                };
                Ok(Step::Suspend(EffectDescription::PersistEntity {
                    entity: updated,
                }))
            }
        }
    }

    fn audit(
        &self,
        previous: StatusKind,
        attempted: StatusKind,
        outcome: AuditOutcome,
        reason: Option<String>,
    ) -> AuditEntry {
        let entry = AuditEntry::new(
            self.request.entity_kind,
            self.request.entity_id.clone(),
            self.request.actor.clone(),
            previous,
            attempted,
            outcome,
            self.request.purpose_of_use,
            self.correlation_id.clone(),
        );
        match reason {
            Some(reason) => entry.with_reason(reason),
            None => entry,
        }
    }

    fn notification(&self, new_status: &EntityStatus) -> Notification {
        let status_name = new_status.kind().name().to_lowercase();
        Notification {
            entity_kind: self.request.entity_kind,
            entity_id: self.request.entity_id.clone(),
            event: format!("{}.{}", self.request.entity_kind.name(), status_name),
            message: format!(
                "{} {} is now {}",
                self.request.entity_kind.name(),
                self.request.entity_id,
                new_status.kind().name()
            ),
            correlation_id: self.correlation_id.clone(),
        }
    }
}
