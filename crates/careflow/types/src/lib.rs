//! CareFlow domain types
//!
//! Every medical entity carries a closed-variant status: a fixed set of
//! mutually exclusive states, each holding exactly the data meaningful in
//! that state. There are no stringly-typed statuses and no nullable
//! catch-all records; exhaustive matching over these types is what lets the
//! upper layers encode transition legality and terminal-state immutability
//! at compile time.
//!
//! New status values are produced only as validated-transition output.
//! Superseded values are discarded, never mutated in place.

#![deny(unsafe_code)]

pub mod actor;
pub mod audit;
pub mod entity;
pub mod ids;
pub mod status;

pub use actor::{Actor, ActorRole};
pub use audit::{AuditEntry, AuditOutcome, PurposeOfUse};
pub use entity::{Appointment, Entity, EntityKind, Invoice, LabResult, Prescription, TypeError};
pub use ids::{ActorId, AuditEntryId, CorrelationId, EntityId, PatientId};
pub use status::{
    AppointmentStatus, AppointmentStatusKind, EntityStatus, InvoiceStatus, InvoiceStatusKind,
    LabResultStatus, LabResultStatusKind, PrescriptionStatus, PrescriptionStatusKind, StatusKind,
    TransitionResult,
};
