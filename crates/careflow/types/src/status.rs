//! Closed-variant status types per entity family.
//!
//! Each family has a payload-carrying status enum plus a payload-free kind
//! enum. The kind enums drive the transition tables and audit entries; the
//! status enums carry the state-specific data (a confirmed appointment has
//! a scheduled time, a completed one has notes, and nothing else).
//!
//! Terminal variants are final: once an entity reaches one, no transition
//! out of it is ever valid. That rule lives in `is_terminal`, checked
//! exhaustively, not by convention.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Appointment ──────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum AppointmentStatus {
    /// Requested by the patient, not yet on the schedule.
    Requested,
    /// On the schedule for a concrete time.
    Confirmed { scheduled_time: DateTime<Utc> },
    /// The visit is underway.
    InProgress,
    /// The visit happened; notes are mandatory.
    Completed { notes: String },
    /// Called off before completion.
    Cancelled { reason: Option<String> },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AppointmentStatusKind {
    Requested,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn kind(&self) -> AppointmentStatusKind {
        match self {
            AppointmentStatus::Requested => AppointmentStatusKind::Requested,
            AppointmentStatus::Confirmed { .. } => AppointmentStatusKind::Confirmed,
            AppointmentStatus::InProgress => AppointmentStatusKind::InProgress,
            AppointmentStatus::Completed { .. } => AppointmentStatusKind::Completed,
            AppointmentStatus::Cancelled { .. } => AppointmentStatusKind::Cancelled,
        }
    }
}

impl AppointmentStatusKind {
    pub const ALL: [AppointmentStatusKind; 5] = [
        AppointmentStatusKind::Requested,
        AppointmentStatusKind::Confirmed,
        AppointmentStatusKind::InProgress,
        AppointmentStatusKind::Completed,
        AppointmentStatusKind::Cancelled,
    ];

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AppointmentStatusKind::Completed | AppointmentStatusKind::Cancelled
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            AppointmentStatusKind::Requested => "Requested",
            AppointmentStatusKind::Confirmed => "Confirmed",
            AppointmentStatusKind::InProgress => "InProgress",
            AppointmentStatusKind::Completed => "Completed",
            AppointmentStatusKind::Cancelled => "Cancelled",
        }
    }
}

// ── Prescription ─────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum PrescriptionStatus {
    /// Written by a doctor, awaiting pharmacist action.
    Pending,
    /// Dispensed and in use.
    Active { dispensed_at: DateTime<Utc> },
    /// Course finished.
    Completed,
    /// Withdrawn before or during the course.
    Cancelled { reason: Option<String> },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrescriptionStatusKind {
    Pending,
    Active,
    Completed,
    Cancelled,
}

impl PrescriptionStatus {
    pub fn kind(&self) -> PrescriptionStatusKind {
        match self {
            PrescriptionStatus::Pending => PrescriptionStatusKind::Pending,
            PrescriptionStatus::Active { .. } => PrescriptionStatusKind::Active,
            PrescriptionStatus::Completed => PrescriptionStatusKind::Completed,
            PrescriptionStatus::Cancelled { .. } => PrescriptionStatusKind::Cancelled,
        }
    }
}

impl PrescriptionStatusKind {
    pub const ALL: [PrescriptionStatusKind; 4] = [
        PrescriptionStatusKind::Pending,
        PrescriptionStatusKind::Active,
        PrescriptionStatusKind::Completed,
        PrescriptionStatusKind::Cancelled,
    ];

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PrescriptionStatusKind::Completed | PrescriptionStatusKind::Cancelled
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            PrescriptionStatusKind::Pending => "Pending",
            PrescriptionStatusKind::Active => "Active",
            PrescriptionStatusKind::Completed => "Completed",
            PrescriptionStatusKind::Cancelled => "Cancelled",
        }
    }
}

// ── Lab result ───────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum LabResultStatus {
    /// Ordered, sample not yet processed.
    Ordered,
    /// Sample is being analyzed.
    InProgress,
    /// Analysis finished, awaiting clinician review.
    Completed { result_summary: String },
    /// Reviewed and signed off by a doctor.
    Reviewed { reviewer_notes: String },
    /// Order withdrawn before completion.
    Cancelled { reason: Option<String> },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LabResultStatusKind {
    Ordered,
    InProgress,
    Completed,
    Reviewed,
    Cancelled,
}

impl LabResultStatus {
    pub fn kind(&self) -> LabResultStatusKind {
        match self {
            LabResultStatus::Ordered => LabResultStatusKind::Ordered,
            LabResultStatus::InProgress => LabResultStatusKind::InProgress,
            LabResultStatus::Completed { .. } => LabResultStatusKind::Completed,
            LabResultStatus::Reviewed { .. } => LabResultStatusKind::Reviewed,
            LabResultStatus::Cancelled { .. } => LabResultStatusKind::Cancelled,
        }
    }
}

impl LabResultStatusKind {
    pub const ALL: [LabResultStatusKind; 5] = [
        LabResultStatusKind::Ordered,
        LabResultStatusKind::InProgress,
        LabResultStatusKind::Completed,
        LabResultStatusKind::Reviewed,
        LabResultStatusKind::Cancelled,
    ];

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            LabResultStatusKind::Reviewed | LabResultStatusKind::Cancelled
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            LabResultStatusKind::Ordered => "Ordered",
            LabResultStatusKind::InProgress => "InProgress",
            LabResultStatusKind::Completed => "Completed",
            LabResultStatusKind::Reviewed => "Reviewed",
            LabResultStatusKind::Cancelled => "Cancelled",
        }
    }
}

// ── Invoice ──────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum InvoiceStatus {
    /// Being prepared, not yet sent to the payer.
    Draft,
    /// Sent to the payer.
    Issued {
        amount_cents: u64,
        due: DateTime<Utc>,
    },
    /// Settled in full.
    Paid { paid_at: DateTime<Utc> },
    /// Annulled; superseded or raised in error.
    Voided { reason: Option<String> },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvoiceStatusKind {
    Draft,
    Issued,
    Paid,
    Voided,
}

impl InvoiceStatus {
    pub fn kind(&self) -> InvoiceStatusKind {
        match self {
            InvoiceStatus::Draft => InvoiceStatusKind::Draft,
            InvoiceStatus::Issued { .. } => InvoiceStatusKind::Issued,
            InvoiceStatus::Paid { .. } => InvoiceStatusKind::Paid,
            InvoiceStatus::Voided { .. } => InvoiceStatusKind::Voided,
        }
    }
}

impl InvoiceStatusKind {
    pub const ALL: [InvoiceStatusKind; 4] = [
        InvoiceStatusKind::Draft,
        InvoiceStatusKind::Issued,
        InvoiceStatusKind::Paid,
        InvoiceStatusKind::Voided,
    ];

    pub fn is_terminal(&self) -> bool {
        matches!(self, InvoiceStatusKind::Paid | InvoiceStatusKind::Voided)
    }

    pub fn name(&self) -> &'static str {
        match self {
            InvoiceStatusKind::Draft => "Draft",
            InvoiceStatusKind::Issued => "Issued",
            InvoiceStatusKind::Paid => "Paid",
            InvoiceStatusKind::Voided => "Voided",
        }
    }
}

// ── Cross-family sums ────────────────────────────────────────────────

/// A status value from any entity family, with its payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum EntityStatus {
    Appointment(AppointmentStatus),
    Prescription(PrescriptionStatus),
    LabResult(LabResultStatus),
    Invoice(InvoiceStatus),
}

impl EntityStatus {
    pub fn kind(&self) -> StatusKind {
        match self {
            EntityStatus::Appointment(status) => StatusKind::Appointment(status.kind()),
            EntityStatus::Prescription(status) => StatusKind::Prescription(status.kind()),
            EntityStatus::LabResult(status) => StatusKind::LabResult(status.kind()),
            EntityStatus::Invoice(status) => StatusKind::Invoice(status.kind()),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.kind().is_terminal()
    }
}

/// A payload-free status discriminant from any entity family.
///
/// This is the currency of the transition tables, the authority allow-list,
/// and audit entries: comparable, copyable, and nameable without dragging
/// state payloads along.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusKind {
    Appointment(AppointmentStatusKind),
    Prescription(PrescriptionStatusKind),
    LabResult(LabResultStatusKind),
    Invoice(InvoiceStatusKind),
}

impl StatusKind {
    pub fn is_terminal(&self) -> bool {
        match self {
            StatusKind::Appointment(kind) => kind.is_terminal(),
            StatusKind::Prescription(kind) => kind.is_terminal(),
            StatusKind::LabResult(kind) => kind.is_terminal(),
            StatusKind::Invoice(kind) => kind.is_terminal(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            StatusKind::Appointment(kind) => kind.name(),
            StatusKind::Prescription(kind) => kind.name(),
            StatusKind::LabResult(kind) => kind.name(),
            StatusKind::Invoice(kind) => kind.name(),
        }
    }
}

impl std::fmt::Display for StatusKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ── Transition result ────────────────────────────────────────────────

/// Outcome of asking the validator whether a transition is legal.
///
/// Always a value, never a panic: an illegal transition is a normal,
/// auditable business outcome.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum TransitionResult {
    /// The transition is structurally legal; carries the new status.
    Success(EntityStatus),
    /// The transition is illegal, naming both sides and why.
    Invalid {
        current: StatusKind,
        attempted: StatusKind,
        reason: String,
    },
}
