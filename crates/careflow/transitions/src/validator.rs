//! Transition validator: structural legality of status transitions.

use careflow_types::{
    AppointmentStatusKind, EntityStatus, InvoiceStatusKind, LabResultStatusKind,
    PrescriptionStatusKind, StatusKind, TransitionResult,
};

/// Rejection reason for any transition out of a terminal variant.
pub const TERMINAL_STATE_REASON: &str = "terminal state";

/// Legal appointment transitions.
pub const APPOINTMENT_TRANSITIONS: &[(AppointmentStatusKind, AppointmentStatusKind)] = &[
    (AppointmentStatusKind::Requested, AppointmentStatusKind::Confirmed),
    (AppointmentStatusKind::Requested, AppointmentStatusKind::Cancelled),
    (AppointmentStatusKind::Confirmed, AppointmentStatusKind::InProgress),
    (AppointmentStatusKind::Confirmed, AppointmentStatusKind::Cancelled),
    (AppointmentStatusKind::InProgress, AppointmentStatusKind::Completed),
    (AppointmentStatusKind::InProgress, AppointmentStatusKind::Cancelled),
];

/// Legal prescription transitions.
pub const PRESCRIPTION_TRANSITIONS: &[(PrescriptionStatusKind, PrescriptionStatusKind)] = &[
    (PrescriptionStatusKind::Pending, PrescriptionStatusKind::Active),
    (PrescriptionStatusKind::Pending, PrescriptionStatusKind::Cancelled),
    (PrescriptionStatusKind::Active, PrescriptionStatusKind::Completed),
    (PrescriptionStatusKind::Active, PrescriptionStatusKind::Cancelled),
];

/// Legal lab-result transitions.
pub const LAB_RESULT_TRANSITIONS: &[(LabResultStatusKind, LabResultStatusKind)] = &[
    (LabResultStatusKind::Ordered, LabResultStatusKind::InProgress),
    (LabResultStatusKind::Ordered, LabResultStatusKind::Cancelled),
    (LabResultStatusKind::InProgress, LabResultStatusKind::Completed),
    (LabResultStatusKind::InProgress, LabResultStatusKind::Cancelled),
    (LabResultStatusKind::Completed, LabResultStatusKind::Reviewed),
];

/// Legal invoice transitions.
pub const INVOICE_TRANSITIONS: &[(InvoiceStatusKind, InvoiceStatusKind)] = &[
    (InvoiceStatusKind::Draft, InvoiceStatusKind::Issued),
    (InvoiceStatusKind::Draft, InvoiceStatusKind::Voided),
    (InvoiceStatusKind::Issued, InvoiceStatusKind::Paid),
    (InvoiceStatusKind::Issued, InvoiceStatusKind::Voided),
];

/// Decide whether `requested` is a legal successor of `current`.
///
/// Terminal variants reject every request. Any pair absent from the family
/// adjacency table is invalid, which covers reflexive transitions too: no
/// entity family models a no-op transition, so `current == requested` never
/// appears in a table.
pub fn validate(current: &EntityStatus, requested: &EntityStatus) -> TransitionResult {
    let current_kind = current.kind();
    let attempted_kind = requested.kind();

    if current_kind.is_terminal() {
        return TransitionResult::Invalid {
            current: current_kind,
            attempted: attempted_kind,
            reason: TERMINAL_STATE_REASON.to_string(),
        };
    }

    let adjacent = match (current_kind, attempted_kind) {
        (StatusKind::Appointment(from), StatusKind::Appointment(to)) => {
            APPOINTMENT_TRANSITIONS.contains(&(from, to))
        }
        (StatusKind::Prescription(from), StatusKind::Prescription(to)) => {
            PRESCRIPTION_TRANSITIONS.contains(&(from, to))
        }
        (StatusKind::LabResult(from), StatusKind::LabResult(to)) => {
            LAB_RESULT_TRANSITIONS.contains(&(from, to))
        }
        (StatusKind::Invoice(from), StatusKind::Invoice(to)) => {
            INVOICE_TRANSITIONS.contains(&(from, to))
        }
        _ => {
            return TransitionResult::Invalid {
                current: current_kind,
                attempted: attempted_kind,
                reason: "entity family mismatch".to_string(),
            }
        }
    };

    if adjacent {
        TransitionResult::Success(requested.clone())
    } else {
        TransitionResult::Invalid {
            current: current_kind,
            attempted: attempted_kind,
            reason: format!(
                "no transition from {} to {}",
                current_kind.name(),
                attempted_kind.name()
            ),
        }
    }
}
