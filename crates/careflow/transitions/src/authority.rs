//! Authority checker: role-based permission for transitions, fail-closed.

use careflow_types::{
    ActorRole, AppointmentStatusKind as Appt, EntityStatus, InvoiceStatusKind as Inv,
    LabResultStatusKind as Lab, PrescriptionStatusKind as Rx, StatusKind,
};

use ActorRole::{BillingClerk, Doctor, LabTechnician, Nurse, Pharmacist, Receptionist};

const fn appt(from: Appt, to: Appt, role: ActorRole) -> (StatusKind, StatusKind, ActorRole) {
    (StatusKind::Appointment(from), StatusKind::Appointment(to), role)
}

const fn rx(from: Rx, to: Rx, role: ActorRole) -> (StatusKind, StatusKind, ActorRole) {
    (StatusKind::Prescription(from), StatusKind::Prescription(to), role)
}

const fn lab(from: Lab, to: Lab, role: ActorRole) -> (StatusKind, StatusKind, ActorRole) {
    (StatusKind::LabResult(from), StatusKind::LabResult(to), role)
}

const fn inv(from: Inv, to: Inv, role: ActorRole) -> (StatusKind, StatusKind, ActorRole) {
    (StatusKind::Invoice(from), StatusKind::Invoice(to), role)
}

/// The complete allow-list of (from, to, role) triples.
///
/// This table is the whole authorization model. Membership grants, absence
/// denies; a variant or role added elsewhere grants nothing until a row
/// naming it lands here.
pub const TRANSITION_AUTHORITY: &[(StatusKind, StatusKind, ActorRole)] = &[
    // Appointments: scheduling is front-desk and clinical staff territory.
    appt(Appt::Requested, Appt::Confirmed, Doctor),
    appt(Appt::Requested, Appt::Confirmed, Receptionist),
    appt(Appt::Requested, Appt::Cancelled, Doctor),
    appt(Appt::Requested, Appt::Cancelled, Receptionist),
    appt(Appt::Confirmed, Appt::InProgress, Doctor),
    appt(Appt::Confirmed, Appt::InProgress, Nurse),
    appt(Appt::Confirmed, Appt::Cancelled, Doctor),
    appt(Appt::Confirmed, Appt::Cancelled, Receptionist),
    appt(Appt::InProgress, Appt::Completed, Doctor),
    appt(Appt::InProgress, Appt::Cancelled, Doctor),
    // Prescriptions: only a pharmacist may dispense (Pending -> Active).
    rx(Rx::Pending, Rx::Active, Pharmacist),
    rx(Rx::Pending, Rx::Cancelled, Doctor),
    rx(Rx::Pending, Rx::Cancelled, Pharmacist),
    rx(Rx::Active, Rx::Completed, Pharmacist),
    rx(Rx::Active, Rx::Cancelled, Doctor),
    rx(Rx::Active, Rx::Cancelled, Pharmacist),
    // Lab results: technicians run the bench, only a doctor signs off.
    lab(Lab::Ordered, Lab::InProgress, LabTechnician),
    lab(Lab::Ordered, Lab::Cancelled, Doctor),
    lab(Lab::Ordered, Lab::Cancelled, LabTechnician),
    lab(Lab::InProgress, Lab::Completed, LabTechnician),
    lab(Lab::InProgress, Lab::Cancelled, LabTechnician),
    lab(Lab::Completed, Lab::Reviewed, Doctor),
    // Invoices: billing desk only.
    inv(Inv::Draft, Inv::Issued, BillingClerk),
    inv(Inv::Draft, Inv::Voided, BillingClerk),
    inv(Inv::Issued, Inv::Paid, BillingClerk),
    inv(Inv::Issued, Inv::Voided, BillingClerk),
];

/// Decide whether `actor_role` may perform `current` -> `requested`.
///
/// A pure membership test over [`TRANSITION_AUTHORITY`]. There is no
/// default-allow branch anywhere in this crate: a combination nobody wrote
/// down is a combination nobody may perform.
pub fn authorize(current: &EntityStatus, requested: &EntityStatus, actor_role: ActorRole) -> bool {
    let triple = (current.kind(), requested.kind(), actor_role);
    TRANSITION_AUTHORITY.contains(&triple)
}
