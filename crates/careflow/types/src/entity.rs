//! Medical entities: identity plus a closed-variant status.

use crate::ids::{EntityId, PatientId};
use crate::status::{
    AppointmentStatus, EntityStatus, InvoiceStatus, LabResultStatus, PrescriptionStatus,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The closed set of entity families.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Appointment,
    Prescription,
    LabResult,
    Invoice,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Appointment,
        EntityKind::Prescription,
        EntityKind::LabResult,
        EntityKind::Invoice,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            EntityKind::Appointment => "appointment",
            EntityKind::Prescription => "prescription",
            EntityKind::LabResult => "lab_result",
            EntityKind::Invoice => "invoice",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: EntityId,
    pub patient_id: PatientId,
    pub status: AppointmentStatus,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Prescription {
    pub id: EntityId,
    pub patient_id: PatientId,
    pub medication: String,
    pub status: PrescriptionStatus,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LabResult {
    pub id: EntityId,
    pub patient_id: PatientId,
    pub test_name: String,
    pub status: LabResultStatus,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: EntityId,
    pub patient_id: PatientId,
    pub status: InvoiceStatus,
}

/// Any medical entity the workflow layer can transition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Entity {
    Appointment(Appointment),
    Prescription(Prescription),
    LabResult(LabResult),
    Invoice(Invoice),
}

impl Entity {
    pub fn id(&self) -> &EntityId {
        match self {
            Entity::Appointment(appointment) => &appointment.id,
            Entity::Prescription(prescription) => &prescription.id,
            Entity::LabResult(lab_result) => &lab_result.id,
            Entity::Invoice(invoice) => &invoice.id,
        }
    }

    pub fn patient_id(&self) -> &PatientId {
        match self {
            Entity::Appointment(appointment) => &appointment.patient_id,
            Entity::Prescription(prescription) => &prescription.patient_id,
            Entity::LabResult(lab_result) => &lab_result.patient_id,
            Entity::Invoice(invoice) => &invoice.patient_id,
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Appointment(_) => EntityKind::Appointment,
            Entity::Prescription(_) => EntityKind::Prescription,
            Entity::LabResult(_) => EntityKind::LabResult,
            Entity::Invoice(_) => EntityKind::Invoice,
        }
    }

    pub fn status(&self) -> EntityStatus {
        match self {
            Entity::Appointment(appointment) => {
                EntityStatus::Appointment(appointment.status.clone())
            }
            Entity::Prescription(prescription) => {
                EntityStatus::Prescription(prescription.status.clone())
            }
            Entity::LabResult(lab_result) => EntityStatus::LabResult(lab_result.status.clone()),
            Entity::Invoice(invoice) => EntityStatus::Invoice(invoice.status.clone()),
        }
    }

    /// Produce the successor entity carrying a validated new status.
    ///
    /// Consumes the superseded value; the status must come from the same
    /// family, which validated-transition output always does.
    pub fn with_status(self, status: EntityStatus) -> Result<Entity, TypeError> {
        match (self, status) {
            (Entity::Appointment(mut appointment), EntityStatus::Appointment(status)) => {
                appointment.status = status;
                Ok(Entity::Appointment(appointment))
            }
            (Entity::Prescription(mut prescription), EntityStatus::Prescription(status)) => {
                prescription.status = status;
                Ok(Entity::Prescription(prescription))
            }
            (Entity::LabResult(mut lab_result), EntityStatus::LabResult(status)) => {
                lab_result.status = status;
                Ok(Entity::LabResult(lab_result))
            }
            (Entity::Invoice(mut invoice), EntityStatus::Invoice(status)) => {
                invoice.status = status;
                Ok(Entity::Invoice(invoice))
            }
            (entity, status) => Err(TypeError::FamilyMismatch {
                entity: entity.kind(),
                status: status.kind().name(),
            }),
        }
    }
}

/// Errors raised when entity and status families disagree.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("status '{status}' does not belong to entity family '{entity}'")]
    FamilyMismatch {
        entity: EntityKind,
        status: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn requested_appointment() -> Entity {
        Entity::Appointment(Appointment {
            id: EntityId::new("appt-1"),
            patient_id: PatientId::new("patient-1"),
            status: AppointmentStatus::Requested,
        })
    }

    #[test]
    fn with_status_replaces_within_family() {
        let confirmed = EntityStatus::Appointment(AppointmentStatus::Confirmed {
            scheduled_time: Utc::now(),
        });
        let updated = requested_appointment().with_status(confirmed.clone()).unwrap();
        assert_eq!(updated.status(), confirmed);
        assert_eq!(updated.id(), &EntityId::new("appt-1"));
    }

    #[test]
    fn with_status_rejects_cross_family_status() {
        let result = requested_appointment()
            .with_status(EntityStatus::Invoice(InvoiceStatus::Draft));
        assert_eq!(
            result,
            Err(TypeError::FamilyMismatch {
                entity: EntityKind::Appointment,
                status: "Draft",
            })
        );
    }
}
