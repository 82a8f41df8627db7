//! Actors: who is attempting a transition, and in what role.

use crate::ids::ActorId;
use serde::{Deserialize, Serialize};

/// The closed set of staff roles known to the authority checker.
///
/// Adding a role here grants nothing by itself: the authority allow-list
/// must name the role explicitly before any transition is permitted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActorRole {
    Doctor,
    Nurse,
    Pharmacist,
    LabTechnician,
    Receptionist,
    BillingClerk,
}

impl ActorRole {
    /// Every role, for exhaustive enumeration in tests and admin surfaces.
    pub const ALL: [ActorRole; 6] = [
        ActorRole::Doctor,
        ActorRole::Nurse,
        ActorRole::Pharmacist,
        ActorRole::LabTechnician,
        ActorRole::Receptionist,
        ActorRole::BillingClerk,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ActorRole::Doctor => "doctor",
            ActorRole::Nurse => "nurse",
            ActorRole::Pharmacist => "pharmacist",
            ActorRole::LabTechnician => "lab_technician",
            ActorRole::Receptionist => "receptionist",
            ActorRole::BillingClerk => "billing_clerk",
        }
    }
}

impl std::fmt::Display for ActorRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// An identified actor together with the role they are acting under.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: ActorId,
    pub role: ActorRole,
}

impl Actor {
    pub fn new(id: impl Into<String>, role: ActorRole) -> Self {
        Self {
            id: ActorId::new(id),
            role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_covers_every_role() {
        // A new role must be added to ALL before the exhaustive
        // authority tests can see it.
        for role in ActorRole::ALL {
            assert!(!role.name().is_empty());
        }
        assert_eq!(ActorRole::ALL.len(), 6);
    }
}
