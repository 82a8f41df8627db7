//! CareFlow Transition Demo
//!
//! Runs four clinical transition attempts through the in-memory
//! interpreter: a routine success, a terminal-state rejection, a
//! fail-closed authorization denial, and the authorized retry. Finishes
//! by printing the audit trail the attempts produced.

use careflow_runner::{execute_transition, InMemoryInterpreter, RunnerFailure};
use careflow_types::{
    Actor, ActorRole, Appointment, AppointmentStatus, Entity, EntityId, EntityKind, EntityStatus,
    PatientId, Prescription, PrescriptionStatus, PurposeOfUse,
};
use careflow_workflow::{TransitionRequest, WorkflowOutcome};
use chrono::{Duration, Utc};

use colored::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    println!(
        "{}",
        "╔══════════════════════════════════════════════════════════════════╗".cyan()
    );
    println!(
        "{}",
        "║              CareFlow Clinical Transition Demonstration          ║".cyan()
    );
    println!(
        "{}",
        "║                                                                  ║".cyan()
    );
    println!(
        "{}",
        "║  Every attempt leaves an audit record: successes, rejections,    ║".cyan()
    );
    println!(
        "{}",
        "║  and authorization denials alike.                                ║".cyan()
    );
    println!(
        "{}",
        "╚══════════════════════════════════════════════════════════════════╝".cyan()
    );
    println!();

    let interpreter = InMemoryInterpreter::new();
    interpreter.insert_entity(Entity::Appointment(Appointment {
        id: EntityId::new("appt-1001"),
        patient_id: PatientId::new("patient-ade"),
        status: AppointmentStatus::Requested,
    }));
    interpreter.insert_entity(Entity::Appointment(Appointment {
        id: EntityId::new("appt-0942"),
        patient_id: PatientId::new("patient-ade"),
        status: AppointmentStatus::Completed {
            notes: "annual physical, no findings".to_string(),
        },
    }));
    interpreter.insert_entity(Entity::Prescription(Prescription {
        id: EntityId::new("rx-3310"),
        patient_id: PatientId::new("patient-ade"),
        medication: "amoxicillin 500mg".to_string(),
        status: PrescriptionStatus::Pending,
    }));

    demo_confirm_appointment(&interpreter).await?;
    println!();

    demo_terminal_rejection(&interpreter).await?;
    println!();

    demo_fail_closed_dispense(&interpreter).await?;
    println!();

    print_audit_trail(&interpreter);

    println!();
    println!("{}", "Demo complete!".green().bold());
    Ok(())
}

async fn demo_confirm_appointment(
    interpreter: &InMemoryInterpreter,
) -> Result<(), RunnerFailure> {
    section("Scenario 1: A doctor confirms a requested appointment");

    let request = TransitionRequest::new(
        EntityKind::Appointment,
        EntityId::new("appt-1001"),
        EntityStatus::Appointment(AppointmentStatus::Confirmed {
            scheduled_time: Utc::now() + Duration::days(2),
        }),
        Actor::new("dr-osei", ActorRole::Doctor),
        PurposeOfUse::Treatment,
    );

    let outcome = execute_transition(request, interpreter).await?;
    print_outcome(&outcome);
    println!(
        "    {} the confirmed status was persisted and a notification published",
        "→".cyan()
    );
    Ok(())
}

async fn demo_terminal_rejection(
    interpreter: &InMemoryInterpreter,
) -> Result<(), RunnerFailure> {
    section("Scenario 2: Cancelling a completed appointment is rejected");

    let request = TransitionRequest::new(
        EntityKind::Appointment,
        EntityId::new("appt-0942"),
        EntityStatus::Appointment(AppointmentStatus::Cancelled {
            reason: Some("patient moved away".to_string()),
        }),
        Actor::new("rec-ibrahim", ActorRole::Receptionist),
        PurposeOfUse::Operations,
    );

    let outcome = execute_transition(request, interpreter).await?;
    print_outcome(&outcome);
    println!(
        "    {} completed appointments are terminal; nothing was persisted",
        "→".cyan()
    );
    Ok(())
}

async fn demo_fail_closed_dispense(
    interpreter: &InMemoryInterpreter,
) -> Result<(), RunnerFailure> {
    section("Scenario 3: Only pharmacists may dispense a prescription");

    let dispense = |actor: Actor| {
        TransitionRequest::new(
            EntityKind::Prescription,
            EntityId::new("rx-3310"),
            EntityStatus::Prescription(PrescriptionStatus::Active {
                dispensed_at: Utc::now(),
            }),
            actor,
            PurposeOfUse::Treatment,
        )
    };

    println!("  {} tries to dispense:", "Doctor".blue().bold());
    let outcome =
        execute_transition(dispense(Actor::new("dr-osei", ActorRole::Doctor)), interpreter).await?;
    print_outcome(&outcome);
    println!(
        "    {} no allow-list row grants doctors this transition, so it is denied",
        "→".cyan()
    );

    println!();
    println!("  {} tries to dispense:", "Pharmacist".green().bold());
    let outcome = execute_transition(
        dispense(Actor::new("ph-chen", ActorRole::Pharmacist)),
        interpreter,
    )
    .await?;
    print_outcome(&outcome);
    Ok(())
}

fn print_audit_trail(interpreter: &InMemoryInterpreter) {
    section("Audit trail");

    for entry in interpreter.audit_log() {
        let outcome = match entry.outcome.name() {
            "success" => "success".green(),
            "rejected" => "rejected".yellow(),
            other => other.red(),
        };
        println!(
            "  [{}] {} {} by {} ({}): {} -> {}{}",
            outcome,
            entry.entity_kind,
            entry.entity_id,
            entry.actor.id,
            entry.actor.role.name(),
            entry.previous_status.name(),
            entry.attempted_status.name(),
            entry
                .reason
                .as_deref()
                .map(|reason| format!("  ({reason})"))
                .unwrap_or_default(),
        );
    }
}

fn section(title: &str) {
    println!(
        "{}",
        "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━".yellow()
    );
    println!("  {}", title.yellow().bold());
    println!(
        "{}",
        "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━".yellow()
    );
    println!();
}

fn print_outcome(outcome: &WorkflowOutcome) {
    match outcome {
        WorkflowOutcome::Success(status) => {
            println!(
                "  {} new status: {}",
                "SUCCESS".green().bold(),
                status.kind().name()
            );
        }
        WorkflowOutcome::Rejected { reason } => {
            println!("  {} {}", "REJECTED".yellow().bold(), reason);
        }
        WorkflowOutcome::Unauthorized => {
            println!("  {}", "UNAUTHORIZED".red().bold());
        }
        WorkflowOutcome::NotFound => {
            println!("  {}", "NOT FOUND".red().bold());
        }
    }
}
