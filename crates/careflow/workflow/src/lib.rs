//! CareFlow workflow definitions
//!
//! A workflow is a deterministic, single-threaded cooperative sequence. It
//! owns no connections and performs no I/O: whenever it needs external data
//! or must trigger an external action it suspends, handing the caller an
//! effect description, and continues only when resumed with that effect's
//! outcome.
//!
//! The suspension protocol is an explicit state object rather than a
//! coroutine: [`TransitionWorkflow::advance`] returns either
//! `Step::Suspend(effect)` or `Step::Done(outcome)`. The first call takes
//! no reply; every later call must supply the outcome of the effect issued
//! by the previous step. A reply of the wrong type, or a resumption after
//! completion, is a [`WorkflowError`] — surfaced, never swallowed.
//!
//! Every transition attempt — accepted, rejected, or unauthorized — emits
//! exactly one audit-record effect before the workflow finishes.

#![deny(unsafe_code)]

pub mod machine;
pub mod request;

pub use machine::{Step, TransitionWorkflow, WorkflowError, WorkflowOutcome};
pub use request::TransitionRequest;
