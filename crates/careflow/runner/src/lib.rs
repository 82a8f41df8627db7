//! CareFlow runner
//!
//! The runner is the only place where suspended workflows meet a live
//! interpreter. Its loop is deliberately dumb: take the next effect the
//! workflow produces, dispatch exactly that effect, resume with the typed
//! outcome. It never reorders, batches, or retries — whatever ordering and
//! delivery guarantees a deployment needs live in the interpreter, not
//! here.
//!
//! The [`memory`] module ships the in-memory reference interpreter used by
//! the demo and by integration-style tests.

#![deny(unsafe_code)]

pub mod memory;
pub mod runner;

pub use memory::InMemoryInterpreter;
pub use runner::{execute_transition, run, RunnerFailure};
