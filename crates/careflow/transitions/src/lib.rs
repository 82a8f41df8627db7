//! CareFlow transition rules
//!
//! Two pure decision functions sit between the entity types and the
//! workflow layer:
//!
//! - [`validate`] — is this transition structurally legal? Decided by an
//!   explicit per-family adjacency table, with terminal variants rejecting
//!   everything.
//! - [`authorize`] — may this role perform this transition? Decided by a
//!   single explicitly enumerated allow-list over (from, to, role) triples.
//!   Anything not listed is denied; there is no permissive fallback arm for
//!   a forgotten variant to fall into.
//!
//! Both are deterministic, O(1), and perform no I/O. The workflow layer
//! calls them between effects; they are also directly usable by anything
//! that needs a legality or permission answer without running a workflow.

#![deny(unsafe_code)]

pub mod authority;
pub mod validator;

pub use authority::{authorize, TRANSITION_AUTHORITY};
pub use validator::{
    validate, APPOINTMENT_TRANSITIONS, INVOICE_TRANSITIONS, LAB_RESULT_TRANSITIONS,
    PRESCRIPTION_TRANSITIONS, TERMINAL_STATE_REASON,
};
