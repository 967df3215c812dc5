//! Operator-level commands over [`CoreState`](crate::core_state::CoreState).
//!
//! Errors come back as display strings, ready to show the operator.

pub mod history;
pub mod labels;
