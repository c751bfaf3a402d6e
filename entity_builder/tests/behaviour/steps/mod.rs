//! Behavioural step modules registered with `rstest-bdd`.

pub mod build_steps;
pub mod override_steps;
