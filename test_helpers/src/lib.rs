//! Test helpers shared across crates in the `entity_builder` workspace.
//!
//! - [`diagnostics`] records builder diagnostics for assertions.
//! - [`env`] guards process environment mutation, including the variables a
//!   build script reads.
//! - [`source_tree`] lays out throwaway crates for generator tests.

pub mod diagnostics;
pub mod env;
pub mod source_tree;
