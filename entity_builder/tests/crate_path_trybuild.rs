//! trybuild coverage for `#[entity(crate = "...")]` support.
//!
//! Ensures the derives accept an aliased runtime crate and that the
//! generated impls resolve every runtime path through the alias.

#[test]
fn crate_path_alias_compiles() {
    let t = trybuild::TestCases::new();
    t.pass("tests/trybuild/crate_path_alias.rs");
    t.pass("tests/trybuild/crate_path_nested.rs");
}
