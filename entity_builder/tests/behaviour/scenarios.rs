//! Binds the `entity_builder` behavioural feature files to the step registry.

use crate::fixtures::{BuildContext, build_context};
use rstest_bdd_macros::scenarios;

scenarios!(
    "tests/features/runtime_builder.feature",
    fixtures = [build_context: BuildContext]
);
scenarios!(
    "tests/features/inheritance.feature",
    fixtures = [build_context: BuildContext]
);
