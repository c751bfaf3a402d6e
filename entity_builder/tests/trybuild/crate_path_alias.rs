//! Trybuild fixture verifying `#[entity(crate = "...")]` works with a
//! dependency renamed through `use ... as`.

use entity_builder as fixtures;
use fixtures::{Entity, EntityBuilder, EntityEnum};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, EntityEnum)]
#[entity(crate = "fixtures")]
enum Tier {
    #[default]
    Free,
    Paid,
}

#[derive(Debug, Clone, Default, Entity)]
#[entity(crate = "fixtures")]
struct Account {
    owner: String,
    tier: Tier,
}

fn main() {
    let built: Result<Account, fixtures::EntityBuilderError> =
        EntityBuilder::<Account>::of().and_then(|builder| builder.with("tier", Tier::Paid)?.build());
    let _ = built;
}
