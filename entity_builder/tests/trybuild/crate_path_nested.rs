//! Trybuild fixture verifying a multi-segment crate path resolves.

mod support {
    pub use entity_builder as runtime;
}

use support::runtime::{Entity, EntityBuilder};

#[derive(Debug, Clone, Default, Entity)]
#[entity(crate = "support::runtime")]
struct Parcel {
    weight: f64,
    label: Option<String>,
}

fn main() {
    let _ = EntityBuilder::<Parcel>::of().and_then(|builder| builder.build());
}
