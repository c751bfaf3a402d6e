//! Expansion logic behind the derives.

pub(crate) mod crate_path;
pub(crate) mod entity;
pub(crate) mod enumeration;
