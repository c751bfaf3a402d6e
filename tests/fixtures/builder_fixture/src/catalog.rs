//! Entities inheriting from [`BaseEntity`](crate::common::BaseEntity).

use bigdecimal::BigDecimal;
use entity_builder::{Entity, EntityEnum};

use crate::common::BaseEntity;

/// Lifecycle of a product.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, EntityEnum)]
pub enum Status {
    /// Not yet published.
    #[default]
    Draft,
    /// On sale.
    Active,
    /// Withdrawn.
    Retired,
}

/// A sellable item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Entity)]
#[entity(generate_builder)]
pub struct Product {
    /// Audit columns.
    #[entity(base)]
    pub base: BaseEntity,
    /// Display name.
    pub name: String,
    /// Unit price.
    pub price: BigDecimal,
    /// Lifecycle state.
    pub status: Status,
    /// Units in stock.
    pub stock: i32,
}

/// A discounted product, two levels below [`BaseEntity`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Entity)]
#[entity(generate_builder)]
pub struct Promotion {
    /// The product on offer.
    #[entity(base)]
    pub product: Product,
    /// Discount in whole percent.
    pub discount: i16,
    /// Replaces the product's display name.
    pub name: String,
}

entity_builder::include_builder!(ProductBuilder in catalog);
entity_builder::include_builder!(PromotionBuilder in catalog);
