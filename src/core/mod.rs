//! Shared building blocks: the provider method table and hex quantity codec.

pub mod methods;
pub mod quantity;
