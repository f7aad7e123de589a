//! Core types for Bakeline.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod catalog;
pub mod email;
pub mod id;
pub mod money;
pub mod order;
pub mod status;

pub use cart::CartLine;
pub use catalog::{CatalogSnapshot, OptionGroup, OptionItem, Product};
pub use email::{Email, EmailError};
pub use id::*;
pub use money::amounts_match;
pub use order::{Order, OrderLine};
pub use status::*;
