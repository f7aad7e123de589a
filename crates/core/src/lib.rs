//! Bakeline Core - Shared domain library.
//!
//! This crate provides the domain model and business calculations used across
//! all Bakeline components:
//! - `client` - Typed client for the Bakeline ordering API
//! - `cli` - Command-line front-end for ordering and distribution views
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no HTTP, no
//! async. Everything in here is synchronous and deterministic, which is what
//! makes the pricing and reconciliation rules unit-testable in isolation.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, catalog/cart/order types, and lenient numeric parsing
//! - [`pricing`] - Unit-price calculation over product option groups
//! - [`cart`] - Cart line collection with merge/reorder semantics
//! - [`totals`] - Order total aggregation (initial vs. final amounts)

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod pricing;
pub mod totals;
pub mod types;

pub use types::*;
