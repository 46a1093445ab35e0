//! # Protocol Layer
//!
//! Routable definitions, per-variant factories, generation tables and the
//! registry that frames and dispatches encoded routables.
//!
//! ## Components
//! - **Routable**: messages and replies with their wire type codes
//! - **Factory**: the encode/decode contract for one variant
//! - **Factory Set**: one generation's type code table, derived from the
//!   previous generation by replacing or adding bindings
//! - **Standard**: generations 50 and 51
//! - **Registry**: `[type_code: i32][payload]` framing and dispatch
//!
//! ## Wire Format
//! ```text
//! [TypeCode(4, big-endian)] [Payload(N, generation specific)]
//! ```

pub mod factories;
pub mod factory;
pub mod factory_set;
pub mod generation;
pub mod registry;
pub mod routable;
pub mod standard;

#[cfg(test)]
mod tests;
