//! Domain layer for the P&ID annotation workbench.
//!
//! Everything in this crate is pure: page/view geometry, the annotation
//! surface controller, validation rules shared by the API and repository
//! layers, the optimistic editing session, and export formatting.

pub mod annotation;
pub mod connection;
pub mod document;
pub mod error;
pub mod export;
pub mod geometry;
pub mod session;
pub mod surface;
pub mod symbol;
pub mod transform;
pub mod types;
