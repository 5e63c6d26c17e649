//! Endpoint handlers, one module per route.

pub mod denoise;
pub mod health;
pub mod index;
