//! HTTP surface of the denoiser.
//!
//! One composable `Router` (see [`router`]) serves the upload page, a
//! health check, and the denoise endpoint. Errors render as a flat
//! `{"error": ...}` JSON envelope.

pub mod endpoints;
pub mod error;
pub mod router;
pub mod server;

pub use router::app_router;
pub use server::{start_server, ServerHandle};
