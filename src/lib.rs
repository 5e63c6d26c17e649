//! Image denoising web service.
//!
//! One stateless HTTP handler wraps a pure dispatch function: upload an
//! image, pick one of four classical filters, tune it with a single
//! strength knob, get a base64 PNG back. See [`denoise`] for the filter
//! semantics and [`api`] for the wire contract.

pub mod api;
pub mod config;
pub mod denoise;
