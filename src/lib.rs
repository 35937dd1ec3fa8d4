//! AgroCare AI backend - relays farming questions and plant images to a
//! language model and returns its advice.
//!
//! Every request runs the same linear pipeline: upload guard, request
//! normalization, model gateway, response mapping.

pub mod ai;
pub mod app;
pub mod config;
pub mod error;
pub mod models;
pub mod prompts;
pub mod request;
pub mod response;
pub mod server;
pub mod upload;

pub use error::{Error, Result};
