//! Gemini REST Client
//!
//! A small client for the Generative Language REST API. It discovers which
//! model to use through a one-time capability lookup, caches the answer for
//! the lifetime of the client, and issues single-shot `generateContent` calls.

pub mod client;
pub mod error;
pub mod types;

pub use client::{API_REVISIONS, ApiKey, DEFAULT_API_BASE, GeminiClient, GeminiConfig};
pub use error::GeminiError;
pub use types::ModelDescriptor;
