//! personagen: user personas from public Reddit activity.
//!
//! Fetches a user's recent posts and comments, asks an OpenAI-compatible
//! model to describe the person behind them as a fixed JSON schema, and
//! renders the answer as HTML and plain-text documents.
//!
//! See `DESIGN.md` for module responsibilities.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod credentials;
pub mod logging;
pub mod providers;

pub mod content;
pub mod persona;
pub mod render;

pub mod history;
pub mod pipeline;
