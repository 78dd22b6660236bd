//! mailsift — email content filtering, classification, and deduplication.

pub mod config;
pub mod content;
pub mod error;
pub mod message;
pub mod output;
pub mod pipeline;
pub mod source;
pub mod store;

pub use error::{Error, Result};
