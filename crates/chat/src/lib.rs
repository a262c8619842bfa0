//! # pdftab-chat
//!
//! Conversational front-end over normalized tables.
//!
//! A [`Catalog`] lists Parquet datasets; each is loaded as a [`Dataset`]
//! and handed to an [`Agent`]. [`Session`] keeps the conversation and turns
//! every agent failure into an apology instead of an error.

pub mod agent;
pub mod catalog;
pub mod dataset;
mod error;
pub mod session;

pub use agent::{Agent, AgentConfig, ChatCompletionsAgent, Message, Role, API_KEY_ENV};
pub use catalog::{Catalog, DatasetEntry};
pub use dataset::Dataset;
pub use error::{ChatError, Result};
pub use session::{Reply, Session, APOLOGY};
