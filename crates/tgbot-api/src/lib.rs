//! # tgbot – Telegram Bot API client
//!
//! A thin, generic client for the Telegram Bot API.
//!
//! ## Features
//!
//! - **Generic dispatch** – any Bot API method can be invoked by name, known
//!   or not; a table of well-known methods adds typed convenience wrappers
//! - **Transport** – form-encoded POST / bodiless GET over a blocking HTTP
//!   client, with per-field proxy configuration
//! - **Updates** – webhook payload captured once at construction, or
//!   `getUpdates` long-polling batches
//! - **Failure logging** – pluggable sink invoked on transport-level failures
//! - **Markup** – inline / reply keyboard JSON builders

pub mod types;
pub mod error;
pub mod sink;
pub mod transport;
pub mod dispatcher;
pub mod operations;
pub mod updates;
pub mod markup;
pub mod ack;
pub mod client;

pub use ack::respond_success;
pub use client::{Telegram, TelegramBuilder};
pub use error::{BotApiError, BotApiResult};
pub use sink::{ErrorSink, FileSink, LogSink, NoopSink};
pub use transport::{HttpTransport, Transport};
pub use types::{BotConfig, InputFile, OperationRequest, Params, ProxyConfig, ProxyScheme};
pub use updates::UpdateType;
