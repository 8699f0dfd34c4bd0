//! The bot client facade.
//!
//! A [`Telegram`] instance belongs to one inbound context: it captures the
//! inbound body (webhook payload) exactly once when it is built and keeps
//! the last `getUpdates` response. Build a new instance per inbound request
//! rather than sharing one.

use crate::ack;
use crate::dispatcher::Dispatcher;
use crate::error::BotApiResult;
use crate::sink::{ErrorSink, NoopSink};
use crate::transport::{HttpTransport, Transport};
use crate::types::{BotConfig, Params};
use crate::updates::UpdateSource;
use log::debug;
use reqwest::StatusCode;
use serde_json::Value;
use std::io::Read;
use std::sync::Arc;

/// Telegram Bot API client.
#[derive(Debug)]
pub struct Telegram<T = HttpTransport> {
    dispatcher: Dispatcher<T>,
    updates: UpdateSource,
}

impl Telegram<HttpTransport> {
    /// Client over HTTP with no inbound payload and no error sink.
    pub fn new(config: BotConfig) -> BotApiResult<Self> {
        Self::builder(config).build()
    }

    pub fn builder(config: BotConfig) -> TelegramBuilder {
        TelegramBuilder::new(config)
    }
}

impl<T: Transport> Telegram<T> {
    /// Client over an arbitrary transport with no inbound payload.
    pub fn with_transport(transport: T) -> Self {
        Self {
            dispatcher: Dispatcher::new(transport),
            updates: UpdateSource::empty(),
        }
    }

    /// Client over an arbitrary transport, capturing `inbound` as the push
    /// payload. The reader is consumed here and never read again.
    pub fn with_inbound(transport: T, inbound: impl Read) -> Self {
        Self {
            dispatcher: Dispatcher::new(transport),
            updates: UpdateSource::capture(inbound),
        }
    }

    pub(crate) fn dispatcher(&self) -> &Dispatcher<T> {
        &self.dispatcher
    }

    pub fn transport(&self) -> &T {
        self.dispatcher.transport()
    }

    /// Invoke any operation with an explicit POST flag.
    pub fn invoke(&self, name: &str, params: Params, post: bool) -> Option<Value> {
        self.dispatcher.invoke(name, params, post)
    }

    /// Invoke any operation by name; see [`Dispatcher::call`] for the
    /// POST/GET rule applied to names outside the operation table.
    pub fn call(&self, name: &str, params: Option<Params>) -> Option<Value> {
        self.dispatcher.call(name, params)
    }

    /// Pull the pending update batch via `getUpdates`.
    ///
    /// Yields the `result` array in server order, or an empty batch when the
    /// call failed or the response carries no array result. The raw response
    /// is kept for [`Telegram::last_pull_response`].
    pub fn get_updates(&mut self, params: Params) -> Vec<Value> {
        let response = self.dispatcher.invoke("getUpdates", params, true);
        let batch = self.updates.record_pull(response);
        debug!("getUpdates returned {} update(s)", batch.len());
        batch
    }

    /// The inbound payload captured at construction (push mode).
    pub fn push_payload(&self) -> &Value {
        self.updates.push_payload()
    }

    /// Raw decoded response of the most recent [`Telegram::get_updates`].
    pub fn last_pull_response(&self) -> Option<&Value> {
        self.updates.last_pull_response()
    }

    /// Acknowledgement for the webhook delivery; see [`ack::respond_success`].
    pub fn respond_success(&self) -> (StatusCode, String) {
        ack::respond_success()
    }

    /// Alias of `setStickerSetThumbnail` under its former name.
    pub fn set_sticker_set_thumb(&self, params: Params) -> Option<Value> {
        self.set_sticker_set_thumbnail(params)
    }
}

/// Builder for an HTTP-backed [`Telegram`] client.
pub struct TelegramBuilder {
    config: BotConfig,
    sink: Arc<dyn ErrorSink>,
    inbound: Option<Box<dyn Read>>,
}

impl TelegramBuilder {
    pub fn new(config: BotConfig) -> Self {
        Self {
            config,
            sink: Arc::new(NoopSink),
            inbound: None,
        }
    }

    /// Sink for transport failures (only used while `log_errors` is on).
    pub fn error_sink(mut self, sink: Arc<dyn ErrorSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Inbound body to capture as the push payload; read once by `build`.
    pub fn inbound(mut self, reader: impl Read + 'static) -> Self {
        self.inbound = Some(Box::new(reader));
        self
    }

    pub fn inbound_bytes(self, body: impl Into<Vec<u8>>) -> Self {
        self.inbound(std::io::Cursor::new(body.into()))
    }

    pub fn build(self) -> BotApiResult<Telegram<HttpTransport>> {
        let TelegramBuilder {
            config,
            sink,
            inbound,
        } = self;
        let transport = HttpTransport::with_sink(&config, sink)?;
        Ok(finish(transport, inbound))
    }

    /// Finish with a caller-supplied transport; the config and sink held by
    /// the builder are not used.
    pub fn build_with_transport<T: Transport>(self, transport: T) -> Telegram<T> {
        finish(transport, self.inbound)
    }
}

fn finish<T: Transport>(transport: T, inbound: Option<Box<dyn Read>>) -> Telegram<T> {
    match inbound {
        Some(reader) => Telegram::with_inbound(transport, reader),
        None => Telegram::with_transport(transport),
    }
}
