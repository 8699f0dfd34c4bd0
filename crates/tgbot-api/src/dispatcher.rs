//! Dispatcher: resolves an operation name into a transport call and decodes
//! the response.
//!
//! Decoding is a silent degrade: a transport failure, an empty body, a
//! malformed body and a literal `null` all come back as `None`. API-level
//! errors (`"ok": false`) are returned verbatim for the caller to inspect.

use crate::operations::{self, CallMethod};
use crate::transport::Transport;
use crate::types::{OperationRequest, Params};
use log::debug;
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct Dispatcher<T> {
    transport: T,
}

impl<T: Transport> Dispatcher<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Invoke `name` with an explicit POST flag.
    pub fn invoke(&self, name: &str, params: Params, post: bool) -> Option<Value> {
        let request = OperationRequest::new(name, params, post);
        let body = self.transport.send(&request)?;
        decode(name, &body)
    }

    /// Invoke `name` by the generic rule.
    ///
    /// Known operations use their table method. Unknown operations are a raw
    /// passthrough: a POST when parameters are supplied, a bodiless GET
    /// otherwise. Some parameterless operations are really mutations; callers
    /// needing a POST for those use [`Dispatcher::invoke`].
    pub fn call(&self, name: &str, params: Option<Params>) -> Option<Value> {
        let post = match operations::lookup(name) {
            Some(op) => op.method == CallMethod::Post,
            None => params.is_some(),
        };
        self.invoke(name, params.unwrap_or_default(), post)
    }
}

fn decode(name: &str, body: &str) -> Option<Value> {
    match serde_json::from_str::<Value>(body.trim()) {
        Ok(Value::Null) => None,
        Ok(value) => Some(value),
        Err(e) => {
            debug!("Telegram API ← {}: undecodable body ({e})", name);
            None
        }
    }
}
