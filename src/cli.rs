//! `tgbot` command line: argument parsing and command execution.

use crate::config::AppConfig;
use crate::logging;
use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::io::{Read, Write};
use std::path::PathBuf;
use tgbot_api::operations::OPERATIONS;
use tgbot_api::updates::next_offset;
use tgbot_api::{Params, UpdateType};
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(name = "tgbot", version, about = "Telegram Bot API command line client")]
pub struct Cli {
    /// JSON config file (defaults to $TGBOT_CONFIG)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Bot token; overrides the config file and $TGBOT_TOKEN
    #[arg(long, global = true)]
    pub token: Option<String>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Invoke any Bot API method by name
    Call {
        /// Bot API method, e.g. sendMessage
        operation: String,
        /// Parameters as key=value; values are parsed as JSON when possible
        #[arg(value_parser = parse_kv)]
        params: Vec<(String, Value)>,
        /// Send as POST even without parameters
        #[arg(long)]
        post: bool,
    },
    /// Pull pending updates with getUpdates
    Updates {
        /// getUpdates parameters as key=value (offset, limit, timeout, ...)
        #[arg(value_parser = parse_kv)]
        params: Vec<(String, Value)>,
    },
    /// Read one webhook update from stdin, print it and the acknowledgement
    Webhook,
    /// List the known Bot API methods
    Operations {
        /// Print the table as JSON
        #[arg(long)]
        json: bool,
    },
}

/// `key=value` with the value decoded as JSON, or kept as a string.
pub fn parse_kv(s: &str) -> Result<(String, Value), String> {
    let (k, v) = s
        .split_once('=')
        .ok_or_else(|| "expected key=value".to_string())?;
    if k.is_empty() {
        return Err("empty key".to_string());
    }
    let val = serde_json::from_str::<Value>(v).unwrap_or_else(|_| Value::String(v.to_string()));
    Ok((k.to_string(), val))
}

fn to_params(pairs: Vec<(String, Value)>) -> Params {
    pairs.into_iter().collect()
}

/// Run one command. `stdin` is only read by `webhook`.
pub fn run(cli: Cli, stdin: impl Read + 'static, out: &mut impl Write) -> anyhow::Result<()> {
    if let Command::Operations { json } = cli.command {
        return list_operations(json, out);
    }

    let config = AppConfig::resolve(cli.config.as_deref(), cli.token.as_deref())?;
    logging::init(config.log_level.as_deref());

    match cli.command {
        Command::Call {
            operation,
            params,
            post,
        } => {
            let client = config.client_builder().build()?;
            let response = if post {
                client.invoke(&operation, to_params(params), true)
            } else if params.is_empty() {
                client.call(&operation, None)
            } else {
                client.call(&operation, Some(to_params(params)))
            };
            match response {
                Some(value) => {
                    if value.get("ok") == Some(&Value::Bool(false)) {
                        warn!("{operation} was rejected by the API");
                    }
                    writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?;
                }
                None => bail!("{operation}: no decodable response (see error log)"),
            }
        }
        Command::Updates { params } => {
            let mut client = config.client_builder().build()?;
            let batch = client.get_updates(to_params(params));
            if client.last_pull_response().is_none() {
                bail!("getUpdates: no decodable response (see error log)");
            }
            for update in &batch {
                writeln!(out, "{update}")?;
            }
            match next_offset(&batch) {
                Some(offset) => info!("{} update(s); next offset {offset}", batch.len()),
                None => info!("no pending updates"),
            }
        }
        Command::Webhook => {
            let client = config.client_builder().inbound(stdin).build()?;
            let payload = client.push_payload();
            let kind = UpdateType::detect(payload)
                .map(|k| k.as_str())
                .unwrap_or("unknown");
            info!("received {kind} update");
            writeln!(out, "{kind}\t{payload}")?;
            let (status, body) = client.respond_success();
            info!("acknowledging with {status}");
            writeln!(out, "{body}")?;
        }
        Command::Operations { .. } => {}
    }
    Ok(())
}

fn list_operations(json: bool, out: &mut impl Write) -> anyhow::Result<()> {
    if json {
        let table = serde_json::to_string_pretty(OPERATIONS).context("encode operation table")?;
        writeln!(out, "{table}")?;
        return Ok(());
    }
    for op in OPERATIONS {
        writeln!(
            out,
            "{:<40} {:<5} {}",
            op.name,
            op.method.as_str(),
            op.params.as_str()
        )?;
    }
    Ok(())
}
