//! Request command implementations.

use anyhow::{Context, Result, anyhow};
use clap::Args;
use serde_json::Value;
use tracing::debug;

use apiwire::{Call, Dispatcher, Method, RemoteService, ServiceClient};

use crate::cli::GlobalArgs;
use crate::output;
use crate::settings;

#[derive(Args, Debug)]
pub struct RequestArgs {
    /// Path relative to the base URL (e.g. users/7)
    pub path: String,

    /// Query parameter as key=value (repeatable)
    #[arg(short, long = "query", value_parser = parse_query)]
    pub queries: Vec<(String, String)>,

    /// Request header as name:value (repeatable)
    #[arg(short = 'H', long = "header", value_parser = parse_header)]
    pub headers: Vec<(String, String)>,
}

#[derive(Args, Debug)]
pub struct BodyRequestArgs {
    #[command(flatten)]
    pub request: RequestArgs,

    /// JSON request body
    #[arg(short, long)]
    pub data: String,
}

/// Untyped proxy: every call returns whatever JSON the server sends.
struct JsonApi {
    dispatcher: Dispatcher,
}

impl RemoteService for JsonApi {
    fn create(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }
}

impl JsonApi {
    fn call(&self, method: Method, args: &RequestArgs, body: Option<&Value>) -> Call<Value> {
        let mut call = self.dispatcher.call(method, &args.path);
        if let Some(body) = body {
            call = call.json(body);
        }

        let call = if args.queries.is_empty() {
            call
        } else {
            call.query(&args.queries)
        };

        args.headers
            .iter()
            .fold(call, |call, (name, value)| call.header(name, value))
    }
}

pub async fn get(global: &GlobalArgs, args: RequestArgs) -> Result<()> {
    send(global, Method::GET, &args, None).await
}

pub async fn delete(global: &GlobalArgs, args: RequestArgs) -> Result<()> {
    send(global, Method::DELETE, &args, None).await
}

pub async fn post(global: &GlobalArgs, args: BodyRequestArgs) -> Result<()> {
    let body = parse_body(&args.data)?;
    send(global, Method::POST, &args.request, Some(&body)).await
}

pub async fn put(global: &GlobalArgs, args: BodyRequestArgs) -> Result<()> {
    let body = parse_body(&args.data)?;
    send(global, Method::PUT, &args.request, Some(&body)).await
}

async fn send(
    global: &GlobalArgs,
    method: Method,
    args: &RequestArgs,
    body: Option<&Value>,
) -> Result<()> {
    let config = settings::resolve(global)?;
    debug!(base_url = %config.base_url, %method, path = %args.path, "Sending request");

    let client = ServiceClient::from_config(config);
    let api = client
        .service::<JsonApi>()
        .context("Failed to set up client")?;

    let response = api
        .call(method.clone(), args, body)
        .await
        .with_context(|| format!("{} {} failed", method, args.path))?;

    if response.is_null() {
        output::success("No content");
        return Ok(());
    }

    output::json_pretty(&response)
}

fn parse_body(data: &str) -> Result<Value> {
    serde_json::from_str(data).context("Request body is not valid JSON")
}

fn parse_query(s: &str) -> Result<(String, String)> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| anyhow!("expected key=value, got '{s}'"))?;
    Ok((key.to_string(), value.to_string()))
}

fn parse_header(s: &str) -> Result<(String, String)> {
    let (name, value) = s
        .split_once(':')
        .ok_or_else(|| anyhow!("expected name:value, got '{s}'"))?;
    Ok((name.trim().to_string(), value.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_pair() {
        assert_eq!(
            parse_query("q=rust lang").unwrap(),
            ("q".to_string(), "rust lang".to_string())
        );
        assert!(parse_query("novalue").is_err());
    }

    #[test]
    fn header_pair_is_trimmed() {
        assert_eq!(
            parse_header("X-Trace : abc").unwrap(),
            ("X-Trace".to_string(), "abc".to_string())
        );
        assert!(parse_header("missing-colon").is_err());
    }

    #[test]
    fn body_must_be_json() {
        assert!(parse_body(r#"{"a":1}"#).is_ok());
        assert!(parse_body("{oops").is_err());
    }
}
