use std::process::ExitCode;

use backlog_api::{dispatch, BacklogClient, BacklogError, Record, Transport};
use log::{debug, error, info, warn};

pub mod bridge;
pub mod config;

use bridge::InboundRequest;
use config::ConfigManager;

const NULL_PAYLOAD: &str = "null";

fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate_text(value: &str, limit: usize) -> String {
    let trimmed = value.trim();
    if trimmed.chars().count() <= limit {
        return trimmed.to_string();
    }
    if limit <= 1 {
        return "…".to_string();
    }
    let mut truncated: String = trimmed.chars().take(limit - 1).collect();
    truncated.push('…');
    truncated
}

fn redact_log_details(value: &str) -> String {
    let collapsed = collapse_whitespace(value);
    let category = collapsed
        .split(':')
        .next()
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .unwrap_or("error");
    let lowered = collapsed.to_lowercase();
    let has_sensitive_hint = ["authorization", "basic ", "password", "pass=", "set-cookie"]
        .iter()
        .any(|hint| lowered.contains(hint));

    if has_sensitive_hint {
        return format!(
            "{}: <redacted-sensitive-details>",
            truncate_text(category, 64)
        );
    }

    truncate_text(&collapsed, 180)
}

/// Names the stage a failed call broke down in.
pub fn failure_kind(err: &BacklogError) -> &'static str {
    match err {
        err if err.is_transport() => "transport failure",
        BacklogError::MalformedResponse(_) => "decode failure",
        BacklogError::Fault { .. } => "remote fault",
        BacklogError::Xml(_) => "compose failure",
        _ => "unexpected failure",
    }
}

/// Error-reporting sink for calls that produced no usable payload.
pub fn report(method: &str, err: &BacklogError) {
    error!("Backlog call {} ended in {}", method, failure_kind(err));
    debug!("Backlog call details: {}", redact_log_details(&err.to_string()));
}

/// Serializes a dispatch outcome: a JSON array of records, or `null`.
pub fn render_payload(result: Option<&[Record]>) -> String {
    serde_json::to_string(&result).unwrap_or_else(|err| {
        warn!("Failed to serialize records: {}", err);
        NULL_PAYLOAD.to_string()
    })
}

/// Runs one inbound request end to end and returns the JSON payload to write back.
pub async fn handle_request<T: Transport>(client: &BacklogClient<T>, request: &InboundRequest) -> String {
    let params = request.call_params();
    match dispatch(client, &request.credentials, &request.method, &params).await {
        Ok(records) => render_payload(records.as_deref()),
        Err(err) => {
            report(&request.method, &err);
            NULL_PAYLOAD.to_string()
        }
    }
}

/// Parses `name=value` arguments into an inbound request.
pub fn parse_form_args<I>(args: I) -> Result<InboundRequest, String>
where
    I: IntoIterator<Item = String>,
{
    let mut pairs = Vec::new();
    for arg in args {
        let (name, value) = arg
            .split_once('=')
            .ok_or_else(|| format!("expected name=value, got `{}`", arg))?;
        pairs.push((name.to_string(), value.to_string()));
    }
    InboundRequest::from_pairs(pairs).map_err(|err| err.to_string())
}

pub async fn run<I>(args: I) -> ExitCode
where
    I: IntoIterator<Item = String>,
{
    let request = match parse_form_args(args) {
        Ok(request) => request,
        Err(err) => {
            eprintln!("{}", err);
            return ExitCode::from(2);
        }
    };

    let manager = ConfigManager::new();
    debug!("Loading bridge config from {}", manager.path().display());
    let config = manager.load();

    let client = match BacklogClient::new(config.to_backlog_config()) {
        Ok(client) => client,
        Err(err) => {
            error!("Failed to build Backlog client: {}", err);
            return ExitCode::FAILURE;
        }
    };

    info!("Handling Backlog method {:?}", request.method);
    println!("{}", handle_request(&client, &request).await);
    ExitCode::SUCCESS
}
