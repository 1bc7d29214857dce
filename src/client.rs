// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Monitor retrieval from the groundcover API or a saved response.
//!
//! Exactly one request is issued per run and failures surface immediately
//! with the endpoint and status.

use std::{fs, path::Path, time::Duration};

use reqwest::{
    Client,
    header::{AUTHORIZATION, CONTENT_TYPE},
};
use serde_json::Value;
use tracing::{debug, info};

use crate::{
    config::{ApiSettings, MonitorSource},
    error::{self, Error},
    monitor::kind,
};

/// Path of the monitor summary query endpoint.
pub const MONITORS_PATH: &str = "/api/monitors/summary/query";
/// Keys probed, in order, when the response body is an object.
pub const ENVELOPE_KEYS: &[&str] = &["results", "data", "monitors", "items"];

const BACKEND_ID_HEADER: &str = "X-Backend-Id";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30,);
const MAX_DETAIL_LEN: usize = 512;

/// HTTP client for the monitors endpoint.
#[derive(Debug,)]
pub struct MonitorClient<'config,>
{
    http:     Client,
    settings: &'config ApiSettings,
    url:      String,
}

impl<'config,> MonitorClient<'config,>
{
    /// Builds a client for the given API settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Request`](Error::Request) if the underlying HTTP
    /// client cannot be constructed.
    pub fn new(settings: &'config ApiSettings,) -> Result<Self, Error,>
    {
        let url = format!("{}{MONITORS_PATH}", settings.base_url);
        let http = Client::builder().timeout(REQUEST_TIMEOUT,).build().map_err(|source| {
            Error::Request {
                endpoint: format!("POST {url}"),
                source,
            }
        },)?;

        Ok(Self {
            http,
            settings,
            url,
        },)
    }

    /// Method and URL used in diagnostics.
    pub fn endpoint(&self,) -> String
    {
        format!("POST {}", self.url)
    }

    /// Fetches the raw monitor records.
    ///
    /// # Errors
    ///
    /// * [`Error::Request`](Error::Request) when the host is unreachable.
    /// * [`Error::Status`](Error::Status) for any non-2xx response.
    /// * [`Error::Envelope`](Error::Envelope) when the body is not JSON or
    ///   holds no monitor list.
    pub async fn fetch_monitors(&self,) -> Result<Vec<Value,>, Error,>
    {
        let endpoint = self.endpoint();
        info!("Fetching monitors from {}", endpoint);

        let response = self
            .http
            .post(&self.url,)
            .header(AUTHORIZATION, format!("Bearer {}", self.settings.credentials.api_key),)
            .header(BACKEND_ID_HEADER, &self.settings.credentials.backend_id,)
            .header(CONTENT_TYPE, "application/json",)
            .body("{}",)
            .send()
            .await
            .map_err(|source| Error::Request {
                endpoint: endpoint.clone(),
                source,
            },)?;

        let status = response.status();
        let body = response.text().await.map_err(|source| Error::Request {
            endpoint: endpoint.clone(),
            source,
        },)?;

        if !status.is_success() {
            return Err(Error::Status {
                endpoint,
                status: status.as_u16(),
                detail: status_detail(status.canonical_reason(), &body,),
            },);
        }

        debug!("Received {} bytes from {}", body.len(), endpoint);
        parse_monitor_list(&body, &endpoint,)
    }
}

/// Loads monitors from whichever source the configuration names.
///
/// # Errors
///
/// Propagates fetch, read and envelope errors.
pub async fn load_monitors(source: &MonitorSource,) -> Result<Vec<Value,>, Error,>
{
    match source {
        MonitorSource::Api(settings,) => MonitorClient::new(settings,)?.fetch_monitors().await,
        MonitorSource::File(path,) => read_monitor_file(path,),
    }
}

/// Reads a saved API response from disk.
///
/// # Errors
///
/// Returns [`Error::Input`](Error::Input) when the file cannot be read and
/// [`Error::Envelope`](Error::Envelope) when it holds no monitor list.
pub fn read_monitor_file(path: &Path,) -> Result<Vec<Value,>, Error,>
{
    info!("Reading monitors from {}", path.display());
    let contents = fs::read_to_string(path,).map_err(|source| error::input_error(path, source,),)?;
    parse_monitor_list(&contents, &path.display().to_string(),)
}

/// Extracts the monitor list from a response body.
///
/// The body is either a JSON list or an object holding the list under the
/// first of [`ENVELOPE_KEYS`] it contains.
///
/// # Errors
///
/// Returns [`Error::Envelope`](Error::Envelope) naming `endpoint` when the
/// body is not JSON, or no monitor list can be found.
pub fn parse_monitor_list(body: &str, endpoint: &str,) -> Result<Vec<Value,>, Error,>
{
    let document: Value = serde_json::from_str(body,)
        .map_err(|source| Error::envelope(endpoint, format!("invalid JSON: {source}"),),)?;

    match document {
        Value::Array(monitors,) => Ok(monitors,),
        Value::Object(mut envelope,) => {
            let (key, monitors,) = ENVELOPE_KEYS
                .iter()
                .find_map(|key| envelope.remove(*key,).map(|value| (*key, value,),),)
                .ok_or_else(|| {
                    Error::envelope(
                        endpoint,
                        format!("expected one of {} in response object", ENVELOPE_KEYS.join(", ")),
                    )
                },)?;

            match monitors {
                Value::Array(monitors,) => Ok(monitors,),
                other => Err(Error::envelope(
                    endpoint,
                    format!("'{key}' must be a list, found {}", kind(&other)),
                ),),
            }
        }
        other => Err(Error::envelope(
            endpoint,
            format!("expected a list or object, found {}", kind(&other)),
        ),),
    }
}

fn status_detail(reason: Option<&str,>, body: &str,) -> String
{
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return reason.unwrap_or("no response body",).to_owned();
    }

    let mut detail: String = trimmed.chars().take(MAX_DETAIL_LEN,).collect();
    if detail.len() < trimmed.len() {
        detail.push_str("...",);
    }
    detail
}
