// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Run configuration.
//!
//! The CLI collects raw values once at process start (flags or environment
//! through `clap`) into [`GeneratorOptions`]; [`GeneratorConfig::from_options`]
//! validates them and the resulting configuration is passed by reference to
//! every component. Nothing below the CLI reads process state directly.

use std::{fmt, path::PathBuf};

use crate::{error::Error, transform::ConfigLayout};

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "GROUNDCOVER_API_KEY";
/// Environment variable holding the backend id.
pub const BACKEND_ID_ENV: &str = "GROUNDCOVER_BACKEND_ID";
/// Environment variable overriding the API base URL.
pub const BASE_URL_ENV: &str = "GROUNDCOVER_BASE_URL";
/// API base URL used when no override is supplied.
pub const DEFAULT_BASE_URL: &str = "https://app.groundcover.com";
/// Directory receiving generated files by default.
pub const DEFAULT_OUTPUT_DIR: &str = "terraform";

/// Unvalidated values gathered by the CLI.
#[derive(Debug, Clone, Default,)]
pub struct GeneratorOptions
{
    /// API key, if supplied.
    pub api_key:     Option<String,>,
    /// Backend id, if supplied.
    pub backend_id:  Option<String,>,
    /// Base URL override.
    pub base_url:    Option<String,>,
    /// Output directory override.
    pub output_dir:  Option<PathBuf,>,
    /// Shape of the embedded configuration block.
    pub layout:      ConfigLayout,
    /// Write everything into one `terraform.tf`.
    pub single_file: bool,
    /// Saved API response to read instead of calling the API.
    pub from_file:   Option<PathBuf,>,
}

/// Credentials sent to the monitors API.
#[derive(Clone, PartialEq, Eq,)]
pub struct Credentials
{
    /// Bearer token.
    pub api_key:    String,
    /// Value of the `X-Backend-Id` header.
    pub backend_id: String,
}

impl fmt::Debug for Credentials
{
    fn fmt(&self, f: &mut fmt::Formatter<'_,>,) -> fmt::Result
    {
        f.debug_struct("Credentials",)
            .field("api_key", &"<redacted>",)
            .field("backend_id", &"<redacted>",)
            .finish()
    }
}

/// Connection settings for the monitors API.
#[derive(Debug, Clone, PartialEq, Eq,)]
pub struct ApiSettings
{
    /// Base URL without trailing slash.
    pub base_url:    String,
    /// Authentication values.
    pub credentials: Credentials,
}

/// Where monitor definitions come from.
#[derive(Debug, Clone, PartialEq, Eq,)]
pub enum MonitorSource
{
    /// Query the groundcover API.
    Api(ApiSettings,),
    /// Read a previously saved API response.
    File(PathBuf,),
}

/// Validated configuration for one generator run.
#[derive(Debug, Clone, PartialEq, Eq,)]
pub struct GeneratorConfig
{
    /// Monitor source.
    pub source:      MonitorSource,
    /// Directory receiving generated files.
    pub output_dir:  PathBuf,
    /// Shape of the embedded configuration block.
    pub layout:      ConfigLayout,
    /// Write everything into one `terraform.tf`.
    pub single_file: bool,
}

impl GeneratorConfig
{
    /// Validates raw options.
    ///
    /// Credentials are required unless a saved response is supplied through
    /// `from_file`. Blank values count as missing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingCredential`](Error::MissingCredential) naming
    /// the first absent credential and [`Error::Validation`](Error::Validation)
    /// for a blank base URL.
    ///
    /// # Examples
    ///
    /// ```
    /// use monitor2tf::{GeneratorConfig, GeneratorOptions};
    ///
    /// let error = GeneratorConfig::from_options(GeneratorOptions::default(),).unwrap_err();
    /// assert!(error.to_string().contains("GROUNDCOVER_API_KEY"));
    /// ```
    pub fn from_options(options: GeneratorOptions,) -> Result<Self, Error,>
    {
        let source = match options.from_file {
            Some(path,) => MonitorSource::File(path,),
            None => {
                let api_key = required(options.api_key, API_KEY_ENV,)?;
                let backend_id = required(options.backend_id, BACKEND_ID_ENV,)?;
                let base_url = normalize_base_url(options.base_url.as_deref(),)?;
                MonitorSource::Api(ApiSettings {
                    base_url,
                    credentials: Credentials {
                        api_key,
                        backend_id,
                    },
                },)
            }
        };

        Ok(Self {
            source,
            output_dir: options.output_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR,),),
            layout: options.layout,
            single_file: options.single_file,
        },)
    }
}

fn required(value: Option<String,>, variable: &str,) -> Result<String, Error,>
{
    value
        .map(|value| value.trim().to_owned(),)
        .filter(|value| !value.is_empty(),)
        .ok_or_else(|| Error::missing_credential(variable,),)
}

fn normalize_base_url(value: Option<&str,>,) -> Result<String, Error,>
{
    let Some(raw,) = value else {
        return Ok(DEFAULT_BASE_URL.to_owned(),);
    };

    let trimmed = raw.trim().trim_end_matches('/',);
    if trimmed.is_empty() {
        return Err(Error::validation(format!("{BASE_URL_ENV} cannot be empty"),),);
    }
    Ok(trimmed.to_owned(),)
}
