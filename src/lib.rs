//! Utilities for converting groundcover monitors into Terraform resources.
//!
//! The library fetches monitor definitions, derives unique Terraform resource
//! identifiers from their display names, re-encodes every monitor as the YAML
//! block embedded in a `groundcover_monitor` resource and writes one file per
//! monitor next to a shared provider file. Credentials only ever appear in the
//! output as Terraform variable references.

mod client;
mod config;
mod dedupe;
mod error;
mod identifier;
mod monitor;
mod output;
mod pipeline;
mod render;
mod transform;

pub use client::{
    ENVELOPE_KEYS, MONITORS_PATH, MonitorClient, load_monitors, parse_monitor_list,
    read_monitor_file,
};
pub use config::{
    API_KEY_ENV, ApiSettings, BACKEND_ID_ENV, BASE_URL_ENV, Credentials, DEFAULT_BASE_URL,
    DEFAULT_OUTPUT_DIR, GeneratorConfig, GeneratorOptions, MonitorSource,
};
pub use dedupe::{Deduplicator, deduplicate};
pub use error::Error;
pub use identifier::{MAX_IDENTIFIER_LEN, NameSanitizer, ResourceIdentifier, is_valid_identifier};
pub use monitor::Monitor;
pub use output::OutputDir;
pub use pipeline::{
    FailedWrite, Plan, RenderedResource, RunSummary, SkippedMonitor, plan, run, write,
};
pub use render::{
    API_KEY_VARIABLE, BACKEND_ID_VARIABLE, PROVIDER_FILE_NAME, Renderer, SINGLE_FILE_NAME,
};
pub use transform::{
    ConfigBlock, ConfigLayout, SERVER_MANAGED_FIELDS, passthrough_fields, transform_monitor,
};
