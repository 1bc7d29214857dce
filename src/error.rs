#![allow(non_shorthand_field_patterns)]
#![doc = "Error handling primitives shared across the generator crate."]
// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! The derive emitted by [`masterror::Error`] expands pattern matches that
//! trigger the `non_shorthand_field_patterns` lint. The lint is disabled for
//! the module to keep the generated implementations warning-free.
//!
//! Every fatal variant renders with a prefix naming the pipeline step that
//! failed (`credential check`, `network fetch`, `response parsing`,
//! `input read`, `directory creation`) so CLI users can tell at a glance
//! where a run stopped.

use std::path::{Path, PathBuf};

/// Unified error type returned by the client, pipeline and CLI.
///
/// Fatal variants abort the run. [`Error::Transform`], [`Error::Yaml`],
/// [`Error::Template`] and [`Error::Write`] describe per-monitor or per-file
/// problems that the pipeline records in its summary and recovers from.
#[derive(Debug, masterror::Error)]
pub enum Error {
    /// A required credential was not supplied.
    #[error("credential check: missing required value {variable}")]
    MissingCredential {
        /// Environment variable (or flag) that was expected.
        variable: String
    },
    /// Returned when configuration values violate invariants.
    #[error("invalid configuration: {message}")]
    Validation {
        /// Human readable message describing the validation problem.
        message: String
    },
    /// The monitors endpoint could not be reached.
    #[error("network fetch: request to {endpoint} failed: {source}")]
    Request {
        /// Method and URL of the failing request.
        endpoint: String,
        /// Underlying transport error.
        source:   reqwest::Error
    },
    /// The monitors endpoint answered with a non-success status.
    #[error("network fetch: {endpoint} responded with status {status}: {detail}")]
    Status {
        /// Method and URL of the failing request.
        endpoint: String,
        /// Numeric HTTP status code.
        status:   u16,
        /// Response body or reason phrase, truncated.
        detail:   String
    },
    /// The response body did not contain a monitor list.
    #[error("response parsing: malformed response from {endpoint}: {message}")]
    Envelope {
        /// Method and URL (or file path) the body came from.
        endpoint: String,
        /// Description of the problem.
        message:  String
    },
    /// A saved API response could not be read.
    #[error("input read: failed to read monitors from {path:?}: {source}")]
    Input {
        /// Location of the saved response.
        path:   PathBuf,
        /// Underlying I/O error.
        source: std::io::Error
    },
    /// A single monitor record could not be re-shaped.
    #[error("monitor transformation failed: {message}")]
    Transform {
        /// Description of the malformed part of the record.
        message: String
    },
    /// Wraps YAML encoding errors for a configuration block.
    #[error("failed to encode monitor YAML: {source}")]
    Yaml {
        /// Source encoding error from serde_yaml.
        source: serde_yaml::Error
    },
    /// Wraps template rendering errors.
    #[error("failed to render template: {source}")]
    Template {
        /// Source error from minijinja.
        source: minijinja::Error
    },
    /// The output directory could not be created or does not accept files.
    #[error("directory creation: cannot create or write to output directory {path:?}: {source}")]
    OutputDir {
        /// Directory that was requested.
        path:   PathBuf,
        /// Underlying I/O error reported by the operating system.
        source: std::io::Error
    },
    /// The async runtime driving the request could not be started.
    #[error("runtime startup: failed to start async runtime: {source}")]
    Runtime {
        /// Underlying I/O error reported by tokio.
        source: std::io::Error
    },
    /// The end-of-run summary could not be printed.
    #[error("summary output: failed to print run summary: {source}")]
    SummaryOutput {
        /// Underlying I/O error from stdout.
        source: std::io::Error
    },
    /// A generated file could not be written.
    #[error("failed to write {path:?}: {source}")]
    Write {
        /// Location of the file being produced.
        path:   PathBuf,
        /// Underlying I/O error reported by the operating system.
        source: std::io::Error
    }
}

impl Error {
    /// Constructs a validation error from the provided displayable value.
    ///
    /// # Parameters
    ///
    /// * `message` - Human-readable description of the validation failure.
    pub fn validation<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::Validation {
            message: message.into()
        }
    }

    /// Constructs a per-monitor transformation error.
    ///
    /// # Parameters
    ///
    /// * `message` - Human-readable description of the malformed record.
    pub fn transform<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::Transform {
            message: message.into()
        }
    }

    /// Constructs a missing credential error naming the expected variable.
    pub fn missing_credential<V>(variable: V) -> Self
    where
        V: Into<String>
    {
        Self::MissingCredential {
            variable: variable.into()
        }
    }

    /// Constructs a response parsing error for the given endpoint.
    pub fn envelope<E, M>(endpoint: E, message: M) -> Self
    where
        E: Into<String>,
        M: Into<String>
    {
        Self::Envelope {
            endpoint: endpoint.into(),
            message:  message.into()
        }
    }

    /// Formats the error for diagnostics without the variant name.
    ///
    /// This method is primarily intended for CLI contexts where the variant
    /// name does not add value to end users. The returned string matches the
    /// [`std::fmt::Display`] implementation.
    pub fn to_display_string(&self) -> String {
        format!("{self}")
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(source: serde_yaml::Error) -> Self {
        Self::Yaml {
            source
        }
    }
}

impl From<minijinja::Error> for Error {
    fn from(source: minijinja::Error) -> Self {
        Self::Template {
            source
        }
    }
}

/// Creates an [`Error::Write`] variant capturing the failing path and source.
///
/// # Parameters
///
/// * `path` - Location of the generated file that triggered the error.
/// * `source` - I/O error reported by the operating system.
pub fn write_error(path: &Path, source: std::io::Error) -> Error {
    Error::Write {
        path: path.to_path_buf(),
        source
    }
}

/// Creates an [`Error::OutputDir`] variant capturing the failing path and
/// source.
pub fn output_dir_error(path: &Path, source: std::io::Error) -> Error {
    Error::OutputDir {
        path: path.to_path_buf(),
        source
    }
}

/// Creates an [`Error::Input`] variant capturing the failing path and source.
pub fn input_error(path: &Path, source: std::io::Error) -> Error {
    Error::Input {
        path: path.to_path_buf(),
        source
    }
}
