// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Terraform file rendering.
//!
//! Templates are rendered by `minijinja` from typed context records, keeping
//! the data each file needs separate from how it is laid out. Credentials
//! are only ever referenced through Terraform variables.

use minijinja::{AutoEscape, Environment, UndefinedBehavior};
use serde::Serialize;
use tracing::debug;

use crate::{error::Error, identifier::ResourceIdentifier, transform::ConfigBlock};

/// Local provider name used in `required_providers` and as resource prefix.
pub const PROVIDER_NAME: &str = "groundcover";
/// Registry address of the provider.
pub const PROVIDER_SOURCE: &str = "registry.terraform.io/groundcover-com/groundcover";
/// Version constraint written into `required_providers`.
pub const PROVIDER_VERSION: &str = ">= 0.0.0";
/// Terraform variable carrying the API key.
pub const API_KEY_VARIABLE: &str = "groundcover_api_key";
/// Terraform variable carrying the backend id.
pub const BACKEND_ID_VARIABLE: &str = "groundcover_backend_id";
/// Resource type generated for every monitor.
pub const MONITOR_RESOURCE_TYPE: &str = "groundcover_monitor";
/// Name of the shared provider file.
pub const PROVIDER_FILE_NAME: &str = "provider.tf";
/// Name of the combined file written in single-file mode.
pub const SINGLE_FILE_NAME: &str = "terraform.tf";

const HEREDOC_DELIMITER: &str = "YAML";
const HEREDOC_INDENT: &str = "    ";

const PROVIDER_TEMPLATE: &str = r#"terraform {
  required_providers {
    {{ provider.name }} = {
      source  = "{{ provider.source }}"
      version = "{{ provider.version }}"
    }
  }
}

provider "{{ provider.name }}" {
  api_key    = var.{{ provider.api_key_variable }}
  backend_id = var.{{ provider.backend_id_variable }}
}

variable "{{ provider.api_key_variable }}" {
  type        = string
  description = "groundcover API Key"
  sensitive   = true
}

variable "{{ provider.backend_id_variable }}" {
  type        = string
  description = "groundcover Backend ID"
}
"#;

const RESOURCE_TEMPLATE: &str = r#"resource "{{ resource.resource_type }}" "{{ resource.identifier }}" {
  provider     = {{ resource.provider }}
  monitor_yaml = <<-{{ resource.delimiter }}
{{ resource.body }}
  {{ resource.delimiter }}
}
"#;

/// Data rendered into the shared provider file.
#[derive(Debug, Clone, Serialize,)]
pub struct ProviderContext
{
    name:                &'static str,
    source:              &'static str,
    version:             &'static str,
    api_key_variable:    &'static str,
    backend_id_variable: &'static str,
}

impl Default for ProviderContext
{
    fn default() -> Self
    {
        Self {
            name:                PROVIDER_NAME,
            source:              PROVIDER_SOURCE,
            version:             PROVIDER_VERSION,
            api_key_variable:    API_KEY_VARIABLE,
            backend_id_variable: BACKEND_ID_VARIABLE,
        }
    }
}

/// Data rendered into a single resource block.
#[derive(Debug, Clone, Serialize,)]
pub struct ResourceContext
{
    resource_type: &'static str,
    identifier:    String,
    provider:      &'static str,
    delimiter:     String,
    body:          String,
}

impl ResourceContext
{
    /// Prepares the heredoc body for `block`, escaping template sequences and
    /// picking a delimiter that no body line collides with.
    pub fn new(identifier: &ResourceIdentifier, block: &ConfigBlock,) -> Self
    {
        let escaped = escape_template_sequences(block.yaml(),);
        let delimiter = choose_delimiter(&escaped,);
        let body = escaped
            .lines()
            .map(|line| format!("{HEREDOC_INDENT}{line}"),)
            .collect::<Vec<_,>>()
            .join("\n",);

        Self {
            resource_type: MONITOR_RESOURCE_TYPE,
            identifier: identifier.as_str().to_owned(),
            provider: PROVIDER_NAME,
            delimiter,
            body,
        }
    }
}

/// Renders provider and resource files from compiled templates.
pub struct Renderer
{
    env: Environment<'static,>,
}

impl Renderer
{
    /// Compiles the built-in templates.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Template`](Error::Template) if a template fails to
    /// compile.
    pub fn new() -> Result<Self, Error,>
    {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict,);
        env.set_auto_escape_callback(|_| AutoEscape::None,);
        env.set_keep_trailing_newline(true,);
        env.add_template("provider.tf", PROVIDER_TEMPLATE,)?;
        env.add_template("resource.tf", RESOURCE_TEMPLATE,)?;

        Ok(Self {
            env,
        },)
    }

    /// Renders the shared provider file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Template`](Error::Template) on rendering failures.
    pub fn provider_file(&self,) -> Result<String, Error,>
    {
        let template = self.env.get_template("provider.tf",)?;
        Ok(template.render(minijinja::context! { provider => ProviderContext::default() },)?,)
    }

    /// Renders the resource block for one monitor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Template`](Error::Template) on rendering failures and
    /// [`Error::Validation`](Error::Validation) if the identifier does not
    /// satisfy the Terraform grammar.
    pub fn resource_block(
        &self,
        identifier: &ResourceIdentifier,
        block: &ConfigBlock,
    ) -> Result<String, Error,>
    {
        ResourceIdentifier::parse(identifier.as_str(),)?;
        debug!(identifier = %identifier, "rendering resource block");

        let template = self.env.get_template("resource.tf",)?;
        let context = ResourceContext::new(identifier, block,);
        Ok(template.render(minijinja::context! { resource => context },)?,)
    }
}

/// Escapes Terraform template sequences inside heredoc bodies.
pub fn escape_template_sequences(text: &str,) -> String
{
    text.replace("${", "$${",).replace("%{", "%%{",)
}

fn choose_delimiter(body: &str,) -> String
{
    let collides = |candidate: &str| body.lines().any(|line| line.trim() == candidate,);
    if !collides(HEREDOC_DELIMITER,) {
        return HEREDOC_DELIMITER.to_owned();
    }

    (1..)
        .map(|counter| format!("{HEREDOC_DELIMITER}_{counter}"),)
        .find(|candidate| !collides(candidate.as_str(),),)
        .unwrap_or_else(|| HEREDOC_DELIMITER.to_owned(),)
}
