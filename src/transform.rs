// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Re-encoding of monitor records into the YAML block embedded in
//! `groundcover_monitor` resources.
//!
//! The transformer never validates monitor semantics. In the default
//! [`ConfigLayout::Passthrough`] layout values are carried over untouched; the
//! [`ConfigLayout::Provider`] layout moves known fields into the groundcover
//! monitor YAML layout but still copies their values as-is (apart from
//! upper-casing `severity`). Absent fields are omitted rather than defaulted.

use serde_json::{Map, Value};

use crate::{
    error::Error,
    monitor::{Monitor, kind},
};

/// Top-level fields assigned by the server that never round-trip into
/// Terraform.
pub const SERVER_MANAGED_FIELDS: &[&str] =
    &["id", "uuid", "createdAt", "updatedAt", "createdBy", "updatedBy"];

/// Shape of the generated configuration block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq,)]
pub enum ConfigLayout
{
    /// Carry every non server-managed field over unchanged.
    #[default]
    Passthrough,
    /// Re-shape known fields into the provider's monitor YAML layout.
    Provider,
}

/// YAML document produced for a single monitor.
#[derive(Debug, Clone, PartialEq, Eq,)]
pub struct ConfigBlock
{
    yaml: String,
}

impl ConfigBlock
{
    /// Raw YAML text, newline terminated.
    pub fn yaml(&self,) -> &str
    {
        &self.yaml
    }
}

/// Converts a monitor into its configuration block.
///
/// # Errors
///
/// Returns [`Error::Transform`](Error::Transform) when the provider layout
/// meets a structurally malformed `model`, `queries` or `interval` field, and
/// [`Error::Yaml`](Error::Yaml) when encoding fails.
///
/// # Examples
///
/// ```
/// use monitor2tf::{ConfigLayout, Monitor, transform_monitor};
/// use serde_json::json;
///
/// let monitor = Monitor::from_value(json!({"id": "1", "title": "CPU", "severity": "S2"}),)?;
/// let block = transform_monitor(&monitor, ConfigLayout::Passthrough,)?;
/// assert_eq!(block.yaml(), "title: CPU\nseverity: S2\n");
/// # Ok::<(), monitor2tf::Error>(())
/// ```
pub fn transform_monitor(monitor: &Monitor, layout: ConfigLayout,) -> Result<ConfigBlock, Error,>
{
    let document = match layout {
        ConfigLayout::Passthrough => passthrough_fields(monitor,),
        ConfigLayout::Provider => provider_fields(monitor,)?,
    };

    let yaml = serde_yaml::to_string(&Value::Object(document,),)?;
    Ok(ConfigBlock {
        yaml,
    },)
}

/// Returns the subset of the record carried over by the passthrough layout.
pub fn passthrough_fields(monitor: &Monitor,) -> Map<String, Value,>
{
    monitor
        .fields()
        .iter()
        .filter(|(key, _,)| !SERVER_MANAGED_FIELDS.contains(&key.as_str(),),)
        .map(|(key, value,)| (key.clone(), value.clone(),),)
        .collect()
}

fn provider_fields(monitor: &Monitor,) -> Result<Map<String, Value,>, Error,>
{
    let mut document = Map::new();

    copy_field(monitor.fields(), "title", &mut document, "title",);

    let mut display = Map::new();
    copy_field(monitor.fields(), "header", &mut display, "header",);
    copy_field(monitor.fields(), "resourceLabels", &mut display, "resourceHeaderLabels",);
    copy_field(monitor.fields(), "contextLabels", &mut display, "contextHeaderLabels",);
    copy_field(monitor.fields(), "description", &mut display, "description",);
    if !display.is_empty() {
        document.insert("display".to_owned(), Value::Object(display,),);
    }

    if let Some(severity,) = monitor.get("severity",) {
        let severity = match severity {
            Value::String(level,) => Value::String(level.to_uppercase(),),
            other => other.clone(),
        };
        document.insert("severity".to_owned(), severity,);
    }

    copy_field(monitor.fields(), "measurementType", &mut document, "measurementType",);

    if let Some(model,) = monitor.get("model",) {
        document.insert("model".to_owned(), Value::Object(convert_model(model,)?,),);
    }

    copy_field(monitor.fields(), "executionErrorState", &mut document, "executionErrorState",);

    if let Some(interval,) = monitor.get("interval",) {
        let interval = convert_interval(interval,)?;
        if !interval.is_empty() {
            document.insert("evaluationInterval".to_owned(), Value::Object(interval,),);
        }
    }

    Ok(document,)
}

fn convert_model(model: &Value,) -> Result<Map<String, Value,>, Error,>
{
    let model = expect_object(model, "model",)?;
    let mut converted = Map::new();

    if let Some(queries,) = model.get("queries",) {
        let queries = queries.as_array().ok_or_else(|| {
            Error::transform(format!("model.queries must be a list, found {}", kind(queries)),)
        },)?;
        let queries = queries
            .iter()
            .enumerate()
            .map(|(index, query,)| convert_query(index, query,).map(Value::Object,),)
            .collect::<Result<Vec<_,>, _,>>()?;
        converted.insert("queries".to_owned(), Value::Array(queries,),);
    }

    copy_field(model, "thresholds", &mut converted, "thresholds",);

    Ok(converted,)
}

fn convert_query(index: usize, query: &Value,) -> Result<Map<String, Value,>, Error,>
{
    let query = expect_object(query, &format!("model.queries[{index}]"),)?;
    let mut converted = Map::new();

    copy_field(query, "name", &mut converted, "name",);

    if let Some(data_type,) = query.get("dataType",) {
        converted.insert("dataType".to_owned(), data_type.clone(),);
    } else if let Some(datasource,) = query.get("datasourceType",) {
        let data_type = match datasource.as_str() {
            Some("prometheus",) => Value::String("metrics".to_owned(),),
            _ => datasource.clone(),
        };
        converted.insert("dataType".to_owned(), data_type,);
    }

    copy_first(query, &["expression", "expr"], &mut converted, "expr",);
    copy_first(query, &["editorMode", "mode"], &mut converted, "editorMode",);
    copy_field(query, "pipeline", &mut converted, "pipeline",);

    Ok(converted,)
}

fn convert_interval(interval: &Value,) -> Result<Map<String, Value,>, Error,>
{
    let interval = expect_object(interval, "interval",)?;
    let mut converted = Map::new();
    copy_field(interval, "interval", &mut converted, "interval",);
    copy_field(interval, "for", &mut converted, "pendingFor",);
    Ok(converted,)
}

fn expect_object<'value,>(
    value: &'value Value,
    field: &str,
) -> Result<&'value Map<String, Value,>, Error,>
{
    value
        .as_object()
        .ok_or_else(|| Error::transform(format!("{field} must be an object, found {}", kind(value)),),)
}

fn copy_field(
    source: &Map<String, Value,>,
    from: &str,
    target: &mut Map<String, Value,>,
    to: &str,
)
{
    if let Some(value,) = source.get(from,) {
        target.insert(to.to_owned(), value.clone(),);
    }
}

fn copy_first(
    source: &Map<String, Value,>,
    candidates: &[&str],
    target: &mut Map<String, Value,>,
    to: &str,
)
{
    if let Some(value,) = candidates.iter().find_map(|key| source.get(*key,),) {
        target.insert(to.to_owned(), value.clone(),);
    }
}
