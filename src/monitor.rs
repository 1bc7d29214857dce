// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Monitor records as returned by the groundcover API.
//!
//! Records are kept as an ordered [`serde_json::Map`] so vendor-defined
//! shapes pass through without a fixed schema, and key order follows the API
//! response.

use serde_json::{Map, Value};

use crate::error::Error;

/// Keys probed, in order, for the monitor's display name.
const DISPLAY_NAME_KEYS: &[&str] = &["title", "name"];

/// Raw monitor record fetched from the API.
#[derive(Debug, Clone, PartialEq,)]
pub struct Monitor
{
    fields: Map<String, Value,>,
}

impl Monitor
{
    /// Wraps a JSON value, requiring it to be a mapping.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transform`](Error::Transform) when the value is not a
    /// JSON object.
    pub fn from_value(value: Value,) -> Result<Self, Error,>
    {
        match value {
            Value::Object(fields,) => Ok(Self {
                fields,
            },),
            other => {
                Err(Error::transform(format!("expected a monitor object, found {}", kind(&other)),),)
            }
        }
    }

    /// Human readable name: `title`, then `name`, or an empty string.
    pub fn display_name(&self,) -> &str
    {
        DISPLAY_NAME_KEYS
            .iter()
            .find_map(|key| self.fields.get(*key,).and_then(Value::as_str,),)
            .unwrap_or_default()
    }

    /// Monitor id when present as a string or number.
    pub fn id(&self,) -> Option<String,>
    {
        match self.fields.get("id",)? {
            Value::String(id,) => Some(id.clone(),),
            Value::Number(id,) => Some(id.to_string(),),
            _ => None,
        }
    }

    /// Looks up a top-level field.
    pub fn get(&self, key: &str,) -> Option<&Value,>
    {
        self.fields.get(key,)
    }

    /// Borrows every top-level field in API order.
    pub fn fields(&self,) -> &Map<String, Value,>
    {
        &self.fields
    }
}

/// Short description of a JSON value's type for diagnostics.
pub(crate) fn kind(value: &Value,) -> &'static str
{
    match value {
        Value::Null => "null",
        Value::Bool(_,) => "a boolean",
        Value::Number(_,) => "a number",
        Value::String(_,) => "a string",
        Value::Array(_,) => "a list",
        Value::Object(_,) => "an object",
    }
}
