use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use super::lossy;

/// Data handed to Gemini alongside a question, keyed by section name.
///
/// Keys serialize in sorted order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InsightContext {
    entries: Map<String, Value>,
}

impl InsightContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a section. Only the parts serde cannot express as JSON are
    /// replaced by strings, so building a context never fails and a single
    /// odd field does not hide its siblings.
    pub fn insert<T>(&mut self, key: impl Into<String>, value: &T) -> &mut Self
    where
        T: Serialize + fmt::Debug + ?Sized,
    {
        self.entries.insert(key.into(), to_value_lossy(value));
        self
    }

    pub fn with<T>(mut self, key: impl Into<String>, value: &T) -> Self
    where
        T: Serialize + fmt::Debug + ?Sized,
    {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pretty JSON text of every section.
    pub fn to_text(&self) -> String {
        to_context_text(&self.entries)
    }
}

/// Pretty JSON for any value, falling back to its debug form.
pub fn to_context_text<T>(data: &T) -> String
where
    T: Serialize + fmt::Debug + ?Sized,
{
    serde_json::to_string_pretty(&to_value_lossy(data)).unwrap_or_else(|_| format!("{data:?}"))
}

fn to_value_lossy<T>(value: &T) -> Value
where
    T: Serialize + fmt::Debug + ?Sized,
{
    lossy::to_value(value).unwrap_or_else(|_| Value::String(format!("{value:?}")))
}
