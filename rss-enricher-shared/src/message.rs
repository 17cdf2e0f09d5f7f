//! Decoded feed item.

use serde_json::{Map, Value};

/// A feed item decoded from the input topic.
///
/// Always a JSON object. Expected (not enforced) fields are `id`, `title`,
/// `content`, `link`, `date`, `author`, `categories` and `feed.title`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedMessage {
    fields: Map<String, Value>,
}

impl ParsedMessage {
    /// Wrap an already-parsed JSON object.
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// All top-level field names.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Raw access to a top-level field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Text of a top-level field.
    ///
    /// Missing and `null` fields read as an empty string. Non-string values
    /// are rendered as their JSON text.
    pub fn text(&self, key: &str) -> String {
        value_text(self.fields.get(key))
    }

    /// Title of the nested `feed` descriptor, or an empty string.
    pub fn feed_title(&self) -> String {
        value_text(self.fields.get("feed").and_then(|feed| feed.get("title")))
    }

    /// The `categories` list. Anything other than an array reads as empty.
    pub fn categories(&self) -> Vec<String> {
        match self.fields.get("categories") {
            Some(Value::Array(items)) => items
                .iter()
                .filter(|item| !item.is_null())
                .map(|item| value_text(Some(item)))
                .collect(),
            _ => Vec::new(),
        }
    }
}

impl TryFrom<Value> for ParsedMessage {
    type Error = Value;

    /// Accepts only JSON objects; any other value is handed back unchanged.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(fields) => Ok(Self::new(fields)),
            other => Err(other),
        }
    }
}

fn value_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
