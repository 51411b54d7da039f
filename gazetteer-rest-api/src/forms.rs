//! Form validation
//!
//! A [`FormSchema`] is an ordered list of field rules registered per
//! operation at resource-definition time. Validation coerces and
//! normalizes a raw JSON payload into a clean attribute mapping, or
//! produces a structured `{field: [messages...]}` error map. Update
//! validation is seeded with the current record's values, so a partial
//! payload never fails on fields the record already satisfies.
//!
//! Unknown payload keys are ignored.

use gazetteer_api_types::errors::FieldErrors;
use gazetteer_interfaces::{AttrMap, FieldValue};
use serde_json::Value;

/// The payload type a field accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
    Boolean,
}

/// One field rule of a form schema.
#[derive(Debug, Clone)]
pub struct FieldRule {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub max_length: Option<usize>,
    pub default: Option<FieldValue>,
}

impl FieldRule {
    pub fn text(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Text,
            required: false,
            max_length: None,
            default: None,
        }
    }

    pub fn integer(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Integer,
            required: false,
            max_length: None,
            default: None,
        }
    }

    pub fn boolean(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Boolean,
            required: false,
            max_length: None,
            default: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn max_length(mut self, limit: usize) -> Self {
        self.max_length = Some(limit);
        self
    }

    pub fn default_value(mut self, value: impl Into<FieldValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    fn coerce(&self, raw: &Value) -> Result<FieldValue, String> {
        match self.kind {
            FieldKind::Text => {
                let text = match raw {
                    Value::String(s) => s.clone(),
                    Value::Number(n) => n.to_string(),
                    _ => return Err("Not a valid string.".to_string()),
                };
                if let Some(limit) = self.max_length {
                    if text.chars().count() > limit {
                        return Err(format!("Must be at most {} characters.", limit));
                    }
                }
                Ok(FieldValue::Text(text))
            }
            FieldKind::Integer => match raw {
                Value::Number(n) => n
                    .as_i64()
                    .map(FieldValue::Integer)
                    .ok_or_else(|| "Not a valid integer.".to_string()),
                Value::String(s) => s
                    .parse::<i64>()
                    .map(FieldValue::Integer)
                    .map_err(|_| "Not a valid integer.".to_string()),
                _ => Err("Not a valid integer.".to_string()),
            },
            FieldKind::Boolean => match raw {
                Value::Bool(b) => Ok(FieldValue::Boolean(*b)),
                Value::Number(n) => Ok(FieldValue::Boolean(n.as_i64() != Some(0))),
                Value::String(s) => Ok(FieldValue::Boolean(!matches!(
                    s.to_ascii_lowercase().as_str(),
                    "false" | "f" | "n" | "no" | "0" | ""
                ))),
                _ => Err("Not a valid boolean.".to_string()),
            },
        }
    }
}

/// An ordered set of field rules for one operation.
#[derive(Debug, Clone, Default)]
pub struct FormSchema {
    rules: Vec<FieldRule>,
}

impl FormSchema {
    pub fn new(rules: Vec<FieldRule>) -> Self {
        Self { rules }
    }

    /// A schema with no fields: validates any payload to an empty mapping.
    /// Used by named actions that take no parameters but must still be
    /// registered with a schema.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Validate a raw payload, optionally seeded with current values.
    ///
    /// Explicit `null` clears an optional field; absence falls back to the
    /// seed, then the declared default. A required field missing from all
    /// three is a field error, and nothing is persisted on any error.
    pub fn validate(&self, payload: &Value, seed: Option<&AttrMap>) -> Result<AttrMap, FieldErrors> {
        let mut attrs = AttrMap::new();
        let mut errors = FieldErrors::new();
        let object = payload.as_object();

        for rule in &self.rules {
            let raw = object.and_then(|map| map.get(rule.name));

            match raw {
                Some(Value::Null) => {
                    if rule.required {
                        push_error(&mut errors, rule.name, "This field is required.");
                    } else {
                        attrs.insert(rule.name.to_string(), FieldValue::Null);
                    }
                }
                Some(value) => match rule.coerce(value) {
                    Ok(coerced) => {
                        attrs.insert(rule.name.to_string(), coerced);
                    }
                    Err(message) => push_error(&mut errors, rule.name, &message),
                },
                None => {
                    if let Some(current) = seed.and_then(|s| s.get(rule.name)) {
                        if !current.is_null() {
                            attrs.insert(rule.name.to_string(), current.clone());
                            continue;
                        }
                    }
                    if let Some(default) = &rule.default {
                        attrs.insert(rule.name.to_string(), default.clone());
                    } else if rule.required {
                        push_error(&mut errors, rule.name, "This field is required.");
                    }
                }
            }
        }

        if errors.is_empty() {
            Ok(attrs)
        } else {
            Err(errors)
        }
    }
}

fn push_error(errors: &mut FieldErrors, field: &str, message: &str) {
    errors
        .entry(field.to_string())
        .or_default()
        .push(message.to_string());
}

/// Lift an arbitrary JSON object into an attribute mapping without
/// validation. Used for named detail actions registered without a schema,
/// where the raw payload passes through to the handler.
pub fn attrs_from_json(payload: &Value) -> AttrMap {
    let mut attrs = AttrMap::new();
    if let Some(object) = payload.as_object() {
        for (key, value) in object {
            let field = match value {
                Value::Null => FieldValue::Null,
                Value::Bool(b) => FieldValue::Boolean(*b),
                Value::Number(n) => match n.as_i64() {
                    Some(i) => FieldValue::Integer(i),
                    None => FieldValue::Text(n.to_string()),
                },
                Value::String(s) => FieldValue::Text(s.clone()),
                // nested structures have no column representation
                _ => continue,
            };
            attrs.insert(key.clone(), field);
        }
    }
    attrs
}
