use std::collections::HashMap;

/// Field-level problems found in a request payload, keyed by field name
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FieldErrors(HashMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `message` against `field` unless `ok` holds
    pub fn check(&mut self, ok: bool, field: &str, message: impl Into<String>) -> &mut Self {
        if !ok {
            self.0.entry(field.to_string()).or_insert_with(|| message.into());
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    pub fn into_inner(self) -> HashMap<String, String> {
        self.0
    }
}

/// Payloads that carry rules beyond what their types enforce
pub trait Validate {
    fn validate(&self) -> Result<(), FieldErrors>;
}

pub fn within_len(s: &str, min: usize, max: usize) -> bool {
    let n = s.chars().count();
    n >= min && n <= max
}
