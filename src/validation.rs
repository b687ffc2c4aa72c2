/// A single failed field constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

/// Every constraint a submitted record failed.
#[derive(Debug, Clone, Default, PartialEq, Eq, thiserror::Error)]
#[error("model is invalid{}", describe(.errors))]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: &'static str) {
        self.errors.push(FieldError { field, message });
    }

    /// Records a `required` error when `value` is blank.
    pub fn require(&mut self, field: &'static str, value: &str) {
        if value.trim().is_empty() {
            self.add(field, "required");
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    /// Converts the collected errors into a result.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

fn describe(errors: &[FieldError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, e)| format!("{}{} {}", if i == 0 { ": " } else { ", " }, e.field, e.message))
        .collect()
}

/// Basic field constraints for records submitted to a handler.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors>;
}
