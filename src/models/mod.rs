//! Data models and request types

pub mod author;
pub mod book;
pub mod user;

use validator::ValidationErrors;

/// Flatten validator errors into the single human-readable string carried
/// by the error envelope.
pub fn validation_message(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .values()
        .flat_map(|field| field.iter())
        .map(|e| {
            e.message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| e.code.to_string())
        })
        .collect();
    messages.sort();
    messages.join(", ")
}
