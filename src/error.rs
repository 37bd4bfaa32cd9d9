// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeMap;
use std::fmt;

pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

/// Errors surfaced by the remote API client.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// 401 from the server. The session has already been cleared.
    #[error("session expired or not signed in; please log in again")]
    Unauthorized,

    /// Any other 4xx/5xx, with the server's message or the generic fallback.
    #[error("{message}")]
    Status {
        status: u16,
        message: String,
        fields: BTreeMap<String, Vec<String>>,
    },

    #[error("network error: {0}")]
    Transport(String),

    #[error("unexpected response: {0}")]
    Decode(String),

    /// 2xx with an empty `data` where one was required.
    #[error("{0}")]
    MissingData(&'static str),

    #[error("could not store session: {0}")]
    Storage(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized => Some(401),
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Single-line text for the error banner.
    pub fn banner(&self) -> String {
        match self {
            ApiError::Status { message, .. } if !message.trim().is_empty() => message.clone(),
            ApiError::Status { .. } | ApiError::Transport(_) | ApiError::Decode(_) => {
                GENERIC_FAILURE.to_string()
            }
            other => other.to_string(),
        }
    }
}

/// Per-field messages produced by client-side validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }

    pub fn into_result(self) -> Result<(), ValidationError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ValidationError(self))
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, msg) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", field, msg)?;
            first = false;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid input: {0}")]
pub struct ValidationError(pub FieldErrors);

impl ValidationError {
    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.add(field, message);
        ValidationError(errors)
    }

    pub fn fields(&self) -> &FieldErrors {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TrackerError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// Same mutation submitted again before the first one resolved.
    #[error("{0} is already in progress")]
    Busy(String),
}

pub type Result<T, E = TrackerError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banner_falls_back_to_generic_message() {
        let e = ApiError::Status {
            status: 500,
            message: String::new(),
            fields: BTreeMap::new(),
        };
        assert_eq!(e.banner(), GENERIC_FAILURE);
        let e = ApiError::Status {
            status: 400,
            message: "Amount must be positive".into(),
            fields: BTreeMap::new(),
        };
        assert_eq!(e.banner(), "Amount must be positive");
    }

    #[test]
    fn first_message_per_field_wins() {
        let mut errs = FieldErrors::new();
        errs.add("email", "Email is required");
        errs.add("email", "Please enter a valid email");
        assert_eq!(errs.get("email"), Some("Email is required"));
        assert_eq!(errs.len(), 1);
    }
}
