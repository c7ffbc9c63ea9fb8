//! Field validation
//!
//! "Required, non-empty" checks over request bodies. All failures are
//! collected and reported together as a list of [`FieldError`]s.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single failed field check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    #[serde(default)]
    pub value: String,
    pub msg: String,
    pub param: String,
    #[serde(default = "body_location")]
    pub location: String,
}

impl FieldError {
    pub fn new(param: &str, value: &str, msg: &str) -> Self {
        Self {
            value: value.to_string(),
            msg: msg.to_string(),
            param: param.to_string(),
            location: body_location(),
        }
    }
}

fn body_location() -> String {
    "body".to_string()
}

/// Collects field errors in the order checks are declared
#[derive(Debug, Default)]
pub struct Checks {
    errors: Vec<FieldError>,
}

impl Checks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error unless `value` holds something other than whitespace
    pub fn required(&mut self, param: &str, value: Option<&str>, msg: &str) -> &mut Self {
        if value.map_or(true, |v| v.trim().is_empty()) {
            self.push(param, value.unwrap_or_default(), msg);
        }
        self
    }

    /// Parse a `YYYY-MM-DD` date, recording `msg` when it is present but invalid
    ///
    /// Absent or blank values yield `None` without an error; pair with
    /// [`Checks::required`] when the date is mandatory.
    pub fn date(&mut self, param: &str, value: Option<&str>, msg: &str) -> Option<NaiveDate> {
        let raw = value.map(str::trim).filter(|v| !v.is_empty())?;
        match parse_date(raw) {
            Some(date) => Some(date),
            None => {
                self.push(param, raw, msg);
                None
            }
        }
    }

    fn push(&mut self, param: &str, value: &str, msg: &str) {
        self.errors.push(FieldError::new(param, value, msg));
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Finish checking, returning the collected errors if there are any
    pub fn finish(self) -> Result<(), Vec<FieldError>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

/// Accepts a plain date or the date part of an RFC 3339 timestamp
fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok().or_else(|| {
        chrono::DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| dt.date_naive())
    })
}
