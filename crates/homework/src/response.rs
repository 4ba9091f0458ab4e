use config::EmptyHomeworksPolicy;
use serde_json::Value;

use crate::error::PollError;

/// A single homework entry of the statuses response, kept as received.
///
/// Entries are not checked up front; a missing or mistyped key is reported only when the
/// record is actually read, so a broken old entry never hides the current one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeworkRecord(Value);

impl From<Value> for HomeworkRecord {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl HomeworkRecord {
    /// The `homework_name` key.
    pub fn homework_name(&self) -> Result<&str, PollError> {
        self.str_field("homework_name")
    }

    /// The raw `status` key.
    pub fn status(&self) -> Result<&str, PollError> {
        self.str_field("status")
    }

    /// Name and status, or the first missing key.
    pub fn fields(&self) -> Result<(&str, &str), PollError> {
        Ok((self.homework_name()?, self.status()?))
    }

    fn str_field(&self, key: &'static str) -> Result<&str, PollError> {
        let Value::Object(map) = &self.0 else {
            return Err(PollError::MalformedResponse(format!(
                "homework is not an object, got {}",
                kind_of(&self.0)
            )));
        };
        match map.get(key) {
            None => Err(PollError::MissingField(key)),
            Some(Value::String(value)) => Ok(value),
            Some(other) => Err(PollError::MalformedResponse(format!(
                "homework {:?} is not a string, got {}",
                key,
                kind_of(other)
            ))),
        }
    }
}

/// Check the response shape and extract the homework records in their original order.
pub fn validate(
    payload: &Value,
    policy: EmptyHomeworksPolicy,
) -> Result<Vec<HomeworkRecord>, PollError> {
    let Value::Object(map) = payload else {
        return Err(PollError::MalformedResponse(format!(
            "expected a JSON object, got {}",
            kind_of(payload)
        )));
    };

    let homeworks = match map.get("homeworks") {
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(PollError::MalformedResponse(format!(
                "\"homeworks\" is not a list, got {}",
                kind_of(other)
            )));
        }
        None => {
            return Err(PollError::MalformedResponse("\"homeworks\" key is missing".to_owned()));
        }
    };

    if homeworks.is_empty() && policy == EmptyHomeworksPolicy::Fail {
        return Err(PollError::NoPendingEntities);
    }

    Ok(homeworks.iter().cloned().map(HomeworkRecord::from).collect())
}

const fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
