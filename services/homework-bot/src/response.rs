//! Validation of review API responses and status message formatting

use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::BotError;

/// Review status of a homework submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeworkStatus {
    Approved,
    Reviewing,
    Rejected,
}

impl HomeworkStatus {
    /// The fixed sentence shown to the student for this status
    pub fn verdict(&self) -> &'static str {
        match self {
            HomeworkStatus::Approved => "Работа проверена: ревьюеру всё понравилось. Ура!",
            HomeworkStatus::Reviewing => "Работа взята на проверку ревьюером.",
            HomeworkStatus::Rejected => "Работа проверена: у ревьюера есть замечания.",
        }
    }
}

impl fmt::Display for HomeworkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HomeworkStatus::Approved => write!(f, "approved"),
            HomeworkStatus::Reviewing => write!(f, "reviewing"),
            HomeworkStatus::Rejected => write!(f, "rejected"),
        }
    }
}

impl FromStr for HomeworkStatus {
    type Err = BotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approved" => Ok(HomeworkStatus::Approved),
            "reviewing" => Ok(HomeworkStatus::Reviewing),
            "rejected" => Ok(HomeworkStatus::Rejected),
            other => Err(BotError::UnknownStatus(other.to_string())),
        }
    }
}

/// A validated response: the most recent homework record and the server clock
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewSnapshot<'a> {
    pub homework: &'a Value,
    pub current_date: i64,
}

/// Validate the shape of a review API body and pick the most recent record.
///
/// Checks run in a fixed order so the first violated rule decides the error.
pub fn check_response(body: &Value) -> crate::Result<ReviewSnapshot<'_>> {
    let Some(object) = body.as_object() else {
        tracing::error!("API response is not an object: {}", json_type(body));
        return Err(BotError::TypeMismatch(format!(
            "ожидался словарь, получено {}",
            json_type(body)
        )));
    };

    let homeworks = require(object, "homeworks")?;
    let current_date = require(object, "current_date")?;

    let Some(homeworks) = homeworks.as_array() else {
        tracing::error!("homeworks is not a list: {}", json_type(homeworks));
        return Err(BotError::TypeMismatch(format!(
            "homeworks: ожидался список, получено {}",
            json_type(homeworks)
        )));
    };

    let Some(homework) = homeworks.first() else {
        tracing::error!("homeworks list is empty");
        return Err(BotError::EmptyQueue);
    };

    let Some(current_date) = current_date.as_i64() else {
        tracing::error!("current_date is not an integer: {}", current_date);
        return Err(BotError::TypeMismatch(format!(
            "current_date: ожидалось целое число, получено {}",
            json_type(current_date)
        )));
    };

    Ok(ReviewSnapshot {
        homework,
        current_date,
    })
}

/// Build the chat message for a single homework record
pub fn parse_status(homework: &Value) -> crate::Result<String> {
    let Some(record) = homework.as_object() else {
        tracing::error!("Homework record is not an object: {}", json_type(homework));
        return Err(BotError::TypeMismatch(format!(
            "запись о работе: ожидался словарь, получено {}",
            json_type(homework)
        )));
    };

    let name = require(record, "homework_name")?;
    let status = require(record, "status")?;

    let name = match name {
        Value::String(name) => name.clone(),
        other => other.to_string(),
    };
    let status = match status {
        Value::String(status) => status.parse::<HomeworkStatus>(),
        other => Err(BotError::UnknownStatus(other.to_string())),
    }
    .inspect_err(|e| tracing::error!("{}", e))?;

    Ok(format_status_message(&name, status))
}

/// The fixed notification template for a status change
pub fn format_status_message(name: &str, status: HomeworkStatus) -> String {
    format!(
        "Изменился статус проверки работы \"{}\". {}",
        name,
        status.verdict()
    )
}

fn require<'a>(object: &'a Map<String, Value>, key: &str) -> crate::Result<&'a Value> {
    object.get(key).ok_or_else(|| {
        tracing::error!("Key '{}' is missing from API response", key);
        BotError::MissingField(key.to_string())
    })
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}
