//! Hydration of raw record JSON into typed [`User`]s.
//!
//! The record store returns either an object
//! `{username, password, signedIn, lastTime, totalTime, sessions}` or the
//! legacy positional form
//! `[username, password, signedIn, lastTime, totalTime, sessions?]`.
//! Numbers may arrive as JSON numbers or numeric strings.

use super::session::Session;
use super::user::User;
use crate::errors::{AppError, AppResult};
use serde_json::{Map, Value, json};

pub const NOT_FOUND_MESSAGE: &str = "Unable to find any matching accounts.";

/// Parse the body of a single-record response.
///
/// An empty body, `null`, `{}` or `[]` means no record matched.
pub fn parse_user_body(body: &str) -> AppResult<User> {
    if body.trim().is_empty() {
        return Err(AppError::NotFound(NOT_FOUND_MESSAGE.into()));
    }
    let value: Value = serde_json::from_str(body)?;

    match &value {
        Value::Null => Err(AppError::NotFound(NOT_FOUND_MESSAGE.into())),
        Value::Object(map) if map.is_empty() => {
            Err(AppError::NotFound(NOT_FOUND_MESSAGE.into()))
        }
        Value::Array(items) if items.is_empty() => {
            Err(AppError::NotFound(NOT_FOUND_MESSAGE.into()))
        }
        // a one-element list wrapping the record
        Value::Array(items) if items[0].is_object() => hydrate_user(&items[0]),
        _ => hydrate_user(&value),
    }
}

/// Parse the body of a roster response: a JSON array of records.
pub fn parse_roster_body(body: &str) -> AppResult<Vec<User>> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }
    let value: Value = serde_json::from_str(body)?;
    match value {
        Value::Array(items) => items.iter().map(hydrate_user).collect(),
        Value::Null => Ok(Vec::new()),
        other => Err(AppError::Malformed(format!(
            "expected a list of records, got {}",
            kind_of(&other)
        ))),
    }
}

/// Convert one raw record (object or legacy array) into a [`User`].
pub fn hydrate_user(value: &Value) -> AppResult<User> {
    match value {
        Value::Object(map) => hydrate_object(map),
        Value::Array(items) => hydrate_legacy(items),
        other => Err(AppError::Malformed(format!(
            "expected a record, got {}",
            kind_of(other)
        ))),
    }
}

fn hydrate_object(map: &Map<String, Value>) -> AppResult<User> {
    let name = map
        .get("username")
        .or_else(|| map.get("name"))
        .and_then(Value::as_str)
        .ok_or_else(|| AppError::Malformed("record has no username".into()))?;
    let password = map
        .get("password")
        .and_then(as_text)
        .ok_or_else(|| AppError::Malformed(format!("record '{name}' has no password")))?;

    build_user(
        name,
        &password,
        map.get("signedIn"),
        map.get("lastTime"),
        map.get("totalTime"),
        map.get("sessions"),
    )
}

fn hydrate_legacy(items: &[Value]) -> AppResult<User> {
    let name = items
        .first()
        .and_then(Value::as_str)
        .ok_or_else(|| AppError::Malformed("legacy record has no username".into()))?;
    let password = items
        .get(1)
        .and_then(as_text)
        .ok_or_else(|| AppError::Malformed(format!("legacy record '{name}' has no password")))?;

    build_user(
        name,
        &password,
        items.get(2),
        items.get(3),
        items.get(4),
        items.get(5),
    )
}

fn build_user(
    name: &str,
    password: &str,
    signed_in: Option<&Value>,
    last_time: Option<&Value>,
    total_time: Option<&Value>,
    sessions: Option<&Value>,
) -> AppResult<User> {
    let sessions = match sessions {
        Some(Value::Array(list)) => list
            .iter()
            .map(hydrate_session)
            .collect::<AppResult<Vec<_>>>()?,
        Some(Value::Null) | None => Vec::new(),
        Some(other) => {
            return Err(AppError::Malformed(format!(
                "sessions of '{name}' should be a list, got {}",
                kind_of(other)
            )));
        }
    };

    let mut user = User {
        name: name.to_string(),
        password: password.to_string(),
        signed_in: signed_in.and_then(as_flag).unwrap_or(false),
        last_transition_time: last_time.and_then(as_int).unwrap_or(0),
        total_time_seconds: 0,
        sessions,
    };
    user.total_time_seconds = total_time
        .and_then(as_int)
        .unwrap_or_else(|| user.computed_total());
    Ok(user)
}

fn hydrate_session(value: &Value) -> AppResult<Session> {
    let map = value.as_object().ok_or_else(|| {
        AppError::Malformed(format!("expected a session object, got {}", kind_of(value)))
    })?;

    let end = map
        .get("date")
        .and_then(as_int)
        .ok_or_else(|| AppError::Malformed("session has no end timestamp".into()))?;

    Ok(Session {
        end_timestamp: end,
        duration_seconds: map.get("time").and_then(as_int).unwrap_or(0).max(0),
        note: map.get("did").and_then(as_text).unwrap_or_default(),
        flagged: map.get("flagged").and_then(as_flag).unwrap_or(false),
    })
}

/// Serialize a [`User`] back into the object form served by the store.
pub fn to_record_json(user: &User) -> Value {
    let sessions: Vec<Value> = user
        .sessions
        .iter()
        .map(|s| {
            json!({
                "date": s.end_timestamp,
                "did": s.note,
                "time": s.duration_seconds,
                "flagged": s.flagged,
            })
        })
        .collect();

    json!({
        "username": user.name,
        "password": user.password,
        "signedIn": user.signed_in,
        "lastTime": user.last_transition_time,
        "totalTime": user.total_time_seconds,
        "sessions": sessions,
    })
}

fn as_int(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f as i64))
        }
        _ => None,
    }
}

fn as_flag(v: &Value) -> Option<bool> {
    match v {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_i64().map(|i| i != 0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Some(true),
            "false" | "0" | "" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn as_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn kind_of(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
