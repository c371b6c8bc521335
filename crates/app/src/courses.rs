use axum::{
    body::Bytes,
    extract::{Path, State},
    Json,
};
use metrics::{counter, gauge};
use serde_json::{Map, Value};
use tracing::info;

use course_core::{parse_course_id, Course, CourseId, CourseInput};

use crate::error::ApiError;
use crate::router::AppState;

pub async fn list(State(state): State<AppState>) -> Json<Vec<Course>> {
    counter!("course_requests_total", "op" => "list", "result" => "ok").increment(1);
    Json(state.courses().list())
}

pub async fn get(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Course>, ApiError> {
    observe("get", &state, find(&state, &raw_id)).map(Json)
}

pub async fn create(State(state): State<AppState>, body: Bytes) -> Result<Json<Course>, ApiError> {
    let result = decode_body(&body)
        .and_then(|value| CourseInput::from_body(&value).map_err(ApiError::from))
        .map(|input| {
            let course = state.courses().insert(input.name);
            info!(stage = "api", op = "create", id = course.id, "course created");
            course
        });
    observe("create", &state, result).map(Json)
}

pub async fn update(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> Result<Json<Course>, ApiError> {
    let result = decode_body(&body).and_then(|value| {
        let existing = find(&state, &raw_id)?;
        let input = CourseInput::from_body(&value)?;
        let course = state.courses().rename(existing.id, input.name)?;
        info!(stage = "api", op = "update", id = course.id, "course renamed");
        Ok(course)
    });
    observe("update", &state, result).map(Json)
}

pub async fn delete(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Course>, ApiError> {
    let result = lookup_id(&raw_id).and_then(|id| {
        let course = state.courses().remove(id)?;
        info!(stage = "api", op = "delete", id = course.id, "course removed");
        Ok(course)
    });
    observe("delete", &state, result).map(Json)
}

fn lookup_id(raw_id: &str) -> Result<CourseId, ApiError> {
    parse_course_id(raw_id).ok_or(ApiError::NotFound)
}

fn find(state: &AppState, raw_id: &str) -> Result<Course, ApiError> {
    let id = lookup_id(raw_id)?;
    Ok(state.courses().find(id)?)
}

/// Decodes a JSON request body; an empty body is read as an empty object.
fn decode_body(body: &[u8]) -> Result<Value, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Map::new()));
    }
    serde_json::from_slice(body)
        .map_err(|err| ApiError::InvalidJson(format!("invalid JSON body: {err}")))
}

fn observe(
    op: &'static str,
    state: &AppState,
    result: Result<Course, ApiError>,
) -> Result<Course, ApiError> {
    let label = match &result {
        Ok(_) => "ok",
        Err(err) => err.metric_label(),
    };
    counter!("course_requests_total", "op" => op, "result" => label).increment(1);
    gauge!("course_collection_size").set(state.courses().len() as f64);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_body_decodes_as_empty_object() {
        assert_eq!(decode_body(b"").unwrap(), Value::Object(Map::new()));
        assert_eq!(decode_body(b" \n").unwrap(), Value::Object(Map::new()));
    }

    #[test]
    fn malformed_body_is_rejected() {
        let err = decode_body(b"{\"name\":").unwrap_err();
        assert!(matches!(err, ApiError::InvalidJson(_)));
    }

    #[test]
    fn non_numeric_id_is_not_found() {
        assert!(matches!(lookup_id("abc"), Err(ApiError::NotFound)));
        assert_eq!(lookup_id("12abc").unwrap(), 12);
    }
}
