//! Shape checks for the homework API payload.

use serde_json::Value;

use crate::{domain::Cursor, Error, Result};

const HOMEWORKS_KEY: &str = "homeworks";
const CURRENT_DATE_KEY: &str = "current_date";

/// Confirm the payload is an object carrying a `homeworks` array and return
/// the raw records in server order.
pub fn check_response(response: &Value) -> Result<&[Value]> {
    let Some(fields) = response.as_object() else {
        return Err(Error::MalformedResponse(format!(
            "ожидался объект, получен тип {}",
            json_type(response)
        )));
    };

    let Some(homeworks) = fields.get(HOMEWORKS_KEY) else {
        return Err(Error::MalformedResponse(format!(
            "в ответе нет ключа \"{HOMEWORKS_KEY}\""
        )));
    };

    match homeworks.as_array() {
        Some(records) => Ok(records.as_slice()),
        None => Err(Error::MalformedResponse(format!(
            "некорректный тип {} у ключа \"{HOMEWORKS_KEY}\", ожидался array",
            json_type(homeworks)
        ))),
    }
}

/// Server-reported time of the response, if present and integral.
pub fn current_date(response: &Value) -> Option<Cursor> {
    response
        .get(CURRENT_DATE_KEY)
        .and_then(Value::as_i64)
        .map(Cursor)
}

pub(crate) fn json_type(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
