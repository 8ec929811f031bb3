use serde_json::Value;

/// Telegram chat id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChatId(pub i64);

/// Unix timestamp (seconds) marking the start of the next fetch window.
///
/// Zero means "unset": the poll cycle substitutes the current time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Cursor(pub i64);

impl Cursor {
    pub fn now() -> Self {
        Self(chrono::Utc::now().timestamp())
    }

    pub fn is_unset(self) -> bool {
        self.0 == 0
    }
}

/// Raw reply of the homework API, before any parsing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub const OK: u16 = 200;

    pub fn is_ok(&self) -> bool {
        self.status == Self::OK
    }
}

/// One homework entry as reported by the API.
///
/// Fields are picked leniently: a record that is not an object, or lacks a
/// field, yields `None` instead of failing here.
#[derive(Clone, Copy, Debug)]
pub struct HomeworkRecord<'a> {
    pub name: Option<&'a str>,
    pub status: Option<&'a Value>,
}

impl<'a> HomeworkRecord<'a> {
    pub fn from_value(raw: &'a Value) -> Self {
        Self {
            name: raw.get("homework_name").and_then(Value::as_str),
            status: raw.get("status"),
        }
    }
}
