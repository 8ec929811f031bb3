//! Status code to verdict text mapping.

use std::collections::HashMap;

use serde_json::Value;

use crate::{domain::HomeworkRecord, Error, Result};

/// Fixed table of localized verdicts, keyed by API status code.
#[derive(Clone, Debug)]
pub struct VerdictTable {
    verdicts: HashMap<String, String>,
}

impl Default for VerdictTable {
    fn default() -> Self {
        Self::new([
            ("approved", "Работа проверена: ревьюеру всё понравилось. Ура!"),
            ("reviewing", "Работа взята на проверку ревьюером."),
            ("rejected", "Работа проверена: у ревьюера есть замечания."),
        ])
    }
}

impl VerdictTable {
    pub fn new<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            verdicts: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn verdict(&self, code: &str) -> Option<&str> {
        self.verdicts.get(code).map(String::as_str)
    }

    /// Render the notification text for one raw homework record.
    pub fn parse_status(&self, raw: &Value) -> Result<String> {
        let record = HomeworkRecord::from_value(raw);

        let verdict = match record.status {
            Some(Value::String(code)) => self
                .verdict(code)
                .ok_or_else(|| Error::UnknownStatus(code.clone()))?,
            Some(other) => return Err(Error::UnknownStatus(other.to_string())),
            None => return Err(Error::UnknownStatus(Value::Null.to_string())),
        };

        let name = record.name.unwrap_or_default();
        Ok(format!(
            "Изменился статус проверки работы \"{name}\". {verdict}"
        ))
    }
}
