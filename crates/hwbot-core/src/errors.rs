/// Core error type for the notifier.
///
/// Adapter crates map their transport errors into these variants so the poll
/// loop can classify failures without knowing about reqwest or teloxide.
/// Display strings are relayed to the chat as-is, hence the localized text.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("Эндпоинт {endpoint} недоступен: {reason}")]
    EndpointUnreachable { endpoint: String, reason: String },

    #[error("Код ответа API {code} не соответствует ожидаемому при запросе {endpoint}.")]
    UnexpectedStatusCode { endpoint: String, code: u16 },

    #[error("Ответ сервера не в формате json: {0}")]
    InvalidPayload(#[source] serde_json::Error),

    #[error("Некорректный ответ API: {0}")]
    MalformedResponse(String),

    #[error("Недокументированный статус \"{0}\" домашней работы.")]
    UnknownStatus(String),

    #[error("Возникла ошибка при отправке сообщения: {0}")]
    NotificationFailure(String),
}

impl Error {
    /// Short machine-friendly name of the failure, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Config(_) => "config",
            Error::EndpointUnreachable { .. } => "endpoint_unreachable",
            Error::UnexpectedStatusCode { .. } => "unexpected_status_code",
            Error::InvalidPayload(_) => "invalid_payload",
            Error::MalformedResponse(_) => "malformed_response",
            Error::UnknownStatus(_) => "unknown_status",
            Error::NotificationFailure(_) => "notification_failure",
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
