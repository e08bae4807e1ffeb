//! Error types for the homework bot
//!
//! Display strings of the polling pipeline errors end up in the chat, so they
//! are written for the person reading it.

/// Errors that can occur while polling reviews and relaying notifications
#[derive(Debug, thiserror::Error)]
pub enum BotError {
    #[error("Эндпоинт {url} недоступен. Код ответа API: {status}")]
    EndpointUnavailable { url: String, status: u16 },

    #[error("Сбой при запросе к API: {0}")]
    Transport(String),

    #[error("Неожиданный тип данных в ответе API: {0}")]
    TypeMismatch(String),

    #[error("В ответе API отсутствует ключ {0}")]
    MissingField(String),

    #[error("Список работ на проверке пуст")]
    EmptyQueue,

    #[error("Недокументированный статус домашней работы: {0}")]
    UnknownStatus(String),

    #[error("Не удалось отправить сообщение \"{message}\": {reason}")]
    Delivery { message: String, reason: String },

    #[error("Чат-бот отклонил запрос: {0}")]
    Notifier(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for homework bot operations
pub type Result<T> = std::result::Result<T, BotError>;
