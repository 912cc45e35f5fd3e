use thiserror::Error;

use crate::codec::CodecError;

pub type Result<T> = std::result::Result<T, KeyCodecError>;

#[derive(Debug, Error)]
pub enum KeyCodecError {
    #[error("Ошибка разбора ключа: {0}")]
    Codec(#[from] CodecError),

    #[error("Неверный мастер-пароль или повреждённое хранилище")]
    DecryptionFailed,

    #[error("Ошибка шифрования: {0}")]
    EncryptionFailed(String),

    #[error("Секрет '{0}' не найден")]
    SecretNotFound(String),

    #[error("Недопустимое имя секрета: '{0}'")]
    InvalidSecretName(String),

    #[error("Неверная конфигурация: {0}")]
    InvalidConfig(String),

    #[error("Операция отменена пользователем")]
    Cancelled,

    #[error("Ошибка ввода-вывода: {0}")]
    Io(#[from] std::io::Error),

    #[error("Ошибка JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}
