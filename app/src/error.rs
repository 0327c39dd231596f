use std::fmt;

#[derive(Debug)]
pub enum BotError {
    Http(reqwest::Error),
    Api { code: Option<i64>, description: String },
    Io(std::io::Error),
    Config(String),
    UnknownDistrict(String),
    UnknownRoute(String),
    InvalidCatalog(String),
    InvalidResponse(String),
}

impl fmt::Display for BotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(e) => write!(f, "HTTP error: {e}"),
            Self::Api {
                code: Some(code),
                description,
            } => write!(f, "Telegram API error {code}: {description}"),
            Self::Api {
                code: None,
                description,
            } => write!(f, "Telegram API error: {description}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Config(msg) => write!(f, "Configuration error: {msg}"),
            Self::UnknownDistrict(name) => write!(f, "Unknown district: {name}"),
            Self::UnknownRoute(id) => write!(f, "Unknown route: {id}"),
            Self::InvalidCatalog(msg) => write!(f, "Invalid catalog: {msg}"),
            Self::InvalidResponse(msg) => write!(f, "Invalid response: {msg}"),
        }
    }
}

impl std::error::Error for BotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Http(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for BotError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e)
    }
}

impl From<std::io::Error> for BotError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

pub type Result<T> = std::result::Result<T, BotError>;
