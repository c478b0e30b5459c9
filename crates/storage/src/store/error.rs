#![forbid(unsafe_code)]

#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Sql(rusqlite::Error),
    InvalidInput(&'static str),
    UserExists,
    EmailTaken,
    CategoryNameTaken,
    UnknownCategory,
    UnknownAchievement,
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "io: {err}"),
            Self::Sql(err) => write!(f, "sqlite: {err}"),
            Self::InvalidInput(message) => write!(f, "invalid input: {message}"),
            Self::UserExists => write!(f, "user already registered"),
            Self::EmailTaken => write!(f, "email already registered"),
            Self::CategoryNameTaken => write!(f, "category name already exists"),
            Self::UnknownCategory => write!(f, "unknown category"),
            Self::UnknownAchievement => write!(f, "unknown achievement"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sql(value)
    }
}
