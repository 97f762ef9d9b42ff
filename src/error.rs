use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrgChartError {
    #[error("invalid input JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config file: {0}")]
    Config(#[from] json5::Error),
    #[error("expected {expected} at the top level of the input")]
    UnexpectedShape { expected: &'static str },
    #[error("unknown theme: {0}")]
    UnknownTheme(String),
    #[error("invalid UBR level: {0}")]
    UnknownDivision(String),
    #[error("no data found for division {0}")]
    EmptyDivision(String),
    #[error("{count} rows with missing corporate title found for division {division}")]
    MissingTitles { division: String, count: usize },
}

pub type Result<T> = std::result::Result<T, OrgChartError>;
