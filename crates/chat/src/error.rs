use pdftab_sheet::SheetError;
use thiserror::Error;

/// Errors raised while loading datasets or talking to the chat service
#[derive(Error, Debug)]
pub enum ChatError {
    #[error("No API key: set {0}")]
    MissingApiKey(&'static str),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Chat service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Chat service returned no answer")]
    EmptyResponse,

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Dataset error: {0}")]
    Sheet(#[from] SheetError),
}

impl From<reqwest::Error> for ChatError {
    fn from(e: reqwest::Error) -> Self {
        ChatError::Http(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ChatError>;
