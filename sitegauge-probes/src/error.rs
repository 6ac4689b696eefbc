use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("{service} returned status {status}: {body}")]
    ServiceStatus {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("Missing credential: {0}")]
    MissingCredential(&'static str),
}

pub type Result<T> = std::result::Result<T, ProbeError>;
