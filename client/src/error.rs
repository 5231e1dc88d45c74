use std::fmt;

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug)]
pub enum ClientError {
    Network(reqwest::Error, String),
    Api(String, String),
    Parsing(reqwest::Error, String),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ClientError::Api(status, url) => write!(f, "API error for {url}: {status}"),
            ClientError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
        }
    }
}

impl std::error::Error for ClientError {}
