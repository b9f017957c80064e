use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgroError {
    #[error("http request error: {0}")]
    Http(#[from] ureq::Error),
    #[error("json document error: {0}")]
    Document(#[from] serde_json::Error),
    #[error("unexpected response shape: {0}")]
    Shape(String),
}
