use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown indicator family: {0}")]
    UnknownFamily(String),
}
