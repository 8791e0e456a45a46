use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecorderError {
    #[error("capture/encoder facility unavailable: {0}")]
    Unavailable(String),
    #[error("encoder failed to start: {0}")]
    Start(String),
    #[error("could not save recording: {0}")]
    Save(String),
}
