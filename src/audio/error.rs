use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum AudioError {
    #[error("Audio output device error: {0}")]
    Device(String),

    #[error("Decoding error: {0}")]
    Decode(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Autoplay rejected by the host environment")]
    AutoplayBlocked,

    #[error("Load superseded")]
    Interrupted,
}
