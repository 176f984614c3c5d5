use thiserror::Error;

/// Everything that can go wrong when configuring a [Waveform](struct@crate::Waveform) or
/// starting one of its flows.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WaveformError {
    #[error("waveform is running already")]
    AlreadyRunning,
    #[error("tick interval must be a positive amount of milliseconds, got {0}")]
    InvalidInterval(u64),
    #[error("invalid value for parameter {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },
    #[error("unknown wave shape: {0}")]
    UnknownShape(String),
    #[error("failed to spawn the flow producer")]
    ProducerSpawn(#[source] std::io::Error),
}
