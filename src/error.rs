/// The result type used across the network engine.
pub type Result<T> = std::result::Result<T, Error>;

/// Engine errors. All failures are synchronous and surfaced to the immediate
/// caller; the engine never retries or logs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("cannot build a network from an empty layer specification")]
    EmptyNetwork,

    #[error("expected a vector of length {expected}, got {got}")]
    ShapeMismatch { expected: usize, got: usize },

    #[error("unknown function name `{0}`")]
    UnknownFunction(String),

    #[error("a {activation} output layer cannot be trained against {loss} loss")]
    UnsupportedPairing {
        activation: &'static str,
        loss: &'static str,
    },
}
