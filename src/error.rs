use thiserror::Error;

pub type ScopeResult<T> = Result<T, ScopeError>;

#[derive(Debug, Error)]
pub enum ScopeError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("unknown column: {0}")]
    UnknownColumn(String),

    #[error("x and y values must have the same length: x={x_len}, y={y_len}")]
    MismatchedLength { x_len: usize, y_len: usize },

    #[error("no update strategy for render backend `{0}`")]
    UnknownBackend(String),

    #[error("data source error: {0}")]
    DataSource(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("engine is closed")]
    EngineClosed,

    #[error("sampling loop failed: {0}")]
    EngineFailed(String),
}
