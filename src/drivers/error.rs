use thiserror::Error;
#[derive(Debug, Error)]
pub enum ScopeError {
    #[error("transfer incomplete: expected {expected} bytes, got {actual}")]
    Transfer { expected: usize, actual: usize },
    #[error("serial bridge error: {0}")]
    Serial(#[from] serialport::Error),
    #[error("link i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed frame: expected {expected} words, got {actual}")]
    MalformedFrame { expected: usize, actual: usize },
    #[error("timebase word yields a zero divisor")]
    ZeroTimebase,
    #[error("failed to render plot: {0}")]
    Plot(String),
}
impl ScopeError {
    /// Link failures end the run; frame problems only cost the current cycle.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ScopeError::Transfer { .. } | ScopeError::Serial(_) | ScopeError::Io(_)
        )
    }
}
impl<E: std::error::Error + Send + Sync + 'static> From<plotters::drawing::DrawingAreaErrorKind<E>>
    for ScopeError
{
    fn from(value: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        ScopeError::Plot(format!("{value:?}"))
    }
}
impl From<image::ImageError> for ScopeError {
    fn from(value: image::ImageError) -> Self {
        ScopeError::Plot(value.to_string())
    }
}
