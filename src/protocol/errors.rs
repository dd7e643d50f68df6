#[derive(Debug, Clone, PartialEq)]
pub enum FrameError {
    Invalid(String),
    /// The accumulator grew past the configured cap without a newline.
    LineTooLong(usize),
}

impl std::fmt::Display for FrameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FrameError::Invalid(msg) => write!(f, "{}", msg),
            FrameError::LineTooLong(len) => {
                write!(f, "unterminated line exceeded max length ({} bytes buffered)", len)
            }
        }
    }
}

impl std::error::Error for FrameError {}

impl From<std::io::Error> for FrameError {
    fn from(error: std::io::Error) -> Self {
        FrameError::Invalid(error.to_string())
    }
}
