use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty { field: &'static str },
    PollTimeOutOfRange { min: u32, max: u32, actual: u32 },
    InvalidUrl { field: &'static str, input: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::PollTimeOutOfRange { min, max, actual } => {
                write!(
                    f,
                    "poll time out of range: {actual} seconds (expected {min}..={max})"
                )
            }
            Self::InvalidUrl { field, input } => write!(f, "invalid {field}: {input}"),
        }
    }
}

impl std::error::Error for ValidationError {}
