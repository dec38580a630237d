use std::error::Error;
use std::fmt::{Display, Formatter};

use crate::numerics::KernelError;

pub type EtchResult<T> = Result<T, EtchError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EtchErrorCategory {
    InputValidationError,
    IoSystemError,
    ComputationError,
    InternalError,
}

impl EtchErrorCategory {
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::InputValidationError => 2,
            Self::IoSystemError => 3,
            Self::ComputationError => 4,
            Self::InternalError => 5,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InputValidationError => "InputValidationError",
            Self::IoSystemError => "IoSystemError",
            Self::ComputationError => "ComputationError",
            Self::InternalError => "InternalError",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EtchError {
    category: EtchErrorCategory,
    placeholder: &'static str,
    message: String,
}

impl EtchError {
    pub fn new(
        category: EtchErrorCategory,
        placeholder: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category,
            placeholder,
            message: message.into(),
        }
    }

    pub fn input_validation(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(
            EtchErrorCategory::InputValidationError,
            placeholder,
            message,
        )
    }

    pub fn io_system(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(EtchErrorCategory::IoSystemError, placeholder, message)
    }

    pub fn computation(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(EtchErrorCategory::ComputationError, placeholder, message)
    }

    pub fn internal(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(EtchErrorCategory::InternalError, placeholder, message)
    }

    pub const fn category(&self) -> EtchErrorCategory {
        self.category
    }

    pub const fn placeholder(&self) -> &'static str {
        self.placeholder
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn exit_code(&self) -> i32 {
        self.category.exit_code()
    }

    pub fn diagnostic_line(&self) -> String {
        format!("ERROR: [{}] {}", self.placeholder, self.message)
    }

    pub fn fatal_exit_line(&self) -> String {
        format!("FATAL EXIT CODE: {}", self.exit_code())
    }
}

impl Display for EtchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}] {}",
            self.category.as_str(),
            self.placeholder,
            self.message
        )
    }
}

impl Error for EtchError {}

impl From<KernelError> for EtchError {
    fn from(error: KernelError) -> Self {
        let placeholder = match &error {
            KernelError::DimensionMismatch { .. } => "INPUT.CURVE_DIMENSIONS",
            KernelError::LengthMismatch { .. } => "RUN.BLEND_LENGTH",
            KernelError::DegenerateInterval { .. } | KernelError::InvalidIntervalStep { .. } => {
                "INPUT.INTERVAL"
            }
            KernelError::NonFiniteQuery { .. } => "INPUT.PARAMETER",
            KernelError::SmoothingCollapse { .. } => "INPUT.SMOOTHING",
        };
        match error {
            KernelError::LengthMismatch { .. } => Self::computation(placeholder, error.to_string()),
            _ => Self::input_validation(placeholder, error.to_string()),
        }
    }
}
