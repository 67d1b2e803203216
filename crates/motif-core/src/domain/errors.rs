pub type MotifResult<T> = Result<T, MotifError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MotifErrorCategory {
    ParameterError,
    AdapterError,
    ProcessError,
    ProcessTimeoutError,
    OutputParseError,
    IoSystemError,
}

impl MotifErrorCategory {
    pub const fn exit_mapping(self) -> ExitMapping {
        match self {
            Self::ParameterError => ExitMapping {
                exit_code: 2,
                rust_category: "ParameterError",
                class: "PARAM_FATAL",
            },
            Self::AdapterError => ExitMapping {
                exit_code: 3,
                rust_category: "AdapterError",
                class: "ADAPTER_FATAL",
            },
            Self::ProcessError => ExitMapping {
                exit_code: 4,
                rust_category: "ProcessError",
                class: "RUN_FATAL",
            },
            Self::ProcessTimeoutError => ExitMapping {
                exit_code: 5,
                rust_category: "ProcessTimeoutError",
                class: "TIMEOUT_FATAL",
            },
            Self::OutputParseError => ExitMapping {
                exit_code: 6,
                rust_category: "OutputParseError",
                class: "PARSE_FATAL",
            },
            Self::IoSystemError => ExitMapping {
                exit_code: 7,
                rust_category: "IoSystemError",
                class: "IO_FATAL",
            },
        }
    }

    pub const fn exit_code(self) -> i32 {
        self.exit_mapping().exit_code
    }

    pub const fn rust_category(self) -> &'static str {
        self.exit_mapping().rust_category
    }

    pub const fn class(self) -> &'static str {
        self.exit_mapping().class
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitMapping {
    pub exit_code: i32,
    pub rust_category: &'static str,
    pub class: &'static str,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{} [{}] {}", .category.rust_category(), .placeholder, .message)]
pub struct MotifError {
    category: MotifErrorCategory,
    placeholder: &'static str,
    message: String,
    raw_output: Option<String>,
}

impl MotifError {
    pub fn new(
        category: MotifErrorCategory,
        placeholder: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category,
            placeholder,
            message: message.into(),
            raw_output: None,
        }
    }

    pub fn parameter(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(MotifErrorCategory::ParameterError, placeholder, message)
    }

    pub fn adapter(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(MotifErrorCategory::AdapterError, placeholder, message)
    }

    pub fn process(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(MotifErrorCategory::ProcessError, placeholder, message)
    }

    pub fn timeout(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(MotifErrorCategory::ProcessTimeoutError, placeholder, message)
    }

    pub fn io_system(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(MotifErrorCategory::IoSystemError, placeholder, message)
    }

    /// Output that did not match a grammar. The offending text travels with the error.
    pub fn output_parse(
        placeholder: &'static str,
        message: impl Into<String>,
        raw_output: impl Into<String>,
    ) -> Self {
        Self {
            raw_output: Some(raw_output.into()),
            ..Self::new(MotifErrorCategory::OutputParseError, placeholder, message)
        }
    }

    pub const fn category(&self) -> MotifErrorCategory {
        self.category
    }

    pub const fn placeholder(&self) -> &'static str {
        self.placeholder
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn raw_output(&self) -> Option<&str> {
        self.raw_output.as_deref()
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
