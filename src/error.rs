/// Top-level error carrying the process exit code.
///
/// Exit codes:
/// - 2: input or configuration problem (bad path, missing column, bad flag)
/// - 3: no usable data
/// - 4: terminal, rendering or output failure
#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

impl From<crate::io::LoadError> for AppError {
    fn from(err: crate::io::LoadError) -> Self {
        let exit_code = match err {
            crate::io::LoadError::NoValidRows { .. } => 3,
            _ => 2,
        };
        AppError::new(exit_code, err.to_string())
    }
}

impl From<crate::chart::NavigationError> for AppError {
    fn from(err: crate::chart::NavigationError) -> Self {
        AppError::new(2, err.to_string())
    }
}
