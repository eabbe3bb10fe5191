use std::fmt;
use std::io;

/// Error type representing possible errors at the CLI boundary.
#[derive(Debug)]
pub enum CliError {
    /// The operation involved file or device I/O which failed, providing
    /// the underlying io::Error.
    Io(io::Error),
    /// Both `--encode` and `--decode` were requested at once.
    ModeConflict,
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Io(ref e) => write!(f, "I/O error: {e}"),
            CliError::ModeConflict => write!(f, "cannot encode and decode at the same time"),
        }
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e)
    }
}

impl CliError {
    /// The process exit code documented for this failure: 0 success,
    /// 1 file error, 2 conflicting mode flags.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Io(_) => 1,
            CliError::ModeConflict => 2,
        }
    }
}
