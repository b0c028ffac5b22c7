use std::io;

/// Errors surfaced by instance orchestration.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Instance {0} already exists")]
    InstanceExists(String),
    #[error("failed to invoke `{command}`: {source}")]
    ManagerInvocation {
        command: String,
        #[source]
        source: io::Error,
    },
    #[error("`{command}` failed: {detail}")]
    ManagerFailure { command: String, detail: String },
    #[error("cannot determine a project name from the current directory")]
    ProjectName,
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Process exit status for this error. Creation against a taken name
    /// exits with a distinct status so scripts can tell it apart.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::InstanceExists(_) => 4,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
