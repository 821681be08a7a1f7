use thiserror::Error;

#[derive(Error, Debug)]
pub enum CheckError {
    #[error("config error: {0}")]
    Config(String),

    #[error("git diff failed (exit={status}): {stderr}")]
    Diff { status: i32, stderr: String },

    #[error("check-run api returned {status}: {body}")]
    RemoteApi { status: u16, body: String },

    #[error("http transport error: {0}")]
    Http(String),

    #[error("malformed linter report: {0}")]
    MalformedReport(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl CheckError {
    /// Process exit status used when this error terminates the run.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Diff { status, .. } => *status,
            _ => crate::exit_code::FAILURE,
        }
    }
}

impl From<reqwest::Error> for CheckError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CheckError>;
