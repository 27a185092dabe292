use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, MetricsError>;

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("invalid arguments: {message}")]
    Arguments { message: String },

    #[error("could not find input file `{}`", .path.display())]
    FileNotFound { path: PathBuf },

    #[error("malformed input file `{}`: {message}", .path.display())]
    MalformedInput { path: PathBuf, message: String },

    #[error(
        "fetch failed for `{login}`{}: {message}",
        .status.map(|code| format!(" (HTTP {code})")).unwrap_or_default()
    )]
    Remote {
        login: String,
        status: Option<u16>,
        message: String,
    },

    #[error("token is not authorized to read contributions of `{login}`")]
    Authorization { login: String },

    #[error("no user found for `{login}`")]
    UserNotFound { login: String },

    #[error("could not write report to `{}`: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl MetricsError {
    pub fn arguments(message: impl ToString) -> Self {
        Self::Arguments {
            message: message.to_string(),
        }
    }

    pub fn malformed_input(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::MalformedInput {
            path: path.into(),
            message: message.to_string(),
        }
    }

    pub fn remote(login: impl ToString, status: Option<u16>, message: impl ToString) -> Self {
        Self::Remote {
            login: login.to_string(),
            status,
            message: message.to_string(),
        }
    }

    pub fn write(path: impl Into<PathBuf>, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Write {
            path: path.into(),
            source: Box::new(source),
        }
    }
}
