use std::io;
use std::process::ExitStatus;

use thiserror::Error;

/// Everything that can stop a compression step.
///
/// All variants are fatal for the current build step: nothing here is
/// retried, the host pipeline decides what to do with the failure.
#[derive(Debug, Error)]
pub enum FilterError {
    /// The compressor binary could not be started at all.
    #[error("failed to run `{bin}`: {source}")]
    Launch {
        bin: String,
        #[source]
        source: io::Error,
    },

    /// The compressor ran but exited unsuccessfully.
    #[error("YUI Compressor failed with the following error:\n{command}: {stderr}")]
    Compression {
        command: String,
        status: ExitStatus,
        stderr: String,
    },

    /// Bad parameter name or value, detected before anything is spawned.
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
}

impl FilterError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, FilterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_launch_message_names_binary() {
        let err = FilterError::Launch {
            bin: "yui-compressor".into(),
            source: io::Error::new(io::ErrorKind::NotFound, "No such file or directory"),
        };
        let msg = err.to_string();
        assert!(msg.contains("`yui-compressor`"));
        assert!(msg.contains("No such file"));
    }

    #[test]
    fn test_config_helper() {
        let err = FilterError::config("Unknown parameter \"x\"");
        assert!(matches!(err, FilterError::Configuration(ref m) if m.contains("\"x\"")));
        assert_eq!(err.to_string(), "configuration error: Unknown parameter \"x\"");
    }
}
