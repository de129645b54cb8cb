use std::{error::Error as StdError, ffi::OsString};

use thiserror::Error;

use crate::tag::TagError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid annotation on `{field}`: {source}")]
    Annotation {
        field: String,
        #[source]
        source: TagError,
    },

    #[error("can't parse `{field}` from `{value}`, {reason}")]
    Conversion { field: String, value: String, reason: String },

    #[error("required flag `{name}` was not provided")]
    RequiredMissing { name: String },

    #[error("unexpected flag `{key}`")]
    UnexpectedFlag { key: String },

    #[error("flag without a name (a bare `-` or `--`)")]
    EmptyFlag,

    #[error("flag specified more than once: `{name}`")]
    RepeatedFlag { name: String },

    #[error("unknown subcommand `{token}` for `{node}`")]
    UnknownSubcommand { token: String, node: String },

    #[error("no action or nested command `{token}` on `{node}`")]
    NoMatchingAction { token: String, node: String },

    #[error("no nested command for `{token}` on `{node}`")]
    NoNestedCommand { token: String, node: String },

    #[error("`{node}` has no `exec` action")]
    MissingExec { node: String },

    #[error("broken command tree at `{node}.{field}`: {reason}")]
    Contract { node: String, field: String, reason: String },

    #[error(transparent)]
    Action(Box<dyn StdError + Send + Sync>),

    #[error("argument is not valid utf8: {0:?}")]
    InvalidUtf8(OsString),
}

impl Error {
    /// Whether the error is caused by the command line, as opposed to the
    /// command tree or an action. Callers typically print usage for these.
    ///
    /// Non UTF-8 arguments are not a usage error: the arguments can't be
    /// read back as text to pick the usage to show.
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            Error::Conversion { .. }
                | Error::RequiredMissing { .. }
                | Error::UnexpectedFlag { .. }
                | Error::EmptyFlag
                | Error::RepeatedFlag { .. }
                | Error::UnknownSubcommand { .. }
                | Error::NoMatchingAction { .. }
                | Error::NoNestedCommand { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::OsString;

    use super::*;

    #[test]
    fn usage_errors() {
        assert!(Error::UnexpectedFlag { key: "x".to_string() }.is_usage());
        assert!(Error::EmptyFlag.is_usage());
        assert!(!Error::MissingExec { node: "Git".to_string() }.is_usage());
        assert!(!Error::InvalidUtf8(OsString::from("x")).is_usage());
    }

    #[cfg(unix)]
    #[test]
    fn invalid_utf8_keeps_the_raw_argument() {
        use std::os::unix::ffi::OsStringExt;

        let err = Error::InvalidUtf8(OsString::from_vec(vec![0xff]));
        assert_eq!(err.to_string(), r#"argument is not valid utf8: "\xFF""#);
        assert!(!err.is_usage());
    }
}
