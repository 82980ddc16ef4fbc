// SPDX-License-Identifier: MIT
//
// Terminal errors. All of these are environment failures: they are fatal
// at startup and reported once by the binary.

use std::io;

use thiserror::Error;

/// Failure to acquire or drive the terminal.
#[derive(Debug, Error)]
pub enum TermError {
    /// Standard input is not a terminal, so raw mode cannot be entered.
    #[error("standard input is not a terminal")]
    NotATty,

    /// The viewport dimensions could not be read from the OS.
    #[error("unable to determine terminal size")]
    SizeUnavailable,

    /// Any I/O failure while talking to the terminal.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Result alias for terminal operations.
pub type Result<T> = std::result::Result<T, TermError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_a_tty_message() {
        assert_eq!(
            TermError::NotATty.to_string(),
            "standard input is not a terminal"
        );
    }

    #[test]
    fn size_unavailable_message() {
        assert_eq!(
            TermError::SizeUnavailable.to_string(),
            "unable to determine terminal size"
        );
    }

    #[test]
    fn io_error_is_transparent() {
        let err: TermError = io::Error::other("broken pipe").into();
        assert_eq!(err.to_string(), "broken pipe");
        assert!(matches!(err, TermError::Io(_)));
    }
}
