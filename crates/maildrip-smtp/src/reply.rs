//! SMTP reply parsing.
//!
//! Replies are one or more lines; continuation lines separate the code with
//! `-`, the final line with a space:
//!
//! ```text
//! 250-smtp.example.com
//! 250-STARTTLS
//! 250 SIZE 35882577
//! ```

use crate::error::{Error, Result};

/// A parsed reply from the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// Three-digit reply code.
    pub code: ReplyCode,
    /// Message text, one entry per reply line.
    pub message: Vec<String>,
}

impl Reply {
    /// Returns true for a 2xx reply.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.code.is_success()
    }

    /// Joins the message lines into a single string.
    #[must_use]
    pub fn text(&self) -> String {
        self.message.join("\n")
    }

    /// Converts a non-success reply into a [`Error::Rejected`].
    ///
    /// # Errors
    ///
    /// Returns the rejection carrying this reply's code and text.
    pub fn require_success(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(Error::rejected(self.code.as_u16(), self.text()))
        }
    }
}

/// SMTP reply code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ReplyCode(u16);

impl ReplyCode {
    /// 220 Service ready.
    pub const SERVICE_READY: Self = Self(220);
    /// 221 Service closing transmission channel.
    pub const CLOSING: Self = Self(221);
    /// 250 Requested action completed.
    pub const OK: Self = Self(250);
    /// 354 Start mail input.
    pub const START_DATA: Self = Self(354);
    /// 535 Authentication credentials invalid.
    pub const AUTH_FAILED: Self = Self(535);

    /// Creates a reply code.
    #[must_use]
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Returns the numeric code.
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self.0
    }

    /// Returns true for a 2xx code.
    #[must_use]
    pub const fn is_success(self) -> bool {
        self.0 >= 200 && self.0 < 300
    }

    /// Returns true for a 4xx code.
    #[must_use]
    pub const fn is_transient(self) -> bool {
        self.0 >= 400 && self.0 < 500
    }

    /// Returns true for a 5xx code.
    #[must_use]
    pub const fn is_permanent(self) -> bool {
        self.0 >= 500 && self.0 < 600
    }
}

impl std::fmt::Display for ReplyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Returns true if `line` terminates a (possibly multi-line) reply.
#[must_use]
pub fn is_final_line(line: &str) -> bool {
    (line.len() >= 4 && line.as_bytes()[3] == b' ') || line.len() == 3
}

/// Parses a complete reply from its lines.
///
/// # Errors
///
/// Returns [`Error::Protocol`] if the reply is empty, too short, or the
/// code is not numeric.
pub fn parse(lines: &[String]) -> Result<Reply> {
    let first = lines
        .first()
        .ok_or_else(|| Error::Protocol("empty reply".into()))?;
    if first.len() < 3 {
        return Err(Error::Protocol(format!("reply too short: {first:?}")));
    }

    // `get` rather than indexing: the line is server-controlled and a
    // multi-byte character straddling the boundary must not panic.
    let code = first
        .get(..3)
        .and_then(|digits| digits.parse::<u16>().ok())
        .ok_or_else(|| Error::Protocol(format!("non-numeric reply code: {first:?}")))?;

    let mut message = Vec::with_capacity(lines.len());
    for line in lines {
        if line.len() == 3 {
            message.push(String::new());
        } else {
            let text = line
                .get(4..)
                .ok_or_else(|| Error::Protocol(format!("malformed reply line: {line:?}")))?;
            message.push(text.to_string());
        }
    }

    Ok(Reply {
        code: ReplyCode::new(code),
        message,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn single_line() {
        let reply = parse(&["250 OK".to_string()]).unwrap();
        assert_eq!(reply.code, ReplyCode::OK);
        assert_eq!(reply.message, vec!["OK"]);
        assert!(reply.is_success());
    }

    #[test]
    fn multi_line() {
        let lines = vec![
            "250-smtp.example.com".to_string(),
            "250-STARTTLS".to_string(),
            "250 SIZE 35882577".to_string(),
        ];
        let reply = parse(&lines).unwrap();
        assert_eq!(reply.code.as_u16(), 250);
        assert_eq!(reply.message.len(), 3);
        assert_eq!(reply.text(), "smtp.example.com\nSTARTTLS\nSIZE 35882577");
    }

    #[test]
    fn bare_code() {
        let reply = parse(&["354".to_string()]).unwrap();
        assert_eq!(reply.code, ReplyCode::START_DATA);
        assert_eq!(reply.message, vec![String::new()]);
    }

    #[test]
    fn final_line_detection() {
        assert!(is_final_line("250 OK"));
        assert!(is_final_line("354"));
        assert!(!is_final_line("250-continuing"));
        assert!(!is_final_line("25"));
    }

    #[test]
    fn require_success_rejects() {
        let reply = parse(&["535 authentication failed".to_string()]).unwrap();
        let err = reply.require_success().unwrap_err();
        assert!(matches!(err, Error::Rejected { code: 535, .. }));
        assert!(err.is_permanent());
    }

    #[test]
    fn malformed_replies() {
        assert!(parse(&[]).is_err());
        assert!(parse(&["25".to_string()]).is_err());
        assert!(parse(&["ABC no".to_string()]).is_err());
    }

    #[test]
    fn multibyte_characters_at_the_separator_are_an_error_not_a_panic() {
        // 'Á' occupies bytes 3..5, so neither slice boundary is a char
        // boundary; both lines must come back as protocol errors.
        assert!(parse(&["250Á".to_string(), "250 OK".to_string()]).is_err());
        assert!(parse(&["25Á".to_string()]).is_err());
    }
}
