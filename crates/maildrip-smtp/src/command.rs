//! SMTP command serialization.

use crate::address::Address;

/// The commands this client issues, in the order a delivery uses them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// EHLO - extended greeting.
    Ehlo {
        /// Name the client identifies itself with.
        name: String,
    },
    /// STARTTLS - upgrade the connection to TLS.
    StartTls,
    /// AUTH PLAIN with an initial base64 response (SASL-IR).
    AuthPlain {
        /// Base64-encoded `\0user\0password` payload.
        payload: String,
    },
    /// MAIL FROM - declare the envelope sender.
    MailFrom {
        /// Sender address.
        from: Address,
    },
    /// RCPT TO - declare an envelope recipient.
    RcptTo {
        /// Recipient address.
        to: Address,
    },
    /// DATA - begin the message payload.
    Data,
    /// QUIT - close the session.
    Quit,
}

impl Command {
    /// Serializes the command to a CRLF-terminated line.
    #[must_use]
    pub fn serialize(&self) -> Vec<u8> {
        let line = match self {
            Self::Ehlo { name } => format!("EHLO {name}"),
            Self::StartTls => "STARTTLS".to_string(),
            Self::AuthPlain { payload } => format!("AUTH PLAIN {payload}"),
            Self::MailFrom { from } => format!("MAIL FROM:<{from}>"),
            Self::RcptTo { to } => format!("RCPT TO:<{to}>"),
            Self::Data => "DATA".to_string(),
            Self::Quit => "QUIT".to_string(),
        };
        let mut buf = line.into_bytes();
        buf.extend_from_slice(b"\r\n");
        buf
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn ehlo() {
        let cmd = Command::Ehlo {
            name: "localhost".to_string(),
        };
        assert_eq!(cmd.serialize(), b"EHLO localhost\r\n");
    }

    #[test]
    fn starttls() {
        assert_eq!(Command::StartTls.serialize(), b"STARTTLS\r\n");
    }

    #[test]
    fn auth_plain() {
        let cmd = Command::AuthPlain {
            payload: "AHVzZXIAcGFzcw==".to_string(),
        };
        assert_eq!(cmd.serialize(), b"AUTH PLAIN AHVzZXIAcGFzcw==\r\n");
    }

    #[test]
    fn mail_from() {
        let cmd = Command::MailFrom {
            from: Address::new("sender@example.com").unwrap(),
        };
        assert_eq!(cmd.serialize(), b"MAIL FROM:<sender@example.com>\r\n");
    }

    #[test]
    fn rcpt_to() {
        let cmd = Command::RcptTo {
            to: Address::new("recipient@example.com").unwrap(),
        };
        assert_eq!(cmd.serialize(), b"RCPT TO:<recipient@example.com>\r\n");
    }

    #[test]
    fn data_and_quit() {
        assert_eq!(Command::Data.serialize(), b"DATA\r\n");
        assert_eq!(Command::Quit.serialize(), b"QUIT\r\n");
    }
}
