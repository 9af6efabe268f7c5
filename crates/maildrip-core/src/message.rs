//! Message assembly.

use crate::config::SessionConfig;
use std::fmt::Write;

/// Builds the wire-ready message for one recipient: an RFC 5322 header
/// block declaring an HTML body in UTF-8, a blank separator line, and the
/// template body verbatim.
#[must_use]
pub fn build_message(config: &SessionConfig, recipient: &str, body: &str) -> String {
    let mut message = String::with_capacity(body.len() + 256);

    let _ = write!(message, "From: {}\r\n", config.sender);
    let _ = write!(message, "To: {recipient}\r\n");
    let _ = write!(message, "Subject: {}\r\n", config.subject);
    message.push_str("MIME-Version: 1.0\r\n");
    message.push_str("Content-Type: text/html; charset=\"utf-8\"\r\n");
    message.push_str("\r\n");
    message.push_str(body);

    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use maildrip_smtp::TlsVersion;

    fn config() -> SessionConfig {
        SessionConfig {
            host: "smtp.example.com".to_string(),
            port: 587,
            sender: "news@example.com".to_string(),
            password: "hunter2".to_string(),
            subject: "March update".to_string(),
            min_tls: TlsVersion::Tls12,
        }
    }

    #[test]
    fn headers_then_blank_line_then_body() {
        let message = build_message(&config(), "someone@example.org", "<p>Hello</p>");

        let (headers, body) = message.split_once("\r\n\r\n").unwrap_or(("", ""));
        assert!(headers.contains("From: news@example.com"));
        assert!(headers.contains("To: someone@example.org"));
        assert!(headers.contains("Subject: March update"));
        assert!(headers.contains("MIME-Version: 1.0"));
        assert!(headers.contains("Content-Type: text/html; charset=\"utf-8\""));
        assert_eq!(body, "<p>Hello</p>");
    }

    #[test]
    fn body_is_verbatim() {
        let template = "<html>\n  <body>untouched {placeholder}</body>\n</html>";
        let message = build_message(&config(), "a@b.co", template);
        assert!(message.ends_with(template));
    }
}
