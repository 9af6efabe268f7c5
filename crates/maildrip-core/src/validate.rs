//! Syntactic address validation.

/// Checks whether `addr` looks like a deliverable email address.
///
/// The accepted shape is `local@domain.tld`: a local part of one or more
/// characters from `[A-Za-z0-9._%+-]`, a domain of one or more characters
/// from `[A-Za-z0-9.-]`, a literal dot, and a final label of at least two
/// ASCII letters. No DNS or mailbox lookup happens here; this is a
/// conservative filter meant to catch obviously malformed input before a
/// network round trip is spent on it.
#[must_use]
pub fn is_valid_address(addr: &str) -> bool {
    let Some((local, domain)) = addr.split_once('@') else {
        return false;
    };

    if local.is_empty() || !local.bytes().all(is_local_byte) {
        return false;
    }

    // The final label must be purely alphabetic; everything before it can
    // contain further dots and hyphens.
    let Some((name, tld)) = domain.rsplit_once('.') else {
        return false;
    };

    !name.is_empty()
        && name.bytes().all(is_domain_byte)
        && tld.len() >= 2
        && tld.bytes().all(|b| b.is_ascii_alphabetic())
}

const fn is_local_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'.' | b'_' | b'%' | b'+' | b'-')
}

const fn is_domain_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'.' | b'-')
}
