//! Email address utilities

use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum length of a full address (RFC 5321 path limit minus the angle brackets)
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Maximum length of the local part
pub const MAX_LOCAL_PART_LENGTH: usize = 64;

// Dot-atom local part, hostname labels, at least one dot in the domain
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$",
    )
    .unwrap()
});

/// Check if an email address is syntactically valid
///
/// Accepts the common dot-atom form (`local@domain.tld`). Quoted local parts
/// and address literals are rejected; no mail provider we deliver through
/// accepts them for transactional sends.
pub fn is_valid_email(email: &str) -> bool {
    if email.is_empty() || email.len() > MAX_EMAIL_LENGTH {
        return false;
    }

    match email.split_once('@') {
        Some((local, _)) if local.len() > MAX_LOCAL_PART_LENGTH => false,
        Some(_) => EMAIL_REGEX.is_match(email),
        None => false,
    }
}

/// Mask an email address for logging (e.g., a***@example.com)
///
/// Keeps the first character of the local part and the whole domain so log
/// lines stay correlatable per provider without exposing the mailbox.
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() => {
            let first = local.chars().next().map(String::from).unwrap_or_default();
            format!("{}***@{}", first, domain)
        }
        Some((_, domain)) => format!("***@{}", domain),
        None => "****".to_string(),
    }
}
