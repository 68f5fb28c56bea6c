use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// Why a collaborator could not be added.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShareError {
    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),
    #[error("'{0}' is already in the share list")]
    DuplicateEmail(String),
}

/// Basic `local@domain.tld` shape check.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Returns `current` with `email` appended.
///
/// The candidate is trimmed first. Duplicates are detected with a
/// case-sensitive comparison.
pub fn add_share(current: &[String], email: &str) -> Result<Vec<String>, ShareError> {
    let email = email.trim();
    if !is_valid_email(email) {
        return Err(ShareError::InvalidEmail(email.to_string()));
    }
    if current.iter().any(|e| e == email) {
        return Err(ShareError::DuplicateEmail(email.to_string()));
    }
    let mut shares = current.to_vec();
    shares.push(email.to_string());
    Ok(shares)
}

/// Returns `current` without the first entry equal to `email`.
pub fn remove_share(current: &[String], email: &str) -> Vec<String> {
    let mut shares = current.to_vec();
    if let Some(pos) = shares.iter().position(|e| e == email) {
        shares.remove(pos);
    }
    shares
}
