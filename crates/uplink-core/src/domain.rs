//! Domain splitting
//!
//! The zone API is addressed by `(root domain, sub-label)`. The split rule
//! is fixed: the final two labels form the root domain, everything before
//! them is the sub-label. `home.example.net` → (`example.net`, `home`);
//! `cam.attic.example.net` → (`example.net`, `cam.attic`).
//!
//! The rule is knowingly wrong for multi-level public suffixes
//! (`foo.example.co.uk` splits as (`co.uk`, `foo.example`)); domains under
//! such suffixes are not supported and fail at the provider instead.

use crate::error::{Error, Result};

/// Split `domain` into `(root_domain, sub_domain)`.
///
/// A domain must carry at least three labels (a sub-label plus the
/// two-label root); anything else is a configuration problem, not a
/// transient one.
pub fn split_domain(domain: &str) -> Result<(String, String)> {
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 3 || labels.iter().any(|l| !is_valid_label(l)) {
        return Err(Error::MalformedDomain(domain.to_string()));
    }

    let root = labels[labels.len() - 2..].join(".");
    let sub = labels[..labels.len() - 2].join(".");
    Ok((root, sub))
}

fn is_valid_label(label: &str) -> bool {
    !label.is_empty()
        && label
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
