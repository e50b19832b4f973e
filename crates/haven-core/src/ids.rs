//! Timestamp-derived identifiers.
//!
//! Records are disposable, so identifiers are just a prefix plus the epoch
//! millisecond of creation (`APT-1740787200000`). Collisions within one
//! millisecond are accepted; nothing downstream assumes uniqueness.

use chrono::Utc;

/// Builds an identifier like `APT-1740787200000`.
#[must_use]
pub fn timestamp_id(prefix: &str) -> String {
    format!("{prefix}-{}", Utc::now().timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_id_shape() {
        let id = timestamp_id("APT");
        let (prefix, millis) = id.split_once('-').unwrap();
        assert_eq!(prefix, "APT");
        assert!(millis.parse::<i64>().unwrap() > 1_700_000_000_000);
    }
}
