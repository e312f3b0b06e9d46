//! Receive-account types for the UPI session engine
//!
//! This module defines the merchant's receive-accounts: the UPI handles a
//! payment request can be addressed to.

use serde::{Deserialize, Serialize};

/// Receive-account identifier
///
/// Assigned by the ledger store on insert, monotonically increasing.
pub type AccountId = u64;

/// A payable UPI address configured by the merchant
///
/// The collection-level invariant is that at most one account is the
/// default, and exactly one is when the collection is non-empty. The
/// ledger store enforces this on every add/remove/set-default operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiveAccount {
    /// Identifier assigned by the ledger store
    pub id: AccountId,

    /// Provider-qualified address, pattern `local@provider`
    pub handle: String,

    /// Display name shown to payers (the `pn` parameter of the deep link)
    pub name: String,

    /// Whether this account receives payment requests by default
    pub is_default: bool,
}

impl ReceiveAccount {
    /// Create a new non-default receive-account
    pub fn new(id: AccountId, handle: impl Into<String>, name: impl Into<String>) -> Self {
        ReceiveAccount {
            id,
            handle: handle.into(),
            name: name.into(),
            is_default: false,
        }
    }
}

/// Check a handle against the provider-qualified address pattern
///
/// A valid handle is `local@provider` where both parts are non-empty and
/// consist of ASCII alphanumerics, `.`, `_` or `-`, with exactly one `@`.
///
/// # Examples
///
/// ```
/// use upi_session_engine::types::account::is_valid_handle;
///
/// assert!(is_valid_handle("merchant@okbank"));
/// assert!(!is_valid_handle("no-at-sign"));
/// assert!(!is_valid_handle("two@at@signs"));
/// ```
pub fn is_valid_handle(handle: &str) -> bool {
    let mut parts = handle.split('@');
    let (local, provider) = match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(provider), None) => (local, provider),
        _ => return false,
    };

    let part_ok = |part: &str| {
        !part.is_empty()
            && part
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
    };

    part_ok(local) && part_ok(provider)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::plain("merchant@okbank", true)]
    #[case::dots_and_dashes("shop.front-1@ok_axis", true)]
    #[case::numeric("9876543210@upi", true)]
    #[case::missing_at("merchantokbank", false)]
    #[case::empty("", false)]
    #[case::empty_local("@okbank", false)]
    #[case::empty_provider("merchant@", false)]
    #[case::double_at("a@b@c", false)]
    #[case::whitespace("merchant @okbank", false)]
    #[case::unicode("merchant@बैंक", false)]
    fn test_handle_validation(#[case] handle: &str, #[case] expected: bool) {
        assert_eq!(is_valid_handle(handle), expected);
    }

    #[test]
    fn test_new_account_is_not_default() {
        let account = ReceiveAccount::new(1, "merchant@okbank", "Chai Stall");
        assert_eq!(account.id, 1);
        assert_eq!(account.handle, "merchant@okbank");
        assert_eq!(account.name, "Chai Stall");
        assert!(!account.is_default);
    }
}
