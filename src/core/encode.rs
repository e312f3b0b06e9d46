//! Payment-request URI encoding
//!
//! Builds the `upi://pay` deep link consumed by third-party payment apps:
//!
//! ```text
//! upi://pay?pa=<address>&pn=<name>&am=<amount>&tn=<note>
//! ```
//!
//! Encoding is deterministic and idempotent: the parameter order is fixed,
//! values are percent-encoded per standard query-string rules, and amounts
//! are normalized before formatting, so identical inputs always produce a
//! byte-identical URI. Both the on-screen preview and the embeddable
//! snippet go through [`encode`]; deriving the URI twice in two places is
//! exactly the defect this module exists to prevent.

use crate::types::{Item, ReceiveAccount};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use rust_decimal::Decimal;

/// Query-string value encoding: everything but unreserved characters
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'.')
    .remove(b'-')
    .remove(b'_')
    .remove(b'~');

/// Fixed note literal for the regular payment path
pub const NOTE_PAYMENT: &str = "Payment";

/// Fixed note literal for the embeddable donation snippet
pub const NOTE_DONATION: &str = "Donation";

/// Build the payment-request URI for an account, amount, and note
///
/// The `am` parameter is omitted entirely when the amount is zero or
/// negative: that is an amount-less request (the payer chooses the amount
/// in their app), not an error.
pub fn encode(account: &ReceiveAccount, amount: Decimal, note: &str) -> String {
    let pa = utf8_percent_encode(&account.handle, QUERY_VALUE);
    let pn = utf8_percent_encode(&account.name, QUERY_VALUE);
    let tn = utf8_percent_encode(note, QUERY_VALUE);

    if amount > Decimal::ZERO {
        // normalize() strips trailing zeros so 100.00 and 100 encode alike
        format!(
            "upi://pay?pa={pa}&pn={pn}&am={am}&tn={tn}",
            am = amount.normalize()
        )
    } else {
        format!("upi://pay?pa={pa}&pn={pn}&tn={tn}")
    }
}

/// Derive the transaction note for the current session
///
/// With line items and no active override, the note lists the bill as
/// `quantity x name` pairs, comma-joined. Otherwise it falls back to the
/// fixed literal for the call site (`"Payment"` or `"Donation"`).
pub fn payment_note(items: &[Item], overridden: bool, fallback: &str) -> String {
    if overridden || items.is_empty() {
        return fallback.to_string();
    }

    items
        .iter()
        .map(|item| format!("{} x {}", item.quantity, item.name))
        .collect::<Vec<_>>()
        .join(", ")
}
