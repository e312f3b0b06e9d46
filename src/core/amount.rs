//! Amount resolution for the active session
//!
//! The payable amount for a payment request is either the session total
//! (sum of bill items) or an explicit override the merchant typed or
//! dictated. The override is ephemeral: it lives for the active session
//! only and is never persisted.
//!
//! Typed and spoken input deliberately differ in failure behavior. A typed
//! amount that fails to parse is treated as empty input (live-typing fields
//! are mid-edit most of the time), so the resolver silently falls back to
//! the session total. A spoken amount that fails to parse is a completed,
//! deliberate utterance, so it surfaces as a `Recognition` error and leaves
//! the previous override untouched.

use crate::types::SessionError;
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::debug;

/// Holds the optional override amount for the active session
#[derive(Debug, Clone, Default)]
pub struct AmountResolver {
    override_amount: Option<Decimal>,
}

impl AmountResolver {
    /// Create a resolver with no override set
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the override from typed input, forgivingly
    ///
    /// A value that fails to parse or is not strictly positive clears the
    /// override instead of erroring, so downstream falls back to the
    /// session total while the merchant is still typing.
    pub fn set_override(&mut self, raw: &str) {
        self.override_amount = Decimal::from_str(raw.trim())
            .ok()
            .filter(|amount| *amount > Decimal::ZERO);
    }

    /// Set the override from a speech transcript
    ///
    /// Extracts the first numeric substring (`digits`, optionally followed
    /// by a decimal point and more digits) from the transcript.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Recognition` if the transcript contains no
    /// such substring or it parses to a non-positive value; the previous
    /// override is left untouched in that case.
    pub fn set_override_from_speech(&mut self, transcript: &str) -> Result<Decimal, SessionError> {
        let amount = extract_amount(transcript)
            .filter(|amount| *amount > Decimal::ZERO)
            .ok_or_else(|| SessionError::recognition(transcript))?;

        debug!(%amount, "override set from speech");
        self.override_amount = Some(amount);
        Ok(amount)
    }

    /// Clear the override; the resolved amount reverts to the session total
    pub fn clear_override(&mut self) {
        self.override_amount = None;
    }

    /// Whether an override is currently active
    ///
    /// Drives the note derivation and the item-snapshot behavior: an
    /// overridden payment carries no item breakdown.
    pub fn is_overridden(&self) -> bool {
        self.override_amount.is_some()
    }

    /// The payable amount: the override when set, else the session total
    pub fn resolve(&self, session_total: Decimal) -> Decimal {
        self.override_amount.unwrap_or(session_total)
    }
}

/// Extract the first decimal number (`\d+(\.\d+)?`) from free text
fn extract_amount(text: &str) -> Option<Decimal> {
    let bytes = text.as_bytes();
    let start = bytes.iter().position(u8::is_ascii_digit)?;

    let mut end = start;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    // Accept a fractional part only when digits follow the point
    if end < bytes.len()
        && bytes[end] == b'.'
        && bytes.get(end + 1).is_some_and(u8::is_ascii_digit)
    {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
    }

    Decimal::from_str(&text[start..end]).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::plain_integer("pay 250 rupees", Some("250"))]
    #[case::decimal("that will be 99.50 please", Some("99.50"))]
    #[case::leading_number("150 for the lot", Some("150"))]
    #[case::first_of_several("pay 20 not 30", Some("20"))]
    #[case::trailing_dot("send 45. now", Some("45"))]
    #[case::no_digits("please pay two hundred", None)]
    #[case::empty("", None)]
    fn test_extract_amount(#[case] text: &str, #[case] expected: Option<&str>) {
        let expected = expected.map(|s| Decimal::from_str(s).unwrap());
        assert_eq!(extract_amount(text), expected);
    }

    #[test]
    fn test_resolve_falls_back_to_session_total() {
        let resolver = AmountResolver::new();
        assert_eq!(resolver.resolve(Decimal::new(3500, 2)), Decimal::new(3500, 2));
    }

    #[test]
    fn test_override_precedence_and_clear() {
        let mut resolver = AmountResolver::new();
        let total = Decimal::new(3500, 2); // 35.00

        resolver.set_override("50");
        assert!(resolver.is_overridden());
        assert_eq!(resolver.resolve(total), Decimal::new(50, 0));

        resolver.clear_override();
        assert!(!resolver.is_overridden());
        assert_eq!(resolver.resolve(total), total);
    }

    #[rstest]
    #[case::garbage("fifty")]
    #[case::empty("")]
    #[case::zero("0")]
    #[case::negative("-5")]
    fn test_invalid_typed_input_clears_override_silently(#[case] raw: &str) {
        let mut resolver = AmountResolver::new();
        resolver.set_override("50");

        resolver.set_override(raw);

        assert!(!resolver.is_overridden());
        assert_eq!(resolver.resolve(Decimal::TEN), Decimal::TEN);
    }

    #[test]
    fn test_speech_override_sets_amount() {
        let mut resolver = AmountResolver::new();

        let amount = resolver
            .set_override_from_speech("send 120.25 to the stall")
            .unwrap();

        assert_eq!(amount, Decimal::from_str("120.25").unwrap());
        assert_eq!(resolver.resolve(Decimal::ZERO), amount);
    }

    #[test]
    fn test_unparseable_speech_errors_and_preserves_override() {
        let mut resolver = AmountResolver::new();
        resolver.set_override("50");

        let result = resolver.set_override_from_speech("please pay two hundred");

        assert!(matches!(
            result.unwrap_err(),
            SessionError::Recognition { .. }
        ));
        // Prior override untouched
        assert!(resolver.is_overridden());
        assert_eq!(resolver.resolve(Decimal::ZERO), Decimal::new(50, 0));
    }

    #[test]
    fn test_zero_speech_amount_is_a_recognition_error() {
        let mut resolver = AmountResolver::new();

        let result = resolver.set_override_from_speech("pay 0 rupees");

        assert!(matches!(
            result.unwrap_err(),
            SessionError::Recognition { .. }
        ));
        assert!(!resolver.is_overridden());
    }
}
