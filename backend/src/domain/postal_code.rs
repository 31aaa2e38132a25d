//! Postal code validation for both services.
//!
//! The Input Service accepts exactly eight ASCII digits. The Orchestrator
//! Service is looser and accepts anything containing five digits, an optional
//! hyphen, then three digits on word boundaries.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use super::ClassifiedError;

/// Tag key used for the offending postal code on classified errors.
pub const POSTAL_CODE_TAG: &str = "postal_code";

/// User-facing message for every rejected postal code.
pub const INVALID_POSTAL_CODE: &str = "invalid postal code";
/// Number of digits in a canonical postal code.
pub const POSTAL_CODE_LEN: usize = 8;

static LOOSE_POSTAL_CODE_RE: OnceLock<Regex> = OnceLock::new();

fn loose_postal_code_regex() -> &'static Regex {
    LOOSE_POSTAL_CODE_RE.get_or_init(|| {
        Regex::new(r"\b[0-9]{5}-?[0-9]{3}\b")
            .unwrap_or_else(|error| panic!("postal code regex failed to compile: {error}"))
    })
}

/// Canonical eight digit postal code accepted by the Input Service.
///
/// # Examples
/// ```
/// use postal_climate::domain::PostalCode;
///
/// assert!(PostalCode::new("22021001").is_ok());
/// assert!(PostalCode::new("22021-001").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostalCode(String);

impl PostalCode {
    /// Validate and construct a [`PostalCode`].
    ///
    /// # Errors
    ///
    /// Returns [`ClassifiedError::Validation`] unless `raw` is exactly eight
    /// ASCII digits.
    pub fn new(raw: impl Into<String>) -> Result<Self, ClassifiedError> {
        let raw = raw.into();
        if raw.len() != POSTAL_CODE_LEN || !raw.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(ClassifiedError::validation(
                INVALID_POSTAL_CODE,
                INVALID_POSTAL_CODE,
                format!("postal code must have {POSTAL_CODE_LEN} digits"),
            )
            .with_tag(POSTAL_CODE_TAG, raw));
        }
        Ok(Self(raw))
    }

    /// Borrow the digits.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PostalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Postal code accepted by the Orchestrator Service query string.
///
/// Holds the matched `ddddd-ddd` or `dddddddd` text, which is what gets
/// forwarded to the location lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostalCodeQuery(String);

impl PostalCodeQuery {
    /// Match `raw` against the loose postal code pattern.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifiedError::Validation`] when `raw` is empty or contains
    /// no postal code.
    ///
    /// # Examples
    /// ```
    /// use postal_climate::domain::PostalCodeQuery;
    ///
    /// let query = PostalCodeQuery::parse("22021-001").expect("valid");
    /// assert_eq!(query.as_str(), "22021-001");
    /// assert!(PostalCodeQuery::parse("011530000").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self, ClassifiedError> {
        let invalid = || {
            ClassifiedError::validation(
                INVALID_POSTAL_CODE,
                INVALID_POSTAL_CODE,
                "postal code must match ddddd-ddd or dddddddd",
            )
            .with_tag(POSTAL_CODE_TAG, raw)
        };
        if raw.is_empty() {
            return Err(invalid());
        }
        loose_postal_code_regex()
            .find(raw)
            .map(|found| Self(found.as_str().to_owned()))
            .ok_or_else(invalid)
    }

    /// Borrow the matched postal code.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// The eight digits without the optional hyphen.
    ///
    /// # Examples
    /// ```
    /// use postal_climate::domain::PostalCodeQuery;
    ///
    /// let query = PostalCodeQuery::parse("22021-001").expect("valid");
    /// assert_eq!(query.digits(), "22021001");
    /// ```
    pub fn digits(&self) -> String {
        self.0.chars().filter(char::is_ascii_digit).collect()
    }
}

impl fmt::Display for PostalCodeQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use super::*;
    use crate::domain::ErrorKind;
    use rstest::rstest;

    #[rstest]
    #[case::empty("")]
    #[case::short("2202100")]
    #[case::long("220210011")]
    #[case::hyphenated("22021-001")]
    #[case::letters("2202100a")]
    #[case::multibyte("2202100é")]
    fn input_rejects_non_canonical_codes(#[case] raw: &str) {
        let error = PostalCode::new(raw).expect_err("must be rejected");
        assert_eq!(error.kind(), ErrorKind::Validation);
        assert_eq!(error.message(), "invalid postal code");
        assert_eq!(
            error.tags().get(POSTAL_CODE_TAG).map(String::as_str),
            Some(raw)
        );
    }

    #[test]
    fn input_accepts_eight_digits() {
        let code = PostalCode::new("22021001").expect("valid");
        assert_eq!(code.as_str(), "22021001");
    }

    #[rstest]
    #[case::plain("22021001", "22021001")]
    #[case::hyphenated("22021-001", "22021-001")]
    #[case::surrounded("cep 22021-001 rj", "22021-001")]
    fn query_accepts_loose_pattern(#[case] raw: &str, #[case] expected: &str) {
        let query = PostalCodeQuery::parse(raw).expect("valid");
        assert_eq!(query.as_str(), expected);
    }

    #[rstest]
    #[case::plain("22021001")]
    #[case::hyphenated("22021-001")]
    fn query_digits_drop_the_hyphen(#[case] raw: &str) {
        let query = PostalCodeQuery::parse(raw).expect("valid");
        assert_eq!(query.digits(), "22021001");
    }

    #[rstest]
    #[case::empty("")]
    #[case::nine_digits("011530000")]
    #[case::short("2202-1001")]
    #[case::double_hyphen("22021--001")]
    #[case::letters("abcdefgh")]
    fn query_rejects_non_matching_input(#[case] raw: &str) {
        let error = PostalCodeQuery::parse(raw).expect_err("must be rejected");
        assert_eq!(error.kind(), ErrorKind::Validation);
    }
}
