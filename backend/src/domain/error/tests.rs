//! Regression coverage for the classified error taxonomy.

use super::*;
use rstest::rstest;

#[rstest]
#[case::validation(
    ClassifiedError::validation("invalid postal code", "bad input", "must have 8 digits"),
    ErrorKind::Validation
)]
#[case::not_found(
    ClassifiedError::not_found("can not find postal code", "status 404"),
    ErrorKind::NotFound
)]
#[case::unknown(
    ClassifiedError::unknown("Unknown error getting location", "connection refused"),
    ErrorKind::Unknown
)]
fn kind_matches_variant(#[case] error: ClassifiedError, #[case] expected: ErrorKind) {
    assert_eq!(error.kind(), expected);
}

#[test]
fn display_uses_message_not_cause() {
    let error = ClassifiedError::unknown("Unknown error getting location", "dns failure");
    assert_eq!(error.to_string(), "Unknown error getting location");
    assert_eq!(error.cause(), "dns failure");
}

#[test]
fn tags_accumulate_per_variant() {
    let error = ClassifiedError::not_found("can not find postal code", "status 404")
        .with_tag("postal_code", "22021001")
        .with_tag("upstream", "location");

    assert_eq!(
        error.tags().get("postal_code").map(String::as_str),
        Some("22021001")
    );
    assert_eq!(error.tags().len(), 2);
}

#[test]
fn validation_keeps_reasons() {
    let error = ClassifiedError::validation("invalid postal code", "bad", "must have 8 digits");
    match error {
        ClassifiedError::Validation { reasons, .. } => {
            assert_eq!(reasons, vec!["must have 8 digits".to_owned()]);
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn into_unknown_keeps_cause_and_tags() {
    let error = ClassifiedError::not_found("can not find postal code", "status 404")
        .with_tag("postal_code", "22021001")
        .into_unknown("Unknown error getting location");

    assert_eq!(error.kind(), ErrorKind::Unknown);
    assert_eq!(error.message(), "Unknown error getting location");
    assert_eq!(error.cause(), "status 404");
    assert_eq!(
        error.tags().get("postal_code").map(String::as_str),
        Some("22021001")
    );
}
