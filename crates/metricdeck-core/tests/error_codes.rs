#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use metricdeck_core::{ClientCode, MetricDeckError};

#[test]
fn client_codes_are_stable() {
    let cases = [
        (MetricDeckError::BadRequest("x".into()), "BAD_REQUEST"),
        (MetricDeckError::NotFound("x".into()), "NOT_FOUND"),
        (MetricDeckError::AuthFailed, "AUTH_FAILED"),
        (MetricDeckError::Unregistered("dyn DbHealthReader"), "INTERNAL"),
        (MetricDeckError::Parse("x".into()), "INTERNAL"),
        (MetricDeckError::Storage("x".into()), "INTERNAL"),
        (MetricDeckError::Io("x".into()), "INTERNAL"),
        (MetricDeckError::Internal("x".into()), "INTERNAL"),
    ];

    for (err, code) in cases {
        assert_eq!(err.client_code().as_str(), code, "err={err}");
    }
}

#[test]
fn only_client_codes_degrade_gracefully() {
    assert!(MetricDeckError::NotFound("cfg".into()).is_client_error());
    assert!(MetricDeckError::BadRequest("body".into()).is_client_error());
    assert!(!MetricDeckError::Storage("down".into()).is_client_error());
    assert_eq!(
        MetricDeckError::Storage("down".into()).client_code(),
        ClientCode::Internal
    );
}

#[test]
fn json_errors_become_parse_errors() {
    let err: MetricDeckError = serde_json::from_str::<serde_json::Value>("{")
        .unwrap_err()
        .into();
    assert!(matches!(err, MetricDeckError::Parse(_)));
}
