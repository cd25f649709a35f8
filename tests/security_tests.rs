mod common;

use base64::Engine as _;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use common::{ORG, USER, codec, row_id};
use tokenseal::status::{TOKEN_EXPIRED, UNAUTHORIZED, to_status, to_status_collapsed};
use tokenseal::{ErrorKind, Role, TOKEN_LIFETIME, generate_cursor};
use tonic::Code;

#[test]
fn reject_token_with_any_flipped_byte() {
    let codec = codec();
    let issued = codec.issue(USER, ORG, Role::Viewer).unwrap();
    let sealed = URL_SAFE_NO_PAD.decode(&issued.token).unwrap();

    for i in 0..sealed.len() {
        let mut tampered = sealed.clone();
        tampered[i] ^= 0x01;

        let err = codec
            .validate(&URL_SAFE_NO_PAD.encode(&tampered))
            .expect_err("Tampered token must not validate");
        assert_eq!(
            err.kind(),
            ErrorKind::AuthFailure,
            "Flipping byte {i} should fail authentication"
        );
    }
}

#[test]
fn reject_truncated_token() {
    let codec = codec();
    let issued = codec.issue(USER, ORG, Role::Viewer).unwrap();
    let sealed = URL_SAFE_NO_PAD.decode(&issued.token).unwrap();

    let err = codec
        .validate(&URL_SAFE_NO_PAD.encode(&sealed[..sealed.len() - 1]))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AuthFailure);

    let err = codec
        .validate(&URL_SAFE_NO_PAD.encode(&sealed[..11]))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Malformed);

    let err = codec.validate("").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Malformed);
}

#[test]
fn reject_wrong_alphabet_and_padding() {
    let codec = codec();
    let issued = codec.issue(USER, ORG, Role::Viewer).unwrap();
    let sealed = URL_SAFE_NO_PAD.decode(&issued.token).unwrap();

    for encoded in [STANDARD.encode(&sealed), format!("{}=", issued.token)] {
        if encoded == issued.token {
            continue;
        }
        assert_eq!(
            codec.validate(&encoded).unwrap_err().kind(),
            ErrorKind::Malformed,
            "{encoded} should not decode"
        );
    }

    assert!(codec.validate("not a token!").is_err());
}

#[test]
fn page_token_is_not_a_session_token() {
    let page_token = generate_cursor(None, &row_id(7)).unwrap();
    assert!(codec().validate(&page_token).is_err());
}

#[test]
fn credential_failures_share_one_status() {
    let codec = codec();
    let other = common::codec().issue(USER, ORG, Role::Admin).unwrap();

    let failures = [
        codec.validate("").unwrap_err(),
        codec.validate("%%%").unwrap_err(),
        codec.validate(&other.token).unwrap_err(),
        codec.validate("AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA").unwrap_err(),
    ];

    for err in &failures {
        let status = to_status(err);
        assert_eq!(status.code(), Code::Unauthenticated, "{err}");
        assert_eq!(status.message(), UNAUTHORIZED, "{err}");
    }
}

#[test]
fn expired_token_has_distinct_status_unless_collapsed() {
    let codec = codec();
    let issued = codec
        .issue_at(
            USER,
            ORG,
            Role::Viewer,
            std::time::SystemTime::now() - TOKEN_LIFETIME * 2,
        )
        .unwrap();

    let err = codec.validate(&issued.token).unwrap_err();
    assert_eq!(to_status(&err).message(), TOKEN_EXPIRED);
    assert_eq!(to_status_collapsed(&err).message(), UNAUTHORIZED);
    assert_eq!(to_status_collapsed(&err).code(), Code::Unauthenticated);
}

#[test]
fn error_messages_do_not_leak_claims() {
    let codec = codec();
    let issued = codec.issue(USER, ORG, Role::Admin).unwrap();
    let sealed = URL_SAFE_NO_PAD.decode(&issued.token).unwrap();

    let mut tampered = sealed.clone();
    let last = tampered.len() - 1;
    tampered[last] ^= 0x80;

    let err = codec
        .validate(&URL_SAFE_NO_PAD.encode(&tampered))
        .unwrap_err();
    let rendered = format!("{err} {err:?} {:?}", to_status(&err));

    assert!(!rendered.contains(USER));
    assert!(!rendered.contains(ORG));
    assert!(!rendered.contains("admin"));
}
