//! TokenService behaviour: round trip, expiry window, tamper rejection.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{Duration, TimeZone, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::json;

use gymgate_core::{AuthFailureReason, FixedClock, Principal, Role, TokenService};

const SECRET: &[u8] = b"integration-secret-0123456789abcdef";

fn setup() -> (Arc<FixedClock>, TokenService) {
    let clock = Arc::new(FixedClock::new(
        Utc.with_ymd_and_hms(2026, 10, 1, 12, 0, 0).unwrap(),
    ));
    let svc = TokenService::new(SECRET, clock.clone()).unwrap();
    (clock, svc)
}

fn principals() -> Vec<Principal> {
    vec![
        Principal::new("adm-1", "owner@gym.test", Role::Administrator, "Gym Owner"),
        Principal::new("trn-42", "coach@gym.test", Role::Trainer, "Coach Kim"),
        Principal::new("trn-ünï", "ü@gym.test", Role::Trainer, "Zoë Ångström"),
    ]
}

#[test]
fn round_trip_yields_equal_principal() {
    let (_, svc) = setup();
    for p in principals() {
        let tok = svc.issue(&p).unwrap();
        assert_eq!(svc.verify(&tok).unwrap(), p);
    }
}

#[test]
fn expiry_window_is_seven_days() {
    let (clock, svc) = setup();
    let p = principals().remove(0);
    let tok = svc.issue(&p).unwrap();

    clock.advance(Duration::days(6) + Duration::hours(23));
    assert_eq!(svc.verify(&tok).unwrap(), p);

    clock.advance(Duration::hours(1) + Duration::seconds(1));
    let err = svc.verify(&tok).unwrap_err();
    assert_eq!(err.reason, AuthFailureReason::Expired);
}

#[test]
fn expired_token_with_valid_signature_still_fails() {
    let (clock, svc) = setup();
    let tok = svc.issue(&principals()[1]).unwrap();
    clock.advance(Duration::days(30));
    assert_eq!(svc.verify(&tok).unwrap_err().reason, AuthFailureReason::Expired);
}

#[test]
fn every_signature_bit_flip_is_rejected() {
    let (_, svc) = setup();
    let tok = svc.issue(&principals()[0]).unwrap();
    let (message, sig_b64) = tok.rsplit_once('.').unwrap();
    let sig = URL_SAFE_NO_PAD.decode(sig_b64).unwrap();

    for byte in 0..sig.len() {
        for bit in 0..8 {
            let mut flipped = sig.clone();
            flipped[byte] ^= 1 << bit;
            let forged = format!("{message}.{}", URL_SAFE_NO_PAD.encode(&flipped));
            let err = svc.verify(&forged).expect_err("tampered token must not verify");
            assert_eq!(err.reason, AuthFailureReason::SignatureMismatch);
        }
    }
}

#[test]
fn payload_edit_breaks_signature() {
    let (_, svc) = setup();
    let tok = svc.issue(&principals()[1]).unwrap();
    let mut parts: Vec<&str> = tok.split('.').collect();

    let forged_payload = URL_SAFE_NO_PAD.encode(
        json!({
            "sub": "trn-42", "email": "coach@gym.test", "role": "administrator",
            "name": "Coach Kim", "iat": 0, "exp": i64::MAX
        })
        .to_string(),
    );
    parts[1] = &forged_payload;
    let forged = parts.join(".");

    assert_eq!(
        svc.verify(&forged).unwrap_err().reason,
        AuthFailureReason::SignatureMismatch
    );
}

#[test]
fn token_from_other_secret_is_rejected() {
    let (clock, svc) = setup();
    let other = TokenService::new(b"another-secret-ffffffffffffffffffff", clock).unwrap();
    let tok = other.issue(&principals()[0]).unwrap();
    assert_eq!(
        svc.verify(&tok).unwrap_err().reason,
        AuthFailureReason::SignatureMismatch
    );
}

#[test]
fn missing_required_field_is_rejected() {
    let (clock, svc) = setup();
    let exp = clock.now_ts() + 3600;
    let tok = encode(
        &Header::new(Algorithm::HS256),
        &json!({ "sub": "adm-1", "role": "administrator", "name": "x", "iat": 0, "exp": exp }),
        &EncodingKey::from_secret(SECRET),
    )
    .unwrap();

    assert_eq!(svc.verify(&tok).unwrap_err().reason, AuthFailureReason::MissingClaim);
}

#[test]
fn unknown_role_is_rejected() {
    let (clock, svc) = setup();
    let exp = clock.now_ts() + 3600;
    let tok = encode(
        &Header::new(Algorithm::HS256),
        &json!({
            "sub": "adm-1", "email": "e@gym.test", "role": "superuser",
            "name": "x", "iat": 0, "exp": exp
        }),
        &EncodingKey::from_secret(SECRET),
    )
    .unwrap();

    assert!(svc.verify(&tok).is_err());
}

#[test]
fn other_algorithm_is_rejected() {
    let (clock, svc) = setup();
    let exp = clock.now_ts() + 3600;
    let tok = encode(
        &Header::new(Algorithm::HS512),
        &json!({
            "sub": "adm-1", "email": "e@gym.test", "role": "administrator",
            "name": "x", "iat": 0, "exp": exp
        }),
        &EncodingKey::from_secret(SECRET),
    )
    .unwrap();

    assert!(svc.verify(&tok).is_err());
}

trait NowTs {
    fn now_ts(&self) -> i64;
}

impl NowTs for FixedClock {
    fn now_ts(&self) -> i64 {
        use gymgate_core::Clock;
        self.now().timestamp()
    }
}
