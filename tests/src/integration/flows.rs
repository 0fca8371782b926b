//! # Integration Test Flows
//!
//! Sign-in flows as a relying party runs them: issue a nonce, hand the
//! canonical text to a wallet, parse what comes back, verify.
//!
//! ## Flows Tested:
//!
//! 1. **Lifecycle**: nonce issue → fields → text → wallet signature → parse → verify
//! 2. **Bindings**: domain and nonce mismatches win over a valid signature
//! 3. **Time window**: millisecond boundaries of `expirationTime` and `notBefore`
//! 4. **JSON facade**: key allow-lists and argument misuse
//! 5. **Concurrency**: independent verifications on one shared service

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{DateTime, Duration, Utc};
    use serde_json::json;
    use shared_crypto::EthereumKeyPair;
    use siwe_core::{
        ChainId, JsonSiweFacade, MessageInput, SiweApi, SiweError, SiweErrorKind, SiweMessage,
        SiweService, VerifyOpts, VerifyParams,
    };
    use siwe_telemetry::init_test_logging;

    use crate::fixtures::{instant, sign_with, signed_message, DOMAIN};

    // =============================================================================
    // LIFECYCLE
    // =============================================================================

    #[tokio::test]
    async fn test_full_sign_in_flow() {
        init_test_logging();
        let server = SiweService::default();

        // Server issues a nonce and the message
        let nonce = server.generate_nonce().unwrap();
        let issued_nonce = nonce.clone();
        let signed = signed_message(&server, move |fields| {
            fields.nonce = Some(issued_nonce);
            fields.chain_id = Some(ChainId::Number(137));
            fields.resources = Some(vec!["https://example.com/terms".into()]);
        });

        // Wallet returns text + signature; server rebuilds from text
        let received = server
            .create_message(MessageInput::FromText(signed.text.clone()))
            .unwrap();
        assert_eq!(received, signed.message);

        let params = VerifyParams::new(signed.signature.clone())
            .with_domain(DOMAIN)
            .with_nonce(nonce);
        let response = server
            .verify(received, params, VerifyOpts::default())
            .await
            .unwrap();

        assert!(response.success);
        assert_eq!(response.data.address, signed.keypair.checksum_address());
        assert_eq!(response.data.chain_id, 137);
    }

    #[tokio::test]
    async fn test_fixed_key_signer() {
        let server = SiweService::default();
        let mut secret = [0u8; 32];
        secret[31] = 1;
        let keypair = EthereumKeyPair::from_bytes(secret).unwrap();

        let signed = sign_with(&server, keypair, |_| {});
        assert_eq!(
            signed.message.address,
            "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf"
        );

        let response = server
            .verify(
                signed.message,
                VerifyParams::new(signed.signature),
                VerifyOpts::default(),
            )
            .await
            .unwrap();
        assert!(response.success);
    }

    #[tokio::test]
    async fn test_tampered_text_fails_address_check() {
        let server = SiweService::default();
        let signed = signed_message(&server, |_| {});

        // Attacker rewrites the statement but reuses the signature
        let tampered_text = signed
            .text
            .replace("Sign in to Example", "Transfer everything to Example");
        let tampered = server
            .create_message(MessageInput::FromText(tampered_text))
            .unwrap();

        let failure = server
            .verify(tampered, VerifyParams::new(signed.signature), VerifyOpts::default())
            .await
            .unwrap_err();
        assert_eq!(failure.error.kind(), SiweErrorKind::InvalidAddress);
    }

    #[tokio::test]
    async fn test_malformed_signature_fails_address_check() {
        let server = SiweService::default();
        let signed = signed_message(&server, |_| {});

        for signature in ["0x", "not-hex", &"ab".repeat(65)] {
            let failure = server
                .verify(
                    signed.message.clone(),
                    VerifyParams::new(signature),
                    VerifyOpts::default(),
                )
                .await
                .unwrap_err();
            assert_eq!(
                failure.error,
                SiweError::InvalidAddress {
                    expected: String::new(),
                    received: signed.message.address.clone(),
                }
            );
        }
    }

    // =============================================================================
    // BINDINGS
    // =============================================================================

    #[tokio::test]
    async fn test_domain_binding_beats_valid_signature() {
        let server = SiweService::default();
        let signed = signed_message(&server, |_| {});

        let failure = server
            .verify(
                signed.message,
                VerifyParams::new(signed.signature).with_domain("phishing.example"),
                VerifyOpts::default(),
            )
            .await
            .unwrap_err();

        assert_eq!(
            failure.error,
            SiweError::DomainMismatch {
                expected: "phishing.example".into(),
                received: DOMAIN.into(),
            }
        );
    }

    #[tokio::test]
    async fn test_nonce_binding_beats_valid_signature() {
        let server = SiweService::default();
        let signed = signed_message(&server, |fields| {
            fields.nonce = Some("firstNonce1".into());
        });

        // Replay against a later session's nonce
        let failure = server
            .verify(
                signed.message,
                VerifyParams::new(signed.signature).with_nonce("secondNonce2"),
                VerifyOpts::default(),
            )
            .await
            .unwrap_err();

        assert_eq!(
            failure.error,
            SiweError::NonceMismatch {
                expected: "secondNonce2".into(),
                received: "firstNonce1".into(),
            }
        );
    }

    // =============================================================================
    // TIME WINDOW
    // =============================================================================

    #[tokio::test]
    async fn test_expiration_millisecond_boundary() {
        let server = SiweService::default();
        let exp = "2031-03-14T15:09:26.535Z";
        let signed = signed_message(&server, |fields| {
            fields.expiration_time = Some(exp.into());
        });
        let t = instant(exp);

        let verify_at = |time: DateTime<Utc>| {
            server.verify(
                signed.message.clone(),
                VerifyParams::new(signed.signature.clone()).with_time(time),
                VerifyOpts::suppressed(),
            )
        };

        let before = verify_at(t - Duration::milliseconds(1)).await.unwrap();
        assert!(before.success);

        for time in [t, t + Duration::milliseconds(1)] {
            let response = verify_at(time).await.unwrap();
            assert!(!response.success);
            assert_eq!(
                response.error.map(|e| e.kind()),
                Some(SiweErrorKind::ExpiredMessage)
            );
        }
    }

    #[tokio::test]
    async fn test_not_before_millisecond_boundary() {
        let server = SiweService::default();
        let nbf = "2031-03-14T15:09:26.535Z";
        let signed = signed_message(&server, |fields| {
            fields.not_before = Some(nbf.into());
        });
        let t = instant(nbf);

        let early = server
            .verify(
                signed.message.clone(),
                VerifyParams::new(signed.signature.clone())
                    .with_time(t - Duration::milliseconds(1)),
                VerifyOpts::default(),
            )
            .await
            .unwrap_err();
        assert_eq!(early.error.kind(), SiweErrorKind::NotYetValidMessage);

        let on_time = server
            .verify(
                signed.message,
                VerifyParams::new(signed.signature).with_time(t),
                VerifyOpts::default(),
            )
            .await
            .unwrap();
        assert!(on_time.success);
    }

    #[tokio::test]
    async fn test_window_with_offset_timestamps() {
        let server = SiweService::default();
        let signed = signed_message(&server, |fields| {
            fields.not_before = Some("2031-01-01T09:00:00+09:00".into());
            fields.expiration_time = Some("2031-01-01T01:00:00+01:00".into());
        });

        // Window is [00:00Z, 00:00Z): empty
        let response = server
            .verify(
                signed.message,
                VerifyParams::new(signed.signature).with_time(instant("2031-01-01T00:00:00Z")),
                VerifyOpts::suppressed(),
            )
            .await
            .unwrap();
        assert_eq!(
            response.error.map(|e| e.kind()),
            Some(SiweErrorKind::ExpiredMessage)
        );
    }

    // =============================================================================
    // SUPPRESSION AND DEPRECATED SHIM
    // =============================================================================

    #[tokio::test]
    async fn test_suppressed_and_raised_failures_match() {
        let server = SiweService::default();
        let signed = signed_message(&server, |fields| {
            fields.expiration_time = Some("2000-01-01T00:00:00Z".into());
        });
        let params = VerifyParams::new(signed.signature.clone());

        let raised = server
            .verify(signed.message.clone(), params.clone(), VerifyOpts::default())
            .await
            .unwrap_err();
        let returned = server
            .verify(signed.message, params, VerifyOpts::suppressed())
            .await
            .unwrap();

        assert!(!returned.success);
        assert_eq!(returned.error, Some(raised.error.clone()));
        assert_eq!(returned.data, raised.data);
        assert_eq!(raised.error.kind(), SiweErrorKind::ExpiredMessage);
    }

    #[tokio::test]
    #[allow(deprecated)]
    async fn test_deprecated_validate_matches_verify() {
        let server = SiweService::default();
        let signed = signed_message(&server, |_| {});

        let data = server
            .validate(signed.message.clone(), &signed.signature)
            .await
            .unwrap();
        assert_eq!(data, signed.message);

        let forged = EthereumKeyPair::generate()
            .sign_personal(signed.text.as_bytes())
            .unwrap();
        let err = server.validate(signed.message, &forged).await.unwrap_err();
        assert_eq!(err.kind(), SiweErrorKind::InvalidAddress);
    }

    // =============================================================================
    // JSON FACADE
    // =============================================================================

    #[tokio::test]
    async fn test_facade_round_trip_from_text() {
        let facade = JsonSiweFacade::new(SiweService::default());
        let signed = signed_message(facade.api(), |_| {});

        let message = facade.create_message(&json!(signed.text)).unwrap();
        let response = facade
            .verify(
                message,
                &json!({ "signature": signed.signature, "domain": DOMAIN }),
                Some(&json!({ "suppressExceptions": false })),
            )
            .await
            .unwrap();
        assert!(response.success);
    }

    #[tokio::test]
    async fn test_facade_key_sets_checked_independently() {
        let facade = JsonSiweFacade::new(SiweService::default());
        let signed = signed_message(facade.api(), |_| {});

        // Valid params, misspelled option
        let failure = facade
            .verify(
                signed.message.clone(),
                &json!({ "signature": signed.signature }),
                Some(&json!({ "suppressExeptions": true })),
            )
            .await
            .unwrap_err();
        assert_eq!(failure.error.kind(), SiweErrorKind::InvalidParams);
        assert_eq!(
            failure.error.to_string(),
            "suppressExeptions is/are not valid key(s) for VerifyOpts"
        );

        // Misspelled param, valid options
        let failure = facade
            .verify(
                signed.message,
                &json!({ "signature": signed.signature, "nonse": "abcd1234" }),
                None,
            )
            .await
            .unwrap_err();
        assert_eq!(
            failure.error,
            SiweError::InvalidParams {
                target: "VerifyParams",
                keys: vec!["nonse".into()],
            }
        );
    }

    #[test]
    fn test_facade_validate_message_misuse() {
        let facade = JsonSiweFacade::new(SiweService::default());
        let signed = signed_message(facade.api(), |_| {});

        let err = facade
            .validate_message(&signed.message, &[json!(signed.signature)])
            .unwrap_err();
        assert_eq!(err.kind(), SiweErrorKind::UnableToParse);
        assert!(matches!(err, SiweError::UnexpectedArguments { count: 1 }));
    }

    #[test]
    fn test_facade_rejects_textual_garbage_chain_id() {
        let facade = JsonSiweFacade::new(SiweService::default());
        let keypair = EthereumKeyPair::generate();

        let err = facade
            .create_message(&json!({
                "domain": DOMAIN,
                "address": keypair.checksum_address(),
                "uri": "https://example.com/login",
                "version": "1",
                "chainId": "one",
            }))
            .unwrap_err();
        assert_eq!(err.kind(), SiweErrorKind::UnableToParse);
    }

    // =============================================================================
    // CONCURRENCY
    // =============================================================================

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_verifications_are_independent() {
        let server = Arc::new(SiweService::default());

        let mut handles = Vec::new();
        for i in 0..32 {
            let server = server.clone();
            let signed = signed_message(&server, |_| {});
            handles.push(tokio::spawn(async move {
                // Every third verification carries a wrong nonce
                let mut params = VerifyParams::new(signed.signature);
                if i % 3 == 0 {
                    params = params.with_nonce("wrongNonce1");
                }
                let response = server
                    .verify(signed.message, params, VerifyOpts::suppressed())
                    .await
                    .unwrap();
                (i, response.success)
            }));
        }

        for handle in handles {
            let (i, success) = handle.await.unwrap();
            assert_eq!(success, i % 3 != 0, "verification {i}");
        }
    }

    #[tokio::test]
    async fn test_serialized_response_data() {
        let server = SiweService::default();
        let signed = signed_message(&server, |fields| {
            fields.request_id = Some("req-42".into());
        });

        let response = server
            .verify(
                signed.message,
                VerifyParams::new(signed.signature),
                VerifyOpts::default(),
            )
            .await
            .unwrap();
        let value = siwe_core::adapters::json::response_to_json(&response);

        assert_eq!(value["success"], true);
        assert_eq!(value["data"]["requestId"], "req-42");
        assert!(value.get("error").is_none());

        let back: SiweMessage = serde_json::from_value(value["data"].clone()).unwrap();
        assert_eq!(back, response.data);
    }
}
