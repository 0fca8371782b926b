//! # Property Tests
//!
//! Round-trip, checksum, nonce and time-window properties over the public API.

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use proptest::prelude::*;
    use siwe_core::{
        is_eip55_address, is_valid_nonce, to_checksum_address, ChainId, Keccak256Hasher,
        MessageFields, MessageInput, SiweApi, SiweErrorKind, SiweService, VerifyOpts,
        VerifyParams,
    };
    use std::collections::HashSet;

    use crate::fixtures::{base_fields, instant, signed_message};

    const ADDRESS: &str = "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359";

    fn runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap()
    }

    fn timestamp() -> impl Strategy<Value = String> {
        (2000i32..2100, 1u32..=12, 1u32..=28, 0u32..24, 0u32..60, 0u32..60, 0u32..1000)
            .prop_map(|(y, mo, d, h, mi, s, ms)| {
                format!("{y:04}-{mo:02}-{d:02}T{h:02}:{mi:02}:{s:02}.{ms:03}Z")
            })
    }

    fn message_fields() -> impl Strategy<Value = MessageFields> {
        (
            proptest::option::of("[A-Za-z0-9 ,.'!-]{1,60}"),
            proptest::option::of(any::<u64>()),
            "[A-Za-z0-9]{8,32}",
            proptest::option::of(timestamp()),
            proptest::option::of(timestamp()),
            proptest::option::of(timestamp()),
            proptest::option::of("[A-Za-z0-9_-]{0,20}"),
            proptest::option::of(proptest::collection::vec("ipfs://[A-Za-z0-9]{10,46}", 0..5)),
        )
            .prop_map(
                |(statement, chain_id, nonce, issued_at, expiration_time, not_before, request_id, resources)| {
                    MessageFields {
                        statement,
                        chain_id: chain_id.map(ChainId::Number),
                        nonce: Some(nonce),
                        issued_at,
                        expiration_time,
                        not_before,
                        request_id,
                        resources,
                        ..base_fields(ADDRESS)
                    }
                },
            )
    }

    proptest! {
        /// parse(serialize(m)) == m once lazy defaults are filled
        #[test]
        fn prop_text_round_trip(fields in message_fields()) {
            let service = SiweService::default();
            let mut message = service.create_message(fields.into()).unwrap();
            let text = service.prepare_message(&mut message).unwrap();

            prop_assert!(message.issued_at.is_some());
            let reparsed = service.create_message(MessageInput::FromText(text.clone())).unwrap();
            prop_assert_eq!(&reparsed, &message);

            // Rendering is stable
            let mut again = reparsed;
            prop_assert_eq!(service.prepare_message(&mut again).unwrap(), text);
        }

        #[test]
        fn prop_checksum_idempotent(raw in proptest::array::uniform20(any::<u8>())) {
            let hex: String = raw.iter().map(|b| format!("{b:02x}")).collect();
            let once = to_checksum_address(&format!("0x{hex}"), &Keccak256Hasher);
            prop_assert_eq!(to_checksum_address(&once, &Keccak256Hasher), once.clone());
            prop_assert!(is_eip55_address(&once, &Keccak256Hasher));
            prop_assert_eq!(once, shared_crypto::to_checksum_hex(&raw));
        }

        #[test]
        fn prop_non_numeric_chain_id_rejected(text in "[a-zA-Z][a-zA-Z0-9]{0,10}") {
            let service = SiweService::default();
            let fields = MessageFields {
                chain_id: Some(ChainId::Text(text)),
                ..base_fields(ADDRESS)
            };
            let err = service.create_message(fields.into()).unwrap_err();
            prop_assert_eq!(err.kind(), SiweErrorKind::UnableToParse);
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        /// Verification succeeds iff the check instant is strictly before expiration.
        #[test]
        fn prop_expiration_window(offset_ms in -5_000i64..5_000) {
            let service = SiweService::default();
            let exp = "2033-05-18T03:33:20.000Z";
            let signed = signed_message(&service, |fields| {
                fields.expiration_time = Some(exp.into());
            });
            let time = instant(exp) + Duration::milliseconds(offset_ms);

            let response = runtime()
                .block_on(service.verify(
                    signed.message,
                    VerifyParams::new(signed.signature).with_time(time),
                    VerifyOpts::suppressed(),
                ))
                .unwrap();

            prop_assert_eq!(response.success, offset_ms < 0);
            if offset_ms >= 0 {
                prop_assert_eq!(
                    response.error.map(|e| e.kind()),
                    Some(SiweErrorKind::ExpiredMessage)
                );
            }
        }
    }

    #[test]
    fn test_generated_nonces_floor_and_uniqueness() {
        let service = SiweService::default();
        let nonces: HashSet<String> = (0..5_000)
            .map(|_| service.generate_nonce().unwrap())
            .collect();

        assert_eq!(nonces.len(), 5_000);
        assert!(nonces.iter().all(|n| is_valid_nonce(n) && n.len() >= 8));
    }
}
