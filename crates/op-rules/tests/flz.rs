//! Compression-length estimate against known payloads and the reference implementation.

use alloy_primitives::hex;
use op_rules::{flz_compress_len, RollupGasData};
use proptest::prelude::*;
use rstest::rstest;

const EMPTY_TX: &str = "DD80808094095E7BAEA6A6C7C4C2DFEB977EFAC326AF552D878080808080";

const CONTRACT_CALL_TX: &str = concat!(
    "02f901550a758302df1483be21b88304743f94f8",
    "0e51afb613d764fa61751affd3313c190a86bb870151bd62fd12adb8",
    "e41ef24f3f0000000000000000000000000000000000000000000000",
    "00000000000000006e000000000000000000000000af88d065e77c8c",
    "c2239327c5edb3a432268e5831000000000000000000000000000000",
    "000000000000000000000000000003c1e50000000000000000000000",
    "00000000000000000000000000000000000000000000000000000000",
    "000000000000000000000000000000000000000000000000a0000000",
    "00000000000000000000000000000000000000000000000000000000",
    "148c89ed219d02f1a5be012c689b4f5b731827bebe00000000000000",
    "0000000000c001a033fd89cb37c31b2cba46b6466e040c61fc9b2a36",
    "75a7f5f493ebd5ad77c497f8a07cdf65680e238392693019b4092f61",
    "0222e71b7cec06449cb922b93b6a12744e",
);

#[rstest]
#[case::empty(Vec::new(), 0)]
#[case::repeated_byte(vec![1u8; 1000], 21)]
#[case::zeroes(vec![0u8; 1000], 21)]
#[case::empty_tx(hex::decode(EMPTY_TX).unwrap(), 31)]
#[case::contract_call(hex::decode(CONTRACT_CALL_TX).unwrap(), 202)]
fn test_known_payloads(#[case] payload: Vec<u8>, #[case] expected: u32) {
    assert_eq!(flz_compress_len(&payload), expected);
}

#[test]
fn test_rollup_gas_data_of_contract_call() {
    let payload = hex::decode(CONTRACT_CALL_TX).unwrap();
    let data = RollupGasData::from_payload(Some(&payload));
    let zeroes = payload.iter().filter(|byte| **byte == 0).count() as u64;
    assert_eq!(data.zeroes, zeroes);
    assert_eq!(data.ones, payload.len() as u64 - zeroes);
    assert_eq!(data.payload_len(), payload.len() as u64);
    assert_eq!(data.fastlz_size, 202);
}

proptest! {
    #[test]
    fn matches_reference_estimate(payload in proptest::collection::vec(any::<u8>(), 0..2048)) {
        prop_assert_eq!(flz_compress_len(&payload), op_alloy_flz::flz_compress_len(&payload));
    }

    #[test]
    fn matches_reference_on_repetitive_input(
        chunk in proptest::collection::vec(0u8..4, 1..16),
        repeats in 1usize..200,
    ) {
        let payload = chunk.repeat(repeats);
        prop_assert_eq!(flz_compress_len(&payload), op_alloy_flz::flz_compress_len(&payload));
    }
}
