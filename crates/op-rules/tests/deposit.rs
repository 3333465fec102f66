//! Deposit transaction codec on the wire.

use alloy_primitives::{address, b256, hex, keccak256, Address, Bytes, B256, U256};
use alloy_rlp::{Decodable, Encodable};
use op_rules::{DepositDecodeError, OpTxTr, OpTxType, TxDeposit, DEPOSIT_TX_TYPE_ID};
use proptest::prelude::*;

fn system_call() -> TxDeposit {
    TxDeposit {
        source_hash: b256!("1111111111111111111111111111111111111111111111111111111111111111"),
        from: address!("2222222222222222222222222222222222222222"),
        to: Some(address!("3333333333333333333333333333333333333333")),
        mint: U256::from(5),
        value: U256::ZERO,
        gas_limit: 1_000_000,
        is_system_transaction: true,
        input: Bytes::from_static(&hex!("deadbeef")),
    }
}

fn arb_deposit() -> impl Strategy<Value = TxDeposit> {
    (
        any::<[u8; 32]>(),
        any::<[u8; 20]>(),
        proptest::option::of(any::<[u8; 20]>()),
        any::<[u64; 4]>(),
        any::<u128>(),
        any::<u64>(),
        any::<bool>(),
        proptest::collection::vec(any::<u8>(), 0..300),
    )
        .prop_map(|(source_hash, from, to, mint, value, gas_limit, is_system_transaction, input)| {
            TxDeposit {
                source_hash: B256::from(source_hash),
                from: Address::from(from),
                to: to.map(Address::from),
                mint: U256::from_limbs(mint),
                value: U256::from(value),
                gas_limit,
                is_system_transaction,
                input: input.into(),
            }
        })
}

#[test]
fn test_system_call_envelope() {
    let tx = system_call();
    let encoded = tx.encoded_2718();
    assert_eq!(encoded[0], DEPOSIT_TX_TYPE_ID);
    assert_eq!(encoded.len(), 1 + 89);
    assert_eq!(&encoded[1..3], &hex!("f857"));
    assert_eq!(tx.tx_hash(), keccak256(&encoded));
    assert_eq!(TxDeposit::decode_2718(&encoded), Ok(tx));
}

#[test]
fn test_envelope_type_mismatch() {
    let mut encoded = system_call().encoded_2718();
    encoded[0] = OpTxType::Eip1559.into();
    assert_eq!(TxDeposit::decode_2718(&encoded), Err(DepositDecodeError::UnexpectedType(0x02)));
    assert!(TxDeposit::decode_2718(&[]).is_err());
}

#[test]
fn test_decodes_consecutive_deposits() {
    let first = system_call();
    let second = TxDeposit { to: None, is_system_transaction: false, ..system_call() };
    let mut buf = Vec::new();
    first.encode(&mut buf);
    second.encode(&mut buf);

    let mut cursor = buf.as_slice();
    assert_eq!(TxDeposit::decode(&mut cursor).unwrap(), first);
    let decoded = TxDeposit::decode(&mut cursor).unwrap();
    assert!(decoded.is_create());
    assert_eq!(decoded, second);
    assert!(cursor.is_empty());

    assert_eq!(
        TxDeposit::decode_exact(&buf),
        Err(DepositDecodeError::TrailingBytes(second.length()))
    );
}

#[test]
fn test_validator_view() {
    let tx = system_call();
    assert_eq!(OpTxTr::tx_type(&tx), OpTxType::Deposit);
    assert!(OpTxTr::is_deposit(&tx));
    assert_eq!(OpTxTr::sender(&tx), tx.from);
    assert!(OpTxTr::is_system_transaction(&tx));
}

#[test]
fn test_json_field_names() {
    let json = serde_json::to_value(system_call()).unwrap();
    assert_eq!(json["sourceHash"], format!("{}", system_call().source_hash));
    assert_eq!(json["gasLimit"], 1_000_000);
    assert_eq!(json["isSystemTransaction"], true);
    let back: TxDeposit = serde_json::from_value(json).unwrap();
    assert_eq!(back, system_call());
}

proptest! {
    #[test]
    fn encoding_is_reversible(tx in arb_deposit()) {
        let mut buf = Vec::new();
        tx.encode(&mut buf);
        prop_assert_eq!(buf.len(), tx.length());
        prop_assert_eq!(TxDeposit::decode_exact(&buf), Ok(tx.clone()));
        prop_assert_eq!(TxDeposit::decode_2718(&tx.encoded_2718()), Ok(tx));
    }
}
