//! The deposit transaction and its binary codec.
//!
//! A deposit carries L1-originated value and calls into L2. It is never signed: the sender is
//! part of the payload and is never recovered.

use alloc::vec::Vec;

use alloy_primitives::{keccak256, Address, Bytes, B256, U256};
use alloy_rlp::{BufMut, Decodable, Encodable, Header, EMPTY_STRING_CODE};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    constants::deposit::{DEPOSIT_SIZE, IS_SYSTEM_TX_SIZE, MINT_SIZE, SOURCE_HASH_SIZE, TO_SIZE},
    DepositDecodeError, DEPOSIT_TX_TYPE_ID,
};

/// A deposit transaction.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxDeposit {
    /// Hash uniquely identifying the origin of the deposit.
    pub source_hash: B256,
    /// The sender, taken as is.
    pub from: Address,
    /// The call target, `None` for a contract creation.
    pub to: Option<Address>,
    /// Value credited to the sender before execution, independent of [`Self::value`].
    pub mint: U256,
    /// Value transferred by the call.
    pub value: U256,
    /// Gas limit.
    pub gas_limit: u64,
    /// Whether this is a protocol-internal system transaction.
    pub is_system_transaction: bool,
    /// Calldata or initcode.
    pub input: Bytes,
}

impl TxDeposit {
    /// Returns `true` if the deposit creates a contract.
    pub const fn is_create(&self) -> bool {
        self.to.is_none()
    }

    /// Length of the RLP list payload, without the list header.
    fn fields_len(&self) -> usize {
        self.source_hash.length() +
            self.from.length() +
            self.to.map_or(1, |to| to.length()) +
            self.mint.length() +
            self.value.length() +
            self.gas_limit.length() +
            self.is_system_transaction.length() +
            self.input.length()
    }

    fn encode_fields(&self, out: &mut dyn BufMut) {
        self.source_hash.encode(out);
        self.from.encode(out);
        match self.to {
            Some(to) => to.encode(out),
            None => out.put_u8(EMPTY_STRING_CODE),
        }
        self.mint.encode(out);
        self.value.encode(out);
        self.gas_limit.encode(out);
        self.is_system_transaction.encode(out);
        self.input.encode(out);
    }

    fn decode_fields(buf: &mut &[u8]) -> Result<Self, DepositDecodeError> {
        let source_hash = B256::from_slice(decode_fixed(buf, "sourceHash", 32)?);
        let from = Address::from_slice(decode_fixed(buf, "from", 20)?);
        let to = match Header::decode_bytes(buf, false)? {
            [] => None,
            to if to.len() == 20 => Some(Address::from_slice(to)),
            to => {
                return Err(DepositDecodeError::InvalidFieldLength {
                    field: "to",
                    expected: 20,
                    got: to.len(),
                })
            }
        };
        let mint = U256::decode(buf)?;
        let value = U256::decode(buf)?;
        let gas_limit = u64::decode(buf)?;
        let is_system_transaction = decode_system_flag(buf)?;
        let input = Bytes::decode(buf)?;

        Ok(Self { source_hash, from, to, mint, value, gas_limit, is_system_transaction, input })
    }

    /// Decodes one deposit RLP list from the front of `buf`, advancing it past the list.
    pub fn rlp_decode(buf: &mut &[u8]) -> Result<Self, DepositDecodeError> {
        let header = Header::decode(buf)?;
        if !header.list {
            return Err(DepositDecodeError::NotAList);
        }
        let remaining = *buf;
        if remaining.len() < header.payload_length {
            return Err(alloy_rlp::Error::InputTooShort.into());
        }
        let (mut fields, rest) = remaining.split_at(header.payload_length);
        let tx = Self::decode_fields(&mut fields)?;
        if !fields.is_empty() {
            return Err(DepositDecodeError::TrailingFields);
        }
        *buf = rest;
        Ok(tx)
    }

    /// Decodes a deposit RLP list that must span the whole input.
    pub fn decode_exact(bytes: &[u8]) -> Result<Self, DepositDecodeError> {
        let mut buf = bytes;
        let tx = Self::rlp_decode(&mut buf)?;
        if !buf.is_empty() {
            return Err(DepositDecodeError::TrailingBytes(buf.len()));
        }
        Ok(tx)
    }

    /// Encodes the EIP-2718 envelope: the deposit type byte followed by the RLP list.
    pub fn encode_2718(&self, out: &mut dyn BufMut) {
        out.put_u8(DEPOSIT_TX_TYPE_ID);
        self.encode(out);
    }

    /// Returns the EIP-2718 encoding of the deposit.
    pub fn encoded_2718(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(1 + self.length());
        self.encode_2718(&mut out);
        out
    }

    /// Decodes an EIP-2718 enveloped deposit spanning the whole input.
    pub fn decode_2718(bytes: &[u8]) -> Result<Self, DepositDecodeError> {
        match bytes.split_first() {
            Some((&DEPOSIT_TX_TYPE_ID, rest)) => Self::decode_exact(rest),
            Some((&ty, _)) => Err(DepositDecodeError::UnexpectedType(ty)),
            None => Err(alloy_rlp::Error::InputTooShort.into()),
        }
    }

    /// Hash of the EIP-2718 encoding.
    pub fn tx_hash(&self) -> B256 {
        keccak256(self.encoded_2718())
    }

    /// Heuristic in-memory size of the deposit when held in a transaction pool.
    pub fn size(&self) -> usize {
        DEPOSIT_SIZE +
            self.input.len() +
            self.to.map_or(0, |_| TO_SIZE) +
            SOURCE_HASH_SIZE +
            IS_SYSTEM_TX_SIZE +
            MINT_SIZE
    }
}

/// Decodes a byte string that must have exactly `expected` bytes.
fn decode_fixed<'a>(
    buf: &mut &'a [u8],
    field: &'static str,
    expected: usize,
) -> Result<&'a [u8], DepositDecodeError> {
    let bytes = Header::decode_bytes(buf, false)?;
    if bytes.len() != expected {
        return Err(DepositDecodeError::InvalidFieldLength { field, expected, got: bytes.len() });
    }
    Ok(bytes)
}

/// Decodes the system flag. Only the scalar `1` is `true`; any other value is `false`.
fn decode_system_flag(buf: &mut &[u8]) -> Result<bool, DepositDecodeError> {
    let flag = U256::decode(buf)?;
    if flag > U256::from(1) {
        warn!(target: "op_rules::deposit", %flag, "Non-canonical system flag, treated as false");
    }
    Ok(flag == U256::from(1))
}

impl Encodable for TxDeposit {
    fn encode(&self, out: &mut dyn BufMut) {
        Header { list: true, payload_length: self.fields_len() }.encode(out);
        self.encode_fields(out);
    }

    fn length(&self) -> usize {
        let payload_length = self.fields_len();
        Header { list: true, payload_length }.length() + payload_length
    }
}

impl Decodable for TxDeposit {
    fn decode(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
        Self::rlp_decode(buf).map_err(Into::into)
    }
}
