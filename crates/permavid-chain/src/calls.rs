//! ABI call construction for pointer reads and updates.
//!
//! Selectors are precomputed keccak-256 prefixes of the contract function
//! signatures; the encoding follows the standard Solidity ABI head/tail
//! layout for static and dynamic arguments.

use permavid_core::TokenId;

use crate::traits::{ChainError, ChainResult};

/// `uri(uint256)`
const SEL_URI: [u8; 4] = [0x0e, 0x89, 0x34, 0x1c];
/// `contractURI()`
const SEL_CONTRACT_URI: [u8; 4] = [0xe8, 0xa3, 0xd4, 0x85];
/// `updateTokenURI(uint256,string)`
const SEL_UPDATE_TOKEN_URI: [u8; 4] = [0x18, 0xe9, 0x7f, 0xd1];
/// `updateContractMetadata(string,string)`
const SEL_UPDATE_CONTRACT_METADATA: [u8; 4] = [0xef, 0x71, 0xc8, 0x2e];

/// A single pointer update, resolved per token before batching.
///
/// The reserved collection token routes to a contract-level metadata update,
/// which additionally carries the collection name; every other token is a
/// plain token-URI update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateCall {
    Token {
        collection: String,
        token_id: TokenId,
        metadata_uri: String,
    },
    Collection {
        collection: String,
        metadata_uri: String,
        name: String,
    },
}

impl UpdateCall {
    /// Target contract address.
    pub fn to(&self) -> &str {
        match self {
            UpdateCall::Token { collection, .. } => collection,
            UpdateCall::Collection { collection, .. } => collection,
        }
    }

    /// Human-readable call kind for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            UpdateCall::Token { .. } => "updateTokenURI",
            UpdateCall::Collection { .. } => "updateContractMetadata",
        }
    }

    /// ABI-encoded calldata, selector included.
    pub fn calldata(&self) -> ChainResult<Vec<u8>> {
        match self {
            UpdateCall::Token {
                token_id,
                metadata_uri,
                ..
            } => {
                // updateTokenURI(uint256 tokenId, string newURI)
                let id = encode_u256_dec(token_id.as_str())?;
                let uri_tail = encode_string(metadata_uri);
                let mut data = SEL_UPDATE_TOKEN_URI.to_vec();
                data.extend_from_slice(&id);
                data.extend_from_slice(&encode_usize(0x40)); // offset of the string tail
                data.extend_from_slice(&uri_tail);
                Ok(data)
            }
            UpdateCall::Collection {
                metadata_uri, name, ..
            } => {
                // updateContractMetadata(string uri, string name)
                let uri_tail = encode_string(metadata_uri);
                let name_tail = encode_string(name);
                let mut data = SEL_UPDATE_CONTRACT_METADATA.to_vec();
                data.extend_from_slice(&encode_usize(0x40));
                data.extend_from_slice(&encode_usize(0x40 + uri_tail.len()));
                data.extend_from_slice(&uri_tail);
                data.extend_from_slice(&name_tail);
                Ok(data)
            }
        }
    }
}

/// Calldata for a pointer read: `contractURI()` for the reserved collection
/// token, `uri(uint256)` otherwise.
pub fn pointer_read_calldata(token_id: &TokenId) -> ChainResult<Vec<u8>> {
    if token_id.is_collection() {
        Ok(SEL_CONTRACT_URI.to_vec())
    } else {
        let mut data = SEL_URI.to_vec();
        data.extend_from_slice(&encode_u256_dec(token_id.as_str())?);
        Ok(data)
    }
}

/// Decode an ABI-encoded `string` return value (offset word, length word,
/// UTF-8 bytes).
pub fn decode_abi_string(data: &[u8]) -> ChainResult<String> {
    let word = |at: usize| -> ChainResult<usize> {
        let end = at
            .checked_add(32)
            .filter(|&end| end <= data.len())
            .ok_or_else(|| ChainError::Decode("return data truncated".to_string()))?;
        // A plausible offset or length fits in the low 8 bytes
        if data[at..end - 8].iter().any(|&b| b != 0) {
            return Err(ChainError::Decode("offset or length word out of range".to_string()));
        }
        let mut value = 0usize;
        for &b in &data[end - 8..end] {
            value = (value << 8) | b as usize;
        }
        Ok(value)
    };

    let offset = word(0)?;
    let len = word(offset)?;
    // word(offset) succeeded, so offset + 32 cannot overflow
    let start = offset + 32;
    let end = start
        .checked_add(len)
        .filter(|&end| end <= data.len())
        .ok_or_else(|| ChainError::Decode("string bytes truncated".to_string()))?;
    String::from_utf8(data[start..end].to_vec())
        .map_err(|e| ChainError::Decode(format!("string is not UTF-8: {}", e)))
}

/// Encode a decimal token id as a 32-byte big-endian integer. Schoolbook
/// multiply-add so ids larger than u128 still encode.
fn encode_u256_dec(id: &str) -> ChainResult<[u8; 32]> {
    if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ChainError::InvalidTokenId(id.to_string()));
    }
    let mut out = [0u8; 32];
    for digit in id.bytes().map(|b| b - b'0') {
        let mut carry = digit as u16;
        for byte in out.iter_mut().rev() {
            let value = *byte as u16 * 10 + carry;
            *byte = (value & 0xff) as u8;
            carry = value >> 8;
        }
        if carry != 0 {
            return Err(ChainError::InvalidTokenId(id.to_string()));
        }
    }
    Ok(out)
}

fn encode_usize(value: usize) -> [u8; 32] {
    let mut out = [0u8; 32];
    out[24..].copy_from_slice(&(value as u64).to_be_bytes());
    out
}

/// Length word followed by the UTF-8 bytes, zero-padded to a 32-byte boundary.
fn encode_string(value: &str) -> Vec<u8> {
    let bytes = value.as_bytes();
    let padded = bytes.len().div_ceil(32) * 32;
    let mut out = Vec::with_capacity(32 + padded);
    out.extend_from_slice(&encode_usize(bytes.len()));
    out.extend_from_slice(bytes);
    out.resize(32 + padded, 0);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_read_routes_collection_token_to_contract_uri() {
        let data = pointer_read_calldata(&TokenId::from("0")).unwrap();
        assert_eq!(data, SEL_CONTRACT_URI.to_vec());

        let data = pointer_read_calldata(&TokenId::from("7")).unwrap();
        assert_eq!(&data[..4], &SEL_URI);
        assert_eq!(data.len(), 36);
        assert_eq!(data[35], 7);
    }

    #[test]
    fn u256_encoding_handles_large_decimal_ids() {
        let encoded = encode_u256_dec("256").unwrap();
        assert_eq!(encoded[30], 1);
        assert_eq!(encoded[31], 0);

        // 2^128, one past u128::MAX
        let encoded = encode_u256_dec("340282366920938463463374607431768211456").unwrap();
        assert_eq!(encoded[15], 1);
        assert!(encoded[16..].iter().all(|&b| b == 0));
    }

    #[test]
    fn non_decimal_token_ids_are_rejected() {
        assert!(matches!(
            encode_u256_dec("0x1f"),
            Err(ChainError::InvalidTokenId(_))
        ));
        assert!(matches!(
            encode_u256_dec(""),
            Err(ChainError::InvalidTokenId(_))
        ));
    }

    #[test]
    fn token_update_calldata_layout() {
        let call = UpdateCall::Token {
            collection: "0xabc".to_string(),
            token_id: TokenId::from("1"),
            metadata_uri: "ar://tx".to_string(),
        };
        let data = call.calldata().unwrap();
        assert_eq!(&data[..4], &SEL_UPDATE_TOKEN_URI);
        // head: token id word + offset word, tail: length word + padded bytes
        assert_eq!(data.len(), 4 + 32 + 32 + 32 + 32);
        assert_eq!(data[35], 1);
        assert_eq!(data[67], 0x40);
        assert_eq!(data[99], "ar://tx".len() as u8);
    }

    #[test]
    fn collection_update_calldata_offsets_point_at_both_tails() {
        let call = UpdateCall::Collection {
            collection: "0xabc".to_string(),
            metadata_uri: "ar://metadata".to_string(),
            name: "Night Sets".to_string(),
        };
        let data = call.calldata().unwrap();
        assert_eq!(&data[..4], &SEL_UPDATE_CONTRACT_METADATA);
        let body = &data[4..];
        // first offset: 0x40; second: 0x40 + 64 (uri tail is one padded word)
        assert_eq!(body[31], 0x40);
        assert_eq!(body[63], 0x80);
        assert_eq!(body[95], "ar://metadata".len() as u8);
    }

    #[test]
    fn abi_string_round_trip() {
        let mut encoded = encode_usize(0x20).to_vec();
        encoded.extend_from_slice(&encode_string("ipfs://bafyexample"));
        assert_eq!(decode_abi_string(&encoded).unwrap(), "ipfs://bafyexample");
    }

    #[test]
    fn truncated_return_data_is_a_decode_error() {
        assert!(matches!(
            decode_abi_string(&[0u8; 16]),
            Err(ChainError::Decode(_))
        ));
    }

    #[test]
    fn oversized_offset_word_is_a_decode_error_not_a_panic() {
        // Offset near usize::MAX; adding the length-word size must not overflow
        let mut data = [0u8; 32];
        data[24..].fill(0xff);
        assert!(matches!(
            decode_abi_string(&data),
            Err(ChainError::Decode(_))
        ));
    }

    #[test]
    fn offset_words_with_high_bytes_set_are_rejected() {
        let mut data = [0u8; 64];
        data[0] = 1;
        assert!(matches!(
            decode_abi_string(&data),
            Err(ChainError::Decode(_))
        ));
    }

    #[test]
    fn oversized_length_word_is_a_decode_error_not_a_panic() {
        // Valid offset, then a length whose low bytes are all 0xff
        let mut data = encode_usize(0x20).to_vec();
        let mut length_word = [0u8; 32];
        length_word[24..].fill(0xff);
        data.extend_from_slice(&length_word);
        assert!(matches!(
            decode_abi_string(&data),
            Err(ChainError::Decode(_))
        ));
    }
}
