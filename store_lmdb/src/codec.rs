//! bincode encoding for stored values.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::LmdbError;

pub(crate) fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, LmdbError> {
    Ok(bincode::serialize(value)?)
}

pub(crate) fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, LmdbError> {
    Ok(bincode::deserialize(bytes)?)
}

/// Transaction log key: big-endian so LMDB's byte order is sequence order.
pub(crate) fn sequence_key(sequence: u64) -> [u8; 8] {
    sequence.to_be_bytes()
}

pub(crate) fn parse_sequence_key(key: &[u8]) -> Result<u64, LmdbError> {
    let bytes: [u8; 8] = key
        .try_into()
        .map_err(|_| LmdbError::Corruption(format!("sequence key of {} bytes", key.len())))?;
    Ok(u64::from_be_bytes(bytes))
}
