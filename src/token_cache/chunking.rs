//! Splitting a payload across size-limited values.
//!
//! A payload larger than the store allows per value is cut into pieces of at
//! most `chunk_size` characters, each stored under its own key, plus an
//! index record saying how many pieces there are. Pieces are arbitrary
//! substrings, so they must be joined in order before the payload means
//! anything.

use serde::{Deserialize, Serialize};

/// Describes the chunk set of the most recent successful write.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CacheIndex {
    pub total_chunks: usize,
    pub chunk_size: usize,
}

/// Cut `payload` into `ceil(chars / chunk_size)` pieces of exactly
/// `chunk_size` characters; the last piece may be shorter.
///
/// Lengths count `char`s, so a piece never ends inside a UTF-8 sequence.
/// A zero `chunk_size` is treated as 1.
pub fn split_payload(payload: &str, chunk_size: usize) -> Vec<String> {
    let chunk_size = chunk_size.max(1);
    let chars: Vec<char> = payload.chars().collect();
    chars
        .chunks(chunk_size)
        .map(|piece| piece.iter().collect())
        .collect()
}

/// Reassemble pieces produced by [`split_payload`], in order.
pub fn join_chunks<I, S>(chunks: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    chunks.into_iter().fold(String::new(), |mut payload, chunk| {
        payload.push_str(chunk.as_ref());
        payload
    })
}
