//! MD5 content digest of response bodies.
//!
//! Bodies are fed chunk by chunk as the transport delivers them, so memory use
//! stays bounded no matter how large the response is.

use md5::{Digest, Md5};

/// Streaming MD5 accumulator.
#[derive(Debug, Clone, Default)]
pub struct ContentDigest {
    hasher: Md5,
    bytes: u64,
}

impl ContentDigest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next chunk of the body.
    pub fn update(&mut self, chunk: &[u8]) {
        self.hasher.update(chunk);
        self.bytes += chunk.len() as u64;
    }

    /// Number of bytes fed so far.
    pub fn bytes(&self) -> u64 {
        self.bytes
    }

    /// Consume the accumulator and return the digest as lowercase hex.
    pub fn finish_hex(self) -> String {
        hex::encode(self.hasher.finalize())
    }
}

/// MD5 of a complete buffer, as lowercase hex.
pub fn md5_hex(data: &[u8]) -> String {
    let mut digest = ContentDigest::new();
    digest.update(data);
    digest.finish_hex()
}
