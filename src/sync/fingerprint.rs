// ABOUTME: Content fingerprints for change detection against remote entity tags.
// ABOUTME: MD5 computed in fixed-size chunks so large files are never fully buffered.

use md5::{Digest, Md5};
use std::io;
use std::path::Path;
use tokio::io::AsyncReadExt;

/// Read size used while hashing.
pub const CHUNK_SIZE: usize = 64 * 1024;

/// Lowercase hex MD5 of a file's contents.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentFingerprint(String);

impl ContentFingerprint {
    pub async fn of_file(path: &Path) -> io::Result<Self> {
        let mut file = tokio::fs::File::open(path).await?;
        let mut hasher = Md5::new();
        let mut buf = vec![0u8; CHUNK_SIZE];

        loop {
            let read = file.read(&mut buf).await?;
            if read == 0 {
                break;
            }
            hasher.update(&buf[..read]);
        }

        Ok(Self(hex::encode(hasher.finalize())))
    }

    pub fn of_bytes(bytes: &[u8]) -> Self {
        Self(hex::encode(Md5::digest(bytes)))
    }

    pub fn as_hex(&self) -> &str {
        &self.0
    }

    /// Compare against an entity tag as reported by the object store.
    ///
    /// Multipart entity tags (`<md5>-<parts>`) never match.
    pub fn matches_etag(&self, etag: &str) -> bool {
        normalize_etag(etag).eq_ignore_ascii_case(&self.0)
    }
}

/// Strip surrounding whitespace and quote characters from an entity tag.
pub fn normalize_etag(etag: &str) -> &str {
    etag.trim().trim_matches('"')
}
