use sha1::{Digest, Sha1};

/// 160-bit object identifier: the SHA-1 of an object's canonical bytes.
pub type Hash = [u8; 20];

pub const HASH_HEX_LEN: usize = 40;

/// Build the canonical `"<kind> <len>\0<payload>"` byte sequence hashed to
/// derive an object's identifier.
#[inline]
#[must_use]
pub fn canonical_bytes(kind: &str, payload: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(kind.len() + 1 + 20 + 1 + payload.len());
    buf.extend_from_slice(kind.as_bytes());
    buf.push(b' ');
    buf.extend_from_slice(payload.len().to_string().as_bytes());
    buf.push(0);
    buf.extend_from_slice(payload);
    buf
}

#[inline]
#[must_use]
pub fn hash_bytes(data: &[u8]) -> Hash {
    let mut hasher = Sha1::new();
    hasher.update(data);
    hasher.finalize().into()
}

#[inline]
#[must_use]
pub fn hash_to_hex(hash: &Hash) -> String {
    hex::encode(hash)
}

pub fn hex_to_hash(s: &str) -> anyhow::Result<Hash> {
    if s.len() != HASH_HEX_LEN {
        anyhow::bail!("not a valid {HASH_HEX_LEN}-char hex id: '{s}'");
    }
    let bytes = hex::decode(s)?;
    let mut hash = [0u8; 20];
    hash.copy_from_slice(&bytes);
    Ok(hash)
}

#[inline]
#[must_use]
pub fn is_hex_id(s: &str) -> bool {
    s.len() == HASH_HEX_LEN && s.bytes().all(|b| b.is_ascii_hexdigit())
}
