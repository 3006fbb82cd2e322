use xxhash_rust::xxh3::xxh3_128;

/// Lower-hex digest of the 128-bit xxh3 hash.
pub fn xxhash_hex(input: &[u8]) -> String {
  format!("{:032x}", xxh3_128(input))
}

/// Lower-hex rendering of a streaming `Xxh3::digest128` result.
pub fn digest128_hex(digest: u128) -> String {
  format!("{digest:032x}")
}

#[test]
fn test_xxhash_hex() {
  assert_eq!(xxhash_hex(b"hello").len(), 32);
  assert_eq!(xxhash_hex(b"hello"), xxhash_hex(b"hello"));
  assert_ne!(xxhash_hex(b"hello"), xxhash_hex(b"hello!"));
}
