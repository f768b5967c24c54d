//! Paul Hsieh's SuperFastHash, used to place strings into the visited-set buckets.

#[inline]
fn get16(bytes: &[u8]) -> u32 {
    u16::from_le_bytes([bytes[0], bytes[1]]) as u32
}

/// Non-cryptographic 32-bit mixing hash over raw bytes. Empty input hashes to 0.
pub fn super_fast_hash(data: &[u8]) -> u32 {
    if data.is_empty() {
        return 0;
    }
    let mut hash = data.len() as u32;
    let mut chunks = data.chunks_exact(4);
    for chunk in &mut chunks {
        hash = hash.wrapping_add(get16(&chunk[..2]));
        let tmp = (get16(&chunk[2..]) << 11) ^ hash;
        hash = (hash << 16) ^ tmp;
        hash = hash.wrapping_add(hash >> 11);
    }

    let tail = chunks.remainder();
    match tail.len() {
        3 => {
            hash = hash.wrapping_add(get16(tail));
            hash ^= hash << 16;
            hash ^= (tail[2] as u32) << 18;
            hash = hash.wrapping_add(hash >> 11);
        }
        2 => {
            hash = hash.wrapping_add(get16(tail));
            hash ^= hash << 11;
            hash = hash.wrapping_add(hash >> 17);
        }
        1 => {
            hash = hash.wrapping_add(tail[0] as u32);
            hash ^= hash << 10;
            hash = hash.wrapping_add(hash >> 1);
        }
        _ => {}
    }

    // final avalanche
    hash ^= hash << 3;
    hash = hash.wrapping_add(hash >> 5);
    hash ^= hash << 4;
    hash = hash.wrapping_add(hash >> 17);
    hash ^= hash << 25;
    hash = hash.wrapping_add(hash >> 6);
    hash
}

/// Bucket index for `key` in a table of `table_size` buckets.
pub fn bucket_for(key: &[u8], table_size: usize) -> usize {
    debug_assert!(table_size > 0);
    super_fast_hash(key) as usize % table_size
}
