//! Test utilities for content-addressed blocks.

use bytes::Bytes;
use graphweft_api::Link;

use crate::{id::random_link, random_bytes};

/// Generate `count` blocks of `size` random bytes each, keyed by random
/// links.
pub fn generate_blocks(count: usize, size: usize) -> Vec<(Link, Bytes)> {
    (0..count)
        .map(|_| (random_link(), Bytes::from(random_bytes(size))))
        .collect()
}
