//! Longest-prefix match of a MAC address against the vendor trie.

use macvendor_core::{Trie, VendorRecord};

use crate::mac::MacAddr;

/// Canonical-string prefix lengths tried in order: MA-S / IAB (`XX:XX:XX:XX:X`),
/// MA-M (`XX:XX:XX:X`), MA-L (`XX:XX:XX`). Longer prefixes are more specific
/// and must win over the MA-L block that contains them.
pub const CANDIDATE_LENGTHS: [usize; 3] = [13, 10, 8];

/// Trie keys for `addr`, most specific first.
pub fn candidate_keys(addr: &MacAddr) -> impl Iterator<Item = String> {
    let canonical = addr.canonical();
    CANDIDATE_LENGTHS.into_iter().map(move |len| {
        canonical[..len]
            .chars()
            .filter(|c| *c != ':')
            .map(|c| c.to_ascii_lowercase())
            .collect()
    })
}

/// Most specific record registered for `addr`, if any.
pub fn longest_prefix_match<'t>(trie: &'t Trie, addr: &MacAddr) -> Option<&'t VendorRecord> {
    candidate_keys(addr).find_map(|key| trie.search(&key))
}
