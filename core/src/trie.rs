//! Hex-digit prefix trie.
//!
//! Each node has a fixed 16-slot child array indexed by digit value, so a
//! lookup is at most [`MAX_KEY_LEN`] array hops with no hashing.

use std::collections::BTreeMap;

use crate::error::TrieError;
use crate::record::VendorRecord;

/// Children per node: one per hex digit.
pub const RADIX: usize = 16;

/// Longest key: a 36-bit MA-S / IAB prefix, four octets and a nibble.
pub const MAX_KEY_LEN: usize = 9;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrieNode {
    pub(crate) children: [Option<Box<TrieNode>>; RADIX],
    pub(crate) vendor: Option<VendorRecord>,
}

impl TrieNode {
    pub fn vendor(&self) -> Option<&VendorRecord> {
        self.vendor.as_ref()
    }

    pub fn child(&self, digit: u8) -> Option<&TrieNode> {
        self.children.get(usize::from(digit))?.as_deref()
    }

    /// Present children with their digit value, in ascending digit order.
    pub fn children(&self) -> impl Iterator<Item = (u8, &TrieNode)> {
        self.children
            .iter()
            .enumerate()
            .filter_map(|(digit, child)| child.as_deref().map(|node| (digit as u8, node)))
    }

    pub fn is_leaf(&self) -> bool {
        self.children.iter().all(Option::is_none)
    }
}

/// Value of an ASCII hex digit, either case.
pub fn digit_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

const DIGITS: &[u8; RADIX] = b"0123456789abcdef";

/// Prefix trie mapping hex-digit keys to vendor records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trie {
    root: TrieNode,
    len: usize,
}

impl Trie {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a trie from normalized records. Keys arrive sorted from the
    /// map, so builds over the same input are identical.
    pub fn from_records(records: BTreeMap<String, VendorRecord>) -> Result<Self, TrieError> {
        let mut trie = Trie::new();
        for (key, record) in records {
            trie.insert(&key, record)?;
        }
        Ok(trie)
    }

    pub(crate) fn from_root(root: TrieNode, len: usize) -> Self {
        Self { root, len }
    }

    pub fn root(&self) -> &TrieNode {
        &self.root
    }

    /// Number of keys with a record.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Store `vendor` under `key`, returning the record it replaced.
    pub fn insert(
        &mut self,
        key: &str,
        vendor: VendorRecord,
    ) -> Result<Option<VendorRecord>, TrieError> {
        let digits = parse_key(key).ok_or_else(|| TrieError::InvalidKey(key.to_string()))?;

        let mut node = &mut self.root;
        for digit in digits {
            let slot = &mut node.children[usize::from(digit)];
            node = slot.get_or_insert_with(Box::default).as_mut();
        }

        let previous = node.vendor.replace(vendor);
        if previous.is_none() {
            self.len += 1;
        }
        Ok(previous)
    }

    /// Exact-key search. Keys that are not valid hex never match.
    pub fn search(&self, key: &str) -> Option<&VendorRecord> {
        let digits = parse_key(key)?;
        let mut node = &self.root;
        for digit in digits {
            node = node.child(digit)?;
        }
        node.vendor()
    }

    /// All entries as (lowercase key, record), in ascending key order.
    pub fn entries(&self) -> Vec<(String, &VendorRecord)> {
        let mut out = Vec::with_capacity(self.len);
        let mut prefix = String::with_capacity(MAX_KEY_LEN);
        collect(&self.root, &mut prefix, &mut out);
        out
    }
}

fn collect<'a>(node: &'a TrieNode, prefix: &mut String, out: &mut Vec<(String, &'a VendorRecord)>) {
    if let Some(vendor) = node.vendor() {
        out.push((prefix.clone(), vendor));
    }
    for (digit, child) in node.children() {
        prefix.push(char::from(DIGITS[usize::from(digit)]));
        collect(child, prefix, out);
        prefix.pop();
    }
}

fn parse_key(key: &str) -> Option<Vec<u8>> {
    if key.is_empty() || key.len() > MAX_KEY_LEN {
        return None;
    }
    key.bytes().map(digit_value).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::BlockSize;

    fn record(block: BlockSize, name: &str, oui: &[u8]) -> VendorRecord {
        VendorRecord::new(block, false, name, 1_518_652_800, oui.to_vec()).unwrap()
    }

    #[test]
    fn test_insert_then_search_every_block_size() {
        let mut trie = Trie::new();
        let large = record(BlockSize::Large, "Dell Inc.", &[0x54, 0xbf, 0x64]);
        let medium = record(BlockSize::Medium, "Zimmer GmbH", &[0x94, 0x05, 0xbb, 0x09]);
        let small = record(
            BlockSize::Small,
            "Amazon Technologies Inc.",
            &[0x70, 0xb3, 0xd5, 0xe6, 0x0f],
        );

        trie.insert("54bf64", large.clone()).unwrap();
        trie.insert("9405bb9", medium.clone()).unwrap();
        trie.insert("70b3d5e6f", small.clone()).unwrap();

        assert_eq!(trie.search("54bf64"), Some(&large));
        assert_eq!(trie.search("9405bb9"), Some(&medium));
        assert_eq!(trie.search("70b3d5e6f"), Some(&small));
        assert_eq!(trie.len(), 3);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let mut trie = Trie::new();
        let dell = record(BlockSize::Large, "Dell Inc.", &[0x54, 0xbf, 0x64]);
        trie.insert("54BF64", dell.clone()).unwrap();
        assert_eq!(trie.search("54bf64"), Some(&dell));
        assert_eq!(trie.search("54Bf64"), Some(&dell));
    }

    #[test]
    fn test_search_misses() {
        let mut trie = Trie::new();
        trie.insert("54bf64", record(BlockSize::Large, "Dell Inc.", &[0x54, 0xbf, 0x64]))
            .unwrap();

        // Interior node without a record.
        assert_eq!(trie.search("54bf"), None);
        // Branch that does not exist.
        assert_eq!(trie.search("54bf65"), None);
        // Runs past a terminal node.
        assert_eq!(trie.search("54bf640"), None);
        // Not hex.
        assert_eq!(trie.search("54:bf:64"), None);
        assert_eq!(trie.search(""), None);
    }

    #[test]
    fn test_reinsert_overwrites() {
        let mut trie = Trie::new();
        let old = record(BlockSize::Large, "Dell", &[0x54, 0xbf, 0x64]);
        let new = record(BlockSize::Large, "Dell Inc.", &[0x54, 0xbf, 0x64]);

        assert_eq!(trie.insert("54bf64", old.clone()).unwrap(), None);
        assert_eq!(trie.insert("54bf64", new.clone()).unwrap(), Some(old));
        assert_eq!(trie.search("54bf64"), Some(&new));
        assert_eq!(trie.len(), 1);
    }

    #[test]
    fn test_insert_rejects_invalid_keys() {
        let mut trie = Trie::new();
        let dell = record(BlockSize::Large, "Dell Inc.", &[0x54, 0xbf, 0x64]);
        for bad in ["", "54:bf:64", "54bg64", "70b3d5e6f0"] {
            assert_eq!(
                trie.insert(bad, dell.clone()),
                Err(TrieError::InvalidKey(bad.to_string()))
            );
        }
        assert!(trie.is_empty());
        assert!(trie.root().is_leaf());
    }

    #[test]
    fn test_longest_registry_key_fits() {
        let mut trie = Trie::new();
        let iab = record(BlockSize::Individual, "Hyperion", &[0x00, 0x50, 0xc2, 0x00, 0x01]);
        trie.insert("0050c2001", iab.clone()).unwrap();
        assert_eq!(trie.search("0050c2001"), Some(&iab));
        assert_eq!(trie.search("0050c20010"), None);
    }

    #[test]
    fn test_nested_prefixes_coexist() {
        let mut trie = Trie::new();
        let parent = record(BlockSize::Large, "IEEE Registration Authority", &[0x70, 0xb3, 0xd5]);
        let child = record(
            BlockSize::Small,
            "Amazon Technologies Inc.",
            &[0x70, 0xb3, 0xd5, 0xe6, 0x0f],
        );
        trie.insert("70b3d5e6f", child.clone()).unwrap();
        trie.insert("70b3d5", parent.clone()).unwrap();

        assert_eq!(trie.search("70b3d5"), Some(&parent));
        assert_eq!(trie.search("70b3d5e6f"), Some(&child));
    }

    #[test]
    fn test_entries_are_sorted_and_insertion_order_independent() {
        let a = record(BlockSize::Large, "A", &[0x00, 0x00, 0x0c]);
        let b = record(BlockSize::Medium, "B", &[0x94, 0x05, 0xbb, 0x09]);
        let c = record(BlockSize::Large, "C", &[0x94, 0x05, 0xbb]);

        let mut forward = Trie::new();
        forward.insert("00000c", a.clone()).unwrap();
        forward.insert("9405bb", c.clone()).unwrap();
        forward.insert("9405bb9", b.clone()).unwrap();

        let mut backward = Trie::new();
        backward.insert("9405bb9", b).unwrap();
        backward.insert("9405bb", c).unwrap();
        backward.insert("00000c", a).unwrap();

        assert_eq!(forward, backward);
        let keys: Vec<String> = forward.entries().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["00000c", "9405bb", "9405bb9"]);
    }
}
