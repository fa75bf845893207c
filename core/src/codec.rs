//! Binary artifact format for a [`Trie`].
//!
//! Layout before compression (integers little-endian):
//!
//! ```text
//! artifact := "MVDB" version:u8 node
//! node     := tag:u8 child_mask:u16 [record] child*
//! record   := flags:u8 oui_len:u8 oui[oui_len] last_update:i64
//!             name_len:u16 name[name_len]
//! ```
//!
//! - `tag` bit 0 is set when the node carries a record; other bits are zero
//! - `child_mask` bit `d` is set when the node has a child for digit `d`;
//!   children follow in ascending digit order, which makes encoding
//!   deterministic
//!
//! The whole stream is wrapped in a single zstd frame.

use tracing::debug;

use crate::error::CodecError;
use crate::record::{format_oui, Flags, VendorRecord};
use crate::trie::{Trie, TrieNode, MAX_KEY_LEN, RADIX};

const MAGIC: &[u8; 4] = b"MVDB";

/// Current artifact format version.
pub const FORMAT_VERSION: u8 = 1;

/// Zstd frame magic (little-endian 0xFD2FB528).
const ZSTD_MAGIC: [u8; 4] = [0x28, 0xB5, 0x2F, 0xFD];

/// Level used for shipped artifacts. Encoding happens offline, so ratio
/// matters more than speed.
pub const DEFAULT_COMPRESSION_LEVEL: i32 = 19;

const TAG_VENDOR: u8 = 0x01;

/// Encode and compress `trie` at [`DEFAULT_COMPRESSION_LEVEL`].
pub fn encode(trie: &Trie) -> Result<Vec<u8>, CodecError> {
    encode_with_level(trie, DEFAULT_COMPRESSION_LEVEL)
}

pub fn encode_with_level(trie: &Trie, level: i32) -> Result<Vec<u8>, CodecError> {
    let raw = serialize(trie)?;
    let compressed = zstd::encode_all(raw.as_slice(), level).map_err(CodecError::Compress)?;
    debug!(
        entries = trie.len(),
        raw_bytes = raw.len(),
        compressed_bytes = compressed.len(),
        "Encoded vendor trie"
    );
    Ok(compressed)
}

/// Decompress and decode an artifact produced by [`encode`].
///
/// Any inconsistency fails the whole decode; nothing is partially loaded.
pub fn decode(data: &[u8]) -> Result<Trie, CodecError> {
    if !is_compressed(data) {
        return Err(CodecError::corrupt("missing zstd frame header"));
    }
    let raw = zstd::decode_all(data)
        .map_err(|e| CodecError::corrupt(format!("decompression failed: {e}")))?;
    let trie = deserialize(&raw)?;
    debug!(
        entries = trie.len(),
        raw_bytes = raw.len(),
        compressed_bytes = data.len(),
        "Decoded vendor trie"
    );
    Ok(trie)
}

#[inline]
#[must_use]
pub fn is_compressed(data: &[u8]) -> bool {
    data.len() >= 4 && data[..4] == ZSTD_MAGIC
}

/// Uncompressed encoding of `trie`.
pub fn serialize(trie: &Trie) -> Result<Vec<u8>, CodecError> {
    let mut out = Vec::with_capacity(64 + trie.len() * 32);
    out.extend_from_slice(MAGIC);
    out.push(FORMAT_VERSION);
    write_node(trie.root(), &mut out)?;
    Ok(out)
}

fn write_node(node: &TrieNode, out: &mut Vec<u8>) -> Result<(), CodecError> {
    let mut mask: u16 = 0;
    for (digit, _) in node.children() {
        mask |= 1 << digit;
    }

    out.push(if node.vendor().is_some() { TAG_VENDOR } else { 0 });
    out.extend_from_slice(&mask.to_le_bytes());
    if let Some(vendor) = node.vendor() {
        write_record(vendor, out)?;
    }
    for (_, child) in node.children() {
        write_node(child, out)?;
    }
    Ok(())
}

fn write_record(vendor: &VendorRecord, out: &mut Vec<u8>) -> Result<(), CodecError> {
    let unencodable = |reason| CodecError::Unencodable {
        oui: format_oui(vendor.oui()),
        reason,
    };
    let oui_len = u8::try_from(vendor.oui().len()).map_err(|_| unencodable("prefix too long"))?;
    let name = vendor.company_name().as_bytes();
    let name_len = u16::try_from(name.len()).map_err(|_| unencodable("company name too long"))?;

    out.push(vendor.flags().bits());
    out.push(oui_len);
    out.extend_from_slice(vendor.oui());
    out.extend_from_slice(&vendor.last_update().to_le_bytes());
    out.extend_from_slice(&name_len.to_le_bytes());
    out.extend_from_slice(name);
    Ok(())
}

/// Decode the uncompressed form produced by [`serialize`].
pub fn deserialize(raw: &[u8]) -> Result<Trie, CodecError> {
    let mut reader = Reader::new(raw);

    if reader.take(MAGIC.len())? != MAGIC {
        return Err(CodecError::corrupt("bad magic"));
    }
    let version = reader.u8()?;
    if version != FORMAT_VERSION {
        return Err(CodecError::corrupt(format!(
            "unsupported format version {version}"
        )));
    }

    let mut len = 0;
    let root = read_node(&mut reader, 0, &mut len)?;
    if root.vendor.is_some() {
        return Err(CodecError::corrupt("record on root node"));
    }
    if !reader.is_empty() {
        return Err(CodecError::corrupt(format!(
            "{} trailing bytes",
            reader.remaining()
        )));
    }
    Ok(Trie::from_root(root, len))
}

fn read_node(reader: &mut Reader<'_>, depth: usize, len: &mut usize) -> Result<TrieNode, CodecError> {
    let tag = reader.u8()?;
    if tag & !TAG_VENDOR != 0 {
        return Err(CodecError::corrupt(format!("unknown node tag {tag:#04x}")));
    }
    let mask = reader.u16()?;

    let mut node = TrieNode::default();
    if tag & TAG_VENDOR != 0 {
        node.vendor = Some(read_record(reader)?);
        *len += 1;
    }
    if depth > 0 && node.vendor.is_none() && mask == 0 {
        return Err(CodecError::corrupt(format!("empty node at depth {depth}")));
    }
    if mask != 0 && depth == MAX_KEY_LEN {
        return Err(CodecError::corrupt("node nested beyond maximum key length"));
    }

    for digit in 0..RADIX {
        if mask & (1 << digit) != 0 {
            node.children[digit] = Some(Box::new(read_node(reader, depth + 1, len)?));
        }
    }
    Ok(node)
}

fn read_record(reader: &mut Reader<'_>) -> Result<VendorRecord, CodecError> {
    let bits = reader.u8()?;
    let flags = Flags::from_bits(bits)
        .ok_or_else(|| CodecError::corrupt(format!("invalid flags {bits:#04x}")))?;
    // from_bits guarantees exactly one category bit.
    let block = flags
        .block_size()
        .ok_or_else(|| CodecError::corrupt(format!("invalid flags {bits:#04x}")))?;

    let oui_len = usize::from(reader.u8()?);
    if oui_len != block.oui_len() {
        return Err(CodecError::corrupt(format!(
            "{block} record with {oui_len} prefix octets"
        )));
    }
    let oui = reader.take(oui_len)?.to_vec();
    let last_update = reader.i64()?;
    let name_len = usize::from(reader.u16()?);
    let name = String::from_utf8(reader.take(name_len)?.to_vec())
        .map_err(|_| CodecError::corrupt("company name is not valid UTF-8"))?;

    Ok(VendorRecord::from_parts(flags, name, last_update, oui))
}

struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], CodecError> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|end| *end <= self.buf.len())
            .ok_or_else(|| {
                CodecError::corrupt(format!(
                    "truncated: need {n} bytes at offset {}, {} left",
                    self.pos,
                    self.remaining()
                ))
            })?;
        let bytes = &self.buf[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], CodecError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    fn u8(&mut self) -> Result<u8, CodecError> {
        Ok(self.take(1)?[0])
    }

    fn u16(&mut self) -> Result<u16, CodecError> {
        Ok(u16::from_le_bytes(self.array()?))
    }

    fn i64(&mut self) -> Result<i64, CodecError> {
        Ok(i64::from_le_bytes(self.array()?))
    }

    fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn is_empty(&self) -> bool {
        self.remaining() == 0
    }
}
