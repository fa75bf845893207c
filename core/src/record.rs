use std::fmt;

use crate::error::NormalizeError;

/// IEEE assignment block category of a registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockSize {
    /// MA-L: 24-bit prefix.
    Large,
    /// MA-M: 28-bit prefix.
    Medium,
    /// MA-S: 36-bit prefix.
    Small,
    /// IAB: legacy 36-bit individual address block.
    Individual,
}

impl BlockSize {
    pub const ALL: [BlockSize; 4] = [
        BlockSize::Large,
        BlockSize::Medium,
        BlockSize::Small,
        BlockSize::Individual,
    ];

    /// Match an upstream block-size label exactly ("MA-L", "MA-M", "MA-S", "IAB").
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "MA-L" => Some(BlockSize::Large),
            "MA-M" => Some(BlockSize::Medium),
            "MA-S" => Some(BlockSize::Small),
            "IAB" => Some(BlockSize::Individual),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BlockSize::Large => "MA-L",
            BlockSize::Medium => "MA-M",
            BlockSize::Small => "MA-S",
            BlockSize::Individual => "IAB",
        }
    }

    /// Number of prefix octets stored for this category. The trailing
    /// nibble of medium and small prefixes occupies a whole octet.
    pub fn oui_len(self) -> usize {
        match self {
            BlockSize::Large => 3,
            BlockSize::Medium => 4,
            BlockSize::Small | BlockSize::Individual => 5,
        }
    }

    fn bit(self) -> u8 {
        match self {
            BlockSize::Large => Flags::MA_L,
            BlockSize::Medium => Flags::MA_M,
            BlockSize::Small => Flags::MA_S,
            BlockSize::Individual => Flags::IAB,
        }
    }
}

impl fmt::Display for BlockSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Bit-packed category and privacy flags.
///
/// Exactly one category bit is set; the private bit is independent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Flags(u8);

impl Flags {
    pub(crate) const MA_L: u8 = 0x01;
    pub(crate) const MA_M: u8 = 0x02;
    pub(crate) const MA_S: u8 = 0x04;
    pub(crate) const IAB: u8 = 0x08;
    pub(crate) const PRIVATE: u8 = 0x10;

    const CATEGORY_MASK: u8 = Self::MA_L | Self::MA_M | Self::MA_S | Self::IAB;

    pub(crate) fn new(block: BlockSize, private: bool) -> Self {
        let mut bits = block.bit();
        if private {
            bits |= Self::PRIVATE;
        }
        Flags(bits)
    }

    /// Accepts only bit patterns [`Flags::new`] can produce.
    pub(crate) fn from_bits(bits: u8) -> Option<Self> {
        if bits & !(Self::CATEGORY_MASK | Self::PRIVATE) != 0 {
            return None;
        }
        if (bits & Self::CATEGORY_MASK).count_ones() != 1 {
            return None;
        }
        Some(Flags(bits))
    }

    pub(crate) fn bits(self) -> u8 {
        self.0
    }

    pub(crate) fn block_size(self) -> Option<BlockSize> {
        BlockSize::ALL
            .into_iter()
            .find(|block| self.0 & Self::CATEGORY_MASK == block.bit())
    }

    pub(crate) fn is_private(self) -> bool {
        self.0 & Self::PRIVATE != 0
    }
}

/// Compact vendor entry stored at a trie terminal node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorRecord {
    flags: Flags,
    company_name: String,
    last_update: i64,
    oui: Vec<u8>,
}

impl VendorRecord {
    /// Build a record, checking that `oui` has the octet count `block` requires.
    pub fn new(
        block: BlockSize,
        private: bool,
        company_name: impl Into<String>,
        last_update: i64,
        oui: Vec<u8>,
    ) -> Result<Self, NormalizeError> {
        if oui.len() != block.oui_len() {
            return Err(NormalizeError::BlockSizeMismatch {
                oui: format_oui(&oui),
                block,
                octets: oui.len(),
                expected: block.oui_len(),
            });
        }
        Ok(Self {
            flags: Flags::new(block, private),
            company_name: company_name.into(),
            last_update,
            oui,
        })
    }

    /// Reassemble a record from already-validated wire fields.
    pub(crate) fn from_parts(flags: Flags, company_name: String, last_update: i64, oui: Vec<u8>) -> Self {
        Self {
            flags,
            company_name,
            last_update,
            oui,
        }
    }

    pub(crate) fn flags(&self) -> Flags {
        self.flags
    }

    /// `None` only if the record carries no category bit.
    pub fn block_size(&self) -> Option<BlockSize> {
        self.flags.block_size()
    }

    pub fn is_private(&self) -> bool {
        self.flags.is_private()
    }

    pub fn company_name(&self) -> &str {
        &self.company_name
    }

    /// Seconds since the Unix epoch (UTC).
    pub fn last_update(&self) -> i64 {
        self.last_update
    }

    pub fn oui(&self) -> &[u8] {
        &self.oui
    }
}

/// Render prefix octets as colon-separated lowercase hex.
///
/// The last octet is written without a leading zero (`94:05:bb:9`), which is
/// how the registry has always displayed the trailing nibble of medium and
/// small prefixes.
pub fn format_oui(oui: &[u8]) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(oui.len());
    for (i, octet) in oui.iter().enumerate() {
        if i + 1 == oui.len() {
            parts.push(format!("{octet:x}"));
        } else {
            parts.push(format!("{octet:02x}"));
        }
    }
    parts.join(":")
}
