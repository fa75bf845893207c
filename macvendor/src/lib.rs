//! Offline MAC address → vendor lookup.
//!
//! The IEEE registry is compiled into the crate as a compressed prefix trie
//! and decoded on first use.
//!
//! ```no_run
//! use macvendor::Registry;
//!
//! let registry = Registry::embedded();
//! let vendor = registry.lookup("54:bf:64:51:c5:44").unwrap();
//! assert_eq!(vendor.company_name, "Dell Inc.");
//! ```

use std::sync::LazyLock;

pub mod error;
pub mod lookup;
pub mod mac;
pub mod registry;
pub mod vendor;

pub use error::LookupError;
pub use mac::MacAddr;
pub use registry::Registry;
pub use vendor::Vendor;

/// Compressed trie artifact generated by `build.rs` from `data/vendors.json`.
pub static EMBEDDED_ARTIFACT: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/embedb.bin.zst"));

/// Process-wide registry behind [`lookup`] and [`free_registry`].
static GLOBAL: LazyLock<Registry> = LazyLock::new(Registry::embedded);

/// Look up `mac` in the process-wide embedded registry.
///
/// Prefer an explicit [`Registry`] where the caller can own one.
pub fn lookup(mac: &str) -> Result<Vendor, LookupError> {
    GLOBAL.lookup(mac)
}

/// Release the memory held by the process-wide registry.
pub fn free_registry() {
    GLOBAL.free();
}
