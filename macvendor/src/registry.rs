use std::borrow::Cow;
use std::sync::atomic::{AtomicUsize, Ordering};

use macvendor_core::{codec, Trie};
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::error::LookupError;
use crate::lookup::longest_prefix_match;
use crate::mac::MacAddr;
use crate::vendor::Vendor;

/// Lazily decoded vendor registry.
///
/// Holds the compressed artifact and decodes it on the first lookup. Lookups
/// share a read lock; the first load and [`Registry::free`] take the write
/// lock. A failed decode is remembered, so a corrupt artifact is decoded once
/// rather than on every lookup. Construct one per application and share it
/// (e.g. in an `Arc`).
pub struct Registry {
    artifact: Cow<'static, [u8]>,
    state: RwLock<State>,
    loads: AtomicUsize,
}

enum State {
    Unloaded,
    Loaded(Trie),
    Failed(LookupError),
}

impl Registry {
    /// Registry backed by the artifact compiled into this crate.
    pub fn embedded() -> Self {
        Self::from_artifact(crate::EMBEDDED_ARTIFACT)
    }

    /// Registry backed by any artifact produced by [`codec::encode`].
    /// Nothing is decoded until the first lookup.
    pub fn from_artifact(artifact: impl Into<Cow<'static, [u8]>>) -> Self {
        Self {
            artifact: artifact.into(),
            state: RwLock::new(State::Unloaded),
            loads: AtomicUsize::new(0),
        }
    }

    /// Resolve `mac` to the vendor with the most specific registered prefix.
    ///
    /// The address is validated before the registry is touched.
    pub fn lookup(&self, mac: &str) -> Result<Vendor, LookupError> {
        let addr: MacAddr = mac.parse()?;
        self.resolve(&addr)
    }

    pub fn resolve(&self, addr: &MacAddr) -> Result<Vendor, LookupError> {
        loop {
            match &*self.state.read() {
                State::Loaded(trie) => {
                    return longest_prefix_match(trie, addr)
                        .map(Vendor::from)
                        .ok_or(LookupError::NotFound);
                }
                State::Failed(err) => return Err(err.clone()),
                State::Unloaded => {}
            }
            // A free() may slip in between load() and the next read; loop
            // until the read side sees a loaded trie.
            self.load()?;
        }
    }

    /// Decode the artifact unless another caller already has, or already
    /// failed to.
    fn load(&self) -> Result<(), LookupError> {
        let mut guard = self.state.write();
        match &*guard {
            State::Loaded(_) => return Ok(()),
            State::Failed(err) => return Err(err.clone()),
            State::Unloaded => {}
        }

        self.loads.fetch_add(1, Ordering::Relaxed);
        match codec::decode(&self.artifact) {
            Ok(trie) => {
                info!(
                    entries = trie.len(),
                    artifact_bytes = self.artifact.len(),
                    "Vendor registry loaded"
                );
                *guard = State::Loaded(trie);
                Ok(())
            }
            Err(e) => {
                let err = LookupError::from(e);
                warn!(error = %err, "Vendor registry failed to load");
                *guard = State::Failed(err.clone());
                Err(err)
            }
        }
    }

    /// Drop the decoded trie, or a remembered load failure. The next lookup
    /// decodes the artifact again.
    pub fn free(&self) {
        let mut guard = self.state.write();
        if !matches!(*guard, State::Unloaded) {
            *guard = State::Unloaded;
            debug!("Vendor registry freed");
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(*self.state.read(), State::Loaded(_))
    }

    /// How many times decoding the artifact has been attempted.
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::Relaxed)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::embedded()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("artifact_bytes", &self.artifact.len())
            .field("loaded", &self.is_loaded())
            .field("loads", &self.load_count())
            .finish()
    }
}
