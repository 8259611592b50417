//! Decision alternatives and their stable identifiers.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ALTERNATIVE_ID: AtomicU64 = AtomicU64::new(1);

/// Stable identifier of an [`Alternative`].
///
/// Allocated once per alternative and never derived from the display name,
/// so renaming never invalidates map entries keyed by the id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AlternativeId(u64);

impl AlternativeId {
    fn next() -> Self {
        Self(NEXT_ALTERNATIVE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw id value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for AlternativeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "alt#{}", self.0)
    }
}

/// A decision alternative: an id plus a mutable display name.
///
/// Equality and hashing use the id only.
///
/// # Example
///
/// ```
/// use smaa_core::Alternative;
///
/// let mut a = Alternative::new("Volvo");
/// let id = a.id();
/// a.set_name("Saab");
/// assert_eq!(a.id(), id);
/// assert_ne!(a, Alternative::new("Saab"));
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Alternative {
    id: AlternativeId,
    name: String,
}

impl Alternative {
    /// Creates an alternative with a freshly allocated id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: AlternativeId::next(),
            name: name.into(),
        }
    }

    pub fn id(&self) -> AlternativeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }
}

impl PartialEq for Alternative {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Alternative {}

impl std::hash::Hash for Alternative {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Alternative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
