//! Identity tags naming logical variables.

use core::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use log::trace;

/// Identity of a logical variable, used to decide which leaf a gradient is
/// taken against. Tags compare structurally, never by value of the leaf.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tag(u64);

impl Tag {
    /// The sentinel carried by every constant leaf. Never minted.
    pub const CONSTANT: Tag = Tag(0);

    /// Returns the raw integer behind the tag.
    #[inline]
    pub fn id(self) -> u64 {
        self.0
    }

    /// Returns whether this is the constant sentinel.
    #[inline]
    pub fn is_constant(self) -> bool {
        self == Self::CONSTANT
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_constant() {
            write!(f, "Tag(const)")
        } else {
            write!(f, "Tag({})", self.id())
        }
    }
}

// Starts above the sentinel so a minted tag can never collide with it.
static NEXT_TAG: AtomicU64 = AtomicU64::new(1);

/// Mints a fresh, process-wide unique tag.
///
/// The counter only moves forward and is never reset, so two calls never
/// return the same tag within one process.
pub fn new_identity_tag() -> Tag {
    let id = NEXT_TAG.fetch_add(1, Ordering::Relaxed);
    trace!("minted identity tag {id}");
    Tag(id)
}
