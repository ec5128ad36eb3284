use core::sync::atomic::{AtomicU64, Ordering};

static GLOBAL_TIME: AtomicU64 = AtomicU64::new(0);

/// A modification-time watermark.
///
/// Every call to [`ModifiedTime::modified`] draws a fresh value from a
/// process-wide monotonic counter, so stamps taken on unrelated objects can be
/// compared to decide which one changed last. A default-constructed stamp is
/// older than every stamp handed out by `modified`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct ModifiedTime(u64);

impl ModifiedTime {
    /// A stamp older than any stamp produced by [`Self::now`] or [`Self::modified`].
    pub const NEVER: Self = ModifiedTime(0);

    /// Returns a fresh stamp, strictly newer than every stamp produced before it.
    pub fn now() -> Self {
        ModifiedTime(GLOBAL_TIME.fetch_add(1, Ordering::Relaxed) + 1)
    }

    /// Updates `self` to a fresh stamp.
    pub fn modified(&mut self) {
        *self = Self::now();
    }

    /// The raw counter value of this stamp.
    pub fn value(self) -> u64 {
        self.0
    }
}
