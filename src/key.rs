#[cfg(not(feature = "std"))]
use alloc::collections::BTreeMap;
#[cfg(feature = "std")]
use std::collections::HashMap;

#[cfg(feature = "std")]
pub(crate) type IdMap<K, V> = HashMap<K, V>;
#[cfg(not(feature = "std"))]
pub(crate) type IdMap<K, V> = BTreeMap<K, V>;

/// Bound on record ids: hashable with `std`, ordered without it.
#[cfg(feature = "std")]
#[doc(hidden)]
pub trait ItemId: core::hash::Hash + Eq {}
#[cfg(feature = "std")]
impl<K: core::hash::Hash + Eq> ItemId for K {}

#[cfg(not(feature = "std"))]
#[doc(hidden)]
pub trait ItemId: Ord {}
#[cfg(not(feature = "std"))]
impl<K: Ord> ItemId for K {}
