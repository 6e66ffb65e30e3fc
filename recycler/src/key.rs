#[cfg(not(feature = "std"))]
use alloc::collections::{BTreeMap, BTreeSet};
#[cfg(feature = "std")]
use std::collections::{HashMap, HashSet};

#[cfg(feature = "std")]
pub(crate) type KeySet<K> = HashSet<K>;
#[cfg(not(feature = "std"))]
pub(crate) type KeySet<K> = BTreeSet<K>;

/// Bound required of item keys.
///
/// With `feature = "std"` keys are hashed; without it they are ordered.
#[cfg(feature = "std")]
pub trait ListKey: core::hash::Hash + Eq + Clone {}
#[cfg(feature = "std")]
impl<K: core::hash::Hash + Eq + Clone> ListKey for K {}

#[cfg(not(feature = "std"))]
pub trait ListKey: Ord + Clone {}
#[cfg(not(feature = "std"))]
impl<K: Ord + Clone> ListKey for K {}

#[cfg(feature = "std")]
pub(crate) type KeyIndexMap<K> = HashMap<K, usize>;
#[cfg(not(feature = "std"))]
pub(crate) type KeyIndexMap<K> = BTreeMap<K, usize>;
