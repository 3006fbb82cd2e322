//! Insertion-ordered hash containers.
//!
//! Chunk state lives in sets and maps whose iteration order leaks straight
//! into the output: dependency declarations render in the order edges were
//! linked, `exports_by_name` drives export naming, and the content hash walks
//! these collections. `HashMap` iteration order would make filenames and
//! rendered code differ between runs, so everything order-sensitive uses the
//! indexed variants with the same fast hasher the rest of the workspace uses.

use std::hash::BuildHasherDefault;

use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxHasher;

pub type FxIndexMap<K, V> = IndexMap<K, V, BuildHasherDefault<FxHasher>>;
pub type FxIndexSet<T> = IndexSet<T, BuildHasherDefault<FxHasher>>;
