use fxhash::FxBuildHasher;

// Lookups are keyed by small ids and node names, the default SipHash is needlessly slow here.
pub type Map<K, V> = hashbrown::HashMap<K, V, FxBuildHasher>;
pub type Set<T> = hashbrown::HashSet<T, FxBuildHasher>;
