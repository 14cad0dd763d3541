//! A registry resolving the _most specific_ registration matching a subject.
//!
//! [`Refinement`] maps keys to values, where keys describe overlapping sets of subjects. Keys are
//! ordered by a subset predicate into _generality levels_; the most specific level is searched
//! first. Within a level at most one key may match, two or more is an ambiguity. Exhausting all
//! levels moves on to an optional fallback registry.
//!
//! # Example
//! ```rust
//! # use tyser::refine::*;
//! use std::collections::BTreeSet;
//!
//! fn is_subset(a: &BTreeSet<i32>, b: &BTreeSet<i32>) -> bool {
//!     a.is_subset(b)
//! }
//! fn contains(x: &i32, k: &BTreeSet<i32>) -> bool {
//!     k.contains(x)
//! }
//!
//! let set = |xs: &[i32]| xs.iter().copied().collect::<BTreeSet<_>>();
//!
//! let mut r = Refinement::new(is_subset, contains);
//! r.set(set(&[1, 2]), "one or two");
//! r.set(set(&[2, 3]), "two or three");
//!
//! assert_eq!(r.get(&1), Ok(&"one or two"));
//! assert!(matches!(r.get(&2), Err(RefineError::Ambiguous(_))));
//! assert_eq!(r.get(&4), Err(RefineError::NotFound));
//!
//! // a more specific key resolves the ambiguity
//! r.set(set(&[2]), "two");
//! assert_eq!(r.get(&2), Ok(&"two"));
//! ```
use indexmap::IndexMap;
use log::{debug, warn};
use std::{fmt, hash::Hash, sync::OnceLock};
use thiserror::Error;

/// Lookup failure.
#[derive(Debug, PartialEq, Eq, Error)]
pub enum RefineError<'a, K> {
    /// No key matches, in this registry or its fallbacks.
    #[error("no registration matches")]
    NotFound,
    /// More than one equally specific key matches.
    #[error("{} equally specific registrations match", .0.len())]
    Ambiguous(Vec<&'a K>),
}

/// A priority resolving registry with a layered fallback.
///
/// - `is_subset(a, b)` orders keys: `a` is at least as specific as `b`.
/// - `is_element(subject, k)` decides whether key `k` applies to a lookup subject.
///
/// The generality levels are derived lazily on the first lookup after a mutation. Lookups take
/// `&self` and may run concurrently; mutation takes `&mut self`.
pub struct Refinement<E: ?Sized, K, V> {
    lookup: IndexMap<K, V>,
    fallback: Option<Box<Refinement<E, K, V>>>,
    is_subset: fn(&K, &K) -> bool,
    is_element: fn(&E, &K) -> bool,
    levels: OnceLock<Vec<Vec<usize>>>,
}

impl<E, K, V> Refinement<E, K, V>
where
    E: ?Sized,
    K: Hash + Eq + fmt::Debug,
{
    /// An empty registry.
    pub fn new(is_subset: fn(&K, &K) -> bool, is_element: fn(&E, &K) -> bool) -> Self {
        Refinement {
            lookup: IndexMap::new(),
            fallback: None,
            is_subset,
            is_element,
            levels: OnceLock::new(),
        }
    }

    /// Insert or overwrite a registration.
    pub fn set(&mut self, key: K, value: V) -> Option<V> {
        self.levels.take();
        self.lookup.insert(key, value)
    }

    /// Insert a registration into the fallback registry, creating it on first use.
    ///
    /// Fallback registrations are only consulted once no key of this registry matches, so an
    /// explicit [`set`](Refinement::set) always outranks a default regardless of specificity.
    pub fn setdefault(&mut self, key: K, value: V) -> Option<V> {
        let (is_subset, is_element) = (self.is_subset, self.is_element);
        self.fallback
            .get_or_insert_with(|| Box::new(Refinement::new(is_subset, is_element)))
            .set(key, value)
    }

    /// Resolve the most specific registration matching `subject`.
    pub fn get(&self, subject: &E) -> Result<&V, RefineError<'_, K>> {
        for level in self.levels() {
            let mut found = level
                .iter()
                .filter_map(|&i| self.lookup.get_index(i))
                .filter(|(k, _)| (self.is_element)(subject, k));

            match (found.next(), found.next()) {
                (None, _) => continue,
                (Some((_, v)), None) => return Ok(v),
                (Some((a, _)), Some((b, _))) => {
                    let mut keys = vec![a, b];
                    keys.extend(found.map(|(k, _)| k));
                    return Err(RefineError::Ambiguous(keys));
                }
            }
        }

        match &self.fallback {
            Some(fallback) => fallback.get(subject),
            None => Err(RefineError::NotFound),
        }
    }

    /// The registration stored under exactly `key`, not consulting the fallback.
    pub fn get_exact(&self, key: &K) -> Option<&V> {
        self.lookup.get(key)
    }

    /// `key` is registered in this registry, not consulting the fallback.
    pub fn contains_key(&self, key: &K) -> bool {
        self.lookup.contains_key(key)
    }

    /// Remove a registration, not consulting the fallback.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.levels.take();
        self.lookup.shift_remove(key)
    }

    /// The registered keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.lookup.keys()
    }

    /// Number of registrations, not counting the fallback.
    pub fn len(&self) -> usize {
        self.lookup.len()
    }

    /// No registrations, not counting the fallback.
    pub fn is_empty(&self) -> bool {
        self.lookup.is_empty()
    }

    /// The fallback registry.
    pub fn fallback(&self) -> Option<&Refinement<E, K, V>> {
        self.fallback.as_deref()
    }

    /// The keys grouped by generality, most specific first.
    pub fn generality_levels(&self) -> Vec<Vec<&K>> {
        self.levels()
            .iter()
            .map(|level| {
                level
                    .iter()
                    .filter_map(|&i| self.lookup.get_index(i).map(|(k, _)| k))
                    .collect()
            })
            .collect()
    }

    fn levels(&self) -> &[Vec<usize>] {
        self.levels.get_or_init(|| self.sort_levels())
    }

    /// Topological generations of the subset graph.
    ///
    /// Key `i` depends on key `j` when `j` is a subset of `i`. Keys that remain after the graph
    /// is exhausted form a cycle of mutual subsets and share one final level.
    fn sort_levels(&self) -> Vec<Vec<usize>> {
        let keys = self.lookup.keys().collect::<Vec<_>>();
        let n = keys.len();

        // dependents[j] = keys depending on j
        let mut dependents = vec![Vec::new(); n];
        let mut indegree = vec![0usize; n];
        for i in 0..n {
            for j in 0..n {
                if i != j && (self.is_subset)(keys[j], keys[i]) {
                    dependents[j].push(i);
                    indegree[i] += 1;
                }
            }
        }

        let mut levels = Vec::new();
        let mut done = vec![false; n];
        let mut level = (0..n).filter(|&i| indegree[i] == 0).collect::<Vec<_>>();

        while !level.is_empty() {
            let mut next = Vec::new();
            for &j in &level {
                done[j] = true;
                for &i in &dependents[j] {
                    indegree[i] -= 1;
                    if indegree[i] == 0 {
                        next.push(i);
                    }
                }
            }
            next.sort_unstable();
            levels.push(std::mem::replace(&mut level, next));
        }

        let cycle = (0..n).filter(|&i| !done[i]).collect::<Vec<_>>();
        if !cycle.is_empty() {
            warn!(
                "keys are mutual subsets and share one generality level: {:?}",
                cycle.iter().map(|&i| keys[i]).collect::<Vec<_>>()
            );
            levels.push(cycle);
        }

        debug!("sorted {} keys into {} generality levels", n, levels.len());

        levels
    }
}

impl<K, V> Refinement<K, K, V>
where
    K: Hash + Eq + PartialOrd + fmt::Debug,
{
    /// A registry over a partially ordered key type, where subjects are keys themselves and a
    /// key matches a subject it is greater than or equal to.
    pub fn ordered() -> Self {
        fn le<K: PartialOrd>(a: &K, b: &K) -> bool {
            a <= b
        }
        Refinement::new(le::<K>, le::<K>)
    }
}

impl<E: ?Sized, K: fmt::Debug, V> fmt::Debug for Refinement<E, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Refinement")
            .field("keys", &self.lookup.keys().collect::<Vec<_>>())
            .field("fallback", &self.fallback)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cmp::Ordering;
    use std::collections::BTreeSet;

    type Set = BTreeSet<i32>;

    fn is_subset(a: &Set, b: &Set) -> bool {
        a.is_subset(b)
    }

    fn contains(x: &i32, k: &Set) -> bool {
        k.contains(x)
    }

    fn set(xs: &[i32]) -> Set {
        xs.iter().copied().collect()
    }

    fn sets() -> Refinement<i32, Set, &'static str> {
        Refinement::new(is_subset, contains)
    }

    #[test]
    fn most_specific_wins() {
        let mut r = sets();
        r.set(set(&[1, 2, 3]), "wide");
        r.set(set(&[1]), "narrow");

        assert_eq!(r.get(&1), Ok(&"narrow"));
        assert_eq!(r.get(&2), Ok(&"wide"));
        assert_eq!(r.get(&4), Err(RefineError::NotFound));
    }

    #[test]
    fn ambiguity_names_all_keys() {
        let mut r = sets();
        r.set(set(&[1, 2]), "a");
        r.set(set(&[2, 3]), "b");

        let keys = set_keys(r.get(&2));
        assert_eq!(keys, vec![set(&[1, 2]), set(&[2, 3])]);

        r.set(set(&[2]), "c");
        assert_eq!(r.get(&2), Ok(&"c"));
        assert_eq!(r.get(&3), Ok(&"b"));
    }

    fn set_keys(r: Result<&&str, RefineError<Set>>) -> Vec<Set> {
        match r {
            Err(RefineError::Ambiguous(keys)) => keys.into_iter().cloned().collect(),
            x => panic!("expecting ambiguity, found {:?}", x),
        }
    }

    #[test]
    fn generality_levels() {
        let mut r = sets();
        r.set(set(&[1, 2, 3, 4]), "top");
        r.set(set(&[1, 2]), "left");
        r.set(set(&[3, 4]), "right");
        r.set(set(&[1]), "bottom");

        let levels = r.generality_levels();
        assert_eq!(levels.len(), 3);
        assert_eq!(levels[0], vec![&set(&[3, 4]), &set(&[1])]);
        assert_eq!(levels[1], vec![&set(&[1, 2])]);
        assert_eq!(levels[2], vec![&set(&[1, 2, 3, 4])]);
    }

    #[test]
    fn mutation_resets_levels() {
        let mut r = sets();
        r.set(set(&[1, 2]), "a");
        assert_eq!(r.get(&1), Ok(&"a"));

        r.set(set(&[1]), "b");
        assert_eq!(r.get(&1), Ok(&"b"));

        r.remove(&set(&[1]));
        assert_eq!(r.get(&1), Ok(&"a"));
        assert_eq!(r.len(), 1);
    }

    #[test]
    fn fallback_is_outranked() {
        let mut r = sets();
        r.setdefault(set(&[1]), "default");
        r.set(set(&[1, 2]), "explicit");

        // the default is more specific, but explicit registrations come first
        assert_eq!(r.get(&1), Ok(&"explicit"));
        assert_eq!(r.get(&3), Err(RefineError::NotFound));

        r.setdefault(set(&[3]), "other default");
        assert_eq!(r.get(&3), Ok(&"other default"));
        assert_eq!(r.len(), 1);
        assert_eq!(r.fallback().map(|f| f.len()), Some(2));
        assert!(!r.contains_key(&set(&[3])));
    }

    #[test]
    fn empty_registry() {
        let r = sets();
        assert!(r.is_empty());
        assert!(r.generality_levels().is_empty());
        assert_eq!(r.get(&1), Err(RefineError::NotFound));
    }

    /// A lattice of points ordered component wise.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    struct Point(i32, i32);

    impl PartialOrd for Point {
        fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
            match (self.0.cmp(&other.0), self.1.cmp(&other.1)) {
                (a, b) if a == b => Some(a),
                (Ordering::Equal, b) => Some(b),
                (a, Ordering::Equal) => Some(a),
                _ => None,
            }
        }
    }

    #[test]
    fn ordered_lattice() {
        let mut r = Refinement::ordered();
        r.set(Point(1, 1), "far");
        r.set(Point(0, 1), "up");
        r.set(Point(1, 0), "right");

        assert_eq!(r.get(&Point(0, 0)), Err(RefineError::Ambiguous(vec![&Point(0, 1), &Point(1, 0)])));
        assert_eq!(r.get(&Point(0, 1)), Ok(&"up"));
        assert_eq!(r.get(&Point(1, 1)), Ok(&"far"));
        assert_eq!(r.get(&Point(2, 2)), Err(RefineError::NotFound));

        r.set(Point(0, 0), "origin");
        assert_eq!(r.get(&Point(0, 0)), Ok(&"origin"));
    }

    #[test]
    fn cycles_share_a_level() {
        fn always(_: &i32, _: &i32) -> bool {
            true
        }
        let mut r: Refinement<i32, i32, &str> = Refinement::new(always, always);
        r.set(1, "a");
        r.set(2, "b");

        assert_eq!(r.generality_levels(), vec![vec![&1, &2]]);
        assert!(matches!(r.get(&0), Err(RefineError::Ambiguous(_))));
    }
}
