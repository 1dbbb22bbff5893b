#![no_std]
#![cfg_attr(not(test), deny(missing_docs))]

//! Randomized balanced binary search tree (treap) collections.
//!
//! This crate provides [`Treap`] and [`TreapMap`], ordered collections backed by a
//! treap: a binary search tree whose nodes additionally carry a randomly drawn
//! priority, with lower priorities kept closer to the root (a min-heap over
//! priorities). Because the priorities approximate a random permutation of the keys,
//! the tree's shape matches a random BST in expectation and stays balanced with high
//! probability without any explicit rebalancing bookkeeping.
//!
//! # Complexity
//!
//! * [`Treap::insert`], [`Treap::remove`], [`Treap::contains`] – `O(log n)` expected
//!   time, where `n` is the number of stored keys.
//! * [`Treap::len`] – `O(1)` time (the element count is maintained incrementally).
//! * [`Treap::height`] – `O(n)` time (full traversal).
//!
//! Space consumption is `O(n)` for `n` stored keys, with a single node allocated per
//! key plus the engine's record of the priorities currently in use.
//!
//! # Examples
//!
//! ```
//! use treap::Treap;
//!
//! let mut tree = Treap::<u64>::new();
//! tree.insert(10);
//! tree.insert(5);
//! tree.insert(20);
//!
//! assert!(tree.contains(&5));
//! assert_eq!(tree.len(), 3);
//!
//! tree.remove(&10);
//! assert!(!tree.contains(&10));
//! ```

extern crate alloc;

use alloc::boxed::Box;
use alloc::collections::BTreeSet;
use core::cmp::Ordering;
use core::mem;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

/// Trait describing the integer width used for randomized node priorities.
///
/// A priority is drawn uniformly from the type's full positive range `1..=MAX`.
/// Wider types make accidental collisions between auto-generated priorities rarer,
/// at the cost of a larger per-node footprint.
pub trait Priority: Copy + Ord {
    /// Draws a fresh priority from the provided random source.
    fn sample<R: RngCore>(rng: &mut R) -> Self;
}

macro_rules! impl_priority_sampling {
    ($($ty:ty),+) => {
        $(
            impl Priority for $ty {
                #[inline(always)]
                fn sample<R: RngCore>(rng: &mut R) -> Self {
                    rng.random_range(1..=<$ty>::MAX)
                }
            }
        )+
    };
}

impl_priority_sampling!(u16, u32, u64, u128);

type Link<T, P> = Option<Box<Node<T, P>>>;

#[derive(Clone)]
struct Node<T, P>
where
    T: Ord,
    P: Priority,
{
    key: T,
    priority: P,
    left: Link<T, P>,
    right: Link<T, P>,
}

impl<T, P> Node<T, P>
where
    T: Ord,
    P: Priority,
{
    #[inline(always)]
    fn new(key: T, priority: P) -> Self {
        Self {
            key,
            priority,
            left: None,
            right: None,
        }
    }
}

type MapLink<K, V, P> = Option<Box<MapNode<K, V, P>>>;

#[derive(Clone)]
struct MapNode<K, V, P>
where
    K: Ord,
    P: Priority,
{
    key: K,
    value: V,
    priority: P,
    left: MapLink<K, V, P>,
    right: MapLink<K, V, P>,
}

impl<K, V, P> MapNode<K, V, P>
where
    K: Ord,
    P: Priority,
{
    #[inline(always)]
    fn new(key: K, value: V, priority: P) -> Self {
        Self {
            key,
            value,
            priority,
            left: None,
            right: None,
        }
    }
}

/// Randomized balanced binary search tree storing a set of distinct keys.
///
/// The structure maintains ordering via the [`Ord`] implementation for the key type
/// `T` and balances with heap rotations directed by randomized priorities: every
/// node's priority is less than or equal to the priorities of its children, so the
/// node with the lowest priority sits at the root. Priorities are represented by the
/// `P` type parameter, which defaults to `u32` but may be widened (for example, to
/// `u64`) by providing a type that implements [`Priority`]. The random source `R`
/// defaults to [`StdRng`] and can be replaced through [`Treap::with_rng`].
///
/// Auto-generated priorities are guaranteed unique within one treap instance: the
/// engine tracks every priority currently alive in the tree and resamples on
/// collision, which keeps the heap order free of ties.
///
/// # Complexity
///
/// * [`Treap::insert`], [`Treap::remove`], and [`Treap::contains`] run in expected
///   `O(log n)` time, where `n` is the number of stored keys.
/// * [`Treap::len`] and [`Treap::is_empty`] read the maintained count in `O(1)`.
/// * [`Treap::height`] walks the whole tree in `O(n)`.
///
/// # Examples
///
/// ```
/// use treap::Treap;
///
/// let mut tree = Treap::<u32>::new();
/// assert!(tree.insert(2));
/// assert!(tree.insert(1));
/// assert!(tree.insert(3));
/// assert!(!tree.insert(2));
///
/// assert!(tree.contains(&1));
/// assert_eq!(tree.len(), 3);
///
/// assert!(tree.remove(&1));
/// assert!(!tree.contains(&1));
/// assert_eq!(tree.len(), 2);
/// ```
#[derive(Clone)]
pub struct Treap<T, P = u32, R = StdRng>
where
    T: Ord,
    P: Priority,
    R: RngCore,
{
    root: Link<T, P>,
    priorities: BTreeSet<P>,
    size: usize,
    rng: R,
}

/// Randomized balanced binary search tree storing key/value pairs.
///
/// The map mirrors [`Treap`] but extends each node with a value. Keys determine the
/// ordering and priorities exactly as in [`Treap`], keeping lookups, insertions, and
/// rotations in `O(log n)` expected time. Inserting a key that already exists
/// replaces its value in place without touching the tree structure or the node's
/// priority.
///
/// # Examples
///
/// ```
/// use treap::TreapMap;
///
/// let mut map = TreapMap::<&str, u32>::new();
/// assert_eq!(map.insert("alice", 1), None);
/// assert_eq!(map.insert("alice", 2), Some(1));
/// assert_eq!(map.get(&"alice"), Some(&2));
/// assert_eq!(map.len(), 1);
/// ```
#[derive(Clone)]
pub struct TreapMap<K, V, P = u32, R = StdRng>
where
    K: Ord,
    P: Priority,
    R: RngCore,
{
    root: MapLink<K, V, P>,
    priorities: BTreeSet<P>,
    size: usize,
    rng: R,
}

impl<T, P> Treap<T, P, StdRng>
where
    T: Ord,
    P: Priority,
{
    /// Creates an empty treap seeded from the operating system's entropy source.
    #[inline]
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }
}

impl<T, P, R> Treap<T, P, R>
where
    T: Ord,
    P: Priority,
    R: RngCore,
{
    /// Creates an empty treap drawing priorities from the provided random source.
    ///
    /// Supplying a seeded generator makes the resulting tree shape reproducible.
    ///
    /// # Examples
    ///
    /// ```
    /// use rand::SeedableRng;
    /// use rand::rngs::StdRng;
    /// use treap::Treap;
    ///
    /// let mut tree = Treap::<u32>::with_rng(StdRng::seed_from_u64(42));
    /// assert!(tree.insert(7));
    /// ```
    #[inline]
    pub const fn with_rng(rng: R) -> Self {
        Self {
            root: None,
            priorities: BTreeSet::new(),
            size: 0,
            rng,
        }
    }

    /// Returns the number of keys stored in the tree.
    #[inline(always)]
    pub const fn len(&self) -> usize {
        self.size
    }

    /// Returns whether the tree contains no elements.
    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the height of the tree: the number of edges on the longest
    /// root-to-leaf path.
    ///
    /// An empty tree has height `-1` and a single-node tree has height `0`.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap::Treap;
    ///
    /// let mut tree = Treap::<u32>::new();
    /// assert_eq!(tree.height(), -1);
    /// tree.insert(7);
    /// assert_eq!(tree.height(), 0);
    /// ```
    #[inline]
    pub fn height(&self) -> isize {
        Self::height_node(self.root.as_deref())
    }

    /// Returns `true` if the provided key exists in the tree.
    #[inline]
    pub fn contains(&self, key: &T) -> bool {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            match key.cmp(&node.key) {
                Ordering::Less => current = node.left.as_deref(),
                Ordering::Greater => current = node.right.as_deref(),
                Ordering::Equal => return true,
            }
        }
        false
    }

    /// Inserts a key with a freshly generated priority.
    ///
    /// The priority is resampled until it differs from every priority currently
    /// alive in this treap, so the heap order over priorities never contains ties.
    /// Returns `true` if the key did not previously exist; inserting a duplicate
    /// key leaves the tree untouched.
    #[inline]
    pub fn insert(&mut self, key: T) -> bool {
        let priority = self.generate_unique_priority();
        self.insert_with_priority(key, priority)
    }

    /// Inserts a key with the exact caller-supplied priority.
    ///
    /// This is a privileged entry point: the priority is accepted without a
    /// uniqueness check, bypassing the guarantee [`Treap::insert`] maintains. A
    /// priority tie never violates heap order (rotations fire only on strictly
    /// lower priorities, so a tied child stays below its parent), but removing one
    /// of two nodes sharing a priority stops tracking that priority for both.
    /// Returns `true` if the key did not previously exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap::Treap;
    ///
    /// let mut tree = Treap::<u32>::new();
    /// for (key, priority) in [(5, 10), (3, 20), (8, 5), (1, 40), (4, 15)] {
    ///     assert!(tree.insert_with_priority(key, priority));
    /// }
    /// // Key 8 carries the lowest priority and therefore owns the root.
    /// assert_eq!(tree.height(), 4);
    /// ```
    #[inline]
    pub fn insert_with_priority(&mut self, key: T, priority: P) -> bool {
        let (new_root, inserted) = Self::insert_node(self.root.take(), key, priority);
        self.root = new_root;
        if inserted {
            self.priorities.insert(priority);
            self.size += 1;
        }
        inserted
    }

    /// Removes the provided key from the tree.
    ///
    /// The target node is demoted by rotations, always promoting its lower-priority
    /// child, until it becomes a leaf and can be excised. Returns `true` if the key
    /// was present and removed; removing a missing key is a no-op.
    #[inline]
    pub fn remove(&mut self, key: &T) -> bool {
        let (new_root, removed) = Self::remove_node(self.root.take(), key);
        self.root = new_root;
        match removed {
            Some(priority) => {
                self.priorities.remove(&priority);
                self.size -= 1;
                true
            }
            None => false,
        }
    }

    /// Removes all keys, releasing every node and the tracked priorities.
    #[inline]
    pub fn clear(&mut self) {
        self.root = None;
        self.priorities.clear();
        self.size = 0;
    }

    fn generate_unique_priority(&mut self) -> P {
        loop {
            let priority = P::sample(&mut self.rng);
            if !self.priorities.contains(&priority) {
                return priority;
            }
        }
    }

    #[inline]
    fn insert_node(node: Link<T, P>, key: T, priority: P) -> (Link<T, P>, bool) {
        match node {
            None => (Some(Box::new(Node::new(key, priority))), true),
            Some(mut boxed) => match key.cmp(&boxed.key) {
                Ordering::Less => {
                    let (new_left, inserted) = Self::insert_node(boxed.left.take(), key, priority);
                    boxed.left = new_left;
                    if inserted
                        && boxed
                            .left
                            .as_ref()
                            .is_some_and(|left| left.priority < boxed.priority)
                    {
                        boxed = Self::rotate_right_owned(boxed);
                    }
                    (Some(boxed), inserted)
                }
                Ordering::Greater => {
                    let (new_right, inserted) =
                        Self::insert_node(boxed.right.take(), key, priority);
                    boxed.right = new_right;
                    if inserted
                        && boxed
                            .right
                            .as_ref()
                            .is_some_and(|right| right.priority < boxed.priority)
                    {
                        boxed = Self::rotate_left_owned(boxed);
                    }
                    (Some(boxed), inserted)
                }
                Ordering::Equal => (Some(boxed), false),
            },
        }
    }

    #[inline]
    fn remove_node(node: Link<T, P>, key: &T) -> (Link<T, P>, Option<P>) {
        let mut boxed = match node {
            Some(node) => node,
            None => return (None, None),
        };

        match key.cmp(&boxed.key) {
            Ordering::Less => {
                let (new_left, removed) = Self::remove_node(boxed.left.take(), key);
                boxed.left = new_left;
                (Some(boxed), removed)
            }
            Ordering::Greater => {
                let (new_right, removed) = Self::remove_node(boxed.right.take(), key);
                boxed.right = new_right;
                (Some(boxed), removed)
            }
            Ordering::Equal => {
                if boxed.left.is_none() && boxed.right.is_none() {
                    return (None, Some(boxed.priority));
                }
                let promote_left = match (&boxed.left, &boxed.right) {
                    (Some(_), None) => true,
                    (None, _) => false,
                    (Some(left), Some(right)) => left.priority < right.priority,
                };
                if promote_left {
                    boxed = Self::rotate_right_owned(boxed);
                    let (new_right, removed) = Self::remove_node(boxed.right.take(), key);
                    boxed.right = new_right;
                    (Some(boxed), removed)
                } else {
                    boxed = Self::rotate_left_owned(boxed);
                    let (new_left, removed) = Self::remove_node(boxed.left.take(), key);
                    boxed.left = new_left;
                    (Some(boxed), removed)
                }
            }
        }
    }

    #[inline]
    fn rotate_left_owned(mut node: Box<Node<T, P>>) -> Box<Node<T, P>> {
        let mut right = node
            .right
            .take()
            .expect("rotate_left_owned requires a right child");
        node.right = right.left.take();
        right.left = Some(node);
        right
    }

    #[inline]
    fn rotate_right_owned(mut node: Box<Node<T, P>>) -> Box<Node<T, P>> {
        let mut left = node
            .left
            .take()
            .expect("rotate_right_owned requires a left child");
        node.left = left.right.take();
        left.right = Some(node);
        left
    }

    fn height_node(node: Option<&Node<T, P>>) -> isize {
        match node {
            None => -1,
            Some(node) => {
                let left = Self::height_node(node.left.as_deref());
                let right = Self::height_node(node.right.as_deref());
                1 + left.max(right)
            }
        }
    }
}

impl<K, V, P> TreapMap<K, V, P, StdRng>
where
    K: Ord,
    P: Priority,
{
    /// Creates an empty map seeded from the operating system's entropy source.
    #[inline]
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }
}

impl<K, V, P, R> TreapMap<K, V, P, R>
where
    K: Ord,
    P: Priority,
    R: RngCore,
{
    /// Creates an empty map drawing priorities from the provided random source.
    #[inline]
    pub const fn with_rng(rng: R) -> Self {
        Self {
            root: None,
            priorities: BTreeSet::new(),
            size: 0,
            rng,
        }
    }

    /// Returns the number of stored entries.
    #[inline(always)]
    pub const fn len(&self) -> usize {
        self.size
    }

    /// Returns whether the map is empty.
    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the height of the tree: the number of edges on the longest
    /// root-to-leaf path, `-1` when the map is empty.
    #[inline]
    pub fn height(&self) -> isize {
        Self::height_node(self.root.as_deref())
    }

    /// Returns a reference to the value for `key`, if present.
    #[inline]
    pub fn get(&self, key: &K) -> Option<&V> {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            match key.cmp(&node.key) {
                Ordering::Less => current = node.left.as_deref(),
                Ordering::Greater => current = node.right.as_deref(),
                Ordering::Equal => return Some(&node.value),
            }
        }
        None
    }

    /// Returns a mutable reference to the value for `key`, if present.
    #[inline]
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let mut current = self.root.as_deref_mut();
        while let Some(node) = current {
            match key.cmp(&node.key) {
                Ordering::Less => current = node.left.as_deref_mut(),
                Ordering::Greater => current = node.right.as_deref_mut(),
                Ordering::Equal => return Some(&mut node.value),
            }
        }
        None
    }

    /// Returns `true` if the key exists in the map.
    #[inline]
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Inserts a key/value pair with a freshly generated unique priority.
    ///
    /// Returns the previous value when the key existed; in that case the value is
    /// replaced in place and the tree structure is left untouched.
    #[inline]
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let priority = self.generate_unique_priority();
        self.insert_with_priority(key, value, priority)
    }

    /// Inserts a key/value pair with the exact caller-supplied priority.
    ///
    /// Like [`Treap::insert_with_priority`], this path accepts the priority without
    /// a uniqueness check. The priority only takes effect when a new node is
    /// created; replacing the value of an existing key keeps that node's original
    /// priority. Returns the previous value when the key existed.
    #[inline]
    pub fn insert_with_priority(&mut self, key: K, value: V, priority: P) -> Option<V> {
        let (new_root, replaced, inserted) =
            Self::insert_node(self.root.take(), key, value, priority);
        self.root = new_root;
        if inserted {
            self.priorities.insert(priority);
            self.size += 1;
        }
        replaced
    }

    /// Removes the key and returns the previous value, if any.
    ///
    /// The target node is rotated down toward its lower-priority child until it is
    /// a leaf, then excised.
    #[inline]
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let (new_root, removed) = Self::remove_node(self.root.take(), key);
        self.root = new_root;
        removed.map(|(value, priority)| {
            self.priorities.remove(&priority);
            self.size -= 1;
            value
        })
    }

    /// Removes all entries, releasing every node and the tracked priorities.
    #[inline]
    pub fn clear(&mut self) {
        self.root = None;
        self.priorities.clear();
        self.size = 0;
    }

    fn generate_unique_priority(&mut self) -> P {
        loop {
            let priority = P::sample(&mut self.rng);
            if !self.priorities.contains(&priority) {
                return priority;
            }
        }
    }

    fn insert_node(
        node: MapLink<K, V, P>,
        key: K,
        value: V,
        priority: P,
    ) -> (MapLink<K, V, P>, Option<V>, bool) {
        match node {
            None => (
                Some(Box::new(MapNode::new(key, value, priority))),
                None,
                true,
            ),
            Some(mut boxed) => match key.cmp(&boxed.key) {
                Ordering::Less => {
                    let (new_left, replaced, inserted) =
                        Self::insert_node(boxed.left.take(), key, value, priority);
                    boxed.left = new_left;
                    if inserted
                        && boxed
                            .left
                            .as_ref()
                            .is_some_and(|left| left.priority < boxed.priority)
                    {
                        boxed = Self::rotate_right_owned(boxed);
                    }
                    (Some(boxed), replaced, inserted)
                }
                Ordering::Greater => {
                    let (new_right, replaced, inserted) =
                        Self::insert_node(boxed.right.take(), key, value, priority);
                    boxed.right = new_right;
                    if inserted
                        && boxed
                            .right
                            .as_ref()
                            .is_some_and(|right| right.priority < boxed.priority)
                    {
                        boxed = Self::rotate_left_owned(boxed);
                    }
                    (Some(boxed), replaced, inserted)
                }
                Ordering::Equal => {
                    let mut new_value = value;
                    mem::swap(&mut boxed.value, &mut new_value);
                    (Some(boxed), Some(new_value), false)
                }
            },
        }
    }

    fn remove_node(node: MapLink<K, V, P>, key: &K) -> (MapLink<K, V, P>, Option<(V, P)>) {
        let mut boxed = match node {
            Some(node) => node,
            None => return (None, None),
        };

        match key.cmp(&boxed.key) {
            Ordering::Less => {
                let (new_left, removed) = Self::remove_node(boxed.left.take(), key);
                boxed.left = new_left;
                (Some(boxed), removed)
            }
            Ordering::Greater => {
                let (new_right, removed) = Self::remove_node(boxed.right.take(), key);
                boxed.right = new_right;
                (Some(boxed), removed)
            }
            Ordering::Equal => {
                if boxed.left.is_none() && boxed.right.is_none() {
                    let node = *boxed;
                    return (None, Some((node.value, node.priority)));
                }
                let promote_left = match (&boxed.left, &boxed.right) {
                    (Some(_), None) => true,
                    (None, _) => false,
                    (Some(left), Some(right)) => left.priority < right.priority,
                };
                if promote_left {
                    boxed = Self::rotate_right_owned(boxed);
                    let (new_right, removed) = Self::remove_node(boxed.right.take(), key);
                    boxed.right = new_right;
                    (Some(boxed), removed)
                } else {
                    boxed = Self::rotate_left_owned(boxed);
                    let (new_left, removed) = Self::remove_node(boxed.left.take(), key);
                    boxed.left = new_left;
                    (Some(boxed), removed)
                }
            }
        }
    }

    #[inline]
    fn rotate_left_owned(mut node: Box<MapNode<K, V, P>>) -> Box<MapNode<K, V, P>> {
        let mut right = node
            .right
            .take()
            .expect("rotate_left_owned requires a right child");
        node.right = right.left.take();
        right.left = Some(node);
        right
    }

    #[inline]
    fn rotate_right_owned(mut node: Box<MapNode<K, V, P>>) -> Box<MapNode<K, V, P>> {
        let mut left = node
            .left
            .take()
            .expect("rotate_right_owned requires a left child");
        node.left = left.right.take();
        left.right = Some(node);
        left
    }

    fn height_node(node: Option<&MapNode<K, V, P>>) -> isize {
        match node {
            None => -1,
            Some(node) => {
                let left = Self::height_node(node.left.as_deref());
                let right = Self::height_node(node.right.as_deref());
                1 + left.max(right)
            }
        }
    }
}

impl<T, P> Default for Treap<T, P, StdRng>
where
    T: Ord,
    P: Priority,
{
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, P> Default for TreapMap<K, V, P, StdRng>
where
    K: Ord,
    P: Priority,
{
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}
