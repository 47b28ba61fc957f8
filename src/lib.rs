//! Indexed binary heap algorithms over caller-owned storage.
//!
//! The heap is a plain slice of [`Entry`] values, each carrying a priority and
//! an external key. Next to it the caller keeps an [`Indexer`]: a map from key
//! to the [`Slot`] that key currently occupies. Every function in this crate
//! keeps both in sync, so a live element can be found by key in *O*(1) and
//! then re-prioritized ([`update`]) or removed ([`pop_key`]) in *O*(log(*n*)).
//!
//! Nothing here allocates or resizes. The slice passed in is the active range;
//! shrinking it after [`pop`] or [`pop_key`] is up to the caller.
//!
//! Every operation comes in two forms. The plain form orders priorities by
//! [`Ord`] with the greatest at the root. The `_by` form takes a closure
//! `dominated(a, b)` that returns `true` when `a` must sit below `b`
//! (`|a, b| a < b` is a max-heap, `|a, b| a > b` a min-heap).
//!
//! # Examples
//!
//! ```
//! use indexed_heap::{Entry, Slot};
//!
//! let mut heap: Vec<Entry<u32, usize>> = Vec::new();
//! let mut index = vec![Slot::Absent; 4];
//!
//! for (key, priority) in [5, 3, 8, 1].into_iter().enumerate() {
//!     heap.push(Entry::new(priority, key));
//!     indexed_heap::push(&mut heap, &mut index);
//! }
//! assert_eq!(indexed_heap::peek(&heap), Some(&Entry::new(8, 2)));
//!
//! // Decrease-key: key 2 drops to the bottom.
//! assert!(indexed_heap::update(&mut heap, &mut index, &2, 0));
//! assert_eq!(indexed_heap::peek(&heap).map(|e| e.key), Some(0));
//!
//! // Peek-then-pop, then shrink the buffer.
//! let root = heap[0];
//! indexed_heap::pop(&mut heap, &mut index);
//! heap.pop();
//! assert_eq!(root, Entry::new(5, 0));
//! assert_eq!(index[0], Slot::Absent);
//! assert_eq!(heap.len(), 3);
//! ```

#![allow(missing_docs)]

use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::mem;

use std::collections::{BTreeMap, HashMap};
use std::error::Error;

/// One element of the heap: a priority and the external key it is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Entry<P, K> {
    pub priority: P,
    pub key: K,
}

impl<P, K> Entry<P, K> {
    #[inline]
    pub fn new(priority: P, key: K) -> Self {
        Entry { priority, key }
    }

    /// Splits the entry back into `(priority, key)`.
    #[inline]
    pub fn into_parts(self) -> (P, K) {
        (self.priority, self.key)
    }
}

impl<P, K> From<(P, K)> for Entry<P, K> {
    #[inline]
    fn from((priority, key): (P, K)) -> Self {
        Entry { priority, key }
    }
}

/// Where a key currently lives in the heap.
///
/// A key that was never inserted, or that has been popped, is `Absent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Slot {
    #[default]
    Absent,
    At(usize),
}

impl Slot {
    #[inline]
    pub fn is_absent(self) -> bool {
        matches!(self, Slot::Absent)
    }

    /// Returns the position, or `None` if absent.
    #[inline]
    pub fn get(self) -> Option<usize> {
        match self {
            Slot::At(pos) => Some(pos),
            Slot::Absent => None,
        }
    }
}

impl From<Option<usize>> for Slot {
    #[inline]
    fn from(pos: Option<usize>) -> Self {
        pos.map_or(Slot::Absent, Slot::At)
    }
}

impl From<Slot> for Option<usize> {
    #[inline]
    fn from(slot: Slot) -> Self {
        slot.get()
    }
}

/// Maps keys to the slot they occupy.
///
/// The heap functions read slots with [`slot`](Indexer::slot) and write them
/// through [`slot_mut`](Indexer::slot_mut). Every key that is ever pushed must
/// be writable; keys that were never stored read as [`Slot::Absent`].
///
/// Implemented for dense `usize` keys (`[Slot]`, `[Slot; N]`, `Vec<Slot>`) and
/// for arbitrary keys through `HashMap` and `BTreeMap`.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use indexed_heap::{Entry, Slot};
///
/// let mut heap = vec![Entry::new(1, "low"), Entry::new(7, "high")];
/// let mut index: HashMap<&str, Slot> = HashMap::new();
///
/// indexed_heap::make(&mut heap, &mut index);
///
/// assert_eq!(heap[0].key, "high");
/// assert_eq!(index["high"], Slot::At(0));
/// assert_eq!(index["low"], Slot::At(1));
/// ```
pub trait Indexer<K> {
    /// Current slot of `key`.
    fn slot(&self, key: &K) -> Slot;

    /// Mutable cell holding the slot of `key`.
    fn slot_mut(&mut self, key: &K) -> &mut Slot;
}

impl Indexer<usize> for [Slot] {
    #[inline]
    fn slot(&self, key: &usize) -> Slot {
        self.get(*key).copied().unwrap_or_default()
    }

    /// # Panics
    ///
    /// Panics if `key` is past the end of the slice.
    #[inline]
    fn slot_mut(&mut self, key: &usize) -> &mut Slot {
        &mut self[*key]
    }
}

impl<const N: usize> Indexer<usize> for [Slot; N] {
    #[inline]
    fn slot(&self, key: &usize) -> Slot {
        self.as_slice().slot(key)
    }

    #[inline]
    fn slot_mut(&mut self, key: &usize) -> &mut Slot {
        &mut self[*key]
    }
}

impl Indexer<usize> for Vec<Slot> {
    #[inline]
    fn slot(&self, key: &usize) -> Slot {
        self.as_slice().slot(key)
    }

    #[inline]
    fn slot_mut(&mut self, key: &usize) -> &mut Slot {
        &mut self[*key]
    }
}

impl<K, S> Indexer<K> for HashMap<K, Slot, S>
where
    K: Eq + Hash + Clone,
    S: BuildHasher,
{
    #[inline]
    fn slot(&self, key: &K) -> Slot {
        self.get(key).copied().unwrap_or_default()
    }

    #[inline]
    fn slot_mut(&mut self, key: &K) -> &mut Slot {
        self.entry(key.clone()).or_default()
    }
}

impl<K> Indexer<K> for BTreeMap<K, Slot>
where
    K: Ord + Clone,
{
    #[inline]
    fn slot(&self, key: &K) -> Slot {
        self.get(key).copied().unwrap_or_default()
    }

    #[inline]
    fn slot_mut(&mut self, key: &K) -> &mut Slot {
        self.entry(key.clone()).or_default()
    }
}

impl<K, I> Indexer<K> for &mut I
where
    I: Indexer<K> + ?Sized,
{
    #[inline]
    fn slot(&self, key: &K) -> Slot {
        (**self).slot(key)
    }

    #[inline]
    fn slot_mut(&mut self, key: &K) -> &mut Slot {
        (**self).slot_mut(key)
    }
}

/// The key of a checked push is already live in the heap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DuplicateKey {
    /// Slot currently holding the key.
    pub slot: usize,
}

impl fmt::Display for DuplicateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "key is already live at slot {}", self.slot)
    }
}

impl Error for DuplicateKey {}

/// First invariant violation found by [`check_integrity_by`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrityError {
    /// `parent` is dominated by its child `child`.
    OrderViolation { parent: usize, child: usize },
    /// The key stored at `slot` resolves to `found` instead.
    IndexMismatch { slot: usize, found: Slot },
}

impl fmt::Display for IntegrityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            IntegrityError::OrderViolation { parent, child } => {
                write!(f, "slot {parent} is dominated by its child at slot {child}")
            }
            IntegrityError::IndexMismatch { slot, found } => match found {
                Slot::At(pos) => write!(f, "key at slot {slot} is indexed at slot {pos}"),
                Slot::Absent => write!(f, "key at slot {slot} is indexed as absent"),
            },
        }
    }
}

impl Error for IntegrityError {}

// Zero-based layout: the parent of `i` is `(i - 1) / 2`, its children are
// `2 * i + 1` and `2 * i + 2`.

#[inline(always)]
fn parent_of(i: usize) -> usize {
    (i - 1) / 2
}

#[inline(always)]
fn left_child_of(i: usize) -> usize {
    2 * i + 1
}

/// Swaps two entries together with their index cells.
///
/// This is the only place entries change position.
#[inline]
fn swap_slots<P, K, I>(heap: &mut [Entry<P, K>], indexer: &mut I, a: usize, b: usize)
where
    I: Indexer<K> + ?Sized,
{
    heap.swap(a, b);
    let slot_a = indexer.slot(&heap[a].key);
    let slot_b = indexer.slot(&heap[b].key);
    *indexer.slot_mut(&heap[a].key) = slot_b;
    *indexer.slot_mut(&heap[b].key) = slot_a;
}

fn sift_up<P, K, I, F>(
    heap: &mut [Entry<P, K>],
    mut pos: usize,
    indexer: &mut I,
    dominated: &mut F,
) where
    I: Indexer<K> + ?Sized,
    F: FnMut(&P, &P) -> bool,
{
    if pos >= heap.len() {
        return;
    }

    while pos > 0 {
        let parent = parent_of(pos);
        if !dominated(&heap[parent].priority, &heap[pos].priority) {
            break;
        }
        swap_slots(heap, indexer, parent, pos);
        pos = parent;
    }
}

fn sift_down<P, K, I, F>(
    heap: &mut [Entry<P, K>],
    mut pos: usize,
    indexer: &mut I,
    dominated: &mut F,
) where
    I: Indexer<K> + ?Sized,
    F: FnMut(&P, &P) -> bool,
{
    let end = heap.len();
    if pos >= end {
        return;
    }

    loop {
        // the most dominant among `pos` and its children
        let mut best = pos;
        let left = left_child_of(pos);
        if left < end && dominated(&heap[best].priority, &heap[left].priority) {
            best = left;
        }
        let right = left + 1;
        if right < end && dominated(&heap[best].priority, &heap[right].priority) {
            best = right;
        }
        if best == pos {
            return;
        }

        swap_slots(heap, indexer, pos, best);
        pos = best;
    }
}

fn push_last<P, K, I, F>(heap: &mut [Entry<P, K>], indexer: &mut I, dominated: &mut F)
where
    I: Indexer<K> + ?Sized,
    F: FnMut(&P, &P) -> bool,
{
    let Some(last) = heap.len().checked_sub(1) else {
        return;
    };
    *indexer.slot_mut(&heap[last].key) = Slot::At(last);
    sift_up(heap, last, indexer, dominated);
}

fn pop_root<P, K, I, F>(heap: &mut [Entry<P, K>], indexer: &mut I, dominated: &mut F)
where
    I: Indexer<K> + ?Sized,
    F: FnMut(&P, &P) -> bool,
{
    let Some(last) = heap.len().checked_sub(1) else {
        return;
    };
    swap_slots(heap, indexer, 0, last);
    *indexer.slot_mut(&heap[last].key) = Slot::Absent;
    // no-op when the root was the only entry
    sift_down(&mut heap[..last], 0, indexer, dominated);
}

fn heapify<P, K, I, F>(heap: &mut [Entry<P, K>], indexer: &mut I, dominated: &mut F)
where
    I: Indexer<K> + ?Sized,
    F: FnMut(&P, &P) -> bool,
{
    for (pos, entry) in heap.iter().enumerate() {
        *indexer.slot_mut(&entry.key) = Slot::At(pos);
    }

    let mut n = heap.len() / 2;
    while n > 0 {
        n -= 1;
        sift_down(heap, n, indexer, dominated);
    }
}

/// Resolves `key` to a slot inside the active range.
#[inline]
fn live_slot<P, K, I>(heap: &[Entry<P, K>], indexer: &I, key: &K) -> Option<usize>
where
    I: Indexer<K> + ?Sized,
{
    indexer.slot(key).get().filter(|&pos| pos < heap.len())
}

/// Moves the entry at `pos` toward the root while it dominates its parent.
///
/// Use this after the priority at `pos` became more dominant. Does nothing if
/// `pos` is outside `heap`.
///
/// # Time complexity
///
/// *O*(log(*n*)).
pub fn sift_up_by<P, K, I, F>(
    heap: &mut [Entry<P, K>],
    pos: usize,
    indexer: &mut I,
    mut dominated: F,
) where
    I: Indexer<K> + ?Sized,
    F: FnMut(&P, &P) -> bool,
{
    sift_up(heap, pos, indexer, &mut dominated);
}

/// Moves the entry at `pos` toward the leaves while a child dominates it,
/// always swapping with the more dominant child.
///
/// Use this after the priority at `pos` became less dominant. Does nothing if
/// `pos` is outside `heap`.
///
/// # Time complexity
///
/// *O*(log(*n*)).
pub fn sift_down_by<P, K, I, F>(
    heap: &mut [Entry<P, K>],
    pos: usize,
    indexer: &mut I,
    mut dominated: F,
) where
    I: Indexer<K> + ?Sized,
    F: FnMut(&P, &P) -> bool,
{
    sift_down(heap, pos, indexer, &mut dominated);
}

/// Inserts the last entry of `heap` into the heap formed by the rest.
///
/// The caller places the new entry at the end first (typically with
/// `Vec::push`). Does nothing on an empty slice.
///
/// The key of the new entry must not be live already. This is not checked:
/// a duplicate silently overwrites the index cell and leaves the older entry
/// unreachable by key. Use [`try_push_by`] to reject duplicates instead.
///
/// # Examples
///
/// ```
/// use indexed_heap::{Entry, Slot};
///
/// let mut heap = Vec::new();
/// let mut index = [Slot::Absent; 3];
///
/// // min-heap
/// for (key, priority) in [(0, 30), (1, 10), (2, 20)] {
///     heap.push(Entry::new(priority, key));
///     indexed_heap::push_by(&mut heap, &mut index, |a, b| a > b);
/// }
///
/// assert_eq!(heap[0], Entry::new(10, 1));
/// assert_eq!(index[1], Slot::At(0));
/// ```
///
/// # Time complexity
///
/// *O*(log(*n*)).
pub fn push_by<P, K, I, F>(heap: &mut [Entry<P, K>], indexer: &mut I, mut dominated: F)
where
    I: Indexer<K> + ?Sized,
    F: FnMut(&P, &P) -> bool,
{
    push_last(heap, indexer, &mut dominated);
}

/// [`push_by`] for a max-heap ordered by [`Ord`].
pub fn push<P, K, I>(heap: &mut [Entry<P, K>], indexer: &mut I)
where
    P: Ord,
    I: Indexer<K> + ?Sized,
{
    push_by(heap, indexer, P::lt);
}

/// Like [`push_by`], but fails if the new entry's key is already live.
///
/// A key counts as live when its slot points inside `heap[..len - 1]` at an
/// entry carrying the same key. On error nothing is modified. An empty slice
/// is accepted as a no-op.
///
/// # Examples
///
/// ```
/// use indexed_heap::{DuplicateKey, Entry, Slot};
///
/// let mut heap = vec![Entry::new(4, 0)];
/// let mut index = vec![Slot::Absent; 2];
/// indexed_heap::try_push(&mut heap, &mut index).unwrap();
///
/// heap.push(Entry::new(9, 0));
/// assert_eq!(
///     indexed_heap::try_push(&mut heap, &mut index),
///     Err(DuplicateKey { slot: 0 })
/// );
/// heap.pop();
/// assert_eq!(heap, [Entry::new(4, 0)]);
/// ```
pub fn try_push_by<P, K, I, F>(
    heap: &mut [Entry<P, K>],
    indexer: &mut I,
    mut dominated: F,
) -> Result<(), DuplicateKey>
where
    K: PartialEq,
    I: Indexer<K> + ?Sized,
    F: FnMut(&P, &P) -> bool,
{
    let Some(last) = heap.len().checked_sub(1) else {
        return Ok(());
    };
    if let Slot::At(slot) = indexer.slot(&heap[last].key) {
        if slot < last && heap[slot].key == heap[last].key {
            return Err(DuplicateKey { slot });
        }
    }

    push_last(heap, indexer, &mut dominated);
    Ok(())
}

/// [`try_push_by`] for a max-heap ordered by [`Ord`].
pub fn try_push<P, K, I>(heap: &mut [Entry<P, K>], indexer: &mut I) -> Result<(), DuplicateKey>
where
    P: Ord,
    K: PartialEq,
    I: Indexer<K> + ?Sized,
{
    try_push_by(heap, indexer, P::lt)
}

/// Moves the root to the end of `heap` and restores the heap on the rest.
///
/// Afterwards the extracted entry sits at `heap[len - 1]`, its key resolves to
/// [`Slot::Absent`], and `heap[..len - 1]` is the new heap. Read the root with
/// [`peek`] before calling if you need it. Does nothing on an empty slice.
///
/// # Examples
///
/// ```
/// use indexed_heap::{Entry, Slot};
///
/// let mut heap = vec![Entry::new(1, 0), Entry::new(3, 1), Entry::new(2, 2)];
/// let mut index = vec![Slot::Absent; 3];
/// indexed_heap::make(&mut heap, &mut index);
///
/// indexed_heap::pop(&mut heap, &mut index);
/// assert_eq!(heap.pop(), Some(Entry::new(3, 1)));
/// assert_eq!(index[1], Slot::Absent);
/// assert_eq!(indexed_heap::peek(&heap), Some(&Entry::new(2, 2)));
/// ```
///
/// # Time complexity
///
/// *O*(log(*n*)).
pub fn pop_by<P, K, I, F>(heap: &mut [Entry<P, K>], indexer: &mut I, mut dominated: F)
where
    I: Indexer<K> + ?Sized,
    F: FnMut(&P, &P) -> bool,
{
    pop_root(heap, indexer, &mut dominated);
}

/// [`pop_by`] for a max-heap ordered by [`Ord`].
pub fn pop<P, K, I>(heap: &mut [Entry<P, K>], indexer: &mut I)
where
    P: Ord,
    I: Indexer<K> + ?Sized,
{
    pop_by(heap, indexer, P::lt);
}

/// Turns an arbitrarily ordered slice into a heap.
///
/// Every key's slot is written first, so the index does not need to be
/// populated beforehand.
///
/// # Time complexity
///
/// *O*(*n*).
pub fn make_by<P, K, I, F>(heap: &mut [Entry<P, K>], indexer: &mut I, mut dominated: F)
where
    I: Indexer<K> + ?Sized,
    F: FnMut(&P, &P) -> bool,
{
    heapify(heap, indexer, &mut dominated);
}

/// [`make_by`] for a max-heap ordered by [`Ord`].
pub fn make<P, K, I>(heap: &mut [Entry<P, K>], indexer: &mut I)
where
    P: Ord,
    I: Indexer<K> + ?Sized,
{
    make_by(heap, indexer, P::lt);
}

/// Sorts a heap in place, least dominant first.
///
/// This pops the root repeatedly, so on return every key that was in the heap
/// resolves to [`Slot::Absent`].
///
/// # Examples
///
/// ```
/// use indexed_heap::{Entry, Slot};
///
/// let mut heap: Vec<_> = [1, 9, 3, 7, 2]
///     .into_iter()
///     .enumerate()
///     .map(|(key, priority)| Entry::new(priority, key))
///     .collect();
/// let mut index = vec![Slot::Absent; heap.len()];
///
/// indexed_heap::make(&mut heap, &mut index);
/// indexed_heap::sort(&mut heap, &mut index);
///
/// let sorted: Vec<_> = heap.iter().map(|e| e.priority).collect();
/// assert_eq!(sorted, [1, 2, 3, 7, 9]);
/// assert!(index.iter().all(|slot| slot.is_absent()));
/// ```
///
/// # Time complexity
///
/// *O*(*n* \* log(*n*)).
pub fn sort_by<P, K, I, F>(heap: &mut [Entry<P, K>], indexer: &mut I, mut dominated: F)
where
    I: Indexer<K> + ?Sized,
    F: FnMut(&P, &P) -> bool,
{
    let mut end = heap.len();
    while end > 0 {
        pop_root(&mut heap[..end], indexer, &mut dominated);
        end -= 1;
    }
}

/// [`sort_by`] for a max-heap ordered by [`Ord`], giving ascending priorities.
pub fn sort<P, K, I>(heap: &mut [Entry<P, K>], indexer: &mut I)
where
    P: Ord,
    I: Indexer<K> + ?Sized,
{
    sort_by(heap, indexer, P::lt);
}

/// Changes the priority of `key` and moves it to its new place.
///
/// Returns `false` without touching anything if `heap` is empty or `key` is
/// not live. If the new priority neither dominates nor is dominated by the
/// old one, the entry stays where it is.
///
/// # Examples
///
/// ```
/// use indexed_heap::{Entry, Slot};
///
/// let mut heap = vec![Entry::new(5, 0), Entry::new(3, 1), Entry::new(8, 2)];
/// let mut index = vec![Slot::Absent; 4];
/// indexed_heap::make(&mut heap, &mut index);
///
/// assert!(indexed_heap::update(&mut heap, &mut index, &2, 0));
/// assert_eq!(heap[0], Entry::new(5, 0));
///
/// assert!(!indexed_heap::update(&mut heap, &mut index, &3, 10));
/// ```
///
/// # Time complexity
///
/// *O*(log(*n*)).
pub fn update_by<P, K, I, F>(
    heap: &mut [Entry<P, K>],
    indexer: &mut I,
    key: &K,
    priority: P,
    mut dominated: F,
) -> bool
where
    I: Indexer<K> + ?Sized,
    F: FnMut(&P, &P) -> bool,
{
    let Some(pos) = live_slot(heap, &*indexer, key) else {
        return false;
    };

    let old = mem::replace(&mut heap[pos].priority, priority);
    if dominated(&heap[pos].priority, &old) {
        sift_down(heap, pos, indexer, &mut dominated);
    } else if dominated(&old, &heap[pos].priority) {
        sift_up(heap, pos, indexer, &mut dominated);
    }

    true
}

/// [`update_by`] for a max-heap ordered by [`Ord`].
pub fn update<P, K, I>(heap: &mut [Entry<P, K>], indexer: &mut I, key: &K, priority: P) -> bool
where
    P: Ord,
    I: Indexer<K> + ?Sized,
{
    update_by(heap, indexer, key, priority, P::lt)
}

/// Removes `key` from the heap.
///
/// The removed entry is moved to the end of `heap` and its key resolves to
/// [`Slot::Absent`]; `heap[..len - 1]` is the new heap. Returns `false` without
/// touching anything if `heap` is empty or `key` is not live.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use indexed_heap::{Entry, Slot};
///
/// let mut heap = vec![Entry::new(5, "a"), Entry::new(3, "b"), Entry::new(8, "c")];
/// let mut index: HashMap<&str, Slot> = HashMap::new();
/// indexed_heap::make(&mut heap, &mut index);
///
/// assert!(indexed_heap::pop_key(&mut heap, &mut index, &"b"));
/// assert_eq!(heap.pop(), Some(Entry::new(3, "b")));
/// assert_eq!(index["b"], Slot::Absent);
/// assert!(!indexed_heap::pop_key(&mut heap, &mut index, &"b"));
/// ```
///
/// # Time complexity
///
/// *O*(log(*n*)).
pub fn pop_key_by<P, K, I, F>(
    heap: &mut [Entry<P, K>],
    indexer: &mut I,
    key: &K,
    mut dominated: F,
) -> bool
where
    I: Indexer<K> + ?Sized,
    F: FnMut(&P, &P) -> bool,
{
    let Some(pos) = live_slot(heap, &*indexer, key) else {
        return false;
    };

    let last = heap.len() - 1;
    swap_slots(heap, indexer, pos, last);
    *indexer.slot_mut(&heap[last].key) = Slot::Absent;
    if pos == last {
        return true;
    }

    // Compare the entry that inherited `pos` with the one it replaced.
    let (active, removed) = heap.split_at_mut(last);
    let removed = &removed[0].priority;
    if dominated(&active[pos].priority, removed) {
        sift_down(active, pos, indexer, &mut dominated);
    } else if dominated(removed, &active[pos].priority) {
        sift_up(active, pos, indexer, &mut dominated);
    }

    true
}

/// [`pop_key_by`] for a max-heap ordered by [`Ord`].
pub fn pop_key<P, K, I>(heap: &mut [Entry<P, K>], indexer: &mut I, key: &K) -> bool
where
    P: Ord,
    I: Indexer<K> + ?Sized,
{
    pop_key_by(heap, indexer, key, P::lt)
}

/// Restores the heap after entries were appended to `heap[start..]`.
///
/// `heap[..start]` must already be a heap with a consistent index. The slots
/// of the appended keys are written here.
///
/// # Examples
///
/// ```
/// use indexed_heap::{Entry, Slot};
///
/// let mut heap = vec![Entry::new(4, 0), Entry::new(2, 1)];
/// let mut index = vec![Slot::Absent; 4];
/// indexed_heap::make(&mut heap, &mut index);
///
/// heap.extend([Entry::new(9, 2), Entry::new(1, 3)]);
/// indexed_heap::rebuild_tail(&mut heap, 2, &mut index);
///
/// assert_eq!(heap[0], Entry::new(9, 2));
/// assert_eq!(indexed_heap::check_integrity(&heap, &index), Ok(()));
/// ```
///
/// # Time complexity
///
/// The cheaper of *O*(*n*) and *O*(*k* \* log(*n*)) for *k* appended entries.
pub fn rebuild_tail_by<P, K, I, F>(
    heap: &mut [Entry<P, K>],
    start: usize,
    indexer: &mut I,
    mut dominated: F,
) where
    I: Indexer<K> + ?Sized,
    F: FnMut(&P, &P) -> bool,
{
    let len = heap.len();
    if start >= len {
        return;
    }

    let tail_len = len - start;

    #[inline(always)]
    fn log2_fast(x: usize) -> usize {
        (usize::BITS - x.leading_zeros() - 1) as usize
    }

    // A full rebuild costs about 2 * len comparisons, sifting every appended
    // entry up about tail_len * log2(start). Past 2048 entries the crossover
    // is taken as a constant factor of 11.
    let better_to_rebuild = if start < tail_len {
        true
    } else if len <= 2048 {
        2 * len < tail_len * log2_fast(start)
    } else {
        2 * len < tail_len * 11
    };

    if better_to_rebuild {
        heapify(heap, indexer, &mut dominated);
    } else {
        for pos in start..len {
            *indexer.slot_mut(&heap[pos].key) = Slot::At(pos);
            sift_up(&mut heap[..=pos], pos, indexer, &mut dominated);
        }
    }
}

/// [`rebuild_tail_by`] for a max-heap ordered by [`Ord`].
pub fn rebuild_tail<P, K, I>(heap: &mut [Entry<P, K>], start: usize, indexer: &mut I)
where
    P: Ord,
    I: Indexer<K> + ?Sized,
{
    rebuild_tail_by(heap, start, indexer, P::lt);
}

/// Keeps only the entries for which `f` returns `true`.
///
/// Returns the new heap length `n`. The rejected entries are moved to
/// `heap[n..]` in unspecified order and their keys resolve to
/// [`Slot::Absent`]. `f` is called exactly once per entry.
///
/// # Examples
///
/// ```
/// use indexed_heap::{Entry, Slot};
///
/// let mut heap: Vec<_> = (0..6).map(|key| Entry::new(key * 10, key)).collect();
/// let mut index = vec![Slot::Absent; 6];
/// indexed_heap::make(&mut heap, &mut index);
///
/// let len = indexed_heap::retain(&mut heap, &mut index, |e| e.priority % 20 == 0);
/// heap.truncate(len);
///
/// assert_eq!(len, 3);
/// assert_eq!(heap[0], Entry::new(40, 4));
/// assert_eq!(index[1], Slot::Absent);
/// ```
///
/// # Time complexity
///
/// *O*(*n*).
pub fn retain_by<P, K, I, F, R>(
    heap: &mut [Entry<P, K>],
    indexer: &mut I,
    mut dominated: F,
    mut f: R,
) -> usize
where
    I: Indexer<K> + ?Sized,
    F: FnMut(&P, &P) -> bool,
    R: FnMut(&Entry<P, K>) -> bool,
{
    let mut end = heap.len();
    let mut first_removed = end;
    let mut pos = 0;

    while pos < end {
        if f(&heap[pos]) {
            pos += 1;
            continue;
        }

        end -= 1;
        swap_slots(heap, indexer, pos, end);
        *indexer.slot_mut(&heap[end].key) = Slot::Absent;
        first_removed = first_removed.min(pos);
    }

    // heap[..first_removed] was never touched
    rebuild_tail_by(&mut heap[..end], first_removed, indexer, &mut dominated);
    end
}

/// [`retain_by`] for a max-heap ordered by [`Ord`].
pub fn retain<P, K, I, R>(heap: &mut [Entry<P, K>], indexer: &mut I, f: R) -> usize
where
    P: Ord,
    I: Indexer<K> + ?Sized,
    R: FnMut(&Entry<P, K>) -> bool,
{
    retain_by(heap, indexer, P::lt, f)
}

/// Returns the root, or `None` if `heap` is empty.
///
/// # Time complexity
///
/// *O*(1).
#[inline]
pub fn peek<P, K>(heap: &[Entry<P, K>]) -> Option<&Entry<P, K>> {
    heap.first()
}

/// Looks up the live entry filed under `key`.
///
/// A slot outside `heap`, or one holding a different key, reads as absent.
///
/// # Time complexity
///
/// *O*(1) plus the indexer lookup.
pub fn get<'a, P, K, I>(heap: &'a [Entry<P, K>], indexer: &I, key: &K) -> Option<&'a Entry<P, K>>
where
    K: PartialEq,
    I: Indexer<K> + ?Sized,
{
    let pos = live_slot(heap, indexer, key)?;
    heap.get(pos).filter(|entry| entry.key == *key)
}

/// Returns `true` if `key` is live in `heap`.
#[inline]
pub fn contains<P, K, I>(heap: &[Entry<P, K>], indexer: &I, key: &K) -> bool
where
    K: PartialEq,
    I: Indexer<K> + ?Sized,
{
    get(heap, indexer, key).is_some()
}

/// Returns `true` if no entry of `heap` dominates its parent.
pub fn is_heap_by<P, K, F>(heap: &[Entry<P, K>], mut dominated: F) -> bool
where
    F: FnMut(&P, &P) -> bool,
{
    (1..heap.len()).all(|child| {
        !dominated(&heap[parent_of(child)].priority, &heap[child].priority)
    })
}

/// [`is_heap_by`] for a max-heap ordered by [`Ord`].
pub fn is_heap<P: Ord, K>(heap: &[Entry<P, K>]) -> bool {
    is_heap_by(heap, P::lt)
}

/// Verifies heap order and index consistency over all of `heap`.
///
/// Heap order is checked first; the first violation found is returned.
///
/// # Examples
///
/// ```
/// use indexed_heap::{Entry, IntegrityError, Slot};
///
/// let heap = vec![Entry::new(1, 0), Entry::new(5, 1)];
/// let index = vec![Slot::At(0), Slot::At(1)];
///
/// assert_eq!(
///     indexed_heap::check_integrity(&heap, &index),
///     Err(IntegrityError::OrderViolation { parent: 0, child: 1 })
/// );
/// ```
pub fn check_integrity_by<P, K, I, F>(
    heap: &[Entry<P, K>],
    indexer: &I,
    mut dominated: F,
) -> Result<(), IntegrityError>
where
    I: Indexer<K> + ?Sized,
    F: FnMut(&P, &P) -> bool,
{
    for child in 1..heap.len() {
        let parent = parent_of(child);
        if dominated(&heap[parent].priority, &heap[child].priority) {
            return Err(IntegrityError::OrderViolation { parent, child });
        }
    }

    for (slot, entry) in heap.iter().enumerate() {
        let found = indexer.slot(&entry.key);
        if found != Slot::At(slot) {
            return Err(IntegrityError::IndexMismatch { slot, found });
        }
    }

    Ok(())
}

/// [`check_integrity_by`] for a max-heap ordered by [`Ord`].
pub fn check_integrity<P, K, I>(heap: &[Entry<P, K>], indexer: &I) -> Result<(), IntegrityError>
where
    P: Ord,
    I: Indexer<K> + ?Sized,
{
    check_integrity_by(heap, indexer, P::lt)
}
