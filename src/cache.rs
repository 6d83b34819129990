//! Keyed entity cache that discards responses from superseded requests.
//!
//! Every request a store sends is given a [`Ticket`] from a monotonically increasing counter.
//! When the response is applied, the ticket is compared with the version of what is already
//! cached: an entry written (or removed) by a newer request is never overwritten by an older
//! one, and a list refresh never rolls back a newer refresh.

use std::collections::{BTreeSet, HashMap};

use indexmap::IndexMap;

use crate::models::Keyed;

/// Identifies one request in the order it was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

#[derive(Debug, Clone)]
struct Versioned<T> {
    version: u64,
    value: T,
}

/// Entities by id, in server order.
///
/// Removals leave a tombstone so that a slower, older response cannot bring the entry back.
/// Tombstones are dropped once no request issued before them is outstanding, so every
/// ticket handed out by [`KeyedCache::issue`] should be given back through
/// [`KeyedCache::release`].
#[derive(Debug, Clone)]
pub struct KeyedCache<T> {
    entries: IndexMap<String, Versioned<T>>,
    removed: HashMap<String, u64>,
    outstanding: BTreeSet<u64>,
    scope: Option<String>,
    issued: u64,
    refreshed: u64,
}

impl<T> Default for KeyedCache<T> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
            removed: HashMap::new(),
            outstanding: BTreeSet::new(),
            scope: None,
            issued: 0,
            refreshed: 0,
        }
    }
}

impl<T: Keyed + Clone> KeyedCache<T> {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Hands out the ticket for a request about to be sent.
    pub fn issue(&mut self) -> Ticket {
        self.issued += 1;
        self.outstanding.insert(self.issued);
        Ticket(self.issued)
    }

    /// Marks the request of `ticket` as settled and drops the tombstones no outstanding
    /// request can contradict anymore.
    pub fn release(&mut self, ticket: Ticket) {
        self.outstanding.remove(&ticket.0);

        let oldest = self.outstanding.first().copied();
        self.removed.retain(|_, version| oldest.is_some_and(|oldest| oldest < *version));
    }

    /// Replaces the whole content with a listing.
    ///
    /// Entries and removals made by requests issued after `ticket` are kept. Returns `false`
    /// when a newer listing was already applied, in which case nothing changes.
    pub fn replace_all(&mut self, ticket: Ticket, items: Vec<T>) -> bool {
        if ticket.0 <= self.refreshed {
            return false;
        }
        self.refreshed = ticket.0;

        let mut entries = self.listed(ticket, items, true);
        for (key, entry) in &self.entries {
            if entry.version > ticket.0 && !entries.contains_key(key) {
                entries.insert(key.clone(), entry.clone());
            }
        }

        self.removed.retain(|_, version| *version > ticket.0);
        self.entries = entries;

        true
    }

    /// Replaces the whole content with the listing of `scope`, such as the interview a list
    /// of candidates belongs to.
    ///
    /// Unlike [`KeyedCache::replace_all`], nothing outside the listing survives. Newer writes
    /// and removals of listed ids are kept only when the scope did not change. Returns
    /// `false` when a newer listing was already applied.
    pub fn replace_scoped(&mut self, ticket: Ticket, scope: &str, items: Vec<T>) -> bool {
        if ticket.0 <= self.refreshed {
            return false;
        }
        self.refreshed = ticket.0;

        let same_scope = self.scope.as_deref() == Some(scope);
        self.entries = self.listed(ticket, items, same_scope);

        if same_scope {
            self.removed.retain(|_, version| *version > ticket.0);
        } else {
            self.removed.clear();
            self.scope = Some(scope.to_owned());
        }

        true
    }

    fn listed(
        &self,
        ticket: Ticket,
        items: Vec<T>,
        keep_newer: bool,
    ) -> IndexMap<String, Versioned<T>> {
        let mut entries = IndexMap::with_capacity(items.len());
        for item in items {
            let key = item.key().to_owned();
            if keep_newer && self.removed_after(&key, ticket) {
                continue;
            }

            let entry = match self.entries.get(&key) {
                Some(newer) if keep_newer && newer.version > ticket.0 => newer.clone(),
                _ => Versioned {
                    version: ticket.0,
                    value: item,
                },
            };
            entries.insert(key, entry);
        }
        entries
    }

    /// The scope of the last applied [`KeyedCache::replace_scoped`] listing.
    #[must_use]
    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    /// Inserts or replaces one entity, keeping its position when it is already cached.
    ///
    /// Returns `false` when the entry was written or removed by a newer request.
    pub fn upsert(&mut self, ticket: Ticket, item: T) -> bool {
        let key = item.key().to_owned();
        if self.removed_after(&key, ticket) {
            return false;
        }

        if let Some(entry) = self.entries.get_mut(&key) {
            if entry.version > ticket.0 {
                return false;
            }
            entry.version = ticket.0;
            entry.value = item;
            return true;
        }

        self.entries.insert(
            key,
            Versioned {
                version: ticket.0,
                value: item,
            },
        );
        true
    }

    /// Replaces the cached entity with id `key`, in place. Nothing is added when it isn't
    /// cached.
    ///
    /// Returns `false` when it isn't cached or was written by a newer request.
    pub fn replace(&mut self, ticket: Ticket, key: &str, item: T) -> bool {
        match self.entries.get_mut(key) {
            Some(entry) if entry.version <= ticket.0 => {
                entry.version = ticket.0;
                entry.value = item;
                true
            }
            _ => false,
        }
    }

    /// Removes one entity, keeping the order of the others. Returns whether it was cached.
    pub fn remove(&mut self, ticket: Ticket, key: &str) -> bool {
        let version = self.removed.entry(key.to_owned()).or_insert(ticket.0);
        *version = (*version).max(ticket.0);

        self.entries.shift_remove(key).is_some()
    }

    /// Modifies the entity with id `key` in place. Returns `false` when it isn't cached or was
    /// written by a newer request.
    pub fn patch(&mut self, ticket: Ticket, key: &str, f: impl FnOnce(&mut T)) -> bool {
        match self.entries.get_mut(key) {
            Some(entry) if entry.version <= ticket.0 => {
                f(&mut entry.value);
                entry.version = ticket.0;
                true
            }
            _ => false,
        }
    }

    /// Modifies every entity matching `predicate`. Returns how many were changed.
    pub fn patch_where(
        &mut self,
        ticket: Ticket,
        predicate: impl Fn(&T) -> bool,
        f: impl Fn(&mut T),
    ) -> usize {
        let mut patched = 0;
        for entry in self.entries.values_mut() {
            if entry.version <= ticket.0 && predicate(&entry.value) {
                f(&mut entry.value);
                entry.version = ticket.0;
                patched += 1;
            }
        }
        patched
    }

    /// The entity with id `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&T> {
        self.entries.get(key).map(|entry| &entry.value)
    }

    /// Whether an entity with id `key` is cached.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Iterates over the entities in order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.values().map(|entry| &entry.value)
    }

    /// Clones the entities in order.
    #[must_use]
    pub fn values(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }

    /// Number of cached entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn removed_after(&self, key: &str, ticket: Ticket) -> bool {
        self.removed.get(key).is_some_and(|version| *version > ticket.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Item {
        id: &'static str,
        value: u32,
    }

    impl Keyed for Item {
        fn key(&self) -> &str {
            self.id
        }
    }

    const fn item(id: &'static str, value: u32) -> Item {
        Item { id, value }
    }

    fn ids(cache: &KeyedCache<Item>) -> Vec<&'static str> {
        cache.iter().map(|item| item.id).collect()
    }

    #[test]
    fn replace_all_keeps_server_order() {
        let mut cache: KeyedCache<Item> = KeyedCache::new();
        let ticket = cache.issue();

        assert!(cache.replace_all(ticket, vec![item("c", 1), item("a", 2), item("b", 3)]));
        assert_eq!(ids(&cache), ["c", "a", "b"]);
    }

    #[test]
    fn upsert_replaces_in_place_and_never_duplicates() {
        let mut cache: KeyedCache<Item> = KeyedCache::new();
        let listing = cache.issue();
        cache.replace_all(listing, vec![item("a", 1), item("b", 2), item("c", 3)]);

        let update = cache.issue();
        assert!(cache.upsert(update, item("b", 20)));
        let create = cache.issue();
        assert!(cache.upsert(create, item("d", 4)));
        let again = cache.issue();
        assert!(cache.upsert(again, item("d", 5)));

        assert_eq!(ids(&cache), ["a", "b", "c", "d"]);
        assert_eq!(cache.get("b"), Some(&item("b", 20)));
        assert_eq!(cache.get("d"), Some(&item("d", 5)));
    }

    #[test]
    fn stale_update_is_discarded() {
        let mut cache: KeyedCache<Item> = KeyedCache::new();
        let first = cache.issue();
        let second = cache.issue();

        assert!(cache.upsert(second, item("a", 2)));
        assert!(!cache.upsert(first, item("a", 1)));
        assert_eq!(cache.get("a"), Some(&item("a", 2)));
    }

    #[test]
    fn stale_listing_is_discarded() {
        let mut cache: KeyedCache<Item> = KeyedCache::new();
        let old = cache.issue();
        let new = cache.issue();

        assert!(cache.replace_all(new, vec![item("a", 2)]));
        assert!(!cache.replace_all(old, vec![item("a", 1), item("z", 9)]));
        assert_eq!(cache.values(), vec![item("a", 2)]);
    }

    #[test]
    fn listing_keeps_newer_writes_and_removals() {
        let mut cache: KeyedCache<Item> = KeyedCache::new();
        let seed = cache.issue();
        cache.replace_all(seed, vec![item("a", 1), item("b", 1)]);

        let listing = cache.issue();
        let update = cache.issue();
        let create = cache.issue();
        let delete = cache.issue();

        cache.upsert(update, item("a", 2));
        cache.upsert(create, item("n", 1));
        cache.remove(delete, "b");
        assert!(cache.replace_all(listing, vec![item("a", 1), item("b", 1)]));

        assert_eq!(ids(&cache), ["a", "n"]);
        assert_eq!(cache.get("a"), Some(&item("a", 2)));
    }

    #[test]
    fn remove_keeps_others_untouched() {
        let mut cache: KeyedCache<Item> = KeyedCache::new();
        let listing = cache.issue();
        cache.replace_all(listing, vec![item("a", 1), item("b", 2), item("c", 3)]);

        let delete = cache.issue();
        assert!(cache.remove(delete, "b"));
        assert!(!cache.remove(delete, "missing"));

        assert_eq!(cache.values(), vec![item("a", 1), item("c", 3)]);
    }

    #[test]
    fn late_update_does_not_resurrect_removed_entry() {
        let mut cache: KeyedCache<Item> = KeyedCache::new();
        let update = cache.issue();
        let delete = cache.issue();

        cache.remove(delete, "a");
        assert!(!cache.upsert(update, item("a", 1)));
        assert!(!cache.contains("a"));
    }

    #[test]
    fn patch_where_touches_matching_entries() {
        let mut cache: KeyedCache<Item> = KeyedCache::new();
        let listing = cache.issue();
        cache.replace_all(listing, vec![item("a", 1), item("b", 2), item("c", 1)]);

        let patch = cache.issue();
        let patched = cache.patch_where(patch, |item| item.value == 1, |item| item.value = 10);

        assert_eq!(patched, 2);
        assert_eq!(cache.values(), vec![item("a", 10), item("b", 2), item("c", 10)]);
        assert!(cache.patch(patch, "b", |item| item.value = 3));
        assert!(!cache.patch(patch, "missing", |item| item.value = 3));
    }

    #[test]
    fn replace_leaves_uncached_ids_alone() {
        let mut cache: KeyedCache<Item> = KeyedCache::new();
        let listing = cache.issue();
        cache.replace_all(listing, vec![item("a", 1), item("b", 2)]);

        let update = cache.issue();
        assert!(!cache.replace(update, "x", item("x", 9)));
        assert!(cache.replace(update, "b", item("b", 20)));

        assert_eq!(cache.values(), vec![item("a", 1), item("b", 20)]);
    }

    #[test]
    fn scoped_listing_drops_entries_of_previous_scope() {
        let mut cache: KeyedCache<Item> = KeyedCache::new();
        let first = cache.issue();
        cache.replace_scoped(first, "A", vec![item("a1", 1)]);

        let other = cache.issue();
        let patch = cache.issue();
        assert!(cache.patch(patch, "a1", |item| item.value = 2));
        assert!(cache.replace_scoped(other, "B", vec![item("b1", 1)]));

        assert_eq!(ids(&cache), ["b1"]);
        assert_eq!(cache.scope(), Some("B"));
    }

    #[test]
    fn scoped_listing_keeps_newer_writes_of_listed_ids_only() {
        let mut cache: KeyedCache<Item> = KeyedCache::new();
        let seed = cache.issue();
        cache.replace_scoped(seed, "A", vec![item("a1", 1), item("a2", 1)]);

        let listing = cache.issue();
        let patch = cache.issue();
        let create = cache.issue();
        cache.patch(patch, "a1", |item| item.value = 5);
        cache.upsert(create, item("n", 1));
        assert!(cache.replace_scoped(listing, "A", vec![item("a1", 1)]));

        assert_eq!(cache.values(), vec![item("a1", 5)]);
    }

    #[test]
    fn tombstones_are_dropped_once_older_requests_settle() {
        let mut cache: KeyedCache<Item> = KeyedCache::new();
        let listing = cache.issue();
        cache.replace_all(listing, vec![item("a", 1), item("b", 2)]);
        cache.release(listing);

        let slow = cache.issue();
        let delete = cache.issue();
        cache.remove(delete, "a");
        cache.release(delete);
        assert_eq!(cache.removed.len(), 1);

        assert!(!cache.upsert(slow, item("a", 3)));
        cache.release(slow);
        assert!(cache.removed.is_empty());
    }

    #[test]
    fn deletes_without_refetch_do_not_accumulate_tombstones() {
        let mut cache: KeyedCache<Item> = KeyedCache::new();

        for index in 0..100 {
            let delete = cache.issue();
            cache.remove(delete, &format!("gone-{index}"));
            cache.release(delete);
        }

        assert!(cache.removed.is_empty());
    }
}
