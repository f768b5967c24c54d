use crate::hash::bucket_for;
use crate::slots::Slots;
use parking_lot::Mutex;

/// Hash-bucketed membership table behind a single lock.
///
/// The bucket count is fixed at creation and never grows; a small table just means longer buckets.
#[derive(Debug)]
pub struct ConcurrentSet<T> {
    buckets: Mutex<Vec<Slots<T>>>,
    table_size: usize,
}

impl<T: AsRef<str>> ConcurrentSet<T> {
    /// Opens a table with `table_size` buckets (at least one).
    pub fn new(table_size: usize) -> Self {
        let table_size = table_size.max(1);
        let buckets = (0..table_size).map(|_| Slots::new()).collect();
        Self { buckets: Mutex::new(buckets), table_size }
    }

    pub fn table_size(&self) -> usize {
        self.table_size
    }

    fn bucket(&self, key: &str) -> usize {
        bucket_for(key.as_bytes(), self.table_size)
    }

    /// Unconditional insert; a second `put` of the same key stores it twice.
    pub fn put(&self, item: T) {
        let b = self.bucket(item.as_ref());
        self.buckets.lock()[b].push_back(item);
    }

    /// Inserts `item` unless an equal key is already present, under one lock acquisition.
    /// Returns `true` only for the caller that performed the insertion.
    pub fn insert_if_absent(&self, item: T) -> bool {
        let b = self.bucket(item.as_ref());
        let mut buckets = self.buckets.lock();
        let bucket = &mut buckets[b];
        if bucket.find(|existing| existing.as_ref() == item.as_ref()).is_some() {
            return false;
        }
        bucket.push_back(item);
        true
    }

    pub fn contains(&self, key: &str) -> bool {
        let b = self.bucket(key);
        self.buckets.lock()[b].find(|existing| existing.as_ref() == key).is_some()
    }

    /// Copy of the first element in `key`'s bucket that satisfies `pred`.
    pub fn search<F>(&self, key: &str, pred: F) -> Option<T>
    where
        T: Clone,
        F: FnMut(&T) -> bool,
    {
        let b = self.bucket(key);
        self.buckets.lock()[b].find(pred).cloned()
    }

    pub fn remove<F>(&self, key: &str, pred: F) -> Option<T>
    where
        F: FnMut(&T) -> bool,
    {
        let b = self.bucket(key);
        self.buckets.lock()[b].remove_first(pred)
    }

    /// Visits every element, bucket by bucket, while holding the lock.
    pub fn apply<F>(&self, mut f: F)
    where
        F: FnMut(&T),
    {
        let buckets = self.buckets.lock();
        buckets.iter().flat_map(|b| b.iter()).for_each(|item| f(item));
    }

    pub fn len(&self) -> usize {
        self.buckets.lock().iter().map(Slots::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Consumes the set and returns its elements in bucket order.
    pub fn close(self) -> Vec<T> {
        self.buckets.into_inner().into_iter().flatten().collect()
    }
}
