use crate::slots::Slots;
use parking_lot::Mutex;

/// FIFO shared between crawler workers.
///
/// Every call takes the queue's own lock, so a single call is atomic. Two calls in a row
/// (say `search` then `put`) are not: callers that need that must hold their own lock.
#[derive(Debug)]
pub struct ConcurrentQueue<T> {
    slots: Mutex<Slots<T>>,
}

impl<T> Default for ConcurrentQueue<T> {
    fn default() -> Self {
        Self { slots: Mutex::new(Slots::new()) }
    }
}

impl<T> ConcurrentQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends at the back. Only allocation failure can stop this, and that aborts.
    pub fn put(&self, item: T) {
        self.slots.lock().push_back(item);
    }

    /// Pops the front element, or `None` when the queue is empty.
    pub fn get(&self) -> Option<T> {
        self.slots.lock().pop_front()
    }

    /// Copy of the first element matching `pred`; the queue is unchanged.
    pub fn search<F>(&self, pred: F) -> Option<T>
    where
        T: Clone,
        F: FnMut(&T) -> bool,
    {
        self.slots.lock().find(pred).cloned()
    }

    pub fn remove<F>(&self, pred: F) -> Option<T>
    where
        F: FnMut(&T) -> bool,
    {
        self.slots.lock().remove_first(pred)
    }

    /// Visits every element front to back while holding the lock.
    pub fn apply<F>(&self, mut f: F)
    where
        F: FnMut(&T),
    {
        self.slots.lock().iter().for_each(|item| f(item));
    }

    pub fn len(&self) -> usize {
        self.slots.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.lock().is_empty()
    }

    /// Consumes the queue, handing back whatever was still pending.
    pub fn close(self) -> Vec<T> {
        self.slots.into_inner().into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn get_is_fifo_and_signals_empty() {
        let q = ConcurrentQueue::new();
        assert_eq!(q.get(), None::<u32>);
        for i in 0..5 {
            q.put(i);
        }
        assert_eq!(q.len(), 5);
        assert_eq!((0..5).map(|_| q.get().unwrap()).collect::<Vec<_>>(), vec![0, 1, 2, 3, 4]);
        assert!(q.is_empty());
    }

    #[test]
    fn search_does_not_remove_but_remove_does() {
        let q = ConcurrentQueue::new();
        for word in ["alpha", "beta", "gamma"] {
            q.put(word.to_string());
        }
        assert_eq!(q.search(|w| w.starts_with('b')).as_deref(), Some("beta"));
        assert_eq!(q.len(), 3);
        assert_eq!(q.remove(|w| w == "beta").as_deref(), Some("beta"));
        assert_eq!(q.search(|w| w == "beta"), None);
        assert_eq!(q.close(), vec!["alpha".to_string(), "gamma".to_string()]);
    }

    #[test]
    fn apply_visits_in_order() {
        let q = ConcurrentQueue::new();
        (1..=4).for_each(|i| q.put(i));
        let mut seen = Vec::new();
        q.apply(|i| seen.push(*i));
        assert_eq!(seen, vec![1, 2, 3, 4]);
    }

    #[test]
    fn concurrent_puts_and_gets_lose_nothing() {
        let q = Arc::new(ConcurrentQueue::new());
        let producers: Vec<_> = (0..4)
            .map(|t| {
                let q = Arc::clone(&q);
                thread::spawn(move || (0..250).for_each(|i| q.put(t * 1000 + i)))
            })
            .collect();
        for p in producers {
            p.join().unwrap();
        }
        let consumers: Vec<_> = (0..4)
            .map(|_| {
                let q = Arc::clone(&q);
                thread::spawn(move || {
                    let mut got = Vec::new();
                    while let Some(x) = q.get() {
                        got.push(x);
                    }
                    got
                })
            })
            .collect();
        let mut all: Vec<u32> = consumers.into_iter().flat_map(|c| c.join().unwrap()).collect();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), 1000);
    }
}
