use std::collections::VecDeque;

/// Owning, ordered storage used both as the work queue body and as a hash bucket.
#[derive(Debug, Clone)]
pub struct Slots<T> {
    items: VecDeque<T>,
}

impl<T> Default for Slots<T> {
    fn default() -> Self {
        Self { items: VecDeque::new() }
    }
}

impl<T> Slots<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_back(&mut self, item: T) {
        self.items.push_back(item);
    }

    pub fn pop_front(&mut self) -> Option<T> {
        self.items.pop_front()
    }

    /// First element matching `pred`, left in place.
    pub fn find<F>(&self, mut pred: F) -> Option<&T>
    where
        F: FnMut(&T) -> bool,
    {
        self.items.iter().find(|item| pred(item))
    }

    pub fn find_mut<F>(&mut self, mut pred: F) -> Option<&mut T>
    where
        F: FnMut(&T) -> bool,
    {
        self.items.iter_mut().find(|item| pred(item))
    }

    /// Removes and returns the first element matching `pred`; order of the rest is kept.
    pub fn remove_first<F>(&mut self, pred: F) -> Option<T>
    where
        F: FnMut(&T) -> bool,
    {
        let pos = self.items.iter().position(pred)?;
        self.items.remove(pos)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> IntoIterator for Slots<T> {
    type Item = T;
    type IntoIter = std::collections::vec_deque::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<T> FromIterator<T> for Slots<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self { items: iter.into_iter().collect() }
    }
}
