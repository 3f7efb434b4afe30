use std::sync::Arc;

use parking_lot::RwLock;

/// Application-wide list of records (lifted state). Writers replace the whole
/// list; readers hold an immutable snapshot that later writes never touch.
#[derive(Debug)]
pub struct SharedCollection<T> {
    items: Arc<RwLock<Arc<[T]>>>,
}

impl<T> Clone for SharedCollection<T> {
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
        }
    }
}

impl<T> Default for SharedCollection<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T> SharedCollection<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items: Arc::new(RwLock::new(Arc::from(items))),
        }
    }

    pub fn snapshot(&self) -> Arc<[T]> {
        Arc::clone(&self.items.read())
    }

    pub fn replace(&self, items: Vec<T>) {
        *self.items.write() = Arc::from(items);
    }

    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
