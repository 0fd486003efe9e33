use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::sync::Arc;

/// A shareable reader/writer lock guarding a value.
///
/// Clones share the same lock and the same value. Readers run concurrently;
/// a writer excludes everyone else for as long as its guard lives.
///
/// # Examples
///
/// ```
/// use badger::common::LockHandle;
///
/// let handle = LockHandle::new(Vec::<u32>::new());
/// {
///     let mut guard = handle.write();
///     guard.push(7);
/// }
/// assert_eq!(handle.read().len(), 1);
/// ```
pub struct LockHandle<T> {
    lock: Arc<RwLock<T>>,
}

impl<T> LockHandle<T> {
    /// Creates a new lock handle owning `value`.
    pub fn new(value: T) -> Self {
        LockHandle {
            lock: Arc::new(RwLock::new(value)),
        }
    }

    /// Acquires a shared read lock.
    pub fn read(&self) -> RwLockReadGuard<'_, T> {
        self.lock.read()
    }

    /// Acquires an exclusive write lock.
    pub fn write(&self) -> RwLockWriteGuard<'_, T> {
        self.lock.write()
    }
}

impl<T> Clone for LockHandle<T> {
    fn clone(&self) -> Self {
        LockHandle {
            lock: Arc::clone(&self.lock),
        }
    }
}

impl<T: Default> Default for LockHandle<T> {
    fn default() -> Self {
        LockHandle::new(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_read_and_write() {
        let handle = LockHandle::new(0u32);
        *handle.write() += 5;
        assert_eq!(*handle.read(), 5);
    }

    #[test]
    fn test_multiple_readers() {
        let handle = LockHandle::new(String::from("shared"));
        let first = handle.read();
        let second = handle.read();
        assert_eq!(*first, *second);
    }

    #[test]
    fn test_clones_share_state() {
        let handle = LockHandle::new(Vec::new());
        let clone = handle.clone();
        clone.write().push(1);
        assert_eq!(handle.read().as_slice(), &[1]);
    }

    #[test]
    fn test_concurrent_writers() {
        let handle = LockHandle::new(0usize);
        let mut threads = vec![];
        for _ in 0..8 {
            let handle = handle.clone();
            threads.push(thread::spawn(move || {
                for _ in 0..100 {
                    *handle.write() += 1;
                }
            }));
        }
        for t in threads {
            t.join().unwrap();
        }
        assert_eq!(*handle.read(), 800);
    }
}
