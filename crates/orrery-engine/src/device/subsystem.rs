use std::fmt;
use std::mem::ManuallyDrop;
use std::ops::Deref;
use std::sync::Arc;

use parking_lot::Mutex;

/// Process-wide state initialized on first use and torn down on last release.
///
/// Declare one as a `static`; any thread may call [`Subsystem::acquire`]. The
/// value lives as long as at least one [`SubsystemHandle`] exists. Acquiring
/// again after the last handle was dropped initializes a fresh value.
pub struct Subsystem<T: 'static> {
    name: &'static str,
    init: fn() -> T,
    slot: Mutex<Slot<T>>,
}

struct Slot<T> {
    refs: usize,
    value: Option<Arc<T>>,
}

impl<T: 'static> Subsystem<T> {
    pub const fn new(name: &'static str, init: fn() -> T) -> Self {
        Self {
            name,
            init,
            slot: parking_lot::const_mutex(Slot {
                refs: 0,
                value: None,
            }),
        }
    }

    /// Returns a handle to the live value, initializing it if needed.
    pub fn acquire(&'static self) -> SubsystemHandle<T> {
        let mut slot = self.slot.lock();
        let value = match &slot.value {
            Some(value) => Arc::clone(value),
            None => {
                log::debug!("{} subsystem: init", self.name);
                let value = Arc::new((self.init)());
                slot.value = Some(Arc::clone(&value));
                value
            }
        };
        slot.refs += 1;

        SubsystemHandle {
            owner: self,
            value: ManuallyDrop::new(value),
        }
    }

    /// Number of live handles.
    pub fn ref_count(&self) -> usize {
        self.slot.lock().refs
    }

    pub fn is_live(&self) -> bool {
        self.slot.lock().value.is_some()
    }
}

/// Counted reference to a [`Subsystem`] value.
///
/// Dropping the last handle tears the value down while the subsystem lock is
/// held, so a concurrent [`Subsystem::acquire`] never overlaps the teardown.
pub struct SubsystemHandle<T: 'static> {
    owner: &'static Subsystem<T>,
    value: ManuallyDrop<Arc<T>>,
}

impl<T: 'static> Deref for SubsystemHandle<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T: 'static> Clone for SubsystemHandle<T> {
    fn clone(&self) -> Self {
        self.owner.slot.lock().refs += 1;
        Self {
            owner: self.owner,
            value: ManuallyDrop::new(Arc::clone(&self.value)),
        }
    }
}

impl<T: 'static> Drop for SubsystemHandle<T> {
    fn drop(&mut self) {
        let mut slot = self.owner.slot.lock();
        slot.refs -= 1;
        let last = slot.refs == 0;
        if last {
            slot.value = None;
        }

        // SAFETY: `value` is dropped exactly once, here, and never used again.
        // With the slot cleared this is the last `Arc` when `last` is set.
        unsafe { ManuallyDrop::drop(&mut self.value) };

        if last {
            log::debug!("{} subsystem: teardown", self.owner.name);
        }
        drop(slot);
    }
}

impl<T: 'static> fmt::Debug for SubsystemHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubsystemHandle")
            .field("subsystem", &self.owner.name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static INITS: AtomicUsize = AtomicUsize::new(0);
    static TEARDOWNS: AtomicUsize = AtomicUsize::new(0);
    static TEARDOWNS_UNLOCKED: AtomicUsize = AtomicUsize::new(0);

    struct Library;

    impl Library {
        fn start() -> Self {
            INITS.fetch_add(1, Ordering::SeqCst);
            Library
        }
    }

    impl Drop for Library {
        fn drop(&mut self) {
            TEARDOWNS.fetch_add(1, Ordering::SeqCst);
            if !LIBRARY.slot.is_locked() {
                TEARDOWNS_UNLOCKED.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    static LIBRARY: Subsystem<Library> = Subsystem::new("test", Library::start);

    // One test drives the whole lifecycle; the counters are process-global.
    #[test]
    fn init_on_first_use_teardown_on_last_release() {
        assert!(!LIBRARY.is_live());

        let a = LIBRARY.acquire();
        let b = a.clone();
        let c = std::thread::spawn(|| LIBRARY.acquire().clone())
            .join()
            .expect("acquiring thread panicked");
        assert_eq!(INITS.load(Ordering::SeqCst), 1);
        assert_eq!(LIBRARY.ref_count(), 3);

        drop(a);
        drop(c);
        assert_eq!(TEARDOWNS.load(Ordering::SeqCst), 0);
        assert!(LIBRARY.is_live());

        drop(b);
        assert_eq!(TEARDOWNS.load(Ordering::SeqCst), 1);
        assert!(!LIBRARY.is_live());
        assert_eq!(LIBRARY.ref_count(), 0);

        let again = LIBRARY.acquire();
        assert_eq!(INITS.load(Ordering::SeqCst), 2);
        drop(again);
        assert_eq!(TEARDOWNS.load(Ordering::SeqCst), 2);
        assert_eq!(TEARDOWNS_UNLOCKED.load(Ordering::SeqCst), 0);
    }
}
