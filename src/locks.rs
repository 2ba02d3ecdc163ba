use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

/// Per-product mutual exclusion for the optimize and apply paths.
///
/// Acquisition is non-blocking: a second caller for the same product fails
/// immediately instead of queuing. The guard releases the slot on drop, so
/// every exit path out of an optimize or apply call frees the product.
#[derive(Clone, Default)]
pub struct ProductLocks {
    held: Arc<DashMap<i64, ()>>,
}

impl ProductLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Try to claim the product. Returns `None` if another request holds it.
    pub fn try_acquire(&self, product_id: i64) -> Option<ProductLockGuard> {
        match self.held.entry(product_id) {
            Entry::Occupied(_) => None,
            Entry::Vacant(slot) => {
                slot.insert(());
                Some(ProductLockGuard {
                    held: Arc::clone(&self.held),
                    product_id,
                })
            }
        }
    }

    pub fn is_held(&self, product_id: i64) -> bool {
        self.held.contains_key(&product_id)
    }
}

pub struct ProductLockGuard {
    held: Arc<DashMap<i64, ()>>,
    product_id: i64,
}

impl Drop for ProductLockGuard {
    fn drop(&mut self) {
        self.held.remove(&self.product_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_fails_while_held() {
        let locks = ProductLocks::new();
        let guard = locks.try_acquire(42);
        assert!(guard.is_some());
        assert!(locks.try_acquire(42).is_none());
        assert!(locks.is_held(42));
    }

    #[test]
    fn drop_releases_the_product() {
        let locks = ProductLocks::new();
        drop(locks.try_acquire(42));
        assert!(!locks.is_held(42));
        assert!(locks.try_acquire(42).is_some());
    }

    #[test]
    fn different_products_do_not_contend() {
        let locks = ProductLocks::new();
        let _a = locks.try_acquire(1).unwrap();
        assert!(locks.try_acquire(2).is_some());
    }
}
