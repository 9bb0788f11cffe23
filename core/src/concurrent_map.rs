use parking_lot::{MappedMutexGuard, Mutex, MutexGuard};
use std::collections::BTreeMap;
use std::ops::AddAssign;

/// Integer keys routed to a bucket by `key mod bucket_count`.
pub trait BucketKey: Copy + Ord {
    fn bucket(&self, bucket_count: usize) -> usize;
}

macro_rules! impl_bucket_key {
    ($($t:ty),*) => {
        $(impl BucketKey for $t {
            #[inline]
            fn bucket(&self, bucket_count: usize) -> usize {
                ((*self as u64) % bucket_count as u64) as usize
            }
        })*
    };
}

impl_bucket_key!(i32, i64, u32, u64, usize);

/// Map split into independently locked buckets. Operations on keys in
/// different buckets never contend.
pub struct ConcurrentMap<K, V> {
    buckets: Vec<Mutex<BTreeMap<K, V>>>,
}

impl<K: BucketKey, V> ConcurrentMap<K, V> {
    pub fn new(bucket_count: usize) -> Self {
        let buckets = (0..bucket_count.max(1)).map(|_| Mutex::new(BTreeMap::new())).collect();
        Self { buckets }
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    fn bucket_of(&self, key: K) -> &Mutex<BTreeMap<K, V>> {
        &self.buckets[key.bucket(self.buckets.len())]
    }

    /// Lock the key's bucket and hand out its value, inserting the default if
    /// absent. The bucket stays locked until the guard drops.
    pub fn access(&self, key: K) -> MappedMutexGuard<'_, V>
    where
        V: Default,
    {
        let guard = self.bucket_of(key).lock();
        MutexGuard::map(guard, |bucket| bucket.entry(key).or_default())
    }

    pub fn increment(&self, key: K, delta: V)
    where
        V: Default + AddAssign,
    {
        *self.access(key) += delta;
    }

    pub fn erase(&self, key: K) {
        self.bucket_of(key).lock().remove(&key);
    }

    /// Empty every bucket, in ascending bucket order, into one ordered map.
    pub fn drain(&self) -> BTreeMap<K, V> {
        let mut merged = BTreeMap::new();
        for bucket in &self.buckets {
            let mut bucket = bucket.lock();
            merged.append(&mut bucket);
        }
        merged
    }
}
