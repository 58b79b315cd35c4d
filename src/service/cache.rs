use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

#[derive(Debug)]
struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
}

/// 带过期时间的并发缓存, 由调用方构造并注入
///
/// 每个条目在写入后 `ttl` 内有效; `ttl` 为零时等同于不缓存。
/// `generation` 在每次失效时递增, 回源前记下它, 写回时比对,
/// 避免失效之后又写入失效之前读到的数据。
pub struct TtlCache<K, V> {
    entries: DashMap<K, CacheEntry<V>>,
    ttl: Duration,
    generation: AtomicU64,
}

impl<K, V> fmt::Debug for TtlCache<K, V>
where
    K: Eq + Hash + fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TtlCache")
            .field("entries", &self.entries)
            .field("ttl", &self.ttl)
            .field("generation", &self.generation.load(Ordering::SeqCst))
            .finish()
    }
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            generation: AtomicU64::new(0),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// 命中且未过期时返回副本; 过期条目顺带删除
    pub fn get(&self, key: &K) -> Option<V> {
        let expired = match self.entries.get(key) {
            Some(entry) if entry.inserted_at.elapsed() < self.ttl => {
                return Some(entry.value.clone());
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            self.entries
                .remove_if(key, |_, entry| entry.inserted_at.elapsed() >= self.ttl);
        }
        None
    }

    pub fn insert(&self, key: K, value: V) {
        if self.ttl.is_zero() {
            return;
        }
        self.entries.insert(
            key,
            CacheEntry {
                value,
                inserted_at: Instant::now(),
            },
        );
    }

    /// 当前失效代数
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// 仅当期间没有发生失效时写入, 返回是否写入
    ///
    /// 比对与写入都在分片锁内完成; `invalidate` 先递增代数再删除,
    /// 所以并发的失效要么让这里放弃写入, 要么随后删掉这次写入。
    pub fn insert_if_current(&self, key: K, value: V, generation: u64) -> bool {
        if self.ttl.is_zero() {
            return false;
        }

        let entry = self.entries.entry(key);
        if self.generation() != generation {
            return false;
        }

        let fresh = CacheEntry {
            value,
            inserted_at: Instant::now(),
        };
        match entry {
            Entry::Occupied(mut occupied) => {
                occupied.insert(fresh);
            }
            Entry::Vacant(vacant) => {
                vacant.insert(fresh);
            }
        }
        true
    }

    pub fn invalidate(&self, key: &K) -> bool {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.entries.remove(key).is_some()
    }

    pub fn clear(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.entries.clear();
    }

    /// 清理所有过期条目, 返回删除数量
    pub fn purge_expired(&self) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| entry.inserted_at.elapsed() < self.ttl);
        before.saturating_sub(self.entries.len())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
