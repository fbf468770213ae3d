use crate::utils::error::Result;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;

/// 頁面上三個讀取查詢的快取鍵
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Voyages,
    Vessels,
    UnitTypes,
}

impl QueryKey {
    pub fn path(&self) -> &'static str {
        match self {
            QueryKey::Voyages => "voyage/getAll",
            QueryKey::Vessels => "vessel/getAll",
            QueryKey::UnitTypes => "unitType/getAll",
        }
    }
}

#[derive(Debug, Default)]
struct Slot {
    value: Option<serde_json::Value>,
    // 每次 invalidate 遞增，用來丟棄失效前發出的請求結果
    generation: u64,
}

/// 以鍵為單位的 read-through 快取，只有 `invalidate` 會觸發重新抓取
#[derive(Debug, Default)]
pub struct QueryCache {
    slots: Mutex<HashMap<QueryKey, Slot>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// 命中時直接反序列化快取內容，否則呼叫 `fetch` 並寫回
    pub async fn get_or_fetch<T, F, Fut>(&self, key: QueryKey, fetch: F) -> Result<T>
    where
        T: DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<serde_json::Value>>,
    {
        let generation = {
            let slots = self.lock();
            match slots.get(&key) {
                Some(Slot {
                    value: Some(value), ..
                }) => {
                    tracing::debug!("💾 Cache hit for {:?}", key);
                    return Ok(serde_json::from_value(value.clone())?);
                }
                Some(slot) => slot.generation,
                None => 0,
            }
        };

        tracing::debug!("📡 Cache miss for {:?}, fetching {}", key, key.path());
        let value = fetch().await?;
        let typed: T = serde_json::from_value(value.clone())?;

        let mut slots = self.lock();
        let slot = slots.entry(key).or_default();
        if slot.generation == generation {
            slot.value = Some(value);
        } else {
            tracing::debug!("Discarding stale {:?} result fetched before invalidation", key);
        }

        Ok(typed)
    }

    pub fn invalidate(&self, key: QueryKey) {
        let mut slots = self.lock();
        let slot = slots.entry(key).or_default();
        slot.value = None;
        slot.generation += 1;
        tracing::debug!("🗑️ Invalidated {:?} (generation {})", key, slot.generation);
    }

    pub fn invalidate_all(&self) {
        let mut slots = self.lock();
        for slot in slots.values_mut() {
            slot.value = None;
            slot.generation += 1;
        }
    }

    pub fn peek(&self, key: QueryKey) -> Option<serde_json::Value> {
        self.lock().get(&key).and_then(|slot| slot.value.clone())
    }

    pub fn is_cached(&self, key: QueryKey) -> bool {
        self.peek(key).is_some()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<QueryKey, Slot>> {
        // 鎖只在同步區段內持有，poison 時沿用內部資料
        self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
