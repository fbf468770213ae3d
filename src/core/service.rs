use crate::core::cache::{QueryCache, QueryKey};
use crate::domain::model::{UnitType, Vessel, Voyage, VoyagePayload};
use crate::domain::notification::{Notification, RetryAction};
use crate::domain::ports::{ApiTransport, Notifier};
use crate::utils::error::{Result, VoyageError};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

pub const CREATE_PATH: &str = "voyage/create";
pub const DELETE_PATH: &str = "voyage/delete";

const ERROR_TITLE: &str = "Uh oh! Something went wrong.";

/// 三個讀取查詢與兩個 mutation；mutation 成功後只透過 invalidate 更新快取
pub struct VoyageService<T: ApiTransport, N: Notifier> {
    transport: T,
    notifier: Arc<N>,
    cache: QueryCache,
    in_flight: Mutex<HashSet<String>>,
}

/// 離開作用域時釋放 in-flight 標記
struct InFlightGuard<'a> {
    set: &'a Mutex<HashSet<String>>,
    key: String,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        let mut set = self.set.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        set.remove(&self.key);
    }
}

impl<T: ApiTransport, N: Notifier> VoyageService<T, N> {
    pub fn new(transport: T, notifier: Arc<N>) -> Self {
        Self {
            transport,
            notifier,
            cache: QueryCache::new(),
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub fn notifier(&self) -> &Arc<N> {
        &self.notifier
    }

    pub async fn list_voyages(&self) -> Result<Vec<Voyage>> {
        self.read(QueryKey::Voyages).await
    }

    pub async fn list_vessels(&self) -> Result<Vec<Vessel>> {
        self.read(QueryKey::Vessels).await
    }

    pub async fn list_unit_types(&self) -> Result<Vec<UnitType>> {
        self.read(QueryKey::UnitTypes).await
    }

    pub async fn create_voyage(&self, payload: &VoyagePayload) -> Result<()> {
        let _guard = self.claim("create", "voyage")?;
        let body = serde_json::to_value(payload)?;

        tracing::info!(
            "📤 Creating voyage {} → {} (vessel {}, {} unit types)",
            payload.port_of_loading,
            payload.port_of_discharge,
            payload.vessel,
            payload.unit_types.len()
        );

        match self.transport.post_json(CREATE_PATH, &body).await {
            Ok(()) => {
                self.notifier.notify(Notification::info(
                    "Voyage created",
                    format!(
                        "{} → {} departing {}",
                        payload.port_of_loading,
                        payload.port_of_discharge,
                        payload.departure.format("%d %B %Y, %H:%M")
                    ),
                ));
                self.cache.invalidate(QueryKey::Voyages);
                Ok(())
            }
            Err(e) => {
                tracing::error!("❌ Voyage creation failed: {}", e);
                self.notifier.notify(Notification::destructive(
                    ERROR_TITLE,
                    format!(
                        "There was a problem creating the voyage. {}",
                        e.user_friendly_message()
                    ),
                    RetryAction::CreateVoyage(payload.clone()),
                ));
                Err(e)
            }
        }
    }

    pub async fn delete_voyage(&self, id: &str) -> Result<()> {
        let _guard = self.claim("delete", id)?;

        tracing::info!("🗑️ Deleting voyage {}", id);
        match self.transport.delete(DELETE_PATH, &[("id", id)]).await {
            Ok(()) => {
                self.notifier.notify(Notification::info(
                    "Voyage deleted",
                    format!("Voyage {} has been removed.", id),
                ));
                self.cache.invalidate(QueryKey::Voyages);
                Ok(())
            }
            Err(e) => {
                tracing::error!("❌ Deleting voyage {} failed: {}", id, e);
                self.notifier.notify(Notification::destructive(
                    ERROR_TITLE,
                    format!(
                        "There was a problem deleting voyage {}. {}",
                        id,
                        e.user_friendly_message()
                    ),
                    RetryAction::DeleteVoyage(id.to_string()),
                ));
                Err(e)
            }
        }
    }

    /// "Try again"：以相同參數重新執行原本的 mutation
    pub async fn retry(&self, action: &RetryAction) -> Result<()> {
        tracing::info!("🔁 Retrying {:?}", action);
        match action {
            RetryAction::CreateVoyage(payload) => self.create_voyage(payload).await,
            RetryAction::DeleteVoyage(id) => self.delete_voyage(id).await,
        }
    }

    /// 清除所有查詢快取，下一次讀取會重新抓取
    pub fn refresh(&self) {
        self.cache.invalidate_all();
    }

    pub fn is_in_flight(&self, operation: &str, target: &str) -> bool {
        let set = self.in_flight.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        set.contains(&in_flight_key(operation, target))
    }

    async fn read<R: serde::de::DeserializeOwned>(&self, key: QueryKey) -> Result<R> {
        self.cache
            .get_or_fetch(key, move || self.transport.fetch_data(key.path()))
            .await
    }

    fn claim(&self, operation: &str, target: &str) -> Result<InFlightGuard<'_>> {
        let key = in_flight_key(operation, target);
        let mut set = self.in_flight.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if !set.insert(key.clone()) {
            tracing::warn!("⏳ Ignoring duplicate {} for '{}'", operation, target);
            return Err(VoyageError::MutationInFlight {
                operation: operation.to_string(),
                target: target.to_string(),
            });
        }
        Ok(InFlightGuard {
            set: &self.in_flight,
            key,
        })
    }
}

fn in_flight_key(operation: &str, target: &str) -> String {
    format!("{}:{}", operation, target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::notify::ToastQueue;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// 記錄呼叫並回傳預先設定結果的 transport
    #[derive(Default)]
    struct MockTransport {
        gets: AtomicUsize,
        posts: Mutex<Vec<serde_json::Value>>,
        deletes: Mutex<Vec<String>>,
        fail_mutations: bool,
    }

    #[async_trait]
    impl ApiTransport for MockTransport {
        async fn fetch_data(&self, path: &str) -> Result<serde_json::Value> {
            self.gets.fetch_add(1, Ordering::SeqCst);
            match path {
                "vessel/getAll" => Ok(serde_json::json!([{"id": "v1", "name": "Petunia"}])),
                _ => Ok(serde_json::json!([])),
            }
        }

        async fn post_json(&self, path: &str, body: &serde_json::Value) -> Result<()> {
            self.posts.lock().unwrap().push(body.clone());
            self.outcome("POST", path)
        }

        async fn delete(&self, path: &str, query: &[(&str, &str)]) -> Result<()> {
            self.deletes.lock().unwrap().push(query[0].1.to_string());
            self.outcome("DELETE", path)
        }
    }

    impl MockTransport {
        fn failing() -> Self {
            Self {
                fail_mutations: true,
                ..Self::default()
            }
        }

        fn outcome(&self, method: &str, path: &str) -> Result<()> {
            if self.fail_mutations {
                Err(VoyageError::HttpStatusError {
                    method: method.to_string(),
                    path: path.to_string(),
                    status: 500,
                })
            } else {
                Ok(())
            }
        }
    }

    fn payload() -> VoyagePayload {
        VoyagePayload {
            departure: "2024-01-01T00:00:00Z".parse().unwrap(),
            arrival: "2024-01-02T00:00:00Z".parse().unwrap(),
            port_of_loading: "Esbjerg".to_string(),
            port_of_discharge: "Immingham".to_string(),
            vessel: "v1".to_string(),
            unit_types: vec!["u1".into(), "u2".into(), "u3".into(), "u4".into(), "u5".into()],
        }
    }

    #[tokio::test]
    async fn test_reads_are_cached_per_key() {
        let service = VoyageService::new(MockTransport::default(), Arc::new(ToastQueue::new()));

        let vessels = service.list_vessels().await.unwrap();
        service.list_vessels().await.unwrap();
        service.list_voyages().await.unwrap();

        assert_eq!(vessels[0].name, "Petunia");
        assert_eq!(service.transport.gets.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_create_success_notifies_and_invalidates() {
        let toasts = Arc::new(ToastQueue::new());
        let service = VoyageService::new(MockTransport::default(), toasts.clone());
        service.list_voyages().await.unwrap();
        assert!(service.cache().is_cached(QueryKey::Voyages));

        service.create_voyage(&payload()).await.unwrap();

        assert!(!service.cache().is_cached(QueryKey::Voyages));
        let drained = toasts.drain();
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].title, "Voyage created");
        assert!(drained[0].retry.is_none());
        assert_eq!(service.transport.posts.lock().unwrap()[0]["vessel"], "v1");
    }

    #[tokio::test]
    async fn test_create_failure_binds_same_payload_to_retry() {
        let toasts = Arc::new(ToastQueue::new());
        let service = VoyageService::new(MockTransport::failing(), toasts.clone());
        service.list_voyages().await.unwrap();

        let result = service.create_voyage(&payload()).await;

        assert!(matches!(result, Err(VoyageError::HttpStatusError { status: 500, .. })));
        // 失敗時不應清除快取
        assert!(service.cache().is_cached(QueryKey::Voyages));
        let drained = toasts.drain();
        assert!(drained[0].is_destructive());
        assert_eq!(drained[0].retry, Some(RetryAction::CreateVoyage(payload())));

        let retry = toasts.take_last_retry().unwrap();
        assert!(service.retry(&retry).await.is_err());
        assert_eq!(service.transport.posts.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_delete_failure_retry_targets_same_id() {
        let toasts = Arc::new(ToastQueue::new());
        let service = VoyageService::new(MockTransport::failing(), toasts.clone());

        assert!(service.delete_voyage("42").await.is_err());
        assert_eq!(
            toasts.last_retry(),
            Some(RetryAction::DeleteVoyage("42".to_string()))
        );
        assert!(!service.is_in_flight("delete", "42"));
    }

    #[tokio::test]
    async fn test_duplicate_claim_is_rejected_until_released() {
        let service = VoyageService::new(MockTransport::default(), Arc::new(ToastQueue::new()));

        let guard = service.claim("delete", "7").unwrap();
        assert!(service.is_in_flight("delete", "7"));
        let err = service.delete_voyage("7").await.unwrap_err();
        assert!(matches!(err, VoyageError::MutationInFlight { .. }));
        assert!(service.transport.deletes.lock().unwrap().is_empty());

        drop(guard);
        service.delete_voyage("7").await.unwrap();
        assert_eq!(*service.transport.deletes.lock().unwrap(), vec!["7"]);
    }
}
