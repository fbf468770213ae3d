use crate::domain::notification::{Notification, RetryAction, ToastVariant};
use crate::domain::ports::Notifier;
use std::sync::Mutex;

/// 收集通知並寫入日誌；畫面層從這裡取出待顯示的 toast
#[derive(Debug, Default)]
pub struct ToastQueue {
    pending: Mutex<Vec<Notification>>,
    last_retry: Mutex<Option<RetryAction>>,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// 取出所有尚未顯示的通知
    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut *lock(&self.pending))
    }

    pub fn len(&self) -> usize {
        lock(&self.pending).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 最新一則通知上的重試動作，drain 之後仍保留。新通知會取代舊的 toast，
    /// 沒有重試動作的通知也會一併清掉它
    pub fn last_retry(&self) -> Option<RetryAction> {
        lock(&self.last_retry).clone()
    }

    pub fn take_last_retry(&self) -> Option<RetryAction> {
        lock(&self.last_retry).take()
    }
}

impl Notifier for ToastQueue {
    fn notify(&self, notification: Notification) {
        match notification.variant {
            ToastVariant::Default => {
                tracing::info!("🔔 {}: {}", notification.title, notification.description)
            }
            ToastVariant::Destructive => {
                tracing::warn!("🚨 {}: {}", notification.title, notification.description)
            }
        }

        *lock(&self.last_retry) = notification.retry.clone();
        lock(&self.pending).push(notification);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
