use crate::domain::model::VoyagePayload;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastVariant {
    Default,
    Destructive,
}

/// 通知上綁定的 "Try again" 動作，帶著原本的參數
#[derive(Debug, Clone, PartialEq)]
pub enum RetryAction {
    CreateVoyage(VoyagePayload),
    DeleteVoyage(String),
}

impl RetryAction {
    pub fn label(&self) -> &'static str {
        "Try again"
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub variant: ToastVariant,
    pub retry: Option<RetryAction>,
}

impl Notification {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: ToastVariant::Default,
            retry: None,
        }
    }

    pub fn destructive(
        title: impl Into<String>,
        description: impl Into<String>,
        retry: RetryAction,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: ToastVariant::Destructive,
            retry: Some(retry),
        }
    }

    pub fn is_destructive(&self) -> bool {
        self.variant == ToastVariant::Destructive
    }
}
