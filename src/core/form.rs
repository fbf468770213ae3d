use crate::core::schema::{validate_draft, FieldErrors};
use crate::domain::model::{VoyageDraft, VoyagePayload};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Idle,
    Editing,
    Submitting,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitRejected {
    Invalid(FieldErrors),
    InFlight,
}

/// 綁定暫存航次與欄位錯誤；每次修改後重新驗證
#[derive(Debug, Clone)]
pub struct FormController {
    draft: VoyageDraft,
    errors: FieldErrors,
    state: FormState,
}

impl Default for FormController {
    fn default() -> Self {
        Self::new()
    }
}

impl FormController {
    pub fn new() -> Self {
        Self {
            draft: VoyageDraft::default(),
            errors: FieldErrors::default(),
            state: FormState::Idle,
        }
    }

    pub fn draft(&self) -> &VoyageDraft {
        &self.draft
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn is_submitting(&self) -> bool {
        self.state == FormState::Submitting
    }

    pub fn set_departure(&mut self, value: Option<DateTime<Utc>>) {
        self.edit(|draft| draft.departure = value);
    }

    pub fn set_arrival(&mut self, value: Option<DateTime<Utc>>) {
        self.edit(|draft| draft.arrival = value);
    }

    pub fn set_port_of_loading(&mut self, value: impl Into<String>) {
        let value = value.into();
        self.edit(|draft| draft.port_of_loading = value);
    }

    pub fn set_port_of_discharge(&mut self, value: impl Into<String>) {
        let value = value.into();
        self.edit(|draft| draft.port_of_discharge = value);
    }

    pub fn select_vessel(&mut self, vessel_id: impl Into<String>) {
        let vessel_id = vessel_id.into();
        self.edit(|draft| draft.vessel = vessel_id);
    }

    /// 勾選時附加到尾端，取消勾選時移除；已存在的 id 不會重複加入
    pub fn set_unit_type(&mut self, unit_type_id: &str, checked: bool) {
        self.edit(|draft| {
            let position = draft.unit_types.iter().position(|id| id == unit_type_id);
            match (checked, position) {
                (true, None) => draft.unit_types.push(unit_type_id.to_string()),
                (false, Some(index)) => {
                    draft.unit_types.remove(index);
                }
                _ => {}
            }
        });
    }

    /// 切換勾選狀態，回傳切換後是否為勾選
    pub fn toggle_unit_type(&mut self, unit_type_id: &str) -> bool {
        let checked = !self.is_unit_type_selected(unit_type_id);
        self.set_unit_type(unit_type_id, checked);
        checked
    }

    pub fn is_unit_type_selected(&self, unit_type_id: &str) -> bool {
        self.draft.unit_types.iter().any(|id| id == unit_type_id)
    }

    /// 提交前最後一次驗證；通過後進入 Submitting
    pub fn begin_submit(&mut self) -> Result<VoyagePayload, SubmitRejected> {
        if self.state == FormState::Submitting {
            return Err(SubmitRejected::InFlight);
        }

        match validate_draft(&self.draft) {
            Ok(payload) => {
                self.errors = FieldErrors::default();
                self.state = FormState::Submitting;
                Ok(payload)
            }
            Err(errors) => {
                self.errors = errors.clone();
                self.state = FormState::Editing;
                Err(SubmitRejected::Invalid(errors))
            }
        }
    }

    /// 成功則重設為預設值，失敗則保留暫存資料回到 Editing
    pub fn finish_submit(&mut self, succeeded: bool) {
        if succeeded {
            self.reset();
        } else if self.state == FormState::Submitting {
            self.state = FormState::Editing;
        }
    }

    pub fn reset(&mut self) {
        self.draft = VoyageDraft::default();
        self.errors = FieldErrors::default();
        self.state = FormState::Idle;
    }

    fn edit<F: FnOnce(&mut VoyageDraft)>(&mut self, apply: F) {
        apply(&mut self.draft);
        self.errors = validate_draft(&self.draft).err().unwrap_or_default();
        // 送出中仍可修改欄位，但狀態維持 Submitting 直到請求結束
        if self.state != FormState::Submitting {
            self.state = FormState::Editing;
        }
        tracing::trace!(errors = self.errors.len(), "draft updated");
    }
}
