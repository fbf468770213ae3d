use crate::core::form::{FormController, SubmitRejected};
use crate::core::schema::FieldErrors;
use crate::core::service::VoyageService;
use crate::domain::model::{UnitType, Vessel, Voyage};
use crate::domain::notification::RetryAction;
use crate::domain::ports::{ApiTransport, Notifier};
use crate::ui::form_view::render_form;
use crate::ui::format::{parse_datetime_input, DisplayFormats};
use crate::ui::table::render_voyage_table;
use crate::utils::error::{Result, VoyageError};
use std::collections::HashSet;
use std::sync::Arc;

/// 頁面事件的結果；錯誤已經以通知呈現，不會再往外拋
#[derive(Debug)]
pub enum Outcome {
    Done,
    Invalid(FieldErrors),
    Busy,
    Failed(VoyageError),
}

impl Outcome {
    pub fn is_done(&self) -> bool {
        matches!(self, Outcome::Done)
    }
}

impl From<Result<()>> for Outcome {
    fn from(result: Result<()>) -> Self {
        match result {
            Ok(()) => Outcome::Done,
            Err(VoyageError::MutationInFlight { .. }) => Outcome::Busy,
            Err(e) => Outcome::Failed(e),
        }
    }
}

/// 航次管理頁：側滑建立面板、航次表格與參考資料
pub struct VoyagePage<T: ApiTransport, N: Notifier> {
    service: VoyageService<T, N>,
    form: FormController,
    formats: DisplayFormats,
    panel_open: bool,
    expanded: HashSet<String>,
    voyages: Vec<Voyage>,
    vessels: Vec<Vessel>,
    unit_types: Vec<UnitType>,
}

impl<T: ApiTransport, N: Notifier> VoyagePage<T, N> {
    pub fn new(service: VoyageService<T, N>, formats: DisplayFormats) -> Self {
        Self {
            service,
            form: FormController::new(),
            formats,
            panel_open: false,
            expanded: HashSet::new(),
            voyages: Vec::new(),
            vessels: Vec::new(),
            unit_types: Vec::new(),
        }
    }

    /// 掛載時同時發出三個讀取查詢；各自獨立成功或失敗
    pub async fn mount(&mut self) -> Result<()> {
        let (voyages, vessels, unit_types) = tokio::join!(
            self.service.list_voyages(),
            self.service.list_vessels(),
            self.service.list_unit_types()
        );

        let mut first_error = None;
        match voyages {
            Ok(list) => self.voyages = list,
            Err(e) => record_load_error("voyages", e, &mut first_error),
        }
        match vessels {
            Ok(list) => self.vessels = list,
            Err(e) => record_load_error("vessels", e, &mut first_error),
        }
        match unit_types {
            Ok(list) => self.unit_types = list,
            Err(e) => record_load_error("unit types", e, &mut first_error),
        }

        tracing::info!(
            "📋 Page mounted: {} voyages, {} vessels, {} unit types",
            self.voyages.len(),
            self.vessels.len(),
            self.unit_types.len()
        );
        first_error.map_or(Ok(()), Err)
    }

    /// 清除所有快取並重新掛載
    pub async fn refresh(&mut self) -> Result<()> {
        self.service.refresh();
        self.mount().await
    }

    pub fn service(&self) -> &VoyageService<T, N> {
        &self.service
    }

    pub fn notifier(&self) -> &Arc<N> {
        self.service.notifier()
    }

    pub fn form(&self) -> &FormController {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormController {
        &mut self.form
    }

    pub fn voyages(&self) -> &[Voyage] {
        &self.voyages
    }

    pub fn vessels(&self) -> &[Vessel] {
        &self.vessels
    }

    pub fn unit_types(&self) -> &[UnitType] {
        &self.unit_types
    }

    pub fn is_panel_open(&self) -> bool {
        self.panel_open
    }

    pub fn open_panel(&mut self) {
        self.panel_open = true;
    }

    /// 關閉面板時一併把表單還原為預設值
    pub fn close_panel(&mut self) {
        self.panel_open = false;
        self.form.reset();
    }

    pub fn set_departure_input(&mut self, input: &str) -> Result<()> {
        let value = parse_datetime_input(input)?;
        self.form.set_departure(value);
        Ok(())
    }

    pub fn set_arrival_input(&mut self, input: &str) -> Result<()> {
        let value = parse_datetime_input(input)?;
        self.form.set_arrival(value);
        Ok(())
    }

    pub async fn submit(&mut self) -> Outcome {
        let payload = match self.form.begin_submit() {
            Ok(payload) => payload,
            Err(SubmitRejected::Invalid(errors)) => {
                tracing::debug!("Submit blocked by validation: {}", errors);
                return Outcome::Invalid(errors);
            }
            Err(SubmitRejected::InFlight) => return Outcome::Busy,
        };

        let result = self.service.create_voyage(&payload).await;
        self.after_create(result).await
    }

    pub async fn delete(&mut self, id: &str) -> Outcome {
        let result = self.service.delete_voyage(id).await;
        self.after_delete(id, result).await
    }

    /// 執行通知上的 "Try again"
    pub async fn retry(&mut self, action: RetryAction) -> Outcome {
        let result = self.service.retry(&action).await;
        match action {
            RetryAction::CreateVoyage(_) => self.after_create(result).await,
            RetryAction::DeleteVoyage(id) => self.after_delete(&id, result).await,
        }
    }

    /// 展開或收合某列的 unit types，回傳是否為展開
    pub fn toggle_expanded(&mut self, id: &str) -> bool {
        if self.expanded.remove(id) {
            false
        } else {
            self.expanded.insert(id.to_string());
            true
        }
    }

    pub fn expand_all(&mut self) {
        self.expanded = self.voyages.iter().map(|v| v.id.clone()).collect();
    }

    pub fn render_table(&self) -> String {
        render_voyage_table(&self.voyages, &self.expanded, &self.formats.table)
    }

    pub fn render_panel(&self) -> Option<String> {
        self.panel_open.then(|| {
            render_form(
                &self.form,
                &self.vessels,
                &self.unit_types,
                &self.formats.picker,
            )
        })
    }

    pub fn render(&self) -> String {
        let mut output = self.render_table();
        match self.render_panel() {
            Some(panel) => {
                output.push_str("\n\n");
                output.push_str(&panel);
            }
            None => output.push_str("\n\n[+ New voyage]"),
        }
        output
    }

    async fn after_create(&mut self, result: Result<()>) -> Outcome {
        match result {
            Ok(()) => {
                self.form.finish_submit(true);
                self.panel_open = false;
                self.reload_voyages().await;
            }
            Err(_) => self.form.finish_submit(false),
        }
        Outcome::from(result)
    }

    async fn after_delete(&mut self, id: &str, result: Result<()>) -> Outcome {
        if result.is_ok() {
            self.expanded.remove(id);
            self.reload_voyages().await;
        }
        Outcome::from(result)
    }

    // 快取已被 mutation 清掉，這裡的讀取會重新打 API
    async fn reload_voyages(&mut self) {
        match self.service.list_voyages().await {
            Ok(list) => self.voyages = list,
            Err(e) => tracing::warn!("⚠️ Could not refetch voyages: {}", e),
        }
    }
}

fn record_load_error(what: &str, error: VoyageError, first: &mut Option<VoyageError>) {
    tracing::error!("❌ Loading {} failed: {}", what, error);
    if first.is_none() {
        *first = Some(error);
    }
}
