use crate::domain::model::{VoyageDraft, VoyagePayload, MIN_UNIT_TYPES};
use std::collections::BTreeMap;
use std::fmt;

pub const MSG_DEPARTURE_REQUIRED: &str = "Please pick a departure date.";
pub const MSG_ARRIVAL_REQUIRED: &str = "Please pick an arrival date.";
pub const MSG_PORT_OF_LOADING_REQUIRED: &str = "Port of loading is required.";
pub const MSG_PORT_OF_DISCHARGE_REQUIRED: &str = "Port of discharge is required.";
pub const MSG_VESSEL_REQUIRED: &str = "Please select a vessel.";
pub const MSG_UNIT_TYPES_MIN: &str = "You have to select at least five Unit Types.";
pub const MSG_DEPARTURE_BEFORE_ARRIVAL: &str = "Departure must be before arrival date.";

/// 表單欄位，順序即畫面上的排列順序
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Departure,
    Arrival,
    PortOfLoading,
    PortOfDischarge,
    Vessel,
    UnitTypes,
}

impl Field {
    pub fn path(&self) -> &'static str {
        match self {
            Field::Departure => "departure",
            Field::Arrival => "arrival",
            Field::PortOfLoading => "portOfLoading",
            Field::PortOfDischarge => "portOfDischarge",
            Field::Vessel => "vessel",
            Field::UnitTypes => "unitTypes",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldErrors {
    errors: BTreeMap<Field, Vec<String>>,
}

impl FieldErrors {
    pub fn add(&mut self, field: Field, message: impl Into<String>) {
        self.errors.entry(field).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn get(&self, field: Field) -> &[String] {
        self.errors.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// 第一則訊息，表單在欄位下方只顯示這一則
    pub fn first(&self, field: Field) -> Option<&str> {
        self.get(field).first().map(String::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.errors.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.errors.values().map(Vec::len).sum()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .flat_map(|(field, messages)| messages.iter().map(move |m| format!("{}: {}", field, m)))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

/// 驗證暫存航次；成功時回傳可直接送出的 payload
pub fn validate_draft(draft: &VoyageDraft) -> Result<VoyagePayload, FieldErrors> {
    let mut errors = FieldErrors::default();

    if draft.departure.is_none() {
        errors.add(Field::Departure, MSG_DEPARTURE_REQUIRED);
    }
    if draft.arrival.is_none() {
        errors.add(Field::Arrival, MSG_ARRIVAL_REQUIRED);
    }
    if draft.port_of_loading.trim().is_empty() {
        errors.add(Field::PortOfLoading, MSG_PORT_OF_LOADING_REQUIRED);
    }
    if draft.port_of_discharge.trim().is_empty() {
        errors.add(Field::PortOfDischarge, MSG_PORT_OF_DISCHARGE_REQUIRED);
    }
    // 佔位值 "-" 只有一個字元
    if draft.vessel.chars().count() < 2 {
        errors.add(Field::Vessel, MSG_VESSEL_REQUIRED);
    }
    if draft.unit_types.len() < MIN_UNIT_TYPES {
        errors.add(Field::UnitTypes, MSG_UNIT_TYPES_MIN);
    }

    // 跨欄位規則只在兩個日期都存在時檢查
    if let (Some(departure), Some(arrival)) = (draft.departure, draft.arrival) {
        if departure >= arrival {
            errors.add(Field::Arrival, MSG_DEPARTURE_BEFORE_ARRIVAL);
        }
    }

    match (draft.departure, draft.arrival) {
        (Some(departure), Some(arrival)) if errors.is_empty() => Ok(VoyagePayload {
            departure,
            arrival,
            port_of_loading: draft.port_of_loading.clone(),
            port_of_discharge: draft.port_of_discharge.clone(),
            vessel: draft.vessel.clone(),
            unit_types: draft.unit_types.clone(),
        }),
        _ => Err(errors),
    }
}
