use crate::core::form::FormController;
use crate::core::schema::Field;
use crate::domain::model::{UnitType, Vessel, MIN_UNIT_TYPES, UNSELECTED_VESSEL};
use crate::ui::format::format_datetime;
use chrono::{DateTime, Utc};

const LABEL_WIDTH: usize = 18;

/// 側滑面板中的建立航次表單
pub fn render_form(
    form: &FormController,
    vessels: &[Vessel],
    unit_types: &[UnitType],
    picker_format: &str,
) -> String {
    let draft = form.draft();
    let errors = form.errors();
    let mut lines = vec!["== New voyage ==".to_string()];

    let mut field = |label: &str, value: String, key: Field| {
        lines.push(format!("{:<width$}{}", label, value, width = LABEL_WIDTH));
        if let Some(message) = errors.first(key) {
            lines.push(format!("  ! {}", message));
        }
    };

    field("Departure", picker_value(draft.departure, picker_format), Field::Departure);
    field("Arrival", picker_value(draft.arrival, picker_format), Field::Arrival);
    field("Port of loading", draft.port_of_loading.clone(), Field::PortOfLoading);
    field("Port of discharge", draft.port_of_discharge.clone(), Field::PortOfDischarge);
    field("Vessel", vessel_label(&draft.vessel, vessels), Field::Vessel);

    lines.push("  Vessel options:".to_string());
    lines.push(option_line(
        draft.vessel == UNSELECTED_VESSEL,
        UNSELECTED_VESSEL,
        "Select a vessel",
    ));
    for vessel in vessels {
        lines.push(option_line(draft.vessel == vessel.id, &vessel.id, &vessel.name));
    }

    lines.push(format!(
        "Unit types ({}/{} selected)",
        draft.unit_types.len(),
        MIN_UNIT_TYPES
    ));
    for unit in unit_types {
        let mark = if form.is_unit_type_selected(&unit.id) { "x" } else { " " };
        lines.push(format!("  [{}] {:<8} {}", mark, unit.id, unit.name));
    }
    if let Some(message) = errors.first(Field::UnitTypes) {
        lines.push(format!("  ! {}", message));
    }

    if form.is_submitting() {
        lines.push("Submitting...".to_string());
    }
    lines.join("\n")
}

fn picker_value(value: Option<DateTime<Utc>>, format: &str) -> String {
    value
        .map(|v| format_datetime(&v, format))
        .unwrap_or_else(|| "Pick a date".to_string())
}

fn vessel_label(selected: &str, vessels: &[Vessel]) -> String {
    if selected == UNSELECTED_VESSEL {
        return UNSELECTED_VESSEL.to_string();
    }
    vessels
        .iter()
        .find(|vessel| vessel.id == selected)
        .map(|vessel| vessel.name.clone())
        .unwrap_or_else(|| selected.to_string())
}

fn option_line(selected: bool, id: &str, name: &str) -> String {
    let mark = if selected { "•" } else { " " };
    format!("  ({}) {:<8} {}", mark, id, name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_PICKER_DATE_FORMAT;
    use crate::core::schema::MSG_UNIT_TYPES_MIN;
    use chrono::TimeZone;

    fn vessels() -> Vec<Vessel> {
        vec![Vessel {
            id: "v1".to_string(),
            name: "Selandia Seaways".to_string(),
        }]
    }

    fn unit_types() -> Vec<UnitType> {
        (1..=6)
            .map(|i| UnitType {
                id: format!("u{}", i),
                name: format!("Unit {}", i),
                default_length: None,
            })
            .collect()
    }

    #[test]
    fn test_pristine_form_shows_placeholders_without_errors() {
        let form = FormController::new();
        let output = render_form(&form, &vessels(), &unit_types(), DEFAULT_PICKER_DATE_FORMAT);

        assert!(output.contains("Pick a date"));
        assert!(output.contains("(•) -        Select a vessel"));
        assert!(output.contains("Unit types (0/5 selected)"));
        assert!(!output.contains(" ! "));
    }

    #[test]
    fn test_edited_form_shows_values_and_errors() {
        let mut form = FormController::new();
        form.set_departure(Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()));
        form.select_vessel("v1");
        form.set_unit_type("u2", true);

        let output = render_form(&form, &vessels(), &unit_types(), DEFAULT_PICKER_DATE_FORMAT);

        assert!(output.contains("01 January 2024, 00:00:00"));
        assert!(output.contains("Vessel            Selandia Seaways"));
        assert!(output.contains("[x] u2"));
        assert!(output.contains("[ ] u3"));
        assert!(output.contains(MSG_UNIT_TYPES_MIN));
    }
}
