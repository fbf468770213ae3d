use crate::domain::model::{UnitType, Voyage};
use crate::ui::format::{format_datetime, format_length};
use std::collections::HashSet;

pub const VOYAGE_HEADERS: [&str; 8] = [
    "ID",
    "Departure",
    "Arrival",
    "Port of loading",
    "Port of discharge",
    "Vessel",
    "Unit types",
    "",
];

const DELETE_AFFORDANCE: &str = "[delete]";

/// 依欄寬對齊的純文字表格，回傳逐行內容（含表頭與分隔線）
pub fn render_grid(headers: &[&str], rows: &[Vec<String>]) -> Vec<String> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (index, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(index) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let line = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(line(headers.to_vec()));
    lines.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    for row in rows {
        lines.push(line(row.iter().map(String::as_str).collect()));
    }
    lines
}

/// Unit types 的巢狀表格（名稱與預設長度）
pub fn render_unit_types(unit_types: &[UnitType]) -> Vec<String> {
    let rows: Vec<Vec<String>> = unit_types
        .iter()
        .map(|unit| vec![unit.name.clone(), format_length(unit.default_length)])
        .collect();
    render_grid(&["Name", "Default length"], &rows)
}

pub fn render_voyage_table(
    voyages: &[Voyage],
    expanded: &HashSet<String>,
    date_format: &str,
) -> String {
    if voyages.is_empty() {
        return "No voyages found.".to_string();
    }

    let rows: Vec<Vec<String>> = voyages
        .iter()
        .map(|voyage| {
            let marker = if expanded.contains(&voyage.id) { "▾" } else { "▸" };
            vec![
                voyage.id.clone(),
                format_datetime(&voyage.scheduled_departure, date_format),
                format_datetime(&voyage.scheduled_arrival, date_format),
                voyage.port_of_loading.clone(),
                voyage.port_of_discharge.clone(),
                voyage.vessel.name.clone(),
                format!("{} {}", marker, voyage.unit_types.len()),
                DELETE_AFFORDANCE.to_string(),
            ]
        })
        .collect();

    let grid = render_grid(&VOYAGE_HEADERS, &rows);
    let mut lines: Vec<String> = grid[..2].to_vec();
    for (voyage, row_line) in voyages.iter().zip(&grid[2..]) {
        lines.push(row_line.clone());
        if expanded.contains(&voyage.id) {
            if voyage.unit_types.is_empty() {
                lines.push("    (no unit types)".to_string());
            } else {
                lines.extend(
                    render_unit_types(&voyage.unit_types)
                        .into_iter()
                        .map(|nested| format!("    {}", nested)),
                );
            }
        }
    }
    lines.join("\n")
}
