use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// 下拉選單中「尚未選擇」的佔位值
pub const UNSELECTED_VESSEL: &str = "-";

/// 建立航次時至少要勾選的 Unit Type 數量
pub const MIN_UNIT_TYPES: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VesselRef {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitType {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub default_length: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vessel {
    #[serde(alias = "value", deserialize_with = "id_string")]
    pub id: String,
    #[serde(alias = "label")]
    pub name: String,
}

/// 伺服器端擁有的航次資料（唯讀投影）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Voyage {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub scheduled_departure: DateTime<Utc>,
    pub scheduled_arrival: DateTime<Utc>,
    pub port_of_loading: String,
    pub port_of_discharge: String,
    pub vessel: VesselRef,
    #[serde(default)]
    pub unit_types: Vec<UnitType>,
}

/// 表單綁定的暫存航次，提交成功後重設
#[derive(Debug, Clone, PartialEq)]
pub struct VoyageDraft {
    pub departure: Option<DateTime<Utc>>,
    pub arrival: Option<DateTime<Utc>>,
    pub port_of_loading: String,
    pub port_of_discharge: String,
    pub vessel: String,
    pub unit_types: Vec<String>,
}

impl Default for VoyageDraft {
    fn default() -> Self {
        Self {
            departure: None,
            arrival: None,
            port_of_loading: String::new(),
            port_of_discharge: String::new(),
            vessel: UNSELECTED_VESSEL.to_string(),
            unit_types: Vec::new(),
        }
    }
}

/// 通過驗證後送往 `voyage/create` 的 JSON body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoyagePayload {
    pub departure: DateTime<Utc>,
    pub arrival: DateTime<Utc>,
    pub port_of_loading: String,
    pub port_of_discharge: String,
    pub vessel: String,
    pub unit_types: Vec<String>,
}

// 後端有時以數字回傳 id
fn id_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voyage_deserializes_numeric_ids() {
        let json = serde_json::json!({
            "id": 7,
            "scheduledDeparture": "2024-01-01T00:00:00Z",
            "scheduledArrival": "2024-01-02T06:30:00Z",
            "portOfLoading": "Esbjerg",
            "portOfDischarge": "Immingham",
            "vessel": {"id": 3, "name": "Ficaria Seaways"},
            "unitTypes": [
                {"id": "u1", "name": "Trailer", "defaultLength": 13.6},
                {"id": 2, "name": "Container"}
            ]
        });

        let voyage: Voyage = serde_json::from_value(json).unwrap();
        assert_eq!(voyage.id, "7");
        assert_eq!(voyage.vessel.id, "3");
        assert_eq!(voyage.unit_types[0].default_length, Some(13.6));
        assert_eq!(voyage.unit_types[1].id, "2");
        assert_eq!(voyage.unit_types[1].default_length, None);
    }

    #[test]
    fn test_vessel_accepts_option_shape() {
        let vessel: Vessel =
            serde_json::from_value(serde_json::json!({"value": "v1", "label": "Petunia"})).unwrap();
        assert_eq!(vessel.id, "v1");
        assert_eq!(vessel.name, "Petunia");
    }

    #[test]
    fn test_payload_uses_camel_case_keys() {
        let payload = VoyagePayload {
            departure: "2024-01-01T00:00:00Z".parse().unwrap(),
            arrival: "2024-01-02T00:00:00Z".parse().unwrap(),
            port_of_loading: "Esbjerg".to_string(),
            port_of_discharge: "Immingham".to_string(),
            vessel: "v1".to_string(),
            unit_types: vec!["u1".to_string()],
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["portOfLoading"], "Esbjerg");
        assert_eq!(value["unitTypes"][0], "u1");
        assert!(value["departure"].as_str().unwrap().starts_with("2024-01-01T00:00:00"));
    }

    #[test]
    fn test_default_draft_uses_sentinel_vessel() {
        let draft = VoyageDraft::default();
        assert_eq!(draft.vessel, UNSELECTED_VESSEL);
        assert!(draft.unit_types.is_empty());
        assert!(draft.departure.is_none() && draft.arrival.is_none());
    }
}
