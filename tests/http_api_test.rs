use anyhow::Result;
use httpmock::prelude::*;
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;
use voyage_admin::config::toml_config::TomlConfig;
use voyage_admin::domain::ports::ApiTransport;
use voyage_admin::{AppConfig, HttpApi, VoyageError};

#[tokio::test]
async fn test_fetch_data_returns_json() -> Result<()> {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/api/vessel/getAll");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!([{"id": 1, "name": "Primula Seaways"}]));
    });

    let api = HttpApi::new(&server.url("/api"))?;
    let value = api.fetch_data("vessel/getAll").await?;

    api_mock.assert();
    assert_eq!(value[0]["name"], "Primula Seaways");
    Ok(())
}

#[tokio::test]
async fn test_non_success_status_is_an_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/voyage/getAll");
        then.status(404).body("not here");
    });

    let api = HttpApi::new(&server.base_url()).unwrap();
    let err = api.fetch_data("voyage/getAll").await.unwrap_err();

    match err {
        VoyageError::HttpStatusError {
            method,
            path,
            status,
        } => {
            assert_eq!(method, "GET");
            assert_eq!(path, "voyage/getAll");
            assert_eq!(status, 404);
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[tokio::test]
async fn test_delete_sends_id_as_query_param() -> Result<()> {
    let server = MockServer::start();
    let delete_mock = server.mock(|when, then| {
        when.method(DELETE)
            .path("/voyage/delete")
            .query_param("id", "abc-123");
        then.status(204);
    });

    let api = HttpApi::new(&server.base_url())?;
    api.delete("voyage/delete", &[("id", "abc-123")]).await?;

    delete_mock.assert();
    Ok(())
}

#[tokio::test]
async fn test_config_headers_and_timeout_are_applied() {
    let server = MockServer::start();
    let header_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/unitType/getAll")
            .header("x-client", "voyage-admin");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!([]));
    });
    server.mock(|when, then| {
        when.method(GET).path("/voyage/getAll");
        then.status(200)
            .json_body(serde_json::json!([]))
            .delay(Duration::from_secs(3));
    });

    let mut temp_file = NamedTempFile::new().unwrap();
    write!(
        temp_file,
        r#"
[api]
base_url = "{}"
timeout_seconds = 1

[api.headers]
x-client = "voyage-admin"
"#,
        server.base_url()
    )
    .unwrap();

    let file = TomlConfig::from_file(temp_file.path()).unwrap();
    let config = AppConfig::resolve(Some(&file), None).unwrap();
    let api = HttpApi::from_config(&config).unwrap();

    api.fetch_data("unitType/getAll").await.unwrap();
    header_mock.assert();

    let err = api.fetch_data("voyage/getAll").await.unwrap_err();
    assert!(matches!(&err, VoyageError::ApiError(e) if e.is_timeout()));
    assert!(err.is_retryable());
}

#[test]
fn test_invalid_header_name_is_a_config_error() {
    let file = TomlConfig::from_toml_str(
        r#"
[api.headers]
"bad header" = "x"
"#,
    )
    .unwrap();
    let config = AppConfig::resolve(Some(&file), None).unwrap();

    let err = HttpApi::from_config(&config).unwrap_err();
    assert!(matches!(err, VoyageError::InvalidConfigValueError { .. }));
}
