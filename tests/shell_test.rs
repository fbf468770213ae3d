use httpmock::prelude::*;
use std::sync::Arc;
use voyage_admin::ui::format::DisplayFormats;
use voyage_admin::ui::shell::{execute_line, run_shell, ShellControl};
use voyage_admin::{HttpApi, ToastQueue, VoyagePage, VoyageService};

fn page_for(server: &MockServer) -> VoyagePage<HttpApi, ToastQueue> {
    let api = HttpApi::new(&server.base_url()).unwrap();
    let service = VoyageService::new(api, Arc::new(ToastQueue::new()));
    VoyagePage::new(service, DisplayFormats::default())
}

fn mock_empty_lists(server: &MockServer) {
    for path in ["/voyage/getAll", "/vessel/getAll", "/unitType/getAll"] {
        server.mock(|when, then| {
            when.method(GET).path(path);
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!([]));
        });
    }
}

#[tokio::test]
async fn test_scripted_session_creates_voyage() {
    let server = MockServer::start();
    mock_empty_lists(&server);
    let create_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/voyage/create")
            .body_contains("\"portOfLoading\":\"Port of Tyne\"");
        then.status(200);
    });

    let script = "\
open
departure 2024-01-01T00:00
arrival 2024-01-02 00:00
loading Port of Tyne
discharge Ijmuiden
vessel v1
toggle u1
toggle u2
toggle u3
toggle u4
toggle u5
submit
quit
toggle u6
";

    let mut page = page_for(&server);
    let mut output = Vec::new();
    run_shell(&mut page, script.as_bytes(), &mut output)
        .await
        .unwrap();
    let output = String::from_utf8(output).unwrap();

    create_mock.assert();
    assert!(output.contains("[+ New voyage]"));
    assert!(output.contains("checked u5"));
    assert!(output.contains("[info] Voyage created"));
    // quit 之後的輸入不會被處理
    assert!(!output.contains("u6"));
    assert!(!page.is_panel_open());
}

#[tokio::test]
async fn test_failed_delete_then_retry_command() {
    let server = MockServer::start();
    let delete_mock = server.mock(|when, then| {
        when.method(DELETE)
            .path("/voyage/delete")
            .query_param("id", "5");
        then.status(500);
    });

    let mut page = page_for(&server);

    let (_, output) = execute_line(&mut page, "delete 5").await;
    assert!(output.contains("[error] Uh oh! Something went wrong."));
    assert!(output.contains("Try again"));

    let (_, output) = execute_line(&mut page, "retry").await;
    assert!(output.starts_with("Failed:"));
    delete_mock.assert_hits(2);

    // 重試後同一則通知又提供了重試動作
    assert!(page.notifier().last_retry().is_some());
}

#[tokio::test]
async fn test_form_edits_render_live_errors() {
    let server = MockServer::start();
    let mut page = page_for(&server);

    execute_line(&mut page, "open").await;
    execute_line(&mut page, "departure 2024-01-05T00:00").await;
    let (_, output) = execute_line(&mut page, "arrival 2024-01-01T00:00").await;

    assert!(output.contains("Departure must be before arrival date."));
    assert!(output.contains("05 January 2024, 00:00:00"));
}

#[tokio::test]
async fn test_unknown_and_control_commands() {
    let server = MockServer::start();
    let mut page = page_for(&server);

    let (control, output) = execute_line(&mut page, "launch").await;
    assert_eq!(control, ShellControl::Continue);
    assert!(output.contains("launch"));

    let (_, output) = execute_line(&mut page, "retry").await;
    assert_eq!(output, "Nothing to retry.");

    let (_, output) = execute_line(&mut page, "departure tomorrow").await;
    assert!(output.contains("is not a date-time"));

    let (_, output) = execute_line(&mut page, "help").await;
    assert!(output.contains("submit"));

    let (control, _) = execute_line(&mut page, "exit").await;
    assert_eq!(control, ShellControl::Quit);
}

#[tokio::test]
async fn test_retry_is_disarmed_after_a_later_successful_submit() {
    let server = MockServer::start();
    mock_empty_lists(&server);
    let mut failing = server.mock(|when, then| {
        when.method(POST).path("/voyage/create");
        then.status(500);
    });

    let mut page = page_for(&server);
    for line in [
        "open",
        "departure 2024-01-01T00:00",
        "arrival 2024-01-02T00:00",
        "loading Esbjerg",
        "discharge Immingham",
        "vessel v1",
        "toggle u1",
        "toggle u2",
        "toggle u3",
        "toggle u4",
        "toggle u5",
    ] {
        execute_line(&mut page, line).await;
    }

    let (_, output) = execute_line(&mut page, "submit").await;
    assert!(output.starts_with("Failed:"));
    assert!(page.notifier().last_retry().is_some());

    failing.delete();
    let succeeding = server.mock(|when, then| {
        when.method(POST).path("/voyage/create");
        then.status(201);
    });

    let (_, output) = execute_line(&mut page, "submit").await;
    assert!(output.starts_with("OK"));

    let (_, output) = execute_line(&mut page, "retry").await;
    assert_eq!(output, "Nothing to retry.");
    succeeding.assert_hits(1);
}
