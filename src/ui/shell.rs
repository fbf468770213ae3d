use crate::core::notify::ToastQueue;
use crate::domain::notification::ToastVariant;
use crate::domain::ports::ApiTransport;
use crate::ui::page::{Outcome, VoyagePage};
use crate::utils::error::Result;
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

/// 互動模式中一行輸入對應一個頁面事件
#[derive(Debug, Parser)]
#[command(
    no_binary_name = true,
    disable_help_flag = true,
    disable_help_subcommand = true
)]
struct ShellLine {
    #[command(subcommand)]
    command: ShellCommand,
}

#[derive(Debug, Subcommand)]
enum ShellCommand {
    /// Open the "new voyage" panel
    Open,
    /// Dismiss the panel and clear the form
    Close,
    /// Set the departure date, e.g. 2024-01-01T08:00 (empty clears)
    Departure { value: Vec<String> },
    /// Set the arrival date
    Arrival { value: Vec<String> },
    /// Set the port of loading
    Loading { port: Vec<String> },
    /// Set the port of discharge
    Discharge { port: Vec<String> },
    /// Select a vessel by id ("-" clears the selection)
    Vessel { id: String },
    /// Check or uncheck a unit type
    Toggle { id: String },
    /// Submit the form
    Submit,
    /// Expand or collapse the unit types of a voyage
    Expand { id: String },
    /// Delete a voyage
    Delete { id: String },
    /// Run the "Try again" action of the last failed request
    Retry,
    /// Drop cached queries and reload the page
    Refresh,
    /// Print the page
    Show,
    /// Print the available commands
    Help,
    /// Leave the shell
    #[command(alias = "exit")]
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellControl {
    Continue,
    Quit,
}

/// 處理一行輸入，回傳要印出的內容
pub async fn execute_line<T: ApiTransport>(
    page: &mut VoyagePage<T, ToastQueue>,
    line: &str,
) -> (ShellControl, String) {
    let words: Vec<&str> = line.split_whitespace().collect();
    if words.is_empty() {
        return (ShellControl::Continue, String::new());
    }

    let parsed = match ShellLine::try_parse_from(words.iter().copied()) {
        Ok(parsed) => parsed,
        Err(e) => return (ShellControl::Continue, e.to_string().trim_end().to_string()),
    };

    let mut output = Vec::new();
    match parsed.command {
        ShellCommand::Open => {
            page.open_panel();
            output.push(page.render());
        }
        ShellCommand::Close => {
            page.close_panel();
            output.push(page.render());
        }
        ShellCommand::Departure { value } => {
            push_input_result(&mut output, page.set_departure_input(&value.join(" ")));
        }
        ShellCommand::Arrival { value } => {
            push_input_result(&mut output, page.set_arrival_input(&value.join(" ")));
        }
        ShellCommand::Loading { port } => page.form_mut().set_port_of_loading(port.join(" ")),
        ShellCommand::Discharge { port } => page.form_mut().set_port_of_discharge(port.join(" ")),
        ShellCommand::Vessel { id } => page.form_mut().select_vessel(id),
        ShellCommand::Toggle { id } => {
            let checked = page.form_mut().toggle_unit_type(&id);
            output.push(format!("{} {}", if checked { "checked" } else { "unchecked" }, id));
        }
        ShellCommand::Submit => {
            let outcome = page.submit().await;
            output.push(describe(&outcome));
        }
        ShellCommand::Expand { id } => {
            page.toggle_expanded(&id);
            output.push(page.render_table());
        }
        ShellCommand::Delete { id } => {
            let outcome = page.delete(&id).await;
            output.push(describe(&outcome));
        }
        ShellCommand::Retry => match page.notifier().take_last_retry() {
            Some(action) => {
                let outcome = page.retry(action).await;
                output.push(describe(&outcome));
            }
            None => output.push("Nothing to retry.".to_string()),
        },
        ShellCommand::Refresh => {
            if let Err(e) = page.refresh().await {
                output.push(format!("Refresh failed: {}", e.user_friendly_message()));
            }
            output.push(page.render());
        }
        ShellCommand::Show => output.push(page.render()),
        ShellCommand::Help => output.push(help_text()),
        ShellCommand::Quit => return (ShellControl::Quit, String::new()),
    }

    // 編輯欄位後若面板開著，重畫表單讓錯誤即時顯示
    if output.is_empty() {
        if let Some(panel) = page.render_panel() {
            output.push(panel);
        }
    }

    for toast in page.notifier().drain() {
        let line = match toast.variant {
            ToastVariant::Default => format!("[info] {}: {}", toast.title, toast.description),
            ToastVariant::Destructive => format!("[error] {}: {}", toast.title, toast.description),
        };
        output.push(line);
        if let Some(retry) = &toast.retry {
            output.push(format!("        {} → type `retry`", retry.label()));
        }
    }

    (ShellControl::Continue, output.join("\n"))
}

/// 讀取輸入直到 EOF 或 `quit`
pub async fn run_shell<T, R, W>(
    page: &mut VoyagePage<T, ToastQueue>,
    reader: R,
    mut writer: W,
) -> Result<()>
where
    T: ApiTransport,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    writer.write_all(page.render().as_bytes()).await?;
    writer.write_all(b"\n> ").await?;
    writer.flush().await?;

    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        let (control, output) = execute_line(page, &line).await;
        if control == ShellControl::Quit {
            break;
        }
        if !output.is_empty() {
            writer.write_all(output.as_bytes()).await?;
            writer.write_all(b"\n").await?;
        }
        writer.write_all(b"> ").await?;
        writer.flush().await?;
    }

    tracing::debug!("Shell session ended");
    Ok(())
}

fn push_input_result(output: &mut Vec<String>, result: Result<()>) {
    if let Err(e) = result {
        output.push(e.to_string());
    }
}

fn describe(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Done => "OK".to_string(),
        Outcome::Invalid(errors) => format!("Not submitted: {}", errors),
        Outcome::Busy => "Still waiting for the previous request.".to_string(),
        Outcome::Failed(e) => format!("Failed: {}", e.user_friendly_message()),
    }
}

fn help_text() -> String {
    use clap::CommandFactory;
    ShellLine::command()
        .get_subcommands()
        .map(|cmd| {
            format!(
                "  {:<10} {}",
                cmd.get_name(),
                cmd.get_about().map(|a| a.to_string()).unwrap_or_default()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
