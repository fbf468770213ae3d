use clap::Parser;
use std::sync::Arc;
use voyage_admin::config::cli::{Command, CreateArgs};
use voyage_admin::ui::format::DisplayFormats;
use voyage_admin::ui::shell::run_shell;
use voyage_admin::ui::table::render_grid;
use voyage_admin::utils::error::ErrorSeverity;
use voyage_admin::utils::logger;
use voyage_admin::{
    CliConfig, HttpApi, Outcome, ToastQueue, VoyageError, VoyagePage, VoyageService,
};

type Page = VoyagePage<HttpApi, ToastQueue>;

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose, cli.log_format);

    tracing::info!("Starting voyage-admin");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = run(cli).await {
        tracing::error!(
            "❌ voyage-admin failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(exit_code(&e));
    }
}

async fn run(cli: CliConfig) -> voyage_admin::Result<()> {
    let config = cli.app_config()?;
    tracing::debug!("Using API base {}", config.api_base_url);

    let api = HttpApi::from_config(&config)?;
    let toasts = Arc::new(ToastQueue::new());
    let service = VoyageService::new(api, toasts.clone());
    let mut page = VoyagePage::new(service, DisplayFormats::from_config(&config));

    match cli.command {
        Command::List { expand } => {
            page.mount().await?;
            if expand {
                page.expand_all();
            }
            println!("{}", page.render_table());
            Ok(())
        }
        Command::Vessels => {
            let vessels = page.service().list_vessels().await?;
            let rows: Vec<Vec<String>> = vessels
                .into_iter()
                .map(|vessel| vec![vessel.id, vessel.name])
                .collect();
            println!("{}", render_grid(&["ID", "Name"], &rows).join("\n"));
            Ok(())
        }
        Command::UnitTypes => {
            let unit_types = page.service().list_unit_types().await?;
            let rows: Vec<Vec<String>> = unit_types
                .into_iter()
                .map(|unit| {
                    vec![
                        unit.id,
                        unit.name,
                        voyage_admin::ui::format::format_length(unit.default_length),
                    ]
                })
                .collect();
            println!(
                "{}",
                render_grid(&["ID", "Name", "Default length"], &rows).join("\n")
            );
            Ok(())
        }
        Command::Create(args) => {
            fill_form(&mut page, args)?;
            let outcome = page.submit().await;
            print_toasts(&toasts);
            finish(outcome)
        }
        Command::Delete { id } => {
            let outcome = page.delete(&id).await;
            print_toasts(&toasts);
            finish(outcome)
        }
        Command::Shell => {
            // 參考資料載入失敗仍可進入互動模式
            if let Err(e) = page.mount().await {
                eprintln!("⚠️ {}", e.user_friendly_message());
            }
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            run_shell(&mut page, stdin, tokio::io::stdout()).await
        }
    }
}

fn fill_form(page: &mut Page, args: CreateArgs) -> voyage_admin::Result<()> {
    page.open_panel();
    page.set_departure_input(&args.departure)?;
    page.set_arrival_input(&args.arrival)?;

    let form = page.form_mut();
    form.set_port_of_loading(args.port_of_loading);
    form.set_port_of_discharge(args.port_of_discharge);
    form.select_vessel(args.vessel);
    for unit_type in &args.unit_types {
        form.set_unit_type(unit_type, true);
    }
    Ok(())
}

fn finish(outcome: Outcome) -> voyage_admin::Result<()> {
    match outcome {
        Outcome::Done => {
            println!("✅ Done");
            Ok(())
        }
        Outcome::Invalid(errors) => Err(VoyageError::ValidationError {
            message: errors.to_string(),
        }),
        Outcome::Busy => Err(VoyageError::MutationInFlight {
            operation: "create".to_string(),
            target: "voyage".to_string(),
        }),
        Outcome::Failed(e) => Err(e),
    }
}

fn print_toasts(toasts: &ToastQueue) {
    for toast in toasts.drain() {
        if toast.is_destructive() {
            eprintln!("❌ {}: {}", toast.title, toast.description);
        } else {
            println!("🔔 {}: {}", toast.title, toast.description);
        }
    }
}

fn exit_code(e: &VoyageError) -> i32 {
    // 2 代表重跑同一個指令可能就會成功
    if e.is_retryable() {
        return 2;
    }
    match e.severity() {
        ErrorSeverity::Critical => 3, // 設定錯誤
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_busy_submit_is_reported_as_error() {
        let err = finish(Outcome::Busy).unwrap_err();
        assert!(matches!(err, VoyageError::MutationInFlight { .. }));
        assert_eq!(exit_code(&err), 1);
    }

    #[test]
    fn test_exit_code_marks_retryable_failures() {
        let http = VoyageError::HttpStatusError {
            method: "POST".to_string(),
            path: "voyage/create".to_string(),
            status: 503,
        };
        assert_eq!(exit_code(&http), 2);

        let config = VoyageError::MissingConfigError {
            field: "api.base_url".to_string(),
        };
        assert_eq!(exit_code(&config), 3);

        let invalid = VoyageError::ValidationError {
            message: "arrival: Departure must be before arrival date.".to_string(),
        };
        assert_eq!(exit_code(&invalid), 1);
    }
}
