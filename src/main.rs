use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::ProgressBar;
use makeup_exam::client::{AdminClient, ExamClient};
use makeup_exam::config::{find_config_file, get_config, load_config, Config};
use makeup_exam::models::{messages, QueryState, RosterEntry};
use makeup_exam::ui::{print_status, Status};
use makeup_exam::{roster, server, ui};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Makeup Exam - look up make-up exam schedules and manage the roster service
#[derive(Parser, Debug)]
#[command(name = "makeup-exam")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Make-up exam schedule lookup, roster upload and REST service", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv, -vvv)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short)]
    quiet: bool,

    /// Output format
    #[arg(long, short, value_enum, global = true, default_value_t = OutputFormat::Auto)]
    output: OutputFormat,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, global = true, default_value_t = 30)]
    timeout: u64,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Output format for results
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Automatic based on terminal (table if TTY, JSON otherwise)
    Auto,
    /// Table format (human-readable)
    Table,
    /// JSON format (machine-readable)
    Json,
    /// Plain text format
    Plain,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Look up the make-up exams for a student ID
    #[command(alias = "q")]
    Lookup {
        /// Student ID to query; omit to enter the interactive prompt
        student_id: Option<String>,

        /// Override the lookup API base URL
        #[arg(long)]
        api_base: Option<String>,
    },

    /// Upload a roster workbook (.xlsx/.xls) to the admin endpoint
    #[command(alias = "u")]
    Upload {
        /// Path of the workbook file
        file: PathBuf,

        /// Override the admin upload URL
        #[arg(long)]
        url: Option<String>,

        /// Admin token (overrides configuration)
        #[arg(long)]
        token: Option<String>,
    },

    /// Check connectivity against the service health endpoint
    #[command(alias = "ping")]
    Check {
        /// Override the admin upload URL the health URL is derived from
        #[arg(long)]
        url: Option<String>,
    },

    /// Parse a roster workbook locally without uploading it
    Parse {
        /// Path of the workbook file
        file: PathBuf,
    },

    /// Run the REST service backing the lookup page
    Serve {
        /// Address to bind to
        #[arg(long)]
        bind: Option<String>,

        /// SQLite database path
        #[arg(long)]
        database: Option<PathBuf>,

        /// Admin token (overrides configuration and ADMIN_SECRET_TOKEN)
        #[arg(long)]
        token: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity
    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let env_filter = if cli.quiet { "error" } else { log_level };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("makeup_exam={}", env_filter)),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from file if specified or found in default locations
    let config: Config = if let Some(config_path) = &cli.config {
        load_config(config_path)?
    } else if let Some(config_path) = find_config_file() {
        tracing::info!("Using config file: {}", config_path.display());
        load_config(&config_path)?
    } else {
        get_config()?
    };

    let timeout = Duration::from_secs(cli.timeout);

    match cli.command {
        Some(Commands::Lookup {
            student_id,
            api_base,
        }) => {
            let base_url = api_base.unwrap_or(config.api.base_url);
            let client = ExamClient::new(&base_url, timeout)?;

            match student_id {
                Some(id) => {
                    let state = submit_query(&client, &id, cli.output, cli.quiet).await;
                    output_query_state(&state, cli.output);
                    if state.is_error() {
                        std::process::exit(1);
                    }
                }
                None => run_interactive(&client, cli.output, cli.quiet).await?,
            }
        }

        Some(Commands::Upload { file, url, token }) => {
            let upload_url = url.unwrap_or(config.admin.upload_url);
            let token = token.or(config.admin.token).ok_or_else(|| {
                anyhow::anyhow!(
                    "admin token not configured; set admin.token or MAKEUP_EXAM_ADMIN__TOKEN"
                )
            })?;
            let admin = AdminClient::new(&upload_url, &token, timeout)?;

            match admin.upload_workbook(&file).await {
                Ok(response) if response.success => {
                    let message = response.message.unwrap_or_else(|| {
                        format!("成功上傳 {} 筆補考資料", response.count.unwrap_or_default())
                    });
                    print_status(Status::Success, &message);
                }
                Ok(response) => {
                    print_status(
                        Status::Error,
                        &format!("上傳失敗：{}", response.failure_detail()),
                    );
                    std::process::exit(1);
                }
                Err(e) => {
                    print_status(Status::Error, &format!("上傳失敗：{}", e));
                    std::process::exit(1);
                }
            }
        }

        Some(Commands::Check { url }) => {
            let upload_url = url.unwrap_or(config.admin.upload_url);
            let admin = AdminClient::new(&upload_url, "", timeout)?;
            let health_url = admin.health_url();

            match admin.check_health().await {
                Ok(health) if health.is_healthy() => {
                    print_status(Status::Success, &format!("連線成功：{}", health_url));
                }
                Ok(health) => {
                    print_status(
                        Status::Error,
                        &format!("連線失敗：非預期狀態「{}」", health.status),
                    );
                    std::process::exit(1);
                }
                Err(e) => {
                    print_status(Status::Error, &format!("連線失敗：{}", e));
                    std::process::exit(1);
                }
            }
        }

        Some(Commands::Parse { file }) => {
            let bytes = std::fs::read(&file)?;
            let entries = roster::parse_workbook(&bytes)?;

            output_roster(&entries, cli.output);
            if entries.is_empty() {
                print_status(Status::Warning, "Excel 檔案中沒有有效資料");
            } else if !cli.quiet {
                print_status(Status::Success, &format!("共 {} 筆補考資料", entries.len()));
            }
        }

        Some(Commands::Serve {
            bind,
            database,
            token,
        }) => {
            let bind_addr = bind.unwrap_or(config.server.bind_addr);
            let db_path = database.unwrap_or(config.server.database);

            let db = server::open_db(&db_path)?;
            tracing::info!("opened roster database at {}", db_path.display());

            let admin_token = server::resolve_admin_token(token.or(config.admin.token));
            let state = server::AppState::new(db, admin_token);
            server::serve(&bind_addr, state).await?;
        }

        None => {
            // No command provided - show help
            println!("No command provided. Use --help for usage information.");
            println!("Common commands:");
            println!("  lookup <student-id>  - Look up make-up exams");
            println!("  upload <file.xlsx>   - Upload a roster workbook");
            println!("  check                - Check service connectivity");
            println!("  serve                - Run the REST service");
        }
    }

    Ok(())
}

/// Submit one query: Loading while the fetch is in flight, then the terminal
/// state mapped from the response.
async fn submit_query(
    client: &ExamClient,
    student_id: &str,
    format: OutputFormat,
    quiet: bool,
) -> QueryState {
    let show_spinner = !quiet && matches!(resolve_format(format), OutputFormat::Table);

    let spinner = if show_spinner {
        let pb = ProgressBar::new_spinner();
        pb.set_message(messages::SEARCHING);
        pb.enable_steady_tick(Duration::from_millis(80));
        Some(pb)
    } else {
        None
    };

    let result = client.fetch_exams(student_id).await;

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    match result {
        Ok(records) => QueryState::from_records(records),
        Err(e) => {
            tracing::debug!("lookup failed: {}", e);
            QueryState::Error(e.user_message())
        }
    }
}

/// Prompt for student IDs in a loop. Each new prompt starts a fresh query,
/// clearing any previous error block; at most one query is in flight at a
/// time since the prompt blocks while fetching.
async fn run_interactive(client: &ExamClient, format: OutputFormat, quiet: bool) -> Result<()> {
    println!("補考查詢（輸入 q 離開）");

    loop {
        let input: String = dialoguer::Input::new()
            .with_prompt("請輸入學號")
            .allow_empty(true)
            .interact_text()?;

        if input.trim().eq_ignore_ascii_case("q") {
            break;
        }

        let state = submit_query(client, &input, format, quiet).await;
        output_query_state(&state, format);
        println!();
    }

    Ok(())
}

fn resolve_format(format: OutputFormat) -> OutputFormat {
    if format == OutputFormat::Auto {
        if std::io::stdout().is_terminal() {
            OutputFormat::Table
        } else {
            OutputFormat::Json
        }
    } else {
        format
    }
}

fn output_query_state(state: &QueryState, format: OutputFormat) {
    match resolve_format(format) {
        OutputFormat::Json => match state {
            QueryState::Populated(records) => {
                println!("{}", serde_json::to_string_pretty(records).unwrap());
            }
            QueryState::Empty => println!("[]"),
            QueryState::Error(msg) => {
                println!("{}", serde_json::json!({ "error": msg }));
            }
            QueryState::Idle | QueryState::Loading => {}
        },
        OutputFormat::Plain => match state {
            QueryState::Populated(records) => {
                if let Some(name) = records.first().and_then(|r| r.student_name.as_deref()) {
                    println!("姓名：{}", name);
                }
                for record in records {
                    println!(
                        "{}\t{}\t{}\t{}",
                        record.subject, record.exam_date, record.exam_time, record.location
                    );
                }
            }
            other => println!("{}", ui::render_query_state(other)),
        },
        _ => println!("{}", ui::render_query_state(state)),
    }
}

fn output_roster(entries: &[RosterEntry], format: OutputFormat) {
    match resolve_format(format) {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(entries).unwrap());
        }
        OutputFormat::Plain => {
            for entry in entries {
                println!(
                    "{}\t{}\t{}\t{}\t{}",
                    entry.student_id, entry.subject, entry.exam_date, entry.exam_time, entry.location
                );
            }
        }
        _ => {
            use comfy_table::{presets, Table};
            let mut table = Table::new();
            table.load_preset(presets::UTF8_FULL);
            table.set_header(vec!["學號", "姓名", "班級", "科目", "日期", "時間", "地點"]);
            for entry in entries {
                table.add_row(vec![
                    entry.student_id.clone(),
                    entry.student_name.clone().unwrap_or_default(),
                    entry.class_name.clone().unwrap_or_default(),
                    entry.subject.clone(),
                    entry.exam_date.clone(),
                    entry.exam_time.clone(),
                    entry.location.clone(),
                ]);
            }
            println!("{table}");
        }
    }
}
