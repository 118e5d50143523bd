//! Assetdesk main entry point

use assetdesk_config::{Config, ReportMode};
use assetdesk_core::error::{DefaultErrorLogger, ErrorLogger};
use assetdesk_core::source::load_json;
use assetdesk_core::{
    asset_history, due_reminders, AssetReminder, BorrowQuery, BorrowReport,
    CachedTransactionSource, Clock, CrcNotice, CrcReminder, CustomRange, DailyReport, FixedClock,
    JsonFileSource, ReportContext, ReportSettings, Shift, ShiftChoice, StaffMember, SystemClock,
    TransactionSource,
};
use assetdesk_utils::AssetCode;
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Runtime;

#[derive(Parser, Debug)]
#[command(name = "assetdesk")]
#[command(author = "Assetdesk Contributors")]
#[command(version = "0.1.0")]
#[command(about = "Asset movement reports and reminders on the GMT+7 business calendar", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Evaluate as of this RFC 3339 instant instead of the system clock
    #[arg(long)]
    now: Option<DateTime<Utc>>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the default configuration
    Init,
    /// Daily movement report
    Daily {
        #[arg(long)]
        mode: Option<ReportMode>,
        /// Custom range start (YYYY-MM-DD)
        #[arg(long)]
        start: Option<NaiveDate>,
        /// Custom range end (YYYY-MM-DD)
        #[arg(long)]
        end: Option<NaiveDate>,
        /// Custom range shift (sáng / chiều / all)
        #[arg(long)]
        shift: Option<ShiftChoice>,
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Borrowed assets not yet issued out of storage
    Borrow {
        #[arg(long)]
        start: Option<NaiveDate>,
        #[arg(long)]
        end: Option<NaiveDate>,
        /// Room name, or `all`
        #[arg(long)]
        room: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Reminders that are due
    Reminders {
        /// Compose CRC approval notices instead of listing asset reminders
        #[arg(long)]
        crc: bool,
    },
    /// Show the query a report mode translates to
    Filter {
        #[arg(long)]
        mode: ReportMode,
        #[arg(long)]
        start: Option<NaiveDate>,
        #[arg(long)]
        end: Option<NaiveDate>,
        /// sáng / chiều / all
        #[arg(long)]
        shift: Option<ShiftChoice>,
    },
    /// Movements of one asset, e.g. `259.24`
    History {
        code: String,
        #[arg(long)]
        room: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if let Command::Init = args.command {
        print!("{}", Config::generate_default());
        return Ok(());
    }

    let config = Config::load(args.config.clone());
    let level = config
        .as_ref()
        .map(|c| c.logging.level.clone())
        .unwrap_or_else(|_| "info".to_string());
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load {}: {}", args.config.display(), e);
            eprintln!("{}", e.to_details());
            return Err(anyhow::Error::new(e)
                .context(format!("loading {}", args.config.display())));
        }
    };
    log::info!(
        "Config loaded: data path={}, offset=UTC{:+}",
        config.data.path.display(),
        config.report.utc_offset_hours
    );

    let clock: Arc<dyn Clock> = match args.now {
        Some(now) => Arc::new(FixedClock(now)),
        None => Arc::new(SystemClock),
    };

    let rt = Runtime::new()?;
    let output = rt.block_on(run(args.command, &config, clock));

    match output {
        Ok(value) => {
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(())
        }
        Err(e) => {
            if let Some(core) = e.downcast_ref::<assetdesk_core::CoreError>() {
                DefaultErrorLogger.log_error(core, "command");
                eprintln!("{}", core.user_message());
            }
            Err(e)
        }
    }
}

async fn run(
    command: Command,
    config: &Config,
    clock: Arc<dyn Clock>,
) -> anyhow::Result<serde_json::Value> {
    let settings = ReportSettings::from_config(config)?;
    let now = clock.now();
    let source = CachedTransactionSource::from_config(
        Arc::new(JsonFileSource::new(config.transactions_path())),
        &config.cache,
        clock,
    );

    let value = match command {
        Command::Init => json!(Config::generate_default()),
        Command::Daily {
            mode,
            start,
            end,
            shift,
            page,
        } => {
            let context = context_for(
                mode.unwrap_or(config.report.default_mode),
                start,
                end,
                shift.and_then(ShiftChoice::shift),
                &settings,
                now,
            );
            let transactions = source.fetch_transactions().await?;
            let report = DailyReport::build(&context, &settings, &transactions, now);
            let page = report.page(page, settings.page_size);
            json!({
                "mode": report.mode,
                "caption": report.caption,
                "plan": report.plan,
                "grouped": report.grouped,
                "page": page,
            })
        }
        Command::Borrow {
            start,
            end,
            room,
            page,
        } => {
            let mut query = if start.is_none() && end.is_none() {
                BorrowQuery::default_for(&settings.calendar, now)
            } else {
                BorrowQuery {
                    start,
                    end,
                    room: None,
                }
            };
            query.room = room.filter(|room| room != "all");

            let transactions = source.fetch_transactions().await?;
            let report = BorrowReport::build(&transactions, query);
            let page = report.page(page, settings.page_size);
            json!({
                "query": report.query,
                "rooms": report.rooms,
                "page": page,
            })
        }
        Command::Reminders { crc } => {
            let today = settings.calendar.today(now);
            if crc {
                let reminders: Vec<CrcReminder> = load_json(&config.crc_reminders_path()).await?;
                let staff: Vec<StaffMember> = load_json(&config.staff_path()).await?;
                let pending: Vec<CrcReminder> =
                    reminders.into_iter().filter(|r| !r.is_sent).collect();

                let mut notices = Vec::new();
                let mut skipped = Vec::new();
                for reminder in due_reminders(&pending, today) {
                    match CrcNotice::compose(
                        reminder,
                        &staff,
                        &config.reminders.email_suffix,
                        today,
                    ) {
                        Ok(notice) => notices.push(notice),
                        Err(e) => {
                            DefaultErrorLogger.log_error(&e, "compose CRC notice");
                            skipped.push(json!({
                                "id": reminder.id,
                                "reason": e.user_message(),
                            }));
                        }
                    }
                }
                log::info!("{} CRC notices ready, {} skipped", notices.len(), skipped.len());
                json!({ "notices": notices, "skipped": skipped })
            } else {
                let reminders: Vec<AssetReminder> = load_json(&config.reminders_path()).await?;
                let pending: Vec<AssetReminder> =
                    reminders.into_iter().filter(|r| !r.is_sent).collect();
                json!({ "due": due_reminders(&pending, today) })
            }
        }
        Command::Filter {
            mode,
            start,
            end,
            shift,
        } => {
            let context = context_for(
                mode,
                start,
                end,
                shift.and_then(ShiftChoice::shift),
                &settings,
                now,
            );
            json!({
                "mode": mode,
                "caption": context.description(&settings.calendar, now),
                "plan": context.plan(&settings, now),
            })
        }
        Command::History { code, room } => {
            let code = AssetCode::parse(&code)?;
            let transactions = source.fetch_transactions().await?;
            json!({
                "code": code.to_string(),
                "year": code.full_year(),
                "transactions": asset_history(&transactions, code, room.as_deref()),
            })
        }
    };

    Ok(value)
}

/// Custom mode with no bounds at all starts from the pre-filled range
fn context_for(
    mode: ReportMode,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    shift: Option<Shift>,
    settings: &ReportSettings,
    now: DateTime<Utc>,
) -> ReportContext {
    match mode {
        ReportMode::Custom if start.is_none() && end.is_none() => {
            let mut range = CustomRange::default_for(&settings.calendar, now);
            range.shift = shift;
            ReportContext::custom(range)
        }
        ReportMode::Custom => ReportContext::custom(CustomRange::new(start, end, shift)),
        mode => ReportContext::new(mode),
    }
}
