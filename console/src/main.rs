use std::time::Duration;

use clap::{Parser, Subcommand};
use console::api::BackendApi;
use console::config::{ConfigArgs, ConsoleConfig};
use console::history::{self, RssiChannel};
use console::session::{self, TrackingSession};
use console::ConsoleError;
use serde_json::Value;
use tokio::time::Instant;
use tracker::consts::GRID_SIZE;
use tracker::drive::{Direction, DriveController};
use tracker::tracking::Action;
use tracker::transform::{GridCoord, Point};

#[derive(Parser, Debug)]
#[command(name = "rssi-console", about = "Indoor-positioning robot operator console")]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Follow the live stream and print the device as it moves.
    Watch {
        /// Stop after this many seconds instead of waiting for Ctrl-C.
        #[arg(long)]
        seconds: Option<u64>,
    },
    /// Set the navigation target to a grid coordinate.
    Target { x: f64, y: f64 },
    /// Set the navigation target from a map pixel, as a click would.
    Pick { px: f64, py: f64 },
    /// Press, hold and release one drive key.
    Drive {
        /// One of w, a, s, d.
        key: String,
        #[arg(long, default_value_t = 500)]
        hold_ms: u64,
    },
    /// Start navigation toward the current target.
    Start,
    /// Show one page of activity logs.
    Logs {
        #[arg(long)]
        day: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Show RSSI monitoring series for a date.
    Monitoring {
        #[arg(long)]
        date: String,
        /// Receiver whose raw samples to list (1-3).
        #[arg(long, default_value_t = 1)]
        rssi: u8,
    },
}

#[tokio::main]
async fn main() -> Result<(), ConsoleError> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = cli.config.resolve()?;

    match cli.command {
        Command::Watch { seconds } => run_watch(&config, seconds.map(Duration::from_secs)).await,
        Command::Target { x, y } => run_target(&config, GridCoord::new(x, y)).await,
        Command::Pick { px, py } => run_pick(&config, Point::new(px, py)).await,
        Command::Drive { key, hold_ms } => run_drive(&config, &key, Duration::from_millis(hold_ms)).await,
        Command::Start => {
            let reply = BackendApi::new(&config)?.start_navigation().await?;
            print_json(&reply)
        }
        Command::Logs { day, page } => run_logs(&config, &day, page).await,
        Command::Monitoring { date, rssi } => run_monitoring(&config, &date, rssi).await,
    }
}

async fn run_watch(config: &ConsoleConfig, limit: Option<Duration>) -> Result<(), ConsoleError> {
    let mut session = TrackingSession::start(config)?;
    let deadline = limit.map(|d| Instant::now() + d);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut last_line = String::new();
    loop {
        tokio::select! {
            _ = &mut ctrl_c => break,
            action = session.tick() => {
                if action == Action::RenderNeeded {
                    let line = status_line(&session);
                    if line != last_line {
                        println!("{line}");
                        last_line = line;
                    }
                }
            }
        }
        if deadline.is_some_and(|d| Instant::now() >= d) {
            break;
        }
    }

    session.shutdown().await;
    Ok(())
}

fn status_line(session: &TrackingSession) -> String {
    let device = session.view().device();
    let trail_len = session.channel_state().path_trail().len();
    let readout = session.readout();
    let target = session.view().target_position().map_or_else(|| "-".to_owned(), |t| format!("({:.1}, {:.1})", t.x, t.y));
    format!(
        "{} {} [{}] pos={} us=[{}, {}, {}] trail={} target={}",
        device.id,
        device.name,
        device.status_label(),
        device.position_label(),
        readout.ultrasonic[0],
        readout.ultrasonic[1],
        readout.ultrasonic[2],
        trail_len,
        target,
    )
}

async fn run_target(config: &ConsoleConfig, target: GridCoord) -> Result<(), ConsoleError> {
    let target = target.clamped(GRID_SIZE).rounded();
    BackendApi::new(config)?.set_target_point(target).await?;
    println!("target set: ({:.1}, {:.1})", target.x, target.y);
    Ok(())
}

async fn run_pick(config: &ConsoleConfig, pixel: Point) -> Result<(), ConsoleError> {
    let target = session::pick_target(config.viewport, pixel)
        .ok_or_else(|| ConsoleError::InvalidArgument("no coordinate under pointer".to_owned()))?;
    BackendApi::new(config)?.set_target_point(target).await?;
    println!("target set: ({:.1}, {:.1})", target.x, target.y);
    Ok(())
}

async fn run_drive(config: &ConsoleConfig, key: &str, hold: Duration) -> Result<(), ConsoleError> {
    let direction =
        Direction::from_key(key).ok_or_else(|| ConsoleError::InvalidArgument(format!("unknown drive key `{key}`")))?;
    let api = BackendApi::new(config)?;
    let clock = Instant::now();
    let now_ms = || clock.elapsed().as_secs_f64() * 1000.0;

    let mut controller = DriveController::new();
    controller.set_drive_mode(true, now_ms());
    if let Some(command) = controller.press(direction, now_ms()) {
        eprintln!("{} down", direction.hint());
        print_json(&api.drive(command).await?)?;
    }
    tokio::time::sleep(hold).await;
    if let Some(command) = controller.release(direction, now_ms()) {
        eprintln!("{} up", direction.hint());
        print_json(&api.drive(command).await?)?;
    }
    Ok(())
}

async fn run_logs(config: &ConsoleConfig, day: &str, page: u32) -> Result<(), ConsoleError> {
    let logs = BackendApi::new(config)?.fetch_logs(day, page).await?;
    if logs.data.is_empty() {
        println!("No logs available.");
    }
    for record in &logs.data {
        println!("{:<24} {:<8} {}", record.timestamp, record.status, record.text);
    }
    if logs.total_pages > 1 {
        let current = history::clamp_page(page, logs.total_pages);
        let strip = history::pagination_range(current, logs.total_pages);
        println!("\npage {current}/{}: {}", logs.total_pages, history::format_pagination(&strip, current));
    }
    Ok(())
}

async fn run_monitoring(config: &ConsoleConfig, date: &str, rssi: u8) -> Result<(), ConsoleError> {
    let channel = RssiChannel::from_index(rssi)
        .ok_or_else(|| ConsoleError::InvalidArgument(format!("rssi must be 1, 2 or 3, got {rssi}")))?;
    let records = BackendApi::new(config)?.fetch_monitoring(date).await?;

    println!("rssi{rssi} samples:");
    for point in history::scatter_points(&records, channel) {
        println!("  {} {:.2}", point.time, point.value);
    }

    println!("\n{:<6} {:>24} {:>24} {:>24}", "time", "variance 1/2/3", "median 1/2/3", "mean 1/2/3");
    for row in history::chart_rows(&records) {
        println!("{:<6} {:>24} {:>24} {:>24}", row.time, triple(row.variance), triple(row.median), triple(row.mean));
    }
    Ok(())
}

fn triple(values: [f64; 3]) -> String {
    format!("{:.1}/{:.1}/{:.1}", values[0], values[1], values[2])
}

fn print_json(value: &Value) -> Result<(), ConsoleError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
