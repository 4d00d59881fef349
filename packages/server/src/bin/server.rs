//! Realtime whiteboard and shared pomodoro timer server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin kokuban-server
//! cargo run --bin kokuban-server -- --host 0.0.0.0 --port 3000
//! cargo run --bin kokuban-server -- --tick-interval-ms 100 --focus-minutes 1 --break-minutes 1
//! ```

use std::time::Duration;

use clap::Parser;
use kokuban_server::{
    domain::{
        TimerSettings,
        timer::{DEFAULT_BREAK_MINUTES, DEFAULT_FOCUS_MINUTES},
    },
    ui::{Server, state::AppState},
};
use kokuban_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "kokuban-server")]
#[command(about = "Realtime whiteboard and shared pomodoro timer server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "3000")]
    port: u16,

    /// Milliseconds between timer ticks
    #[arg(long, default_value_t = 1000, value_parser = clap::value_parser!(u64).range(1..))]
    tick_interval_ms: u64,

    /// Focus phase length, in minutes, for newly created rooms
    #[arg(long, default_value_t = DEFAULT_FOCUS_MINUTES)]
    focus_minutes: u32,

    /// Break phase length, in minutes, for newly created rooms
    #[arg(long, default_value_t = DEFAULT_BREAK_MINUTES)]
    break_minutes: u32,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    let settings = TimerSettings::new(args.focus_minutes, args.break_minutes);
    tracing::info!(
        "New rooms start with {}m focus / {}m break, ticking every {}ms",
        settings.focus_minutes(),
        settings.break_minutes(),
        args.tick_interval_ms
    );

    let app_state = AppState::in_memory(settings, Duration::from_millis(args.tick_interval_ms));
    let server = Server::new(app_state);
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
