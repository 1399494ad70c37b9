use crate::cli::{rates, ui};
use crate::config::AppConfig;
use crate::export;
use crate::tracker::RateTracker;
use anyhow::Result;
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

/// Runs the auto-refresh loop: one `fetch_and_record` per tick until
/// interrupted with ctrl-c. A failed tick logs the error and keeps the
/// loop alive; the previously rendered rates stay on screen.
pub async fn run(
    tracker: &RateTracker,
    config: &AppConfig,
    base: &str,
    interval: Duration,
    export_on_exit: bool,
) -> Result<()> {
    let mut ticker = tokio::time::interval(interval);
    // At most one fetch in flight: a tick that comes due while a fetch
    // is still running is delayed, never stacked.
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!("Auto-refresh started for base {base} every {interval:?}");
    println!(
        "Refreshing rates for {base} every {}s. Press Ctrl-C to stop.\n",
        interval.as_secs()
    );

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match tracker.fetch_and_record(base).await {
                    Ok(snapshot) => {
                        println!("{}\n", rates::render_snapshot(&snapshot, &config.display_currencies));
                    }
                    Err(e) => {
                        warn!("Refresh failed: {e}");
                        eprintln!("{}", ui::style_text(&e.to_string(), ui::StyleType::Error));
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Auto-refresh stopped");
                println!("\nStopped.");
                break;
            }
        }
    }

    if export_on_exit {
        export_session(tracker, config).await?;
    }

    Ok(())
}

async fn export_session(tracker: &RateTracker, config: &AppConfig) -> Result<()> {
    let Some(snapshot) = tracker.latest_snapshot().await else {
        println!("No successful refresh this session, nothing to export.");
        return Ok(());
    };

    let dir = config
        .export_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));
    let history = tracker.history().await;
    let paths = export::export_csv(&dir, &snapshot, &history)?;

    println!(
        "{}",
        ui::style_text(
            &format!("Exported current rates to {}", paths.current.display()),
            ui::StyleType::Success
        )
    );
    if let Some(history_path) = paths.history {
        println!(
            "{}",
            ui::style_text(
                &format!(
                    "Exported {} session snapshots to {}",
                    history.len(),
                    history_path.display()
                ),
                ui::StyleType::Success
            )
        );
    }

    Ok(())
}
