//! Tick scheduling, one reconciliation per tick, and shutdown.

use std::future::Future;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::fetch::{self, TripSource};
use crate::google::{self, CalendarService, GoogleCalendar};
use crate::reconcile::{self, ReconcileStats};

/// Run the bot until shutdown (or after one tick with `--once`).
pub async fn run(config: &Config, shutdown: &CancellationToken) -> Result<()> {
    let tripit = tripit::Client::new(&config.tripit_username, &config.tripit_password);

    if config.once {
        tick(config, &tripit).await?;
        return Ok(());
    }

    let tripit = &tripit;
    run_every(config.interval, shutdown, move || async move {
        tick(config, tripit).await.map(|_| ())
    })
    .await
}

/// Call `tick` immediately and then once per `period`.
///
/// Ticks never overlap: a slow tick delays the next one. Shutdown is only
/// checked between ticks. A tick error ends the loop.
pub async fn run_every<F, Fut>(
    period: Duration,
    shutdown: &CancellationToken,
    mut tick: F,
) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<()>>,
{
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = shutdown.cancelled() => {
                tracing::info!("shutdown requested, stopping");
                return Ok(());
            }
            _ = interval.tick() => {}
        }

        tick().await?;
    }
}

/// One full pass with a fresh Google token.
async fn tick(config: &Config, tripit: &tripit::Client) -> Result<ReconcileStats> {
    let token = google::access_token(&config.google_keyfile).await?;
    let calendar = GoogleCalendar::new(token);

    sync_once(tripit, &calendar, &config.calendar_id, config.include_past).await
}

/// List existing events, fetch flights, and reconcile the two.
pub async fn sync_once<S, C>(
    source: &S,
    calendar: &C,
    calendar_id: &str,
    include_past: bool,
) -> Result<ReconcileStats>
where
    S: TripSource + ?Sized,
    C: CalendarService + ?Sized,
{
    let existing = reconcile::list_existing(calendar, calendar_id, Utc::now()).await?;

    let events = fetch::fetch_events(source, include_past)
        .await
        .context("Failed to fetch flights from TripIt")?;

    tracing::debug!(
        existing = existing.len(),
        events = events.len(),
        "reconciling"
    );

    let stats = reconcile::reconcile(calendar, calendar_id, &existing, &events).await;

    tracing::info!(
        calendar_id,
        created = stats.created,
        updated = stats.updated,
        unchanged = stats.unchanged,
        skipped = stats.skipped,
        failed = stats.failed,
        "sync complete"
    );

    Ok(stats)
}

/// Cancel `shutdown` on SIGINT or SIGTERM.
pub async fn watch_signals(shutdown: CancellationToken) {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = terminate.recv() => {}
                }
            }
            Err(e) => {
                tracing::warn!("cannot listen for SIGTERM: {e}");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }

    tracing::info!("received signal");
    shutdown.cancel();
}
