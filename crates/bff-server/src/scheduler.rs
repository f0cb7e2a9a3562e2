//! Cron scheduler for the daily report.
//!
//! When `[report] cron` is configured, a background task evaluates the cron
//! expression on a fixed check interval and triggers the same
//! compose-and-send path as POST /cron/daily-bff-report. Missed runs are not
//! caught up.

use std::time::Duration;

use croner::Cron;
use time::OffsetDateTime;
use tokio::sync::watch;
use tokio::time::interval;
use tracing::{debug, error, info};

use crate::report;
use crate::server::AppState;

/// Configuration for the report scheduler.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// How often to check whether a run is due (in seconds).
    pub check_interval_secs: u64,
}

/// Background scheduler that emails the daily report on a cron schedule.
pub struct ReportScheduler {
    state: AppState,
    cron: Cron,
    config: SchedulerConfig,
    last_run: Option<OffsetDateTime>,
}

impl ReportScheduler {
    /// Build a scheduler from the app configuration.
    ///
    /// Returns `None` when no `[report] cron` is configured, or when the
    /// expression does not parse (config validation normally rejects that
    /// before this point).
    pub fn from_config(state: AppState) -> Option<Self> {
        let expr = state.config.report.cron.clone()?;

        let cron = match Cron::new(&expr).parse() {
            Ok(c) => c,
            Err(e) => {
                error!(cron_expression = %expr, error = %e, "Invalid cron expression");
                return None;
            }
        };

        let check_interval_secs = state.config.report.check_interval_secs;

        Some(Self {
            state,
            cron,
            config: SchedulerConfig {
                check_interval_secs,
            },
            last_run: None,
        })
    }

    /// Start the scheduler in a background task.
    ///
    /// Returns a shutdown sender that can be used to stop the scheduler.
    pub fn start(mut self) -> watch::Sender<bool> {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        tokio::spawn(async move {
            info!(
                check_interval_secs = self.config.check_interval_secs,
                "Report scheduler started"
            );

            let mut ticker = interval(Duration::from_secs(self.config.check_interval_secs));

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        self.tick().await;
                    }
                    _ = shutdown_rx.changed() => {
                        if *shutdown_rx.borrow() {
                            info!("Report scheduler shutting down");
                            break;
                        }
                    }
                }
            }
        });

        shutdown_tx
    }

    async fn tick(&mut self) {
        let now = OffsetDateTime::now_utc();
        if self.should_run(now, self.last_run) {
            // Update last run time before executing
            self.last_run = Some(now);
            self.run_report().await;
        }
    }

    /// Check whether a run is due based on the cron schedule.
    fn should_run(&self, now: OffsetDateTime, last_run: Option<OffsetDateTime>) -> bool {
        // croner evaluates against chrono timestamps
        let now_chrono = chrono::DateTime::from_timestamp(now.unix_timestamp(), 0)
            .unwrap_or_else(chrono::Utc::now);

        // Step back two check intervals and look forward to find the most
        // recent scheduled occurrence.
        let check_window = chrono::Duration::seconds(self.config.check_interval_secs as i64 * 2);
        let past_time = now_chrono - check_window;

        let prev = match self.cron.find_next_occurrence(&past_time, false) {
            Ok(prev) => prev,
            Err(_) => return false,
        };

        let window_secs = self.config.check_interval_secs as i64;
        let now_ts = now_chrono.timestamp();
        let prev_ts = prev.timestamp();

        // Skip if the occurrence is still in the future
        if prev_ts > now_ts {
            return false;
        }

        match last_run {
            // Only run if the occurrence is within the current check window
            None => (now_ts - prev_ts).abs() < window_secs,
            Some(last) => {
                prev_ts > last.unix_timestamp() && (now_ts - prev_ts).abs() < window_secs
            }
        }
    }

    async fn run_report(&self) {
        debug!("Executing scheduled daily report");

        let report = report::compose();
        let recipient = &self.state.config.report.recipient;

        match report::deliver(&self.state.email, recipient, &report).await {
            Ok(outcome) => info!(
                delivery = ?outcome.status,
                recipient = %recipient,
                "Scheduled report delivered"
            ),
            Err(e) => error!(error = %e, "Scheduled report delivery failed"),
        }
    }
}
