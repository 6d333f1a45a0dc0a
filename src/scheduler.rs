//! Scheduler actor
//!
//! Drives the scanner on a fixed cadence and serializes manual triggers.
//! The actor owns nothing but the ticker and the command channel; all scan
//! state lives in the scanner, so a trigger that loses the single-flight
//! race is simply a no-op.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::{mpsc, oneshot};
use tokio::time::interval;
use tracing::{debug, instrument, trace, warn};

use crate::ScanResult;
use crate::scanner::Scanner;
use crate::state::StatusSnapshot;

/// Commands that can be sent to the scheduler
#[derive(Debug)]
pub enum SchedulerCommand {
    /// Trigger an immediate scan (no-op if one is already running)
    ScanNow {
        respond_to: oneshot::Sender<Option<ScanResult>>,
    },

    /// Read the current monitor state
    Snapshot {
        respond_to: oneshot::Sender<StatusSnapshot>,
    },

    /// Gracefully shut down the scheduler
    Shutdown,
}

/// Actor that triggers scans on a timer and on manual request
///
/// The first tick fires immediately, so one scan runs on startup before the
/// timed loop settles into its fixed period. Ticks are spawned rather than
/// awaited inline: the period is measured between tick starts, independent
/// of how long any single scan takes, and the command channel stays
/// responsive while a scan is in flight.
pub struct Scheduler {
    scanner: Arc<Scanner>,
    command_rx: mpsc::Receiver<SchedulerCommand>,
    period: Duration,
}

impl Scheduler {
    pub fn new(
        scanner: Arc<Scanner>,
        command_rx: mpsc::Receiver<SchedulerCommand>,
        period: Duration,
    ) -> Self {
        Self {
            scanner,
            command_rx,
            period,
        }
    }

    #[instrument(skip(self))]
    pub async fn run(mut self) {
        debug!("starting scheduler with period {:?}", self.period);

        let mut ticker = interval(self.period);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    trace!("scheduler tick");
                    let scanner = Arc::clone(&self.scanner);
                    tokio::spawn(async move {
                        scanner.run_scan().await;
                    });
                }

                Some(cmd) = self.command_rx.recv() => {
                    match cmd {
                        SchedulerCommand::ScanNow { respond_to } => {
                            debug!("received ScanNow command");
                            let scanner = Arc::clone(&self.scanner);
                            tokio::spawn(async move {
                                let result = scanner.run_scan().await;
                                let _ = respond_to.send(result);
                            });
                        }

                        SchedulerCommand::Snapshot { respond_to } => {
                            let _ = respond_to.send(self.scanner.snapshot().await);
                        }

                        SchedulerCommand::Shutdown => {
                            debug!("received shutdown command");
                            break;
                        }
                    }
                }

                else => {
                    warn!("command channel closed, shutting down");
                    break;
                }
            }
        }

        debug!("scheduler stopped");
    }
}

/// Handle for controlling a running scheduler
#[derive(Clone)]
pub struct SchedulerHandle {
    sender: mpsc::Sender<SchedulerCommand>,
}

impl SchedulerHandle {
    /// Spawn the scheduler as a tokio task and return its handle
    pub fn spawn(scanner: Arc<Scanner>, period: Duration) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel(32);

        let actor = Scheduler::new(scanner, cmd_rx, period);
        tokio::spawn(actor.run());

        Self { sender: cmd_tx }
    }

    /// Trigger an immediate scan
    ///
    /// Returns the completed scan result, or `None` when a scan was already
    /// in progress and the trigger was absorbed.
    pub async fn scan_now(&self) -> Result<Option<ScanResult>> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(SchedulerCommand::ScanNow { respond_to: tx })
            .await
            .context("failed to send ScanNow command")?;

        rx.await.context("failed to receive scan result")
    }

    /// Read-only snapshot for the presentation layer
    pub async fn snapshot(&self) -> Result<StatusSnapshot> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(SchedulerCommand::Snapshot { respond_to: tx })
            .await
            .context("failed to send Snapshot command")?;

        rx.await.context("failed to receive snapshot")
    }

    /// Gracefully shut down the scheduler
    pub async fn shutdown(&self) -> Result<()> {
        self.sender
            .send(SchedulerCommand::Shutdown)
            .await
            .context("failed to send Shutdown command")?;
        Ok(())
    }
}
