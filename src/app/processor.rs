use std::{
    sync::mpsc::{self, Receiver, Sender},
    thread,
    time::Instant,
};

use anyhow::{anyhow, Result};

use crate::session::{RemovalJob, RemovalOutcome};

/// Runs removal jobs on a worker thread so the UI keeps repainting.
pub struct Processor {
    job_tx: Sender<RemovalJob>,
    outcome_rx: Receiver<RemovalOutcome>,
    pub busy: bool,
}

impl Default for Processor {
    fn default() -> Self {
        Self::new()
    }
}

impl Processor {
    pub fn new() -> Self {
        let (job_tx, job_rx) = mpsc::channel::<RemovalJob>();
        let (outcome_tx, outcome_rx) = mpsc::channel();

        thread::spawn(move || {
            while let Ok(job) = job_rx.recv() {
                let start = Instant::now();
                let outcome = job.run();
                log::debug!("removal job took {:?}", start.elapsed());
                if outcome_tx.send(outcome).is_err() {
                    break;
                }
            }
        });

        Self {
            job_tx,
            outcome_rx,
            busy: false,
        }
    }

    pub fn submit(&mut self, job: RemovalJob) -> Result<()> {
        self.job_tx
            .send(job)
            .map_err(|e| anyhow!("Failed to send removal job: {}", e))?;
        self.busy = true;
        Ok(())
    }

    pub fn poll(&mut self) -> Option<RemovalOutcome> {
        let outcome = self.outcome_rx.try_recv().ok()?;
        self.busy = false;
        Some(outcome)
    }
}
