//! Background loading of the state CSV.
//!
//! Each request runs on its own thread and reports through a fresh channel. Starting a
//! new request drops the previous receiver, so a slower, older load can never overwrite
//! the result of a newer one.

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use log::{debug, warn};

use crate::error::LoadError;
use crate::models::StateRecord;
use crate::storage;

pub type LoadResult = Result<Vec<StateRecord>, LoadError>;

/// The most recent load request, if one is still running.
#[derive(Debug, Default)]
pub struct BackgroundLoad {
    receiver: Option<Receiver<LoadResult>>,
    generation: u64,
}

impl BackgroundLoad {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start loading the CSV at `path`, abandoning any load still in flight.
    pub fn start(&mut self, path: PathBuf) {
        self.start_with(move || storage::load_csv(&path));
    }

    /// Run `job` on a worker thread as the current load request.
    pub fn start_with<F>(&mut self, job: F)
    where
        F: FnOnce() -> LoadResult + Send + 'static,
    {
        if self.receiver.is_some() {
            debug!("abandoning load #{}", self.generation);
        }
        self.generation += 1;
        let generation = self.generation;
        let (sender, receiver) = mpsc::channel();
        self.receiver = Some(receiver);

        thread::spawn(move || {
            // The receiver is gone when a newer load replaced this one.
            if sender.send(job()).is_err() {
                debug!("load #{generation} finished after being abandoned");
            }
        });
    }

    pub fn is_pending(&self) -> bool {
        self.receiver.is_some()
    }

    /// Result of the current request once it is done. Never blocks.
    pub fn poll(&mut self) -> Option<LoadResult> {
        let receiver = self.receiver.as_ref()?;
        match receiver.try_recv() {
            Ok(result) => {
                self.receiver = None;
                Some(result)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                warn!("load #{} stopped without a result", self.generation);
                self.receiver = None;
                None
            }
        }
    }

    /// Drop the current request; its result will be discarded.
    pub fn cancel(&mut self) {
        self.receiver = None;
    }
}
