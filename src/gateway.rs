//! Reads and writes year grids through a [`DocumentStore`].
//!
//! Loading a year is two explicit steps: [`PersistenceGateway::load_year`]
//! queries the store and [`PersistenceGateway::create_year`] stores a fresh
//! grid when nothing was found. Toggles write the whole grid through a
//! single background writer, one write per toggle, in toggle order.

use crate::errors::StoreError;
use crate::layout::fresh_grid;
use crate::models::{GridYear, Toggle, YearDocument, YearGrid};
use crate::storage::DocumentStore;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info};

#[derive(Clone)]
pub struct PersistenceGateway {
    store: Arc<dyn DocumentStore>,
    writer: mpsc::UnboundedSender<WriteJob>,
}

enum WriteJob {
    Save { year: GridYear, grid: YearGrid },
    Flush(oneshot::Sender<()>),
}

impl PersistenceGateway {
    /// Must be called inside a tokio runtime; spawns the writer task.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        let (writer, jobs) = mpsc::unbounded_channel();
        tokio::spawn(run_writer(Arc::clone(&store), jobs));
        Self { store, writer }
    }

    /// `None` when the year has no document. Read failures count as absent.
    pub async fn load_year(&self, year: GridYear) -> Option<YearGrid> {
        match self.store.get(&year.document_id()).await {
            Ok(Some(document)) => Some(document.calendar_data),
            Ok(None) => None,
            Err(err) => {
                error!("failed to load calendar for {year}: {err}");
                None
            }
        }
    }

    /// Builds and stores a fresh grid. The grid is returned even if the write fails.
    pub async fn create_year(&self, year: GridYear) -> YearGrid {
        let grid = fresh_grid(year);
        match self.save_year(year, &grid).await {
            Ok(()) => info!("created calendar for {year}"),
            Err(err) => error!("failed to store new calendar for {year}: {err}"),
        }
        grid
    }

    pub async fn fetch_or_create(&self, year: GridYear) -> YearGrid {
        match self.load_year(year).await {
            Some(grid) => grid,
            None => self.create_year(year).await,
        }
    }

    pub async fn save_year(&self, year: GridYear, grid: &YearGrid) -> Result<(), StoreError> {
        let document = YearDocument {
            calendar_data: grid.clone(),
        };
        self.store.set(&year.document_id(), &document).await
    }

    /// Flips one slot and, if a cell changed, queues a write of the whole grid.
    pub fn toggle_cell(&self, year: GridYear, grid: &mut YearGrid, index: usize) -> Toggle {
        let outcome = grid.toggle(index);
        if let Toggle::Flipped(_) = outcome {
            let job = WriteJob::Save {
                year,
                grid: grid.clone(),
            };
            if self.writer.send(job).is_err() {
                error!("calendar writer is gone, dropping save for {year}");
            }
        }
        outcome
    }

    /// Waits until every write queued before this call has been attempted.
    pub async fn flush(&self) {
        let (done, wait) = oneshot::channel();
        if self.writer.send(WriteJob::Flush(done)).is_ok() {
            let _ = wait.await;
        }
    }
}

async fn run_writer(store: Arc<dyn DocumentStore>, mut jobs: mpsc::UnboundedReceiver<WriteJob>) {
    while let Some(job) = jobs.recv().await {
        match job {
            WriteJob::Save { year, grid } => {
                let document = YearDocument { calendar_data: grid };
                match store.set(&year.document_id(), &document).await {
                    Ok(()) => debug!("saved calendar for {year}"),
                    Err(err) => error!("failed to save calendar for {year}: {err}"),
                }
            }
            WriteJob::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
}
