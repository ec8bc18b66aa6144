use crate::gateway::PersistenceGateway;
use crate::layout::truncated_days;
use crate::models::{GridYear, YearGrid};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// The page's lifecycle: `Loading` until the year's grid is resolved, then `Ready` for good.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Session {
    Loading,
    Ready(YearGrid),
}

#[derive(Clone)]
pub struct AppState {
    pub year: GridYear,
    pub gateway: PersistenceGateway,
    pub session: Arc<Mutex<Session>>,
}

impl AppState {
    pub fn new(year: GridYear, gateway: PersistenceGateway) -> Self {
        Self {
            year,
            gateway,
            session: Arc::new(Mutex::new(Session::Loading)),
        }
    }

    /// Resolves the year's grid (fetched or freshly stored) and marks the session ready.
    pub async fn initialize(&self) {
        let dropped = truncated_days(self.year);
        if dropped > 0 {
            warn!("{} has {dropped} day(s) past the 365-slot window", self.year);
        }

        let grid = self.gateway.fetch_or_create(self.year).await;
        info!(
            "calendar for {} ready with {} active days",
            self.year,
            grid.active_count()
        );
        *self.session.lock().await = Session::Ready(grid);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::fresh_grid;
    use crate::storage::MemoryStore;

    #[tokio::test]
    async fn initialize_moves_loading_to_ready() {
        let year = GridYear::new(2024).unwrap();
        let state = AppState::new(year, PersistenceGateway::new(Arc::new(MemoryStore::default())));
        assert_eq!(*state.session.lock().await, Session::Loading);

        state.initialize().await;
        assert_eq!(*state.session.lock().await, Session::Ready(fresh_grid(year)));
    }
}
