//! In-memory home backend.
//!
//! Stands in for the vendor home service when no cloud backend is wired,
//! and backs the provisioning integration tests.

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use dp_core::ids::HomeId;
use dp_core::ports::{HomeBackendError, HomeBackendPort};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeRecord {
    pub id: HomeId,
    pub name: String,
}

#[derive(Default)]
struct State {
    homes: Vec<HomeRecord>,
    current: Option<HomeId>,
    failure: Option<String>,
}

#[derive(Default)]
pub struct InMemoryHomeBackend {
    state: Mutex<State>,
}

impl InMemoryHomeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend seeded with existing homes and no current selection.
    pub fn with_homes<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let homes = names
            .into_iter()
            .map(|name| HomeRecord {
                id: HomeId::new(),
                name: name.into(),
            })
            .collect();
        Self {
            state: Mutex::new(State {
                homes,
                ..State::default()
            }),
        }
    }

    /// Makes every subsequent request fail with `HomeBackendError::Request`.
    pub async fn fail_requests(&self, reason: impl Into<String>) {
        self.state.lock().await.failure = Some(reason.into());
    }

    pub async fn homes(&self) -> Vec<HomeRecord> {
        self.state.lock().await.homes.clone()
    }

    pub async fn current(&self) -> Option<HomeId> {
        self.state.lock().await.current.clone()
    }
}

impl State {
    fn check(&self) -> Result<(), HomeBackendError> {
        match &self.failure {
            Some(reason) => Err(HomeBackendError::Request(reason.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl HomeBackendPort for InMemoryHomeBackend {
    async fn current_home(&self) -> Result<Option<HomeId>, HomeBackendError> {
        let state = self.state.lock().await;
        state.check()?;
        Ok(state.current.clone())
    }

    async fn list_homes(&self) -> Result<Vec<HomeId>, HomeBackendError> {
        let state = self.state.lock().await;
        state.check()?;
        Ok(state.homes.iter().map(|home| home.id.clone()).collect())
    }

    async fn create_home(&self, name: &str) -> Result<HomeId, HomeBackendError> {
        let mut state = self.state.lock().await;
        state.check()?;
        let id = HomeId::new();
        state.homes.push(HomeRecord {
            id: id.clone(),
            name: name.to_string(),
        });
        debug!(home_id = %id, name = %name, "home created");
        Ok(id)
    }

    async fn set_current_home(&self, home_id: &HomeId) -> Result<(), HomeBackendError> {
        let mut state = self.state.lock().await;
        state.check()?;
        if !state.homes.iter().any(|home| &home.id == home_id) {
            return Err(HomeBackendError::NotFound(home_id.to_string()));
        }
        state.current = Some(home_id.clone());
        Ok(())
    }
}
