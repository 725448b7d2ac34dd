// src/application/view_state.rs
//
// Observable UI state.
//
// A StateHolder publishes the lifecycle of one kind of request
// (Idle → Loading → Success | Error) on a tokio watch channel. Service
// calls are blocking SQLite work, so they run on the blocking pool.

use tokio::sync::watch;

use crate::application::error_handling::ErrorResponse;
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Success(T),
    Error(ErrorResponse),
}

impl<T> ViewState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            ViewState::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ErrorResponse> {
        match self {
            ViewState::Error(error) => Some(error),
            _ => None,
        }
    }
}

pub struct StateHolder<T> {
    tx: watch::Sender<ViewState<T>>,
}

impl<T> StateHolder<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(ViewState::Idle);
        Self { tx }
    }

    /// Stream of state changes. The receiver sees the current value first.
    pub fn subscribe(&self) -> watch::Receiver<ViewState<T>> {
        self.tx.subscribe()
    }

    pub fn current(&self) -> ViewState<T> {
        self.tx.borrow().clone()
    }

    pub fn reset(&self) {
        self.tx.send_replace(ViewState::Idle);
    }

    /// Publish Loading, run `f` on the blocking pool, then publish its outcome.
    /// Returns the state that was published last.
    pub async fn run<F>(&self, f: F) -> ViewState<T>
    where
        F: FnOnce() -> AppResult<T> + Send + 'static,
    {
        self.tx.send_replace(ViewState::Loading);

        let result = match tokio::task::spawn_blocking(f).await {
            Ok(result) => result,
            Err(join_error) => Err(AppError::Other(format!("Background task failed: {}", join_error))),
        };

        let state = match result {
            Ok(value) => ViewState::Success(value),
            Err(error) => ViewState::Error(ErrorResponse::from_app_error(error)),
        };

        self.tx.send_replace(state.clone());
        state
    }
}

impl<T> Default for StateHolder<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
