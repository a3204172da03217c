//! Background execution of the screen's network calls.
//!
//! Each [`AppAction`] runs on its own worker thread against a shared
//! [`ProductApi`]; outcomes come back over a channel that the event loop
//! drains between input polls, so all state mutation stays on the UI thread.

use crate::api::{ApiError, ProductApi};
use crate::app_core::state::{AppAction, AppState};
use crate::model::BackendProduct;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

#[derive(Debug)]
pub enum TaskOutcome {
    ProductsLoaded(Result<Vec<BackendProduct>, ApiError>),
    ProductCreated(Result<BackendProduct, ApiError>),
}

impl TaskOutcome {
    /// Feeds the outcome into the matching state transition.
    pub fn apply(self, app: &mut AppState) {
        match self {
            TaskOutcome::ProductsLoaded(result) => app.finish_load(result),
            TaskOutcome::ProductCreated(result) => app.finish_create(result),
        }
    }
}

pub struct TaskRunner {
    api: Arc<dyn ProductApi>,
    tx: Sender<TaskOutcome>,
    rx: Receiver<TaskOutcome>,
    in_flight: usize,
}

impl TaskRunner {
    pub fn new(api: Arc<dyn ProductApi>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            api,
            tx,
            rx,
            in_flight: 0,
        }
    }

    pub fn spawn(&mut self, action: AppAction) -> anyhow::Result<()> {
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        let name = match &action {
            AppAction::LoadProducts => "list-products",
            AppAction::CreateProduct(_) => "create-product",
        };
        log::debug!("Spawning task {}", name);

        thread::Builder::new().name(name.to_string()).spawn(move || {
            let outcome = match action {
                AppAction::LoadProducts => TaskOutcome::ProductsLoaded(api.list_products()),
                AppAction::CreateProduct(product) => {
                    TaskOutcome::ProductCreated(api.create_product(&product))
                }
            };
            // The receiver is gone only when the app is shutting down.
            let _ = tx.send(outcome);
        })?;
        self.in_flight += 1;
        Ok(())
    }

    /// Returns a finished outcome without blocking.
    pub fn try_next(&mut self) -> Option<TaskOutcome> {
        let outcome = self.rx.try_recv().ok()?;
        self.in_flight = self.in_flight.saturating_sub(1);
        Some(outcome)
    }

    /// Blocks for up to `timeout` waiting for an outcome.
    pub fn wait_next(&mut self, timeout: Duration) -> Option<TaskOutcome> {
        match self.rx.recv_timeout(timeout) {
            Ok(outcome) => {
                self.in_flight = self.in_flight.saturating_sub(1);
                Some(outcome)
            }
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Spawns whatever action the last event left pending.
    pub fn dispatch_pending(&mut self, app: &mut AppState) -> anyhow::Result<()> {
        if let Some(action) = app.pending_action.take() {
            self.spawn(action)?;
        }
        Ok(())
    }
}
