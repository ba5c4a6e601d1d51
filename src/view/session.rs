//! Interactive navigation with concurrent fetches.
//!
//! A [`Session`] wraps a [`ViewController`] for long-lived clients. Fetches
//! run on the tokio runtime and report back over a channel, so the user can
//! keep navigating while a slow query is pending. Whatever arrives is handed
//! to the controller, which discards results for routes no longer mounted.

use super::{
    controller::{Applied, Completion, ViewController},
    route::Route,
};
use crate::{resolve::Resolver, store::DataSource};
use std::sync::Arc;
use tokio::sync::mpsc;

pub struct Session<S> {
    controller: ViewController,
    source: Arc<S>,
    resolver: Arc<Resolver>,
    tx: mpsc::UnboundedSender<Completion>,
    rx: mpsc::UnboundedReceiver<Completion>,
    in_flight: usize,
}

impl<S: DataSource + 'static> Session<S> {
    pub fn new(controller: ViewController, source: Arc<S>, resolver: Arc<Resolver>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            controller,
            source,
            resolver,
            tx,
            rx,
            in_flight: 0,
        }
    }

    pub fn controller(&self) -> &ViewController {
        &self.controller
    }

    pub fn source(&self) -> &Arc<S> {
        &self.source
    }

    /// Fetches started but not yet received.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Mount `route` and start its fetch in the background.
    pub fn navigate(&mut self, route: Route) {
        let Some(fetch) = self.controller.mount(route) else {
            return;
        };

        let source = Arc::clone(&self.source);
        let resolver = Arc::clone(&self.resolver);
        let tx = self.tx.clone();
        self.in_flight += 1;

        tokio::spawn(async move {
            let completion = fetch.run(source.as_ref(), &resolver).await;
            // Receiver gone means the session ended; nothing left to update
            let _ = tx.send(completion);
        });
    }

    /// Wait for the next fetch to finish and apply it.
    ///
    /// Returns `None` when nothing is in flight.
    pub async fn next_completion(&mut self) -> Option<Applied> {
        if self.in_flight == 0 {
            return None;
        }
        let completion = self.rx.recv().await?;
        self.in_flight -= 1;
        Some(self.controller.complete(completion))
    }

    /// Apply every outstanding fetch.
    pub async fn settle(&mut self) {
        while self.next_completion().await.is_some() {}
    }

    /// Unmount the current view and drop interest in pending fetches.
    pub fn leave(&mut self) {
        self.controller.unmount();
    }
}
