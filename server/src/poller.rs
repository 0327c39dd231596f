use routemap::dispatcher::Dispatcher;
use routemap::error::Result;
use routemap::session::SessionStore;
use routemap::telegram::{TelegramClient, Update};
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

const RETRY_DELAY_MS: u64 = 5000;

/// Offset for the next `getUpdates` call: one past the highest update seen.
pub fn next_offset(current: Option<i64>, updates: &[Update]) -> Option<i64> {
    updates
        .iter()
        .map(|u| u.update_id + 1)
        .max()
        .max(current)
}

pub struct Poller<'a, S> {
    client: TelegramClient,
    dispatcher: Dispatcher<'a, S>,
    poll_timeout_secs: u64,
    offset: Option<i64>,
}

impl<'a, S: SessionStore> Poller<'a, S> {
    pub fn new(
        client: TelegramClient,
        dispatcher: Dispatcher<'a, S>,
        poll_timeout_secs: u64,
    ) -> Self {
        Self {
            client,
            dispatcher,
            poll_timeout_secs,
            offset: None,
        }
    }

    pub fn offset(&self) -> Option<i64> {
        self.offset
    }

    pub fn dispatcher(&self) -> &Dispatcher<'a, S> {
        &self.dispatcher
    }

    /// Fetches one batch of updates and handles them in arrival order.
    pub async fn poll_once(&mut self) -> Result<usize> {
        let updates = self.fetch().await?;
        Ok(self.handle(&updates).await)
    }

    async fn fetch(&self) -> Result<Vec<Update>> {
        self.client
            .get_updates(self.offset, self.poll_timeout_secs)
            .await
    }

    // Runs to completion once started: a batch is never cut short, and the
    // offset always moves past it.
    async fn handle(&mut self, updates: &[Update]) -> usize {
        for update in updates {
            self.dispatcher.dispatch(update, &self.client).await;
        }

        self.offset = next_offset(self.offset, updates);
        updates.len()
    }

    // Telegram only forgets updates below the offset of a later `getUpdates`.
    async fn confirm_offset(&self) {
        let Some(offset) = self.offset else {
            return;
        };
        match self.client.get_updates(Some(offset), 0).await {
            Ok(_) => debug!("Confirmed updates below {}", offset),
            Err(e) => warn!("Failed to confirm offset {}: {}", offset, e),
        }
    }

    pub async fn run_with_shutdown(mut self, mut shutdown_rx: broadcast::Receiver<()>) {
        info!("Polling for updates (timeout {}s)", self.poll_timeout_secs);

        loop {
            let fetched = tokio::select! {
                biased;
                _ = shutdown_rx.recv() => break,
                result = self.fetch() => result,
            };

            match fetched {
                Ok(updates) => {
                    let count = self.handle(&updates).await;
                    if count > 0 {
                        debug!("Handled {} update(s)", count);
                    }
                }
                Err(e) => {
                    error!("Polling failed: {}", e);
                    tokio::select! {
                        () = tokio::time::sleep(Duration::from_millis(RETRY_DELAY_MS)) => {}
                        _ = shutdown_rx.recv() => break,
                    }
                }
            }
        }

        self.confirm_offset().await;
        info!("Polling stopped");
    }
}
