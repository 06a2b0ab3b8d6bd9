use super::source::TileSource;
use crate::{
    core::{constants::USER_AGENT, geo::TileCoord},
    prelude::HashSet,
    Error, Result,
};
use crossbeam_channel::{unbounded, Receiver, Sender};
use once_cell::sync::Lazy;
use reqwest::blocking::Client;
use std::{thread, time::Duration};

const MAX_ATTEMPTS: usize = 2;
const RETRY_DELAY: Duration = Duration::from_millis(100);

/// Shared blocking client; public tile servers reject requests without a User-Agent.
static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(30))
        .build()
        .unwrap_or_else(|e| {
            log::warn!("falling back to default tile client: {}", e);
            Client::new()
        })
});

/// Outcome of one tile download
#[derive(Debug)]
pub struct TileResult {
    pub coord: TileCoord,
    pub data: Result<Vec<u8>>,
}

/// Fetch one tile, failing on transport errors and non-success statuses.
pub fn fetch_tile(url: &str) -> Result<Vec<u8>> {
    let response = HTTP_CLIENT.get(url).send()?;
    let status = response.status();
    if !status.is_success() {
        return Err(Error::Http {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }
    Ok(response.bytes()?.to_vec())
}

/// Downloads tiles on detached threads and reports them over a channel.
/// Each coordinate is requested at most once until its result is polled,
/// and a coordinate that failed is not requested again.
pub struct TileLoader {
    tx: Sender<TileResult>,
    rx: Receiver<TileResult>,
    pending: HashSet<TileCoord>,
    failed: HashSet<TileCoord>,
}

impl TileLoader {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self {
            tx,
            rx,
            pending: HashSet::default(),
            failed: HashSet::default(),
        }
    }

    /// Start downloading `coord` unless it is in flight or already failed.
    /// Returns whether a download was started.
    pub fn request(&mut self, source: &dyn TileSource, coord: TileCoord) -> bool {
        if self.pending.contains(&coord) || self.failed.contains(&coord) {
            return false;
        }
        self.pending.insert(coord);

        let url = source.url(coord);
        let tx = self.tx.clone();
        thread::spawn(move || {
            let mut result = fetch_tile(&url);
            for attempt in 2..=MAX_ATTEMPTS {
                let Err(e) = &result else { break };
                log::warn!("tile {:?} attempt {} failed: {}", coord, attempt - 1, e);
                thread::sleep(RETRY_DELAY);
                result = fetch_tile(&url);
            }

            match &result {
                Ok(data) => log::debug!("downloaded tile {:?} ({} bytes)", coord, data.len()),
                Err(e) => log::error!("giving up on tile {:?}: {}", coord, e),
            }
            let _ = tx.send(TileResult { coord, data: result });
        });
        true
    }

    /// Drain every finished download without blocking.
    pub fn poll(&mut self) -> Vec<TileResult> {
        let results: Vec<TileResult> = self.rx.try_iter().collect();
        for result in &results {
            self.settle(result);
        }
        results
    }

    /// Wait up to `timeout` for the next finished download.
    pub fn poll_timeout(&mut self, timeout: Duration) -> Option<TileResult> {
        let result = self.rx.recv_timeout(timeout).ok()?;
        self.settle(&result);
        Some(result)
    }

    fn settle(&mut self, result: &TileResult) {
        self.pending.remove(&result.coord);
        if result.data.is_err() {
            self.failed.insert(result.coord);
        }
    }

    pub fn is_pending(&self, coord: &TileCoord) -> bool {
        self.pending.contains(coord)
    }

    pub fn has_failed(&self, coord: &TileCoord) -> bool {
        self.failed.contains(coord)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Forget failures so the tiles are requested again.
    pub fn reset_failures(&mut self) {
        self.failed.clear();
    }
}

impl Default for TileLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiles::source::TemplateSource;

    #[test]
    fn test_fetch_tile_rejects_bad_url() {
        assert!(fetch_tile("not a url").is_err());
    }

    #[test]
    fn test_failed_tile_is_not_requested_twice() {
        let source = TemplateSource::new("not a url/{z}/{x}/{y}");
        let coord = TileCoord::new(0, 0, 0);
        let mut loader = TileLoader::new();

        assert!(loader.request(&source, coord));
        assert!(!loader.request(&source, coord));
        assert_eq!(loader.pending_count(), 1);

        let result = loader.poll_timeout(Duration::from_secs(10)).unwrap();
        assert_eq!(result.coord, coord);
        assert!(result.data.is_err());
        assert!(!loader.is_pending(&coord));
        assert!(loader.has_failed(&coord));
        assert!(!loader.request(&source, coord));

        loader.reset_failures();
        assert!(loader.request(&source, coord));
    }
}
