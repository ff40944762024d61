use futures::channel::mpsc::UnboundedSender;
use log::{debug, error, info};
use url::Url;

use super::FetchError;
use crate::config::FetchConfig;

/// A request for background bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// The URL the background was set to, as reported in the fetch status
    pub url: Url,
    /// Where the image bytes actually live (see [`crate::background::image_url`])
    pub image_url: Url,
    pub generation: u64,
}

/// The result of a fetch, delivered back to the owning document.
#[derive(Debug)]
pub struct FetchCompletion {
    pub generation: u64,
    pub url: Url,
    pub result: Result<Vec<u8>, FetchError>,
}

/// One-shot handle a fetcher uses to hand its result back to the document.
///
/// Safe to move to another thread. Dropping it without calling
/// [`FetchReply::send`] delivers [`FetchError::Abandoned`], so the document
/// never waits on a fetch that will not complete.
pub struct FetchReply {
    generation: u64,
    url: Url,
    tx: Option<UnboundedSender<FetchCompletion>>,
}

impl std::fmt::Debug for FetchReply {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchReply")
            .field("generation", &self.generation)
            .field("url", &self.url.as_str())
            .field("sent", &self.tx.is_none())
            .finish()
    }
}

impl FetchReply {
    pub(crate) fn new(request: &FetchRequest, tx: UnboundedSender<FetchCompletion>) -> Self {
        Self {
            generation: request.generation,
            url: request.url.clone(),
            tx: Some(tx),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn send(mut self, result: Result<Vec<u8>, FetchError>) {
        self.deliver(result);
    }

    fn deliver(&mut self, result: Result<Vec<u8>, FetchError>) {
        if let Some(tx) = self.tx.take() {
            let completion = FetchCompletion {
                generation: self.generation,
                url: self.url.clone(),
                result,
            };
            // The document may already be gone; nobody is left to tell.
            if tx.unbounded_send(completion).is_err() {
                debug!("Document dropped before fetch of {} completed", self.url);
            }
        }
    }
}

impl Drop for FetchReply {
    fn drop(&mut self) {
        self.deliver(Err(FetchError::Abandoned));
    }
}

/// Fetches background image bytes without blocking the caller.
///
/// Implementations must return promptly and deliver the result later
/// through `reply`, from any thread.
pub trait ImageFetcher: Send + Sync {
    fn fetch(&self, request: FetchRequest, reply: FetchReply);
}

/// Fetches `http(s)://` URLs with `minreq` and `file://` URLs from disk,
/// one background thread per request.
#[derive(Debug, Clone, Default)]
pub struct HttpImageFetcher {
    config: FetchConfig,
}

impl HttpImageFetcher {
    pub fn new(config: FetchConfig) -> Self {
        Self { config }
    }
}

impl ImageFetcher for HttpImageFetcher {
    fn fetch(&self, request: FetchRequest, reply: FetchReply) {
        let config = self.config.clone();
        let spawned = std::thread::Builder::new()
            .name("background-fetch".to_owned())
            .spawn(move || {
                info!("Fetching background from {}", request.image_url);
                let result = fetch_bytes(&request.image_url, &config);
                reply.send(result);
            });

        // On failure the closure, and with it the reply, is dropped and
        // reports the fetch as abandoned.
        if let Err(err) = spawned {
            error!("Failed to spawn background fetch thread: {}", err);
        }
    }
}

/// Blocking fetch of the bytes behind `url`.
pub fn fetch_bytes(url: &Url, config: &FetchConfig) -> Result<Vec<u8>, FetchError> {
    match url.scheme() {
        "http" | "https" => {
            let mut request =
                minreq::get(url.as_str()).with_header("User-Agent", config.user_agent.clone());
            if let Some(secs) = config.timeout_secs {
                request = request.with_timeout(secs);
            }

            let response = request
                .send()
                .map_err(|e| FetchError::Transport(e.to_string()))?;
            if !(200..300).contains(&response.status_code) {
                return Err(FetchError::Status(response.status_code));
            }
            Ok(response.into_bytes())
        }
        "file" => {
            let path = url
                .to_file_path()
                .map_err(|_| FetchError::InvalidPath(url.to_string()))?;
            Ok(std::fs::read(path)?)
        }
        other => Err(FetchError::UnsupportedScheme(other.to_owned())),
    }
}
