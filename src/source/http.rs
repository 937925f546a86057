/// HTTP resource source backed by the synchronous `ureq` client.
///
/// Paths are joined onto a base URL. No timeout is applied unless one is
/// configured, matching the behavior of a plain browser `fetch`.
use std::io::Read;
use std::time::Duration;

use anyhow::Result;
use url::Url;

use super::{FetchError, Origin, ResourceSource, normalize_path};

pub struct HttpSource {
    base: Url,
    agent: ureq::Agent,
}

impl HttpSource {
    /// Build a source rooted at `base_url`.
    ///
    /// A trailing `/` is added when missing so relative joins stay under the
    /// base path.
    pub fn new(base_url: &str, timeout_ms: Option<u64>) -> Result<Self> {
        let mut base = base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        // "localhost" may resolve to ::1 first and stall when the server only
        // binds IPv4.
        let base = base.replace("://localhost", "://127.0.0.1");
        let base = Url::parse(&base).map_err(|e| anyhow::anyhow!("invalid base URL {base}: {e}"))?;

        let mut builder = ureq::AgentBuilder::new();
        if let Some(ms) = timeout_ms {
            builder = builder.timeout(Duration::from_millis(ms));
        }

        Ok(Self {
            base,
            agent: builder.build(),
        })
    }

    fn url_for(&self, path: &str) -> Result<Url, FetchError> {
        let path = normalize_path(path)?;
        self.base
            .join(&path)
            .map_err(|_| FetchError::InvalidPath(path))
    }
}

impl ResourceSource for HttpSource {
    fn fetch(&self, path: &str) -> Result<Vec<u8>, FetchError> {
        let url = self.url_for(path)?;
        tracing::debug!(url = %url, "fetching");

        match self.agent.get(url.as_str()).call() {
            Ok(resp) => {
                let mut bytes = Vec::new();
                resp.into_reader().read_to_end(&mut bytes)?;
                Ok(bytes)
            }
            Err(ureq::Error::Status(code, resp)) => Err(FetchError::Status {
                code,
                reason: resp.status_text().to_string(),
            }),
            Err(ureq::Error::Transport(t)) => Err(FetchError::Transport(t.to_string())),
        }
    }

    fn origin(&self) -> Origin {
        Origin::Http
    }

    fn locate(&self, path: &str) -> String {
        match self.url_for(path) {
            Ok(url) => url.to_string(),
            Err(_) => format!("{}{path}", self.base),
        }
    }
}
