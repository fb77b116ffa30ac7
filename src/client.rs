//! HTTP access to the meteor backend.
//!
//! Each fetch runs off the main thread and reports back over a channel:
//! native builds use a blocking `ureq` call on its own thread, wasm builds
//! go through the browser's `fetch` on the local event loop.

use std::sync::mpsc;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use serde::Deserialize;

use crate::error::FetchError;
use crate::meteor::MeteorEvent;

/// Outcome of one backend fetch.
pub type FetchResult = Result<Vec<MeteorEvent>, FetchError>;

/// Upper bound on a whole native request, connect through body.
#[cfg(not(target_arch = "wasm32"))]
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Error body returned by the backend on non-2xx responses.
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

/// Interpret a raw HTTP response.
pub fn decode_response(status: u16, body: &str) -> FetchResult {
    if (200..300).contains(&status) {
        return serde_json::from_str(body).map_err(|e| FetchError::Decode(e.to_string()));
    }

    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error);
    Err(FetchError::Server { status, message })
}

/// Start fetching `url`; the result arrives on the returned channel.
#[cfg(not(target_arch = "wasm32"))]
pub fn spawn_fetch(url: String) -> mpsc::Receiver<FetchResult> {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let result = fetch_meteors(&http_agent(REQUEST_TIMEOUT), &url);
        // The receiver is gone when a newer request superseded this one.
        let _ = tx.send(result);
    });
    rx
}

/// Start fetching `url`; the result arrives on the returned channel.
#[cfg(target_arch = "wasm32")]
pub fn spawn_fetch(url: String) -> mpsc::Receiver<FetchResult> {
    let (tx, rx) = mpsc::channel();
    wasm_bindgen_futures::spawn_local(async move {
        let _ = tx.send(fetch_meteors(&url).await);
    });
    rx
}

/// HTTP agent whose requests give up after `timeout`.
#[cfg(not(target_arch = "wasm32"))]
pub fn http_agent(timeout: Duration) -> ureq::Agent {
    ureq::AgentBuilder::new().timeout(timeout).build()
}

/// Fetch and decode the meteor list at `url`, blocking the calling thread.
#[cfg(not(target_arch = "wasm32"))]
pub fn fetch_meteors(agent: &ureq::Agent, url: &str) -> FetchResult {
    let (status, body) = match agent.get(url).call() {
        Ok(response) => {
            let status = response.status();
            let body = response
                .into_string()
                .map_err(|e| FetchError::Network(format!("read error: {e}")))?;
            (status, body)
        }
        Err(ureq::Error::Status(status, response)) => {
            (status, response.into_string().unwrap_or_default())
        }
        Err(ureq::Error::Transport(transport)) => {
            return Err(FetchError::Network(transport.to_string()));
        }
    };
    decode_response(status, &body)
}

/// Fetch and decode the meteor list at `url`.
#[cfg(target_arch = "wasm32")]
async fn fetch_meteors(url: &str) -> FetchResult {
    use wasm_bindgen::JsCast as _;
    use web_sys::{Request, RequestInit, Response};

    let opts = RequestInit::new();
    opts.set_method("GET");

    let request = Request::new_with_str_and_init(url, &opts)
        .map_err(|e| FetchError::Network(format!("{e:?}")))?;

    let window = web_sys::window().ok_or_else(|| FetchError::Network("no window".to_string()))?;
    let resp_value = wasm_bindgen_futures::JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|e| FetchError::Network(format!("fetch failed: {e:?}")))?;

    let resp: Response = resp_value
        .dyn_into()
        .map_err(|_| FetchError::Network("response is not a Response".to_string()))?;

    let text = wasm_bindgen_futures::JsFuture::from(
        resp.text().map_err(|e| FetchError::Network(format!("{e:?}")))?,
    )
    .await
    .map_err(|e| FetchError::Network(format!("{e:?}")))?;

    decode_response(resp.status(), &text.as_string().unwrap_or_default())
}
