// src/assets/fetcher.rs
//! Content fetcher with bounded manual redirect handling.

use crate::constants::MAX_REDIRECTS;
use crate::error::AppError;
use crate::types::ApiKey;
use reqwest::{header, redirect, Client, StatusCode};
use std::future::Future;
use url::Url;

/// The ability to download the bytes behind a URL.
#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches `url`, following redirects. When `credential` is present it is
    /// sent as a bearer token on every hop that stays on the origin of `url`.
    async fn fetch(&self, url: &str, credential: Option<&ApiKey>) -> Result<Vec<u8>, AppError>;
}

/// Outcome of a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hop {
    Body(Vec<u8>),
    Redirect(String),
    Failed { status: u16, message: String },
}

/// Drives `hop` from `start` until a body arrives.
///
/// `hop` receives each URL and whether the credential may be sent to it.
/// That is the case only when `authenticated` is set and every hop so far
/// stayed on the origin of `start`; once a redirect leaves it, the credential
/// is never sent again. A relative `Location` is resolved against the URL
/// that produced it. More than `MAX_REDIRECTS` redirects fail with
/// `RedirectLoop`.
pub async fn follow_redirects<F, Fut>(
    start: &str,
    authenticated: bool,
    mut hop: F,
) -> Result<Vec<u8>, AppError>
where
    F: FnMut(String, bool) -> Fut,
    Fut: Future<Output = Result<Hop, AppError>>,
{
    let origin = parse_url(start)?.origin();
    let mut current = start.to_string();
    let mut with_credential = authenticated;
    let mut redirects = 0usize;

    loop {
        match hop(current.clone(), with_credential).await? {
            Hop::Body(bytes) => return Ok(bytes),
            Hop::Failed { status, message } => {
                return Err(AppError::fetch_failed(status, message));
            }
            Hop::Redirect(location) => {
                redirects += 1;
                if redirects > MAX_REDIRECTS {
                    return Err(AppError::RedirectLoop {
                        url: start.to_string(),
                        hops: redirects - 1,
                    });
                }
                let next = parse_url(&current)?.join(&location).map_err(|e| {
                    AppError::fetch_failed(0, format!("invalid redirect {}: {}", location, e))
                })?;
                if with_credential && next.origin() != origin {
                    log::debug!("Redirect leaves {}, dropping credential", start);
                    with_credential = false;
                }
                log::debug!("Redirect {} -> {}", current, next);
                current = next.to_string();
            }
        }
    }
}

fn parse_url(url: &str) -> Result<Url, AppError> {
    Url::parse(url).map_err(|e| AppError::fetch_failed(0, format!("invalid URL {}: {}", url, e)))
}

/// Sorts a response by status. `None` means the body should be read.
fn classify_status(status: StatusCode, location: Option<&str>) -> Option<Hop> {
    if status.is_redirection() {
        return Some(match location {
            Some(location) => Hop::Redirect(location.to_string()),
            None => Hop::Failed {
                status: status.as_u16(),
                message: "redirect without a Location header".to_string(),
            },
        });
    }

    if !status.is_success() {
        return Some(Hop::Failed {
            status: status.as_u16(),
            message: status
                .canonical_reason()
                .unwrap_or("unexpected status")
                .to_string(),
        });
    }

    None
}

/// `Fetcher` over reqwest with automatic redirects disabled.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, AppError> {
        let client = Client::builder()
            .redirect(redirect::Policy::none())
            .build()?;
        Ok(Self { client })
    }

    async fn request(&self, url: String, credential: Option<&ApiKey>) -> Result<Hop, AppError> {
        let mut request = self.client.get(&url);
        if let Some(key) = credential {
            request = request.header(header::AUTHORIZATION, key.bearer());
        }

        let response = request.send().await?;
        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok());
        if let Some(hop) = classify_status(response.status(), location) {
            return Ok(hop);
        }

        Ok(Hop::Body(response.bytes().await?.to_vec()))
    }
}

#[async_trait::async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str, credential: Option<&ApiKey>) -> Result<Vec<u8>, AppError> {
        log::debug!("Fetching asset {}", url);
        follow_redirects(url, credential.is_some(), |next, with_credential| {
            self.request(next, credential.filter(|_| with_credential))
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Serves canned hops per URL and records each request with whether the
    /// credential went along.
    struct Script {
        hops: HashMap<String, Hop>,
        seen: Mutex<Vec<(String, bool)>>,
    }

    impl Script {
        fn urls(&self) -> Vec<String> {
            self.seen
                .lock()
                .unwrap()
                .iter()
                .map(|(url, _)| url.clone())
                .collect()
        }

        fn new(entries: &[(&str, Hop)]) -> Self {
            Self {
                hops: entries
                    .iter()
                    .map(|(url, hop)| (url.to_string(), hop.clone()))
                    .collect(),
                seen: Mutex::new(Vec::new()),
            }
        }

        async fn hop(&self, url: String, with_credential: bool) -> Result<Hop, AppError> {
            self.seen.lock().unwrap().push((url.clone(), with_credential));
            Ok(self.hops.get(&url).cloned().unwrap_or(Hop::Failed {
                status: 404,
                message: "Not Found".to_string(),
            }))
        }
    }

    #[tokio::test]
    async fn test_direct_body() {
        let script = Script::new(&[("https://a.test/x.png", Hop::Body(b"png".to_vec()))]);
        let bytes = follow_redirects("https://a.test/x.png", false, |u, c| script.hop(u, c))
            .await
            .unwrap();
        assert_eq!(bytes, b"png");
    }

    #[tokio::test]
    async fn test_relative_location_is_resolved() {
        let script = Script::new(&[
            (
                "https://a.test/files/x",
                Hop::Redirect("/cdn/x.png".to_string()),
            ),
            (
                "https://a.test/cdn/x.png",
                Hop::Redirect("https://b.test/final.png".to_string()),
            ),
            ("https://b.test/final.png", Hop::Body(b"ok".to_vec())),
        ]);

        let bytes = follow_redirects("https://a.test/files/x", false, |u, c| script.hop(u, c))
            .await
            .unwrap();
        assert_eq!(bytes, b"ok");
        assert_eq!(
            script.urls(),
            vec![
                "https://a.test/files/x",
                "https://a.test/cdn/x.png",
                "https://b.test/final.png"
            ]
        );
    }

    #[tokio::test]
    async fn test_five_redirects_are_followed() {
        let mut entries = Vec::new();
        for i in 0..5 {
            entries.push((
                format!("https://a.test/{}", i),
                Hop::Redirect(format!("/{}", i + 1)),
            ));
        }
        entries.push(("https://a.test/5".to_string(), Hop::Body(b"end".to_vec())));
        let refs: Vec<(&str, Hop)> = entries
            .iter()
            .map(|(u, h)| (u.as_str(), h.clone()))
            .collect();
        let script = Script::new(&refs);

        let bytes = follow_redirects("https://a.test/0", false, |u, c| script.hop(u, c))
            .await
            .unwrap();
        assert_eq!(bytes, b"end");
    }

    #[tokio::test]
    async fn test_redirect_loop_is_bounded() {
        let script = Script::new(&[
            ("https://a.test/a", Hop::Redirect("/b".to_string())),
            ("https://a.test/b", Hop::Redirect("/a".to_string())),
        ]);

        let result = follow_redirects("https://a.test/a", false, |u, c| script.hop(u, c)).await;
        match result {
            Err(AppError::RedirectLoop { url, hops }) => {
                assert_eq!(url, "https://a.test/a");
                assert_eq!(hops, MAX_REDIRECTS);
            }
            other => panic!("Expected RedirectLoop, got {:?}", other),
        }
        assert_eq!(script.seen.lock().unwrap().len(), MAX_REDIRECTS + 1);
    }

    #[tokio::test]
    async fn test_failure_status_is_reported() {
        let script = Script::new(&[(
            "https://a.test/private",
            Hop::Failed {
                status: 403,
                message: "Forbidden".to_string(),
            },
        )]);

        let result =
            follow_redirects("https://a.test/private", false, |u, c| script.hop(u, c)).await;
        assert!(matches!(
            result,
            Err(AppError::FetchFailed { status: 403, .. })
        ));
    }

    #[tokio::test]
    async fn test_credential_stays_on_the_starting_origin() {
        let script = Script::new(&[
            (
                "https://a.test/files/x",
                Hop::Redirect("/signed/x".to_string()),
            ),
            (
                "https://a.test/signed/x",
                Hop::Redirect("https://b.test/bucket/x".to_string()),
            ),
            (
                "https://b.test/bucket/x",
                Hop::Redirect("https://a.test/again".to_string()),
            ),
            ("https://a.test/again", Hop::Body(b"ok".to_vec())),
        ]);

        let bytes = follow_redirects("https://a.test/files/x", true, |u, c| script.hop(u, c))
            .await
            .unwrap();
        assert_eq!(bytes, b"ok");
        assert_eq!(
            *script.seen.lock().unwrap(),
            vec![
                ("https://a.test/files/x".to_string(), true),
                ("https://a.test/signed/x".to_string(), true),
                ("https://b.test/bucket/x".to_string(), false),
                ("https://a.test/again".to_string(), false),
            ]
        );
    }

    #[tokio::test]
    async fn test_unauthenticated_fetch_never_sends_credential() {
        let script = Script::new(&[
            ("https://a.test/x", Hop::Redirect("/y".to_string())),
            ("https://a.test/y", Hop::Body(b"y".to_vec())),
        ]);

        follow_redirects("https://a.test/x", false, |u, c| script.hop(u, c))
            .await
            .unwrap();
        assert!(script.seen.lock().unwrap().iter().all(|(_, sent)| !sent));
    }

    #[test]
    fn test_any_success_status_reads_the_body() {
        for code in [200, 201, 203, 206] {
            let status = StatusCode::from_u16(code).unwrap();
            assert_eq!(classify_status(status, None), None, "status {}", code);
        }
    }

    #[test]
    fn test_redirect_status_needs_location() {
        assert_eq!(
            classify_status(StatusCode::FOUND, Some("/next")),
            Some(Hop::Redirect("/next".to_string()))
        );
        assert!(matches!(
            classify_status(StatusCode::FOUND, None),
            Some(Hop::Failed { status: 302, .. })
        ));
        assert!(matches!(
            classify_status(StatusCode::NOT_MODIFIED, None),
            Some(Hop::Failed { status: 304, .. })
        ));
    }

    #[test]
    fn test_error_status_fails_with_reason() {
        assert_eq!(
            classify_status(StatusCode::NOT_FOUND, None),
            Some(Hop::Failed {
                status: 404,
                message: "Not Found".to_string(),
            })
        );
        assert!(matches!(
            classify_status(StatusCode::INTERNAL_SERVER_ERROR, None),
            Some(Hop::Failed { status: 500, .. })
        ));
    }
}
