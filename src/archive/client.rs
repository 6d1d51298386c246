//! HTTP client for the archive.org lending library.
//!
//! The session lives in a cookie jar shared by two clients. The retrying one
//! carries the idempotent GETs for the login form and metadata and retries
//! transient failures at the transport level. The other never retries: it
//! sends the login and loan form posts, which must not be repeated behind
//! the caller's back, and the page image requests, so a page gets exactly
//! the attempts the download loop grants it.

use super::metadata::{BookReaderReply, ItemMetadata, LoanReply};
use crate::config::Credentials;
use crate::error::{Error, Result};
use crate::http::{create_http_client, HttpClientConfig};
use crate::service::{LendingService, PageSource};

use async_trait::async_trait;
use reqwest::{
    cookie::Jar,
    header::{CONTENT_TYPE, REFERER},
    Response, Url,
};
use reqwest_middleware::ClientWithMiddleware;
use std::fmt;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

/// Where archive.org lives.
pub const ARCHIVE_BASE_URL: &str = "https://archive.org";

const LOGIN_PATH: &str = "account/login";
const SEARCH_INSIDE_PATH: &str = "services/loans/loan/searchInside.php";
const LOAN_PATH: &str = "services/loans/loan/";

/// Talks to archive.org on behalf of one user and one book.
pub struct ArchiveClient {
    base: Url,
    client: ClientWithMiddleware,
    single_shot: ClientWithMiddleware,
    pages: Mutex<Vec<Url>>,
}

impl fmt::Debug for ArchiveClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArchiveClient")
            .field("base", &self.base.as_str())
            .field("pages", &self.page_uris().len())
            .finish()
    }
}

impl ArchiveClient {
    /// Create a client for the service at `base_url`.
    ///
    /// `http.retries` applies to the login form and metadata GETs only.
    pub fn new(base_url: &str, http: HttpClientConfig) -> Result<Self> {
        let mut base = Url::parse(base_url)
            .map_err(|e| Error::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let jar = http
            .cookies
            .clone()
            .unwrap_or_else(|| Arc::new(Jar::default()));
        let client = create_http_client(HttpClientConfig {
            cookies: Some(jar.clone()),
            ..http.clone()
        })?;
        let single_shot = create_http_client(HttpClientConfig {
            retries: 0,
            cookies: Some(jar),
            ..http
        })?;

        Ok(Self {
            base,
            client,
            single_shot,
            pages: Mutex::new(Vec::new()),
        })
    }

    /// Base URL requests are made against.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Page image locations found by the last [`page_count`] call.
    ///
    /// [`page_count`]: LendingService::page_count
    pub fn page_uris(&self) -> Vec<Url> {
        self.pages
            .lock()
            .map(|pages| pages.clone())
            .unwrap_or_default()
    }

    fn page_url(&self, index: u32) -> Result<Url> {
        let pages = self
            .pages
            .lock()
            .map_err(|_| Error::Internal("page list lock poisoned".into()))?;
        pages
            .get(index as usize)
            .cloned()
            .ok_or_else(|| Error::Metadata(format!("page {} is not part of the book", index + 1)))
    }

    fn store_pages(&self, pages: Vec<Url>) -> Result<()> {
        let mut stored = self
            .pages
            .lock()
            .map_err(|_| Error::Internal("page list lock poisoned".into()))?;
        *stored = pages;
        Ok(())
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base
            .join(path)
            .map_err(|e| Error::InvalidUrl(format!("{}{}: {}", self.base, path, e)))
    }

    async fn post_form(&self, url: Url, fields: &[(&str, &str)]) -> Result<Response> {
        let body = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(fields)
            .finish();
        let res = self
            .single_shot
            .post(url)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header(REFERER, self.base.as_str())
            .body(body)
            .send()
            .await?;
        Ok(res)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: Url) -> Result<T> {
        debug!("Fetching {}", url);
        let body = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn loan_step(&self, path: &str, action: &str, book_id: &str) -> Result<()> {
        debug!("Loan step {} for {}", action, book_id);
        let res = self
            .post_form(
                self.endpoint(path)?,
                &[("action", action), ("identifier", book_id)],
            )
            .await?;
        let status = res.status();
        let body = res.text().await?;

        let reply: LoanReply = serde_json::from_str(&body)
            .map_err(|_| Error::LoanFailed(format!("unexpected reply to {} ({})", action, status)))?;
        if !status.is_success() || !reply.success {
            return Err(Error::LoanFailed(
                reply
                    .error
                    .unwrap_or_else(|| format!("{} was refused ({})", action, status)),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl LendingService for ArchiveClient {
    async fn login(&self, credentials: &Credentials) -> Result<()> {
        let url = self.endpoint(LOGIN_PATH)?;

        // The login form expects the cookies handed out with the page.
        self.client
            .get(url.clone())
            .send()
            .await?
            .error_for_status()?;

        let referer = self.base.to_string();
        let res = self
            .post_form(
                url,
                &[
                    ("username", credentials.email.as_str()),
                    ("password", credentials.password.as_str()),
                    ("remember", "true"),
                    ("referer", referer.as_str()),
                    ("login", "true"),
                    ("submit_by_js", "true"),
                ],
            )
            .await?;
        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() || body.contains("bad_login") {
            return Err(Error::AuthenticationFailed(format!(
                "archive.org rejected the login for {}",
                credentials.email
            )));
        }
        info!("Logged in as {}", credentials.email);
        Ok(())
    }

    async fn reserve(&self, book_id: &str) -> Result<()> {
        self.loan_step(SEARCH_INSIDE_PATH, "grant_access", book_id)
            .await?;
        self.loan_step(LOAN_PATH, "browse_book", book_id).await?;
        self.loan_step(LOAN_PATH, "create_token", book_id).await?;
        info!("Borrowed {}", book_id);
        Ok(())
    }

    async fn page_count(&self, book_id: &str) -> Result<u32> {
        let item: ItemMetadata = self
            .get_json(self.endpoint(&format!("metadata/{}", book_id))?)
            .await?;
        let (server, dir) = match (item.server, item.dir) {
            (Some(server), Some(dir)) => (server, dir),
            _ => return Err(Error::Metadata(format!("no item named {:?}", book_id))),
        };

        let reader_url = format!(
            "{}://{}/BookReader/BookReaderJSIA.php",
            self.base.scheme(),
            server
        );
        let mut reader = Url::parse(&reader_url)
            .map_err(|e| Error::InvalidUrl(format!("{}: {}", reader_url, e)))?;
        reader
            .query_pairs_mut()
            .append_pair("id", book_id)
            .append_pair("itemPath", &dir)
            .append_pair("server", &server)
            .append_pair("format", "json")
            .append_pair("subPrefix", book_id)
            .append_pair("requestUri", &format!("/details/{}", book_id));

        let reply: BookReaderReply = self.get_json(reader).await?;
        let pages = reply
            .page_uris()
            .iter()
            .map(|uri| {
                self.base
                    .join(uri)
                    .map_err(|e| Error::Metadata(format!("bad page location {:?}: {}", uri, e)))
            })
            .collect::<Result<Vec<_>>>()?;
        if pages.is_empty() {
            return Err(Error::Metadata(format!("{} has no pages", book_id)));
        }

        let count = pages.len() as u32;
        self.store_pages(pages)?;
        debug!("{} has {} pages", book_id, count);
        Ok(count)
    }
}

#[async_trait]
impl PageSource for ArchiveClient {
    async fn page_image(&self, index: u32, scale: u32) -> Result<Vec<u8>> {
        let mut url = self.page_url(index)?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("rotate", "0");
            if scale > 0 {
                query.append_pair("scale", &scale.to_string());
            }
        }

        debug!("Fetching {}", url);
        let res = self
            .single_shot
            .get(url)
            .header(REFERER, self.base.as_str())
            .send()
            .await?
            .error_for_status()?;
        Ok(res.bytes().await?.to_vec())
    }
}
