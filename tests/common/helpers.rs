#![allow(dead_code)]

use async_trait::async_trait;
use folio::service::{Assembler, CredentialStore, LendingService, PageSource};
use folio::{Credentials, Error, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tempfile::TempDir;

// Common test constants
pub const TEST_BOOK_ID: &str = "thehobbit0000tolk";
pub const TEST_EMAIL: &str = "reader@example.com";
pub const TEST_PASSWORD: &str = "hunter2";

/// Creates a temporary directory for testing purposes
pub fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// Creates a temporary file with the given content
pub fn create_temp_file(dir: &Path, filename: &str, content: &[u8]) -> PathBuf {
    let file_path = dir.join(filename);
    fs::write(&file_path, content).expect("Failed to write temporary file");
    file_path
}

/// The bytes [`StubPageSource`] serves for a page index.
pub fn page_bytes(index: u32) -> Vec<u8> {
    format!("page-{}", index + 1).into_bytes()
}

/// Test credentials
pub fn test_credentials() -> Credentials {
    Credentials::new(TEST_EMAIL, TEST_PASSWORD)
}

/// Names of the files in `dir`, sorted
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .expect("Failed to read directory")
        .map(|e| e.expect("Bad entry").file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// Asserts that a file exists at the given path
pub fn assert_file_exists(path: &Path) {
    assert!(path.exists(), "File should exist at path: {:?}", path);
}

/// Asserts that no file exists at the given path
pub fn assert_file_missing(path: &Path) {
    assert!(!path.exists(), "File should not exist at path: {:?}", path);
}

// === Collaborator stubs ===

/// A page source that fails a configurable number of times per page.
///
/// `u32::MAX` failures make a page permanently unavailable.
#[derive(Default)]
pub struct StubPageSource {
    failures: Mutex<HashMap<u32, u32>>,
    calls: AtomicUsize,
    scales: Mutex<Vec<u32>>,
}

impl StubPageSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the first `times` requests for the page at `index`.
    pub fn failing(self, index: u32, times: u32) -> Self {
        self.failures
            .lock()
            .expect("lock")
            .insert(index, times);
        self
    }

    /// Never serve the page at `index`.
    pub fn unavailable(self, index: u32) -> Self {
        self.failing(index, u32::MAX)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn scales(&self) -> Vec<u32> {
        self.scales.lock().expect("lock").clone()
    }
}

#[async_trait]
impl PageSource for StubPageSource {
    async fn page_image(&self, index: u32, scale: u32) -> Result<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.scales.lock().expect("lock").push(scale);
        let mut failures = self.failures.lock().expect("lock");
        if let Some(left) = failures.get_mut(&index) {
            if *left > 0 {
                if *left != u32::MAX {
                    *left -= 1;
                }
                return Err(Error::Internal(format!("page {} timed out", index + 1)));
            }
        }
        Ok(page_bytes(index))
    }
}

/// What a [`StubLendingService`] does when asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refusal {
    None,
    Login,
    Loan,
}

/// A lending service that counts its calls.
pub struct StubLendingService {
    page_count: u32,
    refusal: Refusal,
    logins: AtomicUsize,
    reservations: AtomicUsize,
    page_counts: AtomicUsize,
    last_login: Mutex<Option<Credentials>>,
}

impl StubLendingService {
    pub fn new(page_count: u32) -> Self {
        Self {
            page_count,
            refusal: Refusal::None,
            logins: AtomicUsize::new(0),
            reservations: AtomicUsize::new(0),
            page_counts: AtomicUsize::new(0),
            last_login: Mutex::new(None),
        }
    }

    pub fn refusing(mut self, refusal: Refusal) -> Self {
        self.refusal = refusal;
        self
    }

    pub fn logins(&self) -> usize {
        self.logins.load(Ordering::SeqCst)
    }

    pub fn reservations(&self) -> usize {
        self.reservations.load(Ordering::SeqCst)
    }

    pub fn page_count_calls(&self) -> usize {
        self.page_counts.load(Ordering::SeqCst)
    }

    pub fn last_login(&self) -> Option<Credentials> {
        self.last_login.lock().expect("lock").clone()
    }
}

#[async_trait]
impl LendingService for StubLendingService {
    async fn login(&self, credentials: &Credentials) -> Result<()> {
        self.logins.fetch_add(1, Ordering::SeqCst);
        *self.last_login.lock().expect("lock") = Some(credentials.clone());
        if self.refusal == Refusal::Login {
            return Err(Error::AuthenticationFailed("bad_login".into()));
        }
        Ok(())
    }

    async fn reserve(&self, _book_id: &str) -> Result<()> {
        self.reservations.fetch_add(1, Ordering::SeqCst);
        if self.refusal == Refusal::Loan {
            return Err(Error::LoanFailed("not available to borrow".into()));
        }
        Ok(())
    }

    async fn page_count(&self, _book_id: &str) -> Result<u32> {
        self.page_counts.fetch_add(1, Ordering::SeqCst);
        Ok(self.page_count)
    }
}

/// An assembler that only records what it was asked to assemble.
#[derive(Default)]
pub struct CountingAssembler {
    calls: AtomicUsize,
    seen: Mutex<Vec<(PathBuf, usize)>>,
}

impl CountingAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Directories assembled and how many entries each held at the time.
    pub fn seen(&self) -> Vec<(PathBuf, usize)> {
        self.seen.lock().expect("lock").clone()
    }
}

#[async_trait]
impl Assembler for CountingAssembler {
    async fn assemble(&self, pages_dir: &Path, book_id: &str) -> Result<Option<PathBuf>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let entries = fs::read_dir(pages_dir)?.count();
        self.seen
            .lock()
            .expect("lock")
            .push((pages_dir.to_path_buf(), entries));
        if entries == 0 {
            return Ok(None);
        }
        Ok(Some(pages_dir.with_file_name(format!("{}.pdf", book_id))))
    }
}

/// A credential store kept in memory.
#[derive(Default)]
pub struct MemoryCredentialStore {
    stored: Mutex<Option<Credentials>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(credentials: Credentials) -> Self {
        Self {
            stored: Mutex::new(Some(credentials)),
        }
    }

    pub fn stored(&self) -> Option<Credentials> {
        self.stored.lock().expect("lock").clone()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Result<Option<Credentials>> {
        Ok(self.stored())
    }

    fn exists(&self) -> bool {
        self.stored.lock().expect("lock").is_some()
    }

    fn save(&self, credentials: &Credentials) -> Result<()> {
        *self.stored.lock().expect("lock") = Some(credentials.clone());
        Ok(())
    }
}
