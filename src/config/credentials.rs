use crate::error::Result;
use crate::prompt::PromptProvider;
use crate::service::CredentialStore;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// An account email and its password.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Account email.
    #[serde(default)]
    pub email: String,
    /// Account password.
    #[serde(default)]
    pub password: String,
}

impl Credentials {
    /// Create credentials from an email and a password.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Resolve the credentials for this run.
///
/// Each field comes from `email`/`password` when given, else from `stored`
/// when that holds a non-empty value, else from `prompt`. The password is
/// asked for without echo.
pub fn resolve_credentials(
    email: Option<String>,
    password: Option<String>,
    stored: Option<&Credentials>,
    prompt: &dyn PromptProvider,
) -> Result<Credentials> {
    let stored_email = stored.map(|c| c.email.clone()).filter(|e| !e.is_empty());
    let email = match email.filter(|e| !e.is_empty()).or(stored_email) {
        Some(email) => email,
        None => prompt.input("Enter your archive.org email", false)?,
    };

    let stored_password = stored
        .map(|c| c.password.clone())
        .filter(|p| !p.is_empty());
    let password = match password.filter(|p| !p.is_empty()).or(stored_password) {
        Some(password) => password,
        None => prompt.secret("Enter your archive.org password")?,
    };

    Ok(Credentials { email, password })
}

/// Ask whether to keep `credentials` for later and save them if so.
///
/// Existing stored credentials are only replaced after a second
/// confirmation. Returns whether anything was written.
pub fn offer_to_store(
    store: &dyn CredentialStore,
    credentials: &Credentials,
    prompt: &dyn PromptProvider,
) -> Result<bool> {
    if !prompt.confirm("Store login details for later?")? {
        return Ok(false);
    }
    if store.exists() && !prompt.confirm("Replace current login details?")? {
        return Ok(false);
    }
    store.save(credentials)?;
    Ok(true)
}

/// Credentials kept as JSON in a file.
#[derive(Debug, Clone)]
pub struct CredentialFile {
    path: PathBuf,
}

impl CredentialFile {
    /// Name of the file inside the configuration directory.
    pub const FILE_NAME: &'static str = "credentials.json";

    /// Use the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/folio/credentials.json`, when the platform has a
    /// configuration directory.
    pub fn default_location() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("folio").join(Self::FILE_NAME))
    }

    /// Path of the file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for CredentialFile {
    fn load(&self) -> Result<Option<Credentials>> {
        if !self.path.exists() {
            return Ok(None);
        }
        debug!("Reading stored credentials from {:?}", self.path);
        let raw = fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&raw)?))
    }

    fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn save(&self, credentials: &Credentials) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(credentials)?;

        let mut options = fs::OpenOptions::new();
        options.create(true).write(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(&self.path)?;
        // The mode above only applies to a newly created file.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(fs::Permissions::from_mode(0o600))?;
        }
        file.write_all(json.as_bytes())?;
        debug!("Stored credentials in {:?}", self.path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::ScriptedPrompt;

    #[test]
    fn test_explicit_values_win() {
        let stored = Credentials::new("stored@example.com", "stored");
        let prompt = ScriptedPrompt::default();
        let creds = resolve_credentials(
            Some("cli@example.com".into()),
            Some("cli".into()),
            Some(&stored),
            &prompt,
        )
        .unwrap();
        assert_eq!(creds, Credentials::new("cli@example.com", "cli"));
        assert!(prompt.asked().is_empty());
    }

    #[test]
    fn test_stored_values_before_prompting() {
        let stored = Credentials::new("stored@example.com", "");
        let prompt = ScriptedPrompt::new(["typed-secret"]);
        let creds = resolve_credentials(None, None, Some(&stored), &prompt).unwrap();
        assert_eq!(creds, Credentials::new("stored@example.com", "typed-secret"));
        assert_eq!(prompt.asked(), vec!["Enter your archive.org password"]);
    }

    #[test]
    fn test_prompts_for_everything() {
        let prompt = ScriptedPrompt::new(["me@example.com", "hunter2"]);
        let creds = resolve_credentials(None, None, None, &prompt).unwrap();
        assert_eq!(creds, Credentials::new("me@example.com", "hunter2"));
    }

    #[test]
    fn test_debug_hides_password() {
        let debug = format!("{:?}", Credentials::new("me@example.com", "hunter2"));
        assert!(debug.contains("me@example.com"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialFile::new(dir.path().join("nested").join("creds.json"));
        assert!(!store.exists());
        assert!(store.load().unwrap().is_none());

        let creds = Credentials::new("me@example.com", "hunter2");
        store.save(&creds).unwrap();
        assert!(store.exists());
        assert_eq!(store.load().unwrap(), Some(creds));
    }

    #[cfg(unix)]
    #[test]
    fn test_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let store = CredentialFile::new(dir.path().join("creds.json"));
        store.save(&Credentials::new("a", "b")).unwrap();
        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[test]
    fn test_existing_file_made_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("creds.json");
        fs::write(&path, "{}").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        let store = CredentialFile::new(&path);
        store.save(&Credentials::new("a", "b")).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(store.load().unwrap(), Some(Credentials::new("a", "b")));
    }

    #[test]
    fn test_offer_declined() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialFile::new(dir.path().join("creds.json"));
        let prompt = ScriptedPrompt::new(["n"]);
        assert!(!offer_to_store(&store, &Credentials::new("a", "b"), &prompt).unwrap());
        assert!(!store.exists());
    }

    #[test]
    fn test_offer_keeps_existing_unless_confirmed() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialFile::new(dir.path().join("creds.json"));
        let old = Credentials::new("old", "old");
        store.save(&old).unwrap();

        let prompt = ScriptedPrompt::new(["y", "n"]);
        assert!(!offer_to_store(&store, &Credentials::new("new", "new"), &prompt).unwrap());
        assert_eq!(store.load().unwrap(), Some(old));

        let prompt = ScriptedPrompt::new(["y", "y"]);
        let new = Credentials::new("new", "new");
        assert!(offer_to_store(&store, &new, &prompt).unwrap());
        assert_eq!(store.load().unwrap(), Some(new));
    }
}
