//! Credentials and where they come from.
//!
//! Credentials are resolved field by field: a value given on the command
//! line wins, then a value from the stored [`Credentials`] passed in by the
//! caller, and only then is the user asked. After a run the user may choose
//! to persist what was used through a
//! [`CredentialStore`](crate::service::CredentialStore).

pub mod credentials;

pub use credentials::{offer_to_store, resolve_credentials, CredentialFile, Credentials};
