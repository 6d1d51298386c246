mod cli;

use clap::Parser;
use color_eyre::Result;
use folio::{
    ArchiveClient, CredentialFile, CredentialStore, Error, HttpClientConfig, Job, PdfAssembler,
    TerminalPrompt,
};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = cli::Cli::parse();
    init_tracing(cli.verbose);

    let store = CredentialFile::new(cli.config.clone().unwrap_or_else(|| {
        CredentialFile::default_location().unwrap_or_else(|| PathBuf::from(CredentialFile::FILE_NAME))
    }));
    let stored = match store.load() {
        Ok(stored) => stored,
        Err(e) => {
            warn!("Ignoring stored login details in {:?}: {}", store.path(), e);
            None
        }
    };

    let client = ArchiveClient::new(&cli.base_url, HttpClientConfig::default())?;
    let assembler = PdfAssembler::new();
    let prompt = TerminalPrompt::new();

    let mut job = Job::new(&client, &client, &assembler, &prompt);
    if !cli.no_save {
        job = job.credential_store(&store);
    }

    match job.run(cli.job_options(stored)).await {
        Ok(_) => Ok(()),
        Err(Error::UserDeclinedOverwrite(path)) => {
            info!("Not writing into {:?}", path);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn init_tracing(verbose: u8) {
    let default_directive = match verbose {
        0 => "folio=warn",
        1 => "folio=info",
        2 => "folio=debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
