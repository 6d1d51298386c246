use clap::{ArgAction, Parser};
use folio::{Credentials, JobOptions, PageSelection, ProgressBarOpts, ARCHIVE_BASE_URL};
use std::path::PathBuf;

/// Download a borrowed archive.org book page by page and stitch it into a PDF
#[derive(Parser, Debug)]
#[command(name = "folio", version, about)]
pub struct Cli {
    /// The book's identifier (the part of the url immediately after
    /// "https://archive.org/details/"). Asked for when omitted.
    pub id: Option<String>,

    /// Your archive.org account's email
    #[arg(short, long)]
    pub username: Option<String>,

    /// Your archive.org account's password
    #[arg(short, long)]
    pub password: Option<String>,

    /// Download every page of the book
    #[arg(short, long, default_value_t = false)]
    pub all_pages: bool,

    /// Download pages starting at page number N and ending at the book's last
    /// page, or a range if --page-end has been specified
    #[arg(short = 's', long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub page_start: Option<u32>,

    /// End of the range of page numbers to download
    #[arg(short = 'e', long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub page_end: Option<u32>,

    /// Directory the pages are written to. Defaults to a directory named
    /// after the book id
    #[arg(short = 'd', long)]
    pub output_dir: Option<PathBuf>,

    /// Image resolution of the pages requested. Higher integers mean smaller
    /// images; 0 means no downscaling
    #[arg(short = 'S', long, default_value_t = 0)]
    pub scale: u32,

    /// Where login details are stored between runs
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Base URL of the lending library
    #[arg(long, default_value = ARCHIVE_BASE_URL)]
    pub base_url: String,

    /// Do not offer to store login details after the run
    #[arg(long, default_value_t = false)]
    pub no_save: bool,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// The job described by the arguments.
    pub fn job_options(&self, stored_credentials: Option<Credentials>) -> JobOptions {
        JobOptions {
            book_id: self.id.clone(),
            email: self.username.clone(),
            password: self.password.clone(),
            stored_credentials,
            selection: PageSelection {
                all_pages: self.all_pages,
                start: self.page_start,
                end: self.page_end,
            },
            output_dir: self.output_dir.clone(),
            scale: self.scale,
            style: ProgressBarOpts::default(),
        }
    }
}
