//! Replies of the archive.org endpoints folio talks to.

use serde::Deserialize;

/// The parts of `/metadata/<id>` needed to find the book reader.
///
/// Unknown items come back as an empty object, hence the options.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemMetadata {
    /// Host serving the item's files.
    pub server: Option<String>,
    /// Path of the item on that host.
    pub dir: Option<String>,
}

/// Reply of `BookReaderJSIA.php`.
#[derive(Debug, Clone, Deserialize)]
pub struct BookReaderReply {
    /// Reader configuration.
    pub data: BookReaderData,
}

/// The `data` member of a [`BookReaderReply`].
#[derive(Debug, Clone, Deserialize)]
pub struct BookReaderData {
    /// Reader options, including the page list.
    #[serde(rename = "brOptions")]
    pub br_options: BookReaderOptions,
}

/// The `brOptions` member of [`BookReaderData`].
#[derive(Debug, Clone, Deserialize)]
pub struct BookReaderOptions {
    /// Pages grouped by spread.
    #[serde(default)]
    pub data: Vec<Vec<PageLeaf>>,
}

/// One page of the reader's page list.
#[derive(Debug, Clone, Deserialize)]
pub struct PageLeaf {
    /// Where the page image is served.
    pub uri: String,
}

impl BookReaderReply {
    /// Page image locations in reading order.
    pub fn page_uris(self) -> Vec<String> {
        self.data
            .br_options
            .data
            .into_iter()
            .flatten()
            .map(|leaf| leaf.uri)
            .collect()
    }
}

/// Reply of the loan endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoanReply {
    /// Set when the step went through.
    #[serde(default)]
    pub success: bool,
    /// Why the step failed.
    pub error: Option<String>,
}
