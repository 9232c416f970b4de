pub mod commands;

use clap::{Parser, Subcommand};

use crate::api::CoverSize;
use crate::domain::{ReadIdKind, Shelf, SortOrder};

#[derive(Parser)]
#[command(name = "libris")]
#[command(about = "Browse the Open Library from the terminal", long_about = None)]
pub struct Cli {
    /// Concurrent detail lookups when enriching the activity feed
    #[arg(short, long, global = true)]
    pub workers: Option<usize>,

    /// Recent changes fetched per page
    #[arg(long, global = true)]
    pub page_size: Option<usize>,

    /// Exclude edits made by bots from the activity feed
    #[arg(long, global = true)]
    pub no_bots: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search books and authors
    Search {
        query: String,
        /// Earliest publication year
        #[arg(long)]
        from: Option<String>,
        /// Latest publication year
        #[arg(long)]
        to: Option<String>,
    },
    /// Search authors only
    Authors { query: String },
    /// Books filed under a subject
    Subject {
        name: String,
        /// new, old, editions, readinglog, want_to_read or random
        #[arg(short, long, default_value = "editions")]
        sort: SortOrder,
        #[arg(short, long)]
        limit: Option<usize>,
        /// Show the subject overview instead of a shelf
        #[arg(long)]
        overview: bool,
    },
    /// Work details, editions and availability
    Book {
        /// Work key, e.g. /works/OL45804W
        key: String,
    },
    /// Author details and works
    Author {
        /// Author key, e.g. OL34184A
        key: String,
    },
    /// Recent edits across the catalog
    Changes {
        /// Changes per page (defaults to the configured page size)
        #[arg(short, long)]
        limit: Option<usize>,
        #[arg(long, default_value_t = 0)]
        offset: usize,
        /// Number of pages to load
        #[arg(long, default_value_t = 1)]
        pages: usize,
    },
    /// Revision history of a book or author
    History {
        /// Record key, e.g. /works/OL45804W
        key: String,
    },
    /// Full-text search inside a scanned book
    Inside {
        /// archive.org identifier
        identifier: String,
        query: String,
    },
    /// Check where an edition can be read
    Read {
        /// isbn, lccn, oclc or olid
        kind: ReadIdKind,
        value: String,
    },
    /// Search public reading lists
    Lists { query: String },
    /// Entries of a reading list
    List {
        /// List key, e.g. /people/mek/lists/OL1L
        key: String,
    },
    /// A user's reading log shelf
    Shelf {
        user: String,
        /// want-to-read, currently-reading or already-read
        shelf: Shelf,
    },
    /// Print a cover or author photo URL
    Cover {
        #[arg(long)]
        isbn: Option<String>,
        #[arg(long)]
        olid: Option<String>,
        #[arg(long)]
        id: Option<i64>,
        /// S, M or L
        #[arg(short, long)]
        size: Option<CoverSize>,
        /// Author photo instead of a book cover
        #[arg(long)]
        author: bool,
    },
    /// Launch the activity feed browser
    Tui,
}
