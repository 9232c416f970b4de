//! # Libris
//!
//! A terminal client for the Open Library catalog.
//!
//! ## Architecture
//!
//! Every remote record flows through the same pipeline:
//!
//! ```text
//! Endpoints → Fetcher → Normalizer → ApiClient → Feed / View → CLI / TUI
//! ```
//!
//! - [`fetcher`]: HTTP GET with 404 mapped to "not found"
//! - [`normalizer`]: Response bodies to domain records
//! - [`api`]: Typed operations with a per-endpoint failure policy
//! - [`feed`]: Incremental loading of the recent changes feed
//! - [`tui`]: Activity feed browser built with ratatui
//!
//! ## Quick Start
//!
//! ```bash
//! # Search books and authors
//! libris search "dune" --from 1965 --to 1970
//!
//! # Show a work with its editions and availability
//! libris book /works/OL893415W
//!
//! # Latest edits, two pages, without bots
//! libris changes --pages 2 --no-bots
//!
//! # Browse the activity feed
//! libris tui
//! ```

/// Typed Open Library operations.
///
/// - [`ApiClient`](api::ApiClient): one method per endpoint
/// - [`Endpoint`](api::Endpoint): the failure policy table
/// - [`Covers`](api::Covers): cover and photo URL templating
pub mod api;

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together the
/// configuration, API client and cover URLs.
pub mod app;

/// Command-line interface using clap.
pub mod cli;

/// Configuration loaded from `~/.config/libris/config.toml`.
pub mod config;

/// Core domain models: books, authors, changes, lists, subjects.
pub mod domain;

/// Recent changes feed paging and enrichment.
///
/// - [`FeedState`](feed::FeedState): the paging state machine
/// - [`FeedLoader`](feed::FeedLoader): runs page requests in the background
/// - [`Enricher`](feed::Enricher): resolves each change to a book or author
pub mod feed;

/// HTTP fetching.
///
/// - [`Fetcher`](fetcher::Fetcher): Async trait for GET requests
/// - [`HttpFetcher`](fetcher::http_fetcher::HttpFetcher): reqwest-based implementation
pub mod fetcher;

/// Response parsing and cleanup.
pub mod normalizer;

/// Terminal user interface.
///
/// Two panes: recent changes on top, a preview below.
///
/// Keybindings: j/k navigate, Enter previews the book or author,
/// Esc closes the preview, b toggles bot edits, R retries, o opens in
/// browser, q quits.
pub mod tui;

/// Page metadata and cancellable detail previews.
pub mod view;
