//! outreach - content-browsing core for a community outreach site
//!
//! Pages through records held by a hosted table service, caches them in
//! fetch order and derives everything the site shows (tabs, category
//! lists, search results, page windows, empty states) from that cache.
//!
//! # Architecture
//!
//! - The backend is a capability ([`adapters::RecordSource`]) with a REST
//!   implementation and an in-memory fixture implementation
//! - Each list view owns an append-only cache guarded against concurrent
//!   loads; filtering and pagination are pure functions over it
//! - Media players and scroll animations are driven by a viewport
//!   observer abstraction
//!
//! # Modules
//!
//! - `adapters`: Record sources (REST table client, JSON fixtures)
//! - `browse`: Cache, filter, pagination and the Library/Questions views
//! - `domain`: Data structures (LibraryItem, Question, form submissions)
//! - `forms`: Contact and Volunteer submission flow
//! - `reveal`: Lazy media and scroll-reveal animation
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Browse books in the Fiqh category
//! outreach library --tab book --category Fiqh
//!
//! # Search the Q&A
//! outreach questions --search prayer
//!
//! # Try it offline
//! outreach library --fixture site.json --tab all
//! ```

pub mod adapters;
pub mod browse;
pub mod cli;
pub mod config;
pub mod domain;
pub mod forms;
pub mod reveal;

// Re-export main types at crate root for convenience
pub use adapters::{FixtureSource, PageQuery, RecordSource, SourceError, Table, TableClient, TableConfig};
pub use browse::{LibraryListing, LibraryView, LoadOutcome, QuestionsListing, QuestionsView, Tab};
pub use domain::{ContactSubmission, ItemId, LibraryItem, MediaType, Question, VolunteerApplication};
pub use forms::{FormState, SubmissionError, SubmissionStatus};
