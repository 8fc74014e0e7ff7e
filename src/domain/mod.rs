//! Domain types for the outreach site.
//!
//! This module contains the records the site reads and writes:
//! - LibraryItem: videos, audios, articles and books
//! - Question: Q&A entries
//! - Submissions: Contact and Volunteer form records
//!
//! Library items and questions are owned by the backend; the views only
//! ever hold read-only snapshots of them.

pub mod library_item;
pub mod question;
pub mod submission;

// Re-export commonly used types
pub use library_item::{ItemId, LibraryItem, MediaType};
pub use question::Question;
pub use submission::{ContactSubmission, ValidationError, VolunteerApplication};
