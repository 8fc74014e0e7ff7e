//! Command-line interface for the outreach site core.
//!
//! Renders the Library and Questions views in the terminal and submits
//! the Contact and Volunteer forms.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};

use crate::adapters::{FixtureSource, RecordSource, TableClient};
use crate::browse::Tab;
use crate::config;
use crate::domain::MediaType;

pub mod browse;
pub mod forms;

/// outreach - browse the library and Q&A, send messages
#[derive(Parser, Debug)]
#[command(name = "outreach")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Browse the media library
    Library {
        /// Media tab
        #[arg(short, long, value_enum, default_value = "video")]
        tab: TabArg,

        /// Category (default: All)
        #[arg(short, long)]
        category: Option<String>,

        /// Search term
        #[arg(short, long)]
        search: Option<String>,

        /// Display page (1-based)
        #[arg(short, long, default_value = "1")]
        page: usize,

        /// Number of backend pages to load before rendering
        #[arg(long, default_value = "1")]
        load_pages: usize,

        /// Serve records from a JSON fixture instead of the backend
        #[arg(long, env = "OUTREACH_FIXTURE")]
        fixture: Option<PathBuf>,
    },

    /// Browse published questions and answers
    Questions {
        /// Category (default: All)
        #[arg(short, long)]
        category: Option<String>,

        /// Search term
        #[arg(short, long)]
        search: Option<String>,

        /// Show the answer for this question ID
        #[arg(short, long)]
        expand: Option<String>,

        /// Serve records from a JSON fixture instead of the backend
        #[arg(long, env = "OUTREACH_FIXTURE")]
        fixture: Option<PathBuf>,
    },

    /// Send a message through the contact form
    Contact {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        subject: String,

        #[arg(long)]
        message: String,
    },

    /// Apply as a volunteer
    Volunteer {
        #[arg(long)]
        full_name: String,

        #[arg(long)]
        email: String,

        /// Hours available per week
        #[arg(long)]
        hours: u32,

        #[arg(long)]
        phone: String,

        /// Date from which you are available (YYYY-MM-DD)
        #[arg(long)]
        period_date: NaiveDate,

        #[arg(long)]
        nationality: Option<String>,

        #[arg(long)]
        message: String,
    },

    /// Show resolved configuration (debug)
    Config,
}

/// Library tab for CLI (maps to Tab<MediaType>)
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TabArg {
    All,
    Video,
    Audio,
    Article,
    Book,
}

impl From<TabArg> for Tab<MediaType> {
    fn from(t: TabArg) -> Self {
        match t {
            TabArg::All => Tab::All,
            TabArg::Video => Tab::Only(MediaType::Video),
            TabArg::Audio => Tab::Only(MediaType::Audio),
            TabArg::Article => Tab::Only(MediaType::Article),
            TabArg::Book => Tab::Only(MediaType::Book),
        }
    }
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Library {
                tab,
                category,
                search,
                page,
                load_pages,
                fixture,
            } => {
                let source = open_source(fixture.as_deref()).await?;
                browse::show_library(
                    source,
                    browse::LibraryArgs {
                        tab: tab.into(),
                        category,
                        search,
                        page,
                        load_pages,
                    },
                )
                .await
            }
            Commands::Questions {
                category,
                search,
                expand,
                fixture,
            } => {
                let source = open_source(fixture.as_deref()).await?;
                browse::show_questions(source, category, search, expand).await
            }
            Commands::Contact {
                name,
                email,
                subject,
                message,
            } => {
                let record = crate::domain::ContactSubmission {
                    name,
                    email,
                    subject,
                    message,
                };
                forms::send_contact(backend_source()?, record).await
            }
            Commands::Volunteer {
                full_name,
                email,
                hours,
                phone,
                period_date,
                nationality,
                message,
            } => {
                let record = crate::domain::VolunteerApplication {
                    full_name,
                    email,
                    hours_per_week: hours,
                    phone,
                    period_date,
                    nationality,
                    message,
                };
                forms::send_volunteer(backend_source()?, record).await
            }
            Commands::Config => show_config(),
        }
    }
}

/// Fixture file if given, otherwise the configured backend
async fn open_source(fixture: Option<&Path>) -> Result<Arc<dyn RecordSource>> {
    match fixture {
        Some(path) => Ok(Arc::new(FixtureSource::load(path).await?)),
        None => backend_source(),
    }
}

fn backend_source() -> Result<Arc<dyn RecordSource>> {
    let cfg = config::config()?;
    let backend = cfg.require_backend()?;
    let client = TableClient::from_config(backend)
        .with_context(|| format!("Failed to create backend client for {}", backend.url))?;
    Ok(Arc::new(client))
}

/// Print the resolved configuration
fn show_config() -> Result<()> {
    let cfg = config::config()?;

    println!("════════════════════════════════════════════════════════════════");
    println!("  Outreach Configuration");
    println!("════════════════════════════════════════════════════════════════");
    println!();
    println!(
        "Config file: {}",
        cfg.config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none - using defaults)".to_string())
    );
    println!();
    println!("Backend:");
    match &cfg.backend {
        Some(backend) => {
            println!("  URL:      {}", backend.url);
            println!("  Anon key: {}", mask_key(&backend.anon_key));
            println!("  Timeout:  {}s", backend.timeout_seconds);
        }
        None => println!("  (not configured)"),
    }
    println!();
    println!("Library:");
    println!("  Page size:       {}", cfg.library.page_size);
    println!("  Fetch page size: {}", cfg.library.fetch_page_size);
    println!();
    println!("Questions:");
    println!("  Fetch page size: {}", cfg.questions.fetch_page_size);
    println!();
    println!("Forms:");
    println!("  Contact ack:   {}s", cfg.forms.contact_ack.as_secs());
    println!("  Volunteer ack: {}s", cfg.forms.volunteer_ack.as_secs());
    println!();
    println!("Reveal:");
    println!("  Lazy margin: {}px", cfg.reveal.lazy_margin_px);

    Ok(())
}

fn mask_key(key: &str) -> String {
    if key.is_empty() {
        return "(none)".to_string();
    }
    let visible: String = key.chars().take(6).collect();
    format!("{}…", visible)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_library_command() {
        let cli = Cli::try_parse_from([
            "outreach", "library", "--tab", "book", "--category", "Fiqh", "--page", "2",
        ])
        .unwrap();

        match cli.command {
            Commands::Library {
                tab,
                category,
                page,
                load_pages,
                ..
            } => {
                assert_eq!(Tab::from(tab), Tab::Only(MediaType::Book));
                assert_eq!(category.as_deref(), Some("Fiqh"));
                assert_eq!(page, 2);
                assert_eq!(load_pages, 1);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_volunteer_date() {
        let cli = Cli::try_parse_from([
            "outreach",
            "volunteer",
            "--full-name",
            "Maryam Ali",
            "--email",
            "maryam@example.org",
            "--hours",
            "4",
            "--phone",
            "0123",
            "--period-date",
            "2026-11-01",
            "--message",
            "Hi",
        ])
        .unwrap();

        match cli.command {
            Commands::Volunteer { period_date, nationality, .. } => {
                assert_eq!(period_date, NaiveDate::from_ymd_opt(2026, 11, 1).unwrap());
                assert!(nationality.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_bad_date_is_rejected() {
        let result = Cli::try_parse_from([
            "outreach", "volunteer", "--full-name", "A", "--email", "a@b", "--hours", "1",
            "--phone", "1", "--period-date", "next week", "--message", "m",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_mask_key() {
        assert_eq!(mask_key(""), "(none)");
        assert_eq!(mask_key("eyJhbGciOiJIUzI1NiJ9"), "eyJhbG…");
    }
}
