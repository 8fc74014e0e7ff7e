//! Terminal rendering for the Library and Questions views.

use std::sync::Arc;

use anyhow::Result;

use crate::adapters::RecordSource;
use crate::browse::{LibraryListing, LibraryView, LoadOutcome, QuestionsListing, QuestionsView, Tab};
use crate::config;
use crate::domain::{ItemId, LibraryItem, MediaType};
use crate::reveal::{ElementId, LazyMedia, MediaFrame, Rect, RootMargin, ScrollObserver};

/// Window the card grid is laid out in when judging first paint
const VIEWPORT: (f64, f64) = (1280.0, 800.0);
const GRID_TOP: f64 = 320.0;
const GRID_COLUMNS: usize = 3;
const CARD_WIDTH: f64 = 400.0;
const CARD_HEIGHT: f64 = 360.0;
const GRID_GAP: f64 = 24.0;

/// View inputs for `outreach library`
#[derive(Debug, Clone)]
pub struct LibraryArgs {
    pub tab: Tab<MediaType>,
    pub category: Option<String>,
    pub search: Option<String>,
    pub page: usize,
    pub load_pages: usize,
}

pub async fn show_library(source: Arc<dyn RecordSource>, args: LibraryArgs) -> Result<()> {
    let cfg = config::config()?;
    let mut view = LibraryView::new(source, cfg.library.fetch_page_size, cfg.library.page_size);

    report_load(view.open().await);
    for _ in 1..args.load_pages {
        if !view.feed().has_more() {
            break;
        }
        report_load(view.load_more().await);
    }

    view.select_tab(args.tab);
    if let Some(category) = args.category {
        view.select_category(category);
    }
    if let Some(search) = args.search {
        view.search(search);
    }
    view.go_to_page(args.page);

    print_library(&view.render(), cfg.reveal.lazy_margin());
    view.close();
    Ok(())
}

pub async fn show_questions(
    source: Arc<dyn RecordSource>,
    category: Option<String>,
    search: Option<String>,
    expand: Option<String>,
) -> Result<()> {
    let cfg = config::config()?;
    let mut view = QuestionsView::new(source, cfg.questions.fetch_page_size);

    report_load(view.open().await);

    if let Some(category) = category {
        view.select_category(category);
    }
    if let Some(search) = search {
        view.search(search);
    }
    if let Some(id) = expand {
        view.toggle_expand(&ItemId::new(id));
    }

    print_questions(&view.render());
    view.close();
    Ok(())
}

fn report_load(outcome: LoadOutcome) {
    if outcome == LoadOutcome::Failed {
        eprintln!("Warning: could not reach the backend; showing what was loaded.");
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let head: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

/// What each card's media slot shows on first paint, with the page
/// scrolled to the top. `None` for cards without a lazy player.
fn first_paint(items: &[LibraryItem], margin: RootMargin) -> Vec<Option<MediaFrame>> {
    let observer = ScrollObserver::new(VIEWPORT.0, VIEWPORT.1);

    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let element = ElementId(i as u64);
            let row = (i / GRID_COLUMNS) as f64;
            let column = (i % GRID_COLUMNS) as f64;
            observer.set_layout(
                element,
                Rect::new(
                    column * (CARD_WIDTH + GRID_GAP),
                    GRID_TOP + row * (CARD_HEIGHT + GRID_GAP),
                    CARD_WIDTH,
                    CARD_HEIGHT,
                ),
            );

            let mut media = LazyMedia::for_item(element, item)?;
            media.mount(&observer, margin);
            Some(media.render())
        })
        .collect()
}

fn media_label(frame: Option<&MediaFrame>) -> &'static str {
    match frame {
        None => "-",
        Some(MediaFrame::Player { .. }) => "player",
        Some(MediaFrame::Placeholder { poster: Some(_) }) => "poster",
        Some(MediaFrame::Placeholder { poster: None }) => "pending",
    }
}

fn print_library(listing: &LibraryListing, lazy_margin: RootMargin) {
    let tabs: Vec<String> = std::iter::once(label(Tab::All, listing.tab, "All"))
        .chain(
            MediaType::ALL
                .iter()
                .map(|kind| label(Tab::Only(*kind), listing.tab, kind.tab_label())),
        )
        .collect();
    println!("{}", tabs.join("  "));

    if listing.shows_categories() {
        let categories: Vec<String> = listing
            .categories
            .iter()
            .map(|c| {
                if *c == listing.selected_category {
                    format!("[{}]", c)
                } else {
                    c.clone()
                }
            })
            .collect();
        println!("Categories: {}", categories.join(" "));
    }
    println!();

    if let Some(message) = listing.empty_message() {
        println!("{}", message);
        return;
    }

    println!(
        "{:<18} {:<8} {:<16} {:<8} {:<40}",
        "ID", "TYPE", "CATEGORY", "MEDIA", "TITLE"
    );
    println!("{}", "-".repeat(94));

    let frames = first_paint(&listing.items, lazy_margin);
    for (item, frame) in listing.items.iter().zip(&frames) {
        println!(
            "{:<18} {:<8} {:<16} {:<8} {:<40}",
            truncate(item.id.as_str(), 18),
            item.media_type.to_string(),
            truncate(&item.category, 16),
            media_label(frame.as_ref()),
            truncate(&item.title, 40)
        );
    }

    println!();
    println!("{}", listing.summary());
    if listing.total_pages > 1 {
        let strip: Vec<String> = listing
            .page_numbers
            .iter()
            .map(|n| {
                if *n == listing.page {
                    format!("[{}]", n)
                } else {
                    n.to_string()
                }
            })
            .collect();
        println!(
            "Page {} of {}: {}{}{}",
            listing.page,
            listing.total_pages,
            if listing.has_prev { "< " } else { "" },
            strip.join(" "),
            if listing.has_next { " >" } else { "" }
        );
    }
    if listing.can_load_more {
        println!("More items available (use --load-pages to fetch them)");
    }
}

fn label(tab: Tab<MediaType>, selected: Tab<MediaType>, text: &str) -> String {
    if tab == selected {
        format!("[{}]", text)
    } else {
        text.to_string()
    }
}

fn print_questions(listing: &QuestionsListing) {
    let categories: Vec<String> = listing
        .categories
        .iter()
        .map(|c| {
            if *c == listing.selected_category {
                format!("[{}]", c)
            } else {
                c.clone()
            }
        })
        .collect();
    println!("Categories: {}", categories.join(" "));
    println!();

    if let Some(message) = listing.empty_message() {
        println!("{}", message);
        return;
    }

    for question in &listing.questions {
        let marker = if listing.is_expanded(question) { "-" } else { "+" };
        println!("{} {}  ({})", marker, question.question, question.id);
        if listing.is_expanded(question) {
            for line in question.answer.lines() {
                println!("    {}", line);
            }
        }
    }

    println!();
    println!("{}", listing.summary());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("The Sealed Nectar", 10), "The Sea...");
        assert_eq!(truncate("Riyad as-Salihin", 8), "Riyad...");
    }

    fn videos(n: usize) -> Vec<LibraryItem> {
        (0..n)
            .map(|i| {
                LibraryItem::new(format!("v{}", i), MediaType::Video, "Talk")
                    .with_url(format!("https://cdn.example.org/{}.mp4", i))
            })
            .collect()
    }

    #[test]
    fn test_first_paint_mounts_rows_within_margin() {
        let frames = first_paint(&videos(7), RootMargin::vertical_px(200.0));
        let labels: Vec<&str> = frames.iter().map(|f| media_label(f.as_ref())).collect();

        // The first two rows fall inside the margin, the third does not
        assert_eq!(labels[..6], ["player"; 6]);
        assert_eq!(labels[6], "pending");

        let frames = first_paint(&videos(7), RootMargin::vertical_px(400.0));
        assert!(matches!(frames[6], Some(MediaFrame::Player { .. })));
    }

    #[test]
    fn test_non_playable_cards_have_no_media_slot() {
        let items = vec![LibraryItem::new("b1", MediaType::Book, "Riyad as-Salihin")];
        let frames = first_paint(&items, RootMargin::vertical_px(200.0));
        assert_eq!(frames, vec![None]);
        assert_eq!(media_label(frames[0].as_ref()), "-");
    }

    #[test]
    fn test_tab_label_marks_selection() {
        let selected = Tab::Only(MediaType::Book);
        assert_eq!(label(Tab::Only(MediaType::Book), selected, "Books"), "[Books]");
        assert_eq!(label(Tab::All, selected, "All"), "All");
    }
}
