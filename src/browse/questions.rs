//! The Questions view: searchable Q&A list with a category sidebar.
//!
//! Unlike the library, every question is fetched up front and the
//! filtered list is shown whole, without display pagination.

use std::sync::Arc;

use super::feed::{Feed, LoadOutcome};
use super::filter::{category_options, filter, Tab};
use super::view_state::ViewState;
use super::EmptyState;
use crate::adapters::{PageQuery, RecordSource, Table};
use crate::domain::{ItemId, Question};

/// Upper bound on backend pages fetched when opening the view
pub const MAX_QUESTION_PAGES: usize = 50;

#[derive(Debug, Clone, PartialEq)]
pub struct QuestionsListing {
    pub categories: Vec<String>,
    pub selected_category: String,
    pub questions: Vec<Question>,
    /// Question whose answer is unfolded
    pub expanded: Option<ItemId>,
    pub empty: Option<EmptyState>,
}

impl QuestionsListing {
    pub fn summary(&self) -> String {
        let noun = if self.questions.len() == 1 { "question" } else { "questions" };
        format!("Showing {} {}", self.questions.len(), noun)
    }

    pub fn empty_message(&self) -> Option<&'static str> {
        self.empty.map(|empty| match empty {
            EmptyState::NoItems => "No questions have been published yet.",
            EmptyState::NoMatches => "No questions found matching your search.",
        })
    }

    pub fn is_expanded(&self, question: &Question) -> bool {
        self.expanded.as_ref() == Some(&question.id)
    }
}

pub struct QuestionsView {
    feed: Feed<Question>,
    state: ViewState<()>,
    expanded: Option<ItemId>,
}

impl QuestionsView {
    pub fn new(source: Arc<dyn RecordSource>, fetch_page_size: usize) -> Self {
        Self {
            feed: Feed::new(source, PageQuery::newest_first(Table::Questions, fetch_page_size)),
            state: ViewState::new(Tab::All),
            expanded: None,
        }
    }

    /// Fresh mount: fetch every question, newest first
    pub async fn open(&self) -> LoadOutcome {
        self.feed.load_all(MAX_QUESTION_PAGES).await
    }

    pub fn close(&self) {
        self.feed.close();
    }

    pub fn feed(&self) -> &Feed<Question> {
        &self.feed
    }

    pub fn state(&self) -> &ViewState<()> {
        &self.state
    }

    pub fn select_category(&mut self, category: impl Into<String>) {
        self.state.set_category(category);
    }

    pub fn search(&mut self, term: impl Into<String>) {
        self.state.set_search(term);
    }

    /// Unfold a question, or fold it if it is already open
    pub fn toggle_expand(&mut self, id: &ItemId) {
        if self.expanded.as_ref() == Some(id) {
            self.expanded = None;
        } else {
            self.expanded = Some(id.clone());
        }
    }

    pub fn render(&self) -> QuestionsListing {
        let criteria = self.state.criteria();

        self.feed.with_cache(|cache| {
            let questions = filter(cache.items(), criteria);

            QuestionsListing {
                categories: category_options(cache.items(), &criteria.tab),
                selected_category: criteria.category.clone(),
                empty: EmptyState::classify(cache.len(), questions.len()),
                questions,
                expanded: self.expanded.clone(),
            }
        })
    }
}
