use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

use super::{map_volumes, Book, BooksApi};
use crate::filter::{derive_categories, filter_items, ALL_CATEGORY};
use crate::ticket::Tickets;

/// Search term used when the user has not typed anything.
pub const DEFAULT_BOOKS_QUERY: &str = "subject:fiction";
pub const NO_BOOKS_FOUND: &str = "No books found.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BooksState {
    pub books: Vec<Book>,
    pub is_loading: bool,
    pub error: String,
    pub categories: Vec<String>,
    pub selected_category: String,
    /// Last search term sent to Google; an empty string means the default term.
    pub query: String,
}

impl Default for BooksState {
    fn default() -> Self {
        Self {
            books: Vec::new(),
            is_loading: false,
            error: String::new(),
            categories: vec![ALL_CATEGORY.to_string()],
            selected_category: ALL_CATEGORY.to_string(),
            query: String::new(),
        }
    }
}

/// State holder for the books tab.
///
/// Text search is delegated to Google (every `search` is a new request); the
/// category chips filter the fetched page locally.
pub struct BooksStore {
    api: Arc<dyn BooksApi>,
    page_size: u32,
    state: watch::Sender<BooksState>,
    catalogue: Mutex<Vec<Book>>,
    tickets: Tickets,
}

impl BooksStore {
    pub fn new(api: Arc<dyn BooksApi>, page_size: u32) -> Self {
        let (state, _) = watch::channel(BooksState::default());
        Self {
            api,
            page_size,
            state,
            catalogue: Mutex::new(Vec::new()),
            tickets: Tickets::default(),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<BooksState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> BooksState {
        self.state.borrow().clone()
    }

    pub async fn fetch(&self, query: &str) {
        let query = query.trim().to_string();
        let ticket = self.tickets.issue();
        self.state.send_modify(|s| {
            s.is_loading = true;
            s.error.clear();
            s.query = query.clone();
        });

        let term = if query.is_empty() {
            DEFAULT_BOOKS_QUERY
        } else {
            query.as_str()
        };
        let result = self.api.search_volumes(term, 0, self.page_size).await;

        let mut catalogue = self.catalogue.lock().await;
        if !self.tickets.is_current(ticket) {
            debug!(query = %term, "Dropping superseded books response");
            return;
        }

        match result {
            Ok(response) => {
                *catalogue = map_volumes(response);
                let categories = derive_categories(catalogue.as_slice());
                let count = catalogue.len();
                info!(query = %term, count, "Fetched books");
                self.state.send_modify(|s| {
                    s.is_loading = false;
                    if !categories.contains(&s.selected_category) {
                        s.selected_category = ALL_CATEGORY.to_string();
                    }
                    s.books = filter_items(catalogue.as_slice(), &s.selected_category, "");
                    s.categories = categories;
                    if count == 0 {
                        s.error = NO_BOOKS_FOUND.to_string();
                    }
                });
            }
            Err(e) => {
                warn!(query = %term, "Books fetch failed: {}", e);
                self.state.send_modify(|s| {
                    s.is_loading = false;
                    s.error = e.to_string();
                });
            }
        }
    }

    pub async fn search(&self, query: &str) {
        self.fetch(query).await;
    }

    pub async fn refresh(&self) {
        let query = self.state.borrow().query.clone();
        self.fetch(&query).await;
    }

    pub async fn retry(&self) {
        self.refresh().await;
    }

    pub async fn select_category(&self, category: &str) {
        let catalogue = self.catalogue.lock().await;
        self.state.send_modify(|s| {
            s.selected_category = category.to_string();
            s.books = filter_items(catalogue.as_slice(), category, "");
        });
    }

    /// Flip the client-side favorite flag. Lost on the next fetch.
    pub async fn toggle_favorite(&self, id: &str) {
        let mut catalogue = self.catalogue.lock().await;
        for book in catalogue.iter_mut().filter(|b| b.id == id) {
            book.favorite = !book.favorite;
        }
        self.state.send_modify(|s| {
            for book in s.books.iter_mut().filter(|b| b.id == id) {
                book.favorite = !book.favorite;
            }
        });
    }
}
