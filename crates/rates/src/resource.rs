//! Generic loadable resource.
//!
//! Every entity the dashboard shows (currencies, rates, plans, ...) follows
//! the same shape: a list, a selected item and a loading flag. `Resource`
//! captures that once for any `T`.

use std::future::Future;

use tokio::sync::RwLock;

/// Result of a list fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The list was replaced with this many items.
    Loaded(usize),
    /// Another fetch was in flight; nothing was done.
    Skipped,
}

#[derive(Debug)]
struct State<T> {
    list: Vec<T>,
    one: Option<T>,
    loading: bool,
}

/// A list, a selected item and a loading flag.
#[derive(Debug)]
pub struct Resource<T> {
    state: RwLock<State<T>>,
}

impl<T> Default for Resource<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Resource<T> {
    /// Creates an empty resource.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: RwLock::new(State {
                list: Vec::new(),
                one: None,
                loading: false,
            }),
        }
    }

    /// Returns true while a fetch is in flight.
    pub async fn is_loading(&self) -> bool {
        self.state.read().await.loading
    }

    /// Number of items in the list.
    pub async fn len(&self) -> usize {
        self.state.read().await.list.len()
    }

    /// Returns true if the list is empty.
    pub async fn is_empty(&self) -> bool {
        self.state.read().await.list.is_empty()
    }

    /// Loads the list with `fetch`.
    ///
    /// Skipped while another fetch is in flight. A non-silent fetch clears
    /// the list before loading so stale items are never shown; a silent one
    /// keeps them until the new list arrives. The loading flag is reset
    /// whatever the outcome, and a failed fetch leaves the list as it was
    /// after clearing.
    pub async fn fetch<F, Fut, E>(&self, silent: bool, fetch: F) -> Result<FetchOutcome, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<T>, E>>,
    {
        {
            let mut state = self.state.write().await;
            if state.loading {
                return Ok(FetchOutcome::Skipped);
            }
            if !silent {
                state.list.clear();
            }
            state.loading = true;
        }

        let result = fetch().await;

        let mut state = self.state.write().await;
        state.loading = false;
        let items = result?;
        let count = items.len();
        state.list = items;
        Ok(FetchOutcome::Loaded(count))
    }

    /// Replaces the list.
    pub async fn set(&self, items: Vec<T>) {
        self.state.write().await.list = items;
    }
}

impl<T: Clone> Resource<T> {
    /// Loads the selected item with `fetch` and returns a copy of it.
    ///
    /// Unlike [`Resource::fetch`] this never skips.
    pub async fn fetch_one<F, Fut, E>(&self, fetch: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.state.write().await.loading = true;
        let result = fetch().await;

        let mut state = self.state.write().await;
        state.loading = false;
        let item = result?;
        state.one = Some(item.clone());
        Ok(item)
    }

    /// Copy of the list.
    pub async fn list(&self) -> Vec<T> {
        self.state.read().await.list.clone()
    }

    /// Copy of the selected item.
    pub async fn one(&self) -> Option<T> {
        self.state.read().await.one.clone()
    }
}
