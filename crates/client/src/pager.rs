//! Loading of server-paginated lists.
//!
//! A [`Pager`] owns the cached page of one list (the accounts, or the
//! transactions of the selected account) and is the only writer of it.
//! Every request gets a generation number; when a response arrives for a
//! generation that is no longer current (the key changed or a reload was
//! issued meanwhile) it is dropped, so a slow answer for an old account or
//! page can never overwrite a newer one.
//!
//! States go `idle -> loading -> success | error`. A failed load keeps the
//! rows already shown.

use std::{
    fmt::Debug,
    future::Future,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use api_types::{
    account::Account,
    page::{Page, PageQuery},
    transaction::Transaction,
};

use crate::{Client, ClientError, Result};

/// Where the pages come from.
pub trait PageSource: Send + Sync {
    /// The entity a list belongs to (an account id for transactions).
    type Scope: Clone + Debug + PartialEq + Send + Sync;
    type Item: Clone + Send + Sync;

    fn fetch(
        &self,
        scope: &Self::Scope,
        query: PageQuery,
    ) -> impl Future<Output = Result<Page<Self::Item>>> + Send;
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageKey<S> {
    /// `None` means nothing is selected: the list is empty and no request is
    /// made.
    pub scope: Option<S>,
    pub query: PageQuery,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct PageState<T> {
    pub data: Vec<T>,
    pub total: u64,
    pub loading: bool,
    pub status: LoadState,
    pub error: Option<Arc<ClientError>>,
}

impl<T> Default for PageState<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            total: 0,
            loading: false,
            status: LoadState::Idle,
            error: None,
        }
    }
}

/// Per-call overrides for [`Pager::reload`]. Unset fields keep the current
/// key.
#[derive(Debug, Clone)]
pub struct Reload<S> {
    pub scope: Option<S>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl<S> Default for Reload<S> {
    fn default() -> Self {
        Self {
            scope: None,
            page: None,
            per_page: None,
        }
    }
}

struct Inner<S: PageSource> {
    key: PageKey<S::Scope>,
    generation: u64,
    state: PageState<S::Item>,
}

pub struct Pager<S: PageSource> {
    source: S,
    inner: Mutex<Inner<S>>,
}

impl<S: PageSource> Pager<S> {
    pub fn new(source: S, key: PageKey<S::Scope>) -> Self {
        Self {
            source,
            inner: Mutex::new(Inner {
                key,
                generation: 0,
                state: PageState::default(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<S>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> PageState<S::Item> {
        self.lock().state.clone()
    }

    pub fn key(&self) -> PageKey<S::Scope> {
        self.lock().key.clone()
    }

    /// Switches to `key` and fetches it.
    pub async fn load(&self, key: PageKey<S::Scope>) -> PageState<S::Item> {
        let (generation, scope, query) = {
            let mut inner = self.lock();
            inner.generation += 1;
            inner.key = key.clone();
            inner.state.error = None;

            let Some(scope) = key.scope else {
                inner.state = PageState::default();
                return inner.state.clone();
            };
            inner.state.loading = true;
            inner.state.status = LoadState::Loading;
            (inner.generation, scope, key.query)
        };

        let result = self.source.fetch(&scope, query).await;

        let mut inner = self.lock();
        if inner.generation != generation {
            tracing::debug!(
                "discarding stale page {} of {scope:?} (generation {generation}, current {})",
                query.page,
                inner.generation
            );
            return inner.state.clone();
        }

        match result {
            Ok(page) => {
                inner.state.data = page.data;
                inner.state.total = page.total;
                inner.state.status = LoadState::Success;
            }
            Err(err) => {
                tracing::warn!("failed to load page {} of {scope:?}: {err}", query.page);
                inner.state.error = Some(Arc::new(err));
                inner.state.status = LoadState::Error;
            }
        }
        inner.state.loading = false;
        inner.state.clone()
    }

    /// Selects another entity, keeping the page settings.
    pub async fn select(&self, scope: Option<S::Scope>) -> PageState<S::Item> {
        let query = self.key().query;
        self.load(PageKey { scope, query }).await
    }

    pub async fn set_page(&self, page: u32, per_page: u32) -> PageState<S::Item> {
        let scope = self.key().scope;
        self.load(PageKey {
            scope,
            query: PageQuery { page, per_page },
        })
        .await
    }

    /// Re-fetches the current key with optional overrides. Call it after any
    /// create/update/delete so the list shows what the server has.
    pub async fn reload(&self, overrides: Reload<S::Scope>) -> PageState<S::Item> {
        let current = self.key();
        let key = PageKey {
            scope: overrides.scope.or(current.scope),
            query: PageQuery {
                page: overrides.page.unwrap_or(current.query.page),
                per_page: overrides.per_page.unwrap_or(current.query.per_page),
            },
        };
        self.load(key).await
    }
}

#[derive(Debug, Clone)]
pub struct AccountPages {
    client: Client,
}

impl PageSource for AccountPages {
    type Scope = ();
    type Item = Account;

    async fn fetch(&self, _scope: &(), query: PageQuery) -> Result<Page<Account>> {
        self.client.accounts(query).await
    }
}

#[derive(Debug, Clone)]
pub struct TransactionPages {
    client: Client,
}

impl PageSource for TransactionPages {
    /// Account id.
    type Scope = i64;
    type Item = Transaction;

    async fn fetch(&self, account_id: &i64, query: PageQuery) -> Result<Page<Transaction>> {
        self.client.transactions(*account_id, query).await
    }
}

pub type AccountPager = Pager<AccountPages>;
pub type TransactionPager = Pager<TransactionPages>;

impl Pager<AccountPages> {
    /// The account list has no owning entity, so it is always selected.
    pub fn accounts(client: Client, query: PageQuery) -> Self {
        Self::new(
            AccountPages { client },
            PageKey {
                scope: Some(()),
                query,
            },
        )
    }
}

impl Pager<TransactionPages> {
    /// Starts with no account selected.
    pub fn transactions(client: Client, query: PageQuery) -> Self {
        Self::new(TransactionPages { client }, PageKey { scope: None, query })
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::atomic::{AtomicUsize, Ordering},
        time::Duration,
    };

    use super::*;

    /// Answers with one row naming the scope and page, after `delay(scope)`
    /// milliseconds. Scope 0 fails.
    struct FakeSource {
        calls: AtomicUsize,
    }

    impl FakeSource {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl PageSource for FakeSource {
        type Scope = u64;
        type Item = String;

        async fn fetch(&self, scope: &u64, query: PageQuery) -> Result<Page<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(*scope)).await;
            if *scope == 0 {
                return Err(ClientError::Server("boom".to_string()));
            }
            Ok(Page {
                data: vec![format!("{scope}/{}", query.page)],
                total: *scope,
            })
        }
    }

    fn key(scope: Option<u64>, page: u32) -> PageKey<u64> {
        PageKey {
            scope,
            query: PageQuery { page, per_page: 10 },
        }
    }

    #[tokio::test]
    async fn no_scope_is_empty_without_fetching() {
        let pager = Pager::new(FakeSource::new(), key(None, 1));
        let state = pager.load(key(None, 1)).await;

        assert!(state.data.is_empty());
        assert_eq!(state.total, 0);
        assert!(!state.loading);
        assert_eq!(pager.source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn loads_and_reloads_with_overrides() {
        let pager = Pager::new(FakeSource::new(), key(None, 1));
        let state = pager.select(Some(5)).await;
        assert_eq!(state.data, ["5/1"]);
        assert_eq!(state.total, 5);
        assert_eq!(state.status, LoadState::Success);

        let state = pager
            .reload(Reload {
                page: Some(3),
                ..Reload::default()
            })
            .await;
        assert_eq!(state.data, ["5/3"]);
        assert_eq!(pager.key(), key(Some(5), 3));
    }

    #[tokio::test]
    async fn slow_response_for_old_key_is_discarded() {
        let pager = Pager::new(FakeSource::new(), key(None, 1));

        let slow = pager.load(key(Some(150), 1));
        let fast = async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            pager.load(key(Some(1), 2)).await
        };
        let (stale, fresh) = tokio::join!(slow, fast);

        assert_eq!(fresh.data, ["1/2"]);
        // The old request resolved last but did not overwrite anything.
        assert_eq!(stale.data, ["1/2"]);
        let state = pager.snapshot();
        assert_eq!(state.data, ["1/2"]);
        assert_eq!(state.total, 1);
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn deselecting_discards_in_flight_request() {
        let pager = Pager::new(FakeSource::new(), key(None, 1));

        let slow = pager.load(key(Some(100), 1));
        let clear = async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            pager.select(None).await
        };
        tokio::join!(slow, clear);

        let state = pager.snapshot();
        assert!(state.data.is_empty());
        assert_eq!(state.status, LoadState::Idle);
    }

    #[tokio::test]
    async fn failure_keeps_previous_rows() {
        let pager = Pager::new(FakeSource::new(), key(None, 1));
        pager.select(Some(2)).await;

        let state = pager.select(Some(0)).await;
        assert_eq!(state.status, LoadState::Error);
        assert!(state.error.is_some());
        assert_eq!(state.data, ["2/1"]);

        let state = pager.select(Some(2)).await;
        assert!(state.error.is_none());
    }
}
