use std::sync::Arc;

use api_types::{
    account::{Account, AccountNew, AccountStatus, AccountUpdate},
    category::Category,
    page::{Page, PageQuery},
    transaction::{Transaction, TransactionNew, TransactionUpdate, TransferDone, TransferNew},
    user::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, User},
};
use chrono::NaiveDate;
use reqwest::{RequestBuilder, Url};
use serde::de::DeserializeOwned;

use crate::{ClientError, Result, session::Session};

/// Page size used to pull a whole account history in one request.
pub const ALL_TRANSACTIONS_PAGE_SIZE: u32 = 10_000;

/// HTTP client for the banking REST API.
///
/// Cheap to clone: clones share the connection pool, the cookie jar and the
/// [`Session`].
#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    http: reqwest::Client,
    session: Arc<Session>,
}

impl Client {
    /// `base_url` is the API root, e.g. `http://localhost:8000/api`.
    pub fn new(base_url: &str) -> Result<Self> {
        let mut base_url =
            Url::parse(base_url).map_err(|err| ClientError::InvalidUrl(err.to_string()))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let http = reqwest::Client::builder().cookie_store(true).build()?;
        Ok(Self {
            base_url,
            http,
            session: Arc::new(Session::new()),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|err| ClientError::InvalidUrl(format!("{path}: {err}")))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.session.access_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn execute(&self, request: RequestBuilder) -> Result<reqwest::Response> {
        let res = self
            .authorize(request)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .inspect_err(|err| tracing::debug!("request failed: {err}"))?;

        let status = res.status();
        if status.is_success() {
            return Ok(res);
        }

        let body = res.text().await.unwrap_or_default();
        tracing::debug!("request failed with {status}: {body}");
        let err = ClientError::from_status(status, &body);
        if err.is_unauthorized() {
            self.session.clear();
        }
        Err(err)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let res = self.execute(request).await?;
        Ok(res.json::<T>().await?)
    }

    async fn send_empty(&self, request: RequestBuilder) -> Result<()> {
        self.execute(request).await?;
        Ok(())
    }

    pub async fn accounts(&self, query: PageQuery) -> Result<Page<Account>> {
        let url = self.endpoint("v1/accounts")?;
        self.send(self.http.get(url).query(&query)).await
    }

    pub async fn account(&self, id: i64) -> Result<Account> {
        let url = self.endpoint(&format!("v1/accounts/{id}"))?;
        self.send(self.http.get(url)).await
    }

    pub async fn create_account(&self, payload: &AccountNew) -> Result<Account> {
        let url = self.endpoint("v1/accounts")?;
        self.send(self.http.post(url).json(payload)).await
    }

    pub async fn update_account(&self, id: i64, payload: &AccountUpdate) -> Result<Account> {
        let url = self.endpoint(&format!("v1/accounts/{id}"))?;
        self.send(self.http.put(url).json(payload)).await
    }

    /// Marks the account closed as of `today`.
    pub async fn close_account(&self, id: i64, today: NaiveDate) -> Result<Account> {
        let payload = AccountUpdate {
            status: Some(AccountStatus::Closed),
            close_date: Some(today),
            ..AccountUpdate::default()
        };
        self.update_account(id, &payload).await
    }

    pub async fn delete_account(&self, id: i64) -> Result<()> {
        let url = self.endpoint(&format!("v1/accounts/{id}"))?;
        self.send_empty(self.http.delete(url)).await
    }

    pub async fn transactions(&self, account_id: i64, query: PageQuery) -> Result<Page<Transaction>> {
        let url = self.endpoint(&format!("v1/accounts/{account_id}/transactions"))?;
        self.send(self.http.get(url).query(&query)).await
    }

    /// The whole history of an account, as used by the dashboard charts.
    pub async fn all_transactions(&self, account_id: i64) -> Result<Vec<Transaction>> {
        let query = PageQuery {
            page: 1,
            per_page: ALL_TRANSACTIONS_PAGE_SIZE,
        };
        Ok(self.transactions(account_id, query).await?.data)
    }

    pub async fn create_transaction(
        &self,
        account_id: i64,
        payload: &TransactionNew,
    ) -> Result<Transaction> {
        let url = self.endpoint(&format!("v1/accounts/{account_id}/transactions"))?;
        self.send(self.http.post(url).json(payload)).await
    }

    pub async fn update_transaction(
        &self,
        id: i64,
        payload: &TransactionUpdate,
    ) -> Result<Transaction> {
        let url = self.endpoint(&format!("v1/transactions/{id}"))?;
        self.send(self.http.put(url).json(payload)).await
    }

    pub async fn delete_transaction(&self, id: i64) -> Result<()> {
        let url = self.endpoint(&format!("v1/transactions/{id}"))?;
        self.send_empty(self.http.delete(url)).await
    }

    pub async fn categories(&self) -> Result<Vec<Category>> {
        let url = self.endpoint("v1/categories")?;
        self.send(self.http.get(url)).await
    }

    pub async fn transfer(&self, payload: &TransferNew) -> Result<TransferDone> {
        let url = self.endpoint("v1/transfers")?;
        let res = self.execute(self.http.post(url).json(payload)).await?;
        // Some backends answer 201 with an empty body.
        let body = res.text().await?;
        Ok(serde_json::from_str(&body).unwrap_or_default())
    }

    /// Logs in and loads the user into the session.
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        let url = self.endpoint("v1/login")?;
        let payload = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let res = self.execute(self.http.post(url).json(&payload)).await?;
        let body = res.text().await?;
        let tokens: LoginResponse = serde_json::from_str(&body).unwrap_or_default();
        self.session.set_access_token(tokens.access_token);

        match self.session.refresh(self).await? {
            Some(user) => {
                tracing::info!("logged in as {}", user.email);
                Ok(user)
            }
            None => Err(ClientError::Unauthorized),
        }
    }

    pub async fn register(&self, payload: &RegisterRequest) -> Result<User> {
        let url = self.endpoint("v1/register")?;
        let res: RegisterResponse = self.send(self.http.post(url).json(payload)).await?;
        Ok(res.user)
    }

    /// Logs out on the server. The local session is cleared even if the call
    /// fails.
    pub async fn logout(&self) -> Result<()> {
        let url = self.endpoint("v1/logout")?;
        let result = self.send_empty(self.http.post(url)).await;
        self.session.clear();
        result
    }

    pub async fn current_user(&self) -> Result<User> {
        let url = self.endpoint("v1/user")?;
        self.send(self.http.get(url)).await
    }

    /// `true` when the server accepts the current cookies/token.
    pub async fn auth_status(&self) -> Result<bool> {
        let url = self.endpoint("v1/auth_status")?;
        match self.execute(self.http.get(url)).await {
            Ok(_) => Ok(true),
            Err(ClientError::Unauthorized) => Ok(false),
            Err(err) => Err(err),
        }
    }
}
