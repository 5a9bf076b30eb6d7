//! Typed access to the banking REST API.
//!
//! - [`Client`]: one method per endpoint.
//! - [`Session`]: who is logged in, shared by every clone of the client.
//! - [`pager`]: paginated lists that ignore stale responses.

pub use api::{ALL_TRANSACTIONS_PAGE_SIZE, Client};
pub use error::{ClientError, Result};
pub use pager::{
    AccountPager, LoadState, PageKey, PageSource, PageState, Pager, Reload, TransactionPager,
};
pub use session::Session;

mod api;
mod error;
pub mod pager;
pub mod session;
