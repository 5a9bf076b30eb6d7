use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Error returned when a wire enum is parsed from an unknown string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {}: {}", self.kind, self.value)
    }
}

impl std::error::Error for UnknownVariant {}

/// Forgiving deserializers for fields the backend does not serialize
/// consistently (decimal columns as strings, timestamps where a date is
/// expected).
///
/// Every helper maps an unreadable value to `None` instead of failing the
/// whole payload. Use them together with `#[serde(default)]`.
pub mod lenient {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, de::IgnoredAny};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
        #[allow(dead_code)]
        Other(IgnoredAny),
    }

    /// Amount in major units, from a JSON number or a numeric string.
    ///
    /// Non-finite values are dropped.
    pub fn amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = match Option::<Raw>::deserialize(deserializer)? {
            Some(Raw::Number(value)) => Some(value),
            Some(Raw::Text(text)) => text.trim().parse::<f64>().ok(),
            Some(Raw::Other(_)) | None => None,
        };
        Ok(value.filter(|v| v.is_finite()))
    }

    /// Calendar date from `YYYY-MM-DD` or any timestamp starting with it.
    pub fn date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = match Option::<Raw>::deserialize(deserializer)? {
            Some(Raw::Text(text)) => text
                .trim()
                .get(..10)
                .and_then(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()),
            _ => None,
        };
        Ok(value)
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Fallible<T> {
        Valid(T),
        #[allow(dead_code)]
        Invalid(IgnoredAny),
    }

    impl<T> Fallible<T> {
        fn into_option(self) -> Option<T> {
            match self {
                Self::Valid(value) => Some(value),
                Self::Invalid(_) => None,
            }
        }
    }

    /// Nested record that is dropped when it does not have the expected shape.
    pub fn optional<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        Ok(Option::<Fallible<T>>::deserialize(deserializer)?.and_then(Fallible::into_option))
    }

    /// Value that falls back to `T::default()` when unreadable.
    pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de> + Default,
    {
        Ok(optional(deserializer)?.unwrap_or_default())
    }

    /// List of records where unreadable rows are skipped.
    pub fn rows<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        let rows = Vec::<Fallible<T>>::deserialize(deserializer)?;
        Ok(rows.into_iter().filter_map(Fallible::into_option).collect())
    }

    /// Identifier that may arrive as a number or a string.
    pub fn id<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = match Option::<Raw>::deserialize(deserializer)? {
            Some(Raw::Number(value)) if value.fract() == 0.0 => format!("{value:.0}"),
            Some(Raw::Number(value)) => value.to_string(),
            Some(Raw::Text(text)) => text,
            Some(Raw::Other(_)) | None => String::new(),
        };
        Ok(value)
    }
}

pub mod page {
    use super::*;

    /// A page of server-paginated records.
    ///
    /// Rows that cannot be read at all are left out of `data`; `total` is
    /// still the server's count.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    #[serde(bound(deserialize = "T: Deserialize<'de>"))]
    pub struct Page<T> {
        #[serde(deserialize_with = "lenient::rows")]
        pub data: Vec<T>,
        #[serde(default)]
        pub total: u64,
    }

    impl<T> Page<T> {
        pub fn empty() -> Self {
            Self {
                data: Vec::new(),
                total: 0,
            }
        }
    }

    impl<T> Default for Page<T> {
        fn default() -> Self {
            Self::empty()
        }
    }

    /// Query string of every paginated listing. Pages are 1-based.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    pub struct PageQuery {
        pub page: u32,
        pub per_page: u32,
    }

    impl Default for PageQuery {
        fn default() -> Self {
            Self {
                page: 1,
                per_page: 10,
            }
        }
    }
}

pub mod account {
    use chrono::NaiveDate;

    use super::*;

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum AccountType {
        Checking,
        Savings,
        Investment,
        Cash,
        /// Missing or not known to this client.
        #[default]
        #[serde(other)]
        Unknown,
    }

    impl AccountType {
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Checking => "checking",
                Self::Savings => "savings",
                Self::Investment => "investment",
                Self::Cash => "cash",
                Self::Unknown => "unknown",
            }
        }
    }

    impl FromStr for AccountType {
        type Err = UnknownVariant;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            match s.trim().to_ascii_lowercase().as_str() {
                "checking" => Ok(Self::Checking),
                "savings" => Ok(Self::Savings),
                "investment" => Ok(Self::Investment),
                "cash" => Ok(Self::Cash),
                other => Err(UnknownVariant {
                    kind: "account type",
                    value: other.to_string(),
                }),
            }
        }
    }

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum AccountStatus {
        #[default]
        Active,
        Inactive,
        Closed,
    }

    impl AccountStatus {
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Active => "active",
                Self::Inactive => "inactive",
                Self::Closed => "closed",
            }
        }
    }

    impl FromStr for AccountStatus {
        type Err = UnknownVariant;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            match s.trim().to_ascii_lowercase().as_str() {
                "active" => Ok(Self::Active),
                "inactive" => Ok(Self::Inactive),
                "closed" => Ok(Self::Closed),
                other => Err(UnknownVariant {
                    kind: "account status",
                    value: other.to_string(),
                }),
            }
        }
    }

    /// An account as returned by the server.
    ///
    /// `balance` is authoritative server-side: clients replace it with a
    /// fresh copy after every mutating call and never adjust it locally.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Account {
        pub id: i64,
        #[serde(rename = "type", default)]
        pub account_type: AccountType,
        #[serde(default, deserialize_with = "lenient::amount")]
        pub balance: Option<f64>,
        #[serde(default, deserialize_with = "lenient::or_default")]
        pub status: AccountStatus,
        #[serde(default, deserialize_with = "lenient::date")]
        pub open_date: Option<NaiveDate>,
        #[serde(default, deserialize_with = "lenient::date")]
        pub close_date: Option<NaiveDate>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountNew {
        #[serde(rename = "type")]
        pub account_type: AccountType,
        /// Opening balance in major units.
        pub balance: f64,
        pub status: AccountStatus,
        pub open_date: NaiveDate,
    }

    /// Partial update; absent fields are left untouched by the server.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct AccountUpdate {
        #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
        pub account_type: Option<AccountType>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub status: Option<AccountStatus>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub close_date: Option<NaiveDate>,
    }
}

pub mod category {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Category {
        pub id: i64,
        pub name: String,
    }
}

pub mod transaction {
    use chrono::NaiveDate;

    use super::*;
    use crate::category::Category;

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TransactionType {
        Deposit,
        Withdrawal,
        Transfer,
        /// Missing or not known to this client; left out of every total.
        #[default]
        #[serde(other)]
        Unknown,
    }

    impl TransactionType {
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Deposit => "deposit",
                Self::Withdrawal => "withdrawal",
                Self::Transfer => "transfer",
                Self::Unknown => "unknown",
            }
        }
    }

    impl FromStr for TransactionType {
        type Err = UnknownVariant;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            match s.trim().to_ascii_lowercase().as_str() {
                "deposit" => Ok(Self::Deposit),
                "withdrawal" => Ok(Self::Withdrawal),
                "transfer" => Ok(Self::Transfer),
                other => Err(UnknownVariant {
                    kind: "transaction type",
                    value: other.to_string(),
                }),
            }
        }
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Transaction {
        pub id: i64,
        pub account_id: i64,
        #[serde(default, deserialize_with = "lenient::optional")]
        pub category: Option<Category>,
        #[serde(rename = "type", default)]
        pub transaction_type: TransactionType,
        /// Non-negative amount in major units; the type gives the direction.
        #[serde(default, deserialize_with = "lenient::amount")]
        pub amount: Option<f64>,
        #[serde(default, deserialize_with = "lenient::date")]
        pub transaction_date: Option<NaiveDate>,
        #[serde(default)]
        pub description: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionNew {
        #[serde(rename = "type")]
        pub transaction_type: TransactionType,
        pub amount: f64,
        pub transaction_date: NaiveDate,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub category_id: Option<i64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub description: Option<String>,
    }

    /// Partial update; absent fields are left untouched by the server.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionUpdate {
        #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
        pub transaction_type: Option<TransactionType>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub amount: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub transaction_date: Option<NaiveDate>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub category_id: Option<i64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub description: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransferNew {
        pub from_account_id: i64,
        pub to_account_id: i64,
        pub amount: f64,
        pub description: Option<String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransferDone {
        #[serde(default)]
        pub message: Option<String>,
    }
}

pub mod user {
    use super::*;

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum UserRole {
        #[default]
        User,
        Operator,
        Admin,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct User {
        #[serde(deserialize_with = "lenient::id")]
        pub id: String,
        #[serde(default)]
        pub first_name: String,
        #[serde(default)]
        pub last_name: String,
        pub email: String,
        #[serde(default)]
        pub role: UserRole,
    }

    impl User {
        pub fn display_name(&self) -> String {
            let full = format!("{} {}", self.first_name, self.last_name);
            let full = full.trim();
            if full.is_empty() {
                self.email.clone()
            } else {
                full.to_string()
            }
        }
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LoginRequest {
        pub email: String,
        pub password: String,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct LoginResponse {
        #[serde(default)]
        pub access_token: Option<String>,
        #[serde(default)]
        pub refresh_token: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RegisterRequest {
        pub first_name: String,
        pub last_name: String,
        pub email: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RegisterResponse {
        #[serde(default)]
        pub message: Option<String>,
        pub user: User,
    }
}
