use api_types::{
    account::{Account, AccountNew, AccountStatus, AccountType, AccountUpdate},
    page::PageQuery,
    transaction::{Transaction, TransactionNew, TransactionType, TransactionUpdate},
    user::RegisterRequest,
};
use chrono::NaiveDate;
use clap::Subcommand;
use client::{AccountPager, Client, PageState, Reload, TransactionPager};
use engine::{
    MoneyCents, PeriodFilter, Selection, TransferDraft, account_summary, aggregate,
    monthly_series, running_balances,
};

use crate::{
    config::AppConfig,
    error::{AppError, Result},
    output,
};

/// Page size used when the dashboard needs every account.
const ALL_ACCOUNTS_PAGE_SIZE: u32 = 1_000;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check the configured credentials and show the logged in user.
    Login,
    /// Create a user with the configured email and password.
    Register {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
    },
    Logout,
    /// Show the logged in user.
    Whoami,
    /// List accounts.
    Accounts {
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        per_page: Option<u32>,
    },
    /// Show one account.
    Account { id: i64 },
    AccountNew {
        /// checking, savings, investment or cash.
        #[arg(long = "type")]
        account_type: AccountType,
        #[arg(long, default_value = "0")]
        balance: MoneyCents,
        /// Defaults to today.
        #[arg(long)]
        open_date: Option<NaiveDate>,
    },
    AccountUpdate {
        id: i64,
        #[arg(long = "type")]
        account_type: Option<AccountType>,
        #[arg(long)]
        status: Option<AccountStatus>,
    },
    /// Mark an account closed as of today.
    AccountClose { id: i64 },
    AccountDelete { id: i64 },
    /// List the transactions of an account, newest first, with running balance.
    Transactions {
        account: i64,
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        per_page: Option<u32>,
    },
    TransactionNew {
        account: i64,
        /// deposit, withdrawal or transfer.
        #[arg(long = "type")]
        transaction_type: TransactionType,
        #[arg(long)]
        amount: MoneyCents,
        /// Defaults to today.
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        category: Option<i64>,
        #[arg(long)]
        description: Option<String>,
    },
    TransactionUpdate {
        id: i64,
        /// Account whose balance is shown after the update.
        #[arg(long)]
        account: Option<i64>,
        #[arg(long = "type")]
        transaction_type: Option<TransactionType>,
        #[arg(long)]
        amount: Option<MoneyCents>,
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        category: Option<i64>,
        #[arg(long)]
        description: Option<String>,
    },
    TransactionDelete {
        id: i64,
        /// Account whose balance is shown after the deletion.
        #[arg(long)]
        account: Option<i64>,
    },
    Categories,
    /// Move money between two accounts.
    Transfer {
        #[arg(long)]
        from: i64,
        #[arg(long)]
        to: i64,
        #[arg(long)]
        amount: MoneyCents,
        #[arg(long)]
        description: Option<String>,
    },
    /// Spending and income of a period, with the last months of activity.
    Dashboard {
        /// Only this account; all accounts when omitted.
        #[arg(long)]
        account: Option<i64>,
        /// A year or "all" (current year).
        #[arg(long, default_value = "all")]
        year: Selection<i32>,
        /// A month 1-12 or "all" (current month).
        #[arg(long, default_value = "all")]
        month: Selection<u32>,
        #[arg(long, default_value_t = 5)]
        top: usize,
    },
}

impl Command {
    fn needs_login(&self) -> bool {
        !matches!(self, Command::Register { .. } | Command::Login)
    }
}

pub async fn run(client: &Client, config: &AppConfig, command: Command) -> Result<()> {
    if command.needs_login() && config.has_credentials() {
        client.login(config.email.trim(), &config.password).await?;
    }

    match command {
        Command::Login => {
            if !config.has_credentials() {
                return Err(AppError::Input(
                    "set email and password in the config file or BANKDESK_EMAIL/BANKDESK_PASSWORD"
                        .to_string(),
                ));
            }
            let user = client.login(config.email.trim(), &config.password).await?;
            println!("Logged in as {} <{}>", user.display_name(), user.email);
        }
        Command::Register {
            first_name,
            last_name,
        } => {
            if !config.has_credentials() {
                return Err(AppError::Input(
                    "set email and password before registering".to_string(),
                ));
            }
            let user = client
                .register(&RegisterRequest {
                    first_name,
                    last_name,
                    email: config.email.trim().to_string(),
                    password: config.password.clone(),
                })
                .await?;
            println!("Registered {} <{}>", user.display_name(), user.email);
        }
        Command::Logout => {
            client.logout().await?;
            println!("Logged out");
        }
        Command::Whoami => match client.session().refresh(client).await? {
            Some(user) => println!("{} <{}> ({:?})", user.display_name(), user.email, user.role),
            None => println!("Not logged in"),
        },
        Command::Accounts { page, per_page } => {
            let query = PageQuery {
                page,
                per_page: per_page.unwrap_or(config.per_page),
            };
            let pager = AccountPager::accounts(client.clone(), query);
            let state = loaded(pager.reload(Reload::default()).await)?;
            println!("{}", output::accounts_table(&state.data));
            println!("Page {page}, {} accounts in total", state.total);
        }
        Command::Account { id } => {
            let account = client.account(id).await?;
            println!("{}", output::accounts_table(&[account]));
        }
        Command::AccountNew {
            account_type,
            balance,
            open_date,
        } => {
            let open_date = match open_date {
                Some(date) => date,
                None => config.today()?,
            };
            let created = client
                .create_account(&AccountNew {
                    account_type,
                    balance: balance.to_major(),
                    status: AccountStatus::Active,
                    open_date,
                })
                .await?;
            print_account(client, created.id).await?;
        }
        Command::AccountUpdate {
            id,
            account_type,
            status,
        } => {
            client
                .update_account(
                    id,
                    &AccountUpdate {
                        account_type,
                        status,
                        close_date: None,
                    },
                )
                .await?;
            print_account(client, id).await?;
        }
        Command::AccountClose { id } => {
            client.close_account(id, config.today()?).await?;
            print_account(client, id).await?;
        }
        Command::AccountDelete { id } => {
            client.delete_account(id).await?;
            println!("Deleted account {id}");
        }
        Command::Transactions {
            account,
            page,
            per_page,
        } => {
            let per_page = per_page.unwrap_or(config.per_page);
            list_transactions(client, account, page, per_page).await?;
        }
        Command::TransactionNew {
            account,
            transaction_type,
            amount,
            date,
            category,
            description,
        } => {
            let transaction_date = match date {
                Some(date) => date,
                None => config.today()?,
            };
            let created = client
                .create_transaction(
                    account,
                    &TransactionNew {
                        transaction_type,
                        amount: positive(amount)?,
                        transaction_date,
                        category_id: category,
                        description,
                    },
                )
                .await?;
            println!("Created transaction {}", created.id);
            print_account(client, account).await?;
        }
        Command::TransactionUpdate {
            id,
            account,
            transaction_type,
            amount,
            date,
            category,
            description,
        } => {
            let amount = amount.map(positive).transpose()?;
            let updated = client
                .update_transaction(
                    id,
                    &TransactionUpdate {
                        transaction_type,
                        amount,
                        transaction_date: date,
                        category_id: category,
                        description,
                    },
                )
                .await?;
            println!("Updated transaction {}", updated.id);
            print_account(client, account.unwrap_or(updated.account_id)).await?;
        }
        Command::TransactionDelete { id, account } => {
            client.delete_transaction(id).await?;
            println!("Deleted transaction {id}");
            if let Some(account) = account {
                print_account(client, account).await?;
            }
        }
        Command::Categories => {
            let rows = client
                .categories()
                .await?
                .into_iter()
                .map(|c| vec![c.id.to_string(), c.name])
                .collect();
            println!("{}", output::pretty_table(&["ID", "Name"], rows));
        }
        Command::Transfer {
            from,
            to,
            amount,
            description,
        } => {
            let source = client.account(from).await?;
            let destination = client.account(to).await?;
            let payload = TransferDraft {
                from: Some(&source),
                to: Some(&destination),
                amount,
                description,
            }
            .validate()?;
            let done = client.transfer(&payload).await?;
            println!("{}", done.message.as_deref().unwrap_or("Transfer completed"));
            let refreshed = vec![client.account(from).await?, client.account(to).await?];
            println!("{}", output::accounts_table(&refreshed));
        }
        Command::Dashboard {
            account,
            year,
            month,
            top,
        } => {
            let filter = PeriodFilter::new(year, month)?;
            dashboard(client, config, account, filter, top).await?;
        }
    }

    Ok(())
}

/// Amounts travel as non-negative numbers; the type gives the direction.
fn positive(amount: MoneyCents) -> Result<f64> {
    if !amount.is_positive() {
        return Err(AppError::Input("amount must be greater than zero".to_string()));
    }
    Ok(amount.to_major())
}

/// Fails when fewer newer rows came back than precede the requested page,
/// e.g. because the server caps `per_page` or dropped unreadable rows.
fn ensure_complete(expected: u64, received: usize) -> Result<()> {
    if u64::try_from(received).ok() != Some(expected) {
        tracing::warn!("expected {expected} newer transactions, got {received}");
        return Err(AppError::PartialHistory { expected, received });
    }
    Ok(())
}

fn loaded<T>(state: PageState<T>) -> Result<PageState<T>> {
    match state.error {
        Some(err) => Err(AppError::Fetch(err)),
        None => Ok(state),
    }
}

/// Re-fetches an account so the balance shown is the server's.
async fn print_account(client: &Client, id: i64) -> Result<()> {
    let account = client.account(id).await?;
    println!("{}", output::accounts_table(&[account]));
    Ok(())
}

async fn list_transactions(client: &Client, account_id: i64, page: u32, per_page: u32) -> Result<()> {
    let account = client.account(account_id).await?;
    let pager = TransactionPager::transactions(client.clone(), PageQuery { page, per_page });
    let state = loaded(pager.select(Some(account_id)).await)?;

    // The current balance belongs to the newest row overall, so rows on
    // later pages need the newer rows undone first.
    let count = u64::from(page.saturating_sub(1)) * u64::from(per_page);
    let newer = if count == 0 || state.data.is_empty() {
        Vec::new()
    } else {
        let per_page = u32::try_from(count)
            .map_err(|_| AppError::Input(format!("page {page} is out of range")))?;
        let newer = client
            .transactions(account_id, PageQuery { page: 1, per_page })
            .await?
            .data;
        ensure_complete(count, newer.len())?;
        newer
    };
    let mut rows: Vec<Transaction> = newer;
    let skip = rows.len();
    rows.extend(state.data.iter().cloned());
    let balances = running_balances(&rows, MoneyCents::from_amount(account.balance));

    println!("{}", output::transactions_table(&state.data, &balances[skip..]));
    println!("Page {page}, {} transactions in total", state.total);
    Ok(())
}

async fn dashboard(
    client: &Client,
    config: &AppConfig,
    account: Option<i64>,
    filter: PeriodFilter,
    top: usize,
) -> Result<()> {
    let accounts: Vec<Account> = match account {
        Some(id) => vec![client.account(id).await?],
        None => {
            client
                .accounts(PageQuery {
                    page: 1,
                    per_page: ALL_ACCOUNTS_PAGE_SIZE,
                })
                .await?
                .data
        }
    };

    let mut transactions = Vec::new();
    for account in &accounts {
        transactions.extend(client.all_transactions(account.id).await?);
    }
    tracing::debug!(
        "dashboard over {} accounts, {} transactions",
        accounts.len(),
        transactions.len()
    );

    let today = config.today()?;
    let summary = account_summary(&accounts);
    let totals = aggregate(&transactions, &filter, today);
    let series = monthly_series(&transactions);

    println!(
        "Total amount accounts: {} ({} open, {} closed)",
        summary.total_balance, summary.open_accounts, summary.closed_accounts
    );
    println!("{}", output::account_types_table(&summary.by_type));
    println!("Period: {}", totals.period.display_label());
    println!("Total spending: {}", totals.total_spending);
    println!("Total deposit:  {}", totals.total_deposit);
    println!("Total transfer: {}", totals.total_transfer);
    println!("Net savings:    {}", totals.net_savings());

    for (title, kind) in [
        ("Top spending", TransactionType::Withdrawal),
        ("Top income", TransactionType::Deposit),
    ] {
        let rows = totals
            .top_categories(kind, top)
            .iter()
            .map(|entry| {
                vec![
                    entry.name.clone(),
                    entry.amount.to_string(),
                    format!("{:.1}%", totals.share_percent(kind, entry)),
                ]
            })
            .collect();
        println!("{title}");
        println!("{}", output::pretty_table(&["Category", "Amount", "Share"], rows));
    }

    let rows = series
        .display_labels()
        .into_iter()
        .zip(series.income.iter().zip(&series.expense))
        .map(|(label, (income, expense))| vec![label, income.to_string(), expense.to_string()])
        .collect();
    println!("Account activity");
    println!("{}", output::pretty_table(&["Month", "Income", "Expenses"], rows));
    Ok(())
}
