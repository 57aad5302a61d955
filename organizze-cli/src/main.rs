use anyhow::{Context, Result, bail};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use organizze_api::{
    AccountParams, Client, CreditCardParams, NewTransfer, TransactionQuery, TransferPatch,
};
use organizze_core::{ImportOptions, normalize_statement};
use serde_json::Value;
use std::path::PathBuf;

mod config;

use config::Config;

#[derive(Parser, Debug)]
#[command(name = "organizze", version, about = "Organizze bookkeeping CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert a Nubank statement CSV into transaction payloads
    Import {
        /// Path to the statement CSV
        csv: PathBuf,

        /// Posting date stamped on every transaction (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<String>,

        /// Drop installment fragments beyond the first. Use when importing a
        /// later month of a series whose first month already created the
        /// plans; assumes index 1 was imported in a previous run.
        #[arg(long)]
        skip_later_installments: bool,

        /// Category for every imported charge (default: ORGANIZZE_CATEGORY_ID)
        #[arg(long)]
        category_id: Option<i64>,

        /// Credit card the statement belongs to (default: ORGANIZZE_CREDIT_CARD_ID)
        #[arg(long)]
        credit_card_id: Option<i64>,

        /// Create the transactions through the API instead of printing them
        #[arg(long)]
        submit: bool,

        /// With --submit: stop at the first creation error
        #[arg(long)]
        fail_fast: bool,
    },

    /// List users, or show one
    Users { id: Option<i64> },

    /// Bank account management
    Accounts {
        #[command(subcommand)]
        command: Option<AccountCommand>,
    },

    /// Category management
    Categories {
        #[command(subcommand)]
        command: Option<CategoryCommand>,
    },

    /// Credit card management
    CreditCards {
        #[command(subcommand)]
        command: Option<CreditCardCommand>,
    },

    /// List a card's invoices, or show one
    Invoices {
        credit_card_id: i64,
        invoice_id: Option<i64>,
    },

    /// Pay a credit card invoice
    PayInvoice {
        credit_card_id: i64,
        invoice_id: i64,
        #[arg(long)]
        amount_cents: Option<i64>,
        /// Payment date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
        /// Bank account to pay from
        #[arg(long)]
        account_id: Option<i64>,
    },

    /// List budget targets
    Budgets {
        #[arg(long)]
        year: Option<i32>,
        #[arg(long, requires = "year")]
        month: Option<u32>,
    },

    /// Transaction operations
    Transactions {
        #[command(subcommand)]
        command: TransactionCommand,
    },

    /// Transfers between bank accounts
    Transfers {
        #[command(subcommand)]
        command: TransferCommand,
    },
}

#[derive(Subcommand, Debug)]
enum AccountCommand {
    List,
    Get { id: i64 },
    Add {
        name: String,
        /// checking, savings or other
        #[arg(long = "type")]
        account_type: String,
        #[arg(long)]
        description: Option<String>,
        /// Make this the default account
        #[arg(long)]
        default: bool,
    },
    Update {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        default: Option<bool>,
        /// Archive (true) or unarchive (false)
        #[arg(long)]
        archived: Option<bool>,
    },
    Rm { id: i64 },
}

#[derive(Subcommand, Debug)]
enum CreditCardCommand {
    List,
    Get { id: i64 },
    Add {
        name: String,
        #[arg(long)]
        due_day: u32,
        #[arg(long)]
        closing_day: u32,
        #[arg(long)]
        limit_cents: i64,
        /// visa, mastercard, ...
        #[arg(long)]
        card_network: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    Update {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        due_day: Option<u32>,
        #[arg(long)]
        closing_day: Option<u32>,
        #[arg(long)]
        limit_cents: Option<i64>,
        /// Re-open invoices since this date (YYYY-MM-DD)
        #[arg(long)]
        update_invoices_since: Option<String>,
    },
    Rm { id: i64 },
}

#[derive(Subcommand, Debug)]
enum TransferCommand {
    List {
        #[arg(long)]
        start_date: Option<String>,
        #[arg(long)]
        end_date: Option<String>,
    },
    Get { id: i64 },
    /// Move money between two bank accounts
    Add {
        /// Source account
        #[arg(long)]
        from: i64,
        /// Destination account
        #[arg(long)]
        to: i64,
        #[arg(long)]
        amount_cents: i64,
        /// YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        paid: bool,
        #[arg(long)]
        notes: Option<String>,
    },
    Update {
        id: i64,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    Rm { id: i64 },
}

#[derive(Subcommand, Debug)]
enum CategoryCommand {
    List,
    Get { id: i64 },
    Add {
        name: String,
        #[arg(long)]
        parent_id: Option<i64>,
    },
    Rename { id: i64, name: String },
    Rm {
        id: i64,
        /// Reassign the category's transactions to this one
        #[arg(long)]
        replacement_id: Option<i64>,
    },
}

#[derive(Subcommand, Debug)]
enum TransactionCommand {
    /// List transactions (API defaults to the current month)
    List {
        #[arg(long)]
        start_date: Option<String>,
        #[arg(long)]
        end_date: Option<String>,
        #[arg(long)]
        account_id: Option<i64>,
        #[arg(long)]
        category_id: Option<i64>,
        #[arg(long)]
        credit_card_id: Option<i64>,
    },
    Get { id: i64 },
    /// Create one transaction from a raw JSON payload
    Create { json: String },
    /// Update a transaction from a raw JSON payload
    Update { id: i64, json: String },
    /// Delete transactions by id
    Delete {
        ids: Vec<i64>,
        /// Stop at the first deletion error
        #[arg(long)]
        fail_fast: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = Config::from_env()?;

    match cli.command {
        Command::Import {
            csv,
            date,
            skip_later_installments,
            category_id,
            credit_card_id,
            submit,
            fail_fast,
        } => {
            run_import(
                &cfg,
                csv,
                date,
                skip_later_installments,
                category_id,
                credit_card_id,
                submit,
                fail_fast,
            )
            .await?;
        }

        Command::Users { id } => {
            let client = api_client(&cfg)?;
            let out = match id {
                Some(id) => client.get_user(id).await?,
                None => client.list_users().await?,
            };
            print_json(&out)?;
        }

        Command::Accounts { command } => {
            let client = api_client(&cfg)?;
            let out = match command.unwrap_or(AccountCommand::List) {
                AccountCommand::List => client.list_accounts().await?,
                AccountCommand::Get { id } => client.get_account(id).await?,
                AccountCommand::Add {
                    name,
                    account_type,
                    description,
                    default,
                } => {
                    client
                        .create_account(&AccountParams {
                            name: Some(name),
                            account_type: Some(account_type),
                            description,
                            default: default.then_some(true),
                            archived: None,
                        })
                        .await?
                }
                AccountCommand::Update {
                    id,
                    name,
                    description,
                    default,
                    archived,
                } => {
                    client
                        .update_account(
                            id,
                            &AccountParams {
                                name,
                                account_type: None,
                                description,
                                default,
                                archived,
                            },
                        )
                        .await?
                }
                AccountCommand::Rm { id } => client.delete_account(id).await?,
            };
            print_json(&out)?;
        }

        Command::Categories { command } => {
            let client = api_client(&cfg)?;
            let out = match command.unwrap_or(CategoryCommand::List) {
                CategoryCommand::List => client.list_categories().await?,
                CategoryCommand::Get { id } => client.get_category(id).await?,
                CategoryCommand::Add { name, parent_id } => {
                    client.create_category(&name, parent_id).await?
                }
                CategoryCommand::Rename { id, name } => client.update_category(id, &name).await?,
                CategoryCommand::Rm { id, replacement_id } => {
                    client.delete_category(id, replacement_id).await?
                }
            };
            print_json(&out)?;
        }

        Command::CreditCards { command } => {
            let client = api_client(&cfg)?;
            let out = match command.unwrap_or(CreditCardCommand::List) {
                CreditCardCommand::List => client.list_credit_cards().await?,
                CreditCardCommand::Get { id } => client.get_credit_card(id).await?,
                CreditCardCommand::Add {
                    name,
                    due_day,
                    closing_day,
                    limit_cents,
                    card_network,
                    description,
                } => {
                    client
                        .create_credit_card(&CreditCardParams {
                            name: Some(name),
                            card_network,
                            due_day: Some(due_day),
                            closing_day: Some(closing_day),
                            limit_cents: Some(limit_cents),
                            description,
                            update_invoices_since: None,
                        })
                        .await?
                }
                CreditCardCommand::Update {
                    id,
                    name,
                    due_day,
                    closing_day,
                    limit_cents,
                    update_invoices_since,
                } => {
                    if let Some(d) = &update_invoices_since {
                        parse_iso_date(d)?;
                    }
                    client
                        .update_credit_card(
                            id,
                            &CreditCardParams {
                                name,
                                card_network: None,
                                due_day,
                                closing_day,
                                limit_cents,
                                description: None,
                                update_invoices_since,
                            },
                        )
                        .await?
                }
                CreditCardCommand::Rm { id } => client.delete_credit_card(id).await?,
            };
            print_json(&out)?;
        }

        Command::Invoices {
            credit_card_id,
            invoice_id,
        } => {
            let client = api_client(&cfg)?;
            let out = match invoice_id {
                Some(id) => client.get_invoice(credit_card_id, id).await?,
                None => client.list_invoices(credit_card_id).await?,
            };
            print_json(&out)?;
        }

        Command::PayInvoice {
            credit_card_id,
            invoice_id,
            amount_cents,
            date,
            account_id,
        } => {
            if let Some(d) = &date {
                parse_iso_date(d)?;
            }
            let out = api_client(&cfg)?
                .pay_invoice(
                    credit_card_id,
                    invoice_id,
                    amount_cents,
                    date.as_deref(),
                    account_id,
                )
                .await?;
            print_json(&out)?;
        }

        Command::Budgets { year, month } => {
            print_json(&api_client(&cfg)?.list_budgets(year, month).await?)?;
        }

        Command::Transactions { command } => {
            let client = api_client(&cfg)?;
            match command {
                TransactionCommand::List {
                    start_date,
                    end_date,
                    account_id,
                    category_id,
                    credit_card_id,
                } => {
                    let query = TransactionQuery {
                        start_date,
                        end_date,
                        account_id,
                        category_id,
                        credit_card_id,
                    };
                    print_json(&client.list_transactions(&query).await?)?;
                }
                TransactionCommand::Get { id } => {
                    print_json(&client.get_transaction(id).await?)?;
                }
                TransactionCommand::Create { json } => {
                    let payload: Value =
                        serde_json::from_str(&json).context("parse transaction JSON")?;
                    print_json(&client.create_transaction(&payload).await?)?;
                }
                TransactionCommand::Update { id, json } => {
                    let payload: Value =
                        serde_json::from_str(&json).context("parse transaction JSON")?;
                    print_json(&client.update_transaction(id, &payload).await?)?;
                }
                TransactionCommand::Delete { ids, fail_fast } => {
                    if ids.is_empty() {
                        bail!("no transaction ids given");
                    }
                    let summary = client.delete_transactions_bulk(&ids, fail_fast).await?;
                    eprintln!(
                        "Deleted {}/{} transactions",
                        summary.success_count, summary.total
                    );
                    print_json(&serde_json::to_value(&summary)?)?;
                }
            }
        }

        Command::Transfers { command } => {
            let client = api_client(&cfg)?;
            let out = match command {
                TransferCommand::List {
                    start_date,
                    end_date,
                } => {
                    client
                        .list_transfers(start_date.as_deref(), end_date.as_deref())
                        .await?
                }
                TransferCommand::Get { id } => client.get_transfer(id).await?,
                TransferCommand::Add {
                    from,
                    to,
                    amount_cents,
                    date,
                    description,
                    paid,
                    notes,
                } => {
                    let date = match date {
                        Some(d) => {
                            parse_iso_date(&d)?;
                            d
                        }
                        None => Local::now().date_naive().format("%Y-%m-%d").to_string(),
                    };
                    client
                        .create_transfer(&NewTransfer {
                            credit_account_id: to,
                            debit_account_id: from,
                            amount_cents,
                            date,
                            description,
                            paid: paid.then_some(true),
                            notes,
                            tags: None,
                        })
                        .await?
                }
                TransferCommand::Update {
                    id,
                    description,
                    notes,
                } => {
                    client
                        .update_transfer(
                            id,
                            &TransferPatch {
                                description,
                                notes,
                                ..Default::default()
                            },
                        )
                        .await?
                }
                TransferCommand::Rm { id } => client.delete_transfer(id).await?,
            };
            print_json(&out)?;
        }
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn run_import(
    cfg: &Config,
    csv: PathBuf,
    date: Option<String>,
    skip_later_installments: bool,
    category_id: Option<i64>,
    credit_card_id: Option<i64>,
    submit: bool,
    fail_fast: bool,
) -> Result<()> {
    if !csv.exists() {
        bail!("CSV not found: {}", csv.display());
    }

    let target_date = match date {
        Some(d) => {
            parse_iso_date(&d)?;
            d
        }
        None => Local::now().date_naive().format("%Y-%m-%d").to_string(),
    };

    let category_id = category_id.or(cfg.import.category_id).context(
        "missing category: pass --category-id or set ORGANIZZE_CATEGORY_ID",
    )?;
    let credit_card_id = credit_card_id.or(cfg.import.credit_card_id).context(
        "missing credit card: pass --credit-card-id or set ORGANIZZE_CREDIT_CARD_ID",
    )?;

    let text = std::fs::read_to_string(&csv)
        .with_context(|| format!("read {}", csv.display()))?;

    let batch = normalize_statement(
        &text,
        &ImportOptions {
            target_date,
            category_id,
            credit_card_id,
            skip_later_installments,
        },
    );
    eprintln!(
        "Normalized {} transactions from {}",
        batch.transactions.len(),
        csv.display()
    );

    if submit {
        let summary = api_client(cfg)?
            .create_transactions_bulk(&batch.transactions, fail_fast)
            .await?;
        eprintln!(
            "Created {}/{} transactions",
            summary.success_count, summary.total
        );
        print_json(&serde_json::to_value(&summary)?)?;
    } else {
        print_json(&serde_json::to_value(&batch)?)?;
    }

    Ok(())
}

fn api_client(cfg: &Config) -> Result<Client> {
    Ok(Client::new(cfg.credentials()?))
}

fn parse_iso_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("invalid date {s:?}, want YYYY-MM-DD"))
}

/// Data goes to stdout as JSON; diagnostics go to stderr.
fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
