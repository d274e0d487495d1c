use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use regchange_core::{
    CancellationRequest, CancellationResult, ChangeType, Contact, FinancialRecord, InitData,
    PaymentStatus, ProgramDetail, ProgramOffering, Registrant, RegistrationChangeService,
    ServiceError, SettlementType, SubstitutionRequest, SubstitutionResult, TransferRequest,
    TransferResult,
};
use serde::Serialize;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, Sqlite, Transaction};
use tracing::{debug, info, warn};

use crate::decimal::{decimal_to_text, get_decimal, get_optional_decimal};

const CANCELLED: &str = "Cancelled";
const CONTACT_SEARCH_LIMIT: i64 = 50;

pub struct SqliteRegistrationService {
    pool: SqlitePool,
}

/// One row of `change_journal`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalEntry {
    pub id: i64,
    pub change_type: String,
    pub registrant_id: String,
    pub request_json: String,
    pub result_json: Option<String>,
    pub created_at: String,
}

impl SqliteRegistrationService {
    /// Opens (creating if needed) the database at `database_url`.
    ///
    /// In-memory databases get a single long-lived connection; every new
    /// SQLite connection to `:memory:` would otherwise see an empty database.
    pub async fn new(database_url: &str) -> Result<Self> {
        let in_memory = database_url.contains(":memory:") || database_url.contains("mode=memory");
        let options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("Invalid SQLite connection string: {}", database_url))?
            .create_if_missing(true)
            .foreign_keys(true);

        let mut pool_options = SqlitePoolOptions::new();
        if in_memory {
            pool_options = pool_options
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }

        let pool = pool_options
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to connect to database: {}", database_url))?;
        Ok(Self { pool })
    }

    pub async fn new_with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }

    /// Load and execute all SQL seed files from the specified directory.
    /// Files are executed in alphabetical order by filename.
    pub async fn run_seeds(
        &self,
        seeds_dir: &Path,
    ) -> Result<()> {
        let mut entries: Vec<_> = std::fs::read_dir(seeds_dir)
            .with_context(|| format!("Failed to read seeds directory '{}'", seeds_dir.display()))?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "sql"))
            .collect();

        entries.sort_by_key(|entry| entry.file_name());

        for entry in entries {
            let path = entry.path();
            let sql = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read seed file '{}'", path.display()))?;

            sqlx::raw_sql(&sql)
                .execute(&self.pool)
                .await
                .with_context(|| format!("Failed to execute seed file '{}'", path.display()))?;
            debug!(seed = %path.display(), "seed file applied");
        }

        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Executed changes for a registrant, oldest first.
    pub async fn list_journal(
        &self,
        registrant_id: &str,
    ) -> Result<Vec<JournalEntry>, ServiceError> {
        let rows = sqlx::query(
            "SELECT id, change_type, registrant_id, request_json, result_json, created_at
             FROM change_journal WHERE registrant_id = ? ORDER BY id",
        )
        .bind(registrant_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        rows.iter()
            .map(|row| {
                Ok(JournalEntry {
                    id: column(row, "id")?,
                    change_type: column(row, "change_type")?,
                    registrant_id: column(row, "registrant_id")?,
                    request_json: column(row, "request_json")?,
                    result_json: column(row, "result_json")?,
                    created_at: column(row, "created_at")?,
                })
            })
            .collect()
    }

    async fn get_program(
        &self,
        program_id: &str,
    ) -> Result<ProgramOffering, ServiceError> {
        let row = sqlx::query(
            "SELECT id, name, start_date, location, fee FROM programs WHERE id = ?",
        )
        .bind(program_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?
        .ok_or(ServiceError::NotFound)?;

        row_to_program(&row)
    }

    async fn list_active_programs(&self) -> Result<Vec<ProgramOffering>, ServiceError> {
        let rows = sqlx::query(
            "SELECT id, name, start_date, location, fee
             FROM programs WHERE is_active = 1 ORDER BY start_date, name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        rows.iter().map(row_to_program).collect()
    }

    async fn get_financial_record(
        &self,
        registrant_id: &str,
    ) -> Result<Option<FinancialRecord>, ServiceError> {
        let row = sqlx::query(
            "SELECT id, amount, balance, payment_status, is_bundled, pricing_context_id
             FROM financial_records WHERE registrant_id = ?",
        )
        .bind(registrant_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let status: String = column(&row, "payment_status")?;
        let payment_status = PaymentStatus::parse(&status).ok_or_else(|| {
            ServiceError::Database(format!("Invalid payment status: {}", status))
        })?;

        Ok(Some(FinancialRecord {
            id: column(&row, "id")?,
            amount: get_decimal(&row, "amount")?,
            balance: get_decimal(&row, "balance")?,
            payment_status,
            is_bundled: column(&row, "is_bundled")?,
            pricing_context_id: column(&row, "pricing_context_id")?,
        }))
    }

    /// Current program and status of a registration, inside `tx`.
    async fn registration_in(
        tx: &mut Transaction<'_, Sqlite>,
        registrant_id: &str,
    ) -> Result<Option<(String, String, String)>, ServiceError> {
        let row = sqlx::query("SELECT contact_id, program_id, status FROM registrants WHERE id = ?")
            .bind(registrant_id)
            .fetch_optional(&mut **tx)
            .await
            .map_err(db_error)?;

        row.map(|row| {
            Ok((
                column(&row, "contact_id")?,
                column(&row, "program_id")?,
                column(&row, "status")?,
            ))
        })
        .transpose()
    }

    /// Writes the request to the journal and returns the new entry id.
    async fn journal<R: Serialize>(
        tx: &mut Transaction<'_, Sqlite>,
        change_type: ChangeType,
        registrant_id: &str,
        request: &R,
    ) -> Result<i64, ServiceError> {
        let request_json = to_json(request)?;
        let now = Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();

        let result = sqlx::query(
            "INSERT INTO change_journal (change_type, registrant_id, request_json, created_at)
             VALUES (?, ?, ?, ?)",
        )
        .bind(change_type.label())
        .bind(registrant_id)
        .bind(request_json)
        .bind(now)
        .execute(&mut **tx)
        .await
        .map_err(db_error)?;

        Ok(result.last_insert_rowid())
    }

    async fn record_result<R: Serialize>(
        tx: &mut Transaction<'_, Sqlite>,
        journal_id: i64,
        result: &R,
    ) -> Result<(), ServiceError> {
        sqlx::query("UPDATE change_journal SET result_json = ? WHERE id = ?")
            .bind(to_json(result)?)
            .bind(journal_id)
            .execute(&mut **tx)
            .await
            .map_err(db_error)?;
        Ok(())
    }
}

fn db_error(e: sqlx::Error) -> ServiceError {
    ServiceError::Database(e.to_string())
}

fn column<'r, T>(
    row: &'r SqliteRow,
    name: &str,
) -> Result<T, ServiceError>
where
    T: sqlx::Decode<'r, Sqlite> + sqlx::Type<Sqlite>,
{
    row.try_get(name)
        .map_err(|e| ServiceError::Database(format!("Failed to get '{}': {}", name, e)))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, ServiceError> {
    serde_json::to_string(value)
        .map_err(|e| ServiceError::Database(format!("Failed to serialize journal entry: {}", e)))
}

fn row_to_program(row: &SqliteRow) -> Result<ProgramOffering, ServiceError> {
    Ok(ProgramOffering {
        id: column(row, "id")?,
        name: column(row, "name")?,
        start_date: column::<Option<NaiveDate>>(row, "start_date")?,
        location: column(row, "location")?,
        fee: get_optional_decimal(row, "fee")?,
    })
}

fn generated_id(
    prefix: &str,
    journal_id: i64,
) -> String {
    format!("{}-{:08}", prefix, journal_id)
}

fn rejected<R: Default>(
    message: String,
    build: impl FnOnce(String) -> R,
) -> R {
    warn!(%message, "change rejected");
    build(message)
}

#[async_trait]
impl RegistrationChangeService for SqliteRegistrationService {
    async fn load_init_data(
        &self,
        registrant_id: &str,
    ) -> Result<InitData, ServiceError> {
        let row = sqlx::query(
            "SELECT r.id, r.contact_id, r.program_id, r.prior_discount_total,
                    c.name, c.email, c.account_id
             FROM registrants r JOIN contacts c ON c.id = r.contact_id
             WHERE r.id = ?",
        )
        .bind(registrant_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?
        .ok_or(ServiceError::NotFound)?;

        let registrant = Registrant {
            id: column(&row, "id")?,
            contact_id: column(&row, "contact_id")?,
            name: column(&row, "name")?,
            email: column(&row, "email")?,
            account_id: column(&row, "account_id")?,
        };
        let program_id: String = column(&row, "program_id")?;
        let prior_discount_total = get_decimal(&row, "prior_discount_total")?;

        let current_program = self.get_program(&program_id).await?;
        let financial_record = self.get_financial_record(registrant_id).await?;
        let catalog = self.list_active_programs().await?;

        debug!(
            registrant_id,
            program_id = %program_id,
            catalog_len = catalog.len(),
            "init data loaded"
        );

        Ok(InitData {
            registrant,
            current_program,
            financial_record,
            catalog,
            prior_discount_total,
        })
    }

    async fn load_program_detail(
        &self,
        program_id: &str,
        pricing_context_id: Option<&str>,
    ) -> Result<ProgramDetail, ServiceError> {
        // Unknown programs are a fault, not an empty detail.
        self.get_program(program_id).await?;

        let price = match pricing_context_id {
            Some(context) => sqlx::query(
                "SELECT expected_fee, transfer_fee_unit_price
                 FROM program_prices WHERE program_id = ? AND pricing_context_id = ?",
            )
            .bind(program_id)
            .bind(context)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?,
            None => None,
        };

        let (expected_fee, transfer_fee_unit_price) = match &price {
            Some(row) => (
                get_optional_decimal(row, "expected_fee")?,
                get_optional_decimal(row, "transfer_fee_unit_price")?,
            ),
            None => (None, None),
        };

        Ok(ProgramDetail {
            program_id: program_id.to_string(),
            expected_fee,
            transfer_fee_unit_price,
        })
    }

    async fn search_contacts(
        &self,
        term: &str,
        account_scope_id: Option<&str>,
    ) -> Result<Vec<Contact>, ServiceError> {
        let pattern = format!("%{}%", term.trim());
        let rows = sqlx::query(
            "SELECT id, name, email, phone, account_name FROM contacts
             WHERE (name LIKE ? OR email LIKE ?)
               AND (? IS NULL OR account_id = ?)
             ORDER BY name
             LIMIT ?",
        )
        .bind(&pattern)
        .bind(&pattern)
        .bind(account_scope_id)
        .bind(account_scope_id)
        .bind(CONTACT_SEARCH_LIMIT)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        rows.iter()
            .map(|row| {
                Ok(Contact {
                    id: column(row, "id")?,
                    name: column(row, "name")?,
                    email: column(row, "email")?,
                    phone: column(row, "phone")?,
                    account_name: column(row, "account_name")?,
                })
            })
            .collect()
    }

    async fn execute_transfer(
        &self,
        request: &TransferRequest,
    ) -> Result<TransferResult, ServiceError> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        let Some((_, _, status)) = Self::registration_in(&mut tx, &request.registrant_id).await?
        else {
            return Ok(rejected(
                format!("Registration {} was not found.", request.registrant_id),
                transfer_failure,
            ));
        };
        if status == CANCELLED {
            return Ok(rejected(
                "A cancelled registration cannot be transferred.".to_string(),
                transfer_failure,
            ));
        }

        let target_active: Option<bool> =
            sqlx::query_scalar("SELECT is_active FROM programs WHERE id = ?")
                .bind(&request.new_program_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(db_error)?;
        if target_active != Some(true) {
            return Ok(rejected(
                format!("Program {} is not open for registration.", request.new_program_id),
                transfer_failure,
            ));
        }

        let journal_id =
            Self::journal(&mut tx, ChangeType::Transfer, &request.registrant_id, request).await?;

        sqlx::query("UPDATE registrants SET program_id = ? WHERE id = ?")
            .bind(&request.new_program_id)
            .bind(&request.registrant_id)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

        let result = TransferResult {
            success: true,
            new_opportunity_id: Some(generated_id("OPP", journal_id)),
            new_attendee_id: Some(generated_id("ATT", journal_id)),
            error_message: None,
        };
        Self::record_result(&mut tx, journal_id, &result).await?;
        tx.commit().await.map_err(db_error)?;

        info!(
            registrant_id = %request.registrant_id,
            new_program_id = %request.new_program_id,
            net_credit = %decimal_to_text(request.net_credit_amount),
            journal_id,
            "transfer recorded"
        );
        Ok(result)
    }

    async fn execute_cancellation(
        &self,
        request: &CancellationRequest,
    ) -> Result<CancellationResult, ServiceError> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        let Some((_, _, status)) = Self::registration_in(&mut tx, &request.registrant_id).await?
        else {
            return Ok(rejected(
                format!("Registration {} was not found.", request.registrant_id),
                cancellation_failure,
            ));
        };
        if status == CANCELLED {
            return Ok(rejected(
                "This registration is already cancelled.".to_string(),
                cancellation_failure,
            ));
        }

        let journal_id = Self::journal(
            &mut tx,
            ChangeType::Cancellation,
            &request.registrant_id,
            request,
        )
        .await?;

        sqlx::query("UPDATE registrants SET status = ? WHERE id = ?")
            .bind(CANCELLED)
            .bind(&request.registrant_id)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

        let result = CancellationResult {
            success: true,
            opportunity_id: request.originating_record_id.clone(),
            payment_id: (request.settlement_type == Some(SettlementType::Refund))
                .then(|| generated_id("PAY", journal_id)),
            unapplied_funds_id: (request.settlement_type == Some(SettlementType::UnappliedFunds))
                .then(|| generated_id("UNF", journal_id)),
            refund_amount: Some(request.refund_amount),
            error_message: None,
        };
        Self::record_result(&mut tx, journal_id, &result).await?;
        tx.commit().await.map_err(db_error)?;

        info!(
            registrant_id = %request.registrant_id,
            refund = %decimal_to_text(request.refund_amount),
            settlement = ?request.settlement_type,
            journal_id,
            "cancellation recorded"
        );
        Ok(result)
    }

    async fn execute_substitution(
        &self,
        request: &SubstitutionRequest,
    ) -> Result<SubstitutionResult, ServiceError> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        let Some((current_contact, _, status)) =
            Self::registration_in(&mut tx, &request.registrant_id).await?
        else {
            return Ok(rejected(
                format!("Registration {} was not found.", request.registrant_id),
                substitution_failure,
            ));
        };
        if status == CANCELLED {
            return Ok(rejected(
                "A cancelled registration cannot be substituted.".to_string(),
                substitution_failure,
            ));
        }
        if current_contact == request.new_contact_id {
            return Ok(rejected(
                "The substitute is already the registrant.".to_string(),
                substitution_failure,
            ));
        }

        let contact_exists: Option<String> =
            sqlx::query_scalar("SELECT id FROM contacts WHERE id = ?")
                .bind(&request.new_contact_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(db_error)?;
        if contact_exists.is_none() {
            return Ok(rejected(
                format!("Contact {} was not found.", request.new_contact_id),
                substitution_failure,
            ));
        }

        let journal_id = Self::journal(
            &mut tx,
            ChangeType::Substitution,
            &request.registrant_id,
            request,
        )
        .await?;

        sqlx::query("UPDATE registrants SET contact_id = ? WHERE id = ?")
            .bind(&request.new_contact_id)
            .bind(&request.registrant_id)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

        let result = SubstitutionResult {
            success: true,
            new_opportunity_id: Some(generated_id("OPP", journal_id)),
            new_attendee_id: Some(generated_id("ATT", journal_id)),
            error_message: None,
        };
        Self::record_result(&mut tx, journal_id, &result).await?;
        tx.commit().await.map_err(db_error)?;

        info!(
            registrant_id = %request.registrant_id,
            new_contact_id = %request.new_contact_id,
            journal_id,
            "substitution recorded"
        );
        Ok(result)
    }
}

fn transfer_failure(message: String) -> TransferResult {
    TransferResult {
        error_message: Some(message),
        ..Default::default()
    }
}

fn cancellation_failure(message: String) -> CancellationResult {
    CancellationResult {
        error_message: Some(message),
        ..Default::default()
    }
}

fn substitution_failure(message: String) -> SubstitutionResult {
    SubstitutionResult {
        error_message: Some(message),
        ..Default::default()
    }
}
