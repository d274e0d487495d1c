use rust_decimal::Decimal;
use regchange_core::ServiceError;
use sqlx::{Row, TypeInfo, ValueRef};

/// Get a decimal value from a row.
///
/// Amounts are stored as TEXT to keep full precision, but INTEGER and REAL
/// cells written by hand (e.g. in seed files) are accepted too.
pub fn get_decimal(
    row: &sqlx::sqlite::SqliteRow,
    column: &str,
) -> Result<Decimal, ServiceError> {
    let value_ref = row
        .try_get_raw(column)
        .map_err(|e| ServiceError::Database(format!("Column '{}' not found: {}", column, e)))?;

    let type_info = value_ref.type_info();
    let type_name = type_info.name();

    match type_name {
        "TEXT" => {
            let val: String = row.try_get(column).map_err(|e| {
                ServiceError::Database(format!("Failed to get TEXT from '{}': {}", column, e))
            })?;
            let trimmed = val.trim();
            if trimmed.is_empty() {
                return Ok(Decimal::ZERO);
            }
            trimmed.parse().map_err(|e| {
                ServiceError::Database(format!(
                    "Failed to parse decimal '{}' in '{}': {}",
                    val, column, e
                ))
            })
        }
        "INTEGER" => {
            let val: i64 = row.try_get(column).map_err(|e| {
                ServiceError::Database(format!("Failed to get INTEGER from '{}': {}", column, e))
            })?;
            Ok(Decimal::from(val))
        }
        "REAL" => {
            let val: f64 = row.try_get(column).map_err(|e| {
                ServiceError::Database(format!("Failed to get REAL from '{}': {}", column, e))
            })?;
            Decimal::try_from(val).map_err(|e| {
                ServiceError::Database(format!("Failed to convert {} to Decimal: {}", val, e))
            })
        }
        "NULL" => Ok(Decimal::ZERO),
        _ => Err(ServiceError::Database(format!(
            "Unexpected type '{}' for column '{}'",
            type_name, column
        ))),
    }
}

/// Get an optional decimal value from a row, returning None for NULL values.
pub fn get_optional_decimal(
    row: &sqlx::sqlite::SqliteRow,
    column: &str,
) -> Result<Option<Decimal>, ServiceError> {
    let value_ref = row
        .try_get_raw(column)
        .map_err(|e| ServiceError::Database(format!("Column '{}' not found: {}", column, e)))?;

    if value_ref.is_null() {
        return Ok(None);
    }

    get_decimal(row, column).map(Some)
}

/// Canonical TEXT form used when writing amounts.
pub fn decimal_to_text(d: Decimal) -> String {
    d.normalize().to_string()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use sqlx::sqlite::SqlitePoolOptions;

    use super::*;

    async fn setup_test_db() -> sqlx::sqlite::SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create in-memory database");
        sqlx::query(
            "CREATE TABLE test_decimals (
                id INTEGER PRIMARY KEY,
                text_value TEXT,
                int_value INTEGER,
                real_value REAL,
                blob_value BLOB
            )",
        )
        .execute(&pool)
        .await
        .expect("Failed to create test table");
        pool
    }

    async fn fetch(
        pool: &sqlx::sqlite::SqlitePool,
        insert: &str,
        select: &str,
    ) -> sqlx::sqlite::SqliteRow {
        sqlx::query(insert)
            .execute(pool)
            .await
            .expect("Failed to insert test data");
        sqlx::query(select)
            .fetch_one(pool)
            .await
            .expect("Failed to fetch row")
    }

    #[tokio::test]
    async fn test_get_decimal_from_text_keeps_precision() {
        let pool = setup_test_db().await;
        let row = fetch(
            &pool,
            "INSERT INTO test_decimals (id, text_value) VALUES (1, '1234.005')",
            "SELECT text_value FROM test_decimals WHERE id = 1",
        )
        .await;

        assert_eq!(get_decimal(&row, "text_value"), Ok(dec!(1234.005)));
    }

    #[tokio::test]
    async fn test_get_decimal_from_integer() {
        let pool = setup_test_db().await;
        let row = fetch(
            &pool,
            "INSERT INTO test_decimals (id, int_value) VALUES (1, -250)",
            "SELECT int_value FROM test_decimals WHERE id = 1",
        )
        .await;

        assert_eq!(get_decimal(&row, "int_value"), Ok(dec!(-250)));
    }

    #[tokio::test]
    async fn test_get_decimal_from_real() {
        let pool = setup_test_db().await;
        let row = fetch(
            &pool,
            "INSERT INTO test_decimals (id, real_value) VALUES (1, 99.5)",
            "SELECT real_value FROM test_decimals WHERE id = 1",
        )
        .await;

        assert_eq!(get_decimal(&row, "real_value"), Ok(dec!(99.5)));
    }

    #[tokio::test]
    async fn test_get_decimal_rejects_garbage_text() {
        let pool = setup_test_db().await;
        let row = fetch(
            &pool,
            "INSERT INTO test_decimals (id, text_value) VALUES (1, 'twelve')",
            "SELECT text_value FROM test_decimals WHERE id = 1",
        )
        .await;

        assert!(matches!(
            get_decimal(&row, "text_value"),
            Err(ServiceError::Database(_))
        ));
    }

    #[tokio::test]
    async fn test_get_decimal_unexpected_type() {
        let pool = setup_test_db().await;
        let row = fetch(
            &pool,
            "INSERT INTO test_decimals (id, blob_value) VALUES (1, X'00')",
            "SELECT blob_value FROM test_decimals WHERE id = 1",
        )
        .await;

        assert!(matches!(
            get_decimal(&row, "blob_value"),
            Err(ServiceError::Database(_))
        ));
    }

    #[tokio::test]
    async fn test_get_optional_decimal_from_null_returns_none() {
        let pool = setup_test_db().await;
        let row = fetch(
            &pool,
            "INSERT INTO test_decimals (id) VALUES (1)",
            "SELECT text_value FROM test_decimals WHERE id = 1",
        )
        .await;

        assert_eq!(get_optional_decimal(&row, "text_value"), Ok(None));
    }

    #[tokio::test]
    async fn test_get_optional_decimal_column_not_found() {
        let pool = setup_test_db().await;
        let row = fetch(
            &pool,
            "INSERT INTO test_decimals (id) VALUES (1)",
            "SELECT id FROM test_decimals WHERE id = 1",
        )
        .await;

        assert!(get_optional_decimal(&row, "missing").is_err());
    }

    #[test]
    fn test_decimal_to_text_drops_trailing_zeros() {
        assert_eq!(decimal_to_text(dec!(950.00)), "950");
        assert_eq!(decimal_to_text(dec!(-12.50)), "-12.5");
    }
}
