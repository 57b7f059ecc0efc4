/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Currency amounts are fixed-point NUMERIC(12,2) in the database.
pub type Money = rust_decimal::Decimal;
