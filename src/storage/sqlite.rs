/// SQLite implementation of the habit storage interface
///
/// This module provides the concrete SQLite implementation for storing
/// and retrieving habit data. It handles all SQL queries and data conversion.

use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::Type;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

use crate::domain::{Cadence, Completion, Habit, HabitId, HabitLog, LogId};
use crate::storage::{migrations, HabitStorage, LogFilter, LogOrdering, StorageError};

const DATE_FORMAT: &str = "%Y-%m-%d";

const HABIT_COLUMNS: &str = "id, name, cadence, target_per_period, created_at";
const LOG_COLUMNS: &str = "id, habit_id, date, value, created_at";

/// SQLite-based storage implementation
///
/// This struct holds a connection to the SQLite database and implements
/// all the storage operations defined in the HabitStorage trait.
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Create a new SQLite storage instance
    ///
    /// This opens the database file and runs any necessary migrations
    /// to ensure the schema is up to date.
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self, StorageError> {
        let db_path = db_path.as_ref();
        let conn = Connection::open(db_path)
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;

        let storage = Self::with_connection(conn)?;
        tracing::info!("SQLite storage initialized at: {:?}", db_path);
        Ok(storage)
    }

    /// Open a private in-memory database (used by tests)
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self, StorageError> {
        // Needed for ON DELETE CASCADE on habit_logs
        conn.execute("PRAGMA foreign_keys = ON", [])
            .map_err(|e| StorageError::Connection(format!("Failed to enable foreign keys: {}", e)))?;

        migrations::initialize_database(&conn)?;

        Ok(Self { conn })
    }
}

// Row conversion helpers

fn conversion_error<E>(column: usize, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(err))
}

fn parse_timestamp(column: usize, value: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conversion_error(column, e))
}

fn parse_date(column: usize, value: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|e| conversion_error(column, e))
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn habit_from_row(row: &Row<'_>) -> rusqlite::Result<Habit> {
    let id_str: String = row.get(0)?;
    let id = HabitId::from_string(&id_str).map_err(|e| conversion_error(0, e))?;

    let cadence_str: String = row.get(2)?;
    let cadence: Cadence = cadence_str.parse().map_err(|e| conversion_error(2, e))?;

    let created_at_str: String = row.get(4)?;
    let created_at = parse_timestamp(4, &created_at_str)?;

    Ok(Habit::from_existing(
        id,
        row.get(1)?, // name
        cadence,
        row.get(3)?, // target_per_period
        created_at,
    ))
}

fn log_from_row(row: &Row<'_>) -> rusqlite::Result<HabitLog> {
    let id_str: String = row.get(0)?;
    let id = LogId::from_string(&id_str).map_err(|e| conversion_error(0, e))?;

    let habit_id_str: String = row.get(1)?;
    let habit_id = HabitId::from_string(&habit_id_str).map_err(|e| conversion_error(1, e))?;

    let date_str: String = row.get(2)?;
    let date = parse_date(2, &date_str)?;

    let created_at_str: String = row.get(4)?;
    let created_at = parse_timestamp(4, &created_at_str)?;

    Ok(HabitLog::from_existing(id, habit_id, date, row.get(3)?, created_at))
}

impl HabitStorage for SqliteStorage {
    fn create_habit(&self, habit: &Habit) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO habits (id, name, cadence, target_per_period, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                habit.id.to_string(),
                habit.name,
                habit.cadence.as_str(),
                habit.target_per_period,
                habit.created_at.to_rfc3339(),
            ],
        )?;

        tracing::debug!("Created habit: {} ({})", habit.name, habit.id);
        Ok(())
    }

    fn get_habit(&self, habit_id: &HabitId) -> Result<Habit, StorageError> {
        let sql = format!("SELECT {} FROM habits WHERE id = ?1", HABIT_COLUMNS);

        self.conn
            .query_row(&sql, params![habit_id.to_string()], habit_from_row)
            .optional()?
            .ok_or_else(|| StorageError::HabitNotFound {
                habit_id: habit_id.to_string(),
            })
    }

    fn update_habit(&self, habit: &Habit) -> Result<(), StorageError> {
        let rows_affected = self.conn.execute(
            "UPDATE habits SET
                name = ?2,
                cadence = ?3,
                target_per_period = ?4
             WHERE id = ?1",
            params![
                habit.id.to_string(),
                habit.name,
                habit.cadence.as_str(),
                habit.target_per_period,
            ],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::HabitNotFound {
                habit_id: habit.id.to_string(),
            });
        }

        tracing::debug!("Updated habit: {} ({})", habit.name, habit.id);
        Ok(())
    }

    fn delete_habit(&self, habit_id: &HabitId) -> Result<(), StorageError> {
        let rows_affected = self.conn.execute(
            "DELETE FROM habits WHERE id = ?1",
            params![habit_id.to_string()],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::HabitNotFound {
                habit_id: habit_id.to_string(),
            });
        }

        tracing::debug!("Deleted habit and its logs: {}", habit_id);
        Ok(())
    }

    fn list_habits(&self) -> Result<Vec<Habit>, StorageError> {
        let sql = format!(
            "SELECT {} FROM habits ORDER BY created_at ASC, rowid ASC",
            HABIT_COLUMNS
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let habits = stmt
            .query_map([], habit_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(habits)
    }

    fn create_log(&self, log: &HabitLog) -> Result<(), StorageError> {
        let result = self.conn.execute(
            "INSERT INTO habit_logs (id, habit_id, date, value, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                log.id.to_string(),
                log.habit_id.to_string(),
                format_date(log.date),
                log.value,
                log.created_at.to_rfc3339(),
            ],
        );

        match result {
            Ok(_) => {
                tracing::debug!("Created log {} for habit {} on {}", log.id, log.habit_id, log.date);
                Ok(())
            }
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                Err(StorageError::DuplicateEntry {
                    habit_id: log.habit_id.to_string(),
                    date: format_date(log.date),
                })
            }
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY =>
            {
                Err(StorageError::HabitNotFound {
                    habit_id: log.habit_id.to_string(),
                })
            }
            Err(e) => Err(StorageError::Query(e)),
        }
    }

    fn find_log(&self, habit_id: &HabitId, date: NaiveDate) -> Result<Option<HabitLog>, StorageError> {
        let sql = format!(
            "SELECT {} FROM habit_logs WHERE habit_id = ?1 AND date = ?2",
            LOG_COLUMNS
        );

        let log = self
            .conn
            .query_row(&sql, params![habit_id.to_string(), format_date(date)], log_from_row)
            .optional()?;

        Ok(log)
    }

    fn delete_log(&self, log_id: &LogId) -> Result<(), StorageError> {
        let rows_affected = self.conn.execute(
            "DELETE FROM habit_logs WHERE id = ?1",
            params![log_id.to_string()],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::LogNotFound {
                log_id: log_id.to_string(),
            });
        }

        tracing::debug!("Deleted log: {}", log_id);
        Ok(())
    }

    fn list_logs(&self, filter: &LogFilter) -> Result<Vec<HabitLog>, StorageError> {
        let mut clauses = Vec::new();
        let mut values = Vec::new();

        if let Some(habit_id) = &filter.habit_id {
            values.push(habit_id.to_string());
            clauses.push(format!("habit_id = ?{}", values.len()));
        }
        if let Some(from) = filter.date_from {
            values.push(format_date(from));
            clauses.push(format!("date >= ?{}", values.len()));
        }
        if let Some(to) = filter.date_to {
            values.push(format_date(to));
            clauses.push(format!("date <= ?{}", values.len()));
        }

        let mut sql = format!("SELECT {} FROM habit_logs", LOG_COLUMNS);
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(match filter.ordering {
            LogOrdering::DateAsc => " ORDER BY date ASC, created_at ASC",
            LogOrdering::DateDesc => " ORDER BY date DESC, created_at DESC",
        });

        let mut stmt = self.conn.prepare(&sql)?;
        let logs = stmt
            .query_map(params_from_iter(values.iter()), log_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(logs)
    }

    fn completions_up_to(
        &self,
        habit_id: &HabitId,
        reference: NaiveDate,
    ) -> Result<Vec<Completion>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT date, value FROM habit_logs
             WHERE habit_id = ?1 AND date <= ?2
             ORDER BY date ASC",
        )?;

        let completions = stmt
            .query_map(params![habit_id.to_string(), format_date(reference)], |row| {
                let date_str: String = row.get(0)?;
                Ok(Completion::new(parse_date(0, &date_str)?, row.get(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(completions)
    }
}
