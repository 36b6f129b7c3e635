// ==========================================
// Exam Center - Configuration manager
// ==========================================
// Responsibility: load / query / override settings
// Storage: config_kv table (key-value, scope_id='global')
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::types::HallExclusivity;
use rusqlite::{params, Connection};
use serde_json::json;
use std::collections::HashMap;
use std::error::Error;
use std::sync::{Arc, Mutex};

/// Default message language
pub const DEFAULT_LOCALE: &str = "tr";

/// Supported message languages
pub const SUPPORTED_LOCALES: &[&str] = &["tr", "en"];

// ==========================================
// ConfigManager
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// Open a dedicated connection
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Share an existing connection (PRAGMA setup is re-applied, idempotent)
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("lock failed: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("lock failed: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    fn get_config_or_default(&self, key: &str, default: &str) -> Result<String, Box<dyn Error>> {
        Ok(self.get_config_value(key)?.unwrap_or_else(|| default.to_string()))
    }

    /// Read a global value (shared with other modules)
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        self.get_config_value(key)
    }

    /// Upsert a global value
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("lock failed: {}", e))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    /// All global settings as a JSON object string
    pub fn get_config_snapshot(&self) -> Result<String, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("lock failed: {}", e))?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;

        let mut config_map: HashMap<String, String> = HashMap::new();
        let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?;
        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string(&json!(config_map))?)
    }

    // ===== typed settings =====

    /// Message language; unknown values fall back to the default
    pub fn get_locale(&self) -> Result<String, Box<dyn Error>> {
        let value = self.get_config_or_default(config_keys::LOCALE, DEFAULT_LOCALE)?;
        let value = value.trim().to_lowercase();
        if SUPPORTED_LOCALES.contains(&value.as_str()) {
            Ok(value)
        } else {
            tracing::warn!(config_key = config_keys::LOCALE, raw_value = %value, "unsupported locale, using default");
            Ok(DEFAULT_LOCALE.to_string())
        }
    }

    /// session_hall write policy (default REJECT)
    pub fn get_hall_exclusivity(&self) -> Result<HallExclusivity, Box<dyn Error>> {
        let value = self.get_config_or_default(config_keys::HALL_EXCLUSIVITY, "REJECT")?;
        Ok(value.parse::<HallExclusivity>().unwrap_or_else(|e| {
            tracing::warn!(config_key = config_keys::HALL_EXCLUSIVITY, "{}, using REJECT", e);
            HallExclusivity::Reject
        }))
    }
}

// ==========================================
// Config keys
// ==========================================
pub mod config_keys {
    // message language
    pub const LOCALE: &str = "locale";

    // session_hall exclusivity policy
    pub const HALL_EXCLUSIVITY: &str = "hall_exclusivity";
}
