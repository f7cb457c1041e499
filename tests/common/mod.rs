// ABOUTME: In-memory Client used by integration tests
// ABOUTME: Serves canned introspection answers and injects statement failures

#![allow(dead_code)]

use seren_mysqldump::client::{Client, Row, ServerInfo, Value};
use seren_mysqldump::error::DatabaseError;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

struct FailureRule {
    needle: String,
    remaining: Option<usize>,
    message: String,
}

/// Records every statement it receives. Statements are shared through an
/// `Arc` so hooks can observe progress while an import runs.
pub struct ScriptedClient {
    executed: Arc<Mutex<Vec<String>>>,
    tables: Vec<(String, String)>,
    definitions: HashMap<String, String>,
    data: HashMap<String, Vec<Row>>,
    version: String,
    failures: Vec<FailureRule>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self {
            executed: Arc::new(Mutex::new(Vec::new())),
            tables: Vec::new(),
            definitions: HashMap::new(),
            data: HashMap::new(),
            version: "8.0.36".to_string(),
            failures: Vec::new(),
        }
    }

    /// Add a base table with a `SHOW CREATE TABLE` answer and rows.
    pub fn with_table(mut self, name: &str, ddl: &str, rows: Vec<Row>) -> Self {
        self.tables.push((name.to_string(), "BASE TABLE".to_string()));
        self.definitions.insert(name.to_string(), ddl.to_string());
        self.data.insert(name.to_string(), rows);
        self
    }

    pub fn with_view(mut self, name: &str) -> Self {
        self.tables.push((name.to_string(), "VIEW".to_string()));
        self
    }

    /// Statements containing `needle` fail `times` times (forever with `None`).
    pub fn failing(mut self, needle: &str, times: Option<usize>, message: &str) -> Self {
        self.failures.push(FailureRule {
            needle: needle.to_string(),
            remaining: times,
            message: message.to_string(),
        });
        self
    }

    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }

    pub fn executed_handle(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.executed)
    }

    fn injected_failure(&mut self, sql: &str) -> Option<DatabaseError> {
        let rule = self
            .failures
            .iter_mut()
            .find(|rule| sql.contains(&rule.needle) && rule.remaining != Some(0))?;
        if let Some(remaining) = rule.remaining.as_mut() {
            *remaining -= 1;
        }
        Some(DatabaseError::new(rule.message.clone()))
    }
}

pub fn text(value: &str) -> Value {
    Value::Bytes(value.as_bytes().to_vec())
}

impl Client for ScriptedClient {
    async fn raw_query(&mut self, sql: &str) -> Result<Vec<Row>, DatabaseError> {
        self.executed.lock().unwrap().push(sql.to_string());

        if let Some(err) = self.injected_failure(sql) {
            return Err(err);
        }

        if sql == "SHOW FULL TABLES;" {
            return Ok(self
                .tables
                .iter()
                .map(|(name, kind)| vec![text(name), text(kind)])
                .collect());
        }
        if sql == "SELECT VERSION();" {
            return Ok(vec![vec![text(&self.version)]]);
        }
        if let Some(name) = table_in(sql, "SHOW CREATE TABLE `") {
            let ddl = self.definitions.get(&name).cloned().unwrap_or_default();
            return Ok(vec![vec![text(&name), text(&ddl)]]);
        }
        if let Some(name) = table_in(sql, "SELECT * FROM `") {
            return Ok(self.data.get(&name).cloned().unwrap_or_default());
        }

        Ok(Vec::new())
    }

    fn server_info(&self) -> ServerInfo {
        ServerInfo {
            host: "db.test".to_string(),
            database: "shop".to_string(),
        }
    }
}

fn table_in(sql: &str, prefix: &str) -> Option<String> {
    let rest = sql.strip_prefix(prefix)?;
    let end = rest.find('`')?;
    Some(rest[..end].to_string())
}
