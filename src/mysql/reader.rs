// ABOUTME: MySQL database introspection and data reading over the Client trait
// ABOUTME: Lists tables, reads server version, table DDL and row data

use crate::client::{first_value_as_string, Client, Row};
use crate::error::DatabaseError;
use crate::mysql::converter::value_as_text;
use crate::utils::quote_ident;

/// Query the server version string (`SELECT VERSION();`).
///
/// An empty result yields an empty string rather than an error; the version
/// only decorates the dump header.
pub async fn server_version<C: Client>(client: &mut C) -> Result<String, DatabaseError> {
    let rows = client.raw_query("SELECT VERSION();").await?;
    Ok(first_value_as_string(&rows).unwrap_or_default())
}

/// List base tables visible on the current connection, in server order.
///
/// Uses `SHOW FULL TABLES` and drops views: a view definition carries no
/// engine clause and cannot be replayed by the import state machine.
///
/// # Examples
///
/// ```no_run
/// # use seren_mysqldump::mysql::{connect_mysql, reader::list_tables};
/// # async fn example() -> anyhow::Result<()> {
/// let mut client = connect_mysql("mysql://localhost:3306/mydb").await?;
/// let tables = list_tables(&mut client).await?;
/// println!("Found {} tables", tables.len());
/// # Ok(())
/// # }
/// ```
pub async fn list_tables<C: Client>(client: &mut C) -> Result<Vec<String>, DatabaseError> {
    let rows = client.raw_query("SHOW FULL TABLES;").await?;

    let tables: Vec<String> = rows
        .iter()
        .filter(|row| {
            // A missing type column means a plain SHOW TABLES style answer
            row.get(1)
                .and_then(value_as_text)
                .map_or(true, |kind| kind.eq_ignore_ascii_case("BASE TABLE"))
        })
        .filter_map(|row| row.first().and_then(value_as_text))
        .collect();

    tracing::debug!("Found {} base table(s)", tables.len());

    Ok(tables)
}

/// Fetch the `CREATE TABLE` statement of a table, without trailing `;`.
pub async fn show_create_table<C: Client>(
    client: &mut C,
    table_name: &str,
) -> Result<String, DatabaseError> {
    let query = format!("SHOW CREATE TABLE {};", quote_ident(table_name));
    let rows = client.raw_query(&query).await?;

    rows.first()
        .and_then(|row| row.get(1))
        .and_then(value_as_text)
        .ok_or_else(|| {
            DatabaseError::new(format!(
                "SHOW CREATE TABLE returned no definition for '{}'",
                table_name
            ))
        })
}

/// Read all data from a table.
///
/// For large tables, this may consume significant memory.
pub async fn read_table_data<C: Client>(
    client: &mut C,
    table_name: &str,
) -> Result<Vec<Row>, DatabaseError> {
    tracing::debug!("Reading all rows from table '{}'", table_name);

    let query = format!("SELECT * FROM {};", quote_ident(table_name));
    let rows = client.raw_query(&query).await?;

    tracing::debug!("Read {} rows from table '{}'", rows.len(), table_name);

    Ok(rows)
}
