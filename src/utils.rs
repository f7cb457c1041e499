// ABOUTME: Utility functions for identifiers, log output and timestamps
// ABOUTME: Provides backtick quoting, display sanitising and dump-header dates

/// Quote a MySQL identifier with backticks, doubling embedded backticks.
///
/// # Examples
///
/// ```
/// # use seren_mysqldump::utils::quote_ident;
/// assert_eq!(quote_ident("users"), "`users`");
/// assert_eq!(quote_ident("we`ird"), "`we``ird`");
/// ```
pub fn quote_ident(identifier: &str) -> String {
    format!("`{}`", identifier.replace('`', "``"))
}

/// Sanitize an identifier (table name, schema name, etc.) for display
///
/// Removes control characters and limits length to prevent log injection attacks
/// and ensure readable error messages.
///
/// **Note**: This is for display purposes only. For SQL safety, use
/// [`quote_ident`].
///
/// # Examples
///
/// ```
/// # use seren_mysqldump::utils::sanitize_identifier;
/// assert_eq!(sanitize_identifier("normal_table"), "normal_table");
/// assert_eq!(sanitize_identifier("table\nname"), "tablename");
/// ```
pub fn sanitize_identifier(identifier: &str) -> String {
    identifier
        .chars()
        .filter(|c| !c.is_control())
        .take(100)
        .collect()
}

/// Shorten a statement for log output.
pub fn truncate_statement(sql: &str, max_chars: usize) -> String {
    let mut chars = sql.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

/// Local wall-clock time in the `YYYY-MM-DD HH:MM:SS` form used by dump headers.
pub fn dump_timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}
