// ABOUTME: Integration tests against a real MySQL server
// ABOUTME: Set TEST_MYSQL_URL and run with --ignored to exercise export, import and maintenance

use seren_mysqldump::client::Client;
use seren_mysqldump::config::DumpConfig;
use seren_mysqldump::dump::{export, import, optimize, ImportMode, OptimizeOptions};
use seren_mysqldump::mysql::connect_mysql;
use std::env;

/// Helper to get test MySQL URL from environment
fn get_test_mysql_url() -> Option<String> {
    env::var("TEST_MYSQL_URL").ok()
}

async fn create_test_tables(url: &str) -> anyhow::Result<()> {
    let mut client = connect_mysql(url).await?;

    for sql in [
        "DROP TABLE IF EXISTS dump_it_posts",
        "DROP TABLE IF EXISTS dump_it_users",
        "CREATE TABLE dump_it_users (
            id INT PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            bio TEXT,
            avatar BLOB,
            balance DECIMAL(10, 2),
            created_at DATETIME
        ) ENGINE=InnoDB",
        "CREATE TABLE dump_it_posts (
            id INT PRIMARY KEY,
            user_id INT,
            title VARCHAR(255),
            FOREIGN KEY (user_id) REFERENCES dump_it_users(id)
        ) ENGINE=InnoDB",
        "INSERT INTO dump_it_users VALUES
            (1, 'Alice', 'likes; semicolons', X'00FF10', 10.50, '2024-01-15 10:30:45'),
            (2, 'O''Brien', 'two\nlines', NULL, NULL, NULL)",
        "INSERT INTO dump_it_posts VALUES (1, 1, 'hello'), (2, 2, NULL)",
    ] {
        client.raw_query(sql).await?;
    }

    client.disconnect().await?;
    Ok(())
}

#[tokio::test]
#[ignore]
async fn test_export_then_import_round_trip() {
    let url = match get_test_mysql_url() {
        Some(url) => url,
        None => {
            println!("Skipping test: TEST_MYSQL_URL not set");
            return;
        }
    };

    create_test_tables(&url).await.expect("Failed to create test tables");

    let config = DumpConfig::default().with_in_table(["dump_it_users", "dump_it_posts"]);
    let mut client = connect_mysql(&url).await.expect("Failed to connect");

    let dump_file = tempfile::NamedTempFile::new().unwrap();
    let mut sink = tokio::fs::File::create(dump_file.path()).await.unwrap();
    export(&mut sink, &mut client, &config).await.expect("Export failed");
    drop(sink);

    let script = std::fs::read_to_string(dump_file.path()).unwrap();
    assert!(script.contains("DROP TABLE IF EXISTS `dump_it_users`;"));
    assert!(script.contains("'likes; semicolons'"));
    assert!(script.contains("0x00FF10"));

    let result = import(&mut client, &DumpConfig::default(), dump_file.path(), ImportMode::Read)
        .await
        .expect("Import failed");
    assert_eq!(result.error_num, 0, "unexpected failure: {:?}", result.error_msg);

    let rows = client
        .raw_query("SELECT name, bio FROM dump_it_users ORDER BY id")
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1][0], mysql_async::Value::Bytes(b"O'Brien".to_vec()));
    assert_eq!(rows[1][1], mysql_async::Value::Bytes(b"two\nlines".to_vec()));

    client.disconnect().await.unwrap();
}

#[tokio::test]
#[ignore]
async fn test_optimize_returns_status_rows() {
    let url = match get_test_mysql_url() {
        Some(url) => url,
        None => {
            println!("Skipping test: TEST_MYSQL_URL not set");
            return;
        }
    };

    create_test_tables(&url).await.expect("Failed to create test tables");

    let mut client = connect_mysql(&url).await.expect("Failed to connect");
    let config = DumpConfig::default().with_in_table(["dump_it_users"]);

    let rows = optimize(&mut client, &config, OptimizeOptions::default())
        .await
        .expect("Optimize failed")
        .expect("tables were configured");
    assert!(!rows.is_empty());

    client.disconnect().await.unwrap();
}
