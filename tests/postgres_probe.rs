//! Probe runs against real Postgres sockets.
//!
//! The `#[sqlx::test]` cases need a server reachable through `DATABASE_URL`
//! and are ignored by default; run them with `cargo test -- --ignored`.

use rowprobe::probe::{
    ConnectionDescriptor, PgConnector, ProbeError, ProbeReport, TableRef, run_probe,
};
use sqlx::PgPool;
use sqlx::postgres::PgConnectOptions;
use std::time::Duration;

fn descriptor_for(pool: &PgPool, schema: &str, table: &str) -> ConnectionDescriptor {
    let target = (*pool.connect_options()).clone();
    ConnectionDescriptor::new(target, TableRef::new(schema, table).unwrap())
        .with_timeouts(Duration::from_secs(5), Duration::from_secs(5))
}

async fn create_users_table(pool: &PgPool) -> sqlx::Result<()> {
    sqlx::query("CREATE SCHEMA fsbb").execute(pool).await?;
    sqlx::query("CREATE TABLE fsbb.users (id serial PRIMARY KEY, email text NOT NULL)")
        .execute(pool)
        .await?;
    Ok(())
}

#[tokio::test]
async fn unreachable_host_reports_connection_error() {
    // Port 1 on loopback has nothing listening
    let target = PgConnectOptions::new_without_pgpass()
        .host("127.0.0.1")
        .port(1)
        .username("probe")
        .database("app");
    let descriptor = ConnectionDescriptor::new(target, TableRef::new("public", "users").unwrap())
        .with_timeouts(Duration::from_secs(2), Duration::from_secs(2));
    let mut sink = Vec::<String>::new();

    let report = run_probe(&descriptor, &PgConnector, &mut sink).await;

    assert!(matches!(
        report,
        ProbeReport::Failed(ProbeError::Connection { .. })
    ));
    assert_eq!(sink.len(), 1);
    assert!(sink[0].starts_with("Probe failed: connection to probe@127.0.0.1:1/app failed"));
}

#[sqlx::test(migrations = false)]
#[ignore = "requires a live Postgres reachable through DATABASE_URL"]
async fn reports_email_of_first_row(pool: PgPool) -> sqlx::Result<()> {
    create_users_table(&pool).await?;
    sqlx::query("INSERT INTO fsbb.users (email) VALUES ('a@example.com')")
        .execute(&pool)
        .await?;

    let descriptor = descriptor_for(&pool, "fsbb", "users");
    let mut sink = Vec::<String>::new();

    let first = run_probe(&descriptor, &PgConnector, &mut sink).await;
    let second = run_probe(&descriptor, &PgConnector, &mut sink).await;

    assert_eq!(first.value(), Some("a@example.com"));
    assert_eq!(second.value(), Some("a@example.com"));
    assert_eq!(
        sink,
        vec![
            "Found user: a@example.com".to_owned(),
            "Found user: a@example.com".to_owned()
        ]
    );
    Ok(())
}

#[sqlx::test(migrations = false)]
#[ignore = "requires a live Postgres reachable through DATABASE_URL"]
async fn empty_table_reports_no_rows(pool: PgPool) -> sqlx::Result<()> {
    create_users_table(&pool).await?;

    let descriptor = descriptor_for(&pool, "fsbb", "users");
    let mut sink = Vec::<String>::new();

    let report = run_probe(&descriptor, &PgConnector, &mut sink).await;

    assert!(matches!(report, ProbeReport::Empty { .. }));
    assert_eq!(sink, vec!["No rows found in fsbb.users".to_owned()]);
    Ok(())
}

#[sqlx::test(migrations = false)]
#[ignore = "requires a live Postgres reachable through DATABASE_URL"]
async fn missing_table_reports_query_error(pool: PgPool) -> sqlx::Result<()> {
    let descriptor = descriptor_for(&pool, "public", "does_not_exist");
    let mut sink = Vec::<String>::new();

    let report = run_probe(&descriptor, &PgConnector, &mut sink).await;

    match report {
        ProbeReport::Failed(e @ ProbeError::Query { .. }) => {
            assert!(e.chain().contains("does_not_exist"), "{}", e.chain());
        }
        other => panic!("expected query failure, got {other:?}"),
    }
    Ok(())
}

#[sqlx::test(migrations = false)]
#[ignore = "requires a live Postgres reachable through DATABASE_URL"]
async fn null_column_is_a_query_error(pool: PgPool) -> sqlx::Result<()> {
    sqlx::query("CREATE TABLE public.users (id serial PRIMARY KEY, email text)")
        .execute(&pool)
        .await?;
    sqlx::query("INSERT INTO public.users (email) VALUES (NULL)")
        .execute(&pool)
        .await?;

    let descriptor = descriptor_for(&pool, "public", "users");
    let mut sink = Vec::<String>::new();

    let report = run_probe(&descriptor, &PgConnector, &mut sink).await;

    assert!(matches!(report, ProbeReport::Failed(ProbeError::Query { .. })));
    assert!(sink[0].contains("is NULL"), "{}", sink[0]);
    Ok(())
}
