//! Multi-row insert-or-ignore against the embedded store
//!
//! Metadata tables (digests, instances) are append-only and keyed by
//! primary key: rows are inserted only if the key is absent, existing
//! rows are never touched. One parameterized statement covers a whole
//! metadata batch; statement text and parameter slice both come from
//! the shared pools.

use tracing::debug;
use turso::Database;

use crate::error::Result;
use crate::pool::Pools;

/// Build and execute one parameterized statement with `rows` repetitions
/// of `row_template`, terminated by `conflict_clause`
///
/// `fill` appends `rows * fields_per_row` values in row-major order.
/// Requesting zero rows is a programming error, not a runtime condition;
/// callers guard empty batches before reaching this path.
pub(crate) async fn upsert_rows(
    db: &Database,
    pools: &Pools,
    header: &str,
    row_template: &str,
    rows: usize,
    conflict_clause: &str,
    fill: impl FnOnce(&mut Vec<turso::Value>),
) -> Result<()> {
    assert!(rows > 0, "zero-row upsert requested");

    let mut stmt_text = pools.statements.get();
    build_statement(&mut stmt_text, header, row_template, rows, conflict_clause);

    let result = exec_statement(db, pools, &stmt_text, fill).await;
    pools.statements.put(stmt_text);
    result
}

fn build_statement(
    out: &mut String,
    header: &str,
    row_template: &str,
    rows: usize,
    conflict_clause: &str,
) {
    out.push_str(header);
    out.push_str(row_template);
    for _ in 1..rows {
        out.push_str(", ");
        out.push_str(row_template);
    }
    out.push_str(conflict_clause);
}

async fn exec_statement(
    db: &Database,
    pools: &Pools,
    stmt_text: &str,
    fill: impl FnOnce(&mut Vec<turso::Value>),
) -> Result<()> {
    let conn = db.connect()?;
    let mut stmt = conn.prepare(stmt_text).await?;

    let mut params = pools.params.get();
    fill(&mut params);

    // Statement binding consumes the vector; hand the storage off and
    // return the (emptied) slot to the pool.
    let bound = std::mem::take(&mut params);
    let result = stmt.execute(bound).await;
    pools.params.put(params);

    let changed = result?;
    debug!(rows = changed, "upserted metadata rows");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use turso::Builder;

    fn build(header: &str, template: &str, rows: usize, conflict: &str) -> String {
        let mut out = String::new();
        build_statement(&mut out, header, template, rows, conflict);
        out
    }

    #[test]
    fn test_single_row_statement() {
        let stmt = build(
            "INSERT INTO instance(instance, job) VALUES ",
            "(?, ?)",
            1,
            " ON CONFLICT DO NOTHING",
        );
        assert_eq!(
            stmt,
            "INSERT INTO instance(instance, job) VALUES (?, ?) ON CONFLICT DO NOTHING"
        );
    }

    #[test]
    fn test_multi_row_statement_joins_templates() {
        let stmt = build(
            "INSERT INTO plan_digest(digest, plan_text) VALUES ",
            "(?, ?)",
            3,
            " ON CONFLICT DO NOTHING",
        );
        assert_eq!(
            stmt,
            "INSERT INTO plan_digest(digest, plan_text) VALUES (?, ?), (?, ?), (?, ?) ON CONFLICT DO NOTHING"
        );
    }

    #[tokio::test]
    #[should_panic(expected = "zero-row upsert")]
    async fn test_zero_rows_panics() {
        let db = Builder::new_local(":memory:").build().await.unwrap();
        let pools = Pools::new();

        let _ = upsert_rows(&db, &pools, "INSERT INTO t(k) VALUES ", "(?)", 0, "", |_| {}).await;
    }

    #[tokio::test]
    async fn test_reinserting_a_key_keeps_the_original_row() {
        let db = Builder::new_local(":memory:").build().await.unwrap();
        let conn = db.connect().unwrap();
        conn.execute(
            "CREATE TABLE IF NOT EXISTS sql_digest (digest TEXT PRIMARY KEY, sql_text TEXT)",
            (),
        )
        .await
        .unwrap();

        let pools = Pools::new();

        for text in ["select 1", "select 2"] {
            upsert_rows(
                &db,
                &pools,
                "INSERT INTO sql_digest(digest, sql_text) VALUES ",
                "(?, ?)",
                1,
                " ON CONFLICT DO NOTHING",
                |params| {
                    params.push(turso::Value::Text("ef56".to_owned()));
                    params.push(turso::Value::Text(text.to_owned()));
                },
            )
            .await
            .unwrap();
        }

        let mut rows = conn
            .query("SELECT sql_text FROM sql_digest WHERE digest = ?", ["ef56"])
            .await
            .unwrap();
        let row = rows.next().await.unwrap().unwrap();
        let text: String = row.get(0).unwrap();
        assert_eq!(text, "select 1");
        assert!(rows.next().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_pooled_buffers_released_on_execution_failure() {
        let db = Builder::new_local(":memory:").build().await.unwrap();
        let pools = Pools::new();

        // No such table, preparation fails
        let result = upsert_rows(
            &db,
            &pools,
            "INSERT INTO missing(k) VALUES ",
            "(?)",
            1,
            " ON CONFLICT DO NOTHING",
            |params| params.push(turso::Value::Integer(1)),
        )
        .await;
        assert!(result.is_err());

        let statements = pools.statements.metrics().snapshot();
        assert_eq!(statements.gets(), statements.puts());
    }
}
