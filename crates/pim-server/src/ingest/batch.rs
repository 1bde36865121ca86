//! Batch upsert
//!
//! Commits a size-bounded group of normalized records to the store in one
//! atomic statement: insert each record, or overwrite the display fields of
//! an existing sku. Conflicting entries within one batch are resolved before
//! submission because a single multi-row upsert cannot apply two updates to
//! the same key.

use std::collections::HashSet;

use sqlx::PgPool;

use super::normalize::NewProduct;

/// Resolve duplicate skus within one batch: the entry appearing later in
/// input order wins, earlier ones are discarded.
pub fn dedup_last_wins(records: Vec<NewProduct>) -> Vec<NewProduct> {
    let mut seen: HashSet<String> = HashSet::with_capacity(records.len());
    let mut deduped: Vec<NewProduct> = records
        .into_iter()
        .rev()
        .filter(|record| seen.insert(record.sku.clone()))
        .collect();
    deduped.reverse();
    deduped
}

/// Upsert one batch in a single atomic statement.
///
/// Either every surviving record of the batch is applied or none is; batches
/// committed earlier in the same job are unaffected by a later failure.
pub async fn upsert_batch(pool: &PgPool, records: Vec<NewProduct>) -> Result<(), sqlx::Error> {
    if records.is_empty() {
        return Ok(());
    }

    let records = dedup_last_wins(records);

    let mut skus = Vec::with_capacity(records.len());
    let mut names = Vec::with_capacity(records.len());
    let mut descriptions: Vec<Option<String>> = Vec::with_capacity(records.len());
    let mut active_flags = Vec::with_capacity(records.len());
    for record in records {
        skus.push(record.sku);
        names.push(record.name);
        descriptions.push(record.description);
        active_flags.push(record.is_active);
    }

    tracing::debug!(rows = skus.len(), "upserting product batch");

    sqlx::query(
        r#"
        INSERT INTO products (sku, name, description, is_active)
        SELECT * FROM UNNEST($1::text[], $2::text[], $3::text[], $4::boolean[])
        ON CONFLICT (sku) DO UPDATE SET
            name = EXCLUDED.name,
            description = EXCLUDED.description,
            is_active = EXCLUDED.is_active
        "#,
    )
    .bind(&skus)
    .bind(&names)
    .bind(&descriptions)
    .bind(&active_flags)
    .execute(pool)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(sku: &str, name: &str) -> NewProduct {
        NewProduct {
            sku: sku.to_string(),
            name: name.to_string(),
            description: None,
            is_active: true,
        }
    }

    #[test]
    fn test_dedup_keeps_later_entry() {
        let deduped = dedup_last_wins(vec![
            record("abc-1", "Widget"),
            record("def-2", "Gadget"),
            record("abc-1", "Widget v2"),
        ]);

        assert_eq!(deduped.len(), 2);
        let abc = deduped.iter().find(|r| r.sku == "abc-1").unwrap();
        assert_eq!(abc.name, "Widget v2");
    }

    #[test]
    fn test_dedup_preserves_relative_order_of_survivors() {
        let deduped = dedup_last_wins(vec![
            record("a", "1"),
            record("b", "2"),
            record("a", "3"),
            record("c", "4"),
        ]);

        let skus: Vec<&str> = deduped.iter().map(|r| r.sku.as_str()).collect();
        assert_eq!(skus, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_dedup_without_duplicates_is_identity() {
        let input = vec![record("a", "1"), record("b", "2")];
        assert_eq!(dedup_last_wins(input.clone()), input);
    }

    #[test]
    fn test_dedup_empty() {
        assert!(dedup_last_wins(Vec::new()).is_empty());
    }
}
