use std::{
    fs,
    path::Path,
};

use sqlx::{
    sqlite::{
        SqliteConnectOptions,
        SqlitePool,
        SqlitePoolOptions,
    },
    FromRow,
    Row,
};

use crate::core::{
    SukiyakiError,
    VocabularyRecord,
};

/// Durable vocabulary store keyed by lemma. One writer at a time: the pool
/// is capped at a single connection, and a single upsert is one atomic
/// statement under SQLite journaling.
pub struct VocabularyStore {
    pool: SqlitePool,
}

#[derive(Debug, FromRow)]
struct RecordRow {
    lemma: String,
    reading: String,
    meaning: String,
    example_source: String,
    example_target: String,
}

impl From<RecordRow> for VocabularyRecord {
    fn from(row: RecordRow) -> Self {
        VocabularyRecord {
            lemma: row.lemma,
            reading: row.reading,
            meaning: row.meaning,
            example_source: row.example_source,
            example_target: row.example_target,
        }
    }
}

impl VocabularyStore {
    /// Opens (creating if missing) the database at `path` and brings its
    /// schema up to date before returning.
    pub async fn open(path: &Path) -> Result<Self, SukiyakiError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::new().filename(path).create_if_missing(true);
        let pool = SqlitePoolOptions::new().max_connections(1).connect_with(options).await?;

        let store = VocabularyStore { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// In-memory store for tests.
    pub async fn in_memory() -> Result<Self, SukiyakiError> {
        let pool =
            SqlitePoolOptions::new().max_connections(1).connect("sqlite::memory:").await?;

        let store = VocabularyStore { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Idempotent schema migration. Creates the table when missing; rebuilds
    /// a legacy table whose lemma column predates the uniqueness constraint.
    /// Running it twice changes nothing.
    pub async fn migrate(&self) -> Result<(), SukiyakiError> {
        if self.table_exists().await? && !self.lemma_is_unique().await? {
            self.rebuild_legacy_table().await?;
        }

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS words (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                lemma TEXT NOT NULL UNIQUE,
                reading TEXT NOT NULL DEFAULT '',
                meaning TEXT NOT NULL DEFAULT '',
                example_source TEXT NOT NULL DEFAULT '',
                example_target TEXT NOT NULL DEFAULT ''
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn table_exists(&self) -> Result<bool, SukiyakiError> {
        let row = sqlx::query("SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'words'")
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    async fn lemma_is_unique(&self) -> Result<bool, SukiyakiError> {
        let indexes = sqlx::query("PRAGMA index_list('words')").fetch_all(&self.pool).await?;

        for index in indexes {
            let unique: i64 = index.try_get("unique")?;
            if unique == 0 {
                continue;
            }

            let name: String = index.try_get("name")?;
            let columns = sqlx::query(&format!("PRAGMA index_info('{}')", name))
                .fetch_all(&self.pool)
                .await?;

            if columns.len() == 1 {
                let column: String = columns[0].try_get("name")?;
                if column == "lemma" {
                    return Ok(true);
                }
            }
        }

        Ok(false)
    }

    /// One transaction: copy into a uniquely-keyed table keeping the first
    /// occurrence of each lemma, drop the old table, take its name.
    async fn rebuild_legacy_table(&self) -> Result<(), SukiyakiError> {
        println!("Rebuilding legacy vocabulary table...");
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            CREATE TABLE words_migrated (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                lemma TEXT NOT NULL UNIQUE,
                reading TEXT NOT NULL DEFAULT '',
                meaning TEXT NOT NULL DEFAULT '',
                example_source TEXT NOT NULL DEFAULT '',
                example_target TEXT NOT NULL DEFAULT ''
            );
            "#,
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT OR IGNORE INTO words_migrated
                (lemma, reading, meaning, example_source, example_target)
            SELECT
                lemma,
                COALESCE(reading, ''),
                COALESCE(meaning, ''),
                COALESCE(example_source, ''),
                COALESCE(example_target, '')
            FROM words
            WHERE lemma IS NOT NULL AND lemma <> ''
            ORDER BY id;
            "#,
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query("DROP TABLE words").execute(&mut *tx).await?;
        sqlx::query("ALTER TABLE words_migrated RENAME TO words").execute(&mut *tx).await?;

        tx.commit().await?;
        println!("Legacy vocabulary table rebuilt");
        Ok(())
    }

    /// Insert or fully replace the record stored under this lemma. All
    /// non-key fields take the incoming values, empty or not.
    pub async fn upsert(&self, record: &VocabularyRecord) -> Result<(), SukiyakiError> {
        sqlx::query(
            r#"
            INSERT INTO words (lemma, reading, meaning, example_source, example_target)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(lemma) DO UPDATE SET
                reading = excluded.reading,
                meaning = excluded.meaning,
                example_source = excluded.example_source,
                example_target = excluded.example_target
            "#,
        )
        .bind(&record.lemma)
        .bind(&record.reading)
        .bind(&record.meaning)
        .bind(&record.example_source)
        .bind(&record.example_target)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Full snapshot in insertion order.
    pub async fn list_all(&self) -> Result<Vec<VocabularyRecord>, SukiyakiError> {
        let rows = sqlx::query_as::<_, RecordRow>(
            "SELECT lemma, reading, meaning, example_source, example_target FROM words ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(VocabularyRecord::from).collect())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(lemma: &str, meaning: &str) -> VocabularyRecord {
        VocabularyRecord {
            lemma: lemma.to_string(),
            reading: String::new(),
            meaning: meaning.to_string(),
            example_source: String::new(),
            example_target: String::new(),
        }
    }

    #[tokio::test]
    async fn upsert_then_list_round_trips() {
        let store = VocabularyStore::in_memory().await.unwrap();

        let mut neko = record("猫", "cat");
        neko.reading = "ねこ".to_string();
        neko.example_source = "猫がいる。".to_string();
        neko.example_target = "There is a cat.".to_string();

        store.upsert(&neko).await.unwrap();

        let all = store.list_all().await.unwrap();
        assert_eq!(all, vec![neko]);
    }

    #[tokio::test]
    async fn conflicting_upsert_replaces_every_field() {
        let store = VocabularyStore::in_memory().await.unwrap();

        let mut first = record("猫", "cat");
        first.reading = "ねこ".to_string();
        first.example_source = "猫がいる。".to_string();
        first.example_target = "There is a cat.".to_string();
        store.upsert(&first).await.unwrap();

        // Weaker data still wins: last write replaces all non-key fields.
        let second = record("猫", "cat, feline");
        store.upsert(&second).await.unwrap();

        let all = store.list_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].meaning, "cat, feline");
        assert_eq!(all[0].reading, "");
        assert_eq!(all[0].example_source, "");
    }

    #[tokio::test]
    async fn repeated_identical_upsert_keeps_one_row() {
        let store = VocabularyStore::in_memory().await.unwrap();

        let neko = record("猫", "cat");
        store.upsert(&neko).await.unwrap();
        store.upsert(&neko).await.unwrap();
        store.upsert(&neko).await.unwrap();

        let all = store.list_all().await.unwrap();
        assert_eq!(all, vec![neko]);
    }

    #[tokio::test]
    async fn list_preserves_insertion_order() {
        let store = VocabularyStore::in_memory().await.unwrap();

        store.upsert(&record("猫", "cat")).await.unwrap();
        store.upsert(&record("犬", "dog")).await.unwrap();
        store.upsert(&record("鳥", "bird")).await.unwrap();
        // Updating an old lemma keeps its original position.
        store.upsert(&record("猫", "cat, feline")).await.unwrap();

        let lemmas: Vec<String> =
            store.list_all().await.unwrap().into_iter().map(|r| r.lemma).collect();
        assert_eq!(lemmas, vec!["猫", "犬", "鳥"]);
    }

    #[tokio::test]
    async fn migrating_twice_is_a_no_op() {
        let store = VocabularyStore::in_memory().await.unwrap();
        store.upsert(&record("猫", "cat")).await.unwrap();

        store.migrate().await.unwrap();
        store.migrate().await.unwrap();

        let all = store.list_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].meaning, "cat");
    }

    #[tokio::test]
    async fn legacy_table_is_rebuilt_keeping_first_occurrences() {
        let db_path = std::env::temp_dir()
            .join(format!("sukiyaki-legacy-{}.db", std::process::id()));
        let _ = std::fs::remove_file(&db_path);

        // A database from before the uniqueness constraint: duplicate
        // lemmas, NULL fields, and a blank row.
        {
            let options = SqliteConnectOptions::new()
                .filename(&db_path)
                .create_if_missing(true);
            let pool = SqlitePoolOptions::new()
                .max_connections(1)
                .connect_with(options)
                .await
                .unwrap();

            sqlx::query(
                r#"
                CREATE TABLE words (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    lemma TEXT,
                    reading TEXT,
                    meaning TEXT,
                    example_source TEXT,
                    example_target TEXT
                );
                "#,
            )
            .execute(&pool)
            .await
            .unwrap();

            sqlx::query(
                r#"
                INSERT INTO words (lemma, reading, meaning, example_source, example_target)
                VALUES
                    ('猫', 'ねこ', 'cat', NULL, NULL),
                    ('犬', NULL, 'dog', '', ''),
                    ('猫', 'ねこ', 'cat, feline', '', ''),
                    ('', NULL, 'blank', NULL, NULL);
                "#,
            )
            .execute(&pool)
            .await
            .unwrap();

            pool.close().await;
        }

        let store = VocabularyStore::open(&db_path).await.unwrap();
        let all = store.list_all().await.unwrap();

        assert_eq!(all.len(), 2);
        assert_eq!(all[0].lemma, "猫");
        assert_eq!(all[0].meaning, "cat");
        assert_eq!(all[0].example_source, "");
        assert_eq!(all[1].lemma, "犬");
        assert_eq!(all[1].reading, "");

        // Reopening runs the migration again and must change nothing.
        store.close().await;
        let store = VocabularyStore::open(&db_path).await.unwrap();
        assert_eq!(store.list_all().await.unwrap().len(), 2);

        store.close().await;
        let _ = std::fs::remove_file(&db_path);
    }

    #[tokio::test]
    async fn upsert_after_close_fails_cleanly() {
        let store = VocabularyStore::in_memory().await.unwrap();
        store.close().await;

        assert!(store.upsert(&record("猫", "cat")).await.is_err());
    }
}
