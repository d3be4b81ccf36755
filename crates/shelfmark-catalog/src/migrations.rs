use ::duckdb::Connection;

struct Migration {
    version: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "0001_book_tables",
        sql: r#"
CREATE TABLE IF NOT EXISTS publisher_books (
    id BIGINT PRIMARY KEY,
    isbn13 TEXT NOT NULL,
    title TEXT,
    author TEXT,
    keynote TEXT,
    extract_html TEXT,
    jacket_url TEXT,
    stored_image TEXT,
    publication_date DATE,
    average_rating DOUBLE,
    updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS bookseller_books (
    id BIGINT PRIMARY KEY,
    isbn13 TEXT NOT NULL,
    title TEXT,
    tagline TEXT,
    description TEXT,
    image TEXT,
    stored_image TEXT,
    price DOUBLE,
    average_rating DOUBLE,
    publication_date DATE,
    age_from INTEGER,
    age_to INTEGER,
    updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
);
"#,
    },
    Migration {
        version: "0002_book_links",
        sql: r#"
CREATE TABLE IF NOT EXISTS bookseller_book_authors (
    book_id BIGINT NOT NULL,
    name TEXT NOT NULL,
    position INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY(book_id, name)
);

CREATE TABLE IF NOT EXISTS book_categories (
    isbn13 TEXT NOT NULL,
    category TEXT NOT NULL,
    PRIMARY KEY(isbn13, category)
);

CREATE TABLE IF NOT EXISTS book_collections (
    isbn13 TEXT NOT NULL,
    collection TEXT NOT NULL,
    PRIMARY KEY(isbn13, collection)
);

CREATE TABLE IF NOT EXISTS book_formats (
    source TEXT NOT NULL,
    isbn13 TEXT NOT NULL,
    format TEXT NOT NULL,
    format_isbn13 TEXT NOT NULL,
    PRIMARY KEY(source, isbn13, format, format_isbn13)
);
"#,
    },
];

/// Apply every migration not yet recorded in `schema_migrations`.
pub fn apply_migrations(connection: &Connection) -> Result<(), ::duckdb::Error> {
    connection.execute_batch(
        r#"
CREATE TABLE IF NOT EXISTS schema_migrations (
    version TEXT PRIMARY KEY,
    applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
);
"#,
    )?;

    for migration in MIGRATIONS {
        let applied_count: i64 = connection.query_row(
            "SELECT COUNT(*) FROM schema_migrations WHERE version = ?",
            [migration.version],
            |row| row.get(0),
        )?;

        if applied_count == 0 {
            tracing::debug!(version = migration.version, "applying catalog migration");
            connection.execute_batch(migration.sql)?;
            connection.execute(
                "INSERT INTO schema_migrations (version) VALUES (?)",
                [migration.version],
            )?;
        }
    }

    Ok(())
}
