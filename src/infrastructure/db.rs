use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};

pub async fn init_db(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(database_url).await?;

    // Run migrations manually (simple SQL)
    run_migrations(&db).await?;

    Ok(db)
}

async fn run_migrations(db: &DatabaseConnection) -> Result<(), DbErr> {
    let statements = [
        r#"
        CREATE TABLE IF NOT EXISTS components (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            serial_number TEXT NOT NULL,
            description TEXT,
            category TEXT,
            status TEXT NOT NULL DEFAULT 'available',
            is_active BOOLEAN NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
        // Serial numbers only need to be unique among live rows, so a
        // soft-deleted component does not block re-registering its serial.
        r#"
        CREATE UNIQUE INDEX IF NOT EXISTS idx_components_serial_active
        ON components(serial_number) WHERE is_active = 1
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS kits (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            description TEXT,
            kit_code TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'available',
            is_active BOOLEAN NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
        r#"
        CREATE UNIQUE INDEX IF NOT EXISTS idx_kits_code_active
        ON kits(kit_code) WHERE is_active = 1
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS kit_components (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            kit_id INTEGER NOT NULL,
            component_id INTEGER NOT NULL,
            quantity INTEGER NOT NULL CHECK (quantity > 0),
            UNIQUE (kit_id, component_id),
            FOREIGN KEY (kit_id) REFERENCES kits(id) ON DELETE CASCADE,
            FOREIGN KEY (component_id) REFERENCES components(id) ON DELETE CASCADE
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS loans (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_name TEXT NOT NULL,
            user_email TEXT NOT NULL,
            component_id INTEGER,
            kit_id INTEGER,
            loan_date TEXT NOT NULL,
            expected_return_date TEXT NOT NULL,
            return_date TEXT,
            status TEXT NOT NULL DEFAULT 'active',
            notes TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            CHECK ((component_id IS NULL) <> (kit_id IS NULL)),
            FOREIGN KEY (component_id) REFERENCES components(id),
            FOREIGN KEY (kit_id) REFERENCES kits(id)
        )
        "#,
        "CREATE INDEX IF NOT EXISTS idx_loans_status ON loans(status)",
    ];

    for sql in statements {
        db.execute(Statement::from_string(
            db.get_database_backend(),
            sql.to_owned(),
        ))
        .await?;
    }

    tracing::debug!("Database schema is up to date");
    Ok(())
}
