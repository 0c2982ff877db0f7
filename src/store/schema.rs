pub const SCHEMA: &str = r#"
-- Reference data, re-seeded from the catalog on every start
CREATE TABLE IF NOT EXISTS permit_types (
    id TEXT PRIMARY KEY,
    name_fr TEXT NOT NULL,
    name_en TEXT NOT NULL,
    description TEXT,
    official_url TEXT,
    cost TEXT,
    last_verified TEXT,
    sort_order INTEGER NOT NULL DEFAULT 0
);

-- Cached copy of the resolved catalog
CREATE TABLE IF NOT EXISTS documents (
    id TEXT PRIMARY KEY,
    permit_type TEXT NOT NULL REFERENCES permit_types(id) ON DELETE CASCADE,
    name_fr TEXT NOT NULL,
    name_en TEXT NOT NULL,
    description TEXT,
    category TEXT NOT NULL,
    profiles TEXT NOT NULL DEFAULT '["common"]',  -- JSON array of profile ids
    link TEXT,
    link_text TEXT,
    validity_days INTEGER,
    sort_order INTEGER NOT NULL DEFAULT 0
);

-- User-owned state. No foreign key: rows outlive catalog edits.
CREATE TABLE IF NOT EXISTS document_status (
    document_id TEXT PRIMARY KEY,
    is_complete INTEGER NOT NULL DEFAULT 0,
    completed_at TEXT,           -- set iff is_complete = 1
    notes TEXT,
    due_date TEXT                -- YYYY-MM-DD
);

-- Single settings record
CREATE TABLE IF NOT EXISTS user_settings (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    selected_profiles TEXT NOT NULL DEFAULT '["common"]',  -- JSON array
    updated_at TEXT DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_documents_permit_type ON documents(permit_type);
"#;
