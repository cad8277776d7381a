//! Initial database migration.
//!
//! Creates all core tables, enums, constraints, and triggers for the wallet
//! bookkeeping schema.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: EXTENSIONS & ENUMS
        // ============================================================
        db.execute_unprepared(EXTENSIONS_SQL).await?;
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: USERS & WALLETS
        // ============================================================
        db.execute_unprepared(USERS_SQL).await?;
        db.execute_unprepared(WALLETS_SQL).await?;
        db.execute_unprepared(WALLET_USERS_SQL).await?;

        // ============================================================
        // PART 3: PERIODS & DEPOSITS
        // ============================================================
        db.execute_unprepared(PERIODS_SQL).await?;
        db.execute_unprepared(DEPOSITS_SQL).await?;

        // ============================================================
        // PART 4: COUNTERPARTIES & CATEGORIES
        // ============================================================
        db.execute_unprepared(ENTITIES_SQL).await?;
        db.execute_unprepared(CATEGORIES_SQL).await?;

        // ============================================================
        // PART 5: PREDICTIONS & TRANSFERS
        // ============================================================
        db.execute_unprepared(PREDICTIONS_SQL).await?;
        db.execute_unprepared(TRANSFERS_SQL).await?;

        // ============================================================
        // PART 6: TRIGGERS & FUNCTIONS
        // ============================================================
        db.execute_unprepared(TRIGGERS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const EXTENSIONS_SQL: &str = r"
-- Needed for the period range exclusion constraint (uuid equality in GiST)
CREATE EXTENSION IF NOT EXISTS btree_gist;
";

const ENUMS_SQL: &str = r"
-- Category classification
CREATE TYPE category_type AS ENUM ('income', 'expense');

-- Category priority buckets; 'incomes' is reserved for income categories
CREATE TYPE category_priority AS ENUM (
    'incomes',
    'most_important',
    'debts',
    'savings',
    'others'
);

-- Deposit kinds
CREATE TYPE deposit_type AS ENUM (
    'personal',
    'common',
    'reserves',
    'investments',
    'savings'
);
";

const USERS_SQL: &str = r"
CREATE TABLE users (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    email VARCHAR(255) NOT NULL UNIQUE,
    password_hash VARCHAR(255) NOT NULL,
    full_name VARCHAR(255) NOT NULL,
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

-- Case-insensitive email uniqueness
CREATE UNIQUE INDEX idx_users_email_lower ON users (lower(email));
";

const WALLETS_SQL: &str = r"
CREATE TABLE wallets (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    owner_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    name VARCHAR(128) NOT NULL,
    description TEXT,
    currency CHAR(3) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_wallets_owner_name UNIQUE (owner_id, name)
);

CREATE INDEX idx_wallets_owner ON wallets(owner_id);
";

const WALLET_USERS_SQL: &str = r"
CREATE TABLE wallet_users (
    wallet_id UUID NOT NULL REFERENCES wallets(id) ON DELETE CASCADE,
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    PRIMARY KEY (wallet_id, user_id)
);

CREATE INDEX idx_wallet_users_user ON wallet_users(user_id);
";

const PERIODS_SQL: &str = r"
CREATE TABLE periods (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    wallet_id UUID NOT NULL REFERENCES wallets(id) ON DELETE CASCADE,
    name VARCHAR(128) NOT NULL,
    date_start DATE NOT NULL,
    date_end DATE NOT NULL,
    is_active BOOLEAN NOT NULL DEFAULT false,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_periods_wallet_name UNIQUE (wallet_id, name),
    CONSTRAINT chk_periods_dates CHECK (date_start < date_end),
    -- Belt-and-braces duplicate of the repository overlap guard: period
    -- ranges within a wallet must not intersect (closed ranges).
    CONSTRAINT excl_periods_no_overlap EXCLUDE USING gist (
        wallet_id WITH =,
        daterange(date_start, date_end, '[]') WITH &&
    )
);

-- At most one active period per wallet
CREATE UNIQUE INDEX idx_periods_one_active
    ON periods(wallet_id) WHERE is_active;

CREATE INDEX idx_periods_wallet ON periods(wallet_id, date_start);
";

const DEPOSITS_SQL: &str = r"
CREATE TABLE deposits (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    wallet_id UUID NOT NULL REFERENCES wallets(id) ON DELETE CASCADE,
    name VARCHAR(128) NOT NULL,
    description TEXT,
    deposit_type deposit_type NOT NULL,
    is_active BOOLEAN NOT NULL DEFAULT true,
    balance NUMERIC(12, 2) NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_deposits_wallet_name UNIQUE (wallet_id, name)
);

CREATE INDEX idx_deposits_wallet ON deposits(wallet_id);
";

const ENTITIES_SQL: &str = r"
-- Transfer counterparties; wallet_id IS NULL marks a global entity
CREATE TABLE entities (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    wallet_id UUID REFERENCES wallets(id) ON DELETE CASCADE,
    name VARCHAR(128) NOT NULL,
    description TEXT,
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

-- Name unique within a wallet, and among global entities
CREATE UNIQUE INDEX idx_entities_wallet_name
    ON entities(wallet_id, lower(name)) WHERE wallet_id IS NOT NULL;
CREATE UNIQUE INDEX idx_entities_global_name
    ON entities(lower(name)) WHERE wallet_id IS NULL;
";

const CATEGORIES_SQL: &str = r"
CREATE TABLE categories (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    wallet_id UUID NOT NULL REFERENCES wallets(id) ON DELETE CASCADE,
    name VARCHAR(128) NOT NULL,
    description TEXT,
    category_type category_type NOT NULL,
    priority category_priority NOT NULL,
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_categories_wallet_type_name UNIQUE (wallet_id, category_type, name),
    -- 'incomes' bucket is only for income categories and vice versa
    CONSTRAINT chk_categories_priority_for_type CHECK (
        (category_type = 'income' AND priority = 'incomes')
        OR (category_type = 'expense' AND priority <> 'incomes')
    )
);

CREATE INDEX idx_categories_wallet ON categories(wallet_id, category_type);
";

const PREDICTIONS_SQL: &str = r"
CREATE TABLE predictions (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    period_id UUID NOT NULL REFERENCES periods(id) ON DELETE CASCADE,
    category_id UUID NOT NULL REFERENCES categories(id) ON DELETE CASCADE,
    value NUMERIC(12, 2) NOT NULL,
    description TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_predictions_period_category UNIQUE (period_id, category_id),
    CONSTRAINT chk_predictions_value_positive CHECK (value > 0)
);

CREATE INDEX idx_predictions_period ON predictions(period_id);
";

const TRANSFERS_SQL: &str = r"
CREATE TABLE transfers (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    period_id UUID NOT NULL REFERENCES periods(id) ON DELETE RESTRICT,
    deposit_id UUID NOT NULL REFERENCES deposits(id) ON DELETE RESTRICT,
    category_id UUID NOT NULL REFERENCES categories(id) ON DELETE RESTRICT,
    entity_id UUID REFERENCES entities(id) ON DELETE RESTRICT,
    name VARCHAR(255) NOT NULL,
    description TEXT,
    value NUMERIC(12, 2) NOT NULL,
    date DATE NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_transfers_value_positive CHECK (value > 0)
);

CREATE INDEX idx_transfers_period ON transfers(period_id, date);
CREATE INDEX idx_transfers_deposit ON transfers(deposit_id);
CREATE INDEX idx_transfers_category ON transfers(category_id);
CREATE INDEX idx_transfers_entity ON transfers(entity_id) WHERE entity_id IS NOT NULL;
";

const TRIGGERS_SQL: &str = r"
-- Keep updated_at current on every row update
CREATE OR REPLACE FUNCTION set_updated_at() RETURNS trigger AS $$
BEGIN
    NEW.updated_at = now();
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_users_updated_at BEFORE UPDATE ON users
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
CREATE TRIGGER trg_wallets_updated_at BEFORE UPDATE ON wallets
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
CREATE TRIGGER trg_periods_updated_at BEFORE UPDATE ON periods
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
CREATE TRIGGER trg_deposits_updated_at BEFORE UPDATE ON deposits
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
CREATE TRIGGER trg_entities_updated_at BEFORE UPDATE ON entities
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
CREATE TRIGGER trg_categories_updated_at BEFORE UPDATE ON categories
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
CREATE TRIGGER trg_predictions_updated_at BEFORE UPDATE ON predictions
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
CREATE TRIGGER trg_transfers_updated_at BEFORE UPDATE ON transfers
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS transfers CASCADE;
DROP TABLE IF EXISTS predictions CASCADE;
DROP TABLE IF EXISTS categories CASCADE;
DROP TABLE IF EXISTS entities CASCADE;
DROP TABLE IF EXISTS deposits CASCADE;
DROP TABLE IF EXISTS periods CASCADE;
DROP TABLE IF EXISTS wallet_users CASCADE;
DROP TABLE IF EXISTS wallets CASCADE;
DROP TABLE IF EXISTS users CASCADE;
DROP FUNCTION IF EXISTS set_updated_at() CASCADE;
DROP TYPE IF EXISTS deposit_type;
DROP TYPE IF EXISTS category_priority;
DROP TYPE IF EXISTS category_type;
";
