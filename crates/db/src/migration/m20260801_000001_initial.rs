//! Initial database migration.
//!
//! Creates the enums, tables, and indexes for users, customers, invoices,
//! payments, sequence counters, and the daily cash/bank ledger.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(ENUMS_SQL).await?;
        db.execute_unprepared(USERS_SQL).await?;
        db.execute_unprepared(CUSTOMERS_SQL).await?;
        db.execute_unprepared(SEQUENCE_COUNTERS_SQL).await?;
        db.execute_unprepared(INVOICES_SQL).await?;
        db.execute_unprepared(PAYMENTS_SQL).await?;
        db.execute_unprepared(DAILY_LEDGER_SQL).await?;
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

const ENUMS_SQL: &str = r"
CREATE TYPE user_role AS ENUM (
    'admin',
    'operator'
);

CREATE TYPE invoice_kind AS ENUM (
    'sales',
    'freight',
    'transport',
    'dubai_transport',
    'dubai_clearance'
);

CREATE TYPE invoice_status AS ENUM (
    'unpaid',
    'partially_paid',
    'paid',
    'overdue'
);

CREATE TYPE payment_type AS ENUM (
    'partial',
    'full'
);

CREATE TYPE payment_method AS ENUM (
    'cash',
    'bank_transfer',
    'check',
    'card',
    'other'
);

CREATE TYPE ledger_side AS ENUM (
    'cash',
    'bank'
);
";

const USERS_SQL: &str = r"
CREATE TABLE users (
    id UUID PRIMARY KEY,
    email VARCHAR(255) NOT NULL UNIQUE,
    password_hash VARCHAR(255) NOT NULL,
    full_name VARCHAR(255) NOT NULL,
    role user_role NOT NULL DEFAULT 'operator',
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const CUSTOMERS_SQL: &str = r"
CREATE TABLE customers (
    id UUID PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    trn VARCHAR(50),
    phone VARCHAR(50),
    address TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_customers_name ON customers(name);
";

const SEQUENCE_COUNTERS_SQL: &str = r"
CREATE TABLE sequence_counters (
    key TEXT PRIMARY KEY,
    value BIGINT NOT NULL DEFAULT 0
);
";

const INVOICES_SQL: &str = r"
CREATE TABLE invoices (
    id UUID PRIMARY KEY,
    kind invoice_kind NOT NULL,
    invoice_number VARCHAR(50) NOT NULL UNIQUE,
    customer_id UUID REFERENCES customers(id) ON DELETE RESTRICT,
    invoice_date DATE NOT NULL,
    due_date DATE NOT NULL,
    quantity NUMERIC(20, 6),
    unit_rate NUMERIC(20, 6),
    principal_amount NUMERIC(20, 6),
    subtotal NUMERIC(20, 6) NOT NULL DEFAULT 0,
    vat_percentage NUMERIC(8, 4) NOT NULL DEFAULT 0,
    vat_amount NUMERIC(20, 6) NOT NULL DEFAULT 0,
    discount NUMERIC(20, 6) NOT NULL DEFAULT 0,
    discount_total NUMERIC(20, 6) NOT NULL DEFAULT 0,
    gross_amount NUMERIC(20, 6) NOT NULL DEFAULT 0,
    received_amount NUMERIC(20, 6) NOT NULL DEFAULT 0,
    outstanding_amount NUMERIC(20, 6) NOT NULL DEFAULT 0,
    conversion_rate NUMERIC(20, 6),
    gross_aed NUMERIC(20, 6),
    received_aed NUMERIC(20, 6),
    outstanding_aed NUMERIC(20, 6),
    status invoice_status NOT NULL DEFAULT 'unpaid',
    last_payment_date TIMESTAMPTZ,
    notes TEXT,
    created_by UUID NOT NULL REFERENCES users(id),
    updated_by UUID REFERENCES users(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT chk_invoice_dates CHECK (due_date >= invoice_date),
    CONSTRAINT chk_vat_percentage CHECK (vat_percentage >= 0 AND vat_percentage <= 100)
);

CREATE INDEX idx_invoices_kind ON invoices(kind);
CREATE INDEX idx_invoices_status ON invoices(status);
CREATE INDEX idx_invoices_customer ON invoices(customer_id);
CREATE INDEX idx_invoices_invoice_date ON invoices(invoice_date);
";

const PAYMENTS_SQL: &str = r"
CREATE TABLE payments (
    id UUID PRIMARY KEY,
    invoice_id UUID NOT NULL REFERENCES invoices(id) ON DELETE CASCADE,
    amount NUMERIC(20, 6) NOT NULL,
    discount NUMERIC(20, 6) NOT NULL DEFAULT 0,
    payment_type payment_type NOT NULL DEFAULT 'partial',
    payment_method payment_method NOT NULL DEFAULT 'cash',
    reference VARCHAR(255),
    notes TEXT,
    paid_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    created_by UUID NOT NULL REFERENCES users(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT chk_payment_amount CHECK (amount >= 0),
    CONSTRAINT chk_payment_discount CHECK (discount >= 0)
);

CREATE INDEX idx_payments_invoice ON payments(invoice_id);
CREATE INDEX idx_payments_paid_at ON payments(paid_at);
";

const DAILY_LEDGER_SQL: &str = r"
CREATE TABLE daily_ledger_entries (
    id UUID PRIMARY KEY,
    entry_date DATE NOT NULL,
    side ledger_side NOT NULL,
    amount NUMERIC(20, 6) NOT NULL,
    description TEXT NOT NULL,
    payment_id UUID REFERENCES payments(id) ON DELETE CASCADE,
    payment_method payment_method NOT NULL DEFAULT 'cash',
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_daily_ledger_entry_date ON daily_ledger_entries(entry_date);
CREATE INDEX idx_daily_ledger_payment ON daily_ledger_entries(payment_id);
";

const TRIGGERS_SQL: &str = r"
CREATE OR REPLACE FUNCTION set_updated_at()
RETURNS TRIGGER AS $$
BEGIN
    NEW.updated_at = NOW();
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_users_updated_at
    BEFORE UPDATE ON users
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_customers_updated_at
    BEFORE UPDATE ON customers
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_invoices_updated_at
    BEFORE UPDATE ON invoices
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS daily_ledger_entries CASCADE;
DROP TABLE IF EXISTS payments CASCADE;
DROP TABLE IF EXISTS invoices CASCADE;
DROP TABLE IF EXISTS sequence_counters CASCADE;
DROP TABLE IF EXISTS customers CASCADE;
DROP TABLE IF EXISTS users CASCADE;

DROP FUNCTION IF EXISTS set_updated_at CASCADE;

DROP TYPE IF EXISTS ledger_side;
DROP TYPE IF EXISTS payment_method;
DROP TYPE IF EXISTS payment_type;
DROP TYPE IF EXISTS invoice_status;
DROP TYPE IF EXISTS invoice_kind;
DROP TYPE IF EXISTS user_role;
";
