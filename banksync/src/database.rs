use std::path::Path;

use crate::essentials::*;

use diesel::{prelude::*, sqlite::SqliteConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Owned connection to a banksync database
#[derive(derive_more::From, derive_more::Into, derive_more::Deref, derive_more::DerefMut)]
pub struct Database(SqliteConnection);

impl Database {
    pub fn open<T: AsRef<Path>>(path: T) -> Result<Self> {
        let path = path.as_ref();
        let url = path.to_str().ok_or_else(|| {
            Error::Invalid(format!("Database path is not valid UTF-8: {}", path.display()))
        })?;

        Self::establish(url)
    }

    pub fn memory() -> Result<Self> {
        Self::establish(":memory:")
    }

    fn establish(url: &str) -> Result<Self> {
        let mut conn = SqliteConnection::establish(url)?;
        // Cascading deletes rely on foreign keys, which SQLite disables per connection
        diesel::sql_query("PRAGMA foreign_keys = ON").execute(&mut conn)?;
        Ok(Self(conn))
    }

    /// Run the pending migrations
    pub fn setup(&mut self) -> Result<()> {
        let applied = self.0.run_pending_migrations(MIGRATIONS)?;
        for version in applied {
            log::info!("Applied migration {version}");
        }
        Ok(())
    }

    /// Delete every bank and counterparty, and with them every account and
    /// transaction
    ///
    /// Categories, category groups and the name maps are kept.
    pub fn reset(&mut self) -> Result<()> {
        use crate::schema::{banks, counterparties};

        self.0.transaction(|conn| {
            diesel::delete(banks::table).execute(conn)?;
            diesel::delete(counterparties::table).execute(conn)?;
            Result::<()>::Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::prelude::{assert_eq, Result, *};

    use crate::schema::{banks, transactions};

    #[test]
    fn setup_is_idempotent() -> Result<()> {
        let mut db = Database::memory()?;
        db.setup()?;
        db.setup()?;

        assert!(!db.has_pending_migration(MIGRATIONS).map_err(|e| anyhow::anyhow!(e))?);

        Ok(())
    }

    #[test]
    fn foreign_keys_enabled() -> Result<()> {
        let conn = &mut test::db()?;
        let account = test::account(conn, "Starling Personal", "Personal")?;

        let orphan = diesel::update(crate::schema::accounts::table)
            .filter(crate::schema::accounts::id.eq(account.id))
            .set(crate::schema::accounts::bank_id.eq(account.bank_id + 100))
            .execute(conn);
        assert!(orphan.is_err());

        Ok(())
    }

    #[test]
    fn reset() -> Result<()> {
        let mut db = Database::memory()?;
        db.setup()?;

        {
            let conn: &mut Conn = &mut db;
            let account = test::account(conn, "Starling Personal", "Personal")?;
            test::transaction(conn, &account, "Waterstones")?;
            test::category(conn, "Mandatory", "Food")?;
        }

        db.reset()?;

        let conn: &mut Conn = &mut db;
        assert_eq!(0, banks::table.count().get_result::<i64>(conn)?);
        assert_eq!(0, transactions::table.count().get_result::<i64>(conn)?);
        assert_eq!(1, crate::schema::categories::table.count().get_result::<i64>(conn)?);

        Ok(())
    }

    #[test]
    fn counterparties_migration() -> Result<()> {
        use crate::schema::counterparties;
        use diesel::{connection::SimpleConnection, dsl::sql, sql_types::BigInt};

        let mut db = Database::memory()?;
        db.run_next_migration(MIGRATIONS).map_err(crate::Error::from)?;

        let conn: &mut Conn = &mut db;
        let mut statements = String::from(
            "INSERT INTO banks (id, name) VALUES (1, 'Starling');
             INSERT INTO accounts (id, bank_id, uuid, name, display_name, currency)
                VALUES (1, 1, 'a3c56a4d-9b14-4b6a-9d4c-2a8d31f0c001', 'Personal', 'Personal', 'GBP');",
        );
        for (id, name) in [(1, "BP"), (2, "Waterstones"), (3, "BP")] {
            statements.push_str(&format!(
                "INSERT INTO transactions (id, account_id, uuid, time, counterparty_name, amount)
                    VALUES ({id}, 1, '{}', '2024-06-0{id}T10:00:00Z', '{name}', -10.0);",
                uuid::Uuid::new_v4()
            ));
        }
        conn.batch_execute(&statements)?;

        db.setup()?;

        let conn: &mut Conn = &mut db;
        assert_eq!(2, counterparties::table.count().get_result::<i64>(conn)?);
        let bp = crate::counterparty::Counterparty::find_by_name(conn, "BP")?;
        assert_eq!(None, bp.display_name);
        assert_eq!(
            vec![1_i64, 3],
            transactions::table
                .filter(transactions::counterparty_id.eq(bp.id))
                .order(transactions::id.asc())
                .select(transactions::id)
                .load::<i64>(conn)?
        );

        db.revert_last_migration(MIGRATIONS).map_err(crate::Error::from)?;

        let conn: &mut Conn = &mut db;
        assert_eq!(
            2,
            diesel::select(sql::<BigInt>(
                "(SELECT COUNT(*) FROM transactions WHERE counterparty_name = 'BP')"
            ))
            .get_result::<i64>(conn)?
        );
        assert_eq!(
            0,
            diesel::select(sql::<BigInt>(
                "(SELECT COUNT(*) FROM sqlite_master WHERE name = 'counterparties')"
            ))
            .get_result::<i64>(conn)?
        );

        Ok(())
    }
}
