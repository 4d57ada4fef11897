pub use crate::schema::banks;
use crate::{account::Account, essentials::*, schema::accounts};

use diesel::prelude::*;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = banks)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Bank {
    pub id: i64,
    pub name: String,
}

impl Bank {
    pub fn find(conn: &mut Conn, id: i64) -> Result<Self> {
        banks::table
            .find(id)
            .select(Bank::as_select())
            .first(conn)
            .map_err(|e| Error::from_diesel_error(e, "Bank", None))
    }

    pub fn find_by_name(conn: &mut Conn, name: &str) -> Result<Self> {
        banks::table
            .filter(banks::name.eq(name))
            .select(Bank::as_select())
            .first(conn)
            .map_err(|e| Error::from_diesel_error(e, "Bank", Some("name")))
    }

    /// Insert the bank unless one with the same name already exists
    pub fn upsert(conn: &mut Conn, name: &str) -> Result<Self> {
        diesel::insert_into(banks::table)
            .values(NewBank { name })
            .on_conflict(banks::name)
            .do_nothing()
            .execute(conn)?;

        Self::find_by_name(conn, name)
    }

    pub fn accounts(&self, conn: &mut Conn) -> Result<Vec<Account>> {
        Ok(Account::belonging_to(self)
            .order(accounts::name.asc())
            .select(Account::as_select())
            .load(conn)?)
    }

    /// Delete the bank, its accounts and their transactions
    pub fn delete(&mut self, conn: &mut Conn) -> Result<()> {
        diesel::delete(&*self).execute(conn)?;

        Ok(())
    }
}

#[derive(Insertable)]
#[diesel(table_name = banks)]
pub struct NewBank<'a> {
    pub name: &'a str,
}

impl NewBank<'_> {
    pub fn save(self, conn: &mut Conn) -> Result<Bank> {
        Ok(diesel::insert_into(banks::table)
            .values(self)
            .returning(Bank::as_returning())
            .get_result(conn)?)
    }
}

#[derive(Default)]
pub struct QueryBank<'a> {
    pub name: Option<&'a str>,
    pub count: Option<i64>,
}

impl QueryBank<'_> {
    pub fn run(&self, conn: &mut Conn) -> Result<Vec<Bank>> {
        let mut query = banks::table.into_boxed();

        if let Some(name) = self.name {
            query = query.filter(banks::name.like(name));
        }
        if let Some(count) = self.count {
            query = query.limit(count);
        }

        Ok(query
            .order(banks::name.asc())
            .select(Bank::as_select())
            .load(conn)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::prelude::{assert_eq, Result, *};

    use crate::schema::transactions;

    #[test]
    fn upsert() -> Result<()> {
        let conn = &mut test::db()?;

        let bank = Bank::upsert(conn, "Starling Personal (TEST)")?;
        assert_eq!("Starling Personal (TEST)", bank.name);
        assert_eq!(bank.id, Bank::upsert(conn, "Starling Personal (TEST)")?.id);
        assert_eq!(1, QueryBank::default().run(conn)?.len());

        Ok(())
    }

    #[test]
    fn unique_name() -> Result<()> {
        let conn = &mut test::db()?;

        NewBank { name: "Starling" }.save(conn)?;
        let result = NewBank { name: "Starling" }.save(conn);
        assert!(matches!(result, Err(Error::NonUnique(_))));

        Ok(())
    }

    #[test]
    fn find_by_name() -> Result<()> {
        let conn = &mut test::db()?;
        let bank = NewBank { name: "Starling" }.save(conn)?;

        assert_eq!(bank.id, Bank::find_by_name(conn, "Starling")?.id);
        assert!(matches!(
            Bank::find_by_name(conn, "Monzo"),
            Err(Error::ModelNotFoundBy("Bank", "name"))
        ));

        Ok(())
    }

    #[test]
    fn delete_cascades() -> Result<()> {
        let conn = &mut test::db()?;
        let personal = test::account(conn, "Starling Personal", "Personal")?;
        let business = test::account(conn, "Starling Business", "Business")?;
        test::transaction(conn, &personal, "Waterstones")?;
        test::transaction(conn, &personal, "BP")?;
        test::transaction(conn, &business, "Acme coffee biz")?;

        let mut bank = Bank::find(conn, personal.bank_id)?;
        assert_eq!(1, bank.accounts(conn)?.len());

        bank.delete(conn)?;

        assert!(Bank::find(conn, personal.bank_id).is_err_and(|e| e.is_not_found()));
        assert!(Account::find(conn, personal.id).is_err());
        assert!(Account::find(conn, business.id).is_ok());
        assert_eq!(
            1,
            transactions::table.count().get_result::<i64>(conn)?
        );

        Ok(())
    }
}
