use oxydized_money::CurrencyError;

use diesel::{
    backend::Backend,
    deserialize::{self, FromSql, FromSqlRow},
    expression::AsExpression,
    serialize::{self, IsNull, Output, ToSql},
    sql_types::Text,
    sqlite::Sqlite,
};

/// Currency stored as its ISO 4217 code
#[derive(Copy, Clone, Debug, derive_more::From, derive_more::Into, FromSqlRow, AsExpression)]
#[diesel(sql_type = Text)]
pub struct Currency(pub oxydized_money::Currency);

impl ToSql<Text, Sqlite> for Currency {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
        <str as ToSql<Text, Sqlite>>::to_sql(self.0.code(), out)
    }
}

impl FromSql<Text, Sqlite> for Currency {
    fn from_sql(bytes: <Sqlite as Backend>::RawValue<'_>) -> deserialize::Result<Self> {
        match oxydized_money::Currency::from_code(
            <String as FromSql<Text, Sqlite>>::from_sql(bytes)?.as_str(),
        ) {
            Some(cur) => Ok(Currency(cur)),
            None => Err(Box::new(CurrencyError::Unknown)),
        }
    }
}

/// External identifier stored in its hyphenated lowercase form
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, derive_more::From, derive_more::Into, FromSqlRow, AsExpression,
)]
#[diesel(sql_type = Text)]
pub struct Uuid(pub uuid::Uuid);

impl ToSql<Text, Sqlite> for Uuid {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
        out.set_value(self.0.hyphenated().to_string());
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Sqlite> for Uuid {
    fn from_sql(bytes: <Sqlite as Backend>::RawValue<'_>) -> deserialize::Result<Self> {
        Ok(Uuid(uuid::Uuid::parse_str(
            <String as FromSql<Text, Sqlite>>::from_sql(bytes)?.as_str(),
        )?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::prelude::{assert_eq, Result, *};

    use diesel::{dsl::sql, prelude::*, select};

    #[test]
    fn read_uuid() -> Result<()> {
        let conn = &mut test::db()?;

        let read = select(sql::<Text>("'5b692051-b699-40f8-a48b-d14d554a9bd1'"))
            .get_result::<Uuid>(conn)?;
        assert_eq!(
            uuid::Uuid::parse_str("5B692051-B699-40F8-A48B-D14D554A9BD1")?,
            read.0
        );

        let read = select(sql::<Text>("'not a uuid'")).get_result::<Uuid>(conn);
        assert!(read.is_err());

        Ok(())
    }

    #[test]
    fn unknown_currency() -> Result<()> {
        let conn = &mut test::db()?;

        let read = select(sql::<Text>("'XYZ'")).get_result::<Currency>(conn);
        assert!(read.is_err());

        Ok(())
    }
}
