//! Name and category mappings applied to synchronized transactions
//!
//! [`NameMapper`] turns the raw counterparty name sent by a bank into the
//! display name shown to the user, and [`CategoryMapper`] picks the category
//! of new transactions from that display name.

use crate::{
    category::Category,
    essentials::*,
    result::OptionalExtension,
    schema::{categories, category_maps, displayname_maps},
};

use diesel::{prelude::*, upsert::excluded};

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = displayname_maps)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DisplaynameMap {
    pub id: i64,
    pub name: String,
    pub displayname: String,
}

#[derive(Insertable)]
#[diesel(table_name = displayname_maps)]
struct NewDisplaynameMap<'a> {
    name: &'a str,
    displayname: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = category_maps)]
#[diesel(belongs_to(Category, foreign_key = category_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CategoryMap {
    pub id: i64,
    pub displayname: String,
    pub category_id: i64,
}

#[derive(Insertable)]
#[diesel(table_name = category_maps)]
struct NewCategoryMap<'a> {
    displayname: &'a str,
    category_id: i64,
}

pub struct NameMapper;

impl NameMapper {
    /// Map `name` to `displayname`, replacing any previous mapping of `name`
    pub fn insert(conn: &mut Conn, name: &str, displayname: &str) -> Result<DisplaynameMap> {
        Ok(diesel::insert_into(displayname_maps::table)
            .values(NewDisplaynameMap { name, displayname })
            .on_conflict(displayname_maps::name)
            .do_update()
            .set(displayname_maps::displayname.eq(excluded(displayname_maps::displayname)))
            .returning(DisplaynameMap::as_returning())
            .get_result(conn)?)
    }

    /// Display name of `name`, or `name` itself when it isn't mapped
    pub fn displayname(conn: &mut Conn, name: &str) -> Result<String> {
        Ok(Self::find(conn, name)?
            .map(|map| map.displayname)
            .unwrap_or_else(|| name.to_string()))
    }

    pub fn find(conn: &mut Conn, name: &str) -> Result<Option<DisplaynameMap>> {
        displayname_maps::table
            .filter(displayname_maps::name.eq(name))
            .select(DisplaynameMap::as_select())
            .first(conn)
            .map_err(|e| Error::from_diesel_error(e, "Display name map", Some("name")))
            .optional()
    }

    pub fn delete(conn: &mut Conn, name: &str) -> Result<()> {
        let deleted = diesel::delete(displayname_maps::table)
            .filter(displayname_maps::name.eq(name))
            .execute(conn)?;

        if deleted == 0 {
            Err(Error::ModelNotFoundBy("Display name map", "name"))
        } else {
            Ok(())
        }
    }

    pub fn all(conn: &mut Conn) -> Result<Vec<DisplaynameMap>> {
        Ok(displayname_maps::table
            .order(displayname_maps::name.asc())
            .select(DisplaynameMap::as_select())
            .load(conn)?)
    }
}

pub struct CategoryMapper;

impl CategoryMapper {
    /// Map `displayname` to `category`, replacing any previous mapping
    pub fn insert(conn: &mut Conn, displayname: &str, category: &Category) -> Result<CategoryMap> {
        Ok(diesel::insert_into(category_maps::table)
            .values(NewCategoryMap {
                displayname,
                category_id: category.id,
            })
            .on_conflict(category_maps::displayname)
            .do_update()
            .set(category_maps::category_id.eq(excluded(category_maps::category_id)))
            .returning(CategoryMap::as_returning())
            .get_result(conn)?)
    }

    /// Category mapped to `displayname`, if any
    pub fn category(conn: &mut Conn, displayname: &str) -> Result<Option<Category>> {
        category_maps::table
            .inner_join(categories::table)
            .filter(category_maps::displayname.eq(displayname))
            .select(Category::as_select())
            .first(conn)
            .map_err(Error::from)
            .optional()
    }

    pub fn delete(conn: &mut Conn, displayname: &str) -> Result<()> {
        let deleted = diesel::delete(category_maps::table)
            .filter(category_maps::displayname.eq(displayname))
            .execute(conn)?;

        if deleted == 0 {
            Err(Error::ModelNotFoundBy("Category map", "displayname"))
        } else {
            Ok(())
        }
    }

    pub fn all(conn: &mut Conn) -> Result<Vec<(CategoryMap, Category)>> {
        Ok(category_maps::table
            .inner_join(categories::table)
            .order(category_maps::displayname.asc())
            .select((CategoryMap::as_select(), Category::as_select()))
            .load(conn)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::prelude::{assert_eq, Result, *};

    #[test]
    fn displayname_fallback() -> Result<()> {
        let conn = &mut test::db()?;

        assert_eq!("TESCO STORES 2041", NameMapper::displayname(conn, "TESCO STORES 2041")?);

        NameMapper::insert(conn, "TESCO STORES 2041", "Tesco")?;
        assert_eq!("Tesco", NameMapper::displayname(conn, "TESCO STORES 2041")?);

        NameMapper::insert(conn, "TESCO STORES 2041", "Tesco Express")?;
        assert_eq!("Tesco Express", NameMapper::displayname(conn, "TESCO STORES 2041")?);
        assert_eq!(1, NameMapper::all(conn)?.len());

        NameMapper::delete(conn, "TESCO STORES 2041")?;
        assert_eq!("TESCO STORES 2041", NameMapper::displayname(conn, "TESCO STORES 2041")?);
        assert!(NameMapper::delete(conn, "TESCO STORES 2041").is_err_and(|e| e.is_not_found()));

        Ok(())
    }

    #[test]
    fn category_lookup() -> Result<()> {
        let conn = &mut test::db()?;
        let food = test::category(conn, "Mandatory", "Food")?;
        let hobbies = test::category(conn, "Discretionary", "Hobbies")?;

        assert!(CategoryMapper::category(conn, "Tesco")?.is_none());

        CategoryMapper::insert(conn, "Tesco", &food)?;
        CategoryMapper::insert(conn, "Waterstones", &food)?;
        assert_eq!(Some(food.id), CategoryMapper::category(conn, "Tesco")?.map(|c| c.id));

        CategoryMapper::insert(conn, "Waterstones", &hobbies)?;
        let all = CategoryMapper::all(conn)?;
        assert_eq!(
            vec![("Tesco", "Food"), ("Waterstones", "Hobbies")],
            all.iter()
                .map(|(map, category)| (map.displayname.as_str(), category.name.as_str()))
                .collect::<Vec<_>>()
        );

        CategoryMapper::delete(conn, "Tesco")?;
        assert!(CategoryMapper::category(conn, "Tesco")?.is_none());

        Ok(())
    }

    #[test]
    fn deleted_category_drops_mapping() -> Result<()> {
        let conn = &mut test::db()?;
        let mut food = test::category(conn, "Mandatory", "Food")?;
        CategoryMapper::insert(conn, "Tesco", &food)?;

        food.delete(conn)?;

        assert!(CategoryMapper::all(conn)?.is_empty());

        Ok(())
    }
}
