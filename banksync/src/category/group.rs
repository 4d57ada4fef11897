use crate::{
    category::{categories, category_groups, Category},
    essentials::*,
    result::OptionalExtension,
};

use diesel::prelude::*;
use uuid::Uuid;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = category_groups)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CategoryGroup {
    pub id: i64,
    #[diesel(deserialize_as = crate::db::Uuid)]
    pub uuid: Uuid,
    pub name: String,
}

impl CategoryGroup {
    pub fn find(conn: &mut Conn, id: i64) -> Result<Self> {
        category_groups::table
            .find(id)
            .select(CategoryGroup::as_select())
            .first(conn)
            .map_err(|e| Error::from_diesel_error(e, "CategoryGroup", None))
    }

    pub fn find_by_name(conn: &mut Conn, name: &str) -> Result<Self> {
        category_groups::table
            .filter(category_groups::name.eq(name))
            .select(CategoryGroup::as_select())
            .first(conn)
            .map_err(|e| Error::from_diesel_error(e, "CategoryGroup", Some("name")))
    }

    pub fn find_or_create_by_name(conn: &mut Conn, name: &str) -> Result<Self> {
        match Self::find_by_name(conn, name).optional()? {
            Some(group) => Ok(group),
            None => NewCategoryGroup::new(name).save(conn),
        }
    }

    pub fn all(conn: &mut Conn) -> Result<Vec<Self>> {
        Ok(category_groups::table
            .order(category_groups::name.asc())
            .select(CategoryGroup::as_select())
            .load(conn)?)
    }

    pub fn categories(&self, conn: &mut Conn) -> Result<Vec<Category>> {
        Ok(Category::belonging_to(self)
            .order(categories::name.asc())
            .select(Category::as_select())
            .load(conn)?)
    }

    pub fn rename(&mut self, conn: &mut Conn, name: &str) -> Result<()> {
        diesel::update(&*self)
            .set(category_groups::name.eq(name))
            .execute(conn)?;
        self.name = name.to_string();

        Ok(())
    }

    /// Delete the group along with its categories
    pub fn delete(&mut self, conn: &mut Conn) -> Result<()> {
        diesel::delete(&*self).execute(conn)?;

        Ok(())
    }
}

#[derive(Insertable)]
#[diesel(table_name = category_groups)]
pub struct NewCategoryGroup<'a> {
    #[diesel(serialize_as = crate::db::Uuid)]
    pub uuid: Uuid,
    pub name: &'a str,
}

impl<'a> NewCategoryGroup<'a> {
    pub fn new(name: &'a str) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name,
        }
    }

    pub fn save(self, conn: &mut Conn) -> Result<CategoryGroup> {
        Ok(diesel::insert_into(category_groups::table)
            .values(self)
            .returning(CategoryGroup::as_returning())
            .get_result(conn)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::prelude::{assert_eq, Result, *};

    #[test]
    fn find_or_create() -> Result<()> {
        let conn = &mut test::db()?;

        let group = CategoryGroup::find_or_create_by_name(conn, "Mandatory")?;
        assert_eq!(group.id, CategoryGroup::find_or_create_by_name(conn, "Mandatory")?.id);
        assert!(matches!(
            NewCategoryGroup::new("Mandatory").save(conn),
            Err(Error::NonUnique(_))
        ));

        Ok(())
    }

    #[test]
    fn rename() -> Result<()> {
        let conn = &mut test::db()?;
        let mut group = NewCategoryGroup::new("Mandatory").save(conn)?;

        group.rename(conn, "Essentials")?;
        assert_eq!("Essentials", CategoryGroup::find(conn, group.id)?.name);

        Ok(())
    }

    #[test]
    fn delete_cascades() -> Result<()> {
        let conn = &mut test::db()?;
        let food = test::category(conn, "Mandatory", "Food")?;
        let energy = test::category(conn, "Mandatory", "Energy")?;
        let hobbies = test::category(conn, "Discretionary", "Hobbies")?;

        let mut group = food.fetch_group(conn)?;
        assert_eq!(2, group.categories(conn)?.len());
        group.delete(conn)?;

        assert!(Category::find(conn, food.id).is_err());
        assert!(Category::find(conn, energy.id).is_err());
        assert!(Category::find(conn, hobbies.id).is_ok());
        assert_eq!(1, CategoryGroup::all(conn)?.len());

        Ok(())
    }
}
