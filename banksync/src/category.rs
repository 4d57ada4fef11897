pub use crate::schema::{categories, category_groups};
use crate::{essentials::*, result::OptionalExtension, transaction::Transaction};

use diesel::prelude::*;
use uuid::Uuid;

mod group;
pub use group::{CategoryGroup, NewCategoryGroup};

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = categories)]
#[diesel(belongs_to(CategoryGroup, foreign_key = category_group_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Category {
    pub id: i64,
    #[diesel(deserialize_as = crate::db::Uuid)]
    pub uuid: Uuid,
    pub name: String,
    pub category_group_id: i64,
}

impl Category {
    pub fn find(conn: &mut Conn, id: i64) -> Result<Self> {
        categories::table
            .find(id)
            .select(Category::as_select())
            .first(conn)
            .map_err(|e| Error::from_diesel_error(e, "Category", None))
    }

    pub fn find_by_uuid(conn: &mut Conn, uuid: Uuid) -> Result<Self> {
        categories::table
            .filter(categories::uuid.eq(crate::db::Uuid(uuid)))
            .select(Category::as_select())
            .first(conn)
            .map_err(|e| Error::from_diesel_error(e, "Category", Some("uuid")))
    }

    /// Find a category either by its name, or by `group:name`
    ///
    /// An exact name match wins over the `group:name` form.
    pub fn find_by_name(conn: &mut Conn, name: &str) -> Result<Self> {
        let mut found = categories::table
            .filter(categories::name.eq(name))
            .select(Category::as_select())
            .limit(2)
            .load(conn)?;

        match found.len() {
            0 => {}
            1 => return Ok(found.remove(0)),
            _ => {
                return Err(Error::Invalid(format!(
                    "Several categories are named {name}, use group:name instead"
                )))
            }
        }

        let Some((group, name)) = name.split_once(':') else {
            return Err(Error::ModelNotFoundBy("Category", "name"));
        };
        let group = CategoryGroup::find_by_name(conn, group).map_err(|e| {
            if e.is_not_found() {
                Error::ModelNotFoundBy("Category", "name")
            } else {
                e
            }
        })?;
        Category::belonging_to(&group)
            .filter(categories::name.eq(name))
            .select(Category::as_select())
            .first(conn)
            .map_err(|e| Error::from_diesel_error(e, "Category", Some("name")))
    }

    pub fn fetch_group(&self, conn: &mut Conn) -> Result<CategoryGroup> {
        CategoryGroup::find(conn, self.category_group_id)
    }

    pub fn transactions(&self, conn: &mut Conn) -> Result<Vec<Transaction>> {
        use crate::schema::transactions;

        Ok(Transaction::belonging_to(self)
            .order(transactions::time.desc())
            .select(Transaction::as_select())
            .load(conn)?)
    }

    /// Delete the category, its transactions become uncategorized
    pub fn delete(&mut self, conn: &mut Conn) -> Result<()> {
        diesel::delete(&*self).execute(conn)?;

        Ok(())
    }
}

pub struct NewCategory<'a> {
    pub uuid: Uuid,
    pub name: &'a str,
    pub group: &'a CategoryGroup,
}

impl<'a> NewCategory<'a> {
    pub fn new(name: &'a str, group: &'a CategoryGroup) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name,
            group,
        }
    }

    pub fn save(self, conn: &mut Conn) -> Result<Category> {
        Ok(diesel::insert_into(categories::table)
            .values(self.to_insertable())
            .returning(Category::as_returning())
            .get_result(conn)?)
    }

    pub fn to_insertable(&self) -> InsertableCategory<'a> {
        InsertableCategory {
            uuid: self.uuid,
            name: self.name,
            category_group_id: self.group.id,
        }
    }
}

#[derive(Insertable)]
#[diesel(table_name = categories)]
pub struct InsertableCategory<'a> {
    #[diesel(serialize_as = crate::db::Uuid)]
    pub uuid: Uuid,
    pub name: &'a str,
    pub category_group_id: i64,
}

/// Insert or update a category identified by its uuid, creating its group by
/// name when needed
pub struct UpsertCategory<'a> {
    pub uuid: Uuid,
    pub name: &'a str,
    pub group_name: &'a str,
}

impl UpsertCategory<'_> {
    pub fn save(self, conn: &mut Conn) -> Result<Category> {
        conn.transaction(|conn| {
            let group = CategoryGroup::find_or_create_by_name(conn, self.group_name)?;

            match Category::find_by_uuid(conn, self.uuid).optional()? {
                Some(mut category) => {
                    ChangeCategory {
                        name: Some(self.name),
                        group: Some(&group),
                    }
                    .apply(conn, &mut category)?;
                    Ok(category)
                }
                None => NewCategory {
                    uuid: self.uuid,
                    name: self.name,
                    group: &group,
                }
                .save(conn),
            }
        })
    }
}

#[derive(Default)]
pub struct ChangeCategory<'a> {
    pub name: Option<&'a str>,
    pub group: Option<&'a CategoryGroup>,
}

impl<'a> ChangeCategory<'a> {
    pub fn to_changeset(&self) -> CategoryChangeset<'a> {
        CategoryChangeset {
            name: self.name,
            category_group_id: self.group.map(|g| g.id),
        }
    }

    pub fn save(self, conn: &mut Conn, category: &Category) -> Result<()> {
        diesel::update(category)
            .set(self.to_changeset())
            .execute(conn)?;
        Ok(())
    }

    pub fn apply(self, conn: &mut Conn, category: &mut Category) -> Result<()> {
        let changeset = self.to_changeset();
        self.save(conn, category)?;

        if let Some(value) = changeset.name {
            category.name = value.to_string();
        }
        if let Some(value) = changeset.category_group_id {
            category.category_group_id = value;
        }

        Ok(())
    }
}

#[derive(Default, Clone, AsChangeset)]
#[diesel(table_name = categories)]
pub struct CategoryChangeset<'a> {
    pub name: Option<&'a str>,
    pub category_group_id: Option<i64>,
}

#[derive(Default)]
pub struct QueryCategory<'a> {
    pub name: Option<&'a str>,
    pub group_id: Option<i64>,
    pub count: Option<i64>,
}

pub type QueryCategoryResult = (Category, CategoryGroup);

impl QueryCategory<'_> {
    /// Categories with their group, sorted by group name then name
    pub fn run(&self, conn: &mut Conn) -> Result<Vec<QueryCategoryResult>> {
        let mut query = categories::table
            .inner_join(category_groups::table)
            .into_boxed();

        if let Some(name) = self.name {
            query = query.filter(categories::name.like(name));
        }
        if let Some(group_id) = self.group_id {
            query = query.filter(categories::category_group_id.eq(group_id));
        }
        if let Some(count) = self.count {
            query = query.limit(count);
        }

        Ok(query
            .order((category_groups::name.asc(), categories::name.asc()))
            .select((Category::as_select(), CategoryGroup::as_select()))
            .load::<QueryCategoryResult>(conn)?)
    }
}

/// Groups and categories installed by `init`
pub const DEFAULT_CATEGORIES: &[(&str, &[&str])] = &[
    ("Mandatory", &["Energy", "Food", "Insurance"]),
    ("Discretionary", &["Entertainment", "Hobbies", "Vacation"]),
];

/// Create the default groups and categories, keeping the existing ones
pub fn init_defaults(conn: &mut Conn) -> Result<Vec<Category>> {
    conn.transaction(|conn| {
        let mut created = Vec::new();

        for (group_name, names) in DEFAULT_CATEGORIES {
            let group = CategoryGroup::find_or_create_by_name(conn, group_name)?;
            for &name in names.iter() {
                let exists = Category::belonging_to(&group)
                    .filter(categories::name.eq(name))
                    .count()
                    .get_result::<i64>(conn)?
                    > 0;
                if !exists {
                    created.push(NewCategory::new(name, &group).save(conn)?);
                }
            }
        }

        Result::<Vec<Category>>::Ok(created)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::prelude::{assert_eq, Result, *};

    #[test]
    fn init() -> Result<()> {
        let conn = &mut test::db()?;

        assert_eq!(6, init_defaults(conn)?.len());
        assert_eq!(0, init_defaults(conn)?.len());

        let categories = QueryCategory::default().run(conn)?;
        assert_eq!(6, categories.len());
        assert_eq!("Discretionary", categories[0].1.name);
        assert_eq!("Entertainment", categories[0].0.name);
        assert_eq!("Mandatory", categories[5].1.name);
        assert_eq!("Insurance", categories[5].0.name);

        Ok(())
    }

    #[test]
    fn update_name() -> Result<()> {
        let conn = &mut test::db()?;
        let mut category = test::category(conn, "Mandatory", "Energy")?;

        ChangeCategory {
            name: Some("Energy (TEST)"),
            ..Default::default()
        }
        .apply(conn, &mut category)?;

        assert_eq!("Energy (TEST)", Category::find(conn, category.id)?.name);

        Ok(())
    }

    #[test]
    fn find_by_name() -> Result<()> {
        let conn = &mut test::db()?;
        let food = test::category(conn, "Mandatory", "Food")?;
        let treats = test::category(conn, "Discretionary", "Food")?;
        let energy = test::category(conn, "Mandatory", "Energy")?;

        assert_eq!(energy.id, Category::find_by_name(conn, "Energy")?.id);
        assert_eq!(food.id, Category::find_by_name(conn, "Mandatory:Food")?.id);
        assert_eq!(treats.id, Category::find_by_name(conn, "Discretionary:Food")?.id);
        assert!(matches!(
            Category::find_by_name(conn, "Food"),
            Err(Error::Invalid(_))
        ));
        assert!(Category::find_by_name(conn, "Vacation")
            .is_err_and(|e| e.is_not_found()));
        assert!(Category::find_by_name(conn, "Mandatory:Vacation")
            .is_err_and(|e| e.is_not_found()));

        Ok(())
    }

    #[test]
    fn find_by_name_with_colon() -> Result<()> {
        let conn = &mut test::db()?;
        let ratio = test::category(conn, "Discretionary", "Ratio 3:1")?;

        assert_eq!(ratio.id, Category::find_by_name(conn, "Ratio 3:1")?.id);
        assert_eq!(
            ratio.id,
            Category::find_by_name(conn, "Discretionary:Ratio 3:1")?.id
        );
        assert!(Category::find_by_name(conn, "Ratio 3")
            .is_err_and(|e| e.is_not_found()));

        Ok(())
    }

    #[test]
    fn exclusive_group_membership() -> Result<()> {
        let conn = &mut test::db()?;
        let mandatory = CategoryGroup::find_or_create_by_name(conn, "Mandatory")?;
        let discretionary = CategoryGroup::find_or_create_by_name(conn, "Discretionary")?;

        let category = NewCategory::new("Food", &mandatory).save(conn)?;
        let result = NewCategory {
            uuid: category.uuid,
            ..NewCategory::new("Food", &discretionary)
        }
        .save(conn);

        assert!(matches!(result, Err(Error::NonUnique(_))));
        assert_eq!(1, mandatory.categories(conn)?.len());
        assert_eq!(0, discretionary.categories(conn)?.len());

        Ok(())
    }

    #[test]
    fn upsert() -> Result<()> {
        let conn = &mut test::db()?;
        let uuid = Uuid::new_v4();

        let category = UpsertCategory {
            uuid,
            name: "Food",
            group_name: "Mandatory",
        }
        .save(conn)?;
        assert_eq!("Mandatory", category.fetch_group(conn)?.name);

        let moved = UpsertCategory {
            uuid,
            name: "Eating out",
            group_name: "Discretionary",
        }
        .save(conn)?;

        assert_eq!(category.id, moved.id);
        assert_eq!("Eating out", moved.name);
        assert_eq!("Discretionary", moved.fetch_group(conn)?.name);
        assert_eq!(1, QueryCategory::default().run(conn)?.len());

        Ok(())
    }

    #[test]
    fn delete_uncategorizes_transactions() -> Result<()> {
        let conn = &mut test::db()?;
        let account = test::account(conn, "Starling Personal", "Personal")?;
        let mut category = test::category(conn, "Mandatory", "Food")?;
        let mut transaction = test::transaction(conn, &account, "Waterstones")?;

        crate::transaction::ChangeTransaction {
            category: Some(Some(&category)),
            ..Default::default()
        }
        .apply(conn, &mut transaction)?;
        assert_eq!(1, category.transactions(conn)?.len());

        category.delete(conn)?;

        assert_eq!(None, Transaction::find(conn, transaction.id)?.category_id);

        Ok(())
    }
}
