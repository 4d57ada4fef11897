use anyhow::Result;
use std::borrow::Cow;

use banksync::{
    category::{init_defaults, ChangeCategory, NewCategory, QueryCategory, UpsertCategory},
    mapper::CategoryMapper,
    prelude::*,
    transaction::ChangeTransaction,
};

use crate::cli::{category::*, like_pattern};
use crate::config::Config;
use crate::utils::require_confirmation;

use tabled::{Table, Tabled};

#[derive(derive_more::From)]
struct CategoryToDisplay(Category, CategoryGroup);

impl Tabled for CategoryToDisplay {
    const LENGTH: usize = 3;

    fn fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            self.0.uuid.to_string().into(),
            self.1.name.as_str().into(),
            self.0.name.as_str().into(),
        ]
    }

    fn headers() -> Vec<Cow<'static, str>> {
        vec!["uuid".into(), "group".into(), "name".into()]
    }
}

struct CommandContext<'a> {
    conn: &'a mut Conn,
}

pub fn run(config: &Config, command: &Command) -> Result<()> {
    let conn = &mut config.database()?;
    let mut cmd = CommandContext { conn };

    match command {
        Command::List(args) => cmd.list(args),
        Command::Create(args) => cmd.create(args),
        Command::Rename(args) => cmd.rename(args),
        Command::ChangeGroup(args) => cmd.change_group(args),
        Command::Delete(args) => cmd.delete(args),
        Command::Assign(args) => cmd.assign(args),
        Command::Init(_) => cmd.init(),
        Command::Map(args) => cmd.map(args),
        Command::Unmap(args) => cmd.unmap(args),
        Command::Maps(_) => cmd.maps(),
    }
}

impl CommandContext<'_> {
    fn list(&mut self, args: &List) -> Result<()> {
        let group = args
            .group
            .as_deref()
            .map(|name| CategoryGroup::find_by_name(self.conn, name))
            .transpose()?;
        let name = like_pattern(&args.name);

        let categories = QueryCategory {
            name: name.as_deref(),
            group_id: group.map(|g| g.id),
            count: args.count.map(i64::from),
        }
        .run(self.conn)?
        .into_iter()
        .map(CategoryToDisplay::from)
        .collect::<Vec<_>>();

        println!("{}", Table::new(categories));
        Ok(())
    }

    fn create(&mut self, args: &Create) -> Result<()> {
        let category = match args.uuid {
            Some(uuid) => UpsertCategory {
                uuid,
                name: &args.name,
                group_name: &args.group,
            }
            .save(self.conn)?,
            None => {
                let group = CategoryGroup::find_or_create_by_name(self.conn, &args.group)?;
                NewCategory::new(&args.name, &group).save(self.conn)?
            }
        };
        println!("{}", category.uuid);
        Ok(())
    }

    fn rename(&mut self, args: &Rename) -> Result<()> {
        let mut category = args.category.category(self.conn)?;

        ChangeCategory {
            name: Some(&args.new_name),
            ..Default::default()
        }
        .apply(self.conn, &mut category)?;

        Ok(())
    }

    fn change_group(&mut self, args: &ChangeGroup) -> Result<()> {
        let mut category = args.category.category(self.conn)?;
        let group = CategoryGroup::find_or_create_by_name(self.conn, &args.group)?;

        ChangeCategory {
            group: Some(&group),
            ..Default::default()
        }
        .apply(self.conn, &mut category)?;

        Ok(())
    }

    fn delete(&mut self, args: &Delete) -> Result<()> {
        let mut category = args.category.category(self.conn)?;

        require_confirmation(args.confirm)?;
        category.delete(self.conn)?;

        Ok(())
    }

    fn assign(&mut self, args: &Assign) -> Result<()> {
        let mut transaction = Transaction::find_by_uuid(self.conn, args.transaction)?;
        let category = match &args.category {
            Some(identifier) if !args.none => Some(identifier.category(self.conn)?),
            _ => None,
        };

        ChangeTransaction {
            category: Some(category.as_ref()),
            ..Default::default()
        }
        .apply(self.conn, &mut transaction)?;

        Ok(())
    }

    fn init(&mut self) -> Result<()> {
        for category in init_defaults(self.conn)? {
            log::info!("Created category {}", category.name);
        }

        Ok(())
    }

    fn map(&mut self, args: &Map) -> Result<()> {
        let category = args.category.category(self.conn)?;
        CategoryMapper::insert(self.conn, &args.displayname, &category)?;

        Ok(())
    }

    fn unmap(&mut self, args: &Unmap) -> Result<()> {
        CategoryMapper::delete(self.conn, &args.displayname)?;

        Ok(())
    }

    fn maps(&mut self) -> Result<()> {
        let mut builder = tabled::builder::Builder::new();
        builder.push_record(["display name", "category"]);

        for (map, category) in CategoryMapper::all(self.conn)? {
            push_record!(builder, map.displayname, category.name);
        }

        println!("{}", builder.build());
        Ok(())
    }
}
