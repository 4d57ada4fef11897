#[macro_use]
mod common;
use common::prelude::*;

#[test]
fn init() -> Result<()> {
    let env = Env::new()?;

    cmd!(env, category init).success();
    cmd!(env, category init).success();

    cmd!(env, category list)
        .success()
        .stdout(str::contains("| Discretionary | Entertainment |"))
        .stdout(str::contains("| Mandatory     | Insurance     |"));
    cmd!(env, category list --group Mandatory)
        .success()
        .stdout(str::contains("Energy"))
        .stdout(str::contains("Hobbies").not());
    cmd!(env, category list --name erg)
        .success()
        .stdout(str::contains("Energy"))
        .stdout(str::contains("Food").not());

    Ok(())
}

#[test]
fn create_with_uuid() -> Result<()> {
    let env = Env::new()?;
    let uuid = "8b5f1d2e-3a4c-4e6f-9a7b-1c2d3e4f5a6b";

    env.command()?
        .args(["category", "create", "Mandatory", "Food", "--uuid", uuid])
        .assert()
        .success()
        .stdout(str::contains(uuid));
    env.command()?
        .args(["category", "create", "Discretionary", "Eating out", "--uuid", uuid])
        .assert()
        .success();

    cmd!(env, category list)
        .success()
        .stdout(str::contains(format!("| {uuid} | Discretionary | Eating out |")))
        .stdout(str::contains("Food").not());

    Ok(())
}

#[test]
fn rename_and_change_group() -> Result<()> {
    let env = Env::new()?;

    cmd!(env, category create Mandatory Food).success();
    cmd!(env, category create Discretionary Food).success();

    cmd!(env, category rename Food Groceries)
        .failure()
        .stderr(str::contains("use group:name instead"));
    env.command()?
        .args(["category", "rename", "Mandatory:Food", "Groceries"])
        .assert()
        .success();
    env.command()?
        .args(["category", "change-group", "Groceries", "Essentials"])
        .assert()
        .success();

    cmd!(env, group list)
        .success()
        .stdout(str::contains("Essentials | Groceries"))
        .stdout(str::contains("Mandatory | \n"));

    Ok(())
}

#[test]
fn assign_and_delete() -> Result<()> {
    let env = Env::new()?;
    let account = env.account("Starling", "Personal")?;
    let uuid = env
        .transaction(&account, "Waterstones", -12.5, "2024-06-01T12:00:00Z")?
        .to_string();

    cmd!(env, category create Discretionary Books).success();

    env.command()?
        .args(["category", "assign", &uuid])
        .assert()
        .failure();
    env.command()?
        .args(["category", "assign", &uuid, "Books"])
        .assert()
        .success();
    cmd!(env, transactions list --category Books)
        .success()
        .stdout(str::contains(&uuid));

    env.command()?
        .args(["category", "assign", &uuid, "--none"])
        .assert()
        .success();
    cmd!(env, transactions list --category Books)
        .success()
        .stdout(str::contains(&uuid).not());

    env.command()?
        .args(["category", "assign", &uuid, "Books"])
        .assert()
        .success();
    raw_cmd!(env, category delete Books --confirm)
        .write_stdin("yes")
        .assert()
        .success();
    env.command()?
        .args(["transactions", "list", "--no-category"])
        .assert()
        .success()
        .stdout(str::contains(&uuid));

    Ok(())
}

#[test]
fn maps() -> Result<()> {
    let env = Env::new()?;

    cmd!(env, category create Discretionary Books).success();
    cmd!(env, category map Waterstones Books).success();
    cmd!(env, category map Waterstones Vacation)
        .failure()
        .stderr(str::contains("Category not found by name"));

    cmd!(env, category maps)
        .success()
        .stdout(str::contains("| Waterstones  | Books    |"));

    cmd!(env, category unmap Waterstones).success();
    cmd!(env, category maps)
        .success()
        .stdout(str::contains("Waterstones").not());

    Ok(())
}
