#[macro_use]
mod common;
use common::prelude::*;

#[test]
fn empty() -> Result<()> {
    let env = Env::new()?;

    env.command()?
        .assert()
        .failure()
        .stderr(str::contains("No command provided"));

    Ok(())
}

#[test]
fn missing_data_dir() -> Result<()> {
    let env = Env::new()?;

    env.command()?
        .arg("-D")
        .arg(env.data_dir.path().join("missing"))
        .args(["bank", "list"])
        .assert()
        .failure()
        .stderr(str::contains("Data directory is not a dir"));

    Ok(())
}

#[test]
fn reset() -> Result<()> {
    let env = Env::new()?;
    let account = env.account("Starling", "Personal")?;
    env.transaction(&account, "Waterstones", -12.5, "2024-06-01T12:00:00Z")?;

    cmd!(env, reset).failure().stderr(str::contains("Usage:"));

    cmd!(env, reset --confirm)
        .failure()
        .stdout(str::contains("you really want"))
        .stderr(str::contains("requires confirmation"));

    raw_cmd!(env, reset --confirm)
        .write_stdin("yes")
        .assert()
        .success()
        .stdout(str::contains("you really want"));

    cmd!(env, account list)
        .success()
        .stdout(str::contains("Personal").not());
    cmd!(env, transactions list)
        .success()
        .stdout(str::contains("Waterstones").not());

    Ok(())
}
