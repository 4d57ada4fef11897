#![cfg(test)]

use anyhow::Result;
use banksync::prelude::*;

pub mod prelude {
    pub use crate::test::{self, with::*};
    pub use anyhow::Result;
    pub use assert_fs::fixture::{FileWriteStr, PathChild};
    pub use banksync::prelude::*;
    pub use pretty_assertions::assert_eq;
}

pub fn conn() -> Result<Conn> {
    let mut db = Database::memory()?;
    db.setup()?;
    Ok(db.into())
}

pub fn account(conn: &mut Conn, bank_name: &str, name: &str) -> Result<Account> {
    let bank = Bank::upsert(conn, bank_name)?;
    Ok(banksync::account::NewAccount::new(&bank, name).save(conn)?)
}

pub mod with {
    use super::Result;
    use crate::config::Config;

    pub fn with_temp_dir<F, R>(function: F) -> R
    where
        F: FnOnce(&assert_fs::TempDir) -> R,
    {
        let temp = assert_fs::TempDir::new()
            .unwrap()
            .into_persistent_if(std::env::var_os("TEST_PERSIST_FILES").is_some());
        let result = function(&temp);

        // The destructor would silence any issue, so we call close() explicitly
        temp.close().unwrap();

        result
    }

    pub fn with_config_dir<F, R>(function: F) -> R
    where
        F: FnOnce(&assert_fs::TempDir) -> R,
    {
        with_temp_dir(|temp| {
            temp_env::with_var("BANKSYNC_CONFIG", Some(temp.path().as_os_str()), || {
                function(temp)
            })
        })
    }

    pub fn with_data_dir<F, R>(function: F) -> R
    where
        F: FnOnce(&assert_fs::TempDir) -> R,
    {
        with_temp_dir(|temp| {
            temp_env::with_var("BANKSYNC_DATA", Some(temp.path().as_os_str()), || {
                function(temp)
            })
        })
    }

    pub fn with_dirs<F, R>(function: F) -> R
    where
        F: FnOnce(&assert_fs::TempDir, &assert_fs::TempDir) -> R,
    {
        with_config_dir(|config| with_data_dir(|data| function(config, data)))
    }

    pub fn with_config<F, R>(function: F) -> Result<R>
    where
        F: FnOnce(&Config) -> Result<R>,
    {
        with_config_args(&[], function)
    }

    pub fn with_config_args<F, R>(additional_args: &[&str], function: F) -> Result<R>
    where
        F: FnOnce(&Config) -> Result<R>,
    {
        with_dirs(|confd, datad| {
            let mut args = vec![
                "arg0",
                "--config",
                confd.path().to_str().unwrap(),
                "--data",
                datad.path().to_str().unwrap(),
            ];

            args.extend(additional_args);

            let config = Config::try_parse_from(args.as_slice())?;

            function(&config)
        })
    }
}

mod tests {
    use super::*;

    #[test]
    fn with_config() -> Result<()> {
        with::with_config(|config| {
            assert!(config.dir.exists());
            assert!(config.data_dir.exists());

            Ok(())
        })
    }
}
