#[macro_use]
pub mod table_display;

use anyhow::Result;
use chrono::{
    offset::{MappedLocalTime, Utc},
    DateTime, NaiveDate, NaiveTime, TimeZone,
};

pub fn naive_date_to_utc(date: NaiveDate) -> Result<DateTime<Utc>> {
    match Utc.from_local_datetime(&date.and_time(NaiveTime::MIN)) {
        MappedLocalTime::Single(date) => Ok(date),
        MappedLocalTime::Ambiguous(date, _) => Ok(date),
        MappedLocalTime::None => {
            anyhow::bail!("Impossible to map local date to UTC");
        }
    }
}

pub fn confirm() -> Result<bool> {
    println!("Do you really want to do that?");

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;

    Ok(input.trim() == "yes")
}

/// Ask for confirmation unless the `--confirm` flag is missing, which is
/// refused outright
pub fn require_confirmation(confirm: bool) -> Result<()> {
    if !confirm || !self::confirm()? {
        anyhow::bail!("operation requires confirmation");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::prelude::{assert_eq, Result};

    #[test]
    fn date_to_utc() -> Result<()> {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).ok_or(anyhow::anyhow!("invalid date"))?;

        assert_eq!(
            "2024-06-01T00:00:00Z".parse::<DateTime<Utc>>()?,
            naive_date_to_utc(date)?
        );

        Ok(())
    }
}
