use banksync::prelude::*;

use chrono::{offset::Utc, DateTime, SecondsFormat};

macro_rules! push_record {
    ( $builder:ident, $($col:expr),* $(,)? ) => {
        {
            use crate::utils::table_display::ColumnDisplay;
            $builder.push_record([$(ColumnDisplay::to_column(&$col),)*])
        }
    }
}

pub trait ColumnDisplay {
    fn to_column(&self) -> String;
}

impl ColumnDisplay for (f32, Currency) {
    fn to_column(&self) -> String {
        format!("{} {:.2}", self.1.code(), self.0)
    }
}

impl ColumnDisplay for Option<Category> {
    fn to_column(&self) -> String {
        self.as_ref().map(|c| c.name.clone()).to_column()
    }
}

impl ColumnDisplay for Option<String> {
    fn to_column(&self) -> String {
        self.clone().unwrap_or_default()
    }
}

impl ColumnDisplay for String {
    fn to_column(&self) -> String {
        self.clone()
    }
}

impl ColumnDisplay for &str {
    fn to_column(&self) -> String {
        self.to_string()
    }
}

impl ColumnDisplay for uuid::Uuid {
    fn to_column(&self) -> String {
        self.to_string()
    }
}

impl ColumnDisplay for DateTime<Utc> {
    fn to_column(&self) -> String {
        self.to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

impl ColumnDisplay for Option<DateTime<Utc>> {
    fn to_column(&self) -> String {
        self.as_ref().map(ColumnDisplay::to_column).unwrap_or_default()
    }
}
