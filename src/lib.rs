pub mod config;
pub mod humanize;
pub mod ledger;
pub mod observability;
pub mod report;
