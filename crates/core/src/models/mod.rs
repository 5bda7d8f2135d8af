pub mod bucket;
pub mod category;
pub mod chart;
pub mod date_range;
pub mod ledger;
pub mod settings;
pub mod transaction;
