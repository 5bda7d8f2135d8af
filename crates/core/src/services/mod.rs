pub mod chart_service;
pub mod date_range_service;
pub mod ledger_service;
pub mod search_service;
