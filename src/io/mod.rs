/// CSV export of per-step records.
pub mod export;
