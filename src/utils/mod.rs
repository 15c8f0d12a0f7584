pub mod csv_export;
pub mod roster_cache;
