pub mod to_csv_alumni;
pub mod to_csv_report;
