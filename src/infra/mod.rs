pub mod csv_capacity;
pub mod file_output_adapter;
pub mod json_file_source;
pub mod schiphol_client;
