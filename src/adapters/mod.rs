//! Concrete port implementations.

pub mod csv_data_adapter;
pub mod file_config_adapter;
pub mod log_notify_adapter;
pub mod paper_broker_adapter;
pub mod system_clock_adapter;
