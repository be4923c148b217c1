pub mod ports;
pub mod transform_use_case;
