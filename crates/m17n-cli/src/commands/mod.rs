pub mod config_ops;
pub mod name_ops;
pub mod translate_ops;
