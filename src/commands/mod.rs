pub mod base_commands;
pub mod completions_cmd;
pub mod forecast_cmd;
pub mod report_format;
pub mod window_cmd;
