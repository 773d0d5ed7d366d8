pub mod calendar_grid;
pub mod forecast_engine;
pub mod forecast_types;
pub mod forecast_yaml;
pub mod heatmap_plot;
pub mod jitter_sampler;
pub mod profile_yaml;
pub mod session;
pub mod trial_projection;
