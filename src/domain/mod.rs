pub mod cycle;
pub mod forecast;
pub mod month_window;
pub mod severity;
