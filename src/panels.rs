mod central_panel;
mod histogram_window;
mod history_panel;
mod menu_bar;
mod settings_window;
mod status_bar;

pub use central_panel::central_panel;
pub use histogram_window::histogram_window;
pub use history_panel::history_panel;
pub use menu_bar::menu_bar;
pub use settings_window::settings_window;
pub use status_bar::status_bar;
