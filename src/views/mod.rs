//! ビューモジュール

pub mod error_panel;
pub mod idle;
pub mod processing;
pub mod review;
pub mod settings;

pub use error_panel::ErrorPanel;
pub use idle::IdleView;
pub use processing::ProcessingView;
pub use review::ReviewView;
pub use settings::ApiKeySetup;
