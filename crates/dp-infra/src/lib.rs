pub mod config;
pub mod events;
pub mod home;
pub mod time;

pub use config::load_provisioning_config;
pub use events::LoggingProvisioningEventPort;
pub use home::InMemoryHomeBackend;
pub use time::SystemClock;
