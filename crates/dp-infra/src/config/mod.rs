mod loader;

pub use loader::load_provisioning_config;
