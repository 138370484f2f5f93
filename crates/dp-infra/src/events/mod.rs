mod logging_event_port;

pub use logging_event_port::LoggingProvisioningEventPort;
