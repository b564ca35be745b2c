pub mod service;

pub use service::{
    Counter, Service, ServiceConfig, ServiceKind, ServiceStats, ServiceStatus, Window,
};
