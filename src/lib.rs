// Library for tests to access modules

pub mod config;
pub mod event_repo;
pub mod maintenance;
pub mod models;
pub mod routes;
pub mod seed;
pub mod uptime;
pub mod version;
