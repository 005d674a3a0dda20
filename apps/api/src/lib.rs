//! Backend-for-frontend for the staffing desk: drill-down pages over clients,
//! vendors, jobs, resources and roles, stacked form drawers, and role
//! assignment, all backed by the upstream staffing REST API.

pub mod api_client;
pub mod config;
pub mod desk;
pub mod drawer;
pub mod errors;
pub mod forms;
pub mod models;
pub mod navigation;
pub mod pages;
pub mod routes;
pub mod sessions;
pub mod state;
pub mod store;
pub mod table;
