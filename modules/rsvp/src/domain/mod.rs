pub mod admin_view;
pub mod catalog;
pub mod error;
pub mod form;
pub mod ports;
pub mod repo;
pub mod report;
pub mod selection;
pub mod service;
pub mod venue;
