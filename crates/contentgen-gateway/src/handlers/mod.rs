//! HTTP handlers: JSON API (`/generate`) and the server-rendered surface (`/`).

pub mod api;
pub mod ui;
