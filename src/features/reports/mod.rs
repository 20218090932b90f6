//! Citizen reports and their status workflow.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | POST | `/api/reports/report` | - | Submit a report (multipart, optional image) |
//! | GET | `/api/reports` | - | Every report |
//! | GET | `/api/reports/report/user/{user_id}` | - | Reports of one citizen |
//! | GET | `/api/reports/report/category/{user_id}` | - | Reports in an authority's category |
//! | GET | `/api/reports/report/{id}` | - | One report |
//! | GET | `/api/reports/report/{id}/image-url` | - | Signed image URL |
//! | PUT | `/api/reports/report/{id}` | - | Edit report content |
//! | PUT | `/api/reports/report/status/{id}` | Bearer | Change status (authorities) |
//! | DELETE | `/api/reports/report/{id}` | - | Delete report and its comments |
//!
//! Status moves forward only: `pending` → `in_progress` → `resolved`.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

pub use repositories::PgReportRepository;
pub use services::ReportService;
