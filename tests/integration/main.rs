//! End-to-end tests through the HTTP router.

mod auth_test;
mod helpers;
mod notification_test;
