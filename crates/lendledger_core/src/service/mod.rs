//! Ledger use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep callers (CLI, menus) decoupled from storage details.
//!
//! Dependency order is strict: repositories → loan service → notification
//! service. Services borrow their collaborators; the process bootstrap owns
//! everything.

pub mod account_service;
pub mod loan_service;
pub mod notification_service;
