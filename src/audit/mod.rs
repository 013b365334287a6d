//! Chain integrity auditing: a single `audit_chain` walk plus a background
//! periodic task (§4.7).

pub mod auditor;
pub mod event;

pub use auditor::Auditor;
pub use event::{AuditEvent, SecurityLevel};
