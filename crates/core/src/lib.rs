//! # PM Dashboard Core
//!
//! Pure client logic - no HTTP, filesystem or keychain code.
//!
//! This crate contains:
//! - The credential store and its storage port
//! - The refresh coordinator (single in-flight token refresh, queued waiters)
//! - The session service (login / logout orchestration) and its gateway port
//!
//! ## Architecture Principles
//! - Only depends on `pmdash-domain`
//! - All external dependencies via traits
//! - State is held by owned objects, never module-level globals

pub mod credentials;
pub mod refresh;
pub mod session;

pub use credentials::ports::CredentialStorage;
pub use credentials::{CredentialStore, MemoryCredentialStorage};
pub use refresh::{RefreshCoordinator, RefreshLease, RefreshOutcome, RefreshTicket, RefreshWaiter, WaiterId};
pub use session::ports::AuthGateway;
pub use session::SessionService;
