//! Domain types and models
//!
//! Shapes follow the dashboard REST serializers. Read-only server fields
//! (ids, timestamps, authorship) live on the resource types; the `*Input`
//! types carry only what a client may send.

pub mod auth;
pub mod notification;
pub mod page;
pub mod project;
pub mod task;

pub use auth::{
    CredentialPair, LoginRequest, LogoutRequest, RefreshRequest, RefreshResponse,
    RegisterRequest, RegisteredAccount, Role, UserProfile,
};
pub use notification::{Detail, Notification};
pub use page::ListResponse;
pub use project::{MembershipInput, MembershipRole, Project, ProjectInput, ProjectMembership, ProjectStatus};
pub use task::{Comment, CommentInput, Task, TaskInput, TaskStatus};
