//! Session handling for Skygate
//!
//! Signup, login and logout against the backend, plus persistence and
//! re-validation of the session token.

pub mod controller;
pub mod session;
pub mod storage;

pub use controller::SessionController;
pub use session::{AuthStatus, LoginForm, LoginResult, Session, SignupForm, SignupResult};
pub use storage::{FileSessionStore, MemorySessionStore, SessionStore, StoreError, StoredSession};
