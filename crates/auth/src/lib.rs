//! `staffgate-auth`: authentication and authorization core.
//!
//! Credential verification, claim construction, bearer tokens and the leave
//! authorization gate. Decoupled from HTTP and from any particular database.

pub mod authorize;
pub mod builder;
pub mod claims;
pub mod error;
pub mod login;
pub mod roles;
pub mod staff;
pub mod store;
pub mod token;
pub mod verifier;

pub use authorize::{authorize, AuthzError, LeaveAction};
pub use builder::{derive_employee_id, resolve_portal, ClaimBuilder};
pub use claims::{validate_claims, ClaimSet};
pub use error::AuthError;
pub use login::{Authenticator, LoginError, LoginOutcome, LoginRequest};
pub use roles::{Portal, StaffRole};
pub use staff::{Password, StaffProfile, StaffRecord};
pub use store::{CredentialStore, InMemoryStaffDirectory, StaffSeed};
pub use token::{Hs256Tokens, TokenIssuer, TokenValidator};
pub use verifier::{CredentialVerifier, PasswordMatcher, PlaintextMatcher};
