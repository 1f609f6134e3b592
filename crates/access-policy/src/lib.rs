//! Statement-based authorization for embedding in a service.
//!
//! A [`Policy`] is a set of [`Statement`]s. Each statement names the actions
//! it covers, the [`Principal`] it applies to, optional [`Condition`]s and an
//! [`Effect`]. Given a user and an action, [`Policy::has_permission`] answers
//! yes or no.
//!
//! # Evaluation
//!
//! 1. A user that exposes the super-user capability and reports `true` is
//!    allowed without looking at any statement.
//! 2. An empty policy denies.
//! 3. Statements are narrowed to those whose actions match, then whose
//!    principal matches, then whose conditions all hold.
//! 4. The request is allowed only if at least one statement survived and none
//!    of the survivors is a deny (**deny overrides allow**).
//!
//! Nothing in this path returns an error. Unknown principals, users lacking a
//! capability and empty policies all come out as "deny".
//!
//! # Users
//!
//! The engine works against the [`User`] trait. Beyond `is_anonymous`, a user
//! may expose optional capabilities ([`Identity`], [`GroupMember`],
//! [`PermissionHolder`], [`SuperUser`]) through the trait's `as_*` probes.
//! [`BasicUser`] is a ready-made implementation.
//!
//! # Example
//!
//! ```
//! use access_policy::{Action, ActionClassifier, BasicUser, Policy, Principal, Statement};
//!
//! let http = ActionClassifier::http();
//! let policy: Policy = Policy::new([
//!     Statement::allow(Action::ALL, Principal::All),
//!     Statement::deny([http.classify("DELETE")], Principal::ids(["42"])),
//! ]);
//!
//! let alice = BasicUser::authenticated().with_id("7");
//! let mallory = BasicUser::authenticated().with_id("42");
//!
//! assert!(policy.has_permission(&(), &alice, &http.classify("DELETE")));
//! assert!(!policy.has_permission(&(), &mallory, &http.classify("DELETE")));
//! assert!(policy.has_permission(&(), &mallory, &http.classify("GET")));
//! ```
//!
//! Policies can also be written as TOML documents; see [`PolicyConfig`].
//!
//! # Re-exports
//!
//! All public types live at the crate root:
//!
//! - [`Policy`], [`Statement`], [`Effect`]: policy model and evaluation
//! - [`Action`], [`Actions`], [`ActionClassifier`]: action matching
//! - [`Principal`]: principal matching
//! - [`Condition`], [`Conditions`]: caller predicates
//! - [`User`] and its capability traits, [`BasicUser`]
//! - [`PolicyConfig`], [`StatementConfig`]: TOML documents
//! - [`Error`], [`Result`]: error handling

mod action;
mod condition;
mod config;
mod error;
mod policy;
mod principal;
mod statement;
mod user;

pub use action::{Action, ActionClassifier, Actions};
pub use condition::{Condition, Conditions};
pub use config::{PolicyConfig, StatementConfig};
pub use error::{Error, Result};
pub use policy::Policy;
pub use principal::Principal;
pub use statement::{Effect, Statement};
pub use user::{BasicUser, GroupMember, Identity, PermissionHolder, SuperUser, User};
