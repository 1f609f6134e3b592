//! Policy documents loaded from TOML.
//!
//! ```toml
//! [actions]
//! safe = ["GET", "HEAD", "OPTIONS"]
//!
//! [[statement]]
//! actions = ["any_safe"]
//! principal = "*"
//! effect = "allow"
//!
//! [[statement]]
//! actions = ["DELETE"]
//! principal = "group:admins"
//! effect = "allow"
//! ```
//!
//! Conditions are code, so documents carry none. Conditional statements are
//! added to the built [`Policy`] with [`Policy::with_statement`].

use crate::{Action, ActionClassifier, Actions, Effect, Error, Policy, Principal, Result, Statement};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// A policy document plus the safe-verb configuration used to decode it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Which verbs are safe. Defaults to GET, HEAD and OPTIONS.
    #[serde(default)]
    pub actions: ActionClassifier,

    #[serde(default, rename = "statement")]
    pub statements: Vec<StatementConfig>,
}

/// One `[[statement]]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementConfig {
    /// Verb names; `*` and `any_safe` are the sentinels.
    pub actions: Vec<String>,
    pub principal: Principal,
    pub effect: Effect,
}

impl PolicyConfig {
    /// Load a policy document from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::parse(&content)?;
        debug!(path = %path.display(), statements = config.statements.len(), "loaded policy");
        Ok(config)
    }

    /// Parse a policy document from a TOML string.
    pub fn parse(toml: &str) -> Result<Self> {
        toml::from_str(toml).map_err(|e| Error::Parse(e.to_string()))
    }

    /// Render back to TOML.
    ///
    /// Fails if a principal cannot be written in string form.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| Error::Invalid(e.to_string()))
    }

    /// The classifier for turning transport verbs into actions at request time.
    pub fn classifier(&self) -> &ActionClassifier {
        &self.actions
    }

    /// Build the policy. Statements start without conditions.
    pub fn into_policy<Ctx: ?Sized>(self) -> Policy<Ctx> {
        let classifier = self.actions;
        self.statements
            .into_iter()
            .map(|s| s.into_statement(&classifier))
            .collect()
    }
}

impl StatementConfig {
    fn into_statement<Ctx: ?Sized>(self, classifier: &ActionClassifier) -> Statement<Ctx> {
        let actions: Actions = self
            .actions
            .into_iter()
            .map(|name| decode_action(name, classifier))
            .collect();
        Statement::new(self.effect, actions, self.principal)
    }
}

fn decode_action(name: String, classifier: &ActionClassifier) -> Action {
    if name == Action::ALL.name {
        Action::ALL
    } else if name == Action::ANY_SAFE.name {
        Action::ANY_SAFE
    } else {
        classifier.classify(name)
    }
}
