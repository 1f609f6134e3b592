//! Statements: one rule of a policy.

use crate::{Action, Actions, Condition, Conditions, Principal, User};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a matching statement contributes to the decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effect {
    Allow,
    Deny,
}

/// A single rule: which actions, for which users, under which conditions,
/// with what effect.
pub struct Statement<Ctx: ?Sized = ()> {
    pub actions: Actions,
    pub principal: Principal,
    pub conditions: Conditions<Ctx>,
    pub effect: Effect,
}

impl<Ctx: ?Sized> Statement<Ctx> {
    pub fn new(effect: Effect, actions: impl Into<Actions>, principal: impl Into<Principal>) -> Self {
        Self {
            actions: actions.into(),
            principal: principal.into(),
            conditions: Conditions::default(),
            effect,
        }
    }

    pub fn allow(actions: impl Into<Actions>, principal: impl Into<Principal>) -> Self {
        Self::new(Effect::Allow, actions, principal)
    }

    pub fn deny(actions: impl Into<Actions>, principal: impl Into<Principal>) -> Self {
        Self::new(Effect::Deny, actions, principal)
    }

    /// Add a condition that must hold for the statement to apply.
    pub fn with_condition<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Ctx, &dyn User, &Action) -> bool + Send + Sync + 'static,
    {
        self.conditions.push(Condition::new(predicate));
        self
    }

    pub fn with_conditions(mut self, conditions: Conditions<Ctx>) -> Self {
        self.conditions = conditions;
        self
    }

    pub fn is_deny(&self) -> bool {
        self.effect == Effect::Deny
    }
}

impl<Ctx: ?Sized> Clone for Statement<Ctx> {
    fn clone(&self) -> Self {
        Self {
            actions: self.actions.clone(),
            principal: self.principal.clone(),
            conditions: self.conditions.clone(),
            effect: self.effect,
        }
    }
}

impl<Ctx: ?Sized> fmt::Debug for Statement<Ctx> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Statement")
            .field("actions", &self.actions)
            .field("principal", &self.principal)
            .field("conditions", &self.conditions)
            .field("effect", &self.effect)
            .finish()
    }
}
