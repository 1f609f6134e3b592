//! Actions and action matching.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeSet;

/// An action a user wants to perform.
///
/// Equality is structural: two actions are the same only when both the name
/// and the safety flag agree. Policy documents name actions by verb only;
/// see [`ActionClassifier`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Action {
    pub name: Cow<'static, str>,
    /// Whether the action is read-only.
    pub is_safe: bool,
}

impl Action {
    /// Matches every action.
    pub const ALL: Action = Action::new_static("*", false);

    /// Matches every action classified as safe.
    pub const ANY_SAFE: Action = Action::new_static("any_safe", true);

    pub fn new(name: impl Into<Cow<'static, str>>, is_safe: bool) -> Self {
        Self {
            name: name.into(),
            is_safe,
        }
    }

    pub const fn new_static(name: &'static str, is_safe: bool) -> Self {
        Self {
            name: Cow::Borrowed(name),
            is_safe,
        }
    }

    /// A non-mutating action.
    pub fn safe(name: impl Into<Cow<'static, str>>) -> Self {
        Self::new(name, true)
    }

    /// A mutating action.
    pub fn mutating(name: impl Into<Cow<'static, str>>) -> Self {
        Self::new(name, false)
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// The actions a statement applies to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Actions(Vec<Action>);

impl Actions {
    pub fn new(actions: impl IntoIterator<Item = Action>) -> Self {
        Self(actions.into_iter().collect())
    }

    /// Check whether `action` is covered.
    ///
    /// The match-all sentinel wins first, then the any-safe sentinel for safe
    /// actions, then exact membership.
    pub fn matches(&self, action: &Action) -> bool {
        if self.0.contains(&Action::ALL) {
            return true;
        }
        if action.is_safe && self.0.contains(&Action::ANY_SAFE) {
            return true;
        }
        self.0.contains(action)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Action> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Action>> for Actions {
    fn from(actions: Vec<Action>) -> Self {
        Self(actions)
    }
}

impl From<Action> for Actions {
    fn from(action: Action) -> Self {
        Self(vec![action])
    }
}

impl<const N: usize> From<[Action; N]> for Actions {
    fn from(actions: [Action; N]) -> Self {
        Self(actions.into())
    }
}

impl FromIterator<Action> for Actions {
    fn from_iter<I: IntoIterator<Item = Action>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Maps transport verbs to actions.
///
/// Which verbs are safe depends on the transport, so the set is configuration.
/// The default is the HTTP preset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionClassifier {
    /// Verb names classified as safe, compared case-sensitively.
    #[serde(default = "default_safe_verbs")]
    pub safe: BTreeSet<String>,
}

fn default_safe_verbs() -> BTreeSet<String> {
    ["GET", "HEAD", "OPTIONS"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Default for ActionClassifier {
    fn default() -> Self {
        Self::http()
    }
}

impl ActionClassifier {
    /// GET, HEAD and OPTIONS are safe.
    pub fn http() -> Self {
        Self {
            safe: default_safe_verbs(),
        }
    }

    /// Classify with an explicit set of safe verbs.
    pub fn with_safe_verbs<I, S>(verbs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            safe: verbs.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_safe(&self, verb: &str) -> bool {
        self.safe.contains(verb)
    }

    /// Build the action for a verb.
    pub fn classify(&self, verb: impl Into<String>) -> Action {
        let verb = verb.into();
        let is_safe = self.is_safe(&verb);
        Action::new(verb, is_safe)
    }
}
