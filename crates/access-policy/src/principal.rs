//! Principals: which users a statement applies to.

use crate::{Error, Result, User};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

const ALL: &str = "*";
const AUTHENTICATED: &str = "authenticated";
const ANONYMOUS: &str = "anonymous";

const GROUP_PREFIX: &str = "group:";
const PERMISSION_PREFIX: &str = "permission:";
const ID_PREFIX: &str = "id:";

const SEPARATOR: char = ',';

/// The users a statement applies to.
///
/// In policy documents a principal is written as a string: `*`,
/// `authenticated`, `anonymous`, `group:<a,b>`, `permission:<a,b>` or
/// `id:<a,b>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Principal {
    /// Everyone.
    All,
    /// Any user that is not anonymous.
    Authenticated,
    /// Only anonymous users.
    Anonymous,
    /// Users in at least one of the groups.
    Groups(Vec<String>),
    /// Users holding every one of the permissions.
    // TODO: an any-of mode for permissions if a product use case shows up.
    Permissions(Vec<String>),
    /// Users whose id is in the list.
    Ids(Vec<String>),
    /// A string that is not a principal. Never matches.
    Unrecognized(String),
}

impl Principal {
    /// Match users in any of `groups`.
    pub fn groups<I, S>(groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Groups(collect(groups))
    }

    /// Match users holding all of `permissions`.
    pub fn permissions<I, S>(permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Permissions(collect(permissions))
    }

    /// Match users whose id is one of `ids`.
    pub fn ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Ids(collect(ids))
    }

    /// Decode the string form.
    ///
    /// Unknown strings become [`Principal::Unrecognized`] rather than an
    /// error so a typo in a policy document fails closed.
    pub fn parse(s: &str) -> Self {
        match s {
            ALL => return Self::All,
            AUTHENTICATED => return Self::Authenticated,
            ANONYMOUS => return Self::Anonymous,
            _ => {}
        }

        if let Some(rest) = s.strip_prefix(GROUP_PREFIX) {
            Self::Groups(split(rest))
        } else if let Some(rest) = s.strip_prefix(PERMISSION_PREFIX) {
            Self::Permissions(split(rest))
        } else if let Some(rest) = s.strip_prefix(ID_PREFIX) {
            Self::Ids(split(rest))
        } else {
            Self::Unrecognized(s.to_string())
        }
    }

    /// Encode to the string form.
    ///
    /// Fails for anything whose string form would decode to a different
    /// principal: empty lists, empty entries, entries containing the
    /// separator, and unrecognized text that reads as a known principal.
    pub fn encode(&self) -> Result<String> {
        let (prefix, entries) = match self {
            Self::All => return Ok(ALL.to_string()),
            Self::Authenticated => return Ok(AUTHENTICATED.to_string()),
            Self::Anonymous => return Ok(ANONYMOUS.to_string()),
            Self::Unrecognized(raw) => {
                return match Self::parse(raw) {
                    Self::Unrecognized(_) => Ok(raw.clone()),
                    other => Err(Error::Invalid(format!(
                        "unrecognized principal {raw:?} would be read back as {other}"
                    ))),
                };
            }
            Self::Groups(entries) => (GROUP_PREFIX, entries),
            Self::Permissions(entries) => (PERMISSION_PREFIX, entries),
            Self::Ids(entries) => (ID_PREFIX, entries),
        };

        if entries.is_empty() {
            return Err(Error::Invalid(format!("principal {prefix:?} has no entries")));
        }
        if let Some(bad) = entries.iter().find(|e| e.is_empty() || e.contains(SEPARATOR)) {
            return Err(Error::Invalid(format!(
                "principal entry {bad:?} is empty or contains '{SEPARATOR}'"
            )));
        }
        Ok(format!("{prefix}{}", entries.join(",")))
    }

    /// Check whether `user` is covered.
    ///
    /// A user lacking the capability a variant needs does not match, and an
    /// empty list matches nobody.
    pub fn matches(&self, user: &dyn User) -> bool {
        match self {
            Self::All => true,
            Self::Authenticated => !user.is_anonymous(),
            Self::Anonymous => user.is_anonymous(),
            Self::Groups(wanted) => user
                .as_group_member()
                .is_some_and(|u| u.groups().iter().any(|g| wanted.contains(g))),
            Self::Permissions(wanted) if wanted.is_empty() => false,
            Self::Permissions(wanted) => user.as_permission_holder().is_some_and(|u| {
                let held = u.permissions();
                wanted.iter().all(|p| held.contains(p))
            }),
            Self::Ids(wanted) => user
                .as_identity()
                .is_some_and(|u| wanted.contains(&u.id_str())),
            Self::Unrecognized(_) => false,
        }
    }
}

fn collect<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    items.into_iter().map(Into::into).collect()
}

fn split(s: &str) -> Vec<String> {
    s.split(SEPARATOR).map(String::from).collect()
}

impl From<&str> for Principal {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(ALL),
            Self::Authenticated => f.write_str(AUTHENTICATED),
            Self::Anonymous => f.write_str(ANONYMOUS),
            Self::Groups(e) => write!(f, "{GROUP_PREFIX}{}", e.join(",")),
            Self::Permissions(e) => write!(f, "{PERMISSION_PREFIX}{}", e.join(",")),
            Self::Ids(e) => write!(f, "{ID_PREFIX}{}", e.join(",")),
            Self::Unrecognized(raw) => f.write_str(raw),
        }
    }
}

impl Serialize for Principal {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let encoded = self.encode().map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&encoded)
    }
}

impl<'de> Deserialize<'de> for Principal {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::parse(&s))
    }
}
