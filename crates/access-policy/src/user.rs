//! Users as capability sets.
//!
//! The engine never sees a concrete user type. It asks a [`User`] whether it
//! is anonymous and, when a principal needs more, probes for an optional
//! capability. A user that does not expose the capability simply fails to
//! match.

/// The base capability every user has.
///
/// The `as_*` accessors are the capability probes. They default to `None`;
/// implementors override the ones they support and return `Some(self)`.
pub trait User {
    fn is_anonymous(&self) -> bool;

    fn as_identity(&self) -> Option<&dyn Identity> {
        None
    }

    fn as_group_member(&self) -> Option<&dyn GroupMember> {
        None
    }

    fn as_permission_holder(&self) -> Option<&dyn PermissionHolder> {
        None
    }

    fn as_super_user(&self) -> Option<&dyn SuperUser> {
        None
    }
}

/// A user with a stable identifier.
pub trait Identity {
    /// The identifier in string form, compared verbatim against `id:` principals.
    fn id_str(&self) -> String;
}

/// A user that belongs to named groups.
pub trait GroupMember {
    fn groups(&self) -> &[String];
}

/// A user holding named permissions.
pub trait PermissionHolder {
    fn permissions(&self) -> &[String];
}

/// A user that may bypass every statement.
pub trait SuperUser {
    fn is_super_user(&self) -> bool;
}

/// A plain user value whose optional capabilities are present only when set.
///
/// Handy for services that already resolved a session into flat fields, and
/// for tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BasicUser {
    anonymous: bool,
    id: Option<String>,
    groups: Option<Vec<String>>,
    permissions: Option<Vec<String>>,
    super_user: Option<bool>,
}

impl BasicUser {
    /// An anonymous user with no capabilities.
    pub fn anonymous() -> Self {
        Self {
            anonymous: true,
            ..Default::default()
        }
    }

    /// An authenticated user with no optional capabilities yet.
    pub fn authenticated() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups = Some(groups.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_permissions<I, S>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.permissions = Some(permissions.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_super_user(mut self, super_user: bool) -> Self {
        self.super_user = Some(super_user);
        self
    }
}

impl User for BasicUser {
    fn is_anonymous(&self) -> bool {
        self.anonymous
    }

    fn as_identity(&self) -> Option<&dyn Identity> {
        self.id.as_ref().map(|_| self as &dyn Identity)
    }

    fn as_group_member(&self) -> Option<&dyn GroupMember> {
        self.groups.as_ref().map(|_| self as &dyn GroupMember)
    }

    fn as_permission_holder(&self) -> Option<&dyn PermissionHolder> {
        self.permissions.as_ref().map(|_| self as &dyn PermissionHolder)
    }

    fn as_super_user(&self) -> Option<&dyn SuperUser> {
        self.super_user.map(|_| self as &dyn SuperUser)
    }
}

impl Identity for BasicUser {
    fn id_str(&self) -> String {
        self.id.clone().unwrap_or_default()
    }
}

impl GroupMember for BasicUser {
    fn groups(&self) -> &[String] {
        self.groups.as_deref().unwrap_or_default()
    }
}

impl PermissionHolder for BasicUser {
    fn permissions(&self) -> &[String] {
        self.permissions.as_deref().unwrap_or_default()
    }
}

impl SuperUser for BasicUser {
    fn is_super_user(&self) -> bool {
        self.super_user.unwrap_or(false)
    }
}
