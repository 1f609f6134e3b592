//! Policy evaluation.

use crate::{Action, Statement, User};
use std::fmt;
use tracing::{debug, trace};

/// A set of statements deciding who may do what.
///
/// Evaluation is set-based: statement order never changes the outcome, and a
/// single matching deny vetoes every matching allow.
pub struct Policy<Ctx: ?Sized = ()> {
    statements: Vec<Statement<Ctx>>,
}

impl<Ctx: ?Sized> Policy<Ctx> {
    pub fn new(statements: impl IntoIterator<Item = Statement<Ctx>>) -> Self {
        Self {
            statements: statements.into_iter().collect(),
        }
    }

    /// A policy with no statements. Denies everyone but super-users.
    pub fn empty() -> Self {
        Self {
            statements: Vec::new(),
        }
    }

    pub fn with_statement(mut self, statement: Statement<Ctx>) -> Self {
        self.statements.push(statement);
        self
    }

    pub fn statements(&self) -> &[Statement<Ctx>] {
        &self.statements
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Decide whether `user` may perform `action`.
    ///
    /// Super-users are always allowed. Otherwise statements are narrowed by
    /// action, then principal, then conditions; the survivors allow only if
    /// there is at least one and none of them denies. `ctx` is handed to
    /// conditions untouched.
    pub fn has_permission(&self, ctx: &Ctx, user: &dyn User, action: &Action) -> bool {
        if user.as_super_user().is_some_and(|u| u.is_super_user()) {
            debug!(action = %action, "super-user bypass");
            return true;
        }

        if self.statements.is_empty() {
            debug!(action = %action, "empty policy, denying");
            return false;
        }

        let allowed = self.evaluate_statements(ctx, user, action);
        debug!(action = %action, allowed, "policy evaluated");
        allowed
    }

    fn evaluate_statements(&self, ctx: &Ctx, user: &dyn User, action: &Action) -> bool {
        let by_action: Vec<_> = self
            .statements
            .iter()
            .filter(|s| s.actions.matches(action))
            .collect();
        let by_principal: Vec<_> = by_action
            .iter()
            .copied()
            .filter(|s| s.principal.matches(user))
            .collect();
        // Conditions may be costly or side-effecting, so they only run on
        // statements that got this far.
        let matched: Vec<_> = by_principal
            .iter()
            .copied()
            .filter(|s| s.conditions.matches(ctx, user, action))
            .collect();
        let denied = matched.iter().filter(|s| s.is_deny()).count();

        trace!(
            total = self.statements.len(),
            by_action = by_action.len(),
            by_principal = by_principal.len(),
            matched = matched.len(),
            denied,
            "statements filtered"
        );

        !matched.is_empty() && denied == 0
    }
}

impl<Ctx: ?Sized> Default for Policy<Ctx> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<Ctx: ?Sized> Clone for Policy<Ctx> {
    fn clone(&self) -> Self {
        Self {
            statements: self.statements.clone(),
        }
    }
}

impl<Ctx: ?Sized> fmt::Debug for Policy<Ctx> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Policy")
            .field("statements", &self.statements)
            .finish()
    }
}

impl<Ctx: ?Sized> FromIterator<Statement<Ctx>> for Policy<Ctx> {
    fn from_iter<I: IntoIterator<Item = Statement<Ctx>>>(iter: I) -> Self {
        Self::new(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BasicUser, Principal};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn get() -> Action {
        Action::safe("GET")
    }

    fn post() -> Action {
        Action::mutating("POST")
    }

    fn delete() -> Action {
        Action::mutating("DELETE")
    }

    #[test]
    fn test_empty_policy_denies() {
        let policy = Policy::<()>::empty();
        for user in [BasicUser::anonymous(), BasicUser::authenticated().with_id("1")] {
            for action in [get(), post(), Action::ALL] {
                assert!(!policy.has_permission(&(), &user, &action));
            }
        }
    }

    #[test]
    fn test_super_user_bypasses_everything() {
        let root = BasicUser::authenticated().with_super_user(true);

        assert!(Policy::<()>::empty().has_permission(&(), &root, &delete()));

        let deny_all: Policy = Policy::new([Statement::deny(Action::ALL, Principal::All)]);
        assert!(deny_all.has_permission(&(), &root, &delete()));
    }

    #[test]
    fn test_super_user_flag_false_is_ordinary_user() {
        let user = BasicUser::authenticated().with_super_user(false);
        assert!(!Policy::<()>::empty().has_permission(&(), &user, &get()));
    }

    #[test]
    fn test_authenticated_get() {
        let policy: Policy = Policy::new([Statement::allow([get()], Principal::Authenticated)]);

        assert!(!policy.has_permission(&(), &BasicUser::anonymous(), &get()));
        assert!(policy.has_permission(&(), &BasicUser::authenticated(), &get()));
        assert!(!policy.has_permission(&(), &BasicUser::authenticated(), &post()));
    }

    #[test]
    fn test_deny_overrides_wildcard_allow() {
        let policy: Policy = Policy::new([
            Statement::allow(Action::ALL, Principal::All),
            Statement::deny([delete()], Principal::ids(["42"])),
        ]);

        let banned = BasicUser::authenticated().with_id("42");
        let other = BasicUser::authenticated().with_id("7");

        assert!(!policy.has_permission(&(), &banned, &delete()));
        assert!(policy.has_permission(&(), &banned, &get()));
        assert!(policy.has_permission(&(), &other, &delete()));
    }

    #[test]
    fn test_order_does_not_matter() {
        let allow = Statement::allow(Action::ALL, Principal::All);
        let deny = Statement::deny([delete()], Principal::Authenticated);

        let forward: Policy = Policy::new([allow.clone(), deny.clone()]);
        let reverse: Policy = Policy::new([deny, allow]);
        let user = BasicUser::authenticated();

        for action in [get(), delete()] {
            assert_eq!(
                forward.has_permission(&(), &user, &action),
                reverse.has_permission(&(), &user, &action)
            );
        }
    }

    #[test]
    fn test_only_deny_matches() {
        let policy: Policy = Policy::new([Statement::deny(Action::ALL, Principal::Anonymous)]);
        assert!(!policy.has_permission(&(), &BasicUser::anonymous(), &get()));
        // Nothing matches for the authenticated user either.
        assert!(!policy.has_permission(&(), &BasicUser::authenticated(), &get()));
    }

    #[test]
    fn test_any_safe_statement() {
        let policy: Policy = Policy::new([Statement::allow(Action::ANY_SAFE, Principal::All)]);
        let user = BasicUser::anonymous();

        assert!(policy.has_permission(&(), &user, &get()));
        assert!(policy.has_permission(&(), &user, &Action::safe("HEAD")));
        assert!(!policy.has_permission(&(), &user, &post()));
    }

    #[test]
    fn test_failing_condition_removes_statement() {
        let policy: Policy = Policy::new([
            Statement::allow(Action::ALL, Principal::All),
            Statement::deny(Action::ALL, Principal::All).with_condition(|_, _, _| false),
        ]);
        assert!(policy.has_permission(&(), &BasicUser::anonymous(), &post()));
    }

    #[test]
    fn test_conditions_skipped_when_action_or_principal_miss() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let policy: Policy = Policy::new([Statement::allow([post()], Principal::groups(["ops"]))
            .with_condition(move |_, _, _| {
                counter.fetch_add(1, Ordering::SeqCst);
                true
            })]);

        let ops = BasicUser::authenticated().with_groups(["ops"]);
        let dev = BasicUser::authenticated().with_groups(["dev"]);

        assert!(!policy.has_permission(&(), &ops, &get()));
        assert!(!policy.has_permission(&(), &dev, &post()));
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        assert!(policy.has_permission(&(), &ops, &post()));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_condition_reads_context() {
        struct Request {
            internal: bool,
        }

        let policy = Policy::new([Statement::allow(Action::ALL, Principal::Authenticated)
            .with_condition(|req: &Request, _, _| req.internal)]);
        let user = BasicUser::authenticated();

        assert!(policy.has_permission(&Request { internal: true }, &user, &post()));
        assert!(!policy.has_permission(&Request { internal: false }, &user, &post()));
    }

    #[test]
    fn test_repeated_calls_agree() {
        let policy: Policy = Policy::new([
            Statement::allow([get()], Principal::permissions(["read"])),
            Statement::deny([get()], Principal::groups(["blocked"])),
        ]);
        let user = BasicUser::authenticated()
            .with_permissions(["read"])
            .with_groups(["staff"]);

        let first = policy.has_permission(&(), &user, &get());
        for _ in 0..10 {
            assert_eq!(policy.has_permission(&(), &user, &get()), first);
        }
        assert!(first);
    }

    #[test]
    fn test_empty_permission_list_denies() {
        let none: [&str; 0] = [];
        let policy: Policy = Policy::new([Statement::allow(
            Action::ALL,
            Principal::permissions(none),
        )]);

        let no_permissions = BasicUser::authenticated().with_permissions(none);
        let some_permissions = BasicUser::authenticated().with_permissions(["post.read"]);

        assert!(!policy.has_permission(&(), &no_permissions, &delete()));
        assert!(!policy.has_permission(&(), &some_permissions, &get()));
    }

    #[test]
    fn test_builder_accessors() {
        let policy: Policy = Policy::default()
            .with_statement(Statement::allow(Action::ALL, Principal::All))
            .with_statement(Statement::deny([delete()], Principal::Anonymous));
        assert_eq!(policy.len(), 2);
        assert!(!policy.is_empty());
        assert!(policy.statements()[1].is_deny());
    }
}
