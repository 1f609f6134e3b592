//! Caller-supplied conditions.

use crate::{Action, User};
use std::fmt;
use std::sync::Arc;

/// A predicate over the request context, the user and the action.
///
/// `Ctx` is whatever the host service threads through evaluation (request
/// metadata, a clock, a database handle). The engine never inspects it.
pub struct Condition<Ctx: ?Sized = ()>(Arc<dyn Fn(&Ctx, &dyn User, &Action) -> bool + Send + Sync>);

impl<Ctx: ?Sized> Condition<Ctx> {
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&Ctx, &dyn User, &Action) -> bool + Send + Sync + 'static,
    {
        Self(Arc::new(predicate))
    }

    pub fn evaluate(&self, ctx: &Ctx, user: &dyn User, action: &Action) -> bool {
        (self.0)(ctx, user, action)
    }
}

impl<Ctx: ?Sized> Clone for Condition<Ctx> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<Ctx: ?Sized> fmt::Debug for Condition<Ctx> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Condition(..)")
    }
}

/// All conditions of a statement. Every one must hold.
pub struct Conditions<Ctx: ?Sized = ()>(Vec<Condition<Ctx>>);

impl<Ctx: ?Sized> Conditions<Ctx> {
    pub fn new(conditions: impl IntoIterator<Item = Condition<Ctx>>) -> Self {
        Self(conditions.into_iter().collect())
    }

    pub fn push(&mut self, condition: Condition<Ctx>) {
        self.0.push(condition);
    }

    /// Evaluate left to right, stopping at the first condition that fails.
    /// An empty list holds.
    pub fn matches(&self, ctx: &Ctx, user: &dyn User, action: &Action) -> bool {
        self.0.iter().all(|c| c.evaluate(ctx, user, action))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<Ctx: ?Sized> Default for Conditions<Ctx> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<Ctx: ?Sized> Clone for Conditions<Ctx> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<Ctx: ?Sized> fmt::Debug for Conditions<Ctx> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.0).finish()
    }
}

impl<Ctx: ?Sized> FromIterator<Condition<Ctx>> for Conditions<Ctx> {
    fn from_iter<I: IntoIterator<Item = Condition<Ctx>>>(iter: I) -> Self {
        Self::new(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BasicUser;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_empty_conditions_hold() {
        let conditions = Conditions::<()>::default();
        assert!(conditions.matches(&(), &BasicUser::anonymous(), &Action::ALL));
    }

    #[test]
    fn test_all_conditions_must_hold() {
        let conditions: Conditions = [
            Condition::new(|_, _, _| true),
            Condition::new(|_, _, action: &Action| action.is_safe),
        ]
        .into_iter()
        .collect();

        let user = BasicUser::authenticated();
        assert!(conditions.matches(&(), &user, &Action::safe("GET")));
        assert!(!conditions.matches(&(), &user, &Action::mutating("POST")));
    }

    #[test]
    fn test_stops_at_first_failure() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let conditions: Conditions = Conditions::new([
            Condition::new(|_, _, _| false),
            Condition::new(move |_, _, _| {
                counter.fetch_add(1, Ordering::SeqCst);
                true
            }),
        ]);

        assert!(!conditions.matches(&(), &BasicUser::anonymous(), &Action::ALL));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_context_is_passed_through() {
        struct Request {
            ip: &'static str,
        }

        let internal = Condition::new(|req: &Request, _, _| req.ip.starts_with("10."));
        let user = BasicUser::authenticated();

        assert!(internal.evaluate(&Request { ip: "10.0.0.1" }, &user, &Action::ALL));
        assert!(!internal.evaluate(&Request { ip: "8.8.8.8" }, &user, &Action::ALL));
    }

    #[test]
    fn test_condition_sees_user() {
        let only_admin = Condition::<()>::new(|_, user, _| {
            user.as_identity().is_some_and(|u| u.id_str() == "admin")
        });

        assert!(only_admin.evaluate(&(), &BasicUser::authenticated().with_id("admin"), &Action::ALL));
        assert!(!only_admin.evaluate(&(), &BasicUser::anonymous(), &Action::ALL));
    }
}
