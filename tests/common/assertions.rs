//! Domain-specific assertion helpers for labinvite harnesses.
//!
//! These wrap `pretty_assertions` and add failure messages that name the
//! target invariant that was violated.

use labinvite_core::InviteTarget;

/// Assert the emails of a target list, in order.
///
/// ```rust
/// assert_emails!(targets, ["a@b.com", "c@d.com"]);
/// ```
#[macro_export]
macro_rules! assert_emails {
    ($targets:expr, $expected:expr) => {{
        let targets = &$targets;
        let expected = &$expected;
        let actual: Vec<&str> = targets.iter().map(|t| t.email.as_str()).collect();
        let expected: Vec<&str> = expected.iter().map(|e| AsRef::<str>::as_ref(e)).collect();
        pretty_assertions::assert_eq!(actual, expected, "target emails differ");
    }};
}

/// Assert that a target carries nothing but its email.
#[macro_export]
macro_rules! assert_bare_target {
    ($target:expr) => {{
        let target: &labinvite_core::InviteTarget = &$target;
        pretty_assertions::assert_eq!(
            *target,
            labinvite_core::InviteTarget::from_email(target.email.clone()),
            "expected only an email on {:?}",
            target.email
        );
    }};
}

/// Every target must have an `@` in its email and no surrounding whitespace
/// on any text field.
pub fn assert_target_invariants(targets: &[InviteTarget]) {
    for target in targets {
        assert!(
            target.email.contains('@'),
            "target email must contain '@': {:?}",
            target.email
        );
        let texts = [
            Some(&target.email),
            target.name.as_ref(),
            target.imperva_account_id.as_ref(),
            target.org.as_ref(),
            target.scenario_id.as_ref(),
        ];
        for text in texts.into_iter().flatten() {
            assert!(!text.is_empty(), "blank field on {:?}", target.email);
            assert!(text.trim() == text.as_str(), "untrimmed field on {:?}", target.email);
        }
    }
}
