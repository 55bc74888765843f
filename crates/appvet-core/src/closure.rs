//! Closure validation.
//!
//! The store's central rule: the published set must be closed under
//! dependency resolution. An app survives only if every declared
//! dependency resolves to another surviving app or an allow-listed
//! external service, and every container permission is either a system
//! permission or backed by one of the app's own dependencies.
//!
//! Rejecting one app can strand its dependents, so validation runs to a
//! fixed point. Each sweep evaluates every live app against a snapshot of
//! the live set taken at the start of the sweep; removals are committed
//! only after the sweep finishes, and sweeps repeat until one removes
//! nothing. The surviving set is the largest self-consistent subset of the
//! candidates and does not depend on their order.

use std::collections::HashSet;

use appvet_types::manifest::CandidateApp;
use appvet_types::policy::PolicyConfig;
use appvet_types::report::{RejectionReason, RejectionRecord};

/// Outcome of closure validation over one candidate batch.
#[derive(Debug)]
pub struct ClosureOutcome {
    /// Surviving apps, in the order they were given.
    pub accepted: Vec<CandidateApp>,
    /// One record per rejected app, in the order the rejections fired.
    pub rejections: Vec<RejectionRecord>,
}

/// Applies the dependency and permission rules until a fixed point.
pub struct ClosureValidator<'a> {
    policy: &'a PolicyConfig,
}

impl<'a> ClosureValidator<'a> {
    pub fn new(policy: &'a PolicyConfig) -> Self {
        Self { policy }
    }

    /// Run validation to a fixed point over `candidates`.
    ///
    /// Evaluation never fails: a manifest with absent collections simply
    /// has nothing to check, and every violation becomes a record rather
    /// than an error. Candidate names are assumed unique; discovery
    /// rejects duplicates before they get here.
    pub fn run(&self, candidates: Vec<CandidateApp>) -> ClosureOutcome {
        let mut live = candidates;
        let mut rejections = Vec::new();

        loop {
            let snapshot: HashSet<&str> = live.iter().map(|app| app.name.as_str()).collect();
            let mut doomed: HashSet<String> = HashSet::new();

            for app in &live {
                if let Some(reason) = self.first_violation(app, &snapshot) {
                    tracing::warn!(
                        app = %app.name,
                        code = reason.code(),
                        "Rejecting app: {reason}"
                    );
                    doomed.insert(app.name.clone());
                    rejections.push(RejectionRecord::new(app.name.clone(), reason));
                }
            }

            if doomed.is_empty() {
                break;
            }
            live.retain(|app| !doomed.contains(&app.name));
        }

        ClosureOutcome {
            accepted: live,
            rejections,
        }
    }

    /// Evaluate one app against the sweep snapshot and return the first
    /// rule it breaks.
    ///
    /// Rules run in a fixed order so the recorded diagnostic is
    /// deterministic: self-dependency first, then each dependency in
    /// declared order, then each container permission in declared order.
    fn first_violation(
        &self,
        app: &CandidateApp,
        live: &HashSet<&str>,
    ) -> Option<RejectionReason> {
        if app.dependencies().iter().any(|d| d == &app.name) {
            return Some(RejectionReason::SelfDependency);
        }

        for dependency in app.dependencies() {
            if !live.contains(dependency.as_str())
                && !self.policy.allows_external_service(dependency)
            {
                return Some(RejectionReason::UnknownDependency {
                    dependency: dependency.clone(),
                });
            }
        }

        for container in app.manifest.containers() {
            for permission in container.permissions() {
                if !self.policy.allows_system_permission(permission)
                    && !app.manifest.declares_dependency(permission)
                {
                    return Some(RejectionReason::UndeclaredPermission {
                        container: container.name.clone(),
                        permission: permission.clone(),
                    });
                }
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use appvet_types::manifest::{AppManifest, AppMetadata, Container};

    /// Helper to build an app with dependencies and no containers.
    fn make_app(name: &str, deps: &[&str]) -> CandidateApp {
        make_full_app(name, deps, &[])
    }

    /// Helper to build an app with dependencies and permissioned containers.
    fn make_full_app(
        name: &str,
        deps: &[&str],
        containers: &[(&str, &[&str])],
    ) -> CandidateApp {
        CandidateApp::new(
            name,
            AppManifest {
                metadata: Some(AppMetadata {
                    dependencies: Some(deps.iter().map(|d| d.to_string()).collect()),
                    ..AppMetadata::default()
                }),
                containers: Some(
                    containers
                        .iter()
                        .map(|(cname, perms)| Container {
                            name: cname.to_string(),
                            image: None,
                            permissions: Some(
                                perms.iter().map(|p| p.to_string()).collect(),
                            ),
                        })
                        .collect(),
                ),
            },
        )
    }

    fn run(candidates: Vec<CandidateApp>) -> ClosureOutcome {
        let policy = PolicyConfig::default();
        ClosureValidator::new(&policy).run(candidates)
    }

    fn accepted_names(outcome: &ClosureOutcome) -> Vec<&str> {
        outcome
            .accepted
            .iter()
            .map(|app| app.name.as_str())
            .collect()
    }

    #[test]
    fn test_self_dependency_rejected() {
        let outcome = run(vec![make_app("mirror", &["mirror"])]);
        assert!(outcome.accepted.is_empty());
        assert_eq!(outcome.rejections.len(), 1);
        assert_eq!(outcome.rejections[0].app, "mirror");
        assert_eq!(outcome.rejections[0].reason, RejectionReason::SelfDependency);
    }

    #[test]
    fn test_unknown_dependency_rejected() {
        let outcome = run(vec![make_app("wallet", &["ghost"])]);
        assert!(outcome.accepted.is_empty());
        assert_eq!(
            outcome.rejections[0].reason,
            RejectionReason::UnknownDependency {
                dependency: "ghost".to_string()
            }
        );
    }

    #[test]
    fn test_external_service_dependency_accepted() {
        // No app named bitcoind exists; the allow-list satisfies the
        // dependency anyway.
        let outcome = run(vec![make_app("wallet", &["bitcoind"])]);
        assert_eq!(accepted_names(&outcome), ["wallet"]);
        assert!(outcome.rejections.is_empty());
    }

    #[test]
    fn test_dependency_on_live_app_accepted() {
        let outcome = run(vec![make_app("a", &["b"]), make_app("b", &[])]);
        assert_eq!(accepted_names(&outcome), ["a", "b"]);
    }

    #[test]
    fn test_mutual_dependencies_accepted() {
        let outcome = run(vec![make_app("a", &["b"]), make_app("b", &["a"])]);
        assert_eq!(accepted_names(&outcome), ["a", "b"]);
        assert!(outcome.rejections.is_empty());
    }

    #[test]
    fn test_undeclared_permission_rejected() {
        let outcome = run(vec![make_full_app("wallet", &[], &[("web", &["gpu"])])]);
        assert_eq!(
            outcome.rejections[0].reason,
            RejectionReason::UndeclaredPermission {
                container: "web".to_string(),
                permission: "gpu".to_string(),
            }
        );
    }

    #[test]
    fn test_system_permissions_need_no_dependency() {
        let outcome = run(vec![make_full_app(
            "miner",
            &[],
            &[("worker", &["root", "hw"])],
        )]);
        assert_eq!(accepted_names(&outcome), ["miner"]);
    }

    #[test]
    fn test_permission_backed_by_declared_dependency_accepted() {
        let outcome = run(vec![make_full_app("wallet", &["lnd"], &[("web", &["lnd"])])]);
        assert_eq!(accepted_names(&outcome), ["wallet"]);
    }

    #[test]
    fn test_permission_named_after_external_service_still_needs_dependency() {
        // The external-service allow-list applies to dependencies, not to
        // permissions. Without `lnd` in the dependency list the permission
        // is undeclared.
        let outcome = run(vec![make_full_app("wallet", &[], &[("web", &["lnd"])])]);
        assert_eq!(
            outcome.rejections[0].reason,
            RejectionReason::UndeclaredPermission {
                container: "web".to_string(),
                permission: "lnd".to_string(),
            }
        );
    }

    #[test]
    fn test_self_dependency_of_allow_listed_name_rejected() {
        // An app literally named bitcoind still may not depend on itself;
        // the self-dependency rule precedes the allow-list.
        let outcome = run(vec![make_app("bitcoind", &["bitcoind"])]);
        assert_eq!(outcome.rejections[0].reason, RejectionReason::SelfDependency);
    }

    #[test]
    fn test_self_dependency_beats_earlier_unknown_dependency() {
        let outcome = run(vec![make_app("app", &["ghost", "app"])]);
        assert_eq!(outcome.rejections.len(), 1);
        assert_eq!(outcome.rejections[0].reason, RejectionReason::SelfDependency);
    }

    #[test]
    fn test_first_unknown_dependency_wins() {
        let outcome = run(vec![make_app("app", &["first-ghost", "second-ghost"])]);
        assert_eq!(outcome.rejections.len(), 1);
        assert_eq!(
            outcome.rejections[0].reason,
            RejectionReason::UnknownDependency {
                dependency: "first-ghost".to_string()
            }
        );
    }

    #[test]
    fn test_duplicate_dependency_produces_one_record() {
        let outcome = run(vec![make_app("app", &["ghost", "ghost"])]);
        assert_eq!(outcome.rejections.len(), 1);
    }

    #[test]
    fn test_rejection_cascades_through_dependents() {
        // c is broken; b depends on c; a depends on b. Removing c strands
        // b in the second sweep, and removing b strands a in the third.
        let outcome = run(vec![
            make_app("a", &["b"]),
            make_app("b", &["c"]),
            make_app("c", &["c"]),
        ]);
        assert!(outcome.accepted.is_empty());
        assert_eq!(outcome.rejections.len(), 3);
        assert_eq!(outcome.rejections[0].app, "c");
        assert_eq!(outcome.rejections[0].reason, RejectionReason::SelfDependency);
        assert_eq!(outcome.rejections[1].app, "b");
        assert_eq!(
            outcome.rejections[1].reason,
            RejectionReason::UnknownDependency {
                dependency: "c".to_string()
            }
        );
        assert_eq!(outcome.rejections[2].app, "a");
        assert_eq!(
            outcome.rejections[2].reason,
            RejectionReason::UnknownDependency {
                dependency: "b".to_string()
            }
        );
    }

    #[test]
    fn test_valid_island_survives_collapse_of_another() {
        let outcome = run(vec![
            make_app("good-1", &["good-2"]),
            make_app("good-2", &[]),
            make_app("bad-1", &["bad-2"]),
            make_app("bad-2", &["ghost"]),
        ]);
        assert_eq!(accepted_names(&outcome), ["good-1", "good-2"]);
        assert_eq!(outcome.rejections.len(), 2);
    }

    #[test]
    fn test_accepted_set_is_a_fixed_point() {
        let outcome = run(vec![
            make_app("a", &["b"]),
            make_app("b", &[]),
            make_app("c", &["ghost"]),
        ]);
        let rerun = run(outcome.accepted.clone());
        assert_eq!(accepted_names(&rerun), ["a", "b"]);
        assert!(rerun.rejections.is_empty());
    }

    #[test]
    fn test_accepted_set_independent_of_candidate_order() {
        let forward = run(vec![
            make_app("a", &["b"]),
            make_app("b", &["c"]),
            make_app("c", &["c"]),
            make_app("d", &[]),
        ]);
        let backward = run(vec![
            make_app("d", &[]),
            make_app("c", &["c"]),
            make_app("b", &["c"]),
            make_app("a", &["b"]),
        ]);
        let mut forward_names: Vec<_> = accepted_names(&forward);
        let mut backward_names: Vec<_> = accepted_names(&backward);
        forward_names.sort_unstable();
        backward_names.sort_unstable();
        assert_eq!(forward_names, backward_names);
    }

    #[test]
    fn test_rejections_follow_input_order_within_a_sweep() {
        let outcome = run(vec![
            make_app("zeta", &["ghost"]),
            make_app("alpha", &["ghost"]),
        ]);
        assert_eq!(outcome.rejections[0].app, "zeta");
        assert_eq!(outcome.rejections[1].app, "alpha");
    }

    #[test]
    fn test_empty_batch_is_trivially_accepted() {
        let outcome = run(vec![]);
        assert!(outcome.accepted.is_empty());
        assert!(outcome.rejections.is_empty());
    }

    #[test]
    fn test_manifest_without_collections_accepted() {
        let outcome = run(vec![CandidateApp::new("bare", AppManifest::default())]);
        assert_eq!(accepted_names(&outcome), ["bare"]);
    }

    #[test]
    fn test_custom_policy_replaces_baseline() {
        let policy: PolicyConfig = serde_json::from_str(
            r#"{"external_services": ["postgres"], "system_permissions": ["gpu"]}"#,
        )
        .unwrap();
        let validator = ClosureValidator::new(&policy);

        let outcome = validator.run(vec![make_full_app(
            "dashboard",
            &["postgres"],
            &[("web", &["gpu"])],
        )]);
        assert_eq!(accepted_names(&outcome), ["dashboard"]);

        // The baseline names mean nothing under the custom policy.
        let outcome = validator.run(vec![make_app("wallet", &["bitcoind"])]);
        assert_eq!(
            outcome.rejections[0].reason,
            RejectionReason::UnknownDependency {
                dependency: "bitcoind".to_string()
            }
        );
    }
}
