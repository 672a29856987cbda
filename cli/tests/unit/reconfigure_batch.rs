//! Batch reconfiguration: validation before side effects, reverse-order
//! rollback, commit, and deferred actions.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use serde_json::{Value, json};
use webapps_cli::application::services::WebApp;
use webapps_cli::domain::{Capability, CertificateError, ReconfigureError};
use webapps_common::MetaPatch;

use crate::mocks::{DOCROOT, FakeType, HOSTNAME, OWNER, World, docroot};

fn batch(pairs: &[(&str, Value)]) -> Vec<(String, Value)> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), v.clone()))
        .collect()
}

// ── Validation ────────────────────────────────────────────────────────────────

#[test]
fn unknown_property_lists_valid_settings() {
    let world = World::new();
    let host = world.host();
    let mut app = WebApp::open(&host, docroot()).unwrap();

    let err = app.reconfigure(batch(&[("bogus", json!(1))])).unwrap_err();
    assert!(matches!(err, ReconfigureError::UnknownProperty { .. }));
    assert_eq!(err.property(), Some("bogus"));
    let message = err.to_string();
    assert!(message.contains("Unknown setting `bogus' for webapp"), "{message}");
    assert!(message.contains("Valid settings: affixed, autoupdate"), "{message}");
}

#[test]
fn invalid_value_anywhere_prevents_every_effect() {
    let world = World::new();
    let host = world.host();
    let mut app = WebApp::open(&host, docroot()).unwrap();
    world.journal.clear();

    let err = app
        .reconfigure(batch(&[("http10", json!(true)), ("verlock", json!("patch"))]))
        .unwrap_err();
    assert!(matches!(err, ReconfigureError::Invalid { .. }));
    assert_eq!(err.property(), Some("verlock"));
    assert!(world.journal.entries().is_empty(), "{:?}", world.journal.entries());
    assert!(!world.web.protocol_allowed(HOSTNAME, "http10"));
    assert!(!world.stored_options().contains("http10"));
}

#[test]
fn toggles_reject_non_boolean_values() {
    let world = World::new();
    let host = world.host();
    let mut app = WebApp::open(&host, docroot()).unwrap();

    for property in ["ssl", "git", "http10", "affixed", "autoupdate"] {
        let err = app
            .reconfigure(batch(&[(property, json!("yes"))]))
            .unwrap_err();
        assert_eq!(err.property(), Some(property));
    }
    // integers coerce
    let outcome = app.reconfigure(batch(&[("affixed", json!(1))])).unwrap();
    assert_eq!(outcome.applied, vec!["affixed"]);
    assert_eq!(world.stored_options().get("affixed"), Some(&json!(true)));
}

// ── Rollback ──────────────────────────────────────────────────────────────────

#[test]
fn apply_failure_rolls_back_earlier_properties() {
    let world = World::new();
    world.vcs.add_repo(DOCROOT);
    world.web.fail_protocol(true);
    let host = world.host();
    let mut app = WebApp::open(&host, docroot()).unwrap();

    let err = app
        .reconfigure(batch(&[("git", json!(false)), ("http10", json!(true))]))
        .unwrap_err();

    assert!(matches!(err, ReconfigureError::Apply { .. }));
    assert_eq!(err.property(), Some("http10"));
    // git was removed then recreated by the rollback
    let removed = world.journal.position("vcs.remove").expect("git disabled");
    let recreated = world.journal.position("vcs.init").expect("git restored");
    assert!(removed < recreated);
    assert!(world.vcs.has_repo(DOCROOT));
    assert!(!world.stored_options().contains("git"));
}

#[test]
fn commit_failure_restores_options_and_rolls_back() {
    let world = World::new();
    let host = world.host();
    let mut app = WebApp::open(&host, docroot()).unwrap();
    let before = app.options();
    world.store.fail_saves(true);

    let err = app
        .reconfigure(batch(&[("http10", json!(true))]))
        .unwrap_err();

    assert!(matches!(err, ReconfigureError::Commit { .. }));
    assert_eq!(err.property(), None);
    assert!(!world.web.protocol_allowed(HOSTNAME, "http10"));
    assert_eq!(app.options(), before);
}

#[test]
fn reapplying_current_values_is_harmless() {
    let world = World::new();
    let host = world.host();
    let mut app = WebApp::open(&host, docroot()).unwrap();

    app.reconfigure(batch(&[("http10", json!(true))])).unwrap();
    app.reconfigure(batch(&[("http10", json!(true))])).unwrap();
    assert!(world.web.protocol_allowed(HOSTNAME, "http10"));
    assert_eq!(world.stored_options().get("http10"), Some(&json!(true)));
}

// ── Deferred actions ──────────────────────────────────────────────────────────

#[test]
fn git_snapshot_runs_after_every_apply_and_the_commit() {
    let world = World::new();
    let host = world.host();
    let mut app = WebApp::open(&host, docroot()).unwrap();
    world.journal.clear();

    let outcome = app
        .reconfigure(batch(&[("git", json!(true)), ("http10", json!(true))]))
        .unwrap();

    assert_eq!(outcome.applied, vec!["git", "http10"]);
    assert_eq!(outcome.deferred, vec!["git"]);
    assert!(outcome.is_clean());

    let allow = world.journal.position("web.allow").unwrap();
    let save = world.journal.position("store.save").unwrap();
    let init = world.journal.position("vcs.init").unwrap();
    let snapshot = world.journal.position("vcs.snapshot").unwrap();
    assert!(allow < save && save < init && init < snapshot);
    assert!(world.journal.entries()[snapshot].ends_with("Initial install"));
    assert!(app.has_git());
}

#[test]
fn enabling_git_on_a_tracked_root_adds_no_snapshot() {
    let world = World::new();
    world.vcs.add_repo(DOCROOT);
    let host = world.host();
    let mut app = WebApp::open(&host, docroot()).unwrap();
    world.journal.clear();

    let outcome = app.reconfigure(batch(&[("git", json!(true))])).unwrap();
    assert_eq!(outcome.applied, vec!["git"]);
    assert!(outcome.deferred.is_empty(), "{:?}", outcome.deferred);
    assert!(world.journal.position("vcs.init").is_none());
    assert!(world.journal.position("vcs.snapshot").is_none());
    assert!(app.has_git());
}

#[test]
fn deferred_failure_is_reported_after_commit() {
    let world = World::new();
    world.vcs.fail_snapshot(true);
    let host = world.host();
    let mut app = WebApp::open(&host, docroot()).unwrap();

    let outcome = app.reconfigure(batch(&[("git", json!(true))])).unwrap();
    assert!(!outcome.is_clean());
    assert_eq!(outcome.post_commit[0].property, "git");
    assert!(outcome.post_commit[0].message.contains("nothing to commit"));
    assert_eq!(world.stored_options().get("git"), Some(&json!(true)));
}

#[test]
fn fortify_mode_is_validated_then_applied_after_commit() {
    let wp = FakeType::full("wordpress").with_modes(&["max", "min"]);
    let world = World::new().with_type(wp.clone()).with_detected("wordpress");
    let host = world.host();
    let mut app = WebApp::open(&host, docroot()).unwrap();

    let err = app
        .reconfigure(batch(&[("fortify", json!("paranoid"))]))
        .unwrap_err();
    assert!(err.to_string().contains("Unknown fortification mode paranoid"));
    assert!(wp.calls().is_empty());

    let outcome = app.reconfigure(batch(&[("fortify", json!("min"))])).unwrap();
    assert_eq!(outcome.deferred, vec!["fortify"]);
    assert_eq!(wp.calls(), vec!["fortify example.com/blog min"]);
}

// ── Individual properties ─────────────────────────────────────────────────────

#[test]
fn migrate_moves_the_application_and_round_trips() {
    let world = World::new();
    let host = world.host();
    let mut app = WebApp::open(&host, docroot()).unwrap();
    let purges = world.web.purges();

    app.reconfigure(batch(&[("migrate", json!("shop.example.com/store/"))]))
        .unwrap();
    assert_eq!(app.hostname(), "shop.example.com");
    assert_eq!(app.path(), "store");
    assert_eq!(
        app.reconfigurable_value("migrate").unwrap(),
        Some(json!("shop.example.com/store"))
    );
    assert!(world.web.purges() > purges);
    let stored = world.store.get(DOCROOT).unwrap();
    assert_eq!(stored.hostname, "shop.example.com");
    assert!(!stored.options.contains("migrate"));

    app.reconfigure(batch(&[("migrate", json!("example.com/blog/"))]))
        .unwrap();
    assert_eq!(
        app.reconfigurable_value("migrate").unwrap(),
        Some(json!("example.com/blog"))
    );
}

#[test]
fn migrate_rejects_invalid_hostnames() {
    let world = World::new();
    let host = world.host();
    let mut app = WebApp::open(&host, docroot()).unwrap();

    let err = app
        .reconfigure(batch(&[("migrate", json!("bad_host!/x"))]))
        .unwrap_err();
    assert!(matches!(err, ReconfigureError::Invalid { .. }));
    assert_eq!(app.hostname(), HOSTNAME);
}

#[test]
fn migrate_with_ssl_requires_issuance() {
    let world = World::new();
    world.certs.fail_append(true);
    let host = world.host();
    let mut app = WebApp::open(&host, docroot()).unwrap();
    app.set_option("ssl", json!(true)).unwrap();

    let err = app
        .reconfigure(batch(&[("migrate", json!("shop.example.com"))]))
        .unwrap_err();
    assert_eq!(err.property(), Some("migrate"));
    let expected = CertificateError::MigrationIssuance {
        hostname: "shop.example.com".to_string(),
    }
    .to_string();
    assert!(err.to_string().contains(&expected), "{err}");
    assert_eq!(app.hostname(), HOSTNAME);
}

#[test]
fn migrate_failure_later_in_batch_restores_location() {
    let world = World::new();
    world.web.fail_protocol(true);
    let host = world.host();
    let mut app = WebApp::open(&host, docroot()).unwrap();

    app.reconfigure(batch(&[
        ("migrate", json!("shop.example.com")),
        ("http10", json!(true)),
    ]))
    .unwrap_err();
    assert_eq!(app.hostname(), HOSTNAME);
    assert_eq!(app.path(), "blog");
}

#[test]
fn user_change_hands_over_files() {
    let world = World::new();
    let host = world.host();
    let mut app = WebApp::open(&host, docroot()).unwrap();

    assert_eq!(app.reconfigurable_value("user").unwrap(), Some(json!(OWNER)));
    app.reconfigure(batch(&[("user", json!("deploy"))])).unwrap();
    assert!(world.journal.contains("fs.takeover webuser deploy /var/www/html/blog"));
    assert_eq!(world.fs.owner(DOCROOT).as_deref(), Some("deploy"));
    assert_eq!(world.stored_options().get("user"), Some(&json!("deploy")));
}

#[test]
fn user_unchanged_is_a_no_op() {
    let world = World::new();
    let host = world.host();
    let mut app = WebApp::open(&host, docroot()).unwrap();

    app.reconfigure(batch(&[("user", json!(OWNER))])).unwrap();
    assert!(!world.journal.contains("fs.takeover"));
}

#[test]
fn user_change_on_subdomain_root_fixes_link_owner() {
    let world = World::new();
    world.web.map(DOCROOT, "blog.example.com", "");
    world.web.add_subdomain("blog.example.com");
    let host = world.host();
    let mut app = WebApp::open(&host, docroot()).unwrap();

    app.reconfigure(batch(&[("user", json!("deploy"))])).unwrap();
    assert!(world.journal.contains("fs.takeover webuser deploy /var/www/html/blog"));
    assert!(world
        .journal
        .contains("fs.chown_symlink /var/www/subdomains/blog.example.com/html deploy"));
    assert_eq!(
        world.fs.owner("/var/www/subdomains/blog.example.com/html").as_deref(),
        Some("deploy")
    );
}

#[test]
fn user_change_on_symlinked_root_follows_the_link() {
    let world = World::new();
    world.fs.add_symlink(DOCROOT, "/srv/blog", OWNER);
    world.fs.add_dir("/srv/blog", OWNER);
    world.fs.add_dir("/srv/blog/index.php", OWNER);
    let host = world.host();
    let mut app = WebApp::open(&host, docroot()).unwrap();

    app.reconfigure(batch(&[("user", json!("deploy"))])).unwrap();
    assert!(world.journal.contains("fs.takeover webuser deploy /var/www/html/blog"));
    assert_eq!(world.fs.owner("/srv/blog/index.php").as_deref(), Some("deploy"));
    assert!(world
        .journal
        .contains("fs.chown_symlink /var/www/html/blog deploy"));
    assert_eq!(world.fs.owner(DOCROOT).as_deref(), Some("deploy"));
}

#[test]
fn user_change_on_plain_root_leaves_links_alone() {
    let world = World::new();
    let host = world.host();
    let mut app = WebApp::open(&host, docroot()).unwrap();

    app.reconfigure(batch(&[("user", json!("deploy"))])).unwrap();
    assert!(!world.journal.contains("fs.chown_symlink"));
}

#[test]
fn user_rejects_malformed_names() {
    let world = World::new();
    let host = world.host();
    let mut app = WebApp::open(&host, docroot()).unwrap();

    let err = app
        .reconfigure(batch(&[("user", json!("Bad User!"))]))
        .unwrap_err();
    assert!(matches!(err, ReconfigureError::Invalid { .. }));
}

#[test]
fn user_failure_reports_the_collaborator_error() {
    let world = World::new();
    world.fs.fail_takeover(true);
    let host = world.host();
    let mut app = WebApp::open(&host, docroot()).unwrap();

    let err = app
        .reconfigure(batch(&[("user", json!("deploy"))]))
        .unwrap_err();
    assert!(err.to_string().contains("operation not permitted"), "{err}");
    assert_eq!(world.stored_options().get("user"), Some(&json!(OWNER)));
}

#[test]
fn verlock_normalizes_values() {
    let world = World::new();
    let host = world.host();
    let mut app = WebApp::open(&host, docroot()).unwrap();

    app.reconfigure(batch(&[("verlock", json!(false))])).unwrap();
    assert_eq!(world.stored_options().get("verlock"), Some(&json!("none")));

    app.reconfigure(batch(&[("verlock", json!("minor"))])).unwrap();
    assert_eq!(
        app.reconfigurable_value("verlock").unwrap(),
        Some(json!("minor"))
    );

    app.reconfigure(batch(&[("verlock", Value::Null)])).unwrap();
    assert!(!world.stored_options().contains("verlock"));
    assert_eq!(
        app.reconfigurable_value("verlock").unwrap(),
        Some(json!("none"))
    );
}

#[test]
fn autoupdate_defaults_to_enabled() {
    let world = World::new();
    let host = world.host();
    let mut app = WebApp::open(&host, docroot()).unwrap();

    assert_eq!(
        app.reconfigurable_value("autoupdate").unwrap(),
        Some(json!(true))
    );
    app.reconfigure(batch(&[("autoupdate", json!(0))])).unwrap();
    assert_eq!(
        app.reconfigurable_value("autoupdate").unwrap(),
        Some(json!(false))
    );
}

#[test]
fn set_affixed_goes_through_the_batch() {
    let world = World::new();
    let host = world.host();
    let mut app = WebApp::open(&host, docroot()).unwrap();

    app.set_affixed(true).unwrap();
    assert!(app.affixed());
    assert_eq!(world.stored_options().get("affixed"), Some(&json!(true)));
}

#[test]
fn type_declared_property_is_forwarded_to_the_type() {
    let wp = FakeType::full("wordpress").with_reconfigurables(&["level"]);
    let world = World::new().with_type(wp.clone()).with_detected("wordpress");
    let host = world.host();
    let mut app = WebApp::open(&host, docroot()).unwrap();

    app.reconfigure(batch(&[("level", json!(3))])).unwrap();
    assert_eq!(wp.reconfigured("level"), Some(json!(3)));
    assert_eq!(app.reconfigurable_value("level").unwrap(), Some(json!(3)));
    assert_eq!(world.stored_options().get("level"), Some(&json!(3)));
}

#[test]
fn type_declared_property_falls_back_to_generic_reconfigure() {
    let fixed = FakeType::new("static", &[]).with_reconfigurables(&["level"]);
    let world = World::new().with_type(fixed.clone()).with_detected("static");
    let host = world.host();
    let mut app = WebApp::open(&host, docroot()).unwrap();

    let outcome = app.reconfigure(batch(&[("level", json!(3))])).unwrap();
    assert_eq!(outcome.applied, vec!["level"]);
    assert_eq!(world.generic.reconfigured("level"), Some(json!(3)));
    assert_eq!(fixed.reconfigured("level"), None);
}

#[test]
fn type_declared_property_needs_reconfigure_capability() {
    let fixed = FakeType::new("static", &[]).with_reconfigurables(&["level"]);
    let mut world = World::new().with_type(fixed).with_detected("static");
    world.generic = FakeType::generic_with(&[Capability::Fortify]);
    let host = world.host();
    let mut app = WebApp::open(&host, docroot()).unwrap();

    let err = app
        .reconfigure(batch(&[("level", json!(3))]))
        .unwrap_err();
    assert!(matches!(err, ReconfigureError::Apply { .. }));
    assert_eq!(err.property(), Some("level"));
}

#[test]
fn options_written_by_trusted_callers_skip_validation() {
    let world = World::new();
    let host = world.host();
    let app = WebApp::open(&host, docroot()).unwrap();

    app.set_option("migrate", json!("ignored")).unwrap();
    app.set_option("custom", json!({"nested": 5})).unwrap();
    assert!(!world.stored_options().contains("migrate"));
    assert_eq!(app.option("custom.nested", Value::Null), json!(5));

    app.initialize_meta(MetaPatch::failed(true)).unwrap();
    assert!(app.failed());
    app.clear_failed().unwrap();
    assert!(!world.store.get(DOCROOT).unwrap().failed);
}
