#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use cspforge_core::PolicyKind;
use cspforge_gateway::config;

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
gateway:
  listen: "0.0.0.0:8080"
policies:
  enforced:   # typo should fail
    default-src: [self]
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.kind().as_str(), "INVALID_CONFIG");
}

#[test]
fn ok_minimal_config() {
    let ok = r#"
version: 1
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.gateway.listen, "0.0.0.0:8080");
    assert!(cfg.gateway.legacy_header_names);
    assert!(cfg.policies.enforce.is_empty());
}

#[test]
fn policies_keep_document_order() {
    let ok = r#"
version: 1
policies:
  enforce:
    script-src: [self, cdn.example.com]
    default-src: self
  report:
    report-uri: [/csp-report]
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    let names: Vec<&str> = cfg.policies.enforce.iter().map(|(k, _)| k).collect();
    assert_eq!(names, ["script-src", "default-src"]);

    let headers = cspforge_core::Config::from(cfg.policies)
        .render(&Default::default())
        .unwrap();
    assert_eq!(
        headers.get(PolicyKind::Enforce),
        "script-src 'self' cdn.example.com;default-src 'self';"
    );
    assert_eq!(headers.get(PolicyKind::Report), "report-uri /csp-report;");
}

#[test]
fn unsupported_version_fails() {
    let err = config::load_from_str("version: 2\n").expect_err("must fail");
    assert_eq!(err.kind().as_str(), "INVALID_CONFIG");
}

#[test]
fn bad_listen_address_fails() {
    let bad = r#"
version: 1
gateway:
  listen: "localhost"
"#;
    let err = config::load_from_str(bad).expect_err("must fail");
    assert!(err.to_string().contains("gateway.listen"));
}

#[test]
fn invalid_startup_policy_fails_fast() {
    let bad = r#"
version: 1
policies:
  enforce:
    default-src: [none, example.com]
"#;
    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.kind().as_str(), "CONFLICTING_NONE_VALUE");
}
