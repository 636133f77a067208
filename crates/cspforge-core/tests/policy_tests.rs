#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use cspforge_core::{CspError, Directive, ErrorKind, Policy, PolicyState, RuleOp, Rules};

fn policy(pairs: &[(&str, &[&str])]) -> Policy {
    Policy::new(pairs.iter().map(|(k, v)| (*k, v.iter().copied())).collect())
}

fn parse_err(pairs: &[(&str, &[&str])]) -> CspError {
    policy(pairs).parse().map(|_| ()).expect_err("must fail")
}

#[test]
fn rules_are_stored_verbatim() {
    let p = policy(&[("default-src", &["self"])]);
    assert_eq!(p.rules().get("default-src"), Some(&["self".to_string()][..]));
    assert_eq!(p.state(), PolicyState::Unvalidated);
}

#[test]
fn clear_empties_the_policy() {
    let mut p = policy(&[("default-src", &["self"])]);
    p.clear();
    assert!(p.rules().is_empty());
    assert_eq!(p.raw_header_value().unwrap(), "");
}

#[test]
fn empty_policy_serializes_to_empty_string() {
    assert_eq!(Policy::default().raw_header_value().unwrap(), "");
}

#[test]
fn default_src_self_round_trip() {
    let mut p = policy(&[("default-src", &["self"])]);
    let header = p.parse().unwrap().raw_header_value().unwrap();
    assert_eq!(header, "default-src 'self';");
}

#[test]
fn serializing_before_parse_is_refused() {
    let p = policy(&[("default-src", &["self"])]);
    assert_eq!(p.raw_header_value().unwrap_err(), CspError::Unvalidated);
}

#[test]
fn mutation_invalidates_a_parsed_policy() {
    let mut p = policy(&[("default-src", &["self"])]);
    p.parse().unwrap();
    assert!(p.is_validated());

    p.add(Directive::ImgSrc, "img.example.com");
    assert_eq!(p.state(), PolicyState::Unvalidated);
    assert_eq!(p.raw_header_value().unwrap_err().kind(), ErrorKind::Unvalidated);
}

#[test]
fn empty_value_lists_are_omitted() {
    let mut p = policy(&[("default-src", &["self"]), ("img-src", &[]), ("font-src", &["fonts.example.com"])]);
    let header = p.parse().unwrap().raw_header_value().unwrap();
    assert_eq!(header, "default-src 'self';font-src fonts.example.com;");
}

#[test]
fn none_with_exceptions_conflicts() {
    let err = parse_err(&[("style-src", &["none", "example.com"])]);
    assert_eq!(err.kind(), ErrorKind::ConflictingNoneValue);
    assert_eq!(
        err.to_string(),
        "'none' denies all for 'style-src' directive, but exceptions are set"
    );
}

#[test]
fn duplicate_none_is_not_a_conflict() {
    let mut p = policy(&[("object-src", &["none", "none"])]);
    assert_eq!(p.parse().unwrap().raw_header_value().unwrap(), "object-src 'none';");
}

#[test]
fn wildcard_with_exceptions_conflicts() {
    let err = parse_err(&[("script-src", &["*", "example.com"])]);
    assert_eq!(err.kind(), ErrorKind::ConflictingWildcardValue);
    assert!(err.to_string().contains("script-src"));
}

#[test]
fn unknown_directive_is_rejected() {
    let err = parse_err(&[("nonexistent_directive", &["self"])]);
    assert_eq!(
        err,
        CspError::InvalidDirectiveName {
            directive: "nonexistent_directive".into()
        }
    );
}

#[test]
fn sandbox_rejects_source_keywords() {
    let err = parse_err(&[("sandbox", &["self"])]);
    assert_eq!(err.kind(), ErrorKind::InvalidSandboxKeyword);
    assert!(err.to_string().contains("'self'"));
}

#[test]
fn sandbox_tokens_are_rendered_unquoted() {
    let mut p = policy(&[("sandbox", &["allow-forms", "allow-same-origin"])]);
    let header = p.parse().unwrap().raw_header_value().unwrap();
    assert_eq!(header, "sandbox allow-forms allow-same-origin;");
}

#[test]
fn invalid_source_value_names_directive_and_value() {
    let err = parse_err(&[("default-src", &["**"])]);
    assert_eq!(
        err,
        CspError::InvalidSourceValue {
            directive: "default-src".into(),
            value: "**".into()
        }
    );
}

#[test]
fn invalid_report_uri_is_rejected() {
    let err = parse_err(&[("report-uri", &["not_uri"])]);
    assert_eq!(
        err.to_string(),
        "'not_uri' is an invalid 'report-uri' value, must be of type RFC 3986"
    );
}

#[test]
fn report_uri_none_is_not_a_keyword() {
    let err = parse_err(&[("report-uri", &["none"])]);
    assert_eq!(err.kind(), ErrorKind::InvalidReportUri);
}

#[test]
fn failed_parse_leaves_rules_untouched() {
    let mut p = policy(&[("default-src", &["self", "self"]), ("img-src", &["**"])]);
    let before = p.rules().clone();
    assert!(p.parse().is_err());
    assert_eq!(p.rules(), &before);
    assert_eq!(p.state(), PolicyState::Unvalidated);
}

#[test]
fn dedup_keeps_first_occurrence() {
    let mut p = policy(&[("script-src", &["cdn.example.com", "self", "cdn.example.com", "'self'"])]);
    let header = p.parse().unwrap().raw_header_value().unwrap();
    assert_eq!(header, "script-src cdn.example.com 'self';");
}

#[test]
fn parse_is_idempotent() {
    let mut p = policy(&[("default-src", &["self", "example.com"])]);
    p.parse().unwrap();
    let first = p.raw_header_value().unwrap();
    p.replace_rules("default-src", p.rules().get("default-src").unwrap().to_vec());
    let second = p.parse().unwrap().raw_header_value().unwrap();
    assert_eq!(first, second);
    assert_eq!(second, "default-src 'self' example.com;");
}

#[test]
fn directives_keep_insertion_order() {
    let mut p = policy(&[("script-src", &["self"]), ("default-src", &["none"]), ("report-uri", &["/r"])]);
    let header = p.parse().unwrap().raw_header_value().unwrap();
    assert_eq!(header, "script-src 'self';default-src 'none';report-uri /r;");
}

#[test]
fn replace_and_add_every_directive() {
    let mut p = policy(&[
        ("report-uri", &["none"]),
        ("sandbox", &["none"]),
        ("connect-src", &["none"]),
        ("default-src", &["none"]),
        ("font-src", &["none"]),
        ("frame-src", &["none"]),
        ("img-src", &["none"]),
        ("media-src", &["none"]),
        ("object-src", &["none"]),
        ("script-src", &["none"]),
        ("style-src", &["none"]),
    ]);

    for d in Directive::ALL {
        let values = match d {
            Directive::ReportUri => vec![format!("replace-{d}.example.com")],
            Directive::Sandbox => vec!["allow-forms".to_string()],
            _ => vec![format!("replace-{d}.example.com"), "self".to_string()],
        };
        p.apply(d, RuleOp::Replace(values));
    }
    for d in Directive::ALL {
        match d {
            Directive::ConnectSrc => {}
            Directive::Sandbox => {
                p.add(d, "allow-same-origin");
            }
            _ => {
                p.add(d, format!("add-{d}.example.com"));
            }
        }
    }

    let header = p.parse().unwrap().raw_header_value().unwrap();
    assert_eq!(
        header,
        "report-uri replace-report-uri.example.com add-report-uri.example.com;\
         sandbox allow-forms allow-same-origin;\
         connect-src replace-connect-src.example.com 'self';\
         default-src replace-default-src.example.com 'self' add-default-src.example.com;\
         font-src replace-font-src.example.com 'self' add-font-src.example.com;\
         frame-src replace-frame-src.example.com 'self' add-frame-src.example.com;\
         img-src replace-img-src.example.com 'self' add-img-src.example.com;\
         media-src replace-media-src.example.com 'self' add-media-src.example.com;\
         object-src replace-object-src.example.com 'self' add-object-src.example.com;\
         script-src replace-script-src.example.com 'self' add-script-src.example.com;\
         style-src replace-style-src.example.com 'self' add-style-src.example.com;"
    );
}

#[test]
fn replace_sugar_goes_through_validation() {
    let mut p = Policy::default();
    p.replace(Directive::ScriptSrc, ["self", "unsafe-eval", "none"]);
    assert_eq!(p.parse().map(|_| ()).unwrap_err().kind(), ErrorKind::ConflictingNoneValue);
}

#[test]
fn rules_deserialize_in_document_order() {
    let rules: Rules =
        serde_json::from_str(r#"{"style-src": ["self"], "default-src": "none", "img-src": []}"#).unwrap();
    let names: Vec<&str> = rules.iter().map(|(k, _)| k).collect();
    assert_eq!(names, ["style-src", "default-src", "img-src"]);
    assert_eq!(rules.get("default-src"), Some(&["none".to_string()][..]));
}
