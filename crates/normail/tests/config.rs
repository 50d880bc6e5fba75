//! Tests for loading pipelines from configuration.

use normail::{AliasPolicy, NormalizerConfig, PipelineError, ProviderRules};

#[test]
fn test_rewrite_policy_replaces_alias_domain() {
    let pipeline = NormalizerConfig::gmail().build().unwrap();
    assert_eq!(
        pipeline.normalize("A.B.C..D+001@googlemail.com"),
        "abcd@gmail.com"
    );
}

#[test]
fn test_share_policy_keeps_alias_domain() {
    let config = NormalizerConfig {
        alias_policy: AliasPolicy::Share,
        ..NormalizerConfig::gmail()
    };
    let pipeline = config.build().unwrap();

    assert_eq!(
        pipeline.normalize("A.B.C..D+001@googlemail.com"),
        "abcd@googlemail.com"
    );
    assert_eq!(pipeline.normalize("A.B+x@Gmail.com"), "ab@gmail.com");
    assert_eq!(
        pipeline.override_domains(),
        vec!["gmail.com".to_string(), "googlemail.com".to_string()]
    );
}

#[test]
fn test_load_from_json() {
    let config = NormalizerConfig::from_json(
        r#"{
            "aliases": { "ExampleMail.com": "Email.com" },
            "providers": {
                "EMAIL.com": { "tag": "-" },
                "dots.org": { "strip_dots": true }
            }
        }"#,
    )
    .unwrap();

    assert!(config.lowercase);
    assert_eq!(config.alias_policy, AliasPolicy::Rewrite);
    assert_eq!(
        config.providers["dots.org"],
        ProviderRules {
            strip_dots: true,
            tag: None,
        }
    );

    let pipeline = config.build().unwrap();
    assert_eq!(pipeline.normalize("A-b.c@examplemail.com"), "a@email.com");
    assert_eq!(pipeline.normalize("a.b-c@Dots.org"), "ab-c@dots.org");
    assert_eq!(pipeline.normalize("a.b-c@other.org"), "a.b-c@other.org");
}

#[test]
fn test_case_sensitive_config() {
    let config = NormalizerConfig::from_json(
        r#"{ "lowercase": false, "providers": { "Email.com": { "strip_dots": true } } }"#,
    )
    .unwrap();
    let pipeline = config.build().unwrap();

    assert_eq!(pipeline.normalize("A.B@Email.com"), "AB@Email.com");
    assert_eq!(pipeline.normalize("A.B@email.com"), "A.B@email.com");
}

#[test]
fn test_unknown_fields_are_rejected() {
    let err = NormalizerConfig::from_json(r#"{ "lowercase": true, "strip": true }"#).unwrap_err();
    assert!(matches!(err, PipelineError::InvalidConfig(_)));
    assert!(err.to_string().contains("unknown field `strip`"));
}

#[test]
fn test_provider_under_alias_and_target_collides() {
    let mut config = NormalizerConfig::gmail();
    config
        .providers
        .insert("googlemail.com".to_string(), ProviderRules::default());

    let err = config.build().unwrap_err();
    insta::assert_snapshot!(
        err,
        @r#"override domains "gmail.com" and "googlemail.com" both normalize to "gmail.com""#
    );
}

#[test]
fn test_chained_aliases_resolve_in_one_pass() {
    let pipeline = NormalizerConfig::from_json(
        r#"{
            "aliases": { "a.com": "b.com", "b.com": "c.com" },
            "providers": { "c.com": { "strip_dots": true } }
        }"#,
    )
    .unwrap()
    .build()
    .unwrap();

    let once = pipeline.normalize("x.y@a.com");
    assert_eq!(once, "xy@c.com");
    assert_eq!(pipeline.normalize(&once), once);
    assert_eq!(pipeline.normalize("x.y@B.com"), "xy@c.com");
}

#[test]
fn test_chained_aliases_share_final_provider_rules() {
    let config = NormalizerConfig::from_json(
        r#"{
            "alias_policy": "share",
            "aliases": { "a.com": "b.com", "b.com": "c.com" },
            "providers": { "c.com": { "strip_dots": true } }
        }"#,
    )
    .unwrap();
    let pipeline = config.build().unwrap();

    assert_eq!(pipeline.normalize("x.y@a.com"), "xy@a.com");
    assert_eq!(pipeline.normalize("x.y@b.com"), "xy@b.com");
}

#[test]
fn test_alias_cycle_is_rejected() {
    let config = NormalizerConfig::from_json(
        r#"{ "aliases": { "a.com": "b.com", "B.com": "A.com" } }"#,
    )
    .unwrap();

    let err = config.build().unwrap_err();
    assert!(matches!(err, PipelineError::AliasCycle { .. }));
    insta::assert_snapshot!(err, @r#"domain alias "b.com" leads into a cycle"#);
}
