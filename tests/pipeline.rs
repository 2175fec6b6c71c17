use std::sync::Arc;

use driftnorm::pipeline::{DefaultSuppression, RepresentationReconciler, RestApiExpander};
use driftnorm::resource::aws::{
    AWS_API_GATEWAY_DOMAIN_NAME, AWS_API_GATEWAY_RESOURCE, AWS_API_GATEWAY_REST_API,
    AWS_API_GATEWAY_V2_DOMAIN_NAME, AWS_IAM_POLICY_ATTACHMENT, AWS_IAM_ROLE, AWS_IAM_ROLE_POLICY,
};
use driftnorm::{
    Attributes, DefaultResourceFactory, GlobMatcher, Pipeline, PipelineOptions, Resource, Stage,
    StageError, snapshot,
};
use serde_json::json;

fn attrs(pairs: &[(&str, serde_json::Value)]) -> Attributes {
    pairs.iter().cloned().collect()
}

fn v1(id: &str) -> Resource {
    Resource::new(AWS_API_GATEWAY_DOMAIN_NAME, id)
}

fn v2(id: &str) -> Resource {
    Resource::new(AWS_API_GATEWAY_V2_DOMAIN_NAME, id)
}

fn standard(strict_mode: bool) -> Pipeline {
    Pipeline::standard(
        Arc::new(DefaultResourceFactory),
        PipelineOptions { strict_mode },
    )
}

fn run(observed: &mut Vec<Resource>, declared: &mut Vec<Resource>) {
    standard(false).execute(observed, declared).unwrap();
}

#[test]
fn test_expansion_adds_root_resource() {
    let mut observed = Vec::new();
    let mut declared = vec![
        Resource::new(AWS_API_GATEWAY_REST_API, "foo")
            .with_attributes(attrs(&[("root_resource_id", json!("bar"))])),
    ];

    run(&mut observed, &mut declared);

    assert_eq!(declared.len(), 2);
    assert_eq!(declared[1].kind(), AWS_API_GATEWAY_RESOURCE);
    assert_eq!(declared[1].identifier(), "bar");
}

#[test]
fn test_expansion_skips_empty_or_missing_reference() {
    let mut declared = vec![
        Resource::new(AWS_API_GATEWAY_REST_API, "foo")
            .with_attributes(attrs(&[("root_resource_id", json!(""))])),
        Resource::new(AWS_API_GATEWAY_REST_API, "baz"),
    ];
    let before = declared.clone();

    run(&mut Vec::new(), &mut declared);

    assert_eq!(declared, before);
}

#[test]
fn test_reconciliation_scenarios() {
    let cases = vec![
        (
            "managed duplicates",
            vec![v1("domain1"), v2("domain2")],
            vec![v1("domain1"), v2("domain1"), v1("domain2"), v2("domain2")],
            vec![v1("domain1"), v2("domain2")],
        ),
        (
            "unmanaged duplicates default to v1",
            vec![],
            vec![v1("domain1"), v2("domain1"), v1("domain2"), v2("domain2")],
            vec![v1("domain1"), v1("domain2")],
        ),
        (
            "full deletion",
            vec![v1("domain1"), v2("domain2")],
            vec![],
            vec![],
        ),
        (
            "mixed",
            vec![v1("domain1"), v2("domain2"), v1("domain4")],
            vec![
                v1("domain1"),
                v2("domain1"),
                v1("domain2"),
                v2("domain2"),
                v1("domain3"),
                v2("domain3"),
            ],
            vec![v1("domain1"), v2("domain2"), v1("domain3")],
        ),
    ];

    for (name, mut declared, mut observed, expected) in cases {
        run(&mut observed, &mut declared);
        assert_eq!(observed, expected, "case: {name}");
    }
}

#[test]
fn test_default_service_role_family_suppressed_together() {
    let service_role = Resource::new(AWS_IAM_ROLE, "AWSServiceRoleForSSO")
        .with_attributes(attrs(&[("path", json!("/aws-service-role/sso.amazonaws.com"))]));
    let user_role = Resource::new(AWS_IAM_ROLE, "app")
        .with_attributes(attrs(&[("path", json!("/"))]));

    let mut observed = vec![
        service_role,
        Resource::new(AWS_IAM_ROLE_POLICY, "AWSServiceRoleForSSO:inline")
            .with_attributes(attrs(&[("role", json!("AWSServiceRoleForSSO"))])),
        Resource::new(AWS_IAM_POLICY_ATTACHMENT, "AWSServiceRoleForSSO-policy")
            .with_attributes(attrs(&[("roles", json!(["AWSServiceRoleForSSO"]))])),
        user_role.clone(),
        Resource::new(AWS_IAM_ROLE_POLICY, "app:inline")
            .with_attributes(attrs(&[("role", json!("app"))])),
    ];
    let mut declared = vec![user_role.clone()];

    run(&mut observed, &mut declared);

    let ids: Vec<_> = observed.iter().map(Resource::identifier).collect();
    assert_eq!(ids, vec!["app", "app:inline"]);
}

#[test]
fn test_strict_mode_keeps_defaults() {
    let mut observed = vec![
        Resource::new(AWS_IAM_ROLE, "AWSServiceRoleForSSO")
            .with_attributes(attrs(&[("path", json!("/aws-service-role/sso.amazonaws.com"))])),
    ];
    standard(true)
        .execute(&mut observed, &mut Vec::new())
        .unwrap();
    assert_eq!(observed.len(), 1);
}

#[test]
fn test_declared_resources_never_suppressed() {
    let role = Resource::new(AWS_IAM_ROLE, "AWSServiceRoleForSSO")
        .with_attributes(attrs(&[("path", json!("/aws-service-role/sso.amazonaws.com"))]));
    let policy = Resource::new(AWS_IAM_ROLE_POLICY, "AWSServiceRoleForSSO:inline")
        .with_attributes(attrs(&[("role", json!("AWSServiceRoleForSSO"))]));

    let mut observed = vec![role.clone(), policy.clone()];
    let mut declared = vec![
        Resource::new(AWS_IAM_ROLE, "AWSServiceRoleForSSO"),
        Resource::new(AWS_IAM_ROLE_POLICY, "AWSServiceRoleForSSO:inline"),
    ];

    run(&mut observed, &mut declared);

    assert_eq!(observed, vec![role, policy]);
}

#[test]
fn test_pipeline_is_idempotent_on_its_output() {
    let mut observed = snapshot::parse(
        r#"[
            {"id": "AWSServiceRoleForSupport", "type": "aws_iam_role", "attributes": {"path": "/aws-service-role/support.amazonaws.com"}},
            {"id": "AWSServiceRoleForSupport:p", "type": "aws_iam_role_policy", "attributes": {"role": "AWSServiceRoleForSupport"}},
            {"id": "admin", "type": "aws_iam_role", "attributes": {"path": "/"}},
            {"id": "attach", "type": "aws_iam_policy_attachment", "attributes": {"roles": ["admin", "AWSServiceRoleForSupport"]}},
            {"id": "api.example.com", "type": "aws_api_gateway_domain_name"},
            {"id": "api.example.com", "type": "aws_apigatewayv2_domain_name"},
            {"id": "bar", "type": "aws_api_gateway_resource"}
        ]"#,
        "observed",
    )
    .unwrap();
    let mut declared = snapshot::parse(
        r#"[
            {"id": "foo", "type": "aws_api_gateway_rest_api", "attributes": {"root_resource_id": "bar"}},
            {"id": "api.example.com", "type": "aws_apigatewayv2_domain_name"}
        ]"#,
        "declared",
    )
    .unwrap();

    run(&mut observed, &mut declared);
    let (observed_once, declared_once) = (observed.clone(), declared.clone());
    let report = standard(false).execute(&mut observed, &mut declared).unwrap();

    assert_eq!(observed, observed_once);
    assert_eq!(declared, declared_once);
    assert!(report.stages.iter().all(|s| s.is_noop()));

    let ids: Vec<_> = observed
        .iter()
        .map(|r| (r.kind(), r.identifier()))
        .collect();
    assert_eq!(
        ids,
        vec![
            ("aws_iam_role", "admin"),
            ("aws_iam_policy_attachment", "attach"),
            ("aws_apigatewayv2_domain_name", "api.example.com"),
            ("aws_api_gateway_resource", "bar"),
        ]
    );
}

#[test]
fn test_bad_pattern_aborts_pipeline() {
    let mut pipeline = Pipeline::default();
    pipeline.push(DefaultSuppression::new(
        AWS_IAM_ROLE,
        driftnorm::pipeline::RoleLinkage::OwnPath,
        "/aws-service-role/[",
        Arc::new(GlobMatcher),
    ));
    pipeline.push(RestApiExpander::new(Arc::new(DefaultResourceFactory)));

    let mut observed = vec![
        Resource::new(AWS_IAM_ROLE, "r").with_attributes(attrs(&[("path", json!("/"))])),
    ];
    let mut declared = vec![
        Resource::new(AWS_API_GATEWAY_REST_API, "foo")
            .with_attributes(attrs(&[("root_resource_id", json!("bar"))])),
    ];

    let err = pipeline.execute(&mut observed, &mut declared).unwrap_err();

    assert!(matches!(err, StageError::PatternMatch(_)));
    assert_eq!(declared.len(), 1, "later stages must not run");
}

#[test]
fn test_custom_pipeline_from_stages() {
    let stages: Vec<Box<dyn Stage>> = vec![Box::new(RepresentationReconciler::domain_names())];
    let pipeline = Pipeline::new(stages);
    let mut observed = vec![v2("d"), v1("d")];
    pipeline.execute(&mut observed, &mut Vec::new()).unwrap();
    assert_eq!(observed, vec![v1("d")]);
}
