mod support;

use std::sync::Arc;
use std::time::{Duration, Instant};

use mqa_core::namespaces::{dcat, dct, rdfs};
use mqa_core::{ComplianceLevel, Graph};
use mqa_eval::{
    Checker, CheckerError, HttpProbe, ProbeMethod, ReachabilityPolicy, ResourceResolver,
    UnavailableConformanceEngine, VocabularyId, compliance, is_reachable,
};
use mqa_load::{RdfFormat, parse_graph};

use support::{Answer, FixedConformance, Fixtures, ScriptedProbe, catalog_graph};

const FILE_TYPES: &str = "uri,code,label\n\
http://publications.europa.eu/resource/authority/file-type/CSV,CSV,CSV\n\
http://publications.europa.eu/resource/authority/file-type/JSON,JSON,JSON\n";

fn distributions(graph: &Graph) -> Vec<mqa_core::Term> {
    ResourceResolver::new(graph).distributions().to_vec()
}

fn offline() -> Arc<ScriptedProbe> {
    Arc::new(ScriptedProbe::default())
}

#[tokio::test]
async fn reachability_counts_only_successful_urls() {
    let fixtures = Fixtures::new();
    let graph = catalog_graph();
    let probe = Arc::new(ScriptedProbe::new(&[
        ("http://files.example.org/air.csv", Answer::Status(200)),
        ("http://files.example.org/broken.csv", Answer::Refused),
    ]));
    let ctx = fixtures.context(
        &fixtures.options(),
        probe,
        Arc::new(UnavailableConformanceEngine),
    );

    let outcome = Checker::url(dcat::ACCESS_URL, dcat::DISTRIBUTION)
        .check(&graph, &distributions(&graph), &ctx)
        .await
        .expect("url check");
    assert_eq!(outcome, (1, 2));
}

#[tokio::test]
async fn missing_urls_give_an_empty_population() {
    let fixtures = Fixtures::new();
    let graph = catalog_graph();
    let ctx = fixtures.context(
        &fixtures.options(),
        offline(),
        Arc::new(UnavailableConformanceEngine),
    );

    let outcome = Checker::url(dcat::DOWNLOAD_URL, dcat::DISTRIBUTION)
        .check(&graph, &[], &ctx)
        .await
        .expect("url check");
    assert_eq!(outcome, (0, 0));
}

#[tokio::test]
async fn rejected_head_falls_back_to_get() {
    let probe = ScriptedProbe::new(&[("http://files.example.org/get-only", Answer::GetOnly)]);
    let policy = ReachabilityPolicy::default();

    assert!(is_reachable(&probe, "files.example.org/get-only", &policy).await);
    let methods: Vec<ProbeMethod> = probe.calls().into_iter().map(|(method, ..)| method).collect();
    assert_eq!(methods, vec![ProbeMethod::Head, ProbeMethod::Get]);
}

#[tokio::test]
async fn certificate_failures_downgrade_only_when_allowed() {
    let url = "https://self-signed.example.org/data.csv";
    let strict = ScriptedProbe::new(&[(url, Answer::BadCertificate)]);
    let policy = ReachabilityPolicy::default();
    assert!(!is_reachable(&strict, url, &policy).await);
    assert!(strict.calls().iter().all(|(_, _, verify)| *verify));

    let lenient = ScriptedProbe::new(&[(url, Answer::BadCertificate)]);
    let policy = ReachabilityPolicy {
        allow_insecure: true,
        ..ReachabilityPolicy::default()
    };
    assert!(is_reachable(&lenient, url, &policy).await);
    let calls = lenient.calls();
    assert_eq!(calls.last().map(|(_, _, verify)| *verify), Some(false));
}

#[tokio::test]
async fn stalled_urls_count_as_unreachable_at_the_deadline() {
    let fixtures = Fixtures::new();
    let graph = catalog_graph();
    let probe = Arc::new(ScriptedProbe::new(&[
        ("http://files.example.org/air.csv", Answer::Status(200)),
        ("http://files.example.org/broken.csv", Answer::Hang),
    ]));
    let mut options = fixtures.options();
    options.reachability.deadline_secs = 1;
    let ctx = fixtures.context(&options, probe, Arc::new(UnavailableConformanceEngine));

    let started = Instant::now();
    let outcome = Checker::url(dcat::ACCESS_URL, dcat::DISTRIBUTION)
        .check(&graph, &distributions(&graph), &ctx)
        .await
        .expect("deadline keeps finished probes");

    assert_eq!(outcome, (1, 2));
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn expired_deadline_skips_url_checks() {
    let fixtures = Fixtures::new();
    let graph = catalog_graph();
    let probe = Arc::new(ScriptedProbe::new(&[(
        "http://files.example.org/air.csv",
        Answer::Status(200),
    )]));
    let mut options = fixtures.options();
    options.reachability.deadline_secs = 0;
    let ctx = fixtures.context(
        &options,
        Arc::clone(&probe) as Arc<dyn HttpProbe>,
        Arc::new(UnavailableConformanceEngine),
    );

    let outcome = Checker::url(dcat::ACCESS_URL, dcat::DISTRIBUTION)
        .check(&graph, &distributions(&graph), &ctx)
        .await
        .expect("expired deadline");

    assert_eq!(outcome, (0, 2));
    assert!(probe.calls().is_empty());
}

#[tokio::test]
async fn vocabulary_compliance_counts_known_uris() {
    let fixtures = Fixtures::new();
    fixtures.write_vocabulary("licenses.csv", "uri\nhttp://x/a\nhttp://x/b\n");
    let graph = catalog_graph();
    let ctx = fixtures.context(
        &fixtures.options(),
        offline(),
        Arc::new(UnavailableConformanceEngine),
    );

    let outcome = Checker::vocabulary(&[dct::LICENSE], VocabularyId::Licenses)
        .check(&graph, &distributions(&graph), &ctx)
        .await
        .expect("vocabulary check");
    assert_eq!(outcome, (1, 2));
}

#[tokio::test]
async fn missing_vocabulary_is_a_checker_error() {
    let fixtures = Fixtures::new();
    let graph = catalog_graph();
    let ctx = fixtures.context(
        &fixtures.options(),
        offline(),
        Arc::new(UnavailableConformanceEngine),
    );

    let err = Checker::vocabulary(&[dct::FORMAT], VocabularyId::NonProprietary)
        .check(&graph, &distributions(&graph), &ctx)
        .await
        .expect_err("no vocabulary file");
    assert!(matches!(err, CheckerError::Vocabulary { .. }));
}

#[tokio::test]
async fn label_compliance_accepts_literals_and_uri_fragments() {
    let fixtures = Fixtures::new();
    fixtures.write_vocabulary("file_types.csv", FILE_TYPES);
    let graph = catalog_graph();
    let resources = distributions(&graph);
    let ctx = fixtures.context(
        &fixtures.options(),
        offline(),
        Arc::new(UnavailableConformanceEngine),
    );

    let by_label =
        Checker::vocabulary_label(&[dct::FORMAT], VocabularyId::FileTypes, rdfs::LABEL)
            .check(&graph, &resources, &ctx)
            .await
            .expect("label check");
    assert_eq!(by_label, (2, 2));

    let by_uri = Checker::vocabulary(&[dct::FORMAT], VocabularyId::FileTypes)
        .check(&graph, &resources, &ctx)
        .await
        .expect("uri check");
    assert_eq!(by_uri, (1, 2));
}

#[tokio::test]
async fn label_compliance_matches_whole_uri_segments_only() {
    let fixtures = Fixtures::new();
    fixtures.write_vocabulary("file_types.csv", "uri,label\nhttp://example.org/ft/TAR,TAR\n");
    let graph = parse_graph(
        r#"
@prefix dcat: <http://www.w3.org/ns/dcat#> .
@prefix dct: <http://purl.org/dc/terms/> .

<http://example.org/dist/a> a dcat:Distribution ;
    dct:format <http://example.org/formats/target-unknown> .

<http://example.org/dist/b> a dcat:Distribution ;
    dct:format <http://example.org/formats#tar> .
"#,
        RdfFormat::Turtle,
        None,
    )
    .expect("parse graph");
    let ctx = fixtures.context(
        &fixtures.options(),
        offline(),
        Arc::new(UnavailableConformanceEngine),
    );

    let outcome =
        Checker::vocabulary_label(&[dct::FORMAT], VocabularyId::FileTypes, rdfs::LABEL)
            .check(&graph, &distributions(&graph), &ctx)
            .await
            .expect("label check");
    assert_eq!(outcome, (1, 2));
}

#[tokio::test]
async fn typed_checkers_ignore_the_candidates() {
    let fixtures = Fixtures::new();
    let graph = catalog_graph();
    let ctx = fixtures.context(
        &fixtures.options(),
        offline(),
        Arc::new(UnavailableConformanceEngine),
    );

    let keyword = Checker::typed(dcat::KEYWORD, dcat::DATASET)
        .check(&graph, &[], &ctx)
        .await
        .expect("typed check");
    assert_eq!(keyword, (1, 1));

    let issued = Checker::multi_typed(dct::ISSUED, &[dcat::DATASET, dcat::DISTRIBUTION])
        .check(&graph, &[], &ctx)
        .await
        .expect("multi typed check");
    assert_eq!(issued, (1, 3));
}

#[tokio::test]
async fn compliance_is_binary_and_never_fails() {
    let fixtures = Fixtures::new();
    let graph = catalog_graph();
    let checker = Checker::ComplianceDelegate(compliance::dcat_ap_es_shapes());

    let no_shapes = fixtures.context(
        &fixtures.options(),
        offline(),
        Arc::new(FixedConformance::new(true)),
    );
    assert_eq!(
        checker.check(&graph, &[], &no_shapes).await.expect("delegate"),
        (0, 1)
    );

    fixtures.write_shapes("dcat-ap-es/1.0.0/shacl_common_shapes.ttl");
    let engine = Arc::new(FixedConformance::new(true));
    let conforming = fixtures.context(&fixtures.options(), offline(), engine.clone());
    assert_eq!(
        checker.check(&graph, &[], &conforming).await.expect("delegate"),
        (1, 1)
    );
    assert_eq!(engine.seen().len(), 1);

    let failing = fixtures.context(
        &fixtures.options(),
        offline(),
        Arc::new(UnavailableConformanceEngine),
    );
    assert_eq!(
        checker.check(&graph, &[], &failing).await.expect("delegate"),
        (0, 1)
    );
}

#[tokio::test]
async fn leveled_compliance_uses_the_requested_level() {
    let fixtures = Fixtures::new();
    fixtures.write_shapes("dcat-ap/2.1.1/dcat-ap_2.1.1_shacl_shapes_recommended.ttl");
    let graph = catalog_graph();
    let checker = Checker::LeveledComplianceDelegate(compliance::dcat_ap_shapes());

    let mut ctx = fixtures.context(
        &fixtures.options(),
        offline(),
        Arc::new(FixedConformance::new(true)),
    );
    ctx.level = ComplianceLevel::Level1;
    assert_eq!(
        checker.check(&graph, &[], &ctx).await.expect("level 1"),
        (0, 1)
    );

    ctx.level = ComplianceLevel::Level3;
    assert_eq!(
        checker.check(&graph, &[], &ctx).await.expect("level 3"),
        (1, 1)
    );
}
