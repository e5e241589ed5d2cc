#![expect(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only assertions use unwrap/expect for clarity."
)]

//! Reading fixtures from the filesystem through a bound suite.

mod common;

use std::collections::BTreeMap;

use artifact_kit::prelude::*;
use artifact_kit::usecases::ports::CodecError;
use common::TestData;
use serde::Deserialize;

#[derive(Debug, PartialEq, Deserialize)]
struct Page<T> {
    items: Vec<T>,
    total: u32,
}

#[allow(dead_code)]
struct NestedTest;

fn sample_class() -> ClassMetadata {
    ClassMetadata::new("SampleTest").suite(SuiteSpec::new("plain"))
}

#[test]
fn reads_input_for_bound_suite_and_test_case() {
    let kit = common::kit();
    let mut binder = kit.binder(sample_class());
    binder.post_process_instance().unwrap();

    let data = binder
        .run(&MethodMetadata::test("basic"), |ctx| {
            assert_eq!(ctx.suite, "plain/SampleTest");
            kit.fixtures().read_input::<TestData>(&ctx.test_case)
        })
        .unwrap()
        .unwrap();

    assert_eq!(data, TestData::new("abc", "hi"));
}

#[test]
fn expected_artifact_decodes_regardless_of_formatting() {
    let kit = common::kit();
    let fixtures = kit.fixtures();
    fixtures.set_suite(Some("plain/SampleTest"));

    let expected: TestData = fixtures.read_expected("basic").unwrap();
    let raw = fixtures.read_expected_string_for::<TestData>("basic").unwrap();

    assert_eq!(expected, TestData::new("abc", "hi"));
    assert!(raw.contains('\n'));
}

#[test]
fn suite_without_class_name_and_nested_suite() {
    let kit = common::kit();

    let mut nested = kit.binder(
        ClassMetadata::of::<NestedTest>().suite(SuiteSpec::new("service/impl")),
    );
    nested.post_process_instance().unwrap();
    assert_eq!(nested.suite(), Some("service/impl/NestedTest"));
    let data = nested
        .run(&MethodMetadata::test("basic"), |ctx| {
            kit.fixtures().read_input::<TestData>(&ctx.test_case)
        })
        .unwrap()
        .unwrap();
    assert_eq!(data.id, "nested");

    let mut bare = kit.binder(
        ClassMetadata::new("Ignored").suite(SuiteSpec::new("plain/SampleTest").append_class_name(false)),
    );
    bare.post_process_instance().unwrap();
    assert_eq!(bare.suite(), Some("plain/SampleTest"));
}

#[test]
fn class_name_is_the_default_suite() {
    let kit = common::kit();
    let mut binder = kit.binder(ClassMetadata::new("DefaultSuiteTest"));
    binder.post_process_instance().unwrap();

    let data = binder
        .run(&MethodMetadata::test("basic"), |ctx| {
            kit.fixtures().read_input::<TestData>(&ctx.test_case)
        })
        .unwrap()
        .unwrap();

    assert_eq!(data, TestData::new("default", "class name suite"));
}

#[test]
fn explicit_test_case_overrides_method_name() {
    let kit = common::kit();
    let mut binder = kit.binder(sample_class());
    binder.post_process_instance().unwrap();
    let method = MethodMetadata::test("shouldUseCustomCase").test_case("custom-case");

    let data = binder
        .run(&method, |ctx| {
            assert_eq!(ctx.method, "shouldUseCustomCase");
            kit.fixtures().read_input::<TestData>(&ctx.test_case)
        })
        .unwrap()
        .unwrap();

    assert_eq!(data, TestData::new("custom", "override"));
}

#[test]
fn renamed_artifacts_and_custom_kinds() {
    let kit = common::kit();
    let fixtures = kit.fixtures();
    fixtures.set_suite(Some("plain/SampleTest"));

    let input: TestData = fixtures.read_input_named("renamed", "Renamed.json").unwrap();
    let expected: TestData = fixtures
        .read_expected_named("renamed", "Renamed.json")
        .unwrap();
    let custom: TestData = fixtures
        .read_object("renamed", ArtifactKind::custom("test"), "TestData.json")
        .unwrap();

    assert_eq!(input.content, "renamed input");
    assert_eq!(expected.content, "renamed expected");
    assert_eq!(custom, TestData::new("t1", "custom kind"));
}

#[test]
fn generic_types_are_named_after_outer_type() {
    let kit = common::kit();
    let fixtures = kit.fixtures();
    fixtures.set_suite(Some("plain/SampleTest"));

    let list: Vec<TestData> = fixtures.read_input("generic").unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[1], TestData::new("b", "2"));

    let map: BTreeMap<String, Vec<TestData>> = fixtures.read_expected("generic").unwrap();
    assert_eq!(map["a"], vec![TestData::new("a", "1")]);
    assert!(map["b"].is_empty());
}

#[test]
fn type_ref_reads_use_the_descriptor_name() {
    let kit = common::kit();
    let fixtures = kit.fixtures();
    fixtures.set_suite(Some("plain/SampleTest"));

    let page_ref = TypeRef::<Page<TestData>>::parameterized(
        "Page",
        vec![TypeDescriptor::plain("TestData")],
    )
    .unwrap();
    assert_eq!(fixtures.artifact_file_name_of(page_ref.descriptor()), "Page.json");

    let page = fixtures.read_input_as("generic", &page_ref).unwrap();
    assert_eq!(
        page,
        Page {
            items: vec![TestData::new("a", "1")],
            total: 1,
        }
    );

    let inferred = TypeRef::<Page<TestData>>::new();
    let same = fixtures.read_input_as("generic", &inferred).unwrap();
    assert_eq!(same.total, 1);
}

#[test]
fn raw_type_ref_is_rejected() {
    let err = TypeRef::<Page<TestData>>::parameterized("Page", Vec::new())
        .err()
        .unwrap();
    assert!(matches!(err, ConfigurationError::RawTypeDescriptor { .. }));
}

#[test]
fn artifact_path_points_into_resource_root() {
    let kit = common::kit();
    let path = kit
        .fixtures()
        .artifact_path(
            "plain/SampleTest",
            "basic",
            ArtifactKind::input(),
            &artifact_file_name::<TestData>(),
        )
        .unwrap();

    assert_eq!(
        path,
        common::resources_dir().join("plain/SampleTest/basic/input/TestData.json")
    );
    assert!(path.is_file());
}

#[test]
fn resource_roots_are_searched_in_order() {
    common::init_test_tracing();
    let overlay = tempfile::TempDir::new().unwrap();
    let case_dir = overlay.path().join("plain/SampleTest/basic/input");
    std::fs::create_dir_all(&case_dir).unwrap();
    std::fs::write(
        case_dir.join("TestData.json"),
        r#"{"id":"overlay","content":"first root wins"}"#,
    )
    .unwrap();

    let kit = ArtifactKit::builder()
        .resource_roots([overlay.path().to_path_buf(), common::resources_dir()])
        .build();
    let fixtures = kit.fixtures();

    fixtures.set_suite(Some("plain/SampleTest"));
    let data: TestData = fixtures.read_input("basic").unwrap();
    assert_eq!(data.id, "overlay");

    // Only the first root holding the suite is consulted.
    let err = fixtures.read_input::<TestData>("custom-case").unwrap_err();
    assert_eq!(err.kind(), "not_found");

    fixtures.set_suite(Some("service/impl/NestedTest"));
    let nested: TestData = fixtures.read_input("basic").unwrap();
    assert_eq!(nested.id, "nested");
}

#[test]
fn missing_artifact_is_not_found() {
    let kit = common::kit();
    let fixtures = kit.fixtures();
    fixtures.set_suite(Some("plain/SampleTest"));

    let err = fixtures.read_input::<TestData>("doesNotExist").unwrap_err();
    assert_eq!(err.kind(), "not_found");
    assert!(err.to_string().contains("doesNotExist"));

    fixtures.set_suite(Some("no/SuchSuite"));
    let err = fixtures.read_input::<TestData>("basic").unwrap_err();
    assert_eq!(err.kind(), "not_found");
}

#[test]
fn malformed_artifact_reports_position() {
    let kit = common::kit();
    let fixtures = kit.fixtures();
    fixtures.set_suite(Some("plain/SampleTest"));

    let err = fixtures.read_input::<TestData>("broken").unwrap_err();
    match err {
        FixtureError::Codec(CodecError::Decode { target, line, .. }) => {
            assert!(target.contains("TestData"));
            assert!(line >= 1);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn reading_without_suite_is_illegal_state() {
    let kit = common::kit();
    let fixtures = kit.fixtures();
    fixtures.clear_suite();

    let err = fixtures.read_input::<TestData>("basic").unwrap_err();
    assert!(matches!(err, FixtureError::IllegalState(_)));
    assert_eq!(err.to_string(), "Illegal state: Suite property is not set");
}
