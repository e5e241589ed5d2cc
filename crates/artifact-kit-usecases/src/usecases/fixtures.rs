//! Fixture facade: reads, parses and compares JSON artifacts of the bound
//! suite.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::RwLock;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::common::rwlock_read_or_recover;
use crate::common::rwlock_write_or_recover;
use crate::domain::Artifact;
use crate::domain::ArtifactKind;
use crate::domain::CompareMode;
use crate::domain::TypeDescriptor;
use crate::domain::TypeRef;
use crate::domain::default_artifact_name;
use crate::usecases::ports::Codec;
use crate::usecases::ports::CodecError;
use crate::usecases::ports::FixtureError;
use crate::usecases::ports::JsonComparator;
use crate::usecases::ports::ResourceRoot;
use crate::usecases::ports::SuiteBinding;

pub struct Fixtures<C: Codec> {
    suite: RwLock<Option<String>>,
    codec: C,
    resources: Arc<dyn ResourceRoot>,
    comparator: Arc<dyn JsonComparator>,
    default_mode: CompareMode,
}

impl<C: Codec> Fixtures<C> {
    pub fn new(
        codec: C,
        resources: Arc<dyn ResourceRoot>,
        comparator: Arc<dyn JsonComparator>,
    ) -> Self {
        Self {
            suite: RwLock::new(None),
            codec,
            resources,
            comparator,
            default_mode: CompareMode::default(),
        }
    }

    /// Mode used by `assert_equals` and `assert_equals_named`.
    pub fn with_default_mode(mut self, mode: CompareMode) -> Self {
        self.default_mode = mode;
        self
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    pub fn default_mode(&self) -> CompareMode {
        self.default_mode
    }

    /// The bound suite; `IllegalState` when unset or blank.
    pub fn suite(&self) -> Result<String, FixtureError> {
        match rwlock_read_or_recover(&self.suite).as_deref() {
            Some(suite) if !suite.trim().is_empty() => Ok(suite.to_string()),
            _ => Err(FixtureError::suite_not_set()),
        }
    }

    pub fn set_suite(&self, suite: Option<&str>) {
        *rwlock_write_or_recover(&self.suite) = suite.map(str::to_string);
    }

    pub fn clear_suite(&self) {
        self.set_suite(None);
    }

    pub fn artifact_file_name<T: ?Sized>(&self) -> String {
        self.artifact_file_name_of(&TypeDescriptor::of::<T>())
    }

    pub fn artifact_file_name_of(&self, descriptor: &TypeDescriptor) -> String {
        default_artifact_name(descriptor)
    }

    /// Locates `suite` once, then joins `test_case/kind/name` below it.
    pub fn artifact_path(
        &self,
        suite: &str,
        test_case: &str,
        kind: impl Into<ArtifactKind>,
        name: &str,
    ) -> Result<PathBuf, FixtureError> {
        let artifact = Artifact::new(suite, test_case, kind, name);
        let root = self.resources.locate(&artifact.suite)?;
        Ok(root.join(artifact.path_in_suite()))
    }

    fn read_bytes(
        &self,
        test_case: &str,
        kind: ArtifactKind,
        name: &str,
    ) -> Result<Vec<u8>, FixtureError> {
        let suite = self.suite()?;
        let path = self.artifact_path(&suite, test_case, kind, name)?;
        self.resources.read(&path)
    }

    fn decode_artifact<T: DeserializeOwned>(
        &self,
        test_case: &str,
        kind: ArtifactKind,
        name: &str,
        target: &TypeDescriptor,
    ) -> Result<T, FixtureError> {
        let bytes = self.read_bytes(test_case, kind, name)?;
        Ok(self.codec.decode_bytes(&bytes, target)?)
    }

    pub fn read_object<T: DeserializeOwned>(
        &self,
        test_case: &str,
        kind: impl Into<ArtifactKind>,
        name: &str,
    ) -> Result<T, FixtureError> {
        self.decode_artifact(test_case, kind.into(), name, &TypeDescriptor::of::<T>())
    }

    pub fn read_object_as<T: DeserializeOwned>(
        &self,
        test_case: &str,
        kind: impl Into<ArtifactKind>,
        name: &str,
        type_ref: &TypeRef<T>,
    ) -> Result<T, FixtureError> {
        self.decode_artifact(test_case, kind.into(), name, type_ref.descriptor())
    }

    /// Reads `input/{T}.json`.
    pub fn read_input<T: DeserializeOwned>(&self, test_case: &str) -> Result<T, FixtureError> {
        self.read_object(test_case, ArtifactKind::input(), &self.artifact_file_name::<T>())
    }

    pub fn read_input_named<T: DeserializeOwned>(
        &self,
        test_case: &str,
        name: &str,
    ) -> Result<T, FixtureError> {
        self.read_object(test_case, ArtifactKind::input(), name)
    }

    /// Reads `input/{Raw}.json` where `Raw` is the type ref's outer name.
    pub fn read_input_as<T: DeserializeOwned>(
        &self,
        test_case: &str,
        type_ref: &TypeRef<T>,
    ) -> Result<T, FixtureError> {
        let name = self.artifact_file_name_of(type_ref.descriptor());
        self.read_object_as(test_case, ArtifactKind::input(), &name, type_ref)
    }

    pub fn read_input_named_as<T: DeserializeOwned>(
        &self,
        test_case: &str,
        name: &str,
        type_ref: &TypeRef<T>,
    ) -> Result<T, FixtureError> {
        self.read_object_as(test_case, ArtifactKind::input(), name, type_ref)
    }

    pub fn read_expected<T: DeserializeOwned>(&self, test_case: &str) -> Result<T, FixtureError> {
        self.read_object(
            test_case,
            ArtifactKind::expected(),
            &self.artifact_file_name::<T>(),
        )
    }

    pub fn read_expected_named<T: DeserializeOwned>(
        &self,
        test_case: &str,
        name: &str,
    ) -> Result<T, FixtureError> {
        self.read_object(test_case, ArtifactKind::expected(), name)
    }

    pub fn read_expected_as<T: DeserializeOwned>(
        &self,
        test_case: &str,
        type_ref: &TypeRef<T>,
    ) -> Result<T, FixtureError> {
        let name = self.artifact_file_name_of(type_ref.descriptor());
        self.read_object_as(test_case, ArtifactKind::expected(), &name, type_ref)
    }

    pub fn read_expected_named_as<T: DeserializeOwned>(
        &self,
        test_case: &str,
        name: &str,
        type_ref: &TypeRef<T>,
    ) -> Result<T, FixtureError> {
        self.read_object_as(test_case, ArtifactKind::expected(), name, type_ref)
    }

    /// Raw artifact text, without decoding.
    pub fn read_string(
        &self,
        test_case: &str,
        kind: impl Into<ArtifactKind>,
        name: &str,
    ) -> Result<String, FixtureError> {
        let bytes = self.read_bytes(test_case, kind.into(), name)?;
        String::from_utf8(bytes).map_err(|e| {
            FixtureError::Codec(CodecError::Utf8 {
                target: name.to_string(),
                reason: e.utf8_error().to_string(),
            })
        })
    }

    pub fn read_input_string(&self, test_case: &str, name: &str) -> Result<String, FixtureError> {
        self.read_string(test_case, ArtifactKind::input(), name)
    }

    pub fn read_input_string_for<T: ?Sized>(&self, test_case: &str) -> Result<String, FixtureError> {
        self.read_input_string(test_case, &self.artifact_file_name::<T>())
    }

    pub fn read_expected_string(
        &self,
        test_case: &str,
        name: &str,
    ) -> Result<String, FixtureError> {
        self.read_string(test_case, ArtifactKind::expected(), name)
    }

    pub fn read_expected_string_for<T: ?Sized>(
        &self,
        test_case: &str,
    ) -> Result<String, FixtureError> {
        self.read_expected_string(test_case, &self.artifact_file_name::<T>())
    }

    pub fn parse<T: DeserializeOwned>(&self, json: &str) -> Result<T, FixtureError> {
        Ok(self.codec.decode(json, &TypeDescriptor::of::<T>())?)
    }

    pub fn parse_as<T: DeserializeOwned>(
        &self,
        json: &str,
        type_ref: &TypeRef<T>,
    ) -> Result<T, FixtureError> {
        Ok(self.codec.decode(json, type_ref.descriptor())?)
    }

    pub fn serialize<T: Serialize + ?Sized>(&self, value: &T) -> Result<String, FixtureError> {
        Ok(self.codec.encode(value)?)
    }

    /// Compares `actual` with `expected/{T}.json` in the default mode.
    pub fn assert_equals<T: Serialize>(&self, test_case: &str, actual: &T) -> Result<(), FixtureError> {
        let name = self.artifact_file_name::<T>();
        self.assert_equals_with(test_case, &name, actual, self.default_mode)
    }

    pub fn assert_equals_named<T: Serialize + ?Sized>(
        &self,
        test_case: &str,
        name: &str,
        actual: &T,
    ) -> Result<(), FixtureError> {
        self.assert_equals_with(test_case, name, actual, self.default_mode)
    }

    pub fn assert_equals_with<T: Serialize + ?Sized>(
        &self,
        test_case: &str,
        name: &str,
        actual: &T,
        mode: CompareMode,
    ) -> Result<(), FixtureError> {
        let expected = self.read_expected_string(test_case, name)?;
        let actual = self.serialize(actual)?;
        self.comparator.compare(&expected, &actual, mode)
    }
}

impl<C: Codec> SuiteBinding for Fixtures<C> {
    fn bound_suite(&self) -> Option<String> {
        self.suite().ok()
    }

    fn bind_suite(&self, suite: Option<&str>) {
        self.set_suite(suite);
    }
}
