//! Declarative configuration attached to test classes and test methods.
//!
//! Method-level settings override class-level ones; class-level settings
//! must opt in before method-level overrides are honored.

use crate::domain::artifact::ArtifactKind;
use crate::domain::type_descriptor::TypeDescriptor;

/// Suite prefix declared on a test class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuiteSpec {
    pub value: String,
    pub append_class_name: bool,
}

impl SuiteSpec {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            append_class_name: true,
        }
    }

    pub fn append_class_name(mut self, append: bool) -> Self {
        self.append_class_name = append;
        self
    }
}

/// Freezes the bound clock at `instant` (or the default instant).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixedClockSpec {
    pub instant: Option<String>,
}

impl FixedClockSpec {
    pub const DEFAULT_INSTANT: &'static str = "2025-01-10T12:30:15.123Z";

    pub fn at(instant: impl Into<String>) -> Self {
        Self {
            instant: Some(instant.into()),
        }
    }

    pub fn instant(&self) -> &str {
        self.instant.as_deref().unwrap_or(Self::DEFAULT_INSTANT)
    }
}

/// Mock HTTP server attached to a test class; port 0 picks a free port.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MockServerSpec {
    pub port: u16,
}

impl MockServerSpec {
    pub fn on_port(port: u16) -> Self {
        Self { port }
    }
}

/// A response served by the mock server, read from an artifact of the
/// current test case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnqueueResponse {
    pub kind: ArtifactKind,
    pub response_type: Option<TypeDescriptor>,
    pub artifact_name: Option<String>,
    pub status: u16,
    pub content_type: String,
}

impl EnqueueResponse {
    pub const DEFAULT_CONTENT_TYPE: &'static str = "application/json";

    fn empty() -> Self {
        Self {
            kind: ArtifactKind::input(),
            response_type: None,
            artifact_name: None,
            status: 200,
            content_type: Self::DEFAULT_CONTENT_TYPE.to_string(),
        }
    }

    /// Response body read from the artifact named after `T`.
    pub fn of<T: ?Sized>() -> Self {
        Self {
            response_type: Some(TypeDescriptor::of::<T>()),
            ..Self::empty()
        }
    }

    pub fn of_descriptor(descriptor: TypeDescriptor) -> Self {
        Self {
            response_type: Some(descriptor),
            ..Self::empty()
        }
    }

    pub fn named(artifact_name: impl Into<String>) -> Self {
        Self {
            artifact_name: Some(artifact_name.into()),
            ..Self::empty()
        }
    }

    /// Declaration with neither a type nor an artifact name.
    pub fn unnamed() -> Self {
        Self::empty()
    }

    pub fn kind(mut self, kind: impl Into<ArtifactKind>) -> Self {
        self.kind = kind.into();
        self
    }

    pub fn status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// A blank content type sends no `Content-Type` header.
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodMetadata {
    pub name: String,
    pub is_test: bool,
    pub test_case: Option<String>,
    pub fixed_clock: Option<FixedClockSpec>,
    pub enqueue: Vec<EnqueueResponse>,
    pub mock_server_opt_out: bool,
}

impl MethodMetadata {
    pub fn test(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_test: true,
            test_case: None,
            fixed_clock: None,
            enqueue: Vec::new(),
            mock_server_opt_out: false,
        }
    }

    /// A non-test method (helpers, setup); ignored when latching clock usage.
    pub fn helper(name: impl Into<String>) -> Self {
        Self {
            is_test: false,
            ..Self::test(name)
        }
    }

    pub fn test_case(mut self, test_case: impl Into<String>) -> Self {
        self.test_case = Some(test_case.into());
        self
    }

    pub fn fixed_clock(mut self, spec: FixedClockSpec) -> Self {
        self.fixed_clock = Some(spec);
        self
    }

    pub fn enqueue(mut self, response: EnqueueResponse) -> Self {
        self.enqueue.push(response);
        self
    }

    pub fn without_mock_server(mut self) -> Self {
        self.mock_server_opt_out = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassMetadata {
    pub name: String,
    pub suite: Option<SuiteSpec>,
    pub fixed_clock: Option<FixedClockSpec>,
    pub mock_server: Option<MockServerSpec>,
    pub methods: Vec<MethodMetadata>,
}

impl ClassMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            suite: None,
            fixed_clock: None,
            mock_server: None,
            methods: Vec::new(),
        }
    }

    /// Names the class after `T`'s simple name.
    pub fn of<T: ?Sized>() -> Self {
        Self::new(TypeDescriptor::of::<T>().simple_name())
    }

    pub fn suite(mut self, spec: SuiteSpec) -> Self {
        self.suite = Some(spec);
        self
    }

    pub fn fixed_clock(mut self, spec: FixedClockSpec) -> Self {
        self.fixed_clock = Some(spec);
        self
    }

    pub fn mock_server(mut self, spec: MockServerSpec) -> Self {
        self.mock_server = Some(spec);
        self
    }

    pub fn method(mut self, method: MethodMetadata) -> Self {
        self.methods.push(method);
        self
    }

    pub fn find_method(&self, name: &str) -> Option<&MethodMetadata> {
        self.methods.iter().find(|method| method.name == name)
    }

    /// Whether the class or any of its test methods asks for a fixed clock.
    pub fn uses_fixed_clock(&self) -> bool {
        self.fixed_clock.is_some()
            || self
                .methods
                .iter()
                .any(|method| method.is_test && method.fixed_clock.is_some())
    }
}

/// A test-method parameter the lifecycle binder may be asked to supply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSpec {
    pub name: String,
    pub ty: TypeDescriptor,
}

impl ParameterSpec {
    pub fn of<T: ?Sized>(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: TypeDescriptor::of::<T>(),
        }
    }
}
