//! Serves fixture artifacts from a mock HTTP server and asserts the
//! requests it receives against expected artifacts.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::common::log_cleanup_failure;
use crate::domain::ArtifactKind;
use crate::domain::ConfigurationError;
use crate::domain::EnqueueResponse;
use crate::domain::TypeRef;
use crate::domain::default_artifact_name;
use crate::usecases::binder::HookContext;
use crate::usecases::binder::LifecycleHook;
use crate::usecases::fixtures::Fixtures;
use crate::usecases::ports::Codec;
use crate::usecases::ports::CodecError;
use crate::usecases::ports::FixtureError;
use crate::usecases::ports::MockResponse;
use crate::usecases::ports::MockServer;
use crate::usecases::ports::MockServerError;
use crate::usecases::ports::RecordedRequest;

const CONTENT_TYPE: &str = "Content-Type";
const JSON_CONTENT_TYPE: &str = "application/json";

pub struct MockServerSupport<C: Codec> {
    server: Arc<dyn MockServer>,
    fixtures: Arc<Fixtures<C>>,
    take_timeout: Duration,
}

impl<C: Codec> MockServerSupport<C> {
    pub const DEFAULT_TAKE_TIMEOUT: Duration = Duration::from_millis(60_000);

    pub fn new(server: Arc<dyn MockServer>, fixtures: Arc<Fixtures<C>>) -> Self {
        Self {
            server,
            fixtures,
            take_timeout: Self::DEFAULT_TAKE_TIMEOUT,
        }
    }

    /// Timeout used by `take_request`.
    pub fn with_take_timeout(mut self, timeout: Duration) -> Self {
        self.take_timeout = timeout;
        self
    }

    pub fn server(&self) -> &Arc<dyn MockServer> {
        &self.server
    }

    pub fn fixtures(&self) -> &Arc<Fixtures<C>> {
        &self.fixtures
    }

    /// Starts on a free port.
    pub fn start(&self) -> Result<u16, FixtureError> {
        self.start_on(0)
    }

    pub fn start_on(&self, port: u16) -> Result<u16, FixtureError> {
        Ok(self.server.start(port)?)
    }

    pub fn stop(&self) -> Result<(), FixtureError> {
        Ok(self.server.stop()?)
    }

    pub fn port(&self) -> Option<u16> {
        self.server.port()
    }

    /// `http://127.0.0.1:{port}{path}`; `NotStarted` when not running.
    pub fn url(&self, path: &str) -> Result<String, FixtureError> {
        let port = self
            .port()
            .ok_or(MockServerError::NotStarted)?;
        let separator = if path.starts_with('/') { "" } else { "/" };
        Ok(format!("http://127.0.0.1:{port}{separator}{path}"))
    }

    pub fn enqueue_input_resource(&self, test_case: &str, name: &str) -> Result<(), FixtureError> {
        self.enqueue_json(test_case, ArtifactKind::input(), name)
    }

    pub fn enqueue_input_resource_for<T: ?Sized>(&self, test_case: &str) -> Result<(), FixtureError> {
        self.enqueue_input_resource(test_case, &self.fixtures.artifact_file_name::<T>())
    }

    pub fn enqueue_input_resource_as<T>(
        &self,
        test_case: &str,
        type_ref: &TypeRef<T>,
    ) -> Result<(), FixtureError> {
        self.enqueue_input_resource(test_case, &default_artifact_name(type_ref.descriptor()))
    }

    pub fn enqueue_expected_resource(
        &self,
        test_case: &str,
        name: &str,
    ) -> Result<(), FixtureError> {
        self.enqueue_json(test_case, ArtifactKind::expected(), name)
    }

    pub fn enqueue_expected_resource_for<T: ?Sized>(
        &self,
        test_case: &str,
    ) -> Result<(), FixtureError> {
        self.enqueue_expected_resource(test_case, &self.fixtures.artifact_file_name::<T>())
    }

    pub fn enqueue_expected_resource_as<T>(
        &self,
        test_case: &str,
        type_ref: &TypeRef<T>,
    ) -> Result<(), FixtureError> {
        self.enqueue_expected_resource(test_case, &default_artifact_name(type_ref.descriptor()))
    }

    /// Serves the artifact's text as the next response body.
    pub fn enqueue_resource(
        &self,
        test_case: &str,
        kind: impl Into<ArtifactKind>,
        name: &str,
        status: u16,
        headers: Vec<(String, String)>,
    ) -> Result<(), FixtureError> {
        let body = self.fixtures.read_string(test_case, kind, name)?;
        let response = MockResponse {
            status,
            headers,
            body,
        };
        Ok(self.server.enqueue(response)?)
    }

    fn enqueue_json(
        &self,
        test_case: &str,
        kind: ArtifactKind,
        name: &str,
    ) -> Result<(), FixtureError> {
        let headers = vec![(CONTENT_TYPE.to_string(), JSON_CONTENT_TYPE.to_string())];
        self.enqueue_resource(test_case, kind, name, 200, headers)
    }

    pub fn take_request(&self) -> Result<RecordedRequest, FixtureError> {
        self.take_request_within(self.take_timeout)
    }

    pub fn take_request_within(&self, timeout: Duration) -> Result<RecordedRequest, FixtureError> {
        Ok(self.server.take_request(timeout)?)
    }

    /// Takes the next request and compares its body, decoded as `T`, with
    /// `expected/{T}.json`.
    pub fn assert_request<T: DeserializeOwned + Serialize>(
        &self,
        test_case: &str,
    ) -> Result<RecordedRequest, FixtureError> {
        let request = self.take_request()?;
        let actual: T = self.fixtures.parse(request_body(&request)?)?;
        self.fixtures.assert_equals(test_case, &actual)?;
        Ok(request)
    }

    pub fn assert_request_as<T: DeserializeOwned + Serialize>(
        &self,
        test_case: &str,
        type_ref: &TypeRef<T>,
    ) -> Result<RecordedRequest, FixtureError> {
        let request = self.take_request()?;
        let actual = self.fixtures.parse_as(request_body(&request)?, type_ref)?;
        let name = default_artifact_name(type_ref.descriptor());
        self.fixtures.assert_equals_named(test_case, &name, &actual)?;
        Ok(request)
    }
}

fn request_body(request: &RecordedRequest) -> Result<&str, FixtureError> {
    request.body_text().ok_or_else(|| {
        FixtureError::Codec(CodecError::Utf8 {
            target: format!("{} {} request body", request.method, request.path),
            reason: "body is not valid UTF-8".to_string(),
        })
    })
}

/// Object-safe view of a mock server, as registered in containers and
/// direct bindings.
pub trait MockServerControl: Send + Sync {
    fn start_on(&self, port: u16) -> Result<u16, FixtureError>;

    fn stop(&self) -> Result<(), FixtureError>;

    fn port(&self) -> Option<u16>;

    fn enqueue_resource(
        &self,
        test_case: &str,
        kind: &ArtifactKind,
        name: &str,
        status: u16,
        headers: Vec<(String, String)>,
    ) -> Result<(), FixtureError>;
}

impl<C: Codec> MockServerControl for MockServerSupport<C> {
    fn start_on(&self, port: u16) -> Result<u16, FixtureError> {
        MockServerSupport::start_on(self, port)
    }

    fn stop(&self) -> Result<(), FixtureError> {
        MockServerSupport::stop(self)
    }

    fn port(&self) -> Option<u16> {
        MockServerSupport::port(self)
    }

    fn enqueue_resource(
        &self,
        test_case: &str,
        kind: &ArtifactKind,
        name: &str,
        status: u16,
        headers: Vec<(String, String)>,
    ) -> Result<(), FixtureError> {
        MockServerSupport::enqueue_resource(self, test_case, kind.clone(), name, status, headers)
    }
}

/// Starts the single mock server before each test, enqueues the method's
/// declared responses, and stops it afterwards. Methods marked
/// `without_mock_server` are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockServerHook;

impl MockServerHook {
    fn target(ctx: &HookContext<'_>) -> Result<Arc<dyn MockServerControl>, ConfigurationError> {
        let mut servers = ctx.strategy.mock_servers();
        match servers.len() {
            1 => servers
                .pop()
                .ok_or(ConfigurationError::AmbiguousMockServer { found: 0 }),
            found => Err(ConfigurationError::AmbiguousMockServer { found }),
        }
    }

    fn enqueue_all(
        server: &dyn MockServerControl,
        ctx: &HookContext<'_>,
    ) -> Result<(), FixtureError> {
        for response in &ctx.method.enqueue {
            let name = enqueue_artifact_name(response, &ctx.method.name)?;
            let headers = if response.content_type.trim().is_empty() {
                Vec::new()
            } else {
                vec![(CONTENT_TYPE.to_string(), response.content_type.clone())]
            };
            server.enqueue_resource(
                ctx.test_case,
                &response.kind,
                &name,
                response.status,
                headers,
            )?;
        }
        Ok(())
    }
}

/// The type's default artifact name wins over an explicit artifact name.
fn enqueue_artifact_name(
    response: &EnqueueResponse,
    method: &str,
) -> Result<String, ConfigurationError> {
    match (&response.response_type, &response.artifact_name) {
        (Some(descriptor), _) => Ok(default_artifact_name(descriptor)),
        (None, Some(name)) if !name.trim().is_empty() => Ok(name.clone()),
        _ => Err(ConfigurationError::InvalidEnqueue {
            method: method.to_string(),
        }),
    }
}

impl LifecycleHook for MockServerHook {
    fn name(&self) -> &'static str {
        "mock_server"
    }

    fn before_each(&self, ctx: &HookContext<'_>) -> Result<(), FixtureError> {
        if ctx.method.mock_server_opt_out {
            return Ok(());
        }
        let server = Self::target(ctx)?;
        let port = ctx.class.mock_server.map(|spec| spec.port).unwrap_or(0);
        server.start_on(port)?;
        if let Err(err) = Self::enqueue_all(server.as_ref(), ctx) {
            if let Err(cleanup) = server.stop() {
                log_cleanup_failure("stop", self.name(), &cleanup);
            }
            return Err(err);
        }
        Ok(())
    }

    fn after_each(&self, ctx: &HookContext<'_>) -> Result<(), FixtureError> {
        if ctx.method.mock_server_opt_out {
            return Ok(());
        }
        Self::target(ctx)?.stop()
    }
}
