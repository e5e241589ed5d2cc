use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::adapters::SerdeJsonCodec;
use crate::adapters::StructuralComparator;
use crate::domain::ClassMetadata;
use crate::domain::CompareMode;
use crate::infra::FsResourceRoot;
use crate::infra::HttpMockServer;
use crate::infra::KitConfig;
use crate::infra::MockableClock;
use crate::usecases::BindingStrategy;
use crate::usecases::Container;
use crate::usecases::DirectBindings;
use crate::usecases::DirectBindingsBuilder;
use crate::usecases::Fixtures;
use crate::usecases::LifecycleBinder;
use crate::usecases::MockServerSupport;
use crate::usecases::ports::SuiteBinding;

pub type KitFixtures = Fixtures<SerdeJsonCodec>;
pub type KitMockServer = MockServerSupport<SerdeJsonCodec>;

/// Fixtures over the filesystem with `serde_json` and structural comparison,
/// plus factories for the clock and mock servers that bind to them.
pub struct ArtifactKit {
    config: KitConfig,
    fixtures: Arc<KitFixtures>,
}

impl ArtifactKit {
    pub fn builder() -> ArtifactKitBuilder {
        ArtifactKitBuilder::default()
    }

    /// Everything from the environment.
    pub fn from_env() -> Self {
        Self::builder().build()
    }

    pub fn config(&self) -> &KitConfig {
        &self.config
    }

    pub fn fixtures(&self) -> Arc<KitFixtures> {
        Arc::clone(&self.fixtures)
    }

    /// A fresh mock server reading its responses through this kit's fixtures.
    pub fn mock_server(&self) -> Arc<KitMockServer> {
        Arc::new(
            MockServerSupport::new(Arc::new(HttpMockServer::new()), self.fixtures())
                .with_take_timeout(self.config.take_request_timeout()),
        )
    }

    pub fn clock(&self) -> Arc<MockableClock> {
        Arc::new(MockableClock::new())
    }

    /// Direct bindings with this kit's fixtures already registered.
    pub fn direct_bindings(&self) -> DirectBindingsBuilder {
        let fixtures: Arc<dyn SuiteBinding> = self.fixtures();
        DirectBindings::builder().fixtures(fixtures)
    }

    /// A container with this kit's fixtures registered as a suite binding.
    pub fn container(&self) -> Container {
        let fixtures: Arc<dyn SuiteBinding> = self.fixtures();
        Container::new().with(fixtures)
    }

    /// Binder over direct bindings holding only this kit's fixtures.
    pub fn binder(&self, class: ClassMetadata) -> LifecycleBinder {
        LifecycleBinder::new(
            class,
            BindingStrategy::Direct(self.direct_bindings().build()),
        )
    }
}

/// Explicit settings win over the environment.
#[derive(Default)]
pub struct ArtifactKitBuilder {
    config: Option<KitConfig>,
    resource_roots: Option<Vec<PathBuf>>,
    pretty_json: Option<bool>,
    compare_mode: Option<CompareMode>,
    take_request_timeout: Option<Duration>,
}

impl ArtifactKitBuilder {
    /// Base configuration; defaults to `KitConfig::from_env()`.
    pub fn config(mut self, config: KitConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn resource_root(self, root: impl Into<PathBuf>) -> Self {
        self.resource_roots([root])
    }

    /// Searched in order; the first root containing the suite wins.
    pub fn resource_roots<I, P>(mut self, roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.resource_roots = Some(roots.into_iter().map(Into::into).collect());
        self
    }

    pub fn pretty_json(mut self, pretty: bool) -> Self {
        self.pretty_json = Some(pretty);
        self
    }

    pub fn compare_mode(mut self, mode: CompareMode) -> Self {
        self.compare_mode = Some(mode);
        self
    }

    pub fn take_request_timeout(mut self, timeout: Duration) -> Self {
        self.take_request_timeout = Some(timeout);
        self
    }

    pub fn build(self) -> ArtifactKit {
        let mut config = self.config.unwrap_or_else(KitConfig::from_env);
        if let Some(roots) = self.resource_roots {
            config = config.with_resource_roots(roots);
        }
        if let Some(pretty) = self.pretty_json {
            config = config.with_pretty_json(pretty);
        }
        if let Some(mode) = self.compare_mode {
            config = config.with_compare_mode(mode);
        }
        if let Some(timeout) = self.take_request_timeout {
            config = config.with_take_request_timeout(timeout);
        }

        debug!(
            roots = ?config.resource_roots(),
            compare_mode = %config.compare_mode(),
            pretty_json = config.pretty_json(),
            "Building artifact kit"
        );

        let codec = if config.pretty_json() {
            SerdeJsonCodec::pretty()
        } else {
            SerdeJsonCodec::new()
        };
        let fixtures = Fixtures::new(
            codec,
            Arc::new(FsResourceRoot::with_roots(config.resource_roots().to_vec())),
            Arc::new(StructuralComparator::new()),
        )
        .with_default_mode(config.compare_mode());

        ArtifactKit {
            config,
            fixtures: Arc::new(fixtures),
        }
    }
}
