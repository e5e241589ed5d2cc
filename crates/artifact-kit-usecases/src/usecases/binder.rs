//! Lifecycle binder: resolves the suite once per test instance, binds it to
//! the fixtures, freezes the clock and runs hooks around every test method.

use std::panic;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use chrono::DateTime;
use chrono::Offset;
use chrono::Utc;

use crate::common::TestSpan;
use crate::common::log_cleanup_failure;
use crate::domain::ClassMetadata;
use crate::domain::ConfigurationError;
use crate::domain::MethodMetadata;
use crate::domain::ParameterSpec;
use crate::usecases::container::Container;
use crate::usecases::mock_server_support::MockServerControl;
use crate::usecases::ports::FixtureError;
use crate::usecases::ports::FreezableClock;
use crate::usecases::ports::SuiteBinding;
use crate::usecases::resolver::resolve_suite;
use crate::usecases::resolver::resolve_test_case;

/// Name of the test-method parameter that receives the resolved test case.
pub const TEST_CASE_PARAMETER: &str = "test_case";

/// Where the binder finds its targets.
#[derive(Clone)]
pub enum BindingStrategy {
    /// Every `dyn SuiteBinding` in the container gets the suite once, at
    /// instance post-processing.
    Container(Arc<Container>),
    /// Exactly one registered fixtures target gets the suite before each test.
    Direct(DirectBindings),
}

impl BindingStrategy {
    pub fn mode(&self) -> &'static str {
        match self {
            BindingStrategy::Container(_) => "container",
            BindingStrategy::Direct(_) => "direct",
        }
    }

    pub fn mock_servers(&self) -> Vec<Arc<dyn MockServerControl>> {
        match self {
            BindingStrategy::Container(container) => container.lookup_all::<dyn MockServerControl>(),
            BindingStrategy::Direct(bindings) => bindings.mock_servers.clone(),
        }
    }

    fn clock(&self) -> Result<Arc<dyn FreezableClock>, ConfigurationError> {
        match self {
            BindingStrategy::Container(container) => {
                let mut clocks = container.lookup_all::<dyn FreezableClock>();
                match clocks.len() {
                    0 => Err(ConfigurationError::MissingClock),
                    1 => clocks.pop().ok_or(ConfigurationError::MissingClock),
                    found => Err(ConfigurationError::AmbiguousComponent {
                        component: "FreezableClock",
                        found,
                    }),
                }
            }
            BindingStrategy::Direct(bindings) => bindings
                .clock
                .clone()
                .ok_or(ConfigurationError::MissingClock),
        }
    }
}

/// Components of a test instance, registered by hand when no container is
/// in use.
#[derive(Clone, Default)]
pub struct DirectBindings {
    fixtures: Vec<Arc<dyn SuiteBinding>>,
    clock: Option<Arc<dyn FreezableClock>>,
    mock_servers: Vec<Arc<dyn MockServerControl>>,
}

impl DirectBindings {
    pub fn builder() -> DirectBindingsBuilder {
        DirectBindingsBuilder::default()
    }

    pub fn fixture_count(&self) -> usize {
        self.fixtures.len()
    }
}

#[derive(Default)]
pub struct DirectBindingsBuilder {
    bindings: DirectBindings,
}

impl DirectBindingsBuilder {
    pub fn fixtures(mut self, fixtures: Arc<dyn SuiteBinding>) -> Self {
        self.bindings.fixtures.push(fixtures);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn FreezableClock>) -> Self {
        self.bindings.clock = Some(clock);
        self
    }

    pub fn mock_server(mut self, server: Arc<dyn MockServerControl>) -> Self {
        self.bindings.mock_servers.push(server);
        self
    }

    pub fn build(self) -> DirectBindings {
        self.bindings
    }
}

/// What a running test knows about itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestContext {
    pub suite: String,
    pub test_case: String,
    pub method: String,
}

/// View handed to lifecycle hooks.
pub struct HookContext<'a> {
    pub class: &'a ClassMetadata,
    pub method: &'a MethodMetadata,
    pub suite: &'a str,
    pub test_case: &'a str,
    pub strategy: &'a BindingStrategy,
}

/// Extension run after the binder's own `before_each` work and before its
/// own `after_each` work.
pub trait LifecycleHook: Send + Sync {
    fn name(&self) -> &'static str;

    fn before_each(&self, ctx: &HookContext<'_>) -> Result<(), FixtureError>;

    fn after_each(&self, ctx: &HookContext<'_>) -> Result<(), FixtureError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BinderState {
    Uninitialized,
    ClassBound,
    Bound { test_case: String },
    Unbound,
}

impl BinderState {
    pub fn name(&self) -> &'static str {
        match self {
            BinderState::Uninitialized => "Uninitialized",
            BinderState::ClassBound => "ClassBound",
            BinderState::Bound { .. } => "Bound",
            BinderState::Unbound => "Unbound",
        }
    }
}

pub struct LifecycleBinder {
    class: ClassMetadata,
    strategy: BindingStrategy,
    hooks: Vec<Box<dyn LifecycleHook>>,
    state: BinderState,
    suite: Option<String>,
    uses_fixed_clock: bool,
    frozen: Option<Arc<dyn FreezableClock>>,
}

impl LifecycleBinder {
    pub fn new(class: ClassMetadata, strategy: BindingStrategy) -> Self {
        Self {
            class,
            strategy,
            hooks: Vec::new(),
            state: BinderState::Uninitialized,
            suite: None,
            uses_fixed_clock: false,
            frozen: None,
        }
    }

    pub fn with_hook(mut self, hook: impl LifecycleHook + 'static) -> Self {
        self.hooks.push(Box::new(hook));
        self
    }

    pub fn class(&self) -> &ClassMetadata {
        &self.class
    }

    pub fn strategy(&self) -> &BindingStrategy {
        &self.strategy
    }

    pub fn state(&self) -> &BinderState {
        &self.state
    }

    pub fn suite(&self) -> Option<&str> {
        self.suite.as_deref()
    }

    pub fn uses_fixed_clock(&self) -> bool {
        self.uses_fixed_clock
    }

    /// Once per test instance: resolves the suite and latches clock usage.
    pub fn post_process_instance(&mut self) -> Result<(), FixtureError> {
        self.expect_state("post_process_instance", |state| {
            matches!(state, BinderState::Uninitialized)
        })?;

        let suite = resolve_suite(&self.class)?;
        if let BindingStrategy::Container(container) = &self.strategy {
            for target in container.lookup_all::<dyn SuiteBinding>() {
                target.bind_suite(Some(&suite));
            }
        }
        self.uses_fixed_clock = self.class.uses_fixed_clock();
        self.suite = Some(suite);
        self.state = BinderState::ClassBound;
        Ok(())
    }

    pub fn before_each(&mut self, method: &MethodMetadata) -> Result<TestContext, FixtureError> {
        self.expect_state("before_each", |state| {
            matches!(state, BinderState::ClassBound | BinderState::Unbound)
        })?;
        let suite = self.suite.clone().ok_or(ConfigurationError::InvalidLifecycle {
            step: "before_each",
            state: self.state.name(),
        })?;

        if let BindingStrategy::Direct(bindings) = &self.strategy {
            match bindings.fixtures.as_slice() {
                [target] => target.bind_suite(Some(&suite)),
                targets => {
                    return Err(ConfigurationError::AmbiguousBindingTarget {
                        found: targets.len(),
                    }
                    .into());
                }
            }
        }

        if self.uses_fixed_clock {
            self.freeze_clock(method)?;
        }

        let test_case = resolve_test_case(method);
        if let Err(err) = self.run_before_hooks(method, &suite, &test_case) {
            self.release_clock();
            return Err(err);
        }

        self.state = BinderState::Bound {
            test_case: test_case.clone(),
        };
        Ok(TestContext {
            suite,
            test_case,
            method: method.name.clone(),
        })
    }

    /// Whether `parameter` is the reserved `test_case: String` parameter.
    pub fn supports_parameter(&self, parameter: &ParameterSpec) -> bool {
        parameter.name == TEST_CASE_PARAMETER
            && !parameter.ty.is_generic()
            && matches!(parameter.ty.simple_name(), "String" | "str")
    }

    pub fn resolve_parameter(
        &self,
        parameter: &ParameterSpec,
        method: &MethodMetadata,
    ) -> Option<String> {
        self.supports_parameter(parameter)
            .then(|| resolve_test_case(method))
    }

    /// Runs hooks in reverse order, then releases the clock. Every step runs
    /// even if an earlier one fails; the first failure is returned.
    pub fn after_each(&mut self, method: &MethodMetadata) -> Result<(), FixtureError> {
        let BinderState::Bound { test_case } = &self.state else {
            return Err(ConfigurationError::InvalidLifecycle {
                step: "after_each",
                state: self.state.name(),
            }
            .into());
        };
        let test_case = test_case.clone();
        let suite = self.suite.clone().unwrap_or_default();

        let ctx = HookContext {
            class: &self.class,
            method,
            suite: &suite,
            test_case: &test_case,
            strategy: &self.strategy,
        };
        let mut first_error = None;
        for hook in self.hooks.iter().rev() {
            if let Err(err) = hook.after_each(&ctx) {
                first_error.get_or_insert(err);
            }
        }

        self.release_clock();
        self.state = BinderState::Unbound;
        first_error.map_or(Ok(()), Err)
    }

    /// `before_each`, `body`, then `after_each`, all inside one [`TestSpan`];
    /// `after_each` runs even when `body` panics, after which the panic
    /// resumes.
    pub fn run<R>(
        &mut self,
        method: &MethodMetadata,
        body: impl FnOnce(&TestContext) -> R,
    ) -> Result<R, FixtureError> {
        let span = TestSpan::new(self.suite.as_deref(), &resolve_test_case(method), &method.name);
        span.in_scope(|| {
            let ctx = self.before_each(method)?;
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| body(&ctx)));
            let teardown = self.after_each(method);
            match outcome {
                Ok(value) => teardown.map(|()| value),
                Err(payload) => panic::resume_unwind(payload),
            }
        })
    }

    fn expect_state(
        &self,
        step: &'static str,
        allowed: impl Fn(&BinderState) -> bool,
    ) -> Result<(), ConfigurationError> {
        if allowed(&self.state) {
            Ok(())
        } else {
            Err(ConfigurationError::InvalidLifecycle {
                step,
                state: self.state.name(),
            })
        }
    }

    fn freeze_clock(&mut self, method: &MethodMetadata) -> Result<(), ConfigurationError> {
        let class_spec =
            self.class
                .fixed_clock
                .as_ref()
                .ok_or_else(|| ConfigurationError::MethodOnlyFixedClock {
                    class: self.class.name.clone(),
                })?;
        let spec = method.fixed_clock.as_ref().unwrap_or(class_spec);
        let instant = parse_instant(spec.instant())?;
        let clock = self.strategy.clock()?;
        clock.freeze(instant, Utc.fix());
        self.frozen = Some(clock);
        Ok(())
    }

    fn release_clock(&mut self) {
        if let Some(clock) = self.frozen.take() {
            clock.unfreeze();
        }
    }

    fn run_before_hooks(
        &self,
        method: &MethodMetadata,
        suite: &str,
        test_case: &str,
    ) -> Result<(), FixtureError> {
        let ctx = HookContext {
            class: &self.class,
            method,
            suite,
            test_case,
            strategy: &self.strategy,
        };
        for (started, hook) in self.hooks.iter().enumerate() {
            if let Err(err) = hook.before_each(&ctx) {
                for previous in self.hooks[..started].iter().rev() {
                    if let Err(cleanup) = previous.after_each(&ctx) {
                        log_cleanup_failure("after_each", previous.name(), &cleanup);
                    }
                }
                return Err(err);
            }
        }
        Ok(())
    }
}

fn parse_instant(value: &str) -> Result<DateTime<Utc>, ConfigurationError> {
    DateTime::parse_from_rfc3339(value)
        .map(|instant| instant.with_timezone(&Utc))
        .map_err(|e| ConfigurationError::InvalidInstant {
            value: value.to_string(),
            reason: e.to_string(),
        })
}
