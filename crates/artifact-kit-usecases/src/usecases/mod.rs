//! Fixture use cases and the ports they depend on.

pub mod binder;
pub mod container;
pub mod fixtures;
pub mod mock_server_support;
pub mod ports;
pub mod resolver;

pub use binder::BinderState;
pub use binder::BindingStrategy;
pub use binder::DirectBindings;
pub use binder::DirectBindingsBuilder;
pub use binder::HookContext;
pub use binder::LifecycleBinder;
pub use binder::LifecycleHook;
pub use binder::TEST_CASE_PARAMETER;
pub use binder::TestContext;
pub use container::Container;
pub use fixtures::Fixtures;
pub use mock_server_support::MockServerControl;
pub use mock_server_support::MockServerHook;
pub use mock_server_support::MockServerSupport;
pub use resolver::resolve_suite;
pub use resolver::resolve_test_case;
