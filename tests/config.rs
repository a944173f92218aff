use std::env;

use forkjoin_kernels::engine::config::THREADS_ENV;
use forkjoin_kernels::{Engine, EngineConfig, InvalidArgument, KernelError};

mod common;

// The environment is process-wide, so everything touching it stays in one test.
#[test]
fn environment_overrides_and_validation() {
    common::init_logging();

    env::set_var(THREADS_ENV, "3");
    let config = EngineConfig::from_env().unwrap();
    assert_eq!(config.num_threads, Some(3));

    let engine = Engine::start(config.with_thread_name_prefix("cfg")).unwrap();
    assert_eq!(engine.num_threads(), 3);
    let name = engine
        .pool()
        .install(|| std::thread::current().name().map(str::to_owned));
    assert!(name.is_some_and(|n| n.starts_with("cfg-")));
    engine.shutdown();

    env::set_var(THREADS_ENV, "abc");
    assert_eq!(
        EngineConfig::from_env(),
        Err(InvalidArgument::EnvVar { name: THREADS_ENV, value: String::from("abc") })
    );

    env::remove_var(THREADS_ENV);
    assert_eq!(EngineConfig::from_env().unwrap(), EngineConfig::default());

    assert_eq!(
        Engine::start(EngineConfig::default().with_threads(0)).map(|_| ()),
        Err(KernelError::InvalidArgument(InvalidArgument::ThreadCount))
    );
}

#[test]
fn builder_methods() {
    let config = EngineConfig::default()
        .with_threads(2)
        .with_thread_name_prefix("builder")
        .with_stack_size(4 << 20);

    assert_eq!(config.num_threads, Some(2));
    assert_eq!(config.thread_name_prefix, "builder");
    assert_eq!(config.stack_size, Some(4 << 20));
    assert!(config.validate().is_ok());

    let engine = Engine::start(config.clone()).unwrap();
    assert_eq!(engine.pool().config(), &config);
    engine.shutdown();
}
