use hookrich::setup_logging;

#[test]
fn test_logging_setup() {
    // A second call must be a no-op rather than a double-init panic
    let result = std::panic::catch_unwind(|| {
        setup_logging();
        setup_logging();
    });

    assert!(result.is_ok(), "setup_logging function should not panic");
}
