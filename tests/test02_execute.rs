use odbc_dbd::DbHandle;
use odbc_dbd::engine::TranAction;
use odbc_dbd::test_utils::MockEngine;

#[test]
fn plain_sql_goes_to_direct_execution() {
    let engine = MockEngine::new();
    let probe = engine.clone();
    let (mut handle, _status) = DbHandle::open(engine, Some("DSN=test"));

    let status = handle.execute("SELECT a, b FROM t WHERE a > 1");
    assert_eq!(status.code, 0);
    assert_eq!(status.message, "query ok");
    assert_eq!(probe.executed_sql(), vec!["SELECT a, b FROM t WHERE a > 1"]);
}

#[test]
fn commit_routes_to_transaction_control_in_any_case() {
    for command in ["commit", "COMMIT", "Commit"] {
        let engine = MockEngine::new();
        let probe = engine.clone();
        let (mut handle, _status) = DbHandle::open(engine, Some("DSN=test"));

        let status = handle.execute(command);
        assert_eq!(status.code, 0);
        assert_eq!(status.message, "query ok");
        assert_eq!(probe.transactions(), vec![TranAction::Commit]);
        // Never reaches the SQL-execution path.
        assert!(probe.executed_sql().is_empty());
    }
}

#[test]
fn rollback_routes_to_transaction_control_in_any_case() {
    for command in ["rollback", "ROLLBACK", "RoLlBaCk"] {
        let engine = MockEngine::new();
        let probe = engine.clone();
        let (mut handle, _status) = DbHandle::open(engine, Some("DSN=test"));

        let status = handle.execute(command);
        assert_eq!(status.code, 0);
        assert_eq!(probe.transactions(), vec![TranAction::Rollback]);
        assert!(probe.executed_sql().is_empty());
    }
}

#[test]
fn engine_rejection_reports_query_failed_with_diagnostic_text() {
    let engine = MockEngine::new().fail_execute("near 'SELEC': syntax error");
    let (mut handle, _status) = DbHandle::open(engine, Some("DSN=test"));

    let status = handle.execute("SELEC 1");
    assert_eq!(status.code, 1);
    assert_eq!(status.message, "query failed: near 'SELEC': syntax error");
}

#[test]
fn execute_without_live_connection_is_internal() {
    let engine = MockEngine::new();
    let (mut handle, _status) = DbHandle::open(engine, Some("DSN=test"));
    handle.close();

    let status = handle.execute("SELECT 1");
    assert_eq!(status.code, 1);
    assert_eq!(status.message, "no live connection");
}
