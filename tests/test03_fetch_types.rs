use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use odbc_dbd::engine::SqlDataType;
use odbc_dbd::test_utils::{MockCell, MockEngine};
use odbc_dbd::{DbHandle, FetchOutcome, HostValue, HostValueBuilder};

fn typed_result_set() -> MockEngine {
    let columns = vec![
        ("id", SqlDataType::Integer),
        ("small", SqlDataType::SmallInt),
        ("big", SqlDataType::BigInt),
        ("ratio", SqlDataType::Double),
        ("name", SqlDataType::Varchar),
        ("born", SqlDataType::Date),
        ("alarm", SqlDataType::Time),
        ("seen", SqlDataType::Timestamp),
        ("avatar", SqlDataType::Binary),
        ("active", SqlDataType::Bit),
    ];
    let populated = vec![
        MockCell::Int(42),
        MockCell::Int(-7),
        MockCell::Int(9_000_000_000),
        MockCell::Float(2.625),
        MockCell::Text("alice".into()),
        MockCell::Date(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()),
        MockCell::Time(NaiveTime::from_hms_opt(7, 5, 9).unwrap()),
        MockCell::Timestamp(NaiveDateTime::new(
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
            NaiveTime::from_hms_opt(7, 5, 9).unwrap(),
        )),
        MockCell::Binary(vec![0xde, 0xad, 0xbe, 0xef]),
        MockCell::Bit(true),
    ];
    let nulls = vec![MockCell::Null; 10];

    MockEngine::new().with_result_set(columns, vec![populated, nulls])
}

fn fetch_row(handle: &mut DbHandle<MockEngine>) -> HostValue {
    let (outcome, status) = handle.fetch_next_row(&mut HostValueBuilder);
    assert_eq!(status.code, 0);
    assert_eq!(status.message, "row fetched");
    match outcome {
        FetchOutcome::Row(row) => row,
        FetchOutcome::End => panic!("expected a row, got the end sentinel"),
    }
}

#[test]
fn each_supported_type_yields_its_fixed_native_kind() {
    let (mut handle, _status) = DbHandle::open(typed_result_set(), Some("DSN=test"));
    handle.execute("SELECT * FROM people");

    let row = fetch_row(&mut handle);
    assert_eq!(row.get("id").and_then(HostValue::as_int), Some(42));
    assert_eq!(row.get("small").and_then(HostValue::as_int), Some(-7));
    assert_eq!(row.get("big").and_then(HostValue::as_int), Some(9_000_000_000));
    assert_eq!(row.get("ratio").and_then(HostValue::as_float), Some(2.625));
    assert_eq!(row.get("name").and_then(HostValue::as_text), Some("alice"));
    assert_eq!(row.get("born").and_then(HostValue::as_text), Some("2024-02-29"));
    assert_eq!(row.get("alarm").and_then(HostValue::as_text), Some("07:05:09"));
    assert_eq!(
        row.get("seen").and_then(HostValue::as_text),
        Some("2024-02-29 07:05:09")
    );
    assert_eq!(
        row.get("avatar").and_then(HostValue::as_blob),
        Some(&[0xde, 0xad, 0xbe, 0xef][..])
    );
    assert_eq!(row.get("active").and_then(HostValue::as_bool), Some(true));
}

#[test]
fn null_indicator_yields_empty_regardless_of_declared_type() {
    let (mut handle, _status) = DbHandle::open(typed_result_set(), Some("DSN=test"));
    handle.execute("SELECT * FROM people");

    let _populated = fetch_row(&mut handle);
    let nulls = fetch_row(&mut handle);

    for column in [
        "id", "small", "big", "ratio", "name", "born", "alarm", "seen", "avatar", "active",
    ] {
        let value = nulls.get(column).unwrap();
        assert!(value.is_empty(), "column {column} should decode to empty");
    }
}

#[test]
fn row_pairs_come_back_in_result_set_column_order() {
    let (mut handle, _status) = DbHandle::open(typed_result_set(), Some("DSN=test"));
    handle.execute("SELECT * FROM people");

    let row = fetch_row(&mut handle);
    let names: Vec<&str> = row
        .as_list()
        .unwrap()
        .iter()
        .map(|pair| pair.as_pair().unwrap().0.as_text().unwrap())
        .collect();
    assert_eq!(
        names,
        vec!["id", "small", "big", "ratio", "name", "born", "alarm", "seen", "avatar", "active"]
    );
}

#[test]
fn fetch_past_the_last_row_returns_the_end_sentinel() {
    let (mut handle, _status) = DbHandle::open(typed_result_set(), Some("DSN=test"));
    handle.execute("SELECT * FROM people");

    let mut rows = 0;
    loop {
        let (outcome, status) = handle.fetch_next_row(&mut HostValueBuilder);
        match outcome {
            FetchOutcome::Row(_) => rows += 1,
            FetchOutcome::End => {
                assert_eq!(status.code, 0);
                assert_eq!(status.message, "no more rows");
                break;
            }
        }
    }
    assert_eq!(rows, 2);
}

#[test]
fn bit_false_decodes_to_boolean_false() {
    let engine = MockEngine::new().with_result_set(
        vec![("flag", SqlDataType::Bit)],
        vec![vec![MockCell::Bit(false)]],
    );
    let (mut handle, _status) = DbHandle::open(engine, Some("DSN=test"));
    handle.execute("SELECT flag FROM t");

    let row = fetch_row(&mut handle);
    assert_eq!(row.get("flag").and_then(HostValue::as_bool), Some(false));
}
