use vedconv::validate_field;

fn assert_all_valid(csv_type: &str, values: &[&str]) {
    for value in values {
        assert_eq!(
            validate_field(csv_type, value),
            None,
            "expected {value:?} to be a valid {csv_type}"
        );
    }
}

fn assert_all_invalid(csv_type: &str, values: &[&str]) {
    for value in values {
        assert_eq!(
            validate_field(csv_type, value),
            Some(format!("{value} is not a valid {csv_type}")),
            "expected {value:?} to be rejected as {csv_type}"
        );
    }
}

#[test]
fn test_unknown_type_fails_validation() {
    assert_eq!(
        validate_field("foo", "bar"),
        Some("foo is not known type".to_string())
    );
}

#[test]
fn test_string_validation_always_passes() {
    assert_all_valid(
        "string",
        &[
            "123",
            "True",
            "1.23",
            "I'm a string",
            "",
            "2020-01-01T12:13:14",
            r#"{"foo": "bar"}"#,
        ],
    );
}

#[test]
fn test_integer_validation_passes() {
    assert_all_valid("integer", &["", "12345", "-1"]);
}

#[test]
fn test_integer_validation_fails() {
    assert_all_invalid("integer", &["1.2345", "1.0", "1oo"]);
}

#[test]
fn test_float_validation_passes() {
    assert_all_valid("float", &["", "1.2345", "12345", "1.0", "-1.23"]);
}

#[test]
fn test_float_validation_fails() {
    assert_all_invalid("float", &["1oo", "1.o", "True", "False"]);
}

#[test]
fn test_boolean_validation_passes() {
    assert_all_valid("boolean", &["", "False", "0", "True", "1"]);
}

#[test]
fn test_boolean_validation_fails() {
    assert_all_invalid("boolean", &["foo"]);
}

#[test]
fn test_date_validation_passes() {
    assert_all_valid(
        "date",
        &[
            "",
            "2018-03-21",
            "21/3/2018",
            "March 3, 2017",
            "3/21/2017",
            "2018-03-21T12:13:14",
        ],
    );
}

#[test]
fn test_date_validation_fails() {
    assert_all_invalid("date", &["foo", "1234"]);
}

#[test]
fn test_datetime_validation_passes() {
    assert_all_valid(
        "datetime",
        &[
            "",
            "2018-03-21",
            "21/3/2018",
            "March 3, 2017",
            "3/21/2017",
            "2018-03-21T12:13:14",
        ],
    );
}

#[test]
fn test_datetime_validation_fails() {
    assert_all_invalid("datetime", &["foo", "1234"]);
}

#[test]
fn test_json_validation_passes() {
    assert_all_valid(
        "json",
        &[
            "",
            "{}",
            "[]",
            r#"{"foo":"bar"}"#,
            r#"{"foo":{"bar":"baz"}}"#,
            r#"{"foo":["bar", "baz"]}"#,
        ],
    );
}

#[test]
fn test_json_validation_fails() {
    assert_all_invalid("json", &[r#"{"foo"}"#, r#"{"foo":}"#, "not a json at all"]);
}
