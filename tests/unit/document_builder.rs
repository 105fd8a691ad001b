use std::io::Cursor;

use pretty_assertions::assert_eq;
use serde_json::json;
use vedconv::{build_document, TypeSchema};

const COMPANY_ID: &str = "c9bf9e57-1685-4c89-bafb-ff5af830be8a";

fn schema() -> TypeSchema {
    TypeSchema::load(Cursor::new(concat!(
        "MEMBER_ID,name,balance,risk_factor,opt_in,dob,transaction_time,userData\n",
        "string,string,integer,float,boolean,date,datetime,json",
    )))
    .unwrap()
}

fn headers() -> Vec<String> {
    [
        "MEMBER_ID",
        "name",
        "balance",
        "risk_factor",
        "opt_in",
        "dob",
        "transaction_time",
        "userData",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn row() -> Vec<String> {
    [
        "12345",
        "John",
        "100",
        "0.25",
        "True",
        "1972-05-15T15:08:56",
        "2017-10-21T12:13:14",
        r#"{"foo":"bar"}"#,
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

#[test]
fn test_builder_returns_document_if_validation_passes() {
    let document = build_document(&headers(), &schema(), &row(), COMPANY_ID, "MEMBER_ID").unwrap();

    assert_eq!(
        serde_json::to_value(&document).unwrap(),
        json!({
            "_id": format!("{COMPANY_ID}_12345"),
            "augmentedData": {
                "MEMBER_ID": "12345",
                "name": "John",
                "balance": 100,
                "risk_factor": 0.25,
                "opt_in": true,
                "dob": "1972-05-15",
                "transaction_time": "2017-10-21T12:13:14",
                "userData": {"foo": "bar"}
            }
        })
    );
}

#[test]
fn test_builder_skips_empty_data() {
    let mut data = row();
    data[6] = String::new();
    let document = build_document(&headers(), &schema(), &data, COMPANY_ID, "MEMBER_ID").unwrap();

    assert_eq!(
        serde_json::to_value(&document).unwrap(),
        json!({
            "_id": format!("{COMPANY_ID}_12345"),
            "augmentedData": {
                "MEMBER_ID": "12345",
                "name": "John",
                "balance": 100,
                "risk_factor": 0.25,
                "opt_in": true,
                "dob": "1972-05-15",
                "userData": {"foo": "bar"}
            }
        })
    );
}

#[test]
fn test_builder_returns_error_if_member_id_is_empty() {
    let mut data = row();
    data[0] = String::new();
    let result = build_document(&headers(), &schema(), &data, COMPANY_ID, "MEMBER_ID");
    assert_eq!(result, Err("MEMBER_ID cannot be empty".to_string()));
}

#[test]
fn test_builder_returns_error_if_headers_and_data_have_different_length() {
    let mut data = row();
    data.push("foo".to_string());
    let result = build_document(&headers(), &schema(), &data, COMPANY_ID, "MEMBER_ID");
    assert_eq!(result, Err("Data length does not match headers".to_string()));
}

#[test]
fn test_builder_returns_error_if_data_validation_fails() {
    let mut data = row();
    data[7] = "one thousand points".to_string();
    let result = build_document(&headers(), &schema(), &data, COMPANY_ID, "MEMBER_ID");
    assert_eq!(
        result,
        Err("one thousand points is not a valid json".to_string())
    );
}

#[test]
fn test_builder_serializes_one_json_object_per_line() {
    let document = build_document(&headers(), &schema(), &row(), COMPANY_ID, "MEMBER_ID").unwrap();
    let line = document.to_json_line().unwrap();
    assert!(!line.contains('\n'));
    assert!(line.starts_with(&format!(r#"{{"_id":"{COMPANY_ID}_12345""#)));
}

#[test]
fn test_builder_keeps_member_id_case_from_schema() {
    let schema = TypeSchema::load(Cursor::new("Member_Id,name\nstring,string")).unwrap();
    let headers = vec!["Member_Id".to_string(), "name".to_string()];
    let data = vec!["777".to_string(), "Jane".to_string()];

    let document = build_document(&headers, &schema, &data, COMPANY_ID, "Member_Id").unwrap();
    assert_eq!(document.id, format!("{COMPANY_ID}_777"));
    assert!(document.augmented_data.contains_key("Member_Id"));
}
