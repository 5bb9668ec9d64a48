use collector::collection::{Collection, HttpCollection};
use collector::common::Value;
use collector::errors::ErrorKind;
use collector::model::Model;
use collector::query::QueryApi;
use collector::record;
use collector_int_test::test_util::{TestModel, TestModelFields};
use mockito::{Matcher, Server};
use std::time::Duration;

#[ctor::ctor]
fn init() {
    colog::init();
}

const ITEMS_PATH: &str = "/collections/123/cs/items";

fn collection(server: &Server) -> Collection {
    HttpCollection::builder()
        .base_uri(&format!("{}/collections/", server.url()))
        .project_id(123)
        .collection("items")
        .store_type("cs")
        .apikey("apikey")
        .timeout(Duration::from_secs(5))
        .build_collection()
        .unwrap()
}

#[test]
fn test_query_is_sent_as_ordered_params() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", ITEMS_PATH)
        .match_query(Matcher::Exact(
            "prefix=ba&key=bar&key=baz&meta=_key&meta=_ts".to_string(),
        ))
        .match_header("authorization", "Basic YXBpa2V5Og==")
        .with_status(200)
        .with_header("content-type", "application/x-ndjson")
        .with_body(
            "{\"_key\":\"bar\",\"value\":\"bar_value\"}\n{\"_key\":\"baz\",\"value\":\"baz_value\"}\n",
        )
        .expect(1)
        .create();
    let model = Model::<TestModel>::empty(collection(&server));

    let result = model.select(["bar", "baz"]).prefix(["ba"]).execute().unwrap();
    let all = result.all().unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[1].value(), &Value::from("baz_value"));

    mock.assert();
}

#[test]
fn test_save_posts_json_line() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", ITEMS_PATH)
        .match_header("authorization", "Basic YXBpa2V5Og==")
        .match_body(r#"{"_key":"foo","value":"foo_value"}"#)
        .with_status(200)
        .expect(1)
        .create();
    let mut model =
        Model::<TestModel>::new(collection(&server), None, record! { "_key": "foo" }).unwrap();
    model.set_value("foo_value");
    model.save().unwrap();

    mock.assert();
}

#[test]
fn test_delete_addresses_key() {
    let mut server = Server::new();
    let mock = server
        .mock("DELETE", "/collections/123/cs/items/foo")
        .with_status(204)
        .expect(1)
        .create();
    let model =
        Model::<TestModel>::new(collection(&server), None, record! { "_key": "foo" }).unwrap();
    model.delete().unwrap();

    mock.assert();
}

#[test]
fn test_delete_encodes_reserved_characters_in_key() {
    let mut server = Server::new();
    let mock = server
        .mock("DELETE", "/collections/123/cs/items/foo%3Fbar")
        .with_status(204)
        .expect(1)
        .create();
    let model =
        Model::<TestModel>::new(collection(&server), None, record! { "_key": "foo?bar" })
            .unwrap();
    model.delete().unwrap();

    mock.assert();
}

#[test]
fn test_remote_error_propagates_from_read() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", ITEMS_PATH)
        .match_query(Matcher::Any)
        .with_status(404)
        .with_body("missing")
        .create();
    let model = Model::<TestModel>::empty(collection(&server));

    let err = model.execute(None).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::RemoteError(404));
    mock.assert();
}

#[test]
fn test_remote_error_propagates_from_save() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", ITEMS_PATH)
        .with_status(500)
        .with_body("boom")
        .create();
    let mut model = Model::<TestModel>::empty(collection(&server));
    model.set_prop(1);

    let err = model.save().unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::RemoteError(500));
    mock.assert();
}

#[test]
fn test_malformed_response_surfaces_encoding_error() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", ITEMS_PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/x-ndjson")
        .with_body("{\"_key\":\"a\"}\n{broken\n")
        .create();
    let model = Model::<TestModel>::empty(collection(&server));

    let result = model.execute(None).unwrap();
    assert!(result.iter().next().unwrap().is_ok());
    let err = result.all().unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::EncodingError);
    mock.assert();
}
