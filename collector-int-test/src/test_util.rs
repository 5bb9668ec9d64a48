use collector::collection::{Collection, InMemoryCollection};
use collector::common::Record;
use collector::errors::CollectorResult;
use collector::model::{Field, Model};
use collector::record;
use collector_derive::ModelSchema;

#[derive(ModelSchema)]
#[model(name = "test_model")]
pub struct TestModel {
    pub value: Field,
    pub prop: Field,
}

/// Runs a test between a setup and a teardown step.
///
/// The teardown runs even when the test fails; the first error is reported
/// through a panic so the test harness sees it.
pub fn run_test<T, B, A>(before: B, test: T, after: A)
where
    T: Fn(TestContext) -> CollectorResult<()>,
    B: Fn() -> CollectorResult<TestContext>,
    A: Fn(TestContext) -> CollectorResult<()>,
{
    let ctx = match before() {
        Ok(ctx) => ctx,
        Err(e) => panic!("Before run failed: {:?}", e),
    };

    let test_result = test(ctx.clone());
    let after_result = after(ctx);

    if let Err(e) = test_result {
        panic!("Test failed: {:?}", e);
    }
    if let Err(e) = after_result {
        panic!("After run failed: {:?}", e);
    }
}

#[derive(Clone)]
pub struct TestContext {
    memory: InMemoryCollection,
    collection: Collection,
}

impl TestContext {
    pub fn new(memory: InMemoryCollection) -> Self {
        let collection = Collection::new(memory.clone());
        Self { memory, collection }
    }

    /// Returns the backing store, for inspecting what was written.
    pub fn memory(&self) -> &InMemoryCollection {
        &self.memory
    }

    pub fn collection(&self) -> Collection {
        self.collection.clone()
    }

    pub fn model(&self) -> Model<TestModel> {
        Model::empty(self.collection())
    }
}

/// The foo / bar / baz records every query test starts from.
pub fn fixture_records() -> Vec<Record> {
    ["foo", "bar", "baz"]
        .iter()
        .map(|key| {
            record! {
                "_key": *key,
                "value": format!("{}_value", key),
                "prop": format!("{}_prop", key),
            }
        })
        .collect()
}

pub fn create_test_context() -> CollectorResult<TestContext> {
    Ok(TestContext::new(InMemoryCollection::with_records(
        "test",
        fixture_records(),
    )))
}

pub fn create_empty_context() -> CollectorResult<TestContext> {
    Ok(TestContext::new(InMemoryCollection::new("test")))
}

pub fn random_key() -> String {
    uuid::Uuid::new_v4().to_string()
}

pub fn cleanup(ctx: TestContext) -> CollectorResult<()> {
    for record in ctx.memory().records() {
        if let Some(key) = record.get("_key") {
            ctx.collection().delete(&key.to_string())?;
        }
    }
    Ok(())
}
