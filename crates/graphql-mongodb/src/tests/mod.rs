
use crate::graph::{CompositeId, TypeGraph};

#[ctor::ctor]
fn setup_logging() {
    let filter = tracing_subscriber::filter::EnvFilter::builder()
        .parse(std::env::var("RUST_LOG").unwrap_or("graphql_mongodb=debug".to_string()))
        .unwrap();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .with_target(true)
        .without_time()
        .try_init()
        .ok();
}

const FIXTURE: &str = r#"
enum Characters {
  A
  B
  C
}

type Nested {
  stringScalar: String
  intScalar: Int
  floatScalar: Float
  enumScalar: Characters
  stringList: [String]
  intList: [Int]
  floatList: [Float]
  enumList: [Characters]
  nonNullScalar: String!
  nonNullList: [String]!
  listOfNonNulls: [String!]
  recursive: Nested
  resolveScalar: String @mongoDependencies(paths: ["stringScalar"])
  resolveObject: Nested @mongoDependencies(paths: ["stringScalar"])
}

type Object {
  _id: ID!
  stringScalar: String
  intScalar: Int
  floatScalar: Float
  enumScalar: Characters
  stringList: [String]
  intList: [Int]
  floatList: [Float]
  enumList: [Characters]
  nested: Nested
  nestedList: [Nested]
  nonNullScalar: String!
  nonNullList: [String]!
  listOfNonNulls: [String!]
  resolveSpecificDependencies: String @mongoDependencies(paths: ["nested.stringScalar", "nested.intScalar"])
  resolveCommonDependencies: String @mongoDependencies(paths: ["nested"])
  resolveObject: Nested @mongoDependencies(paths: ["nested"])
}
"#;

/// A graph covering every kind of field: scalars, enums, lists, non-null wrappers, nested
/// and recursive objects, and computed fields with dependencies.
pub(crate) fn fixture() -> TypeGraph {
    TypeGraph::from_sdl(FIXTURE).unwrap()
}

pub(crate) fn object_id(graph: &TypeGraph) -> CompositeId {
    graph.composite_by_name("Object").unwrap()
}

pub(crate) fn nested_id(graph: &TypeGraph) -> CompositeId {
    graph.composite_by_name("Nested").unwrap()
}
