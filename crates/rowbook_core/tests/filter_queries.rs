use rowbook_core::{Cell, DataStore, Entry, Filters, Model, Op, StoreError};
use tempfile::tempdir;

struct Person {
    name: String,
    age: i64,
}

impl Person {
    fn new(name: &str, age: i64) -> Self {
        Self {
            name: name.to_string(),
            age,
        }
    }
}

impl Model for Person {
    const MODEL_NAME: &'static str = "Person";

    fn field_names() -> &'static [&'static str] {
        &["name", "age"]
    }

    fn to_cells(&self) -> Vec<Cell> {
        vec![Cell::from(self.name.as_str()), Cell::Int(self.age)]
    }

    fn from_entry(entry: &Entry) -> Self {
        Self {
            name: entry
                .get("name")
                .and_then(Cell::as_str)
                .unwrap_or_default()
                .to_string(),
            age: entry.get("age").and_then(Cell::as_int).unwrap_or_default(),
        }
    }
}

fn seeded_store(dir: &tempfile::TempDir) -> DataStore {
    let mut store = DataStore::open(dir.path().join("store.json")).unwrap();
    store.create(Person::new("Brian", 32)).unwrap();
    store.create(Person::new("Ada", 28)).unwrap();
    store.create(Person::new("Grace", 30)).unwrap();
    store
}

fn names(records: &[rowbook_core::Stored<Person>]) -> Vec<&str> {
    records.iter().map(|r| r.record.name.as_str()).collect()
}

#[test]
fn each_operator_selects_the_mathematical_set() {
    let dir = tempdir().unwrap();
    let store = seeded_store(&dir);

    let lt = store
        .read::<Person>(&Filters::new().field_op("age", Op::Lt, 30i64))
        .unwrap();
    assert_eq!(names(&lt), vec!["Ada"]);

    let le = store
        .read::<Person>(&Filters::new().field_op("age", Op::Le, 30i64))
        .unwrap();
    assert_eq!(names(&le), vec!["Ada", "Grace"]);

    let eq = store
        .read::<Person>(&Filters::new().field_op("age", Op::Eq, 30i64))
        .unwrap();
    assert_eq!(names(&eq), vec!["Grace"]);

    let ge = store
        .read::<Person>(&Filters::new().field_op("age", Op::Ge, 30i64))
        .unwrap();
    assert_eq!(names(&ge), vec!["Brian", "Grace"]);

    let gt = store
        .read::<Person>(&Filters::new().field_op("age", Op::Gt, 30i64))
        .unwrap();
    assert_eq!(names(&gt), vec!["Brian"]);
}

#[test]
fn bare_values_filter_by_equality() {
    let dir = tempdir().unwrap();
    let store = seeded_store(&dir);

    let result = store
        .read::<Person>(&Filters::new().field("name", "Ada"))
        .unwrap();
    assert_eq!(names(&result), vec!["Ada"]);
}

#[test]
fn filters_on_meta_and_model_fields_combine() {
    let dir = tempdir().unwrap();
    let store = seeded_store(&dir);

    let result = store
        .read::<Person>(&Filters::new().field_op("_id", Op::Le, 1i64).field("age", 32i64))
        .unwrap();
    assert_eq!(names(&result), vec!["Brian"]);
}

#[test]
fn scenario_ada_is_at_most_thirty() {
    let dir = tempdir().unwrap();
    let mut store = DataStore::open(dir.path().join("store.json")).unwrap();
    store.create(Person::new("Brian", 32)).unwrap();
    store.create(Person::new("Ada", 28)).unwrap();

    let result = store
        .read::<Person>(&Filters::new().field_op("age", Op::Le, 30i64))
        .unwrap();

    assert_eq!(result.len(), 1);
    assert_eq!(result[0].record.name, "Ada");
    assert_eq!(result[0].meta.id, 1);
}

#[test]
fn empty_filters_return_every_row_in_order() {
    let dir = tempdir().unwrap();
    let store = seeded_store(&dir);

    let all = store.read::<Person>(&Filters::new()).unwrap();
    assert_eq!(names(&all), vec!["Brian", "Ada", "Grace"]);
}

#[test]
fn mismatched_value_kinds_match_nothing() {
    let dir = tempdir().unwrap();
    let store = seeded_store(&dir);

    let result = store
        .read::<Person>(&Filters::new().field("age", "28"))
        .unwrap();
    assert!(result.is_empty());
}

#[test]
fn numeric_filters_promote_between_int_and_float() {
    let dir = tempdir().unwrap();
    let store = seeded_store(&dir);

    let result = store
        .read::<Person>(&Filters::new().field_op("age", Op::Lt, 29.5f64))
        .unwrap();
    assert_eq!(names(&result), vec!["Ada"]);
}

#[test]
fn unknown_operator_fails_before_any_read() {
    let err = Filters::new().term("age !! 30").unwrap_err();
    assert!(matches!(err, StoreError::InvalidConstraint { .. }));

    let err = Op::parse("~=").unwrap_err();
    assert!(matches!(
        err,
        StoreError::InvalidConstraint { operator } if operator == "~="
    ));
}

#[test]
fn textual_terms_filter_like_typed_constraints() {
    let dir = tempdir().unwrap();
    let store = seeded_store(&dir);

    let filters = Filters::new().term("age>=30").unwrap().term("name==Brian").unwrap();
    let result = store.read::<Person>(&filters).unwrap();
    assert_eq!(names(&result), vec!["Brian"]);
}
