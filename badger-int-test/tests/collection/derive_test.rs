use badger::collection::{Collection, Document, FieldKind};
use badger::errors::ErrorKind;
use badger_derive::Document;
use badger_int_test::test_util::{shoe, Shoe};

#[derive(Debug, Clone, Document)]
struct Location {
    city: String,
    country: Option<String>,
}

#[derive(Debug, Clone, Document)]
struct Venue {
    #[badger(rename = "Name")]
    venue_name: String,
    #[badger(flatten)]
    location: Location,
    capacity: u32,
}

#[derive(Debug, Clone, Document)]
struct Clash {
    city: String,
    #[badger(flatten)]
    location: Location,
}

#[test]
fn test_derived_field_names() {
    let schema = Shoe::schema().unwrap();
    assert_eq!(
        schema.field_names(),
        vec!["id", "colour", "tags", "nickname", "details.name", "details.shoe_size"]
    );
}

#[test]
fn test_derived_field_kinds() {
    let schema = Shoe::schema().unwrap();
    let kinds: Vec<FieldKind> = schema.fields().map(|f| f.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            FieldKind::Unsupported,
            FieldKind::String,
            FieldKind::StringList,
            FieldKind::String,
            FieldKind::String,
            FieldKind::Unsupported,
        ]
    );
}

#[test]
fn test_skipped_field_is_not_searchable() {
    let schema = Shoe::schema().unwrap();
    assert!(schema.get("internal_note").is_none());
    assert_eq!(
        schema.resolve("internal_note").unwrap_err().kind(),
        &ErrorKind::SchemaError
    );
}

#[test]
fn test_rename_and_flatten() {
    let schema = Venue::schema().unwrap();
    assert_eq!(schema.field_names(), vec!["Name", "city", "country", "capacity"]);

    let venues = Collection::<Venue>::builder().default_field("name").build().unwrap();
    venues.insert(Venue {
        venue_name: "Royal Albert Hall".to_string(),
        location: Location {
            city: "London".to_string(),
            country: None,
        },
        capacity: 5272,
    });
    venues.insert(Venue {
        venue_name: "Sydney Opera House".to_string(),
        location: Location {
            city: "Sydney".to_string(),
            country: Some("Australia".to_string()),
        },
        capacity: 5738,
    });

    assert_eq!(venues.default_field(), Some("Name"));
    assert_eq!(venues.search("hall").unwrap().len(), 1);
    assert_eq!(venues.search("country:australia").unwrap()[0].location.city, "Sydney");
    assert_eq!(venues.search("-country:australia").unwrap()[0].location.city, "London");
}

#[test]
fn test_flatten_collision_is_schema_error() {
    let err = Clash::schema().unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::SchemaError);
    assert!(err.message().contains("duplicate field"));
    assert!(Collection::<Clash>::new().is_err());
}

#[test]
fn test_optional_string_reads_empty_when_missing() {
    let shoes = Collection::<Shoe>::new().unwrap();
    let mut named = shoe(1, "red", &[], "Runner", 9);
    named.nickname = Some("Rosso".to_string());
    shoes.insert(named);
    shoes.insert(shoe(2, "blue", &[], "Hiker", 8));

    let found = shoes.search("nickname:ross").unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, 1);

    // an empty contains-value matches every string, including a missing one
    let query = badger::query::Query::contains("nickname", "");
    assert_eq!(shoes.find(&query).unwrap().len(), 2);
}
