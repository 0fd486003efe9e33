use badger::query::{parse, Query};
use badger_int_test::test_util::{
    article_ids, cleanup, create_test_context, insert_test_articles, insert_test_shoes, run_test,
    shoe_ids,
};

fn assert_search(query: &str, expected: &str) {
    run_test(
        create_test_context,
        |ctx| {
            let articles = ctx.articles();
            insert_test_articles(&articles);

            let found = articles.search(query)?;
            assert_eq!(article_ids(&found), expected, "query {:?}", query);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_default_field() {
    assert_search("moon", "1");
}

#[test]
fn test_grouped_or() {
    assert_search("tags:(cheese OR moon)", "1,3,5");
}

#[test]
fn test_grouped_implicit_and() {
    assert_search("tags:(cheese moon)", "1");
}

#[test]
fn test_grouped_and() {
    assert_search("tags:(cheese AND moon)", "1");
}

#[test]
fn test_date_from() {
    assert_search("date:[2010-06-14 TO]", "1,2");
}

#[test]
fn test_date_until() {
    assert_search("date:[TO 2010-06-14]", "1,2,5");
}

#[test]
fn test_date_between() {
    assert_search("date:[1865-01-01 TO 2010-06-14]", "1,2,5");
    assert_search("date:[1800-01-01 TO 1900-01-01]", "5");
    assert_search("date:[1900-01-01 TO 2010-06-13]", "");
}

#[test]
fn test_whole_word_term() {
    assert_search("content:grape", "3");
    assert_search("content:grapefruit", "2,4");
}

#[test]
fn test_whole_word_phrase() {
    assert_search("content:\"view from\"", "1");
    assert_search("content:\"right after all\"", "1");
    assert_search("content:\"from view\"", "");
}

#[test]
fn test_negation() {
    assert_search("-tags:citrus", "1,5");
    assert_search("cheese -moon", "3");
}

#[test]
fn test_empty_query_matches_all() {
    assert_search("", "1,2,3,4,5");
}

#[test]
fn test_field_names_ignore_case() {
    assert_search("TAGS:Lemon", "3");
}

#[test]
fn test_substring_on_plain_field() {
    assert_search("title:grape", "4");
}

#[test]
fn test_parsed_query_reused_across_collections() {
    run_test(
        create_test_context,
        |ctx| {
            let articles = ctx.articles();
            let shoes = ctx.shoes();
            insert_test_articles(&articles);
            insert_test_shoes(&shoes);

            let query = parse("tags:primary", &shoes.valid_fields(), "colour")?;
            assert_eq!(shoe_ids(&shoes.find(&query)?), "1,2,3");

            // the articles schema has tags too
            let query = Query::contains("tags", "citrus");
            assert_eq!(article_ids(&articles.find(&query)?), "2,3,4");
            assert_eq!(shoe_ids(&shoes.find(&query)?), "");
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_embedded_and_numeric_fields() {
    run_test(
        create_test_context,
        |ctx| {
            let shoes = ctx.shoes();
            insert_test_shoes(&shoes);

            assert_eq!(shoe_ids(&shoes.search("details.name:walker")?), "2");
            assert_eq!(shoe_ids(&shoes.search("red")?), "1");
            assert_eq!(shoe_ids(&shoes.search("tags:reddish -red")?), "4,5");
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_unsupported_field_fails_at_evaluation() {
    run_test(
        create_test_context,
        |ctx| {
            let shoes = ctx.shoes();
            insert_test_shoes(&shoes);

            // id is listed, so it parses, but it cannot be searched
            let query = parse("id:[1 TO 3]", &shoes.valid_fields(), "colour")?;
            let err = shoes.find(&query).unwrap_err();
            assert_eq!(err.kind(), &badger::errors::ErrorKind::SchemaError);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_machine_built_query() {
    run_test(
        create_test_context,
        |ctx| {
            let shoes = ctx.shoes();
            insert_test_shoes(&shoes);

            let mut colours: Vec<String> = (0..10_000).map(|i| format!("c{}", i)).collect();
            colours.push("red".to_string());
            let query = format!("colour:({})", colours.join(" OR "));
            assert_eq!(shoe_ids(&shoes.search(&query)?), "1");

            let all_terms = vec!["primary"; 10_000].join(" ");
            assert_eq!(shoe_ids(&shoes.search(&format!("tags:({})", all_terms))?), "1,2,3");
            Ok(())
        },
        cleanup,
    )
}
