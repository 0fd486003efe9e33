use badger::errors::ErrorKind;
use badger_int_test::test_util::{cleanup, create_test_context, insert_test_articles, run_test};

fn assert_parse_error(query: &str, message: &str) {
    run_test(
        create_test_context,
        |ctx| {
            let articles = ctx.articles();
            insert_test_articles(&articles);

            let err = articles.search(query).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::ParseError, "query {:?}", query);
            assert!(
                err.message().contains(message),
                "query {:?} gave {:?}",
                query,
                err.message()
            );
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_unknown_field() {
    assert_parse_error("bogus:value", "bogus");
}

#[test]
fn test_unbalanced_parens() {
    assert_parse_error("tags:(cheese moon", "expected )");
    assert_parse_error("moon)", "unexpected");
}

#[test]
fn test_bad_ranges() {
    assert_parse_error("date:[TO]", "empty range");
    assert_parse_error("date:[2010-01-01 2011-01-01]", "expected TO");
    assert_parse_error("date:[2010-01-01 TO 2011-01-01", "expected ]");
}

#[test]
fn test_dangling_operator() {
    assert_parse_error("moon AND", "unexpected end of query");
}

#[test]
fn test_unterminated_quote() {
    run_test(
        create_test_context,
        |ctx| {
            let err = ctx.articles().search("content:\"view from").unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::ParseError);
            assert_eq!(err.cause().map(|c| c.kind()), Some(&ErrorKind::LexError));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_deep_nesting() {
    let query = format!("{}moon{}", "(".repeat(1_000), ")".repeat(1_000));
    assert_parse_error(&query, "query too deeply nested");
}
