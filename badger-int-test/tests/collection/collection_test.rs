use badger::collection::{Collection, CollectionConfig};
use badger::errors::ErrorKind;
use badger_int_test::test_util::{
    article, cleanup, create_test_context, insert_test_articles, run_test, Article, Shoe,
};

#[test]
fn test_collection_settings() {
    run_test(
        create_test_context,
        |ctx| {
            let articles = ctx.articles();
            assert!(articles.is_empty());
            assert_eq!(articles.default_field(), Some("title"));
            assert_eq!(articles.whole_word_fields(), vec!["content"]);
            assert_eq!(
                articles.valid_fields(),
                vec!["id", "title", "date", "tags", "content"]
            );
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_insert_and_get() {
    run_test(
        create_test_context,
        |ctx| {
            let articles = ctx.articles();
            insert_test_articles(&articles);
            assert_eq!(articles.count(), 5);

            let ids = articles.ids();
            assert_eq!(ids.len(), 5);
            let first = articles.get(ids[0]).unwrap();
            assert_eq!(first.title, "Moon made of cheese");
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_clones_share_documents() {
    run_test(
        create_test_context,
        |ctx| {
            let articles = ctx.articles();
            let other = articles.clone();
            other.insert(article("9", "Shared", "", &[], "seen by both"));

            assert_eq!(articles.count(), 1);
            assert_eq!(articles.search("content:both")?.len(), 1);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_whole_word_field_added_later() {
    run_test(
        create_test_context,
        |ctx| {
            let articles = ctx.articles();
            insert_test_articles(&articles);

            // title is a plain field, so substrings match
            assert_eq!(articles.search("title:lun")?.len(), 1);

            articles.set_whole_word_field("Title")?;
            assert_eq!(articles.whole_word_fields(), vec!["content", "title"]);
            assert!(articles.search("title:lun")?.is_empty());
            assert_eq!(articles.search("title:lune")?.len(), 1);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_unknown_whole_word_field() {
    run_test(
        create_test_context,
        |ctx| {
            let err = ctx.articles().set_whole_word_field("body").unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::SchemaError);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_builder_rejects_bad_settings() {
    let err = Collection::<Article>::builder()
        .default_field("body")
        .build()
        .unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::SchemaError);

    let err = Collection::<Article>::builder()
        .default_field("  ")
        .build()
        .unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::InvalidOperation);

    // details.shoe_size exists but cannot be matched
    let err = Collection::<Shoe>::builder()
        .whole_word_field("details.shoe_size")
        .build()
        .unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::SchemaError);
}

#[test]
fn test_builder_from_config() {
    let mut config = CollectionConfig::new();
    config.set_default_field("content").unwrap();
    config.add_whole_word_field("content").unwrap();

    let articles = Collection::<Article>::builder().config(config).build().unwrap();
    insert_test_articles(&articles);

    let found = articles.search("grape").unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, "3");
}

#[test]
fn test_search_without_default_field() {
    let articles = Collection::<Article>::new().unwrap();
    insert_test_articles(&articles);

    assert_eq!(articles.default_field(), None);
    assert_eq!(articles.search("tags:moon").unwrap().len(), 2);
    let err = articles.search("moon").unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::ParseError);
}
