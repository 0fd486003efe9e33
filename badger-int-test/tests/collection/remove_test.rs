use badger::errors::ErrorKind;
use badger::query::Query;
use badger_int_test::test_util::{
    article, article_ids, cleanup, create_test_context, insert_test_articles, run_test,
};

#[test]
fn test_remove() {
    run_test(
        create_test_context,
        |ctx| {
            let articles = ctx.articles();
            insert_test_articles(&articles);

            let moon = articles.find_ids(&Query::contains("tags", "moon"))?;
            assert_eq!(moon.len(), 2);
            for id in &moon {
                articles.remove(*id)?;
            }

            assert_eq!(articles.count(), 3);
            assert_eq!(article_ids(&articles.search("")?), "2,3,4");
            assert!(articles.search("content:\"view from\"")?.is_empty());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_remove_twice() {
    run_test(
        create_test_context,
        |ctx| {
            let articles = ctx.articles();
            let id = articles.insert(article("1", "Once", "", &[], ""));
            let removed = articles.remove(id)?;
            assert_eq!(removed.title, "Once");

            let err = articles.remove(id).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::NotFound);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_stale_id_does_not_alias_new_document() {
    run_test(
        create_test_context,
        |ctx| {
            let articles = ctx.articles();
            let old = articles.insert(article("1", "Old", "", &[], "old words"));
            articles.remove(old)?;

            let new = articles.insert(article("2", "New", "", &[], "new words"));
            assert_eq!(old.index(), new.index());
            assert_ne!(old, new);
            assert!(articles.get(old).is_none());
            assert_eq!(articles.get(new).map(|a| a.id.clone()), Some("2".to_string()));

            // the reused slot only answers for the new text
            assert!(articles.search("content:old")?.is_empty());
            assert_eq!(article_ids(&articles.search("content:new")?), "2");
            Ok(())
        },
        cleanup,
    )
}
