use badger::query::Query;
use badger_int_test::test_util::{
    article_ids, cleanup, create_test_context, insert_test_articles, insert_test_shoes, run_test,
    shoe_ids,
};

#[test]
fn test_update_matching() {
    run_test(
        create_test_context,
        |ctx| {
            let articles = ctx.articles();
            insert_test_articles(&articles);

            let updated = articles.update(&Query::contains("tags", "citrus"), |a| {
                a.tags.push("fruit".to_string());
            })?;
            assert_eq!(updated, 3);
            assert_eq!(article_ids(&articles.search("tags:fruit")?), "2,3,4");
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_update_reindexes_whole_word_field() {
    run_test(
        create_test_context,
        |ctx| {
            let articles = ctx.articles();
            insert_test_articles(&articles);

            let before = articles.search("content:grape")?;
            articles.update(&Query::contains("content", "grape"), |a| {
                a.content = "Goes well with melon.".to_string();
            })?;

            assert!(articles.search("content:grape")?.is_empty());
            assert_eq!(article_ids(&articles.search("content:melon")?), "3");
            // documents handed out before the update are unchanged
            assert_eq!(before[0].content, "Goes well with grape.");
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_update_embedded_field() {
    run_test(
        create_test_context,
        |ctx| {
            let shoes = ctx.shoes();
            insert_test_shoes(&shoes);

            let updated = shoes.update(&Query::exact("colour", &["pink", "crimson"]), |s| {
                s.details.name = format!("{} II", s.details.name);
            })?;
            assert_eq!(updated, 2);
            assert_eq!(shoe_ids(&shoes.search("details.name:\"ii\"")?), "4,5");
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_update_nothing_matches() {
    run_test(
        create_test_context,
        |ctx| {
            let articles = ctx.articles();
            insert_test_articles(&articles);
            let updated = articles.update(&Query::Nil, |a| a.title.clear())?;
            assert_eq!(updated, 0);
            assert_eq!(articles.search("")?.len(), 5);
            Ok(())
        },
        cleanup,
    )
}
