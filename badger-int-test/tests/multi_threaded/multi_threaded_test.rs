use badger::query::Query;
use badger_int_test::test_util::{
    article, cleanup, create_test_context, insert_test_articles, run_test,
};
use std::sync::{Arc, Barrier};
use std::thread;

#[test]
fn test_multi_threaded_insert() {
    run_test(
        create_test_context,
        |ctx| {
            let articles = ctx.articles();

            let num_threads = 5;
            let inserts_per_thread = 20;
            let barrier = Arc::new(Barrier::new(num_threads));

            let mut handles = vec![];
            for thread_id in 0..num_threads {
                let articles = articles.clone();
                let barrier = Arc::clone(&barrier);

                handles.push(thread::spawn(move || {
                    barrier.wait();
                    let tag = format!("thread{}", thread_id);
                    for i in 0..inserts_per_thread {
                        articles.insert(article(
                            &format!("{}-{}", thread_id, i),
                            &format!("thread {} article {}", thread_id, i),
                            "",
                            &[tag.as_str()],
                            "written concurrently",
                        ));
                    }
                }));
            }

            for handle in handles {
                handle.join().expect("insert thread panicked");
            }

            assert_eq!(articles.count(), num_threads * inserts_per_thread);
            assert_eq!(
                articles.search("content:concurrently")?.len(),
                num_threads * inserts_per_thread
            );
            for thread_id in 0..num_threads {
                let query = format!("tags:thread{}", thread_id);
                assert_eq!(articles.search(&query)?.len(), inserts_per_thread);
            }
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_concurrent_search_and_update() {
    run_test(
        create_test_context,
        |ctx| {
            let articles = ctx.articles();
            insert_test_articles(&articles);

            let readers = 4;
            let barrier = Arc::new(Barrier::new(readers + 1));

            let mut handles = vec![];
            for _ in 0..readers {
                let articles = articles.clone();
                let barrier = Arc::clone(&barrier);
                handles.push(thread::spawn(move || {
                    barrier.wait();
                    for _ in 0..50 {
                        // each update swaps one tag for another, so a search
                        // sees one of them but never both or neither
                        let found = articles
                            .search("tags:(cheese OR gouda)")
                            .expect("search failed");
                        assert_eq!(found.len(), 2);
                    }
                }));
            }

            let writer = {
                let articles = articles.clone();
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    for round in 0..50 {
                        let (from, to) = if round % 2 == 0 {
                            ("cheese", "gouda")
                        } else {
                            ("gouda", "cheese")
                        };
                        articles
                            .update(&Query::exact("tags", &[from]), |a| {
                                for tag in a.tags.iter_mut().filter(|t| t.as_str() == from) {
                                    *tag = to.to_string();
                                }
                            })
                            .expect("update failed");
                    }
                })
            };

            for handle in handles {
                handle.join().expect("reader thread panicked");
            }
            writer.join().expect("writer thread panicked");

            // an even number of swaps puts every tag back
            assert_eq!(articles.search("tags:cheese")?.len(), 2);
            assert!(articles.search("tags:gouda")?.is_empty());
            Ok(())
        },
        cleanup,
    )
}
