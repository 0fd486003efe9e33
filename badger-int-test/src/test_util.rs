use badger::collection::Collection;
use badger::errors::BadgerResult;
use badger_derive::Document;
use itertools::Itertools;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Runs a test between a setup and a teardown step.
///
/// The teardown runs even when the test body fails, whether by returning an
/// error or by panicking. A failure in any of the three steps fails the test;
/// a panic from the body is re-raised after the teardown.
pub fn run_test<T, B, A>(before: B, test: T, after: A)
where
    T: Fn(TestContext) -> BadgerResult<()>,
    B: Fn() -> BadgerResult<TestContext>,
    A: Fn(TestContext) -> BadgerResult<()>,
{
    let ctx = match before() {
        Ok(ctx) => ctx,
        Err(e) => panic!("Before run failed: {:?}", e),
    };

    let test_result = panic::catch_unwind(AssertUnwindSafe(|| test(ctx.clone())));
    let after_result = after(ctx);

    match test_result {
        Ok(Ok(())) => {}
        Ok(Err(e)) => panic!("Test failed: {:?}", e),
        Err(payload) => {
            if let Err(e) = &after_result {
                eprintln!("After run failed: {:?}", e);
            }
            panic::resume_unwind(payload);
        }
    }
    if let Err(e) = after_result {
        panic!("After run failed: {:?}", e);
    }
}

#[derive(Debug, Clone, Document)]
pub struct Article {
    pub id: String,
    pub title: String,
    pub date: String,
    pub tags: Vec<String>,
    pub content: String,
}

#[derive(Debug, Clone, Document)]
pub struct Details {
    pub name: String,
    pub shoe_size: u32,
}

#[derive(Debug, Clone, Document)]
pub struct Shoe {
    pub id: i64,
    pub colour: String,
    pub tags: Vec<String>,
    pub nickname: Option<String>,
    #[badger(embed)]
    pub details: Details,
    #[badger(skip)]
    pub internal_note: String,
}

#[derive(Clone)]
pub struct TestContext {
    articles: Collection<Article>,
    shoes: Collection<Shoe>,
}

impl TestContext {
    pub fn new(articles: Collection<Article>, shoes: Collection<Shoe>) -> Self {
        Self { articles, shoes }
    }

    pub fn articles(&self) -> Collection<Article> {
        self.articles.clone()
    }

    pub fn shoes(&self) -> Collection<Shoe> {
        self.shoes.clone()
    }
}

/// Creates empty article and shoe collections. Articles search `title` by
/// default and match `content` by whole words.
pub fn create_test_context() -> BadgerResult<TestContext> {
    let articles = Collection::<Article>::builder()
        .default_field("title")
        .whole_word_field("content")
        .build()?;
    let shoes = Collection::<Shoe>::builder().default_field("colour").build()?;
    Ok(TestContext::new(articles, shoes))
}

pub fn cleanup(ctx: TestContext) -> BadgerResult<()> {
    let articles = ctx.articles();
    for id in articles.ids() {
        articles.remove(id)?;
    }
    let shoes = ctx.shoes();
    for id in shoes.ids() {
        shoes.remove(id)?;
    }
    log::debug!("test collections cleared");
    Ok(())
}

pub fn article(id: &str, title: &str, date: &str, tags: &[&str], content: &str) -> Article {
    Article {
        id: id.to_string(),
        title: title.to_string(),
        date: date.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        content: content.to_string(),
    }
}

pub fn test_articles() -> Vec<Article> {
    vec![
        article(
            "1",
            "Moon made of cheese",
            "2010-06-14",
            &["moon", "cheese"],
            "Discredited view from history is proved right after all!",
        ),
        article(
            "2",
            "Weekly Citrus Roundup",
            "2010-06-14T10:20",
            &["citrus"],
            "Grapefruit are awesome. Lemons suck.",
        ),
        article(
            "3",
            "Recipe: Zesty Cheese",
            "",
            &["cheese", "lemon", "citrus"],
            "Goes well with grape.",
        ),
        article(
            "4",
            "Grapefruit is the New Lemon",
            "T11:52",
            &["citrus"],
            "Grapefruit on the up.",
        ),
        article("5", "De la terre à la lune", "1865-01-01", &["moon"], ""),
    ]
}

pub fn insert_test_articles(articles: &Collection<Article>) {
    for doc in test_articles() {
        articles.insert(doc);
    }
}

pub fn shoe(id: i64, colour: &str, tags: &[&str], name: &str, shoe_size: u32) -> Shoe {
    Shoe {
        id,
        colour: colour.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        nickname: None,
        details: Details {
            name: name.to_string(),
            shoe_size,
        },
        internal_note: String::new(),
    }
}

pub fn insert_test_shoes(shoes: &Collection<Shoe>) {
    shoes.insert(shoe(1, "red", &["primary", "reddish"], "Runner", 9));
    shoes.insert(shoe(2, "green", &["primary"], "Walker", 10));
    shoes.insert(shoe(3, "blue", &["primary"], "Hiker", 8));
    shoes.insert(shoe(4, "pink", &["reddish"], "Dancer", 6));
    shoes.insert(shoe(5, "crimson", &["reddish"], "Sprinter", 11));
}

/// Comma-joined article ids, in result order.
pub fn article_ids(found: &[Arc<Article>]) -> String {
    found.iter().map(|a| a.id.as_str()).join(",")
}

/// Comma-joined shoe ids, in result order.
pub fn shoe_ids(found: &[Arc<Shoe>]) -> String {
    found.iter().map(|s| s.id).join(",")
}
