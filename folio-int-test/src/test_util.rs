use fake::faker::lorem::en::Words;
use fake::faker::name::en::Name;
use fake::Fake;
use folio::collection::{Collection, Document, DocumentId};
use folio::common::Value;
use folio::doc;
use folio::errors::FolioResult;
use folio::Folio;
use rand::Rng;
use std::backtrace::Backtrace;

/// Runs a test between a setup and a teardown step.
///
/// `after` runs whether or not the test body fails. Failures of any step,
/// and panics, are reported with a backtrace and fail the test.
pub fn run_test<T, B, A>(before: B, test: T, after: A)
where
    T: Fn(TestContext) -> FolioResult<()> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
    B: Fn() -> FolioResult<TestContext> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
    A: Fn(TestContext) -> FolioResult<()> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
{
    let result = std::panic::catch_unwind(|| {
        let backtrace = Backtrace::capture();
        match before() {
            Ok(ctx) => match test(ctx.clone()) {
                Ok(_) => after(ctx).map_err(|e| (format!("After run failed: {:?}", e), backtrace.to_string())),
                Err(e) => {
                    let _ = after(ctx);
                    Err((format!("Test failed: {:?}", e), backtrace.to_string()))
                }
            },
            Err(e) => Err((format!("Before run failed: {:?}", e), backtrace.to_string())),
        }
    });

    let error = match result {
        Ok(Ok(_)) => return,
        Ok(Err((e, bt))) => {
            if !bt.is_empty() && !bt.contains("disabled") {
                eprintln!("\nBacktrace:\n{}", bt);
            }
            e
        }
        Err(panic_err) => {
            if let Some(s) = panic_err.downcast_ref::<&str>() {
                format!("Panic: {}", s)
            } else if let Some(s) = panic_err.downcast_ref::<String>() {
                format!("Panic: {}", s)
            } else {
                "Panic: unknown payload".to_string()
            }
        }
    };
    panic!("{}", error);
}

#[derive(Clone)]
pub struct TestContext {
    db: Folio,
}

impl TestContext {
    pub fn new(db: Folio) -> Self {
        Self { db }
    }

    pub fn db(&self) -> Folio {
        self.db.clone()
    }

    /// The `books` collection of the test database.
    pub fn books(&self) -> FolioResult<Collection> {
        self.db.collection("books")
    }
}

pub fn create_test_context() -> FolioResult<TestContext> {
    let db = Folio::builder().open()?;
    Ok(TestContext::new(db))
}

/// A test context whose `books` collection already holds [`sample_books`].
pub fn create_books_context() -> FolioResult<TestContext> {
    let ctx = create_test_context()?;
    insert_sample_books(&ctx.books()?)?;
    Ok(ctx)
}

pub fn cleanup(ctx: TestContext) -> FolioResult<()> {
    let db = ctx.db();
    for name in db.list_collection_names() {
        db.drop_collection(&name)?;
    }
    Ok(())
}

/// Ten books in the shape of a typical bookstore catalog.
pub fn sample_books() -> Vec<Document> {
    vec![
        doc! { title: "To Kill a Mockingbird", author: "Harper Lee", genre: "Fiction", published_year: 1960, price: 12.99, in_stock: true, pages: 336, publisher: "J. B. Lippincott & Co." },
        doc! { title: "1984", author: "George Orwell", genre: "Dystopian", published_year: 1949, price: 10.99, in_stock: true, pages: 328, publisher: "Secker & Warburg" },
        doc! { title: "The Great Gatsby", author: "F. Scott Fitzgerald", genre: "Fiction", published_year: 1925, price: 9.99, in_stock: true, pages: 180, publisher: "Charles Scribner's Sons" },
        doc! { title: "Brave New World", author: "Aldous Huxley", genre: "Dystopian", published_year: 1932, price: 11.5, in_stock: false, pages: 311, publisher: "Chatto & Windus" },
        doc! { title: "The Hobbit", author: "J.R.R. Tolkien", genre: "Fantasy", published_year: 1937, price: 14.99, in_stock: true, pages: 310, publisher: "George Allen & Unwin" },
        doc! { title: "The Catcher in the Rye", author: "J.D. Salinger", genre: "Fiction", published_year: 1951, price: 8.99, in_stock: true, pages: 224, publisher: "Little, Brown and Company" },
        doc! { title: "Pride and Prejudice", author: "Jane Austen", genre: "Romance", published_year: 1813, price: 7.99, in_stock: true, pages: 432, publisher: "T. Egerton, Whitehall" },
        doc! { title: "The Lord of the Rings", author: "J.R.R. Tolkien", genre: "Fantasy", published_year: 1954, price: 19.99, in_stock: true, pages: 1178, publisher: "Allen & Unwin" },
        doc! { title: "Animal Farm", author: "George Orwell", genre: "Political Satire", published_year: 1945, price: 8.5, in_stock: false, pages: 112, publisher: "Secker & Warburg" },
        doc! { title: "The Midnight Library", author: "Matt Haig", genre: "Fiction", published_year: 2020, price: 13.5, in_stock: true, pages: 304, publisher: "Canongate Books" },
    ]
}

pub fn insert_sample_books(collection: &Collection) -> FolioResult<Vec<DocumentId>> {
    let result = collection.insert_many(sample_books())?;
    Ok(result.affected_document_ids().to_vec())
}

/// `count` random books. Authors and genres are drawn from small pools so
/// that equality filters and groups hit several documents, and `price` is
/// occasionally missing.
pub fn random_books<R: Rng>(rng: &mut R, count: usize) -> Vec<Document> {
    const GENRES: [&str; 4] = ["Fiction", "Dystopian", "Fantasy", "History"];
    let authors: Vec<String> = (0..6).map(|_| Name().fake_with_rng(rng)).collect();

    (0..count)
        .map(|_| {
            let title: Vec<String> = Words(1..4).fake_with_rng(rng);
            let mut book = doc! {
                title: (title.join(" ")),
                author: (authors[rng.random_range(0..authors.len())].as_str()),
                genre: (GENRES[rng.random_range(0..GENRES.len())]),
                published_year: (rng.random_range(1900..2025) as i64),
                in_stock: (rng.random_bool(0.7)),
            };
            if rng.random_bool(0.9) {
                let cents: i64 = rng.random_range(199..3000);
                book.put("price", cents as f64 / 100.0).unwrap();
            }
            book
        })
        .collect()
}

pub fn titles(documents: impl IntoIterator<Item = Document>) -> Vec<String> {
    documents
        .into_iter()
        .map(|doc| {
            doc.get("title")
                .and_then(Value::as_string)
                .cloned()
                .unwrap_or_default()
        })
        .collect()
}

pub fn is_sorted<T: PartialOrd>(iterable: impl IntoIterator<Item = T>, ascending: bool) -> bool {
    let items: Vec<T> = iterable.into_iter().collect();
    items.windows(2).all(|pair| {
        if ascending {
            pair[0] <= pair[1]
        } else {
            pair[0] >= pair[1]
        }
    })
}
