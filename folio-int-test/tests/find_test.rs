use folio::collection::{order_by, skip_by, FindOptions, Projection};
use folio::common::{SortOrder, SortableFields, Value};
use folio::doc;
use folio::errors::ErrorKind;
use folio::filter::{all, and, field, Filter};
use folio_int_test::test_util::{cleanup, create_books_context, create_test_context, run_test, titles};
use icu::locale::locale;
use icu_collator::options::CollatorOptions;

#[ctor::ctor]
fn init() {
    colog::init();
}

#[test]
fn test_range_operators() {
    run_test(
        create_books_context,
        |ctx| {
            let books = ctx.books()?;
            assert_eq!(books.find(field("price").gt(13.5))?.size(), 2);
            assert_eq!(books.find(field("price").gte(13.5))?.size(), 3);
            assert_eq!(books.find(field("price").lt(8.5))?.size(), 1);
            assert_eq!(books.find(field("price").lte(8.5))?.size(), 2);
            assert_eq!(books.find(field("genre").ne("Fiction"))?.size(), 6);

            let between = and(vec![field("published_year").gte(1930), field("published_year").lt(1950)]);
            assert_eq!(
                titles(books.find(between)?),
                vec!["1984", "Brave New World", "The Hobbit", "Animal Farm"]
            );
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_filter_document_matches_fluent_filter() {
    run_test(
        create_books_context,
        |ctx| {
            let books = ctx.books()?;
            let parsed = Filter::from_document(&doc! {
                genre: "Fiction",
                price: { "$gte": 9.99, "$lt": 13.0 }
            })?;
            let fluent = field("genre")
                .eq("Fiction")
                .and(field("price").gte(9.99))
                .and(field("price").lt(13.0));

            let expected = titles(books.find(fluent)?);
            assert_eq!(titles(books.find(parsed)?), expected);
            assert_eq!(expected, vec!["To Kill a Mockingbird", "The Great Gatsby"]);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_malformed_filter_documents() {
    let unknown = Filter::from_document(&doc! { price: { "$regex": "9" } });
    assert_eq!(unknown.unwrap_err().kind(), &ErrorKind::InvalidArgument);

    let mixed = Filter::from_document(&doc! { publisher: { "$eq": "x", name: "y" } });
    assert_eq!(mixed.unwrap_err().kind(), &ErrorKind::InvalidArgument);
}

#[test]
fn test_missing_field_semantics() {
    run_test(
        create_test_context,
        |ctx| {
            let books = ctx.books()?;
            books.insert(doc! { title: "Priced", price: 10 })?;
            books.insert(doc! { title: "Unpriced" })?;
            books.insert(doc! { title: "Null priced", price: (Value::Null) })?;

            assert_eq!(titles(books.find(field("price").gt(0))?), vec!["Priced"]);
            assert_eq!(titles(books.find(field("price").lte(100))?), vec!["Priced"]);
            assert_eq!(
                titles(books.find(field("price").eq(Value::Null))?),
                vec!["Unpriced", "Null priced"]
            );
            assert_eq!(
                titles(books.find(field("price").ne(10))?),
                vec!["Unpriced", "Null priced"]
            );
            assert_eq!(titles(books.find(field("price").ne(Value::Null))?), vec!["Priced"]);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_type_mismatch_never_matches() {
    run_test(
        create_books_context,
        |ctx| {
            let books = ctx.books()?;
            assert!(books.find(field("price").gt("cheap"))?.is_empty());
            assert!(books.find(field("title").lt(5))?.is_empty());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_nested_fields() {
    run_test(
        create_test_context,
        |ctx| {
            let books = ctx.books()?;
            books.insert(doc! { title: "1984", publisher: { name: "Secker & Warburg", country: "UK" } })?;
            books.insert(doc! { title: "The Road", publisher: { name: "Knopf", country: "US" } })?;

            let uk = books.find(field("publisher.country").eq("UK"))?;
            assert_eq!(titles(uk), vec!["1984"]);

            let options = FindOptions::new().projection(Projection::include(vec!["publisher.name"]).without_id());
            let names = books.find_with_options(all(), &options)?.into_vec();
            assert_eq!(
                names,
                vec![
                    doc! { publisher: { name: "Secker & Warburg" } },
                    doc! { publisher: { name: "Knopf" } }
                ]
            );
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_custom_field_separator() {
    run_test(
        || {
            let db = folio::Folio::builder().field_separator("::").open()?;
            Ok(folio_int_test::test_util::TestContext::new(db))
        },
        |ctx| {
            let books = ctx.books()?;
            books.insert(doc! { title: "1984", "publisher.name": "dotted key", publisher: { name: "Secker & Warburg" } })?;

            assert_eq!(books.find(field("publisher::name").eq("Secker & Warburg"))?.size(), 1);
            assert_eq!(books.find(field("publisher.name").eq("dotted key"))?.size(), 1);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_exclusion_projection() {
    run_test(
        create_books_context,
        |ctx| {
            let books = ctx.books()?;
            let projection = Projection::from_document(&doc! { publisher: 0, pages: 0, _id: 0 })?;
            let first = books
                .find_with_options(all(), &FindOptions::new().projection(projection))?
                .first()
                .unwrap();
            assert_eq!(first.size(), 6);
            assert!(first.get("publisher").is_none());
            assert!(first.get("_id").is_none());

            let mixed = Projection::from_document(&doc! { title: 1, pages: 0 });
            assert_eq!(mixed.unwrap_err().kind(), &ErrorKind::InvalidArgument);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_multi_key_sort() {
    run_test(
        create_books_context,
        |ctx| {
            let books = ctx.books()?;
            let sort = SortableFields::new()
                .add_sorted_field("genre".to_string(), SortOrder::Ascending)
                .add_sorted_field("price".to_string(), SortOrder::Descending);
            let sorted = books.find_with_options(all(), &FindOptions::new().sort(sort))?;
            assert_eq!(
                titles(sorted),
                vec![
                    "Brave New World",
                    "1984",
                    "The Lord of the Rings",
                    "The Hobbit",
                    "The Midnight Library",
                    "To Kill a Mockingbird",
                    "The Great Gatsby",
                    "The Catcher in the Rye",
                    "Animal Farm",
                    "Pride and Prejudice",
                ]
            );
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_sort_is_stable_and_missing_sorts_first() {
    run_test(
        create_test_context,
        |ctx| {
            let books = ctx.books()?;
            books.insert(doc! { title: "a", rank: 2 })?;
            books.insert(doc! { title: "b", rank: 1 })?;
            books.insert(doc! { title: "c" })?;
            books.insert(doc! { title: "d", rank: 1 })?;
            books.insert(doc! { title: "e", rank: 2 })?;

            let ascending = books.find_with_options(all(), &order_by("rank", SortOrder::Ascending))?;
            assert_eq!(titles(ascending), vec!["c", "b", "d", "a", "e"]);

            let descending = books.find_with_options(all(), &order_by("rank", SortOrder::Descending))?;
            assert_eq!(titles(descending), vec!["a", "e", "b", "d", "c"]);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_sort_with_collation() {
    run_test(
        create_test_context,
        |ctx| {
            let fruits = ctx.db().collection("fruits")?;
            for fruit in ["Banana", "apple", "Ôrange", "Orange", "cherry"] {
                fruits.insert(doc! { fruit: fruit })?;
            }

            let plain = fruits.find_with_options(all(), &order_by("fruit", SortOrder::Ascending))?;
            let plain: Vec<Value> = plain.filter_map(|d| d.get("fruit").cloned()).collect();
            assert_eq!(plain[0], Value::from("Banana"));

            let options = order_by("fruit", SortOrder::Ascending)
                .collator_options(CollatorOptions::default())
                .collator_preferences(locale!("fr").into());
            let collated = fruits.find_with_options(all(), &options)?;
            let collated: Vec<Value> = collated.filter_map(|d| d.get("fruit").cloned()).collect();
            assert_eq!(
                collated,
                vec![
                    Value::from("apple"),
                    Value::from("Banana"),
                    Value::from("cherry"),
                    Value::from("Orange"),
                    Value::from("Ôrange"),
                ]
            );
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_skip_and_limit_validation() {
    run_test(
        create_books_context,
        |ctx| {
            let books = ctx.books()?;
            let err = books.find_with_options(all(), &skip_by(-1)).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::InvalidArgument);

            let err = books.find_with_options(all(), &FindOptions::new().limit(-3)).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::InvalidArgument);

            assert_eq!(books.find_with_options(all(), &FindOptions::new().limit(0))?.size(), 10);
            assert!(books.find_with_options(all(), &skip_by(100))?.is_empty());
            Ok(())
        },
        cleanup,
    )
}
