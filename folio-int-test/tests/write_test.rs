use folio::collection::DocumentId;
use folio::common::Value;
use folio::doc;
use folio::errors::ErrorKind;
use folio::filter::{all, by_id, field};
use folio_int_test::test_util::{
    cleanup, create_books_context, create_test_context, insert_sample_books, run_test, titles,
};

#[ctor::ctor]
fn init() {
    colog::init();
}

#[test]
fn test_insert_generates_ids() {
    run_test(
        create_test_context,
        |ctx| {
            let books = ctx.books()?;
            let first = books.insert(doc! { title: "1984" })?;
            let second = books.insert(doc! { title: "Animal Farm" })?;
            assert!(first < second);

            let stored = books.get_by_id(&first)?;
            assert_eq!(stored.get("_id"), Some(&Value::from(first)));
            assert_eq!(books.find(by_id(second))?.size(), 1);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_insert_with_explicit_id() {
    run_test(
        create_test_context,
        |ctx| {
            let books = ctx.books()?;
            let id = DocumentId::create_id(1_000_000_000_000_000_001)?;
            assert_eq!(books.insert(doc! { _id: id, title: "1984" })?, id);

            let err = books.insert(doc! { _id: id, title: "Duplicate" }).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::DuplicateKey);
            assert_eq!(books.size()?, 1);

            let err = books.insert(doc! { _id: "isbn-0451524934", title: "Bad id" }).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::InvalidArgument);

            assert_eq!(DocumentId::create_id(42).unwrap_err().kind(), &ErrorKind::InvalidId);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_insert_many_is_all_or_nothing() {
    run_test(
        create_books_context,
        |ctx| {
            let books = ctx.books()?;
            let existing = books.find(field("title").eq("1984"))?.first().and_then(|d| d.id()).unwrap();

            let err = books
                .insert_many(vec![
                    doc! { title: "Dune" },
                    doc! { _id: existing, title: "Clash" },
                ])
                .unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::DuplicateKey);
            assert_eq!(books.size()?, 10);
            assert!(books.find(field("title").eq("Dune"))?.is_empty());

            let id = DocumentId::create_id(1_000_000_000_000_000_002)?;
            let err = books
                .insert_many(vec![doc! { _id: id, title: "A" }, doc! { _id: id, title: "B" }])
                .unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::DuplicateKey);
            assert_eq!(books.size()?, 10);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_update_many_counts_matched_and_modified() {
    run_test(
        create_books_context,
        |ctx| {
            let books = ctx.books()?;
            let result = books.update_many(field("author").eq("George Orwell"), &doc! { price: 8.5 })?;
            // Animal Farm already costs 8.5
            assert_eq!(result.matched_count(), 2);
            assert_eq!(result.modified_count(), 1);

            let result = books.update_many(field("author").eq("Nobody"), &doc! { price: 1 })?;
            assert_eq!(result.matched_count(), 0);
            assert!(result.affected_document_ids().is_empty());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_update_nested_and_new_fields() {
    run_test(
        create_test_context,
        |ctx| {
            let books = ctx.books()?;
            let id = books.insert(doc! { title: "1984", stock: { warehouse: 3 } })?;

            books.update_by_id(&id, &doc! { "stock.warehouse": 5, "stock.store": 2, isbn: "0451524934" })?;
            let updated = books.get_by_id(&id)?;
            assert_eq!(updated.get_path(&["stock", "warehouse"]), Some(&Value::from(5)));
            assert_eq!(updated.get_path(&["stock", "store"]), Some(&Value::from(2)));
            assert_eq!(updated.get("isbn"), Some(&Value::from("0451524934")));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_invalid_updates() {
    run_test(
        create_books_context,
        |ctx| {
            let books = ctx.books()?;
            let first = books.find(all())?.first().unwrap();
            let id = first.id().unwrap();

            let err = books.update_one(all(), &doc! {}).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::InvalidArgument);

            let err = books.update_one(all(), &doc! { "$set": { price: 1 } }).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::InvalidArgument);

            let other = DocumentId::create_id(1_000_000_000_000_000_003)?;
            let err = books.update_by_id(&id, &doc! { _id: other }).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::InvalidArgument);

            // restating the current id is allowed
            books.update_by_id(&id, &doc! { _id: id, price: 1.0 })?;
            assert_eq!(books.get_by_id(&id)?.get("price"), Some(&Value::from(1.0)));

            let err = books.update_by_id(&other, &doc! { price: 2.0 }).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::NotFound);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_failed_update_many_changes_nothing() {
    run_test(
        create_books_context,
        |ctx| {
            let books = ctx.books()?;
            let id = books.find(all())?.first().and_then(|d| d.id()).unwrap();
            let other = DocumentId::create_id(1_000_000_000_000_000_004)?;

            let err = books.update_many(all(), &doc! { price: 0.0, _id: other }).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::InvalidArgument);
            assert!(books.find(field("price").eq(0.0))?.is_empty());
            assert!(books.get_by_id(&id).is_ok());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_delete_operations() {
    run_test(
        create_books_context,
        |ctx| {
            let books = ctx.books()?;

            let result = books.delete_one(field("genre").eq("Fiction"))?;
            assert_eq!(result.modified_count(), 1);
            assert!(books.find(field("title").eq("To Kill a Mockingbird"))?.is_empty());

            let result = books.delete_many(field("genre").eq("Fiction"))?;
            assert_eq!(result.modified_count(), 3);
            assert_eq!(books.size()?, 6);

            let result = books.delete_many(field("genre").eq("Fiction"))?;
            assert_eq!(result.modified_count(), 0);

            let id = books.find(all())?.first().and_then(|d| d.id()).unwrap();
            books.delete_by_id(&id)?;
            let err = books.delete_by_id(&id).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::NotFound);
            let err = books.get_by_id(&id).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::NotFound);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_deleted_document_can_be_reinserted() {
    run_test(
        create_test_context,
        |ctx| {
            let books = ctx.books()?;
            let ids = insert_sample_books(&books)?;
            let removed = books.get_by_id(&ids[0])?;
            books.delete_by_id(&ids[0])?;

            books.insert(removed)?;
            let order = titles(books.find(all())?);
            // reinserted documents go to the end of the collection
            assert_eq!(order.last().map(String::as_str), Some("To Kill a Mockingbird"));
            Ok(())
        },
        cleanup,
    )
}
