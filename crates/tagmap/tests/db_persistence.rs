use tagmap::catalog::storefront_registry;
use tagmap::{TagIndex, TagLabel};

#[test]
fn saved_index_reloads_with_same_answers() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("tag-db.json");

    let mut index = TagIndex::new(storefront_registry());
    let sale = index.create_tag(TagLabel::new("sale").unwrap());
    let featured = index.create_tag(TagLabel::new("featured").unwrap());
    index.attach(sale, "product", 42).unwrap();
    index.attach(featured, "product", 42).unwrap();
    index.attach(sale, "customer", 7).unwrap();
    index.save_to_db(&db).unwrap();

    let reloaded = TagIndex::create_from_db(&db).unwrap();
    assert_eq!(reloaded, index);

    let tags = reloaded.tags_for("product", 42).unwrap();
    let labels: Vec<&str> = tags.iter().map(|(_, tag)| tag.label().as_str()).collect();
    assert_eq!(labels, vec!["sale", "featured"]);

    // the registry travels with the db, so resolution stays identical
    assert_eq!(
        reloaded.registry().resolve("customer").unwrap(),
        index.registry().resolve("customer").unwrap()
    );
}

#[test]
fn reloaded_index_keeps_assigning_fresh_ids() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("tag-db.json");

    let mut index = TagIndex::new(storefront_registry());
    let sale = index.create_tag(TagLabel::new("sale").unwrap());
    index.attach(sale, "product", 1).unwrap();
    index.save_to_db(&db).unwrap();

    let mut reloaded = TagIndex::create_from_db(&db).unwrap();
    let fresh = reloaded.create_tag(TagLabel::new("new").unwrap());
    assert_ne!(fresh, sale);

    let association = reloaded.attach(fresh, "product", 1).unwrap();
    assert_eq!(u64::from(association), 2);
}
