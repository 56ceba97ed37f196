//! Equi-join strategies and natural join.


use relalg::prelude::*;
use relalg::tuple;
use test_data_gen::{movie, movie_star, stars_in, studio, synthetic};

#[test]
fn test_equi_join_shape() {
    let m = movie(IndexKind::None);
    let s = studio(IndexKind::None);
    let j = m.join("studioName", "name", &s).unwrap();

    assert_eq!(j.schema().arity(), m.schema().arity() + s.schema().arity());
    assert_eq!(j.key(), m.key());
    assert_eq!(j.tuple_count(), 4);

    let l = j.column_index("studioName").unwrap();
    let r = j.column_index("name").unwrap();
    assert!(j.tuples().iter().all(|t| t[l] == t[r]));
    assert_eq!(
        j.tuple_at(0),
        Some(&tuple!["Star_Wars", 1977, 124, "sciFi", "Fox", 12345, "Fox", "Los_Angeles", 7777])
    );
}

#[test]
fn test_join_renames_colliding_right_attributes() {
    let star = movie_star(IndexKind::None);
    let starred = stars_in(IndexKind::None);
    let j = star.join("name", "name", &starred).unwrap();

    let names: Vec<&str> = j.schema().names().collect();
    assert_eq!(
        names,
        ["name", "address", "gender", "birthdate", "title", "year", "name2"]
    );
    // Source schemas are left alone.
    assert!(starred.schema().contains("name"));
    assert!(!starred.schema().contains("name2"));
    assert_eq!(j.tuple_count(), 3);
}

#[test]
fn test_self_join_on_key() {
    let m = movie(IndexKind::None);
    let j = m.join("title year", "title year", &m).unwrap();
    assert_eq!(j.tuple_count(), m.tuple_count());
    assert!(j.schema().contains("title2"));
}

#[test]
fn test_join_errors() {
    let m = movie(IndexKind::None);
    let s = studio(IndexKind::None);
    assert!(matches!(
        m.join("studioName year", "name", &s),
        Err(OpError::Plan(_))
    ));
    assert!(matches!(
        m.join("studio", "name", &s),
        Err(OpError::Core(relalg::core::Error::UnknownAttribute(a))) if a == "studio"
    ));
}

#[test]
fn test_strategies_agree() {
    let left = synthetic("l", 200, 7, IndexKind::None);
    let right = synthetic("r", 50, 7, IndexKind::Hash);

    let nl = left.join_with("grp", "grp", &right, JoinStrategy::NestedLoop).unwrap();
    let hash = left.join_with("grp", "grp", &right, JoinStrategy::Hash).unwrap();
    assert_eq!(nl.tuples(), hash.tuples());
    assert_eq!(nl.schema(), hash.schema());

    // Joining on the right key: the index strategy reads the right index.
    let nl = left.join_with("grp", "id", &right, JoinStrategy::NestedLoop).unwrap();
    let idx = left.join_with("grp", "id", &right, JoinStrategy::Index).unwrap();
    assert_eq!(nl.tuples(), idx.tuples());
    assert_eq!(idx.tuple_count(), 200);

    // Not a key join: the index strategy falls back without changing results.
    let fallback = left.join_with("grp", "grp", &right, JoinStrategy::Index).unwrap();
    assert_eq!(fallback.tuples(), hash.tuples());
}

#[test]
fn test_natural_join() {
    let star = movie_star(IndexKind::None);
    let starred = stars_in(IndexKind::None);
    let j = star.natural_join(&starred).unwrap();

    let names: Vec<&str> = j.schema().names().collect();
    assert_eq!(names, ["name", "address", "gender", "birthdate", "title", "year"]);
    assert_eq!(
        j.tuples(),
        &[
            tuple!["Carrie_Fisher", "Hollywood", 'F', "9/9/99", "Star_Wars", 1977],
            tuple!["Mark_Hamill", "Brentwood", 'M', "8/8/88", "Star_Wars", 1977],
            tuple!["Harrison_Ford", "Beverly_Hills", 'M', "7/7/77", "Star_Wars_2", 1980],
        ]
    );
}

#[test]
fn test_natural_join_on_multiple_shared_attributes() {
    let m = movie(IndexKind::None);
    let j = m.natural_join(&stars_in(IndexKind::None)).unwrap();
    assert_eq!(j.schema().arity(), m.schema().arity() + 1);
    assert_eq!(j.tuple_count(), 3);
    let star = j.column_index("name").unwrap();
    assert_eq!(j.tuple_at(2).map(|t| t[star].clone()), Some(Value::from("Harrison_Ford")));
}

#[test]
fn test_index_join_sees_every_owner_of_a_repeated_key() {
    let left = synthetic("l", 20, 5, IndexKind::None);
    for kind in [IndexKind::None, IndexKind::Ordered, IndexKind::Hash] {
        let mut right = synthetic("r", 10, 5, kind);
        right.insert(tuple![3, 3, "again"]).unwrap();
        right.insert(tuple![4, 4, "again"]).unwrap();

        let nl = left.join_with("grp", "id", &right, JoinStrategy::NestedLoop).unwrap();
        let hash = left.join_with("grp", "id", &right, JoinStrategy::Hash).unwrap();
        let idx = left.join_with("grp", "id", &right, JoinStrategy::Index).unwrap();
        assert_eq!(nl.tuple_count(), 28, "{kind}");
        assert_eq!(hash.tuples(), nl.tuples(), "{kind}");
        assert_eq!(idx.tuples(), nl.tuples(), "{kind}");
    }
}
