use rowlink::prelude::*;

use crate::model::tree::{find, Row, Tree};

use std::sync::{Arc, OnceLock};

#[test]
fn tree_links_parents_and_children() {
    let t = Tree::new();
    let rows = [
        Row::root(1),
        Row::child(2, 1),
        Row::child(3, 1),
        Row::child(4, 2),
    ];
    let nodes = t.loader.load(&rows).unwrap();
    assert_eq!(nodes.len(), 4);

    let root = find(&nodes, 1);
    assert_eq!(root.parent_id(), None);
    assert_eq!(root.child_ids(), vec![2, 3]);
    assert_eq!(find(&nodes, 2).child_ids(), vec![4]);
    assert_eq!(find(&nodes, 4).parent_id(), Some(2));
    assert!(find(&nodes, 4).child_ids().is_empty());

    let children = root.children.get().unwrap();
    assert!(Arc::ptr_eq(&children[0], find(&nodes, 2)));
}

#[test]
fn children_may_precede_their_parents() {
    let t = Tree::new();
    let rows = [Row::child(3, 2), Row::child(2, 1), Row::root(1)];
    let nodes = t.loader.load(&rows).unwrap();
    assert_eq!(
        nodes.iter().map(|n| n.id).collect::<Vec<_>>(),
        vec![3, 2, 1]
    );
    assert_eq!(find(&nodes, 1).child_ids(), vec![2]);
    assert_eq!(find(&nodes, 3).parent_id(), Some(2));
}

#[test]
fn missing_parent_is_unknown_key() {
    let t = Tree::new();
    let err = t.loader.load(&[Row::child(2, 9)]).unwrap_err();
    assert_eq!(
        err,
        LoadError::UnknownKey {
            entity: "node".into(),
            key: "9".into(),
        }
    );
}

#[test]
fn two_parents_violate_arity() {
    let t = Tree::new();
    let rows = [Row::root(1), Row::root(2), Row::child(3, 1), Row::child(3, 2)];
    let err = t.loader.load(&rows).unwrap_err();
    match err {
        LoadError::ArityViolation {
            expected,
            linked,
            ..
        } => {
            assert_eq!(expected, Arity::ZeroOrOne);
            assert_eq!(linked, vec!["1", "2"]);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(t.children.to_string(), "ZERO_OR_ONE-to-MANY relation <node, node>");
}

// Two kinds that refer to each other through two relations: a person has one favourite
// pet, and a pet has one owner, not necessarily the same person.
struct PetRow {
    person: Option<u8>,
    favourite: Option<u8>,
    pet: Option<u8>,
    owner: Option<u8>,
}

struct Person {
    id: u8,
    favourite: OnceLock<Arc<Pet>>,
}

struct Pet {
    id: u8,
    owner: OnceLock<u8>,
}

#[test]
fn cyclic_relations_resolve_after_loading() {
    let person = EntityKind::new("person", |r: &PetRow| r.person, |r: &PetRow| Person {
        id: r.person.unwrap_or_default(),
        favourite: OnceLock::new(),
    });
    let pet = EntityKind::new("pet", |r: &PetRow| r.pet, |r: &PetRow| Pet {
        id: r.pet.unwrap_or_default(),
        owner: OnceLock::new(),
    });
    let favourite = RelationKind::builder(&person, &pet)
        .zero_or_one_to_one(|r: &PetRow| r.person, |r: &PetRow| r.favourite)
        .set_one_left(|p: &Arc<Person>, pet| {
            let _ = p.favourite.set(pet);
        })
        .build()
        .unwrap();
    let owner = RelationKind::builder(&pet, &person)
        .zero_or_one_to_one(|r: &PetRow| r.pet, |r: &PetRow| r.owner)
        .set_one_left(|p: &Arc<Pet>, person| {
            let _ = p.owner.set(person.id);
        })
        .build()
        .unwrap();
    let loader = Loader::builder(&person)
        .relation(&favourite)
        .relation(&owner)
        .build();
    assert_eq!(loader.entity_count(), 2);
    assert_eq!(loader.relation_count(), 2);

    let rows = [
        PetRow {
            person: Some(1),
            favourite: Some(20),
            pet: Some(10),
            owner: Some(2),
        },
        PetRow {
            person: Some(2),
            favourite: Some(10),
            pet: Some(20),
            owner: Some(1),
        },
    ];
    let people = loader.load(&rows).unwrap();
    let favourites: Vec<(u8, u8, u8)> = people
        .iter()
        .map(|p| {
            let pet = p.favourite.get().unwrap();
            (p.id, pet.id, *pet.owner.get().unwrap())
        })
        .collect();
    assert_eq!(favourites, vec![(1, 20, 1), (2, 10, 2)]);
}
