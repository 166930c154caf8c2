use super::{Membership, Memberships, SystemTypeId};
use crate::attribute::AttrTypeId;
use crate::object::ObjectId;
use crate::Mask;

const A0: AttrTypeId = AttrTypeId::new(0);
const A1: AttrTypeId = AttrTypeId::new(1);
const SYS_A: SystemTypeId = SystemTypeId::new(10);
const SYS_B: SystemTypeId = SystemTypeId::new(11);
const NO_OBJECTS: [(ObjectId, Mask); 0] = [];

fn objects_of(memberships: &Memberships, system: SystemTypeId) -> Vec<u32> {
    memberships
        .get(system)
        .expect("system is registered")
        .objects()
        .map(ObjectId::get)
        .collect()
}

#[test]
fn test_membership_matches_subset() {
    let membership = Membership::new(crate::mask![A0, A1]);
    assert!(!membership.matches(Mask::empty()));
    assert!(!membership.matches(Mask::from(A1)));
    assert!(membership.matches(crate::mask![A0, A1]));
    assert!(membership.matches(crate::mask![A0, A1, AttrTypeId::new(7)]));
}

#[test]
fn test_sync_joins_and_leaves() {
    let mut memberships = Memberships::default();
    memberships.register(SYS_A, crate::mask![A0, A1], NO_OBJECTS);
    memberships.register(SYS_B, Mask::from(A0), NO_OBJECTS);

    let id = ObjectId::new(0);
    memberships.sync(id, Mask::from(A0));
    assert_eq!(objects_of(&memberships, SYS_A), Vec::<u32>::new());
    assert_eq!(objects_of(&memberships, SYS_B), vec![0]);

    memberships.sync(id, crate::mask![A0, A1]);
    assert_eq!(objects_of(&memberships, SYS_A), vec![0]);
    assert_eq!(objects_of(&memberships, SYS_B), vec![0]);

    memberships.sync(id, Mask::from(A1));
    assert_eq!(objects_of(&memberships, SYS_A), Vec::<u32>::new());
    assert_eq!(objects_of(&memberships, SYS_B), Vec::<u32>::new());
}

#[test]
fn test_sync_orders_by_id() {
    let mut memberships = Memberships::default();
    memberships.register(SYS_A, Mask::empty(), NO_OBJECTS);

    for id in [3, 1, 2] {
        memberships.sync(ObjectId::new(id), Mask::empty());
    }
    assert_eq!(objects_of(&memberships, SYS_A), vec![1, 2, 3]);

    memberships.sync(ObjectId::new(1), Mask::from(A0));
    assert_eq!(objects_of(&memberships, SYS_A), vec![1, 2, 3], "re-sync does not reorder");

    memberships.remove_object(ObjectId::new(2));
    assert_eq!(objects_of(&memberships, SYS_A), vec![1, 3]);
}

#[test]
fn test_remove_many_from_large_set() {
    let mut memberships = Memberships::default();
    memberships.register(SYS_A, Mask::empty(), NO_OBJECTS);

    for id in 0..50_000 {
        memberships.sync(ObjectId::new(id), Mask::empty());
    }
    for id in 0..50_000 {
        memberships.remove_object(ObjectId::new(id));
    }
    assert!(objects_of(&memberships, SYS_A).is_empty());
}

#[test]
fn test_register_seeds_from_existing() {
    let mut memberships = Memberships::default();
    memberships.register(
        SYS_A,
        Mask::from(A0),
        [(ObjectId::new(0), Mask::from(A0)), (ObjectId::new(1), Mask::from(A1))],
    );
    assert_eq!(objects_of(&memberships, SYS_A), vec![0]);
}

#[test]
fn test_reregister_keeps_position_and_flag() {
    let mut memberships = Memberships::default();
    memberships.register(SYS_A, Mask::from(A0), NO_OBJECTS);
    memberships.register(SYS_B, Mask::from(A0), NO_OBJECTS);
    memberships.get_mut(SYS_A).expect("registered").set_enabled(false);

    memberships.register(SYS_A, Mask::from(A1), [(ObjectId::new(5), Mask::from(A1))]);

    let order: Vec<_> = memberships.map.keys().copied().collect();
    assert_eq!(order, vec![SYS_A, SYS_B]);
    let membership = memberships.get(SYS_A).expect("registered");
    assert!(!membership.is_enabled());
    assert_eq!(membership.signature(), Mask::from(A1));
    assert_eq!(objects_of(&memberships, SYS_A), vec![5]);
}

#[test]
fn test_remove_object_ignores_signature() {
    let mut memberships = Memberships::default();
    memberships.register(SYS_A, Mask::empty(), NO_OBJECTS);
    memberships.sync(ObjectId::new(0), Mask::from(A0));
    assert_eq!(objects_of(&memberships, SYS_A), vec![0]);

    memberships.remove_object(ObjectId::new(0));
    assert!(memberships.get(SYS_A).expect("registered").is_empty());
}
