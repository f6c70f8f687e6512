use crate::ic::ICError;
use crate::ic::label::LabelTable;
use crate::ic::memory::Memory;

#[test]
fn test_backward_reference_adds_address_to_base() {
    let mut m = Memory::new();
    let mut labels = LabelTable::new();
    labels.define(7, 1000, &mut m).unwrap();
    m.set_word(500, 5);
    labels.reference(7, 500, &mut m);
    assert_eq!(m.word(500), 1005);
}

#[test]
fn test_forward_references_resolve_through_chain() {
    let mut m = Memory::new();
    let mut labels = LabelTable::new();
    for site in [500, 510, 520] {
        m.set_word(site, 0);
        labels.reference(9, site, &mut m);
    }
    // The chain is threaded through the operand words themselves.
    assert_eq!(m.word(520), 510);
    assert_eq!(m.word(510), 500);
    assert_eq!(m.word(500), 0);
    labels.define(9, 777, &mut m).unwrap();
    for site in [500, 510, 520] {
        assert_eq!(m.word(site), 777);
    }
}

#[test]
fn test_duplicate_definition_is_fatal() {
    let mut m = Memory::new();
    let mut labels = LabelTable::new();
    labels.define(5, 600, &mut m).unwrap();
    let error = labels.define(5, 700, &mut m).unwrap_err();
    assert_eq!(error, ICError::DuplicateLabel(5));
    assert_eq!(error.to_string(), "DUPLICATE LABEL #5");
}

#[test]
fn test_unit_end_reports_unset_label() {
    let mut m = Memory::new();
    let mut labels = LabelTable::new();
    m.set_word(500, 0);
    labels.reference(10, 500, &mut m);
    assert_eq!(labels.check_resolved(), Err(ICError::UnsetLabel(10)));
    labels.define(10, 800, &mut m).unwrap();
    assert_eq!(labels.check_resolved(), Ok(()));
}

#[test]
fn test_clear_starts_a_fresh_namespace() {
    let mut m = Memory::new();
    let mut labels = LabelTable::new();
    labels.define(3, 600, &mut m).unwrap();
    labels.clear();
    labels.define(3, 900, &mut m).unwrap();
    assert_eq!(labels.check_resolved(), Ok(()));
}

#[test]
fn test_reference_after_definition_does_not_touch_chain() {
    let mut m = Memory::new();
    let mut labels = LabelTable::new();
    labels.define(4, 1234, &mut m).unwrap();
    m.set_word(500, 0);
    m.set_word(510, 0);
    labels.reference(4, 500, &mut m);
    labels.reference(4, 510, &mut m);
    assert_eq!(m.word(500), 1234);
    assert_eq!(m.word(510), 1234);
    assert_eq!(labels.check_resolved(), Ok(()));
}
