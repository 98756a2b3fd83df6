mod common;

use common::{assemble, node, reference_file, reference_words};
use dawglex::{ChainPolicy, DawgConfig, DawgFile, TraversalFault};

#[test]
fn test_sentinel_and_out_of_range_indices_yield_nothing() {
    let file = reference_file();
    let store = file.store();
    assert!(store.get(0).is_none());
    assert!(store.get(store.len()).is_none());
    assert!(store.get(u32::MAX).is_none());
    assert_eq!(store.siblings(0).count(), 0);
}

#[test]
fn test_letter_index_chain_lists_penultimate_letters() {
    let file = reference_file();
    let store = file.store();
    let start = file.letter_index().start(b'a').expect("words end in 'a'");
    let range = 0..file.header().section1_end;
    let chain: Vec<_> = store.chain(start, range.clone()).collect();

    let mut expected: Vec<u8> = reference_words()
        .iter()
        .map(|word| word.as_bytes())
        .filter(|word| word.last() == Some(&b'a'))
        .map(|word| word[word.len() - 2])
        .collect();
    expected.sort_unstable();
    expected.dedup();

    let letters: Vec<u8> = chain.iter().map(|(_, node)| node.letter).collect();
    assert_eq!(letters, expected);
    assert!(chain.iter().all(|(index, _)| range.contains(index)));
    let (last, init) = chain.split_last().expect("non-empty chain");
    assert!(last.1.last_sibling);
    assert!(init.iter().all(|(_, node)| !node.last_sibling));
}

#[test]
fn test_chain_stops_at_non_node_record() {
    // Node 2 has no last_sibling flag; node 3 is a zero record.
    let bytes = assemble(
        &[
            None,
            node(b'x', true, true, 0),
            node(b'b', true, false, 0),
            None,
            node(b'y', true, true, 0),
        ],
        4,
        &[(b'a', 2)],
    );
    let file = DawgFile::from_bytes(bytes, DawgConfig::default()).expect("load");
    let store = file.store();
    let mut chain = store.chain(2, 0..4);
    assert_eq!(chain.next().map(|(index, node)| (index, node.letter)), Some((2, b'b')));
    assert!(chain.next().is_none());
    assert_eq!(chain.fault(), Some(TraversalFault::NotANode { index: 3 }));
    assert!(!chain.fault().expect("fault").is_anomaly());
}

#[test]
fn test_chain_stops_at_section_end() {
    // Neither Section 1 node carries last_sibling.
    let bytes = assemble(
        &[
            None,
            node(b'b', true, false, 0),
            node(b'c', true, false, 0),
            node(b'y', true, true, 0),
        ],
        3,
        &[(b'a', 1)],
    );
    let file = DawgFile::from_bytes(bytes, DawgConfig::default()).expect("load");
    let mut chain = file.store().chain(1, 0..3);
    assert_eq!(chain.by_ref().count(), 2);
    assert_eq!(
        chain.fault(),
        Some(TraversalFault::IndexOutOfRange { index: 3, limit: 3 })
    );
}

#[test]
fn test_chain_length_cap() {
    let mut nodes = vec![None];
    for letter in b'b'..=b'i' {
        nodes.push(node(letter, true, false, 0));
    }
    nodes.push(node(b'j', true, true, 0));
    let section1_end = nodes.len() as u32;
    nodes.push(node(b'y', true, true, 0));
    let bytes = assemble(&nodes, section1_end, &[(b'a', 1)]);

    let config = DawgConfig::default().with_max_chain_len(4);
    let file = DawgFile::from_bytes(bytes, config).expect("load");
    let mut chain = file.store().chain(1, 0..section1_end);
    assert_eq!(chain.by_ref().count(), 4);
    assert_eq!(
        chain.fault(),
        Some(TraversalFault::ChainLengthExceeded { start: 1, max: 4 })
    );
}

#[test]
fn test_find_open_range_continues_past_chain_end() {
    let bytes = assemble(
        &[
            None,
            node(b'b', true, true, 0),
            node(b'c', true, true, 0),
            node(b'y', true, true, 0),
        ],
        3,
        &[(b'a', 1)],
    );
    let file = DawgFile::from_bytes(bytes, DawgConfig::default()).expect("load");
    let store = file.store();
    assert!(store.find(1, 0..3, b'c', ChainPolicy::Strict).is_none());
    let (index, found) = store
        .find(1, 0..3, b'c', ChainPolicy::OpenRange)
        .expect("open range hit");
    assert_eq!(index, 2);
    assert_eq!(found.letter, b'c');
    // The scan never leaves the section.
    assert!(store.find(1, 0..3, b'y', ChainPolicy::OpenRange).is_none());
    assert!(store.find(0, 0..3, b'b', ChainPolicy::OpenRange).is_none());
}

#[test]
fn test_follow_records_path() {
    let file = reference_file();
    let store = file.store();
    let start = file.letter_index().start(b'i').expect("words end in 'i'");
    let mut path = Vec::new();
    let found = store
        .follow(start, 0..file.header().section1_end, b"q", ChainPolicy::Strict, &mut path)
        .expect("qi reversed");
    assert!(found.end_of_entry);
    assert_eq!(path.len(), 1);
    assert_eq!(store.get(path[0]).map(|node| node.letter), Some(b'q'));
}
