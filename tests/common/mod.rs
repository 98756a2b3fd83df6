#![allow(dead_code)]

use dawglex::{
    DawgBuilder, DawgConfig, DawgFile, DawgHeader, LetterIndex, Node, NodeEncoding,
    format::encode_header,
};

pub const TWO_LETTER: &[&str] = &[
    "aa", "ab", "ad", "ae", "ag", "ah", "ai", "al", "am", "an", "ar", "as", "at", "aw", "ax",
    "ay", "ba", "be", "bi", "bo", "by", "de", "do", "ed", "ef", "eh", "el", "em", "en", "er",
    "es", "ex", "fa", "go", "ha", "he", "hi", "hm", "ho", "id", "if", "in", "is", "it", "jo",
    "ka", "la", "li", "lo", "ma", "me", "mi", "mm", "mo", "mu", "my", "na", "ne", "no", "nu",
    "od", "oe", "of", "oh", "om", "on", "op", "or", "os", "ow", "ox", "oy", "pa", "pe", "pi",
    "qi", "re", "sh", "si", "so", "ta", "ti", "to", "uh", "um", "un", "up", "us", "ut", "we",
    "wo", "xi", "xu", "ya", "ye", "yo", "za",
];

pub const LONGER: &[&str] = &[
    "aardvark",
    "aardvarks",
    "aardwolf",
    "aardwolves",
    "abandon",
    "abandoned",
    "abandoning",
    "dermatoglyphics",
    "quiz",
    "quizzes",
    "rhythm",
    "rhythms",
    "strengths",
    "uncopyrightable",
    "xylophone",
    "zebra",
    "zebras",
];

pub fn reference_words() -> Vec<&'static str> {
    let mut words: Vec<&str> = TWO_LETTER.iter().chain(LONGER).copied().collect();
    words.sort_unstable();
    words
}

pub fn reference_bytes(config: &DawgConfig) -> Vec<u8> {
    DawgBuilder::with_config(config)
        .words(reference_words())
        .expect("valid words")
        .build()
        .expect("build dictionary")
}

pub fn reference_file() -> DawgFile {
    reference_file_with(DawgConfig::default())
}

pub fn reference_file_with(config: DawgConfig) -> DawgFile {
    let bytes = reference_bytes(&config);
    DawgFile::from_bytes(bytes, config).expect("load dictionary")
}

pub fn node(letter: u8, end_of_entry: bool, last_sibling: bool, child: u32) -> Option<Node> {
    Some(Node {
        letter,
        end_of_entry,
        last_sibling,
        child,
    })
}

/// Lay out a file by hand. `nodes[0]` is written as the sentinel whatever it
/// holds; `None` entries become zero records.
pub fn assemble(nodes: &[Option<Node>], section1_end: u32, starts: &[(u8, u32)]) -> Vec<u8> {
    let header = DawgHeader {
        section1_end,
        section2_end: nodes.len() as u32,
        reserved_boundary: nodes.len() as u32,
        reserved_count: 0,
    };
    let mut index = [0u32; 26];
    for &(letter, start) in starts {
        index[(letter - b'a') as usize] = start;
    }
    let mut bytes = encode_header(&header).to_vec();
    bytes.extend_from_slice(&LetterIndex::new(index).encode());
    for (position, node) in nodes.iter().enumerate() {
        let raw = match node {
            Some(node) if position > 0 => NodeEncoding::Packed.encode(node).expect("encode node"),
            _ => 0,
        };
        bytes.extend_from_slice(&raw.to_be_bytes());
    }
    bytes
}
