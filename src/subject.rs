use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};

/// Computer science subject areas that can be listed.
static SUBJECTS: Lazy<BTreeMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut m = BTreeMap::new();
    m.insert("cs.AI", "Artificial Intelligence");
    m.insert("cs.AR", "Hardware Architecture");
    m.insert("cs.CC", "Computational Complexity");
    m.insert("cs.CE", "Computational Engineering, Finance, and Science");
    m.insert("cs.CG", "Computational Geometry");
    m.insert("cs.CL", "Computation and Language");
    m.insert("cs.CR", "Cryptography and Security");
    m.insert("cs.CV", "Computer Vision and Pattern Recognition");
    m.insert("cs.CY", "Computers and Society");
    m.insert("cs.DB", "Databases");
    m.insert("cs.DC", "Distributed, Parallel, and Cluster Computing");
    m.insert("cs.DL", "Digital Libraries");
    m.insert("cs.DM", "Discrete Mathematics");
    m.insert("cs.DS", "Data Structures and Algorithms");
    m.insert("cs.ET", "Emerging Technologies");
    m.insert("cs.FL", "Formal Languages and Automata Theory");
    m.insert("cs.GL", "General Literature");
    m.insert("cs.GR", "Graphics");
    m.insert("cs.GT", "Computer Science and Game Theory");
    m.insert("cs.HC", "Human-Computer Interaction");
    m.insert("cs.IR", "Information Retrieval");
    m.insert("cs.IT", "Information Theory");
    m.insert("cs.LG", "Machine Learning");
    m.insert("cs.LO", "Logic in Computer Science");
    m.insert("cs.MA", "Multiagent Systems");
    m.insert("cs.MM", "Multimedia");
    m.insert("cs.MS", "Mathematical Software");
    m.insert("cs.NA", "Numerical Analysis");
    m.insert("cs.NE", "Neural and Evolutionary Computing");
    m.insert("cs.NI", "Networking and Internet Architecture");
    m.insert("cs.OH", "Other Computer Science");
    m.insert("cs.OS", "Operating Systems");
    m.insert("cs.PF", "Performance");
    m.insert("cs.PL", "Programming Languages");
    m.insert("cs.RO", "Robotics");
    m.insert("cs.SC", "Symbolic Computation");
    m.insert("cs.SD", "Sound");
    m.insert("cs.SE", "Software Engineering");
    m.insert("cs.SI", "Social and Information Networks");
    m.insert("cs.SY", "Systems and Control");
    m
});

/// Whether `code` names a known subject area.
pub fn contains(code: &str) -> bool {
    SUBJECTS.contains_key(code)
}

/// Human-readable name for a subject code.
pub fn name(code: &str) -> Option<&'static str> {
    SUBJECTS.get(code).copied()
}

/// All `(code, name)` pairs, ordered by code.
pub fn iter() -> impl Iterator<Item = (&'static str, &'static str)> {
    SUBJECTS.iter().map(|(code, name)| (*code, *name))
}

/// Guard run before any listing request.
pub fn require(code: &str) -> Result<()> {
    if contains(code) {
        Ok(())
    } else {
        Err(Error::SubjectNotFound(code.to_string()))
    }
}

/// Split a subject field such as
/// `"Computation and Language (cs.CL); Information Retrieval (cs.IR)"` into
/// its short codes, in order.
///
/// Segments without a `word.word` code are dropped.
pub fn parse_subject_list(text: &str) -> Vec<String> {
    static CODE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+\.\w+").unwrap());

    let mut codes = Vec::new();
    for segment in text.split(';') {
        match CODE_RE.find(segment) {
            Some(m) => codes.push(m.as_str().to_string()),
            None => {
                let segment = segment.trim();
                if !segment.is_empty() {
                    tracing::debug!(segment, "subject segment without a short code");
                }
            }
        }
    }
    codes
}
