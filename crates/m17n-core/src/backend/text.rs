//! Backend text: sequences of code points that are not guaranteed to be
//! valid Unicode scalar values.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid code point U+{code:04X} at {index}")]
pub struct DecodeError {
    pub index: usize,
    pub code: u32,
}

/// Backend-owned text. Indices and lengths count code points, not bytes.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct MText(Vec<u32>);

impl MText {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn from_code_points(points: Vec<u32>) -> Self {
        Self(points)
    }

    pub fn code_points(&self) -> &[u32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push(&mut self, c: char) {
        self.0.push(c as u32);
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Code points `[start, end)`, clamped to the text.
    pub fn slice(&self, start: usize, end: usize) -> MText {
        let end = end.min(self.0.len());
        let start = start.min(end);
        Self(self.0[start..end].to_vec())
    }

    pub fn to_utf8(&self) -> Result<String, DecodeError> {
        self.0
            .iter()
            .enumerate()
            .map(|(index, &code)| char::from_u32(code).ok_or(DecodeError { index, code }))
            .collect()
    }

    /// Decode, replacing each invalid code point with U+FFFD.
    pub fn to_utf8_lossy(&self) -> String {
        self.0
            .iter()
            .map(|&c| char::from_u32(c).unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect()
    }
}

impl From<&str> for MText {
    fn from(s: &str) -> Self {
        Self(s.chars().map(|c| c as u32).collect())
    }
}

impl From<String> for MText {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl fmt::Debug for MText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MText({:?})", self.to_utf8_lossy())
    }
}

/// One group of the backend's candidate list: either a run of single
/// characters or a list of strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateGroup {
    Text(MText),
    List(Vec<MText>),
}

impl CandidateGroup {
    pub fn len(&self) -> usize {
        match self {
            Self::Text(t) => t.len(),
            Self::List(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
