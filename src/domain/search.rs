use serde::{Deserialize, Serialize};

/// One page of search results and the total number of matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPage<T> {
    #[serde(default = "Vec::new")]
    pub docs: Vec<T>,
    #[serde(rename = "numFound", default)]
    pub num_found: u64,
}

impl<T> SearchPage<T> {
    pub fn empty() -> Self {
        Self {
            docs: Vec::new(),
            num_found: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}

impl<T> Default for SearchPage<T> {
    fn default() -> Self {
        Self::empty()
    }
}
