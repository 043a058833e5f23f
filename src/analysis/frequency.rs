use std::collections::HashMap;

/// Occurrence counts keyed by exact string, remembering first-seen order
#[derive(Debug, Default, Clone)]
pub struct FrequencyTable {
    /// Maps key -> position in `entries`
    index: HashMap<String, usize>,
    entries: Vec<(String, usize)>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        FrequencyTable {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }

    /// Count one occurrence of `key`
    pub fn record(&mut self, key: impl AsRef<str>) {
        let key = key.as_ref();
        match self.index.get(key) {
            Some(&position) => self.entries[position].1 += 1,
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), 1));
            }
        }
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    fn count(&self, key: &str) -> usize {
        self.index
            .get(key)
            .map(|&position| self.entries[position].1)
            .unwrap_or(0)
    }

    /// Sum of all counts
    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    /// Top `limit` entries by descending count; ties keep insertion order
    pub fn ranked(&self, limit: usize) -> Vec<(&str, usize)> {
        let mut ranked: Vec<(&str, usize)> = self
            .entries
            .iter()
            .map(|(key, count)| (key.as_str(), *count))
            .collect();
        // stable sort
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(limit);
        ranked
    }
}
