use std::collections::HashSet;
use std::io;
use std::path::Path;

const SKIP_FILES: [&str; 3] = ["README.md", "USERS.md", "LICENSE"];

/// Word list used to keep offensive terms out of suggested translations.
/// Loaded once at startup; an absent or empty list filters nothing.
#[derive(Debug, Default)]
pub struct ProfanityFilter {
    words: HashSet<String>,
}

impl ProfanityFilter {
    pub fn from_env() -> Self {
        let Some(dir) = std::env::var("PROFANITY_WORDLIST_DIR")
            .ok()
            .filter(|value| !value.trim().is_empty())
        else {
            return Self::default();
        };

        match Self::load_from_dir(Path::new(&dir)) {
            Ok(filter) => {
                tracing::info!(words = filter.len(), %dir, "profanity word list loaded");
                filter
            }
            Err(err) => {
                tracing::warn!(error = %err, %dir, "profanity word list not loaded");
                Self::default()
            }
        }
    }

    /// Reads every plain file in `dir` (one word per line), skipping the
    /// documentation files that ship alongside public word lists.
    pub fn load_from_dir(dir: &Path) -> io::Result<Self> {
        let mut words = HashSet::new();

        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let name = entry.file_name();
            if SKIP_FILES.iter().any(|skip| name.to_str() == Some(skip)) {
                continue;
            }

            let content = std::fs::read_to_string(&path)?;
            for line in content.lines() {
                let word = line.trim();
                if !word.is_empty() {
                    words.insert(word.to_lowercase());
                }
            }
        }

        Ok(Self { words })
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn is_bad_word(&self, word: &str) -> bool {
        self.words.contains(&word.trim().to_lowercase())
    }

    /// Drops flagged candidates, keeping the ranking order of the rest.
    pub fn censor(&self, candidates: Vec<String>) -> Vec<String> {
        candidates
            .into_iter()
            .filter(|candidate| !self.is_bad_word(candidate))
            .collect()
    }
}
