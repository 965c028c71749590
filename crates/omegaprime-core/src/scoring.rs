use crate::config::ScoringConfig;
use regex::Regex;

/// Trigger word, up to 30 chars of anything, then something date-ish
const DEADLINE_PATTERN: &str = r"(?i)(ends?|deadline|closes?).{0,30}(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec|\d{1,2}[/\-]\d{1,2})";

/// Output of the scorer
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreResult {
    /// Sum of the weights of every keyword present, rounded to 2 decimals
    pub score: f64,
    /// Matched deadline phrase, empty when there is none
    pub deadline_hint: String,
}

/// One keyword tier: a weight and the words that earn it
#[derive(Debug, Clone)]
struct KeywordTier {
    weight: f64,
    keywords: Vec<String>,
}

impl KeywordTier {
    fn new(weight: f64, keywords: &[String]) -> Self {
        let mut normalized: Vec<String> = Vec::with_capacity(keywords.len());
        for kw in keywords {
            let kw = kw.trim().to_lowercase();
            // An empty keyword would match everything
            if !kw.is_empty() && !normalized.contains(&kw) {
                normalized.push(kw);
            }
        }

        Self {
            weight,
            keywords: normalized,
        }
    }

    /// Presence test only: a keyword counts once however often it shows up
    fn points(&self, text: &str) -> f64 {
        self.keywords
            .iter()
            .filter(|kw| text.contains(kw.as_str()))
            .count() as f64
            * self.weight
    }
}

/// Keyword scorer for feed entries
///
/// Announcements are short, so plain substring hits are enough. The goal is
/// recall; a human reviews whatever makes it through.
#[derive(Debug, Clone)]
pub struct Scorer {
    tiers: [KeywordTier; 3],
    deadline: Regex,
}

impl Scorer {
    pub fn new(config: &ScoringConfig) -> Self {
        Self {
            tiers: [
                KeywordTier::new(config.high_value_weight, &config.high_value_keywords),
                KeywordTier::new(config.urgent_weight, &config.urgent_keywords),
                KeywordTier::new(config.hot_topic_weight, &config.hot_topic_keywords),
            ],
            deadline: Regex::new(DEADLINE_PATTERN).expect("Invalid deadline regex"),
        }
    }

    pub fn score(&self, title: &str, summary: &str) -> ScoreResult {
        let text = format!("{} {}", title, summary).to_lowercase();

        let total: f64 = self.tiers.iter().map(|tier| tier.points(&text)).sum();

        let deadline_hint = self
            .deadline
            .find(&text)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();

        ScoreResult {
            score: round2(total),
            deadline_hint,
        }
    }
}

impl Default for Scorer {
    fn default() -> Self {
        Self::new(&ScoringConfig::default())
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
