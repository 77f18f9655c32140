use crate::config::{ScoringConfig, MAX_CANDIDATES_LIMIT};
use crate::model::{AttributeRecord, Candidate, CatalogEntry};

/// Trait defining the interface for ranking catalog entries against one product.
pub trait Scorer {
    fn score_entry(&self, attrs: &AttributeRecord, original_name: &str, entry: &CatalogEntry) -> f64;
    fn score_and_rank<'a>(
        &self,
        attrs: &AttributeRecord,
        original_name: &str,
        catalog: &'a [CatalogEntry],
    ) -> Vec<Candidate<'a>>;
}

/// Additive, case-insensitive scorer driven by [`ScoringConfig`].
pub struct MatchScorer {
    cfg: ScoringConfig,
}

impl MatchScorer {
    pub fn new(cfg: ScoringConfig) -> Self {
        Self { cfg }
    }
}

impl Default for MatchScorer {
    fn default() -> Self {
        Self::new(ScoringConfig::default())
    }
}

/// `needle` is non-empty and occurs in the already lower-cased `haystack`.
fn contains_term(haystack: &str, needle: &str) -> bool {
    !needle.is_empty() && haystack.contains(&needle.to_lowercase())
}

/// Embeds brand and category exactly as extracted; empty values stay empty.
pub fn match_reason(attrs: &AttributeRecord) -> String {
    format!("Brand: {}, Category: {}", attrs.brand, attrs.category)
}

impl Scorer for MatchScorer {
    /// Sums the contribution of every signal that fires for this entry.
    fn score_entry(&self, attrs: &AttributeRecord, original_name: &str, entry: &CatalogEntry) -> f64 {
        let cfg = &self.cfg;
        let entry_name = entry.name.to_lowercase();
        let mut score = 0.0;

        if contains_term(&entry_name, &attrs.brand) {
            score += cfg.brand_weight;
        }
        if !attrs.category.is_empty() && attrs.category.to_lowercase() == entry.category.to_lowercase() {
            score += cfg.category_weight;
        }
        if contains_term(&entry_name, &attrs.size) {
            score += cfg.size_weight;
        }
        if contains_term(&entry_name, &attrs.flavor) {
            score += cfg.flavor_weight;
        }
        if contains_term(&entry_name, &attrs.product_type) {
            score += cfg.product_type_weight;
        }

        // Repeated tokens count once per occurrence.
        for token in original_name.to_lowercase().split_whitespace() {
            if token.chars().count() > cfg.min_token_chars && entry_name.contains(token) {
                score += cfg.token_weight;
            }
        }

        score
    }

    /// Returns at most `max_candidates` entries scoring above the threshold,
    /// best first. Equal scores keep catalog order.
    fn score_and_rank<'a>(
        &self,
        attrs: &AttributeRecord,
        original_name: &str,
        catalog: &'a [CatalogEntry],
    ) -> Vec<Candidate<'a>> {
        let reason = match_reason(attrs);
        let mut candidates: Vec<Candidate<'a>> = catalog
            .iter()
            .filter_map(|entry| {
                let score = self.score_entry(attrs, original_name, entry);
                (score > self.cfg.threshold).then(|| Candidate {
                    entry,
                    score,
                    match_reason: reason.clone(),
                })
            })
            .collect();

        // sort_by is stable
        candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
        candidates.truncate(self.cfg.max_candidates.min(MAX_CANDIDATES_LIMIT));
        candidates
    }
}
