use crate::extractor::AttributeExtractor;
use crate::llm::LanguageModel;
use crate::model::{CatalogEntry, ExternalProduct, ExtractionSource, MappingResult};
use crate::scorer::Scorer;
use tracing::info;

/// Outcome of one run over all external products.
#[derive(Debug, Default)]
pub struct RunReport {
    /// One entry per matched product, in input order.
    pub mappings: Vec<MappingResult>,
    pub fallbacks: usize,
    pub unmatched: usize,
}

/// Processes products one at a time: extract, score, keep the best candidate.
pub async fn run<M, S>(
    products: &[ExternalProduct],
    catalog: &[CatalogEntry],
    extractor: &AttributeExtractor<M>,
    scorer: &S,
) -> RunReport
where
    M: LanguageModel,
    S: Scorer,
{
    let mut report = RunReport::default();

    for product in products {
        info!("Processing [{}]: {}", product.id, product.name);

        let extraction = extractor.extract_traced(&product.name).await;
        if extraction.source == ExtractionSource::Fallback {
            report.fallbacks += 1;
        }
        let attrs = extraction.attributes;
        info!("Extracted: {:?}", attrs);

        let candidates = scorer.score_and_rank(&attrs, &product.name, catalog);
        let Some(best) = candidates.into_iter().next() else {
            info!("No match found");
            report.unmatched += 1;
            continue;
        };

        info!("Best match: {}", best.entry.name);
        info!("Score: {:.2}", best.score);
        info!("Reason: {}", best.match_reason);

        report.mappings.push(MappingResult {
            external_id: product.id.clone(),
            external_name: product.name.clone(),
            internal_id: best.entry.id.clone(),
            internal_name: best.entry.name.clone(),
            confidence_score: best.score,
            match_reason: best.match_reason,
        });
    }

    report
}
