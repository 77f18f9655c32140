use crate::config::Vocabulary;
use crate::llm::{LanguageModel, RequestOptions};
use crate::model::{AttributeRecord, ExtractError, Extraction, ExtractionSource};
use serde_json::Value;
use tracing::warn;

pub const UNKNOWN_CATEGORY: &str = "unknown";

/// Builds the single instruction sent to the model for one product name.
pub fn build_prompt(product_name: &str) -> String {
    format!(
        r#"Extract product information from this name: "{product_name}"

Return a JSON object with these keys:
- brand: brand name (pepsi, lays, doritos, etc)
- category: product category (carbonated drinks, snacks, sports drinks, juices, cereals)
- size: size or volume (330ml, 40g, 500ml, etc)
- flavor: flavor or variant (cherry, bbq, nacho cheese, etc)
- product_type: main product type (cola, chips, juice, etc)

Example: "Cherry Pepsi 330ml Can" -> {{"brand": "pepsi", "category": "carbonated drinks", "size": "330ml", "flavor": "cherry", "product_type": "cola"}}

Respond only with valid JSON."#
    )
}

/// Converts model output into an [`AttributeRecord`]. The text must be a JSON
/// object; unknown keys are ignored and missing or null keys become "".
pub fn parse_attributes(text: &str) -> Result<AttributeRecord, ExtractError> {
    let value: Value = serde_json::from_str(text.trim())?;
    let map = value.as_object().ok_or(ExtractError::NotAnObject)?;

    let field = |key: &str| match map.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    };

    Ok(AttributeRecord {
        brand: field("brand"),
        category: field("category"),
        size: field("size"),
        flavor: field("flavor"),
        product_type: field("product_type"),
    })
}

/// Keyword-only extraction. Only brand and category are derived.
pub fn fallback_attributes(product_name: &str, vocabulary: &Vocabulary) -> AttributeRecord {
    let name = product_name.to_lowercase();

    let brand = vocabulary
        .brands
        .iter()
        .find(|brand| !brand.is_empty() && name.contains(&brand.to_lowercase()))
        .cloned()
        .unwrap_or_default();

    let category = vocabulary
        .categories
        .iter()
        .find(|category| {
            category
                .split_whitespace()
                .any(|word| name.contains(&word.to_lowercase()))
        })
        .cloned()
        .unwrap_or_else(|| UNKNOWN_CATEGORY.to_string());

    AttributeRecord {
        brand,
        category,
        ..AttributeRecord::default()
    }
}

pub struct AttributeExtractor<M> {
    model: M,
    options: RequestOptions,
    vocabulary: Vocabulary,
}

impl<M: LanguageModel> AttributeExtractor<M> {
    pub fn new(model: M, options: RequestOptions, vocabulary: Vocabulary) -> Self {
        Self {
            model,
            options,
            vocabulary,
        }
    }

    /// Always yields a complete record; never fails.
    pub async fn extract(&self, product_name: &str) -> AttributeRecord {
        self.extract_traced(product_name).await.attributes
    }

    /// Like [`extract`](Self::extract), but also reports which path was taken.
    pub async fn extract_traced(&self, product_name: &str) -> Extraction {
        match self.extract_with_model(product_name).await {
            Ok(attributes) => Extraction {
                attributes,
                source: ExtractionSource::Model,
            },
            Err(e) => {
                warn!("LLM extraction failed for '{}': {}", product_name, e);
                Extraction {
                    attributes: fallback_attributes(product_name, &self.vocabulary),
                    source: ExtractionSource::Fallback,
                }
            }
        }
    }

    async fn extract_with_model(&self, product_name: &str) -> Result<AttributeRecord, ExtractError> {
        let prompt = build_prompt(product_name);
        let text = self.model.request(&prompt, &self.options).await?;
        parse_attributes(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LlmError;
    use std::sync::Mutex;

    struct FailingModel;

    #[async_trait::async_trait]
    impl LanguageModel for FailingModel {
        async fn request(&self, _: &str, _: &RequestOptions) -> Result<String, LlmError> {
            Err(LlmError::Status {
                status: 503,
                body: "unavailable".into(),
            })
        }
    }

    /// Returns a fixed reply and records the prompts it was given.
    struct FixedModel {
        reply: String,
        prompts: Mutex<Vec<(String, RequestOptions)>>,
    }

    impl FixedModel {
        fn new(reply: &str) -> Self {
            Self {
                reply: reply.to_string(),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait::async_trait]
    impl LanguageModel for FixedModel {
        async fn request(&self, prompt: &str, options: &RequestOptions) -> Result<String, LlmError> {
            self.prompts.lock().unwrap().push((prompt.to_string(), *options));
            Ok(self.reply.clone())
        }
    }

    fn options() -> RequestOptions {
        RequestOptions {
            temperature: 0.1,
            max_tokens: 300,
        }
    }

    fn extractor<M: LanguageModel>(model: M) -> AttributeExtractor<M> {
        AttributeExtractor::new(model, options(), Vocabulary::default())
    }

    #[test]
    fn prompt_embeds_name_fields_and_example() {
        let prompt = build_prompt("Doritos Nacho 40g");
        assert!(prompt.contains("\"Doritos Nacho 40g\""));
        for key in ["brand", "category", "size", "flavor", "product_type"] {
            assert!(prompt.contains(key), "missing {key}");
        }
        assert!(prompt.contains("Cherry Pepsi 330ml Can"));
        assert!(prompt.contains("Respond only with valid JSON"));
    }

    #[test]
    fn fallback_finds_brand_and_category() {
        let attrs = fallback_attributes("Cherry Pepsi 330ml Can", &Vocabulary::default());
        assert_eq!(attrs.brand, "pepsi");
        assert_eq!(attrs.category, "unknown");
        assert_eq!(attrs.size, "");

        let attrs = fallback_attributes("Gatorade Sports Drink Lemon", &Vocabulary::default());
        assert_eq!(attrs.brand, "gatorade");
        // "drink" does not contain "drinks", so only "sports" hits.
        assert_eq!(attrs.category, "sports drinks");
    }

    #[test]
    fn fallback_category_matches_any_word() {
        // "drinks" appears, so the first category containing that word wins.
        let attrs = fallback_attributes("Energy Drinks Pack", &Vocabulary::default());
        assert_eq!(attrs.category, "carbonated drinks");
    }

    #[test]
    fn fallback_with_no_hits() {
        let attrs = fallback_attributes("Unknown Mystery Item XYZ", &Vocabulary::default());
        assert_eq!(
            attrs,
            AttributeRecord {
                category: "unknown".into(),
                ..AttributeRecord::default()
            }
        );
    }

    #[test]
    fn fallback_respects_vocabulary_order() {
        let vocab = Vocabulary {
            brands: vec!["lay".into(), "lays".into()],
            categories: vec![],
        };
        let attrs = fallback_attributes("Lays Classic", &vocab);
        assert_eq!(attrs.brand, "lay");
        assert_eq!(attrs.category, "unknown");
    }

    #[test]
    fn parse_fills_missing_and_ignores_extra_keys() {
        let attrs = parse_attributes(r#"{"brand": "lays", "size": 40, "flavor": null, "note": "x"}"#).unwrap();
        assert_eq!(attrs.brand, "lays");
        assert_eq!(attrs.category, "");
        assert_eq!(attrs.size, "40");
        assert_eq!(attrs.flavor, "");
        assert_eq!(attrs.product_type, "");
    }

    #[test]
    fn parse_rejects_non_objects_and_prose() {
        assert!(matches!(parse_attributes("[1, 2]"), Err(ExtractError::NotAnObject)));
        assert!(matches!(parse_attributes("\"pepsi\""), Err(ExtractError::NotAnObject)));
        assert!(matches!(
            parse_attributes("Sure! Here is the JSON: {}"),
            Err(ExtractError::InvalidJson(_))
        ));
    }

    #[tokio::test]
    async fn model_reply_is_used_verbatim() {
        let model = FixedModel::new(
            r#"{"brand": "pepsi", "category": "carbonated drinks", "size": "330ml", "flavor": "cherry", "product_type": "cola"}"#,
        );
        let ex = extractor(model);
        let out = ex.extract_traced("Cherry Pepsi 330ml Can").await;
        assert_eq!(out.source, ExtractionSource::Model);
        assert_eq!(out.attributes.flavor, "cherry");
        assert_eq!(out.attributes.product_type, "cola");

        let prompts = ex.model.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].0.contains("Cherry Pepsi 330ml Can"));
        assert_eq!(prompts[0].1, options());
    }

    #[tokio::test]
    async fn service_failure_equals_fallback() {
        let ex = extractor(FailingModel);
        for name in ["Cherry Pepsi 330ml Can", "Quaker Oats Cereals 500g", ""] {
            let out = ex.extract_traced(name).await;
            assert_eq!(out.source, ExtractionSource::Fallback);
            assert_eq!(out.attributes, fallback_attributes(name, &Vocabulary::default()));
        }
    }

    #[tokio::test]
    async fn malformed_reply_equals_fallback() {
        let ex = extractor(FixedModel::new(r#"{"brand": "pepsi", "#));
        let attrs = ex.extract("Cherry Pepsi 330ml Can").await;
        assert_eq!(attrs, fallback_attributes("Cherry Pepsi 330ml Can", &Vocabulary::default()));
        assert_eq!(attrs.flavor, "");
    }
}
