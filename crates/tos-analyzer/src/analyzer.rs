use std::sync::Arc;

use tos_core::{AnalysisRecord, Chunk};

use crate::{CompletionClient, CompletionError, SYSTEM_PROMPT};

/// Prompts the completion capability for one chunk and parses its reply.
#[derive(Clone)]
pub struct ChunkAnalyzer {
    client: Arc<dyn CompletionClient>,
}

impl ChunkAnalyzer {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    /// Analyze one chunk.
    ///
    /// Transport failures are returned as errors. A reply that is not a
    /// well-formed record is never an error: it yields the empty default
    /// record so the rest of the document can still be merged.
    #[tracing::instrument(skip(self, chunk), fields(chunk = chunk.index, chars = chunk.text.chars().count()))]
    pub async fn analyze(&self, chunk: &Chunk) -> Result<AnalysisRecord, CompletionError> {
        let raw = self.client.complete(SYSTEM_PROMPT, &chunk.text).await?;

        match parse_record(&raw) {
            Some(record) => Ok(record),
            None => {
                tracing::warn!(output_len = raw.len(), "model output is not a valid record, using empty default");
                Ok(AnalysisRecord::default())
            }
        }
    }
}

/// Strictly parse model output as a single JSON object with the record keys.
///
/// Anything else (prose, markdown fences, arrays, wrong value types) is
/// rejected. Missing keys and `null` lists are accepted as empty.
pub fn parse_record(raw: &str) -> Option<AnalysisRecord> {
    let value: serde_json::Value = serde_json::from_str(raw).ok()?;
    if !value.is_object() {
        return None;
    }
    serde_json::from_value(value).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct FixedClient(Result<String, ()>);

    #[async_trait]
    impl CompletionClient for FixedClient {
        async fn complete(&self, system: &str, _user: &str) -> Result<String, CompletionError> {
            assert_eq!(system, SYSTEM_PROMPT);
            self.0
                .clone()
                .map_err(|_| CompletionError::Transport("connection refused".to_string()))
        }
    }

    fn chunk(text: &str) -> Chunk {
        Chunk {
            index: 0,
            text: text.to_string(),
        }
    }

    fn analyzer(reply: Result<&str, ()>) -> ChunkAnalyzer {
        ChunkAnalyzer::new(Arc::new(FixedClient(reply.map(|s| s.to_string()))))
    }

    #[test]
    fn test_parse_valid_record() {
        let raw = r#"{"summary":"You can be billed yearly.","red_flags":["Arbitration"],
                      "financial_clauses":["Auto-renewal"],"recommendations":[]}"#;

        let record = parse_record(raw).unwrap();

        assert_eq!(record.summary, "You can be billed yearly.");
        assert_eq!(record.red_flags, vec!["Arbitration"]);
        assert_eq!(record.financial_clauses, vec!["Auto-renewal"]);
        assert!(record.recommendations.is_empty());
    }

    #[test]
    fn test_parse_rejects_wrapped_output() {
        assert!(parse_record("```json\n{\"summary\":\"x\"}\n```").is_none());
        assert!(parse_record("Here is the analysis: {\"summary\":\"x\"}").is_none());
        assert!(parse_record("").is_none());
        assert!(parse_record(r#"["x", [], [], []]"#).is_none());
        assert!(parse_record(r#"{"summary": 3}"#).is_none());
    }

    #[tokio::test]
    async fn test_malformed_output_falls_back_to_default() {
        let record = analyzer(Ok("I cannot help with that."))
            .analyze(&chunk("Some terms."))
            .await
            .unwrap();

        assert_eq!(record, AnalysisRecord::default());
    }

    #[tokio::test]
    async fn test_partial_object_fills_defaults() {
        let record = analyzer(Ok(r#"{"summary":"Short.","red_flags":null}"#))
            .analyze(&chunk("Some terms."))
            .await
            .unwrap();

        assert_eq!(record.summary, "Short.");
        assert!(record.red_flags.is_empty());
    }

    #[tokio::test]
    async fn test_transport_failure_propagates() {
        let result = analyzer(Err(())).analyze(&chunk("Some terms.")).await;

        assert!(matches!(result, Err(CompletionError::Transport(_))));
    }

    #[tokio::test]
    async fn test_multibyte_chunk() {
        let record = analyzer(Ok(r#"{"summary":"Gebühren fällig."}"#))
            .analyze(&chunk("Die Gebühren sind sofort fällig."))
            .await
            .unwrap();

        assert_eq!(record.summary, "Gebühren fällig.");
    }
}
