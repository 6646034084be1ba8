//! Text statistics model: line/word/character counts and top word
//! frequencies.
//!
//! Stands in for a heavyweight model in local deployments: it has a real load
//! step (the tokenizer is compiled once and shared read-only by every
//! request) and a serializer registry keyed by response content type, so the
//! full pipeline contract is exercised without external weights.

use std::collections::HashMap;

use regex::Regex;
use serde::Serialize;

use crate::model::{InferenceError, ModelImplementation};

/// How many of the most frequent words a report carries.
const TOP_WORDS: usize = 5;

/// Tokenizer compiled once at load time and shared by all requests.
pub struct Tokenizer {
    words: Regex,
}

/// Aggregate counts over one request's text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextReport {
    pub lines: usize,
    pub words: usize,
    pub chars: usize,
    pub top_words: Vec<WordCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordCount {
    pub word: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default)]
pub struct TextStatsModel;

impl ModelImplementation for TextStatsModel {
    type Instance = Tokenizer;
    type Input = String;
    type Output = TextReport;

    fn name() -> &'static str {
        "textstats"
    }

    fn load(&self) -> Result<Tokenizer, InferenceError> {
        let words =
            Regex::new(r"[A-Za-z0-9']+").map_err(|e| InferenceError::Internal(e.to_string()))?;
        Ok(Tokenizer { words })
    }

    fn preprocess(&self, body: &[u8], _content_type: &str) -> Result<String, InferenceError> {
        if body.is_empty() {
            return Err(InferenceError::InvalidRequest(
                "Empty request body".to_string(),
            ));
        }
        String::from_utf8(body.to_vec())
            .map_err(|e| InferenceError::UnprocessableInput(e.to_string()))
    }

    fn predict(&self, input: String, instance: &Tokenizer) -> Result<TextReport, InferenceError> {
        let mut counts: HashMap<String, usize> = HashMap::new();
        let mut words = 0usize;
        for token in instance.words.find_iter(&input) {
            words += 1;
            *counts.entry(token.as_str().to_lowercase()).or_insert(0) += 1;
        }

        let mut ranked: Vec<WordCount> = counts
            .into_iter()
            .map(|(word, count)| WordCount { word, count })
            .collect();
        ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.word.cmp(&b.word)));
        ranked.truncate(TOP_WORDS);

        Ok(TextReport {
            lines: input.lines().count(),
            words,
            chars: input.chars().count(),
            top_words: ranked,
        })
    }

    fn postprocess(
        &self,
        output: TextReport,
        response_content_type: &str,
    ) -> Result<Vec<u8>, InferenceError> {
        let serializer = output_serializer(response_content_type).ok_or_else(|| {
            InferenceError::Internal(format!(
                "Unsupported response content type {}",
                response_content_type
            ))
        })?;
        serializer(&output)
    }
}

type ReportSerializer = fn(&TextReport) -> Result<Vec<u8>, InferenceError>;

/// Serializers keyed by response content type. A negotiated type not listed
/// here is an implementation gap, surfaced by postprocess as an internal
/// failure rather than a client error.
fn output_serializer(content_type: &str) -> Option<ReportSerializer> {
    match content_type {
        "application/json" => Some(to_json_output),
        "text/plain" => Some(to_text_output),
        _ => None,
    }
}

fn to_json_output(report: &TextReport) -> Result<Vec<u8>, InferenceError> {
    serde_json::to_vec(report).map_err(|e| InferenceError::Internal(e.to_string()))
}

fn to_text_output(report: &TextReport) -> Result<Vec<u8>, InferenceError> {
    let mut out = format!(
        "lines: {}\nwords: {}\nchars: {}\n",
        report.lines, report.words, report.chars
    );
    for entry in &report.top_words {
        out.push_str(&format!("{} {}\n", entry.count, entry.word));
    }
    Ok(out.into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report_for(text: &str) -> TextReport {
        let model = TextStatsModel;
        let tokenizer = model.load().unwrap();
        model.predict(text.to_string(), &tokenizer).unwrap()
    }

    #[test]
    fn test_load_compiles_tokenizer() {
        assert!(TextStatsModel.load().is_ok());
    }

    #[test]
    fn test_empty_body_is_invalid_request() {
        let result = TextStatsModel.preprocess(b"", "text/plain");
        assert!(matches!(result, Err(InferenceError::InvalidRequest(_))));
    }

    #[test]
    fn test_invalid_utf8_is_unprocessable() {
        let result = TextStatsModel.preprocess(&[0xff, 0xfe, 0x00], "text/plain");
        assert!(matches!(
            result,
            Err(InferenceError::UnprocessableInput(_))
        ));
    }

    #[test]
    fn test_report_counts() {
        let report = report_for("hello world\nhello again");

        assert_eq!(report.lines, 2);
        assert_eq!(report.words, 4);
        assert_eq!(report.chars, 23);
        assert_eq!(
            report.top_words[0],
            WordCount {
                word: "hello".to_string(),
                count: 2
            }
        );
    }

    #[test]
    fn test_word_counting_folds_case() {
        let report = report_for("Dog dog DOG");

        assert_eq!(report.words, 3);
        assert_eq!(report.top_words.len(), 1);
        assert_eq!(report.top_words[0].count, 3);
    }

    #[test]
    fn test_top_words_capped_and_ordered() {
        let report = report_for("f e d c b a a");

        assert_eq!(report.top_words.len(), TOP_WORDS);
        assert_eq!(report.top_words[0].word, "a");
        assert_eq!(report.top_words[0].count, 2);
        // Ties rank alphabetically.
        assert_eq!(report.top_words[1].word, "b");
    }

    #[test]
    fn test_json_output_shape() {
        let model = TextStatsModel;
        let bytes = model
            .postprocess(report_for("hello world\nhello again"), "application/json")
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(json["lines"], 2);
        assert_eq!(json["words"], 4);
        assert_eq!(json["top_words"][0]["word"], "hello");
        assert_eq!(json["top_words"][0]["count"], 2);
    }

    #[test]
    fn test_plain_text_output() {
        let model = TextStatsModel;
        let bytes = model
            .postprocess(report_for("hello world\nhello again"), "text/plain")
            .unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert!(text.contains("lines: 2"));
        assert!(text.contains("2 hello"));
    }

    #[test]
    fn test_unsupported_output_type_fails() {
        let model = TextStatsModel;
        let result = model.postprocess(report_for("hello"), "image/jpeg");

        match result {
            Err(InferenceError::Internal(msg)) => {
                assert!(msg.contains("Unsupported response content type"))
            }
            _ => panic!("expected Internal"),
        }
    }
}
