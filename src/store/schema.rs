use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// One lesson as written in a catalog file. Array order is lesson order.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonRecord {
    pub id: i64,
    pub target: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub instruction: String,
    #[serde(default)]
    pub common_words: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub practice_text: Option<String>,
}

/// Validated, immutable lesson definition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LessonDefinition {
    pub id: u32,
    pub target_keys: Vec<char>,
    pub common_words: Vec<String>,
    pub instruction: String,
    pub description: String,
    /// Composite score a learner needs to clear this lesson (point-based courses).
    pub point_weight: u32,
    /// Authored text presented as-is by point-based courses.
    pub practice_text: Option<String>,
}

impl LessonDefinition {
    /// Minimal definition, handy for building catalogs in code.
    pub fn new(id: u32, target_keys: &[char]) -> Self {
        Self {
            id,
            target_keys: target_keys.to_vec(),
            common_words: Vec::new(),
            instruction: String::new(),
            description: String::new(),
            point_weight: 1,
            practice_text: None,
        }
    }

    pub fn with_words(mut self, words: &[&str]) -> Self {
        self.common_words = words.iter().map(|w| w.to_string()).collect();
        self
    }

    pub fn with_instruction(mut self, instruction: &str) -> Self {
        self.instruction = instruction.to_string();
        self
    }

    pub fn with_point(mut self, point_weight: u32) -> Self {
        self.point_weight = point_weight;
        self
    }

    pub fn with_practice_text(mut self, text: &str) -> Self {
        self.practice_text = Some(text.to_string());
        self
    }

    fn from_record(course: &str, record: LessonRecord) -> Result<Self> {
        let id = u32::try_from(record.id)
            .ok()
            .filter(|&id| id >= 1)
            .ok_or_else(|| EngineError::malformed(course, format!("invalid lesson id {}", record.id)))?;

        let mut target_keys = Vec::with_capacity(record.target.len());
        for key in &record.target {
            let mut chars = key.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) if ch.is_whitespace() => {
                    return Err(EngineError::malformed(
                        course,
                        format!("lesson {id}: target {key:?} is whitespace"),
                    ));
                }
                (Some(ch), None) => target_keys.push(ch),
                _ => {
                    return Err(EngineError::malformed(
                        course,
                        format!("lesson {id}: target {key:?} is not a single character"),
                    ));
                }
            }
        }

        let point_weight = match record.point {
            None => 1,
            Some(p) => u32::try_from(p).ok().filter(|&p| p >= 1).ok_or_else(|| {
                EngineError::malformed(course, format!("lesson {id}: invalid point {p}"))
            })?,
        };

        Ok(Self {
            id,
            target_keys,
            common_words: record.common_words,
            instruction: record.instruction,
            description: record.description,
            point_weight,
            practice_text: record.practice_text,
        })
    }
}

/// Parse and validate a catalog document. Either every record is valid or
/// nothing is returned.
pub fn parse_catalog(course: &str, json: &str) -> Result<Vec<LessonDefinition>> {
    let records: Vec<LessonRecord> =
        serde_json::from_str(json).map_err(|e| EngineError::malformed(course, e.to_string()))?;
    if records.is_empty() {
        return Err(EngineError::malformed(course, "catalog has no lessons"));
    }

    let mut seen = HashSet::new();
    let mut lessons = Vec::with_capacity(records.len());
    for record in records {
        let lesson = LessonDefinition::from_record(course, record)?;
        if !seen.insert(lesson.id) {
            return Err(EngineError::malformed(
                course,
                format!("duplicate lesson id {}", lesson.id),
            ));
        }
        lessons.push(lesson);
    }
    Ok(lessons)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_record() {
        let json = r#"[
            {
                "id": 1,
                "target": ["a", "s", "d", "f"],
                "description": "Left hand home row",
                "instruction": "Rest your left fingers on a s d f",
                "commonWords": ["as", "sad", "fad"],
                "point": 2
            }
        ]"#;
        let lessons = parse_catalog("beginner", json).unwrap();
        assert_eq!(lessons.len(), 1);
        let lesson = &lessons[0];
        assert_eq!(lesson.id, 1);
        assert_eq!(lesson.target_keys, vec!['a', 's', 'd', 'f']);
        assert_eq!(lesson.common_words, vec!["as", "sad", "fad"]);
        assert_eq!(lesson.point_weight, 2);
        assert_eq!(lesson.practice_text, None);
    }

    #[test]
    fn test_optional_fields_default() {
        let json = r#"[{"id": 3, "target": [";"]}]"#;
        let lessons = parse_catalog("c", json).unwrap();
        assert_eq!(lessons[0].point_weight, 1);
        assert!(lessons[0].common_words.is_empty());
        assert!(lessons[0].instruction.is_empty());
    }

    #[test]
    fn test_array_order_is_preserved() {
        let json = r#"[{"id": 2, "target": ["b"]}, {"id": 1, "target": ["a"]}]"#;
        let ids: Vec<u32> = parse_catalog("c", json).unwrap().iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    fn assert_malformed(json: &str) {
        match parse_catalog("broken", json) {
            Err(EngineError::MalformedData { course, .. }) => assert_eq!(course, "broken"),
            other => panic!("expected MalformedData, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_invalid_documents() {
        assert_malformed("not json");
        assert_malformed("{}");
        assert_malformed("[]");
        assert_malformed(r#"[{"id": 0, "target": ["a"]}]"#);
        assert_malformed(r#"[{"id": -4, "target": ["a"]}]"#);
        assert_malformed(r#"[{"id": 1, "target": ["ab"]}]"#);
        assert_malformed(r#"[{"id": 1, "target": [""]}]"#);
        assert_malformed(r#"[{"id": 1, "target": ["a"], "point": 0}]"#);
        assert_malformed(r#"[{"id": 1, "target": ["a"]}, {"id": 1, "target": ["b"]}]"#);
    }

    #[test]
    fn test_rejects_whitespace_targets() {
        assert_malformed(r#"[{"id": 1, "target": [" "]}]"#);
        assert_malformed(r#"[{"id": 1, "target": ["a", "\t"]}]"#);
        assert_malformed(r#"[{"id": 1, "target": ["a"]}, {"id": 2, "target": ["\n"]}]"#);
    }

    #[test]
    fn test_builder_helpers() {
        let lesson = LessonDefinition::new(4, &['j', 'k'])
            .with_words(&["jak"])
            .with_instruction("Right hand")
            .with_point(3)
            .with_practice_text("jj kk");
        assert_eq!(lesson.point_weight, 3);
        assert_eq!(lesson.common_words, vec!["jak".to_string()]);
        assert_eq!(lesson.practice_text.as_deref(), Some("jj kk"));
    }
}
