use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// A FAQ record as written in configuration. Fields may be missing or of any
/// JSON type; strings are kept, numbers and booleans are stringified and
/// anything else reads as empty.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct FaqSource {
    #[serde(default, deserialize_with = "lenient_text")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub q: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub a: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub tag: String,
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => text,
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        _ => String::new(),
    })
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FaqItem {
    pub id: String,
    pub question: String,
    pub answer: String,
    pub tag: String,
}

impl From<FaqSource> for FaqItem {
    fn from(source: FaqSource) -> Self {
        Self {
            id: source.id,
            question: source.q,
            answer: source.a,
            tag: source.tag,
        }
    }
}

impl FaqItem {
    fn haystack(&self) -> String {
        format!("{} {}", self.question, self.answer)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FaqIndex {
    items: Vec<FaqItem>,
}

impl FaqIndex {
    pub fn new(sources: Vec<FaqSource>) -> Self {
        Self {
            items: sources.into_iter().map(FaqItem::from).collect(),
        }
    }

    pub fn items(&self) -> &[FaqItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Distinct non-empty tags in the order they first appear.
    pub fn tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = Vec::new();
        for item in &self.items {
            if !item.tag.is_empty() && !tags.contains(&item.tag) {
                tags.push(item.tag.clone());
            }
        }
        tags
    }

    /// Items whose question or answer contains `tag`; the whole list when none do.
    pub fn filter_by_tag(&self, tag: &str) -> Vec<FaqItem> {
        let matched: Vec<FaqItem> = self
            .items
            .iter()
            .filter(|item| item.haystack().contains(tag))
            .cloned()
            .collect();
        if matched.is_empty() {
            self.items.clone()
        } else {
            matched
        }
    }

    pub fn filter_by_query(&self, query: &str) -> Vec<FaqItem> {
        filter_by_query(&self.items, query)
    }

    /// Chip first, then the search query within whatever the chip left.
    pub fn view(&self, tag: Option<&str>, query: &str) -> Vec<FaqItem> {
        match tag {
            Some(tag) => filter_by_query(&self.filter_by_tag(tag), query),
            None => self.filter_by_query(query),
        }
    }
}

/// Case-insensitive match against question and answer; blank queries keep everything.
pub fn filter_by_query(items: &[FaqItem], query: &str) -> Vec<FaqItem> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return items.to_vec();
    }
    items
        .iter()
        .filter(|item| item.haystack().to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(q: &str, a: &str, tag: &str) -> FaqSource {
        FaqSource {
            id: q.to_lowercase(),
            q: q.to_string(),
            a: a.to_string(),
            tag: tag.to_string(),
        }
    }

    fn sample() -> FaqIndex {
        FaqIndex::new(vec![
            source("What is the Price of a course?", "Courses start at 990 baht.", "price"),
            source("Where do classes meet?", "Online and on campus.", "location"),
            source("Do you offer refunds?", "Yes, full price within 7 days.", "price"),
            source("How do I enrol?", "Use the form on the website.", "enrol"),
        ])
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let parsed: Vec<FaqSource> = serde_json::from_str(r#"[{"q":"only a question"}]"#).unwrap();
        let index = FaqIndex::new(parsed);
        let item = &index.items()[0];
        assert_eq!(item.question, "only a question");
        assert_eq!(item.id, "");
        assert_eq!(item.answer, "");
        assert_eq!(item.tag, "");
    }

    #[test]
    fn loosely_typed_fields_become_text() {
        let parsed: Vec<FaqSource> = serde_json::from_str(
            r#"[{"id":1,"q":"a","a":null,"tag":true},{"q":"b","a":["x"]}]"#,
        )
        .unwrap();
        let index = FaqIndex::new(parsed);
        assert_eq!(index.items().len(), 2);
        let first = &index.items()[0];
        assert_eq!(first.id, "1");
        assert_eq!(first.question, "a");
        assert_eq!(first.answer, "");
        assert_eq!(first.tag, "true");
        assert_eq!(index.items()[1].answer, "");
    }

    #[test]
    fn query_matches_question_or_answer_case_insensitively() {
        let found = sample().filter_by_query("price");
        let questions: Vec<&str> = found.iter().map(|i| i.question.as_str()).collect();
        assert_eq!(
            questions,
            vec!["What is the Price of a course?", "Do you offer refunds?"]
        );
    }

    #[test]
    fn blank_query_returns_everything() {
        let index = sample();
        assert_eq!(index.filter_by_query("").len(), 4);
        assert_eq!(index.filter_by_query("   ").len(), 4);
    }

    #[test]
    fn query_without_matches_is_empty() {
        assert!(sample().filter_by_query("parking").is_empty());
    }

    #[test]
    fn tag_filter_matches_text_not_tag_field() {
        let found = sample().filter_by_tag("campus");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].question, "Where do classes meet?");
    }

    #[test]
    fn tag_filter_is_case_sensitive_and_falls_back_to_all() {
        // "Price" only appears capitalised in the first question.
        assert_eq!(sample().filter_by_tag("Price").len(), 1);
        assert_eq!(sample().filter_by_tag("nothing-like-this").len(), 4);
    }

    #[test]
    fn tags_are_distinct_in_first_seen_order() {
        assert_eq!(sample().tags(), vec!["price", "location", "enrol"]);
    }

    #[test]
    fn view_applies_query_inside_tag_subset() {
        let index = sample();
        let found = index.view(Some("price"), "refund");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].question, "Do you offer refunds?");
        assert_eq!(index.view(None, "").len(), 4);
    }
}
