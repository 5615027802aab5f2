use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TopicWithCount {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub word_count: i64, // đếm lúc đọc, không lưu trong bảng
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn word_count_is_camel_case() {
        let topic = TopicWithCount {
            id: 1,
            name: "Food".into(),
            description: None,
            word_count: 2,
        };
        assert_eq!(
            serde_json::to_value(&topic).unwrap(),
            json!({ "id": 1, "name": "Food", "description": null, "wordCount": 2 })
        );
    }
}
