use sqlx::PgPool;

use crate::error::AppError;
use crate::models::word::{Word, WORD_COLUMNS};

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 100;
/// Số bản ghi tối đa khi client gửi `limit=all`.
pub const ALL_WORDS_CEILING: i64 = 5000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
}

impl Pagination {
    /// Đọc `page` và `limit` từ query string. `page` nhỏ hơn 1 được đưa về 1,
    /// `limit` bị kẹp trong `1..=MAX_PAGE_SIZE`, riêng `all` dùng `ALL_WORDS_CEILING`.
    pub fn parse(page: Option<&str>, limit: Option<&str>) -> Result<Self, AppError> {
        let page = match non_blank(page) {
            None => 1,
            Some(raw) => raw
                .parse::<i64>()
                .map_err(|_| AppError::BadRequest(format!("Invalid page: {raw}")))?
                .max(1),
        };

        let limit = match non_blank(limit) {
            None => DEFAULT_PAGE_SIZE,
            Some(raw) if raw.eq_ignore_ascii_case("all") => ALL_WORDS_CEILING,
            Some(raw) => raw
                .parse::<i64>()
                .map_err(|_| AppError::BadRequest(format!("Invalid limit: {raw}")))?
                .clamp(1, MAX_PAGE_SIZE),
        };

        Ok(Self { page, limit })
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    pub fn total_pages(&self, total: i64) -> i64 {
        if total <= 0 {
            return 0;
        }
        (total + self.limit - 1) / self.limit
    }
}

/// Bộ lọc tìm kiếm: chuỗi con (không phân biệt hoa thường) trên `word` hoặc
/// `meaning`, và/hoặc lọc theo chủ đề.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordFilter {
    pub pattern: Option<String>,
    pub topic_id: Option<i32>,
}

impl WordFilter {
    pub fn parse(search: Option<&str>, topic: Option<&str>) -> Result<Self, AppError> {
        let pattern = non_blank(search).map(contains_pattern);
        let topic_id = match non_blank(topic) {
            None => None,
            Some(raw) => Some(
                raw.parse::<i32>()
                    .map_err(|_| AppError::BadRequest(format!("Invalid topic: {raw}")))?,
            ),
        };

        Ok(Self { pattern, topic_id })
    }

    /// Mệnh đề WHERE và chỉ số tham số bind tiếp theo.
    pub fn where_clause(&self) -> (String, u32) {
        let mut conditions = Vec::new();
        let mut bind_idx = 1u32;

        if self.pattern.is_some() {
            conditions.push(format!("(word ILIKE ${bind_idx} OR meaning ILIKE ${bind_idx})"));
            bind_idx += 1;
        }
        if self.topic_id.is_some() {
            conditions.push(format!("topic_id = ${bind_idx}"));
            bind_idx += 1;
        }

        let clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        (clause, bind_idx)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Escape ký tự đặc biệt của LIKE để tìm đúng chuỗi con người dùng nhập.
pub fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

pub fn contains_pattern(input: &str) -> String {
    format!("%{}%", escape_like(input))
}

/// 1. Đếm số từ khớp bộ lọc (không phân trang)
pub async fn count_words(pool: &PgPool, filter: &WordFilter) -> Result<i64, sqlx::Error> {
    let (where_clause, _) = filter.where_clause();
    let query = format!("SELECT COUNT(*) FROM words {where_clause}");

    let mut q = sqlx::query_scalar::<_, i64>(&query);
    if let Some(ref pattern) = filter.pattern {
        q = q.bind(pattern);
    }
    if let Some(topic_id) = filter.topic_id {
        q = q.bind(topic_id);
    }
    q.fetch_one(pool).await
}

/// 2. Lấy một trang từ vựng, sắp xếp theo `word` tăng dần, kèm tổng số bản ghi
pub async fn list_words(
    pool: &PgPool,
    filter: &WordFilter,
    pagination: Pagination,
) -> Result<(Vec<Word>, i64), sqlx::Error> {
    let total = count_words(pool, filter).await?;

    let (where_clause, bind_idx) = filter.where_clause();
    let query = format!(
        "SELECT {WORD_COLUMNS} FROM words {where_clause} \
         ORDER BY word ASC, id ASC \
         LIMIT ${bind_idx} OFFSET ${next_idx}",
        next_idx = bind_idx + 1,
    );

    let mut q = sqlx::query_as::<_, Word>(&query);
    if let Some(ref pattern) = filter.pattern {
        q = q.bind(pattern);
    }
    if let Some(topic_id) = filter.topic_id {
        q = q.bind(topic_id);
    }
    let words = q
        .bind(pagination.limit)
        .bind(pagination.offset())
        .fetch_all(pool)
        .await?;

    Ok((words, total))
}

pub async fn find_word(pool: &PgPool, id: i32) -> Result<Option<Word>, sqlx::Error> {
    let query = format!("SELECT {WORD_COLUMNS} FROM words WHERE id = $1");
    sqlx::query_as::<_, Word>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn words_by_topic(pool: &PgPool, topic_id: i32) -> Result<Vec<Word>, sqlx::Error> {
    let query = format!("SELECT {WORD_COLUMNS} FROM words WHERE topic_id = $1 ORDER BY word ASC");
    sqlx::query_as::<_, Word>(&query)
        .bind(topic_id)
        .fetch_all(pool)
        .await
}

/// Gắn ảnh cho mọi bản ghi có cùng `word`. Trả về số dòng đã cập nhật.
pub async fn set_image_by_term(pool: &PgPool, term: &str, image_url: &str) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("UPDATE words SET image_url = $1 WHERE word = $2")
        .bind(image_url)
        .bind(term)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

pub async fn set_image_by_id(
    pool: &PgPool,
    id: i32,
    image_url: &str,
) -> Result<Option<Word>, sqlx::Error> {
    let query = format!("UPDATE words SET image_url = $1 WHERE id = $2 RETURNING {WORD_COLUMNS}");
    sqlx::query_as::<_, Word>(&query)
        .bind(image_url)
        .bind(id)
        .fetch_optional(pool)
        .await
}
