// ==========================================
// 智能体测试夹具 - 模拟搜索结果
// ==========================================
// 确定性字段（标题/摘要/URL/分数）只依赖查询参数
// 新闻结果的 published_at 依赖当前时间
// ==========================================

use chrono::{Duration, SecondsFormat, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static SLUG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("slug pattern"));

/// 单次最多返回的结果数
pub const MAX_RESULTS: usize = 20;

const DEFAULT_DOMAINS: [&str; 5] = [
    "example.com",
    "docs.example.org",
    "blog.techsite.io",
    "news.daily.com",
    "wiki.reference.net",
];

const WEB_PREFIXES: [&str; 8] = [
    "Guide to",
    "Understanding",
    "How to use",
    "Introduction to",
    "Best practices for",
    "Complete guide:",
    "Tutorial:",
    "Overview of",
];

const NEWS_PREFIXES: [&str; 8] = [
    "Breaking:",
    "Update:",
    "Report:",
    "Analysis:",
    "Review:",
    "Deep Dive:",
    "Exclusive:",
    "Latest:",
];

const SNIPPET_TEMPLATES: [&str; 5] = [
    "This comprehensive article covers everything you need to know about {keyword}. Learn the fundamentals and advanced concepts...",
    "Discover the latest developments in {keyword}. Our experts break down the key points and provide actionable insights...",
    "A detailed exploration of {keyword} and its applications. Find out how industry leaders are leveraging this technology...",
    "Get started with {keyword} today. This guide walks you through the essential steps and best practices...",
    "Understanding {keyword} is crucial for modern development. Here's what you need to know to stay ahead...",
];

/// 结果类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultKind {
    Web,
    News,
}

/// 单条模拟结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MockResultItem {
    pub title: String,
    pub content: String,
    pub url: String,
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// URL 友好的 slug
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    SLUG_RE
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}

/// 首字母大写
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn title(keywords: &[&str], index: usize, kind: ResultKind) -> String {
    let prefixes = match kind {
        ResultKind::Web => &WEB_PREFIXES,
        ResultKind::News => &NEWS_PREFIXES,
    };
    let prefix = prefixes[index % prefixes.len()];
    let main = keywords.first().copied().unwrap_or("topic");

    match keywords.get(1) {
        Some(secondary) => format!(
            "{} {} {} - Part {}",
            prefix,
            capitalize(main),
            capitalize(secondary),
            index + 1
        ),
        None => format!("{} {} - Part {}", prefix, capitalize(main), index + 1),
    }
}

fn snippet(keywords: &[&str], index: usize) -> String {
    let template = SNIPPET_TEMPLATES[index % SNIPPET_TEMPLATES.len()];
    let keyword = if keywords.is_empty() {
        "this topic".to_string()
    } else {
        keywords.join(" ")
    };
    template.replacen("{keyword}", &keyword, 1)
}

/// 第 i 条结果的分数: max(1 - 0.05i, 0.1)
pub fn score(index: usize) -> f64 {
    (1.0 - index as f64 * 0.05).max(0.1)
}

/// 生成模拟结果
///
/// # 参数
/// - limit: 期望条数（超过 20 时截断）
/// - sites: 限定站点（为空时使用内置域名）
pub fn generate_mock_results(
    query: &str,
    limit: usize,
    sites: &[String],
    kind: ResultKind,
) -> Vec<MockResultItem> {
    let domains: Vec<&str> = if sites.is_empty() {
        DEFAULT_DOMAINS.to_vec()
    } else {
        sites.iter().map(String::as_str).collect()
    };

    let lowered = query.to_lowercase();
    let keywords: Vec<&str> = lowered.split_whitespace().collect();
    let slug = slugify(query);
    let now = Utc::now();

    (0..limit.min(MAX_RESULTS))
        .map(|i| {
            let domain = domains[i % domains.len()];
            let mut item = MockResultItem {
                title: title(&keywords, i, kind),
                content: snippet(&keywords, i),
                url: format!("https://{}/article/{}-{}", domain, slug, i + 1),
                score: score(i),
                published_at: None,
                source: None,
            };
            if kind == ResultKind::News {
                let published = now - Duration::days(i as i64);
                item.published_at = Some(published.to_rfc3339_opts(SecondsFormat::Millis, true));
                item.source = domain.split('.').next().map(str::to_string);
            }
            item
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_and_capitalize() {
        assert_eq!(slugify("Rust Async  Runtime!"), "rust-async-runtime");
        assert_eq!(slugify("--hello--"), "hello");
        assert_eq!(capitalize("rust"), "Rust");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_web_results_are_deterministic() {
        let a = generate_mock_results("rust async", 3, &[], ResultKind::Web);
        let b = generate_mock_results("rust async", 3, &[], ResultKind::Web);
        assert_eq!(a, b);
        assert_eq!(a[0].title, "Guide to Rust Async - Part 1");
        assert_eq!(a[1].url, "https://docs.example.org/article/rust-async-2");
        assert!(a[0].content.contains("rust async"));
        assert!(a[0].score > a[1].score && a[1].score > a[2].score);
    }

    #[test]
    fn test_limit_and_score_floor() {
        let items = generate_mock_results("q", 50, &[], ResultKind::Web);
        assert_eq!(items.len(), MAX_RESULTS);
        assert_eq!(items[19].score, 0.1);
        assert_eq!(score(18), (1.0 - 18.0 * 0.05_f64).max(0.1));
    }

    #[test]
    fn test_news_results_and_sites() {
        let sites = vec!["github.com".to_string()];
        let items = generate_mock_results("", 2, &sites, ResultKind::News);
        assert_eq!(items[0].title, "Breaking: Topic - Part 1");
        assert_eq!(items[1].source.as_deref(), Some("github"));
        assert!(items[0].published_at.is_some());
        assert!(items[0].content.contains("this topic"));
        assert_eq!(items[0].url, "https://github.com/article/-1");
    }
}
