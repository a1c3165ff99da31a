// ==========================================
// 智能体测试夹具 - 模拟关键词提取
// ==========================================
// 规则: 小写化 → 非单词字符替换为空格 → 去停用词与短词
//       → 按词频降序（同频保持首次出现顺序）
// ==========================================

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

static NON_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_\s]").expect("non-word pattern"));

const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had",
    "do", "does", "did", "will", "would", "could", "should", "may", "might", "must", "shall",
    "can", "need", "i", "you", "he", "she", "it", "we", "they", "me", "him", "her", "us", "them",
    "my", "your", "his", "its", "our", "their", "this", "that", "these", "those", "what",
    "which", "who", "whom", "whose", "where", "when", "why", "how", "all", "each", "every",
    "both", "few", "more", "most", "other", "some", "such", "no", "not", "only", "same", "so",
    "than", "too", "very", "just", "also", "now", "here", "there", "in", "on", "at", "by", "for",
    "with", "about", "against", "between", "into", "through", "during", "before", "after",
    "above", "below", "to", "from", "up", "down", "out", "off", "over", "under", "again",
    "further", "then", "once", "as", "if", "because", "until", "while", "and", "or", "but",
];

/// 默认返回的关键词数
pub const DEFAULT_MAX_KEYWORDS: usize = 10;

/// 提取关键词（最多 max_keywords 个）
pub fn extract_keywords(content: &str, max_keywords: usize) -> Vec<String> {
    if content.is_empty() {
        return Vec::new();
    }

    let lowered = content.to_lowercase();
    let cleaned = NON_WORD_RE.replace_all(&lowered, " ");

    let mut order: Vec<String> = Vec::new();
    let mut freq: HashMap<String, usize> = HashMap::new();
    for word in cleaned.split_whitespace() {
        if word.chars().count() <= 2 || STOP_WORDS.contains(&word) {
            continue;
        }
        let count = freq.entry(word.to_string()).or_insert(0);
        if *count == 0 {
            order.push(word.to_string());
        }
        *count += 1;
    }

    // sort_by 为稳定排序，同频词保持首次出现顺序
    order.sort_by(|a, b| freq[b].cmp(&freq[a]));
    order.truncate(max_keywords);
    order
}
