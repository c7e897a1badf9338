use crate::types::ArticleRecord;

/// Title and body joined for keyword scans. The separator keeps a keyword
/// from matching across the seam.
pub fn searchable_text(article: &ArticleRecord) -> String {
    format!("{}\n{}", article.title, article.body).to_lowercase()
}

/// True when any NG keyword occurs in the article's title or body,
/// ignoring case. Blank keywords never match.
pub fn is_banned<S: AsRef<str>>(article: &ArticleRecord, ng_keywords: &[S]) -> bool {
    let mut keywords = ng_keywords
        .iter()
        .map(|k| k.as_ref().trim())
        .filter(|k| !k.is_empty())
        .peekable();
    if keywords.peek().is_none() {
        return false;
    }

    let text = searchable_text(article);
    keywords.any(|keyword| text.contains(&keyword.to_lowercase()))
}

/// Articles that survive the NG list, in their original order.
pub fn retain_allowed<S: AsRef<str>>(articles: &[ArticleRecord], ng_keywords: &[S]) -> Vec<ArticleRecord> {
    articles
        .iter()
        .filter(|article| !is_banned(article, ng_keywords))
        .cloned()
        .collect()
}
