use crate::model::{Article, LaunchInfo, LaunchSite};

const LAUNCH_KEYWORD: &str = "launch";

/// Find the first article that talks about a launch at a known site.
///
/// Articles are scanned in the order given. An article mentioning a launch
/// without naming a known site is skipped, not returned partially.
pub fn extract_launch_info(articles: &[Article]) -> Option<LaunchInfo> {
    articles.iter().find_map(|article| {
        if !mentions_launch(article) {
            return None;
        }

        let location = find_site(&format!("{} {}", article.title, article.summary))?;

        Some(LaunchInfo {
            mission: article.title.clone(),
            date: date_part(&article.published_at).to_string(),
            location,
            summary: article.summary.clone(),
            article_url: article.url.clone(),
        })
    })
}

fn mentions_launch(article: &Article) -> bool {
    article.title.to_lowercase().contains(LAUNCH_KEYWORD)
        || article.summary.to_lowercase().contains(LAUNCH_KEYWORD)
}

fn find_site(text: &str) -> Option<LaunchSite> {
    let haystack = text.to_lowercase();
    LaunchSite::all()
        .iter()
        .copied()
        .find(|site| haystack.contains(&site.as_str().to_lowercase()))
}

/// Literal split at the first `T`; no timezone handling.
fn date_part(published_at: &str) -> &str {
    published_at.split('T').next().unwrap_or_default()
}
