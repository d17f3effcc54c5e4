use ig_core::{AngleHistory, AngleStore, ArticleRecord, GenerationResult, HistoryOutcome, RawGeneration};

/// Labels and Markdown emphasis models tend to leave in captions.
pub const FORMATTING_ARTIFACTS: [&str; 3] = ["Caption Text:", "CAPTION:", "**"];

/// Removes formatting artifacts and every literal occurrence of `article_url`.
pub fn clean_caption(text: &str, article_url: &str) -> String {
    let mut clean = text.to_string();
    for artifact in FORMATTING_ARTIFACTS {
        clean = clean.replace(artifact, "");
    }
    if !article_url.is_empty() {
        clean = remove_literal(&clean, article_url);
    }
    clean.trim().to_string()
}

/// Removes `needle` and merges the spaces that surrounded each occurrence.
fn remove_literal(text: &str, needle: &str) -> String {
    let mut pieces = text.split(needle);
    let mut out = pieces.next().unwrap_or_default().to_string();

    for piece in pieces {
        let left = out.trim_end_matches(' ');
        let right = piece.trim_start_matches(' ');
        let glued = left.is_empty()
            || right.is_empty()
            || left.ends_with('\n')
            || right.starts_with('\n');
        out = format!("{}{}{}", left, if glued { "" } else { " " }, right);
    }
    out
}

/// Produces the final artifact from a parsed model response.
pub fn normalize(raw: RawGeneration, article: &ArticleRecord) -> GenerationResult {
    let post_text = clean_caption(raw.caption.text(), &article.url);

    let mut result = GenerationResult {
        post_text,
        language: raw.language,
        article_url: raw.article_url.unwrap_or_default(),
        image_url: raw.image_url.unwrap_or_default(),
        title: raw.title.unwrap_or_default(),
        instagram_post: raw.instagram_post,
        extra: raw.extra,
    };
    result.backfill(article);
    result
}

/// Records the result's angle for `url` and persists the history if it changed.
pub async fn record_angle(
    store: &dyn AngleStore,
    history: &mut AngleHistory,
    url: &str,
    result: &GenerationResult,
) -> HistoryOutcome {
    let Some(angle) = result.angle_description() else {
        return HistoryOutcome::NoAngle;
    };
    let angle = angle.to_string();

    if !history.record(url, &angle) {
        return HistoryOutcome::Unchanged(angle);
    }

    match store.persist(history).await {
        Ok(()) => HistoryOutcome::Saved(angle),
        Err(e) => {
            tracing::warn!("Failed to persist angle history via {}: {}", store.name(), e);
            HistoryOutcome::WriteFailed {
                angle,
                error: e.to_string(),
            }
        }
    }
}
