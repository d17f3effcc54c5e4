use ig_core::{ArticleRecord, Language, Result};

pub const SYSTEM_PROMPT: &str = r#"Persona: You are an Instagram strategist. Your style is visual, inspiring and clean. Instagram is about stopping the scroll with a strong image and a short, insightful caption.

Task: Write an Instagram caption for the article described below.

LAYOUT & FORMATTING (IMPORTANT):
1. No links: links do not work in captions. NEVER write out the article URL in the text.
2. Call to action: ALWAYS point to the profile link with "Link in bio" (in Swedish: "Länk i bio").
3. Spacing: use line breaks so the text breathes. Prefer empty lines over filler characters.
4. Emojis: use them to reinforce the feeling, not to replace words.
5. Language: write in the target language given below (sv or en).

CONTENT:
1. Hook: one short sentence that relates to the image, written as if the image illustrates the topic.
2. Story: a micro-story or one strong insight from the article.
3. Value: "Here are three things you need to know:" followed by a bulleted list.
4. Hashtags: a dense block of 10-20 relevant hashtags at the very end, separated from the text by line breaks.

Keep the text aesthetic and drive traffic to the profile."#;

const RESPONSE_SCHEMA: &str = r#"{
  "instagram_post": {
    "caption_text": "The full caption: hook, insight and list, call to action (link in bio) and the hashtag block.",
    "angle_description": "One sentence describing the specific angle or theme of this post, so it can be avoided next time."
  }
}"#;

/// Builds the full prompt sent to the model for one article.
pub fn build_prompt(
    article: &ArticleRecord,
    language: Language,
    prior_angles: &[String],
) -> Result<String> {
    let tags = article
        .source_tags
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    let structure = serde_json::to_string_pretty(&article.structure)?;

    let previous_angles = if prior_angles.is_empty() {
        String::new()
    } else {
        format!(
            "PREVIOUSLY USED ANGLES (DO NOT REPEAT THESE):\n\
             The following angles have already been used for this article. You MUST choose a completely different perspective, theme or angle.\n\
             {}\n\n\
             INSTRUCTION: Generate a FRESH perspective that is distinct from all of the above.\n",
            serde_json::to_string_pretty(prior_angles)?
        )
    };

    Ok(format!(
        "{system}\n\n\
         ANALYSIS TARGET:\n\
         URL: {url}\n\
         TITLE: {title}\n\
         IMAGE: {image}\n\
         SOURCE TAGS (OPTIMIZE THESE): {tags}\n\
         TARGET LANGUAGE: {language} (the caption MUST be in this language, call to action: \"{cta}\")\n\n\
         STRUCTURE (Headlines):\n\
         {structure}\n\n\
         {previous_angles}\n\
         CONTENT EXCERPT:\n\
         {content}\n\n\
         TASK: Generate the Instagram JSON object now.\n\n\
         IMPORTANT: The JSON response MUST follow this schema:\n\
         {schema}\n",
        system = SYSTEM_PROMPT,
        url = article.url,
        title = article.title,
        image = article.image_url,
        tags = tags,
        language = language.code(),
        cta = language.link_in_bio(),
        structure = structure,
        previous_angles = previous_angles,
        content = article.content,
        schema = RESPONSE_SCHEMA,
    ))
}
