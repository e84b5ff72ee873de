//! Prompt assembly for the scoring request.

use crate::{model::Dimension, scoring::rubric::Rubric};

/// Review text handed to the model, split by origin.
#[derive(Debug, Clone, Copy)]
pub struct ReviewText<'a> {
    pub web: &'a str,
    pub community: &'a str,
}

impl ReviewText<'_> {
    pub fn is_empty(&self) -> bool {
        self.web.trim().is_empty() && self.community.trim().is_empty()
    }

    /// Community notes first, then web reviews; empty parts are left out.
    pub fn combined(&self) -> String {
        let mut sections = Vec::new();
        if !self.community.trim().is_empty() {
            sections.push(format!("Community tasting notes:\n{}", self.community.trim()));
        }
        if !self.web.trim().is_empty() {
            sections.push(format!("Web reviews:\n{}", self.web.trim()));
        }
        sections.join("\n\n")
    }
}

const EXAMPLE_SCORES: [u8; 11] = [8, 7, 9, 8, 7, 9, 9, 2, 1, 7, 2];

/// Build the full scoring prompt for `wine`.
pub fn build_prompt(rubric: &Rubric, wine: &str, reviews: ReviewText<'_>) -> String {
    let mut out = String::new();
    out.push_str(
        "You are an expert wine critic and sommelier with deep knowledge of natural wines,\n\
         brett (brettanomyces), and funky/oxidative wine styles.\n\n",
    );
    if rubric.is_multilingual() {
        out.push_str(
            "IMPORTANT: Reviews may be in any language including Danish, French, German, Spanish etc.\n\
             You must recognise and score based on descriptors in ALL languages.\n\n",
        );
    }
    out.push_str(&format!(
        "Analyse the following reviews of \"{wine}\" and score each parameter from 0-10.\n"
    ));
    out.push_str(
        "Be sensitive to subtle language: reviewers rarely use technical terms directly,\n\
         so you must interpret descriptive language carefully.\n\n",
    );

    out.push_str("SCORING GUIDANCE:\n\n");
    for guide in &rubric.guides {
        out.push_str(&format!("{} (0-10): {}\n", guide.dimension, guide.summary));
        for cues in &guide.cues {
            let words = cues
                .words
                .iter()
                .map(|w| format!("\"{w}\""))
                .collect::<Vec<_>>()
                .join(", ");
            out.push_str(&format!("{}: {}.\n", cues.language.name(), words));
        }
        for note in guide.notes {
            out.push_str(note);
            out.push('\n');
        }
        if !guide.bands.is_empty() {
            out.push_str("Scoring:\n");
            for band in guide.bands {
                out.push_str(&format!("- {band}\n"));
            }
        }
        out.push('\n');
    }

    out.push_str(&format!("Reviews:\n{}\n\n", reviews.combined()));

    out.push_str(
        "Respond ONLY with a JSON object in this exact format, no other text, no markdown, no backticks:\n",
    );
    out.push_str(&example_reply());
    out.push_str("\n\nwine_type must be one of: Red, White, Rose, Orange");
    out
}

fn example_reply() -> String {
    let scores = Dimension::ALL
        .iter()
        .zip(EXAMPLE_SCORES)
        .map(|(d, s)| format!("    \"{d}\": {s}"))
        .collect::<Vec<_>>()
        .join(",\n");
    format!("{{\n  \"wine_type\": \"Red\",\n  \"scores\": {{\n{scores}\n  }}\n}}")
}
