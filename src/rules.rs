//! The authored rule set for `server/webhook.ts`.
//!
//! Fixed at authoring time, not data-driven: the ordered list below is the
//! whole patch. The order is preserved from the script these rules
//! reproduce; each rule runs against the output of the one before it.

use crate::engine::{EngineError, Rule, RuleSet};

/// Path patched when the binary is invoked with no arguments.
pub const DEFAULT_TARGET: &str = "server/webhook.ts";

/// Build the ordered webhook.ts fixup rules.
///
/// All patterns compile eagerly, so a broken rule fails here rather than
/// half-way through a run.
pub fn webhook_rules() -> Result<RuleSet, EngineError> {
    let rules = vec![
        // Add the enhanceLyrics import right after the suno import.
        Rule::literal(
            "add-gemini-import",
            "import { getSunoTaskDetails } from \"./suno\";",
            "import { getSunoTaskDetails } from \"./suno\";\nimport { enhanceLyrics } from \"./_core/gemini\";",
        )?,
        // Drop `images` from the callback destructuring.
        Rule::literal(
            "drop-images-destructure",
            "const { callbackType, task_id, data: musicData, images } = data;",
            "const { callbackType, task_id, data: musicData } = data;",
        )?,
        // Remove the whole cover-image callback block, up to the music
        // callback comment. The lazy quantifier stops at the nearest
        // occurrence of the closing marker instead of eating every block in
        // between. The leading \s* eats the newline before the block, so
        // the marker lands on the preceding statement line.
        Rule::pattern(
            "remove-images-block",
            r"\s*// 1\) Callback de CAPA \(images\)[\s\S]*?}\s*// 2\) Callback de M",
            "    // Callback de M",
        )?,
        // occasion/mood columns are nullable; the generation API wants
        // undefined, not null.
        Rule::literal(
            "occasion-null-to-undefined",
            "                occasion: lead.occasion,",
            "                occasion: lead.occasion || undefined,",
        )?,
        Rule::literal(
            "mood-null-to-undefined",
            "                mood: lead.mood,",
            "                mood: lead.mood || undefined,",
        )?,
        // queueMusicReadyEmail takes non-null strings.
        Rule::literal(
            "email-args-defaults",
            "queueMusicReadyEmail(lead.email, jobId, firstSong.shareSlug, firstSong.title)",
            "queueMusicReadyEmail(lead.email || '', jobId, firstSong.shareSlug || '', firstSong.title || 'Sua Música')",
        )?,
    ];

    Ok(RuleSet::new(rules))
}
