//! End-to-end patch workflow tests
//!
//! Exercises the full read -> apply -> write pass against a temporary
//! webhook.ts, including the fatal-read path and a re-run over an
//! already-patched file.

use std::fs;
use tempfile::TempDir;
use webhook_patcher::{
    apply, require_all_applied, source, webhook_rules, RuleOutcome, SourceError,
};

/// Create a scratch dir holding a webhook.ts with every rule target present.
fn setup_workspace() -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("server")).unwrap();

    let file = dir.path().join("server/webhook.ts");
    fs::write(
        &file,
        r#"import { getSunoTaskDetails } from "./suno";

export async function handleSunoWebhook(data: any) {
    const { callbackType, task_id, data: musicData, images } = data;

    // 1) Callback de CAPA (images)
    if (Array.isArray(images) && images.length > 0) {
        for (const image of images) {
            await saveCover(task_id, image);
        }
    }
    // 2) Callback de MUSICA
    if (callbackType === "complete") {
        await generate({
                occasion: lead.occasion,
                mood: lead.mood,
        });
        queueMusicReadyEmail(lead.email, jobId, firstSong.shareSlug, firstSong.title);
    }
}
"#,
    )
    .unwrap();

    (dir, file)
}

#[test]
fn full_patch_pass_rewrites_the_file() {
    let (_dir, file) = setup_workspace();

    let rules = webhook_rules().unwrap();
    let original = source::read(&file).unwrap();
    let result = apply(&original, &rules);

    assert!(require_all_applied(&result.reports).is_ok());
    source::write(&file, &result.text).unwrap();

    let patched = fs::read_to_string(&file).unwrap();
    assert!(patched.contains("import { enhanceLyrics } from \"./_core/gemini\";"));
    assert!(!patched.contains("images } = data;"));
    assert!(!patched.contains("Callback de CAPA"));
    assert!(patched.contains("} = data;    // Callback de MUSICA\n"));
    assert!(patched.contains("occasion: lead.occasion || undefined,"));
    assert!(patched.contains("mood: lead.mood || undefined,"));
    assert!(patched.contains("lead.email || ''"));
}

#[test]
fn rerun_on_patched_file_is_lenient() {
    let (_dir, file) = setup_workspace();
    let rules = webhook_rules().unwrap();

    let first = apply(&source::read(&file).unwrap(), &rules);
    source::write(&file, &first.text).unwrap();

    // Second pass over the patched file: nothing is NoMatch, so both the
    // default lenient run and --strict accept it.
    let second = apply(&source::read(&file).unwrap(), &rules);
    assert!(require_all_applied(&second.reports).is_ok());
    assert!(second
        .reports
        .iter()
        .all(|r| r.outcome != RuleOutcome::NoMatch));
}

#[test]
fn missing_source_aborts_before_any_write() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("server/webhook.ts");

    let err = source::read(&file).unwrap_err();
    assert!(matches!(err, SourceError::NotFound(_)));

    // Nothing was created as a side effect of the failed read.
    assert!(!file.exists());
    assert!(!dir.path().join("server").exists());
}

#[test]
fn unrelated_file_reports_no_matches() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("other.ts");
    fs::write(&file, "export const nothing = true;\n").unwrap();

    let rules = webhook_rules().unwrap();
    let original = source::read(&file).unwrap();
    let result = apply(&original, &rules);

    // Lenient by default: the text is untouched and every rule reports
    // NoMatch, which only --strict turns into a failure.
    assert_eq!(result.text, original);
    assert!(result.is_noop());
    let err = require_all_applied(&result.reports).unwrap_err();
    assert!(err.to_string().contains("add-gemini-import"));
}
