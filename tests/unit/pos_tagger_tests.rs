/*!
 * Tests for non-Arabic span handling around the POS tagger
 */

use farasa_rs::errors::ProcessingError;
use farasa_rs::pos_tagger::{
    ditch_non_arabic, find_non_arabic_spans, mask_non_arabic, prepare_for_tagging,
    repair_hash_markers, restore_non_arabic, TagOptions, PLACEHOLDER_LINE,
};

const TAGGED_PLACEHOLDER: &str = "S/S µ/PUNC µ/PUNC µ/PUNC E/E";

/// Test that a Latin sentence in front of Arabic text is removed
#[test]
fn test_ditch_non_arabic_withLatinSentence_shouldKeepOnlyArabic() {
    let result = ditch_non_arabic("Hello world. مرحبا بالعالم");

    assert_eq!(result, "مرحبا بالعالم");
}

/// Test that removal leaves no markers, stray symbols or blank lines
#[test]
fn test_ditch_non_arabic_withSymbolsAndBlankLines_shouldCleanEverything() {
    let text = "مرحبا # عالم\n\n| كتاب $\n   \nSee chapter 12; page 7.\nقلم";

    let result = ditch_non_arabic(text);

    assert!(!result.contains('#'));
    assert!(!result.contains('|'));
    assert!(!result.contains('$'));
    assert!(!result.contains("µµµ"));
    assert!(result.lines().all(|line| !line.trim().is_empty()));
    assert!(result.lines().all(|line| line == line.trim()));
    assert_eq!(result, "مرحبا  عالم\nكتاب\nقلم");
}

/// Test that runs shorter than the heuristic minimum are not treated as non-Arabic
/// Test that Unicode line separators also split lines in removal mode
#[test]
fn test_ditch_non_arabic_withUnicodeLineSeparators_shouldSplitLines() {
    let ditched = ditch_non_arabic("كتاب\u{2028} قلم \x0cبيت\r\nشجرة\u{85}");

    assert_eq!(ditched, "كتاب\nقلم\nبيت\nشجرة");
}

#[test]
fn test_find_non_arabic_spans_withShortLatinWord_shouldFindNothing() {
    assert!(find_non_arabic_spans("كتاب OK كتاب").is_empty());
    assert!(find_non_arabic_spans("مرحبا بالعالم").is_empty());
}

/// Test that a Latin run inside Arabic text is found up to its last closing character
#[test]
fn test_find_non_arabic_spans_withEmbeddedSentence_shouldMatchSentence() {
    let spans = find_non_arabic_spans("نص first english part. نص");

    assert_eq!(spans, vec![" first english part."]);
}

/// Test that masking inserts exactly one placeholder line per span, in order
#[test]
fn test_mask_non_arabic_withThreeSpans_shouldInsertThreePlaceholders() {
    let text = "نص first english part. نص second english part. نص third english part. نص";

    let masked = mask_non_arabic(text);

    assert_eq!(masked.spans.len(), 3);
    assert_eq!(masked.text.matches(PLACEHOLDER_LINE).count(), 3);
    assert!(masked.spans[0].contains("first"));
    assert!(masked.spans[1].contains("second"));
    assert!(masked.spans[2].contains("third"));
    assert!(!masked.text.contains("english"));
}

/// Test that text without non-Arabic spans is handed to the tagger unchanged
#[test]
fn test_mask_non_arabic_withArabicOnly_shouldNotChangeText() {
    let text = "مرحبا بالعالم\nكتاب جديد";

    let masked = mask_non_arabic(text);

    assert_eq!(masked.text, text);
    assert!(masked.spans.is_empty());
}

/// Test that spans are restored one-to-one in their original order
#[test]
fn test_restore_non_arabic_withMatchingCount_shouldRestoreInOrder() {
    let masked = mask_non_arabic("نص first english part. نص second english part. نص third english part. نص");
    let tagged = format!(
        "S/S نص/NOUN E/E\n{p}\nS/S نص/NOUN E/E\n{p}\nS/S نص/NOUN E/E\n{p}\nS/S نص/NOUN E/E\n",
        p = TAGGED_PLACEHOLDER
    );

    let restored = restore_non_arabic(&tagged, &masked.spans).unwrap();

    let first = restored.find("first").unwrap();
    let second = restored.find("second").unwrap();
    let third = restored.find("third").unwrap();
    assert!(first < second && second < third);
    assert!(!restored.contains('µ'));
    assert_eq!(restored.matches("S/S نص/NOUN E/E").count(), 4);
}

/// Test that surrounding line breaks of a tagged placeholder are consumed
#[test]
fn test_restore_non_arabic_withSinglePlaceholder_shouldReplaceLineBreaksToo() {
    let spans = vec!["\nHello world again.".to_string()];
    let tagged = format!("S/S أ/NOUN E/E\n{}\nS/S ب/NOUN E/E", TAGGED_PLACEHOLDER);

    let restored = restore_non_arabic(&tagged, &spans).unwrap();

    assert_eq!(restored, "S/S أ/NOUN E/E\nHello world again.S/S ب/NOUN E/E");
}

/// Test that a count mismatch is reported instead of misaligning spans
#[test]
fn test_restore_non_arabic_withCountMismatch_shouldFail() {
    let spans = vec!["first span.".to_string(), "second span.".to_string()];
    let tagged = format!("S/S أ/NOUN E/E\n{}\n", TAGGED_PLACEHOLDER);

    let result = restore_non_arabic(&tagged, &spans);

    match result {
        Err(ProcessingError::SpanCountMismatch { expected, found }) => {
            assert_eq!(expected, 2);
            assert_eq!(found, 1);
        }
        other => panic!("Expected SpanCountMismatch, got {:?}", other),
    }
}

/// Test that braces in tagged output survive restoration
#[test]
fn test_restore_non_arabic_withBracesInOutput_shouldKeepThem() {
    let spans = vec!["x = {value};".to_string()];
    let tagged = format!("S/S {{/PUNC E/E\n{}\n", TAGGED_PLACEHOLDER);

    let restored = restore_non_arabic(&tagged, &spans).unwrap();

    assert_eq!(restored, "S/S {/PUNC E/Ex = {value};");
}

/// Test that the hash artifact before a sentence start is rewritten
#[test]
fn test_repair_hash_markers_withHashRun_shouldTagHashes() {
    assert_eq!(
        repair_hash_markers("###\nS/S كتاب/NOUN E/E"),
        "S/S #/PUNC #/PUNC #/PUNC كتاب/NOUN E/E"
    );
    assert_eq!(
        repair_hash_markers("###  S/S قلم/NOUN E/E"),
        "S/S #/PUNC #/PUNC #/PUNC قلم/NOUN E/E"
    );
    assert_eq!(repair_hash_markers("S/S قلم/NOUN E/E"), "S/S قلم/NOUN E/E");
}

/// Test that removal mode prepares text without spans to restore
#[test]
fn test_prepare_for_tagging_withDitch_shouldHaveNoSpans() {
    let options = TagOptions { only_arabic: true, ditch_non_arabic: true };

    let document = prepare_for_tagging("Hello world. مرحبا بالعالم", &options);

    assert_eq!(document.text, "مرحبا بالعالم");
    assert!(document.spans.is_empty());
}

/// Test the default tagging options
#[test]
fn test_tag_options_default_shouldMaskOnlyArabic() {
    let options = TagOptions::default();

    assert!(options.only_arabic);
    assert!(!options.ditch_non_arabic);
    assert!(options.needs_preprocessing());
    assert!(!TagOptions { only_arabic: false, ditch_non_arabic: false }.needs_preprocessing());
}
